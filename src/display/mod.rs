//! Display formatting for terminal output

pub mod person;

pub use person::{
    format_audit_entries, format_backup_list, format_import_summary, format_person_details,
    format_person_list,
};
