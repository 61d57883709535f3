//! Export module for the contact registry
//!
//! Produces checksummed JSON files that [`crate::import`] can read back.

pub mod json;

pub use json::{
    default_export_filename, export_to_file, export_to_writer, ExportFile, EXPORT_FORMAT_VERSION,
};
