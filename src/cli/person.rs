//! Contact CLI commands
//!
//! Contacts are addressed by their 1-based position in the list or by id.

use chrono::Local;
use clap::Subcommand;

use crate::display::{format_person_details, format_person_list};
use crate::error::{RegistryError, RegistryResult};
use crate::models::{PersonId, PersonUpdate};
use crate::services::ContactService;

/// Contact subcommands
#[derive(Subcommand)]
pub enum PersonCommands {
    /// Add a new contact
    Add {
        /// Full name
        name: String,
        /// Birth date (DD/MM/YYYY)
        birth_date: String,
        /// Phone number with area code
        phone: String,
        /// Email address
        email: String,
    },

    /// List all contacts
    #[command(alias = "ls")]
    List,

    /// Search contacts by name, email or phone
    Search {
        /// Text to look for (case-insensitive)
        query: String,
    },

    /// Show one contact in detail
    Show {
        /// Position in the list (1-based) or contact ID
        contact: String,
    },

    /// Change fields of a contact
    Update {
        /// Position in the list (1-based) or contact ID
        contact: String,
        #[arg(long)]
        name: Option<String>,
        /// Birth date (DD/MM/YYYY)
        #[arg(long)]
        birth_date: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },

    /// Delete a contact
    #[command(alias = "rm")]
    Delete {
        /// Position in the list (1-based) or contact ID
        contact: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a contact command
pub fn handle_person_command(service: &ContactService, cmd: PersonCommands) -> RegistryResult<()> {
    let today = Local::now().date_naive();

    match cmd {
        PersonCommands::Add {
            name,
            birth_date,
            phone,
            email,
        } => {
            let person = service.create(&name, &birth_date, &phone, &email)?;
            println!("Added contact: {}", person.name());
            println!("  ID: {}", person.id());
        }

        PersonCommands::List => {
            let persons: Vec<_> = service.persons()?.into_iter().enumerate().collect();
            println!("{}", format_person_list(&persons, today));
        }

        PersonCommands::Search { query } => {
            let found = service.search_indexed(&query)?;
            if found.is_empty() {
                println!("No contacts match '{}'.", query);
            } else {
                println!("{}", format_person_list(&found, today));
            }
        }

        PersonCommands::Show { contact } => {
            let index = resolve_index(service, &contact)?;
            let person = service
                .get_person_by_index(index)?
                .ok_or_else(|| RegistryError::person_not_found(&contact))?;
            print!("{}", format_person_details(&person, today));
        }

        PersonCommands::Update {
            contact,
            name,
            birth_date,
            phone,
            email,
        } => {
            let changes = PersonUpdate {
                name,
                birth_date,
                phone,
                email,
            };
            if changes.is_empty() {
                println!("Nothing to update. Pass at least one of --name, --birth-date, --phone, --email.");
                return Ok(());
            }

            let index = resolve_index(service, &contact)?;
            let person = service.edit_person(index, changes)?;
            println!("Updated contact: {}", person.name());
        }

        PersonCommands::Delete { contact, force } => {
            let index = resolve_index(service, &contact)?;
            let person = service
                .get_person_by_index(index)?
                .ok_or_else(|| RegistryError::person_not_found(&contact))?;

            if !force {
                println!(
                    "About to delete '{}' <{}>. Run again with --force to confirm.",
                    person.name(),
                    person.email()
                );
                return Ok(());
            }

            let removed = service.delete_person(index)?;
            println!("Deleted contact: {}", removed.name());
        }
    }

    Ok(())
}

/// Turn a 1-based position or an id into a 0-based index
fn resolve_index(service: &ContactService, contact: &str) -> RegistryResult<usize> {
    if let Ok(position) = contact.parse::<usize>() {
        return position
            .checked_sub(1)
            .ok_or_else(|| RegistryError::person_not_found(contact));
    }

    service
        .index_of(&PersonId::from(contact))?
        .ok_or_else(|| RegistryError::person_not_found(contact))
}
