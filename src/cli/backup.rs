//! Backup CLI commands

use clap::Subcommand;

use crate::display::format_backup_list;
use crate::error::{RegistryError, RegistryResult};
use crate::models::BackupId;
use crate::services::ContactService;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// List stored snapshots, newest first
    List,

    /// Replace all contacts with a snapshot's contents
    Restore {
        /// Backup ID, or 'latest' for the newest snapshot that differs from
        /// the current contacts
        backup: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(service: &ContactService, cmd: BackupCommands) -> RegistryResult<()> {
    match cmd {
        BackupCommands::List => {
            let backups = service.backups()?;
            println!("{}", format_backup_list(&backups));
            if !backups.is_empty() {
                println!("\nTotal: {} backup(s)", backups.len());
            }
        }

        BackupCommands::Restore { backup, force } => {
            let info = if backup == "latest" {
                service.latest_restorable_backup()?
            } else {
                service
                    .backups()?
                    .into_iter()
                    .find(|b| b.id.as_str() == backup)
            }
            .ok_or_else(|| RegistryError::backup_not_found(&backup))?;

            println!(
                "Backup {} from {} holds {} contact(s).",
                info.id,
                info.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                info.record_count
            );

            if !force {
                println!("WARNING: This will overwrite ALL current contacts!");
                println!("To proceed, run again with --force flag.");
                return Ok(());
            }

            let id: BackupId = info.id.clone();
            let count = service.restore_backup(&id)?;
            println!("Restore complete: {} contact(s).", count);
        }
    }

    Ok(())
}
