use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use contact_registry::audit::AuditLogger;
use contact_registry::cli::{
    handle_backup_command, handle_export, handle_import, handle_person_command, BackupCommands,
    PersonCommands,
};
use contact_registry::config::{RegistryPaths, Settings};
use contact_registry::display::format_audit_entries;
use contact_registry::logging::init_logging;
use contact_registry::services::ContactService;
use contact_registry::storage::FileStore;
use contact_registry::RegistryError;

#[derive(Parser)]
#[command(
    name = "contacts",
    author = "Kaylee Beyene",
    version,
    about = "Local contact registry",
    long_about = "Keeps a validated list of contacts (name, birth date, phone, email) \
                  on disk, with search, automatic backups and JSON export/import."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Person(PersonCommands),

    /// Export all contacts to a JSON file
    Export {
        /// Destination directory (defaults to the registry's exports folder)
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// File name (defaults to contacts-backup-YYYY-MM-DD.json)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Check an export file and optionally replace all contacts with it
    Import {
        /// Path to a .json export file
        file: PathBuf,
        /// Replace the current contacts
        #[arg(long)]
        confirm: bool,
    },

    /// Backup snapshot commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config,
}

impl Commands {
    /// Whether the command can run on an empty registry after a failed load
    fn tolerates_failed_load(&self) -> bool {
        matches!(
            self,
            Commands::Import { .. } | Commands::Backup(_) | Commands::History { .. } | Commands::Config
        )
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<RegistryError>() {
                Some(registry_err) => eprintln!("Error: {}", registry_err.user_message()),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = RegistryPaths::new()?;
    paths.ensure_directories()?;
    let settings = Settings::load_or_create(&paths)?;
    let _logger = init_logging(&settings.log_level)?;

    let Some(command) = cli.command else {
        println!("Contact Registry");
        println!();
        println!("Run 'contacts --help' for usage information.");
        return Ok(());
    };

    // Initialize storage
    let store = Arc::new(FileStore::new(paths.data_dir()));
    let mut service = ContactService::new(store, &settings);
    if settings.audit_enabled {
        service = service.with_audit(AuditLogger::new(paths.audit_log()));
    }

    if let Err(e) = service.load() {
        if !command.tolerates_failed_load() {
            return Err(e.into());
        }
        eprintln!("Warning: {}", e.user_message());
    }

    match command {
        Commands::Person(cmd) => handle_person_command(&service, cmd)?,
        Commands::Export { dir, file } => handle_export(&service, &paths, dir, file)?,
        Commands::Import { file, confirm } => handle_import(&service, &file, confirm)?,
        Commands::Backup(cmd) => handle_backup_command(&service, cmd)?,
        Commands::History { limit } => {
            let entries = AuditLogger::new(paths.audit_log()).read_recent(limit)?;
            println!("{}", format_audit_entries(&entries));
        }
        Commands::Config => {
            println!("Contact Registry Configuration");
            println!("==============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Max backups:   {}", settings.max_backups);
            println!("  Log level:     {}", settings.log_level);
            println!("  Audit enabled: {}", settings.audit_enabled);
            println!("  Theme:         {}", settings.theme);
            println!("  Contacts:      {}", service.count()?);
        }
    }

    Ok(())
}
