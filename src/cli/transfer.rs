//! Export and import CLI commands

use std::path::{Path, PathBuf};

use crate::config::RegistryPaths;
use crate::display::format_import_summary;
use crate::error::RegistryResult;
use crate::services::ContactService;

/// Handle the export command
///
/// Writes into `dir`, or the registry's export directory when none is given.
pub fn handle_export(
    service: &ContactService,
    paths: &RegistryPaths,
    dir: Option<PathBuf>,
    filename: Option<String>,
) -> RegistryResult<()> {
    let dir = dir.unwrap_or_else(|| paths.export_dir());
    std::fs::create_dir_all(&dir)?;

    let path = service.export_data(&dir, filename.as_deref())?;
    println!(
        "Exported {} contact(s) to {}",
        service.count()?,
        path.display()
    );
    Ok(())
}

/// Handle the import command
///
/// Without `confirm` this only reports what the file contains.
pub fn handle_import(service: &ContactService, file: &Path, confirm: bool) -> RegistryResult<()> {
    let preview = service.import_data(file)?;
    print!("{}", format_import_summary(&preview.summary));

    // Importing an export of an empty registry clears it
    if preview.candidates.is_empty() && preview.summary.total > 0 {
        println!("Nothing to import.");
        return Ok(());
    }

    let rejected = preview.candidates.len() - preview.fully_valid().len();
    if rejected > 0 {
        println!(
            "Warning: {} contact(s) have invalid fields; the import will be refused.",
            rejected
        );
    }

    if !confirm {
        println!(
            "This will replace all {} current contact(s) with {} imported contact(s).",
            service.count()?,
            preview.candidates.len()
        );
        println!("Run again with --confirm to proceed.");
        return Ok(());
    }

    let count = preview.candidates.len();
    service.replace_all_data(preview.candidates)?;
    println!("Imported {} contact(s).", count);
    Ok(())
}
