//! `taskmind clear` command.

use crate::task::TaskStore;

/// Execute the `clear` command.
///
/// # Errors
///
/// Returns an error string if `confirmed` is false or the store fails.
pub async fn run(store: &TaskStore<'_>, confirmed: bool) -> Result<(), String> {
    if !confirmed {
        return Err("Refusing to clear all tasks without --yes".to_string());
    }
    let outcome = store.clear_all().await.map_err(|err| err.to_string())?;
    println!("{}", outcome.message);
    if let Some(file) = outcome.backup_file {
        println!("Backup: {}", store.memory_dir().join(file).display());
    }
    Ok(())
}
