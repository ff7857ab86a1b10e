//! `taskmind delete` command.

use crate::task::TaskStore;

/// Execute the `delete` command.
///
/// # Errors
///
/// Returns the refusal message when the task is missing, completed or
/// depended upon, or an error string if the store fails.
pub async fn run(store: &TaskStore<'_>, id: &str) -> Result<(), String> {
    let outcome = store.delete(id).await.map_err(|err| err.to_string())?;
    if outcome.success {
        println!("{}", outcome.message);
        Ok(())
    } else {
        Err(outcome.message)
    }
}
