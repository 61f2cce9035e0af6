//! Command handlers, one module per command group.

pub mod config_cmd;
pub mod objects;
pub mod util;

use rpdac_core::Reconciler;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command that needs a ReportPortal connection.
pub async fn dispatch(
    cmd: Command,
    reconciler: &Reconciler,
    project: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Apply(args) => objects::apply(reconciler, project, args, global).await,
        Command::Create(args) => objects::create(reconciler, project, args, global).await,
        Command::Export(args) => objects::export(reconciler, project, args, global).await,
        Command::Get(args) => objects::get(reconciler, project, args, global).await,
        Command::Delete(args) => objects::delete(reconciler, project, args, global).await,
        // Config and Completions are handled before connecting
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
