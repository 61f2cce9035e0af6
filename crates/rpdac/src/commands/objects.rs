//! Object command handlers: apply, create, export, get, delete.

use rpdac_core::{AnyObject, CoreError, Kind, Outcome, Reconciler};

use crate::cli::{ApplyArgs, CreateArgs, DeleteArgs, ExportArgs, GetArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn apply(
    reconciler: &Reconciler,
    project: &str,
    args: ApplyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);

    match reconciler.apply(project, &args.file, args.recursive).await {
        Ok(report) => {
            let out = output::render_report(global.output, &report, color)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        // Show what did succeed before reporting the failure.
        Err(CoreError::BatchFailed {
            failed,
            total,
            report,
        }) => {
            let out = output::render_report(global.output, &report, color)?;
            output::print_output(&out, global.quiet);
            Err(CliError::BatchFailed { failed, total })
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn create(
    reconciler: &Reconciler,
    project: &str,
    args: CreateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let object = reconciler.create_file(project, &args.file).await?;
    if !global.quiet {
        let color = output::should_color(global.color);
        let kind = object.kind().to_string();
        eprintln!(
            "{}",
            output::outcome_line(&kind, object.name(), Outcome::Created, color)
        );
    }
    Ok(())
}

pub async fn export(
    reconciler: &Reconciler,
    project: &str,
    args: ExportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let object = reconciler
        .export(args.kind.into(), project, args.id, &args.file)
        .await?;
    if !global.quiet {
        eprintln!(
            "{} \"{}\" exported to {}",
            object.kind(),
            object.name(),
            args.file.display()
        );
    }
    Ok(())
}

pub async fn get(
    reconciler: &Reconciler,
    project: &str,
    args: GetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = Kind::from(args.kind);
    let object = reconciler
        .get_by_name(kind, project, &args.name)
        .await?
        .ok_or_else(|| not_found(kind, project, &args.name))?;

    // The table view of one object is its YAML definition.
    let out = output::render_single(
        global.output,
        &object,
        output::render_yaml,
        |o: &AnyObject| o.name().to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn delete(
    reconciler: &Reconciler,
    project: &str,
    args: DeleteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = Kind::from(args.kind);
    if !util::confirm(
        "delete",
        &format!("Delete {kind} '{}' from project '{project}'?", args.name),
        global.yes,
    )? {
        return Ok(());
    }

    reconciler.delete(kind, project, &args.name).await?;
    if !global.quiet {
        eprintln!("{kind} \"{}\" deleted", args.name);
    }
    Ok(())
}

fn not_found(kind: Kind, project: &str, name: &str) -> CliError {
    CoreError::NotFound {
        kind,
        project: project.into(),
        name: name.into(),
    }
    .into()
}
