//! `ssnctl apply`

use crate::Context;
use crate::cli::{ApplyArgs, OutputFormat};
use crate::progress;
use crate::ui;
use anyhow::{Context as _, Result};
use declarative::{Operation, Outcome, Reconciler, Resolution};
use serde_json::json;

pub fn run(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let session = super::load(args.target)?;
    let reconciler = Reconciler::new(session.remote, &session.registry);
    let request = session.request;

    let resolution = progress::with_spinner("Looking up stateful node...", ctx.show_progress(), || {
        reconciler.resolve(&request)
    })?;
    log::info!(
        "Resolved {} {}",
        resolution.operation,
        resolution.id.as_deref().unwrap_or("(new)")
    );

    if !args.yes && !confirm_delete(&resolution)? {
        return report(
            ctx,
            &Outcome {
                operation: resolution.operation,
                changed: false,
                resource_id: resolution.id.clone(),
                message: "Deletion cancelled".to_string(),
            },
        );
    }

    let outcome = progress::with_spinner(
        &format!("Running {}...", resolution.operation),
        ctx.show_progress(),
        || reconciler.dispatch(&resolution, &request),
    )?;

    report(ctx, &outcome)
}

/// Ask before deleting when someone is at the terminal
fn confirm_delete(resolution: &Resolution) -> Result<bool> {
    if resolution.operation != Operation::Delete || !console::user_attended() {
        return Ok(true);
    }

    let id = resolution.id.as_deref().unwrap_or_default();
    dialoguer::Confirm::new()
        .with_prompt(format!("Delete stateful node {id}?"))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

fn report(ctx: &Context, outcome: &Outcome) -> Result<()> {
    match ctx.output {
        OutputFormat::Json => {
            let out = json!({
                "changed": outcome.changed,
                "stateful_node_id": outcome.resource_id,
                "message": outcome.message,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if outcome.changed {
                ui::success(&outcome.message);
            } else {
                ui::warn(&outcome.message);
            }
            if let Some(id) = &outcome.resource_id {
                ui::kv("id", id);
            }
        }
    }
    Ok(())
}
