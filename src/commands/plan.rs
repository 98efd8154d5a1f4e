//! `ssnctl plan`: resolve and build documents without mutating anything

use crate::Context;
use crate::cli::{ManifestArgs, OutputFormat};
use crate::progress;
use crate::ui;
use anyhow::Result;
use declarative::Reconciler;

pub fn run(ctx: &Context, args: ManifestArgs) -> Result<()> {
    let session = super::load(args)?;
    let reconciler = Reconciler::new(session.remote, &session.registry);

    let plan = progress::with_spinner("Looking up stateful node...", ctx.show_progress(), || {
        reconciler.plan(&session.request)
    })?;

    if ctx.output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    ui::section("Plan");
    ui::kv("operation", plan.resolution.operation.as_str());
    ui::kv("id", plan.resolution.id.as_deref().unwrap_or("(new)"));
    if let Some(action) = plan.action {
        ui::kv("then", action.as_str());
    }

    if let Some(document) = &plan.document {
        ui::section("Request document");
        println!("{}", serde_json::to_string_pretty(document)?);
    }

    if let Some(deallocation) = &plan.deallocation {
        ui::section("Deallocation");
        println!("{}", serde_json::to_string_pretty(deallocation)?);
    }

    println!();
    if ctx.quiet {
        return Ok(());
    }
    ui::info("Dry run, nothing was changed");
    if !session.request.exclusions.is_empty() {
        let paths: Vec<String> = session.request.exclusions.iter().map(ToString::to_string).collect();
        ui::dim(&format!("Left untouched on update: {}", paths.join(", ")));
    }
    Ok(())
}
