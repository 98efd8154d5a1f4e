mod cli;
mod commands;
mod config;
mod model;
mod paths;
mod progress;
mod remote;
mod ui;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, OutputFormat};
use serde_json::json;
use std::io;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub output: OutputFormat,
}

impl Context {
    /// Spinners only in plain text mode, and not while log lines are printed
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.verbose == 0 && self.output == OutputFormat::Text
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        output: cli.output,
    };

    let result = match cli.command {
        Command::Apply(args) => commands::apply::run(&ctx, args),
        Command::Plan(args) => commands::plan::run(&ctx, args),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "ssnctl", &mut io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&ctx, &err);
            ExitCode::FAILURE
        }
    }
}

fn report_error(ctx: &Context, err: &anyhow::Error) {
    let message = format!("{err:#}");

    if ctx.output == OutputFormat::Json {
        let out = json!({
            "changed": false,
            "failed": true,
            "message": message,
        });
        println!("{out}");
        return;
    }

    ui::error(&message);
    if let Some(advice) = advice(err) {
        ui::dim(advice);
    }
}

/// Advice for the first categorized error in the chain
fn advice(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<declarative::Error>() {
            Some(e.category().advice())
        } else {
            cause
                .downcast_ref::<spotkit::Error>()
                .map(|e| e.category().advice())
        }
    })
}
