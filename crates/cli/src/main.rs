// FwCollect - Firmware Artifact Collector
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use clap::{Parser, Subcommand};
use fwcollect_config::HookStrategy;
use fwcollect_core::{collect_firmware, CollectReport, HookRegistry};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

mod context;

use context::{ContextArgs, ResolvedContext};

const EXIT_PASS: u8 = 0;
const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_RUNTIME_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Copies firmware build outputs into <project>/firmware, tagged with the build environment",
    long_about = None
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy every firmware image currently in the build output directory.
    Collect(CollectArgs),

    /// Post-build callback: collect if TARGET is one of the hooked targets.
    PostAction(PostActionArgs),

    /// List the build targets the post-action should be attached to.
    Hooks(HooksArgs),
}

#[derive(Parser, Debug)]
struct CollectArgs {
    #[command(flatten)]
    context: ContextArgs,

    /// Print the copy report as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct PostActionArgs {
    /// Build target that just finished, e.g. .pio/build/pico_w/firmware.uf2
    target: PathBuf,

    #[command(flatten)]
    context: ContextArgs,

    /// Hook strategy (per-artifact or program); overrides the config file
    #[arg(long)]
    hook: Option<HookStrategy>,

    /// Print the copy report as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct HooksArgs {
    #[command(flatten)]
    context: ContextArgs,

    /// Hook strategy (per-artifact or program); overrides the config file
    #[arg(long)]
    hook: Option<HookStrategy>,

    /// Print the targets as a JSON array
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // Logs go to stderr so --json output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Collect(args) => run_collect(args),
        Commands::PostAction(args) => run_post_action(args),
        Commands::Hooks(args) => run_hooks(args),
    }
}

fn resolve(args: &ContextArgs, hook: Option<HookStrategy>) -> Result<ResolvedContext, ExitCode> {
    args.resolve(hook).map_err(|e| {
        error!("{:#}", e);
        ExitCode::from(EXIT_CONFIG_ERROR)
    })
}

fn run_collect(args: CollectArgs) -> ExitCode {
    let resolved = match resolve(&args.context, None) {
        Ok(r) => r,
        Err(code) => return code,
    };

    match collect_firmware(&resolved.ctx) {
        Ok(report) => print_report(&report, args.json),
        Err(e) => {
            error!("{:#}", anyhow::Error::from(e));
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

fn run_post_action(args: PostActionArgs) -> ExitCode {
    let resolved = match resolve(&args.context, args.hook) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let ctx = &resolved.ctx;

    let target = if args.target.is_relative() {
        ctx.project_root.join(&args.target)
    } else {
        args.target.clone()
    };

    let registry = HookRegistry::for_context(resolved.hook, ctx);
    match registry.on_target_built(&target, ctx) {
        Ok(Some(report)) => print_report(&report, args.json),
        Ok(None) => ExitCode::from(EXIT_PASS),
        Err(e) => {
            error!("{:#}", anyhow::Error::from(e));
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

fn run_hooks(args: HooksArgs) -> ExitCode {
    let resolved = match resolve(&args.context, args.hook) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let registry = HookRegistry::for_context(resolved.hook, &resolved.ctx);
    if args.json {
        match serde_json::to_string(registry.targets()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize hook targets: {}", e);
                return ExitCode::from(EXIT_RUNTIME_ERROR);
            }
        }
    } else {
        for target in registry.targets() {
            println!("{}", target.display());
        }
    }
    ExitCode::from(EXIT_PASS)
}

fn print_report(report: &CollectReport, json: bool) -> ExitCode {
    match render_report(report, json) {
        Ok(Some(out)) => {
            println!("{}", out);
            ExitCode::from(EXIT_PASS)
        }
        Ok(None) => ExitCode::from(EXIT_PASS),
        Err(e) => {
            error!("Failed to serialize copy report: {}", e);
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

/// Stdout payload for a finished run; `None` when only the logs speak.
fn render_report(report: &CollectReport, json: bool) -> serde_json::Result<Option<String>> {
    if json {
        return serde_json::to_string_pretty(report).map(Some);
    }
    if report.is_empty() {
        debug!(
            "No firmware files found for environment '{}'",
            report.env_name
        );
    }
    Ok(None)
}
