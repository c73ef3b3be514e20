use anyhow::{anyhow, bail, Result};
use clap::Parser;
use serde::Serialize;

mod actions;
mod cli;
mod client;
mod codec;
mod error;
mod workflow;

use actions::ShareOutcome;
use cli::{CheckArgs, Command, DownloadArgs, EnhanceArgs, RootArgs, ShareArgs};
use client::{EnhanceClient, EnhancementResult, ProviderConfig};
use workflow::Workflow;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(is_verbose(&args.command));

    match args.command {
        Command::Enhance(args) => cmd_enhance(args),
        Command::Download(args) => cmd_download(args),
        Command::Share(args) => cmd_share(args),
        Command::Check(args) => cmd_check(args),
    }
}

/// Machine-readable summary of one enhance run.
#[derive(Serialize)]
struct EnhanceSummary {
    state: &'static str,
    outcome: &'static str,
    before: Option<String>,
    after: String,
    scale: u32,
    face_enhance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    save_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    share: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    share_error: Option<String>,
}

/// Machine-readable result of the configuration preflight.
#[derive(Serialize)]
struct CheckSummary {
    model: String,
    endpoint: String,
    token: &'static str,
}

fn is_verbose(command: &Command) -> bool {
    match command {
        Command::Enhance(args) => args.verbose,
        Command::Download(args) => args.verbose,
        Command::Share(args) => args.verbose,
        Command::Check(args) => args.verbose,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "scalify=debug" } else { "scalify=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_enhance(args: EnhanceArgs) -> Result<()> {
    // Missing configuration is fatal before any work starts.
    let config = ProviderConfig::from_env()?;
    let model = config.model.clone();
    let client = EnhanceClient::new(config);

    let image = codec::from_path(&args.image)?;
    let mut workflow = Workflow::with_options(args.scale, args.face_enhance);
    workflow
        .select(image)
        .map_err(|err| anyhow!("could not read image: {err}"))?;

    if !args.json {
        let before = workflow.display_ref().map(ref_summary).unwrap_or_default();
        println!("before: {before}");
        println!("enhancing with {model} (scale {}x)...", args.scale.max(1));
    }

    workflow
        .run(&client)
        .map_err(|err| anyhow!("could not read image: {err}"))?;

    let Some(result) = workflow.result() else {
        bail!("enhancement did not complete");
    };
    let result = result.clone();
    let artifact_ref = match &result {
        EnhancementResult::Failure { reason } => bail!("enhancement failed: {reason}"),
        other => other.artifact_ref().unwrap_or_default().to_string(),
    };

    let mut saved_to = None;
    let mut save_error = None;
    if !args.no_save {
        let out_dir = args
            .out
            .clone()
            .unwrap_or_else(actions::default_download_dir);
        match actions::download(&artifact_ref, &out_dir) {
            Ok(path) => saved_to = Some(path),
            Err(err) => {
                tracing::warn!(error = %err, "download failed");
                eprintln!("warning: could not save the enhanced image: {err}");
                save_error = Some(err.to_string());
            }
        }
    }

    let mut shared = None;
    let mut share_error = None;
    if args.share {
        match actions::share(&artifact_ref) {
            Ok(ShareOutcome::Command { program, .. }) => {
                if !args.json {
                    println!("shared via {program}");
                }
                shared = Some(format!("command:{program}"));
            }
            Ok(ShareOutcome::ClipboardCopy) => {
                if !args.json {
                    println!("no share target available; copied the image reference to the clipboard");
                }
                shared = Some("clipboard".to_string());
            }
            Err(err) => {
                tracing::warn!(error = %err, "share failed");
                eprintln!("warning: could not share the enhanced image: {err}");
                share_error = Some(err.to_string());
            }
        }
    }

    if args.json {
        let summary = EnhanceSummary {
            state: workflow.state().name(),
            outcome: result.label(),
            before: workflow.display_ref().map(ref_summary),
            after: ref_summary(&artifact_ref),
            scale: args.scale.max(1),
            face_enhance: args.face_enhance,
            saved_to: saved_to.as_ref().map(|path| path.display().to_string()),
            save_error,
            share: shared,
            share_error,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        match &result {
            EnhancementResult::Success { .. } => {
                println!("after: {} (enhanced)", ref_summary(&artifact_ref));
            }
            _ => println!("after: original kept (enhancement unavailable)"),
        }
        if let Some(path) = &saved_to {
            println!("saved: {}", path.display());
        }
    }

    Ok(())
}

fn cmd_download(args: DownloadArgs) -> Result<()> {
    let out_dir = args.out.unwrap_or_else(actions::default_download_dir);
    let path = actions::download(&args.artifact, &out_dir)
        .map_err(|err| anyhow!("could not save artifact: {err}"))?;
    println!("saved: {}", path.display());
    Ok(())
}

fn cmd_share(args: ShareArgs) -> Result<()> {
    match actions::share(&args.artifact) {
        Ok(ShareOutcome::Command { program, .. }) => println!("shared via {program}"),
        Ok(ShareOutcome::ClipboardCopy) => {
            println!("copied the artifact reference to the clipboard");
        }
        Err(err) => {
            // Share failures are notifications, never crashes.
            tracing::warn!(error = %err, "share failed");
            eprintln!("warning: could not share: {err}");
        }
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> Result<()> {
    let config = ProviderConfig::from_env().map_err(|err| anyhow!("configuration error: {err}"))?;
    if args.json {
        let summary = CheckSummary {
            endpoint: config.predictions_url(),
            model: config.model,
            token: "set",
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("configuration ok");
        println!("model: {}", config.model);
        println!("endpoint: {}", config.predictions_url());
    }
    Ok(())
}

/// Compact rendering of an artifact reference for terminal output (data URIs
/// are megabytes of base64).
fn ref_summary(artifact_ref: &str) -> String {
    if let Some(rest) = artifact_ref.strip_prefix("data:") {
        let mime = rest.split(';').next().unwrap_or("unknown");
        return format!("data URI ({mime}, {} chars)", artifact_ref.len());
    }
    artifact_ref.to_string()
}
