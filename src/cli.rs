//! CLI argument parsing for the enhancement workflow.
//!
//! The CLI is intentionally thin: commands route straight to the workflow
//! and result actions, so the same state machine can be driven from tests
//! without a terminal.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "scalify",
    version,
    about = "Remote super-resolution photo enhancement",
    after_help = "Commands:\n  check                        Verify provider configuration\n  enhance <IMAGE>              Enhance a photo through the remote upscaler\n  download <REF>               Save a finished artifact to disk\n  share <REF>                  Share a finished artifact\n\nExamples:\n  scalify check\n  scalify enhance photo.jpg\n  scalify enhance photo.jpg --scale 4 --share --out ~/Pictures\n  scalify download https://example.com/out.jpg --out .\n  scalify share https://example.com/out.jpg",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Enhance(EnhanceArgs),
    Download(DownloadArgs),
    Share(ShareArgs),
    Check(CheckArgs),
}

/// Enhance command inputs for one full attempt.
#[derive(Parser, Debug)]
#[command(about = "Enhance a photo through the remote upscaler")]
pub struct EnhanceArgs {
    /// Image file to enhance (jpeg, png, webp, ...)
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Upscale factor sent to the provider
    #[arg(long, value_name = "N", default_value_t = 4)]
    pub scale: u32,

    /// Ask the provider to run its face enhancement pass
    #[arg(long)]
    pub face_enhance: bool,

    /// Directory for the saved result (defaults to the user downloads dir)
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Skip saving the result to disk
    #[arg(long, conflicts_with = "out")]
    pub no_save: bool,

    /// Share the result after enhancement
    #[arg(long)]
    pub share: bool,

    /// Emit a machine-readable JSON summary
    #[arg(long)]
    pub json: bool,

    /// Emit a verbose transcript of the workflow
    #[arg(long)]
    pub verbose: bool,
}

/// Download command inputs for a previously produced artifact.
#[derive(Parser, Debug)]
#[command(about = "Save a finished artifact to disk")]
pub struct DownloadArgs {
    /// Artifact reference (URL or data URI)
    #[arg(value_name = "REF")]
    pub artifact: String,

    /// Directory for the saved file (defaults to the user downloads dir)
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Emit a verbose transcript of the workflow
    #[arg(long)]
    pub verbose: bool,
}

/// Share command inputs for a previously produced artifact.
#[derive(Parser, Debug)]
#[command(about = "Share a finished artifact")]
pub struct ShareArgs {
    /// Artifact reference (URL or data URI)
    #[arg(value_name = "REF")]
    pub artifact: String,

    /// Emit a verbose transcript of the workflow
    #[arg(long)]
    pub verbose: bool,
}

/// Check command inputs for the configuration preflight.
#[derive(Parser, Debug)]
#[command(about = "Verify provider configuration")]
pub struct CheckArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    /// Emit a verbose transcript of the workflow
    #[arg(long)]
    pub verbose: bool,
}
