use clap::Subcommand;

use super::Ctx;
use crate::Result;

pub(super) mod autosave;
pub(super) mod export;
pub(super) mod flags;
pub(super) mod import;
pub(super) mod init;
pub(super) mod metrics;
pub(super) mod plan;
pub(super) mod revisions;
pub(super) mod show;
pub(super) mod theme;
pub(super) mod trial;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble and persist the save document (best-effort update fetch).
    Init,

    /// Show the current save document.
    Show,

    /// Export the save document as pretty-printed JSON.
    Export(export::ExportArgs),

    /// Import a save file, shallow-merging it into the document.
    Import(import::ImportArgs),

    /// Record and list trials.
    Trial {
        #[command(subcommand)]
        cmd: trial::TrialCmd,
    },

    /// Show or set the stored plan and its entitlements.
    Plan {
        #[command(subcommand)]
        cmd: plan::PlanCmd,
    },

    /// Show or set visual preferences.
    Theme {
        #[command(subcommand)]
        cmd: theme::ThemeCmd,
    },

    /// Show or set behavioral flags.
    Flags {
        #[command(subcommand)]
        cmd: flags::FlagsCmd,
    },

    /// Interaction event log.
    Metrics {
        #[command(subcommand)]
        cmd: metrics::MetricsCmd,
    },

    /// Autosave revision snapshots.
    Revisions {
        #[command(subcommand)]
        cmd: revisions::RevisionsCmd,
    },

    /// Run the autosave loop in the foreground.
    Autosave(autosave::AutosaveArgs),
}

pub(super) fn dispatch(ctx: &Ctx, command: Commands) -> Result<()> {
    match command {
        Commands::Init => init::handle(ctx),
        Commands::Show => show::handle(ctx),
        Commands::Export(args) => export::handle(ctx, args),
        Commands::Import(args) => import::handle(ctx, args),
        Commands::Trial { cmd } => trial::handle(ctx, cmd),
        Commands::Plan { cmd } => plan::handle(ctx, cmd),
        Commands::Theme { cmd } => theme::handle(ctx, cmd),
        Commands::Flags { cmd } => flags::handle(ctx, cmd),
        Commands::Metrics { cmd } => metrics::handle(ctx, cmd),
        Commands::Revisions { cmd } => revisions::handle(ctx, cmd),
        Commands::Autosave(args) => autosave::handle(ctx, args),
    }
}
