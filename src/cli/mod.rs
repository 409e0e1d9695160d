//! CLI surface for gridcore.
//!
//! Thin handlers over the save manager: every command re-reads the durable
//! store, mutates through `SaveManager`, and prints either a human summary
//! or `--json` for scripting.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser, builder::BoolishValueParser};

use crate::config::{self, Config};
use crate::fetch::{Fetcher, FsFetcher, NullFetcher};
use crate::manager::SaveManager;
use crate::store::KvStore;
use crate::{Error, Result};

mod commands;
mod render;

pub use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "gc",
    version,
    about = "THE GRID local save/preferences manager",
    infer_subcommands = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Machine-readable JSON output.
    #[arg(
        long,
        global = true,
        default_value_t = false,
        default_missing_value = "true",
        num_args = 0..=1,
        value_parser = BoolishValueParser::new()
    )]
    pub json: bool,

    /// Data directory (default: $GC_DATA_DIR or XDG data dir).
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Deployed assets root for updates/language fetches.
    #[arg(long, global = true, value_name = "PATH")]
    pub assets: Option<PathBuf>,

    /// Errors only.
    #[arg(
        short = 'q',
        long,
        global = true,
        default_value_t = false,
        default_missing_value = "true",
        num_args = 0..=1,
        value_parser = BoolishValueParser::new()
    )]
    pub quiet: bool,

    /// Debug output (repeat for more).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

pub fn parse_from<I, T>(args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::parse_from(args)
}

pub(crate) struct Ctx {
    pub json: bool,
    pub quiet: bool,
    pub config: Config,
    pub data_dir: PathBuf,
    pub assets_dir: Option<PathBuf>,
}

impl Ctx {
    pub(crate) fn kv_store(&self) -> Result<KvStore> {
        Ok(KvStore::open(self.data_dir.join("keys"))?)
    }

    pub(crate) fn revisions_path(&self) -> PathBuf {
        self.data_dir.join("revisions.sqlite")
    }

    pub(crate) fn fetcher(&self) -> Box<dyn Fetcher> {
        match &self.assets_dir {
            Some(root) => Box::new(FsFetcher::new(root.clone())),
            None => Box::new(NullFetcher),
        }
    }

    pub(crate) fn manager(&self) -> Result<SaveManager> {
        Ok(SaveManager::new(self.kv_store()?, self.fetcher()))
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let assets_hint = cli.assets.clone();
    let config = config::load_or_init(assets_hint.as_deref());

    let data_dir = cli
        .data_dir
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(crate::paths::data_dir);
    let assets_dir = assets_hint.or_else(|| config.assets_dir.clone());

    let ctx = Ctx {
        json: cli.json,
        quiet: cli.quiet,
        config,
        data_dir,
        assets_dir,
    };
    commands::dispatch(&ctx, cli.command)
}

pub(crate) fn read_json_file(path: &std::path::Path) -> Result<serde_json::Value> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents).map_err(Error::Codec)?)
}
