use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use eyre::WrapErr;
use log::LevelFilter;
use trskl::{ParseOptions, Trskl};

use crate::config::{AnchorSetting, QuirkSetting, parse_config, parse_config_from_file};

use self::{bones::Bones, json::Json, lookup::Lookup, registry::Registry};

mod bones;
mod json;
mod lookup;
mod registry;

pub enum CliRes {
    Ok,
    Err,
}

pub trait Cli {
    fn run(&self, options: &ParseOptions) -> eyre::Result<CliRes>;
}

#[derive(Debug, Parser)]
#[command(version, about = "Inspect TRSKL skeletons", long_about = None)]
struct TrinityCli {
    /// Sets path to a config file instead of `trinity.toml` next to the binary
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides the order of the legacy rig id replacement and node id adjust
    #[arg(long, global = true, value_enum)]
    quirk: Option<QuirkSetting>,
    /// Overrides where relative offsets count from
    #[arg(long, global = true, value_enum)]
    anchor: Option<AnchorSetting>,
    /// Logs every decoded bone
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Lists every bone record in file order
    Bones(Bones),
    /// Prints the name to rig id mapping
    Registry(Registry),
    /// Finds a rig id by name or a name by rig id
    Lookup(Lookup),
    /// Converts the skeleton to the exporter's json document
    Json(Json),
}

impl Commands {
    fn module(&self) -> &dyn Cli {
        match self {
            Commands::Bones(cli) => cli,
            Commands::Registry(cli) => cli,
            Commands::Lookup(cli) => cli,
            Commands::Json(cli) => cli,
        }
    }
}

impl TrinityCli {
    fn parse_options(&self) -> eyre::Result<ParseOptions> {
        let config = match &self.config {
            Some(path) => parse_config_from_file(path)
                .wrap_err_with(|| format!("cannot read config {}", path.display()))?,
            None => parse_config()?,
        };

        let mut options = config.parse_options();

        if let Some(quirk) = self.quirk {
            options.rig_id_quirk = quirk.into();
        }

        if let Some(anchor) = self.anchor {
            options.offset_anchor = anchor.into();
        }

        Ok(options)
    }
}

fn init_logger(verbose: bool) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));

    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }

    // tests may have set one up already
    let _ = builder.try_init();
}

fn open(path: &Path, options: &ParseOptions) -> eyre::Result<Trskl> {
    Trskl::open_from_file_with(path, options)
        .wrap_err_with(|| format!("cannot parse {}", path.display()))
}

/// Runs command-line options
pub fn cli() -> CliRes {
    let args = TrinityCli::parse();

    init_logger(args.verbose);

    let res = args
        .parse_options()
        .and_then(|options| args.command.module().run(&options));

    match res {
        Ok(res) => res,
        Err(err) => {
            eprintln!("{err:?}");
            CliRes::Err
        }
    }
}
