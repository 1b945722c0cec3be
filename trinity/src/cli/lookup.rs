use std::path::PathBuf;

use clap::{ArgGroup, Args};
use trskl::{BoneRegistry, ParseOptions};

use super::{Cli, CliRes, open};

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("key").required(true).args(["name", "rig_id"])))]
pub struct Lookup {
    /// Sets path to .trskl
    file: PathBuf,
    /// Bone name to find the rig id of
    #[arg(long)]
    name: Option<String>,
    /// Rig id to find the bone name of
    #[arg(long)]
    rig_id: Option<i32>,
}

impl Lookup {
    fn find(&self, registry: &BoneRegistry) -> Option<String> {
        if let Some(name) = &self.name {
            return registry.lookup_by_name(name).map(|rig_id| rig_id.to_string());
        }

        self.rig_id
            .and_then(|rig_id| registry.lookup_by_rig_id(rig_id))
            .map(str::to_owned)
    }
}

impl Cli for Lookup {
    fn run(&self, options: &ParseOptions) -> eyre::Result<CliRes> {
        let trskl = open(&self.file, options)?;

        match self.find(trskl.registry()) {
            Some(found) => {
                println!("{found}");
                Ok(CliRes::Ok)
            }
            None => {
                eprintln!("Not found");
                Ok(CliRes::Err)
            }
        }
    }
}
