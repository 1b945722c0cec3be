use std::{collections::BTreeMap, path::PathBuf};

use clap::Args;
use trskl::{BoneRegistry, ParseOptions};

use super::{Cli, CliRes, open};

#[derive(Debug, Args)]
pub struct Registry {
    /// Sets path to .trskl
    file: PathBuf,
    /// Prints a json object of name to rig id instead
    #[arg(long)]
    json: bool,
}

impl Cli for Registry {
    fn run(&self, options: &ParseOptions) -> eyre::Result<CliRes> {
        let trskl = open(&self.file, options)?;
        let registry = trskl.registry();

        if self.json {
            println!("{}", registry_json(registry)?);
        } else {
            for (rig_id, name) in registry.iter() {
                println!("{rig_id}\t{name}");
            }
        }

        Ok(CliRes::Ok)
    }
}

fn registry_json(registry: &BoneRegistry) -> eyre::Result<String> {
    // a duplicated name also sits in its old slot, the name lookup has the latest
    let map: BTreeMap<&str, i32> = registry
        .iter()
        .filter_map(|(_, name)| Some((name, registry.lookup_by_name(name)?)))
        .collect();

    Ok(serde_json::to_string_pretty(&map)?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn json_object() {
        let mut registry = BoneRegistry::new();

        registry.insert("hips", 1).unwrap();
        registry.insert("origin", 0).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&registry_json(&registry).unwrap()).unwrap();

        assert_eq!(value, serde_json::json!({ "origin": 0, "hips": 1 }));
    }

    #[test]
    fn duplicate_name_keeps_latest() {
        let mut registry = BoneRegistry::new();

        registry.insert("hips", 3).unwrap();
        registry.insert("hips", 1).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&registry_json(&registry).unwrap()).unwrap();

        assert_eq!(value, serde_json::json!({ "hips": 1 }));
    }
}
