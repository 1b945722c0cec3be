use std::path::PathBuf;

use clap::Args;
use trskl::{ParseOptions, Trskl};

use super::{Cli, CliRes, open};

#[derive(Debug, Args)]
pub struct Bones {
    /// Sets path to .trskl
    file: PathBuf,
}

impl Cli for Bones {
    fn run(&self, options: &ParseOptions) -> eyre::Result<CliRes> {
        let trskl = open(&self.file, options)?;

        print!("{}", bone_table(&trskl));

        Ok(CliRes::Ok)
    }
}

fn or_dash(value: Option<i32>) -> String {
    value.map_or_else(|| "-".to_owned(), |value| value.to_string())
}

fn bone_table(trskl: &Trskl) -> String {
    let mut res = String::from("index\trig id\tparent\tname\tmerge alias\n");

    for (index, bone) in trskl.bones.iter().enumerate() {
        res += &format!(
            "{index}\t{}\t{}\t{}\t{}\n",
            or_dash(bone.rig_id),
            or_dash(bone.parent),
            bone.name_or_empty(),
            bone.merge_alias.as_deref().unwrap_or("-")
        );
    }

    res
}
