use std::{fs, path::PathBuf};

use clap::Args;
use eyre::WrapErr;
use trskl::ParseOptions;

use crate::json::SkeletonDocument;

use super::{Cli, CliRes, open};

#[derive(Debug, Args)]
pub struct Json {
    /// Sets path to .trskl
    file: PathBuf,
    /// Writes the document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli for Json {
    fn run(&self, options: &ParseOptions) -> eyre::Result<CliRes> {
        let trskl = open(&self.file, options)?;
        let document = serde_json::to_string_pretty(&SkeletonDocument::from(&trskl))?;

        match &self.output {
            Some(output) => {
                fs::write(output, document)
                    .wrap_err_with(|| format!("cannot write {}", output.display()))?;

                println!("Wrote {}", output.display());
            }
            None => println!("{document}"),
        }

        Ok(CliRes::Ok)
    }
}
