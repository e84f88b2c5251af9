use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::core::{DirTree, Engine, FromType, Request, ToType};

#[derive(Parser)]
#[command(name = "mockforge")]
#[command(about = "Generate Go interfaces and call-recording mocks from package source")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an interface or mock for a receiver type
    Generate {
        /// Module path the package is fetched from
        #[arg(short, long)]
        module: String,

        /// Package name within the module
        #[arg(short, long)]
        package: String,

        /// Receiver type whose exported methods are collected
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// Kind of the source type
        #[arg(long, value_enum)]
        from: FromType,

        /// Kind of artifact to generate
        #[arg(long, value_enum)]
        to: ToType,

        /// Scan a local directory instead of fetching the module
        #[arg(long)]
        source_dir: Option<PathBuf>,

        /// Write output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the default configuration file
    Config {
        /// Target path
        #[arg(long, default_value = "mockforge.toml")]
        path: PathBuf,
    },
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Generate {
                module,
                package,
                type_name,
                from,
                to,
                source_dir,
                output,
            } => {
                let request = Request::new(module, package, type_name, from, to);

                let text = match source_dir {
                    Some(dir) => engine.generate_from_tree(&DirTree::new(dir), request).await?,
                    None => engine.generate(request).await?,
                };

                match output {
                    Some(path) => std::fs::write(&path, text)?,
                    None => print!("{text}"),
                }

                Ok(())
            }
            Commands::Config { path } => {
                Config::default().save(&path)?;
                println!("wrote {}", path.display());
                Ok(())
            }
        }
    }
}
