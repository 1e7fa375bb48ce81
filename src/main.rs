use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
struct Args {
    /// The command to execute
    #[command(subcommand)]
    command: PressCommand,
}

#[derive(Parser)]
struct BuildArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "press.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum PressCommand {
    /// Press the content tree and write the page manifest
    Build(BuildArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    match args.command {
        PressCommand::Build(args) => {
            commands::build::run(&args).await?;
        }
    }

    Ok(())
}
