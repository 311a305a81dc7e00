mod build;
mod cli;
mod constants;
mod flash;
mod rtt;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Build(image) => {
            println!("Building firmware...");
            build::build_firmware(image.feature_list().as_deref(), image.release)?;
            println!("Build complete!");
        }
        Commands::Flash { image, force } => {
            flash::flash_firmware(
                image.feature_list().as_deref(),
                image.release,
                *force,
            )?;
        }
        Commands::Run(image) => {
            flash::flash_firmware(
                image.feature_list().as_deref(),
                image.release,
                false,
            )?;

            println!("Attaching RTT...");
            rtt::follow_log(&constants::app_elf(image.release))?;
        }
        Commands::Attach { release } => {
            rtt::follow_log(&constants::app_elf(*release))?;
        }
        Commands::Test => {
            build::test_host()?;
        }
    }

    Ok(())
}
