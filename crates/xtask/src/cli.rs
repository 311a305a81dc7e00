use clap::{Args, Parser, Subcommand};

/// Host tooling for the SD bridge firmware.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// How the bridge image is built.
#[derive(Args, Clone)]
pub struct Image {
    /// Extra cargo features for `sd-bridge-app`.
    #[arg(long)]
    pub features: Option<String>,

    /// Arm the blockout from the printer's chip-select (`cs-sense`).
    #[arg(long)]
    pub sense: bool,

    /// Leave out defmt logging; panics then reset the chip.
    #[arg(long)]
    pub quiet: bool,

    #[arg(long)]
    pub release: bool,
}

impl Image {
    /// The feature list handed to cargo.
    pub fn feature_list(&self) -> Option<String> {
        let mut features: Vec<&str> = Vec::new();
        if !self.quiet {
            features.push("defmt");
        }
        if self.sense {
            features.push("cs-sense");
        }
        if let Some(extra) = &self.features {
            features.extend(extra.split(',').map(str::trim).filter(|f| !f.is_empty()));
        }
        (!features.is_empty()).then(|| features.join(","))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the bridge image
    Build(Image),
    /// Build and flash the bridge image
    Flash {
        #[command(flatten)]
        image: Image,

        /// Erase the whole chip first
        #[arg(long)]
        force: bool,
    },
    /// Flash, then follow the defmt log
    Run(Image),
    /// Follow the defmt log of an already flashed bridge
    Attach {
        #[arg(long)]
        release: bool,
    },
    /// Run the host tests of the arbiter and file service
    Test,
}
