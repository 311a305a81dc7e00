use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

use crate::constants::CHIP;

/// Attach to the running bridge and stream its defmt log over RTT.
pub fn follow_log(elf_path: &str) -> Result<()> {
    if !Path::new(elf_path).exists() {
        anyhow::bail!("{elf_path} not found, build the image first");
    }

    let status = Command::new("probe-rs")
        .args(["attach", "--chip", CHIP, elf_path])
        .status()
        .with_context(|| format!("Could not start probe-rs for {elf_path}"))?;

    if !status.success() {
        anyhow::bail!("Lost the RTT session ({status})");
    }

    Ok(())
}
