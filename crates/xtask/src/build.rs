use crate::constants::{APP_MANIFEST, HOST_CRATES, TARGET};
use anyhow::{Context, Result};
use std::process::Command;

pub fn build_firmware(features: Option<&str>, release: bool) -> Result<()> {
    let mut cargo_build = Command::new("cargo");
    cargo_build
        .arg("build")
        .arg("--manifest-path")
        .arg(APP_MANIFEST)
        .arg("--target")
        .arg(TARGET);

    if release {
        cargo_build.arg("--release");
    }

    if let Some(features) = features {
        cargo_build.args(["--features", features]);
    }

    let status = cargo_build
        .status()
        .with_context(|| format!("Failed to build {}", APP_MANIFEST))?;

    if !status.success() {
        anyhow::bail!("Build failed for {}", APP_MANIFEST);
    }

    Ok(())
}

/// Host-side tests for the arbiter and the file service.
pub fn test_host() -> Result<()> {
    for package in HOST_CRATES {
        let status = Command::new("cargo")
            .args(["test", "-p", package])
            .status()
            .with_context(|| format!("Failed to run {package} tests"))?;

        if !status.success() {
            anyhow::bail!("{package} tests failed");
        }
    }

    Ok(())
}
