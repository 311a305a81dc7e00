pub const TARGET: &str = "thumbv7em-none-eabihf";
pub const CHIP: &str = "nRF52840_xxAA";
pub const APP_NAME: &str = "sd-bridge-app";
pub const APP_MANIFEST: &str = "crates/sd-bridge-app/Cargo.toml";

pub fn app_elf(release: bool) -> String {
    let profile = if release { "release" } else { "debug" };
    format!("target/{TARGET}/{profile}/{APP_NAME}")
}

/// Crates whose tests run on the host.
pub const HOST_CRATES: [&str; 2] = ["bus-arbiter", "sd-bridge-service"];
