use serde::Deserialize;
use std::fs;

#[derive(Deserialize)]
struct Manifest {
    package: Package,
}

#[derive(Deserialize)]
struct Package {
    metadata: Metadata,
}

#[derive(Deserialize)]
struct Metadata {
    megabot: MegabotMetadata,
}

#[derive(Deserialize)]
struct MegabotMetadata {
    codename: String,
}

fn main() {
    let toml_str = fs::read_to_string("Cargo.toml").expect("Failed to read Cargo.toml");
    let manifest: Manifest = toml::from_str(&toml_str).expect("Failed to parse Cargo.toml");

    // Exposed to the crate as env!("CODENAME") for --version
    println!(
        "cargo:rustc-env=CODENAME={}",
        manifest.package.metadata.megabot.codename
    );
    println!("cargo:rerun-if-changed=Cargo.toml");
}
