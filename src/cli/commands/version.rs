//! Version information display

use serde::Serialize;

use crate::cli::args::{OutputFormat, VersionArgs};

#[derive(Debug, Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
    description: &'static str,
}

const INFO: VersionInfo = VersionInfo {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
    description: env!("CARGO_PKG_DESCRIPTION"),
};

/// Print version information.
pub fn run(args: &VersionArgs) {
    match args.format {
        OutputFormat::Human => println!("{} {}", INFO.name, INFO.version),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string(&INFO) {
                println!("{json}");
            }
        }
    }
}
