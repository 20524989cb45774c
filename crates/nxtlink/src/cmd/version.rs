use clap::Args;
use serde::Serialize;

use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Serialize)]
struct VersionOutput {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_os: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_arch: Option<&'static str>,
}

pub fn run(args: VersionArgs, format: OutputFormat) -> CliResult<i32> {
    let out = VersionOutput {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        target_os: args.extended.then_some(std::env::consts::OS),
        target_arch: args.extended.then_some(std::env::consts::ARCH),
    };

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
        ),
        _ => {
            if args.extended {
                println!(
                    "{} {} ({}, {})",
                    out.name,
                    out.version,
                    std::env::consts::OS,
                    std::env::consts::ARCH
                );
            } else {
                println!("{} {}", out.name, out.version);
            }
        }
    }
    Ok(SUCCESS)
}
