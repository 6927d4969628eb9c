//! Rank a catalog document from disk.
//!
//! Usage: `rank-catalog <job|course|scholarship|ondc> <file.json>`
//!
//! Prints the ranked table as pretty JSON on stdout.

use anyhow::{bail, Context, Result};
use xplor_services::catalog;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("xplor_services=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [domain, path] = args.as_slice() else {
        bail!("Usage: rank-catalog <job|course|scholarship|ondc> <file.json>");
    };

    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let document: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path))?;

    let recommendation = catalog::recommend(&document, domain)?;
    println!("{}", serde_json::to_string_pretty(&recommendation)?);

    Ok(())
}
