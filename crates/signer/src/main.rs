//! Prints the signature header for a webhook payload
//!
//! Usage: `kline-webhook-sign [FILE]` (reads stdin when no file is given).
//! The output can be pasted into `curl -H` to replay a delivery against
//! the receiver.

use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;
use webhook::{SignatureVerifier, SIGNATURE_HEADER};

/// First positional argument, if any
fn payload_path(mut args: impl Iterator<Item = OsString>) -> Option<PathBuf> {
    args.nth(1).map(PathBuf::from)
}

fn read_payload(path: Option<PathBuf>) -> common::Result<Vec<u8>> {
    let payload = match path {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    Ok(payload)
}

fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays a clean header line
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("signer=debug".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = common::Config::from_env()?;
    let payload = read_payload(payload_path(std::env::args_os()))?;
    debug!("Signing {} byte payload", payload.len());

    let verifier = SignatureVerifier::new(config.webhook_secret);
    println!("{}: {}", SIGNATURE_HEADER, verifier.sign(&payload));

    Ok(())
}
