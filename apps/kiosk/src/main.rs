//! # Price-Check Kiosk
//!
//! Full-screen terminal kiosk: a shopper scans a barcode and the product's
//! name and price appear, then the screen clears itself for the next shopper.
//!
//! ## Usage
//! ```bash
//! # Config from PRICECHECK_CONFIG or the platform config dir
//! cargo run -p pricecheck-kiosk
//!
//! # Explicit config file
//! cargo run -p pricecheck-kiosk -- --config ./kiosk.toml
//! ```
//!
//! The actual setup is in lib.rs for better testability.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Price-Check Kiosk");
                println!();
                println!("Usage: pricecheck-kiosk [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>    Config file (default: platform config dir/kiosk.toml)");
                println!("  -h, --help             Show this help message");
                println!();
                println!("Environment:");
                println!("  PRICECHECK_CONFIG      Config file path");
                println!("  PRICECHECK_LOG_FILE    Log file path");
                println!("  RUST_LOG               Log filter");
                return ExitCode::SUCCESS;
            }
            _ => {}
        }
        i += 1;
    }

    match pricecheck_kiosk::run(config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pricecheck-kiosk: {}", e);
            ExitCode::FAILURE
        }
    }
}
