//! Qubit rotation optimizer
//!
//! Usage:
//! ```bash
//! cargo run --release --bin qrot
//! cargo run --release --bin qrot -- demo.json   # optional DemoConfig
//! RUST_LOG=debug cargo run --bin qrot            # per-step diagnostics on stderr
//! ```

use anyhow::{Context, Result};
use qrot_demo::DemoConfig;
use std::io::{self, Write};

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => DemoConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => DemoConfig::default(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = qrot_demo::run(&config, &mut out)?;
    out.flush()?;

    log::info!(
        "cost {:.7} -> {:.7} in {} steps",
        report.initial_cost,
        report.result.final_cost,
        report.result.steps
    );

    Ok(())
}
