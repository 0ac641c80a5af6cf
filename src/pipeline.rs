//! End-to-end run: read, parse, accrue, write.

use crate::clock::{Clock, SystemClock};
use crate::config::{resolve_output_path, RuntimeConfig};
use crate::engine::AccrualEngine;
use crate::error::{AccrualError, Result};
use crate::format::format_for_path;
use crate::ledger;
use log::{info, warn};
use std::path::PathBuf;

/// Runs the whole projection against the wall clock.
///
/// Returns the path the results were written to, which differs from the
/// configured one when an existing file is protected from overwriting.
pub fn run(config: &RuntimeConfig) -> Result<PathBuf> {
    run_with_clock(config, &SystemClock)
}

/// Runs the whole projection with an explicit source of "now".
///
/// Nothing is written unless every input row parses.
pub fn run_with_clock<C: Clock>(config: &RuntimeConfig, clock: &C) -> Result<PathBuf> {
    let input_path = config
        .input_file
        .as_deref()
        .ok_or(AccrualError::MissingPath("input"))?;
    let output_path = config
        .output_file
        .as_deref()
        .ok_or(AccrualError::MissingPath("output"))?;

    // Resolve both adapters up front so a bad extension fails before any I/O
    let reader = format_for_path(input_path)?;
    let writer = format_for_path(output_path)?;

    let rows = reader.read_rows(input_path)?;
    info!("Read {} rows from {}", rows.len(), input_path.display());

    let entries = ledger::parse(&rows)?;

    let points = AccrualEngine::new(config.annual_rate())
        .with_period(config.period)
        .with_clock(clock)
        .accrue(&entries);
    info!(
        "Projected {} entries into {} accrual points",
        entries.len(),
        points.len()
    );

    let target = resolve_output_path(output_path, config.overwrite_existing_file, clock.now());
    if target != output_path {
        warn!(
            "{} already exists, writing to {} instead",
            output_path.display(),
            target.display()
        );
    }

    writer.write_rows(&target, &points)?;
    info!("Wrote {} rows to {}", points.len(), target.display());

    Ok(target)
}
