//! State command implementations.

use crate::display::state_manager;
use anyhow::{Context, Result};
use ratetap_lib::STREAM_NAME;
use std::path::PathBuf;

/// Print the stored sync state.
pub(crate) fn show_state(path: Option<PathBuf>) -> Result<()> {
    let manager = state_manager(path);
    let state = manager
        .load()
        .with_context(|| format!("Failed to load state from {}", manager.path().display()))?;

    println!("State file: {}", manager.path().display());
    match state.bookmark(STREAM_NAME) {
        Some(date) => println!("Bookmark:   {date} (next sync starts here)"),
        None => println!("Bookmark:   none (next sync starts at the configured start_date)"),
    }

    if !state.is_empty() {
        println!("\n{}", serde_json::to_string_pretty(&state)?);
    }
    Ok(())
}

/// Delete the stored sync state.
pub(crate) fn reset_state(path: Option<PathBuf>) -> Result<()> {
    let manager = state_manager(path);
    let removed = manager
        .reset()
        .with_context(|| format!("Failed to reset state at {}", manager.path().display()))?;

    if removed {
        println!("Removed {}", manager.path().display());
    } else {
        println!("No state at {}", manager.path().display());
    }
    Ok(())
}
