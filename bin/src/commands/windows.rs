//! Windows command implementation.
//!
//! Prints the request plan for a start date without contacting the API.

use crate::display::window_row;
use anyhow::{Context, Result};
use ratetap_lib::prelude::*;

/// Print the request windows a sync from `start` would use.
pub(crate) fn show_windows(start: &str) -> Result<()> {
    let paginator =
        WindowPaginator::parse(start).with_context(|| format!("Invalid start date: {start}"))?;
    let windows: Vec<DateWindow> = paginator.collect();

    println!("{:>4}  {:<10}  {:<10}  {:>4}", "#", "START", "END", "DAYS");
    println!("{}", "-".repeat(36));

    for (i, window) in windows.iter().enumerate() {
        println!("{}", window_row(i + 1, window));
    }

    let days: usize = windows.iter().map(DateWindow::total_days).sum();
    println!("\nTotal: {} requests covering {} days", windows.len(), days);
    Ok(())
}
