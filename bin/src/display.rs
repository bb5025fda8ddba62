//! Display utilities and output formatting for the ratetap CLI.

use clap::ValueEnum;
use ratetap_lib::prelude::*;
use std::path::PathBuf;

/// Output format for synced records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Singer,
    Ndjson,
    Json,
    Csv,
}

impl Format {
    /// Returns the matching library output format.
    pub(crate) const fn output_format(self) -> OutputFormat {
        match self {
            Self::Singer => OutputFormat::Singer,
            Self::Ndjson => OutputFormat::Ndjson,
            Self::Json => OutputFormat::Json,
            Self::Csv => OutputFormat::Csv,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.output_format())
    }
}

/// Resolves the state file location from an optional `--state` flag.
pub(crate) fn state_manager(path: Option<PathBuf>) -> StateManager {
    path.map_or_else(StateManager::with_default_path, StateManager::new)
}

/// Formats a window as a table row.
pub(crate) fn window_row(index: usize, window: &DateWindow) -> String {
    format!(
        "{:>4}  {:<10}  {:<10}  {:>4}",
        index,
        window.start.to_string(),
        window.end.to_string(),
        window.total_days()
    )
}
