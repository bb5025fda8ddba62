//! Sync command implementation.
//!
//! This module pulls exchange rates window by window, writes them in the
//! requested format, and advances the bookmark after every window.

use crate::display::{Format, state_manager};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::TryStreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use ratetap_lib::prelude::*;
use ratetap_lib::parse_date;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::pin::pin;

/// Options of the `sync` command.
#[derive(Debug)]
pub(crate) struct SyncArgs {
    pub(crate) config: PathBuf,
    pub(crate) state: Option<PathBuf>,
    pub(crate) no_state: bool,
    pub(crate) start_date: Option<String>,
    pub(crate) source_currency: Option<String>,
    pub(crate) format: Format,
    pub(crate) output: Option<PathBuf>,
}

/// What a finished sync did.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct SyncSummary {
    pub(crate) windows: u64,
    pub(crate) records: u64,
    pub(crate) bookmark: Option<NaiveDate>,
}

/// Run a sync.
pub(crate) async fn sync(args: SyncArgs, quiet: bool) -> Result<()> {
    let config = load_config(&args)?;

    let manager = (!args.no_state).then(|| state_manager(args.state.clone()));
    let state = match &manager {
        Some(manager) => manager
            .load()
            .with_context(|| format!("Failed to load state from {}", manager.path().display()))?,
        None => SyncState::default(),
    };

    let start = sync_start(&config, &args, &state)?;
    let paginator = WindowPaginator::new(start);
    tracing::info!(
        %start,
        source = %config.source_currency,
        windows = paginator.remaining_windows(),
        "starting sync"
    );

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(paginator.remaining_windows() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} windows ({percent}%) {msg}")?
                .progress_chars("=>-"),
        );
        pb.set_message(format!("{} from {start}", config.source_currency));
        pb
    };

    let client = HttpClient::from_tap_config(&config).context("Failed to create HTTP client")?;
    let stream = RateStream::new(client, paginator, config.source_currency.clone());

    let writer: Box<dyn Write + Send> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };

    let target = SyncTarget {
        state_manager: manager.as_ref(),
        state,
        progress: &progress,
    };
    let summary = match args.format {
        Format::Singer => run_sync(stream, &SingerFormatter::new(), target, writer).await?,
        Format::Ndjson => run_sync(stream, &JsonFormatter::ndjson(), target, writer).await?,
        Format::Json => run_sync(stream, &JsonFormatter::new(), target, writer).await?,
        Format::Csv => run_sync(stream, &CsvFormatter::new(), target, writer).await?,
    };

    progress.finish_with_message(format!(
        "Synced {} records in {} windows",
        summary.records, summary.windows
    ));
    tracing::info!(
        records = summary.records,
        windows = summary.windows,
        bookmark = ?summary.bookmark,
        "sync complete"
    );

    if !quiet && let Some(path) = &args.output {
        eprintln!("Output written to: {}", path.display());
    }

    Ok(())
}

/// Reads the config file and applies environment and flag overrides.
fn load_config(args: &SyncArgs) -> Result<TapConfig> {
    let mut config = TapConfig::read(&args.config)
        .with_context(|| format!("Failed to read config {}", args.config.display()))?;
    config.apply_env();

    if let Some(s) = &args.start_date {
        config.start_date = Some(parse_date(s).with_context(|| format!("Invalid start date: {s}"))?);
    }
    if let Some(currency) = &args.source_currency {
        config.source_currency.clone_from(currency);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Picks the first day to request. A stored bookmark wins over `--start-date`.
fn sync_start(config: &TapConfig, args: &SyncArgs, state: &SyncState) -> Result<NaiveDate> {
    let bookmark = state.bookmark(STREAM_NAME);
    if let (Some(flag), Some(bookmark)) = (&args.start_date, bookmark) {
        tracing::warn!(
            start_date = %flag,
            %bookmark,
            "stored bookmark overrides --start-date; use --no-state or `state reset` to start over"
        );
    }
    Ok(config.starting_date(bookmark)?)
}

/// Where a sync's side effects go besides the record output.
#[derive(Debug)]
pub(crate) struct SyncTarget<'a> {
    pub(crate) state_manager: Option<&'a StateManager>,
    pub(crate) state: SyncState,
    pub(crate) progress: &'a ProgressBar,
}

/// Drains `stream` into `writer`.
///
/// For streaming formats every window's records are written and flushed
/// before the bookmark covering them is emitted and saved, so an
/// interrupted run resumes without losing records. Formats that must be
/// written in one piece only save the bookmark once everything is out.
pub(crate) async fn run_sync<F, C, Fm, W>(
    stream: RateStream<F, C>,
    formatter: &Fm,
    target: SyncTarget<'_>,
    mut writer: W,
) -> Result<SyncSummary>
where
    F: Fetcher,
    C: Clock,
    Fm: Formatter,
    W: Write + Send,
{
    let SyncTarget {
        state_manager,
        mut state,
        progress,
    } = target;
    let mut tracker = BookmarkTracker::new(STREAM_NAME, &state);
    let mut summary = SyncSummary::default();
    let mut held = Vec::new();

    formatter.write_header(&mut writer)?;

    let mut batches = pin!(stream.batches());
    while let Some(batch) = batches.try_next().await? {
        summary.windows += 1;
        summary.records += batch.len() as u64;
        tracker.observe_all(&batch.records);
        tracing::debug!(window = %batch.window, records = batch.len(), "window written");

        if formatter.is_streaming() {
            formatter.write_records(&batch.records, &mut writer)?;
            tracker.apply(&mut state);
            formatter.write_state(&state.to_value()?, &mut writer)?;
            writer.flush()?;
            if let Some(manager) = state_manager {
                manager.save(&state)?;
            }
        } else {
            held.extend(batch.records);
        }
        progress.inc(1);
    }

    if !formatter.is_streaming() {
        formatter.write_records(&held, &mut writer)?;
        writer.flush()?;
        tracker.apply(&mut state);
        if let Some(manager) = state_manager {
            manager.save(&state)?;
        }
    }

    summary.bookmark = tracker.bookmark();
    Ok(summary)
}
