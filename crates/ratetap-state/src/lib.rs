//! Bookmark state persistence for ratetap syncs.
//!
//! This crate provides resumable sync support:
//!
//! - [`SyncState`] - Singer-style state document with per-stream bookmarks
//! - [`StateManager`] - Loads and atomically saves the state file
//! - [`BookmarkTracker`] - Tracks the latest record date seen during a run

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratetap/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod manager;
mod state;
mod tracker;

pub use manager::{Result, STATE_FILE_NAME, StateError, StateManager};
pub use state::{StreamBookmark, SyncState};
pub use tracker::BookmarkTracker;
