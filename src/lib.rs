//! # trello-history-export
//!
//! A CLI tool that exports the recent history of one or more Trello boards
//! to local Markdown files.
//!
//! ## What it does
//!
//! For every configured board the tool collects the audit trail of
//! card-affecting actions over a requested look-back period, walking the
//! `/boards/{id}/actions` endpoint in short time windows and pacing
//! requests on a fixed tick so Trello's rate limit is respected. Once the
//! history is collected it fetches a full snapshot of each board and writes
//! one table-of-contents Markdown file per board plus one Markdown file per
//! card: the card's current state followed by a human-readable log of
//! everything that happened to it.
//!
//! The API is only ever read; nothing on the boards is modified.
//!
//! ## Usage
//!
//! ```sh
//! # Export the last 30 days of history into the current directory
//! trello-history-export 30
//! ```
//!
//! Credentials and the board list live in
//! `~/.config/trello-history-export/config.toml`:
//!
//! ```toml
//! api_key = "..."
//! api_token = "..."
//! boards = ["4eea4ffc91e31d1746000046"]
//! ```

pub mod actions;
pub mod client;
pub mod export;
pub mod exporter;
pub mod fetcher;
pub mod models;
pub mod store;
pub mod utils;
pub mod windows;
