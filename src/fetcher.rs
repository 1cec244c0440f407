//! Tick-paced execution of the dispatch plan.
//!
//! Trello rate-limits per token, so the gate is global: one request may
//! start per tick no matter how many boards are being exported. The gate
//! never waits for a response; requests stay in flight while later
//! dispatches are released.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};
use tracing::warn;

use crate::client::TrelloClient;
use crate::store::{ActionStore, FrozenActions};
use crate::windows::{Dispatch, Window};

/// A window whose request failed; its history is absent from the export.
#[derive(Debug)]
pub struct WindowGap {
    pub board_id: String,
    pub window: Window,
    pub error: String,
}

/// What the fetch phase produced: the sealed history plus the windows that
/// contributed nothing.
#[derive(Debug)]
pub struct FetchOutcome {
    pub actions: FrozenActions,
    pub gaps: Vec<WindowGap>,
}

/// Run the dispatch plan against the API, at most one request per tick.
///
/// After the last dispatch one settling tick elapses, then every
/// outstanding request is drained into the store in completion order and
/// the store is frozen. A failed window is logged, recorded as a gap and
/// otherwise ignored; it is never retried and never aborts the run.
pub async fn fetch_history(
    client: &TrelloClient,
    plan: Vec<Dispatch>,
    tick: Duration,
    quiet: bool,
) -> FetchOutcome {
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(plan.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:40}] {pos}/{len} windows")
                .unwrap(),
        );
        bar
    };

    let mut interval = time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut in_flight = JoinSet::new();
    for dispatch in plan {
        interval.tick().await;
        progress.inc(1);
        let client = client.clone();
        in_flight.spawn(async move {
            let batch = client
                .board_actions(&dispatch.board_id, &dispatch.window)
                .await;
            (dispatch, batch)
        });
    }

    // One settling tick after the last dispatch before the store is sealed.
    interval.tick().await;

    let mut store = ActionStore::new();
    let mut gaps = Vec::new();
    while let Some(joined) = in_flight.join_next().await {
        match joined {
            Ok((_, Ok(batch))) => store.append(batch),
            Ok((dispatch, Err(error))) => {
                warn!(
                    board = %dispatch.board_id,
                    since = %dispatch.window.since,
                    before = %dispatch.window.before,
                    "window fetch failed: {error:#}"
                );
                gaps.push(WindowGap {
                    board_id: dispatch.board_id,
                    window: dispatch.window,
                    error: format!("{error:#}"),
                });
            }
            Err(join_error) => {
                warn!("window fetch task aborted: {join_error}");
            }
        }
    }
    progress.finish_and_clear();

    FetchOutcome {
        actions: store.freeze(),
        gaps,
    }
}
