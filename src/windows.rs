//! Window planning for the history fetch.
//!
//! The actions endpoint is paged by time, not by cursor, so the look-back
//! period is split into short `(since, before)` windows and one request is
//! issued per window per board. The plan is computed up front as a plain
//! value; the fetcher only consumes it.

use chrono::{DateTime, Duration, Utc};

/// Width of a single fetch window, in days.
const DELTA_DAYS: i64 = 2;

/// Upper bound on how many days one scheduling pass may walk back before
/// the next board gets a turn.
const MAX_DAYS_PER_INTERVAL: i64 = 20;

/// A half-open `[since, before)` interval bounding one actions request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub since: DateTime<Utc>,
    pub before: DateTime<Utc>,
}

/// One planned request: a board paired with the window to fetch for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub board_id: String,
    pub window: Window,
}

/// Walk backward from `now` in windows of at most [`DELTA_DAYS`] days until
/// `now - num_days` is reached. The final window is clamped so the union of
/// all windows covers exactly `[now - num_days, now]`, contiguous and
/// non-overlapping except at shared endpoints.
///
/// Ranges of [`DELTA_DAYS`] or fewer days use one-day windows instead; a
/// two-day step over a one-day range would produce a single degenerate
/// window.
pub fn plan_windows(now: DateTime<Utc>, num_days: u32) -> Vec<Window> {
    let delta = if i64::from(num_days) <= DELTA_DAYS {
        1
    } else {
        DELTA_DAYS
    };
    let cutoff = now - Duration::days(num_days.into());

    let mut windows = Vec::new();
    let mut before = now;
    while before > cutoff {
        let since = std::cmp::max(before - Duration::days(delta), cutoff);
        windows.push(Window { since, before });
        before = since;
    }
    windows
}

/// Expand a window sequence into the ordered dispatch list the fetcher
/// consumes.
///
/// Windows are grouped into passes of at most `min(num_days, 20)` days;
/// within a pass every board is visited before the walk advances further
/// back in time. The pass cap bounds how far the schedule runs ahead of the
/// rate gate, not the total coverage, so the last pass simply holds
/// whatever days remain.
pub fn plan_dispatches(windows: &[Window], boards: &[String], num_days: u32) -> Vec<Dispatch> {
    let days_per_pass = MAX_DAYS_PER_INTERVAL.min(i64::from(num_days));

    let mut dispatches = Vec::with_capacity(windows.len() * boards.len());
    let mut pass: Vec<Window> = Vec::new();
    let mut pass_days = 0;
    for window in windows {
        let days = (window.before - window.since).num_days().max(1);
        if pass_days + days > days_per_pass && !pass.is_empty() {
            push_pass(&mut dispatches, boards, &pass);
            pass.clear();
            pass_days = 0;
        }
        pass.push(*window);
        pass_days += days;
    }
    if !pass.is_empty() {
        push_pass(&mut dispatches, boards, &pass);
    }
    dispatches
}

fn push_pass(out: &mut Vec<Dispatch>, boards: &[String], pass: &[Window]) {
    for board_id in boards {
        for window in pass {
            out.push(Dispatch {
                board_id: board_id.clone(),
                window: *window,
            });
        }
    }
}
