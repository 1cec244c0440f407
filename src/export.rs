//! The run pipeline: plan, fetch, snapshot, render.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};

use chrono::{DateTime, Duration, Utc};
use eyre::{Context, Result};
use tracing::{error, info, warn};

use crate::client::TrelloClient;
use crate::exporter;
use crate::fetcher::{self, FetchOutcome};
use crate::models::Board;
use crate::store::FrozenActions;
use crate::utils::ExportConfig;
use crate::windows;

/// Export every configured board: collect the action history over the
/// requested look-back period, then write one table-of-contents file per
/// board and one file per card.
///
/// Fetch and render failures are logged and skipped; only the summary tells
/// the operator how much of the export actually landed.
pub async fn execute(config: ExportConfig) -> Result<()> {
    let client = match &config.api_base {
        Some(base) => TrelloClient::with_base_url(base, &config.api_key, &config.api_token),
        None => TrelloClient::new(&config.api_key, &config.api_token),
    };

    let now = Utc::now();
    let cutoff = now - Duration::days(config.num_days.into());

    info!("Grabbing actions. This may take a while...");
    let plan = windows::plan_dispatches(
        &windows::plan_windows(now, config.num_days),
        &config.boards,
        config.num_days,
    );
    let FetchOutcome { actions, gaps } =
        fetcher::fetch_history(&client, plan, config.tick, config.quiet).await;
    info!("Finished grabbing actions. Found {} actions.", actions.len());

    for gap in &gaps {
        warn!(
            "Missing history for board {} between {} and {}: {}",
            gap.board_id, gap.window.since, gap.window.before, gap.error
        );
    }

    let mut boards = Vec::new();
    for board_id in &config.boards {
        match client.board_snapshot(board_id).await {
            Ok(board) => boards.push(board),
            Err(err) => error!("Failed to fetch board {board_id}: {err:#}"),
        }
    }
    warn_on_duplicate_names(&boards);

    let mut cards_written = 0usize;
    let mut boards_failed = 0usize;
    for board in &boards {
        match render_board(board, &actions, cutoff, &config) {
            Ok(count) => {
                cards_written += count;
                info!("Finished generating Markdowns for {}.", board.name);
            }
            Err(err) => {
                boards_failed += 1;
                error!("Failed to render board {}: {err:#}", board.name);
            }
        }
    }

    if !config.quiet {
        eprintln!(
            "Done. {} boards, {} cards, {} actions. Window gaps: {}. Board failures: {}.",
            boards.len() - boards_failed,
            cards_written,
            actions.len(),
            gaps.len(),
            boards_failed + (config.boards.len() - boards.len()),
        );
    }

    Ok(())
}

// Boards sharing a name share an output directory; the reference behavior
// is last writer wins, so this only flags it.
fn warn_on_duplicate_names(boards: &[Board]) {
    let mut seen = HashSet::new();
    for board in boards {
        if !seen.insert(board.name.as_str()) {
            warn!(
                "Multiple boards are named {:?}; their exports will overwrite each other",
                board.name
            );
        }
    }
}

fn render_board(
    board: &Board,
    actions: &FrozenActions,
    cutoff: DateTime<Utc>,
    config: &ExportConfig,
) -> Result<usize> {
    info!("Generating Markdowns for {}...", board.name);

    let board_dir = config.target_dir.join(&board.name);
    let cards_dir = board_dir.join(format!("{}-cards", board.name));
    fs::create_dir_all(&cards_dir)
        .wrap_err_with(|| format!("Failed to create card directory: {}", cards_dir.display()))?;

    let cards = exporter::surviving_cards(board, cutoff);

    for card in &cards {
        let path = cards_dir.join(format!("{}-{}.md", board.name, card.id_short));
        let file = File::create(&path)
            .wrap_err_with(|| format!("Failed to create: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        exporter::write_card_markdown(&mut writer, board, card, actions)?;
        writer
            .flush()
            .wrap_err_with(|| format!("Failed to write: {}", path.display()))?;
    }

    let toc_path = board_dir.join(format!("{}.md", board.name));
    let file = File::create(&toc_path)
        .wrap_err_with(|| format!("Failed to create: {}", toc_path.display()))?;
    let mut writer = BufWriter::new(file);
    exporter::write_table_of_contents(&mut writer, board, &cards)?;
    writer
        .flush()
        .wrap_err_with(|| format!("Failed to write: {}", toc_path.display()))?;

    Ok(cards.len())
}
