use super::fetch_ui::with_spinner;
use super::render;
use crate::context::AppContext;
use crate::output::Output;
use crate::{ContinueCommands, DownloadsCommands, HistoryCommands, WatchlistCommands};
use chrono::Utc;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use streamx_catalog::CatalogSource;
use streamx_models::{DownloadEntry, MediaRecord, RecentlyWatchedEntry, WatchlistEntry};

/// Canonical record for `id`, fetched from the catalog
async fn fetch_record(ctx: &AppContext, id: u64) -> Result<MediaRecord> {
    let catalog = ctx.catalog()?;
    with_spinner(format!("Fetching movie {}...", id), catalog.record(id))
        .await
        .map_err(|e| eyre!("Failed to fetch movie {}: {}", id, e))
}

pub async fn run_watchlist(ctx: &AppContext, cmd: WatchlistCommands, output: &Output) -> Result<()> {
    let watchlist = ctx.store.watchlist();

    match cmd {
        WatchlistCommands::List => {
            let entries = watchlist.load();
            if entries.is_empty() && output.is_human() {
                output.info("Your watchlist is empty");
                return Ok(());
            }
            output.render(|| render::watchlist_table(&entries), &entries)
        }
        WatchlistCommands::Add { id } => {
            if watchlist.contains(id) {
                output.info(format!("Movie {} is already in your watchlist", id));
                return Ok(());
            }
            let record = fetch_record(ctx, id).await?;
            let title = record.title.clone();
            watchlist
                .add(WatchlistEntry::from(record))
                .map_err(|e| eyre!("Failed to update watchlist: {}", e))?;
            output.success(format!("Added '{}' to your watchlist", title));
            Ok(())
        }
        WatchlistCommands::Remove { id } => {
            let present = watchlist.contains(id);
            watchlist
                .remove(id)
                .map_err(|e| eyre!("Failed to update watchlist: {}", e))?;
            remove_report(present, id, "watchlist", output);
            Ok(())
        }
        WatchlistCommands::Toggle { id } => {
            if watchlist.contains(id) {
                watchlist
                    .remove(id)
                    .map_err(|e| eyre!("Failed to update watchlist: {}", e))?;
                output.success(format!("Removed movie {} from your watchlist", id));
            } else {
                let record = fetch_record(ctx, id).await?;
                let title = record.title.clone();
                watchlist
                    .add(WatchlistEntry::from(record))
                    .map_err(|e| eyre!("Failed to update watchlist: {}", e))?;
                output.success(format!("Added '{}' to your watchlist", title));
            }
            Ok(())
        }
    }
}

pub async fn run_downloads(ctx: &AppContext, cmd: DownloadsCommands, output: &Output) -> Result<()> {
    let downloads = ctx.store.downloads();

    match cmd {
        DownloadsCommands::List => {
            let entries = downloads.load();
            if entries.is_empty() && output.is_human() {
                output.info("No downloads yet");
                return Ok(());
            }
            output.render(|| render::downloads_table(&entries), &entries)
        }
        DownloadsCommands::Add { id, quality, size } => {
            if downloads.contains(id) {
                output.info(format!("Movie {} is already downloaded", id));
                return Ok(());
            }
            let record = fetch_record(ctx, id).await?;
            let title = record.title.clone();
            let mut entry = DownloadEntry::new(record, Utc::now(), quality);
            if let Some(size) = size {
                entry.size = size;
            }
            downloads
                .add(entry)
                .map_err(|e| eyre!("Failed to update downloads: {}", e))?;
            output.success(format!("Downloaded '{}' ({})", title, quality));
            Ok(())
        }
        DownloadsCommands::Remove { id } => {
            let present = downloads.contains(id);
            downloads
                .remove(id)
                .map_err(|e| eyre!("Failed to update downloads: {}", e))?;
            remove_report(present, id, "downloads", output);
            Ok(())
        }
    }
}

pub async fn run_continue(ctx: &AppContext, cmd: ContinueCommands, output: &Output) -> Result<()> {
    let continue_watching = ctx.store.continue_watching();

    match cmd {
        ContinueCommands::List => {
            let entries = continue_watching.load();
            if entries.is_empty() && output.is_human() {
                output.info("Nothing to continue watching");
                return Ok(());
            }
            output.render(|| render::continue_table(&entries), &entries)
        }
        ContinueCommands::Progress { id, percent } => {
            // A stored entry already carries its record, no fetch needed
            let record = match continue_watching.get(id) {
                Some(entry) => entry.media,
                None => fetch_record(ctx, id).await?,
            };
            let title = record.title.clone();
            let entries = continue_watching
                .update_progress(record, percent, Utc::now())
                .map_err(|e| eyre!("Failed to save progress: {}", e))?;
            let progress = entries
                .iter()
                .find(|e| e.media.id == id)
                .map(|e| e.progress)
                .unwrap_or_default();
            output.success(format!("Saved progress for '{}': {:.0}%", title, progress));
            Ok(())
        }
        ContinueCommands::Remove { id } => {
            let present = continue_watching.contains(id);
            continue_watching
                .remove(id)
                .map_err(|e| eyre!("Failed to update continue watching: {}", e))?;
            remove_report(present, id, "continue watching", output);
            Ok(())
        }
    }
}

pub async fn run_history(ctx: &AppContext, cmd: HistoryCommands, output: &Output) -> Result<()> {
    let history = ctx.store.recently_watched();

    match cmd {
        HistoryCommands::List => {
            let entries = history.load();
            if entries.is_empty() && output.is_human() {
                output.info("No recently watched movies");
                return Ok(());
            }
            output.render(|| render::history_table(&entries), &entries)
        }
        HistoryCommands::Add { id } => {
            let record = match history.get(id) {
                Some(entry) => entry.media,
                None => fetch_record(ctx, id).await?,
            };
            let title = record.title.clone();
            history
                .add(RecentlyWatchedEntry::new(record, Utc::now()))
                .map_err(|e| eyre!("Failed to update history: {}", e))?;
            output.success(format!("Marked '{}' as watched", title));
            Ok(())
        }
        HistoryCommands::Remove { id } => {
            let present = history.contains(id);
            history
                .remove(id)
                .map_err(|e| eyre!("Failed to update history: {}", e))?;
            remove_report(present, id, "history", output);
            Ok(())
        }
    }
}

fn remove_report(present: bool, id: u64, label: &str, output: &Output) {
    if present {
        output.success(format!("Removed movie {} from {}", id, label));
    } else {
        output.info(format!("Movie {} is not in {}", id, label));
    }
}
