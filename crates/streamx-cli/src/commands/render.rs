use chrono::{DateTime, Utc};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use streamx_models::{
    ContinueWatchingEntry, DownloadEntry, MediaRecord, RecentlyWatchedEntry, WatchlistEntry,
};

const TITLE_WIDTH: usize = 48;

pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold)),
    );
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

pub fn media_table(records: &[MediaRecord]) -> Table {
    let mut table = new_table(&["ID", "Title", "Year", "Rating", "Popularity"]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(truncate(&record.title, TITLE_WIDTH)),
            Cell::new(year_label(record)),
            Cell::new(rating_label(record.vote_average)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", record.popularity)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn watchlist_table(entries: &[WatchlistEntry]) -> Table {
    let mut table = new_table(&["ID", "Title", "Year", "Rating"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.media.id),
            Cell::new(truncate(&entry.media.title, TITLE_WIDTH)),
            Cell::new(year_label(&entry.media)),
            Cell::new(rating_label(entry.media.vote_average)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn continue_table(entries: &[ContinueWatchingEntry]) -> Table {
    let mut table = new_table(&["ID", "Title", "Progress", "Last watched"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.media.id),
            Cell::new(truncate(&entry.media.title, TITLE_WIDTH)),
            Cell::new(progress_bar(entry.progress, 10)),
            Cell::new(timestamp_label(&entry.last_watched)),
        ]);
    }
    table
}

pub fn downloads_table(entries: &[DownloadEntry]) -> Table {
    let mut table = new_table(&["ID", "Title", "Quality", "Size", "Downloaded"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.media.id),
            Cell::new(truncate(&entry.media.title, TITLE_WIDTH)),
            Cell::new(entry.quality),
            Cell::new(&entry.size),
            Cell::new(timestamp_label(&entry.downloaded_at)),
        ]);
    }
    table
}

pub fn history_table(entries: &[RecentlyWatchedEntry]) -> Table {
    let mut table = new_table(&["ID", "Title", "Year", "Watched"]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.media.id),
            Cell::new(truncate(&entry.media.title, TITLE_WIDTH)),
            Cell::new(year_label(&entry.media)),
            Cell::new(timestamp_label(&entry.watched_at)),
        ]);
    }
    table
}

/// Key/value table with a bold title row
pub fn detail_table(title: &str, rows: &[(&str, String)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

pub fn year_label(record: &MediaRecord) -> String {
    record
        .release_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn rating_label(vote_average: f64) -> String {
    if vote_average > 0.0 {
        format!("★ {:.1}", vote_average)
    } else {
        "-".to_string()
    }
}

pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!(
        "{}{} {:>3.0}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        progress
    )
}

fn timestamp_label(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}
