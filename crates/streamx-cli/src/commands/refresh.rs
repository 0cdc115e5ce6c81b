use super::fetch_ui::FetchSpinner;
use crate::context::AppContext;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use futures::future::join_all;
use serde_json::json;
use streamx_catalog::CatalogSource;
use tracing::{info, warn};

const FETCH_CHUNK: usize = 8;

pub async fn run_refresh(ctx: &AppContext, output: &Output) -> Result<()> {
    let ids = ctx.store.tracked_ids();
    if ids.is_empty() {
        output.info("Nothing stored yet, nothing to refresh");
        return Ok(());
    }

    let catalog = ctx.catalog()?;
    let spinner = FetchSpinner::start(format!("Refreshing {} movies...", ids.len()));

    let mut records = Vec::with_capacity(ids.len());
    let mut failed = Vec::new();

    for (chunk_idx, chunk) in ids.chunks(FETCH_CHUNK).enumerate() {
        spinner.set_message(format!(
            "Refreshing movies {}-{} of {}...",
            chunk_idx * FETCH_CHUNK + 1,
            chunk_idx * FETCH_CHUNK + chunk.len(),
            ids.len()
        ));

        let results = join_all(chunk.iter().map(|&id| {
            let catalog = &catalog;
            async move { (id, catalog.record(id).await) }
        }))
        .await;

        for (id, result) in results {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping movie {}: {}", id, e);
                    failed.push((id, e.to_string()));
                }
            }
        }
    }
    spinner.finish();

    let summary = ctx
        .store
        .refresh_media(&records)
        .map_err(|e| eyre!("Failed to save refreshed metadata: {}", e))?;
    info!(
        fetched = records.len(),
        failed = failed.len(),
        updated = summary.total(),
        "Refresh finished"
    );

    if !output.is_human() {
        return output.json(&json!({
            "fetched": records.len(),
            "failed": failed.iter().map(|(id, _)| id).collect::<Vec<_>>(),
            "updated": summary.updated,
        }));
    }

    for (collection, count) in &summary.updated {
        output.info(format!("  {}: {} updated", collection.label(), count));
    }
    for (id, reason) in &failed {
        output.error(format!("Could not fetch movie {}: {}", id, reason));
    }
    output.success(format!(
        "Refreshed {} of {} movies ({} entries changed)",
        records.len(),
        ids.len(),
        summary.total()
    ));
    Ok(())
}
