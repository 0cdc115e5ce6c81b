use super::fetch_ui::with_spinner;
use super::render;
use crate::context::AppContext;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use streamx_catalog::{
    exclude_id, image_url, select_trailer, sort_records, trailer_watch_url, CatalogPage, CatalogSource,
    Genre, ImageSize, SortBy, TrailerMatch,
};
use tracing::warn;

const SIMILAR_LIMIT: usize = 6;

pub async fn run_trending(ctx: &AppContext, sort: SortBy, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let page = with_spinner("Fetching trending movies...", catalog.trending())
        .await
        .map_err(|e| eyre!("Failed to fetch trending movies: {}", e))?;
    print_page(page, sort, output)
}

pub async fn run_category(ctx: &AppContext, name: &str, sort: SortBy, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let genre = Genre::from_category(name);
    if Genre::lookup(name).is_none() {
        output.warn(format!("Unknown category '{}', showing {}", name, genre));
    }

    let page = with_spinner(format!("Fetching {} movies...", genre), catalog.by_category(name))
        .await
        .map_err(|e| eyre!("Failed to fetch {} movies: {}", genre, e))?;
    print_page(page, sort, output)
}

pub async fn run_search(ctx: &AppContext, query: &str, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let page = with_spinner(format!("Searching for '{}'...", query), catalog.search(query))
        .await
        .map_err(|e| eyre!("Search failed: {}", e))?;

    if page.results.is_empty() && output.is_human() {
        output.info(format!("No movies found for '{}'", query));
        return Ok(());
    }
    // Relevance order from the catalog is kept
    output.render(|| render::media_table(&page.results), &page)
}

pub async fn run_movie(ctx: &AppContext, id: u64, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let details = with_spinner(format!("Fetching movie {}...", id), catalog.details(id))
        .await
        .map_err(|e| eyre!("Failed to fetch movie {}: {}", id, e))?;

    let category = details.similar_category();
    let similar = match with_spinner("Fetching similar titles...", catalog.by_category(category.slug())).await {
        Ok(page) => {
            let mut similar = exclude_id(page.results, id);
            similar.truncate(SIMILAR_LIMIT);
            similar
        }
        Err(e) => {
            warn!("Failed to fetch similar titles for {}: {}", id, e);
            Vec::new()
        }
    };

    let image_base = &ctx.config.catalog.image_base_url;
    let poster_url = image_url(image_base, details.media.poster_path.as_deref(), ImageSize::W500);
    let backdrop_url = image_url(image_base, details.media.backdrop_path.as_deref(), ImageSize::Original);
    let trailer_url = select_trailer(&details.videos.results, TrailerMatch::TrailerTeaserOrOfficial)
        .map(|v| trailer_watch_url(&v.key));
    let in_watchlist = ctx.store.watchlist().contains(id);
    let progress = ctx.store.continue_watching().get(id).map(|e| e.progress);

    if !output.is_human() {
        return output.json(&json!({
            "details": details,
            "poster_url": poster_url,
            "backdrop_url": backdrop_url,
            "trailer_url": trailer_url,
            "in_watchlist": in_watchlist,
            "progress": progress,
            "similar": similar,
        }));
    }

    let genres = details
        .genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let cast = details
        .top_cast(5)
        .iter()
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut rows = vec![
        ("Year", render::year_label(&details.media)),
        ("Rating", render::rating_label(details.media.vote_average)),
        ("Runtime", details.runtime.map(|m| format!("{}h {}m", m / 60, m % 60)).unwrap_or_else(|| "-".to_string())),
        ("Genres", genres),
    ];
    if let Some(tagline) = details.tagline.as_ref().filter(|t| !t.is_empty()) {
        rows.push(("Tagline", tagline.clone()));
    }
    if !cast.is_empty() {
        rows.push(("Cast", cast));
    }
    rows.push(("Overview", details.media.overview.clone()));
    rows.push(("Poster", poster_url.unwrap_or_else(|| "-".to_string())));
    rows.push(("Trailer", trailer_url.unwrap_or_else(|| "-".to_string())));
    rows.push(("Watchlist", if in_watchlist { "yes" } else { "no" }.to_string()));
    if let Some(progress) = progress {
        rows.push(("Progress", render::progress_bar(progress, 10)));
    }

    output.info(render::detail_table(&details.media.title, &rows).to_string());

    if !similar.is_empty() {
        output.info(format!("\nMore like this ({})", category));
        output.info(render::media_table(&similar).to_string());
    }

    Ok(())
}

fn print_page(mut page: CatalogPage, sort: SortBy, output: &Output) -> Result<()> {
    sort_records(&mut page.results, sort);
    output.render(|| render::media_table(&page.results), &page)
}
