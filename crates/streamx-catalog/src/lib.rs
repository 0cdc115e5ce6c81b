pub mod error;
pub mod factory;
pub mod genre;
pub mod images;
pub mod sort;
pub mod tmdb;
pub mod traits;
pub mod video;

pub use error::CatalogError;
pub use factory::create_catalog;
pub use genre::Genre;
pub use images::{image_url, ImageSize};
pub use sort::{exclude_id, sort_records, SortBy};
pub use tmdb::{CatalogPage, Credits, GenreInfo, MovieDetails, TmdbClient};
pub use traits::CatalogSource;
pub use video::{select_trailer, trailer_embed_url, trailer_watch_url, TrailerMatch, Video, VideoList};
