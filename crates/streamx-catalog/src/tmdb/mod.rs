pub mod api;
pub mod client;

pub use api::{CastMember, CatalogPage, Credits, GenreInfo, MovieDetails};
pub use client::TmdbClient;
