pub mod collection;
pub mod continue_watching;
pub mod download;
pub mod media;
pub mod recently_watched;
pub mod settings;
pub mod watchlist;

pub use collection::Collection;
pub use continue_watching::ContinueWatchingEntry;
pub use download::{DownloadEntry, DownloadQuality};
pub use media::MediaRecord;
pub use recently_watched::RecentlyWatchedEntry;
pub use settings::UserSettings;
pub use watchlist::WatchlistEntry;
