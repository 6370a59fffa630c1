//! Bands, albums, tracks and lyrics
//!
//! Full entities are parsed from their own pages. Stubs come from listing
//! rows (discographies, search results, album credits) and are wrapped in
//! [`LazyEntity`] so their remaining fields are fetched on first use.

mod album;
mod album_type;
mod band;
mod lyrics;
mod similar;
mod track;

pub use album::{Album, AlbumStub};
pub use album_type::AlbumType;
pub use band::{Band, BandStub};
pub use lyrics::Lyrics;
pub use similar::SimilarArtist;
pub use track::Track;

use crate::entity::LazyEntity;

/// Album that fetches its page when a full-only field is read
pub type LazyAlbum = LazyEntity<AlbumStub>;

/// Band that fetches its page when a full-only field is read
pub type LazyBand = LazyEntity<BandStub>;

pub fn band_path(id: &str) -> String {
    format!("bands/_/{}", id)
}

pub fn album_path(id: &str) -> String {
    format!("albums/_/_/{}", id)
}

pub fn discography_path(band_id: &str) -> String {
    format!("band/discography/id/{}/tab/all", band_id)
}

pub fn similar_artists_path(band_id: &str) -> String {
    format!("band/ajax-recommendations/id/{}/showMoreSimilar/1", band_id)
}

pub fn lyrics_path(lyrics_id: &str) -> String {
    format!("release/ajax-view-lyrics/id/{}", lyrics_id)
}
