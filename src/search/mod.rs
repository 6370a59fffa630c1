//! Advanced search
//!
//! Builders produce the query for each search kind; responses are parsed
//! into pages of typed rows.

mod params;
mod results;

pub use params::{AlbumSearch, BandSearch, SongSearch};
pub use results::{AlbumResult, BandResult, RowCells, SearchResults, SearchRow, SongResult};
