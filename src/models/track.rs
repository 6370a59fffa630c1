use crate::entity::{unknown_field, FieldSource, FieldValue, LazyEntity};
use crate::fetch::PageFetcher;
use crate::markup::{attribute, leading_digits, parse_duration, select_within, text, Document};
use crate::models::{lyrics_path, BandStub, LazyBand, Lyrics};
use crate::{MetallumError, Result};
use scraper::ElementRef;
use std::future::Future;

const TRACK_ROWS: &str = "table.table_lyrics tr.odd, table.table_lyrics tr.even";

/// A track on an album's listing
///
/// Tracks have no page of their own; everything except lyrics comes from
/// the album page.
#[derive(Debug, Clone)]
pub struct Track {
    /// Anchor name of the row, e.g. `5018A`
    pub id: String,
    /// Position on its disc
    pub number: u32,
    /// Position across all discs, starting at 1
    pub overall_number: u32,
    pub disc_number: u32,
    /// Title as listed; on splits this carries a `Band - ` prefix
    pub full_title: String,
    /// Seconds, 0 when not listed
    pub duration: u32,
    pub album_id: String,
    split: bool,
    bands: Vec<BandStub>,
    fetcher: PageFetcher,
}

impl Track {
    /// Parses the visible rows of an album's track table
    ///
    /// A track numbered 1 after the first row starts a new disc.
    pub(crate) fn parse_listing(
        doc: &Document,
        album_id: &str,
        split: bool,
        bands: &[BandStub],
        fetcher: &PageFetcher,
    ) -> Result<Vec<Track>> {
        let rows = doc
            .select(TRACK_ROWS)?
            .into_iter()
            .filter(|row| !row.value().classes().any(|class| class == "displayNone"));

        let mut tracks = Vec::new();
        let mut disc = 1;

        for (index, row) in rows.enumerate() {
            let cells = select_within(row, "td")?;
            let (id, number) = parse_position(&cells)?;

            if index > 0 && number == 1 {
                disc += 1;
            }

            let duration = match cells.get(2).map(|cell| text(*cell)) {
                Some(listed) if !listed.is_empty() => parse_duration(&listed)?,
                _ => 0,
            };

            tracks.push(Track {
                id,
                number,
                overall_number: index as u32 + 1,
                disc_number: disc,
                full_title: cells.get(1).map(|cell| text(*cell)).unwrap_or_default(),
                duration,
                album_id: album_id.to_string(),
                split,
                bands: bands.to_vec(),
                fetcher: fetcher.clone(),
            });
        }

        Ok(tracks)
    }

    /// Title without the band prefix split albums add
    pub fn title(&self) -> Result<String> {
        if !self.split {
            return Ok(self.full_title.clone());
        }

        let band = self.split_band()?;
        let rest = &self.full_title[band.name.len()..];
        Ok(rest.trim_start().trim_start_matches('-').trim_start().to_string())
    }

    /// The band that recorded this track
    ///
    /// On split albums this is the first credited band whose name starts the
    /// listed title.
    pub fn band(&self) -> Result<LazyBand> {
        let stub = if self.split {
            self.split_band()?
        } else {
            self.bands.first().ok_or_else(|| self.band_not_found())?
        };
        Ok(LazyEntity::new(stub.clone(), self.fetcher.clone()))
    }

    /// Fetches this track's lyrics
    pub async fn lyrics(&self) -> Result<Lyrics> {
        let lyrics_id = leading_digits(&self.id)
            .ok_or_else(|| {
                MetallumError::parse("track", format!("no lyrics id in '{}'", self.id))
            })?
            .to_string();

        let page = self.fetcher.fetch(&lyrics_path(&lyrics_id)).await?;
        Ok(Lyrics::parse(lyrics_id, &page.body))
    }

    fn split_band(&self) -> Result<&BandStub> {
        self.bands
            .iter()
            .find(|band| !band.name.is_empty() && self.full_title.starts_with(&band.name))
            .ok_or_else(|| self.band_not_found())
    }

    fn band_not_found(&self) -> MetallumError {
        MetallumError::BandNotFound {
            title: self.full_title.clone(),
        }
    }

    fn value(&self, name: &str) -> Result<FieldValue> {
        let value = match name {
            "id" => self.id.clone().into(),
            "number" => self.number.into(),
            "overall_number" => self.overall_number.into(),
            "disc_number" => self.disc_number.into(),
            "full_title" => self.full_title.clone().into(),
            "title" => self.title()?.into(),
            "duration" => self.duration.into(),
            _ => return Err(unknown_field("Track", name)),
        };
        Ok(value)
    }
}

impl FieldSource for Track {
    fn field(&self, name: &str) -> impl Future<Output = Result<FieldValue>> + Send {
        std::future::ready(self.value(name))
    }
}

/// Anchor name and listed number from a row's first cell (`1.`)
fn parse_position(cells: &[ElementRef<'_>]) -> Result<(String, u32)> {
    let cell = cells
        .first()
        .ok_or_else(|| MetallumError::parse("track row", "row has no cells"))?;

    let id = select_within(*cell, "a")?
        .into_iter()
        .find_map(|anchor| attribute(anchor, "name"))
        .unwrap_or_default();

    let listed = text(*cell);
    let number = listed
        .trim_end_matches('.')
        .trim()
        .parse::<u32>()
        .map_err(|_| {
            MetallumError::parse("track row", format!("'{}' is not a track number", listed))
        })?;

    Ok((id, number))
}
