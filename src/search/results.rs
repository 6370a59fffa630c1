//! Search responses and their typed rows
//!
//! A search response is JSON: `iTotalRecords` holds the number of matches
//! and `aaData` one page of rows. Each row is an array of strings whose
//! meaning depends on its position; some cells are HTML fragments.

use crate::entity::{unknown_field, Collection, Entity, FieldSource, FieldValue, LazyEntity};
use crate::fetch::{Page, PageFetcher};
use crate::markup::{
    attribute, id_from_href, leading_digits, parse_json, parse_release_date, split_genres,
    Document, ReleaseDate,
};
use crate::models::{
    album_path, band_path, lyrics_path, Album, AlbumStub, Band, BandStub, LazyAlbum, LazyBand,
    Lyrics,
};
use crate::{MetallumError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::future::Future;
use std::ops::Index;

static LYRICS_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r#"id="lyricsLink_(\d+)""#).unwrap());

/// One row of a search response, before typing
///
/// `values` holds the cells as displayed: link cells are reduced to their
/// text, or to the lyrics id for lyrics links. `raw` keeps the original
/// markup for link extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCells {
    pub values: Vec<String>,
    pub raw: Vec<String>,
}

impl RowCells {
    pub fn new(raw: Vec<String>) -> Self {
        let values = raw.iter().map(|cell| normalize_cell(cell)).collect();
        Self { values, raw }
    }

    /// Displayed value of a cell, empty when the row is shorter
    pub fn value(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    /// Raw markup of a cell, empty when the row is shorter
    pub fn raw(&self, index: usize) -> &str {
        self.raw.get(index).map(String::as_str).unwrap_or("")
    }

    /// Entity id from the first link in a cell
    fn linked_id(&self, index: usize) -> Option<String> {
        let doc = Document::fragment(self.raw(index));
        let anchor = doc.first("a").ok()??;
        attribute(anchor, "href").and_then(|href| id_from_href(&href))
    }
}

fn normalize_cell(cell: &str) -> String {
    if !cell.starts_with("<a href") {
        return cell.to_string();
    }

    if let Some(caps) = LYRICS_LINK.captures(cell) {
        return caps[1].to_string();
    }

    Document::fragment(cell).text_content()
}

fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A typed search row
pub trait SearchRow: Sized {
    /// Row type name used in errors
    const KIND: &'static str;

    fn from_cells(cells: RowCells, fetcher: &PageFetcher) -> Result<Self>;
}

/// One page of search results
#[derive(Debug, Clone)]
pub struct SearchResults<R> {
    /// Number of matches across all pages
    pub total: u64,
    rows: Collection<R>,
}

impl<R: SearchRow> SearchResults<R> {
    /// Parses a search response body
    pub fn parse(body: &str, fetcher: &PageFetcher) -> Result<Self> {
        let json = parse_json(body)?;

        let total = match &json["iTotalRecords"] {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| MetallumError::parse("search response", "missing iTotalRecords"))?;

        let data = json["aaData"]
            .as_array()
            .ok_or_else(|| MetallumError::parse("search response", "missing aaData"))?;

        let mut rows = Vec::with_capacity(data.len());
        for row in data {
            let cells = row
                .as_array()
                .ok_or_else(|| MetallumError::parse(R::KIND, "row is not an array"))?
                .iter()
                .map(cell_to_string)
                .collect();
            rows.push(R::from_cells(RowCells::new(cells), fetcher)?);
        }

        tracing::debug!("Parsed {} of {} {} rows", rows.len(), total, R::KIND);
        Ok(Self {
            total,
            rows: Collection::new(rows),
        })
    }
}

impl<R> SearchResults<R> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &Collection<R> {
        &self.rows
    }

    pub fn into_rows(self) -> Collection<R> {
        self.rows
    }
}

impl<R> Index<usize> for SearchResults<R> {
    type Output = R;

    fn index(&self, index: usize) -> &R {
        &self.rows[index]
    }
}

impl<'a, R> IntoIterator for &'a SearchResults<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Band search row: `name | genre | country | other...`
#[derive(Debug, Clone)]
pub struct BandResult {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub country: String,
    /// Columns after the country, present for some search filters
    pub other: Vec<String>,
    pub cells: RowCells,
    fetcher: PageFetcher,
}

impl SearchRow for BandResult {
    const KIND: &'static str = "band result";

    fn from_cells(cells: RowCells, fetcher: &PageFetcher) -> Result<Self> {
        let id = cells
            .linked_id(0)
            .ok_or_else(|| MetallumError::parse(Self::KIND, "no band link"))?;

        Ok(BandResult {
            id,
            name: cells.value(0).to_string(),
            genres: split_genres(cells.value(1)),
            country: cells.value(2).to_string(),
            other: cells.values.iter().skip(3).cloned().collect(),
            cells,
            fetcher: fetcher.clone(),
        })
    }
}

impl BandResult {
    pub fn url(&self) -> String {
        band_path(&self.id)
    }

    /// The band as a stub carrying this row's values
    pub fn band(&self) -> LazyBand {
        let stub = BandStub {
            id: self.id.clone(),
            name: self.name.clone(),
            country: Some(self.country.clone()),
            genres: Some(self.genres.clone()),
        };
        LazyEntity::new(stub, self.fetcher.clone())
    }

    /// Fetches the band's page
    pub async fn get(&self) -> Result<Band> {
        fetch_entity(&self.fetcher, &self.url()).await
    }

    fn value(&self, name: &str) -> Result<FieldValue> {
        let value = match name {
            "id" => self.id.clone().into(),
            "url" => self.url().into(),
            "name" => self.name.clone().into(),
            "genres" => self.genres.clone().into(),
            "country" => self.country.clone().into(),
            _ => return Err(unknown_field("BandResult", name)),
        };
        Ok(value)
    }
}

/// Album search row: `band(s) | title | type | release date`
#[derive(Debug, Clone)]
pub struct AlbumResult {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub band_name: String,
    /// Release date as displayed
    pub release_date: String,
    pub cells: RowCells,
    bands: Vec<BandStub>,
    fetcher: PageFetcher,
}

impl SearchRow for AlbumResult {
    const KIND: &'static str = "album result";

    fn from_cells(cells: RowCells, fetcher: &PageFetcher) -> Result<Self> {
        let id = cells
            .linked_id(1)
            .ok_or_else(|| MetallumError::parse(Self::KIND, "no album link"))?;

        Ok(AlbumResult {
            id,
            title: cells.value(1).to_string(),
            kind: cells.value(2).to_string(),
            band_name: cells.value(0).to_string(),
            release_date: strip_comments(cells.value(3)),
            bands: BandStub::from_fragment(cells.raw(0))?,
            cells,
            fetcher: fetcher.clone(),
        })
    }
}

impl AlbumResult {
    pub fn url(&self) -> String {
        album_path(&self.id)
    }

    /// Bands credited on the row
    pub fn bands(&self) -> Collection<LazyBand> {
        self.bands
            .iter()
            .map(|stub| LazyEntity::new(stub.clone(), self.fetcher.clone()))
            .collect()
    }

    pub fn date(&self) -> Result<ReleaseDate> {
        parse_release_date(&self.release_date)
    }

    /// The album as a stub carrying this row's values
    pub fn album(&self) -> LazyAlbum {
        let mut stub = AlbumStub::new(self.id.clone(), self.title.clone());
        stub.kind = Some(self.kind.clone());
        stub.year = self.date().ok().map(|date| date.year());
        LazyEntity::new(stub, self.fetcher.clone())
    }

    /// Fetches the album's page
    pub async fn get(&self) -> Result<Album> {
        fetch_entity(&self.fetcher, &self.url()).await
    }

    fn value(&self, name: &str) -> Result<FieldValue> {
        let value = match name {
            "id" => self.id.clone().into(),
            "url" => self.url().into(),
            "title" => self.title.clone().into(),
            "type" => self.kind.clone().into(),
            "band_name" => self.band_name.clone().into(),
            "date" => self.date()?.into(),
            _ => return Err(unknown_field("AlbumResult", name)),
        };
        Ok(value)
    }
}

/// Song search row: `band(s) | album | type | title | genre | lyrics`
///
/// Songs have no page of their own, so the row is the complete entity.
#[derive(Debug, Clone)]
pub struct SongResult {
    /// Lyrics id, absent when the row carries no lyrics link
    pub id: Option<String>,
    pub title: String,
    pub kind: String,
    pub band_name: String,
    pub album_name: String,
    pub genres: Vec<String>,
    pub cells: RowCells,
    bands: Vec<BandStub>,
    album_id: Option<String>,
    fetcher: PageFetcher,
}

impl SearchRow for SongResult {
    const KIND: &'static str = "song result";

    fn from_cells(cells: RowCells, fetcher: &PageFetcher) -> Result<Self> {
        let genres = cells
            .value(4)
            .split(" | ")
            .flat_map(|genre| split_genres(genre.trim()))
            .collect();

        Ok(SongResult {
            id: leading_digits(cells.value(5)).map(str::to_string),
            title: cells.value(3).to_string(),
            kind: cells.value(2).to_string(),
            band_name: cells.value(0).to_string(),
            album_name: cells.value(1).to_string(),
            genres,
            bands: BandStub::from_fragment(cells.raw(0))?,
            album_id: cells.linked_id(1),
            cells,
            fetcher: fetcher.clone(),
        })
    }
}

impl SongResult {
    /// The song itself; there is nothing further to fetch
    pub fn get(&self) -> &Self {
        self
    }

    pub fn bands(&self) -> Collection<LazyBand> {
        self.bands
            .iter()
            .map(|stub| LazyEntity::new(stub.clone(), self.fetcher.clone()))
            .collect()
    }

    /// The release the song appears on
    pub fn album(&self) -> Result<LazyAlbum> {
        let id = self
            .album_id
            .clone()
            .ok_or_else(|| MetallumError::parse(Self::KIND, "no album link"))?;
        let mut stub = AlbumStub::new(id, self.album_name.clone());
        stub.kind = Some(self.kind.clone());
        Ok(LazyEntity::new(stub, self.fetcher.clone()))
    }

    /// Fetches the song's lyrics
    pub async fn lyrics(&self) -> Result<Lyrics> {
        let id = self
            .id
            .clone()
            .ok_or_else(|| MetallumError::parse(Self::KIND, "no lyrics link"))?;
        let page = self.fetcher.fetch(&lyrics_path(&id)).await?;
        Ok(Lyrics::parse(id, &page.body))
    }

    fn value(&self, name: &str) -> Result<FieldValue> {
        let value = match name {
            "id" => self.id.clone().into(),
            "title" => self.title.clone().into(),
            "type" => self.kind.clone().into(),
            "band_name" => self.band_name.clone().into(),
            "album_name" => self.album_name.clone().into(),
            "genres" => self.genres.clone().into(),
            _ => return Err(unknown_field("SongResult", name)),
        };
        Ok(value)
    }
}

impl FieldSource for BandResult {
    fn field(&self, name: &str) -> impl Future<Output = Result<FieldValue>> + Send {
        std::future::ready(self.value(name))
    }
}

impl FieldSource for AlbumResult {
    fn field(&self, name: &str) -> impl Future<Output = Result<FieldValue>> + Send {
        std::future::ready(self.value(name))
    }
}

impl FieldSource for SongResult {
    fn field(&self, name: &str) -> impl Future<Output = Result<FieldValue>> + Send {
        std::future::ready(self.value(name))
    }
}

async fn fetch_entity<E: Entity>(fetcher: &PageFetcher, path: &str) -> Result<E> {
    let page: Page = fetcher.fetch(path).await?;
    E::from_page(&page, fetcher)
}

fn strip_comments(cell: &str) -> String {
    match cell.find("<!--") {
        Some(start) => cell[..start].trim().to_string(),
        None => cell.trim().to_string(),
    }
}
