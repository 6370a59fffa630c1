//! Album pages and album stubs

use crate::entity::{unknown_field, Collection, Entity, FieldValue, LazyEntity, Stub};
use crate::fetch::{Page, PageFetcher};
use crate::markup::{
    id_from_href, parse_duration, parse_release_date, release_year, select_within, strip_query,
    text, Document, ReleaseDate,
};
use crate::models::band::audit_trail;
use crate::models::{album_path, AlbumType, BandStub, LazyBand, Track};
use crate::{MetallumError, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static REVIEW_SCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,3})%").unwrap());
static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Album as shown in a listing
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumStub {
    pub id: String,
    pub title: String,
    /// Release type label, when the listing shows one
    pub kind: Option<String>,
    pub year: Option<i32>,
}

impl AlbumStub {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: None,
            year: None,
        }
    }
}

impl Stub for AlbumStub {
    type Full = Album;
    const FIELDS: &'static [&'static str] = &["id", "url", "title", "type", "year"];

    fn path(&self) -> String {
        album_path(&self.id)
    }

    fn stub_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.clone().into()),
            "url" => Some(self.path().into()),
            "title" => Some(self.title.clone().into()),
            "type" => self.kind.clone().map(FieldValue::from),
            "year" => self.year.map(FieldValue::from),
            _ => None,
        }
    }
}

impl LazyEntity<AlbumStub> {
    pub fn id(&self) -> &str {
        &self.stub().id
    }

    pub fn title(&self) -> &str {
        &self.stub().title
    }
}

/// An album, parsed from its page together with its track listing
#[derive(Debug, Clone)]
pub struct Album {
    pub id: String,
    pub title: String,
    /// Release type label as displayed, see [`Album::album_type`]
    pub kind: String,
    pub label: String,
    pub score: Option<u32>,
    pub review_count: Option<u32>,
    pub cover: Option<String>,
    /// Total running time in seconds, 0 when the page shows none
    pub duration: u32,
    pub added: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    release_date: String,
    bands: Vec<BandStub>,
    tracks: Vec<Track>,
    fetcher: PageFetcher,
}

impl Album {
    /// Parses an album page
    pub fn parse(html: &str, path: &str, fetcher: PageFetcher) -> Result<Self> {
        let doc = Document::parse(html);

        let title = doc
            .text_of("h1.album_name a")?
            .or(doc.text_of("h1.album_name")?)
            .filter(|title| !title.is_empty())
            .ok_or_else(|| MetallumError::parse("album page", "missing album title"))?;

        let id = doc
            .attr_of(".album_name a", "href")?
            .and_then(|href| id_from_href(&href))
            .or_else(|| id_from_href(path))
            .ok_or_else(|| MetallumError::parse("album page", "missing album id"))?;

        let bands: Vec<BandStub> = doc
            .select(".band_name a")?
            .into_iter()
            .filter_map(BandStub::from_anchor)
            .collect();

        let kind = doc.definition_text("Type:")?;

        let label = match doc.definition("Label:")? {
            Some(dd) => select_within(dd, "a")?
                .into_iter()
                .next()
                .map(text)
                .unwrap_or_else(|| text(dd)),
            None => String::new(),
        };

        let (score, review_count) = match doc.definition("Reviews:")? {
            Some(dd) => {
                let reviews = text(dd);
                let score = REVIEW_SCORE
                    .captures(&reviews)
                    .and_then(|caps| caps[1].parse::<u32>().ok());
                let count = FIRST_NUMBER
                    .find(&reviews)
                    .and_then(|m| m.as_str().parse::<u32>().ok());
                (score, count)
            }
            None => (None, None),
        };

        let duration = match doc.text_of("table.table_lyrics td strong")? {
            Some(total) if !total.is_empty() => parse_duration(&total)?,
            _ => 0,
        };

        let is_split = kind.parse::<AlbumType>().ok() == Some(AlbumType::Split);
        let tracks = Track::parse_listing(&doc, &id, is_split, &bands, &fetcher)?;
        let (added, modified) = audit_trail(&doc)?;

        Ok(Album {
            id,
            title,
            kind,
            label,
            score,
            review_count,
            cover: doc.attr_of("#cover", "href")?.map(|url| strip_query(&url)),
            duration,
            added,
            modified,
            release_date: doc.definition_text("Release date:")?,
            bands,
            tracks,
            fetcher,
        })
    }

    pub fn url(&self) -> String {
        album_path(&self.id)
    }

    /// Parsed release type
    pub fn album_type(&self) -> Result<AlbumType> {
        self.kind.parse()
    }

    /// Release date; fails when the page shows none or an unknown format
    pub fn date(&self) -> Result<ReleaseDate> {
        parse_release_date(&self.release_date)
    }

    /// Release year; falls back to a four-digit year in an unrecognised date
    pub fn year(&self) -> Result<i32> {
        match self.date() {
            Ok(date) => Ok(date.year()),
            Err(e) => release_year(&self.release_date).ok_or(e),
        }
    }

    /// Bands credited on the album, more than one only for splits
    pub fn bands(&self) -> Collection<LazyBand> {
        self.bands
            .iter()
            .map(|stub| LazyEntity::new(stub.clone(), self.fetcher.clone()))
            .collect()
    }

    pub fn tracks(&self) -> Collection<Track> {
        Collection::new(self.tracks.clone())
    }

    /// Number of discs, 0 for an album without tracks
    pub fn disc_count(&self) -> u32 {
        self.tracks
            .iter()
            .map(|track| track.disc_number)
            .max()
            .unwrap_or(0)
    }
}

impl Entity for Album {
    const NAME: &'static str = "Album";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "url",
        "title",
        "type",
        "year",
        "date",
        "bands",
        "label",
        "score",
        "review_count",
        "cover",
        "duration",
        "disc_count",
        "added",
        "modified",
    ];

    fn from_page(page: &Page, fetcher: &PageFetcher) -> Result<Self> {
        Self::parse(&page.body, &page.path, fetcher.clone())
    }

    fn field_value(&self, name: &str) -> Result<FieldValue> {
        let value = match name {
            "id" => self.id.clone().into(),
            "url" => self.url().into(),
            "title" => self.title.clone().into(),
            "type" => self.kind.clone().into(),
            "year" => self.year()?.into(),
            "date" => self.date()?.into(),
            "bands" => self
                .bands
                .iter()
                .map(|band| band.name.clone())
                .collect::<Vec<_>>()
                .into(),
            "label" => self.label.clone().into(),
            "score" => self.score.into(),
            "review_count" => self.review_count.into(),
            "cover" => self.cover.clone().into(),
            "duration" => self.duration.into(),
            "disc_count" => self.disc_count().into(),
            "added" => self.added.into(),
            "modified" => self.modified.into(),
            _ => return Err(unknown_field(Self::NAME, name)),
        };
        Ok(value)
    }
}
