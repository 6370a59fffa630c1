//! Band pages, band stubs and discographies

use crate::entity::{unknown_field, Collection, Entity, FieldValue, LazyEntity, Stub};
use crate::fetch::{Page, PageFetcher};
use crate::markup::{
    attribute, id_from_href, parse_audit_timestamp, select_within, split_genres, strip_query,
    text, Document,
};
use crate::models::{
    band_path, discography_path, similar_artists_path, AlbumStub, LazyAlbum, SimilarArtist,
};
use crate::{MetallumError, Result};
use chrono::{DateTime, Utc};
use scraper::ElementRef;

/// Band as shown in a listing: always an id and a name, sometimes more
#[derive(Debug, Clone, PartialEq)]
pub struct BandStub {
    pub id: String,
    pub name: String,
    pub country: Option<String>,
    pub genres: Option<Vec<String>>,
}

impl BandStub {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            country: None,
            genres: None,
        }
    }

    /// Builds a stub from a link to the band's page
    pub fn from_anchor(anchor: ElementRef<'_>) -> Option<Self> {
        let id = attribute(anchor, "href").and_then(|href| id_from_href(&href))?;
        Some(Self::new(id, text(anchor)))
    }

    /// Stubs for every band link in an HTML fragment
    pub(crate) fn from_fragment(html: &str) -> Result<Vec<Self>> {
        let doc = Document::fragment(html);
        Ok(doc
            .select("a")?
            .into_iter()
            .filter_map(Self::from_anchor)
            .collect())
    }
}

impl Stub for BandStub {
    type Full = Band;
    const FIELDS: &'static [&'static str] = &["id", "url", "name", "country", "genres"];

    fn path(&self) -> String {
        band_path(&self.id)
    }

    fn stub_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.clone().into()),
            "url" => Some(self.path().into()),
            "name" => Some(self.name.clone().into()),
            "country" => self.country.clone().map(FieldValue::from),
            "genres" => self.genres.clone().map(FieldValue::from),
            _ => None,
        }
    }
}

impl LazyEntity<BandStub> {
    pub fn id(&self) -> &str {
        &self.stub().id
    }

    pub fn name(&self) -> &str {
        &self.stub().name
    }
}

/// A band, parsed from its page
#[derive(Debug, Clone)]
pub struct Band {
    pub id: String,
    pub name: String,
    pub country: String,
    pub location: String,
    pub status: String,
    pub formed_in: String,
    pub genres: Vec<String>,
    pub themes: Vec<String>,
    pub label: String,
    pub logo: Option<String>,
    pub photo: Option<String>,
    pub added: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    fetcher: PageFetcher,
}

impl Band {
    /// Parses a band page
    ///
    /// Only the name and id are required. Labelled details missing from the
    /// page come back empty.
    pub fn parse(html: &str, path: &str, fetcher: PageFetcher) -> Result<Self> {
        let doc = Document::parse(html);

        let name = doc
            .text_of("h1.band_name")?
            .filter(|name| !name.is_empty())
            .ok_or_else(|| MetallumError::parse("band page", "missing band name"))?;

        let id = doc
            .attr_of(".band_name a", "href")?
            .and_then(|href| id_from_href(&href))
            .or_else(|| id_from_href(path))
            .ok_or_else(|| MetallumError::parse("band page", "missing band id"))?;

        let themes = doc
            .definition_text_any(&["Themes:", "Lyrical themes:"])?
            .split(", ")
            .map(str::trim)
            .filter(|theme| !theme.is_empty())
            .map(str::to_string)
            .collect();

        let (added, modified) = audit_trail(&doc)?;

        Ok(Band {
            id,
            name,
            country: doc.definition_text("Country of origin:")?,
            location: doc.definition_text("Location:")?,
            status: doc.definition_text("Status:")?,
            formed_in: doc.definition_text("Formed in:")?,
            genres: split_genres(&doc.definition_text("Genre:")?),
            themes,
            label: doc.definition_text_any(&["Current label:", "Last label:"])?,
            logo: doc.attr_of("#logo", "href")?.map(|url| strip_query(&url)),
            photo: doc.attr_of("#photo", "href")?.map(|url| strip_query(&url)),
            added,
            modified,
            fetcher,
        })
    }

    pub fn url(&self) -> String {
        band_path(&self.id)
    }

    /// The band's full discography
    ///
    /// Albums start out as stubs carrying title, type and year.
    pub async fn albums(&self) -> Result<Collection<LazyAlbum>> {
        let page = self.fetcher.fetch(&discography_path(&self.id)).await?;
        parse_discography(&page.body, &self.fetcher)
    }

    /// Bands the site's users consider similar, highest score first
    pub async fn similar_artists(&self) -> Result<Collection<SimilarArtist>> {
        let page = self.fetcher.fetch(&similar_artists_path(&self.id)).await?;
        SimilarArtist::parse_list(&page.body, &self.fetcher)
    }
}

impl Entity for Band {
    const NAME: &'static str = "Band";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "url",
        "name",
        "country",
        "location",
        "status",
        "formed_in",
        "genres",
        "themes",
        "label",
        "logo",
        "photo",
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
            "name" => self.name.clone().into(),
            "country" => self.country.clone().into(),
            "location" => self.location.clone().into(),
            "status" => self.status.clone().into(),
            "formed_in" => self.formed_in.clone().into(),
            "genres" => self.genres.clone().into(),
            "themes" => self.themes.clone().into(),
            "label" => self.label.clone().into(),
            "logo" => self.logo.clone().into(),
            "photo" => self.photo.clone().into(),
            "added" => self.added.into(),
            "modified" => self.modified.into(),
            _ => return Err(unknown_field(Self::NAME, name)),
        };
        Ok(value)
    }
}

/// Added and last-modified times from a page's audit trail
pub(crate) fn audit_trail(
    doc: &Document,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let Some(row) = doc.select("#auditTrail tr")?.into_iter().nth(1) else {
        return Ok((None, None));
    };

    let cells = select_within(row, "td")?;
    let stamp = |index: usize| {
        cells
            .get(index)
            .and_then(|cell| parse_audit_timestamp(&text(*cell)))
    };
    Ok((stamp(0), stamp(1)))
}

/// Albums listed on a discography tab
///
/// The first row is the table header; rows without a release link are
/// skipped.
fn parse_discography(html: &str, fetcher: &PageFetcher) -> Result<Collection<LazyAlbum>> {
    let doc = Document::parse(html);
    let mut albums = Vec::new();

    for row in doc.select("tr")?.into_iter().skip(1) {
        let cells = select_within(row, "td")?;
        let Some(first) = cells.first() else {
            continue;
        };
        let Some(anchor) = select_within(*first, "a")?.into_iter().next() else {
            continue;
        };
        let Some(id) = attribute(anchor, "href").and_then(|href| id_from_href(&href)) else {
            continue;
        };

        let mut stub = AlbumStub::new(id, text(anchor));
        stub.kind = cells.get(1).map(|cell| text(*cell));
        stub.year = cells.get(2).and_then(|cell| text(*cell).parse().ok());
        albums.push(LazyEntity::new(stub, fetcher.clone()));
    }

    tracing::debug!("Parsed {} discography entries", albums.len());
    Ok(Collection::new(albums))
}
