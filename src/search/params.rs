//! Advanced-search query builders
//!
//! Each builder maps its fields onto the site's query-string keys. Unset
//! optional fields are left out of the query entirely; flags are sent as
//! `0`/`1`; list fields repeat their key with a `[]` suffix.

use url::form_urlencoded::Serializer;

const SEARCH_PATH: &str = "search/ajax-advanced/searching";

struct Query {
    serializer: Serializer<'static, String>,
}

impl Query {
    fn new() -> Self {
        Self {
            serializer: Serializer::new(String::new()),
        }
    }

    fn text(&mut self, key: &str, value: &str) -> &mut Self {
        self.serializer.append_pair(key, value);
        self
    }

    fn optional(&mut self, key: &str, value: &Option<String>) -> &mut Self {
        if let Some(value) = value {
            self.serializer.append_pair(key, value);
        }
        self
    }

    fn number(&mut self, key: &str, value: Option<u32>) -> &mut Self {
        if let Some(value) = value {
            self.serializer.append_pair(key, &value.to_string());
        }
        self
    }

    fn flag(&mut self, key: &str, value: bool) -> &mut Self {
        self.serializer.append_pair(key, if value { "1" } else { "0" });
        self
    }

    fn list(&mut self, key: &str, values: &[String]) -> &mut Self {
        for value in values {
            self.serializer.append_pair(key, value);
        }
        self
    }

    fn finish(&mut self) -> String {
        self.serializer.finish()
    }
}

/// Band search
///
/// ```
/// use metallum::BandSearch;
///
/// let search = BandSearch::new("Metallica").country("US");
/// assert_eq!(search.query_string(), "bandName=Metallica&exactBandMatch=1&country%5B%5D=US");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandSearch {
    pub name: String,
    pub strict: bool,
    pub genre: Option<String>,
    pub countries: Vec<String>,
    pub year_created_from: Option<u32>,
    pub year_created_to: Option<u32>,
    pub status: Vec<String>,
    pub themes: Option<String>,
    pub location: Option<String>,
    pub label: Option<String>,
    pub notes: Option<String>,
    pub page_start: Option<u32>,
}

impl BandSearch {
    /// Exact-match search by band name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strict: true,
            genre: None,
            countries: Vec::new(),
            year_created_from: None,
            year_created_to: None,
            status: Vec::new(),
            themes: None,
            location: None,
            label: None,
            notes: None,
            page_start: None,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Adds a country code; repeatable
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.countries.push(country.into());
        self
    }

    pub fn year_created(mut self, from: Option<u32>, to: Option<u32>) -> Self {
        self.year_created_from = from;
        self.year_created_to = to;
        self
    }

    /// Adds a status code; repeatable
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status.push(status.into());
        self
    }

    pub fn themes(mut self, themes: impl Into<String>) -> Self {
        self.themes = Some(themes.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn page_start(mut self, offset: u32) -> Self {
        self.page_start = Some(offset);
        self
    }

    pub fn query_string(&self) -> String {
        Query::new()
            .text("bandName", &self.name)
            .flag("exactBandMatch", self.strict)
            .optional("genre", &self.genre)
            .list("country[]", &self.countries)
            .number("yearCreationFrom", self.year_created_from)
            .number("yearCreationTo", self.year_created_to)
            .list("status[]", &self.status)
            .optional("themes", &self.themes)
            .optional("location", &self.location)
            .optional("bandLabelName", &self.label)
            .optional("bandNotes", &self.notes)
            .number("iDisplayStart", self.page_start)
            .finish()
    }

    pub fn path(&self) -> String {
        format!("{}/bands/?{}", SEARCH_PATH, self.query_string())
    }
}

/// Album search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumSearch {
    pub title: String,
    pub strict: bool,
    pub band: Option<String>,
    pub band_strict: bool,
    pub year_from: Option<u32>,
    pub year_to: Option<u32>,
    pub month_from: Option<u32>,
    pub month_to: Option<u32>,
    pub countries: Vec<String>,
    pub location: Option<String>,
    pub label: Option<String>,
    pub indie_label: bool,
    pub genre: Option<String>,
    pub catalog_number: Option<String>,
    pub identifiers: Option<String>,
    pub recording_info: Option<String>,
    pub version_description: Option<String>,
    pub notes: Option<String>,
    pub types: Vec<String>,
    pub formats: Vec<String>,
    pub page_start: Option<u32>,
}

impl AlbumSearch {
    /// Exact-match search by release title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            strict: true,
            band: None,
            band_strict: true,
            year_from: None,
            year_to: None,
            month_from: None,
            month_to: None,
            countries: Vec::new(),
            location: None,
            label: None,
            indie_label: false,
            genre: None,
            catalog_number: None,
            identifiers: None,
            recording_info: None,
            version_description: None,
            notes: None,
            types: Vec::new(),
            formats: Vec::new(),
            page_start: None,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn band(mut self, band: impl Into<String>) -> Self {
        self.band = Some(band.into());
        self
    }

    pub fn band_strict(mut self, strict: bool) -> Self {
        self.band_strict = strict;
        self
    }

    /// Release date range; a year without a month covers the whole year
    pub fn released_from(mut self, year: u32, month: Option<u32>) -> Self {
        self.year_from = Some(year);
        self.month_from = month;
        self
    }

    pub fn released_to(mut self, year: u32, month: Option<u32>) -> Self {
        self.year_to = Some(year);
        self.month_to = month;
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.countries.push(country.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn indie_label(mut self, indie: bool) -> Self {
        self.indie_label = indie;
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn catalog_number(mut self, number: impl Into<String>) -> Self {
        self.catalog_number = Some(number.into());
        self
    }

    pub fn identifiers(mut self, identifiers: impl Into<String>) -> Self {
        self.identifiers = Some(identifiers.into());
        self
    }

    pub fn recording_info(mut self, info: impl Into<String>) -> Self {
        self.recording_info = Some(info.into());
        self
    }

    pub fn version_description(mut self, description: impl Into<String>) -> Self {
        self.version_description = Some(description.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Adds a release type code; repeatable
    pub fn release_type(mut self, kind: impl Into<String>) -> Self {
        self.types.push(kind.into());
        self
    }

    /// Adds a format; repeatable
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.formats.push(format.into());
        self
    }

    pub fn page_start(mut self, offset: u32) -> Self {
        self.page_start = Some(offset);
        self
    }

    pub fn query_string(&self) -> String {
        let month_from = self.month_from.or(self.year_from.map(|_| 1));
        let month_to = self.month_to.or(self.year_to.map(|_| 12));

        Query::new()
            .text("releaseTitle", &self.title)
            .flag("exactReleaseMatch", self.strict)
            .optional("bandName", &self.band)
            .flag("exactBandMatch", self.band_strict)
            .number("releaseYearFrom", self.year_from)
            .number("releaseMonthFrom", month_from)
            .number("releaseYearTo", self.year_to)
            .number("releaseMonthTo", month_to)
            .list("country[]", &self.countries)
            .optional("location", &self.location)
            .optional("releaseLabelName", &self.label)
            .flag("indieLabel", self.indie_label)
            .optional("genre", &self.genre)
            .optional("releaseCatalogNumber", &self.catalog_number)
            .optional("releaseIdentifiers", &self.identifiers)
            .optional("releaseRecordingInfo", &self.recording_info)
            .optional("releaseDescription", &self.version_description)
            .optional("releaseNotes", &self.notes)
            .list("releaseType[]", &self.types)
            .list("releaseFormat[]", &self.formats)
            .number("iDisplayStart", self.page_start)
            .finish()
    }

    pub fn path(&self) -> String {
        format!("{}/albums/?{}", SEARCH_PATH, self.query_string())
    }
}

/// Song search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongSearch {
    pub title: String,
    pub strict: bool,
    pub band: Option<String>,
    pub band_strict: bool,
    pub release: Option<String>,
    pub release_strict: bool,
    pub lyrics: Option<String>,
    pub genre: Option<String>,
    pub types: Vec<String>,
    pub page_start: Option<u32>,
}

impl SongSearch {
    /// Exact-match search by song title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            strict: true,
            band: None,
            band_strict: true,
            release: None,
            release_strict: true,
            lyrics: None,
            genre: None,
            types: Vec::new(),
            page_start: None,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn band(mut self, band: impl Into<String>) -> Self {
        self.band = Some(band.into());
        self
    }

    pub fn band_strict(mut self, strict: bool) -> Self {
        self.band_strict = strict;
        self
    }

    pub fn release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    pub fn release_strict(mut self, strict: bool) -> Self {
        self.release_strict = strict;
        self
    }

    pub fn lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = Some(lyrics.into());
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn release_type(mut self, kind: impl Into<String>) -> Self {
        self.types.push(kind.into());
        self
    }

    pub fn page_start(mut self, offset: u32) -> Self {
        self.page_start = Some(offset);
        self
    }

    /// The site needs a genre on song searches; `*` matches any
    pub fn query_string(&self) -> String {
        let genre = self
            .genre
            .as_deref()
            .map(str::trim)
            .filter(|genre| !genre.is_empty())
            .unwrap_or("*");

        Query::new()
            .text("songTitle", &self.title)
            .flag("exactSongMatch", self.strict)
            .optional("bandName", &self.band)
            .flag("exactBandMatch", self.band_strict)
            .optional("releaseTitle", &self.release)
            .flag("exactReleaseMatch", self.release_strict)
            .optional("lyrics", &self.lyrics)
            .text("genre", genre)
            .list("releaseType[]", &self.types)
            .number("iDisplayStart", self.page_start)
            .finish()
    }

    pub fn path(&self) -> String {
        format!("{}/songs/?{}", SEARCH_PATH, self.query_string())
    }
}
