//! Similar-artist recommendations of a band

use crate::entity::{unknown_field, Collection, Entity, FieldSource, FieldValue, LazyEntity};
use crate::fetch::PageFetcher;
use crate::markup::{
    attribute, id_from_href, leading_digits, select_within, split_genres, text, Document,
};
use crate::models::{band_path, Band, BandStub, LazyBand};
use crate::{MetallumError, Result};
use std::future::Future;

/// One recommendation: another band and its user-voted score
#[derive(Debug, Clone)]
pub struct SimilarArtist {
    pub id: String,
    pub name: String,
    pub country: String,
    pub genres: Vec<String>,
    pub score: i64,
    fetcher: PageFetcher,
}

impl SimilarArtist {
    /// Parses the recommendations table
    ///
    /// Rows are `name link | country | genre | score`; rows of any other
    /// shape (headers, the "show more" row) are skipped.
    pub(crate) fn parse_list(html: &str, fetcher: &PageFetcher) -> Result<Collection<Self>> {
        let doc = Document::fragment(html);
        let mut artists = Vec::new();

        for row in doc.select("tr")? {
            let cells = select_within(row, "td")?;
            if cells.len() < 4 {
                continue;
            }
            let Some(anchor) = select_within(cells[0], "a")?.into_iter().next() else {
                continue;
            };
            let Some(id) = attribute(anchor, "href").and_then(|href| id_from_href(&href)) else {
                continue;
            };

            let listed = text(cells[3]);
            let score = leading_digits(&listed)
                .and_then(|digits| digits.parse::<i64>().ok())
                .ok_or_else(|| {
                    MetallumError::parse("similar artists", format!("'{}' is not a score", listed))
                })?;

            artists.push(SimilarArtist {
                id,
                name: text(anchor),
                country: text(cells[1]),
                genres: split_genres(&text(cells[2])),
                score,
                fetcher: fetcher.clone(),
            });
        }

        tracing::debug!("Parsed {} similar artists", artists.len());
        Ok(Collection::new(artists))
    }

    pub fn url(&self) -> String {
        band_path(&self.id)
    }

    /// The recommended band, fetched when a field beyond this row is read
    pub fn band(&self) -> LazyBand {
        let stub = BandStub {
            id: self.id.clone(),
            name: self.name.clone(),
            country: Some(self.country.clone()),
            genres: Some(self.genres.clone()),
        };
        LazyEntity::new(stub, self.fetcher.clone())
    }

    /// Fetches the recommended band's page
    pub async fn get(&self) -> Result<Band> {
        let page = self.fetcher.fetch(&self.url()).await?;
        Band::from_page(&page, &self.fetcher)
    }

    fn value(&self, name: &str) -> Result<FieldValue> {
        let value = match name {
            "id" => self.id.clone().into(),
            "url" => self.url().into(),
            "name" => self.name.clone().into(),
            "country" => self.country.clone().into(),
            "genres" => self.genres.clone().into(),
            "score" => self.score.into(),
            _ => return Err(unknown_field("SimilarArtist", name)),
        };
        Ok(value)
    }
}

impl FieldSource for SimilarArtist {
    fn field(&self, name: &str) -> impl Future<Output = Result<FieldValue>> + Send {
        std::future::ready(self.value(name))
    }
}
