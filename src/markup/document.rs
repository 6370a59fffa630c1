//! Queryable view over fetched HTML
//!
//! `Document` owns a parsed `scraper::Html`. It is not `Send`, so entities
//! build one, extract what they need into owned values, and drop it before
//! awaiting anything.

use crate::{MetallumError, Result};
use scraper::{ElementRef, Html, Selector};

/// Parsed HTML page or fragment
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a complete HTML page
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    /// Parses an HTML fragment (search cells, AJAX responses)
    pub fn fragment(text: &str) -> Self {
        Self {
            html: Html::parse_fragment(text),
        }
    }

    /// All elements matching `selector`, in document order
    pub fn select(&self, selector: &str) -> Result<Vec<ElementRef<'_>>> {
        let selector = compile(selector)?;
        Ok(self.html.select(&selector).collect())
    }

    /// First element matching `selector`
    pub fn first(&self, selector: &str) -> Result<Option<ElementRef<'_>>> {
        let selector = compile(selector)?;
        Ok(self.html.select(&selector).next())
    }

    /// Whitespace-collapsed text of the first match
    pub fn text_of(&self, selector: &str) -> Result<Option<String>> {
        Ok(self.first(selector)?.map(text))
    }

    /// Attribute of the first match
    pub fn attr_of(&self, selector: &str, name: &str) -> Result<Option<String>> {
        Ok(self.first(selector)?.and_then(|element| attribute(element, name)))
    }

    /// Whitespace-collapsed text of the whole document
    pub fn text_content(&self) -> String {
        text(self.html.root_element())
    }

    /// Raw text of the whole document, line breaks preserved
    pub fn raw_text(&self) -> String {
        self.html.root_element().text().collect()
    }

    /// The `<dd>` paired with the `<dt>` whose text equals `label`
    ///
    /// Entity pages lay out their details as `<dt>`/`<dd>` pairs; pairing is
    /// by position across the whole page.
    pub fn definition(&self, label: &str) -> Result<Option<ElementRef<'_>>> {
        let labels = self.select("dt")?;
        let Some(index) = labels.iter().position(|dt| text(*dt) == label) else {
            return Ok(None);
        };
        Ok(self.select("dd")?.into_iter().nth(index))
    }

    /// Text of the `<dd>` for `label`, empty when the label is missing
    pub fn definition_text(&self, label: &str) -> Result<String> {
        Ok(self.definition(label)?.map(text).unwrap_or_default())
    }

    /// Like [`Document::definition_text`], trying several labels in order
    pub fn definition_text_any(&self, labels: &[&str]) -> Result<String> {
        for label in labels {
            if let Some(element) = self.definition(label)? {
                return Ok(text(element));
            }
        }
        Ok(String::new())
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| MetallumError::parse(format!("selector '{}'", selector), e.to_string()))
}

/// All descendants of `element` matching `selector`
pub fn select_within<'a>(element: ElementRef<'a>, selector: &str) -> Result<Vec<ElementRef<'a>>> {
    let selector = compile(selector)?;
    Ok(element.select(&selector).collect())
}

/// Whitespace-collapsed text content of an element
pub fn text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Attribute value of an element
pub fn attribute(element: ElementRef<'_>, name: &str) -> Option<String> {
    element.value().attr(name).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
            <h1 class="band_name"><a href="https://x/bands/Metallica/125">Metallica</a></h1>
            <dl>
                <dt>Country of origin:</dt><dd><a href="https://www.metal-archives.com/lists/US">United States</a></dd>
                <dt>Location:</dt><dd>Los Angeles/San
                    Francisco, California</dd>
            </dl>
            <dl>
                <dt>Genre:</dt><dd>Thrash Metal</dd>
            </dl>
        </body></html>
    "#;

    #[test]
    fn test_select_in_document_order() {
        let doc = Document::parse(PAGE);
        let labels: Vec<String> = doc.select("dt").unwrap().into_iter().map(text).collect();
        assert_eq!(labels, vec!["Country of origin:", "Location:", "Genre:"]);
    }

    #[test]
    fn test_text_and_attribute() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.text_of("h1.band_name").unwrap().unwrap(), "Metallica");
        assert_eq!(
            doc.attr_of(".band_name a", "href").unwrap().unwrap(),
            "https://x/bands/Metallica/125"
        );
        assert_eq!(doc.attr_of(".band_name a", "title").unwrap(), None);
        assert_eq!(doc.text_of("#missing").unwrap(), None);
    }

    #[test]
    fn test_definition_pairs_across_lists() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.definition_text("Country of origin:").unwrap(), "United States");
        assert_eq!(
            doc.definition_text("Location:").unwrap(),
            "Los Angeles/San Francisco, California"
        );
        assert_eq!(doc.definition_text("Genre:").unwrap(), "Thrash Metal");
        assert_eq!(doc.definition_text("Status:").unwrap(), "");
    }

    #[test]
    fn test_definition_text_any() {
        let doc = Document::parse(PAGE);
        assert_eq!(
            doc.definition_text_any(&["Themes:", "Genre:"]).unwrap(),
            "Thrash Metal"
        );
        assert_eq!(doc.definition_text_any(&["Themes:"]).unwrap(), "");
    }

    #[test]
    fn test_select_within() {
        let doc = Document::parse(PAGE);
        let dl = doc.first("dl").unwrap().unwrap();
        assert_eq!(select_within(dl, "dd").unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_selector_is_parse_error() {
        let doc = Document::parse(PAGE);
        let err = doc.select("[[[").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Parse);
    }

    #[test]
    fn test_text_content_skips_comments() {
        let doc = Document::fragment(r#"<a href="/bands/A/1">A</a> / <a href="/bands/B/2">B</a> <!-- 9.6 -->"#);
        assert_eq!(doc.text_content(), "A / B");
    }

    #[test]
    fn test_raw_text_keeps_line_breaks() {
        let doc = Document::fragment("Line one<br />\nLine two");
        assert_eq!(doc.raw_text(), "Line one\nLine two");
    }
}
