use crate::markup::Document;
use std::fmt;

/// Lyrics of a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lyrics {
    pub id: String,
    /// Plain text, one line per lyric line; empty when none are entered
    pub text: String,
}

impl Lyrics {
    /// Parses the lyrics fragment the site serves for a track
    pub fn parse(id: impl Into<String>, html: &str) -> Self {
        let raw = Document::fragment(html).raw_text().replace('\r', "");
        let text = raw
            .lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();

        Self { id: id.into(), text }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Lyrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
