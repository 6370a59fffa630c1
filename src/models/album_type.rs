use crate::MetallumError;
use std::fmt;
use std::str::FromStr;

/// Release category, with the labels the site displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlbumType {
    FullLength,
    Ep,
    Single,
    Demo,
    Video,
    Compilation,
    Dvd,
    Live,
    Split,
}

impl AlbumType {
    pub const ALL: [AlbumType; 9] = [
        AlbumType::FullLength,
        AlbumType::Ep,
        AlbumType::Single,
        AlbumType::Demo,
        AlbumType::Video,
        AlbumType::Compilation,
        AlbumType::Dvd,
        AlbumType::Live,
        AlbumType::Split,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlbumType::FullLength => "Full-length",
            AlbumType::Ep => "EP",
            AlbumType::Single => "Single",
            AlbumType::Demo => "Demo",
            AlbumType::Video => "Video/VHS",
            AlbumType::Compilation => "Compilation",
            AlbumType::Dvd => "DVD",
            AlbumType::Live => "Live album",
            AlbumType::Split => "Split",
        }
    }
}

impl fmt::Display for AlbumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlbumType {
    type Err = MetallumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AlbumType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| MetallumError::parse("album type", format!("unknown label '{}'", s)))
    }
}
