//! Mapping table file formats.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{CodecError, Result};

/// Field separator of a delimited mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Semicolon => b';',
            Self::Tab => b'\t',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Comma => "comma",
            Self::Semicolon => "semicolon",
            Self::Tab => "tab",
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "comma" | "," => Ok(Self::Comma),
            "semicolon" | ";" => Ok(Self::Semicolon),
            "tab" | "\\t" => Ok(Self::Tab),
            _ => Err(format!(
                "Unknown delimiter: {s} (expected comma, semicolon or tab)"
            )),
        }
    }
}

/// On-disk representation of a mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingFormat {
    /// One header row, one row per mapping, one cell per attribute.
    Delimited(Delimiter),
    /// One `source => target # description` line per mapping.
    Text,
}

impl MappingFormat {
    /// Format implied by a file extension (case-insensitive).
    ///
    /// `.csv` is comma-separated, `.tsv` and `.tab` are tab-separated and
    /// `.txt` is the line format.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Delimited(Delimiter::Comma)),
            Some("tsv" | "tab") => Ok(Self::Delimited(Delimiter::Tab)),
            Some("txt") => Ok(Self::Text),
            _ => Err(CodecError::UnknownFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Same format with another delimiter; the line format is unchanged.
    pub fn with_delimiter(self, delimiter: Delimiter) -> Self {
        match self {
            Self::Delimited(_) => Self::Delimited(delimiter),
            Self::Text => Self::Text,
        }
    }
}

impl fmt::Display for MappingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delimited(delimiter) => write!(f, "delimited ({delimiter})"),
            Self::Text => f.write_str("text"),
        }
    }
}
