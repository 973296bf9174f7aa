//! Culture-specific number and date formats used when parsing rule values.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

/// ISO 8601 forms, accepted under every culture.
const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d"];
const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Number and date formatting rules for one culture.
///
/// Output is always culture-invariant; a culture only affects parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Culture {
    name: &'static str,
    decimal_separator: char,
    group_separator: Option<char>,
    date_formats: &'static [&'static str],
    datetime_formats: &'static [&'static str],
}

impl Culture {
    pub const INVARIANT: Culture = Culture {
        name: "invariant",
        decimal_separator: '.',
        group_separator: Some(','),
        date_formats: &["%m/%d/%Y"],
        datetime_formats: &["%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"],
    };

    pub const EN_US: Culture = Culture {
        name: "en-US",
        decimal_separator: '.',
        group_separator: Some(','),
        date_formats: &["%m/%d/%Y"],
        datetime_formats: &[
            "%m/%d/%Y %I:%M:%S %p",
            "%m/%d/%Y %I:%M %p",
            "%m/%d/%Y %H:%M:%S",
        ],
    };

    pub const DE_DE: Culture = Culture {
        name: "de-DE",
        decimal_separator: ',',
        group_separator: Some('.'),
        date_formats: &["%d.%m.%Y"],
        datetime_formats: &["%d.%m.%Y %H:%M:%S", "%d.%m.%Y %H:%M"],
    };

    pub const DE_CH: Culture = Culture {
        name: "de-CH",
        decimal_separator: '.',
        group_separator: Some('\''),
        date_formats: &["%d.%m.%Y"],
        datetime_formats: &["%d.%m.%Y %H:%M:%S", "%d.%m.%Y %H:%M"],
    };

    pub const FR_FR: Culture = Culture {
        name: "fr-FR",
        decimal_separator: ',',
        group_separator: Some('\u{a0}'),
        date_formats: &["%d/%m/%Y"],
        datetime_formats: &["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"],
    };

    const ALL: [Culture; 5] = [
        Self::INVARIANT,
        Self::EN_US,
        Self::DE_DE,
        Self::DE_CH,
        Self::FR_FR,
    ];

    /// Look up a culture by name (case-insensitive). An empty name is the
    /// invariant culture.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Some(Self::INVARIANT);
        }
        Self::ALL
            .into_iter()
            .find(|culture| culture.name.eq_ignore_ascii_case(name))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// Parse a signed integer. Only sign and digits are allowed.
    pub fn parse_integer(&self, text: &str) -> Option<i64> {
        let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        text.parse().ok()
    }

    /// Parse a finite real number, allowing group separators and exponents.
    pub fn parse_real(&self, text: &str) -> Option<f64> {
        let mut normalized = String::with_capacity(text.len());
        for c in text.chars() {
            if Some(c) == self.group_separator {
                continue;
            }
            if c == self.decimal_separator {
                normalized.push('.');
            } else if c.is_ascii_digit() || matches!(c, '+' | '-' | 'e' | 'E') {
                normalized.push(c);
            } else {
                return None;
            }
        }
        normalized
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }

    /// Parse a date or date-time: ISO 8601 first, then the culture's forms.
    pub fn parse_date(&self, text: &str) -> Option<NaiveDateTime> {
        let datetime_formats = ISO_DATETIME_FORMATS.iter().chain(self.datetime_formats);
        for format in datetime_formats {
            if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
                return Some(value);
            }
        }
        let date_formats = ISO_DATE_FORMATS.iter().chain(self.date_formats);
        for format in date_formats {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return date.and_hms_opt(0, 0, 0);
            }
        }
        None
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::INVARIANT
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl FromStr for Culture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|culture| culture.name).collect();
            format!("Unknown culture: {s} (expected one of {})", known.join(", "))
        })
    }
}
