//! The two content locales.
//!
//! Every post exists in exactly these two languages. The set is closed: a
//! locale is an enum variant, never a free-form string, so a per-locale table
//! can be a fixed-size array indexed by [`Locale::index`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported locale '{0}' (expected one of: en, fr)")]
pub struct UnknownLocale(pub String);

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    /// Number of supported locales.
    pub const COUNT: usize = 2;

    /// All supported locales, in canonical order.
    pub const ALL: [Locale; Locale::COUNT] = [Locale::En, Locale::Fr];

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }

    /// Position of this locale in [`Locale::ALL`].
    pub fn index(self) -> usize {
        match self {
            Locale::En => 0,
            Locale::Fr => 1,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "fr" => Ok(Locale::Fr),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}
