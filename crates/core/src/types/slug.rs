//! URL slug type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, checked by tests
    Regex::new(r"[^\w\s-]").unwrap()
});

static SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a literal, checked by tests
    Regex::new(r"[\s_-]+").unwrap()
});

/// A URL-safe product slug.
///
/// Slugs are derived deterministically from product names: the name is
/// lowercased and trimmed, characters outside `[A-Za-z0-9_ -]` are stripped,
/// runs of whitespace/underscores/hyphens collapse to a single hyphen, and
/// leading/trailing hyphens are removed. The same name always yields the same
/// slug.
///
/// ## Examples
///
/// ```
/// use debandi_core::Slug;
///
/// let slug = Slug::from_name("Taladro Profesional DeWalt 20V");
/// assert_eq!(slug.as_str(), "taladro-profesional-dewalt-20v");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a product name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let lowered = name.to_lowercase();
        let stripped = NON_WORD.replace_all(lowered.trim(), "");
        let hyphenated = SEPARATOR_RUN.replace_all(&stripped, "-");
        Self(hyphenated.trim_matches('-').to_owned())
    }

    /// Wrap an already-derived slug (e.g. from a route path segment).
    #[must_use]
    pub fn from_raw(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_name() {
        assert_eq!(
            Slug::from_name("Taladro Profesional DeWalt 20V").as_str(),
            "taladro-profesional-dewalt-20v"
        );
    }

    #[test]
    fn test_punctuation_stripped() {
        // Quotes and slashes are removed, the digit groups remain
        assert_eq!(
            Slug::from_name("Sierra Circular Makita 7 1/4\"").as_str(),
            "sierra-circular-makita-7-14"
        );
    }

    #[test]
    fn test_separator_runs_collapse() {
        assert_eq!(
            Slug::from_name("Mazo   de _ Goma -- 32oz").as_str(),
            "mazo-de-goma-32oz"
        );
    }

    #[test]
    fn test_edge_hyphens_trimmed() {
        assert_eq!(Slug::from_name("--Casco Amarillo--").as_str(), "casco-amarillo");
        assert_eq!(Slug::from_name("  ¡Oferta!  ").as_str(), "oferta");
    }

    #[test]
    fn test_deterministic() {
        let a = Slug::from_name("Juego 40 Destornilladores");
        let b = Slug::from_name("Juego 40 Destornilladores");
        assert_eq!(a, b);
    }

    #[test]
    fn test_serde_transparent() {
        let slug = Slug::from_name("Casco de Seguridad");
        let json = serde_json::to_string(&slug).unwrap();
        assert_eq!(json, "\"casco-de-seguridad\"");
    }
}
