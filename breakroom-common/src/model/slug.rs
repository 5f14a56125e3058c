use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

pub const SLUG_MAX_LEN: usize = 96;

/// URL-safe post identifier: ASCII alphanumerics, `-` and `_`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The slug is invalid: {0:?}")]
pub struct InvalidSlugError(String);

impl Slug {
    pub fn new(slug: String) -> Result<Self, InvalidSlugError> {
        let valid = !slug.is_empty()
            && slug.len() <= SLUG_MAX_LEN
            && slug
                .bytes()
                .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_');

        if valid {
            Ok(Slug(slug))
        } else {
            Err(InvalidSlugError(slug))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for Slug {
    type Err = InvalidSlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<'de> Deserialize<'de> for Slug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        Slug::new(inner).map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"Slug"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_validation() {
        let longest = "x".repeat(SLUG_MAX_LEN);
        let too_long = "x".repeat(SLUG_MAX_LEN + 1);

        let legal_slugs = ["hello-world", "post_2024", "a", longest.as_str()];
        let illegal_slugs = ["", "with space", "ümlaut", "../etc", too_long.as_str()];

        for legal_slug in legal_slugs {
            assert!(legal_slug.parse::<Slug>().is_ok(), "{legal_slug:?}");
        }
        for illegal_slug in illegal_slugs {
            assert!(illegal_slug.parse::<Slug>().is_err(), "{illegal_slug:?}");
        }
    }

    #[test]
    fn slug_deserialize() {
        let slug: Slug = serde_json::from_str(r#""my-first-post""#).unwrap();
        assert_eq!(slug.get(), "my-first-post");

        assert!(serde_json::from_str::<Slug>(r#""not a slug""#).is_err());
    }
}
