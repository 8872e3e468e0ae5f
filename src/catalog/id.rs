// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use crate::error::CatalogError;

/// Numeric catalog identifier of a podcast (the `id123456` path segment)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PodcastId(u64);

impl PodcastId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Extract the podcast id from a catalog page URL
    ///
    /// Looks for the first `/id` followed by at least one digit anywhere in
    /// the input, e.g. `https://podcasts.apple.com/us/podcast/founders/id1141877104`.
    pub fn from_url(url: &str) -> Result<Self, CatalogError> {
        let digits = url
            .match_indices("/id")
            .map(|(pos, marker)| {
                url[pos + marker.len()..]
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect::<String>()
            })
            .find(|digits| !digits.is_empty())
            .ok_or_else(|| CatalogError::MissingPodcastId(url.to_string()))?;

        digits
            .parse()
            .map(Self)
            .map_err(|_| CatalogError::PodcastIdOutOfRange(digits))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PodcastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_store_url() {
        let id =
            PodcastId::from_url("https://podcasts.apple.com/us/podcast/founders/id1141877104")
                .unwrap();
        assert_eq!(id.get(), 1141877104);
    }

    #[test]
    fn extracts_id_followed_by_query() {
        let id = PodcastId::from_url("https://podcasts.apple.com/podcast/id123456?i=1000").unwrap();
        assert_eq!(id, PodcastId::new(123456));
    }

    #[test]
    fn skips_id_markers_without_digits() {
        let id = PodcastId::from_url("https://example.com/idea/podcast/id42").unwrap();
        assert_eq!(id.get(), 42);
    }

    #[test]
    fn rejects_url_without_id() {
        let err = PodcastId::from_url("https://podcasts.apple.com/us/podcast/founders").unwrap_err();
        assert!(matches!(err, CatalogError::MissingPodcastId(_)));
    }

    #[test]
    fn oversized_id_is_out_of_range() {
        let err = PodcastId::from_url("https://podcasts.apple.com/podcast/id123456789012345678901234")
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::PodcastIdOutOfRange(ref digits) if digits == "123456789012345678901234"
        ));
    }

    #[test]
    fn displays_bare_number() {
        assert_eq!(PodcastId::new(1141877104).to_string(), "1141877104");
    }
}
