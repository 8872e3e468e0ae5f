// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::PodcastId;

/// Slug used when a title has no usable characters at all
const EMPTY_SLUG: &str = "episode";

/// Check if a character survives slugification unchanged (whitelist approach)
fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

/// Turn an episode title into the slug used in store URLs
///
/// Lowercases the title, turns every character outside `[a-z0-9-]`
/// (whitespace included) into a dash, collapses dash runs and trims
/// dashes from both ends. Applying it twice yields the same slug.
pub fn slugify(title: &str) -> String {
    let replaced: String = title
        .to_lowercase()
        .chars()
        .map(|c| if is_slug_char(c) { c } else { '-' })
        .collect();

    collapse_dashes(&replaced).trim_matches('-').to_string()
}

/// Collapse runs of dashes into a single dash
fn collapse_dashes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last_was_dash = false;

    for c in s.chars() {
        if c == '-' {
            if !last_was_dash {
                result.push('-');
            }
            last_was_dash = true;
        } else {
            result.push(c);
            last_was_dash = false;
        }
    }

    result
}

/// Build the canonical store URL of an episode
pub fn canonical_episode_url(title: &str, podcast_id: PodcastId, episode_id: u64) -> String {
    let slug = slugify(title);
    let slug = if slug.is_empty() { EMPTY_SLUG } else { &slug };

    format!("https://podcasts.apple.com/us/podcast/{slug}/id{podcast_id}?i={episode_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_strips_punctuation() {
        assert_eq!(slugify("Episode #7: The Launch!"), "episode-7-the-launch");
    }

    #[test]
    fn slugify_is_idempotent() {
        let once = slugify("#300 Steve Jobs: Make Something Wonderful");
        assert_eq!(slugify(&once), once);
        assert_eq!(once, "300-steve-jobs-make-something-wonderful");
    }

    #[test]
    fn slugify_collapses_mixed_whitespace() {
        assert_eq!(slugify("a  \t b\n\nc"), "a-b-c");
    }

    #[test]
    fn slugify_replaces_apostrophes_with_dash() {
        assert_eq!(slugify("Don't Stop"), "don-t-stop");
    }

    #[test]
    fn slugify_replaces_non_ascii() {
        assert_eq!(slugify("Café Résumé"), "caf-r-sum");
    }

    #[test]
    fn slugify_handles_only_invalid_chars() {
        assert_eq!(slugify("!!! ???"), "");
    }

    #[test]
    fn canonical_url_embeds_ids() {
        assert_eq!(
            canonical_episode_url("Ep One", PodcastId::new(1141877104), 10),
            "https://podcasts.apple.com/us/podcast/ep-one/id1141877104?i=10"
        );
    }

    #[test]
    fn canonical_url_falls_back_for_empty_slug() {
        assert_eq!(
            canonical_episode_url("???", PodcastId::new(1), 2),
            "https://podcasts.apple.com/us/podcast/episode/id1?i=2"
        );
    }
}
