// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use crate::error::MediaError;

use super::Transcript;

/// Width of the rule between preamble and transcript body
pub const RULE_WIDTH: usize = 80;

/// Title yielded by extractors that could not read one
const UNKNOWN_TITLE: &str = "Unknown";

/// Sanitize a title for use as a transcript file stem
///
/// Characters illegal in filenames become underscores, underscore runs
/// collapse, and leading/trailing underscores and dots are removed.
pub fn sanitize_stem(title: &str) -> String {
    let options = sanitize_filename::Options {
        replacement: "_",
        ..Default::default()
    };
    let replaced = sanitize_filename::sanitize_with_options(title, options);

    let mut collapsed = String::with_capacity(replaced.len());
    for c in replaced.chars() {
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }

    collapsed.trim_matches(|c| c == '_' || c == '.').to_string()
}

/// Pick a path in `dir` that does not exist yet for a transcript of `title`
///
/// Collisions get `_1`, `_2`, ... appended to the stem.
pub fn unique_transcript_path(dir: &Path, title: &str) -> PathBuf {
    let mut stem = sanitize_stem(title);
    if stem.is_empty() || stem == UNKNOWN_TITLE {
        stem = format!("transcript_{}", count_transcripts(dir) + 1);
    }

    let mut path = dir.join(format!("{stem}.txt"));
    let mut counter = 1;
    while path.exists() {
        path = dir.join(format!("{stem}_{counter}.txt"));
        counter += 1;
    }

    path
}

fn count_transcripts(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "txt"))
                .count()
        })
        .unwrap_or(0)
}

/// Render a transcript file: metadata preamble, rule, body
pub fn render_transcript(title: &str, url: &str, context: &str, transcript: &Transcript) -> String {
    format!(
        "Episode: {title}\nURL: {url}\nTranscribed: {context}\n\n{}\n\n{}",
        "-".repeat(RULE_WIDTH),
        transcript.text()
    )
}

/// Write a transcript into `dir` (created if missing) and return its path
pub fn save_transcript(
    dir: &Path,
    title: &str,
    url: &str,
    context: &str,
    transcript: &Transcript,
) -> Result<PathBuf, MediaError> {
    std::fs::create_dir_all(dir).map_err(|e| MediaError::CreateDirectoryFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let path = unique_transcript_path(dir, title);
    let content = render_transcript(title, url, context, transcript);

    std::fs::write(&path, content).map_err(|e| MediaError::WriteFailed {
        path: path.clone(),
        source: e,
    })?;

    Ok(path)
}
