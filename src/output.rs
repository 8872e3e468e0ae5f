// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::error::OutputError;
use crate::known::KnownUrls;

/// Marker that starts a metadata line in a URL list
pub const COMMENT_MARKER: char = '#';

/// Whether a URL list replaces or extends the target file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Overwrite,
    Append,
}

/// Remove duplicates while keeping each URL at its first position
pub fn dedup_preserving_order<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    urls.into_iter().collect::<KnownUrls>().into_vec()
}

/// Render the text that `write_url_list` puts into the file
pub fn render_url_list(urls: &[String], source_url: &str, mode: WriteMode) -> String {
    let mut content = match mode {
        WriteMode::Overwrite => format!(
            "# Podcast URLs extracted from {source_url}\n\
             # Total episodes: {}\n\
             # Generated by podharvest\n\n",
            urls.len()
        ),
        WriteMode::Append => format!("\n# Additional episodes from {source_url}\n"),
    };

    for url in urls {
        content.push_str(url);
        content.push('\n');
    }

    content
}

/// Write a URL list, either replacing the file or appending to it
pub fn write_url_list(
    path: &Path,
    urls: &[String],
    source_url: &str,
    mode: WriteMode,
) -> Result<(), OutputError> {
    let content = render_url_list(urls, source_url, mode);

    let mut options = OpenOptions::new();
    match mode {
        WriteMode::Overwrite => options.write(true).create(true).truncate(true),
        WriteMode::Append => options.append(true).create(true),
    };

    let write_failed = |source| OutputError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut file = options.open(path).map_err(write_failed)?;
    file.write_all(content.as_bytes()).map_err(write_failed)?;
    file.flush().map_err(write_failed)
}

/// Read the URLs of a list file, skipping blank lines and comments
pub fn read_url_list(path: &Path) -> Result<Vec<String>, OutputError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => OutputError::NotFound(path.to_path_buf()),
        _ => OutputError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    Ok(parse_url_list(&content))
}

/// Extract URLs from list file content
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.starts_with(COMMENT_MARKER))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
