// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to the podcast catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Could not extract a podcast id from {0} (expected a path segment like /id123456)")]
    MissingPodcastId(String),

    #[error("Podcast id {0} is out of range")]
    PodcastIdOutOfRange(String),

    #[error("Failed to build catalog request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Catalog request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to parse catalog response: {0}")]
    ParseFailed(#[from] serde_json::Error),

    #[error("Podcast {0} not found in catalog")]
    NotFound(String),
}

/// Errors that can occur when parsing an episode range like "1-200"
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RangeError {
    #[error("Invalid range format: {0}. Use format like '1-100'")]
    InvalidFormat(String),

    #[error("Range start {start} is greater than end {end}")]
    Inverted { start: u32, end: u32 },
}

/// Errors that can occur when reading or writing URL lists
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("File {0} not found")]
    NotFound(PathBuf),

    #[error("Failed to read URL list {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write URL list {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while processing a media URL
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Failed to create temporary directory: {0}")]
    TempDirFailed(#[source] std::io::Error),

    #[error("Failed to run {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Audio download failed for {url}: {stderr}")]
    DownloadFailed { url: String, stderr: String },

    #[error("Downloader reported no audio file for {0}")]
    MissingAudio(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write transcript {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),
}

/// Top-level errors for a scrape run
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("No episode URLs found. The podcast might be private or the URL might be incorrect")]
    NothingFound,
}
