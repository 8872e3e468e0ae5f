// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::MediaError;

/// Audio file produced by an extractor
#[derive(Debug, Clone)]
pub struct DownloadedAudio {
    pub path: PathBuf,
    pub title: String,
}

/// Downloads the best available audio of a media URL
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Download audio for `url` into `output_dir`
    async fn download_audio(&self, url: &str, output_dir: &Path)
    -> Result<DownloadedAudio, MediaError>;
}

/// Audio extractor backed by the yt-dlp executable
pub struct YtDlpExtractor {
    program: String,
}

impl YtDlpExtractor {
    pub fn new() -> Self {
        Self::with_program("yt-dlp")
    }

    /// Use a specific yt-dlp executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioExtractor for YtDlpExtractor {
    async fn download_audio(
        &self,
        url: &str,
        output_dir: &Path,
    ) -> Result<DownloadedAudio, MediaError> {
        tracing::debug!(url, program = %self.program, "downloading audio");

        let output = Command::new(&self.program)
            .args([
                "--no-playlist",
                "--no-simulate",
                "--format",
                "bestaudio/best",
                "--extract-audio",
                "--audio-format",
                "mp3",
                "--audio-quality",
                "192K",
                // first line: title, last line: final file path
                "--print",
                "before_dl:title",
                "--print",
                "after_move:filepath",
                "--output",
            ])
            .arg(output_dir.join("%(title)s.%(ext)s"))
            .arg(url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| MediaError::SpawnFailed {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(MediaError::DownloadFailed {
                url: url.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let (title, printed_path) = parse_printed_output(&stdout)
            .ok_or_else(|| MediaError::MissingAudio(url.to_string()))?;

        let path = locate_audio(&printed_path, output_dir)
            .ok_or_else(|| MediaError::MissingAudio(url.to_string()))?;

        Ok(DownloadedAudio { path, title })
    }
}

/// Split yt-dlp's printed lines into title and file path
fn parse_printed_output(stdout: &str) -> Option<(String, PathBuf)> {
    let mut lines = stdout.lines().map(str::trim).filter(|line| !line.is_empty());
    let title = lines.next()?;
    let path = lines.next_back()?;

    Some((title.to_string(), PathBuf::from(path)))
}

/// The printed path if it exists, else the first file left in the output directory
fn locate_audio(printed: &Path, output_dir: &Path) -> Option<PathBuf> {
    if printed.is_file() {
        return Some(printed.to_path_buf());
    }

    std::fs::read_dir(output_dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .find(|path| path.is_file())
}
