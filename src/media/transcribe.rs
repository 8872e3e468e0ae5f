// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::MediaError;

/// Transcript text, or a marked stand-in when no real one could be produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript {
    Real(String),
    Placeholder(String),
}

impl Transcript {
    /// Stand-in used when no speech-to-text engine is installed
    pub fn unavailable(audio: &Path) -> Self {
        Self::Placeholder(format!(
            "[PLACEHOLDER TRANSCRIPT] Audio file: {}\n\
             This would contain the actual transcription when whisper is installed \
             (pip install openai-whisper).",
            file_name(audio)
        ))
    }

    /// Stand-in used when the engine ran but failed
    pub fn failed(error: &MediaError) -> Self {
        Self::Placeholder(format!("[ERROR] Failed to transcribe: {error}"))
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Real(text) | Self::Placeholder(text) => text,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Speech-to-text capability
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file with the given model size
    ///
    /// Never fails: problems are reported through `Transcript::Placeholder`.
    async fn transcribe(&self, audio: &Path, model: &str) -> Transcript;
}

/// Transcriber backed by the `whisper` command line tool
#[derive(Debug, Clone)]
pub struct WhisperCli {
    program: String,
    available: bool,
}

impl WhisperCli {
    /// Probe for `whisper` on the PATH
    pub async fn detect() -> Self {
        Self::detect_program("whisper").await
    }

    /// Probe for a specific whisper executable
    pub async fn detect_program(program: impl Into<String>) -> Self {
        let program = program.into();
        let available = Command::new(&program)
            .arg("--help")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .is_ok_and(|status| status.success());

        tracing::debug!(program = %program, available, "whisper detection");
        Self { program, available }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    async fn run(&self, audio: &Path, model: &str) -> Result<String, MediaError> {
        let output_dir = tempfile::tempdir().map_err(MediaError::TempDirFailed)?;

        let output = Command::new(&self.program)
            .arg(audio)
            .arg("--model")
            .arg(model)
            .arg("--output_dir")
            .arg(output_dir.path())
            .arg("--output_format")
            .arg("txt")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| MediaError::SpawnFailed {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(MediaError::TranscriptionFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let stem = audio.file_stem().unwrap_or_default().to_string_lossy();
        let text_path = output_dir.path().join(format!("{stem}.txt"));
        let text = tokio::fs::read_to_string(&text_path)
            .await
            .map_err(|e| MediaError::TranscriptionFailed(format!("no transcript written: {e}")))?;

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl Transcriber for WhisperCli {
    async fn transcribe(&self, audio: &Path, model: &str) -> Transcript {
        if !self.available {
            return Transcript::unavailable(audio);
        }

        match self.run(audio, model).await {
            Ok(text) => Transcript::Real(text),
            Err(e) => {
                tracing::warn!(audio = %audio.display(), error = %e, "transcription failed");
                Transcript::failed(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_names_the_audio_file() {
        let transcript = Transcript::unavailable(Path::new("/tmp/xyz/My Episode.mp3"));

        assert!(transcript.is_placeholder());
        assert!(
            transcript
                .text()
                .starts_with("[PLACEHOLDER TRANSCRIPT] Audio file: My Episode.mp3\n")
        );
    }

    #[test]
    fn failure_placeholder_carries_error() {
        let transcript = Transcript::failed(&MediaError::TranscriptionFailed("boom".to_string()));

        assert!(transcript.is_placeholder());
        assert_eq!(
            transcript.text(),
            "[ERROR] Failed to transcribe: Transcription failed: boom"
        );
    }

    #[test]
    fn real_transcript_is_not_placeholder() {
        let transcript = Transcript::Real("hello".to_string());
        assert!(!transcript.is_placeholder());
        assert_eq!(transcript.text(), "hello");
    }

    #[tokio::test]
    async fn missing_whisper_yields_placeholder() {
        let whisper = WhisperCli::detect_program("podharvest-no-such-whisper").await;
        assert!(!whisper.is_available());

        let transcript = whisper
            .transcribe(Path::new("/tmp/episode.mp3"), "base")
            .await;

        assert_eq!(transcript, Transcript::unavailable(Path::new("/tmp/episode.mp3")));
    }
}
