// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use chrono::Local;

use crate::error::MediaError;
use crate::progress::{ProgressEvent, SharedProgressReporter};

use super::transcript_file::RULE_WIDTH;
use super::{AudioExtractor, Transcriber, Transcript, save_transcript};

/// Options for the media pipeline
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Whisper model size (tiny, base, small, medium, large)
    pub model: String,
    /// Directory transcript files are written to
    pub transcripts_dir: PathBuf,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            model: "base".to_string(),
            transcripts_dir: PathBuf::from("transcripts"),
        }
    }
}

/// A URL that made it through download, transcription and saving
#[derive(Debug, Clone)]
pub struct ProcessedUrl {
    pub url: String,
    pub title: String,
    pub transcript: Transcript,
    pub path: PathBuf,
}

/// Result of processing a list of URLs
#[derive(Debug, Default)]
pub struct BatchResult {
    pub processed: Vec<ProcessedUrl>,
    /// URLs that failed, with the error message
    pub failed: Vec<(String, String)>,
}

/// Download, transcribe and save a single URL
///
/// Audio lands in a temporary directory that is removed when this returns,
/// whether it succeeds or not.
pub async fn process_url<E, T>(
    extractor: &E,
    transcriber: &T,
    url: &str,
    options: &ProcessOptions,
    reporter: &SharedProgressReporter,
) -> Result<ProcessedUrl, MediaError>
where
    E: AudioExtractor + ?Sized,
    T: Transcriber + ?Sized,
{
    let work_dir = tempfile::tempdir().map_err(MediaError::TempDirFailed)?;

    let audio = extractor.download_audio(url, work_dir.path()).await?;
    reporter.report(ProgressEvent::AudioDownloaded {
        title: audio.title.clone(),
    });

    reporter.report(ProgressEvent::Transcribing {
        model: options.model.clone(),
    });
    let transcript = transcriber.transcribe(&audio.path, &options.model).await;
    if let Transcript::Placeholder(reason) = &transcript {
        reporter.report(ProgressEvent::PlaceholderTranscript {
            reason: reason.clone(),
        });
    }

    let context = format!(
        "{} with whisper model {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        options.model
    );
    let path = save_transcript(
        &options.transcripts_dir,
        &audio.title,
        url,
        &context,
        &transcript,
    )?;
    reporter.report(ProgressEvent::TranscriptSaved { path: path.clone() });

    Ok(ProcessedUrl {
        url: url.to_string(),
        title: audio.title,
        transcript,
        path,
    })
}

/// Process every URL in order; a failing URL is recorded and skipped
pub async fn process_batch<E, T>(
    extractor: &E,
    transcriber: &T,
    urls: &[String],
    options: &ProcessOptions,
    reporter: &SharedProgressReporter,
) -> BatchResult
where
    E: AudioExtractor + ?Sized,
    T: Transcriber + ?Sized,
{
    let mut result = BatchResult::default();

    for (index, url) in urls.iter().enumerate() {
        reporter.report(ProgressEvent::ProcessingUrl {
            index,
            total: urls.len(),
            url: url.clone(),
        });

        match process_url(extractor, transcriber, url, options, reporter).await {
            Ok(processed) => result.processed.push(processed),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "failed to process URL");
                reporter.report(ProgressEvent::UrlFailed {
                    url: url.clone(),
                    error: e.to_string(),
                });
                result.failed.push((url.clone(), e.to_string()));
            }
        }
    }

    result
}

/// Join transcripts into one text, each preceded by its source details
pub fn combine_transcripts(processed: &[ProcessedUrl]) -> String {
    processed
        .iter()
        .map(|item| {
            format!(
                "Episode: {}\nURL: {}\nFile: {}\n{}\n{}",
                item.title,
                item.url,
                item.path.display(),
                "-".repeat(RULE_WIDTH),
                item.transcript.text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::tempdir;

    use crate::media::DownloadedAudio;
    use crate::progress::NoopReporter;

    /// Writes a fake audio file; URLs containing "broken" fail after writing
    #[derive(Default)]
    struct FakeExtractor {
        work_dirs: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl AudioExtractor for FakeExtractor {
        async fn download_audio(
            &self,
            url: &str,
            output_dir: &Path,
        ) -> Result<DownloadedAudio, MediaError> {
            self.work_dirs.lock().unwrap().push(output_dir.to_path_buf());

            let title = url.rsplit('/').next().unwrap_or("Unknown").to_string();
            let path = output_dir.join(format!("{title}.mp3"));
            std::fs::write(&path, b"fake audio").unwrap();

            if url.contains("broken") {
                return Err(MediaError::DownloadFailed {
                    url: url.to_string(),
                    stderr: "ERROR: Unsupported URL".to_string(),
                });
            }

            Ok(DownloadedAudio { path, title })
        }
    }

    struct EchoTranscriber;

    #[async_trait]
    impl Transcriber for EchoTranscriber {
        async fn transcribe(&self, audio: &Path, model: &str) -> Transcript {
            let name = audio.file_name().unwrap().to_string_lossy();
            Transcript::Real(format!("{name} via {model}"))
        }
    }

    struct MissingTranscriber;

    #[async_trait]
    impl Transcriber for MissingTranscriber {
        async fn transcribe(&self, audio: &Path, _model: &str) -> Transcript {
            Transcript::unavailable(audio)
        }
    }

    fn options_in(dir: &Path) -> ProcessOptions {
        ProcessOptions {
            model: "tiny".to_string(),
            transcripts_dir: dir.join("transcripts"),
        }
    }

    #[tokio::test]
    async fn processes_url_and_removes_work_dir() {
        let dir = tempdir().unwrap();
        let extractor = FakeExtractor::default();

        let processed = process_url(
            &extractor,
            &EchoTranscriber,
            "https://example.com/Launch Day",
            &options_in(dir.path()),
            &NoopReporter::shared(),
        )
        .await
        .unwrap();

        assert_eq!(processed.title, "Launch Day");
        assert_eq!(
            processed.transcript,
            Transcript::Real("Launch Day.mp3 via tiny".to_string())
        );
        assert_eq!(
            processed.path,
            dir.path().join("transcripts").join("Launch Day.txt")
        );
        let content = std::fs::read_to_string(&processed.path).unwrap();
        assert!(content.ends_with("Launch Day.mp3 via tiny"));

        let work_dirs = extractor.work_dirs.lock().unwrap();
        assert!(!work_dirs[0].exists());
    }

    #[tokio::test]
    async fn failed_download_still_removes_work_dir() {
        let dir = tempdir().unwrap();
        let extractor = FakeExtractor::default();

        let err = process_url(
            &extractor,
            &EchoTranscriber,
            "https://example.com/broken",
            &options_in(dir.path()),
            &NoopReporter::shared(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MediaError::DownloadFailed { .. }));
        assert!(!extractor.work_dirs.lock().unwrap()[0].exists());
        assert!(!dir.path().join("transcripts").exists());
    }

    #[tokio::test]
    async fn missing_transcriber_saves_placeholder() {
        let dir = tempdir().unwrap();

        let processed = process_url(
            &FakeExtractor::default(),
            &MissingTranscriber,
            "https://example.com/Quiet",
            &options_in(dir.path()),
            &NoopReporter::shared(),
        )
        .await
        .unwrap();

        assert!(processed.transcript.is_placeholder());
        let content = std::fs::read_to_string(&processed.path).unwrap();
        assert!(content.contains("[PLACEHOLDER TRANSCRIPT] Audio file: Quiet.mp3"));
    }

    #[tokio::test]
    async fn batch_continues_past_failures() {
        let dir = tempdir().unwrap();
        let urls = vec![
            "https://example.com/One".to_string(),
            "https://example.com/broken".to_string(),
            "https://example.com/One".to_string(),
        ];

        let result = process_batch(
            &FakeExtractor::default(),
            &EchoTranscriber,
            &urls,
            &options_in(dir.path()),
            &NoopReporter::shared(),
        )
        .await;

        assert_eq!(result.processed.len(), 2);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].0, "https://example.com/broken");

        let transcripts = dir.path().join("transcripts");
        assert_eq!(result.processed[0].path, transcripts.join("One.txt"));
        assert_eq!(result.processed[1].path, transcripts.join("One_1.txt"));
    }

    #[test]
    fn combined_text_separates_transcripts() {
        let processed = vec![
            ProcessedUrl {
                url: "https://example.com/a".to_string(),
                title: "A".to_string(),
                transcript: Transcript::Real("alpha".to_string()),
                path: PathBuf::from("transcripts/A.txt"),
            },
            ProcessedUrl {
                url: "https://example.com/b".to_string(),
                title: "B".to_string(),
                transcript: Transcript::Real("beta".to_string()),
                path: PathBuf::from("transcripts/B.txt"),
            },
        ];

        let combined = combine_transcripts(&processed);
        let rule = "-".repeat(80);

        assert_eq!(
            combined,
            format!(
                "Episode: A\nURL: https://example.com/a\nFile: transcripts/A.txt\n{rule}\nalpha\n\n\
                 Episode: B\nURL: https://example.com/b\nFile: transcripts/B.txt\n{rule}\nbeta"
            )
        );
    }
}
