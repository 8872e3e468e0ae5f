// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;

use crate::search::SearchStop;

/// Events emitted while scraping a catalog or processing media URLs
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The lookup call for recent episodes is being issued
    LookupStarted { podcast_id: String },

    /// The lookup call returned
    LookupCompleted { episodes: usize },

    /// The lookup call failed; the run continues with no recent episodes
    LookupFailed { error: String },

    /// Episode-number search is starting
    SearchStarted { start: u32, end: u32 },

    /// A previously unknown episode was found by search
    SearchHit { index: u32, title: String },

    /// Episode-number search ended
    SearchFinished {
        found: usize,
        requests_made: usize,
        stop: SearchStop,
    },

    /// A sample of URLs is about to be probed
    ValidationStarted { sample: usize },

    /// A URL is being processed by the media pipeline
    ProcessingUrl {
        /// Position of this URL in the batch (0-based)
        index: usize,
        total: usize,
        url: String,
    },

    /// Audio was extracted for the current URL
    AudioDownloaded { title: String },

    /// Transcription of the current URL is starting
    Transcribing { model: String },

    /// No real transcript could be produced; a placeholder is used instead
    PlaceholderTranscript { reason: String },

    /// Transcript file written
    TranscriptSaved { path: PathBuf },

    /// Processing of a single URL failed; the batch continues
    UrlFailed { url: String, error: String },
}

/// Trait for reporting progress events.
///
/// Implementations can use this to display spinners, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
