// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod clipboard;
mod extract;
mod process;
mod transcribe;
mod transcript_file;

pub use clipboard::{Clipboard, Handoff, SystemClipboard, copy_to_clipboard, hand_off_text};
pub use extract::{AudioExtractor, DownloadedAudio, YtDlpExtractor};
pub use process::{
    BatchResult, ProcessOptions, ProcessedUrl, combine_transcripts, process_batch, process_url,
};
pub use transcribe::{Transcriber, Transcript, WhisperCli};
pub use transcript_file::{render_transcript, sanitize_stem, save_transcript, unique_transcript_path};
