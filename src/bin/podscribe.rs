// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use podharvest::media::{
    Handoff, ProcessOptions, SystemClipboard, WhisperCli, YtDlpExtractor, combine_transcripts,
    copy_to_clipboard, hand_off_text, process_batch, process_url,
};
use podharvest::{
    NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter, read_url_list,
};

static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static WRITING: Emoji<'_, '_> = Emoji("📝 ", "[w] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static CLIPBOARD: Emoji<'_, '_> = Emoji("📋 ", "[c] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

/// Download audio from media URLs and transcribe it with whisper
#[derive(Parser, Debug)]
#[command(name = "podscribe")]
#[command(about = "Download audio from media URLs and transcribe it with whisper")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Quiet mode - suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// yt-dlp executable
    #[arg(long, env = "YT_DLP_PATH", default_value = "yt-dlp", global = true)]
    yt_dlp: String,

    /// whisper executable
    #[arg(long, env = "WHISPER_PATH", default_value = "whisper", global = true)]
    whisper: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transcribe every URL listed in a file
    ProcessUrls {
        /// File with one URL per line; '#' starts a comment
        file: PathBuf,

        /// Whisper model size (tiny, base, small, medium, large)
        #[arg(short, long, default_value = "base")]
        model: String,

        /// Do not copy the combined transcripts to the clipboard
        #[arg(long)]
        no_clipboard: bool,

        /// Directory transcripts are written to
        #[arg(short = 'd', long, default_value = "transcripts")]
        transcripts_dir: PathBuf,
    },

    /// Transcribe a single URL
    SingleUrl {
        url: String,

        /// Whisper model size (tiny, base, small, medium, large)
        #[arg(short, long, default_value = "base")]
        model: String,

        /// Print the transcript instead of copying it to the clipboard
        #[arg(long)]
        no_clipboard: bool,

        /// Directory transcripts are written to
        #[arg(short = 'd', long, default_value = "transcripts")]
        transcripts_dir: PathBuf,
    },
}

/// Progress reporter using an indicatif spinner for terminal output
struct IndicatifReporter {
    main_bar: ProgressBar,
}

impl IndicatifReporter {
    fn new() -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap();

        let main_bar = ProgressBar::new_spinner();
        main_bar.set_style(style);
        main_bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self { main_bar }
    }
}

impl ProgressReporter for IndicatifReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::ProcessingUrl { index, total, url } => {
                self.main_bar.println(format!(
                    "\n[{}/{}] {}",
                    (index + 1).to_string().cyan(),
                    total.to_string().cyan(),
                    url.dimmed()
                ));
                self.main_bar
                    .set_message(format!("{DOWNLOAD}Downloading audio"));
            }

            ProgressEvent::AudioDownloaded { title } => {
                self.main_bar
                    .println(format!("  {DOWNLOAD}{}", title.bold()));
            }

            ProgressEvent::Transcribing { model } => {
                self.main_bar.set_message(format!(
                    "{WRITING}Transcribing with model {}",
                    model.cyan()
                ));
            }

            ProgressEvent::PlaceholderTranscript { reason } => {
                let first_line = reason.lines().next().unwrap_or_default();
                self.main_bar
                    .println(format!("  {WARNING}{}", first_line.yellow()));
            }

            ProgressEvent::TranscriptSaved { path } => {
                self.main_bar.println(format!(
                    "  {SUCCESS}Saved {}",
                    path.display().to_string().green()
                ));
            }

            ProgressEvent::UrlFailed { url, error } => {
                self.main_bar.println(format!(
                    "  {FAILURE}{} - {}",
                    url.red(),
                    error.red()
                ));
            }

            // Catalog events belong to podharvest
            _ => {}
        }
    }
}

impl Drop for IndicatifReporter {
    fn drop(&mut self) {
        self.main_bar.finish_and_clear();
    }
}

/// Log to stderr so progress output on stdout stays readable
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

async fn detect_whisper(program: &str, quiet: bool) -> WhisperCli {
    let whisper = WhisperCli::detect_program(program).await;
    if !whisper.is_available() && !quiet {
        println!(
            "{WARNING}{} {}\n",
            "whisper not found, writing placeholder transcripts.".yellow(),
            "Install it with: pip install openai-whisper".dimmed()
        );
    }
    whisper
}

fn make_reporter(quiet: bool) -> SharedProgressReporter {
    if quiet {
        NoopReporter::shared()
    } else {
        Arc::new(IndicatifReporter::new())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "podscribe".bold().magenta(),
            "- Media Transcriber".dimmed()
        );
    }

    let extractor = YtDlpExtractor::with_program(args.yt_dlp);
    let whisper = detect_whisper(&args.whisper, args.quiet).await;

    match args.command {
        Command::ProcessUrls {
            file,
            model,
            no_clipboard,
            transcripts_dir,
        } => {
            let urls = read_url_list(&file).context("Failed to read URL list")?;
            if urls.is_empty() {
                bail!("No URLs found in {}", file.display());
            }

            let options = ProcessOptions {
                model,
                transcripts_dir,
            };
            let reporter = make_reporter(args.quiet);
            let result = process_batch(&extractor, &whisper, &urls, &options, &reporter).await;
            drop(reporter);

            if !result.processed.is_empty() && !no_clipboard {
                let combined = combine_transcripts(&result.processed);
                if copy_to_clipboard(&SystemClipboard, &combined) && !args.quiet {
                    println!(
                        "\n{CLIPBOARD}Copied {} transcripts to the clipboard",
                        result.processed.len().to_string().cyan()
                    );
                }
            }

            if !args.quiet {
                println!(
                    "\n{PARTY}{} {} processed, {} failed",
                    "Done:".bold().green(),
                    result.processed.len().to_string().green().bold(),
                    if result.failed.is_empty() {
                        "0".green()
                    } else {
                        result.failed.len().to_string().red().bold()
                    }
                );

                if !result.failed.is_empty() {
                    println!("\n{}", "Failed URLs:".red().bold());
                    for (url, error) in &result.failed {
                        println!("  {}{} - {}", CROSS, url.yellow(), error.dimmed());
                    }
                }

                println!(
                    "\n{FOLDER}Transcripts: {}\n",
                    options.transcripts_dir.display().to_string().cyan()
                );
            }

            if result.processed.is_empty() && !args.quiet {
                println!("{}", "No transcripts were generated".red());
            }
        }

        Command::SingleUrl {
            url,
            model,
            no_clipboard,
            transcripts_dir,
        } => {
            let options = ProcessOptions {
                model,
                transcripts_dir,
            };
            let reporter = make_reporter(args.quiet);
            let processed = process_url(&extractor, &whisper, &url, &options, &reporter).await;
            drop(reporter);

            let processed = processed.context("Failed to process URL")?;

            let clipboard = (!no_clipboard).then_some(&SystemClipboard);
            let handoff = hand_off_text(
                clipboard,
                processed.transcript.text(),
                &mut std::io::stdout(),
            )
            .context("Failed to print transcript")?;

            if !args.quiet {
                if handoff == Handoff::Copied {
                    println!("\n{CLIPBOARD}Transcript copied to the clipboard");
                }
                println!(
                    "\n{PARTY}{} {}",
                    "Transcript saved:".bold().green(),
                    processed.path.display().to_string().cyan()
                );
            }
        }
    }

    Ok(())
}
