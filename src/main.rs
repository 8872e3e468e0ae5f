// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use podharvest::catalog::DEFAULT_API_BASE;
use podharvest::validate::DEFAULT_PROBE_DELAY;
use podharvest::{
    ApiEndpoints, EpisodeRange, NoopReporter, PodcastId, ProgressEvent, ProgressReporter,
    ReqwestClient, ScrapeOptions, SearchOptions, SearchStop, SharedProgressReporter,
    ValidationReport, WriteMode, lookup_podcast_info, read_url_list, scrape_podcast,
    validate_urls,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static FOUND: Emoji<'_, '_> = Emoji("✨ ", "[+] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");

/// Number of URLs shown after a scrape
const PREVIEW_LEN: usize = 5;

/// Collect podcast episode URLs from the Apple Podcasts catalog
#[derive(Parser, Debug)]
#[command(name = "podharvest")]
#[command(about = "Collect podcast episode URLs from the Apple Podcasts catalog")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Quiet mode - suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Base URL of the catalog API
    #[arg(long, env = "PODHARVEST_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    api_base: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect all episode URLs of a podcast into a file
    Scrape(ScrapeArgs),

    /// Check that the URLs in a file are reachable
    ValidateFile {
        /// URL list written by `scrape`
        path: PathBuf,

        /// Number of URLs to probe
        #[arg(short, long, default_value = "20")]
        sample: usize,
    },

    /// Show catalog details of a podcast
    Info {
        /// Apple Podcasts URL of the show
        url: String,
    },
}

#[derive(ClapArgs, Debug)]
struct ScrapeArgs {
    /// Apple Podcasts URL of the show (must contain /id<digits>)
    url: String,

    /// File the URL list is written to
    #[arg(short, long, default_value = "podcast_urls.txt")]
    output: PathBuf,

    /// Skip the episode-number search for older episodes
    #[arg(long)]
    no_search_older: bool,

    /// Episode numbers to search, as START-END
    #[arg(short, long, default_value = "1-200")]
    range: EpisodeRange,

    /// Maximum number of search requests
    #[arg(long, default_value = "100")]
    max_requests: usize,

    /// Show name used in search queries (defaults to the catalog name)
    #[arg(long)]
    search_term: Option<String>,

    /// Skip probing a sample of the collected URLs
    #[arg(long)]
    no_validate: bool,

    /// Append to the output file instead of overwriting it
    #[arg(short, long)]
    append: bool,
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
            ProgressEvent::LookupStarted { podcast_id } => {
                self.main_bar.set_message(format!(
                    "{SEARCH}Looking up recent episodes of podcast {}",
                    podcast_id.cyan()
                ));
            }

            ProgressEvent::LookupCompleted { episodes } => {
                self.main_bar.println(format!(
                    "{HEADPHONES}Lookup returned {} recent episodes",
                    episodes.to_string().cyan()
                ));
            }

            ProgressEvent::LookupFailed { error } => {
                self.main_bar.println(format!(
                    "{WARNING}{} {}",
                    "Lookup failed:".yellow(),
                    error.dimmed()
                ));
            }

            ProgressEvent::SearchStarted { start, end } => {
                self.main_bar.set_message(format!(
                    "{SEARCH}Searching for older episodes {}",
                    format!("{start}-{end}").cyan()
                ));
            }

            ProgressEvent::SearchHit { index, title } => {
                self.main_bar.println(format!(
                    "  {FOUND}Episode {}: {}",
                    index.to_string().cyan(),
                    truncate_title(&title, 60).green()
                ));
                self.main_bar.set_message(format!(
                    "{SEARCH}Searching for older episodes (at {})",
                    index.to_string().cyan()
                ));
            }

            ProgressEvent::SearchFinished {
                found,
                requests_made,
                stop,
            } => {
                let stop = match stop {
                    SearchStop::Completed => stop.to_string().green(),
                    _ => stop.to_string().yellow(),
                };
                self.main_bar.println(format!(
                    "{SEARCH}Search found {} new episodes in {} requests ({stop})",
                    found.to_string().green().bold(),
                    requests_made.to_string().cyan()
                ));
            }

            ProgressEvent::ValidationStarted { sample } => {
                self.main_bar.set_message(format!(
                    "{SEARCH}Validating {} URLs",
                    sample.to_string().cyan()
                ));
            }

            // Media events belong to podscribe
            _ => {}
        }
    }
}

impl Drop for IndicatifReporter {
    fn drop(&mut self) {
        self.main_bar.finish_and_clear();
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let kept: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
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

fn print_validation(report: &ValidationReport) {
    let line = format!(
        "{}/{} URLs accessible ({:.1}%)",
        report.accessible,
        report.checked,
        report.success_rate()
    );
    if report.accessible == report.checked {
        println!("{SUCCESS}Validation: {}", line.green());
    } else {
        println!("{WARNING}Validation: {}", line.yellow());
    }
}

async fn run_scrape(
    client: &ReqwestClient,
    endpoints: &ApiEndpoints,
    args: ScrapeArgs,
    quiet: bool,
) -> Result<()> {
    let options = ScrapeOptions {
        search_older: !args.no_search_older,
        search: SearchOptions {
            range: args.range,
            max_requests: args.max_requests,
            ..SearchOptions::default()
        },
        search_term: args.search_term,
        validate: !args.no_validate,
        mode: if args.append {
            WriteMode::Append
        } else {
            WriteMode::Overwrite
        },
        ..ScrapeOptions::default()
    };

    let reporter: SharedProgressReporter = if quiet {
        NoopReporter::shared()
    } else {
        Arc::new(IndicatifReporter::new())
    };

    let result = scrape_podcast(
        client,
        endpoints,
        &args.url,
        &args.output,
        &options,
        &reporter,
    )
    .await
    .context("Failed to scrape podcast")?;
    drop(reporter);

    if quiet {
        return Ok(());
    }

    println!(
        "\n{PARTY}{} {} unique episode URLs ({} from lookup)",
        "Scrape complete:".bold().green(),
        result.urls.len().to_string().green().bold(),
        result.recent_count.to_string().cyan()
    );

    println!("\n{}", "First URLs:".bold());
    for (i, url) in result.urls.iter().take(PREVIEW_LEN).enumerate() {
        println!("  {}. {}", i + 1, url.dimmed());
    }
    if result.urls.len() > PREVIEW_LEN {
        println!("  ... and {} more", result.urls.len() - PREVIEW_LEN);
    }

    if let Some(report) = &result.validation {
        println!();
        print_validation(report);
    }

    println!(
        "\n{FOLDER}Output: {}\n",
        args.output.display().to_string().cyan()
    );

    Ok(())
}

async fn run_validate_file(
    client: &ReqwestClient,
    path: PathBuf,
    sample: usize,
    quiet: bool,
) -> Result<()> {
    let urls = read_url_list(&path).context("Failed to read URL list")?;
    if urls.is_empty() {
        bail!("No URLs found in {}", path.display());
    }

    let reporter: SharedProgressReporter = if quiet {
        NoopReporter::shared()
    } else {
        Arc::new(IndicatifReporter::new())
    };

    let report = validate_urls(client, &urls, sample, DEFAULT_PROBE_DELAY, &reporter).await;
    drop(reporter);

    if !quiet {
        println!(
            "{HEADPHONES}{} URLs in {}",
            urls.len().to_string().cyan(),
            path.display()
        );
        print_validation(&report);
    }

    Ok(())
}

async fn run_info(client: &ReqwestClient, endpoints: &ApiEndpoints, url: &str) -> Result<()> {
    let podcast_id = PodcastId::from_url(url)?;
    let info = lookup_podcast_info(client, endpoints, podcast_id)
        .await
        .context("Failed to look up podcast")?;

    let or_unknown = |value: Option<String>| value.unwrap_or_else(|| "Unknown".to_string());

    println!(
        "{HEADPHONES}{}",
        or_unknown(info.name).bold().green()
    );
    println!("  {} {}", "Artist:".bold(), or_unknown(info.artist));
    println!("  {} {}", "Genre:".bold(), or_unknown(info.genre));
    println!(
        "  {} {}",
        "Episodes:".bold(),
        or_unknown(info.episode_count.map(|n| n.to_string())).cyan()
    );
    println!("  {} {}", "Country:".bold(), or_unknown(info.country));
    println!("  {} {}", "RSS feed:".bold(), or_unknown(info.feed_url).dimmed());
    println!("  {} {}", "Store page:".bold(), or_unknown(info.store_url).dimmed());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "podharvest".bold().magenta(),
            "- Podcast URL Collector".dimmed()
        );
    }

    let client = ReqwestClient::new();
    let endpoints = ApiEndpoints::new(args.api_base);

    match args.command {
        Command::Scrape(scrape) => run_scrape(&client, &endpoints, scrape, args.quiet).await,
        Command::ValidateFile { path, sample } => {
            run_validate_file(&client, path, sample, args.quiet).await
        }
        Command::Info { url } => run_info(&client, &endpoints, &url).await,
    }
}
