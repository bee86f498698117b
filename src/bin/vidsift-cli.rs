use std::{fs, path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use vidsift::{
    ImageAnalysis, Library, MatchResult, ProgressCallback, ProgressInfo, SearchMode,
    SearchOptions, SearchQuery, SubtitleLocator, TimestampPolicy, VideoInsights, VideoMetadata,
    format_timestamp, highlight, parse_seconds,
};

const CLI_AFTER_HELP: &str = "Examples:\n  vidsift search \"red car\" insights/*.json --json\n  vidsift image-search --analysis photo.json insights/*.json\n  vidsift locate insights/demo.json --at 1:15\n  vidsift format-time 5:7 12:34\n  vidsift completions zsh > _vidsift";

#[derive(Debug, Parser)]
#[command(
    name = "vidsift",
    version,
    about = "Search indexed videos and jump to matching timestamps",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show matching timestamps and subtitle text for each result.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar while loading and scoring.
    #[arg(long)]
    progress: bool,

    /// Fail on malformed timestamps instead of skipping them.
    #[arg(long)]
    strict: bool,

    /// Do not match transcript text.
    #[arg(long)]
    no_subtitles: bool,

    /// Desired worker thread count for parallel scoring.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank videos against a free-text query.
    #[command(
        about = "Search videos by text",
        after_help = "Examples:\n  vidsift search \"cat\" a.json b.json\n  vidsift search \"black cat\" insights/*.json --limit 5 --json"
    )]
    Search {
        /// Query text; split on whitespace.
        query: String,
        /// Insights JSON files, one per video.
        #[arg(required = true)]
        insights: Vec<PathBuf>,
        /// Show at most this many results.
        #[arg(long)]
        limit: Option<usize>,
        /// Output results as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Rank videos against tags from an image analysis.
    #[command(
        about = "Search videos by image analysis",
        after_help = "Examples:\n  vidsift image-search --analysis photo.json insights/*.json"
    )]
    ImageSearch {
        /// Image analysis JSON file.
        #[arg(long)]
        analysis: PathBuf,
        /// Insights JSON files, one per video.
        #[arg(required = true)]
        insights: Vec<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },

    /// Print the subtitle active at a playback position.
    #[command(
        about = "Find the subtitle at a position",
        after_help = "Examples:\n  vidsift locate demo.json --at 75\n  vidsift locate demo.json --at 1:15"
    )]
    Locate {
        /// Insights JSON file.
        insights: PathBuf,
        /// Position in seconds or as minutes:seconds.
        #[arg(long)]
        at: String,
    },

    /// Reformat minutes:seconds timestamps for display.
    #[command(about = "Format timestamps")]
    FormatTime {
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_position(value: &str) -> Result<f64, Box<dyn std::error::Error>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("position cannot be empty".into());
    }

    if let Ok(seconds) = trimmed.parse::<f64>() {
        return Ok(seconds.max(0.0));
    }

    Ok(parse_seconds(trimmed)?)
}

fn search_options(global: &GlobalOptions, progress: Option<&ProgressBar>) -> SearchOptions {
    let mut options = SearchOptions::new().with_subtitles(!global.no_subtitles);

    if global.strict {
        options = options.with_timestamp_policy(TimestampPolicy::Strict);
    }

    if let Some(bar) = progress {
        options = options.with_progress(Arc::new(TerminalProgress::new(bar.clone())));
    }

    options
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(threads) = global.threads {
        if threads == 0 {
            return Err("--threads must be greater than 0".into());
        }
        unsafe {
            std::env::set_var("RAYON_NUM_THREADS", threads.to_string());
        }
    }

    #[cfg(not(feature = "rayon"))]
    if global.threads.is_some() {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            "--threads requires building with the `rayon` feature".yellow()
        );
    }

    Ok(())
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
        if let Some(video) = &info.current_video {
            self.bar.set_message(video.clone());
        }
    }
}

fn progress_bar(enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let bar = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")
    {
        bar.set_style(style);
    }
    Some(bar)
}

fn run_search(
    global: &GlobalOptions,
    query: &SearchQuery,
    insights: &[PathBuf],
    limit: Option<usize>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if query.is_empty() {
        return Err(vidsift::VidsiftError::InvalidQuery("no search terms".to_string()).into());
    }

    let bar = progress_bar(global.progress);
    let options = search_options(global, bar.as_ref());
    let library = Library::load(insights, &options)?;

    #[cfg(feature = "rayon")]
    let mut results = library.search_parallel(query, &options)?;
    #[cfg(not(feature = "rayon"))]
    let mut results = library.search(query, &options)?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    if let Some(limit) = limit {
        results.truncate(limit);
    }

    if json {
        let payload = json!({
            "mode": query.mode(),
            "terms": query.terms(),
            "results": results,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let heading = match query.mode() {
        SearchMode::Text => format!("Keyword search for \"{}\"", query.terms().join(" ")),
        SearchMode::Image => format!("Image search for tags: {}", query.terms().join(", ")),
    };
    println!("{}", heading.bold());

    if results.is_empty() {
        println!("No videos found.");
    }
    for (rank, result) in results.iter().enumerate() {
        print_result(rank + 1, result, global.verbose);
    }

    Ok(())
}

fn print_result(rank: usize, result: &MatchResult, verbose: bool) {
    println!(
        "{}. {} ({}) {}",
        rank,
        result.video.name.bold(),
        result.video.id,
        format!("{:.2}%", result.score * 100.0).green()
    );
    if !result.matching_tag_names.is_empty() {
        println!(
            "   {} {}",
            "matching:".blue(),
            result.matching_tag_names.join(", ")
        );
    }

    if !verbose {
        return;
    }

    for group in &result.matching_timestamps {
        println!("   {}: {}", group.kind, group.name);
        for appearance in &group.appearances {
            let start = format_timestamp(&appearance.start).unwrap_or_else(|_| appearance.start.clone());
            let end = format_timestamp(&appearance.end).unwrap_or_else(|_| appearance.end.clone());
            match &appearance.text {
                Some(text) => {
                    let rendered: String = highlight(text, &group.name)
                        .iter()
                        .map(|span| {
                            if span.matched {
                                span.text.yellow().bold().to_string()
                            } else {
                                span.text.to_string()
                            }
                        })
                        .collect();
                    println!("     {start} - {end}  {rendered}");
                }
                None => println!("     {start} - {end}"),
            }
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Search {
            query,
            insights,
            limit,
            json,
        } => {
            let query = SearchQuery::text(&query);
            run_search(&cli.global, &query, &insights, limit, json)?;
        }
        Commands::ImageSearch {
            analysis,
            insights,
            limit,
            json,
        } => {
            let analysis = ImageAnalysis::from_json(&fs::read_to_string(&analysis)?)?;
            if !json {
                if let Some(caption) = analysis.caption() {
                    println!("{} {}", "Image description:".bold(), caption);
                }
            }
            let query = SearchQuery::from_image_analysis(&analysis);
            run_search(&cli.global, &query, &insights, limit, json)?;
        }
        Commands::Locate { insights, at } => {
            let position = parse_position(&at)?;
            let metadata = VideoMetadata::from(VideoInsights::open(&insights)?);
            let locator = SubtitleLocator::new(&metadata.transcript);
            match locator.text_at(position) {
                Some(text) => println!("{text}"),
                None => eprintln!(
                    "{} {}",
                    "note:".cyan().bold(),
                    format!("no subtitle at {position}s").cyan()
                ),
            }
        }
        Commands::FormatTime { values } => {
            for value in values {
                println!("{}", format_timestamp(&value)?);
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "vidsift", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
