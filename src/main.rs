//! CLI entry point for `mailthread`.

use std::collections::HashMap;
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use mailthread::config::{self, Config};
use mailthread::export::attachment::{attachment_destination, download_attachments};
use mailthread::export::{FormatOptions, Formatter, JsonFormatter, TextFormatter};
use mailthread::model::thread::Thread;
use mailthread::provider::{self, LocalStore, MailProvider};
use mailthread::quote::strip_quoted_content;

#[derive(Parser)]
#[command(
    name = "mailthread",
    version,
    about = "Search mail threads and print clean, chronological transcripts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the local thread store (threads/, attachments/)
    #[arg(long, global = true, env = "MAILTHREAD_STORE", value_name = "DIR")]
    store: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Search threads and list the matches
    Search {
        /// Search terms (joined with spaces)
        #[arg(required = true)]
        query: Vec<String>,
        /// Maximum number of threads to list
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
        /// Print results as JSON
        #[arg(long, conflicts_with = "interactive")]
        json: bool,
        /// Prompt for a result to download after listing
        #[arg(short, long)]
        interactive: bool,
        /// Directory for attachments of the chosen thread (with --interactive)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
    /// Print a thread transcript and save its attachments
    Download {
        thread_id: String,
        /// Directory to save attachments into
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Skip downloading attachments
        #[arg(long)]
        no_attachments: bool,
        /// Show newest message first
        #[arg(short, long)]
        reverse: bool,
        /// Strip quoted history from every message
        #[arg(short, long)]
        messages_only: bool,
        /// Print the thread as JSON
        #[arg(long)]
        json: bool,
    },
    /// Strip quoted reply history from a message body (file or stdin)
    Strip { file: Option<PathBuf> },
    /// Show the configuration file location and effective settings
    Config {
        /// Write the current settings to the configuration file
        #[arg(long)]
        init: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

/// How a fetched thread is saved and printed.
struct Transcript {
    output_dir: Option<PathBuf>,
    no_attachments: bool,
    json: bool,
    opts: FormatOptions,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::load_config();

    // Configure logging: stderr + optional log file
    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Search {
            query,
            max_results,
            json,
            interactive,
            output_dir,
        } => {
            let store = open_store(cli.store, &config)?;
            let max = max_results.unwrap_or(config.search.max_results);
            let query = query.join(" ");
            if interactive {
                cmd_search_interactive(&store, &config, &query, max, output_dir)
            } else {
                cmd_search(&store, &query, max, json)
            }
        }
        Commands::Download {
            thread_id,
            output_dir,
            no_attachments,
            reverse,
            messages_only,
            json,
        } => {
            let store = open_store(cli.store, &config)?;
            let transcript = Transcript {
                output_dir: output_dir.or_else(|| config.output.attachment_dir.clone()),
                no_attachments,
                json,
                opts: FormatOptions {
                    reverse: reverse || config.output.reverse,
                    messages_only: messages_only || config.output.messages_only,
                },
            };
            cmd_download(&store, &thread_id, &transcript)
        }
        Commands::Strip { file } => cmd_strip(file.as_deref()),
        Commands::Config { init } => cmd_config(&config, init),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "mailthread.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// `--store` / `$MAILTHREAD_STORE` first, then `[store] path`.
fn open_store(flag: Option<PathBuf>, config: &Config) -> anyhow::Result<LocalStore> {
    let Some(root) = flag.or_else(|| config.store.path.clone()) else {
        anyhow::bail!(
            "No thread store configured. Pass --store, set MAILTHREAD_STORE, or set [store] path in {}",
            config::config_file_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the config file".to_string())
        );
    };
    Ok(LocalStore::open(root)?)
}

fn cmd_search(store: &LocalStore, query: &str, max_results: usize, json: bool) -> anyhow::Result<()> {
    let results = provider::search_summaries(store, query, max_results)?;
    let out = if json {
        JsonFormatter::new().format_search_results(&results)
    } else {
        TextFormatter::new().format_search_results(&results)
    };
    print_block(&out);
    Ok(())
}

fn cmd_search_interactive(
    store: &LocalStore,
    config: &Config,
    query: &str,
    max_results: usize,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let results = provider::search_summaries(store, query, max_results)?;
    print_block(&TextFormatter::new().format_search_results(&results));
    if results.is_empty() {
        return Ok(());
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let Some(choice) = prompt_selection(&mut input, results.len())? else {
        return Ok(());
    };

    let thread = provider::get_thread(store, &results[choice - 1].id)?;

    // Ask once when nothing is configured; an empty answer skips attachments.
    let mut output_dir = output_dir.or_else(|| config.output.attachment_dir.clone());
    if output_dir.is_none() && thread.has_attachments() {
        output_dir = prompt_output_dir(&mut input)?;
    }

    let transcript = Transcript {
        no_attachments: output_dir.is_none(),
        output_dir,
        json: false,
        opts: FormatOptions {
            reverse: config.output.reverse,
            messages_only: config.output.messages_only,
        },
    };
    print_thread(store, &thread, &transcript)
}

/// Ask for a result number. `None` means the user quit.
fn prompt_selection(input: &mut impl BufRead, max: usize) -> anyhow::Result<Option<usize>> {
    loop {
        print!("\nEnter number (1-{max}) to download, or 'q' to quit: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim().to_lowercase();
        if answer == "q" || answer == "quit" {
            return Ok(None);
        }
        match answer.parse::<usize>() {
            Ok(n) if (1..=max).contains(&n) => return Ok(Some(n)),
            _ => println!("Invalid selection. Please enter a number between 1 and {max}."),
        }
    }
}

fn prompt_output_dir(input: &mut impl BufRead) -> anyhow::Result<Option<PathBuf>> {
    print!("Thread has attachments. Specify output directory (or press Enter to skip): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let dir = line.trim();
    Ok((!dir.is_empty()).then(|| PathBuf::from(dir)))
}

fn cmd_download(store: &LocalStore, thread_id: &str, transcript: &Transcript) -> anyhow::Result<()> {
    let thread = provider::get_thread(store, thread_id)?;
    print_thread(store, &thread, transcript)
}

/// Save attachments (unless skipped) and print the transcript to stdout.
fn print_thread(
    source: &dyn MailProvider,
    thread: &Thread,
    transcript: &Transcript,
) -> anyhow::Result<()> {
    let destination = attachment_destination(
        thread,
        transcript.output_dir.as_deref(),
        transcript.no_attachments,
    )?;
    let saved = match destination {
        Some(dir) => save_with_progress(source, thread, dir),
        None => HashMap::new(),
    };

    let out = if transcript.json {
        JsonFormatter::new().format_thread(thread, &saved, transcript.opts)
    } else {
        TextFormatter::new().format_thread(thread, &saved, transcript.opts)
    };
    print_block(&out);
    Ok(())
}

fn save_with_progress(
    source: &dyn MailProvider,
    thread: &Thread,
    dir: &Path,
) -> HashMap<String, PathBuf> {
    let total = thread.attachments().count();
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} Saving attachments [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let saved = download_attachments(source, thread, dir, &|current, total| {
        pb.set_length(total as u64);
        pb.set_position(current as u64);
    });
    pb.finish_and_clear();

    if saved.len() < total {
        eprintln!(
            "  Saved {} of {} attachment(s) to {}",
            saved.len(),
            total,
            dir.display()
        );
    }
    saved
}

fn cmd_strip(file: Option<&Path>) -> anyhow::Result<()> {
    let body = match file {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("File not found: {}", path.display());
            }
            std::fs::read_to_string(path)?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    println!("{}", strip_quoted_content(&body));
    Ok(())
}

fn cmd_config(config: &Config, init: bool) -> anyhow::Result<()> {
    let path = if init {
        Some(config::save_config(config)?)
    } else {
        config::config_file_path()
    };

    println!(
        "  {:<15} {}",
        "Config file",
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("  {:<15} {}", "Log file", config::log_file_path(config).display());
    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mailthread", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::stdout().write_all(&buf)?;
    Ok(())
}

/// Print `text`, ending with exactly one newline.
fn print_block(text: &str) {
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
}
