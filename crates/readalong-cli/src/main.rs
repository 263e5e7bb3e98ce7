//! Command-line front end for readalong.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "readalong",
    version,
    about = "Reading fluency scoring and adaptive difficulty"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a response against its expected text
    Score {
        /// Expected reference text
        #[arg(long)]
        expected: String,

        /// Actual response text (defaults to the transcript's text)
        #[arg(long)]
        actual: Option<String>,

        /// Transcript JSON with optional word timing
        #[arg(long)]
        transcript: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Select questions for a grade and difficulty
    Select {
        /// Path to .toml question bank or directory
        #[arg(long)]
        bank: PathBuf,

        /// School grade, 1 through 8
        #[arg(long)]
        grade: String,

        /// Difficulty modifier, -2 through 2
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        modifier: i64,

        /// Number of questions to draw
        #[arg(long, default_value = "5")]
        count: usize,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Replay a scripted session and write its report
    Replay {
        /// Session script TOML
        #[arg(long)]
        script: PathBuf,

        /// Output directory
        #[arg(long, default_value = "./readalong-results")]
        output: PathBuf,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two session reports
    Compare {
        /// Earlier session report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Later session report JSON
        #[arg(long)]
        current: PathBuf,

        /// Decline threshold on the correct rate
        #[arg(long, default_value = "0.05")]
        threshold: f64,

        /// Exit code 1 if the correct rate declined
        #[arg(long)]
        fail_on_decline: bool,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to question bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create starter config and example question bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("readalong=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            expected,
            actual,
            transcript,
            format,
            config,
        } => commands::score::execute(expected, actual, transcript, format, config),
        Commands::Select {
            bank,
            grade,
            modifier,
            count,
            seed,
        } => commands::select::execute(bank, grade, modifier, count, seed),
        Commands::Replay {
            script,
            output,
            format,
            config,
        } => commands::replay::execute(script, output, format, config),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_decline,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_decline, format),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
