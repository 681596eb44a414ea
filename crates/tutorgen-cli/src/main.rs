//! tutorgen CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use tutorgen_core::model::Difficulty;

mod commands;
mod session;

#[derive(Parser)]
#[command(name = "tutorgen", version, about = "AI exercise generation for the tutoring platform")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a batch of practice exercises
    Generate {
        /// School grade of the student
        #[arg(long)]
        grade: String,

        /// Topic to generate exercises for
        #[arg(long)]
        topic: String,

        /// Difficulty: basic, medium, advanced
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,

        /// Number of exercises
        #[arg(long, default_value = "5")]
        count: u32,

        /// Language tag for the exercise text
        #[arg(long, default_value = "en")]
        language: String,

        /// Write the batch to a study-session JSON file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Ask for the next hint on an exercise
    Hint {
        /// The exercise statement
        #[arg(long)]
        statement: String,

        /// Topic of the exercise
        #[arg(long)]
        topic: String,

        /// Difficulty: basic, medium, advanced
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,

        /// A hint already given (repeatable, in order)
        #[arg(long = "given")]
        given: Vec<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Produce a performance report for a finished study session
    Report {
        /// Path to a study-session JSON file with recorded attempts
        #[arg(long)]
        session: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the active provider and its configuration status
    Providers {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tutorgen=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            grade,
            topic,
            difficulty,
            count,
            language,
            output,
            config,
        } => commands::generate::execute(grade, topic, difficulty, count, language, output, config)
            .await,
        Commands::Hint {
            statement,
            topic,
            difficulty,
            given,
            config,
        } => commands::hint::execute(statement, topic, difficulty, given, config).await,
        Commands::Report { session, config } => commands::report::execute(session, config).await,
        Commands::Providers { config } => commands::providers::execute(config),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
