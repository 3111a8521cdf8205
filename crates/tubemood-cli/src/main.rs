mod report;
mod video;

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tubemood_core::ClassifyFailurePolicy;

use crate::report::ReportFormat;

#[derive(Debug, Parser)]
#[command(name = "tubemood")]
#[command(about = "Classify the sentiment of a YouTube video's comments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch up to 100 top-level comments, classify each and write a report
    Analyze {
        /// Video id or YouTube URL (watch, youtu.be, shorts)
        video: String,

        /// Where to write the report [default: youtube_comments.<md|json|xlsx>]
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,

        /// What to do when one comment cannot be classified: `abort` or `neutral`
        #[arg(long)]
        on_error: Option<ClassifyFailurePolicy>,

        /// Extra attempts per comment on transient classifier errors
        #[arg(long)]
        max_retries: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            video,
            output,
            format,
            on_error,
            max_retries,
        } => {
            let target = AnalyzeTarget::resolve(&video, output, format)?;

            let mut config = tubemood_core::load_app_config()?;
            init_tracing(&config.log_level)?;

            if let Some(policy) = on_error {
                config.on_classify_error = policy;
            }
            if let Some(retries) = max_retries {
                config.classify_max_retries = retries;
            }
            run_analyze(&config, &target).await
        }
    }
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

/// What `analyze` works on, settled from the arguments alone before any
/// configuration is loaded.
#[derive(Debug, PartialEq, Eq)]
struct AnalyzeTarget {
    content_id: String,
    output_path: PathBuf,
    format: ReportFormat,
}

impl AnalyzeTarget {
    fn resolve(
        video: &str,
        output: Option<PathBuf>,
        format: ReportFormat,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            content_id: video::parse_video_id(video)?,
            output_path: output.unwrap_or_else(|| format.default_output()),
            format,
        })
    }
}

/// Runs the pipeline for one video and writes the report.
///
/// Nothing is written when the pipeline fails.
async fn run_analyze(
    config: &tubemood_core::AppConfig,
    target: &AnalyzeTarget,
) -> anyhow::Result<()> {
    let content_id = &target.content_id;

    tracing::debug!(
        content_id = %content_id,
        policy = %config.on_classify_error,
        max_retries = config.classify_max_retries,
        "starting comment sentiment analysis"
    );

    let mut runner = tubemood_sentiment::build_runner(config)?;
    let output = runner
        .run(content_id)
        .await
        .with_context(|| format!("sentiment analysis failed for video '{content_id}'"))?;

    let contents = report::render(target.format, &output, Utc::now())?;
    report::write_report(&target.output_path, &contents)?;

    println!(
        "classified {} comments for {}: positive={} negative={} neutral={}",
        output.rows.len(),
        output.content_id,
        output.tally.positive,
        output.tally.negative,
        output.tally.neutral
    );
    if output.degraded > 0 {
        println!(
            "{} comments could not be classified and were recorded as Neutral",
            output.degraded
        );
    }
    print!("{}", report::render_chart(&output.tally));
    println!("report written to {}", target.output_path.display());

    Ok(())
}
