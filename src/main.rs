use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, warn};

use quillgate::logging::{init_logging, LoggingConfig};
use quillgate::quality::citations::format_report;
use quillgate::quality::{
    CitationValidator, DraftGateChecker, DraftInput, GateConfig, GateResult, QualityAnalyzer,
    QualityConfigError, VariationDifferentiator,
};
use quillgate::ui::{QualityGateRenderer, Theme};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Human-readable panels
    #[default]
    Text,
    /// Pretty-printed JSON on stdout
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "quillgate")]
#[command(version)]
#[command(about = "Quality gates for AI-generated articles: citations, scoring, variation differentiation")]
struct Cli {
    /// Gate configuration file (TOML); QUILLGATE__* environment variables override it
    #[arg(long, short, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true, default_value = "text", value_enum)]
    format: OutputFormat,

    /// Disable colors (also respects NO_COLOR environment variable)
    #[arg(long, global = true)]
    no_color: bool,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check that every citation links to a URL from the reference material
    Citations {
        /// Article to validate (markdown)
        content: PathBuf,

        /// Reference material whose URLs are the only valid link targets
        #[arg(long, short)]
        reference: Option<PathBuf>,
    },
    /// Score an article on readability, SEO, engagement, structure and factual grounding
    Score {
        /// Article to score (markdown)
        content: PathBuf,

        /// Structural template with `##` sections
        #[arg(long, short)]
        template: Option<PathBuf>,

        /// Reference material for the factual score
        #[arg(long, short)]
        reference: Option<PathBuf>,
    },
    /// Check that a set of variations differ from each other enough
    Differentiate {
        /// Variation files, in order
        #[arg(required = true, num_args = 1..)]
        variations: Vec<PathBuf>,

        /// Minimum required difference between any two variations (0-1)
        #[arg(long, value_name = "FRACTION")]
        min_difference: Option<f64>,
    },
    /// Run the citation and quality gates over a draft
    Check {
        /// Draft to check (markdown)
        content: PathBuf,

        /// Reference material
        #[arg(long, short)]
        reference: Option<PathBuf>,

        /// Structural template
        #[arg(long, short)]
        template: Option<PathBuf>,
    },
}

/// Failures that stop a command before a verdict is reached.
#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] QualityConfigError),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exit codes shared by every subcommand
mod exit_codes {
    use std::process::ExitCode;

    /// Every check passed
    pub fn passed() -> ExitCode {
        ExitCode::from(0)
    }

    /// A gate failed; the verdict is advisory
    pub fn advisory_failure() -> ExitCode {
        ExitCode::from(1)
    }

    /// Bad input, unreadable file or invalid configuration
    pub fn usage_error() -> ExitCode {
        ExitCode::from(2)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_flags(cli.verbose, cli.quiet));

    match run(&cli) {
        Ok(true) => exit_codes::passed(),
        Ok(false) => exit_codes::advisory_failure(),
        Err(e) => {
            eprintln!("error: {e}");
            exit_codes::usage_error()
        }
    }
}

/// Runs the selected command and returns whether its gate passed.
fn run(cli: &Cli) -> Result<bool, CliError> {
    let config = load_config(cli.config.as_deref())?;
    let use_color =
        !cli.no_color && std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal();
    let theme = if use_color { Theme::new() } else { Theme::plain() };
    let renderer = QualityGateRenderer::with_theme(theme);

    match &cli.command {
        Commands::Citations { content, reference } => {
            let content = read_file(content)?;
            let reference = read_reference(reference.as_deref())?;
            let report = CitationValidator::new().validate(&content, &reference);
            match cli.format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Text => print!("{}", format_report(&report)),
            }
            Ok(report.passed)
        }
        Commands::Score {
            content,
            template,
            reference,
        } => {
            let content = read_file(content)?;
            let template = template.as_deref().map(read_file).transpose()?;
            let reference = read_optional_reference(reference.as_deref())?;
            let analyzer = QualityAnalyzer::with_weights(config.scoring.weights);
            let scores = analyzer.analyze(&content, template.as_deref(), reference.as_deref());
            let pass_mark = config.scoring.min_overall_score;
            match cli.format {
                OutputFormat::Json => print_json(&scores)?,
                OutputFormat::Text => println!("{}", renderer.render_scores(&scores, pass_mark)),
            }
            Ok(scores.overall_score >= pass_mark)
        }
        Commands::Differentiate {
            variations,
            min_difference,
        } => {
            let mut differentiation = config.differentiation.clone();
            if let Some(min_difference) = min_difference {
                differentiation.min_difference = *min_difference;
                GateConfig {
                    differentiation: differentiation.clone(),
                    ..config.clone()
                }
                .validate()?;
            }
            let texts = variations
                .iter()
                .map(|path| read_file(path))
                .collect::<Result<Vec<_>, _>>()?;
            let report = VariationDifferentiator::with_config(differentiation).validate_set(&texts);
            match cli.format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Text => println!("{}", renderer.render_similarity_matrix(&report)),
            }
            Ok(report.valid)
        }
        Commands::Check {
            content,
            reference,
            template,
        } => {
            let mut draft = DraftInput::new(read_file(content)?);
            draft.reference = read_optional_reference(reference.as_deref())?;
            draft.template = template.as_deref().map(read_file).transpose()?;

            let checker = DraftGateChecker::new(&config);
            let show_progress = matches!(cli.format, OutputFormat::Text) && cli.verbose > 0;
            let results = checker.run_all_gates_with_progress(&draft, |update| {
                if show_progress {
                    eprintln!("{}", renderer.render_progress(&update));
                }
            });
            let passed = DraftGateChecker::all_passed(&results);
            match cli.format {
                OutputFormat::Json => print_json(&CheckOutput {
                    passed,
                    gates: &results,
                })?,
                OutputFormat::Text => println!("{}", renderer.render_gates(&results)),
            }
            Ok(passed)
        }
    }
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    passed: bool,
    gates: &'a [GateResult],
}

fn load_config(path: Option<&Path>) -> Result<GateConfig, QualityConfigError> {
    match path {
        Some(path) => GateConfig::load(path),
        None => Ok(GateConfig::default()),
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Reads reference material. A missing file is treated as an empty corpus.
fn read_reference(path: Option<&Path>) -> Result<String, CliError> {
    let Some(path) = path else {
        debug!("no reference material given");
        return Ok(String::new());
    };
    if !path.exists() {
        warn!(
            path = %path.display(),
            "reference file not found; validating against an empty corpus"
        );
        return Ok(String::new());
    }
    read_file(path)
}

/// Like [`read_reference`], but keeps "not given" distinct from "empty".
fn read_optional_reference(path: Option<&Path>) -> Result<Option<String>, CliError> {
    path.map(|path| read_reference(Some(path))).transpose()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
