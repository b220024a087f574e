mod display;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use clausewise_ai::patterns::{detect_critical_points, order_critical_points};
use clausewise_core::catalog::PatternCatalog;
use clausewise_core::config::{
    DEFAULT_EMBED_CACHE_CAPACITY, DEFAULT_MAX_KEY_POINTS, DEFAULT_MIN_TEXT_CHARS, DEFAULT_SEMANTIC_THRESHOLD,
};
use clausewise_core::{AnalyzerConfig, Mode, RemoteCredentials, enhance_summary};
use clausewise_pipeline::LocalModels;

#[derive(Parser)]
#[command(name = "clausewise", version, about = "Legal document summaries and key points")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarise a document and list its key points.
    Analyze {
        /// Text file to analyse, or `-` for stdin.
        input: PathBuf,
        /// Provider path to try first.
        ///
        /// `local` summarises only when an embedding model is loaded (built
        /// with `onnx` and `--embed-model` set). Without one the summary
        /// comes from the rule-based preview and the result reports
        /// `success: false`.
        #[arg(long, default_value = "remote")]
        mode: Mode,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Run the local extractors and print every candidate before ranking.
    Points {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Run only the critical-point pattern detector.
    Patterns {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Mark summary sentences that mention legal terms.
    Enhance { input: PathBuf },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Table,
}

#[derive(Args)]
struct ConfigArgs {
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    gemini_api_key: Option<String>,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    openai_api_key: Option<String>,
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true, global = true)]
    anthropic_api_key: Option<String>,

    /// Directory with model.onnx + tokenizer.json for sentence embeddings.
    #[arg(long, env = "CLAUSEWISE_EMBED_MODEL", global = true)]
    embed_model: Option<PathBuf>,
    /// Directory with model.onnx + tokenizer.json + config.json for NER.
    #[arg(long, env = "CLAUSEWISE_NER_MODEL", global = true)]
    ner_model: Option<PathBuf>,

    #[arg(long, env = "CLAUSEWISE_MIN_CHARS", default_value_t = DEFAULT_MIN_TEXT_CHARS, global = true)]
    min_chars: usize,
    #[arg(long, env = "CLAUSEWISE_MAX_POINTS", default_value_t = DEFAULT_MAX_KEY_POINTS, global = true)]
    max_points: usize,
    #[arg(long, env = "CLAUSEWISE_SEMANTIC_THRESHOLD", default_value_t = DEFAULT_SEMANTIC_THRESHOLD, global = true)]
    semantic_threshold: f32,
    /// Per-provider deadline in seconds.
    #[arg(long, env = "CLAUSEWISE_TIMEOUT_SECS", default_value_t = 30.0, global = true)]
    timeout_secs: f64,
    #[arg(long, env = "CLAUSEWISE_EMBED_CACHE", default_value_t = DEFAULT_EMBED_CACHE_CAPACITY, global = true)]
    embed_cache: usize,
}

impl ConfigArgs {
    fn into_config(self) -> anyhow::Result<AnalyzerConfig> {
        anyhow::ensure!(
            self.timeout_secs.is_finite() && self.timeout_secs > 0.0,
            "--timeout-secs must be positive"
        );
        let credentials = |key: Option<String>| RemoteCredentials {
            api_key: key,
            ..Default::default()
        };
        Ok(AnalyzerConfig {
            min_text_chars: self.min_chars,
            max_key_points: self.max_points,
            semantic_threshold: self.semantic_threshold,
            provider_timeout: Duration::from_secs_f64(self.timeout_secs),
            embed_cache_capacity: self.embed_cache,
            gemini: credentials(self.gemini_api_key),
            openai: credentials(self.openai_api_key),
            anthropic: credentials(self.anthropic_api_key),
            embed_model_dir: self.embed_model,
            ner_model_dir: self.ner_model,
        })
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("clausewise v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = cli.config.into_config()?;

    match cli.command {
        Command::Analyze { input, mode, format } => {
            let text = read_input(&input)?;
            let orchestrator = clausewise_pipeline::load_shared(&config).await;
            let (result, ranked) = orchestrator.analyze_detailed(&text, mode).await;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                Format::Text => display::print_analysis(&result),
                Format::Table => {
                    display::print_analysis_header(&result);
                    display::print_points(&ranked, Format::Table)?;
                }
            }
        }
        Command::Points { input, format } => {
            let text = read_input(&input)?;
            let points = tokio::task::spawn_blocking(move || LocalModels::load(&config).extract(&text))
                .await
                .context("local extraction task")?;
            display::print_points(&points, format)?;
        }
        Command::Patterns { input, format } => {
            let text = read_input(&input)?;
            let mut points = detect_critical_points(&text, PatternCatalog::standard());
            order_critical_points(&mut points);
            display::print_points(&points, format)?;
        }
        Command::Enhance { input } => {
            let text = read_input(&input)?;
            println!("{}", enhance_summary(&text));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn mode_help_explains_local_summary_needs_embedder() {
        use clap::CommandFactory;
        let mut cmd = Cli::command();
        let analyze = cmd.find_subcommand_mut("analyze").unwrap();
        let help = analyze.render_long_help().to_string();
        assert!(help.contains("--embed-model"), "{help}");
        assert!(help.contains("success: false"), "{help}");
    }

    #[test]
    fn parses_analyze_with_mode_and_format() {
        let cli = Cli::try_parse_from(["clausewise", "analyze", "lease.txt", "--mode", "local", "--format", "json"])
            .unwrap();
        match cli.command {
            Command::Analyze { input, mode, format } => {
                assert_eq!(input, PathBuf::from("lease.txt"));
                assert_eq!(mode, Mode::Local);
                assert!(format == Format::Json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn config_defaults() {
        let cli = Cli::try_parse_from(["clausewise", "enhance", "-"]).unwrap();
        let config = cli.config.into_config().unwrap();
        assert_eq!(config.min_text_chars, 50);
        assert_eq!(config.max_key_points, 10);
        assert_eq!(config.provider_timeout, Duration::from_secs(30));
    }

    #[test]
    fn rejects_zero_timeout() {
        let cli = Cli::try_parse_from(["clausewise", "--timeout-secs", "0", "enhance", "-"]).unwrap();
        assert!(cli.config.into_config().is_err());
    }
}
