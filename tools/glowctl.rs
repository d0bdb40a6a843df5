/// glowctl: generate a media pack from the command line and export it as
/// Markdown.
///
/// Usage: glowctl <topic> [--lang vi|en] [--out <dir>] [--platform <name>]
///        [--duration <15-60>] [--audience <name>] [--style <preset>]
///        [--seed <n>] [--engine offline|gemini] [--config <file>] [-v]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use glowmini::config::GlowConfig;
use glowmini::core::export;
use glowmini::core::external::{generate_with_fallback, PackSource};
use glowmini::core::pipeline::PackEngine;
use glowmini::schema::pack::MediaPack;
use glowmini::schema::request::{
    validate_topic, Audience, GenerationRequest, Language, Platform, MAX_DURATION_SEC,
    MIN_DURATION_SEC,
};

#[derive(Parser)]
#[command(name = "glowctl")]
#[command(about = "GlowMiniAI: outline, script, shotlist and prompt pack from a topic", long_about = None)]
struct Cli {
    /// Topic / keyword for the pack
    topic: String,

    /// Output language: vi or en
    #[arg(long)]
    lang: Option<Language>,

    /// Output directory
    #[arg(long)]
    out: Option<PathBuf>,

    /// YouTube Shorts, TikTok, Facebook Reels or Website/Blog
    #[arg(long)]
    platform: Option<Platform>,

    /// Target duration in seconds
    #[arg(long, value_parser = clap::value_parser!(u32).range(MIN_DURATION_SEC as i64..=MAX_DURATION_SEC as i64))]
    duration: Option<u32>,

    /// General, Kids/Family, Business or Education
    #[arg(long)]
    audience: Option<Audience>,

    /// Style preset name (unknown names use the default look)
    #[arg(long)]
    style: Option<String>,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Which generator to use
    #[arg(long, value_enum, default_value_t = EngineKind::Offline)]
    engine: EngineKind,

    /// Path to a glowmini.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineKind {
    Offline,
    Gemini,
}

fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let topic = match validate_topic(&cli.topic) {
        Ok(topic) => topic,
        Err(e) => {
            eprintln!("Please enter a topic ({e}).");
            std::process::exit(2);
        }
    };

    let config = GlowConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let request = build_request(&cli, &config, topic);
    debug!(?request, "request ready");

    let mut builder = PackEngine::builder();
    if let Some(ref path) = config.catalogs.phrase_bank {
        builder = builder.phrase_bank_file(path);
    }
    if let Some(ref path) = config.catalogs.styles {
        builder = builder.styles_file(path);
    }
    let engine = builder.build().context("loading catalogs")?;

    let pack = generate(&engine, &config, cli.engine, &request);

    let out_dir = cli.out.clone().unwrap_or_else(|| config.output_dir.clone());
    let path = export::persist(&pack, &out_dir)
        .with_context(|| format!("writing pack to {}", out_dir.display()))?;

    println!("Generated pack: {}", path.display());
    println!("--- Outline preview ---");
    println!("{}", pack.outline);
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_request(cli: &Cli, config: &GlowConfig, topic: &str) -> GenerationRequest {
    let mut request = config.request(topic).seed(cli.seed);
    if let Some(language) = cli.lang {
        request = request.language(language);
    }
    if let Some(platform) = cli.platform {
        request = request.platform(platform);
    }
    if let Some(duration) = cli.duration {
        request = request.duration_sec(duration);
    }
    if let Some(audience) = cli.audience {
        request = request.audience(audience);
    }
    if let Some(ref style) = cli.style {
        request = request.style_preset(style.clone());
    }
    request
}

fn generate(
    engine: &PackEngine,
    config: &GlowConfig,
    kind: EngineKind,
    request: &GenerationRequest,
) -> MediaPack {
    let source = match kind {
        EngineKind::Offline => None,
        EngineKind::Gemini => external_source(config),
    };
    generate_with_fallback(engine, source.as_deref(), request)
}

#[cfg(feature = "gemini")]
fn external_source(config: &GlowConfig) -> Option<Box<dyn PackSource>> {
    use glowmini::core::gemini::GeminiClient;
    use std::time::Duration;

    let key = config.gemini.api_key.as_deref().unwrap_or_default();
    match GeminiClient::new(
        key,
        &config.gemini.model,
        Duration::from_secs(config.gemini.timeout_secs),
    ) {
        Ok(client) => Some(Box::new(client)),
        Err(e) => {
            warn!(error = %e, "gemini unavailable, using offline engine");
            None
        }
    }
}

#[cfg(not(feature = "gemini"))]
fn external_source(_config: &GlowConfig) -> Option<Box<dyn PackSource>> {
    warn!("built without the gemini feature, using offline engine");
    None
}
