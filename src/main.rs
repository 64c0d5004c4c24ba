//! Brand Forge - AI-powered brand name and slogan generation
//!
//! Pick a sector and a style, get brand names from OpenAI, Gemini or DeepSeek,
//! then generate slogans for the one you like.

use anyhow::Context;
use brand_forge::{
    config::{AppConfig, CacheBackend},
    llm::BrandGenerator,
    types::{ProviderId, SectorOption, StyleOption, SECTORS, STYLES},
    BrandForgeError, ProjectExport,
};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brand-forge", version, about = "AI-powered brand name and slogan generation")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Skip the result cache for this run
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate brand names for a sector and style
    Brands(BrandsArgs),
    /// Generate slogans for a brand
    Slogans(SlogansArgs),
    /// Ping configured providers and list the ones that answer
    Providers,
    /// Warm the Upstash cache with popular sector/style combinations
    Preload,
    /// List built-in sectors and styles
    Catalog,
    /// Remove Upstash cache entries matching a glob pattern
    Purge {
        /// Key pattern, e.g. "ai:brands:*"
        #[arg(default_value = "ai:*")]
        pattern: String,
    },
}

#[derive(Args)]
struct BrandsArgs {
    /// Industry sector, e.g. tech (prompted when omitted)
    #[arg(long)]
    sector: Option<String>,

    /// Naming style, e.g. modern (prompted when omitted)
    #[arg(long)]
    style: Option<String>,

    /// Provider to ask first: openai, gemini or deepseek
    #[arg(short, long)]
    provider: Option<String>,

    /// Pick a random sector and style
    #[arg(long, conflicts_with_all = ["sector", "style"])]
    random: bool,

    /// Project name used in exports
    #[arg(long)]
    name: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct SlogansArgs {
    /// Brand name to write slogans for
    #[arg(short, long)]
    brand: String,

    /// Industry sector (prompted when omitted)
    #[arg(long)]
    sector: Option<String>,

    /// Provider to ask first: openai, gemini or deepseek
    #[arg(short, long)]
    provider: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct OutputArgs {
    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Export the project to a .json, .txt or .md file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize the library
    if let Err(e) = brand_forge::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<BrandForgeError>() {
            Some(err) => eprintln!("{}", err.user_message()),
            None => eprintln!("❌ Error: {:#}", e),
        }
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "brand_forge=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Catalog => {
            display_catalog();
            Ok(())
        }
        Command::Brands(args) => {
            // Reject unknown providers before touching any configuration
            let provider = parse_provider(args.provider.as_deref())?;
            let generator = setup_generator(cli.no_cache)?;
            run_brands(&generator, args, provider).await
        }
        Command::Slogans(args) => {
            let provider = parse_provider(args.provider.as_deref())?;
            let generator = setup_generator(cli.no_cache)?;
            run_slogans(&generator, args, provider).await
        }
        Command::Providers => {
            let generator = setup_generator(cli.no_cache)?;
            run_providers(&generator).await
        }
        Command::Preload => {
            let generator = setup_generator(cli.no_cache)?;
            run_preload(&generator).await
        }
        Command::Purge { pattern } => {
            let generator = setup_generator(cli.no_cache)?;
            if !generator.cache().is_persistent() {
                println!("⚠️  Cache is not persistent, nothing to purge");
                println!("💡 Set REDIS_URL and REDIS_TOKEN to use the Upstash cache");
                return Ok(());
            }
            let removed = generator.invalidate_cache(&pattern).await;
            println!("🧹 Removed {} cached generation(s) matching \"{}\"", removed, pattern);
            Ok(())
        }
    }
}

fn parse_provider(name: Option<&str>) -> brand_forge::Result<Option<ProviderId>> {
    name.map(str::parse::<ProviderId>).transpose()
}

/// Build the generator from environment configuration
fn setup_generator(no_cache: bool) -> brand_forge::Result<BrandGenerator> {
    let mut config = AppConfig::from_env()?;
    if no_cache {
        config.cache.backend = CacheBackend::Disabled;
    }

    #[cfg(feature = "debug")]
    {
        for provider in &config.providers {
            eprintln!("🔧 Debug: {} model: {}", provider.provider, provider.model);
            if let Some(url) = &provider.base_url {
                eprintln!("🔧 Debug: {} base URL: {}", provider.provider, url);
            }
        }
        eprintln!(
            "🔧 Debug: cache: {:?}, ttl: {}s",
            cache_label(&config.cache.backend),
            config.cache.ttl.as_secs()
        );
    }

    config.build_generator()
}

#[cfg(feature = "debug")]
fn cache_label(backend: &CacheBackend) -> &'static str {
    match backend {
        CacheBackend::Memory => "memory",
        CacheBackend::Upstash { .. } => "upstash",
        CacheBackend::Disabled => "disabled",
    }
}

async fn run_brands(
    generator: &BrandGenerator,
    args: BrandsArgs,
    provider: Option<ProviderId>,
) -> anyhow::Result<()> {
    let quiet = args.output.json;
    let (sector, style) = if args.random {
        let mut rng = rand::thread_rng();
        let sector = SECTORS.choose(&mut rng).map_or("tech", |s| s.value);
        let style = STYLES.choose(&mut rng).map_or("modern", |s| s.value);
        if !quiet {
            println!("🎲 Random pick: {} / {}", sector, style);
        }
        (sector.to_string(), style.to_string())
    } else {
        let sector = match args.sector {
            Some(sector) => sector,
            None => pick_sector()?,
        };
        let style = match args.style {
            Some(style) => style,
            None => pick_style()?,
        };
        (sector, style)
    };

    let provider = provider.unwrap_or_else(|| generator.default_provider());
    let spinner =
        (!quiet).then(|| spinner(format!("🤖 Generating brand names with {}...", provider)));
    let result = generator
        .generate_brand_names(&sector, &style, provider.as_str())
        .await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let result = result?;

    if quiet {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_list("🎨 Brand Names", &result.brands, true);
        display_origin(provider, result.provider, result.from_cache);
    }

    if let Some(path) = args.output.output {
        let name = args.name.unwrap_or_else(|| format!("{} {}", sector, style));
        let project = ProjectExport::from_brand_names(name, &sector, &style, &result);
        project
            .save(&path)
            .with_context(|| format!("exporting project to {}", path.display()))?;
        if !quiet {
            println!("💾 Saved to {}", path.display());
        }
    }

    Ok(())
}

async fn run_slogans(
    generator: &BrandGenerator,
    args: SlogansArgs,
    provider: Option<ProviderId>,
) -> anyhow::Result<()> {
    let quiet = args.output.json;
    let sector = match args.sector {
        Some(sector) => sector,
        None => pick_sector()?,
    };

    let provider = provider.unwrap_or_else(|| generator.default_provider());
    let spinner = (!quiet).then(|| {
        spinner(format!("🤖 Writing slogans for \"{}\" with {}...", args.brand, provider))
    });
    let result = generator
        .generate_slogans(&args.brand, &sector, provider.as_str())
        .await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let result = result?;

    if quiet {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_list(&format!("💬 Slogans for {}", args.brand), &result.slogans, false);
        display_origin(provider, result.provider, result.from_cache);
    }

    if let Some(path) = args.output.output {
        let project = ProjectExport::from_slogans(&args.brand, &sector, &result);
        project
            .save(&path)
            .with_context(|| format!("exporting project to {}", path.display()))?;
        if !quiet {
            println!("💾 Saved to {}", path.display());
        }
    }

    Ok(())
}

async fn run_providers(generator: &BrandGenerator) -> anyhow::Result<()> {
    let configured = generator.configured_providers();
    let spinner = spinner(format!("🔍 Probing {} provider(s)...", configured.len()));
    let available = generator.available_providers().await;
    spinner.finish_and_clear();

    println!("🔌 AI Providers:");
    println!("═══════════════");
    for provider in ProviderId::ALL {
        let status = if available.contains(&provider) {
            "✅ available"
        } else if configured.contains(&provider) {
            "⚠️  configured but not answering"
        } else {
            "➖ not configured"
        };
        let marker = if provider == generator.default_provider() { " (default)" } else { "" };
        println!("  {:<9} {}{}", provider.as_str(), status, marker);
    }
    println!();
    println!("📊 {} of {} available", available.len(), ProviderId::ALL.len());

    Ok(())
}

async fn run_preload(generator: &BrandGenerator) -> anyhow::Result<()> {
    // An in-process cache is gone when this command exits
    if !generator.cache().is_persistent() {
        println!("⚠️  Cache is not persistent, nothing to preload");
        println!("💡 Set REDIS_URL and REDIS_TOKEN to use the Upstash cache");
        return Ok(());
    }

    let spinner = spinner("🔥 Warming the cache with popular combinations...");
    let report = generator.preload_popular_combinations().await;
    spinner.finish_and_clear();

    for label in &report.warmed {
        println!("✅ Preloaded: {}", label);
    }
    for label in &report.failed {
        println!("❌ Preload failed: {}", label);
    }

    let metrics = generator.get_metrics_snapshot();
    println!();
    println!("📈 Summary:");
    println!("   ✅ Warmed: {}", report.warmed.len());
    println!("   ❌ Failed: {}", report.failed.len());
    println!("   🌐 Upstream calls: {}", metrics.upstream_calls);
    println!("   ⚡ Cache hit rate: {:.0}%", metrics.cache_hit_rate() * 100.0);

    Ok(())
}

fn pick_sector() -> brand_forge::Result<String> {
    if !std::io::stdin().is_terminal() {
        return Err(BrandForgeError::cli("--sector is required when not running interactively"));
    }
    let choice: SectorOption = inquire::Select::new("Pick a sector:", SECTORS.to_vec())
        .prompt()
        .map_err(|e| BrandForgeError::cli(e.to_string()))?;
    Ok(choice.value.to_string())
}

fn pick_style() -> brand_forge::Result<String> {
    if !std::io::stdin().is_terminal() {
        return Err(BrandForgeError::cli("--style is required when not running interactively"));
    }
    let choice: StyleOption = inquire::Select::new("Pick a style:", STYLES.to_vec())
        .prompt()
        .map_err(|e| BrandForgeError::cli(e.to_string()))?;
    Ok(choice.value.to_string())
}

fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Display generated items in a clean format
fn display_list(title: &str, items: &[String], grid: bool) {
    println!();
    println!("{} ({}):", title, items.len());
    println!("═══════════════════");

    if !grid {
        for item in items {
            println!("  \"{}\"", item);
        }
        println!();
        return;
    }

    // Compact grid, three per row
    for (i, item) in items.iter().enumerate() {
        print!("{:2}. {:<22}", i + 1, item);
        if (i + 1) % 3 == 0 {
            println!();
        }
    }
    if items.len() % 3 != 0 {
        println!();
    }
    println!();
}

fn display_origin(requested: ProviderId, used: ProviderId, from_cache: bool) {
    if from_cache {
        println!("⚡ Served from cache ({})", used);
    } else if requested != used {
        println!("🔁 Generated with {} (fallback)", used);
    } else {
        println!("🤖 Generated with {}", used);
    }
}

fn display_catalog() {
    println!("🏭 Sectors:");
    for sector in SECTORS {
        println!("  {:<12} {}", sector.value, sector);
    }
    println!();
    println!("🎨 Styles:");
    for style in STYLES {
        println!("  {:<12} {}", style.value, style);
    }
}
