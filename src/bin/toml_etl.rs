use anyhow::Context;
use book_etl::config::toml_config::{LogFormat, TomlConfig};
use book_etl::core::ConfigProvider;
use book_etl::utils::error::ErrorSeverity;
use book_etl::utils::{logger, validation::Validate};
use book_etl::{BookPipeline, EtlEngine, LocalStorage, OpenLibraryClient};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Book ETL driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "book-etl.toml")]
    config: String,

    /// Override the author from the config
    #[arg(short, long)]
    author: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be requested without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    match config.log_format() {
        LogFormat::Compact => logger::init_cli_logger(args.verbose),
        LogFormat::Json => logger::init_json_logger(args.verbose),
    }

    tracing::info!("🚀 Starting TOML-based book ETL");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(author) = args.author.clone() {
        tracing::info!("🔧 Author overridden to: {}", author);
        config.query.author = author;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be sent");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = BookPipeline::new(storage, config)?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Book ETL completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Book ETL failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Pipeline: {}", config.pipeline.name);
    if let Some(version) = &config.pipeline.version {
        println!("  Version: {}", version);
    }
    println!("  Author: {}", config.author());
    println!("  Source: {}", config.base_url());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  On book error: {}", config.book_error_policy());

    if let Some(max_books) = config.max_books() {
        println!("  Max Books: {}", max_books);
    }
    if let Some(timeout) = config.timeout_seconds() {
        println!("  Timeout: {}s", timeout);
    }
    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let client = OpenLibraryClient::new(config.base_url());
    let search_url = client.search_url(config.author());
    url::Url::parse(&search_url)
        .with_context(|| format!("search URL '{}' is not a valid URL", search_url))?;

    println!("🔍 Dry Run Analysis:");
    println!("  Search:   GET {}", search_url);
    println!("  Subjects: GET {}", client.work_url("{work_key}"));
    println!("  Edition:  GET {}", client.edition_url("{edition_key}"));
    match config.max_books() {
        Some(max) => println!(
            "  📊 At most {} round trips (1 search + 2 per book)",
            1 + 2 * max
        ),
        None => println!("  📊 1 search + 2 round trips per book found"),
    }
    println!();
    println!("✅ Dry run analysis complete.");

    Ok(())
}
