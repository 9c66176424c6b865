use clap::Parser;
use number_scout::config::toml_config::TomlConfig;
use number_scout::core::ConfigProvider;
use number_scout::utils::{logger, validation::Validate};
use number_scout::app;

#[derive(Parser)]
#[command(name = "toml-scout")]
#[command(about = "Number scan driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "scout-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the worker count from config
    #[arg(long)]
    workers: Option<usize>,

    /// Override the output directory from config
    #[arg(long)]
    output_path: Option<String>,

    /// Dry run - show what would be checked without sending requests
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based number scan");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(workers) = args.workers {
        config.numbers.workers = Some(workers);
        tracing::info!("🔧 Workers overridden to: {}", workers);
    }
    if let Some(output_path) = args.output_path {
        tracing::info!("🔧 Output path overridden to: {}", output_path);
        config.output.path = output_path;
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    if let Err(e) = app::execute(&config, args.dry_run).await {
        tracing::error!("❌ Scan failed: {} (Severity: {:?})", e, e.severity());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(app::exit_code(&e).max(1));
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    let policy = config.retry_policy();
    tracing::info!("📋 Configuration Summary:");
    tracing::info!("   Endpoint: {}", config.api_endpoint());
    tracing::info!("   Brand: {} ({})", config.brand(), config.sim_category());
    tracing::info!("   Base prefix: {}", config.base_prefix());
    tracing::info!(
        "   Fixed positions: {}",
        config
            .fixed_digits()
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    tracing::info!("   Workers: {}", config.workers());
    tracing::info!(
        "   Retries: {} attempts, {} drain passes",
        policy.max_attempts,
        policy.drain_passes
    );
    tracing::info!("   Output: {}", config.output_path());
}
