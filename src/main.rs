use clap::Parser;
use quake_map::core::ConfigProvider;
use quake_map::utils::error::ErrorSeverity;
use quake_map::utils::{logger, validation::Validate};
use quake_map::{CliConfig, LocalStorage, MapEngine, MapError, QuakeMapPipeline, TomlConfig};

fn exit_code(e: &MapError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,      // 警告，但成功
        ErrorSeverity::Medium => 2,   // 網路錯誤，可重試
        ErrorSeverity::High => 1,     // 資料處理錯誤
        ErrorSeverity::Critical => 3, // 設定或系統錯誤
    }
}

fn report_failure(e: &MapError) {
    tracing::error!(
        "❌ Map build failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

async fn build_map<C: ConfigProvider + Validate>(config: C, dry_run: bool) -> i32 {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        report_failure(&e);
        return exit_code(&e).max(1);
    }

    tracing::info!("🌍 Earthquake feed: {}", config.earthquake_url());
    match config.plates_url() {
        Some(url) => tracing::info!("🧩 Tectonic plates: {}", url),
        None => tracing::info!("🧩 Tectonic plates layer disabled"),
    }
    tracing::info!("📁 Output directory: {}", config.output_path());

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No feeds will be fetched");
        println!("Would fetch {}", config.earthquake_url());
        if let Some(url) = config.plates_url() {
            println!("Would fetch {}", url);
        }
        println!("Would write to {}", config.output_path());
        return 0;
    }

    let storage = LocalStorage::new(config.output_path());
    let pipeline = match QuakeMapPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            report_failure(&e);
            return exit_code(&e).max(1);
        }
    };

    match MapEngine::new(pipeline).run().await {
        Ok(output_path) => {
            tracing::info!("✅ Map build completed successfully!");
            println!("✅ Map artifacts written to: {}", output_path);
            0
        }
        Err(e) => {
            report_failure(&e);
            exit_code(&e)
        }
    }
}

#[tokio::main]
async fn main() {
    let mut cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting quake-map");
    tracing::debug!("CLI config: {:?}", cli);

    let dry_run = cli.dry_run;
    let code = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            for flag in cli.flags_ignored_with_config() {
                tracing::warn!("⚠️ {} is ignored because --config takes precedence", flag);
            }
            match TomlConfig::from_file(&path) {
                Ok(config) => build_map(config, dry_run).await,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    1
                }
            }
        }
        None => {
            cli.apply_feed();
            build_map(cli, dry_run).await
        }
    };

    if code > 0 {
        std::process::exit(code);
    }
}
