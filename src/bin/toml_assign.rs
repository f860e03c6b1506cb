use clap::Parser;
use pref_assign::config::toml_config::{OptionsConfig, TomlConfig};
use pref_assign::core::ConfigProvider;
use pref_assign::utils::error::AllocError;
use pref_assign::utils::{logger, validation::Validate};
use pref_assign::{ActivityCatalog, AllocationEngine, AllocationPipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-assign")]
#[command(about = "Preference-based activity assignment driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "assign.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override strict preference checking from config
    #[arg(long)]
    strict: Option<bool>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Dry run - show the resolved configuration without solving
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based assignment");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 套用命令列覆蓋設定
    if let Some(strict) = args.strict {
        let options = config.options.get_or_insert(OptionsConfig {
            strict_preferences: None,
        });
        options.strict_preferences = Some(strict);
        tracing::info!("🔧 Strict preferences overridden to: {}", strict);
    }

    if let Err(e) = config.validate() {
        fail(&e);
    }

    let catalog = match config.catalog() {
        Ok(catalog) => catalog,
        Err(e) => fail(&e),
    };

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &catalog, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No assignment will be computed");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".");
    let pipeline = AllocationPipeline::new(storage, config, catalog);
    let engine = AllocationEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Allocation completed successfully!");
            println!("✅ Allocation completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, catalog: &ActivityCatalog, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Run: {}", config.run.name);
    if let Some(description) = &config.run.description {
        println!("  Description: {}", description);
    }
    println!(
        "  Input: {} (columns: {}, {})",
        config.input_path(),
        config.participant_column(),
        config.preferences_column()
    );
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if let Some(archive) = config.archive_name() {
        println!("  Archive: {} (ZIP)", archive);
    }
    println!("  Strict preferences: {}", config.strict_preferences());

    println!();
    println!(
        "🎯 Activities ({} activities, {} slots):",
        catalog.len(),
        catalog.total_capacity()
    );
    for activity in catalog.activities() {
        println!("  {} -> {}", activity.name, activity.capacity);
    }

    if args.dry_run {
        println!();
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn fail(e: &AllocError) -> ! {
    tracing::error!(
        "❌ Allocation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}
