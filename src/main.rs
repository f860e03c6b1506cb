use clap::Parser;
use pref_assign::config::activities::load_catalog;
use pref_assign::utils::error::AllocError;
use pref_assign::utils::{logger, validation::Validate};
use pref_assign::{AllocationEngine, AllocationPipeline, CliConfig, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting pref-assign CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        fail(&e);
    }

    // 活動容量設定在讀取任何資料前就先驗證
    let catalog = match load_catalog(&config.activities) {
        Ok(catalog) => catalog,
        Err(e) => fail(&e),
    };
    tracing::info!(
        "📋 {} activities, {} slots",
        catalog.len(),
        catalog.total_capacity()
    );

    let monitor_enabled = config.monitor;
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
