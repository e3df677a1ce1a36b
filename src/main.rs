use automl::utils::error::{AutoMlError, ErrorSeverity};
use automl::utils::{logger, validation::Validate};
use automl::{AutoMlEngine, AutoMlPipeline, CliConfig, LocalStorage};
use clap::Parser;

fn exit_code(e: &AutoMlError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report_failure(stage: &str, e: &AutoMlError) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // `[monitoring] log_json` in the config file also selects the JSON logger.
    let resolved = cli.validate().and_then(|_| cli.resolve());
    let log_json = match &resolved {
        Ok(config) => config.log_json(),
        Err(_) => cli.log_json,
    };
    if log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting automl CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match resolved {
        Ok(config) => config,
        Err(e) => report_failure("Configuration validation", &e),
    };

    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // Dataset paths and the output path are resolved from the working directory.
    let storage = LocalStorage::new(".");
    let pipeline = AutoMlPipeline::new(storage, config);
    let mut engine = AutoMlEngine::new_with_monitoring(pipeline, monitor_enabled);

    if cli.profile_only {
        match engine.profile().await {
            Ok(descriptor) => {
                tracing::info!("Task type: {}", descriptor.infer_task_type());
                println!("{}", serde_json::to_string_pretty(&descriptor)?);
            }
            Err(e) => report_failure("Profiling", &e),
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Data preparation completed successfully!");
            println!("✅ Data preparation completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => report_failure(&format!("Stage {}", engine.status()), &e),
    }

    Ok(())
}
