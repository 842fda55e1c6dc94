use clap::Parser;
use std::path::Path;
use waste_vision::config::cli::load_detections;
use waste_vision::core::detector::DEFAULT_CLASSES;
use waste_vision::core::PolicyAdvisor;
use waste_vision::domain::model::{Locality, PolicyQuery};
use waste_vision::utils::{logger, validation::Validate};
use waste_vision::{CliConfig, Orchestrator, PolicyResolver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting waste-vision CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證輸入
    if let Err(e) = cli.validate() {
        tracing::error!("❌ Invalid arguments: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let config = match cli.resolver_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if config.api_key.is_none() {
        tracing::warn!("💡 GEMINI_API_KEY not set, every lookup will fall back to Unknown");
    }

    let resolver = PolicyResolver::new(config);
    let city = cli.city.clone();

    // 單一材質模式
    if let Some(material) = &cli.material {
        if !DEFAULT_CLASSES.contains(&material.as_str()) {
            tracing::debug!(
                "'{}' is not one of the model's default classes {:?}",
                material,
                DEFAULT_CLASSES
            );
        }

        let query = PolicyQuery {
            city: city.clone(),
            material: material.clone(),
        };
        let policy = resolver.resolve(&query).await;

        println!("{}", serde_json::to_string_pretty(&policy)?);
        tracing::info!(
            "✅ '{}' in {} goes to: {}",
            material,
            city,
            policy.bin.as_str()
        );
        return Ok(());
    }

    // validate() 已保證 material 和 detections 至少有一個
    let Some(path) = &cli.detections else {
        anyhow::bail!("either --material or --detections is required");
    };

    let detections = load_detections(Path::new(path))?;
    tracing::info!("📥 Loaded {} detections from {}", detections.len(), path);

    let orchestrator = Orchestrator::new(resolver);
    let locality = Locality { city: city.clone() };
    let result = orchestrator.resolve_all(detections, &locality).await;
    let resolved_count = result.items.len();

    let report = serde_json::json!({
        "city": city,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "detections": result.items,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    tracing::info!("✅ Resolved {} detections for {}", resolved_count, city);

    Ok(())
}
