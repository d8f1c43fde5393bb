use clap::Parser;
use five_day_market::adapters::{load_catalog, FixedPosition, LocalStorage, NoPosition};
use five_day_market::app::{listing, MapFrame};
use five_day_market::core::finder::{ListingStatus, MarketFinder};
use five_day_market::core::Storage;
use five_day_market::domain::ports::PositionProvider;
use five_day_market::utils::{logger, validation::Validate};
use five_day_market::{CliArgs, FinderConfig, FinderError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    if config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting five-day-market");
    tracing::debug!("Effective config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    if let Err(e) = run(&args, &config).await {
        tracing::error!(
            "❌ Market search failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn run(args: &CliArgs, config: &FinderConfig) -> Result<(), FinderError> {
    let date = args.date()?;
    let storage = LocalStorage::new(".".to_string());

    let catalog = load_catalog(&storage, &config.catalog.path, config.catalog.format).await?;
    let finder = MarketFinder::new(catalog);

    let provider: Box<dyn PositionProvider> = match config.user_position() {
        Some(position) => Box::new(FixedPosition(position)),
        None => Box::new(NoPosition),
    };

    let (found, fix) = finder
        .run(date, provider.as_ref(), config.position_timeout())
        .await;

    match (found.status(), &fix) {
        (ListingStatus::Empty, _) => tracing::info!("🏪 No market opens on {}", date),
        (_, Ok(_)) => tracing::info!("✅ {} markets, nearest first", found.len()),
        (_, Err(unavailable)) => tracing::info!(
            "ℹ️ {} markets in catalog order ({})",
            found.len(),
            unavailable.reason.message()
        ),
    }

    let frame = config
        .include_map()
        .then(|| MapFrame::from_listing(&found, config.map.viewport, config.viewport_padding()));
    let rendered = listing::render(&found, config.output.format, frame.as_ref())?;

    match &config.output.path {
        Some(path) => {
            storage.write_file(path, rendered.as_bytes()).await?;
            tracing::info!("📁 Output saved to: {}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
