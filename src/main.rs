use hh_vacancy_harvester::{
    config::{get_config, init_config},
    database::pool::create_pool,
    menu::run_menu,
    services::{
        harvest_service::HarvestService, hh_service::HhService, store_service::StoreService,
    },
};
use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();

    info!("Connecting to database...");
    let pool = create_pool().await?;
    let store = StoreService::new(pool);

    if config.reset_database {
        store.reset_schema().await?;
    } else {
        store.create_tables().await?;
    }

    let hh = HhService::new(
        config.hh_api_base_url.clone(),
        config.hh_user_agent.clone(),
        config.vacancies_per_page,
    );
    let harvest = HarvestService::new(hh, store.clone(), config.fetch_delay);
    let report = harvest.run(&config.employers).await;
    if !report.skipped.is_empty() {
        warn!("Skipped employers: {}", report.skipped.join(", "));
    }
    info!(
        "Stored {} employers and {} vacancies",
        report.employers, report.vacancies
    );

    run_menu(&store, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    store.close().await;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    if let Err(e) = run().await {
        error!("Critical error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
