use anyhow::Result;
use dotenv::dotenv;

use travelplan::{ItineraryPlanner, TravelPlanConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = TravelPlanConfig::load()?;
    logging::init(&config.logging)?;

    let planner = ItineraryPlanner::from_config(&config)?;
    tracing::info!(
        "Starting TravelPlan {} (attractions from {:?}, max {} days)",
        travelplan::VERSION,
        planner.attraction_source(),
        config.server.max_days
    );

    web::run(&config.server, planner).await
}
