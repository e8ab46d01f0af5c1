use chrono::{DateTime, Utc};
use tracing::info;

use booker25::{Client, ClientConfig, Resource};

const USAGE: &str = "usage: booker25 [FROM TO]  (RFC 3339 timestamps)";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("BOOKER25_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    booker25::observability::init(metrics_port)?;

    let config = ClientConfig::from_env()?;
    info!("booker25 client");
    info!("  environment: {}", config.environment);
    info!("  base_url: {}", config.base_url());
    info!("  metrics: {}", metrics_port.map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics")));

    let client = Client::new(&config)?;
    let mut request = client.build_resource_request();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {}
        [from, to] => {
            let from: DateTime<Utc> = from.parse()?;
            let to: DateTime<Utc> = to.parse()?;
            info!("  window: {from} .. {to}");
            request = request.with_available_slots_between(from, to).with_services();
        }
        _ => return Err(USAGE.into()),
    }

    let result = client.get_resources(&request).await?;
    info!("{} resources", result.number_of_resources());

    let resources: Vec<&Resource> = result.resources().collect();
    println!("{}", serde_json::to_string_pretty(&resources)?);
    Ok(())
}
