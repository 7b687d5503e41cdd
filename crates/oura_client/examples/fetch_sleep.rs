//! Fetch and reshape today's sleep records.
//!
//! Usage: OURA_ACCESS_TOKEN=... cargo run --example fetch_sleep

use oura_client::http_client::ReqwestOuraClient;
use oura_client::transform::reshape;
use oura_client::{DateRange, Endpoint, OuraClient};
use secrecy::SecretString;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let token = std::env::var("OURA_ACCESS_TOKEN")
        .map_err(|_| "OURA_ACCESS_TOKEN must be set")?;

    let client = ReqwestOuraClient::new(
        "https://api.ouraring.com",
        SecretString::new(token.into_boxed_str()),
    );

    let raw = client
        .fetch_records(Endpoint::Sleep, DateRange::today())
        .await?;
    let cleaned = reshape(Endpoint::Sleep, &raw);
    println!("{}", serde_json::to_string_pretty(&cleaned)?);

    Ok(())
}
