use mongodb::{options::ClientOptions, Client};

use super::AppConfig;

pub async fn setup_mongo(config: &AppConfig) -> mongodb::error::Result<Client> {
    let mut client_options = ClientOptions::parse(&config.mongo_url).await?;
    client_options.app_name = Some("portfolio-api".to_string());
    Client::with_options(client_options)
}
