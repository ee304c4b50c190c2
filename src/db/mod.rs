use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::time::Duration;

use crate::{config::Config, errors::AppResult};

const APP_NAME: &str = "question-forge";

/// Pool and timeout settings for the question store.
fn apply_settings(options: &mut ClientOptions, config: &Config) {
    let timeout = Duration::from_secs(config.mongo_timeout_secs.max(1));

    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    options.app_name = Some(APP_NAME.to_string());
    options.max_pool_size = Some(config.mongo_max_pool_size.max(1));
    options.min_pool_size = Some(config.mongo_max_pool_size.clamp(1, 2));
    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);
}

async fn ping(client: &Client) -> AppResult<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;
    Ok(())
}

/// Handle on the database holding questions, exams and their categories.
#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ClientOptions::parse(&config.mongo_conn_string).await?;
        apply_settings(&mut options, config);

        let client = Client::with_options(options)?;
        ping(&client).await?;

        log::info!(
            "Connected to MongoDB database '{}' (pool of {})",
            config.mongo_db_name,
            config.mongo_max_pool_size
        );

        Ok(Self {
            client,
            db_name: config.mongo_db_name.clone(),
        })
    }

    pub fn get_collection<T>(&self, collection_name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client
            .database(&self.db_name)
            .collection(collection_name)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        ping(&self.client).await.inspect_err(|err| {
            log::warn!("MongoDB health check failed for '{}': {}", self.db_name, err);
        })
    }
}
