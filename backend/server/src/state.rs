use std::sync::Arc;

use anyhow::Result;
use roster::{default_roster, load_roster};
use tracing::{error, info};

use super::{
    config::Config,
    database::{PeopleStore, open_store, seed_if_empty},
    firebase::client_script,
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn PeopleStore>,
    pub firebase_script: String,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>> {
        let store = open_store(&config.store_url).await.inspect_err(|e| {
            error!("Failed to open store: {e}");
        })?;

        let people = match &config.roster_path {
            Some(path) => {
                info!("Loading roster from {}", path.display());
                load_roster(path)?
            }
            None => default_roster(),
        };

        seed_if_empty(store.as_ref(), &people)
            .await
            .inspect_err(|e| {
                error!("Failed to seed store: {e}");
            })?;

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn PeopleStore>) -> Arc<Self> {
        let firebase_script = client_script(&config.firebase_config, &config.app_id);

        Arc::new(Self {
            config,
            store,
            firebase_script,
        })
    }
}
