// AWS SDK configuration and per-region client sets
use anyhow::anyhow;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::collections::BTreeMap;

const MAX_ATTEMPTS: u32 = 5;

/// Default credential chain, standard retry mode
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .retry_config(RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS))
        .load()
        .await
}

/// One SDK client per region the engine talks to
#[derive(Clone)]
pub struct RegionalClients<C> {
    clients: BTreeMap<String, C>,
}

impl<C> RegionalClients<C> {
    pub fn new(clients: BTreeMap<String, C>) -> Self {
        Self { clients }
    }

    pub async fn load(regions: &[&str], make: impl Fn(&SdkConfig) -> C) -> Self {
        let mut clients = BTreeMap::new();
        for region in regions {
            if clients.contains_key(*region) {
                continue;
            }
            let sdk_config = load_sdk_config(region).await;
            clients.insert(region.to_string(), make(&sdk_config));
        }
        Self::new(clients)
    }

    pub fn get(&self, region: &str) -> anyhow::Result<&C> {
        self.clients
            .get(region)
            .ok_or_else(|| anyhow!("no AWS client configured for region {}", region))
    }
}
