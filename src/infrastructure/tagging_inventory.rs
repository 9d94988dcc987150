// Resource Groups Tagging API adapter
use crate::application::resource_inventory::ResourceInventory;
use crate::infrastructure::aws_clients::RegionalClients;
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_resourcegroupstagging::Client;
use aws_sdk_resourcegroupstagging::types::TagFilter;

pub struct TaggingInventory {
    clients: RegionalClients<Client>,
}

impl TaggingInventory {
    pub fn new(clients: RegionalClients<Client>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl ResourceInventory for TaggingInventory {
    async fn list_resources(
        &self,
        region: &str,
        tag_key: &str,
        tag_value: &str,
        resource_type_filters: &[&str],
    ) -> anyhow::Result<Vec<String>> {
        let client = self.clients.get(region)?;
        let tag_filter = TagFilter::builder().key(tag_key).values(tag_value).build();
        let type_filters: Vec<String> = resource_type_filters.iter().map(|f| f.to_string()).collect();

        let mut arns = Vec::new();
        let mut pagination_token: Option<String> = None;
        loop {
            let output = client
                .get_resources()
                .tag_filters(tag_filter.clone())
                .set_resource_type_filters(Some(type_filters.clone()))
                .set_pagination_token(pagination_token.take())
                .send()
                .await
                .map_err(|e| e.into_service_error())
                .with_context(|| format!("GetResources in {} failed", region))?;

            arns.extend(
                output
                    .resource_tag_mapping_list()
                    .iter()
                    .filter_map(|mapping| mapping.resource_arn().map(str::to_string)),
            );

            // An empty token marks the last page
            pagination_token = output
                .pagination_token()
                .filter(|token| !token.is_empty())
                .map(str::to_string);
            if pagination_token.is_none() {
                break;
            }
        }

        tracing::debug!("GetResources in {} returned {} ARNs", region, arns.len());
        Ok(arns)
    }
}
