// Tag-indexed resource inventory
use async_trait::async_trait;

#[async_trait]
pub trait ResourceInventory: Send + Sync {
    /// ARNs in `region` tagged exactly `tag_key=tag_value` and matching one of the type filters
    async fn list_resources(
        &self,
        region: &str,
        tag_key: &str,
        tag_value: &str,
        resource_type_filters: &[&str],
    ) -> anyhow::Result<Vec<String>>;
}
