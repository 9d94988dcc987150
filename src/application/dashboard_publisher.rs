// Dashboard publishing port
use async_trait::async_trait;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishAck {
    /// Non-fatal validation messages returned by CloudWatch
    pub validation_messages: Vec<String>,
}

#[async_trait]
pub trait DashboardPublisher: Send + Sync {
    /// Replace the dashboard `name` with `body`
    async fn put_dashboard(&self, name: &str, body: &str) -> anyhow::Result<PublishAck>;
}
