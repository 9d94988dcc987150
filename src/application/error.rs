// Engine error taxonomy
use thiserror::Error;

/// Failures that stop a run. Per-resource and per-SLO problems never reach here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("resource discovery failed: {0:#}")]
    Discovery(#[source] anyhow::Error),

    #[error("could not publish dashboard '{dashboard}': {source:#}")]
    Publish {
        dashboard: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("could not render dashboard body: {0}")]
    Render(#[from] serde_json::Error),
}

/// A builder could not make sense of a resource; the resource is skipped
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("malformed ARN {arn}: {reason}")]
    MalformedArn { arn: String, reason: &'static str },
}

impl BuildError {
    pub fn malformed(arn: &str, reason: &'static str) -> Self {
        BuildError::MalformedArn {
            arn: arn.to_string(),
            reason,
        }
    }
}
