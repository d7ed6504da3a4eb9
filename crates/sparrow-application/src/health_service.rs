//! Backend health state for the console banner.
//!
//! A failed probe sticks until a manual retry succeeds; nothing here
//! retries automatically.

use sparrow_core::backend::HealthStatus;
use sparrow_core::gateway::HealthGateway;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Last known backend health.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthState {
    /// No probe has run yet.
    Unknown,
    Healthy { version: Option<String> },
    Unreachable { message: String },
}

/// Tracks the backend health banner state.
pub struct HealthService {
    gateway: Arc<dyn HealthGateway>,
    state: RwLock<HealthState>,
}

impl HealthService {
    pub fn new(gateway: Arc<dyn HealthGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(HealthState::Unknown),
        }
    }

    /// Probes the backend and records the outcome. Also used by the manual
    /// retry action on the banner.
    pub async fn check(&self) -> HealthState {
        let next = match self.gateway.check().await {
            Ok(status) if status.is_healthy() => HealthState::Healthy {
                version: status.version,
            },
            Ok(HealthStatus { status, .. }) => HealthState::Unreachable {
                message: format!("backend reported status '{status}'"),
            },
            Err(err) => HealthState::Unreachable {
                message: err.to_string(),
            },
        };

        let mut state = self.state.write().await;
        *state = next.clone();
        next
    }

    /// Last recorded state without probing.
    pub async fn last(&self) -> HealthState {
        self.state.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sparrow_core::error::{Result, SparrowError};
    use std::sync::Mutex;

    struct FlakyHealthGateway {
        responses: Mutex<Vec<Result<HealthStatus>>>,
    }

    #[async_trait]
    impl HealthGateway for FlakyHealthGateway {
        async fn check(&self) -> Result<HealthStatus> {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(SparrowError::internal("script exhausted")))
        }
    }

    #[tokio::test]
    async fn test_failure_sticks_until_manual_retry_succeeds() {
        // Responses pop from the back: first a failure, then a success.
        let gateway = Arc::new(FlakyHealthGateway {
            responses: Mutex::new(vec![
                Ok(HealthStatus {
                    status: "ok".into(),
                    version: Some("2.4.0".into()),
                }),
                Err(SparrowError::Network {
                    message: "connection refused".into(),
                    is_retryable: true,
                }),
            ]),
        });
        let service = HealthService::new(gateway);

        assert_eq!(service.last().await, HealthState::Unknown);

        let state = service.check().await;
        assert!(matches!(state, HealthState::Unreachable { .. }));
        // Still unreachable until someone retries.
        assert!(matches!(service.last().await, HealthState::Unreachable { .. }));

        let state = service.check().await;
        assert_eq!(
            state,
            HealthState::Healthy {
                version: Some("2.4.0".into())
            }
        );
    }

    #[tokio::test]
    async fn test_unhealthy_status_body_is_unreachable() {
        let gateway = Arc::new(FlakyHealthGateway {
            responses: Mutex::new(vec![Ok(HealthStatus {
                status: "degraded".into(),
                version: None,
            })]),
        });
        let service = HealthService::new(gateway);

        let state = service.check().await;
        match state {
            HealthState::Unreachable { message } => assert!(message.contains("degraded")),
            other => panic!("expected unreachable, got {other:?}"),
        }
    }
}
