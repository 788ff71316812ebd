use std::{collections::HashMap, sync::Arc, time::Instant};

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    clients::generation::{GenerationClient, GenerationError},
    generator::NotificationGenerator,
    models::health::{HealthCheckResponse, HealthStatus, PolicySummary, ServiceHealth},
};

pub struct HealthChecker {
    client: Arc<dyn GenerationClient>,
    policy: PolicySummary,
}

impl HealthChecker {
    pub fn new(generator: &NotificationGenerator) -> Self {
        Self {
            client: Arc::clone(generator.client()),
            policy: PolicySummary {
                payload_mode: generator.payload_mode(),
                milestone_threshold: generator.policy().milestone_threshold,
                max_attempts: generator.retry_config().max_attempts,
            },
        }
    }

    pub async fn check_all(&self) -> HealthCheckResponse {
        let mut checks = HashMap::new();

        let generation_health = self.check_generation_service().await;
        checks.insert("generation_service".to_string(), generation_health);

        let overall_status = self.determine_overall_status(&checks);

        HealthCheckResponse {
            status: overall_status,
            timestamp: Utc::now(),
            checks,
            policy: self.policy.clone(),
        }
    }

    async fn check_generation_service(&self) -> ServiceHealth {
        let start = Instant::now();

        match self.client.health_check().await {
            Ok(()) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(response_time_ms = elapsed, "Generation service health check passed");
                ServiceHealth::healthy(elapsed)
            }
            Err(e @ GenerationError::Status { .. }) | Err(e @ GenerationError::Timeout(_)) => {
                warn!(error = %e, "Generation service health check failed");
                ServiceHealth::degraded(e.to_string())
            }
            Err(e) => {
                warn!(error = %e, "Generation service unreachable");
                ServiceHealth::unhealthy(e.to_string())
            }
        }
    }

    fn determine_overall_status(&self, checks: &HashMap<String, ServiceHealth>) -> HealthStatus {
        let has_unhealthy = checks
            .values()
            .any(|health| health.status == HealthStatus::Unhealthy);

        let has_degraded = checks
            .values()
            .any(|health| health.status == HealthStatus::Degraded);

        if has_unhealthy {
            HealthStatus::Unhealthy
        } else if has_degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}
