//! Readiness probes for external dependencies.

use async_trait::async_trait;

/// A dependency that `/ready` can probe, such as the database or the cache.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Component name shown in the readiness report.
    fn name(&self) -> &str;

    async fn check(&self) -> HealthStatus;
}

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    /// Usable with reduced function; does not fail readiness.
    Degraded(String),
    /// Unusable; fails readiness.
    Unhealthy(String),
}

impl HealthStatus {
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    #[must_use]
    pub const fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }

    /// Short status label for the readiness report.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "UP",
            Self::Degraded(_) => "DEGRADED",
            Self::Unhealthy(_) => "DOWN",
        }
    }

    /// Failure or degradation reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Healthy => None,
            Self::Degraded(reason) | Self::Unhealthy(reason) => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_is_not_unhealthy() {
        let degraded = HealthStatus::Degraded("slow".to_string());
        assert!(!degraded.is_healthy());
        assert!(!degraded.is_unhealthy());
        assert_eq!(degraded.label(), "DEGRADED");
        assert_eq!(degraded.reason(), Some("slow"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(HealthStatus::Healthy.label(), "UP");
        assert_eq!(HealthStatus::Unhealthy("refused".to_string()).label(), "DOWN");
        assert_eq!(HealthStatus::Healthy.reason(), None);
    }
}
