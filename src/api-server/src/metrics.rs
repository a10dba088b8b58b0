//! Prometheus counters for authentication and authorization outcomes

use anyhow::Result;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use taskgate_authz::Decision;

/// Service metrics, registered on a private registry
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    decisions: IntCounterVec,
    authn_failures: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let decisions = IntCounterVec::new(
            Opts::new(
                "taskgate_authz_decisions_total",
                "Scope authorization decisions by outcome",
            ),
            &["decision"],
        )?;
        let authn_failures = IntCounter::new(
            "taskgate_authn_failures_total",
            "Requests rejected for missing or unknown credentials",
        )?;

        registry.register(Box::new(decisions.clone()))?;
        registry.register(Box::new(authn_failures.clone()))?;

        Ok(Self {
            registry,
            decisions,
            authn_failures,
        })
    }

    pub fn record_decision(&self, decision: Decision) {
        self.decisions.with_label_values(&[decision.as_str()]).inc();
    }

    pub fn record_authn_failure(&self) {
        self.authn_failures.inc();
    }

    pub fn decision_count(&self, decision: Decision) -> u64 {
        self.decisions.with_label_values(&[decision.as_str()]).get()
    }

    pub fn authn_failure_count(&self) -> u64 {
        self.authn_failures.get()
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_counters() {
        let metrics = Metrics::new().unwrap();
        metrics.record_decision(Decision::Allow);
        metrics.record_decision(Decision::Deny);
        metrics.record_decision(Decision::Deny);

        assert_eq!(metrics.decision_count(Decision::Allow), 1);
        assert_eq!(metrics.decision_count(Decision::Deny), 2);
    }

    #[test]
    fn test_render() {
        let metrics = Metrics::new().unwrap();
        metrics.record_decision(Decision::Allow);
        metrics.record_authn_failure();

        let text = metrics.render().unwrap();
        assert!(text.contains("taskgate_authz_decisions_total{decision=\"allow\"} 1"));
        assert!(text.contains("taskgate_authn_failures_total 1"));
    }

    #[test]
    fn test_registries_are_independent() {
        let a = Metrics::new().unwrap();
        let b = Metrics::new().unwrap();
        a.record_authn_failure();
        assert_eq!(b.authn_failure_count(), 0);
    }
}
