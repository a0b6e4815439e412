//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the ledger.
//!
//! # Metrics
//!
//! - `metacoin_transfers_total` - Transfers applied
//! - `metacoin_transfer_failures_total` - Transfers rejected
//! - `metacoin_balance_queries_total` - Balance lookups served

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};
use std::fmt;
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Transfers applied
    pub transfers_total: IntCounter,

    /// Transfers rejected
    pub transfer_failures_total: IntCounter,

    /// Balance lookups served
    pub balance_queries_total: IntCounter,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("transfers_total", &self.transfers_total.get())
            .field("transfer_failures_total", &self.transfer_failures_total.get())
            .field("balance_queries_total", &self.balance_queries_total.get())
            .finish()
    }
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let transfers_total =
            IntCounter::new("metacoin_transfers_total", "Total number of transfers applied")?;
        registry.register(Box::new(transfers_total.clone()))?;

        let transfer_failures_total = IntCounter::new(
            "metacoin_transfer_failures_total",
            "Total number of transfers rejected",
        )?;
        registry.register(Box::new(transfer_failures_total.clone()))?;

        let balance_queries_total = IntCounter::new(
            "metacoin_balance_queries_total",
            "Total number of balance lookups",
        )?;
        registry.register(Box::new(balance_queries_total.clone()))?;

        Ok(Self {
            transfers_total,
            transfer_failures_total,
            balance_queries_total,
            registry,
        })
    }

    /// Record transfer outcome
    pub fn record_transfer(&self, applied: bool) {
        if applied {
            self.transfers_total.inc();
        } else {
            self.transfer_failures_total.inc();
        }
    }

    /// Record balance lookup
    pub fn record_balance_query(&self) {
        self.balance_queries_total.inc();
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render in the Prometheus text exposition format
    pub fn gather_text(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
