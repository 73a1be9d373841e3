use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use alertrelay_common::{cycle_id, AlertRecord, CompiledNotification};
use tracing::Instrument;

use crate::alert::{Compiler, RuleIndex};
use crate::metrics::relay_metrics::RelayMetrics;
use crate::notifier::{NotificationSink, NotifyError};
use crate::source::{AlertSource, RuleSource, SourceError};

/// How a single pass over the alert table ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    NoAlerts,
    SourceUnavailable,
    NoRules,
    NothingToSend { dropped: usize },
    Delivered { count: usize, dropped: usize },
    DeliveryFailed { count: usize },
}

pub struct DispatchCycle {
    alerts: Arc<dyn AlertSource>,
    rules: Arc<dyn RuleSource>,
    sink: Arc<dyn NotificationSink>,
    compiler: Compiler,
    metrics: Arc<RelayMetrics>,
    call_timeout: Duration,
}

impl DispatchCycle {
    pub fn new(
        alerts: Arc<dyn AlertSource>,
        rules: Arc<dyn RuleSource>,
        sink: Arc<dyn NotificationSink>,
        compiler: Compiler,
        metrics: Arc<RelayMetrics>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            alerts,
            rules,
            sink,
            compiler,
            metrics,
            call_timeout,
        }
    }

    pub async fn run_once(&self) -> CycleOutcome {
        let cycle_id = cycle_id::generate();
        let span = tracing::info_span!("dispatch_cycle", %cycle_id);
        let start = Instant::now();

        let outcome = self.run_inner().instrument(span).await;

        self.metrics.inc_cycles_run();
        self.metrics.record_cycle_latency(start);
        if matches!(
            outcome,
            CycleOutcome::SourceUnavailable | CycleOutcome::NoRules
        ) {
            self.metrics.inc_cycles_aborted();
        }
        outcome
    }

    async fn run_inner(&self) -> CycleOutcome {
        let alerts = match bounded(self.call_timeout, self.alerts.active_alerts(), SourceError::Timeout).await {
            Ok(alerts) => alerts,
            Err(e) => {
                tracing::error!(error = %e, "fetching alerts failed");
                return CycleOutcome::SourceUnavailable;
            }
        };
        self.metrics.add_alerts_fetched(alerts.len() as u64);
        if alerts.is_empty() {
            tracing::debug!("no active alerts");
            return CycleOutcome::NoAlerts;
        }

        let rules = match bounded(self.call_timeout, self.rules.active_rules(), SourceError::Timeout).await {
            Ok(rules) => rules,
            Err(e) => {
                tracing::error!(error = %e, "fetching rules failed");
                return CycleOutcome::SourceUnavailable;
            }
        };
        if rules.is_empty() {
            tracing::warn!(alerts = alerts.len(), "no enabled rules, skipping cycle");
            return CycleOutcome::NoRules;
        }

        let index = RuleIndex::build(rules);
        let (batch, dropped) = self.compile_all(&index, &alerts);
        tracing::info!(
            alerts = alerts.len(),
            rules = index.len(),
            notifications = batch.len(),
            dropped,
            "cycle compiled"
        );

        if batch.is_empty() {
            return CycleOutcome::NothingToSend { dropped };
        }

        let count = batch.len();
        match bounded(self.call_timeout, self.sink.deliver(&batch), NotifyError::Timeout).await {
            Ok(()) => {
                self.metrics.add_notifications_delivered(count as u64);
                tracing::info!(sink = self.sink.name(), count, "batch delivered");
                CycleOutcome::Delivered { count, dropped }
            }
            Err(e) => {
                self.metrics.inc_deliveries_failed();
                tracing::error!(sink = self.sink.name(), count, error = %e, "delivery failed, batch lost");
                CycleOutcome::DeliveryFailed { count }
            }
        }
    }

    fn compile_all(
        &self,
        index: &RuleIndex,
        alerts: &[AlertRecord],
    ) -> (Vec<CompiledNotification>, usize) {
        let (matched, missing) = index.join(alerts);
        for m in &missing {
            self.metrics.inc_alerts_dropped();
            tracing::warn!(alert_id = m.alert_id, rule_id = m.rule_id, "no rule for alert");
        }

        let mut batch = Vec::with_capacity(matched.len());
        let mut dropped = missing.len();
        for (rule, alert) in matched {
            let domains = index.domains(rule.rule_id);
            if domains.len() > 1 {
                tracing::debug!(
                    alert_id = alert.id,
                    rule_id = rule.rule_id,
                    domains = ?domains,
                    rendered = %rule.domain,
                    "rule fans out to several domains"
                );
            }
            if !alert.kind().is_known() {
                tracing::warn!(alert_id = alert.id, code = %alert.code, "unrecognised alert code");
            }
            match self.compiler.compile(rule, alert) {
                Ok(notification) => batch.push(notification),
                Err(e) => {
                    dropped += 1;
                    self.metrics.inc_alerts_dropped();
                    tracing::warn!(
                        alert_id = alert.id,
                        rule_id = rule.rule_id,
                        raw = %alert.diagnostic,
                        error = %e,
                        "alert rejected"
                    );
                }
            }
        }
        (batch, dropped)
    }
}

async fn bounded<T, E>(
    limit: Duration,
    call: impl Future<Output = Result<T, E>>,
    on_timeout: impl FnOnce(Duration) -> E,
) -> Result<T, E> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(limit)),
    }
}
