use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alertrelay_common::{AlertRecord, RuleDefinition};
use alertrelay_workers::alert::Compiler;
use alertrelay_workers::dispatch::{CycleOutcome, DispatchCycle, IntervalScheduler};
use alertrelay_workers::metrics::relay_metrics::RelayMetrics;
use alertrelay_workers::notifier::WebhookNotifier;
use alertrelay_workers::source::{AlertSource, RuleSource, SourceError};
use chrono::{TimeZone, Utc};
use mockito::Matcher;
use serde_json::json;
use tokio::sync::watch;

struct FakeDatabase {
    alerts: Vec<AlertRecord>,
    rules: Vec<RuleDefinition>,
    alert_queries: AtomicUsize,
    rule_queries: AtomicUsize,
}

impl FakeDatabase {
    fn new(alerts: Vec<AlertRecord>, rules: Vec<RuleDefinition>) -> Arc<Self> {
        Arc::new(Self {
            alerts,
            rules,
            alert_queries: AtomicUsize::new(0),
            rule_queries: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl AlertSource for FakeDatabase {
    async fn active_alerts(&self) -> Result<Vec<AlertRecord>, SourceError> {
        self.alert_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.alerts.clone())
    }
}

#[async_trait::async_trait]
impl RuleSource for FakeDatabase {
    async fn active_rules(&self) -> Result<Vec<RuleDefinition>, SourceError> {
        self.rule_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.rules.clone())
    }
}

fn rule(rule_id: i64, domain: &str) -> RuleDefinition {
    RuleDefinition {
        domain_id: rule_id * 10,
        domain: domain.into(),
        rule_id,
        rule_code: "1002".into(),
        rule_name: "http codes".into(),
        threshold_high: 5.0,
        threshold_low: 1.0,
        unit: "%".into(),
        attention_threshold: 0,
        customer_id: 3,
        notify_email: "noc@example.com".into(),
        response_code: "500".into(),
        diff_type: 0,
    }
}

fn alert(id: i64, rule_id: i64, code: &str, value: f64, first_seen: i64, diagnostic: &str) -> AlertRecord {
    AlertRecord {
        id,
        alert_type: 1,
        rule_id,
        code: code.into(),
        threshold_high: 5.0,
        threshold_low: 1.0,
        unit: "%".into(),
        value,
        first_seen: Some(Utc.timestamp_opt(first_seen, 0).unwrap()),
        last_updated: None,
        repeat_count: 1,
        status: 1,
        customer_id: 3,
        customer_name: "acme".into(),
        diagnostic: diagnostic.into(),
    }
}

fn cycle(db: Arc<FakeDatabase>, url: String, metrics: Arc<RelayMetrics>) -> DispatchCycle {
    DispatchCycle::new(
        db.clone(),
        db,
        Arc::new(WebhookNotifier::new(url)),
        Compiler::default(),
        metrics,
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn enriched_batch_posted_to_webhook() {
    let mut edge = rule(20, "video.example.com");
    edge.rule_code = "0302".into();
    edge.unit = "Mbps".into();
    edge.threshold_high = 30.0;
    edge.threshold_low = 20.0;
    edge.diff_type = 7;
    edge.notify_email = "only_cdn_devops@example.com".into();

    let db = FakeDatabase::new(
        vec![
            alert(1, 10, "1002", 12.34, 1_600_706_700, ""),
            alert(
                2,
                10,
                "1005",
                8.67,
                1_600_706_700,
                "1600706700:8.670:(6935/79986):410 499:410/6914 499/21",
            ),
            alert(3, 20, "0302", -99.97, 1_600_755_000, "1600755000:7.2886,1600150200:26158.3969"),
            alert(4, 99, "0401", 1.0, 1_600_706_700, ""),
            alert(5, 10, "1007", 9.0, 1_600_706_700, "1600706700:8.670"),
        ],
        vec![rule(10, "cdn.example.com"), edge],
    );

    let mut server = mockito::Server::new_async().await;
    let expected = json!([
        {
            "startsAt": "2020-09-22T00:45:00+08:00",
            "labels": {
                "alertname": "HTTP Code Sum Error(1002)",
                "customer": "acme",
                "domain": "cdn.example.com",
                "rule_id": "1002",
                "severity": "critical",
                "to_customer": "yes",
                "zenlayer_aiop": "yes"
            },
            "annotations": {
                "description": "threshold: gt 5.00%, VALUE: 12.34%, http code: 500"
            }
        },
        {
            "startsAt": "2020-09-22T00:45:00+08:00",
            "labels": {
                "alertname": "HTTP Error Code High(1005)",
                "customer": "acme",
                "domain": "cdn.example.com",
                "rule_id": "1005",
                "severity": "critical",
                "to_customer": "yes",
                "zenlayer_aiop": "yes"
            },
            "annotations": {
                "description": "threshold: gt 5.00%, VALUE: 8.67%, count: (6935/79986), detail: 410/6914 499/21"
            }
        },
        {
            "startsAt": "2020-09-22T14:10:00+08:00",
            "labels": {
                "alertname": "Edge Server Bandwidth Error(0302)",
                "customer": "acme",
                "domain": "video.example.com",
                "rule_id": "0302",
                "severity": "critical",
                "to_customer": "no",
                "zenlayer_aiop": "yes"
            },
            "annotations": {
                "description": "threshold: (gt 30.00Mbps || lt -20.00Mbps), VALUE: -99.97%, detail: 2020-09-22T14:10:00+08:00 > 7.2886Mb/s, 2020-09-15T14:10:00+08:00 > 26158.3969Mb/s"
            }
        }
    ]);
    let mock = server
        .mock("POST", "/api/v1/alerts")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(expected))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let metrics = RelayMetrics::new();
    let c = cycle(db.clone(), format!("{}/api/v1/alerts", server.url()), metrics.clone());

    let outcome = c.run_once().await;
    assert_eq!(outcome, CycleOutcome::Delivered { count: 3, dropped: 2 });
    mock.assert_async().await;

    assert_eq!(db.rule_queries.load(Ordering::SeqCst), 1);
    assert_eq!(metrics.alerts_fetched_val(), 5);
    assert_eq!(metrics.alerts_dropped_val(), 2);
    assert_eq!(metrics.notifications_delivered_val(), 3);
}

#[tokio::test]
async fn no_alerts_means_no_rule_query_and_no_post() {
    let db = FakeDatabase::new(vec![], vec![rule(10, "cdn.example.com")]);

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let c = cycle(db.clone(), server.url(), RelayMetrics::new());
    assert_eq!(c.run_once().await, CycleOutcome::NoAlerts);

    assert_eq!(db.alert_queries.load(Ordering::SeqCst), 1);
    assert_eq!(db.rule_queries.load(Ordering::SeqCst), 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn rejected_webhook_does_not_stop_the_next_cycle() {
    let db = FakeDatabase::new(
        vec![alert(1, 10, "0701", 71.2, 1_600_706_700, "")],
        vec![rule(10, "cdn.example.com")],
    );

    let mut server = mockito::Server::new_async().await;
    let failing = server
        .mock("POST", "/")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let metrics = RelayMetrics::new();
    let c = cycle(db.clone(), format!("{}/", server.url()), metrics.clone());
    assert_eq!(c.run_once().await, CycleOutcome::DeliveryFailed { count: 1 });
    failing.assert_async().await;
    failing.remove_async().await;

    let ok = server
        .mock("POST", "/")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    assert_eq!(
        c.run_once().await,
        CycleOutcome::Delivered { count: 1, dropped: 0 }
    );
    ok.assert_async().await;

    assert_eq!(metrics.cycles_run_val(), 2);
    assert_eq!(metrics.deliveries_failed_val(), 1);
}

#[tokio::test]
async fn scheduler_drives_cycles_until_stopped() {
    let db = FakeDatabase::new(vec![], vec![]);
    let metrics = RelayMetrics::new();
    let c = Arc::new(cycle(db.clone(), "http://127.0.0.1:1/".into(), metrics.clone()));

    let (stop_tx, stop_rx) = watch::channel(false);
    let scheduler = IntervalScheduler::new(Duration::from_millis(10));
    let worker = c.clone();
    let handle = tokio::spawn(async move {
        scheduler
            .run(
                move || {
                    let c = worker.clone();
                    async move {
                        c.run_once().await;
                    }
                },
                stop_rx,
            )
            .await
    });

    tokio::time::timeout(Duration::from_secs(2), async {
        while metrics.cycles_run_val() < 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("scheduler did not run three cycles");

    stop_tx.send(true).unwrap();
    let runs = handle.await.unwrap();
    assert!(runs >= 3);
    assert_eq!(db.rule_queries.load(Ordering::SeqCst), 0);
}
