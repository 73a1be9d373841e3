use std::time::Duration;

use alertrelay_common::{AlertRecord, RuleDefinition};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use super::provider::{AlertSource, RuleSource, SourceError};

// Nullable numeric columns are read as `Option` and zero-filled on mapping,
// so one incomplete row cannot fail the whole fetch. `* 1e0` yields DOUBLE
// from DECIMAL or FLOAT columns on every MySQL version.
const ACTIVE_ALERTS_SQL: &str = r#"
SELECT
    CAST(fa.id AS SIGNED) AS id,
    CAST(fa.fm_type AS SIGNED) AS alert_type,
    CAST(fa.fm_ruleid AS SIGNED) AS rule_id,
    COALESCE(fa.fm_itemcode, '') AS code,
    fa.fm_thresholdhigh * 1e0 AS threshold_high,
    fa.fm_thresholdlow * 1e0 AS threshold_low,
    COALESCE(fa.fm_unit, '') AS unit,
    fa.fm_alarmvalue * 1e0 AS value,
    fa.fm_begintime AS first_seen,
    fa.fm_latelytime AS last_updated,
    CAST(fa.fm_alarmtimes AS SIGNED) AS repeat_count,
    CAST(fa.fm_alarmstatus AS SIGNED) AS status,
    CAST(fa.fm_ciid AS SIGNED) AS customer_id,
    COALESCE(fa.fm_ciname, '') AS customer_name,
    COALESCE(fa.fm_extrainfo, '') AS diagnostic
FROM fm_alarminfo AS fa
WHERE fa.fm_latelytime >= DATE_ADD(NOW(), INTERVAL ? MINUTE)"#;

const ACTIVE_RULES_SQL: &str = r#"
SELECT
    CAST(COALESCE(rfmd.domain_id, 0) AS SIGNED) AS domain_id,
    COALESCE(rfmd.domain_name, '') AS domain,
    CAST(rfmr.id AS SIGNED) AS rule_id,
    COALESCE(rfmi.item_code, '') AS rule_code,
    COALESCE(rfmi.item_name, '') AS rule_name,
    rfmr.threshold_high * 1e0 AS threshold_high,
    rfmr.threshold_low * 1e0 AS threshold_low,
    COALESCE(rfmr.unit, '') AS unit,
    CAST(COALESCE(rfmr.attention_threshold, 0) AS SIGNED) AS attention_threshold,
    CAST(COALESCE(rfmr.ci_id, 0) AS SIGNED) AS customer_id,
    COALESCE(rfmr.notify_mail, '') AS notify_email,
    COALESCE(rfmr.res_code, '') AS response_code,
    CAST(COALESCE(rfmr.diff_type, 0) AS SIGNED) AS diff_type
FROM real_flux_monitor_rule rfmr
    LEFT JOIN real_flux_monitor_item rfmi ON rfmr.item_id = rfmi.item_code
    LEFT JOIN real_flux_monitor_domain rfmd ON rfmr.id = rfmd.rule_id
WHERE rfmr.status = ?"#;

const RULE_STATUS_ACTIVE: i64 = 1;

pub async fn create_pool(dsn: &str, max_connections: u32) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(dsn)
        .await
}

/// Reads alerts and rules from the monitoring database.
///
/// `DATETIME` columns carry no zone; they are read as wall-clock time in
/// `database_zone`, or as UTC when none is set.
pub struct MySqlSource {
    pool: MySqlPool,
    lookback_minutes: u32,
    database_zone: Option<Tz>,
}

impl MySqlSource {
    pub fn new(pool: MySqlPool, lookback_minutes: u32, database_zone: Option<Tz>) -> Self {
        Self {
            pool,
            lookback_minutes,
            database_zone,
        }
    }
}

#[async_trait::async_trait]
impl AlertSource for MySqlSource {
    async fn active_alerts(&self) -> Result<Vec<AlertRecord>, SourceError> {
        let rows = sqlx::query_as::<_, AlertRow>(ACTIVE_ALERTS_SQL)
            .bind(-i64::from(self.lookback_minutes))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.into_record(self.database_zone))
            .collect())
    }
}

#[async_trait::async_trait]
impl RuleSource for MySqlSource {
    async fn active_rules(&self) -> Result<Vec<RuleDefinition>, SourceError> {
        let rows = sqlx::query_as::<_, RuleRow>(ACTIVE_RULES_SQL)
            .bind(RULE_STATUS_ACTIVE)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(RuleDefinition::from).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AlertRow {
    id: i64,
    alert_type: Option<i64>,
    rule_id: Option<i64>,
    code: String,
    threshold_high: Option<f64>,
    threshold_low: Option<f64>,
    unit: String,
    value: Option<f64>,
    first_seen: Option<NaiveDateTime>,
    last_updated: Option<NaiveDateTime>,
    repeat_count: Option<i64>,
    status: Option<i64>,
    customer_id: Option<i64>,
    customer_name: String,
    diagnostic: String,
}

impl AlertRow {
    fn into_record(self, zone: Option<Tz>) -> AlertRecord {
        AlertRecord {
            id: self.id,
            alert_type: self.alert_type.unwrap_or_default(),
            rule_id: self.rule_id.unwrap_or_default(),
            code: self.code,
            threshold_high: self.threshold_high.unwrap_or_default(),
            threshold_low: self.threshold_low.unwrap_or_default(),
            unit: self.unit,
            value: self.value.unwrap_or_default(),
            first_seen: self.first_seen.and_then(|t| wall_clock_to_utc(t, zone)),
            last_updated: self.last_updated.and_then(|t| wall_clock_to_utc(t, zone)),
            repeat_count: self.repeat_count.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            customer_id: self.customer_id.unwrap_or_default(),
            customer_name: self.customer_name,
            diagnostic: self.diagnostic,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RuleRow {
    domain_id: i64,
    domain: String,
    rule_id: i64,
    rule_code: String,
    rule_name: String,
    threshold_high: Option<f64>,
    threshold_low: Option<f64>,
    unit: String,
    attention_threshold: i64,
    customer_id: i64,
    notify_email: String,
    response_code: String,
    diff_type: i64,
}

impl From<RuleRow> for RuleDefinition {
    fn from(row: RuleRow) -> Self {
        Self {
            domain_id: row.domain_id,
            domain: row.domain,
            rule_id: row.rule_id,
            rule_code: row.rule_code,
            rule_name: row.rule_name,
            threshold_high: row.threshold_high.unwrap_or_default(),
            threshold_low: row.threshold_low.unwrap_or_default(),
            unit: row.unit,
            attention_threshold: row.attention_threshold,
            customer_id: row.customer_id,
            notify_email: row.notify_email,
            response_code: row.response_code,
            diff_type: row.diff_type,
        }
    }
}

/// Ambiguous local times (DST fold) take the earlier instant; skipped ones yield `None`.
fn wall_clock_to_utc(t: NaiveDateTime, zone: Option<Tz>) -> Option<DateTime<Utc>> {
    match zone {
        Some(tz) => tz
            .from_local_datetime(&t)
            .earliest()
            .map(|local| local.with_timezone(&Utc)),
        None => Some(t.and_utc()),
    }
}
