use std::sync::Arc;
use super::relay_metrics::RelayMetrics;

pub fn render_prometheus(m: &Arc<RelayMetrics>) -> String {
    let mut out = String::with_capacity(1024);

    write_counter(&mut out, "alertrelay_cycles_total", m.cycles_run_val());
    write_counter(&mut out, "alertrelay_cycles_aborted_total", m.cycles_aborted_val());
    write_counter(&mut out, "alertrelay_alerts_fetched_total", m.alerts_fetched_val());
    write_counter(&mut out, "alertrelay_alerts_dropped_total", m.alerts_dropped_val());
    write_counter(
        &mut out,
        "alertrelay_notifications_delivered_total",
        m.notifications_delivered_val(),
    );
    write_counter(&mut out, "alertrelay_deliveries_failed_total", m.deliveries_failed_val());

    let (sum, count) = m.cycle_latency_vals();
    write_summary(&mut out, "alertrelay_cycle_latency_us", sum, count);

    out
}

fn write_counter(out: &mut String, name: &str, val: u64) {
    use std::fmt::Write;
    let _ = writeln!(out, "# TYPE {name} counter");
    let _ = writeln!(out, "{name} {val}");
}

fn write_summary(out: &mut String, name: &str, sum: u64, count: u64) {
    use std::fmt::Write;
    let _ = writeln!(out, "# TYPE {name} summary");
    let _ = writeln!(out, "{name}_sum {sum}");
    let _ = writeln!(out, "{name}_count {count}");
}
