// Metrics for the API process
// Counters are recorded through the `metrics` facade; a Prometheus recorder renders them on /metrics

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and describe every metric.
/// Should be called once at application startup
pub fn init_metrics() -> Option<PrometheusHandle> {
    let handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!("Prometheus recorder not installed: {}", e);
            None
        }
    };

    describe_counter!("tasks_created_total", "Total number of tasks created");
    describe_counter!("tasks_toggled_total", "Total number of task completion toggles");
    describe_counter!("tasks_deleted_total", "Total number of tasks deleted");
    describe_counter!("chess_updates_total", "Total number of chess board updates");
    describe_counter!("votes_changed_total", "Total number of votes cast or withdrawn");
    describe_counter!("highscores_submitted_total", "Total number of 2048 highscores submitted");
    describe_counter!("storage_errors_total", "Total number of failed storage operations");
    describe_gauge!("storage_healthy", "1 when the storage backend answers health checks");

    tracing::info!("Metrics initialized");
    handle
}

pub fn record_task_operation(operation: &'static str) {
    match operation {
        "create" => counter!("tasks_created_total").increment(1),
        "toggle" => counter!("tasks_toggled_total").increment(1),
        "delete" => counter!("tasks_deleted_total").increment(1),
        _ => {}
    }
}

pub fn record_chess_update() {
    counter!("chess_updates_total").increment(1);
}

pub fn record_vote(action: &'static str) {
    counter!("votes_changed_total", "action" => action).increment(1);
}

pub fn record_highscore() {
    counter!("highscores_submitted_total").increment(1);
}

pub fn record_storage_error(operation: &'static str) {
    counter!("storage_errors_total", "operation" => operation).increment(1);
}

pub fn set_storage_health(healthy: bool) {
    gauge!("storage_healthy").set(if healthy { 1.0 } else { 0.0 });
}
