use std::fmt::Display;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use tracing::info;

pub const TIMING_TARGET: &str = "studio.timing";

/// Start/finish bookkeeping for one user-triggered session action.
#[derive(Debug)]
pub struct ActionTimer {
    action: String,
    detail: Option<String>,
    started_at: DateTime<Utc>,
    started_perf: Instant,
    completed: bool,
}

impl ActionTimer {
    pub fn start(action: &str, detail: Option<String>) -> Self {
        let timer = ActionTimer {
            action: action.to_string(),
            detail: detail.map(|value| truncate_detail(&value.replace('\n', " "))),
            started_at: Utc::now(),
            started_perf: Instant::now(),
            completed: false,
        };
        info!(
            target: TIMING_TARGET,
            "event=action_started action={} started_at={} detail={:?}",
            timer.action,
            timer.started_at.to_rfc3339(),
            timer.detail
        );
        timer
    }

    pub fn complete(&mut self, status: &str) {
        if self.completed {
            return;
        }
        self.completed = true;
        info!(
            target: TIMING_TARGET,
            "event=action_completed action={} started_at={} completed_at={} duration_s={:.3} status={}",
            self.action,
            self.started_at.to_rfc3339(),
            Utc::now().to_rfc3339(),
            self.started_perf.elapsed().as_secs_f64(),
            status
        );
    }
}

fn truncate_detail(value: &str) -> String {
    if value.chars().count() > 300 {
        value.chars().take(300).collect()
    } else {
        value.to_string()
    }
}

pub async fn log_llm_timing<T, E, F, Fut>(
    provider: &str,
    model: &str,
    operation: &str,
    metadata: Option<JsonValue>,
    call: F,
) -> Result<T, E>
where
    E: Display,
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let started_at = Utc::now();
    let started_perf = Instant::now();
    let metadata_text = metadata
        .as_ref()
        .map(|value| value.to_string())
        .unwrap_or_else(|| "{}".to_string());
    info!(
        target: TIMING_TARGET,
        "event=llm_request provider={} model={} operation={} started_at={} metadata={}",
        provider,
        model,
        operation,
        started_at.to_rfc3339(),
        metadata_text
    );

    let result = call().await;
    let status = match &result {
        Ok(_) => "success".to_string(),
        Err(err) => format!("error ({})", truncate_detail(&err.to_string())),
    };

    let completed_at = Utc::now();
    let duration = started_perf.elapsed().as_secs_f64();
    info!(
        target: TIMING_TARGET,
        "event=llm_response provider={} model={} operation={} completed_at={} duration_s={:.3} status={} metadata={}",
        provider,
        model,
        operation,
        completed_at.to_rfc3339(),
        duration,
        status,
        metadata_text
    );

    result
}
