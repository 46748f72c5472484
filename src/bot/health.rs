use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

/* Health is the bot's HTTP face, fully independent of the event router.
 * It only ever reads process state: liveness on / and /health, a JSON
 * status payload, and a line-oriented metrics exposition. Anything else
 * is a plaintext 404.
 */

pub struct HealthState {
    started: Instant,
    ready: AtomicBool,
    guilds: AtomicUsize,
}

impl HealthState {
    pub fn new() -> HealthState {
        HealthState {
            started: Instant::now(),
            ready: AtomicBool::new(false),
            guilds: AtomicUsize::new(0),
        }
    }

    // Flipped once, when the gateway session comes up.
    pub fn mark_ready(&self, guilds: usize) {
        self.guilds.store(guilds, Ordering::Relaxed);
        self.ready.store(true, Ordering::Relaxed);
    }

    pub fn set_guild_count(&self, guilds: usize) {
        self.guilds.store(guilds, Ordering::Relaxed);
    }

    fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

impl Default for HealthState {
    fn default() -> HealthState {
        HealthState::new()
    }
}

#[derive(Serialize)]
struct StatusResponse {
    uptime_seconds: u64,
    memory_rss_bytes: u64,
    ready: bool,
    guilds: usize,
}

// Resident set size from /proc; 0 where the file is unavailable.
fn rss_bytes() -> u64 {
    std::fs::read_to_string("/proc/self/statm")
        .ok()
        .and_then(|statm| {
            statm
                .split_whitespace()
                .nth(1)
                .and_then(|pages| pages.parse::<u64>().ok())
        })
        .map(|pages| pages.saturating_mul(4096))
        .unwrap_or(0)
}

fn render_metrics(uptime_seconds: u64, rss_bytes: u64, guilds: usize) -> String {
    format!(
        "bot_uptime_seconds {}\nbot_memory_rss_bytes {}\nbot_cached_guilds {}\n",
        uptime_seconds, rss_bytes, guilds
    )
}

async fn ok() -> &'static str {
    "OK"
}

async fn status(State(state): State<Arc<HealthState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        uptime_seconds: state.uptime_seconds(),
        memory_rss_bytes: rss_bytes(),
        ready: state.ready.load(Ordering::Relaxed),
        guilds: state.guilds.load(Ordering::Relaxed),
    })
}

async fn metrics(State(state): State<Arc<HealthState>>) -> String {
    render_metrics(
        state.uptime_seconds(),
        rss_bytes(),
        state.guilds.load(Ordering::Relaxed),
    )
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

fn router(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/", get(ok))
        .route("/health", get(ok))
        .route("/status", get(status))
        .route("/metrics", get(metrics))
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve(state: Arc<HealthState>, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    log::info!("Health - listening on port {}", port);
    axum::serve(listener, router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_metrics_exposition() {
        let exposition = render_metrics(120, 52_428_800, 3);
        assert_eq!(
            exposition,
            "bot_uptime_seconds 120\nbot_memory_rss_bytes 52428800\nbot_cached_guilds 3\n"
        );

        // One "name value" pair per line
        for line in exposition.lines() {
            assert_eq!(line.split(' ').count(), 2);
        }
    }

    #[test]
    fn test_status_serializes_all_fields() {
        let status = StatusResponse {
            uptime_seconds: 5,
            memory_rss_bytes: 1024,
            ready: true,
            guilds: 2,
        };
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["uptime_seconds"], 5);
        assert_eq!(value["memory_rss_bytes"], 1024);
        assert_eq!(value["ready"], true);
        assert_eq!(value["guilds"], 2);
    }

    #[test]
    fn test_state_readiness_flow() {
        let state = HealthState::new();
        assert!(!state.ready.load(Ordering::Relaxed));

        state.mark_ready(4);
        assert!(state.ready.load(Ordering::Relaxed));
        assert_eq!(state.guilds.load(Ordering::Relaxed), 4);

        state.set_guild_count(6);
        assert_eq!(state.guilds.load(Ordering::Relaxed), 6);
    }
}
