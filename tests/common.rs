use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use nudge_service::{
    clients::generation::{GenerationClient, GenerationError, GenerationRequest},
    models::{
        activity::{LearnerActivitySnapshot, PaymentActivity, VideoActivity},
        retry::RetryConfig,
    },
};
use tokio::time::Instant;

/// Generation client that replays a fixed script of results, one per call.
pub struct ScriptedClient {
    script: Mutex<VecDeque<Result<String, GenerationError>>>,
    fallback: Result<String, GenerationError>,
    calls: AtomicU32,
    call_times: Mutex<Vec<Instant>>,
    requests: Mutex<Vec<GenerationRequest>>,
    health: Result<(), GenerationError>,
    latency: Option<Duration>,
}

impl ScriptedClient {
    pub fn new(script: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Err(GenerationError::Other("script exhausted".to_string())),
            calls: AtomicU32::new(0),
            call_times: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            health: Ok(()),
            latency: None,
        }
    }

    /// Every call returns `result`.
    pub fn always(result: Result<String, GenerationError>) -> Self {
        Self {
            fallback: result,
            ..Self::new(Vec::new())
        }
    }

    pub fn with_health(mut self, health: Result<(), GenerationError>) -> Self {
        self.health = health;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.call_times.lock().unwrap().push(Instant::now());
        self.requests.lock().unwrap().push(request.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }

    async fn health_check(&self) -> Result<(), GenerationError> {
        self.health.clone()
    }
}

pub fn status_error(status: u16) -> GenerationError {
    GenerationError::Status {
        status,
        message: format!("upstream answered {}", status),
    }
}

pub fn drafts_json() -> String {
    serde_json::json!([
        {
            "id": "resume-intro",
            "title": "Keep going! 🚀",
            "body": "You're halfway through Intro. Jump back in.",
            "sendNow": true,
            "type": "reminder"
        }
    ])
    .to_string()
}

pub fn fast_retry_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_delay_ms: 10,
        max_delay_ms: 1000,
        backoff_multiplier: 2,
        max_jitter_ms: 5,
    }
}

pub fn video(name: &str, completion: u32) -> VideoActivity {
    VideoActivity {
        completion,
        last_watched_at: 0,
        video_id: 1,
        video_name: name.to_string(),
    }
}

pub fn payment(course_name: &str, count: u32) -> PaymentActivity {
    PaymentActivity {
        count,
        course_id: 42,
        course_name: course_name.to_string(),
        last_visited_at: 1_700_000_000,
    }
}

pub fn snapshot_with_videos(videos: &[(&str, u32)]) -> LearnerActivitySnapshot {
    let mut snapshot = LearnerActivitySnapshot::default();
    for (key, completion) in videos {
        snapshot
            .videos
            .insert(key.to_string(), video(&format!("Video {}", key), *completion));
    }
    snapshot
}
