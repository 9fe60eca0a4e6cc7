#![allow(dead_code)]

pub mod scripted_server;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rhe_core::{Attempt, CompiledRequest, HeaderMap, Sleeper, TransportExecutor};

/// Transport that replays canned attempts. When the script runs out, the
/// last attempt repeats.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: VecDeque<Attempt>,
    last: Option<Attempt>,
    pub resets: usize,
    pub requests: Vec<CompiledRequest>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Attempt>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    /// Every attempt returns `attempt`.
    pub fn always(attempt: Attempt) -> Self {
        Self::new(vec![attempt])
    }

    pub fn attempts(&self) -> usize {
        self.requests.len()
    }
}

impl TransportExecutor for ScriptedTransport {
    fn reset(&mut self) {
        self.resets += 1;
    }

    fn execute(&mut self, request: &CompiledRequest) -> Attempt {
        self.requests.push(request.clone());
        if let Some(next) = self.script.pop_front() {
            self.last = Some(next.clone());
            return next;
        }
        self.last.clone().expect("empty transport script")
    }
}

/// Records requested sleeps instead of sleeping.
#[derive(Debug, Default, Clone)]
pub struct RecordingSleeper(Arc<Mutex<Vec<Duration>>>);

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.0.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.0.lock().unwrap().push(duration);
    }
}

pub fn status(code: u16) -> Attempt {
    Attempt::response(code, HeaderMap::new(), "")
}

pub fn status_with_header(code: u16, name: &str, value: &str) -> Attempt {
    let mut headers = HeaderMap::new();
    headers.append(name, value);
    Attempt::response(code, headers, "")
}

/// Asserts `actual` lies in `[base, base + 0.1s)` (backoff plus jitter).
pub fn assert_jittered(actual: Duration, base: Duration) {
    assert!(
        actual >= base && actual < base + Duration::from_millis(100),
        "expected {:?} + jitter, got {:?}",
        base,
        actual
    );
}
