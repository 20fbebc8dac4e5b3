//! Fixed-window request limiting keyed by (client identity, mode).
//!
//! Windows reset wholesale on expiry rather than sliding. Rejected
//! requests do not consume budget. Entries for expired windows are
//! dropped by the periodic sweep so the map stays bounded by live keys.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use parking_lot::Mutex;

pub const WINDOW: Duration = Duration::from_secs(60 * 60);
pub const NORMAL_LIMIT: u32 = 10;
pub const DEMO_LIMIT: u32 = 50;

/// Bucket selector. Demo traffic counts against its own bucket so it
/// cannot exhaust a client's normal budget, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitMode {
    Normal,
    Demo,
}

impl LimitMode {
    /// Demo mode is requested with the `x-demo-mode: true` header. It only
    /// changes bucket selection, never prompts or models.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let demo = headers
            .get("x-demo-mode")
            .and_then(|value| value.to_str().ok())
            .map(|value| value == "true")
            .unwrap_or(false);
        if demo {
            LimitMode::Demo
        } else {
            LimitMode::Normal
        }
    }
}

/// Client identity from the first entry of the forwarded-for chain.
/// Without a trusted proxy header, all clients pool under `"unknown"`,
/// a known limitation of header-derived identity.
pub fn identity_from_headers(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| "unknown".to_owned())
}

#[derive(Debug)]
struct RateLimitEntry {
    count: u32,
    reset_at: Instant,
}

/// In-process fixed-window counter map. Shared across requests behind an
/// `Arc`; the map itself is guarded by a mutex since the runtime is
/// multi-threaded.
pub struct RateLimiter {
    entries: Mutex<HashMap<(String, LimitMode), RateLimitEntry>>,
    window: Duration,
    normal_limit: u32,
    demo_limit: u32,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(WINDOW, NORMAL_LIMIT, DEMO_LIMIT)
    }
}

impl RateLimiter {
    pub fn new(window: Duration, normal_limit: u32, demo_limit: u32) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            window,
            normal_limit,
            demo_limit,
        }
    }

    /// Returns whether the request is allowed, incrementing the counter if
    /// so. A rejection leaves the counter untouched.
    pub fn check(&self, identity: &str, mode: LimitMode) -> bool {
        self.check_at(identity, mode, Instant::now())
    }

    fn check_at(&self, identity: &str, mode: LimitMode, now: Instant) -> bool {
        let limit = match mode {
            LimitMode::Normal => self.normal_limit,
            LimitMode::Demo => self.demo_limit,
        };
        let mut entries = self.entries.lock();
        match entries.entry((identity.to_owned(), mode)) {
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();
                if now > entry.reset_at {
                    // Window expired: reset wholesale and count this request.
                    *entry = RateLimitEntry {
                        count: 1,
                        reset_at: now + self.window,
                    };
                    true
                } else if entry.count >= limit {
                    false
                } else {
                    entry.count += 1;
                    true
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(RateLimitEntry {
                    count: 1,
                    reset_at: now + self.window,
                });
                true
            }
        }
    }

    /// Drops entries whose window has expired. Driven by the background
    /// maintenance task.
    pub fn sweep(&self) {
        self.sweep_at(Instant::now());
    }

    fn sweep_at(&self, now: Instant) {
        self.entries.lock().retain(|_, entry| now <= entry.reset_at);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
