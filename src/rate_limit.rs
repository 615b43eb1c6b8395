use std::{
    collections::HashMap,
    net::IpAddr,
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::core::settings::RateLimitSettings;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

#[derive(Debug)]
struct Clients {
    windows: HashMap<IpAddr, Window>,
    last_sweep: Instant,
}

/// Fixed-window request counter keyed by client address.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    message: &'static str,
    clients: Mutex<Clients>,
}

impl RateLimiter {
    pub fn new(settings: &RateLimitSettings) -> Self {
        RateLimiter {
            max_requests: settings.max_requests,
            window: settings.window,
            message: settings.message,
            clients: Mutex::new(Clients {
                windows: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Records a hit for `client` and returns whether it is within the limit.
    pub fn check(&self, client: IpAddr) -> bool {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: IpAddr, now: Instant) -> bool {
        let mut clients = match self.clients.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let window = self.window;
        // Expired windows are swept at most once per window length.
        if now.saturating_duration_since(clients.last_sweep) >= window {
            clients
                .windows
                .retain(|_, entry| now.saturating_duration_since(entry.started) < window);
            clients.last_sweep = now;
        }

        let entry = clients.windows.entry(client).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.saturating_duration_since(entry.started) >= window {
            *entry = Window {
                started: now,
                hits: 0,
            };
        }

        if entry.hits >= self.max_requests {
            return false;
        }
        entry.hits += 1;
        true
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.clients.lock().unwrap().windows.len()
    }

    #[cfg(test)]
    fn last_sweep(&self) -> Instant {
        self.clients.lock().unwrap().last_sweep
    }
}
