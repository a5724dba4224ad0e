use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Minimum gap between two callback actions from the same user
const COOLDOWN: Duration = Duration::from_secs(1);

/// Per-user action cooldown.
///
/// Over-limit actions are dropped with a toast, never an error; the map is
/// keyed by user id so one chatty user cannot slow anyone else down.
pub struct RateLimiter {
    enabled: bool,
    last_action: Mutex<HashMap<i64, Instant>>,
}

impl RateLimiter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_action: Mutex::new(HashMap::new()),
        }
    }

    /// Returns true when the action may proceed, recording the attempt
    pub async fn allow(&self, user_id: i64) -> bool {
        if !self.enabled {
            return true;
        }

        let now = Instant::now();
        let mut map = self.last_action.lock().await;
        match map.get(&user_id) {
            Some(last) if now.duration_since(*last) < COOLDOWN => false,
            _ => {
                map.insert(user_id, now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_action_allowed_second_dropped() {
        let limiter = RateLimiter::new(true);
        assert!(limiter.allow(7).await);
        assert!(!limiter.allow(7).await);
    }

    #[tokio::test]
    async fn test_users_limited_independently() {
        let limiter = RateLimiter::new(true);
        assert!(limiter.allow(1).await);
        assert!(limiter.allow(2).await);
        assert!(!limiter.allow(1).await);
    }

    #[tokio::test]
    async fn test_disabled_limiter_always_allows() {
        let limiter = RateLimiter::new(false);
        assert!(limiter.allow(7).await);
        assert!(limiter.allow(7).await);
        assert!(limiter.allow(7).await);
    }
}
