//! One-shot loading screen reveal

use std::time::Duration;
use tracing::info;

/// When the loading overlay gives way to the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPolicy {
    /// Reveal once this much time has passed since startup, ready or not
    FixedDelay(Duration),
    /// Reveal on the first poll after the scene is spawned
    SceneReady,
}

impl Default for RevealPolicy {
    fn default() -> Self {
        RevealPolicy::FixedDelay(Duration::from_millis(2000))
    }
}

/// Decides the single moment the viewer is revealed
#[derive(Debug, Clone)]
pub struct LoadingGate {
    policy: RevealPolicy,
    revealed: bool,
}

impl LoadingGate {
    pub fn new(policy: RevealPolicy) -> Self {
        Self {
            policy,
            revealed: false,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Returns true exactly once: on the first poll where the policy is met
    pub fn poll(&mut self, elapsed: Duration, scene_ready: bool) -> bool {
        if self.revealed {
            return false;
        }
        let due = match self.policy {
            RevealPolicy::FixedDelay(delay) => elapsed >= delay,
            RevealPolicy::SceneReady => scene_ready,
        };
        if due {
            self.revealed = true;
            info!(elapsed_ms = elapsed.as_millis() as u64, "Revealing viewer");
        }
        due
    }
}

impl Default for LoadingGate {
    fn default() -> Self {
        Self::new(RevealPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_delay_ignores_readiness() {
        let mut gate = LoadingGate::default();
        assert!(!gate.poll(Duration::from_millis(500), true));
        assert!(!gate.poll(Duration::from_millis(1999), true));
        assert!(gate.poll(Duration::from_millis(2000), false));
        assert!(gate.is_revealed());
    }

    #[test]
    fn test_scene_ready_waits_for_spawn() {
        let mut gate = LoadingGate::new(RevealPolicy::SceneReady);
        assert!(!gate.poll(Duration::from_secs(10), false));
        assert!(gate.poll(Duration::from_millis(16), true));
    }

    #[test]
    fn test_reveals_only_once() {
        let mut gate = LoadingGate::new(RevealPolicy::FixedDelay(Duration::ZERO));
        assert!(gate.poll(Duration::ZERO, false));
        for ms in [1, 100, 5000] {
            assert!(!gate.poll(Duration::from_millis(ms), true));
        }
    }
}
