use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

/// Per-invoker, per-root-command record of the last admitted invocation.
/// Entries live as long as the invoker is connected; the dispatcher drops
/// them on disconnect.
#[derive(Default)]
pub struct CooldownLedger {
    entries: FxHashMap<String, FxHashMap<String, Instant>>,
}

impl CooldownLedger {
    pub fn new() -> CooldownLedger {
        CooldownLedger::default()
    }

    /// Admits or rejects an invocation at `now`. An admitted invocation
    /// stamps the ledger, restarting the window; a rejection returns the
    /// remaining time.
    pub(crate) fn check(
        &mut self,
        actor_id: &str,
        command: &str,
        window: Duration,
        now: Instant,
    ) -> Result<(), Duration> {
        let by_command = self.entries.entry(actor_id.to_string()).or_default();
        if let Some(&stamp) = by_command.get(command) {
            let elapsed = now.saturating_duration_since(stamp);
            if elapsed < window {
                return Err(window - elapsed);
            }
        }
        by_command.insert(command.to_string(), now);
        Ok(())
    }

    /// Clears everything recorded for a disconnected invoker.
    pub(crate) fn forget(&mut self, actor_id: &str) {
        self.entries.remove(actor_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(10);

    #[test]
    fn second_call_within_window_is_rejected() {
        let mut ledger = CooldownLedger::new();
        let start = Instant::now();
        assert!(ledger.check("p1", "vote", WINDOW, start).is_ok());
        let remaining = ledger
            .check("p1", "vote", WINDOW, start + Duration::from_secs(4))
            .unwrap_err();
        assert_eq!(remaining, Duration::from_secs(6));
    }

    #[test]
    fn window_restarts_after_expiry() {
        let mut ledger = CooldownLedger::new();
        let start = Instant::now();
        assert!(ledger.check("p1", "vote", WINDOW, start).is_ok());
        assert!(ledger
            .check("p1", "vote", WINDOW, start + Duration::from_secs(11))
            .is_ok());
        // The stamp was refreshed, so the window is pinned to the second
        // invocation, not the first.
        assert!(ledger
            .check("p1", "vote", WINDOW, start + Duration::from_secs(15))
            .is_err());
    }

    #[test]
    fn ledgers_are_per_invoker_and_per_command() {
        let mut ledger = CooldownLedger::new();
        let start = Instant::now();
        assert!(ledger.check("p1", "vote", WINDOW, start).is_ok());
        assert!(ledger.check("p2", "vote", WINDOW, start).is_ok());
        assert!(ledger.check("p1", "kit", WINDOW, start).is_ok());
        assert!(ledger.check("p1", "vote", WINDOW, start).is_err());
    }

    #[test]
    fn forget_clears_on_disconnect() {
        let mut ledger = CooldownLedger::new();
        let start = Instant::now();
        assert!(ledger.check("p1", "vote", WINDOW, start).is_ok());
        ledger.forget("p1");
        assert!(ledger.check("p1", "vote", WINDOW, start).is_ok());
    }
}
