//! Wall-clock primitives for the save document.
//!
//! `WallMs` is a plain measurement; `SaveClock` guards the one invariant the
//! document needs: `meta.updated_at` never goes backward within a session,
//! even if the wall clock does.

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
///
/// Copy is fine here - it's a measurement, not causality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WallMs(pub u64);

impl WallMs {
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self(ms)
    }
}

/// Monotonically non-decreasing stamp source for `meta.updated_at`.
///
/// Two persists inside the same millisecond produce equal stamps; a wall
/// clock that jumps backward is pinned to the last stamp handed out.
#[derive(Debug)]
pub struct SaveClock {
    last_ms: u64,
}

impl SaveClock {
    pub fn new() -> Self {
        Self { last_ms: 0 }
    }

    /// Produce the next stamp, never earlier than any previous one.
    pub fn tick(&mut self) -> WallMs {
        let now = WallMs::now().0;
        if now > self.last_ms {
            self.last_ms = now;
        }
        WallMs(self.last_ms)
    }
}

impl Default for SaveClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_never_goes_backward() {
        let mut clock = SaveClock::new();
        let mut prev = clock.tick();
        for _ in 0..1000 {
            let next = clock.tick();
            assert!(next >= prev);
            prev = next;
        }
    }

    #[test]
    fn tick_pins_backward_wall_clock() {
        let mut clock = SaveClock { last_ms: u64::MAX };
        assert_eq!(clock.tick(), WallMs(u64::MAX));
    }
}
