// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Mode Arbiter
// ─────────────────────────────────────────────────────────────────────
//! Maps a trust score onto a flight mode.
//!
//! ```text
//!   100 ┐
//!       │  Normal      score >= normal_at_or_above   (80)
//!    80 ┤
//!       │  Cautious
//!    50 ┤
//!       │  FailSafe    score <  fail_safe_below      (50)
//!     0 ┘
//! ```
//!
//! The decision depends on the current score only. There is no
//! hysteresis: a score hovering around a boundary can flip the mode
//! every tick.

use cbf_types::{ArbiterConfig, FlightMode, TrustScore};

/// Stateless score → mode mapping.
#[derive(Debug, Clone, Default)]
pub struct ModeArbiter {
    config: ArbiterConfig,
}

impl ModeArbiter {
    pub fn new(config: ArbiterConfig) -> Self {
        Self { config }
    }

    pub fn mode(&self, score: TrustScore) -> FlightMode {
        let s = score.value();
        if s >= self.config.normal_at_or_above {
            FlightMode::Normal
        } else if s >= self.config.fail_safe_below {
            FlightMode::Cautious
        } else {
            log::warn!(
                "trust score {s} < {}: FAIL-SAFE engaged",
                self.config.fail_safe_below
            );
            FlightMode::FailSafe
        }
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(s: u8) -> FlightMode {
        ModeArbiter::default().mode(TrustScore::new(s))
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(mode(100), FlightMode::Normal);
        assert_eq!(mode(80), FlightMode::Normal);
        assert_eq!(mode(79), FlightMode::Cautious);
        assert_eq!(mode(50), FlightMode::Cautious);
        assert_eq!(mode(49), FlightMode::FailSafe);
        assert_eq!(mode(0), FlightMode::FailSafe);
    }

    #[test]
    fn test_full_range_has_no_gaps() {
        for s in 0..=100u8 {
            let expected = match s {
                80..=100 => FlightMode::Normal,
                50..=79 => FlightMode::Cautious,
                _ => FlightMode::FailSafe,
            };
            assert_eq!(mode(s), expected, "score {s}");
        }
    }

    #[test]
    fn test_no_memory_of_previous_mode() {
        let arbiter = ModeArbiter::default();
        assert_eq!(arbiter.mode(TrustScore::new(10)), FlightMode::FailSafe);
        assert_eq!(arbiter.mode(TrustScore::new(95)), FlightMode::Normal);
        assert_eq!(arbiter.mode(TrustScore::new(49)), FlightMode::FailSafe);
        assert_eq!(arbiter.mode(TrustScore::new(50)), FlightMode::Cautious);
    }

    #[test]
    fn test_custom_thresholds() {
        let arbiter = ModeArbiter::new(ArbiterConfig {
            normal_at_or_above: 90,
            fail_safe_below: 60,
        });
        assert_eq!(arbiter.mode(TrustScore::new(85)), FlightMode::Cautious);
        assert_eq!(arbiter.mode(TrustScore::new(59)), FlightMode::FailSafe);
        assert_eq!(arbiter.mode(TrustScore::new(90)), FlightMode::Normal);
    }

    #[test]
    fn test_collapsed_cautious_band() {
        let arbiter = ModeArbiter::new(ArbiterConfig {
            normal_at_or_above: 70,
            fail_safe_below: 70,
        });
        assert_eq!(arbiter.mode(TrustScore::new(70)), FlightMode::Normal);
        assert_eq!(arbiter.mode(TrustScore::new(69)), FlightMode::FailSafe);
    }
}
