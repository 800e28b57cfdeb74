//=========================================================================
// Phases & Cadences
//=========================================================================
//
// The four update passes and their target periods.
//
//   Phase     Default period   Typical use
//   active    1/58 s           motion, input reaction
//   mid       1 s              AI re-decisions, animation swaps
//   slow      60 s             periodic maintenance
//   passive   3600 s           rare housekeeping
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::time::Duration;

//=== Phase ===============================================================

/// One of the four update passes run over active groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Active,
    Mid,
    Slow,
    Passive,
}

impl Phase {
    /// Every phase, from most to least frequent.
    pub const ALL: [Phase; 4] = [Phase::Active, Phase::Mid, Phase::Slow, Phase::Passive];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Mid => "mid",
            Self::Slow => "slow",
            Self::Passive => "passive",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//=== PhaseCadence ========================================================

/// Target period for each phase.
///
/// These are soft targets. A phase that overruns its period is delayed,
/// never run twice to catch up.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use phasebound::core::schedule::{Phase, PhaseCadence};
///
/// let cadence = PhaseCadence::default().with(Phase::Mid, Duration::from_millis(500));
/// assert_eq!(cadence.period(Phase::Mid), Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseCadence {
    periods: [Duration; 4],
}

impl PhaseCadence {
    /// Default active-phase rate in ticks per second.
    pub const ACTIVE_HZ: f64 = 58.0;

    /// Longest accepted period for any phase (30 days).
    pub const MAX_PERIOD: Duration = Duration::from_secs(30 * 24 * 60 * 60);

    /// Sets the period of one phase.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero or longer than [`PhaseCadence::MAX_PERIOD`].
    pub fn with(mut self, phase: Phase, period: Duration) -> Self {
        assert!(
            !period.is_zero(),
            "Cadence for phase {} must be positive",
            phase
        );
        assert!(
            period <= Self::MAX_PERIOD,
            "Cadence for phase {} exceeds the maximum of {:?}",
            phase,
            Self::MAX_PERIOD
        );
        self.periods[phase.index()] = period;
        self
    }

    /// Sets the active phase from a tick rate.
    ///
    /// # Panics
    ///
    /// Panics if `hz` is not positive, or is so low that the period
    /// exceeds [`PhaseCadence::MAX_PERIOD`], or so high that the period
    /// rounds to zero.
    pub fn with_active_hz(self, hz: f64) -> Self {
        assert!(hz > 0.0, "Active rate must be positive, got {}", hz);
        let period = 1.0 / hz;
        assert!(
            period <= Self::MAX_PERIOD.as_secs_f64(),
            "Active rate {} Hz exceeds the maximum period of {:?}",
            hz,
            Self::MAX_PERIOD
        );
        self.with(Phase::Active, Duration::from_secs_f64(period))
    }

    pub fn period(&self, phase: Phase) -> Duration {
        self.periods[phase.index()]
    }
}

impl Default for PhaseCadence {
    fn default() -> Self {
        Self {
            periods: [
                Duration::from_secs_f64(1.0 / Self::ACTIVE_HZ),
                Duration::from_secs(1),
                Duration::from_secs(60),
                Duration::from_secs(3600),
            ],
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cadence_orders_phases_by_frequency() {
        let cadence = PhaseCadence::default();
        for pair in Phase::ALL.windows(2) {
            assert!(cadence.period(pair[0]) < cadence.period(pair[1]));
        }
    }

    #[test]
    fn default_active_period_is_about_58_hz() {
        let period = PhaseCadence::default().period(Phase::Active);
        assert!(period > Duration::from_millis(17));
        assert!(period < Duration::from_millis(18));
    }

    #[test]
    fn with_overrides_single_phase() {
        let cadence = PhaseCadence::default().with(Phase::Slow, Duration::from_secs(5));
        assert_eq!(cadence.period(Phase::Slow), Duration::from_secs(5));
        assert_eq!(cadence.period(Phase::Mid), Duration::from_secs(1));
    }

    #[test]
    fn with_active_hz_sets_active_period() {
        let cadence = PhaseCadence::default().with_active_hz(100.0);
        assert_eq!(cadence.period(Phase::Active), Duration::from_millis(10));
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn zero_period_panics() {
        PhaseCadence::default().with(Phase::Mid, Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "Active rate must be positive")]
    fn negative_rate_panics() {
        PhaseCadence::default().with_active_hz(-1.0);
    }

    #[test]
    #[should_panic(expected = "exceeds the maximum")]
    fn unbounded_period_panics() {
        PhaseCadence::default().with(Phase::Passive, Duration::MAX);
    }

    #[test]
    #[should_panic(expected = "exceeds the maximum period")]
    fn vanishing_rate_panics() {
        PhaseCadence::default().with_active_hz(1e-30);
    }

    #[test]
    fn maximum_period_is_accepted() {
        let cadence = PhaseCadence::default().with(Phase::Passive, PhaseCadence::MAX_PERIOD);
        assert_eq!(cadence.period(Phase::Passive), PhaseCadence::MAX_PERIOD);
    }
}
