use std::time::Duration;

/// Delay at speed zero; the effective delay is `MAX_DELAY_MS - speed`.
const MAX_DELAY_MS: u32 = 510;

/// Auto-advance speed. Larger is faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Speed(u32);

impl Speed {
    pub const MIN: u32 = 10;
    pub const MAX: u32 = 500;
    pub const DEFAULT: u32 = 100;
    /// Increment used by the faster/slower keybinds
    pub const STEP: u32 = 10;

    /// Clamp into `[MIN, MAX]`.
    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Tick period for this speed: 500ms at `MIN`, 10ms at `MAX`.
    pub fn delay(self) -> Duration {
        Duration::from_millis(u64::from(MAX_DELAY_MS - self.0))
    }

    pub fn faster(self) -> Self {
        Self::new(self.0.saturating_add(Self::STEP))
    }

    pub fn slower(self) -> Self {
        Self::new(self.0.saturating_sub(Self::STEP))
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_spans_the_slider_range() {
        assert_eq!(Speed::new(10).delay(), Duration::from_millis(500));
        assert_eq!(Speed::new(500).delay(), Duration::from_millis(10));
        assert_eq!(Speed::default().delay(), Duration::from_millis(410));
    }

    #[test]
    fn out_of_range_values_clamp() {
        assert_eq!(Speed::new(0).get(), Speed::MIN);
        assert_eq!(Speed::new(9_999).get(), Speed::MAX);
        assert_eq!(Speed::new(Speed::MAX).faster().get(), Speed::MAX);
        assert_eq!(Speed::new(Speed::MIN).slower().get(), Speed::MIN);
    }

    #[test]
    fn delay_strictly_decreases_with_speed() {
        let mut last = Speed::new(Speed::MIN).delay();
        for v in (Speed::MIN + 1)..=Speed::MAX {
            let d = Speed::new(v).delay();
            assert!(d < last, "delay did not decrease at speed {v}");
            last = d;
        }
    }
}
