use crate::config::SmoothConfig;

/// Divisor-based exponential smoothing of the screen-space cursor.
///
/// next = prev + (target - prev) / divisor
pub struct Smoother {
    divisor: f32,
    prev: Option<(f32, f32)>,
}

impl Smoother {
    /// `divisor` below 1 would overshoot; it is raised to 1 (no smoothing).
    pub fn new(divisor: f32) -> Self {
        Self {
            divisor: divisor.max(1.0),
            prev: None,
        }
    }

    pub fn from_config(config: &SmoothConfig) -> Self {
        Self::new(config.divisor)
    }

    /// First call passes the target through and seeds the state.
    pub fn apply(&mut self, target: (f32, f32)) -> (f32, f32) {
        let next = match self.prev {
            Some((px, py)) => (
                px + (target.0 - px) / self.divisor,
                py + (target.1 - py) / self.divisor,
            ),
            None => target,
        };
        self.prev = Some(next);
        next
    }

    pub fn position(&self) -> Option<(f32, f32)> {
        self.prev
    }

    pub fn reset(&mut self) {
        self.prev = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn test_first_frame_passthrough() {
        let mut s = Smoother::new(5.0);
        assert_eq!(s.apply((100.0, 200.0)), (100.0, 200.0));
        assert_eq!(s.position(), Some((100.0, 200.0)));
    }

    #[test]
    fn test_step_covers_one_divisor_of_gap() {
        let mut s = Smoother::new(4.0);
        s.apply((0.0, 0.0));
        let result = s.apply((400.0, -800.0));
        assert_eq!(result, (100.0, -200.0));
    }

    #[test]
    fn test_divisor_one_is_no_smoothing() {
        let mut s = Smoother::new(1.0);
        s.apply((0.0, 0.0));
        assert_eq!(s.apply((42.0, 7.0)), (42.0, 7.0));
    }

    #[test]
    fn test_divisor_below_one_is_raised() {
        let mut s = Smoother::new(0.25);
        s.apply((0.0, 0.0));
        assert_eq!(s.apply((10.0, 10.0)), (10.0, 10.0));
    }

    #[test]
    fn test_converges_without_overshoot() {
        let mut s = Smoother::new(3.0);
        let target = (1500.0, 900.0);
        s.apply((0.0, 0.0));

        let eps = 0.5;
        let mut last = distance((0.0, 0.0), target);
        let mut frames = 0;
        while last >= eps {
            let pos = s.apply(target);
            let d = distance(pos, target);
            assert!(d <= last, "distance grew: {last} -> {d}");
            assert!(pos.0 <= target.0 && pos.1 <= target.1, "overshoot at {pos:?}");
            last = d;
            frames += 1;
            assert!(frames < 100, "did not converge");
        }
        // (2/3)^k * 1749 < 0.5  =>  k >= 21
        assert!(frames <= 21, "took {frames} frames");
    }

    #[test]
    fn test_reset() {
        let mut s = Smoother::new(5.0);
        s.apply((10.0, 10.0));
        s.reset();
        assert_eq!(s.position(), None);
        assert_eq!(s.apply((50.0, 60.0)), (50.0, 60.0));
    }
}
