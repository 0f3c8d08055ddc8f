use super::{Touch, TouchPhase};

/// Two-finger scale tracking. Everything is zero while no pinch is active.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PinchState {
    begin_distance: f32,
    last_distance: f32,
    /// Distance now over distance last update.
    instant: f32,
    /// Distance now over distance at the start.
    cumulative: f32,
}
impl PinchState {
    /// Feed the first two touches. Driven by the second finger's phase, since
    /// that's the one that starts and ends a pinch.
    pub fn update(&mut self, first: &Touch, second: &Touch) {
        let distance = (first.position - second.position).mag();
        match second.phase {
            TouchPhase::Began => {
                self.begin_distance = distance;
                self.last_distance = distance;
                self.instant = 1.0;
                self.cumulative = 1.0;
            }
            TouchPhase::Ended | TouchPhase::Canceled => self.reset(),
            TouchPhase::Moved | TouchPhase::Stationary => {
                let moved = first.phase == TouchPhase::Moved || second.phase == TouchPhase::Moved;
                // Fingers that started on the same spot have no meaningful ratio yet.
                if moved && self.last_distance > 0.0 && self.begin_distance > 0.0 {
                    self.instant = distance / self.last_distance;
                    self.cumulative = distance / self.begin_distance;
                    self.last_distance = distance;
                }
            }
        }
    }
    pub fn reset(&mut self) {
        *self = Self::default();
    }
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.instant != 0.0
    }
    #[must_use]
    pub fn instant_ratio(&self) -> f32 {
        self.instant
    }
    #[must_use]
    pub fn cumulative_ratio(&self) -> f32 {
        self.cumulative
    }
    /// Fingers closed in past `threshold` of their starting spread.
    #[must_use]
    pub fn is_pinch_in(&self, threshold: f32) -> bool {
        self.is_active() && self.cumulative < threshold
    }
    /// Fingers spread beyond `threshold` of their starting spread.
    #[must_use]
    pub fn is_pinch_out(&self, threshold: f32) -> bool {
        self.is_active() && self.cumulative > threshold
    }
}

#[cfg(test)]
mod test {
    use super::{PinchState, Touch, TouchPhase};
    use ultraviolet::Vec2;

    fn touch(id: u64, x: f32, phase: TouchPhase) -> Touch {
        Touch {
            id,
            position: Vec2::new(x, 0.0),
            phase,
        }
    }

    #[test]
    fn spread_doubles() {
        let mut pinch = PinchState::default();
        pinch.update(&touch(0, 0.0, TouchPhase::Stationary), &touch(1, 100.0, TouchPhase::Began));
        assert_eq!(pinch.instant_ratio(), 1.0);
        assert!(!pinch.is_pinch_out(1.05));
        pinch.update(&touch(0, 0.0, TouchPhase::Stationary), &touch(1, 200.0, TouchPhase::Moved));
        assert!((pinch.instant_ratio() - 2.0).abs() < 1e-6);
        assert!((pinch.cumulative_ratio() - 2.0).abs() < 1e-6);
        assert!(pinch.is_pinch_out(1.05));
        assert!(!pinch.is_pinch_in(0.95));
    }
    #[test]
    fn pinch_in_follows_cumulative_ratio() {
        let mut pinch = PinchState::default();
        pinch.update(&touch(0, 0.0, TouchPhase::Stationary), &touch(1, 100.0, TouchPhase::Began));
        pinch.update(&touch(0, 0.0, TouchPhase::Stationary), &touch(1, 200.0, TouchPhase::Moved));
        // 0.9 of the new baseline is still wider than the start.
        pinch.update(&touch(0, 0.0, TouchPhase::Moved), &touch(1, 180.0, TouchPhase::Stationary));
        assert!((pinch.instant_ratio() - 0.9).abs() < 1e-6);
        assert!(!pinch.is_pinch_in(0.95));
        assert!(pinch.is_pinch_out(1.05));
        pinch.update(&touch(0, 0.0, TouchPhase::Stationary), &touch(1, 90.0, TouchPhase::Moved));
        assert!(pinch.is_pinch_in(0.95));
    }
    #[test]
    fn stationary_pair_keeps_ratios() {
        let mut pinch = PinchState::default();
        pinch.update(&touch(0, 0.0, TouchPhase::Stationary), &touch(1, 100.0, TouchPhase::Began));
        pinch.update(&touch(0, 0.0, TouchPhase::Stationary), &touch(1, 150.0, TouchPhase::Moved));
        let before = pinch;
        pinch.update(&touch(0, 0.0, TouchPhase::Stationary), &touch(1, 150.0, TouchPhase::Stationary));
        assert_eq!(pinch, before);
    }
    #[test]
    fn lifting_resets() {
        let mut pinch = PinchState::default();
        pinch.update(&touch(0, 0.0, TouchPhase::Stationary), &touch(1, 100.0, TouchPhase::Began));
        pinch.update(&touch(0, 0.0, TouchPhase::Stationary), &touch(1, 100.0, TouchPhase::Ended));
        assert_eq!(pinch, PinchState::default());
        assert!(!pinch.is_active());
    }
    #[test]
    fn coincident_start_is_harmless() {
        let mut pinch = PinchState::default();
        pinch.update(&touch(0, 5.0, TouchPhase::Stationary), &touch(1, 5.0, TouchPhase::Began));
        pinch.update(&touch(0, 5.0, TouchPhase::Stationary), &touch(1, 50.0, TouchPhase::Moved));
        assert!(pinch.instant_ratio().is_finite());
        assert!(pinch.cumulative_ratio().is_finite());
    }
}
