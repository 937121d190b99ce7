//! Ring buffer of recent drag samples used to estimate release velocity.

use crate::action::ActionCode;

/// Default number of samples kept.
pub const DEFAULT_CAPACITY: usize = 20;

/// One pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureSample {
    /// Sequence number within the gesture; `None` for an empty slot.
    pub index: Option<usize>,
    /// Horizontal position in pixels.
    pub x: i32,
    /// Vertical position in pixels.
    pub y: i32,
    /// Milliseconds since the gesture began.
    pub elapsed_ms: i64,
}

impl GestureSample {
    const EMPTY: Self = Self {
        index: None,
        x: 0,
        y: 0,
        elapsed_ms: 0,
    };
}

/// Fixed-capacity trailing window of drag samples.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    nodes: Vec<GestureSample>,
    next: usize,
    action: ActionCode,
    time0: i64,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl GestureTracker {
    /// Tracker holding at most `capacity` samples (at least 2).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: vec![GestureSample::EMPTY; capacity.max(2)],
            next: 0,
            action: ActionCode::NONE,
            time0: 0,
        }
    }

    /// Maximum number of retained samples.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Clear all samples and restart the clock at `start_time`.
    pub fn begin(&mut self, action: ActionCode, start_time: i64) {
        self.nodes.fill(GestureSample::EMPTY);
        self.next = 0;
        self.action = action;
        self.time0 = start_time;
    }

    /// Append a sample, evicting the oldest once full. Returns the number of
    /// samples added since [`begin`](Self::begin).
    pub fn add(&mut self, action: ActionCode, x: i32, y: i32, time: i64) -> usize {
        self.action = action;
        let slot = self.next % self.nodes.len();
        self.nodes[slot] = GestureSample {
            index: Some(self.next),
            x,
            y,
            elapsed_ms: time - self.time0,
        };
        self.next += 1;
        self.next
    }

    /// Action code of the latest sample.
    #[must_use]
    pub fn action(&self) -> ActionCode {
        self.action
    }

    /// Valid samples held, capped at capacity.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.next.min(self.nodes.len())
    }

    /// Retained samples, oldest first.
    #[must_use]
    pub fn samples(&self) -> Vec<GestureSample> {
        let count = self.point_count();
        (0..count)
            .map(|k| *self.node_back(count - k))
            .collect()
    }

    /// Sample `back` positions before the end (`1` is the newest).
    fn node_back(&self, back: usize) -> &GestureSample {
        let len = self.nodes.len();
        let back = back % len;
        &self.nodes[(self.next % len + len - back) % len]
    }

    /// Points usable for a `window` skipping the newest `offset` samples.
    #[must_use]
    pub fn usable_points(&self, window: usize, offset: usize) -> usize {
        let len = self.nodes.len();
        let window = window.min(len.saturating_sub(offset));
        (0..=window)
            .rev()
            .find(|&n| {
                n + offset <= self.next
                    && (n + offset == 0 || self.node_back(n + offset).index.is_some())
            })
            .unwrap_or(0)
    }

    fn endpoints(
        &self,
        window: usize,
        offset: usize,
    ) -> Option<(&GestureSample, &GestureSample)> {
        let n = self.usable_points(window, offset);
        if n < 2 {
            return None;
        }
        Some((self.node_back(n + offset), self.node_back(1 + offset)))
    }

    /// Milliseconds spanned by the newest `window` samples.
    #[must_use]
    pub fn time_span(&self, window: usize) -> i64 {
        self.endpoints(window, 0)
            .map_or(0, |(start, end)| end.elapsed_ms - start.elapsed_ms)
    }

    /// Angular speed over the window, in degree-equivalents per millisecond.
    ///
    /// Displacement is normalized against the viewport so that crossing the
    /// full width counts as 360. Returns 0 with fewer than 2 usable samples.
    #[must_use]
    pub fn speed(&self, window: usize, offset: usize, viewport: (i32, i32)) -> f32 {
        let Some((start, end)) = self.endpoints(window, offset) else {
            return 0.0;
        };
        let dt = end.elapsed_ms - start.elapsed_ms;
        if dt <= 0 || viewport.0 <= 0 || viewport.1 <= 0 {
            return 0.0;
        }
        let dx = (end.x - start.x) as f32 / viewport.0 as f32 * 360.0;
        let dy = (end.y - start.y) as f32 / viewport.1 as f32 * 360.0;
        dx.hypot(dy) / dt as f32
    }

    /// Raw pixel displacement over the window.
    #[must_use]
    pub fn displacement(&self, window: usize, offset: usize) -> (i32, i32) {
        self.endpoints(window, offset)
            .map_or((0, 0), |(start, end)| (end.x - start.x, end.y - start.y))
    }

    /// Release speed for a spin throw, in the units of [`Self::speed`].
    ///
    /// If the last two samples are further apart than `gate_ms` (eight times
    /// that for multi-touch) the pointer had stopped before release and the
    /// rate is 0.
    #[must_use]
    pub fn exit_rate(&self, gate_ms: i64, multi_touch: bool, viewport: (i32, i32)) -> f32 {
        let dt = self.time_span(2);
        if multi_touch {
            if dt > gate_ms << 3 {
                0.0
            } else {
                self.speed(2, 1, viewport)
            }
        } else if dt > gate_ms {
            0.0
        } else {
            self.speed(4, 2, viewport)
        }
    }
}

impl std::fmt::Display for GestureTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gesture {} points:", self.point_count())?;
        for s in self.samples() {
            write!(f, " ({},{} +{}ms)", s.x, s.y, s.elapsed_ms)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: (i32, i32) = (500, 500);

    fn tracker_with(samples: &[(i32, i32, i64)]) -> GestureTracker {
        let mut g = GestureTracker::default();
        g.begin(ActionCode::NONE, 1_000);
        for &(x, y, t) in samples {
            let _ = g.add(ActionCode::NONE, x, y, 1_000 + t);
        }
        g
    }

    #[test]
    fn three_samples_have_speed() {
        let g = tracker_with(&[(0, 0, 0), (50, 0, 15), (100, 0, 30)]);
        assert!(g.speed(2, 1, VIEW) > 0.0);
        assert_eq!(g.displacement(2, 0), (50, 0));
        assert_eq!(g.displacement(3, 0), (100, 0));
    }

    #[test]
    fn one_sample_has_no_speed() {
        let g = tracker_with(&[(0, 0, 0)]);
        assert_eq!(g.speed(2, 1, VIEW), 0.0);
        assert_eq!(g.speed(2, 0, VIEW), 0.0);
        assert_eq!(g.displacement(2, 0), (0, 0));
    }

    #[test]
    fn buffer_evicts_oldest() {
        let mut g = GestureTracker::new(4);
        g.begin(ActionCode::NONE, 0);
        for i in 0..5 {
            let _ = g.add(ActionCode::NONE, i * 10, 0, i64::from(i));
        }
        assert_eq!(g.point_count(), 4);
        let xs: Vec<_> = g.samples().iter().map(|s| s.x).collect();
        assert_eq!(xs, [10, 20, 30, 40]);
    }

    #[test]
    fn window_never_exceeds_buffer() {
        let mut g = GestureTracker::new(4);
        g.begin(ActionCode::NONE, 0);
        for i in 0..10 {
            let _ = g.add(ActionCode::NONE, i, 0, i64::from(i));
        }
        assert_eq!(g.usable_points(10, 0), 4);
        assert_eq!(g.usable_points(10, 1), 3);
        assert_eq!(g.displacement(10, 0), (3, 0));
    }

    #[test]
    fn begin_resets_samples() {
        let mut g = tracker_with(&[(0, 0, 0), (10, 0, 5)]);
        g.begin(ActionCode::NONE, 5_000);
        assert_eq!(g.point_count(), 0);
        assert!(g.samples().is_empty());
        assert_eq!(g.usable_points(2, 0), 0);
    }

    #[test]
    fn exit_rate_rejects_a_pause_before_release() {
        let quick = tracker_with(&[
            (0, 0, 0),
            (100, 0, 5),
            (200, 0, 10),
            (300, 0, 15),
            (310, 0, 20),
        ]);
        assert!(quick.exit_rate(10, false, VIEW) > 0.0);

        let paused = tracker_with(&[
            (0, 0, 0),
            (100, 0, 5),
            (200, 0, 10),
            (300, 0, 15),
            (300, 0, 200),
        ]);
        assert_eq!(paused.exit_rate(10, false, VIEW), 0.0);
        assert!(paused.exit_rate(100, true, VIEW) >= 0.0);
    }

    #[test]
    fn slow_release_keeps_fractional_rate() {
        let g = tracker_with(&[
            (0, 0, 0),
            (10, 0, 10),
            (20, 0, 20),
            (30, 0, 30),
            (40, 0, 40),
            (50, 0, 50),
        ]);
        let speed = g.speed(4, 2, VIEW);
        assert!((speed - 0.72).abs() < 1e-4, "{speed}");
        assert_eq!(g.exit_rate(10, false, VIEW), speed);
    }

    #[test]
    fn zero_elapsed_time_is_not_infinite() {
        let g = tracker_with(&[(0, 0, 0), (40, 0, 0)]);
        assert_eq!(g.speed(2, 0, VIEW), 0.0);
    }
}
