//! Dominant-frequency tracking over playback time.
//!
//! Per-frame sampling at display rate (~60 Hz) would flood a timeline with
//! thousands of near-identical rows. The tracker therefore selects the top
//! three bars every frame (so the display can highlight them), but only
//! emits a [`TimelineEntry`] when at least the configured minimum spacing
//! has passed since the previous one. The resulting log is bounded by track
//! duration, not frame count.

use tracing::trace;

use crate::bars::DisplayBar;

/// Default minimum spacing between emitted entries, in seconds.
pub const DEFAULT_MIN_SPACING: f32 = 0.5;

/// Default number of dominant frequencies per entry.
pub const DEFAULT_TOP_K: usize = 3;

/// A timestamped record of the dominant frequencies at one playback moment.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    /// Playback position the entry was taken at, in seconds.
    pub time_seconds: f32,
    /// Dominant frequencies, strongest first (at most the tracker's top-K).
    pub frequencies_hz: Vec<f32>,
}

/// Selects per-frame dominant bars and debounces timeline emission.
///
/// Two states: *idle* (nothing emitted yet, or just reset) and *armed*
/// (carries the time of the last emission). `reset` returns to idle.
#[derive(Debug, Clone)]
pub struct DominantTracker {
    min_spacing: f32,
    top_k: usize,
    last_emitted: Option<f32>,
}

impl DominantTracker {
    /// Tracker with default spacing (0.5 s) and top-3 selection.
    pub fn new() -> Self {
        Self {
            min_spacing: DEFAULT_MIN_SPACING,
            top_k: DEFAULT_TOP_K,
            last_emitted: None,
        }
    }

    /// Tracker with explicit spacing and selection size.
    pub fn with_config(min_spacing: f32, top_k: usize) -> Self {
        debug_assert!(min_spacing >= 0.0 && top_k > 0);
        Self {
            min_spacing,
            top_k,
            last_emitted: None,
        }
    }

    /// Indices of the top-K bars by height, strongest first.
    ///
    /// The sort is stable, so equal heights resolve to the lower bar index,
    /// i.e. the lower frequency wins. Silent bars (zero height) are never
    /// selected.
    pub fn select(&self, bars: &[DisplayBar]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..bars.len())
            .filter(|&i| bars[i].height > 0.0)
            .collect();
        indices.sort_by(|&a, &b| {
            bars[b]
                .height
                .partial_cmp(&bars[a].height)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        indices.truncate(self.top_k);
        indices
    }

    /// Process one frame: flag the dominant bars and maybe emit an entry.
    ///
    /// An entry is emitted when the tracker is idle, or when
    /// `time_seconds - last_emitted >= min_spacing`. Emitted times are
    /// strictly increasing as long as the caller's clock is.
    pub fn update(&mut self, bars: &mut [DisplayBar], time_seconds: f32) -> Option<TimelineEntry> {
        let selected = self.select(bars);
        for &i in &selected {
            bars[i].dominant = true;
        }

        if selected.is_empty() {
            return None;
        }

        let due = match self.last_emitted {
            None => true,
            Some(last) => time_seconds - last >= self.min_spacing,
        };
        if !due {
            return None;
        }

        let frequencies_hz: Vec<f32> = selected
            .iter()
            .map(|&i| bars[i].frequency_hz)
            .filter(|&f| f > 0.0)
            .collect();
        if frequencies_hz.is_empty() {
            return None;
        }

        self.last_emitted = Some(time_seconds);
        trace!(time_seconds, count = frequencies_hz.len(), "timeline entry");
        Some(TimelineEntry {
            time_seconds,
            frequencies_hz,
        })
    }

    /// Return to idle. The owning view clears its entry list at the same
    /// time, as both happen together when a new file is loaded.
    pub fn reset(&mut self) {
        self.last_emitted = None;
    }

    /// Whether the tracker has emitted since the last reset.
    pub fn is_armed(&self) -> bool {
        self.last_emitted.is_some()
    }
}

impl Default for DominantTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars_from_heights(heights: &[f32]) -> Vec<DisplayBar> {
        heights
            .iter()
            .enumerate()
            .map(|(i, &height)| DisplayBar {
                frequency_hz: 100.0 * (i + 1) as f32,
                height,
                dominant: false,
            })
            .collect()
    }

    #[test]
    fn test_selects_top_three_strongest_first() {
        let tracker = DominantTracker::new();
        let bars = bars_from_heights(&[0.1, 0.9, 0.3, 0.7, 0.5]);
        assert_eq!(tracker.select(&bars), vec![1, 3, 4]);
    }

    #[test]
    fn test_tie_resolves_to_lower_index() {
        let tracker = DominantTracker::new();
        let bars = bars_from_heights(&[0.5, 0.9, 0.5, 0.5, 0.2]);
        // 0.9 first, then the three 0.5s in index order; only 3 survive
        assert_eq!(tracker.select(&bars), vec![1, 0, 2]);
    }

    #[test]
    fn test_selection_deterministic() {
        let tracker = DominantTracker::new();
        let bars = bars_from_heights(&[0.4, 0.4, 0.8, 0.1, 0.4]);
        let first = tracker.select(&bars);
        for _ in 0..10 {
            assert_eq!(tracker.select(&bars), first);
        }
    }

    #[test]
    fn test_silent_bars_never_selected() {
        let tracker = DominantTracker::new();
        let bars = bars_from_heights(&[0.0, 0.0, 0.4, 0.0]);
        assert_eq!(tracker.select(&bars), vec![2]);

        let silence = bars_from_heights(&[0.0; 8]);
        assert!(tracker.select(&silence).is_empty());
    }

    #[test]
    fn test_first_update_emits_and_arms() {
        let mut tracker = DominantTracker::new();
        let mut bars = bars_from_heights(&[0.2, 0.9, 0.4]);

        assert!(!tracker.is_armed());
        let entry = tracker.update(&mut bars, 1.0).unwrap();
        assert!(tracker.is_armed());

        assert_eq!(entry.time_seconds, 1.0);
        assert_eq!(entry.frequencies_hz, vec![200.0, 300.0, 100.0]);
        assert!(bars[1].dominant && bars[2].dominant && bars[0].dominant);
    }

    #[test]
    fn test_debounce_blocks_close_updates() {
        let mut tracker = DominantTracker::new();
        let mut bars = bars_from_heights(&[0.2, 0.9, 0.4]);

        assert!(tracker.update(&mut bars, 1.0).is_some());
        assert!(tracker.update(&mut bars, 1.1).is_none());
        assert!(tracker.update(&mut bars, 1.49).is_none());
        assert!(tracker.update(&mut bars, 1.5).is_some());
    }

    #[test]
    fn test_debounce_invariant_over_frame_sequence() {
        let mut tracker = DominantTracker::new();
        let mut emitted: Vec<f32> = Vec::new();

        // Simulate 60 fps for 10 seconds
        for frame in 0..600 {
            let time = frame as f32 / 60.0;
            let mut bars = bars_from_heights(&[0.3, 0.6, 0.9, 0.1]);
            if let Some(entry) = tracker.update(&mut bars, time) {
                emitted.push(entry.time_seconds);
            }
        }

        assert!(!emitted.is_empty());
        for pair in emitted.windows(2) {
            assert!(
                pair[1] - pair[0] >= DEFAULT_MIN_SPACING - 1e-6,
                "entries at {} and {} violate min spacing",
                pair[0],
                pair[1]
            );
            assert!(pair[1] > pair[0], "times must be strictly increasing");
        }
    }

    #[test]
    fn test_dominant_flags_set_every_frame_even_when_debounced() {
        let mut tracker = DominantTracker::new();
        let mut bars = bars_from_heights(&[0.2, 0.9, 0.4]);
        tracker.update(&mut bars, 0.0);

        let mut bars = bars_from_heights(&[0.2, 0.9, 0.4]);
        assert!(tracker.update(&mut bars, 0.1).is_none());
        assert!(bars[1].dominant, "highlighting is per-frame, not debounced");
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut tracker = DominantTracker::new();
        let mut bars = bars_from_heights(&[0.5]);

        tracker.update(&mut bars, 5.0);
        assert!(tracker.is_armed());

        tracker.reset();
        assert!(!tracker.is_armed());

        // After reset, even an earlier timestamp emits immediately
        let mut bars = bars_from_heights(&[0.5]);
        assert!(tracker.update(&mut bars, 0.0).is_some());
    }

    #[test]
    fn test_fewer_than_k_nonsilent_bars() {
        let mut tracker = DominantTracker::new();
        let mut bars = bars_from_heights(&[0.0, 0.7, 0.0]);
        let entry = tracker.update(&mut bars, 0.0).unwrap();
        assert_eq!(entry.frequencies_hz, vec![200.0]);
    }
}
