//! Sliding-window submission history.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Recent submission timestamps for one player, oldest first.
#[derive(Clone, Debug, Default)]
pub struct SubmissionHistory {
    timestamps: VecDeque<Instant>,
}

impl SubmissionHistory {
    /// Appends `now`, drops entries older than `window`, and returns how many
    /// submissions remain inside the window.
    pub fn record(&mut self, now: Instant, window: Duration) -> usize {
        self.timestamps.push_back(now);
        while let Some(&oldest) = self.timestamps.front() {
            if now.saturating_duration_since(oldest) > window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
        self.timestamps.len()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn clear(&mut self) {
        self.timestamps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prunes_entries_older_than_window() {
        let window = Duration::from_secs(1);
        let start = Instant::now();
        let mut history = SubmissionHistory::default();

        assert_eq!(history.record(start, window), 1);
        assert_eq!(history.record(start + Duration::from_millis(400), window), 2);
        assert_eq!(history.record(start + Duration::from_millis(900), window), 3);
        // The first entry is now 1.2s old.
        assert_eq!(history.record(start + Duration::from_millis(1200), window), 3);
        assert_eq!(history.record(start + Duration::from_secs(5), window), 1);
    }

    #[test]
    fn entry_exactly_one_window_old_is_kept() {
        let window = Duration::from_secs(1);
        let start = Instant::now();
        let mut history = SubmissionHistory::default();

        history.record(start, window);
        assert_eq!(history.record(start + window, window), 2);
    }
}
