//! Training statistics tracking over rounds
//!
//! Rolling averages of per-round reward, duration and final length, plus
//! running totals for the whole training run.

use std::collections::VecDeque;

/// Training statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use multi_snake::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
/// stats.record_round(-10.0, 42, 3);
/// stats.record_table_size(17);
///
/// assert_eq!(stats.total_rounds(), 1);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Reward summed over the tracked snakes, per round
    round_rewards: VecDeque<f32>,

    /// Ticks per round
    round_ticks: VecDeque<u64>,

    /// Longest final snake per round
    round_lengths: VecDeque<usize>,

    total_rounds: usize,
    total_ticks: u64,
    best_length: usize,

    /// Most recent Q-table size, if any snake learns
    table_size: Option<usize>,

    window_size: usize,
}

impl TrainingStats {
    /// Create a tracker keeping the last `window_size` rounds for averages
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            round_rewards: VecDeque::with_capacity(window_size),
            round_ticks: VecDeque::with_capacity(window_size),
            round_lengths: VecDeque::with_capacity(window_size),
            total_rounds: 0,
            total_ticks: 0,
            best_length: 0,
            table_size: None,
            window_size,
        }
    }

    /// Record the outcome of one finished round
    ///
    /// # Arguments
    ///
    /// * `reward` - Total reward delivered to the tracked snakes
    /// * `ticks` - Number of ticks the round lasted
    /// * `length` - Longest final snake length
    pub fn record_round(&mut self, reward: f32, ticks: u64, length: usize) {
        Self::push_deque(&mut self.round_rewards, reward, self.window_size);
        Self::push_deque(&mut self.round_ticks, ticks, self.window_size);
        Self::push_deque(&mut self.round_lengths, length, self.window_size);
        self.total_rounds += 1;
        self.total_ticks += ticks;
        self.best_length = self.best_length.max(length);
    }

    pub fn record_table_size(&mut self, size: usize) {
        self.table_size = Some(size);
    }

    /// Mean round reward over the window, or 0.0 with no rounds
    pub fn mean_reward(&self) -> f32 {
        if self.round_rewards.is_empty() {
            0.0
        } else {
            self.round_rewards.iter().sum::<f32>() / self.round_rewards.len() as f32
        }
    }

    pub fn mean_ticks(&self) -> f32 {
        let sum: u64 = self.round_ticks.iter().sum();
        if self.round_ticks.is_empty() {
            0.0
        } else {
            sum as f32 / self.round_ticks.len() as f32
        }
    }

    pub fn mean_length(&self) -> f32 {
        let sum: usize = self.round_lengths.iter().sum();
        if self.round_lengths.is_empty() {
            0.0
        } else {
            sum as f32 / self.round_lengths.len() as f32
        }
    }

    /// Longest snake seen in any round so far
    pub fn best_length(&self) -> usize {
        self.best_length
    }

    pub fn table_size(&self) -> Option<usize> {
        self.table_size
    }

    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line summary of the current statistics
    ///
    /// ```rust
    /// use multi_snake::metrics::TrainingStats;
    ///
    /// let mut stats = TrainingStats::new(10);
    /// stats.record_round(10.0, 150, 2);
    /// // Rounds: 1 | Ticks: 150 | Reward: 10.00 | Len: 2.00 | Best: 2 | Round ticks: 150.0
    /// println!("{}", stats.format_summary());
    /// ```
    pub fn format_summary(&self) -> String {
        let mut summary = format!(
            "Rounds: {} | Ticks: {} | Reward: {:.2} | Len: {:.2} | Best: {} | Round ticks: {:.1}",
            self.total_rounds,
            self.total_ticks,
            self.mean_reward(),
            self.mean_length(),
            self.best_length,
            self.mean_ticks(),
        );
        if let Some(size) = self.table_size {
            summary.push_str(&format!(" | States: {}", size));
        }
        summary
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let stats = TrainingStats::new(100);
        assert_eq!(stats.window_size(), 100);
        assert_eq!(stats.total_rounds(), 0);
        assert_eq!(stats.total_ticks(), 0);
        assert_eq!(stats.table_size(), None);
    }

    #[test]
    fn test_zero_window_is_clamped() {
        let mut stats = TrainingStats::new(0);
        stats.record_round(1.0, 5, 2);
        assert_eq!(stats.window_size(), 1);
        assert!((stats.mean_reward() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_record_round() {
        let mut stats = TrainingStats::new(100);
        stats.record_round(10.0, 50, 3);

        assert_eq!(stats.total_rounds(), 1);
        assert_eq!(stats.total_ticks(), 50);
        assert_eq!(stats.best_length(), 3);
        assert!((stats.mean_reward() - 10.0).abs() < 1e-5);
        assert!((stats.mean_ticks() - 50.0).abs() < 1e-5);
        assert!((stats.mean_length() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_rolling_average() {
        let mut stats = TrainingStats::new(3);

        stats.record_round(1.0, 10, 1);
        stats.record_round(2.0, 20, 5);
        stats.record_round(3.0, 30, 1);
        assert!((stats.mean_reward() - 2.0).abs() < 1e-5);

        // Evicts the first round
        stats.record_round(4.0, 40, 1);

        assert_eq!(stats.total_rounds(), 4);
        assert_eq!(stats.total_ticks(), 100);
        assert!((stats.mean_reward() - 3.0).abs() < 1e-5);
        // Best length survives eviction from the window
        assert_eq!(stats.best_length(), 5);
    }

    #[test]
    fn test_format_summary() {
        let mut stats = TrainingStats::new(100);
        stats.record_round(-10.0, 150, 4);

        let summary = stats.format_summary();
        assert!(summary.contains("Rounds: 1"));
        assert!(summary.contains("Ticks: 150"));
        assert!(summary.contains("Reward: -10.00"));
        assert!(summary.contains("Len: 4.00"));
        assert!(summary.contains("Best: 4"));
        assert!(!summary.contains("States"));

        stats.record_table_size(12);
        assert!(stats.format_summary().contains("States: 12"));
    }

    #[test]
    fn test_empty_stats() {
        let stats = TrainingStats::new(100);
        assert_eq!(stats.mean_reward(), 0.0);
        assert_eq!(stats.mean_ticks(), 0.0);
        assert_eq!(stats.mean_length(), 0.0);
        assert_eq!(stats.best_length(), 0);
    }
}
