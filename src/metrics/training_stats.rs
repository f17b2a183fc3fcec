//! Rolling statistics over training episodes

use std::collections::VecDeque;

/// Outcome of one training episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeRecord {
    pub reward: f64,
    /// Steps taken
    pub length: usize,
    /// Food eaten
    pub score: u32,
}

/// Recent-episode window plus lifetime totals
///
/// Averages cover the last `window_size` episodes; totals and the best
/// score cover the whole run.
///
/// # Example
///
/// ```rust
/// use snake_qlearn::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
/// stats.record_episode(15.5, 150, 5);
///
/// assert_eq!(stats.total_episodes(), 1);
/// assert_eq!(stats.total_steps(), 150);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    recent: VecDeque<EpisodeRecord>,
    window_size: usize,
    best_score: u32,
    total_episodes: usize,
    total_steps: usize,
}

impl TrainingStats {
    /// Tracker averaging over the last `window_size` episodes (at least one)
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            recent: VecDeque::with_capacity(window_size),
            window_size,
            best_score: 0,
            total_episodes: 0,
            total_steps: 0,
        }
    }

    pub fn record_episode(&mut self, reward: f64, length: usize, score: u32) {
        if self.recent.len() == self.window_size {
            self.recent.pop_front();
        }
        self.recent.push_back(EpisodeRecord {
            reward,
            length,
            score,
        });

        self.best_score = self.best_score.max(score);
        self.total_episodes += 1;
        self.total_steps += length;
    }

    /// Episodes currently inside the window, oldest first
    pub fn recent(&self) -> impl Iterator<Item = &EpisodeRecord> {
        self.recent.iter()
    }

    pub fn mean_episode_reward(&self) -> f64 {
        self.window_mean(|record| record.reward)
    }

    pub fn mean_episode_length(&self) -> f64 {
        self.window_mean(|record| record.length as f64)
    }

    pub fn mean_episode_score(&self) -> f64 {
        self.window_mean(|record| f64::from(record.score))
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line progress summary, e.g.
    /// `Episodes: 1 | Steps: 150 | Reward: 15.50 | Score: 5.00 | Best: 5 | Len: 150.0`
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Score: {:.2} | Best: {} | Len: {:.1}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.mean_episode_score(),
            self.best_score,
            self.mean_episode_length(),
        )
    }

    // 0.0 for an empty window
    fn window_mean(&self, field: impl Fn(&EpisodeRecord) -> f64) -> f64 {
        if self.recent.is_empty() {
            return 0.0;
        }
        self.recent.iter().map(field).sum::<f64>() / self.recent.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_window_keeps_one_episode() {
        let mut stats = TrainingStats::new(0);
        stats.record_episode(1.0, 5, 0);
        stats.record_episode(3.0, 5, 0);

        assert_eq!(stats.window_size(), 1);
        assert_eq!(stats.mean_episode_reward(), 3.0);
    }

    #[test]
    fn test_record_episode() {
        let mut stats = TrainingStats::new(100);
        stats.record_episode(10.0, 50, 3);

        assert_eq!(stats.total_episodes(), 1);
        assert_eq!(stats.total_steps(), 50);
        assert!((stats.mean_episode_reward() - 10.0).abs() < 1e-9);
        assert!((stats.mean_episode_length() - 50.0).abs() < 1e-9);
        assert!((stats.mean_episode_score() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_average() {
        let mut stats = TrainingStats::new(3);

        stats.record_episode(1.0, 10, 1);
        stats.record_episode(2.0, 20, 2);
        stats.record_episode(3.0, 30, 3);
        assert!((stats.mean_episode_reward() - 2.0).abs() < 1e-9);

        // Evicts the first episode
        stats.record_episode(4.0, 40, 4);
        let kept: Vec<usize> = stats.recent().map(|record| record.length).collect();
        assert_eq!(kept, vec![20, 30, 40]);

        assert_eq!(stats.total_episodes(), 4);
        assert!((stats.mean_episode_reward() - 3.0).abs() < 1e-9);
        assert!((stats.mean_episode_length() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_score_outlives_window() {
        let mut stats = TrainingStats::new(2);
        stats.record_episode(50.0, 80, 7);
        stats.record_episode(-10.0, 5, 0);
        stats.record_episode(-10.0, 6, 0);

        assert_eq!(stats.mean_episode_score(), 0.0);
        assert_eq!(stats.best_score(), 7);
    }

    #[test]
    fn test_negative_rewards() {
        let mut stats = TrainingStats::new(10);
        stats.record_episode(-10.03, 3, 0);
        stats.record_episode(-9.97, 5, 0);

        assert!((stats.mean_episode_reward() + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_summary() {
        let mut stats = TrainingStats::new(100);
        stats.record_episode(15.5, 150, 5);

        let summary = stats.format_summary();
        assert!(summary.contains("Episodes: 1"));
        assert!(summary.contains("Steps: 150"));
        assert!(summary.contains("Reward: 15.50"));
        assert!(summary.contains("Score: 5.00"));
        assert!(summary.contains("Best: 5"));
        assert!(summary.contains("Len: 150.0"));
    }

    #[test]
    fn test_empty_stats() {
        let stats = TrainingStats::new(100);

        assert_eq!(stats.mean_episode_reward(), 0.0);
        assert_eq!(stats.mean_episode_length(), 0.0);
        assert_eq!(stats.mean_episode_score(), 0.0);
        assert_eq!(stats.best_score(), 0);
    }
}
