//! Summary of greedy evaluation runs

/// Episode lengths and scores collected over a batch of test runs
///
/// # Example
///
/// ```rust
/// use snake_qlearn::metrics::EvaluationSummary;
///
/// let mut summary = EvaluationSummary::new();
/// summary.record(40, 2);
/// summary.record(60, 4);
///
/// assert_eq!(summary.mean_length(), 50.0);
/// assert_eq!(summary.score_range(), Some((2, 4)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationSummary {
    lengths: Vec<usize>,
    scores: Vec<u32>,
}

impl EvaluationSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished run
    pub fn record(&mut self, length: usize, score: u32) {
        self.lengths.push(length);
        self.scores.push(score);
    }

    pub fn runs(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Steps taken per run, in run order
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Food eaten per run, in run order
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// Mean run length, 0.0 when no runs were recorded
    pub fn mean_length(&self) -> f64 {
        if self.lengths.is_empty() {
            return 0.0;
        }
        self.lengths.iter().sum::<usize>() as f64 / self.lengths.len() as f64
    }

    /// Mean score, 0.0 when no runs were recorded
    pub fn mean_score(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().map(|&s| s as f64).sum::<f64>() / self.scores.len() as f64
    }

    /// (min, max) run length
    pub fn length_range(&self) -> Option<(usize, usize)> {
        Some((*self.lengths.iter().min()?, *self.lengths.iter().max()?))
    }

    /// (min, max) score
    pub fn score_range(&self) -> Option<(u32, u32)> {
        Some((*self.scores.iter().min()?, *self.scores.iter().max()?))
    }

    /// Multi-line report of the mean and range of lengths and scores
    pub fn format_report(&self) -> String {
        let Some((min_length, max_length)) = self.length_range() else {
            return "No test runs recorded".to_string();
        };
        let (min_score, max_score) = self.score_range().unwrap_or((0, 0));

        format!(
            "Average game:\t\t{:.3} timesteps\n\
             Min/Max game length:\t{} / {} timesteps\n\
             Average score:\t\t{:.3}\n\
             Min/Max score:\t\t{} / {}",
            self.mean_length(),
            min_length,
            max_length,
            self.mean_score(),
            min_score,
            max_score,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let summary = EvaluationSummary::new();

        assert!(summary.is_empty());
        assert_eq!(summary.mean_length(), 0.0);
        assert_eq!(summary.mean_score(), 0.0);
        assert_eq!(summary.length_range(), None);
        assert_eq!(summary.score_range(), None);
        assert_eq!(summary.format_report(), "No test runs recorded");
    }

    #[test]
    fn test_mean_min_max() {
        let mut summary = EvaluationSummary::new();
        summary.record(12, 0);
        summary.record(30, 3);
        summary.record(21, 1);

        assert_eq!(summary.runs(), 3);
        assert_eq!(summary.mean_length(), 21.0);
        assert!((summary.mean_score() - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.length_range(), Some((12, 30)));
        assert_eq!(summary.score_range(), Some((0, 3)));
    }

    #[test]
    fn test_raw_lists_keep_run_order() {
        let mut summary = EvaluationSummary::new();
        summary.record(5, 2);
        summary.record(3, 1);

        assert_eq!(summary.lengths(), &[5, 3]);
        assert_eq!(summary.scores(), &[2, 1]);
    }

    #[test]
    fn test_format_report() {
        let mut summary = EvaluationSummary::new();
        summary.record(10, 1);
        summary.record(20, 5);

        let report = summary.format_report();
        assert!(report.contains("Average game:\t\t15.000 timesteps"));
        assert!(report.contains("Min/Max game length:\t10 / 20 timesteps"));
        assert!(report.contains("Average score:\t\t3.000"));
        assert!(report.contains("Min/Max score:\t\t1 / 5"));
    }
}
