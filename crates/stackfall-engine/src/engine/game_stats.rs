/// Points awarded for every cleared row.
pub const ROW_CLEAR_BONUS: usize = 100;

/// Score and counters for one game session.
///
/// Every cleared row is worth a flat [`ROW_CLEAR_BONUS`]; clearing several
/// rows with one lock earns no extra bonus. The score never decreases.
///
/// # Example
///
/// ```
/// use stackfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_lock(2);
///
/// assert_eq!(stats.score(), 200);
/// assert_eq!(stats.cleared_rows(), 2);
/// assert_eq!(stats.locked_shapes(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    locked_shapes: usize,
    cleared_rows: usize,
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            locked_shapes: 0,
            cleared_rows: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the number of shapes merged into the grid so far.
    #[must_use]
    pub const fn locked_shapes(&self) -> usize {
        self.locked_shapes
    }

    #[must_use]
    pub const fn cleared_rows(&self) -> usize {
        self.cleared_rows
    }

    /// Records one lock that cleared `cleared_rows` rows.
    pub const fn record_lock(&mut self, cleared_rows: usize) {
        self.locked_shapes += 1;
        self.cleared_rows += cleared_rows;
        self.score += cleared_rows * ROW_CLEAR_BONUS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_zero() {
        let stats = GameStats::new();
        assert_eq!(stats, GameStats::default());
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.locked_shapes(), 0);
        assert_eq!(stats.cleared_rows(), 0);
    }

    #[test]
    fn test_flat_bonus_per_row() {
        let mut stats = GameStats::new();
        stats.record_lock(0);
        assert_eq!(stats.score(), 0);
        stats.record_lock(1);
        assert_eq!(stats.score(), 100);
        stats.record_lock(4);
        assert_eq!(stats.score(), 500);
        assert_eq!(stats.locked_shapes(), 3);
        assert_eq!(stats.cleared_rows(), 5);
    }
}
