use crate::config::LevelRules;

/// True when a score reached by eating food triggers a level-up.
///
/// Only scores landing exactly on a multiple of `points_per_level` count, so
/// heavy food can jump over a threshold without levelling up.
#[must_use]
pub fn evaluate_level_up(score: u32, rules: &LevelRules) -> bool {
    score > 0 && score % rules.points_per_level.max(1) == 0
}

/// Tick rate for a session that starts at `level`.
#[must_use]
pub fn initial_speed(level: u32, rules: &LevelRules) -> u32 {
    rules.base_speed + level.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use crate::config::LevelRules;

    use super::{evaluate_level_up, initial_speed};

    #[test]
    fn level_up_on_multiples_only() {
        let rules = LevelRules::default();

        assert!(!evaluate_level_up(0, &rules));
        assert!(!evaluate_level_up(2, &rules));
        assert!(evaluate_level_up(3, &rules));
        assert!(!evaluate_level_up(5, &rules));
        assert!(evaluate_level_up(6, &rules));
        assert!(evaluate_level_up(99, &rules));
    }

    #[test]
    fn speed_tracks_starting_level() {
        let rules = LevelRules::default();

        assert_eq!(initial_speed(1, &rules), 10);
        assert_eq!(initial_speed(7, &rules), 16);
        assert_eq!(initial_speed(0, &rules), 10);
    }
}
