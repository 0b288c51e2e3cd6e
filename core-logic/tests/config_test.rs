use core_logic::{LogSettings, SpamConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spam_config_defaults() {
        let config = SpamConfig::default();

        assert_eq!(config.max_cycles, 5);
        assert_eq!(config.task_interval_min, 8000);
        assert_eq!(config.task_interval_max, 28000);
    }

    #[test]
    fn test_random_interval_stays_in_range() {
        let config = SpamConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let wait = config.random_interval(&mut rng);
            assert!(wait >= Duration::from_millis(8000));
            assert!(wait <= Duration::from_millis(28000));
        }
    }

    #[test]
    fn test_random_interval_degenerate_range() {
        let config = SpamConfig {
            max_cycles: 1,
            task_interval_min: 5,
            task_interval_max: 5,
        };
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(config.random_interval(&mut rng), Duration::from_millis(5));
    }

    #[test]
    fn test_random_interval_is_reproducible() {
        let config = SpamConfig::default();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        assert_eq!(config.random_interval(&mut a), config.random_interval(&mut b));
    }

    #[test]
    fn test_log_settings_defaults() {
        let settings = LogSettings::default();

        assert_eq!(settings.level, "info");
        assert_eq!(settings.timezone, "Asia/Jakarta");
        assert_eq!(settings.directory, "logs");
    }
}
