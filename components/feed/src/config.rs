use std::time::Duration;

use crate::FeedError;

/// Tuning knobs of the feed. Defaults reproduce the landing page behaviour: five visible
/// records, a new one every 3 seconds, processing after 1 second and completed after 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub capacity: usize,
    pub tick_interval: Duration,
    pub processing_after: Duration,
    pub completed_after: Duration,
    /// Produce the first record right away instead of one interval after `start()`.
    pub first_tick_immediate: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            tick_interval: Duration::from_secs(3),
            processing_after: Duration::from_secs(1),
            completed_after: Duration::from_secs(2),
            first_tick_immediate: true,
        }
    }
}

impl FeedConfig {
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.capacity == 0 {
            return Err(FeedError::InvalidConfig("capacity must be at least 1".to_string()));
        }
        if self.tick_interval.is_zero() {
            return Err(FeedError::InvalidConfig("tick interval must not be zero".to_string()));
        }
        if self.processing_after >= self.completed_after {
            return Err(FeedError::InvalidConfig(format!(
                "processing delay ({:?}) must be shorter than completed delay ({:?})",
                self.processing_after, self.completed_after
            )));
        }
        Ok(())
    }
}

/// Parameters of a real-time run driven by [`crate::run_feed`].
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub feed: FeedConfig,
    pub duration: Duration,
    pub frame_interval: Duration,
    /// Simulates pressing "Pause Simulation" at this point of the run.
    pub pause_after: Option<Duration>,
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            duration: Duration::from_secs(15),
            frame_interval: Duration::from_secs(1),
            pause_after: None,
            seed: None,
        }
    }
}

impl RunOptions {
    pub fn validate(&self) -> Result<(), FeedError> {
        self.feed.validate()?;
        if self.frame_interval.is_zero() {
            return Err(FeedError::InvalidConfig("frame interval must not be zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(FeedConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = FeedConfig { capacity: 0, ..Default::default() };

        let Err(FeedError::InvalidConfig(msg)) = config.validate() else {
            panic!();
        };
        assert_eq!(msg, "capacity must be at least 1");
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = FeedConfig { tick_interval: Duration::ZERO, ..Default::default() };
        assert!(matches!(config.validate(), Err(FeedError::InvalidConfig(_))));
    }

    #[test]
    fn status_delays_must_be_ordered() {
        let config = FeedConfig {
            processing_after: Duration::from_secs(2),
            completed_after: Duration::from_secs(2),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(FeedError::InvalidConfig(_))));
    }

    #[test]
    fn zero_frame_interval_is_rejected() {
        let options = RunOptions { frame_interval: Duration::ZERO, ..Default::default() };
        assert!(matches!(options.validate(), Err(FeedError::InvalidConfig(_))));
        assert!(RunOptions::default().validate().is_ok());
    }
}
