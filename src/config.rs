use std::path::Path;
use std::time::Duration;

use anyhow::{Result, ensure};
use serde::Deserialize;
use tracing::warn;

use crate::carousel::CarouselOptions;
use crate::carousel::timer::MAX_DELAY;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Animated transition length, also the delay before a silent reanchor.
    #[serde(with = "humantime_serde")]
    pub speed: Duration,
    /// Advance to the next page on a timer.
    pub auto: bool,
    /// Auto-advance period.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// How many slides make up one page.
    pub slides_to_show: usize,
    /// Slide labels shown by the demo binary.
    pub slides: Vec<String>,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(mut self) -> Result<Self> {
        ensure!(
            !self.interval.is_zero(),
            "interval must be greater than zero"
        );
        ensure!(
            self.interval <= MAX_DELAY,
            "interval must not exceed {}",
            humantime::format_duration(MAX_DELAY)
        );
        ensure!(
            self.speed <= MAX_DELAY,
            "speed must not exceed {}",
            humantime::format_duration(MAX_DELAY)
        );
        if self.slides_to_show == 0 {
            warn!("slides-to-show of 0 treated as 1");
            self.slides_to_show = 1;
        }
        if self.auto && self.interval <= self.speed {
            warn!(
                interval = %humantime::format_duration(self.interval),
                speed = %humantime::format_duration(self.speed),
                "auto-advance interval does not exceed transition speed; some ticks will be skipped"
            );
        }
        Ok(self)
    }

    pub fn carousel_options(&self) -> CarouselOptions {
        CarouselOptions {
            speed: self.speed,
            auto: self.auto,
            interval: self.interval,
            slides_to_show: self.slides_to_show,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        let options = CarouselOptions::default();
        Self {
            speed: options.speed,
            auto: options.auto,
            interval: options.interval,
            slides_to_show: options.slides_to_show,
            slides: Vec::new(),
        }
    }
}
