//! `RampSchedule`: percentage-per-step plan shared between `GRADUAL`
//! traffic-shifting during a failover and the step-wise ramp-up during
//! automatic recovery.

use std::time::Duration;

pub struct RampSchedule {
    percentages: Vec<u8>,
    step_interval: Duration,
}

impl RampSchedule {
    /// `n` even steps from `0` to `100`, `drain_timeout / n` apart.
    pub fn even_steps(steps: u32, drain_timeout: Duration) -> Self {
        let steps = steps.max(1);
        let step_interval = drain_timeout / steps;
        let percentages = (1..=steps).map(|step| ((step * 100) / steps) as u8).collect();
        Self { percentages, step_interval }
    }

    /// Starts at `initial_percentage`, then steps by `increment_percentage`
    /// every `increment_interval` until reaching 100.
    pub fn ramp_up(initial_percentage: u8, increment_percentage: u8, increment_interval: Duration) -> Self {
        let increment_percentage = increment_percentage.max(1);
        let mut percentages = Vec::new();
        let mut current = initial_percentage;
        percentages.push(current);
        while current < 100 {
            current = current.saturating_add(increment_percentage).min(100);
            percentages.push(current);
        }
        Self { percentages, step_interval: increment_interval }
    }

    pub fn steps(&self) -> &[u8] {
        &self.percentages
    }

    pub fn step_interval(&self) -> Duration {
        self.step_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_steps_reaches_one_hundred() {
        let schedule = RampSchedule::even_steps(5, Duration::from_secs(50));
        assert_eq!(schedule.steps(), &[20, 40, 60, 80, 100]);
        assert_eq!(schedule.step_interval(), Duration::from_secs(10));
    }

    #[test]
    fn ramp_up_ends_at_one_hundred() {
        let schedule = RampSchedule::ramp_up(10, 25, Duration::from_secs(30));
        assert_eq!(schedule.steps(), &[10, 35, 60, 85, 100]);
    }

    #[test]
    fn zero_steps_is_clamped_to_one() {
        let schedule = RampSchedule::even_steps(0, Duration::from_secs(10));
        assert_eq!(schedule.steps(), &[100]);
    }
}
