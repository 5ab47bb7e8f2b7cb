//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        use rand::Rng;
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_chance(&self, probability: f64) -> bool {
        use rand::Rng;
        rand::thread_rng().gen_bool(probability.clamp(0.0, 1.0))
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed random for testing. Range draws are clamped into `min..=max`,
/// so `i32::MIN` always picks the low end and `i32::MAX` the high end.
/// Chance rolls succeed only when `always_lucky` is set.
#[cfg(test)]
pub struct FixedRandom {
    pub value: i32,
    pub always_lucky: bool,
}

#[cfg(test)]
impl FixedRandom {
    pub fn new(value: i32) -> Self {
        Self {
            value,
            always_lucky: false,
        }
    }

    pub fn lowest() -> Self {
        Self::new(i32::MIN)
    }

    pub fn highest() -> Self {
        Self::new(i32::MAX)
    }

    pub fn lucky(mut self) -> Self {
        self.always_lucky = true;
        self
    }
}

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        self.value.clamp(min, max.max(min))
    }

    fn gen_chance(&self, probability: f64) -> bool {
        self.always_lucky && probability > 0.0
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Plays back range draws in order, clamped into range; the low end once
/// the sequence runs dry.
#[cfg(test)]
pub struct SequenceRandom {
    values: std::sync::Mutex<std::collections::VecDeque<i32>>,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            values: std::sync::Mutex::new(values.into_iter().collect()),
        }
    }
}

#[cfg(test)]
impl RandomPort for SequenceRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        let next = self
            .values
            .lock()
            .expect("sequence lock")
            .pop_front()
            .unwrap_or(min);
        next.clamp(min, max.max(min))
    }

    fn gen_chance(&self, _probability: f64) -> bool {
        false
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}
