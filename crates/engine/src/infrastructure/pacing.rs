//! Presentation pacing between encounters.

use std::time::Duration;

use async_trait::async_trait;

use delve_domain::EncounterKind;

use crate::infrastructure::ports::PacingPort;

/// Sleeps on the tokio timer. Bosses linger longer on screen.
pub struct TokioPacer {
    interval: Duration,
}

impl TokioPacer {
    pub const MINI_BOSS_FACTOR: f64 = 1.5;
    pub const FINAL_BOSS_FACTOR: f64 = 2.0;

    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn delay_for(&self, beat: EncounterKind) -> Duration {
        match beat {
            EncounterKind::Normal => self.interval,
            EncounterKind::MiniBoss => self.interval.mul_f64(Self::MINI_BOSS_FACTOR),
            EncounterKind::FinalBoss => self.interval.mul_f64(Self::FINAL_BOSS_FACTOR),
        }
    }
}

#[async_trait]
impl PacingPort for TokioPacer {
    async fn pause(&self, beat: EncounterKind) {
        let delay = self.delay_for(beat);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// No delay at all. For headless simulation and tests.
pub struct NoPacing;

#[async_trait]
impl PacingPort for NoPacing {
    async fn pause(&self, _beat: EncounterKind) {
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bosses_get_longer_beats() {
        let pacer = TokioPacer::new(Duration::from_millis(800));
        assert_eq!(
            pacer.delay_for(EncounterKind::Normal),
            Duration::from_millis(800)
        );
        assert_eq!(
            pacer.delay_for(EncounterKind::MiniBoss),
            Duration::from_millis(1200)
        );
        assert_eq!(
            pacer.delay_for(EncounterKind::FinalBoss),
            Duration::from_millis(1600)
        );
    }

    #[tokio::test]
    async fn pause_waits_for_the_beat() {
        let pacer = TokioPacer::new(Duration::from_millis(10));
        let start = tokio::time::Instant::now();
        pacer.pause(EncounterKind::FinalBoss).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
