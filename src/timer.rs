//! Gravity timer: the one scheduled drop tick of a session.

use crate::game::GameState;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    period: Duration,
    level: u32,
    due: Instant,
}

/// At most one live schedule. Cancelled while paused or after game over, recreated
/// whenever the level or the drop interval changes.
#[derive(Debug, Default)]
pub struct GravityTimer {
    live: Option<Scheduled>,
}

impl GravityTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the schedule in line with `state`. Call after every state change.
    pub fn sync(&mut self, state: &GameState, now: Instant) {
        if state.is_paused() || state.is_game_over() {
            if self.live.take().is_some() {
                log::debug!("gravity timer cancelled");
            }
            return;
        }
        let period = state.drop_interval();
        let level = state.level();
        if self.live.is_none_or(|s| s.period != period || s.level != level) {
            log::debug!("gravity timer started: level {level}, {} ms", period.as_millis());
            self.live = Some(Scheduled {
                period,
                level,
                due: now + period,
            });
        }
    }

    /// Drop any schedule, e.g. on reset, so the next `sync` starts a full period.
    pub fn cancel(&mut self) {
        self.live = None;
    }

    /// True if a tick is due; the next one is then scheduled a full period from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.live.as_mut() {
            Some(s) if now >= s.due => {
                s.due = now + s.period;
                true
            }
            _ => false,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.live.map(|s| s.period)
    }

    /// Time left until the next tick, for bounding the event poll.
    pub fn until_due(&self, now: Instant) -> Option<Duration> {
        self.live.map(|s| s.due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::random::ScriptedSource;
    use crate::tetromino::TetrominoKind;

    fn state() -> GameState {
        let config = GameConfig {
            width: 10,
            height: 20,
            initial_speed_ms: 1000,
            seed: None,
        };
        GameState::new(&config, Box::new(ScriptedSource::new(&[TetrominoKind::I])))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_once_per_period() {
        let game = state();
        let mut timer = GravityTimer::new();
        let t0 = Instant::now();
        timer.sync(&game, t0);
        assert_eq!(timer.period(), Some(ms(1000)));
        assert!(!timer.poll(t0 + ms(999)));
        assert!(timer.poll(t0 + ms(1000)));
        assert!(!timer.poll(t0 + ms(1500)));
        assert!(timer.poll(t0 + ms(2000)));
    }

    #[test]
    fn test_sync_keeps_schedule_when_period_unchanged() {
        let game = state();
        let mut timer = GravityTimer::new();
        let t0 = Instant::now();
        timer.sync(&game, t0);
        timer.sync(&game, t0 + ms(600));
        assert!(timer.poll(t0 + ms(1000)));
    }

    #[test]
    fn test_pause_cancels_and_resume_restarts() {
        let mut game = state();
        let mut timer = GravityTimer::new();
        let t0 = Instant::now();
        timer.sync(&game, t0);
        game.toggle_pause();
        timer.sync(&game, t0 + ms(500));
        assert!(!timer.is_live());
        assert!(!timer.poll(t0 + ms(5000)));
        game.toggle_pause();
        timer.sync(&game, t0 + ms(5000));
        assert!(timer.is_live());
        assert!(!timer.poll(t0 + ms(5999)));
        assert!(timer.poll(t0 + ms(6000)));
    }

    #[test]
    fn test_level_change_restarts_with_new_period() {
        let mut game = state();
        let mut timer = GravityTimer::new();
        let t0 = Instant::now();
        timer.sync(&game, t0);
        game.set_score(2000);
        timer.sync(&game, t0 + ms(900));
        assert_eq!(timer.period(), Some(ms(800)));
        assert!(!timer.poll(t0 + ms(1000)));
        assert!(timer.poll(t0 + ms(1700)));
    }

    #[test]
    fn test_level_change_at_speed_floor_restarts() {
        let mut game = state();
        let mut timer = GravityTimer::new();
        let t0 = Instant::now();
        game.set_score(10_000);
        timer.sync(&game, t0);
        assert_eq!(timer.period(), Some(ms(100)));
        game.set_score(11_000);
        timer.sync(&game, t0 + ms(90));
        assert_eq!(timer.period(), Some(ms(100)));
        assert_eq!(timer.until_due(t0 + ms(90)), Some(ms(100)));
        assert!(!timer.poll(t0 + ms(100)));
        assert!(timer.poll(t0 + ms(190)));
    }

    #[test]
    fn test_game_over_cancels() {
        let mut game = state();
        let mut timer = GravityTimer::new();
        let t0 = Instant::now();
        timer.sync(&game, t0);
        game.force_game_over();
        timer.sync(&game, t0);
        assert!(!timer.is_live());
        assert_eq!(timer.until_due(t0), None);
    }

    #[test]
    fn test_cancel_then_sync_starts_full_period() {
        let game = state();
        let mut timer = GravityTimer::new();
        let t0 = Instant::now();
        timer.sync(&game, t0);
        timer.cancel();
        timer.sync(&game, t0 + ms(900));
        assert_eq!(timer.until_due(t0 + ms(900)), Some(ms(1000)));
    }
}
