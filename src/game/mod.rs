//! Round state machine for the reaction game.
//!
//! A session walks Idle -> Starting -> (Waiting <-> Cue)* -> Finished. Every
//! delayed step goes through a `Host` timer; the session remembers the handle
//! of each timer it is waiting on and treats any other handle as stale, so a
//! timer left over from a resolved round can never resolve the next one.
//! Randomness (cue delay, trap roll) comes from a `RandomSource` so whole
//! games can be replayed deterministically in tests.

mod feedback;
mod host;
mod rng;
mod scoring;

pub use feedback::{EFFECTS, Effect, Feedback, Haptic, Outcome, Sound};
pub use host::{Host, TimerHandle};
pub use rng::{RandomSource, SeededRandom};
pub use scoring::{
    GOOD_AWARD, GOOD_THRESHOLD_MS, Judgement, MAX_REACTION_MS, PERFECT_AWARD,
    PERFECT_THRESHOLD_MS, Rank, reaction_ms,
};

use std::fmt;

use thiserror::Error;

use crate::config::GameConfig;

pub const NORMAL_ROUNDS: u32 = 5;
pub const ADVANCED_ROUNDS: u32 = 10;
pub const MAX_MISSES: u32 = 3;

// --- Session model -----------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Starting,
    Waiting,
    Cue,
    Finished,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Advanced, // more rounds, trap cues
}

impl Mode {
    pub fn max_rounds(self) -> u32 {
        match self {
            Mode::Normal => NORMAL_ROUNDS,
            Mode::Advanced => ADVANCED_ROUNDS,
        }
    }

    pub fn has_traps(self) -> bool {
        matches!(self, Mode::Advanced)
    }

    /// Parse a mode name as written in page markup (`normal` / `advanced`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "normal" => Some(Mode::Normal),
            "advanced" => Some(Mode::Advanced),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Player or UI event, used for error reporting and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    SelectMode,
    Click,
    Retry,
    BackToStart,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("{event:?} ignored while {phase:?}")]
    InvalidPhase { event: Event, phase: Phase },
    #[error("click ignored between rounds")]
    BetweenRounds,
}

/// Timers a session can be waiting on. At most one of `cue`/`fake` is set.
#[derive(Clone, Copy, Debug, Default)]
struct PendingTimers {
    next_round: Option<TimerHandle>, // start delay and the pause after a resolved round
    cue: Option<TimerHandle>,
    fake: Option<TimerHandle>,
}

impl PendingTimers {
    fn cancel_all(&mut self, host: &mut dyn Host) {
        for handle in [self.next_round.take(), self.cue.take(), self.fake.take()]
            .into_iter()
            .flatten()
        {
            host.cancel(handle);
        }
    }
}

/// Mutable state of one play-through.
#[derive(Clone, Debug)]
pub struct GameSession {
    phase: Phase,
    mode: Mode,
    round: u32,
    score: u32,
    misses: u32,
    is_fake: bool,
    cue_started_at: f64,
    last_reaction_ms: Option<u32>,
    timers: PendingTimers,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            mode: Mode::Normal,
            round: 0,
            score: 0,
            misses: 0,
            is_fake: false,
            cue_started_at: 0.0,
            last_reaction_ms: None,
            timers: PendingTimers::default(),
        }
    }
}

impl GameSession {
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn round(&self) -> u32 {
        self.round
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn misses(&self) -> u32 {
        self.misses
    }
    pub fn is_fake(&self) -> bool {
        self.is_fake
    }
    pub fn cue_started_at(&self) -> f64 {
        self.cue_started_at
    }
    pub fn last_reaction_ms(&self) -> Option<u32> {
        self.last_reaction_ms
    }
    pub fn max_rounds(&self) -> u32 {
        self.mode.max_rounds()
    }
    pub fn rank(&self) -> Rank {
        Rank::from_score(self.score)
    }

    /// True while a click would resolve the current round.
    pub fn accepts_click(&self) -> bool {
        match self.phase {
            Phase::Waiting => self.timers.cue.is_some(),
            Phase::Cue => true,
            _ => false,
        }
    }

    /// Number of timers the session is still waiting on.
    pub fn pending_timers(&self) -> usize {
        [self.timers.next_round, self.timers.cue, self.timers.fake]
            .iter()
            .filter(|t| t.is_some())
            .count()
    }

    fn is_over(&self) -> bool {
        self.round >= self.max_rounds() || self.misses >= MAX_MISSES
    }
}

// --- Controller ----------------------------------------------------------------

/// Owns the session and drives it from player events and fired timers.
pub struct Game<R: RandomSource> {
    config: GameConfig,
    rng: R,
    session: GameSession,
}

impl<R: RandomSource> Game<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        Self { config, rng, session: GameSession::default() }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Idle -> Starting.
    pub fn select_mode(&mut self, mode: Mode, host: &mut dyn Host) -> Result<(), GameError> {
        self.expect_phase(Event::SelectMode, Phase::Idle)?;
        self.begin(mode, host);
        Ok(())
    }

    /// Finished -> Starting, keeping the previous mode. Plays the retry
    /// effect, then the regular start effect.
    pub fn retry(&mut self, host: &mut dyn Host) -> Result<(), GameError> {
        self.expect_phase(Event::Retry, Phase::Finished)?;
        let mode = self.session.mode;
        host.present(Feedback::new(Outcome::Retry));
        self.begin(mode, host);
        Ok(())
    }

    /// Finished -> Idle. Final score stays readable until the next start.
    pub fn back_to_start(&mut self, host: &mut dyn Host) -> Result<(), GameError> {
        self.expect_phase(Event::BackToStart, Phase::Finished)?;
        self.session.timers.cancel_all(host);
        self.session.phase = Phase::Idle;
        log::debug!("back to mode selection");
        host.present(Feedback::new(Outcome::Ready));
        Ok(())
    }

    /// Drop the session from any phase: cancel every pending timer and go back
    /// to Idle. Used when the page restarts the game under a new config.
    pub fn abandon(&mut self, host: &mut dyn Host) {
        self.session.timers.cancel_all(host);
        self.session = GameSession::default();
    }

    /// Player tapped the play surface at `now` (ms, host clock).
    pub fn click(&mut self, now: f64, host: &mut dyn Host) -> Result<(), GameError> {
        match self.session.phase {
            Phase::Waiting if self.session.timers.cue.is_none() => Err(GameError::BetweenRounds),
            Phase::Waiting => {
                if let Some(handle) = self.session.timers.cue.take() {
                    host.cancel(handle);
                }
                self.session.misses += 1;
                log::debug!("round {}: too early", self.session.round);
                self.resolve_round(Some(Feedback::new(Outcome::TooEarly)), true, host);
                Ok(())
            }
            Phase::Cue if self.session.is_fake => {
                if let Some(handle) = self.session.timers.fake.take() {
                    host.cancel(handle);
                }
                self.session.misses += 1;
                log::debug!("round {}: pressed a trap", self.session.round);
                self.resolve_round(Some(Feedback::new(Outcome::Trap)), true, host);
                Ok(())
            }
            Phase::Cue => {
                let reaction = reaction_ms(self.session.cue_started_at, now);
                let judgement = Judgement::classify(reaction);
                self.session.last_reaction_ms = Some(reaction);
                self.session.score += judgement.award();
                if judgement.is_miss() {
                    self.session.misses += 1;
                }
                log::debug!(
                    "round {}: {:?} in {}ms, score {}",
                    self.session.round,
                    judgement,
                    reaction,
                    self.session.score
                );
                let outcome = match judgement {
                    Judgement::Perfect => Outcome::Perfect,
                    Judgement::Good => Outcome::Good,
                    Judgement::Bad => Outcome::Bad,
                    Judgement::Fail => Outcome::TooLate,
                };
                self.resolve_round(Some(Feedback::with_reaction(outcome, reaction)), true, host);
                Ok(())
            }
            phase => Err(GameError::InvalidPhase { event: Event::Click, phase }),
        }
    }

    /// A host timer fired. Returns false when the handle belongs to no live
    /// timer (cancelled, or from a round that is already resolved).
    pub fn on_timer(&mut self, handle: TimerHandle, now: f64, host: &mut dyn Host) -> bool {
        let timers = self.session.timers;
        if timers.next_round == Some(handle) {
            self.session.timers.next_round = None;
            if self.session.phase == Phase::Starting {
                self.session.round = 1;
            }
            self.start_round(host);
        } else if timers.cue == Some(handle) {
            self.session.timers.cue = None;
            self.enter_cue(now, host);
        } else if timers.fake == Some(handle) {
            self.session.timers.fake = None;
            log::debug!("round {}: trap avoided", self.session.round);
            self.resolve_round(None, false, host);
        } else {
            log::debug!("stale timer {:?} ignored", handle);
            return false;
        }
        true
    }

    // --- Transitions ---------------------------------------------------------

    fn expect_phase(&self, event: Event, phase: Phase) -> Result<(), GameError> {
        if self.session.phase == phase {
            Ok(())
        } else {
            Err(GameError::InvalidPhase { event, phase: self.session.phase })
        }
    }

    fn begin(&mut self, mode: Mode, host: &mut dyn Host) {
        self.session.timers.cancel_all(host);
        self.session = GameSession { mode, phase: Phase::Starting, ..GameSession::default() };
        log::debug!("starting {} game", mode);
        host.present(Feedback::new(Outcome::Start));
        self.session.timers.next_round = Some(host.schedule(self.config.start_delay_ms));
    }

    fn start_round(&mut self, host: &mut dyn Host) {
        let delay = self.rng.cue_delay_ms(self.config.cue_delay_range());
        self.session.is_fake =
            self.session.mode.has_traps() && self.rng.roll(self.config.fake_probability);
        self.session.phase = Phase::Waiting;
        log::debug!(
            "round {}/{}: cue in {}ms{}",
            self.session.round,
            self.session.max_rounds(),
            delay,
            if self.session.is_fake { " (trap)" } else { "" }
        );
        host.present(Feedback::new(Outcome::Wait));
        self.session.timers.cue = Some(host.schedule(delay));
    }

    fn enter_cue(&mut self, now: f64, host: &mut dyn Host) {
        self.session.phase = Phase::Cue;
        self.session.cue_started_at = now;
        if self.session.is_fake {
            host.present(Feedback::new(Outcome::FakeCue));
            self.session.timers.fake = Some(host.schedule(self.config.fake_duration_ms));
        } else {
            host.present(Feedback::new(Outcome::Cue));
        }
    }

    /// Shared tail of every round: present the result (if any), then either
    /// finish or move on. `pause` inserts the between-round delay before the next cue
    /// is armed; without it the next round starts at once.
    fn resolve_round(&mut self, feedback: Option<Feedback>, pause: bool, host: &mut dyn Host) {
        if let Some(feedback) = feedback {
            host.present(feedback);
        }
        if self.session.is_over() {
            self.finish(host);
            return;
        }
        self.session.round += 1;
        self.session.phase = Phase::Waiting;
        if pause {
            self.session.timers.next_round = Some(host.schedule(self.config.next_round_delay_ms));
        } else {
            self.start_round(host);
        }
    }

    fn finish(&mut self, host: &mut dyn Host) {
        self.session.timers.cancel_all(host);
        self.session.phase = Phase::Finished;
        log::debug!(
            "finished: score {} ({}), misses {}",
            self.session.score,
            self.session.rank().letter(),
            self.session.misses
        );
        host.present(Feedback::new(Outcome::Finished));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Host that hands out sequential handles and records everything.
    #[derive(Default)]
    struct RecordingHost {
        next: i32,
        scheduled: Vec<(TimerHandle, u32)>,
        cancelled: Vec<TimerHandle>,
        shown: Vec<Outcome>,
    }

    impl Host for RecordingHost {
        fn schedule(&mut self, delay_ms: u32) -> TimerHandle {
            self.next += 1;
            let h = TimerHandle(self.next);
            self.scheduled.push((h, delay_ms));
            h
        }
        fn cancel(&mut self, handle: TimerHandle) {
            self.cancelled.push(handle);
        }
        fn present(&mut self, feedback: Feedback) {
            self.shown.push(feedback.outcome);
        }
    }

    struct Fixed {
        delay: u32,
        fake: bool,
    }

    impl RandomSource for Fixed {
        fn cue_delay_ms(&mut self, _range: std::ops::Range<u32>) -> u32 {
            self.delay
        }
        fn roll(&mut self, _p: f64) -> bool {
            self.fake
        }
    }

    fn last_handle(host: &RecordingHost) -> TimerHandle {
        host.scheduled.last().unwrap().0
    }

    #[test]
    fn test_mode_table() {
        assert_eq!(Mode::Normal.max_rounds(), 5);
        assert_eq!(Mode::Advanced.max_rounds(), 10);
        assert_eq!(Mode::from_name("advanced"), Some(Mode::Advanced));
        assert_eq!(Mode::from_name("hard"), None);
    }

    #[test]
    fn test_select_mode_schedules_start() {
        let mut host = RecordingHost::default();
        let mut game = Game::new(GameConfig::default(), Fixed { delay: 2000, fake: false });
        game.select_mode(Mode::Normal, &mut host).unwrap();
        assert_eq!(game.session().phase(), Phase::Starting);
        assert_eq!(game.session().round(), 0);
        assert_eq!(host.scheduled, vec![(TimerHandle(1), 1000)]);
        assert_eq!(host.shown, vec![Outcome::Start]);

        assert!(game.on_timer(TimerHandle(1), 1000.0, &mut host));
        assert_eq!(game.session().phase(), Phase::Waiting);
        assert_eq!(game.session().round(), 1);
        assert_eq!(host.scheduled.last(), Some(&(TimerHandle(2), 2000)));
    }

    #[test]
    fn test_normal_mode_never_rolls_traps() {
        let mut host = RecordingHost::default();
        let mut game = Game::new(GameConfig::default(), Fixed { delay: 1000, fake: true });
        game.select_mode(Mode::Normal, &mut host).unwrap();
        game.on_timer(last_handle(&host), 0.0, &mut host);
        game.on_timer(last_handle(&host), 1000.0, &mut host);
        assert_eq!(game.session().phase(), Phase::Cue);
        assert!(!game.session().is_fake());
        assert_eq!(host.shown.last(), Some(&Outcome::Cue));
    }

    #[test]
    fn test_early_click_cancels_cue_timer() {
        let mut host = RecordingHost::default();
        let mut game = Game::new(GameConfig::default(), Fixed { delay: 3000, fake: false });
        game.select_mode(Mode::Normal, &mut host).unwrap();
        game.on_timer(last_handle(&host), 1000.0, &mut host);
        let cue = last_handle(&host);
        game.click(1500.0, &mut host).unwrap();
        assert!(host.cancelled.contains(&cue));
        assert_eq!(game.session().misses(), 1);
        assert_eq!(game.session().round(), 2);
        // gap before the next round: clicks are ignored
        assert_eq!(game.click(1600.0, &mut host), Err(GameError::BetweenRounds));
        assert!(!game.on_timer(cue, 4000.0, &mut host));
        assert_eq!(game.session().phase(), Phase::Waiting);
    }

    #[test]
    fn test_invalid_events_are_rejected() {
        let mut host = RecordingHost::default();
        let mut game = Game::new(GameConfig::default(), Fixed { delay: 1000, fake: false });
        assert_eq!(
            game.click(0.0, &mut host),
            Err(GameError::InvalidPhase { event: Event::Click, phase: Phase::Idle })
        );
        assert!(game.retry(&mut host).is_err());
        assert!(game.back_to_start(&mut host).is_err());
        game.select_mode(Mode::Advanced, &mut host).unwrap();
        assert!(game.select_mode(Mode::Normal, &mut host).is_err());
        assert!(game.click(10.0, &mut host).is_err());
        assert_eq!(game.session().mode(), Mode::Advanced);
    }

    #[test]
    fn test_abandon_cancels_everything() {
        let mut host = RecordingHost::default();
        let mut game = Game::new(GameConfig::default(), Fixed { delay: 1000, fake: true });
        game.select_mode(Mode::Advanced, &mut host).unwrap();
        game.on_timer(last_handle(&host), 1000.0, &mut host);
        game.on_timer(last_handle(&host), 2000.0, &mut host);
        assert_eq!(game.session().phase(), Phase::Cue);
        let fake = last_handle(&host);
        game.abandon(&mut host);
        assert!(host.cancelled.contains(&fake));
        assert_eq!(game.session().phase(), Phase::Idle);
        assert_eq!(game.session().pending_timers(), 0);
        assert!(!game.on_timer(fake, 3500.0, &mut host));
    }
}
