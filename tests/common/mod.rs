// Shared helpers for the native integration tests: a virtual-clock host and a
// scripted random source so every round of a game is predictable.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::ops::Range;

use reflex_cat::config::GameConfig;
use reflex_cat::game::{Feedback, Game, Host, Outcome, RandomSource, TimerHandle};

/// Host backed by a manual clock. Timers fire only when the test advances time.
#[derive(Default)]
pub struct ManualHost {
    pub now: f64,
    next_id: i32,
    pending: Vec<(TimerHandle, f64)>,
    pub cancelled: Vec<TimerHandle>,
    pub shown: Vec<Feedback>,
}

impl ManualHost {
    pub fn outcomes(&self) -> Vec<Outcome> {
        self.shown.iter().map(|f| f.outcome).collect()
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.shown.last().map(|f| f.outcome)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Handle most recently given out by `schedule`.
    pub fn last_scheduled(&self) -> TimerHandle {
        TimerHandle(self.next_id)
    }

    /// Pop the earliest timer due at or before `until`.
    fn pop_due(&mut self, until: f64) -> Option<(TimerHandle, f64)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (_, due))| *due <= until)
            .min_by(|a, b| a.1.1.total_cmp(&b.1.1))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(idx))
    }
}

impl Host for ManualHost {
    fn schedule(&mut self, delay_ms: u32) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push((handle, self.now + delay_ms as f64));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|(h, _)| *h != handle);
        self.cancelled.push(handle);
    }

    fn present(&mut self, feedback: Feedback) {
        self.shown.push(feedback);
    }
}

/// Advance the virtual clock by `ms`, firing every timer that comes due.
pub fn advance<R: RandomSource>(game: &mut Game<R>, host: &mut ManualHost, ms: f64) {
    let until = host.now + ms;
    while let Some((handle, due)) = host.pop_due(until) {
        host.now = due;
        game.on_timer(handle, due, host);
    }
    host.now = until;
}

/// Click `ms` after the current virtual time.
pub fn click_after<R: RandomSource>(game: &mut Game<R>, host: &mut ManualHost, ms: f64) {
    advance(game, host, ms);
    let now = host.now;
    let _ = game.click(now, host);
}

/// Random source that replays queued answers, then falls back to defaults.
pub struct Scripted {
    pub delays: VecDeque<u32>,
    pub fakes: VecDeque<bool>,
    pub default_delay: u32,
}

impl Scripted {
    pub fn new(default_delay: u32) -> Self {
        Self { delays: VecDeque::new(), fakes: VecDeque::new(), default_delay }
    }

    pub fn with_fakes(default_delay: u32, fakes: &[bool]) -> Self {
        Self { fakes: fakes.iter().copied().collect(), ..Self::new(default_delay) }
    }
}

impl RandomSource for Scripted {
    fn cue_delay_ms(&mut self, _range: Range<u32>) -> u32 {
        self.delays.pop_front().unwrap_or(self.default_delay)
    }

    fn roll(&mut self, _probability: f64) -> bool {
        self.fakes.pop_front().unwrap_or(false)
    }
}

pub fn new_game(rng: Scripted) -> (Game<Scripted>, ManualHost) {
    (Game::new(GameConfig::default(), rng), ManualHost::default())
}

/// Fire pending timers one at a time until the session reaches `phase`.
/// Returns false if the host runs out of timers first.
pub fn run_until_phase<R: RandomSource>(
    game: &mut Game<R>,
    host: &mut ManualHost,
    phase: reflex_cat::game::Phase,
) -> bool {
    while game.session().phase() != phase {
        match host.pop_due(f64::INFINITY) {
            Some((handle, due)) => {
                host.now = due;
                game.on_timer(handle, due, host);
            }
            None => return false,
        }
    }
    true
}

/// Wait for the next cue, then click `reaction_ms` after it appeared.
pub fn react<R: RandomSource>(game: &mut Game<R>, host: &mut ManualHost, reaction_ms: f64) {
    assert!(run_until_phase(game, host, reflex_cat::game::Phase::Cue), "no cue arrived");
    click_after(game, host, reaction_ms);
}
