//! Static lookup from round outcome to the sound, haptic pattern and visual
//! tokens the front end shows. No control logic lives here.

/// The eight sound effects shipped with the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    Start,
    Cue,
    Good,
    Perfect,
    Bad,
    Fail,
    Retry,
    Result,
}

impl Sound {
    pub const ALL: [Sound; 8] = [
        Sound::Start,
        Sound::Cue,
        Sound::Good,
        Sound::Perfect,
        Sound::Bad,
        Sound::Fail,
        Sound::Retry,
        Sound::Result,
    ];

    /// Asset file stem, e.g. `start` for `start.mp3`.
    pub fn name(self) -> &'static str {
        match self {
            Sound::Start => "start",
            Sound::Cue => "cue",
            Sound::Good => "good",
            Sound::Perfect => "perfect",
            Sound::Bad => "bad",
            Sound::Fail => "fail",
            Sound::Retry => "retry",
            Sound::Result => "result",
        }
    }
}

/// Vibration request. Devices without haptics ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Haptic {
    Short,
    Triple,
}

impl Haptic {
    pub fn pattern(self) -> &'static [u32] {
        match self {
            Haptic::Short => &[30],
            Haptic::Triple => &[50, 30, 50],
        }
    }
}

/// Every situation the front end has to present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Ready,
    Start,
    Retry,
    Wait,
    Cue,
    FakeCue,
    Perfect,
    Good,
    Bad,
    TooLate,
    TooEarly,
    Trap,
    Finished,
}

/// One row of the feedback table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Effect {
    pub outcome: Outcome,
    pub sound: Option<Sound>,
    pub haptic: Option<Haptic>,
    pub background: &'static str,
    pub animation: &'static str,
    pub message: &'static str,
    pub shows_reaction: bool, // message gets " (Nms)" appended
}

const NEUTRAL_BG: &str = "bg-gray-200";
const MISS_BG: &str = "bg-red-600";
const SHAKE: &str = "animate-shake";

const fn row(
    outcome: Outcome,
    sound: Option<Sound>,
    haptic: Option<Haptic>,
    background: &'static str,
    animation: &'static str,
    message: &'static str,
) -> Effect {
    Effect { outcome, sound, haptic, background, animation, message, shows_reaction: false }
}

pub static EFFECTS: [Effect; 13] = {
    use Haptic::*;
    use Outcome as O;
    [
        row(O::Ready, None, None, NEUTRAL_BG, "", "モードを選んでね"),
        row(O::Start, Some(Sound::Start), None, NEUTRAL_BG, "", "準備…"),
        row(O::Retry, Some(Sound::Retry), None, NEUTRAL_BG, "", "準備…"),
        row(O::Wait, None, None, NEUTRAL_BG, "", "..."),
        row(O::Cue, Some(Sound::Cue), None, "bg-green-500 animate-pulse", "", "今だ！"),
        row(O::FakeCue, Some(Sound::Cue), None, "bg-yellow-600 animate-pulse", "", "押すな！"),
        Effect {
            shows_reaction: true,
            ..row(
                O::Perfect,
                Some(Sound::Perfect),
                Some(Short),
                "bg-gradient-to-r from-pink-500 via-yellow-500 to-blue-500",
                "animate-bounce text-4xl",
                "PERFECT!",
            )
        },
        Effect {
            shows_reaction: true,
            ..row(O::Good, Some(Sound::Good), Some(Short), "bg-green-400", "animate-bounce text-3xl", "Good!")
        },
        Effect {
            shows_reaction: true,
            ..row(O::Bad, Some(Sound::Bad), Some(Triple), "bg-orange-400", "text-xl", "遅い…")
        },
        row(O::TooLate, Some(Sound::Fail), Some(Triple), MISS_BG, SHAKE, "遅すぎた！"),
        row(O::TooEarly, Some(Sound::Fail), Some(Triple), MISS_BG, SHAKE, "早すぎた！"),
        row(O::Trap, Some(Sound::Fail), Some(Triple), MISS_BG, SHAKE, "罠だった！"),
        row(O::Finished, Some(Sound::Result), None, NEUTRAL_BG, "", "結果発表！"),
    ]
};

impl Outcome {
    pub fn effect(self) -> &'static Effect {
        // Table is exhaustive over Outcome; see test_table_covers_every_outcome.
        EFFECTS
            .iter()
            .find(|e| e.outcome == self)
            .unwrap_or(&EFFECTS[0])
    }
}

/// A presented outcome, optionally carrying the measured reaction time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Feedback {
    pub outcome: Outcome,
    pub reaction_ms: Option<u32>,
}

impl Feedback {
    pub fn new(outcome: Outcome) -> Self {
        Self { outcome, reaction_ms: None }
    }

    pub fn with_reaction(outcome: Outcome, reaction_ms: u32) -> Self {
        Self { outcome, reaction_ms: Some(reaction_ms) }
    }

    pub fn effect(&self) -> &'static Effect {
        self.outcome.effect()
    }

    pub fn message(&self) -> String {
        let effect = self.effect();
        match self.reaction_ms {
            Some(ms) if effect.shows_reaction => format!("{} ({}ms)", effect.message, ms),
            _ => effect.message.to_string(),
        }
    }
}
