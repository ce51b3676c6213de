// Reaction judgement, per-round awards and final rank.
// Thresholds are fixed constants and are not part of GameConfig.

/// Upper bound (inclusive) for a PERFECT reaction, in ms.
pub const PERFECT_THRESHOLD_MS: u32 = 30;
/// Upper bound (inclusive) for a Good reaction, in ms.
pub const GOOD_THRESHOLD_MS: u32 = 100;
/// Slowest reaction that still counts as a hit; anything above is a miss.
pub const MAX_REACTION_MS: u32 = 600;

pub const PERFECT_AWARD: u32 = 200;
pub const GOOD_AWARD: u32 = 100;

/// Classification of a single reaction to a real cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Judgement {
    Perfect,
    Good,
    Bad,
    Fail, // too slow, counts as a miss
}

impl Judgement {
    pub fn classify(reaction_ms: u32) -> Self {
        if reaction_ms <= PERFECT_THRESHOLD_MS {
            Judgement::Perfect
        } else if reaction_ms <= GOOD_THRESHOLD_MS {
            Judgement::Good
        } else if reaction_ms <= MAX_REACTION_MS {
            Judgement::Bad
        } else {
            Judgement::Fail
        }
    }

    pub fn award(self) -> u32 {
        match self {
            Judgement::Perfect => PERFECT_AWARD,
            Judgement::Good => GOOD_AWARD,
            Judgement::Bad | Judgement::Fail => 0,
        }
    }

    pub fn is_miss(self) -> bool {
        matches!(self, Judgement::Fail)
    }
}

/// Whole milliseconds between cue onset and the click. Clock skew never yields
/// a negative reaction.
pub fn reaction_ms(cue_started_at: f64, now: f64) -> u32 {
    let elapsed = (now - cue_started_at).max(0.0);
    if elapsed >= u32::MAX as f64 {
        u32::MAX
    } else {
        elapsed as u32
    }
}

/// Letter grade for a finished session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rank {
    S,
    A,
    B,
    C,
    D,
}

impl Rank {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 1600 => Rank::S,
            s if s >= 1200 => Rank::A,
            s if s >= 800 => Rank::B,
            s if s >= 400 => Rank::C,
            _ => Rank::D,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::D => "D",
        }
    }

    /// Label shown on the result panel and in share text.
    pub fn label(self) -> &'static str {
        match self {
            Rank::S => "Sランク 🏆",
            Rank::A => "Aランク 🎯",
            Rank::B => "Bランク 👍",
            Rank::C => "Cランク 😅",
            Rank::D => "Dランク 🐢",
        }
    }
}
