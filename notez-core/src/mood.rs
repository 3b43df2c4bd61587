//! Mood detection: the count-based matcher variant.
//!
//! Unlike the note classifier, every mood counts how many of its keywords
//! appear (plain substring, emoji included). The highest count wins; equal
//! counts are broken by [`Mood::PRIORITY`]. No hits means [`Mood::Neutral`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Emotional tone detected in a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Affection.
    Love,
    /// Excitement.
    Excited,
    /// Anger.
    Angry,
    /// Happiness.
    Happy,
    /// Sadness.
    Sad,
    /// Nothing detected.
    Neutral,
}

impl Mood {
    /// Tie-break order, strongest claim first.
    pub const PRIORITY: [Mood; 5] = [Mood::Love, Mood::Excited, Mood::Angry, Mood::Happy, Mood::Sad];

    /// Trigger words for this mood.
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Love => &[
                "love", "adore", "crush", "heart", "kiss", "romance", "baby", "honey", "💕", "💖",
                "😘", "🥰",
            ],
            Self::Excited => &[
                "wow", "omg", "incredible", "amazing", "yes", "!!!", "awesome", "epic", "insane",
                "mind-blowing", "🔥", "✨", "🚀", "⚡",
            ],
            Self::Angry => &[
                "angry", "mad", "furious", "hate", "stupid", "damn", "hell", "rage", "annoying",
                "😡", "🤬", "💢",
            ],
            Self::Happy => &[
                "happy", "joy", "love", "amazing", "wonderful", "great", "awesome", "fantastic",
                "perfect", "beautiful", "😊", "❤️", "🎉", "😍", "🥰",
            ],
            Self::Sad => &[
                "sad", "cry", "hurt", "pain", "sorry", "terrible", "awful", "bad", "depressed",
                "broken", "😢", "💔", "😭",
            ],
            Self::Neutral => &[],
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Love => "love",
            Self::Excited => "excited",
            Self::Angry => "angry",
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

/// Detected mood plus how strongly it shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodReading {
    /// Winning mood.
    pub mood: Mood,
    /// 1.0 (baseline) up to 3.0.
    pub intensity: f32,
    /// Keyword hits for the winning mood.
    pub hits: usize,
}

/// Detect the dominant mood of `text`.
#[must_use]
pub fn detect_mood(text: &str) -> MoodReading {
    let lower = text.to_lowercase();

    let counts: Vec<(Mood, usize)> = Mood::PRIORITY
        .iter()
        .map(|&mood| {
            let hits = mood.keywords().iter().filter(|kw| lower.contains(*kw)).count();
            (mood, hits)
        })
        .collect();

    let max = counts.iter().map(|(_, hits)| *hits).max().unwrap_or(0);
    if max == 0 {
        return MoodReading {
            mood: Mood::Neutral,
            intensity: 1.0,
            hits: 0,
        };
    }

    // PRIORITY order, so the first mood at the max count wins ties.
    let (mood, hits) = counts
        .into_iter()
        .find(|(_, hits)| *hits == max)
        .unwrap_or((Mood::Neutral, 0));

    #[allow(clippy::cast_precision_loss)]
    let intensity = (hits as f32).mul_add(0.5, 1.0).min(3.0);
    MoodReading {
        mood,
        intensity,
        hits,
    }
}
