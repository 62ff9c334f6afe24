//! Diatonic pitch representation
//!
//! A pitch is spelled the way MusicXML spells it: a step letter, an optional
//! chromatic alteration in semitones, and an octave number where C4 is middle C.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diatonic step letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    /// Semitones above C within one octave
    pub fn semitone(self) -> i32 {
        match self {
            Step::C => 0,
            Step::D => 2,
            Step::E => 4,
            Step::F => 5,
            Step::G => 7,
            Step::A => 9,
            Step::B => 11,
        }
    }

    /// Parse a step letter ("C", "d", ...)
    pub fn from_letter(s: &str) -> Option<Step> {
        match s {
            "C" | "c" => Some(Step::C),
            "D" | "d" => Some(Step::D),
            "E" | "e" => Some(Step::E),
            "F" | "f" => Some(Step::F),
            "G" | "g" => Some(Step::G),
            "A" | "a" => Some(Step::A),
            "B" | "b" => Some(Step::B),
            _ => None,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Step::C => "C",
            Step::D => "D",
            Step::E => "E",
            Step::F => "F",
            Step::G => "G",
            Step::A => "A",
            Step::B => "B",
        }
    }
}

/// Pitch as written in the score tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    pub step: Step,

    /// Semitone alteration (-1 = flat, 1 = sharp). Absent means natural.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alter: Option<i8>,

    /// Octave number (C4 = middle C)
    pub octave: i8,
}

impl Pitch {
    pub fn new(step: Step, alter: Option<i8>, octave: i8) -> Self {
        Self { step, alter, octave }
    }

    /// Natural pitch with no alteration
    pub fn natural(step: Step, octave: i8) -> Self {
        Self::new(step, None, octave)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accidental = match self.alter.unwrap_or(0) {
            2 => "##",
            1 => "#",
            -1 => "b",
            -2 => "bb",
            _ => "",
        };
        write!(f, "{}{}{}", self.step.letter(), accidental, self.octave)
    }
}
