use std::fmt;

use serde::{Deserialize, Serialize};

/// Family a sound is listed under on the index page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Vowel,
    RControlledVowel,
    Consonant,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vowel => "vowel",
            Self::RControlledVowel => "r-controlled-vowel",
            Self::Consonant => "consonant",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the sound occurs in a practice word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundPosition {
    Beginning,
    Middle,
    End,
}

impl SoundPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginning => "beginning",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

impl fmt::Display for SoundPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
