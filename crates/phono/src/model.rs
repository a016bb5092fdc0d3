use phono_scraper::{Category, SoundPosition};
use serde::{Deserialize, Serialize};

/// One sound of the manifest, with everything the app shows for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundEntry {
    /// Phonetic symbol without slashes, unique within a run
    pub transcription: String,
    pub name: String,
    pub description: String,
    pub photo_path: String,
    pub audio_path: String,
    pub category: Category,
    pub spelling_words: Vec<SpellingWord>,
    pub practice_words: SoundPracticeWords,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellingWord {
    pub name: String,
    pub audio_path: String,
    /// HTML snippet showing how the word is transcribed
    pub transcription: String,
    /// Transcription of the owning sound
    pub sound: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeWord {
    pub name: String,
    pub audio_path: String,
    pub position: SoundPosition,
    pub sound: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundPracticeWords {
    pub beginning: Vec<PracticeWord>,
    pub middle: Vec<PracticeWord>,
    pub end: Vec<PracticeWord>,
}

impl SoundPracticeWords {
    pub fn push(&mut self, word: PracticeWord) {
        match word.position {
            SoundPosition::Beginning => self.beginning.push(word),
            SoundPosition::Middle => self.middle.push(word),
            SoundPosition::End => self.end.push(word),
        }
    }

    pub fn len(&self) -> usize {
        self.beginning.len() + self.middle.len() + self.end.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<PracticeWord> for SoundPracticeWords {
    fn from_iter<I: IntoIterator<Item = PracticeWord>>(iter: I) -> Self {
        let mut words = Self::default();
        iter.into_iter().for_each(|w| words.push(w));
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(name: &str, position: SoundPosition) -> PracticeWord {
        PracticeWord {
            name: name.into(),
            audio_path: String::new(),
            position,
            sound: "eɪ".into(),
        }
    }

    #[test]
    fn practice_words_are_grouped_by_position() {
        let words = [
            word("ape", SoundPosition::Beginning),
            word("day", SoundPosition::End),
            word("aim", SoundPosition::Beginning),
        ]
        .into_iter()
        .collect::<SoundPracticeWords>();

        assert_eq!(3, words.len());
        assert_eq!(
            vec!["ape", "aim"],
            words.beginning.iter().map(|w| w.name.as_str()).collect::<Vec<_>>()
        );
        assert!(words.middle.is_empty());
        assert_eq!("day", words.end[0].name);
    }

    #[test]
    fn manifest_fields_are_camel_case() {
        let entry = SoundEntry {
            transcription: "eɪ".into(),
            name: "as in day".into(),
            description: String::new(),
            photo_path: "AmericanSounds/result/vowel/eɪ/eɪ.gif".into(),
            audio_path: String::new(),
            category: Category::RControlledVowel,
            spelling_words: vec![],
            practice_words: [word("ape", SoundPosition::Beginning)].into_iter().collect(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!("r-controlled-vowel", json["category"]);
        assert_eq!("AmericanSounds/result/vowel/eɪ/eɪ.gif", json["photoPath"]);
        assert_eq!("", json["audioPath"]);
        assert_eq!("beginning", json["practiceWords"]["beginning"][0]["position"]);
        assert_eq!("eɪ", json["practiceWords"]["beginning"][0]["sound"]);
        assert!(json["spellingWords"].as_array().unwrap().is_empty());
    }
}
