use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::model::SoundEntry;

/// Writes the sound list as one pretty printed JSON document.
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    path: PathBuf,
}

impl ManifestWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The document lands under a temporary name first, so an existing
    /// manifest is only ever replaced by a complete one.
    pub fn write(&self, entries: &[SoundEntry]) -> Result<(), Error> {
        let json = serde_json::to_vec_pretty(entries)?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let part = self.path.with_file_name(format!(".{file_name}.part"));

        fs::write(&part, json).map_err(|e| Error::io(&part, e))?;
        if let Err(e) = fs::rename(&part, &self.path) {
            fs::remove_file(&part).ok();
            return Err(Error::io(&self.path, e));
        }

        log::info!(
            "Wrote {} sounds to {}",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use phono_scraper::Category;

    use super::*;
    use crate::model::{SoundPracticeWords, SpellingWord};

    fn entry(transcription: &str, category: Category) -> SoundEntry {
        SoundEntry {
            transcription: transcription.into(),
            name: format!("as in {transcription}"),
            description: String::new(),
            photo_path: String::new(),
            audio_path: format!("AmericanSounds/result/{category}/{transcription}/{transcription}.mp3"),
            category,
            spelling_words: vec![SpellingWord {
                name: "day".into(),
                audio_path: String::new(),
                transcription: "<em>d</em>eɪ".into(),
                sound: transcription.into(),
            }],
            practice_words: SoundPracticeWords::default(),
        }
    }

    #[test]
    fn writes_ordered_entries() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ManifestWriter::new(dir.path().join("manifest.json"));
        let entries = vec![entry("eɪ", Category::Vowel), entry("p", Category::Consonant)];

        writer.write(&entries).unwrap();

        let content = fs::read_to_string(writer.path()).unwrap();
        let read: Vec<SoundEntry> = serde_json::from_str(&content).unwrap();
        assert_eq!(entries, read);
        assert!(content.contains("\n  {"), "not pretty printed");
        assert_eq!(1, fs::read_dir(dir.path()).unwrap().count());
    }

    #[test]
    fn replaces_previous_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ManifestWriter::new(dir.path().join("manifest.json"));

        writer.write(&[entry("eɪ", Category::Vowel)]).unwrap();
        writer.write(&[]).unwrap();

        assert_eq!("[]", fs::read_to_string(writer.path()).unwrap());
    }
}
