//! Page layout of the pronunciation site, as data.
//!
//! Every selector, child offset and attribute name the extractors rely on is
//! listed here. `Default` describes the live site, and any part of it can be
//! overridden from a configuration file when the markup changes.

use serde::{Deserialize, Serialize};

use crate::kind::Category;
use crate::path::NodePath;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageTemplate {
    pub index: IndexTemplate,
    pub pronunciation: PronunciationTemplate,
    pub spelling: SpellingTemplate,
    pub practice: PracticeTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexTemplate {
    /// Element whose children are the category sections
    pub sections: NodePath,
    pub categories: Vec<SectionOffset>,
    /// Row child holding the `/symbol/` text
    pub transcription_child: usize,
    pub pronunciation_link_child: usize,
    pub spelling_link_child: usize,
    pub practice_link_child: usize,
    pub link_attr: String,
}

impl Default for IndexTemplate {
    fn default() -> Self {
        Self {
            sections: NodePath::new(
                ".main-content .sqs-block.html-block .sqs-block-content",
                vec![0],
            ),
            categories: vec![
                SectionOffset::new(Category::Vowel, 3),
                SectionOffset::new(Category::RControlledVowel, 5),
                SectionOffset::new(Category::Consonant, 7),
            ],
            transcription_child: 0,
            pronunciation_link_child: 1,
            spelling_link_child: 2,
            practice_link_child: 3,
            link_attr: "href".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOffset {
    pub category: Category,
    pub child: usize,
}

impl SectionOffset {
    pub fn new(category: Category, child: usize) -> Self {
        Self { category, child }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PronunciationTemplate {
    pub image: String,
    pub image_attr: String,
    pub audio: String,
    pub audio_attr: String,
}

impl Default for PronunciationTemplate {
    fn default() -> Self {
        Self {
            image: "img[src$='.gif']".into(),
            image_attr: "src".into(),
            audio: "div.sqs-audio-embed".into(),
            audio_attr: "data-url".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedTemplate {
    pub selector: String,
    pub word_attr: String,
    pub url_attr: String,
}

impl Default for EmbedTemplate {
    fn default() -> Self {
        Self {
            selector: "div.sqs-audio-embed".into(),
            word_attr: "data-title".into(),
            url_attr: "data-url".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpellingTemplate {
    pub scope: NodePath,
    pub transcription_blocks: String,
    pub transcription_paragraphs: String,
    /// Characters of label in front of each transcription snippet
    pub transcription_prefix: usize,
    pub audio_blocks: String,
    pub embed: EmbedTemplate,
}

impl Default for SpellingTemplate {
    fn default() -> Self {
        Self {
            scope: NodePath::new("div.main-content", Vec::new()),
            transcription_blocks: "[data-block-type='2']".into(),
            transcription_paragraphs: "div.sqs-block-content p".into(),
            transcription_prefix: 3,
            audio_blocks: "[data-block-type='41']".into(),
            embed: EmbedTemplate::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PracticeTemplate {
    /// Element whose children are walked in order
    pub container: NodePath,
    pub heading: String,
    pub embed: EmbedTemplate,
    pub beginning_label: String,
    pub middle_label: String,
    pub end_label: String,
}

impl Default for PracticeTemplate {
    fn default() -> Self {
        Self {
            container: NodePath::new("div.main-content", vec![0, 0, 0]),
            heading: "h2".into(),
            embed: EmbedTemplate::default(),
            beginning_label: "Beginning sound".into(),
            middle_label: "Middle Sound".into(),
            end_label: "End Sound".into(),
        }
    }
}
