//! Extraction profiles, one per page kind.
//!
//! Every profile takes the page body as text and returns owned values, so a
//! parsed document never outlives the call.

mod index;
mod practice;
mod pronunciation;
mod spelling;

use scraper::{ElementRef, Selector};
use url::Url;

pub use index::{CategorySection, IndexRow};
pub use practice::PracticeItem;
pub use pronunciation::PronunciationMedia;
pub use spelling::SpellingItem;

use crate::error::ExtractError;
use crate::path::{attr, compile_selector, join};
use crate::template::{EmbedTemplate, PageTemplate};

/// A [`PageTemplate`] with its selectors compiled.
#[derive(Debug, Clone)]
pub struct PageExtractor {
    index: index::IndexRules,
    pronunciation: pronunciation::PronunciationRules,
    spelling: spelling::SpellingRules,
    practice: practice::PracticeRules,
}

impl PageExtractor {
    pub fn new(template: &PageTemplate) -> Result<Self, ExtractError> {
        Ok(Self {
            index: index::IndexRules::compile(&template.index)?,
            pronunciation: pronunciation::PronunciationRules::compile(&template.pronunciation)?,
            spelling: spelling::SpellingRules::compile(&template.spelling)?,
            practice: practice::PracticeRules::compile(&template.practice)?,
        })
    }
}

/// Audio embed carrying a word in one attribute and its clip in another.
#[derive(Debug, Clone)]
struct EmbedRules {
    selector: Selector,
    word_attr: String,
    url_attr: String,
}

impl EmbedRules {
    fn compile(t: &EmbedTemplate) -> Result<Self, ExtractError> {
        Ok(Self {
            selector: compile_selector(&t.selector)?,
            word_attr: t.word_attr.clone(),
            url_attr: t.url_attr.clone(),
        })
    }

    /// Word and absolute clip URL, `None` when the embed lacks either.
    fn read(&self, embed: ElementRef<'_>, base: &Url) -> Option<(String, Url)> {
        let word = attr(embed, &self.word_attr)?;
        let href = attr(embed, &self.url_attr)?;
        match join(base, href) {
            Ok(url) => Some((word.to_string(), url)),
            Err(e) => {
                log::warn!("Skipping audio embed for {word}: {e}");
                None
            }
        }
    }
}
