use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{EmbedRules, PageExtractor};
use crate::error::ExtractError;
use crate::path::{compile_selector, fragment_text, select_inclusive, CompiledPath};
use crate::template::SpellingTemplate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellingItem {
    pub word: String,
    pub audio_url: Url,
    /// Markup of the matching transcription snippet, empty when none matched
    pub transcription: String,
}

#[derive(Debug, Clone)]
pub(super) struct SpellingRules {
    scope: CompiledPath,
    transcription_blocks: Selector,
    transcription_paragraphs: Selector,
    transcription_prefix: usize,
    audio_blocks: Selector,
    embed: EmbedRules,
}

/// Transcription snippet as markup and as rendered text.
struct Candidate {
    html: String,
    text: String,
}

impl SpellingRules {
    pub(super) fn compile(t: &SpellingTemplate) -> Result<Self, ExtractError> {
        Ok(Self {
            scope: CompiledPath::compile(&t.scope)?,
            transcription_blocks: compile_selector(&t.transcription_blocks)?,
            transcription_paragraphs: compile_selector(&t.transcription_paragraphs)?,
            transcription_prefix: t.transcription_prefix,
            audio_blocks: compile_selector(&t.audio_blocks)?,
            embed: EmbedRules::compile(&t.embed)?,
        })
    }

    fn candidate(&self, block: ElementRef<'_>) -> Option<Candidate> {
        let paragraph = block.select(&self.transcription_paragraphs).last()?;
        let html = paragraph
            .inner_html()
            .replace("&nbsp;", " ")
            .replace('\u{a0}', " ");
        if html.chars().count() <= self.transcription_prefix {
            return None;
        }

        let html = html.chars().skip(self.transcription_prefix).collect::<String>();
        let text = fragment_text(&html);
        Some(Candidate { html, text })
    }
}

impl PageExtractor {
    /// Example words of the spelling page, each with the first transcription
    /// snippet whose text mentions it.
    pub fn spelling(&self, page: &str, base: &Url) -> Result<Vec<SpellingItem>, ExtractError> {
        let rules = &self.spelling;
        let html = Html::parse_document(page);
        let scope = rules.scope.resolve(html.root_element(), "spelling content")?;

        let candidates = scope
            .select(&rules.transcription_blocks)
            .filter_map(|block| rules.candidate(block))
            .collect::<Vec<_>>();

        let mut items = Vec::new();
        for block in scope.select(&rules.audio_blocks) {
            let embed = select_inclusive(block, &rules.embed.selector)
                .find_map(|embed| rules.embed.read(embed, base));
            let Some((word, audio_url)) = embed else {
                log::warn!("Skipping spelling audio block without word or clip: {base}");
                continue;
            };

            let transcription = candidates
                .iter()
                .find(|c| c.text.contains(&word))
                .map(|c| c.html.clone())
                .unwrap_or_default();
            if transcription.is_empty() {
                log::debug!("No transcription found for {word} on {base}");
            }

            items.push(SpellingItem {
                word,
                audio_url,
                transcription,
            });
        }

        Ok(items)
    }
}
