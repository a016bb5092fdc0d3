use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{EmbedRules, PageExtractor};
use crate::error::ExtractError;
use crate::kind::SoundPosition;
use crate::path::{compile_selector, normalized_text, select_inclusive, CompiledPath};
use crate::template::PracticeTemplate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeItem {
    pub word: String,
    pub audio_url: Url,
    pub position: SoundPosition,
}

#[derive(Debug, Clone)]
pub(super) struct PracticeRules {
    container: CompiledPath,
    heading: Selector,
    embed: EmbedRules,
    labels: [(String, SoundPosition); 3],
}

impl PracticeRules {
    pub(super) fn compile(t: &PracticeTemplate) -> Result<Self, ExtractError> {
        let label = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        Ok(Self {
            container: CompiledPath::compile(&t.container)?,
            heading: compile_selector(&t.heading)?,
            embed: EmbedRules::compile(&t.embed)?,
            labels: [
                (label(&t.beginning_label), SoundPosition::Beginning),
                (label(&t.middle_label), SoundPosition::Middle),
                (label(&t.end_label), SoundPosition::End),
            ],
        })
    }

    fn position(&self, heading: &str) -> Option<SoundPosition> {
        let heading = heading.to_lowercase();
        self.labels
            .iter()
            .find(|(label, _)| *label == heading)
            .map(|&(_, position)| position)
    }

    /// Last heading found in `node`, the node itself included.
    fn heading<'a>(&self, node: ElementRef<'a>) -> Option<ElementRef<'a>> {
        select_inclusive(node, &self.heading).last()
    }
}

impl PageExtractor {
    /// Walks the top-level content nodes in order, tagging every audio embed
    /// with the section heading active at that point.
    ///
    /// Embeds met before any heading, or under a heading that names no known
    /// position, are dropped.
    pub fn practice(&self, page: &str, base: &Url) -> Result<Vec<PracticeItem>, ExtractError> {
        let rules = &self.practice;
        let html = Html::parse_document(page);
        let container = rules
            .container
            .resolve(html.root_element(), "practice content")?;

        let mut section: Option<String> = None;
        let mut items = Vec::new();

        for node in container.children().filter_map(ElementRef::wrap) {
            if let Some(heading) = rules.heading(node) {
                section = Some(normalized_text(heading));
            }

            for embed in select_inclusive(node, &rules.embed.selector) {
                let Some(heading) = section.as_deref() else {
                    log::debug!("Dropping practice embed before any heading on {base}");
                    continue;
                };
                let Some(position) = rules.position(heading) else {
                    log::debug!("Dropping practice embed under `{heading}` on {base}");
                    continue;
                };
                let Some((word, audio_url)) = rules.embed.read(embed, base) else {
                    log::warn!("Skipping practice embed without word or clip: {base}");
                    continue;
                };
                items.push(PracticeItem {
                    word,
                    audio_url,
                    position,
                });
            }
        }

        Ok(items)
    }
}
