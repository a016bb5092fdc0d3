use scraper::{Html, Selector};
use url::Url;

use super::PageExtractor;
use crate::error::ExtractError;
use crate::path::{attr, compile_selector, join};
use crate::template::PronunciationTemplate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PronunciationMedia {
    pub image_url: Url,
    pub audio_url: Url,
}

#[derive(Debug, Clone)]
pub(super) struct PronunciationRules {
    image: Selector,
    image_attr: String,
    audio: Selector,
    audio_attr: String,
}

impl PronunciationRules {
    pub(super) fn compile(t: &PronunciationTemplate) -> Result<Self, ExtractError> {
        Ok(Self {
            image: compile_selector(&t.image)?,
            image_attr: t.image_attr.clone(),
            audio: compile_selector(&t.audio)?,
            audio_attr: t.audio_attr.clone(),
        })
    }
}

fn first_attr<'a>(
    html: &'a Html,
    selector: &Selector,
    name: &str,
    what: &'static str,
) -> Result<&'a str, ExtractError> {
    html.select(selector)
        .find_map(|el| attr(el, name))
        .ok_or_else(|| ExtractError::mismatch(what, format!("no element with `{name}`")))
}

impl PageExtractor {
    /// Still image and audio clip illustrating the sound itself.
    pub fn pronunciation(
        &self,
        page: &str,
        base: &Url,
    ) -> Result<PronunciationMedia, ExtractError> {
        let rules = &self.pronunciation;
        let html = Html::parse_document(page);

        let image = first_attr(&html, &rules.image, &rules.image_attr, "pronunciation image")?;
        let audio = first_attr(&html, &rules.audio, &rules.audio_attr, "pronunciation audio")?;

        Ok(PronunciationMedia {
            image_url: join(base, image)?,
            audio_url: join(base, audio)?,
        })
    }
}
