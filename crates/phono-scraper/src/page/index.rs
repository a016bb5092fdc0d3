use scraper::{ElementRef, Html};
use url::Url;

use super::PageExtractor;
use crate::error::ExtractError;
use crate::kind::Category;
use crate::path::{attr, child_element, excerpt, join, CompiledPath};
use crate::template::{IndexTemplate, SectionOffset};

/// One sound as listed on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub name: String,
    /// Phonetic symbol with its slashes removed
    pub transcription: String,
    pub pronunciation_url: Url,
    pub spelling_url: Url,
    pub practice_url: Url,
}

#[derive(Debug)]
pub struct CategorySection {
    pub category: Category,
    /// Rows in page order, each extracted on its own
    pub rows: Vec<Result<IndexRow, ExtractError>>,
}

#[derive(Debug, Clone)]
pub(super) struct IndexRules {
    sections: CompiledPath,
    categories: Vec<SectionOffset>,
    transcription_child: usize,
    links: [usize; 3],
    link_attr: String,
}

impl IndexRules {
    pub(super) fn compile(t: &IndexTemplate) -> Result<Self, ExtractError> {
        Ok(Self {
            sections: CompiledPath::compile(&t.sections)?,
            categories: t.categories.clone(),
            transcription_child: t.transcription_child,
            links: [
                t.pronunciation_link_child,
                t.spelling_link_child,
                t.practice_link_child,
            ],
            link_attr: t.link_attr.clone(),
        })
    }

    fn row(&self, row: ElementRef<'_>, base: &Url) -> Result<IndexRow, ExtractError> {
        let name = row
            .children()
            .filter_map(|node| node.value().as_text())
            .map(|text| text.trim())
            .find(|text| !text.is_empty())
            .ok_or_else(|| ExtractError::mismatch("sound name", excerpt(row)))?
            .to_string();

        let symbol = child_element(row, self.transcription_child).ok_or_else(|| {
            ExtractError::mismatch(
                "transcription",
                format!("no child #{} in {}", self.transcription_child, excerpt(row)),
            )
        })?;
        let raw = match symbol.first_child() {
            Some(node) => match node.value().as_text() {
                Some(text) => text.to_string(),
                None => ElementRef::wrap(node)
                    .map(|el| el.text().collect())
                    .unwrap_or_default(),
            },
            None => String::new(),
        };
        let transcription = raw.replace('/', "").trim().to_string();
        if transcription.is_empty() {
            return Err(ExtractError::mismatch("transcription", excerpt(row)));
        }

        let [pronunciation, spelling, practice] = self.links;
        Ok(IndexRow {
            name,
            transcription,
            pronunciation_url: self.link(row, pronunciation, "pronunciation link", base)?,
            spelling_url: self.link(row, spelling, "spelling link", base)?,
            practice_url: self.link(row, practice, "practice link", base)?,
        })
    }

    fn link(
        &self,
        row: ElementRef<'_>,
        child: usize,
        what: &'static str,
        base: &Url,
    ) -> Result<Url, ExtractError> {
        let href = child_element(row, child)
            .and_then(|el| attr(el, &self.link_attr))
            .ok_or_else(|| {
                ExtractError::mismatch(
                    what,
                    format!("no `{}` on child #{child} of {}", self.link_attr, excerpt(row)),
                )
            })?;
        join(base, href)
    }
}

impl PageExtractor {
    /// Locates the category sections of the index page.
    ///
    /// Failing to find a section is an error for the whole page, while each
    /// row carries its own result.
    pub fn index(&self, page: &str, base: &Url) -> Result<Vec<CategorySection>, ExtractError> {
        let rules = &self.index;
        let html = Html::parse_document(page);
        let container = rules
            .sections
            .resolve(html.root_element(), "category sections")?;

        rules
            .categories
            .iter()
            .map(|offset| {
                let section = child_element(container, offset.child).ok_or_else(|| {
                    ExtractError::mismatch(
                        "category section",
                        format!("no child #{} for {}", offset.child, offset.category),
                    )
                })?;
                let rows = section
                    .children()
                    .filter_map(ElementRef::wrap)
                    .map(|row| rules.row(row, base))
                    .collect();
                Ok(CategorySection {
                    category: offset.category,
                    rows,
                })
            })
            .collect()
    }
}
