//! Declarative node paths.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ExtractError;

/// Locates one element: the first match of `selector` below a scope, then a
/// walk through element children by zero-based index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePath {
    pub selector: String,
    #[serde(default)]
    pub children: Vec<usize>,
}

impl NodePath {
    pub fn new(selector: impl Into<String>, children: Vec<usize>) -> Self {
        Self {
            selector: selector.into(),
            children,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledPath {
    source: NodePath,
    selector: Selector,
}

impl CompiledPath {
    pub(crate) fn compile(path: &NodePath) -> Result<Self, ExtractError> {
        Ok(Self {
            source: path.clone(),
            selector: compile_selector(&path.selector)?,
        })
    }

    pub(crate) fn resolve<'a>(
        &self,
        scope: ElementRef<'a>,
        what: &'static str,
    ) -> Result<ElementRef<'a>, ExtractError> {
        let mut node = scope.select(&self.selector).next().ok_or_else(|| {
            ExtractError::mismatch(what, format!("nothing matches `{}`", self.source.selector))
        })?;

        for (depth, &index) in self.source.children.iter().enumerate() {
            node = child_element(node, index).ok_or_else(|| {
                ExtractError::mismatch(
                    what,
                    format!(
                        "`{}` {:?} has no child #{index} at depth {depth}",
                        self.source.selector, self.source.children
                    ),
                )
            })?;
        }

        Ok(node)
    }
}

pub(crate) fn compile_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

pub(crate) fn child_element(el: ElementRef<'_>, index: usize) -> Option<ElementRef<'_>> {
    el.children().filter_map(ElementRef::wrap).nth(index)
}

/// `el` itself when it matches, followed by its matching descendants.
pub(crate) fn select_inclusive<'a, 'b>(
    el: ElementRef<'a>,
    selector: &'b Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'b
where
    'a: 'b,
{
    selector
        .matches(&el)
        .then_some(el)
        .into_iter()
        .chain(el.select(selector))
}

/// Non-blank attribute value.
pub(crate) fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name).map(str::trim).filter(|v| !v.is_empty())
}

/// Rendered text with whitespace runs collapsed.
pub(crate) fn normalized_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn fragment_text(fragment: &str) -> String {
    normalized_text(Html::parse_fragment(fragment).root_element())
}

pub(crate) fn join(base: &Url, href: &str) -> Result<Url, ExtractError> {
    base.join(href).map_err(|source| ExtractError::InvalidUrl {
        href: href.to_string(),
        source,
    })
}

/// Short markup excerpt for error messages.
pub(crate) fn excerpt(el: ElementRef<'_>) -> String {
    let html = el.html();
    match html.char_indices().nth(80) {
        Some((i, _)) => format!("{}…", &html[..i]),
        None => html,
    }
}
