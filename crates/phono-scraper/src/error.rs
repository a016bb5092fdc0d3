use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// An expected node or attribute is absent: the page template drifted or
    /// an offset assumption is wrong.
    #[error("structure mismatch on {what}: {detail}")]
    StructureMismatch { what: &'static str, detail: String },

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid link `{href}`: {source}")]
    InvalidUrl {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

impl ExtractError {
    pub(crate) fn mismatch(what: &'static str, detail: impl Into<String>) -> Self {
        Self::StructureMismatch {
            what,
            detail: detail.into(),
        }
    }

    pub fn is_structure_mismatch(&self) -> bool {
        matches!(self, Self::StructureMismatch { .. })
    }
}
