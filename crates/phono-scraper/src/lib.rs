mod error;
mod kind;
mod page;
mod path;
mod template;

pub use error::ExtractError;
pub use kind::{Category, SoundPosition};
pub use page::{
    CategorySection, IndexRow, PageExtractor, PracticeItem, PronunciationMedia, SpellingItem,
};
pub use path::NodePath;
pub use template::{
    EmbedTemplate, IndexTemplate, PageTemplate, PracticeTemplate, PronunciationTemplate,
    SectionOffset, SpellingTemplate,
};

pub use url::Url;
