pub mod article;
pub mod bookmark;
pub mod interaction;
pub mod protocol;

pub use article::{AnnotatedArticle, Article, ArticleMetadata, article_id_for_url};
pub use bookmark::Bookmark;
pub use interaction::InteractionKind;
