//! Entity actions executed by external task handlers for submissions.

mod publish_article;

pub use publish_article::{PUBLISH_ARTICLE_COMPONENT, PUBLISH_ARTICLE_TOPIC, PublishArticleAction};
