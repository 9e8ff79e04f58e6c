pub mod backend;
pub mod error;
pub mod models;
pub mod types;

pub use backend::NewsBackend;
pub use error::{Error, Result};
pub use types::{
    validate_article_url, Article, ArticlePage, BulkReport, CheckReport, Health, LatestQuery,
    NewArticle, Stats, Summary, UNTITLED,
};

pub mod prelude {
    pub use crate::{Article, Error, NewsBackend, Result, Summary};
}
