//! Wikipedia access for Itihas: article intros and lead images.

mod client;
mod types;
mod util;

pub use self::client::WikipediaClient;
pub use self::types::{
    WikiContent, CONTINUATION_MARKER, DEFAULT_API_TEMPLATE, DEFAULT_SUMMARY_WORDS,
    DEFAULT_THUMBNAIL_WIDTH,
};
pub use self::util::truncate_words;
