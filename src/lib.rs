pub mod cache;
pub mod common;
pub mod environment;
pub mod explorer;
pub mod http;
pub mod logging;
pub mod lookup;
pub mod registry;
pub mod wikidata;
pub mod wikipedia;

pub use common::{EntityId, LanguageCode};
pub use explorer::{Dashboard, Explorer, FeaturedPanel, Selection, Timeline};
pub use lookup::{EmptyReason, Lookup};

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_CACHE: &str = "result_cache";
