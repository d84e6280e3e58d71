pub mod fields;
pub mod model;
pub mod store;

pub use fields::DecodedFields;
pub use model::{AnimeRecord, AttributeTable, Database};
pub use store::{CatalogLink, FailedLink, load_database, load_links, write_json};
