//! Client for the Notion database API.
//!
//! Handlers talk to the [`DocumentStore`] trait; [`NotionClient`] is the HTTP
//! implementation used in production.

mod client;
pub mod errors;
pub mod filter;
pub mod metrics_defs;
pub mod patch;
pub mod schema;

pub use client::{DEFAULT_API_URL, DEFAULT_NOTION_VERSION, DocumentStore, NotionClient};
pub use errors::StoreError;
pub use filter::{Condition, Filter};
pub use patch::{PropertyPatch, PropertyPatches};
pub use schema::{Collection, Row};
