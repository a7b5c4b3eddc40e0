//! Lookups shared by both handlers: organizations by token and tags by name.

use crate::config::Databases;
use crate::errors::VendorApiError;
use crate::metrics_defs::TAG_LOOKUP_MISS;
use notion::{DocumentStore, Filter, Row};

/// Organization properties.
pub const ORGANIZATION_NAME: &str = "Organization";
pub const ORGANIZATION_TOKEN: &str = "Token";

const TAG_NAME: &str = "Name";

/// Finds the organization whose token equals `token` exactly.
/// Several matches are not an error; the first row wins.
pub async fn find_organization(
    store: &dyn DocumentStore,
    databases: &Databases,
    token: &str,
) -> Result<Row, VendorApiError> {
    let rows = store
        .query_rows(
            &databases.organizations,
            &Filter::rich_text_equals(ORGANIZATION_TOKEN, token),
        )
        .await
        .map_err(|source| VendorApiError::Upstream {
            step: "Organization lookup",
            source,
        })?;

    if rows.len() > 1 {
        tracing::warn!(matches = rows.len(), "Token matches several organizations, using the first");
    }

    rows.into_iter()
        .next()
        .ok_or(VendorApiError::OrganizationNotFound)
}

/// Resolves a tag's id by its display name. Failures are logged and yield `None`.
pub async fn resolve_tag(
    store: &dyn DocumentStore,
    databases: &Databases,
    name: &'static str,
) -> Option<String> {
    let result = store
        .query_rows(&databases.tag_system, &Filter::title_equals(TAG_NAME, name))
        .await;

    match result.map(|rows| rows.into_iter().next()) {
        Ok(Some(row)) => {
            tracing::debug!(tag = name, tag_id = %row.id, "Resolved tag");
            Some(row.id)
        }
        Ok(None) => {
            tracing::warn!(tag = name, "Tag not found");
            shared::counter!(TAG_LOOKUP_MISS, "tag" => name).increment(1);
            None
        }
        Err(e) => {
            tracing::warn!(tag = name, error = %e, "Tag lookup failed");
            shared::counter!(TAG_LOOKUP_MISS, "tag" => name).increment(1);
            None
        }
    }
}
