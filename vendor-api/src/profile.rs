//! Vendor profile submission: writes the submitted form straight onto the
//! organization row as a sparse patch.

use crate::config::Databases;
use crate::errors::VendorApiError;
use crate::lookup::{ORGANIZATION_NAME, find_organization};
use crate::metrics_defs::PROFILE_FIELDS_UPDATED;
use notion::{DocumentStore, PropertyPatch, PropertyPatches};
use serde::{Deserialize, Serialize};

pub const SUCCESS_MESSAGE: &str = "Vendor profile updated successfully!";

// Organization properties written by the form.
const WEBSITE: &str = "Website";
const CATEGORY: &str = "Category";
const DESCRIPTION: &str = "Description";
const HIGHLIGHT_HEADLINE: &str = "Highlight Headline";
const HIGHLIGHT_DESCRIPTION: &str = "Highlight Description";
const HIGHLIGHT_DEAL: &str = "Highlight Deal";
const HIGHLIGHT_IMAGE_URL: &str = "Highlight Image URL";
const CATALOGUE_URL: &str = "Catalogue URL";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSubmission {
    pub token: Option<String>,
    pub form_state: Option<FormState>,
    pub catalogue_state: Option<CatalogueState>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub highlight_headline: Option<String>,
    pub highlight_description: Option<String>,
    pub highlight_deal: Option<String>,
    pub highlight_image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueState {
    pub uploaded_url: Option<String>,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub organization_id: String,
    pub message: &'static str,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Builds the properties to set. Absent or empty fields are left out, so the
/// patch never clears a property the form did not fill in.
pub fn build_patches(form: &FormState, catalogue: &CatalogueState) -> PropertyPatches {
    // The highlight image is stored as text, not as a url or file property.
    let fields: [(&str, &Option<String>, fn(&str) -> PropertyPatch); 9] = [
        (ORGANIZATION_NAME, &form.company_name, |v| PropertyPatch::title(v)),
        (WEBSITE, &form.website, |v| PropertyPatch::url(v)),
        (CATEGORY, &form.category, |v| PropertyPatch::select(v)),
        (DESCRIPTION, &form.description, |v| PropertyPatch::rich_text(v)),
        (HIGHLIGHT_HEADLINE, &form.highlight_headline, |v| PropertyPatch::rich_text(v)),
        (HIGHLIGHT_DESCRIPTION, &form.highlight_description, |v| PropertyPatch::rich_text(v)),
        (HIGHLIGHT_DEAL, &form.highlight_deal, |v| PropertyPatch::rich_text(v)),
        (HIGHLIGHT_IMAGE_URL, &form.highlight_image_url, |v| PropertyPatch::rich_text(v)),
        (CATALOGUE_URL, &catalogue.uploaded_url, |v| PropertyPatch::url(v)),
    ];

    fields
        .into_iter()
        .filter_map(|(property, value, to_patch)| {
            present(value).map(|v| (property.to_string(), to_patch(v)))
        })
        .collect()
}

pub async fn submit_profile(
    store: &dyn DocumentStore,
    databases: &Databases,
    submission: ProfileSubmission,
) -> Result<SubmitResponse, VendorApiError> {
    let token = present(&submission.token).ok_or(VendorApiError::MissingToken)?;

    tracing::debug!(token, "Looking up organization for profile submission");
    let organization = find_organization(store, databases, token).await?;

    let patches = build_patches(
        &submission.form_state.unwrap_or_default(),
        &submission.catalogue_state.unwrap_or_default(),
    );
    tracing::info!(
        organization_id = %organization.id,
        properties = ?patches.keys().collect::<Vec<_>>(),
        "Updating vendor profile"
    );

    let updated = store
        .patch_row(&organization.id, &patches)
        .await
        .map_err(|source| VendorApiError::Upstream {
            step: "Profile update",
            source,
        })?;

    shared::histogram!(PROFILE_FIELDS_UPDATED).record(patches.len() as f64);

    Ok(SubmitResponse {
        success: true,
        organization_id: updated.id,
        message: SUCCESS_MESSAGE,
    })
}
