//! Contact lookup: the contacts of the organization owning a token, flagged
//! with their primary-contact and conference-attendance tags.

use crate::config::Databases;
use crate::errors::VendorApiError;
use crate::lookup::{ORGANIZATION_NAME, find_organization, resolve_tag};
use crate::metrics_defs::CONTACTS_RETURNED;
use notion::{DocumentStore, Filter, Row};
use serde::Serialize;

pub const PRIMARY_CONTACT_TAG: &str = "Primary Contact";
pub const CONFERENCE_EXHIBITOR_TAG: &str = "26 Conference Exhibitor";

/// Name given to contacts without one. Such contacts are never returned.
const UNKNOWN_NAME: &str = "Unknown Name";

// Contact properties.
const NAME: &str = "Name";
const FIRST_NAME: &str = "First Name";
const WORK_EMAIL: &str = "Work Email";
const WORK_PHONE: &str = "Work Phone Number";
const ROLE_TITLE: &str = "Role/Title";
const DIETARY_RESTRICTIONS: &str = "Dietary Restrictions";
const CONTACT_TYPE: &str = "Contact Type";
const TAGS: &str = "Tags";
const NOTES: &str = "Notes";
const PERSONAL_TAG: &str = "Personal Tag";
const ORGANIZATION: &str = "Organization";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    pub id: String,
    pub name: String,
    pub first_name: String,
    pub work_email: String,
    pub work_phone: String,
    pub role_title: String,
    pub dietary_restrictions: String,
    pub contact_type: String,
    pub tags: Vec<String>,
    pub notes: String,
    pub is_attending: bool,
    pub is_primary_contact: bool,
}

/// Resolved ids of the tags contacts are classified by. `None` means the tag
/// could not be resolved and the matching flag is false for everyone.
#[derive(Clone, Debug, Default)]
pub struct ClassificationTags {
    pub primary_contact: Option<String>,
    pub conference_exhibitor: Option<String>,
}

impl ContactView {
    pub fn from_row(row: &Row, tags: &ClassificationTags) -> Self {
        let text = |value: Option<&str>| value.unwrap_or_default().to_string();
        let personal_tags = row.relation_ids(PERSONAL_TAG);
        let tagged = |tag: &Option<String>| {
            tag.as_deref()
                .is_some_and(|id| personal_tags.contains(&id))
        };

        ContactView {
            id: row.id.clone(),
            name: row.title(NAME).unwrap_or(UNKNOWN_NAME).to_string(),
            first_name: text(row.rich_text(FIRST_NAME)),
            work_email: text(row.email(WORK_EMAIL)),
            work_phone: text(row.phone_number(WORK_PHONE)),
            role_title: text(row.rich_text(ROLE_TITLE)),
            dietary_restrictions: text(row.rich_text(DIETARY_RESTRICTIONS)),
            contact_type: text(row.select(CONTACT_TYPE)),
            tags: row.multi_select(TAGS),
            notes: text(row.rich_text(NOTES)),
            is_attending: tagged(&tags.conference_exhibitor),
            is_primary_contact: tagged(&tags.primary_contact),
        }
    }

    /// Named, and reachable by email or phone.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && self.name != UNKNOWN_NAME
            && (!self.work_email.is_empty() || !self.work_phone.is_empty())
    }
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactsResponse {
    pub success: bool,
    pub organization_name: String,
    pub contacts: Vec<ContactView>,
    /// Contacts returned by the query, before filtering.
    pub total_found: usize,
    pub valid_contacts: usize,
    pub primary_contacts_found: usize,
    pub attending_contacts_found: usize,
}

impl ContactsResponse {
    pub fn new(organization_name: String, rows: &[Row], tags: &ClassificationTags) -> Self {
        let contacts: Vec<ContactView> = rows
            .iter()
            .map(|row| ContactView::from_row(row, tags))
            .filter(ContactView::is_complete)
            .collect();

        ContactsResponse {
            success: true,
            organization_name,
            total_found: rows.len(),
            valid_contacts: contacts.len(),
            primary_contacts_found: contacts.iter().filter(|c| c.is_primary_contact).count(),
            attending_contacts_found: contacts.iter().filter(|c| c.is_attending).count(),
            contacts,
        }
    }
}

pub async fn lookup_contacts(
    store: &dyn DocumentStore,
    databases: &Databases,
    token: Option<&str>,
) -> Result<ContactsResponse, VendorApiError> {
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or(VendorApiError::MissingToken)?;

    tracing::debug!(token, "Looking up organization");
    let organization = find_organization(store, databases, token).await?;
    let organization_name = organization
        .title(ORGANIZATION_NAME)
        .unwrap_or_default()
        .to_string();
    tracing::info!(organization = %organization_name, organization_id = %organization.id, "Found organization");

    let tags = ClassificationTags {
        primary_contact: resolve_tag(store, databases, PRIMARY_CONTACT_TAG).await,
        conference_exhibitor: resolve_tag(store, databases, CONFERENCE_EXHIBITOR_TAG).await,
    };

    let rows = store
        .query_rows(
            &databases.contacts,
            &Filter::relation_contains(ORGANIZATION, organization.id.as_str()),
        )
        .await
        .map_err(|source| VendorApiError::Upstream {
            step: "Contacts lookup",
            source,
        })?;

    let response = ContactsResponse::new(organization_name, &rows, &tags);

    tracing::info!(
        organization_id = %organization.id,
        total = response.total_found,
        valid = response.valid_contacts,
        primary = response.primary_contacts_found,
        attending = response.attending_contacts_found,
        "Returning contacts"
    );
    shared::histogram!(CONTACTS_RETURNED).record(response.valid_contacts as f64);

    Ok(response)
}
