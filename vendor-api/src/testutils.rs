use crate::config::Databases;
use async_trait::async_trait;
use hyper::StatusCode;
use notion::filter::{RelationCondition, TextCondition};
use notion::{Collection, Condition, DocumentStore, Filter, PropertyPatches, Row, StoreError};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub fn test_databases() -> Databases {
    Databases {
        organizations: "orgs_db".into(),
        contacts: "contacts_db".into(),
        tag_system: "tags_db".into(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Query { database_id: String, filter: Filter },
    Patch { row_id: String, properties: PropertyPatches },
    GetCollection { database_id: String },
}

/// In-memory store that evaluates filters against canned rows and records every call.
#[derive(Default)]
pub struct MockStore {
    rows: HashMap<String, Vec<Row>>,
    failing_databases: HashSet<String>,
    patch_error: Option<(StatusCode, String)>,
    calls: Mutex<Vec<Call>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, database_id: &str, rows: Vec<Row>) -> Self {
        self.rows.insert(database_id.to_string(), rows);
        self
    }

    /// Queries against this database fail with a 500.
    pub fn with_failing_database(mut self, database_id: &str) -> Self {
        self.failing_databases.insert(database_id.to_string());
        self
    }

    pub fn with_patch_error(mut self, status: StatusCode, message: &str) -> Self {
        self.patch_error = Some((status, message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn matches(row: &Row, filter: &Filter) -> bool {
    let property = filter.property.as_str();
    match &filter.condition {
        Condition::Title(TextCondition::Equals(value)) => {
            row.title(property) == Some(value.as_str())
        }
        Condition::RichText(TextCondition::Equals(value)) => {
            row.rich_text(property) == Some(value.as_str())
        }
        Condition::Relation(RelationCondition::Contains(id)) => {
            row.relation_ids(property).contains(&id.as_str())
        }
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn query_rows(&self, database_id: &str, filter: &Filter) -> Result<Vec<Row>, StoreError> {
        self.record(Call::Query {
            database_id: database_id.to_string(),
            filter: filter.clone(),
        });

        if self.failing_databases.contains(database_id) {
            return Err(StoreError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Internal Server Error".into(),
            });
        }

        Ok(self
            .rows
            .get(database_id)
            .map(|rows| rows.iter().filter(|r| matches(r, filter)).cloned().collect())
            .unwrap_or_default())
    }

    async fn patch_row(
        &self,
        row_id: &str,
        properties: &PropertyPatches,
    ) -> Result<Row, StoreError> {
        self.record(Call::Patch {
            row_id: row_id.to_string(),
            properties: properties.clone(),
        });

        match &self.patch_error {
            Some((status, message)) => Err(StoreError::Status {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(Row {
                id: row_id.to_string(),
                ..Default::default()
            }),
        }
    }

    async fn get_collection(&self, database_id: &str) -> Result<Collection, StoreError> {
        self.record(Call::GetCollection {
            database_id: database_id.to_string(),
        });

        Ok(Collection {
            id: database_id.to_string(),
            title: Vec::new(),
        })
    }
}

pub fn row(id: &str, properties: Value) -> Row {
    serde_json::from_value(json!({"object": "page", "id": id, "properties": properties}))
        .unwrap()
}

pub fn text(content: &str) -> Value {
    json!([{"type": "text", "text": {"content": content}, "plain_text": content}])
}

pub fn organization_row(id: &str, name: &str, token: &str) -> Row {
    row(
        id,
        json!({
            "Organization": {"type": "title", "title": text(name)},
            "Token": {"type": "rich_text", "rich_text": text(token)},
        }),
    )
}

pub fn tag_row(id: &str, name: &str) -> Row {
    row(id, json!({"Name": {"type": "title", "title": text(name)}}))
}

/// A contact row. Empty strings leave the property out.
pub fn contact_row(
    id: &str,
    organization_id: &str,
    name: &str,
    email: &str,
    phone: &str,
    tag_ids: &[&str],
) -> Row {
    let mut properties = json!({
        "Organization": {"type": "relation", "relation": [{"id": organization_id}]},
        "Personal Tag": {
            "type": "relation",
            "relation": tag_ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>(),
        },
    });
    if !name.is_empty() {
        properties["Name"] = json!({"type": "title", "title": text(name)});
    }
    if !email.is_empty() {
        properties["Work Email"] = json!({"type": "email", "email": email});
    }
    if !phone.is_empty() {
        properties["Work Phone Number"] = json!({"type": "phone_number", "phone_number": phone});
    }
    row(id, properties)
}
