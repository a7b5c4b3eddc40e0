//! Shapes of the rows returned by the API.
//!
//! Every property member is optional: rows are schema-optional and a missing or
//! `null` member deserializes to `None`. Accessors return `None` for absent,
//! empty, or differently typed properties.

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Row {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct PropertyValue {
    pub title: Option<Vec<RichText>>,
    pub rich_text: Option<Vec<RichText>>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub url: Option<String>,
    pub select: Option<SelectOption>,
    pub multi_select: Option<Vec<SelectOption>>,
    pub relation: Option<Vec<RelationRef>>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RichText {
    pub text: Option<TextContent>,
    pub plain_text: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TextContent {
    pub content: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RelationRef {
    pub id: String,
}

/// One page of query results.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    pub results: Vec<Row>,
    #[serde(default)]
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// Database metadata.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub title: Vec<RichText>,
}

impl Collection {
    pub fn title_text(&self) -> String {
        self.title
            .iter()
            .filter_map(|t| {
                t.plain_text
                    .as_deref()
                    .or(t.text.as_ref().map(|c| c.content.as_str()))
            })
            .collect()
    }
}

fn first_segment(segments: &Option<Vec<RichText>>) -> Option<&str> {
    segments
        .as_ref()?
        .first()?
        .text
        .as_ref()
        .map(|t| t.content.as_str())
        .filter(|s| !s.is_empty())
}

impl Row {
    fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Content of the first segment of a title property.
    pub fn title(&self, name: &str) -> Option<&str> {
        first_segment(&self.property(name)?.title)
    }

    /// Content of the first segment of a rich text property.
    pub fn rich_text(&self, name: &str) -> Option<&str> {
        first_segment(&self.property(name)?.rich_text)
    }

    pub fn email(&self, name: &str) -> Option<&str> {
        self.property(name)?
            .email
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    pub fn phone_number(&self, name: &str) -> Option<&str> {
        self.property(name)?
            .phone_number
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    pub fn url(&self, name: &str) -> Option<&str> {
        self.property(name)?.url.as_deref().filter(|s| !s.is_empty())
    }

    pub fn select(&self, name: &str) -> Option<&str> {
        self.property(name)?
            .select
            .as_ref()
            .map(|s| s.name.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn multi_select(&self, name: &str) -> Vec<String> {
        self.property(name)
            .and_then(|p| p.multi_select.as_ref())
            .map(|options| options.iter().map(|o| o.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Ids of the rows a relation property points at.
    pub fn relation_ids(&self, name: &str) -> Vec<&str> {
        self.property(name)
            .and_then(|p| p.relation.as_ref())
            .map(|refs| refs.iter().map(|r| r.id.as_str()).collect())
            .unwrap_or_default()
    }
}
