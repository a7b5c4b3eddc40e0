use serde::Serialize;

/// A single-property query filter, serialized as e.g.
/// `{"property": "Token", "rich_text": {"equals": "abc"}}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Filter {
    pub property: String,
    #[serde(flatten)]
    pub condition: Condition,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Title(TextCondition),
    RichText(TextCondition),
    Relation(RelationCondition),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextCondition {
    Equals(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationCondition {
    Contains(String),
}

impl Filter {
    pub fn title_equals(property: impl Into<String>, value: impl Into<String>) -> Self {
        Filter {
            property: property.into(),
            condition: Condition::Title(TextCondition::Equals(value.into())),
        }
    }

    pub fn rich_text_equals(property: impl Into<String>, value: impl Into<String>) -> Self {
        Filter {
            property: property.into(),
            condition: Condition::RichText(TextCondition::Equals(value.into())),
        }
    }

    pub fn relation_contains(property: impl Into<String>, row_id: impl Into<String>) -> Self {
        Filter {
            property: property.into(),
            condition: Condition::Relation(RelationCondition::Contains(row_id.into())),
        }
    }
}
