//! Sparse property updates for `PATCH /pages/{id}`.

use indexmap::IndexMap;
use serde::Serialize;

/// Property name to new value. Properties not present are left untouched.
pub type PropertyPatches = IndexMap<String, PropertyPatch>;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyPatch {
    Title(Vec<TextInput>),
    RichText(Vec<TextInput>),
    Url(String),
    Select(SelectInput),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextInput {
    pub text: TextInputContent,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextInputContent {
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectInput {
    pub name: String,
}

fn single_segment(content: impl Into<String>) -> Vec<TextInput> {
    vec![TextInput {
        text: TextInputContent {
            content: content.into(),
        },
    }]
}

impl PropertyPatch {
    pub fn title(content: impl Into<String>) -> Self {
        PropertyPatch::Title(single_segment(content))
    }

    pub fn rich_text(content: impl Into<String>) -> Self {
        PropertyPatch::RichText(single_segment(content))
    }

    pub fn url(url: impl Into<String>) -> Self {
        PropertyPatch::Url(url.into())
    }

    pub fn select(name: impl Into<String>) -> Self {
        PropertyPatch::Select(SelectInput { name: name.into() })
    }
}
