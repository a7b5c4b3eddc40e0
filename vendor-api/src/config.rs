use notion::{DEFAULT_API_URL, DEFAULT_NOTION_VERSION};
use serde::Deserialize;
use thiserror::Error;

/// Tag taxonomy database used when none is configured.
pub const DEFAULT_TAG_SYSTEM_DB_ID: &str = "1f9a69bf0cfd8034b919f51b7c4f2c67";

pub const NOTION_TOKEN_ENV: &str = "NOTION_TOKEN";
pub const ORGANIZATIONS_DB_ENV: &str = "NOTION_ORGANIZATIONS_DB_ID";
pub const CONTACTS_DB_ENV: &str = "NOTION_CONTACTS_DB_ID";
pub const TAG_SYSTEM_DB_ENV: &str = "NOTION_TAG_SYSTEM_DB_ID";

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("missing Notion API token (set notion.token or NOTION_TOKEN)")]
    MissingCredential,

    #[error("missing database id: {0}")]
    MissingDatabaseId(&'static str),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener for the vendor API
    #[serde(default = "Listener::api_default")]
    pub listener: Listener,
    /// Listener for health and readiness probes
    #[serde(default = "Listener::admin_default")]
    pub admin_listener: Listener,
    #[serde(default)]
    pub notion: NotionConfig,
    #[serde(default)]
    pub databases: Databases,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Listener {
    fn api_default() -> Self {
        Listener {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }

    fn admin_default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 3001,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NotionConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Integration secret. Usually supplied through the environment.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

fn default_version() -> String {
    DEFAULT_NOTION_VERSION.into()
}

impl Default for NotionConfig {
    fn default() -> Self {
        NotionConfig {
            api_url: default_api_url(),
            version: default_version(),
            token: None,
        }
    }
}

/// Database ids the handlers read from and write to.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Databases {
    #[serde(default)]
    pub organizations: String,
    #[serde(default)]
    pub contacts: String,
    #[serde(default = "default_tag_system")]
    pub tag_system: String,
}

fn default_tag_system() -> String {
    DEFAULT_TAG_SYSTEM_DB_ID.into()
}

impl Default for Databases {
    fn default() -> Self {
        Databases {
            organizations: String::new(),
            contacts: String::new(),
            tag_system: default_tag_system(),
        }
    }
}

impl Config {
    /// Applies the deployment environment variables on top of the file values.
    /// Unset or empty variables leave the file value in place.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(token) = get(NOTION_TOKEN_ENV) {
            self.notion.token = Some(token);
        }
        if let Some(id) = get(ORGANIZATIONS_DB_ENV) {
            self.databases.organizations = id;
        }
        if let Some(id) = get(CONTACTS_DB_ENV) {
            self.databases.contacts = id;
        }
        if let Some(id) = get(TAG_SYSTEM_DB_ENV) {
            self.databases.tag_system = id;
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.admin_listener.validate()?;

        if self.notion.token.as_deref().is_none_or(str::is_empty) {
            return Err(ValidationError::MissingCredential);
        }

        let databases = [
            ("organizations", &self.databases.organizations),
            ("contacts", &self.databases.contacts),
            ("tag_system", &self.databases.tag_system),
        ];
        for (name, id) in databases {
            if id.is_empty() {
                return Err(ValidationError::MissingDatabaseId(name));
            }
        }

        Ok(())
    }

    /// The validated API token.
    pub fn token(&self) -> &str {
        self.notion.token.as_deref().unwrap_or_default()
    }
}
