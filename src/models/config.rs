use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::FeedtuiError;
use crate::models::client::Session;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    pub token: Option<String>,
    pub viewer_id: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, FeedtuiError> {
        let config_path = dirs::home_dir()
            .ok_or_else(|| FeedtuiError::Config("Could not find home directory".to_string()))?
            .join(".config/feedtui/config.json");

        let file = File::open(&config_path)
            .with_context(|| format!("Failed to open config file at {:?}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config =
            serde_json::from_reader(reader).context("Failed to parse config JSON")?;

        Ok(config)
    }

    pub fn save(&self) -> Result<(), FeedtuiError> {
        let config_path = dirs::home_dir()
            .ok_or_else(|| FeedtuiError::Config("Could not find home directory".to_string()))?
            .join(".config/feedtui/config.json");

        let json = serde_json::to_string_pretty(&self)
            .context("Failed to serialize config to JSON")?;

        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&config_path)
            .with_context(|| format!("Failed to open config file for writing at {:?}", config_path))?;

        file.write_all(json.as_bytes())
            .context("Failed to write config data")?;

        Ok(())
    }

    /// The read-only context handed to the engine. Credentials are opaque
    /// strings forwarded to the service, never validated locally.
    pub fn session(&self) -> Session {
        Session {
            api_key: self.api_key.clone(),
            bearer_token: self.token.clone(),
            viewer_id: self.viewer_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_carries_config_credentials() {
        let config = Config {
            base_url: "https://feed.example.com/api".to_string(),
            api_key: "key".to_string(),
            token: Some("tok".to_string()),
            viewer_id: Some("u1".to_string()),
        };
        let session = config.session();
        assert_eq!(session.api_key, "key");
        assert_eq!(session.bearer_token.as_deref(), Some("tok"));
        assert_eq!(session.viewer(), Some("u1"));
    }

    #[test]
    fn anonymous_config_yields_anonymous_session() {
        let config = Config {
            base_url: "https://feed.example.com/api".to_string(),
            api_key: "key".to_string(),
            token: None,
            viewer_id: None,
        };
        let session = config.session();
        assert!(session.bearer_token.is_none());
        assert!(session.viewer().is_none());
    }
}
