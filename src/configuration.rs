// Copyright 2025 Felipe Torres González
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

//! ShopBot configuration module
//!
//! # Description
//!
//! This module includes all the definitions for the app's settings and the
//! objects that automate reading the configuration from files or environment
//! variables and parsing them to Rust's native types.
//!
//! Some settings must be overrided by environment variables, for example, the
//! API token for the Telegram Bot client. All the environment variables that
//! are meant to be used within this module shall use the prefix _SHOPBOT_.

use config::{Config, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde_derive::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::path::Path;

/// Name of the directory in which configuration files will be stored.
const CONF_DIR: &str = "config";

/// Main settings `struct`.
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Level for the tracing crate.
    pub tracing_level: String,
    /// Application specific settings.
    pub application: ApplicationSettings,
    /// Settings of the PostgreSQL backend.
    pub database: DatabaseSettings,
    /// Storage of the dialog sessions.
    #[serde(default)]
    pub session: SessionSettings,
    /// Settings of the shop.
    pub shop: ShopSettings,
}

/// Settings of the ShopBot application.
///
/// # Description
///
/// - [ApplicationSettings::api_token]: Telegram BOT API token. Override the value
///   of the YML file using an environment variable: `export SHOPBOT__APPLICATION__API_TOKEN="key"`.
/// - [ApplicationSettings::webhook]: when present, updates are received through a webhook served by
///   an Axum server. Otherwise, the bot uses long polling.
#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    pub api_token: SecretString,
    pub webhook: Option<WebhookSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSettings {
    /// Public URL registered in Telegram, e.g. `https://shop.example.com/bot`.
    pub url: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub name: String,
    pub require_ssl: Option<bool>,
}

impl DatabaseSettings {
    /// Connection options without a target DB.
    pub fn without_db(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .ssl_mode(if self.require_ssl.unwrap_or_default() {
                PgSslMode::Require
            } else {
                PgSslMode::Prefer
            })
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.name)
    }
}

/// Backend that keeps the state of the dialogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum SessionSettings {
    /// Sessions are lost when the bot restarts.
    #[default]
    Memory,
    /// Sessions are kept in a Redis (or Valkey) server.
    Redis { url: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopSettings {
    /// Link to the map with the location of the pickup point.
    pub pickup_location_url: String,
    #[serde(default = "default_products_per_page")]
    pub products_per_page: usize,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_products_per_page() -> usize {
    1
}

fn default_currency() -> String {
    String::from("RUB")
}

impl Settings {
    /// Read the settings from the `config` directory of the current working directory.
    pub fn new() -> Result<Self, ConfigError> {
        let base_path = std::env::current_dir()
            .map_err(|e| ConfigError::Message(format!("Failed to determine the current directory: {e}")))?;

        Self::from_dir(&base_path.join(CONF_DIR))
    }

    /// Read the settings from the `base` file of the given directory, and override them with environment
    /// variables.
    pub fn from_dir(cfg_dir: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Start off by merging in the "default" configuration file.
            .add_source(File::from(cfg_dir.join("base")).required(true))
            .add_source(Environment::with_prefix("shopbot").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
