//! Layered settings.
//!
//! ```text
//! defaults  <  pedido.{toml,json,yaml} (or --settings <file>)  <  PEDIDO__SECTION__KEY
//! ```
//!
//! Every field has a default, so an empty environment yields a usable config.

use crate::api::Options;
use crate::catalog::{CatalogSource, FileSource, UrlSource};
use crate::error::{CatalogError, SettingsError};
use crate::hours::StoreHours;
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub matching: MatchingSettings,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub orders: OrderSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// Menu document polled for changes.
    #[serde(default = "default_catalog_path")]
    pub path: String,

    /// Remote menu document. Takes precedence over `path`.
    #[serde(default)]
    pub url: Option<String>,

    /// Optional separate priced document; the menu is used when unset.
    #[serde(default)]
    pub priced_path: Option<String>,

    /// Force a reload after this many seconds even if the file is unchanged.
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

fn default_catalog_path() -> String {
    "menu.json".to_string()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { path: default_catalog_path(), url: None, priced_path: None, ttl_secs: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_quantity_window")]
    pub quantity_window: usize,
}

fn default_quantity_window() -> usize {
    crate::engine::DEFAULT_WINDOW
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self { quantity_window: default_quantity_window() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default)]
    pub phone: Option<String>,

    /// Map link sent for location questions.
    #[serde(default)]
    pub map_url: Option<String>,

    #[serde(default)]
    pub foodpanda_url: Option<String>,

    /// `HH:MM`, local time.
    #[serde(default = "default_open_time")]
    pub open_time: String,

    #[serde(default = "default_close_time")]
    pub close_time: String,

    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    /// `YYYY-MM-DD` local dates.
    #[serde(default)]
    pub closed_dates: Vec<String>,
}

fn default_store_name() -> String {
    "Pedro's Classic and Asian Cuisine".to_string()
}

fn default_open_time() -> String {
    "10:00".to_string()
}

fn default_close_time() -> String {
    "22:00".to_string()
}

fn default_utc_offset_hours() -> i32 {
    8
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            name: default_store_name(),
            phone: None,
            map_url: None,
            foodpanda_url: None,
            open_time: default_open_time(),
            close_time: default_close_time(),
            utc_offset_hours: default_utc_offset_hours(),
            closed_dates: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderSettings {
    #[serde(default = "default_number_prefix")]
    pub number_prefix: String,

    #[serde(default = "default_customer_name_prefix")]
    pub customer_name_prefix: String,

    /// JSON-lines file the CLI appends orders to.
    #[serde(default = "default_sink_path")]
    pub sink_path: String,
}

fn default_number_prefix() -> String {
    "FB".to_string()
}

fn default_customer_name_prefix() -> String {
    crate::order::DEFAULT_CUSTOMER_NAME_PREFIX.to_string()
}

fn default_sink_path() -> String {
    "orders.jsonl".to_string()
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            number_prefix: default_number_prefix(),
            customer_name_prefix: default_customer_name_prefix(),
            sink_path: default_sink_path(),
        }
    }
}

impl Settings {
    /// Load settings from `file` (required when given; otherwise an optional
    /// `pedido.*` in the working directory) and `PEDIDO__*` variables.
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();

        builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("pedido").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("PEDIDO")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("store.closed_dates"),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.store_hours()?;
        if self.matching.quantity_window == 0 {
            return Err(invalid("matching.quantity_window", "must be greater than zero"));
        }
        if self.orders.number_prefix.trim().is_empty() {
            return Err(invalid("orders.number_prefix", "must not be empty"));
        }
        Ok(())
    }

    pub fn offset(&self) -> Result<FixedOffset, SettingsError> {
        self.store
            .utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| invalid("store.utc_offset_hours", "must be between -23 and 23"))
    }

    pub fn store_hours(&self) -> Result<StoreHours, SettingsError> {
        let open = parse_time("store.open_time", &self.store.open_time)?;
        let close = parse_time("store.close_time", &self.store.close_time)?;
        if close <= open {
            return Err(invalid("store.close_time", "must be after store.open_time"));
        }

        let closed_dates = self
            .store
            .closed_dates
            .iter()
            .map(|d| {
                NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
                    .map_err(|e| invalid("store.closed_dates", &format!("{d:?}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(StoreHours { open, close, offset: self.offset()?, closed_dates })
    }

    pub fn options(&self) -> Options {
        Options { quantity_window: Some(self.matching.quantity_window) }
    }

    pub fn catalog_ttl(&self) -> Option<Duration> {
        self.catalog.ttl_secs.map(Duration::from_secs)
    }

    /// Where the menu comes from: `catalog.url` when set, else `catalog.path`.
    pub fn menu_source(&self) -> Result<Box<dyn CatalogSource>, CatalogError> {
        match self.catalog.url.as_deref().map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => Ok(Box::new(UrlSource::new(url, self.catalog_ttl())?)),
            None => Ok(Box::new(FileSource::new(&self.catalog.path))),
        }
    }
}

fn parse_time(field: &str, value: &str) -> Result<NaiveTime, SettingsError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|e| invalid(field, &format!("{value:?}: {e}")))
}

fn invalid(field: &str, message: &str) -> SettingsError {
    SettingsError::InvalidValue { field: field.to_string(), message: message.to_string() }
}
