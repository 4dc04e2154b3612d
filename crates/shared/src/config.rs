//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Ledger (Cyclos) connection.
    pub cyclos: CyclosConfig,
    /// Member directory (Dolibarr) connection.
    pub dolibarr: DolibarrConfig,
    /// Outgoing email.
    #[serde(default)]
    pub email: EmailConfig,
    /// Donation calculation settings.
    #[serde(default)]
    pub donation: DonationConfig,
    /// Path of the provisioned payment type catalog, without extension.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_catalog_path() -> String {
    "config/catalog".to_string()
}

/// Ledger connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CyclosConfig {
    /// Base URL of the web services, e.g. `http://cyclos:8080/eusko/web-rpc`.
    pub url: String,
    /// Login of the technical user the backend acts as.
    pub login: String,
    /// Password of the technical user.
    pub password: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Member directory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DolibarrConfig {
    /// Base URL of the REST API, e.g. `http://dolibarr/api/index.php`.
    pub url: String,
    /// API key sent in the `DOLAPIKEY` header.
    pub api_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Email configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP port.
    pub smtp_port: u16,
    /// SMTP username.
    pub smtp_username: String,
    /// SMTP password.
    pub smtp_password: String,
    /// Sender address.
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
    /// Management inbox receiving operation notifications.
    pub notification_email: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@euskalmoneta.org".to_string(),
            from_name: "Euskal Moneta".to_string(),
            notification_email: "gestion@euskalmoneta.org".to_string(),
        }
    }
}

/// Settings of the 3% donation calculation.
#[derive(Debug, Clone, Deserialize)]
pub struct DonationConfig {
    /// Sponsorships an association needs to receive donations.
    #[serde(default = "default_minimum_sponsorships")]
    pub minimum_sponsorships: u32,
    /// Member number of the association that receives unattributed donations.
    #[serde(default = "default_association")]
    pub default_association: String,
    /// Display name used when the default association is not in the directory.
    #[serde(default = "default_association_name")]
    pub default_association_name: String,
}

fn default_minimum_sponsorships() -> u32 {
    30
}

fn default_association() -> String {
    "Z00001".to_string()
}

fn default_association_name() -> String {
    "Euskal Moneta".to_string()
}

impl Default for DonationConfig {
    fn default() -> Self {
        Self {
            minimum_sponsorships: default_minimum_sponsorships(),
            default_association: default_association(),
            default_association_name: default_association_name(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("EUSKO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
