use std::string::ToString;

use ::config::{Config, ConfigError};
use once_cell::sync::Lazy;
use rocket::form::validate::Contains;
use rocket::serde::Deserialize;

/// config properties for the rabbit queue
#[derive(Deserialize, Clone)]
pub struct RabbitMqConfig {
    pub address: Option<String>,
    pub enabled: bool,
}

#[derive(Deserialize, Clone)]
pub struct DbConfig {
    pub location: String,
}

#[derive(Deserialize, Clone)]
pub struct SearchConfig {
    /// how many ranked results a single search returns at most. The true match count is
    /// always reported separately
    #[serde(rename = "resultlimit")]
    pub result_limit: u32,
}

/// config properties for the whole of this application
#[derive(Deserialize, Clone)]
pub struct FileDashboardConfig {
    #[serde(rename = "rabbitmq")]
    pub rabbit_mq: RabbitMqConfig,
    pub database: DbConfig,
    pub search: SearchConfig,
}

/// Parses the config file located at ./FileDashboard.toml, if it exists.
/// If this fails to parse the file, the application will panic
pub fn parse_config() -> FileDashboardConfig {
    let builder = Config::builder()
        .add_source(::config::File::with_name("./FileDashboard.toml"))
        .build();
    // some errors are fine, such as not found
    if let Err(ConfigError::Foreign(e)) = builder {
        let message = e.to_string();
        if message.contains("not found") {
            log::warn!("No config file found. Continuing startup...");
            return FD_CONFIG_DEFAULT.clone();
        }
        panic!("Failed to parse config file. Exception is {e}");
        // basically everything else is unrecoverable, though
    } else if let Err(e) = builder {
        log::error!("Failed to parse config file. Exception is {e}");
        panic!("Failed to parse config file. Exception is {e}");
    }
    let settings = builder.unwrap();
    settings
        .try_deserialize()
        .unwrap_or(FD_CONFIG_DEFAULT.clone())
}

/// global variable for config, that way it doesn't need to be repeatedly parsed
pub static FILE_DASHBOARD_CONFIG: Lazy<FileDashboardConfig> = Lazy::new(parse_config);
static FD_CONFIG_DEFAULT: Lazy<FileDashboardConfig> = Lazy::new(|| FileDashboardConfig {
    rabbit_mq: RabbitMqConfig {
        address: Some("amqp://127.0.0.1:5672".to_string()),
        enabled: false,
    },
    database: DbConfig {
        location: "./db.sqlite".to_string(),
    },
    search: SearchConfig { result_limit: 150 },
});
