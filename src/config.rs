use std::{net::SocketAddr, path::PathBuf};

use teloxide::types::UserId;

use crate::error::ConfigError;

const DEFAULT_IMAGE_DIR: &str = "images";

pub struct Config {
    pub token: String,
    pub admin_id: UserId,
    pub photo_path: PathBuf,
    pub image_dir: PathBuf,
    pub prices: PriceInfo,
    pub webhook: Option<WebhookConfig>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriceInfo {
    pub first_hour: String,
    pub subsequent_hour: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WebhookConfig {
    pub host: String,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let token = required("BOT_TOKEN")?;

        let admin_raw = required("ADMIN_ID")?;
        let admin_id = admin_raw
            .parse::<u64>()
            .map(UserId)
            .map_err(|e| ConfigError::Invalid {
                name: "ADMIN_ID",
                value: admin_raw.clone(),
                reason: e.to_string(),
            })?;

        let photo_path = PathBuf::from(required("PHOTO_PATH")?);
        let image_dir = lookup("IMAGE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR));

        let prices = PriceInfo {
            first_hour: price(required("PRICE_FIRST_HOUR")?, "PRICE_FIRST_HOUR")?,
            subsequent_hour: price(required("PRICE_SUBSEQUENT_HOUR")?, "PRICE_SUBSEQUENT_HOUR")?,
        };

        let webhook = match lookup("BOT_HOST").filter(|v| !v.trim().is_empty()) {
            None => None,
            Some(host) => {
                let port_raw = required("PORT")?;
                let port: u16 = port_raw.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        name: "PORT",
                        value: port_raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Some(WebhookConfig {
                    host: host.trim().trim_end_matches('/').to_owned(),
                    addr: ([127, 0, 0, 1], port).into(),
                })
            }
        };

        Ok(Self {
            token,
            admin_id,
            photo_path,
            image_dir,
            prices,
            webhook,
        })
    }

    pub fn is_admin(&self, user: UserId) -> bool {
        user == self.admin_id
    }

    #[cfg(test)]
    pub fn for_tests(admin_id: UserId, photo_path: impl Into<PathBuf>) -> Self {
        Self {
            token: "0:test".into(),
            admin_id,
            photo_path: photo_path.into(),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            prices: PriceInfo {
                first_hour: "5".into(),
                subsequent_hour: "3".into(),
            },
            webhook: None,
        }
    }
}

fn price(value: String, name: &'static str) -> Result<String, ConfigError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(value),
        Ok(_) => Err(ConfigError::Invalid {
            name,
            value,
            reason: "price must be a non-negative number".into(),
        }),
        Err(e) => Err(ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
