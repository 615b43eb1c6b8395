use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_RELAY_URL: &str = "https://api.mailrelay.local/v1/send";
const DEFAULT_MAIL_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    pub mail: MailSettings,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub trust_proxy: bool,
    pub contact_limit: RateLimitSettings,
    pub global_limit: RateLimitSettings,
}

#[derive(Clone, Debug)]
pub struct MailSettings {
    pub relay_url: String,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub recipient: Option<String>,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window: Duration,
    pub message: &'static str,
}

impl RateLimitSettings {
    pub fn contact() -> Self {
        RateLimitSettings {
            max_requests: 5,
            window: Duration::from_secs(60 * 60),
            message: "Too many contact form submissions, please try again later.",
        }
    }

    pub fn global() -> Self {
        RateLimitSettings {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
            message: "Too many requests from this IP, please try again later.",
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Settings {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: DEFAULT_PORT,
            mail: MailSettings {
                relay_url: DEFAULT_RELAY_URL.to_string(),
                user: None,
                pass: None,
                recipient: None,
                timeout: Duration::from_secs(DEFAULT_MAIL_TIMEOUT_SECS),
            },
            cors_allowed_origins: None,
            trust_proxy: false,
            contact_limit: RateLimitSettings::contact(),
            global_limit: RateLimitSettings::global(),
        }
    }

    /// Reads settings from the process environment, on top of `new()`.
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut settings = Settings::new();

        if let Some(value) = var("HOST") {
            settings.host = value.parse().map_err(|error| SettingsError::Invalid {
                key: "HOST",
                value: value.clone(),
                reason: format!("{}", error),
            })?;
        }
        if let Some(value) = var("PORT") {
            settings.port = value.parse().map_err(|error| SettingsError::Invalid {
                key: "PORT",
                value: value.clone(),
                reason: format!("{}", error),
            })?;
        }
        if let Some(value) = var("MAIL_TIMEOUT_SECS") {
            let secs: u64 = value.parse().map_err(|error| SettingsError::Invalid {
                key: "MAIL_TIMEOUT_SECS",
                value: value.clone(),
                reason: format!("{}", error),
            })?;
            settings.mail.timeout = Duration::from_secs(secs);
        }
        if let Some(value) = var("MAIL_RELAY_URL") {
            settings.mail.relay_url = value;
        }

        settings.mail.user = var("EMAIL_USER");
        settings.mail.pass = var("EMAIL_PASS");
        settings.mail.recipient = var("CONTACT_EMAIL").or_else(|| settings.mail.user.clone());

        settings.cors_allowed_origins = var("CORS_ALLOWED_ORIGINS").and_then(|value| {
            if value == "*" {
                return None;
            }
            let origins: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect();
            (!origins.is_empty()).then_some(origins)
        });

        settings.trust_proxy = matches!(
            var("TRUST_PROXY").as_deref(),
            Some("1") | Some("true") | Some("yes")
        );

        Ok(settings)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new()
    }
}
