//! API server for a personal portfolio site: static project/service
//! catalogs plus a rate-limited contact form relayed by email.

pub mod contact;
pub mod core;
pub mod error;
pub mod logger;
pub mod mail;
pub mod rate_limit;
pub mod server;
pub mod types;

pub use crate::core::settings::Settings;
pub use error::ApiError;
pub use mail::{MailError, Mailer, OutgoingMail, RelayMailer};
pub use server::{build_app, configure, global_rate_limit, start_server, AppState};
