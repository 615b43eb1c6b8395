use std::{process::ExitCode, sync::Arc};

use portfolio_api::{logger::init_logger, start_server, RelayMailer, Settings};

#[actix_web::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_logger();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(error) => {
            tracing::error!("Settings load error: {}", error);
            return ExitCode::FAILURE;
        }
    };

    if settings.mail.user.is_none() || settings.mail.pass.is_none() {
        tracing::warn!("EMAIL_USER or EMAIL_PASS is not set, contact submissions will fail");
    }

    let mailer = Arc::new(RelayMailer::new(settings.mail.clone()));
    match start_server(settings, mailer).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("Server error: {}", error);
            ExitCode::FAILURE
        }
    }
}
