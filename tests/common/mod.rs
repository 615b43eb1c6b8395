#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error,
};
use async_trait::async_trait;
use portfolio_api::{build_app, AppState, MailError, Mailer, OutgoingMail, Settings};
use serde_json::{json, Value};

/// Mailer that records every message instead of relaying it.
pub struct RecordingMailer {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub fail: bool,
    pub sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        RecordingMailer {
            sender: Some("owner@example.com".to_string()),
            recipient: Some("inbox@example.com".to_string()),
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        RecordingMailer {
            fail: true,
            ..RecordingMailer::new()
        }
    }

    pub fn unconfigured() -> Self {
        RecordingMailer {
            sender: None,
            recipient: None,
            ..RecordingMailer::new()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl Mailer for RecordingMailer {
    fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail.clone());
        if self.fail {
            return Err(MailError::Rejected {
                status: 503,
                body: "relay unavailable".to_string(),
            });
        }
        Ok(())
    }
}

pub fn app(
    settings: &Settings,
    mailer: Arc<RecordingMailer>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = Error,
    >,
> {
    build_app(web::Data::new(AppState::new(settings, mailer)), settings)
}

pub fn client(n: u8) -> SocketAddr {
    SocketAddr::from(([192, 168, 0, n], 40000))
}

pub fn valid_submission() -> Value {
    json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "subject": "Project inquiry",
        "message": "I would like to talk about a new project."
    })
}
