use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{mail::OutgoingMail, types::FieldError};

const FIELDS: [&str; 4] = ["name", "email", "subject", "message"];
const EMAIL_MESSAGE: &str = "Please provide a valid email address";

/// Contact form body as posted by the site.
#[derive(Serialize, Deserialize, Validate, Clone, Debug, Default)]
pub struct ContactSubmission {
    #[serde(default)]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 5, max = 200, message = "Subject must be between 5 and 200 characters"))]
    pub subject: String,

    #[serde(default)]
    #[validate(length(min = 10, max = 1000, message = "Message must be between 10 and 1000 characters"))]
    pub message: String,
}

/// A submission that passed validation, with text fields HTML-escaped.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn into_valid(self) -> Result<ValidContact, Vec<FieldError>> {
        let trimmed = ContactSubmission {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        };

        let mut itemized: Vec<FieldError> = match trimmed.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => {
                let field_errors = errors.field_errors();
                FIELDS
                    .iter()
                    .filter_map(|field| field_errors.get(*field).map(|errs| (*field, *errs)))
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |error| FieldError {
                            field: field.to_string(),
                            msg: error
                                .message
                                .as_ref()
                                .map(|msg| msg.to_string())
                                .unwrap_or_else(|| format!("Invalid {}", field)),
                        })
                    })
                    .collect()
            }
        };

        if !itemized.iter().any(|error| error.field == "email")
            && !has_public_domain(&trimmed.email)
        {
            itemized.push(FieldError {
                field: "email".to_string(),
                msg: EMAIL_MESSAGE.to_string(),
            });
        }

        if !itemized.is_empty() {
            itemized.sort_by_key(|error| FIELDS.iter().position(|field| *field == error.field));
            return Err(itemized);
        }

        Ok(ValidContact {
            name: escape_html(&trimmed.name),
            email: trimmed.email,
            subject: escape_html(&trimmed.subject),
            message: escape_html(&trimmed.message),
        })
    }
}

impl ValidContact {
    pub fn to_mail(
        &self,
        from: &str,
        to: &str,
        reference: Uuid,
        received: DateTime<Utc>,
    ) -> OutgoingMail {
        let html = format!(
            "<h3>New Contact Form Submission</h3>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Subject:</strong> {}</p>\n\
             <p><strong>Message:</strong></p>\n\
             <p>{}</p>\n\
             <p><small>Reference {} received {}</small></p>\n",
            self.name,
            escape_html(&self.email),
            self.subject,
            self.message,
            reference,
            received.format("%Y-%m-%d %H:%M:%S UTC"),
        );

        OutgoingMail {
            from: from.to_string(),
            to: to.to_string(),
            subject: format!("Portfolio Contact: {}", self.subject),
            html,
        }
    }
}

/// The address must end in a dotted domain whose last label is a
/// top-level domain of two or more letters. IP literals never qualify.
fn has_public_domain(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if domain.starts_with('[') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return false;
    }

    let tld = labels[labels.len() - 1];
    let punycode = tld.starts_with("xn--")
        && tld.len() > 4
        && tld.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    punycode || (tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic))
}

/// Replaces characters with meaning in HTML by their entities.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            subject: "Project inquiry".to_string(),
            message: "I would like to talk about a project.".to_string(),
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_submission_passes() {
        let valid = submission().into_valid().unwrap();
        assert_eq!(valid.name, "Jane Doe");
        assert_eq!(valid.email, "jane@example.com");
    }

    #[test]
    fn short_name_is_rejected() {
        let errors = ContactSubmission {
            name: "J".to_string(),
            ..submission()
        }
        .into_valid()
        .unwrap_err();
        assert_eq!(fields(&errors), vec!["name"]);
        assert_eq!(errors[0].msg, "Name must be between 2 and 100 characters");
    }

    #[test]
    fn whitespace_does_not_count_towards_length() {
        let errors = ContactSubmission {
            name: "  J   ".to_string(),
            ..submission()
        }
        .into_valid()
        .unwrap_err();
        assert_eq!(fields(&errors), vec!["name"]);
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in [
            "not-an-email",
            "jane@",
            "@example.com",
            "jane doe@example.com",
            "jane@example",
            "jane@localhost",
            "jane@[127.0.0.1]",
            "jane@127.0.0.1",
            "a@b.c",
            "jane@example.c0m",
        ] {
            let errors = ContactSubmission {
                email: email.to_string(),
                ..submission()
            }
            .into_valid()
            .unwrap_err();
            assert_eq!(fields(&errors), vec!["email"], "accepted {:?}", email);
        }
    }

    #[test]
    fn dotted_domains_with_a_tld_are_accepted() {
        for email in [
            "jane@mail.example.co.uk",
            "j.doe+portfolio@example.io",
            "jane@example.xn--p1ai",
        ] {
            let valid = ContactSubmission {
                email: email.to_string(),
                ..submission()
            }
            .into_valid();
            assert!(valid.is_ok(), "rejected {:?}: {:?}", email, valid);
        }
    }

    #[test]
    fn length_bounds_are_inclusive() {
        let valid = ContactSubmission {
            name: "Jo".to_string(),
            subject: "Hello".to_string(),
            message: "x".repeat(1000),
            ..submission()
        }
        .into_valid();
        assert!(valid.is_ok());

        let errors = ContactSubmission {
            name: "n".repeat(101),
            subject: "Hi!!".to_string(),
            message: "x".repeat(1001),
            ..submission()
        }
        .into_valid()
        .unwrap_err();
        assert_eq!(fields(&errors), vec!["name", "subject", "message"]);
    }

    #[test]
    fn empty_submission_reports_every_field_in_order() {
        let errors = ContactSubmission::default().into_valid().unwrap_err();
        assert_eq!(fields(&errors), FIELDS.to_vec());
    }

    #[test]
    fn email_is_normalized() {
        let valid = ContactSubmission {
            email: "  Jane@Example.COM ".to_string(),
            ..submission()
        }
        .into_valid()
        .unwrap();
        assert_eq!(valid.email, "jane@example.com");
    }

    #[test]
    fn markup_is_escaped() {
        let valid = ContactSubmission {
            message: "<script>alert('x')</script>".to_string(),
            ..submission()
        }
        .into_valid()
        .unwrap();
        assert_eq!(
            valid.message,
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;&#x2F;script&gt;"
        );
    }

    #[test]
    fn backslash_and_backtick_are_escaped() {
        assert_eq!(escape_html(r"`rm` C:\tmp"), "&#96;rm&#96; C:&#x5C;tmp");
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn mail_is_formatted() {
        let valid = submission().into_valid().unwrap();
        let received = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let reference = Uuid::nil();
        let mail = valid.to_mail("me@example.com", "inbox@example.com", reference, received);

        assert_eq!(mail.from, "me@example.com");
        assert_eq!(mail.to, "inbox@example.com");
        assert_eq!(mail.subject, "Portfolio Contact: Project inquiry");
        assert!(mail.html.starts_with("<h3>New Contact Form Submission</h3>"));
        assert!(mail.html.contains("<p><strong>Name:</strong> Jane Doe</p>"));
        assert!(mail.html.contains("<p><strong>Email:</strong> jane@example.com</p>"));
        assert!(mail.html.contains("<p>I would like to talk about a project.</p>"));
        assert!(mail.html.contains(&reference.to_string()));
        assert!(mail.html.contains("2026-01-02 03:04:05 UTC"));
    }
}
