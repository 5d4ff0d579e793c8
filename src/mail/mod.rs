//! Outgoing email.
//!
//! Sends are fire-and-forget: [`MailDispatcher`] spawns a task per message
//! and only logs failures. Request handlers never wait on the relay.

pub mod templates;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::{MailConfig, SiteConfig};
use crate::domain::{BlogPost, Subscriber};

/// Mail delivery failures.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("relay transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

/// Trait for mail transports.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Posts messages as JSON to a transactional mail relay.
pub struct HttpMailer {
    client: Client,
    relay_url: String,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl HttpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            relay_url: config.relay_url.clone(),
            api_key: config.api_key.clone(),
            from: format!("{} <{}>", config.from_name, config.from_address),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let mut request = self.client.post(&self.relay_url).json(&RelayMessage {
            from: &self.from,
            to: &email.recipient,
            subject: &email.subject,
            html: &email.html_body,
        });
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected { status, body });
        }

        Ok(())
    }
}

/// Logs messages instead of sending them. Used when mail is disabled.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        tracing::info!(
            recipient = %email.recipient,
            subject = %email.subject,
            "Mail disabled, message not sent"
        );
        Ok(())
    }
}

/// Composes blog emails and hands them to a [`Mailer`] in the background.
#[derive(Clone)]
pub struct MailDispatcher {
    mailer: Arc<dyn Mailer>,
    admin_address: String,
    site_url: String,
    api_url: String,
    logo_url: String,
}

impl MailDispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, admin_address: String, site: &SiteConfig) -> Self {
        Self {
            mailer,
            admin_address,
            site_url: site.base_url.trim_end_matches('/').to_string(),
            api_url: site.api_url.trim_end_matches('/').to_string(),
            logo_url: site.logo_url.clone(),
        }
    }

    /// Pick the relay mailer when enabled, otherwise the log mailer.
    pub fn from_config(mail: &MailConfig, site: &SiteConfig) -> Result<Self, MailError> {
        let mailer: Arc<dyn Mailer> = if mail.enabled && !mail.relay_url.is_empty() {
            tracing::info!(relay = %mail.relay_url, "Mail relay enabled");
            Arc::new(HttpMailer::new(mail)?)
        } else {
            tracing::info!("Mail relay disabled, emails will be logged");
            Arc::new(LogMailer)
        };

        Ok(Self::new(mailer, mail.admin_address.clone(), site))
    }

    /// Send in the background; failures are logged.
    pub fn dispatch(&self, email: OutgoingEmail) -> JoinHandle<()> {
        let mailer = self.mailer.clone();
        tokio::spawn(async move {
            match mailer.send(&email).await {
                Ok(()) => tracing::debug!(recipient = %email.recipient, "Email sent"),
                Err(e) => tracing::warn!(
                    recipient = %email.recipient,
                    subject = %email.subject,
                    error = %e,
                    "Email delivery failed"
                ),
            }
        })
    }

    pub fn unsubscribe_link(&self, email: &str) -> String {
        let base = format!("{}/api/subscribers/unsubscribe", self.api_url);
        reqwest::Url::parse_with_params(&base, &[("email", email)])
            .map(String::from)
            .unwrap_or_else(|_| format!("{}?email={}", base, email))
    }

    pub fn post_url(&self, post_id: i64) -> String {
        format!("{}/blog/{}", self.site_url, post_id)
    }

    pub fn welcome(&self, subscriber: &Subscriber) -> OutgoingEmail {
        OutgoingEmail {
            recipient: subscriber.email.clone(),
            subject: "Welcome to Our Newsletter!".to_string(),
            html_body: templates::welcome(
                &subscriber.name,
                &self.unsubscribe_link(&subscriber.email),
            ),
        }
    }

    /// `None` when no admin address is configured.
    pub fn admin_alert(&self, subscriber: &Subscriber) -> Option<OutgoingEmail> {
        if self.admin_address.is_empty() {
            return None;
        }
        Some(OutgoingEmail {
            recipient: self.admin_address.clone(),
            subject: "New Subscriber Alert".to_string(),
            html_body: templates::admin_alert(&subscriber.name, &subscriber.email),
        })
    }

    pub fn newsletter(&self, post: &BlogPost, recipient: &str) -> OutgoingEmail {
        let post_url = self.post_url(post.id);
        let unsubscribe_link = self.unsubscribe_link(recipient);

        OutgoingEmail {
            recipient: recipient.to_string(),
            subject: format!("New Blog Post: {}", post.title),
            html_body: templates::newsletter(&templates::Newsletter {
                title: &post.title,
                excerpt: &post.excerpt,
                post_url: &post_url,
                image_url: &post.image,
                logo_url: &self.logo_url,
                unsubscribe_link: &unsubscribe_link,
            }),
        }
    }

    /// Welcome the subscriber and alert the admin.
    pub fn notify_subscribed(&self, subscriber: &Subscriber) {
        self.dispatch(self.welcome(subscriber));
        if let Some(alert) = self.admin_alert(subscriber) {
            self.dispatch(alert);
        }
    }

    /// Send the newsletter for `post` to every recipient; returns the count.
    pub fn send_newsletter(&self, post: &BlogPost, recipients: &[String]) -> usize {
        for recipient in recipients {
            self.dispatch(self.newsletter(post, recipient));
        }
        tracing::info!(post_id = %post.id, recipients = recipients.len(), "Newsletter queued");
        recipients.len()
    }
}
