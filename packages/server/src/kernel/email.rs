//! Verification email: rendering, delivery over SMTP, and the service that
//! ties a fresh email token to the confirmation link.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use askama::Template;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::config::MailConfig;
use crate::domains::auth::JwtService;
use crate::kernel::{BaseMailer, OutgoingEmail};

const VERIFY_EMAIL_SUBJECT: &str = "Confirm email";
const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// SMTP mailer
// =============================================================================

/// Delivers mail through an SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Implicit TLS when `ssl_tls`, STARTTLS when `starttls`, plain otherwise
    pub fn new(config: &MailConfig) -> Result<Self> {
        let builder = if config.ssl_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)
                .context("Failed to configure SMTP relay")?
        } else if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
                .context("Failed to configure SMTP STARTTLS relay")?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
        };

        let mut builder = builder.port(config.port).timeout(Some(SMTP_TIMEOUT));
        if config.use_credentials {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        let address: Address = config
            .from
            .parse()
            .with_context(|| format!("MAIL_FROM is not a valid address: {}", config.from))?;

        Ok(Self {
            transport: builder.build(),
            from: Mailbox::new(Some(config.from_name.clone()), address),
        })
    }
}

#[async_trait]
impl BaseMailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let to: Mailbox = email
            .to
            .parse()
            .with_context(|| format!("Invalid recipient address: {}", email.to))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html)
            .context("Failed to build email message")?;

        self.transport
            .send(message)
            .await
            .context("SMTP delivery failed")?;
        Ok(())
    }
}

// =============================================================================
// Email service
// =============================================================================

/// Sends the "Confirm email" message for an account
#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<dyn BaseMailer>,
    jwt: Arc<JwtService>,
}

impl EmailService {
    pub fn new(mailer: Arc<dyn BaseMailer>, jwt: Arc<JwtService>) -> Self {
        Self { mailer, jwt }
    }

    /// `host` is the public base URL of the API, ending in `/`
    pub async fn send_verification_email(
        &self,
        email: &str,
        username: &str,
        host: &str,
    ) -> Result<()> {
        let token = self.jwt.create_email_token(email)?;
        let html = render_verification_email(username, host, &token)?;
        self.mailer
            .send(OutgoingEmail {
                to: email.to_string(),
                subject: VERIFY_EMAIL_SUBJECT.to_string(),
                html,
            })
            .await?;
        info!(to = %email, "Verification email sent");
        Ok(())
    }

    /// Fire-and-forget variant used after the response is produced.
    /// Failures are logged, never reported to the client.
    pub fn spawn_verification_email(&self, email: String, username: String, host: String) {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service
                .send_verification_email(&email, &username, &host)
                .await
            {
                error!(error = %e, to = %email, "Failed to send verification email");
            }
        });
    }
}

#[derive(Template)]
#[template(path = "verify_email.html")]
pub struct VerifyEmailTemplate<'a> {
    pub username: &'a str,
    pub host: &'a str,
    pub token: &'a str,
}

/// Fill the verification template
pub fn render_verification_email(username: &str, host: &str, token: &str) -> Result<String> {
    VerifyEmailTemplate {
        username,
        host,
        token,
    }
    .render()
    .context("Failed to render verification email")
}
