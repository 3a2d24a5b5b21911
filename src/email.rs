use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::SmtpConfig;

/// Outbound email seam. Handlers only see this trait so tests can run
/// against a no-op implementation.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;
        self.transport.send(message).await?;
        info!(%to, %subject, "email sent");
        Ok(())
    }
}

/// Swallows messages; used by `AppState::fake()`.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

pub async fn send_verification_email(
    mailer: &dyn Mailer,
    to: &str,
    username: &str,
    link: &str,
) -> anyhow::Result<()> {
    let body = format!(
        "Dear {username}, thank you for creating an account with Unicon. \
         Kindly verify your email address by clicking on the link below.\n{link}\n"
    );
    mailer.send(to, "Unicon Account Verification", &body).await
}

pub async fn send_reset_token_email(
    mailer: &dyn Mailer,
    to: &str,
    token: &str,
) -> anyhow::Result<()> {
    let body = format!(
        "Here is your password reset token: {token}\n\n\
         Please copy this token and use it in the password reset form on our website."
    );
    mailer.send(to, "Password Reset", &body).await
}
