use anyhow::Context;
use axum::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;

/// Outbound mail collaborator.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a verification code to a freshly registered address.
    async fn send_verification_code(&self, to: &str, code: &str) -> anyhow::Result<()>;
}

/// SMTP-backed mailer used in production.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .context("build smtp transport")?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let from = config.from.parse::<Mailbox>().context("parse MAIL_FROM")?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_verification_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>().context("parse recipient address")?)
            .subject("Your email verification code")
            .header(ContentType::TEXT_HTML)
            .body(verification_body(code))
            .context("build verification message")?;

        self.transport
            .send(message)
            .await
            .context("send verification email")?;
        Ok(())
    }
}

fn verification_body(code: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="text-align: center;">Email verification</h2>
  <p>Thanks for signing up. Use the code below to verify your email address:</p>
  <div style="background-color: #f5f5f5; padding: 20px; text-align: center; margin: 20px 0;">
    <h1 style="letter-spacing: 5px; margin: 0;">{code}</h1>
  </div>
  <p>The code is valid for 10 minutes.</p>
  <p>If you did not request this, you can safely ignore this message.</p>
</div>"#
    )
}
