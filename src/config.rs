use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeConfig {
    pub verify_url: String,
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub cookie_secure: bool,
    pub smtp: SmtpConfig,
    pub challenge: Option<ChallengeConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt_secret = std::env::var("JWT_SECRET")?;
        // Cookies are only marked Secure when serving over HTTPS.
        let cookie_secure = std::env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let smtp_username = std::env::var("SMTP_USERNAME")?;
        let smtp = SmtpConfig {
            host: std::env::var("SMTP_HOST")?,
            from: std::env::var("MAIL_FROM").unwrap_or_else(|_| smtp_username.clone()),
            username: smtp_username,
            password: std::env::var("SMTP_PASSWORD")?,
        };

        // Both values must be present for challenge verification to be on.
        let challenge = match (
            std::env::var("CHALLENGE_VERIFY_URL"),
            std::env::var("CHALLENGE_SECRET"),
        ) {
            (Ok(verify_url), Ok(secret)) => Some(ChallengeConfig { verify_url, secret }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            cookie_secure,
            smtp,
            challenge,
        })
    }
}
