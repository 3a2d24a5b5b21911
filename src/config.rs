use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SquadConfig {
    pub base_url: String,
    /// Shared secret: authorizes outbound calls and keys the webhook HMAC.
    pub private_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Base URL this API is reachable at, used to build verification links.
    pub public_base_url: String,
    /// Frontend login page the verify-email flow redirects back to.
    pub login_redirect_url: String,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
    pub squad: SquadConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let public_base_url =
            std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".into());
        let login_redirect_url = std::env::var("LOGIN_REDIRECT_URL")
            .unwrap_or_else(|_| "http://localhost:3000/auth/login".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "unicon".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "unicon-users".into()),
            access_ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(50),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 7),
        };
        let smtp = SmtpConfig {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".into()),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(587),
            username: std::env::var("EMAIL_USER").unwrap_or_default(),
            password: std::env::var("EMAIL_PASSWORD").unwrap_or_default(),
            from: std::env::var("EMAIL_FROM")
                .or_else(|_| std::env::var("EMAIL_USER"))
                .unwrap_or_default(),
        };
        let squad = SquadConfig {
            base_url: std::env::var("SQUAD_BASE_URL")
                .unwrap_or_else(|_| "https://sandbox-api-d.squadco.com".into()),
            private_key: std::env::var("SQUAD_PRIVATE_KEY")?,
        };
        Ok(Self {
            database_url,
            public_base_url,
            login_redirect_url,
            jwt,
            smtp,
            squad,
        })
    }
}
