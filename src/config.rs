use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// The one administrator account. Registration with this email is granted
    /// the admin role; everything else stays a regular user.
    pub admin_email: String,
    /// Server-verified passkey for destructive bulk operations. Never shipped
    /// to clients.
    pub purge_passkey: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
        let purge_passkey = env::var("PURGE_PASSKEY")?;
        Ok(Self {
            port,
            database_url,
            host,
            admin_email,
            purge_passkey,
        })
    }
}
