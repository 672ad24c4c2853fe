use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub admin_username: String,
    pub admin_password: String,
    /// Whether a new cancellation request may be filed for an appointment
    /// that already has one pending. The original systems never enforced
    /// uniqueness; the default here blocks duplicates.
    pub allow_repeat_cancel_requests: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL not found")?;
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let admin_username =
            std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
        let allow_repeat_cancel_requests = std::env::var("ALLOW_REPEAT_CANCEL_REQUESTS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            bind_addr,
            admin_username,
            admin_password,
            allow_repeat_cancel_requests,
        })
    }
}
