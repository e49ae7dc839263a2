use std::fmt;

use serde::Deserialize;

/// Portal login credentials, supplied fresh on every inbound request.
///
/// Field names follow the inbound JSON contract. Credentials are never
/// persisted; the session that consumes them is dropped at the end of the
/// request.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(rename = "companycd")]
    pub company_code: String,
    pub username: String,
    pub password: String,
}

// Manual impl so the password can never reach a log line.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("company_code", &self.company_code)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
