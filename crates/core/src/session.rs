//! One authenticated conversation with the time-attendance portal.
//!
//! A session lives for a single inbound request: it owns its own cookie
//! store, so portal cookies never cross between users or requests. The
//! portal routes every operation through one URL and selects behaviour via
//! `module`/`action` form fields.

use std::time::Duration;

use crate::credentials::Credentials;
use crate::error::PortalError;
use crate::parser::{self, AttendanceState, CsrfToken, ParsedPage};

/// Production portal endpoint. Tests point sessions at a local mock
/// instead.
pub const DEFAULT_BASE_URL: &str = "https://www.e4628.jp";

/// Stamping direction understood by the portal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampDirection {
    /// Clock in.
    ToOn,
    /// Clock out.
    ToOff,
}

impl StampDirection {
    /// Numeric code the portal expects in `timerecorder_stamping_type`.
    fn form_value(self) -> &'static str {
        match self {
            StampDirection::ToOn => "1",
            StampDirection::ToOff => "2",
        }
    }
}

/// Authenticated HTTP conversation with the portal.
///
/// CSRF fields are re-extracted from every response; the portal reissues
/// them per page, so nothing is cached across logins.
pub struct PortalSession {
    client: reqwest::Client,
    base_url: String,

    csrf: Option<CsrfToken>,
    start_time: Option<String>,
    leave_time: Option<String>,
    state: AttendanceState,
}

impl PortalSession {
    /// Create a session with a fresh, isolated cookie store.
    ///
    /// `timeout` bounds each portal call so a hung remote cannot pin the
    /// handling task forever.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PortalError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(PortalError::Init)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            csrf: None,
            start_time: None,
            leave_time: None,
            state: AttendanceState::Unknown,
        })
    }

    /// Attendance state inferred from the most recently fetched page.
    pub fn state(&self) -> AttendanceState {
        self.state
    }

    /// Arrival stamp time (`HH:MM`) from the most recent page, if stamped.
    pub fn start_time(&self) -> Option<&str> {
        self.start_time.as_deref()
    }

    /// Departure stamp time (`HH:MM`) from the most recent page, if stamped.
    pub fn leave_time(&self) -> Option<&str> {
        self.leave_time.as_deref()
    }

    /// Log in and populate state from the returned page.
    ///
    /// The portal answers 200 OK either way; [`PortalError::Unauthorized`]
    /// comes from the parser's marker check, not the status code.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), PortalError> {
        let body = self
            .post_form(&[
                ("y_companycd", credentials.company_code.as_str()),
                ("y_logincd", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
                ("Submit", "Login"),
                ("module", "login"),
                ("trycnt", "1"),
            ])
            .await?;

        let page = parser::parse_page(&body)?;
        self.absorb(page);
        Ok(())
    }

    /// Submit a stamping action and refresh state from the returned page.
    ///
    /// The CSRF token's key is the form field name, so the pair rides in
    /// the field list like any other entry. A stamp can itself surface
    /// [`PortalError::Unauthorized`] if the portal dropped the session.
    pub async fn record_stamp(&mut self, direction: StampDirection) -> Result<(), PortalError> {
        let csrf = self.csrf.clone().ok_or(PortalError::MissingCsrfToken)?;

        let body = self
            .post_form(&[
                ("module", "timerecorder"),
                ("action", "timerecorder"),
                (csrf.key.as_str(), csrf.value.as_str()),
                ("timerecorder_stamping_type", direction.form_value()),
            ])
            .await?;

        let page = parser::parse_page(&body)?;
        self.absorb(page);
        Ok(())
    }

    /// POST a form to the portal base URL and return the response body.
    ///
    /// Fields are an ordered slice, not a struct: the stamping form carries
    /// a dynamically-named CSRF field.
    async fn post_form(&self, fields: &[(&str, &str)]) -> Result<String, PortalError> {
        let response = self.client.post(&self.base_url).form(fields).send().await?;
        Ok(response.text().await?)
    }

    fn absorb(&mut self, page: ParsedPage) {
        self.csrf = page.csrf;
        self.start_time = page.start_time;
        self.leave_time = page.leave_time;
        self.state = page.state;
    }
}
