//! Pattern-based extraction of attendance data from raw portal HTML.
//!
//! The portal exposes no structured API and returns 200 OK even when
//! authentication fails, so everything here keys off fixed markup fragments.
//! An unmatched pattern means "field absent", never a parse failure; only
//! the missing authentication marker is fatal.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::PortalError;

/// Substring rendered only for an authenticated user. This, not the HTTP
/// status, is the authentication signal.
const AUTHORIZED_MARKER: &str = r#"<div class="user_name">"#;

/// CSRF field embedded in every authenticated page. The field name itself
/// is dynamic (`__sectag_<hex>`), so both name and value are captured.
static CSRF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"name="(__sectag_[0-9a-f]+)" value="([0-9a-f]+)""#).expect("valid regex")
});

/// Arrival stamp: `>出社<br />(09:00)`, slash optional.
static START_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">出社<br\s*/?>\((\d{2}:\d{2})\)").expect("valid regex"));

/// Departure stamp: `>退社<br />(18:00)`, slash optional.
static LEAVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">退社<br\s*/?>\((\d{2}:\d{2})\)").expect("valid regex"));

/// Attendance state derived from which stamp times appear on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceState {
    /// Not clocked in today.
    Off,
    /// Clocked in, not yet clocked out.
    On,
    /// Clocked in and out; no further stamping today.
    End,
    /// Departure time without an arrival time. Anomalous; also the
    /// pre-login sentinel.
    Unknown,
}

impl AttendanceState {
    /// Truth table over stamp-time presence.
    ///
    /// The (absent, present) combination has no legitimate portal
    /// rendering; it is reported as-is rather than coerced to a
    /// neighbouring state.
    pub fn derive(start_present: bool, leave_present: bool) -> Self {
        match (start_present, leave_present) {
            (false, false) => AttendanceState::Off,
            (true, false) => AttendanceState::On,
            (true, true) => AttendanceState::End,
            (false, true) => AttendanceState::Unknown,
        }
    }
}

/// CSRF token pair scraped from a page.
///
/// The portal names the form field dynamically, so the key is part of the
/// token: the stamping form must send `key=value`, not a fixed field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken {
    pub key: String,
    pub value: String,
}

/// Everything extracted from one portal page.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub csrf: Option<CsrfToken>,
    pub start_time: Option<String>,
    pub leave_time: Option<String>,
    pub state: AttendanceState,
}

/// Parse one portal response body.
///
/// Fails only when the authentication marker is missing. A page without a
/// CSRF token still parses (warn-logged); the caller fails later if it
/// tries to stamp without one.
pub fn parse_page(body: &str) -> Result<ParsedPage, PortalError> {
    if !body.contains(AUTHORIZED_MARKER) {
        return Err(PortalError::Unauthorized);
    }

    let csrf = CSRF_RE.captures(body).map(|caps| CsrfToken {
        key: caps[1].to_string(),
        value: caps[2].to_string(),
    });
    if csrf.is_none() {
        tracing::warn!("csrf token not found in portal response");
    }

    let start_time = START_TIME_RE.captures(body).map(|caps| caps[1].to_string());
    let leave_time = LEAVE_TIME_RE.captures(body).map(|caps| caps[1].to_string());

    let state = AttendanceState::derive(start_time.is_some(), leave_time.is_some());
    if state == AttendanceState::Unknown {
        tracing::warn!("anomalous attendance state: departure time present without arrival time");
    }

    Ok(ParsedPage {
        csrf,
        start_time,
        leave_time,
        state,
    })
}
