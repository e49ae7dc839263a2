#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// The underlying HTTP client could not be constructed.
    #[error("failed to construct portal HTTP client: {0}")]
    Init(#[source] reqwest::Error),

    /// Network or IO failure reaching the portal.
    #[error("portal request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The authentication marker was missing from the portal response.
    ///
    /// The portal answers 200 OK on failed logins too, so this is the only
    /// signal callers get that the credentials were likely rejected.
    #[error("unauthorized: authentication marker not found in portal response")]
    Unauthorized,

    /// A stamping action was attempted without a CSRF token from the
    /// previous page.
    #[error("no csrf token extracted from the previous portal page")]
    MissingCsrfToken,
}
