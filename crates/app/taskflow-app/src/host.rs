//! Services the rendering host provides to the view-models.

use url::Url;

/// Transient notifications shown to the user.
pub trait Toaster: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);
}

/// Browser facilities the view-models need.
pub trait Browser: Send + Sync {
    /// Ask the user a yes/no question, blocking until answered.
    fn confirm(&self, message: &str) -> bool;

    /// Leave the page for `url`.
    fn navigate(&self, url: &Url);
}
