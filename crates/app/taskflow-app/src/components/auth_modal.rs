use crate::App;
use crate::app::SIGN_IN_FAILED;
use taskflow_backend::OAuthProvider;

/// Provider picker shown to signed-out users.
pub struct AuthModal {
    app: App,
    open: bool,
}

impl AuthModal {
    pub fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn providers(&self) -> [OAuthProvider; 3] {
        OAuthProvider::ALL
    }

    pub fn button_label(provider: OAuthProvider) -> String {
        format!("Continue with {}", provider.label())
    }

    /// Start the redirect to `provider` and send the browser there.
    pub async fn sign_in(&mut self, provider: OAuthProvider) {
        match self.app.auth().sign_in(provider).await {
            Ok(redirect) => {
                self.app
                    .toaster()
                    .success(&format!("Signing in with {provider}..."));
                self.app.browser().navigate(&redirect.url);
            }
            Err(_) => self.app.toaster().error(SIGN_IN_FAILED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, Toast};

    #[tokio::test]
    async fn test_sign_in_navigates_to_provider() {
        let harness = Harness::with_rows(Vec::new()).await;
        let mut modal = AuthModal::new(&harness.app);
        modal.open();

        modal.sign_in(OAuthProvider::Github).await;

        assert_eq!(
            harness.toaster.toasts(),
            vec![Toast::Success("Signing in with github...".to_string())]
        );
        let visited = harness.browser.visited.lock().unwrap().clone();
        assert_eq!(visited.len(), 1);
        assert!(visited[0].as_str().contains("provider=github"));
    }

    #[tokio::test]
    async fn test_sign_in_failure_toasts() {
        let harness = Harness::with_rows(Vec::new()).await;
        harness.auth_api.set_failing(true);
        let mut modal = AuthModal::new(&harness.app);

        modal.sign_in(OAuthProvider::Google).await;

        assert_eq!(
            harness.toaster.toasts(),
            vec![Toast::Error(SIGN_IN_FAILED.to_string())]
        );
        assert!(harness.browser.visited.lock().unwrap().is_empty());
    }

    #[test]
    fn test_button_labels() {
        assert_eq!(
            AuthModal::button_label(OAuthProvider::Github),
            "Continue with GitHub"
        );
    }
}
