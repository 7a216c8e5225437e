use crate::App;
use crate::components::AuthModal;
use taskflow_core::{FilterPatch, User};

const SIGN_OUT_FAILED: &str = "Failed to sign out. Please try again.";

/// Top bar: search box, the signed-in user and the sign-in/out actions.
pub struct Header {
    app: App,
    search_term: String,
    auth_modal: AuthModal,
}

impl Header {
    pub fn new(app: &App) -> Self {
        Self {
            app: app.clone(),
            search_term: app.tasks().filters().search.unwrap_or_default(),
            auth_modal: AuthModal::new(app),
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Every keystroke narrows the task list by title.
    pub fn set_search(&mut self, value: impl Into<String>) {
        self.search_term = value.into();
        self.app
            .tasks()
            .set_filters(FilterPatch::new().search(self.search_term.clone()));
    }

    pub fn user(&self) -> Option<User> {
        self.app.auth().user()
    }

    pub fn auth_modal(&self) -> &AuthModal {
        &self.auth_modal
    }

    pub fn auth_modal_mut(&mut self) -> &mut AuthModal {
        &mut self.auth_modal
    }

    pub fn open_sign_in(&mut self) {
        self.auth_modal.open();
    }

    pub async fn sign_out(&self) {
        if self.app.auth().sign_out().await.is_err() {
            self.app.toaster().error(SIGN_OUT_FAILED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, Toast, task};
    use taskflow_backend::Session;
    use taskflow_core::TaskStatus;

    #[tokio::test]
    async fn test_search_updates_filters() {
        let harness = Harness::with_rows(vec![
            task("Write report", TaskStatus::Pending, "work"),
            task("Buy milk", TaskStatus::Pending, "home"),
        ])
        .await;
        let mut header = Header::new(&harness.app);

        header.set_search("MILK");
        assert_eq!(header.search_term(), "MILK");
        assert_eq!(harness.app.tasks().filtered_tasks().len(), 1);

        header.set_search("");
        assert_eq!(harness.app.tasks().filtered_tasks().len(), 2);
    }

    #[tokio::test]
    async fn test_search_term_starts_from_filters() {
        let harness = Harness::with_rows(Vec::new()).await;
        harness
            .app
            .tasks()
            .set_filters(FilterPatch::new().search("draft"));
        assert_eq!(Header::new(&harness.app).search_term(), "draft");
    }

    #[tokio::test]
    async fn test_sign_out_failure_keeps_user() {
        let harness = Harness::with_rows(Vec::new()).await;
        let user = User {
            id: uuid::Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            avatar_url: None,
            created_at: chrono::Utc::now(),
        };
        harness
            .auth_api
            .grant_code("c", Session::issue(&user, "t"))
            .await;
        harness.app.auth().complete_sign_in("c").await.unwrap();

        let mut header = Header::new(&harness.app);
        header.open_sign_in();
        assert!(header.auth_modal().is_open());

        harness.auth_api.set_failing(true);
        header.sign_out().await;
        assert_eq!(header.user(), Some(user));
        assert_eq!(
            harness.toaster.toasts(),
            vec![Toast::Error(SIGN_OUT_FAILED.to_string())]
        );

        harness.auth_api.set_failing(false);
        header.sign_out().await;
        assert_eq!(header.user(), None);
    }
}
