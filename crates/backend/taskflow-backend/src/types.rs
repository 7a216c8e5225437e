//! Auth protocol types: sessions, OAuth providers and auth-state events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use taskflow_core::{User, UserId};
use url::Url;

/// OAuth providers offered on the sign-in screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Github,
    Facebook,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 3] = [Self::Google, Self::Github, Self::Facebook];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Facebook => "facebook",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Github => "GitHub",
            Self::Facebook => "Facebook",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the browser must go to continue an OAuth sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthRedirect {
    pub provider: OAuthProvider,
    pub url: Url,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub additional: HashMap<String, serde_json::Value>,
}

/// The user object embedded in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
    pub created_at: DateTime<Utc>,
}

impl SessionUser {
    /// Identity record shown by the UI. The display name falls back to the email.
    pub fn to_user(&self) -> User {
        let email = self.email.clone().unwrap_or_default();
        let name = self
            .user_metadata
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| email.clone());

        User {
            id: self.id,
            email,
            name,
            avatar_url: self.user_metadata.avatar_url.clone(),
            created_at: self.created_at,
        }
    }
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Authenticated session as issued by the token endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: String,
    pub user: SessionUser,
}

impl Session {
    /// Fill in `expires_at` from `expires_in` when the server sent only the latter.
    pub fn stamp_expiry(mut self, received_at: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self
                .expires_in
                .map(|seconds| received_at.timestamp() + seconds);
        }
        self
    }

    /// Sessions without an expiry never expire client-side.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= now.timestamp())
    }

    pub fn user(&self) -> User {
        self.user.to_user()
    }

    /// Non-expiring session for `user`, as handed out by in-process backends.
    pub fn issue(user: &User, access_token: impl Into<String>) -> Self {
        let access_token = access_token.into();
        Self {
            refresh_token: format!("{access_token}-refresh"),
            access_token,
            token_type: default_token_type(),
            expires_in: None,
            expires_at: None,
            user: SessionUser {
                id: user.id,
                email: Some(user.email.clone()),
                user_metadata: UserMetadata {
                    full_name: Some(user.name.clone()),
                    avatar_url: user.avatar_url.clone(),
                    additional: HashMap::new(),
                },
                created_at: user.created_at,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Pushed to subscribers on every auth-state change.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub session: Option<Session>,
}

impl AuthEvent {
    pub fn signed_in(session: Session) -> Self {
        Self {
            kind: AuthEventKind::SignedIn,
            session: Some(session),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            kind: AuthEventKind::SignedOut,
            session: None,
        }
    }

    pub fn token_refreshed(session: Session) -> Self {
        Self {
            kind: AuthEventKind::TokenRefreshed,
            session: Some(session),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.session.as_ref().map(Session::user)
    }
}
