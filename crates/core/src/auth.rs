use serde::{Deserialize, Serialize};

/// User handle attached to an inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestUser {
    username: String,
    display_name: String,
    email: Option<String>,
    is_authenticated: bool,
}

impl RequestUser {
    /// Creates an authenticated user from identity provider data.
    #[must_use]
    pub fn authenticated(
        username: impl Into<String>,
        display_name: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            username: username.into(),
            display_name: display_name.into(),
            email,
            is_authenticated: true,
        }
    }

    /// Creates the anonymous user used for requests without credentials.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            username: String::new(),
            display_name: "Anonymous".to_owned(),
            email: None,
            is_authenticated: false,
        }
    }

    /// Returns the username. Empty for anonymous users.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns whether the user passed authentication.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }
}
