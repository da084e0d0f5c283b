use crate::RequestUser;

/// Opaque request handle passed to every permission check.
///
/// The handle is carried explicitly through serializer contexts; nothing in
/// the workspace stores it in process-wide state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    user: Option<RequestUser>,
}

impl RequestContext {
    /// Creates a request with no user attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a request made on behalf of `user`.
    #[must_use]
    pub fn for_user(user: RequestUser) -> Self {
        Self { user: Some(user) }
    }

    /// Creates a request carrying the anonymous user.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::for_user(RequestUser::anonymous())
    }

    /// Replaces the user attached to the request.
    #[must_use]
    pub fn with_user(mut self, user: Option<RequestUser>) -> Self {
        self.user = user;
        self
    }

    /// Returns the user attached to the request, if any.
    #[must_use]
    pub fn user(&self) -> Option<&RequestUser> {
        self.user.as_ref()
    }
}
