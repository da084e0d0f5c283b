use std::fmt;
use std::sync::Arc;

use fieldgate_core::{AppResult, RequestContext};
use tracing::trace;

/// Rule deciding whether a protected field may be shown for a request.
///
/// Both checks grant by default, so a rule that only cares about the request
/// grants every object-level check. Implementations must be side-effect free:
/// the aggregate check short-circuits and may skip later rules.
pub trait FieldPermission<T: ?Sized>: Send + Sync {
    /// Request-level check.
    fn has_permission(&self, _request: &RequestContext) -> AppResult<bool> {
        Ok(true)
    }

    /// Object-level check for the instance being rendered.
    ///
    /// `instance` is `None` when the caller asks for an instance-free check,
    /// e.g. `Serializer::scrubbed_fields(context, None)`.
    fn has_object_permission(
        &self,
        _request: &RequestContext,
        _instance: Option<&T>,
    ) -> AppResult<bool> {
        Ok(true)
    }
}

/// Grants every check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllowAny;

impl<T: ?Sized> FieldPermission<T> for AllowAny {}

/// Denies every check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllowNone;

impl<T: ?Sized> FieldPermission<T> for AllowNone {
    fn has_permission(&self, _request: &RequestContext) -> AppResult<bool> {
        Ok(false)
    }

    fn has_object_permission(
        &self,
        _request: &RequestContext,
        _instance: Option<&T>,
    ) -> AppResult<bool> {
        Ok(false)
    }
}

/// Grants when the request carries an authenticated user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsAuthenticated;

impl<T: ?Sized> FieldPermission<T> for IsAuthenticated {
    fn has_permission(&self, request: &RequestContext) -> AppResult<bool> {
        Ok(request.user().is_some_and(|user| user.is_authenticated()))
    }
}

/// Ordered predicates attached to one field or serializer.
///
/// An empty set grants everything. Cloning shares the predicates.
pub struct PermissionSet<T: ?Sized> {
    permissions: Vec<Arc<dyn FieldPermission<T>>>,
}

impl<T: ?Sized> PermissionSet<T> {
    /// Creates a set with no restrictions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            permissions: Vec::new(),
        }
    }

    /// Appends a predicate.
    #[must_use]
    pub fn with<P>(mut self, permission: P) -> Self
    where
        P: FieldPermission<T> + 'static,
    {
        self.permissions.push(Arc::new(permission));
        self
    }

    /// Appends a predicate instance shared with other sets.
    #[must_use]
    pub fn with_shared(mut self, permission: Arc<dyn FieldPermission<T>>) -> Self {
        self.permissions.push(permission);
        self
    }

    /// Returns the number of predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Returns whether the set is unrestricted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Iterates the predicates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn FieldPermission<T>>> {
        self.permissions.iter()
    }

    /// Returns whether every predicate grants both its request-level and
    /// object-level check.
    ///
    /// Evaluation stops at the first denial. Predicate errors propagate.
    pub fn check(&self, request: &RequestContext, instance: Option<&T>) -> AppResult<bool> {
        for (position, permission) in self.permissions.iter().enumerate() {
            let granted = permission.has_permission(request)?
                && permission.has_object_permission(request, instance)?;
            trace!(position, granted, "evaluated field permission");

            if !granted {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Returns whether every predicate grants its request-level check.
    ///
    /// Object-level checks are not evaluated. Used when there is no instance
    /// to check against.
    pub fn check_request(&self, request: &RequestContext) -> AppResult<bool> {
        for permission in &self.permissions {
            if !permission.has_permission(request)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

impl<T: ?Sized> Clone for PermissionSet<T> {
    fn clone(&self) -> Self {
        Self {
            permissions: self.permissions.clone(),
        }
    }
}

impl<T: ?Sized> Default for PermissionSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> fmt::Debug for PermissionSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PermissionSet")
            .field("len", &self.permissions.len())
            .finish()
    }
}
