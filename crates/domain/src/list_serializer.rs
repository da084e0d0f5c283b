use std::fmt;

use fieldgate_core::{AppResult, RequestContext};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{NestedListField, PermissionSet, Serializer, SerializerContext};

/// Collection-level options forwarded when a serializer is wrapped with
/// [`Serializer::many`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Whether an empty collection is acceptable.
    pub allow_empty: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self { allow_empty: true }
    }
}

/// Serializer for a collection of `T`, gated exactly like its element
/// serializer.
pub struct ListSerializer<T> {
    child: Serializer<T>,
    permissions: PermissionSet<T>,
    allow_empty: bool,
}

impl<T> ListSerializer<T> {
    /// Takes ownership of `child` and binds it as the element serializer.
    #[must_use]
    pub fn new(mut child: Serializer<T>, options: ListOptions) -> Self {
        let permissions = child.permission_set().clone();
        let element_path = format!("{}[]", child.path());
        child.bind_path(element_path);

        Self {
            child,
            permissions,
            allow_empty: options.allow_empty,
        }
    }

    /// Returns the element serializer.
    #[must_use]
    pub fn child(&self) -> &Serializer<T> {
        &self.child
    }

    /// Returns the permissions copied from the element serializer.
    #[must_use]
    pub fn permission_set(&self) -> &PermissionSet<T> {
        &self.permissions
    }

    /// Returns whether an empty collection is acceptable.
    #[must_use]
    pub fn allow_empty(&self) -> bool {
        self.allow_empty
    }

    /// Aggregate check, identical to the element serializer's.
    pub fn check_permission(
        &self,
        request: &RequestContext,
        instance: Option<&T>,
    ) -> AppResult<bool> {
        self.permissions.check(request, instance)
    }

    /// Gate used when the list is a field of a parent.
    ///
    /// Every element must pass the element check for itself. An empty
    /// collection has no instance to check, so only request-level checks run.
    pub fn check_collection(&self, request: &RequestContext, instances: &[T]) -> AppResult<bool> {
        if instances.is_empty() {
            return self.permissions.check_request(request);
        }

        for instance in instances {
            if !self.permissions.check(request, Some(instance))? {
                debug!(
                    serializer = self.child.path(),
                    "list element denied by permission check"
                );
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Uses the list as a field of `P`, rendering `accessor(parent)`.
    #[must_use]
    pub fn nested<P, A>(self, accessor: A) -> NestedListField<P, T>
    where
        A: Fn(&P) -> &[T] + Send + Sync + 'static,
    {
        NestedListField::new(self, accessor)
    }

    pub(crate) fn bind_path(&mut self, path: impl Into<String>) {
        self.child.bind_path(path);
    }
}

impl<T> fmt::Debug for ListSerializer<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ListSerializer")
            .field("child", &self.child)
            .field("allow_empty", &self.allow_empty)
            .finish()
    }
}

impl<T: Serialize> ListSerializer<T> {
    /// Renders every element, each scrubbed against its own instance.
    pub fn to_representation(
        &self,
        instances: &[T],
        context: &SerializerContext,
    ) -> AppResult<Vec<Value>> {
        context.require_request()?;

        instances
            .iter()
            .map(|instance| {
                self.child
                    .to_representation(instance, context)
                    .map(Value::Object)
            })
            .collect()
    }
}
