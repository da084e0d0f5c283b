use fieldgate_core::{AppResult, RequestContext};
use serde_json::Value;

use crate::{FieldKind, FieldSource, GuardedField, PermissionSet, RenderField, SerializerContext};

/// Field wrapper gated by an ordered permission set.
///
/// Rendering is delegated to the inner field unchanged; the wrapper only adds
/// [`GuardedField::check_permission`].
#[derive(Debug, Clone)]
pub struct PermissionField<T, F> {
    inner: F,
    permissions: PermissionSet<T>,
}

impl<T, F> PermissionField<T, F> {
    /// Wraps `inner` with `permissions`.
    #[must_use]
    pub fn new(inner: F, permissions: PermissionSet<T>) -> Self {
        Self { inner, permissions }
    }

    /// Returns the declared permissions.
    #[must_use]
    pub fn permission_set(&self) -> &PermissionSet<T> {
        &self.permissions
    }

    /// Returns the wrapped field.
    #[must_use]
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Returns whether every declared predicate grants access.
    pub fn check_permission(
        &self,
        request: &RequestContext,
        instance: Option<&T>,
    ) -> AppResult<bool> {
        self.permissions.check(request, instance)
    }
}

impl<T, F> RenderField<T> for PermissionField<T, F>
where
    F: RenderField<T>,
{
    fn kind(&self) -> FieldKind {
        self.inner.kind()
    }

    fn bind(&mut self, field_name: &str) {
        self.inner.bind(field_name);
    }

    fn is_write_only(&self) -> bool {
        self.inner.is_write_only()
    }

    fn to_representation(
        &self,
        source: &FieldSource<'_, T>,
        context: &SerializerContext,
    ) -> AppResult<Value> {
        self.inner.to_representation(source, context)
    }
}

impl<T, F> GuardedField<T> for PermissionField<T, F>
where
    F: RenderField<T>,
{
    fn check_permission(
        &self,
        request: &RequestContext,
        instance: Option<&T>,
    ) -> AppResult<bool> {
        PermissionField::check_permission(self, request, instance)
    }
}

#[cfg(test)]
mod tests {
    use fieldgate_core::{RequestContext, RequestUser};

    use crate::{AllowAny, AllowNone, Field, IsAuthenticated, PermissionSet};

    #[test]
    fn field_without_permissions_always_grants() {
        let field = Field::boolean().permissions(PermissionSet::<()>::empty());
        assert!(field.permission_set().is_empty());
        assert!(matches!(
            field.check_permission(&RequestContext::new(), None),
            Ok(true)
        ));
    }

    #[test]
    fn permission_assignment_keeps_declared_predicates() {
        let field = Field::boolean().permissions(
            PermissionSet::<()>::empty().with(AllowAny).with(AllowNone),
        );
        assert_eq!(field.permission_set().len(), 2);
    }

    #[test]
    fn single_permission_checks() {
        let allowed = Field::boolean().permissions(PermissionSet::<()>::empty().with(AllowAny));
        assert!(matches!(
            allowed.check_permission(&RequestContext::new(), None),
            Ok(true)
        ));

        let denied = Field::boolean().permissions(PermissionSet::<()>::empty().with(AllowNone));
        assert!(matches!(
            denied.check_permission(&RequestContext::new(), None),
            Ok(false)
        ));

        let authenticated =
            Field::boolean().permissions(PermissionSet::<()>::empty().with(IsAuthenticated));
        let signed_in = RequestContext::for_user(RequestUser::authenticated("bob", "Bob", None));
        assert!(matches!(
            authenticated.check_permission(&signed_in, None),
            Ok(true)
        ));
        assert!(matches!(
            authenticated.check_permission(&RequestContext::anonymous(), None),
            Ok(false)
        ));
    }

    #[test]
    fn check_is_repeatable() {
        let field = Field::char().permissions(PermissionSet::<()>::empty().with(AllowNone));
        let request = RequestContext::new();
        for _ in 0..3 {
            assert!(matches!(field.check_permission(&request, None), Ok(false)));
        }
    }
}
