use std::fmt;
use std::sync::Arc;

use fieldgate_core::AppResult;
use serde_json::Value;

use crate::{FieldKind, FieldSource, PermissionField, PermissionSet, RenderField, SerializerContext};

type MethodFn<T> = dyn Fn(&T, &SerializerContext) -> AppResult<Value> + Send + Sync;

/// Computed field backed by a closure over the instance.
pub struct MethodField<T> {
    method: Arc<MethodFn<T>>,
}

impl<T> MethodField<T> {
    /// Creates a field rendering `method(instance, context)`.
    #[must_use]
    pub fn new<M>(method: M) -> Self
    where
        M: Fn(&T, &SerializerContext) -> AppResult<Value> + Send + Sync + 'static,
    {
        Self {
            method: Arc::new(method),
        }
    }

    /// Makes the field permission-capable.
    #[must_use]
    pub fn permissions(self, permissions: PermissionSet<T>) -> PermissionField<T, Self> {
        PermissionField::new(self, permissions)
    }
}

impl<T> Clone for MethodField<T> {
    fn clone(&self) -> Self {
        Self {
            method: Arc::clone(&self.method),
        }
    }
}

impl<T> fmt::Debug for MethodField<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("MethodField").finish_non_exhaustive()
    }
}

impl<T> RenderField<T> for MethodField<T> {
    fn kind(&self) -> FieldKind {
        FieldKind::SerializerMethod
    }

    fn to_representation(
        &self,
        source: &FieldSource<'_, T>,
        context: &SerializerContext,
    ) -> AppResult<Value> {
        (self.method)(source.instance(), context)
    }
}
