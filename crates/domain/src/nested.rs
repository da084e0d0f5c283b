use std::fmt;
use std::sync::Arc;

use fieldgate_core::{AppResult, RequestContext};
use serde::Serialize;
use serde_json::Value;

use crate::{
    FieldBinding, FieldEntry, FieldKind, FieldSource, GuardedField, IntoFieldEntry,
    ListSerializer, RenderField, Serializer, SerializerContext,
};

type OneAccessor<P, C> = dyn Fn(&P) -> Option<&C> + Send + Sync;
type ManyAccessor<P, C> = dyn Fn(&P) -> &[C] + Send + Sync;

/// Serializer of `C` rendered as one field of `P`.
///
/// Gated by the nested serializer's own permissions, checked against the
/// nested instance. A missing nested instance runs request-level checks only.
pub struct NestedField<P, C> {
    serializer: Serializer<C>,
    accessor: Arc<OneAccessor<P, C>>,
}

impl<P, C> NestedField<P, C> {
    /// Creates a nested field rendering `serializer` for `accessor(parent)`.
    #[must_use]
    pub fn new<A>(serializer: Serializer<C>, accessor: A) -> Self
    where
        A: Fn(&P) -> Option<&C> + Send + Sync + 'static,
    {
        Self {
            serializer,
            accessor: Arc::new(accessor),
        }
    }

    /// Returns the nested serializer.
    #[must_use]
    pub fn serializer(&self) -> &Serializer<C> {
        &self.serializer
    }
}

impl<P, C> fmt::Debug for NestedField<P, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NestedField")
            .field("serializer", &self.serializer)
            .finish_non_exhaustive()
    }
}

impl<P, C: Serialize> RenderField<P> for NestedField<P, C> {
    fn kind(&self) -> FieldKind {
        FieldKind::Nested
    }

    fn to_representation(
        &self,
        source: &FieldSource<'_, P>,
        context: &SerializerContext,
    ) -> AppResult<Value> {
        match (self.accessor)(source.instance()) {
            Some(child) => self
                .serializer
                .to_representation(child, context)
                .map(Value::Object),
            None => Ok(Value::Null),
        }
    }
}

impl<P, C: Serialize> GuardedField<P> for NestedField<P, C> {
    fn check_permission(
        &self,
        request: &RequestContext,
        instance: Option<&P>,
    ) -> AppResult<bool> {
        match instance.and_then(|parent| (self.accessor)(parent)) {
            Some(child) => self.serializer.check_permission(request, Some(child)),
            None => self.serializer.permission_set().check_request(request),
        }
    }
}

impl<P, C> IntoFieldEntry<P> for NestedField<P, C>
where
    P: 'static,
    C: Serialize + 'static,
{
    fn into_entry(mut self, binding: FieldBinding<'_>) -> FieldEntry<P> {
        self.serializer.bind_path(format!(
            "{}.{}",
            binding.serializer_path, binding.field_name
        ));
        FieldEntry::Guarded(Arc::new(self))
    }
}

/// List serializer of `C` rendered as one field of `P`.
///
/// The field is shown only when every element passes the element check for
/// itself. Every element is then rendered and scrubbed against itself.
pub struct NestedListField<P, C> {
    list: ListSerializer<C>,
    accessor: Arc<ManyAccessor<P, C>>,
}

impl<P, C> NestedListField<P, C> {
    /// Creates a nested list field rendering `list` for `accessor(parent)`.
    #[must_use]
    pub fn new<A>(list: ListSerializer<C>, accessor: A) -> Self
    where
        A: Fn(&P) -> &[C] + Send + Sync + 'static,
    {
        Self {
            list,
            accessor: Arc::new(accessor),
        }
    }

    /// Returns the nested list serializer.
    #[must_use]
    pub fn list(&self) -> &ListSerializer<C> {
        &self.list
    }
}

impl<P, C> fmt::Debug for NestedListField<P, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NestedListField")
            .field("list", &self.list)
            .finish_non_exhaustive()
    }
}

impl<P, C: Serialize> RenderField<P> for NestedListField<P, C> {
    fn kind(&self) -> FieldKind {
        FieldKind::NestedList
    }

    fn to_representation(
        &self,
        source: &FieldSource<'_, P>,
        context: &SerializerContext,
    ) -> AppResult<Value> {
        let items = (self.accessor)(source.instance());
        self.list
            .to_representation(items, context)
            .map(Value::Array)
    }
}

impl<P, C: Serialize> GuardedField<P> for NestedListField<P, C> {
    fn check_permission(
        &self,
        request: &RequestContext,
        instance: Option<&P>,
    ) -> AppResult<bool> {
        match instance {
            Some(parent) => self.list.check_collection(request, (self.accessor)(parent)),
            None => self.list.permission_set().check_request(request),
        }
    }
}

impl<P, C> IntoFieldEntry<P> for NestedListField<P, C>
where
    P: 'static,
    C: Serialize + 'static,
{
    fn into_entry(mut self, binding: FieldBinding<'_>) -> FieldEntry<P> {
        self.list.bind_path(format!(
            "{}.{}[]",
            binding.serializer_path, binding.field_name
        ));
        FieldEntry::Guarded(Arc::new(self))
    }
}
