use std::collections::HashSet;
use std::fmt;

use fieldgate_core::{AppError, AppResult, NonEmptyString, RequestContext};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    FieldBinding, FieldEntry, FieldMapping, FieldSource, IntoFieldEntry, ListOptions,
    ListSerializer, NestedField, PermissionSet,
};

/// Per-render context handed to every serializer and field.
#[derive(Debug, Clone, Default)]
pub struct SerializerContext {
    request: Option<RequestContext>,
}

impl SerializerContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context carrying `request`.
    #[must_use]
    pub fn with_request(request: RequestContext) -> Self {
        Self {
            request: Some(request),
        }
    }

    /// Returns the request, if one was supplied.
    #[must_use]
    pub fn request(&self) -> Option<&RequestContext> {
        self.request.as_ref()
    }

    /// Returns the request or fails with a configuration error.
    pub fn require_request(&self) -> AppResult<&RequestContext> {
        self.request.as_ref().ok_or_else(|| {
            AppError::Configuration(
                "serializer context has no request; build it with \
                 SerializerContext::with_request before rendering permission-checked fields"
                    .to_owned(),
            )
        })
    }
}

/// Declared set of output fields for instances of `T`.
pub struct Serializer<T> {
    name: NonEmptyString,
    path: String,
    declared: Vec<(String, FieldEntry<T>)>,
    permissions: PermissionSet<T>,
}

impl<T> Serializer<T> {
    /// Starts declaring a serializer named `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SerializerBuilder<T> {
        SerializerBuilder {
            name: name.into(),
            fields: Vec::new(),
            permissions: PermissionSet::empty(),
        }
    }

    /// Returns the serializer name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the path of this serializer inside its parent graph.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Returns the permissions gating this serializer when used as a field.
    #[must_use]
    pub fn permission_set(&self) -> &PermissionSet<T> {
        &self.permissions
    }

    /// Aggregate check of the serializer-level permissions.
    pub fn check_permission(
        &self,
        request: &RequestContext,
        instance: Option<&T>,
    ) -> AppResult<bool> {
        self.permissions.check(request, instance)
    }

    /// Returns a fresh mapping of every declared field.
    #[must_use]
    pub fn fields(&self) -> FieldMapping<T> {
        FieldMapping::new(self.declared.clone())
    }

    /// Returns the declared fields minus every guarded field denied for the
    /// context's request and `instance`.
    pub fn scrubbed_fields(
        &self,
        context: &SerializerContext,
        instance: Option<&T>,
    ) -> AppResult<FieldMapping<T>> {
        let request = context.require_request()?;
        let mut fields = self.fields();
        let removed = fields.scrub(request, instance)?;

        if !removed.is_empty() {
            debug!(
                serializer = self.path(),
                removed = removed.len(),
                "scrubbed serializer fields"
            );
        }

        Ok(fields)
    }

    /// Wraps the serializer into a list serializer.
    #[must_use]
    pub fn many(self, options: ListOptions) -> ListSerializer<T> {
        ListSerializer::new(self, options)
    }

    /// Uses the serializer as a field of `P`, rendering `accessor(parent)`.
    #[must_use]
    pub fn nested<P, A>(self, accessor: A) -> NestedField<P, T>
    where
        A: Fn(&P) -> Option<&T> + Send + Sync + 'static,
    {
        NestedField::new(self, accessor)
    }

    pub(crate) fn bind_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }
}

impl<T: Serialize> Serializer<T> {
    /// Renders `instance` into an ordered JSON object.
    ///
    /// The field mapping is scrubbed against `instance` first, so denied
    /// fields are absent from the output rather than null.
    pub fn to_representation(
        &self,
        instance: &T,
        context: &SerializerContext,
    ) -> AppResult<Map<String, Value>> {
        let attributes = serde_json::to_value(instance).map_err(|error| {
            AppError::Internal(format!(
                "failed to serialize instance for '{}': {error}",
                self.path()
            ))
        })?;
        let fields = self.scrubbed_fields(context, Some(instance))?;
        let source = FieldSource::new(instance, &attributes);

        let mut representation = Map::with_capacity(fields.len());
        for (name, field) in fields.iter() {
            if field.is_write_only() {
                continue;
            }

            representation.insert(name.to_owned(), field.to_representation(&source, context)?);
        }

        Ok(representation)
    }
}

impl<T> fmt::Debug for Serializer<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Serializer")
            .field("name", &self.name)
            .field("path", &self.path)
            .field(
                "fields",
                &self.declared.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("permissions", &self.permissions)
            .finish()
    }
}

/// Builder collecting field declarations for a [`Serializer`].
pub struct SerializerBuilder<T> {
    name: String,
    fields: Vec<(String, FieldEntry<T>)>,
    permissions: PermissionSet<T>,
}

impl<T> SerializerBuilder<T> {
    /// Declares a field. Declaration order is output order.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field: impl IntoFieldEntry<T>) -> Self {
        let name = name.into();
        let entry = field.into_entry(FieldBinding {
            serializer_path: self.name.as_str(),
            field_name: name.as_str(),
        });
        self.fields.push((name, entry));
        self
    }

    /// Sets the permissions gating the serializer when used as a field.
    #[must_use]
    pub fn permissions(mut self, permissions: PermissionSet<T>) -> Self {
        self.permissions = permissions;
        self
    }

    /// Validates the declarations and builds the serializer.
    pub fn build(self) -> AppResult<Serializer<T>> {
        let name = NonEmptyString::new(self.name)?;
        validate_field_names(&name, &self.fields)?;

        Ok(Serializer {
            path: name.as_str().to_owned(),
            name,
            declared: self.fields,
            permissions: self.permissions,
        })
    }
}

fn validate_field_names<T>(
    name: &NonEmptyString,
    fields: &[(String, FieldEntry<T>)],
) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(fields.len());
    for (field_name, _) in fields {
        if field_name.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "serializer '{name}' declares a field with an empty name"
            )));
        }

        if !seen.insert(field_name.as_str()) {
            return Err(AppError::Validation(format!(
                "serializer '{name}' declares field '{field_name}' more than once"
            )));
        }
    }

    Ok(())
}
