use fieldgate_core::{AppError, AppResult, RequestContext};
use serde_json::Value;

use crate::field_kind::{FieldKind, RenderOptions, render_primitive};
use crate::{PermissionField, PermissionSet, SerializerContext};

/// Source passed to a field while one instance is rendered.
#[derive(Debug, Clone, Copy)]
pub struct FieldSource<'a, T> {
    instance: &'a T,
    attributes: &'a Value,
}

impl<'a, T> FieldSource<'a, T> {
    /// Creates a source from a typed instance and its serialized attributes.
    #[must_use]
    pub fn new(instance: &'a T, attributes: &'a Value) -> Self {
        Self {
            instance,
            attributes,
        }
    }

    /// Returns the typed instance.
    #[must_use]
    pub fn instance(&self) -> &'a T {
        self.instance
    }

    /// Returns the instance serialized as JSON.
    #[must_use]
    pub fn attributes(&self) -> &'a Value {
        self.attributes
    }

    /// Resolves a dotted attribute path. `*` resolves to the whole instance.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&'a Value> {
        if path == "*" {
            return Some(self.attributes);
        }

        path.split('.')
            .try_fold(self.attributes, |current, segment| current.get(segment))
    }
}

/// Output field behaviour owned by the serializer layer.
pub trait RenderField<T>: Send + Sync {
    /// Returns the field kind.
    fn kind(&self) -> FieldKind;

    /// Attaches the field to its declared name.
    fn bind(&mut self, _field_name: &str) {}

    /// Returns whether the field is excluded from rendered output.
    fn is_write_only(&self) -> bool {
        false
    }

    /// Renders the field for one instance.
    fn to_representation(
        &self,
        source: &FieldSource<'_, T>,
        context: &SerializerContext,
    ) -> AppResult<Value>;
}

/// Field that answers whether it may be rendered for a request.
pub trait GuardedField<T>: RenderField<T> {
    /// Aggregate permission check for `request` and `instance`.
    fn check_permission(&self, request: &RequestContext, instance: Option<&T>)
    -> AppResult<bool>;
}

/// Primitive field reading one attribute of the serialized instance.
#[derive(Debug, Clone)]
pub struct Field {
    kind: FieldKind,
    source: Option<String>,
    write_only: bool,
    options: RenderOptions,
    child: Option<Box<Field>>,
}

macro_rules! field_constructors {
    ($($(#[$doc:meta])* $name:ident => $kind:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $name() -> Self {
                Self::of(FieldKind::$kind)
            }
        )*
    };
}

impl Field {
    /// Creates a field of the given kind.
    #[must_use]
    pub fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            source: None,
            write_only: matches!(kind, FieldKind::Hidden),
            options: RenderOptions::default(),
            child: None,
        }
    }

    field_constructors! {
        /// Boolean field.
        boolean => Boolean,
        /// Tri-state boolean field.
        null_boolean => NullBoolean,
        /// Text field.
        char => Char,
        /// Email field.
        email => Email,
        /// Pattern-constrained text field.
        regex => Regex,
        /// Slug field.
        slug => Slug,
        /// URL field.
        url => Url,
        /// Integer field.
        integer => Integer,
        /// Float field.
        float => Float,
        /// Date field.
        date => Date,
        /// Date-time field.
        date_time => DateTime,
        /// Time field.
        time => Time,
        /// Single-choice field.
        choice => Choice,
        /// Multi-choice field.
        multiple_choice => MultipleChoice,
        /// File field.
        file => File,
        /// Image field.
        image => Image,
        /// Read-only passthrough field.
        read_only => ReadOnly,
        /// Hidden write-only field.
        hidden => Hidden,
        /// Opaque model field.
        model => Model,
    }

    /// Decimal field quantized to `decimal_places`.
    #[must_use]
    pub fn decimal(decimal_places: u32) -> Self {
        let mut field = Self::of(FieldKind::Decimal);
        field.options.decimal_places = Some(decimal_places);
        field
    }

    /// List field rendering every element with `child`.
    #[must_use]
    pub fn list(child: Field) -> Self {
        let mut field = Self::of(FieldKind::List);
        field.child = Some(Box::new(child));
        field
    }

    /// List field rendering elements unchanged.
    #[must_use]
    pub fn list_of_any() -> Self {
        Self::of(FieldKind::List)
    }

    /// Reads the value from `source` instead of the field name.
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Renders temporal values with a `chrono` format string.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.options.format = Some(format.into());
        self
    }

    /// Renders decimals as numbers when `false`.
    #[must_use]
    pub fn coerce_to_string(mut self, coerce: bool) -> Self {
        self.options.coerce_to_string = Some(coerce);
        self
    }

    /// Excludes the field from rendered output.
    #[must_use]
    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    /// Makes the field permission-capable.
    #[must_use]
    pub fn permissions<T>(self, permissions: PermissionSet<T>) -> PermissionField<T, Self> {
        PermissionField::new(self, permissions)
    }

    /// Returns the attribute path the field reads from, once bound.
    #[must_use]
    pub fn source_path(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn render_value(&self, value: &Value) -> AppResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match (self.kind, &self.child, value) {
            (FieldKind::List, Some(child), Value::Array(items)) => items
                .iter()
                .map(|item| child.render_value(item))
                .collect::<AppResult<Vec<_>>>()
                .map(Value::Array),
            (FieldKind::List, _, Value::Array(_)) => Ok(value.clone()),
            (FieldKind::List, _, _) => Err(AppError::Validation(format!(
                "value '{value}' cannot be rendered as field kind 'list'"
            ))),
            _ => render_primitive(self.kind, value, &self.options),
        }
    }
}

impl<T> RenderField<T> for Field {
    fn kind(&self) -> FieldKind {
        self.kind
    }

    fn bind(&mut self, field_name: &str) {
        if self.source.is_none() {
            self.source = Some(field_name.to_owned());
        }
    }

    fn is_write_only(&self) -> bool {
        self.write_only
    }

    fn to_representation(
        &self,
        source: &FieldSource<'_, T>,
        _context: &SerializerContext,
    ) -> AppResult<Value> {
        let path = self.source.as_deref().ok_or_else(|| {
            AppError::Configuration("field was rendered before being bound".to_owned())
        })?;
        let value = source.lookup(path).ok_or_else(|| {
            AppError::Configuration(format!("instance has no attribute '{path}'"))
        })?;

        self.render_value(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{Field, FieldSource, RenderField};
    use crate::{FieldKind, SerializerContext};

    fn render(field: &Field, attributes: &Value) -> Option<Value> {
        let source = FieldSource::new(&(), attributes);
        RenderField::<()>::to_representation(field, &source, &SerializerContext::new()).ok()
    }

    #[test]
    fn binding_defaults_source_to_field_name() {
        let mut field = Field::char();
        RenderField::<()>::bind(&mut field, "title");
        assert_eq!(field.source_path(), Some("title"));

        let mut explicit = Field::char().source("owner.username");
        RenderField::<()>::bind(&mut explicit, "owner");
        assert_eq!(explicit.source_path(), Some("owner.username"));
    }

    #[test]
    fn dotted_source_walks_nested_objects() {
        let field = Field::char().source("owner.username");
        let attributes = json!({"owner": {"username": "alice"}});
        assert_eq!(render(&field, &attributes), Some(json!("alice")));
    }

    #[test]
    fn star_source_passes_whole_instance() {
        let field = Field::read_only().source("*");
        let attributes = json!({"a": 1});
        assert_eq!(render(&field, &attributes), Some(json!({"a": 1})));
    }

    #[test]
    fn null_attribute_renders_null() {
        let field = Field::integer().source("count");
        assert_eq!(render(&field, &json!({"count": null})), Some(Value::Null));
    }

    #[test]
    fn missing_attribute_is_a_configuration_error() {
        let field = Field::integer().source("count");
        let attributes = json!({});
        let source = FieldSource::new(&(), &attributes);
        let result =
            RenderField::<()>::to_representation(&field, &source, &SerializerContext::new());
        assert!(matches!(result, Err(fieldgate_core::AppError::Configuration(_))));
    }

    #[test]
    fn list_renders_each_element_with_child() {
        let field = Field::list(Field::integer()).source("scores");
        assert_eq!(
            render(&field, &json!({"scores": ["1", 2]})),
            Some(json!([1, 2]))
        );
    }

    #[test]
    fn hidden_fields_are_write_only() {
        let field = Field::hidden();
        assert_eq!(RenderField::<()>::kind(&field), FieldKind::Hidden);
        assert!(RenderField::<()>::is_write_only(&field));
    }
}
