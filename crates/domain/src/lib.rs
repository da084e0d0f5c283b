//! Field-level permission checks for API serializers.
//!
//! Fields declared on a [`Serializer`] may carry a [`PermissionSet`]. Every
//! render computes a fresh [`FieldMapping`], removes each guarded field whose
//! aggregate check fails for the current request and instance, and renders
//! the remaining fields in declaration order.

#![forbid(unsafe_code)]

mod field;
mod field_kind;
mod field_mapping;
mod list_serializer;
mod method_field;
mod nested;
mod permission;
mod permission_field;
mod serializer;

pub use field::{Field, FieldSource, GuardedField, RenderField};
pub use field_kind::{FieldKind, RenderOptions};
pub use field_mapping::{FieldBinding, FieldEntry, FieldMapping, IntoFieldEntry};
pub use list_serializer::{ListOptions, ListSerializer};
pub use method_field::MethodField;
pub use nested::{NestedField, NestedListField};
pub use permission::{AllowAny, AllowNone, FieldPermission, IsAuthenticated, PermissionSet};
pub use permission_field::PermissionField;
pub use serializer::{Serializer, SerializerBuilder, SerializerContext};
