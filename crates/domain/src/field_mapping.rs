use std::sync::Arc;

use fieldgate_core::{AppResult, RequestContext};
use serde_json::Value;
use tracing::debug;

use crate::{
    Field, FieldKind, FieldSource, GuardedField, MethodField, PermissionField, RenderField,
    SerializerContext,
};

/// Field declared on a serializer.
///
/// Plain fields never take part in permission scrubbing; guarded fields are
/// asked for their aggregate check on every render.
pub enum FieldEntry<T> {
    /// Field without permission capability.
    Plain(Arc<dyn RenderField<T>>),
    /// Permission-capable field.
    Guarded(Arc<dyn GuardedField<T>>),
}

impl<T> FieldEntry<T> {
    /// Returns whether the entry is permission-capable.
    #[must_use]
    pub fn is_guarded(&self) -> bool {
        matches!(self, Self::Guarded(_))
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Plain(field) => field.kind(),
            Self::Guarded(field) => field.kind(),
        }
    }

    /// Returns whether the field is excluded from rendered output.
    #[must_use]
    pub fn is_write_only(&self) -> bool {
        match self {
            Self::Plain(field) => field.is_write_only(),
            Self::Guarded(field) => field.is_write_only(),
        }
    }

    /// Renders the field for one instance.
    pub fn to_representation(
        &self,
        source: &FieldSource<'_, T>,
        context: &SerializerContext,
    ) -> AppResult<Value> {
        match self {
            Self::Plain(field) => field.to_representation(source, context),
            Self::Guarded(field) => field.to_representation(source, context),
        }
    }

    /// Returns the aggregate check, or `None` for plain fields.
    pub fn check_permission(
        &self,
        request: &RequestContext,
        instance: Option<&T>,
    ) -> AppResult<Option<bool>> {
        match self {
            Self::Plain(_) => Ok(None),
            Self::Guarded(field) => field.check_permission(request, instance).map(Some),
        }
    }
}

impl<T> Clone for FieldEntry<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Plain(field) => Self::Plain(Arc::clone(field)),
            Self::Guarded(field) => Self::Guarded(Arc::clone(field)),
        }
    }
}

/// Position of a field inside its declaring serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBinding<'a> {
    /// Path of the declaring serializer.
    pub serializer_path: &'a str,
    /// Declared field name.
    pub field_name: &'a str,
}

/// Conversion of a declared field into a bound [`FieldEntry`].
pub trait IntoFieldEntry<T> {
    /// Binds the field and wraps it.
    fn into_entry(self, binding: FieldBinding<'_>) -> FieldEntry<T>;
}

impl<T: 'static> IntoFieldEntry<T> for Field {
    fn into_entry(mut self, binding: FieldBinding<'_>) -> FieldEntry<T> {
        RenderField::<T>::bind(&mut self, binding.field_name);
        FieldEntry::Plain(Arc::new(self))
    }
}

impl<T: 'static> IntoFieldEntry<T> for MethodField<T> {
    fn into_entry(self, _binding: FieldBinding<'_>) -> FieldEntry<T> {
        FieldEntry::Plain(Arc::new(self))
    }
}

impl<T, F> IntoFieldEntry<T> for PermissionField<T, F>
where
    T: 'static,
    F: RenderField<T> + 'static,
{
    fn into_entry(mut self, binding: FieldBinding<'_>) -> FieldEntry<T> {
        self.bind(binding.field_name);
        FieldEntry::Guarded(Arc::new(self))
    }
}

/// Ordered name to field mapping computed for one render.
pub struct FieldMapping<T> {
    entries: Vec<(String, FieldEntry<T>)>,
}

impl<T> FieldMapping<T> {
    pub(crate) fn new(entries: Vec<(String, FieldEntry<T>)>) -> Self {
        Self { entries }
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no field remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns whether a field with `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the field registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldEntry<T>> {
        self.entries
            .iter()
            .find_map(|(entry_name, entry)| (entry_name == name).then_some(entry))
    }

    /// Iterates field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldEntry<T>)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Removes and returns the field registered under `name`.
    pub fn remove(&mut self, name: &str) -> Option<FieldEntry<T>> {
        let position = self
            .entries
            .iter()
            .position(|(entry_name, _)| entry_name == name)?;
        Some(self.entries.remove(position).1)
    }

    /// Removes every guarded field whose check fails and returns the removed
    /// names.
    ///
    /// Names are collected in one pass before anything is removed. Plain
    /// fields are never inspected. Running the scrub again on the result
    /// removes nothing.
    pub fn scrub(
        &mut self,
        request: &RequestContext,
        instance: Option<&T>,
    ) -> AppResult<Vec<String>> {
        let mut denied = Vec::new();
        for (name, entry) in &self.entries {
            if entry.check_permission(request, instance)? == Some(false) {
                denied.push(name.clone());
            }
        }

        for name in &denied {
            self.remove(name);
            debug!(field = name.as_str(), "removed field denied by permission check");
        }

        Ok(denied)
    }
}

impl<T> Clone for FieldMapping<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use fieldgate_core::{AppResult, RequestContext, RequestUser};

    use super::{FieldBinding, FieldEntry, FieldMapping, IntoFieldEntry};
    use crate::{AllowAny, AllowNone, Field, FieldPermission, IsAuthenticated, PermissionSet};

    struct Note {
        author: String,
    }

    struct IsAuthor;

    impl FieldPermission<Note> for IsAuthor {
        fn has_object_permission(
            &self,
            request: &RequestContext,
            instance: Option<&Note>,
        ) -> AppResult<bool> {
            Ok(request
                .user()
                .zip(instance)
                .is_some_and(|(user, note)| user.username() == note.author))
        }
    }

    fn entry(name: &str, field: impl IntoFieldEntry<Note>) -> (String, FieldEntry<Note>) {
        let binding = FieldBinding {
            serializer_path: "note",
            field_name: name,
        };
        (name.to_owned(), field.into_entry(binding))
    }

    fn mixed_mapping() -> FieldMapping<Note> {
        FieldMapping::new(vec![
            entry("title", Field::char()),
            entry(
                "summary",
                Field::char().permissions(PermissionSet::<Note>::empty().with(AllowAny)),
            ),
            entry(
                "draft",
                Field::char().permissions(PermissionSet::<Note>::empty().with(AllowNone)),
            ),
            entry(
                "rating",
                Field::integer().permissions(PermissionSet::<Note>::empty().with(IsAuthenticated)),
            ),
            entry(
                "private_notes",
                Field::char().permissions(PermissionSet::<Note>::empty().with(IsAuthor)),
            ),
        ])
    }

    #[test]
    fn scrub_removes_exactly_the_denied_fields() {
        let mut mapping = mixed_mapping();
        let note = Note {
            author: "carol".to_owned(),
        };

        let removed = mapping.scrub(&RequestContext::anonymous(), Some(&note));
        assert!(removed.is_ok());
        assert_eq!(
            removed.unwrap_or_default(),
            vec![
                "draft".to_owned(),
                "rating".to_owned(),
                "private_notes".to_owned()
            ]
        );
        assert_eq!(mapping.names().collect::<Vec<_>>(), vec!["title", "summary"]);
    }

    #[test]
    fn scrub_keeps_owner_only_fields_for_owner() {
        let mut mapping = mixed_mapping();
        let note = Note {
            author: "carol".to_owned(),
        };
        let request =
            RequestContext::for_user(RequestUser::authenticated("carol", "Carol", None));

        assert!(mapping.scrub(&request, Some(&note)).is_ok());
        assert!(mapping.contains("private_notes"));
        assert!(mapping.contains("rating"));
        assert!(!mapping.contains("draft"));
    }

    #[test]
    fn scrub_is_idempotent() {
        let mut mapping = mixed_mapping();
        let request = RequestContext::anonymous();

        assert!(mapping.scrub(&request, None).is_ok());
        let once: Vec<String> = mapping.names().map(str::to_owned).collect();

        let second = mapping.scrub(&request, None);
        assert!(second.is_ok());
        assert!(second.unwrap_or_default().is_empty());
        assert_eq!(mapping.names().collect::<Vec<_>>(), once);
    }

    #[test]
    fn scrub_result_does_not_depend_on_declaration_order() {
        let mut forward = mixed_mapping();
        let mut reversed = FieldMapping::new(mixed_mapping().entries.into_iter().rev().collect());
        let request = RequestContext::anonymous();

        assert!(forward.scrub(&request, None).is_ok());
        assert!(reversed.scrub(&request, None).is_ok());

        let mut forward_names: Vec<&str> = forward.names().collect();
        let mut reversed_names: Vec<&str> = reversed.names().collect();
        forward_names.sort_unstable();
        reversed_names.sort_unstable();
        assert_eq!(forward_names, reversed_names);
    }

    #[test]
    fn plain_fields_are_never_inspected() {
        let mapping = mixed_mapping();
        let title = mapping.get("title");
        assert!(title.is_some_and(|entry| !entry.is_guarded()));
        assert!(matches!(
            title.map(|entry| entry.check_permission(&RequestContext::new(), None)),
            Some(Ok(None))
        ));
    }
}
