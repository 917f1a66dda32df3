use crate::ast::Location;
use serde::Serialize;
use std::fmt;

/// The kinds of composition errors. The declaration order is the primary sort key of
/// [Diagnostics].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum_macros::Display, strum_macros::IntoStaticStr,
)]
pub enum CompositionErrorKind {
    #[strum(serialize = "SyntaxError")]
    Syntax,
    #[strum(serialize = "DuplicateTypeDefinitionError")]
    DuplicateTypeDefinition,
    #[strum(serialize = "FieldTypeMismatchError")]
    FieldTypeMismatch,
    #[strum(serialize = "ConflictingDirectiveError")]
    ConflictingDirective,
    #[strum(serialize = "UnresolvedExternalFieldError")]
    UnresolvedExternalField,
    #[strum(serialize = "InterfaceFieldMissingError")]
    InterfaceFieldMissing,
    #[strum(serialize = "DirectiveArgumentError")]
    DirectiveArgument,
    #[strum(serialize = "DirectiveLocationError")]
    DirectiveLocation,
    /// Definitions of the same name with different kinds, e.g. an object and an interface.
    #[strum(serialize = "TypeKindMismatchError")]
    TypeKindMismatch,
    /// A reference to a type that no service defines.
    #[strum(serialize = "UnknownTypeError")]
    UnknownType,
    /// `_service` or `_entities` defined on a query root.
    #[strum(serialize = "ReservedFieldUsedError")]
    ReservedFieldUsed,
    /// `@external` on a field of a base type definition.
    #[strum(serialize = "ExternalUsedOnBaseError")]
    ExternalUsedOnBase,
    /// `@requires` on a field of a base type definition.
    #[strum(serialize = "RequiresUsedOnBaseError")]
    RequiresUsedOnBase,
    /// A key field of a type extension that is not marked `@external`.
    #[strum(serialize = "KeyFieldsMissingExternalError")]
    KeyFieldsMissingExternal,
    /// A type that is only ever extended, never defined.
    #[strum(serialize = "ExtensionWithNoBaseError")]
    ExtensionWithNoBase,
}

impl CompositionErrorKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl Serialize for CompositionErrorKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single composition error. Created once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionError {
    kind: CompositionErrorKind,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
}

impl CompositionError {
    pub(crate) fn new(kind: CompositionErrorKind, message: impl Into<String>) -> Self {
        CompositionError {
            kind,
            message: message.into(),
            type_name: None,
            field_name: None,
            service_name: None,
            location: None,
        }
    }

    pub(crate) fn on_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub(crate) fn on_field(mut self, type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self.field_name = Some(field_name.into());
        self
    }

    pub(crate) fn in_service(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    /// Prefix the message with the name of the service it concerns.
    pub(crate) fn prefix_message(mut self, service_name: &str) -> Self {
        self.message = format!("[{service_name}] {}", self.message);
        self
    }

    pub(crate) fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn kind(&self) -> CompositionErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }
}

impl fmt::Display for CompositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Errors produced by composition.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<CompositionError>);

impl Diagnostics {
    /// Is there any error?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &CompositionError> {
        self.0.iter()
    }

    /// Iterate over the error messages.
    pub fn iter_messages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|error| error.message.as_str())
    }

    pub fn kinds(&self) -> impl Iterator<Item = CompositionErrorKind> + '_ {
        self.0.iter().map(|error| error.kind)
    }

    pub(crate) fn push(&mut self, error: CompositionError) {
        self.0.push(error);
    }

    /// Stable sort by kind, then type name, then field name.
    pub(crate) fn sort(&mut self) {
        self.0.sort_by(|a, b| {
            (a.kind, a.type_name.as_deref(), a.field_name.as_deref()).cmp(&(
                b.kind,
                b.type_name.as_deref(),
                b.field_name.as_deref(),
            ))
        });
    }
}

impl IntoIterator for Diagnostics {
    type Item = CompositionError;
    type IntoIter = std::vec::IntoIter<CompositionError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a CompositionError;
    type IntoIter = std::slice::Iter<'a, CompositionError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.0 {
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_by_kind_type_then_field() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.push(CompositionError::new(CompositionErrorKind::FieldTypeMismatch, "b").on_field("B", "x"));
        diagnostics.push(CompositionError::new(CompositionErrorKind::DuplicateTypeDefinition, "c").on_field("C", "x"));
        diagnostics.push(CompositionError::new(CompositionErrorKind::FieldTypeMismatch, "a").on_field("A", "y"));
        diagnostics.push(CompositionError::new(CompositionErrorKind::FieldTypeMismatch, "a2").on_field("A", "x"));

        diagnostics.sort();

        assert_eq!(diagnostics.iter_messages().collect::<Vec<_>>(), ["c", "a2", "a", "b"]);
    }

    #[test]
    fn kinds_render_with_the_error_suffix() {
        assert_eq!(CompositionErrorKind::Syntax.to_string(), "SyntaxError");
        assert_eq!(
            CompositionErrorKind::UnresolvedExternalField.as_str(),
            "UnresolvedExternalFieldError"
        );
    }
}
