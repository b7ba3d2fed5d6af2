//! Compilation-unit level registrations.
//!
//! A [`FileScope`] is the equivalent of file-level `UseSerializers` and
//! `UseContextualSerialization` declarations: it applies to every type
//! usage inside one compilation unit.

use alloc::vec::Vec;

use crate::{SerialError, SerializerId, TypePath, UnitId};

// -----------------------------------------------------------------------------
// FileBinding

/// What a [`FileScope`] says about one target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBinding {
    /// A `UseSerializers` binding.
    Serializer(SerializerId),
    /// A `UseContextualSerialization` target.
    Contextual,
}

// -----------------------------------------------------------------------------
// FileScope

/// File-level serializer registrations of one compilation unit.
///
/// A scope is built by value and frozen once handed to the registry.
/// Conflicting registrations are kept as-is and reported when a usage of
/// the target type is resolved, so that unrelated types are unaffected.
///
/// # Examples
///
/// ```
/// use vc_serial::scope::{FileBinding, FileScope};
///
/// let scope = FileScope::new("app/model.rs")
///     .with_contextual("chrono::DateTime")
///     .with_serializer("uuid::Uuid", "app::UuidAsString");
///
/// assert_eq!(scope.binding(&"chrono::DateTime".into()).unwrap(), Some(FileBinding::Contextual));
/// assert_eq!(
///     scope.binding(&"uuid::Uuid".into()).unwrap(),
///     Some(FileBinding::Serializer("app::UuidAsString".into())),
/// );
/// assert_eq!(scope.binding(&"u8".into()).unwrap(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileScope {
    unit: UnitId,
    contextual: Vec<TypePath>,
    serializers: Vec<(TypePath, SerializerId)>,
}

impl FileScope {
    /// Creates an empty scope for the given compilation unit.
    pub fn new(unit: impl Into<UnitId>) -> Self {
        Self {
            unit: unit.into(),
            contextual: Vec::new(),
            serializers: Vec::new(),
        }
    }

    /// Registers a type for contextual serialization in this unit.
    pub fn with_contextual(mut self, target: impl Into<TypePath>) -> Self {
        let target = target.into();
        if !self.contextual.contains(&target) {
            self.contextual.push(target);
        }
        self
    }

    /// Binds a serializer to every usage of `target` in this unit.
    pub fn with_serializer(
        mut self,
        target: impl Into<TypePath>,
        serializer: impl Into<SerializerId>,
    ) -> Self {
        let binding = (target.into(), serializer.into());
        if !self.serializers.contains(&binding) {
            self.serializers.push(binding);
        }
        self
    }

    /// Returns the compilation unit.
    #[inline]
    pub fn unit(&self) -> &UnitId {
        &self.unit
    }

    /// Returns the contextual targets in registration order.
    #[inline]
    pub fn contextual_targets(&self) -> &[TypePath] {
        &self.contextual
    }

    /// Returns the serializer bindings in registration order.
    #[inline]
    pub fn serializer_bindings(&self) -> &[(TypePath, SerializerId)] {
        &self.serializers
    }

    /// Returns the binding that applies to `ty`, if any.
    ///
    /// Fails with [`SerialError::AmbiguousSerializer`] if the scope binds
    /// two different serializers to `ty`, or both binds a serializer and
    /// marks it contextual.
    pub fn binding(&self, ty: &TypePath) -> Result<Option<FileBinding>, SerialError> {
        let mut found = None;
        let bound = self
            .serializers
            .iter()
            .filter(|(target, _)| target == ty)
            .map(|(_, id)| FileBinding::Serializer(id.clone()));
        let contextual = self
            .contextual
            .contains(ty)
            .then_some(FileBinding::Contextual);

        for binding in bound.chain(contextual) {
            if found.replace(binding).is_some() {
                return Err(SerialError::AmbiguousSerializer { ty: ty.clone() });
            }
        }
        Ok(found)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{FileBinding, FileScope};
    use crate::SerialError;

    #[test]
    fn repeated_identical_bindings_are_merged() {
        let scope = FileScope::new("u")
            .with_serializer("a::T", "S")
            .with_serializer("a::T", "S")
            .with_contextual("b::U")
            .with_contextual("b::U");

        assert_eq!(scope.serializer_bindings().len(), 1);
        assert_eq!(scope.contextual_targets().len(), 1);
        assert_eq!(
            scope.binding(&"a::T".into()).unwrap(),
            Some(FileBinding::Serializer("S".into()))
        );
    }

    #[test]
    fn conflicting_bindings_are_ambiguous() {
        let scope = FileScope::new("u")
            .with_serializer("a::T", "S1")
            .with_serializer("a::T", "S2")
            .with_serializer("a::V", "S3")
            .with_contextual("a::V");

        for ty in ["a::T", "a::V"] {
            let err = scope.binding(&ty.into()).unwrap_err();
            assert_eq!(err, SerialError::AmbiguousSerializer { ty: ty.into() });
        }
    }
}
