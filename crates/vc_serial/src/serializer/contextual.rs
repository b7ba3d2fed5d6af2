use crate::hash::HashMap;
use crate::serializer::SerializerRef;
use crate::{SerialError, SerializerId, TypePath};

// -----------------------------------------------------------------------------
// ContextualModule

/// The runtime scope consulted by encoders to fill in contextual placeholders.
///
/// Contextual resolution is the only lookup that happens at encode time.
/// A missing registration falls back to the serializer the type would have
/// used statically; when there is none, the failure is reported to the
/// caller, who may supply its own fallback with [`resolve_or`](Self::resolve_or).
///
/// # Example
///
/// ```
/// use vc_serial::serializer::{ContextualModule, SerializerRef};
/// use vc_serial::SerialError;
///
/// let module = ContextualModule::new().with("chrono::DateTime", "app::Rfc3339");
///
/// let placeholder = SerializerRef::Contextual { target: "chrono::DateTime".into(), fallback: None };
/// assert_eq!(module.resolve(&placeholder).unwrap(), SerializerRef::Custom("app::Rfc3339".into()));
///
/// let missing = SerializerRef::Contextual { target: "uuid::Uuid".into(), fallback: None };
/// assert_eq!(
///     module.resolve(&missing).unwrap_err(),
///     SerialError::NoContextualSerializerRegistered("uuid::Uuid".into()),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContextualModule {
    serializers: HashMap<TypePath, SerializerId>,
}

impl ContextualModule {
    /// Creates an empty module.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the serializer used for contextual usages of `target`,
    /// replacing any previous registration.
    pub fn with(mut self, target: impl Into<TypePath>, serializer: impl Into<SerializerId>) -> Self {
        self.serializers.insert(target.into(), serializer.into());
        self
    }

    /// Returns the serializer registered for `target`.
    #[inline]
    pub fn get(&self, target: &str) -> Option<&SerializerId> {
        self.serializers.get(target)
    }

    /// Replaces a contextual placeholder by a concrete serializer.
    ///
    /// Non-contextual references are returned unchanged.
    ///
    /// # Errors
    ///
    /// [`SerialError::NoContextualSerializerRegistered`] if `target` has no
    /// registration in this module and the placeholder has no fallback.
    pub fn resolve(&self, serializer: &SerializerRef) -> Result<SerializerRef, SerialError> {
        let SerializerRef::Contextual { target, fallback } = serializer else {
            return Ok(serializer.clone());
        };

        if let Some(id) = self.serializers.get(target) {
            return Ok(SerializerRef::Custom(id.clone()));
        }
        match fallback {
            Some(fallback) => {
                log::debug!("no contextual serializer for `{target}`, using {fallback}");
                Ok((**fallback).clone())
            }
            None => Err(SerialError::NoContextualSerializerRegistered(target.clone())),
        }
    }

    /// Like [`resolve`](Self::resolve), but uses `fallback` when nothing else applies.
    pub fn resolve_or(&self, serializer: &SerializerRef, fallback: SerializerRef) -> SerializerRef {
        self.resolve(serializer).unwrap_or_else(|err| {
            log::warn!("{err}, using caller fallback {fallback}");
            fallback
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::ContextualModule;
    use crate::serializer::SerializerRef;

    #[test]
    fn registration_beats_fallback() {
        let module = ContextualModule::new().with("a::T", "a::Ctx");
        let placeholder = SerializerRef::Contextual {
            target: "a::T".into(),
            fallback: Some(Box::new(SerializerRef::Generated("a::T".into()))),
        };
        assert_eq!(
            module.resolve(&placeholder).unwrap(),
            SerializerRef::Custom("a::Ctx".into())
        );
    }

    #[test]
    fn static_fallback_is_used() {
        let module = ContextualModule::new();
        let placeholder = SerializerRef::Contextual {
            target: "a::T".into(),
            fallback: Some(Box::new(SerializerRef::Generated("a::T".into()))),
        };
        assert_eq!(
            module.resolve(&placeholder).unwrap(),
            SerializerRef::Generated("a::T".into())
        );
    }

    #[test]
    fn caller_fallback() {
        let module = ContextualModule::new();
        let placeholder = SerializerRef::Contextual {
            target: "a::T".into(),
            fallback: None,
        };
        let fallback = SerializerRef::Custom("a::Plain".into());
        assert_eq!(module.resolve_or(&placeholder, fallback.clone()), fallback);
    }

    #[test]
    fn non_contextual_passes_through() {
        let module = ContextualModule::new().with("a::T", "a::Ctx");
        let generated = SerializerRef::Generated("a::T".into());
        assert_eq!(module.resolve(&generated).unwrap(), generated);
    }
}
