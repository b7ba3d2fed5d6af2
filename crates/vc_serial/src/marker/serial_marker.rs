use alloc::sync::Arc;
use core::fmt;

use crate::SerializerId;
use crate::marker::{InfoAnnotation, MarkerKind};

// -----------------------------------------------------------------------------
// EncodeDefault

/// Whether a member equal to its default value is written by encoders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EncodeDefault {
    /// Always encode the member, even when it holds the default value.
    Always,
    /// Never encode the member when it holds the default value.
    Never,
    /// Let the format decide at encode time.
    #[default]
    FormatDefault,
}

impl fmt::Display for EncodeDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.pad("Always"),
            Self::Never => f.pad("Never"),
            Self::FormatDefault => f.pad("FormatDefault"),
        }
    }
}

// -----------------------------------------------------------------------------
// SerialMarker

/// A serialization marker attached to a type or to a member.
///
/// Markers are immutable once recorded into the
/// [`AnnotationTable`](crate::table::AnnotationTable).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SerialMarker {
    /// Overrides the serial name of a type, member or enum entry.
    SerialName(Arc<str>),
    /// Excludes a member from serialization, requires a default value.
    Transient,
    /// Makes a member with a default value mandatory in the input.
    Required,
    /// Overrides the default-value encoding policy of a member.
    EncodeDefault(EncodeDefault),
    /// Defers serializer lookup of a member to the runtime scope.
    Contextual,
    /// Forces polymorphic dispatch for a type or a member.
    Polymorphic,
    /// Uses the named serializer instead of the generated one.
    With(SerializerId),
    /// A user-defined annotation forwarded into the descriptor.
    Info(InfoAnnotation),
    /// Keeps the generated serializer reachable next to a type-level `With`.
    KeepGeneratedSerializer,
}

impl SerialMarker {
    /// Returns the kind of this marker.
    pub const fn kind(&self) -> MarkerKind {
        match self {
            Self::SerialName(_) => MarkerKind::SerialName,
            Self::Transient => MarkerKind::Transient,
            Self::Required => MarkerKind::Required,
            Self::EncodeDefault(_) => MarkerKind::EncodeDefault,
            Self::Contextual => MarkerKind::Contextual,
            Self::Polymorphic => MarkerKind::Polymorphic,
            Self::With(_) => MarkerKind::With,
            Self::Info(_) => MarkerKind::Info,
            Self::KeepGeneratedSerializer => MarkerKind::KeepGeneratedSerializer,
        }
    }

    /// Returns `true` if `self` and `other` occupy the same slot of an
    /// element, i.e. cannot both be attached to it.
    ///
    /// Info annotations only collide with info annotations of the same type.
    pub fn collides_with(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Info(a), Self::Info(b)) => a.same_type(b),
            _ => self.kind() == other.kind(),
        }
    }

    /// Returns the info annotation, if this is an info marker.
    #[inline]
    pub fn as_info(&self) -> Option<&InfoAnnotation> {
        match self {
            Self::Info(info) => Some(info),
            _ => None,
        }
    }
}

impl From<InfoAnnotation> for SerialMarker {
    #[inline]
    fn from(value: InfoAnnotation) -> Self {
        Self::Info(value)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::SerialMarker;
    use crate::marker::InfoAnnotation;

    #[test]
    fn infos_collide_by_type_only() {
        let a1 = SerialMarker::Info(InfoAnnotation::new("A").with_arg("v", 1));
        let a2 = SerialMarker::Info(InfoAnnotation::new("A").with_arg("v", 2));
        let b = SerialMarker::Info(InfoAnnotation::new("B"));

        assert!(a1.collides_with(&a2));
        assert!(!a1.collides_with(&b));
    }

    #[test]
    fn same_kind_collides_regardless_of_payload() {
        let a = SerialMarker::SerialName("a".into());
        let b = SerialMarker::SerialName("b".into());
        assert!(a.collides_with(&b));
        assert!(!a.collides_with(&SerialMarker::Transient));
    }
}
