use alloc::boxed::Box;
use core::fmt;

use crate::{SerializerId, TypePath};

// -----------------------------------------------------------------------------
// PolymorphicKind

/// The set of variants a polymorphic serializer dispatches over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PolymorphicKind {
    /// The registered subtypes of a sealed root, known statically.
    Sealed,
    /// Subtypes registered at runtime.
    Open,
}

// -----------------------------------------------------------------------------
// SerializerRef

/// A reference to the serializer that encodes values of one type usage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SerializerRef {
    /// A user-provided serializer.
    Custom(SerializerId),
    /// The serializer generated for the type.
    Generated(TypePath),
    /// A wrapper writing a discriminator next to the value.
    Polymorphic { base: TypePath, kind: PolymorphicKind },
    /// A placeholder resolved at encode time by a
    /// [`ContextualModule`](crate::serializer::ContextualModule).
    ///
    /// `fallback` is the serializer the type would use without the
    /// contextual request, if it has one.
    Contextual {
        target: TypePath,
        fallback: Option<Box<SerializerRef>>,
    },
}

impl SerializerRef {
    /// Returns `true` for [`SerializerRef::Contextual`].
    #[inline]
    pub fn is_contextual(&self) -> bool {
        matches!(self, Self::Contextual { .. })
    }

    /// Returns `true` for [`SerializerRef::Polymorphic`].
    #[inline]
    pub fn is_polymorphic(&self) -> bool {
        matches!(self, Self::Polymorphic { .. })
    }

    /// Returns the custom serializer id, if any.
    #[inline]
    pub fn as_custom(&self) -> Option<&SerializerId> {
        match self {
            Self::Custom(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for SerializerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(id) => write!(f, "{id}"),
            Self::Generated(ty) => write!(f, "generated({ty})"),
            Self::Polymorphic {
                base,
                kind: PolymorphicKind::Sealed,
            } => write!(f, "sealed({base})"),
            Self::Polymorphic {
                base,
                kind: PolymorphicKind::Open,
            } => write!(f, "polymorphic({base})"),
            Self::Contextual { target, .. } => write!(f, "contextual({target})"),
        }
    }
}

// -----------------------------------------------------------------------------
// ResolutionSource

/// The priority level a serializer was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ResolutionSource {
    /// `With` on the usage site.
    UsageWith,
    /// `Contextual` on the usage site.
    UsageContextual,
    /// A binding of the usage's file scope.
    FileScope,
    /// `With` on the target type.
    TypeWith,
    /// Polymorphic dispatch or the generated serializer.
    Default,
}

// -----------------------------------------------------------------------------
// ResolvedSerializer

/// The outcome of serializer resolution for one type usage.
///
/// `generated` is the alternate accessor exposed by types marked
/// `KeepGeneratedSerializer`: the primary serializer stays the custom one,
/// the generated form remains reachable for code that asks for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResolvedSerializer {
    serializer: SerializerRef,
    generated: Option<SerializerRef>,
    source: ResolutionSource,
}

impl ResolvedSerializer {
    #[inline]
    pub(crate) fn new(serializer: SerializerRef, source: ResolutionSource) -> Self {
        Self {
            serializer,
            generated: None,
            source,
        }
    }

    #[inline]
    pub(crate) fn with_generated(self, generated: Option<SerializerRef>) -> Self {
        Self { generated, ..self }
    }

    /// Returns the primary serializer.
    #[inline]
    pub fn serializer(&self) -> &SerializerRef {
        &self.serializer
    }

    /// Returns the generated serializer kept next to a custom one.
    #[inline]
    pub fn generated(&self) -> Option<&SerializerRef> {
        self.generated.as_ref()
    }

    /// Returns the priority level the serializer was resolved from.
    #[inline]
    pub fn source(&self) -> ResolutionSource {
        self.source
    }
}
