use core::fmt;

// -----------------------------------------------------------------------------
// MarkerKind

/// The kind of a [`SerialMarker`](crate::marker::SerialMarker), without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MarkerKind {
    SerialName,
    Transient,
    Required,
    EncodeDefault,
    Contextual,
    Polymorphic,
    With,
    Info,
    KeepGeneratedSerializer,
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SerialName => f.pad("SerialName"),
            Self::Transient => f.pad("Transient"),
            Self::Required => f.pad("Required"),
            Self::EncodeDefault => f.pad("EncodeDefault"),
            Self::Contextual => f.pad("Contextual"),
            Self::Polymorphic => f.pad("Polymorphic"),
            Self::With => f.pad("With"),
            Self::Info => f.pad("Info"),
            Self::KeepGeneratedSerializer => f.pad("KeepGeneratedSerializer"),
        }
    }
}

impl MarkerKind {
    /// Returns `true` if a marker of this kind may be attached to `target`.
    ///
    /// | kind                      | type | member | enum entry |
    /// |---------------------------|------|--------|------------|
    /// | `SerialName`              | yes  | yes    | yes        |
    /// | `Transient`               |      | yes    |            |
    /// | `Required`                |      | yes    |            |
    /// | `EncodeDefault`           |      | yes    |            |
    /// | `Contextual`              |      | yes    |            |
    /// | `Polymorphic`             | yes  | yes    |            |
    /// | `With`                    | yes  | yes    |            |
    /// | `Info`                    | yes  | yes    | yes        |
    /// | `KeepGeneratedSerializer` | yes  |        |            |
    pub const fn allowed_on(self, target: MarkerTarget) -> bool {
        use MarkerTarget::{EnumEntry, Member, Type};

        match (self, target) {
            (Self::SerialName | Self::Info, _) => true,
            (_, EnumEntry) => false,
            (Self::Transient | Self::Required | Self::EncodeDefault | Self::Contextual, _) => {
                matches!(target, Member)
            }
            (Self::Polymorphic | Self::With, _) => true,
            (Self::KeepGeneratedSerializer, _) => matches!(target, Type),
        }
    }
}

// -----------------------------------------------------------------------------
// MarkerTarget

/// The kind of element a marker is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerTarget {
    /// A serializable type declaration.
    Type,
    /// A property of a class-like type.
    Member,
    /// An entry of an enum type.
    EnumEntry,
}

impl fmt::Display for MarkerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => f.pad("a type"),
            Self::Member => f.pad("a member"),
            Self::EnumEntry => f.pad("an enum entry"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
