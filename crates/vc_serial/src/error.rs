use alloc::boxed::Box;

use thiserror::Error;

use crate::marker::MarkerKind;
use crate::{TypePath, UnitId};

// -----------------------------------------------------------------------------
// SerialError

/// Errors raised while registering types or deriving their serialization plan.
///
/// Every variant except [`NoContextualSerializerRegistered`] is raised at
/// registration or descriptor-build time. A failing type never produces a
/// partial descriptor, and never affects descriptors of other types.
///
/// [`NoContextualSerializerRegistered`]: SerialError::NoContextualSerializerRegistered
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SerialError {
    #[error("member `{member}` of `{ty}` is transient but has no default value")]
    TransientWithoutDefault { ty: TypePath, member: Box<str> },

    #[error("inherited annotation `{annotation}` has conflicting arguments in the hierarchy of `{ty}`")]
    ConflictingInheritedAnnotation { annotation: Box<str>, ty: TypePath },

    #[error("marker `{kind}` is applied more than once to `{target}`")]
    DuplicateNonRepeatableMarker { kind: MarkerKind, target: Box<str> },

    #[error("more than one serializer of the same priority applies to `{ty}`")]
    AmbiguousSerializer { ty: TypePath },

    #[error("type `{0}` is not registered")]
    UnknownType(TypePath),

    #[error("marker `{kind}` cannot be applied to {target}")]
    InvalidAnnotationTarget { kind: MarkerKind, target: Box<str> },

    #[error("no contextual serializer is registered for `{0}`")]
    NoContextualSerializerRegistered(TypePath),

    #[error("markers `{first}` and `{second}` cannot be combined on `{target}`")]
    IncompatibleMarkers {
        first: MarkerKind,
        second: MarkerKind,
        target: Box<str>,
    },

    #[error("type `{ty}` has no member named `{member}`")]
    UnknownMember { ty: TypePath, member: Box<str> },

    #[error("member `{member}` is declared twice in `{ty}`")]
    DuplicateMember { ty: TypePath, member: Box<str> },

    #[error("type `{0}` is already registered")]
    DuplicateType(TypePath),

    #[error("serial name `{name}` is used more than once in `{ty}`")]
    DuplicateSerialName { ty: TypePath, name: Box<str> },

    #[error("`{0}` is its own supertype")]
    CyclicInheritance(TypePath),

    #[error("compilation unit `{0}` has no registered file scope")]
    UnknownFileScope(UnitId),

    #[error("compilation unit `{0}` already has a file scope")]
    DuplicateFileScope(UnitId),

    #[error("the registry is sealed, registrations are no longer accepted")]
    RegistrySealed,
}
