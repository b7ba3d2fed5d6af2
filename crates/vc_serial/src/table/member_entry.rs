use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::marker::{EncodeDefault, InfoAnnotation, SerialMarker};
use crate::{SerializerId, TypePath};

// -----------------------------------------------------------------------------
// TypeRef

/// A declared type usage: the type path of a member plus its nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TypeRef {
    path: TypePath,
    nullable: bool,
}

impl TypeRef {
    /// Creates a non-nullable usage of the given type.
    #[inline]
    pub fn of(path: impl Into<TypePath>) -> Self {
        Self {
            path: path.into(),
            nullable: false,
        }
    }

    /// Marks the usage as nullable (`Option<T>`).
    #[inline]
    pub fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    /// Returns the referenced type path.
    #[inline]
    pub fn path(&self) -> &TypePath {
        &self.path
    }

    /// Returns `true` if the usage accepts a null value.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "Option<{}>", self.path)
        } else {
            fmt::Display::fmt(&self.path, f)
        }
    }
}

// -----------------------------------------------------------------------------
// MemberEntry

/// A member of a registered type, in declaration order.
///
/// For class-like types a member is a property, for enums it is an entry,
/// in which case the declared type is the enum itself.
///
/// # Examples
///
/// ```
/// use vc_serial::marker::SerialMarker;
/// use vc_serial::table::{MemberEntry, TypeRef};
///
/// let member = MemberEntry::new("created_at", TypeRef::of("u64"))
///     .with_default()
///     .with_marker(SerialMarker::SerialName("createdAt".into()));
///
/// assert_eq!(member.name(), "created_at");
/// assert_eq!(member.serial_name(), "createdAt");
/// assert!(member.has_default());
/// assert!(member.owner().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    owner: Option<TypePath>,
    name: Arc<str>,
    ty: TypeRef,
    markers: Vec<SerialMarker>,
    has_default: bool,
}

impl MemberEntry {
    /// Creates a member with no marker and no default value.
    pub fn new(name: &str, ty: TypeRef) -> Self {
        Self {
            owner: None,
            name: Arc::from(name),
            ty,
            markers: Vec::new(),
            has_default: false,
        }
    }

    /// Declares that the member has a statically provable default value.
    #[inline]
    pub fn with_default(self) -> Self {
        Self {
            has_default: true,
            ..self
        }
    }

    /// Appends a marker.
    ///
    /// Markers are validated when the owning type is registered.
    #[inline]
    pub fn with_marker(mut self, marker: impl Into<SerialMarker>) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// Appends several markers.
    #[inline]
    pub fn with_markers(mut self, markers: impl IntoIterator<Item = SerialMarker>) -> Self {
        self.markers.extend(markers);
        self
    }

    #[inline]
    pub(crate) fn set_owner(&mut self, owner: TypePath) {
        self.owner = Some(owner);
    }

    #[inline]
    pub(crate) fn push_markers(&mut self, markers: Vec<SerialMarker>) {
        self.markers.extend(markers);
    }

    /// Returns the owning type, set once the member is attached to a [`TypeEntry`].
    ///
    /// [`TypeEntry`]: crate::table::TypeEntry
    #[inline]
    pub fn owner(&self) -> Option<&TypePath> {
        self.owner.as_ref()
    }

    /// Returns the declared name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[inline]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Returns the markers attached directly to this member.
    #[inline]
    pub fn markers(&self) -> &[SerialMarker] {
        &self.markers
    }

    /// Returns `true` if the member has a default value.
    #[inline]
    pub fn has_default(&self) -> bool {
        self.has_default
    }

    /// Returns the serial name: the `SerialName` override if present,
    /// otherwise the declared name.
    pub fn serial_name(&self) -> &str {
        self.markers
            .iter()
            .find_map(|m| match m {
                SerialMarker::SerialName(name) => Some(&**name),
                _ => None,
            })
            .unwrap_or(&*self.name)
    }

    /// Returns `true` if the member is marked `Transient`.
    #[inline]
    pub fn is_transient(&self) -> bool {
        self.markers.contains(&SerialMarker::Transient)
    }

    /// Returns `true` if the member is marked `Required`.
    #[inline]
    pub fn is_required(&self) -> bool {
        self.markers.contains(&SerialMarker::Required)
    }

    /// Returns the member-level `EncodeDefault` override, if any.
    pub fn encode_default(&self) -> Option<EncodeDefault> {
        self.markers.iter().find_map(|m| match m {
            SerialMarker::EncodeDefault(mode) => Some(*mode),
            _ => None,
        })
    }

    /// Returns the member-level `With` serializer, if any.
    pub fn serializer(&self) -> Option<&SerializerId> {
        self.markers.iter().find_map(|m| match m {
            SerialMarker::With(id) => Some(id),
            _ => None,
        })
    }

    /// Returns the info annotations attached to this member.
    pub fn infos(&self) -> impl Iterator<Item = &InfoAnnotation> {
        self.markers.iter().filter_map(SerialMarker::as_info)
    }
}
