use alloc::vec::Vec;
use core::fmt;

use crate::marker::{InfoAnnotation, MarkerTarget, SerialMarker};
use crate::table::MemberEntry;
use crate::{SerializerId, TypePath, UnitId};

// -----------------------------------------------------------------------------
// TypeKind

/// The declaration kind of a registered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TypeKind {
    /// A concrete class-like type with properties.
    Class,
    /// A singleton with no encoded elements.
    Object,
    /// An enum whose members are its entries.
    Enum,
    /// An interface (trait), always dispatched polymorphically.
    Interface,
    /// An abstract, open class, always dispatched polymorphically.
    Abstract,
    /// The root of a closed hierarchy, dispatched over its known subtypes.
    Sealed,
    /// A built-in primitive.
    Primitive,
}

impl TypeKind {
    /// Returns `true` if values of this kind cannot be encoded without a
    /// discriminator naming the concrete variant.
    #[inline]
    pub const fn is_polymorphic(self) -> bool {
        matches!(self, Self::Interface | Self::Abstract | Self::Sealed)
    }

    /// The target kind of the members of such a type.
    #[inline]
    pub(crate) const fn member_target(self) -> MarkerTarget {
        match self {
            Self::Enum => MarkerTarget::EnumEntry,
            _ => MarkerTarget::Member,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => f.pad("Class"),
            Self::Object => f.pad("Object"),
            Self::Enum => f.pad("Enum"),
            Self::Interface => f.pad("Interface"),
            Self::Abstract => f.pad("Abstract"),
            Self::Sealed => f.pad("Sealed"),
            Self::Primitive => f.pad("Primitive"),
        }
    }
}

// -----------------------------------------------------------------------------
// TypeEntry

/// A serializable type as recorded by the discovery step.
///
/// The member order is the declaration order, and it defines the element
/// order of the derived descriptor.
///
/// # Examples
///
/// ```
/// use vc_serial::marker::SerialMarker;
/// use vc_serial::table::{MemberEntry, TypeEntry, TypeKind, TypeRef};
///
/// let entry = TypeEntry::class("shop::Order")
///     .with_supertype("shop::Document")
///     .in_unit("shop/order.rs")
///     .with_marker(SerialMarker::With("shop::OrderSerializer".into()))
///     .with_member(MemberEntry::new("id", TypeRef::of("u64")));
///
/// assert_eq!(entry.kind(), TypeKind::Class);
/// assert_eq!(entry.member("id").unwrap().owner(), Some(entry.path()));
/// assert_eq!(entry.serializer().unwrap().as_str(), "shop::OrderSerializer");
/// assert_eq!(entry.serial_name(), "shop::Order");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    path: TypePath,
    kind: TypeKind,
    members: Vec<MemberEntry>,
    markers: Vec<SerialMarker>,
    supertypes: Vec<TypePath>,
    unit: Option<UnitId>,
}

impl TypeEntry {
    /// Creates an entry of the given kind with no member, marker or supertype.
    pub fn new(path: impl Into<TypePath>, kind: TypeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            members: Vec::new(),
            markers: Vec::new(),
            supertypes: Vec::new(),
            unit: None,
        }
    }

    /// Shortcut of [`TypeEntry::new`] with [`TypeKind::Class`].
    #[inline]
    pub fn class(path: impl Into<TypePath>) -> Self {
        Self::new(path, TypeKind::Class)
    }

    /// Shortcut of [`TypeEntry::new`] with [`TypeKind::Object`].
    #[inline]
    pub fn object(path: impl Into<TypePath>) -> Self {
        Self::new(path, TypeKind::Object)
    }

    /// Creates an enum from its entry names, each entry can later receive
    /// markers through [`AnnotationTable::record_member`].
    ///
    /// [`AnnotationTable::record_member`]: crate::table::AnnotationTable::record_member
    pub fn enumeration<'a>(
        path: impl Into<TypePath>,
        entries: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut this = Self::new(path, TypeKind::Enum);
        let ty = crate::table::TypeRef::of(this.path.clone());
        for name in entries {
            this = this.with_member(MemberEntry::new(name, ty.clone()));
        }
        this
    }

    /// Shortcut of [`TypeEntry::new`] with [`TypeKind::Interface`].
    #[inline]
    pub fn interface(path: impl Into<TypePath>) -> Self {
        Self::new(path, TypeKind::Interface)
    }

    /// Shortcut of [`TypeEntry::new`] with [`TypeKind::Sealed`].
    #[inline]
    pub fn sealed(path: impl Into<TypePath>) -> Self {
        Self::new(path, TypeKind::Sealed)
    }

    /// Appends a member, the member's owner is set to this type.
    pub fn with_member(mut self, mut member: MemberEntry) -> Self {
        member.set_owner(self.path.clone());
        self.members.push(member);
        self
    }

    /// Appends a type-level marker.
    #[inline]
    pub fn with_marker(mut self, marker: impl Into<SerialMarker>) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// Appends several type-level markers.
    #[inline]
    pub fn with_markers(mut self, markers: impl IntoIterator<Item = SerialMarker>) -> Self {
        self.markers.extend(markers);
        self
    }

    /// Appends a direct supertype, order is significant for inheritance.
    #[inline]
    pub fn with_supertype(mut self, supertype: impl Into<TypePath>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    /// Sets the compilation unit whose [`FileScope`] applies to this type.
    ///
    /// [`FileScope`]: crate::scope::FileScope
    #[inline]
    pub fn in_unit(self, unit: impl Into<UnitId>) -> Self {
        Self {
            unit: Some(unit.into()),
            ..self
        }
    }

    #[inline]
    pub(crate) fn push_markers(&mut self, markers: Vec<SerialMarker>) {
        self.markers.extend(markers);
    }

    #[inline]
    pub(crate) fn member_mut(&mut self, name: &str) -> Option<&mut MemberEntry> {
        self.members.iter_mut().find(|m| m.name() == name)
    }

    /// Returns the type path.
    #[inline]
    pub fn path(&self) -> &TypePath {
        &self.path
    }

    /// Returns the declaration kind.
    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Returns the members in declaration order.
    #[inline]
    pub fn members(&self) -> &[MemberEntry] {
        &self.members
    }

    /// Returns the member with the given declared name.
    pub fn member(&self, name: &str) -> Option<&MemberEntry> {
        self.members.iter().find(|m| m.name() == name)
    }

    /// Returns the type-level markers.
    #[inline]
    pub fn markers(&self) -> &[SerialMarker] {
        &self.markers
    }

    /// Returns the direct supertypes in declaration order.
    #[inline]
    pub fn supertypes(&self) -> &[TypePath] {
        &self.supertypes
    }

    /// Returns the compilation unit, if any.
    #[inline]
    pub fn unit(&self) -> Option<&UnitId> {
        self.unit.as_ref()
    }

    /// Returns the serial name: the `SerialName` override if present,
    /// otherwise the type path.
    pub fn serial_name(&self) -> &str {
        self.markers
            .iter()
            .find_map(|m| match m {
                SerialMarker::SerialName(name) => Some(&**name),
                _ => None,
            })
            .unwrap_or(self.path.as_str())
    }

    /// Returns the class-level `Serializable(with = ..)` serializer.
    pub fn serializer(&self) -> Option<&SerializerId> {
        self.markers.iter().find_map(|m| match m {
            SerialMarker::With(id) => Some(id),
            _ => None,
        })
    }

    /// Returns `true` if the generated serializer stays reachable next to
    /// the custom one.
    #[inline]
    pub fn keeps_generated_serializer(&self) -> bool {
        self.markers.contains(&SerialMarker::KeepGeneratedSerializer)
    }

    /// Returns `true` if values of this type are dispatched polymorphically.
    #[inline]
    pub fn is_polymorphic(&self) -> bool {
        self.kind.is_polymorphic() || self.markers.contains(&SerialMarker::Polymorphic)
    }

    /// Returns the info annotations attached directly to this type.
    pub fn infos(&self) -> impl Iterator<Item = &InfoAnnotation> {
        self.markers.iter().filter_map(SerialMarker::as_info)
    }
}
