use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::TypePath;
use crate::descriptor::ElementDescriptor;
use crate::marker::InfoAnnotation;
use crate::serializer::PolymorphicKind;
use crate::table::{TypeEntry, TypeKind};

// -----------------------------------------------------------------------------
// SerialKind

/// The structural kind of a [`SerialDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SerialKind {
    Primitive,
    Class,
    Object,
    Enum,
    Polymorphic(PolymorphicKind),
}

impl SerialKind {
    /// The descriptor kind of a type declared with `kind`.
    pub const fn of(kind: TypeKind) -> Self {
        match kind {
            TypeKind::Class => Self::Class,
            TypeKind::Object => Self::Object,
            TypeKind::Enum => Self::Enum,
            TypeKind::Primitive => Self::Primitive,
            TypeKind::Sealed => Self::Polymorphic(PolymorphicKind::Sealed),
            TypeKind::Interface | TypeKind::Abstract => Self::Polymorphic(PolymorphicKind::Open),
        }
    }

    /// The descriptor kind of a registered type.
    ///
    /// Unlike [`SerialKind::of`], this accounts for a type-level `Polymorphic`
    /// marker, which turns any type into an open polymorphic one.
    pub fn of_entry(entry: &TypeEntry) -> Self {
        match Self::of(entry.kind()) {
            Self::Polymorphic(kind) => Self::Polymorphic(kind),
            _ if entry.is_polymorphic() => Self::Polymorphic(PolymorphicKind::Open),
            kind => kind,
        }
    }
}

impl fmt::Display for SerialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => f.pad("Primitive"),
            Self::Class => f.pad("Class"),
            Self::Object => f.pad("Object"),
            Self::Enum => f.pad("Enum"),
            Self::Polymorphic(PolymorphicKind::Sealed) => f.pad("Sealed"),
            Self::Polymorphic(PolymorphicKind::Open) => f.pad("Open"),
        }
    }
}

// -----------------------------------------------------------------------------
// SerialDescriptor

/// The serialization plan of one type.
///
/// Elements are in declaration order, transient members are absent.
/// Elements are looked up by their serial name only: once a member is
/// renamed, its declared name is not resolvable anymore.
///
/// Descriptors are obtained through
/// [`SerialRegistry::get_descriptor`](crate::registry::SerialRegistry::get_descriptor).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SerialDescriptor {
    serial_name: Arc<str>,
    type_path: TypePath,
    kind: SerialKind,
    elements: Vec<ElementDescriptor>,
    annotations: Vec<InfoAnnotation>,
}

impl SerialDescriptor {
    pub(crate) fn new(
        serial_name: Arc<str>,
        type_path: TypePath,
        kind: SerialKind,
        elements: Vec<ElementDescriptor>,
        annotations: Vec<InfoAnnotation>,
    ) -> Self {
        Self {
            serial_name,
            type_path,
            kind,
            elements,
            annotations,
        }
    }

    /// Returns the serial name, the type path unless overridden.
    #[inline]
    pub fn serial_name(&self) -> &str {
        &self.serial_name
    }

    /// Returns the path of the described type.
    #[inline]
    pub fn type_path(&self) -> &TypePath {
        &self.type_path
    }

    #[inline]
    pub fn kind(&self) -> SerialKind {
        self.kind
    }

    /// Returns the elements in encoding order.
    #[inline]
    pub fn elements(&self) -> &[ElementDescriptor] {
        &self.elements
    }

    /// Returns the element at `index`.
    #[inline]
    pub fn element(&self, index: usize) -> Option<&ElementDescriptor> {
        self.elements.get(index)
    }

    /// Returns the index of the element with the given serial name.
    ///
    /// This is O(N) complexity.
    pub fn element_index(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.name() == name)
    }

    /// Returns the serial names of the elements in encoding order.
    pub fn element_names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.elements.iter().map(ElementDescriptor::name)
    }

    /// Returns the number of elements.
    #[inline]
    pub fn element_len(&self) -> usize {
        self.elements.len()
    }

    /// Returns the merged type-level annotations: direct ones first,
    /// then the inherited ones.
    #[inline]
    pub fn annotations(&self) -> &[InfoAnnotation] {
        &self.annotations
    }

    /// Returns the annotation of the given type.
    pub fn annotation(&self, annotation_type: &str) -> Option<&InfoAnnotation> {
        self.annotations
            .iter()
            .find(|a| a.annotation_type() == annotation_type)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::SerialKind;
    use crate::marker::SerialMarker;
    use crate::serializer::PolymorphicKind;
    use crate::table::{TypeEntry, TypeKind};

    #[test]
    fn marked_class_is_open_polymorphic() {
        let plain = TypeEntry::class("a::Plain");
        let marked = TypeEntry::class("a::Marked").with_marker(SerialMarker::Polymorphic);
        let sealed = TypeEntry::sealed("a::Root").with_marker(SerialMarker::Polymorphic);

        assert_eq!(SerialKind::of_entry(&plain), SerialKind::Class);
        assert_eq!(
            SerialKind::of_entry(&marked),
            SerialKind::Polymorphic(PolymorphicKind::Open)
        );
        assert_eq!(
            SerialKind::of_entry(&sealed),
            SerialKind::Polymorphic(PolymorphicKind::Sealed)
        );
        assert_eq!(SerialKind::of(TypeKind::Abstract), SerialKind::Polymorphic(PolymorphicKind::Open));
    }
}
