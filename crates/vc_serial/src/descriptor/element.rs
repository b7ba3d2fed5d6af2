use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::marker::{EncodeDefault, InfoAnnotation};
use crate::serializer::ResolvedSerializer;
use crate::table::TypeRef;

// -----------------------------------------------------------------------------
// ElementDescriptor

/// One encoded element of a [`SerialDescriptor`](crate::descriptor::SerialDescriptor).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ElementDescriptor {
    name: Arc<str>,
    ty: TypeRef,
    annotations: Vec<InfoAnnotation>,
    optional: bool,
    encode_default: EncodeDefault,
    // `None` for enum entries.
    serializer: Option<ResolvedSerializer>,
}

impl ElementDescriptor {
    pub(crate) fn new(
        name: Arc<str>,
        ty: TypeRef,
        annotations: Vec<InfoAnnotation>,
        optional: bool,
        encode_default: EncodeDefault,
        serializer: Option<ResolvedSerializer>,
    ) -> Self {
        Self {
            name,
            ty,
            annotations,
            optional,
            encode_default,
            serializer,
        }
    }

    /// Returns the serial name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[inline]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Returns the info annotations attached to the member.
    #[inline]
    pub fn annotations(&self) -> &[InfoAnnotation] {
        &self.annotations
    }

    /// Returns `true` if decoders may omit the element: the member has a
    /// default value and is not `Required`.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns the default-value encoding policy.
    ///
    /// [`EncodeDefault::FormatDefault`] defers the decision to the format
    /// at encode time.
    #[inline]
    pub fn encode_default(&self) -> EncodeDefault {
        self.encode_default
    }

    /// Returns the serializer of the element, `None` for enum entries.
    #[inline]
    pub fn serializer(&self) -> Option<&ResolvedSerializer> {
        self.serializer.as_ref()
    }
}
