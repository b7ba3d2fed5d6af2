use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// InfoValue

/// An argument value of an [`InfoAnnotation`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum InfoValue {
    Bool(bool),
    Int(i64),
    Str(Arc<str>),
    List(Vec<InfoValue>),
}

impl fmt::Display for InfoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::Str(v) => fmt::Debug::fmt(&**v, f),
            Self::List(v) => f.debug_list().entries(v.iter().map(DisplayAsDebug)).finish(),
        }
    }
}

struct DisplayAsDebug<'a>(&'a InfoValue);

impl fmt::Debug for DisplayAsDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

impl From<bool> for InfoValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for InfoValue {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for InfoValue {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for InfoValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Str(Arc::from(value))
    }
}

impl<T: Into<InfoValue>> From<Vec<T>> for InfoValue {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

// -----------------------------------------------------------------------------
// InfoAnnotation

/// A user-defined annotation that is forwarded into descriptors.
///
/// Info annotations carry no meaning for the model itself, they are exposed
/// to format implementations through [`SerialDescriptor::annotations`] and
/// [`ElementDescriptor::annotations`]. An annotation marked
/// [`inheritable`](Self::inheritable) is also propagated from supertypes to
/// every registered subtype.
///
/// Two annotations are the same annotation when their [`annotation_type`]s
/// are equal, they carry the same value when their argument lists are equal.
///
/// # Examples
///
/// ```
/// use vc_serial::marker::InfoAnnotation;
///
/// let tag = InfoAnnotation::new("proto::Tag").with_arg("id", 7).inheritable();
///
/// assert!(tag.is_inheritable());
/// assert_eq!(tag.annotation_type(), "proto::Tag");
/// assert_eq!(tag.arg("id"), Some(&7.into()));
/// assert_eq!(tag.to_string(), "@proto::Tag(id = 7)");
/// ```
///
/// [`SerialDescriptor::annotations`]: crate::descriptor::SerialDescriptor::annotations
/// [`ElementDescriptor::annotations`]: crate::descriptor::ElementDescriptor::annotations
/// [`annotation_type`]: Self::annotation_type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InfoAnnotation {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    annotation_type: Arc<str>,
    args: Vec<(Arc<str>, InfoValue)>,
    inheritable: bool,
}

impl InfoAnnotation {
    /// Creates an annotation of the given type with no arguments.
    pub fn new(annotation_type: &str) -> Self {
        Self {
            annotation_type: Arc::from(annotation_type),
            args: Vec::new(),
            inheritable: false,
        }
    }

    /// Appends an argument, argument order is preserved.
    pub fn with_arg(mut self, key: &str, value: impl Into<InfoValue>) -> Self {
        self.args.push((Arc::from(key), value.into()));
        self
    }

    /// Marks the annotation as inheritable.
    #[inline]
    pub fn inheritable(self) -> Self {
        Self {
            inheritable: true,
            ..self
        }
    }

    /// Returns the annotation type name.
    #[inline]
    pub fn annotation_type(&self) -> &str {
        &self.annotation_type
    }

    /// Returns the arguments in declaration order.
    #[inline]
    pub fn args(&self) -> &[(Arc<str>, InfoValue)] {
        &self.args
    }

    /// Returns the value of the argument named `key`.
    pub fn arg(&self, key: &str) -> Option<&InfoValue> {
        self.args
            .iter()
            .find(|(name, _)| &**name == key)
            .map(|(_, value)| value)
    }

    /// Returns `true` if this annotation propagates to subtypes.
    #[inline]
    pub fn is_inheritable(&self) -> bool {
        self.inheritable
    }

    /// Returns `true` if both annotations have the same type.
    #[inline]
    pub fn same_type(&self, other: &Self) -> bool {
        self.annotation_type == other.annotation_type
    }

    /// Returns `true` if both argument tuples are structurally equal.
    #[inline]
    pub fn same_args(&self, other: &Self) -> bool {
        self.args == other.args
    }
}

impl fmt::Display for InfoAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.annotation_type)?;
        if self.args.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (index, (key, value)) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key} = {value}")?;
        }
        f.write_str(")")
    }
}

// -----------------------------------------------------------------------------
// Tests
