use alloc::string::String;
use alloc::sync::Arc;
use core::borrow::Borrow;
use core::fmt;

// -----------------------------------------------------------------------------
// Shared string identifiers

macro_rules! define_ident {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
        pub struct $name(Arc<str>);

        impl $name {
            /// Returns the identifier as a string slice.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(&*self.0, f)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl Borrow<str> for $name {
            #[inline]
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// TypePath

define_ident! {
    /// The fully qualified identifier of a type, e.g. `my_app::model::User`.
    ///
    /// A `TypePath` is the key of every table in this crate and the default
    /// serial name of a type. We guarantee it has no `::` prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_serial::TypePath;
    ///
    /// let path = TypePath::new("::my_app::model::User");
    /// assert_eq!(path.as_str(), "my_app::model::User");
    /// assert_eq!(path.type_name(), "User");
    /// assert_eq!(path.module_path(), Some("my_app::model"));
    ///
    /// let unit = TypePath::new("bool");
    /// assert_eq!(unit.module_path(), None);
    /// ```
    TypePath
}

impl TypePath {
    /// Creates a new `TypePath`, stripping a leading `::`.
    pub fn new(path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        Self(Arc::from(path.strip_prefix("::").unwrap_or(path)))
    }

    /// Returns the type name without module path.
    pub fn type_name(&self) -> &str {
        match self.0.rfind("::") {
            Some(index) => &self.0[index + 2..],
            None => &self.0,
        }
    }

    /// Returns the module path, if any.
    pub fn module_path(&self) -> Option<&str> {
        self.0.rfind("::").map(|index| &self.0[..index])
    }
}

// -----------------------------------------------------------------------------
// UnitId

define_ident! {
    /// Identifies a compilation unit (a source file or module) owning a
    /// [`FileScope`](crate::scope::FileScope).
    UnitId
}

impl UnitId {
    /// Creates a new `UnitId`.
    #[inline]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }
}

// -----------------------------------------------------------------------------
// SerializerId

define_ident! {
    /// A reference to a concrete, user-provided serializer implementation.
    ///
    /// The model never invokes serializers; it only names them so that the
    /// format-specific encoders can look them up.
    SerializerId
}

impl SerializerId {
    /// Creates a new `SerializerId`.
    #[inline]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }
}

// -----------------------------------------------------------------------------
// Tests
