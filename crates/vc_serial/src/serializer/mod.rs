//! Serializer resolution for type usages.
//!
//! ## Menu
//!
//! - [`SerializerRef`]: Which serializer encodes a value: custom, generated, polymorphic or contextual.
//! - [`ResolvedSerializer`]: A [`SerializerRef`] with its alternate generated accessor and its origin.
//! - [`ResolutionSource`]: The priority level that produced a [`ResolvedSerializer`].
//! - [`SerializerResolver`]: The pure resolution function over an [`AnnotationTable`].
//! - [`ContextualModule`]: The runtime scope that fills in contextual placeholders at encode time.
//!
//! ## Priority
//!
//! From highest to lowest:
//!
//! 1. `With` on the usage site.
//! 2. `Contextual` on the usage site, deferred to a [`ContextualModule`].
//! 3. A [`FileScope`] binding or contextual target of the usage's compilation unit.
//! 4. `With` on the target type (`Serializable(with = ..)`).
//! 5. Polymorphic dispatch for interfaces, abstract and sealed types or
//!    `Polymorphic` markers, otherwise the generated serializer.
//!
//! [`AnnotationTable`]: crate::table::AnnotationTable
//! [`FileScope`]: crate::scope::FileScope

// -----------------------------------------------------------------------------
// Modules

mod contextual;
mod resolve;
mod serializer_ref;

// -----------------------------------------------------------------------------
// Exports

pub use contextual::ContextualModule;
pub use resolve::SerializerResolver;
pub use serializer_ref::{PolymorphicKind, ResolutionSource, ResolvedSerializer, SerializerRef};
