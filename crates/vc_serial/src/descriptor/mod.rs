//! Immutable serialization descriptors.
//!
//! ## Menu
//!
//! - [`SerialDescriptor`]: The serialization plan of one type: serial name, kind, ordered elements, annotations.
//! - [`ElementDescriptor`]: One encoded element (member or enum entry) of a [`SerialDescriptor`].
//! - [`SerialKind`]: The structural kind of a descriptor.
//! - [`DescriptorBuilder`]: Derives a [`SerialDescriptor`] from an [`AnnotationTable`].
//!
//! [`AnnotationTable`]: crate::table::AnnotationTable

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod element;
mod serial_descriptor;

// -----------------------------------------------------------------------------
// Exports

pub use builder::DescriptorBuilder;
pub use element::ElementDescriptor;
pub use serial_descriptor::{SerialDescriptor, SerialKind};
