//! A declarative serialization-descriptor model.
//!
//! Serialization markers (serial names, transience, default-encoding policy,
//! contextual and polymorphic flags, custom serializers, info annotations)
//! are recorded per type and per member by an external discovery step
//! (a code generator or a reflection bootstrapper). This crate turns them
//! into an immutable per-type [`SerialDescriptor`] and resolves which
//! serializer applies to each type usage.
//!
//! ## Menu
//!
//! - [`marker`]: [`SerialMarker`] and [`InfoAnnotation`], the raw inputs.
//! - [`table`]: [`AnnotationTable`], [`TypeEntry`] and [`MemberEntry`].
//! - [`inherit`]: [`InheritanceResolver`], inheritable annotation propagation.
//! - [`scope`]: [`FileScope`], compilation-unit level registrations.
//! - [`descriptor`]: [`SerialDescriptor`] and the [`DescriptorBuilder`].
//! - [`serializer`]: serializer resolution and the runtime [`ContextualModule`].
//! - [`registry`]: [`SerialRegistry`], the entry point for encoders and decoders.
//!   Requires the `std` feature.
//!
//! # Example
//!
//! ```
//! use vc_serial::marker::{EncodeDefault, SerialMarker};
//! use vc_serial::table::{MemberEntry, TypeEntry, TypeRef};
//! use vc_serial::registry::SerialRegistry;
//!
//! let mut registry = SerialRegistry::new();
//!
//! let user = TypeEntry::class("app::model::User")
//!     .with_marker(SerialMarker::SerialName("user".into()))
//!     .with_member(MemberEntry::new("id", TypeRef::of("u64")))
//!     .with_member(
//!         MemberEntry::new("display_name", TypeRef::of("String"))
//!             .with_marker(SerialMarker::SerialName("name".into())),
//!     )
//!     .with_member(
//!         MemberEntry::new("admin", TypeRef::of("bool"))
//!             .with_default()
//!             .with_marker(SerialMarker::EncodeDefault(EncodeDefault::Never)),
//!     );
//!
//! registry.register_type(user).unwrap();
//!
//! let descriptor = registry.get_descriptor(&"app::model::User".into()).unwrap();
//! assert_eq!(descriptor.serial_name(), "user");
//! assert_eq!(descriptor.element_names().collect::<Vec<_>>(), ["id", "name", "admin"]);
//! assert!(descriptor.element_index("display_name").is_none());
//! assert!(descriptor.element(2).unwrap().is_optional());
//! ```
//!
//! [`SerialMarker`]: marker::SerialMarker
//! [`InfoAnnotation`]: marker::InfoAnnotation
//! [`AnnotationTable`]: table::AnnotationTable
//! [`TypeEntry`]: table::TypeEntry
//! [`MemberEntry`]: table::MemberEntry
//! [`InheritanceResolver`]: inherit::InheritanceResolver
//! [`FileScope`]: scope::FileScope
//! [`SerialDescriptor`]: descriptor::SerialDescriptor
//! [`DescriptorBuilder`]: descriptor::DescriptorBuilder
//! [`ContextualModule`]: serializer::ContextualModule
//! [`SerialRegistry`]: registry::SerialRegistry
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod hash;
mod ident;

pub mod descriptor;
pub mod inherit;
pub mod marker;
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod registry;
pub mod scope;
pub mod serializer;
pub mod table;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::SerialError;
pub use ident::{SerializerId, TypePath, UnitId};
