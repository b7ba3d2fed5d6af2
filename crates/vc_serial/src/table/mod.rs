//! Raw per-type and per-member marker storage.
//!
//! ## Menu
//!
//! - [`TypeEntry`]: A registered type with its members, markers and supertypes.
//! - [`MemberEntry`]: A member (property or enum entry) of a [`TypeEntry`].
//! - [`TypeRef`]: A declared type usage.
//! - [`TypeKind`]: The declaration kind of a type.
//! - [`AnnotationTable`]: An append-only store of [`TypeEntry`]s that validates markers.

// -----------------------------------------------------------------------------
// Modules

mod annotation_table;
mod member_entry;
mod type_entry;
mod validate;

// -----------------------------------------------------------------------------
// Exports

pub use annotation_table::AnnotationTable;
pub use member_entry::{MemberEntry, TypeRef};
pub use type_entry::{TypeEntry, TypeKind};

pub(crate) use validate::check_markers;
