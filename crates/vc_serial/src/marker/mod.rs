//! Raw serialization markers, as found on types and members.
//!
//! ## Menu
//!
//! - [`SerialMarker`]: One marker attached to a type or a member.
//! - [`MarkerKind`]: The payload-free kind of a marker, used for diagnostics and duplicate checks.
//! - [`MarkerTarget`]: The kind of element a marker is attached to.
//! - [`EncodeDefault`]: Default-value encoding policy of a member.
//! - [`InfoAnnotation`]: A user-defined annotation forwarded into descriptors.
//! - [`InfoValue`]: An argument value of an [`InfoAnnotation`].

// -----------------------------------------------------------------------------
// Modules

mod info;
mod kind;
mod serial_marker;

// -----------------------------------------------------------------------------
// Exports

pub use info::{InfoAnnotation, InfoValue};
pub use kind::{MarkerKind, MarkerTarget};
pub use serial_marker::{EncodeDefault, SerialMarker};
