//! Propagation of inheritable info annotations.
//!
//! An [`InfoAnnotation`] flagged as inheritable on a supertype applies to
//! every registered subtype, through any number of levels and across
//! diamond-shaped hierarchies. All occurrences of one annotation type in a
//! type's supertype closure, and on the type itself, must carry the same
//! arguments.

use alloc::vec::Vec;

use crate::hash::HashSet;
use crate::marker::{InfoAnnotation, SerialMarker};
use crate::table::{AnnotationTable, TypeEntry};
use crate::{SerialError, TypePath};

// -----------------------------------------------------------------------------
// ResolvedMarkers

/// The markers of one type after inheritance resolution.
#[derive(Debug, Clone)]
pub struct ResolvedMarkers<'a> {
    entry: &'a TypeEntry,
    ancestors: Vec<TypePath>,
    inherited: Vec<InfoAnnotation>,
}

impl<'a> ResolvedMarkers<'a> {
    /// Returns the resolved type.
    #[inline]
    pub fn entry(&self) -> &'a TypeEntry {
        self.entry
    }

    /// Returns the markers attached directly to the type.
    #[inline]
    pub fn direct(&self) -> &'a [SerialMarker] {
        self.entry.markers()
    }

    /// Returns the supertype closure, supertypes before subtypes,
    /// each type exactly once.
    #[inline]
    pub fn ancestors(&self) -> &[TypePath] {
        &self.ancestors
    }

    /// Returns the inheritable annotations collected from the supertype
    /// closure, deduplicated, in visiting order.
    #[inline]
    pub fn inherited(&self) -> &[InfoAnnotation] {
        &self.inherited
    }

    /// Returns the merged annotation set: direct info annotations first,
    /// then inherited ones not already declared directly.
    pub fn annotations(&self) -> Vec<InfoAnnotation> {
        let mut merged: Vec<InfoAnnotation> = self.entry.infos().cloned().collect();
        for info in &self.inherited {
            if !merged.iter().any(|m| m.same_type(info)) {
                merged.push(info.clone());
            }
        }
        merged
    }
}

// -----------------------------------------------------------------------------
// InheritanceResolver

/// Resolves the inherited markers of registered types.
///
/// # Example
///
/// ```
/// use vc_serial::TypePath;
/// use vc_serial::inherit::InheritanceResolver;
/// use vc_serial::marker::InfoAnnotation;
/// use vc_serial::table::{AnnotationTable, TypeEntry};
///
/// let tag = InfoAnnotation::new("Tag").with_arg("v", 1).inheritable();
///
/// let mut table = AnnotationTable::new();
/// table.insert(TypeEntry::interface("I").with_marker(tag.clone())).unwrap();
/// table.insert(TypeEntry::class("Base").with_supertype("I")).unwrap();
/// table.insert(TypeEntry::class("Derived").with_supertype("Base")).unwrap();
///
/// let resolved = InheritanceResolver::new(&table).resolve(&"Derived".into()).unwrap();
/// assert_eq!(resolved.ancestors(), [TypePath::new("I"), TypePath::new("Base")]);
/// assert_eq!(resolved.annotations(), [tag]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InheritanceResolver<'a> {
    table: &'a AnnotationTable,
}

impl<'a> InheritanceResolver<'a> {
    #[inline]
    pub fn new(table: &'a AnnotationTable) -> Self {
        Self { table }
    }

    /// Resolves a registered type.
    ///
    /// # Errors
    ///
    /// - [`SerialError::UnknownType`]: the type or one of its supertypes is not registered.
    /// - [`SerialError::CyclicInheritance`]: the type is reachable from its own supertypes.
    /// - [`SerialError::ConflictingInheritedAnnotation`]: see the module docs.
    pub fn resolve(&self, ty: &TypePath) -> Result<ResolvedMarkers<'a>, SerialError> {
        self.resolve_entry(self.table.lookup(ty)?)
    }

    /// Resolves an entry that may not be inserted into the table yet.
    pub fn resolve_entry<'e>(&self, entry: &'e TypeEntry) -> Result<ResolvedMarkers<'e>, SerialError>
    where
        'a: 'e,
    {
        let root = entry.path();
        let mut visit = Visit {
            table: self.table,
            root,
            visited: HashSet::default(),
            stack: Vec::new(),
            order: Vec::new(),
        };
        for supertype in entry.supertypes() {
            visit.visit(supertype)?;
        }
        let ancestors = visit.order;

        let mut inherited: Vec<InfoAnnotation> = Vec::new();
        for ancestor in &ancestors {
            let ancestor = self.table.lookup(ancestor)?;
            for info in ancestor.infos().filter(|i| i.is_inheritable()) {
                match inherited.iter().find(|i| i.same_type(info)) {
                    Some(seen) if !seen.same_args(info) => return Err(conflict(info, root)),
                    Some(_) => {}
                    None => inherited.push(info.clone()),
                }
            }
        }

        // Direct declarations are peers, not overrides.
        for info in entry.infos() {
            if let Some(seen) = inherited.iter().find(|i| i.same_type(info))
                && !seen.same_args(info)
            {
                return Err(conflict(info, root));
            }
        }

        Ok(ResolvedMarkers {
            entry,
            ancestors,
            inherited,
        })
    }
}

fn conflict(info: &InfoAnnotation, ty: &TypePath) -> SerialError {
    SerialError::ConflictingInheritedAnnotation {
        annotation: info.annotation_type().into(),
        ty: ty.clone(),
    }
}

// Post-order depth-first walk over the supertype graph.
struct Visit<'t, 'r> {
    table: &'t AnnotationTable,
    root: &'r TypePath,
    visited: HashSet<TypePath>,
    stack: Vec<TypePath>,
    order: Vec<TypePath>,
}

impl Visit<'_, '_> {
    fn visit(&mut self, ty: &TypePath) -> Result<(), SerialError> {
        if ty == self.root || self.stack.contains(ty) {
            return Err(SerialError::CyclicInheritance(ty.clone()));
        }
        if self.visited.contains(ty) {
            return Ok(());
        }

        let entry = self.table.lookup(ty)?;
        self.stack.push(ty.clone());
        for supertype in entry.supertypes() {
            self.visit(supertype)?;
        }
        self.stack.pop();

        self.visited.insert(ty.clone());
        self.order.push(ty.clone());
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
