use alloc::format;
use alloc::vec::Vec;

use crate::hash::HashMap;
use crate::marker::{MarkerTarget, SerialMarker};
use crate::table::validate::check_markers;
use crate::table::{MemberEntry, TypeEntry, TypeKind};
use crate::{SerialError, TypePath};

// -----------------------------------------------------------------------------
// AnnotationTable

/// The raw marker store, one [`TypeEntry`] per registered type.
///
/// The table is append-only: types are inserted once, markers can be appended
/// to an existing type or member, nothing is ever removed. Every write is
/// validated:
///
/// - markers must support the element they are attached to;
/// - a marker kind appears at most once per element, info annotations at most
///   once per annotation type;
/// - `Transient` members must have a default value.
///
/// A rejected write leaves the table untouched.
///
/// # Example
///
/// ```
/// use vc_serial::SerialError;
/// use vc_serial::marker::SerialMarker;
/// use vc_serial::table::{AnnotationTable, MemberEntry, TypeEntry, TypeRef};
///
/// let mut table = AnnotationTable::new();
/// table.insert(
///     TypeEntry::class("app::Point")
///         .with_member(MemberEntry::new("x", TypeRef::of("f64")))
///         .with_member(MemberEntry::new("cache", TypeRef::of("u64"))),
/// ).unwrap();
///
/// let err = table
///     .record_member(&"app::Point".into(), "cache", [SerialMarker::Transient])
///     .unwrap_err();
/// assert!(matches!(err, SerialError::TransientWithoutDefault { .. }));
///
/// let point = table.lookup(&"app::Point".into()).unwrap();
/// assert!(!point.member("cache").unwrap().is_transient());
/// ```
#[derive(Debug, Default)]
pub struct AnnotationTable {
    entries: HashMap<TypePath, TypeEntry>,
    // Registration order, keeps iteration deterministic.
    order: Vec<TypePath>,
}

impl AnnotationTable {
    /// Creates an empty table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new type after validating all of its markers.
    ///
    /// Fails with [`SerialError::DuplicateType`] if the path is already present.
    pub fn insert(&mut self, entry: TypeEntry) -> Result<(), SerialError> {
        if self.entries.contains_key(entry.path()) {
            return Err(SerialError::DuplicateType(entry.path().clone()));
        }

        let path = entry.path();
        check_markers(&[], entry.markers(), MarkerTarget::Type, path.as_str())?;

        let target = entry.kind().member_target();
        for (index, member) in entry.members().iter().enumerate() {
            if entry.members()[..index].iter().any(|m| m.name() == member.name()) {
                return Err(SerialError::DuplicateMember {
                    ty: path.clone(),
                    member: member.name().into(),
                });
            }
            check_member(path, member, &[], member.markers(), target)?;
        }

        self.push(entry);
        Ok(())
    }

    /// Inserts a built-in type, which carries neither members nor markers
    /// and so needs no validation. An existing entry is kept.
    pub(crate) fn insert_builtin(&mut self, path: TypePath, kind: TypeKind) {
        if !self.entries.contains_key(&path) {
            self.push(TypeEntry::new(path, kind));
        }
    }

    fn push(&mut self, entry: TypeEntry) {
        let path = entry.path().clone();
        log::trace!("recorded type `{path}` with {} members", entry.members().len());
        self.order.push(path.clone());
        self.entries.insert(path, entry);
    }

    /// Appends type-level markers to an already inserted type.
    pub fn record(
        &mut self,
        ty: &TypePath,
        markers: impl IntoIterator<Item = SerialMarker>,
    ) -> Result<(), SerialError> {
        let entry = self
            .entries
            .get_mut(ty)
            .ok_or_else(|| SerialError::UnknownType(ty.clone()))?;

        let markers: Vec<SerialMarker> = markers.into_iter().collect();
        check_markers(entry.markers(), &markers, MarkerTarget::Type, ty.as_str())?;
        entry.push_markers(markers);
        Ok(())
    }

    /// Appends markers to a member of an already inserted type.
    pub fn record_member(
        &mut self,
        ty: &TypePath,
        member: &str,
        markers: impl IntoIterator<Item = SerialMarker>,
    ) -> Result<(), SerialError> {
        let entry = self
            .entries
            .get_mut(ty)
            .ok_or_else(|| SerialError::UnknownType(ty.clone()))?;

        let target = entry.kind().member_target();
        let member_entry = entry
            .member_mut(member)
            .ok_or_else(|| SerialError::UnknownMember {
                ty: ty.clone(),
                member: member.into(),
            })?;

        let markers: Vec<SerialMarker> = markers.into_iter().collect();
        check_member(ty, member_entry, member_entry.markers(), &markers, target)?;
        member_entry.push_markers(markers);
        Ok(())
    }

    /// Returns the entry of the given type.
    pub fn lookup(&self, ty: &TypePath) -> Result<&TypeEntry, SerialError> {
        self.entries
            .get(ty)
            .ok_or_else(|| SerialError::UnknownType(ty.clone()))
    }

    /// Returns the entry of the given type, if present.
    #[inline]
    pub fn get(&self, ty: &str) -> Option<&TypeEntry> {
        self.entries.get(ty)
    }

    /// Returns `true` if the type has been inserted.
    #[inline]
    pub fn contains(&self, ty: &str) -> bool {
        self.entries.contains_key(ty)
    }

    /// Returns the number of inserted types.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no type has been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns an iterator over the entries in registration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeEntry> {
        // `order` and `entries` always hold the same keys.
        self.order.iter().map(|path| &self.entries[path])
    }
}

fn check_member(
    ty: &TypePath,
    member: &MemberEntry,
    existing: &[SerialMarker],
    added: &[SerialMarker],
    target: MarkerTarget,
) -> Result<(), SerialError> {
    let label = format!("{ty}::{}", member.name());
    check_markers(existing, added, target, &label)?;

    if !member.has_default() && added.contains(&SerialMarker::Transient) {
        return Err(SerialError::TransientWithoutDefault {
            ty: ty.clone(),
            member: member.name().into(),
        });
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::AnnotationTable;
    use crate::marker::{EncodeDefault, InfoAnnotation, SerialMarker};
    use crate::table::{MemberEntry, TypeEntry, TypeKind, TypeRef};
    use crate::{SerialError, TypePath};

    fn point() -> TypeEntry {
        TypeEntry::class("geo::Point")
            .with_member(MemberEntry::new("x", TypeRef::of("f64")))
            .with_member(MemberEntry::new("y", TypeRef::of("f64")).with_default())
    }

    #[test]
    fn insert_and_lookup() {
        let mut table = AnnotationTable::new();
        table.insert(point()).unwrap();

        let entry = table.lookup(&TypePath::new("geo::Point")).unwrap();
        assert_eq!(entry.members().len(), 2);
        assert_eq!(table.len(), 1);

        let missing = table.lookup(&TypePath::new("geo::Line")).unwrap_err();
        assert_eq!(missing, SerialError::UnknownType("geo::Line".into()));
    }

    #[test]
    fn double_insert_is_rejected() {
        let mut table = AnnotationTable::new();
        table.insert(point()).unwrap();
        let err = table.insert(point()).unwrap_err();
        assert_eq!(err, SerialError::DuplicateType("geo::Point".into()));
    }

    #[test]
    fn duplicate_member_is_rejected() {
        let entry = point().with_member(MemberEntry::new("x", TypeRef::of("i32")));
        let err = AnnotationTable::new().insert(entry).unwrap_err();
        assert!(matches!(err, SerialError::DuplicateMember { .. }));
    }

    #[test]
    fn transient_without_default_at_insert() {
        let entry = TypeEntry::class("a::B").with_member(
            MemberEntry::new("cache", TypeRef::of("u64")).with_marker(SerialMarker::Transient),
        );
        let err = AnnotationTable::new().insert(entry).unwrap_err();
        assert_eq!(
            err,
            SerialError::TransientWithoutDefault {
                ty: "a::B".into(),
                member: "cache".into(),
            }
        );
    }

    #[test]
    fn record_appends_and_validates() {
        let mut table = AnnotationTable::new();
        table.insert(point()).unwrap();
        let path = TypePath::new("geo::Point");

        table
            .record_member(&path, "y", [SerialMarker::EncodeDefault(EncodeDefault::Always)])
            .unwrap();
        let err = table
            .record_member(&path, "y", [SerialMarker::EncodeDefault(EncodeDefault::Never)])
            .unwrap_err();
        assert!(matches!(err, SerialError::DuplicateNonRepeatableMarker { .. }));

        let entry = table.lookup(&path).unwrap();
        assert_eq!(
            entry.member("y").unwrap().encode_default(),
            Some(EncodeDefault::Always)
        );

        table
            .record(&path, [SerialMarker::Info(InfoAnnotation::new("Doc"))])
            .unwrap();
        let err = table
            .record(&path, [SerialMarker::Info(InfoAnnotation::new("Doc"))])
            .unwrap_err();
        assert!(matches!(err, SerialError::DuplicateNonRepeatableMarker { .. }));
    }

    #[test]
    fn record_on_unknown_member() {
        let mut table = AnnotationTable::new();
        table.insert(point()).unwrap();
        let err = table
            .record_member(&"geo::Point".into(), "z", [SerialMarker::Required])
            .unwrap_err();
        assert!(matches!(err, SerialError::UnknownMember { .. }));
    }

    #[test]
    fn enum_entries_reject_member_markers() {
        let entry = TypeEntry::enumeration("a::Color", ["Red", "Green"]);
        let mut table = AnnotationTable::new();
        table.insert(entry).unwrap();

        let path = TypePath::new("a::Color");
        table
            .record_member(&path, "Red", [SerialMarker::SerialName("red".into())])
            .unwrap();
        let err = table
            .record_member(&path, "Green", [SerialMarker::Required])
            .unwrap_err();
        assert!(matches!(err, SerialError::InvalidAnnotationTarget { .. }));
    }

    #[test]
    fn builtin_insert_skips_existing_paths() {
        let mut table = AnnotationTable::new();
        table.insert_builtin("u8".into(), TypeKind::Primitive);
        table.insert_builtin("u8".into(), TypeKind::Primitive);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(&"u8".into()).unwrap().kind(), TypeKind::Primitive);
    }

    #[test]
    fn iteration_follows_registration_order() {
        let mut table = AnnotationTable::new();
        for name in ["z::A", "a::B", "m::C"] {
            table.insert(TypeEntry::class(name)).unwrap();
        }
        let order: Vec<_> = table.iter().map(|e| e.path().as_str()).collect();
        assert_eq!(order, ["z::A", "a::B", "m::C"]);
    }
}
