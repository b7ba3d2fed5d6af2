//! The entry point for encoders and decoders.
//!
//! ## Menu
//!
//! - [`SerialRegistry`]: Owns the annotation table, the file scopes and the
//!   descriptor cache.
//! - [`SerialRegistryArc`]: A shared, lockable [`SerialRegistry`].
//! - [`UsageSite`]: The markers and compilation unit of one type usage.

use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::descriptor::{DescriptorBuilder, SerialDescriptor};
use crate::hash::{HashMap, HashSet};
use crate::inherit::InheritanceResolver;
use crate::marker::{MarkerTarget, SerialMarker};
use crate::scope::FileScope;
use crate::serializer::{ResolvedSerializer, SerializerResolver};
use crate::table::{AnnotationTable, TypeEntry, TypeKind, check_markers};
use crate::{SerialError, SerializerId, TypePath, UnitId};

// -----------------------------------------------------------------------------
// UsageSite

/// The markers and compilation unit of one type usage.
///
/// The unit selects the [`FileScope`] consulted during resolution; a usage
/// without unit sees no file-level registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageSite {
    markers: Vec<SerialMarker>,
    unit: Option<UnitId>,
}

impl UsageSite {
    /// Creates a usage site without markers, outside of any unit.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_marker(mut self, marker: impl Into<SerialMarker>) -> Self {
        self.markers.push(marker.into());
        self
    }

    #[inline]
    pub fn with_markers(mut self, markers: impl IntoIterator<Item = SerialMarker>) -> Self {
        self.markers.extend(markers);
        self
    }

    #[inline]
    pub fn in_unit(mut self, unit: impl Into<UnitId>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[inline]
    pub fn markers(&self) -> &[SerialMarker] {
        &self.markers
    }

    #[inline]
    pub fn unit(&self) -> Option<&UnitId> {
        self.unit.as_ref()
    }
}

// -----------------------------------------------------------------------------
// SerialRegistry

/// Registered types and file scopes, with lazily built descriptors.
///
/// Registration takes `&mut self` and happens once per type and once per
/// compilation unit, typically at startup. Lookups take `&self` and may run
/// from many threads; descriptors are built on first request and cached
/// until the next registration.
///
/// After [`seal`](Self::seal), every registration fails with
/// [`SerialError::RegistrySealed`].
///
/// # Example
///
/// ```
/// use vc_serial::marker::SerialMarker;
/// use vc_serial::registry::{SerialRegistry, UsageSite};
/// use vc_serial::scope::FileScope;
/// use vc_serial::serializer::{ResolutionSource, SerializerRef};
/// use vc_serial::table::{MemberEntry, TypeEntry, TypeRef};
///
/// let mut registry = SerialRegistry::new();
/// registry.register_file_scope(
///     FileScope::new("app/order.rs").with_serializer("app::Money", "app::MoneyAsCents"),
/// ).unwrap();
/// registry.register_type(TypeEntry::class("app::Money")).unwrap();
/// registry.register_type(
///     TypeEntry::class("app::Order")
///         .in_unit("app/order.rs")
///         .with_member(MemberEntry::new("total", TypeRef::of("app::Money")))
///         .with_member(
///             MemberEntry::new("tax", TypeRef::of("app::Money"))
///                 .with_marker(SerialMarker::With("app::MoneyAsString".into())),
///         ),
/// ).unwrap();
/// registry.seal();
///
/// let order = registry.get_descriptor(&"app::Order".into()).unwrap();
/// let total = order.element(0).unwrap().serializer().unwrap();
/// assert_eq!(total.source(), ResolutionSource::FileScope);
/// let tax = order.element(1).unwrap().serializer().unwrap();
/// assert_eq!(tax.serializer(), &SerializerRef::Custom("app::MoneyAsString".into()));
///
/// let outside = registry.get_serializer(&"app::Money".into(), &UsageSite::new()).unwrap();
/// assert_eq!(outside.serializer(), &SerializerRef::Generated("app::Money".into()));
/// ```
#[derive(Debug)]
pub struct SerialRegistry {
    table: AnnotationTable,
    scopes: HashMap<UnitId, FileScope>,
    cache: RwLock<HashMap<TypePath, Arc<SerialDescriptor>>>,
    sealed: bool,
}

impl Default for SerialRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SerialRegistry {
    /// Built-in types registered by [`SerialRegistry::new`].
    pub const PRIMITIVES: &'static [&'static str] = &[
        "()", "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32",
        "u64", "u128", "usize", "f32", "f64", "String",
    ];

    /// Creates a registry without any registered type.
    pub fn empty() -> Self {
        Self {
            table: AnnotationTable::new(),
            scopes: HashMap::default(),
            cache: RwLock::new(HashMap::default()),
            sealed: false,
        }
    }

    /// Creates a registry with the [primitive types](Self::PRIMITIVES) registered.
    pub fn new() -> Self {
        let mut this = Self::empty();
        for primitive in Self::PRIMITIVES {
            this.table
                .insert_builtin(TypePath::new(primitive), TypeKind::Primitive);
        }
        this
    }

    // -------------------------------------------------------------------------
    // Registration

    /// Registers a type with its members and markers.
    ///
    /// Inherited annotations are checked immediately against the supertypes
    /// already registered. Conflicts involving supertypes registered later
    /// are reported when the descriptor is built.
    ///
    /// # Errors
    ///
    /// - [`SerialError::RegistrySealed`]
    /// - [`SerialError::DuplicateType`], [`SerialError::DuplicateMember`]
    /// - [`SerialError::InvalidAnnotationTarget`], [`SerialError::DuplicateNonRepeatableMarker`],
    ///   [`SerialError::IncompatibleMarkers`], [`SerialError::TransientWithoutDefault`]
    /// - [`SerialError::ConflictingInheritedAnnotation`], [`SerialError::CyclicInheritance`]
    pub fn register_type(&mut self, entry: TypeEntry) -> Result<(), SerialError> {
        self.ensure_open()?;
        if self.table.contains(entry.path().as_str()) {
            return Err(SerialError::DuplicateType(entry.path().clone()));
        }

        self.check_inheritance(&entry)?;

        let path = entry.path().clone();
        self.table.insert(entry)?;
        self.invalidate();
        log::debug!("registered serializable type `{path}`");
        Ok(())
    }

    /// Appends type-level markers to a registered type.
    ///
    /// The updated type is checked against its registered supertypes like in
    /// [`register_type`](Self::register_type). A rejected call leaves the
    /// registry untouched.
    ///
    /// See [`AnnotationTable::record`].
    pub fn record(
        &mut self,
        ty: &TypePath,
        markers: impl IntoIterator<Item = SerialMarker>,
    ) -> Result<(), SerialError> {
        self.ensure_open()?;
        let markers: Vec<SerialMarker> = markers.into_iter().collect();

        let mut updated = self.table.lookup(ty)?.clone();
        check_markers(updated.markers(), &markers, MarkerTarget::Type, ty.as_str())?;
        updated.push_markers(markers.clone());
        self.check_inheritance(&updated)?;

        self.table.record(ty, markers)?;
        self.invalidate();
        Ok(())
    }

    /// Appends markers to a member of a registered type.
    ///
    /// See [`AnnotationTable::record_member`].
    pub fn record_member(
        &mut self,
        ty: &TypePath,
        member: &str,
        markers: impl IntoIterator<Item = SerialMarker>,
    ) -> Result<(), SerialError> {
        self.ensure_open()?;
        self.table.record_member(ty, member, markers)?;
        self.invalidate();
        Ok(())
    }

    /// Registers the file scope of a compilation unit.
    ///
    /// # Errors
    ///
    /// - [`SerialError::RegistrySealed`]
    /// - [`SerialError::DuplicateFileScope`]: the unit already has a scope.
    pub fn register_file_scope(&mut self, scope: FileScope) -> Result<(), SerialError> {
        self.ensure_open()?;
        if self.scopes.contains_key(scope.unit()) {
            return Err(SerialError::DuplicateFileScope(scope.unit().clone()));
        }

        log::debug!(
            "registered file scope `{}`: {} contextual, {} serializer bindings",
            scope.unit(),
            scope.contextual_targets().len(),
            scope.serializer_bindings().len(),
        );
        self.scopes.insert(scope.unit().clone(), scope);
        self.invalidate();
        Ok(())
    }

    /// Shortcut of [`register_file_scope`](Self::register_file_scope) from
    /// the raw declarations of a unit.
    pub fn register_file_declarations<C, B>(
        &mut self,
        unit: impl Into<UnitId>,
        contextual: C,
        serializers: B,
    ) -> Result<(), SerialError>
    where
        C: IntoIterator<Item = TypePath>,
        B: IntoIterator<Item = (TypePath, SerializerId)>,
    {
        let mut scope = FileScope::new(unit);
        for target in contextual {
            scope = scope.with_contextual(target);
        }
        for (target, serializer) in serializers {
            scope = scope.with_serializer(target, serializer);
        }
        self.register_file_scope(scope)
    }

    /// Rejects every further registration.
    pub fn seal(&mut self) {
        if !self.sealed {
            self.sealed = true;
            log::debug!("serial registry sealed with {} types", self.table.len());
        }
    }

    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    // Supertypes that are not registered yet are checked at build time.
    fn check_inheritance(&self, entry: &TypeEntry) -> Result<(), SerialError> {
        match InheritanceResolver::new(&self.table).resolve_entry(entry) {
            Ok(_) | Err(SerialError::UnknownType(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }

    #[inline]
    fn ensure_open(&self) -> Result<(), SerialError> {
        if self.sealed {
            return Err(SerialError::RegistrySealed);
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        self.cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    // -------------------------------------------------------------------------
    // Lookup

    /// Returns the descriptor of a registered type, building it on first use.
    ///
    /// Two calls return equal descriptors. Failures are not cached.
    ///
    /// # Errors
    ///
    /// - [`SerialError::UnknownType`]
    /// - [`SerialError::UnknownFileScope`]: the type belongs to a unit without file scope.
    /// - everything [`DescriptorBuilder::build`] reports.
    pub fn get_descriptor(&self, ty: &TypePath) -> Result<Arc<SerialDescriptor>, SerialError> {
        if let Some(descriptor) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
        {
            return Ok(Arc::clone(descriptor));
        }

        log::trace!("building serial descriptor of `{ty}`");
        let entry = self.table.lookup(ty)?;
        let scope = self.scope_of(entry.unit())?;
        let built = Arc::new(DescriptorBuilder::new(&self.table).build(ty, scope)?);

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have finished first, its descriptor wins.
        let cached = cache.entry(ty.clone()).or_insert_with(|| Arc::clone(&built));
        #[cfg(feature = "debug")]
        debug_assert_eq!(**cached, *built, "descriptor of `{ty}` is not deterministic");
        Ok(Arc::clone(cached))
    }

    /// Resolves the serializer of one usage of `ty`.
    ///
    /// # Errors
    ///
    /// - [`SerialError::InvalidAnnotationTarget`], [`SerialError::DuplicateNonRepeatableMarker`],
    ///   [`SerialError::IncompatibleMarkers`]: the usage markers are not valid member markers.
    /// - [`SerialError::UnknownFileScope`]: the usage unit has no file scope.
    /// - everything [`SerializerResolver::resolve`] reports.
    pub fn get_serializer(
        &self,
        ty: &TypePath,
        usage: &UsageSite,
    ) -> Result<ResolvedSerializer, SerialError> {
        check_markers(&[], usage.markers(), MarkerTarget::Member, "usage site")?;
        let scope = self.scope_of(usage.unit())?;
        SerializerResolver::new(&self.table).resolve(ty, usage.markers(), scope)
    }

    fn scope_of(&self, unit: Option<&UnitId>) -> Result<Option<&FileScope>, SerialError> {
        match unit {
            None => Ok(None),
            Some(unit) => self
                .scopes
                .get(unit)
                .map(Some)
                .ok_or_else(|| SerialError::UnknownFileScope(unit.clone())),
        }
    }

    /// Returns the concrete registered subtypes of `root` with their serial
    /// names, in registration order.
    ///
    /// This is the discriminator table of a sealed hierarchy: subtypes are
    /// collected transitively, abstract intermediates are skipped.
    ///
    /// # Errors
    ///
    /// - [`SerialError::UnknownType`]: `root` is not registered.
    /// - [`SerialError::DuplicateSerialName`]: two subtypes share a serial name.
    pub fn sealed_subclasses(
        &self,
        root: &TypePath,
    ) -> Result<Vec<(Arc<str>, TypePath)>, SerialError> {
        self.table.lookup(root)?;

        let mut found: Vec<(Arc<str>, TypePath)> = Vec::new();
        for entry in self.table.iter() {
            let concrete = !entry.is_polymorphic() && entry.kind() != TypeKind::Primitive;
            if !concrete || !self.extends(entry, root) {
                continue;
            }
            let name = entry.serial_name();
            if found.iter().any(|(seen, _)| &**seen == name) {
                return Err(SerialError::DuplicateSerialName {
                    ty: root.clone(),
                    name: name.into(),
                });
            }
            found.push((Arc::from(name), entry.path().clone()));
        }
        Ok(found)
    }

    // Whether `root` is in the supertype closure of `entry`.
    fn extends(&self, entry: &TypeEntry, root: &TypePath) -> bool {
        let mut visited: HashSet<&TypePath> = HashSet::default();
        let mut pending: Vec<&TypePath> = entry.supertypes().iter().collect();
        while let Some(ty) = pending.pop() {
            if ty == root {
                return true;
            }
            if !visited.insert(ty) {
                continue;
            }
            if let Some(supertype) = self.table.get(ty.as_str()) {
                pending.extend(supertype.supertypes());
            }
        }
        false
    }

    /// Drops every cached descriptor.
    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[inline]
    pub fn contains(&self, ty: &str) -> bool {
        self.table.contains(ty)
    }

    #[inline]
    pub fn table(&self) -> &AnnotationTable {
        &self.table
    }

    /// Returns the file scope of a unit.
    #[inline]
    pub fn file_scope(&self, unit: &str) -> Option<&FileScope> {
        self.scopes.get(unit)
    }
}

// -----------------------------------------------------------------------------
// SerialRegistryArc

/// A [`SerialRegistry`] shared between owners.
///
/// Writers take the write lock to register types, readers share the read
/// lock to build descriptors.
#[derive(Clone, Default)]
pub struct SerialRegistryArc {
    /// The wrapped [`SerialRegistry`].
    pub internal: Arc<RwLock<SerialRegistry>>,
}

impl SerialRegistryArc {
    /// Takes a read lock on the underlying [`SerialRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, SerialRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`SerialRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, SerialRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for SerialRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let registry = self.read();
        f.debug_list()
            .entries(registry.table.iter().map(TypeEntry::path))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
