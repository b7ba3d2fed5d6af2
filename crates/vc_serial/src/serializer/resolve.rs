use alloc::boxed::Box;

use crate::marker::SerialMarker;
use crate::scope::{FileBinding, FileScope};
use crate::serializer::{PolymorphicKind, ResolutionSource, ResolvedSerializer, SerializerRef};
use crate::table::{AnnotationTable, TypeEntry, TypeKind};
use crate::{SerialError, SerializerId, TypePath};

// -----------------------------------------------------------------------------
// SerializerResolver

/// Resolves the serializer of a type usage, see the [module docs](crate::serializer)
/// for the priority order.
///
/// Resolution is a pure function of the table, the usage-site markers and
/// the file scope: the same inputs always yield the same result.
///
/// # Example
///
/// ```
/// use vc_serial::marker::SerialMarker;
/// use vc_serial::scope::FileScope;
/// use vc_serial::serializer::{ResolutionSource, SerializerResolver, SerializerRef};
/// use vc_serial::table::{AnnotationTable, TypeEntry};
///
/// let mut table = AnnotationTable::new();
/// table.insert(TypeEntry::class("app::Money")).unwrap();
///
/// let scope = FileScope::new("app/lib.rs").with_serializer("app::Money", "app::MoneyAsCents");
/// let resolver = SerializerResolver::new(&table);
/// let ty = "app::Money".into();
///
/// let from_scope = resolver.resolve(&ty, &[], Some(&scope)).unwrap();
/// assert_eq!(from_scope.source(), ResolutionSource::FileScope);
///
/// let usage = [SerialMarker::With("app::MoneyAsString".into())];
/// let explicit = resolver.resolve(&ty, &usage, Some(&scope)).unwrap();
/// assert_eq!(explicit.serializer(), &SerializerRef::Custom("app::MoneyAsString".into()));
/// assert_eq!(explicit.source(), ResolutionSource::UsageWith);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SerializerResolver<'a> {
    table: &'a AnnotationTable,
}

impl<'a> SerializerResolver<'a> {
    #[inline]
    pub fn new(table: &'a AnnotationTable) -> Self {
        Self { table }
    }

    /// Resolves the serializer of a usage of `ty`.
    ///
    /// `usage` holds the markers of the usage site (usually a member),
    /// `scope` the file scope of the compilation unit containing it.
    ///
    /// # Errors
    ///
    /// - [`SerialError::AmbiguousSerializer`]: two candidates of the same priority disagree.
    /// - [`SerialError::UnknownType`]: no usage-site or file-level serializer applies and
    ///   `ty` is not registered.
    pub fn resolve(
        &self,
        ty: &TypePath,
        usage: &[SerialMarker],
        scope: Option<&FileScope>,
    ) -> Result<ResolvedSerializer, SerialError> {
        let entry = self.table.get(ty.as_str());
        let generated = entry
            .filter(|e| e.keeps_generated_serializer())
            .map(|e| SerializerRef::Generated(e.path().clone()));

        if let Some(id) = usage_serializer(ty, usage)? {
            return Ok(ResolvedSerializer::new(
                SerializerRef::Custom(id.clone()),
                ResolutionSource::UsageWith,
            )
            .with_generated(generated));
        }

        if usage.contains(&SerialMarker::Contextual) {
            return Ok(ResolvedSerializer::new(
                contextual(ty, entry, usage),
                ResolutionSource::UsageContextual,
            )
            .with_generated(generated));
        }

        if let Some(scope) = scope {
            let serializer = match scope.binding(ty)? {
                Some(FileBinding::Serializer(id)) => Some(SerializerRef::Custom(id)),
                Some(FileBinding::Contextual) => Some(contextual(ty, entry, usage)),
                None => None,
            };
            if let Some(serializer) = serializer {
                return Ok(
                    ResolvedSerializer::new(serializer, ResolutionSource::FileScope)
                        .with_generated(generated),
                );
            }
        }

        let entry = entry.ok_or_else(|| SerialError::UnknownType(ty.clone()))?;
        let (serializer, source) = static_serializer(entry, usage);
        Ok(ResolvedSerializer::new(serializer, source).with_generated(generated))
    }
}

// Level 1. Repeating the same serializer is harmless, two different ones are not.
fn usage_serializer<'m>(
    ty: &TypePath,
    usage: &'m [SerialMarker],
) -> Result<Option<&'m SerializerId>, SerialError> {
    let mut found: Option<&SerializerId> = None;
    for marker in usage {
        if let SerialMarker::With(id) = marker {
            match found {
                Some(prev) if prev != id => {
                    return Err(SerialError::AmbiguousSerializer { ty: ty.clone() });
                }
                _ => found = Some(id),
            }
        }
    }
    Ok(found)
}

// Levels 4 and 5.
fn static_serializer(
    entry: &TypeEntry,
    usage: &[SerialMarker],
) -> (SerializerRef, ResolutionSource) {
    if let Some(id) = entry.serializer() {
        return (SerializerRef::Custom(id.clone()), ResolutionSource::TypeWith);
    }

    let base = entry.path().clone();
    let serializer = if usage.contains(&SerialMarker::Polymorphic) {
        SerializerRef::Polymorphic {
            base,
            kind: PolymorphicKind::Open,
        }
    } else if entry.kind() == TypeKind::Sealed {
        SerializerRef::Polymorphic {
            base,
            kind: PolymorphicKind::Sealed,
        }
    } else if entry.is_polymorphic() {
        SerializerRef::Polymorphic {
            base,
            kind: PolymorphicKind::Open,
        }
    } else {
        SerializerRef::Generated(base)
    };
    (serializer, ResolutionSource::Default)
}

fn contextual(ty: &TypePath, entry: Option<&TypeEntry>, usage: &[SerialMarker]) -> SerializerRef {
    SerializerRef::Contextual {
        target: ty.clone(),
        fallback: entry.map(|e| Box::new(static_serializer(e, usage).0)),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::SerializerResolver;
    use crate::marker::SerialMarker;
    use crate::scope::FileScope;
    use crate::serializer::{PolymorphicKind, ResolutionSource, SerializerRef};
    use crate::table::{AnnotationTable, TypeEntry};
    use crate::{SerialError, TypePath};

    fn table() -> AnnotationTable {
        let mut table = AnnotationTable::new();
        table.insert(TypeEntry::class("m::Plain")).unwrap();
        table
            .insert(TypeEntry::class("m::Custom").with_marker(SerialMarker::With("m::CustomSer".into())))
            .unwrap();
        table
            .insert(
                TypeEntry::class("m::Kept")
                    .with_marker(SerialMarker::With("m::KeptSer".into()))
                    .with_marker(SerialMarker::KeepGeneratedSerializer),
            )
            .unwrap();
        table.insert(TypeEntry::interface("m::Shape")).unwrap();
        table.insert(TypeEntry::sealed("m::Event")).unwrap();
        table
            .insert(TypeEntry::class("m::Open").with_marker(SerialMarker::Polymorphic))
            .unwrap();
        table
    }

    fn path(s: &str) -> TypePath {
        TypePath::new(s)
    }

    #[test]
    fn default_is_generated() {
        let table = table();
        let resolved = SerializerResolver::new(&table)
            .resolve(&path("m::Plain"), &[], None)
            .unwrap();
        assert_eq!(resolved.serializer(), &SerializerRef::Generated(path("m::Plain")));
        assert_eq!(resolved.source(), ResolutionSource::Default);
        assert!(resolved.generated().is_none());
    }

    #[test]
    fn usage_with_beats_file_scope() {
        let table = table();
        let scope = FileScope::new("u").with_serializer("m::Plain", "m::FileSer");
        let usage = [SerialMarker::With("m::PropSer".into())];

        let resolved = SerializerResolver::new(&table)
            .resolve(&path("m::Plain"), &usage, Some(&scope))
            .unwrap();
        assert_eq!(resolved.serializer(), &SerializerRef::Custom("m::PropSer".into()));
    }

    #[test]
    fn file_scope_beats_type_with() {
        let table = table();
        let scope = FileScope::new("u").with_serializer("m::Custom", "m::FileSer");

        let resolved = SerializerResolver::new(&table)
            .resolve(&path("m::Custom"), &[], Some(&scope))
            .unwrap();
        assert_eq!(resolved.serializer(), &SerializerRef::Custom("m::FileSer".into()));
        assert_eq!(resolved.source(), ResolutionSource::FileScope);

        let without_scope = SerializerResolver::new(&table)
            .resolve(&path("m::Custom"), &[], None)
            .unwrap();
        assert_eq!(without_scope.source(), ResolutionSource::TypeWith);
    }

    #[test]
    fn contextual_usage_carries_fallback() {
        let table = table();
        let usage = [SerialMarker::Contextual];

        let resolved = SerializerResolver::new(&table)
            .resolve(&path("m::Custom"), &usage, None)
            .unwrap();
        assert_eq!(
            resolved.serializer(),
            &SerializerRef::Contextual {
                target: path("m::Custom"),
                fallback: Some(Box::new(SerializerRef::Custom("m::CustomSer".into()))),
            }
        );

        // Unregistered types can still be contextual, without fallback.
        let resolved = SerializerResolver::new(&table)
            .resolve(&path("time::Instant"), &usage, None)
            .unwrap();
        assert_eq!(
            resolved.serializer(),
            &SerializerRef::Contextual {
                target: path("time::Instant"),
                fallback: None,
            }
        );
    }

    #[test]
    fn file_level_contextual() {
        let table = table();
        let scope = FileScope::new("u").with_contextual("m::Plain");
        let resolved = SerializerResolver::new(&table)
            .resolve(&path("m::Plain"), &[], Some(&scope))
            .unwrap();
        assert!(resolved.serializer().is_contextual());
        assert_eq!(resolved.source(), ResolutionSource::FileScope);
    }

    #[test]
    fn polymorphic_kinds() {
        let table = table();
        let resolver = SerializerResolver::new(&table);

        let shape = resolver.resolve(&path("m::Shape"), &[], None).unwrap();
        assert_eq!(
            shape.serializer(),
            &SerializerRef::Polymorphic {
                base: path("m::Shape"),
                kind: PolymorphicKind::Open,
            }
        );

        let event = resolver.resolve(&path("m::Event"), &[], None).unwrap();
        assert_eq!(
            event.serializer(),
            &SerializerRef::Polymorphic {
                base: path("m::Event"),
                kind: PolymorphicKind::Sealed,
            }
        );

        assert!(resolver
            .resolve(&path("m::Open"), &[], None)
            .unwrap()
            .serializer()
            .is_polymorphic());

        let forced = resolver
            .resolve(&path("m::Plain"), &[SerialMarker::Polymorphic], None)
            .unwrap();
        assert!(forced.serializer().is_polymorphic());
    }

    #[test]
    fn keep_generated_exposes_both() {
        let table = table();
        let resolved = SerializerResolver::new(&table)
            .resolve(&path("m::Kept"), &[], None)
            .unwrap();
        assert_eq!(resolved.serializer(), &SerializerRef::Custom("m::KeptSer".into()));
        assert_eq!(
            resolved.generated(),
            Some(&SerializerRef::Generated(path("m::Kept")))
        );
    }

    #[test]
    fn conflicting_usage_serializers() {
        let table = table();
        let usage = [
            SerialMarker::With("a".into()),
            SerialMarker::With("b".into()),
        ];
        let err = SerializerResolver::new(&table)
            .resolve(&path("m::Plain"), &usage, None)
            .unwrap_err();
        assert_eq!(err, SerialError::AmbiguousSerializer { ty: path("m::Plain") });
    }

    #[test]
    fn unknown_type_without_binding() {
        let table = table();
        let err = SerializerResolver::new(&table)
            .resolve(&path("m::Nope"), &[], None)
            .unwrap_err();
        assert_eq!(err, SerialError::UnknownType(path("m::Nope")));
    }

    #[test]
    fn resolution_is_deterministic() {
        let table = table();
        let resolver = SerializerResolver::new(&table);
        let scope = FileScope::new("u").with_contextual("m::Event");
        let a = resolver.resolve(&path("m::Event"), &[], Some(&scope)).unwrap();
        let b = resolver.resolve(&path("m::Event"), &[], Some(&scope)).unwrap();
        assert_eq!(a, b);
    }
}
