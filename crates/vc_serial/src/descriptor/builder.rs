use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::descriptor::{ElementDescriptor, SerialDescriptor, SerialKind};
use crate::inherit::InheritanceResolver;
use crate::scope::FileScope;
use crate::serializer::SerializerResolver;
use crate::table::{AnnotationTable, MemberEntry, TypeKind};
use crate::{SerialError, TypePath};

// -----------------------------------------------------------------------------
// DescriptorBuilder

/// Derives [`SerialDescriptor`]s from an [`AnnotationTable`].
///
/// For a type `T`:
///
/// - the serial name is `T`'s `SerialName`, or its type path;
/// - each member, in declaration order, becomes an element unless it is
///   `Transient`. The element is named after the member's `SerialName` or
///   declared name, it is optional when the member has a default value and
///   is not `Required`, and it keeps the member's `EncodeDefault` policy
///   ([`EncodeDefault::FormatDefault`] when absent);
/// - the element serializer is resolved with the member's markers as
///   usage-site markers, in the given file scope;
/// - annotations are `T`'s own info annotations followed by the inherited ones.
///
/// Building is pure: the same table and scope always give equal descriptors.
///
/// # Example
///
/// ```
/// use vc_serial::descriptor::DescriptorBuilder;
/// use vc_serial::marker::{EncodeDefault, SerialMarker};
/// use vc_serial::table::{AnnotationTable, MemberEntry, TypeEntry, TypeRef};
///
/// let mut table = AnnotationTable::new();
/// table.insert(TypeEntry::new("i32", vc_serial::table::TypeKind::Primitive)).unwrap();
/// table.insert(
///     TypeEntry::class("demo::Foo")
///         .with_member(MemberEntry::new("a", TypeRef::of("i32")).with_default()
///             .with_marker(SerialMarker::EncodeDefault(EncodeDefault::Always)))
///         .with_member(MemberEntry::new("b", TypeRef::of("i32")).with_default()
///             .with_marker(SerialMarker::EncodeDefault(EncodeDefault::Never)))
///         .with_member(MemberEntry::new("c", TypeRef::of("i32")).with_default()),
/// ).unwrap();
///
/// let descriptor = DescriptorBuilder::new(&table).build(&"demo::Foo".into(), None).unwrap();
/// let policies: Vec<_> = descriptor.elements().iter().map(|e| e.encode_default()).collect();
/// assert_eq!(policies, [EncodeDefault::Always, EncodeDefault::Never, EncodeDefault::FormatDefault]);
/// assert!(descriptor.elements().iter().all(|e| e.is_optional()));
/// ```
///
/// [`EncodeDefault::FormatDefault`]: crate::marker::EncodeDefault::FormatDefault
#[derive(Debug, Clone, Copy)]
pub struct DescriptorBuilder<'a> {
    table: &'a AnnotationTable,
}

impl<'a> DescriptorBuilder<'a> {
    #[inline]
    pub fn new(table: &'a AnnotationTable) -> Self {
        Self { table }
    }

    /// Builds the descriptor of `ty` within `scope`.
    ///
    /// # Errors
    ///
    /// - [`SerialError::UnknownType`]: `ty`, one of its supertypes, or the type
    ///   of a member without usage-site or file-level serializer is unknown.
    /// - [`SerialError::ConflictingInheritedAnnotation`], [`SerialError::CyclicInheritance`]:
    ///   see [`InheritanceResolver`].
    /// - [`SerialError::AmbiguousSerializer`]: a member serializer is ambiguous.
    /// - [`SerialError::DuplicateSerialName`]: two elements share a serial name.
    /// - [`SerialError::TransientWithoutDefault`]: a transient member has no default.
    pub fn build(
        &self,
        ty: &TypePath,
        scope: Option<&FileScope>,
    ) -> Result<SerialDescriptor, SerialError> {
        let resolved = InheritanceResolver::new(self.table).resolve(ty)?;
        let entry = resolved.entry();
        let is_enum = entry.kind() == TypeKind::Enum;

        let mut elements: Vec<ElementDescriptor> = Vec::with_capacity(entry.members().len());
        for member in entry.members() {
            if member.is_transient() {
                if !member.has_default() {
                    return Err(SerialError::TransientWithoutDefault {
                        ty: ty.clone(),
                        member: member.name().into(),
                    });
                }
                continue;
            }

            let name = member.serial_name();
            if elements.iter().any(|e| e.name() == name) {
                return Err(SerialError::DuplicateSerialName {
                    ty: ty.clone(),
                    name: name.into(),
                });
            }

            let element = if is_enum {
                enum_entry(member)
            } else {
                self.property(member, scope)?
            };
            elements.push(element);
        }

        Ok(SerialDescriptor::new(
            Arc::from(entry.serial_name()),
            entry.path().clone(),
            SerialKind::of_entry(entry),
            elements,
            resolved.annotations(),
        ))
    }

    fn property(
        &self,
        member: &MemberEntry,
        scope: Option<&FileScope>,
    ) -> Result<ElementDescriptor, SerialError> {
        let serializer =
            SerializerResolver::new(self.table).resolve(member.ty().path(), member.markers(), scope)?;

        Ok(ElementDescriptor::new(
            Arc::from(member.serial_name()),
            member.ty().clone(),
            member.infos().cloned().collect(),
            member.has_default() && !member.is_required(),
            member.encode_default().unwrap_or_default(),
            Some(serializer),
        ))
    }
}

fn enum_entry(member: &MemberEntry) -> ElementDescriptor {
    ElementDescriptor::new(
        Arc::from(member.serial_name()),
        member.ty().clone(),
        member.infos().cloned().collect(),
        false,
        Default::default(),
        None,
    )
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::DescriptorBuilder;
    use crate::descriptor::SerialKind;
    use crate::marker::{EncodeDefault, InfoAnnotation, SerialMarker};
    use crate::scope::FileScope;
    use crate::serializer::{PolymorphicKind, ResolutionSource, SerializerRef, SerializerResolver};
    use crate::table::{AnnotationTable, MemberEntry, TypeEntry, TypeKind, TypeRef};
    use crate::{SerialError, TypePath};

    fn base_table() -> AnnotationTable {
        let mut table = AnnotationTable::new();
        for primitive in ["i32", "String", "bool"] {
            table
                .insert(TypeEntry::new(primitive, TypeKind::Primitive))
                .unwrap();
        }
        table
    }

    fn build(table: &AnnotationTable, ty: &str) -> Result<crate::descriptor::SerialDescriptor, SerialError> {
        DescriptorBuilder::new(table).build(&TypePath::new(ty), None)
    }

    #[test]
    fn unannotated_type() {
        let mut table = base_table();
        table
            .insert(
                TypeEntry::class("app::Plain")
                    .with_member(MemberEntry::new("z", TypeRef::of("i32")))
                    .with_member(MemberEntry::new("a", TypeRef::of("String")))
                    .with_member(MemberEntry::new("m", TypeRef::of("bool"))),
            )
            .unwrap();

        let descriptor = build(&table, "app::Plain").unwrap();
        assert_eq!(descriptor.serial_name(), "app::Plain");
        assert_eq!(descriptor.kind(), SerialKind::Class);
        assert_eq!(descriptor.element_names().collect::<Vec<_>>(), ["z", "a", "m"]);
        assert!(descriptor.elements().iter().all(|e| !e.is_optional()));
    }

    #[test]
    fn name_override_hides_declared_name() {
        let mut table = base_table();
        table
            .insert(
                TypeEntry::class("app::User")
                    .with_member(MemberEntry::new("id", TypeRef::of("i32")))
                    .with_member(
                        MemberEntry::new("user_name", TypeRef::of("String"))
                            .with_marker(SerialMarker::SerialName("login".into())),
                    ),
            )
            .unwrap();

        let descriptor = build(&table, "app::User").unwrap();
        assert_eq!(descriptor.element_names().collect::<Vec<_>>(), ["id", "login"]);
        assert_eq!(descriptor.element_index("login"), Some(1));
        assert_eq!(descriptor.element_index("user_name"), None);
        assert_eq!(descriptor.element(0).unwrap().name(), "id");
    }

    #[test]
    fn transient_members_are_skipped() {
        let mut table = base_table();
        table
            .insert(
                TypeEntry::class("app::Cache")
                    .with_member(MemberEntry::new("key", TypeRef::of("String")))
                    .with_member(
                        MemberEntry::new("hits", TypeRef::of("i32"))
                            .with_default()
                            .with_marker(SerialMarker::Transient),
                    ),
            )
            .unwrap();

        let descriptor = build(&table, "app::Cache").unwrap();
        assert_eq!(descriptor.element_len(), 1);
        assert_eq!(descriptor.element_index("hits"), None);
    }

    #[test]
    fn required_member_with_default_is_not_optional() {
        let mut table = base_table();
        table
            .insert(
                TypeEntry::class("app::Config")
                    .with_member(
                        MemberEntry::new("port", TypeRef::of("i32"))
                            .with_default()
                            .with_marker(SerialMarker::Required),
                    )
                    .with_member(MemberEntry::new("debug", TypeRef::of("bool")).with_default()),
            )
            .unwrap();

        let descriptor = build(&table, "app::Config").unwrap();
        assert!(!descriptor.element(0).unwrap().is_optional());
        assert!(descriptor.element(1).unwrap().is_optional());
    }

    #[test]
    fn duplicate_serial_names() {
        let mut table = base_table();
        table
            .insert(
                TypeEntry::class("app::Clash")
                    .with_member(MemberEntry::new("a", TypeRef::of("i32")))
                    .with_member(
                        MemberEntry::new("b", TypeRef::of("i32"))
                            .with_marker(SerialMarker::SerialName("a".into())),
                    ),
            )
            .unwrap();

        let err = build(&table, "app::Clash").unwrap_err();
        assert_eq!(
            err,
            SerialError::DuplicateSerialName {
                ty: "app::Clash".into(),
                name: "a".into(),
            }
        );
    }

    #[test]
    fn annotations_are_merged() {
        let mut table = base_table();
        let inherited = InfoAnnotation::new("Schema").with_arg("v", 2).inheritable();
        let own = InfoAnnotation::new("Doc").with_arg("text", "a user");
        let field = InfoAnnotation::new("ProtoId").with_arg("id", 1);

        table
            .insert(TypeEntry::interface("app::Entity").with_marker(inherited.clone()))
            .unwrap();
        table
            .insert(
                TypeEntry::class("app::User")
                    .with_supertype("app::Entity")
                    .with_marker(own.clone())
                    .with_member(MemberEntry::new("id", TypeRef::of("i32")).with_marker(field.clone())),
            )
            .unwrap();

        let descriptor = build(&table, "app::User").unwrap();
        assert_eq!(descriptor.annotations(), [own, inherited]);
        assert_eq!(descriptor.element(0).unwrap().annotations(), [field]);
        assert!(descriptor.annotation("Schema").is_some());
    }

    #[test]
    fn element_serializers_follow_file_scope() {
        let mut table = base_table();
        table
            .insert(
                TypeEntry::class("app::Event")
                    .in_unit("app/event.rs")
                    .with_member(MemberEntry::new("at", TypeRef::of("time::Instant")))
                    .with_member(
                        MemberEntry::new("count", TypeRef::of("i32"))
                            .with_marker(SerialMarker::With("app::VarInt".into())),
                    )
                    .with_member(MemberEntry::new("label", TypeRef::of("String").nullable())),
            )
            .unwrap();
        let scope = FileScope::new("app/event.rs").with_contextual("time::Instant");

        let descriptor = DescriptorBuilder::new(&table)
            .build(&"app::Event".into(), Some(&scope))
            .unwrap();

        let at = descriptor.element(0).unwrap().serializer().unwrap();
        assert!(at.serializer().is_contextual());
        assert_eq!(at.source(), ResolutionSource::FileScope);

        let count = descriptor.element(1).unwrap().serializer().unwrap();
        assert_eq!(count.serializer(), &SerializerRef::Custom("app::VarInt".into()));

        let label = descriptor.element(2).unwrap();
        assert!(label.ty().is_nullable());
        assert_eq!(
            label.serializer().unwrap().serializer(),
            &SerializerRef::Generated("String".into())
        );

        // Without the scope, `time::Instant` cannot be resolved.
        let err = build(&table, "app::Event").unwrap_err();
        assert_eq!(err, SerialError::UnknownType("time::Instant".into()));
    }

    #[test]
    fn enum_and_sealed_kinds() {
        let mut table = base_table();
        table
            .insert(TypeEntry::enumeration("app::Color", ["Red", "Green"]))
            .unwrap();
        table
            .record_member(
                &"app::Color".into(),
                "Red",
                [SerialMarker::SerialName("red".into())],
            )
            .unwrap();
        table.insert(TypeEntry::sealed("app::Shape")).unwrap();

        let color = build(&table, "app::Color").unwrap();
        assert_eq!(color.kind(), SerialKind::Enum);
        assert_eq!(color.element_names().collect::<Vec<_>>(), ["red", "Green"]);
        assert!(color.element(0).unwrap().serializer().is_none());

        let shape = build(&table, "app::Shape").unwrap();
        assert_eq!(shape.kind(), SerialKind::Polymorphic(PolymorphicKind::Sealed));
    }

    #[test]
    fn polymorphic_marker_matches_serializer_dispatch() {
        let mut table = base_table();
        table
            .insert(
                TypeEntry::class("app::Node")
                    .with_marker(SerialMarker::Polymorphic)
                    .with_member(MemberEntry::new("id", TypeRef::of("i32"))),
            )
            .unwrap();

        let descriptor = build(&table, "app::Node").unwrap();
        assert_eq!(descriptor.kind(), SerialKind::Polymorphic(PolymorphicKind::Open));

        let serializer = SerializerResolver::new(&table)
            .resolve(&"app::Node".into(), &[], None)
            .unwrap();
        assert_eq!(
            serializer.serializer(),
            &SerializerRef::Polymorphic {
                base: "app::Node".into(),
                kind: PolymorphicKind::Open,
            }
        );
    }

    #[test]
    fn encode_default_scenario() {
        let mut table = base_table();
        table
            .insert(
                TypeEntry::class("Foo")
                    .with_member(
                        MemberEntry::new("a", TypeRef::of("i32"))
                            .with_default()
                            .with_marker(SerialMarker::EncodeDefault(EncodeDefault::Always)),
                    )
                    .with_member(
                        MemberEntry::new("b", TypeRef::of("i32"))
                            .with_default()
                            .with_marker(SerialMarker::EncodeDefault(EncodeDefault::Never)),
                    )
                    .with_member(MemberEntry::new("c", TypeRef::of("i32")).with_default()),
            )
            .unwrap();

        let descriptor = build(&table, "Foo").unwrap();
        let summary: Vec<_> = descriptor
            .elements()
            .iter()
            .map(|e| (e.name(), e.is_optional(), e.encode_default()))
            .collect();
        assert_eq!(
            summary,
            [
                ("a", true, EncodeDefault::Always),
                ("b", true, EncodeDefault::Never),
                ("c", true, EncodeDefault::FormatDefault),
            ]
        );
    }
}
