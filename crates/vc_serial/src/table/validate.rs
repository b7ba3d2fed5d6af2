//! Marker validation shared by type and member registration.

use alloc::format;

use crate::SerialError;
use crate::marker::{MarkerKind, MarkerTarget, SerialMarker};

/// Checks that `added` can be appended to `existing` on an element of kind `target`.
///
/// `label` names the element in error messages, e.g. `app::User` or `app::User::id`.
pub(crate) fn check_markers(
    existing: &[SerialMarker],
    added: &[SerialMarker],
    target: MarkerTarget,
    label: &str,
) -> Result<(), SerialError> {
    for (index, marker) in added.iter().enumerate() {
        let kind = marker.kind();
        if !kind.allowed_on(target) {
            return Err(SerialError::InvalidAnnotationTarget {
                kind,
                target: format!("{target} (`{label}`)").into(),
            });
        }

        let mut earlier = existing.iter().chain(&added[..index]);
        if earlier.any(|m| m.collides_with(marker)) {
            return Err(SerialError::DuplicateNonRepeatableMarker {
                kind,
                target: label.into(),
            });
        }
    }

    let has = |kind: MarkerKind| existing.iter().chain(added).any(|m| m.kind() == kind);

    if has(MarkerKind::Transient) && has(MarkerKind::Required) {
        return Err(SerialError::IncompatibleMarkers {
            first: MarkerKind::Transient,
            second: MarkerKind::Required,
            target: label.into(),
        });
    }
    if has(MarkerKind::KeepGeneratedSerializer) && !has(MarkerKind::With) {
        return Err(SerialError::IncompatibleMarkers {
            first: MarkerKind::KeepGeneratedSerializer,
            second: MarkerKind::With,
            target: label.into(),
        });
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::check_markers;
    use crate::SerialError;
    use crate::marker::{InfoAnnotation, MarkerKind, MarkerTarget, SerialMarker};

    #[test]
    fn duplicate_within_one_batch() {
        let err = check_markers(
            &[],
            &[SerialMarker::Required, SerialMarker::Required],
            MarkerTarget::Member,
            "T::a",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SerialError::DuplicateNonRepeatableMarker {
                kind: MarkerKind::Required,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_against_existing() {
        let existing = [SerialMarker::SerialName("x".into())];
        let err = check_markers(
            &existing,
            &[SerialMarker::SerialName("y".into())],
            MarkerTarget::Type,
            "T",
        )
        .unwrap_err();
        assert!(matches!(err, SerialError::DuplicateNonRepeatableMarker { .. }));
    }

    #[test]
    fn distinct_infos_are_allowed() {
        let markers = [
            SerialMarker::Info(InfoAnnotation::new("A")),
            SerialMarker::Info(InfoAnnotation::new("B")),
        ];
        assert!(check_markers(&[], &markers, MarkerTarget::Type, "T").is_ok());
    }

    #[test]
    fn transient_on_type_is_rejected() {
        let err = check_markers(&[], &[SerialMarker::Transient], MarkerTarget::Type, "T")
            .unwrap_err();
        assert!(matches!(
            err,
            SerialError::InvalidAnnotationTarget {
                kind: MarkerKind::Transient,
                ..
            }
        ));
    }

    #[test]
    fn keep_generated_requires_with() {
        let err = check_markers(
            &[],
            &[SerialMarker::KeepGeneratedSerializer],
            MarkerTarget::Type,
            "T",
        )
        .unwrap_err();
        assert!(matches!(err, SerialError::IncompatibleMarkers { .. }));

        let ok = [
            SerialMarker::With("S".into()),
            SerialMarker::KeepGeneratedSerializer,
        ];
        assert!(check_markers(&[], &ok, MarkerTarget::Type, "T").is_ok());
    }

    #[test]
    fn transient_and_required_conflict() {
        let err = check_markers(
            &[SerialMarker::Transient],
            &[SerialMarker::Required],
            MarkerTarget::Member,
            "T::a",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SerialError::IncompatibleMarkers {
                first: MarkerKind::Transient,
                second: MarkerKind::Required,
                ..
            }
        ));
    }
}
