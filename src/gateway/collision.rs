//! Create-time uniqueness check against the remote collection.

use crate::domain::Definition;
use crate::errors::CollisionField;

/// Find the first existing definition sharing `api_id`, listen path or slug
/// with `candidate`.
///
/// Fields are checked independently; a match on any one of them is a
/// collision. Absent or empty slugs never collide: unlike a plain equality
/// check on the slug string, two definitions without a slug can coexist.
pub fn find_collision<'a>(
    existing: &'a [Definition],
    candidate: &Definition,
) -> Option<(CollisionField, &'a Definition)> {
    existing.iter().find_map(|api| {
        if api.api_id == candidate.api_id {
            return Some((CollisionField::ApiId, api));
        }

        if api.listen_path() == candidate.listen_path() {
            return Some((CollisionField::ListenPath, api));
        }

        match (api.slug(), candidate.slug()) {
            (Some(a), Some(b)) if a == b => Some((CollisionField::Slug, api)),
            _ => None,
        }
    })
}

/// The colliding value of `field` on `candidate`, for error messages
pub fn collision_value(field: CollisionField, candidate: &Definition) -> String {
    match field {
        CollisionField::ApiId => candidate.api_id.clone(),
        CollisionField::ListenPath => candidate.listen_path().to_string(),
        CollisionField::Slug => candidate.slug().unwrap_or_default().to_string(),
    }
}
