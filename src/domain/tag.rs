//! Tag entity.

use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// Maximum length of a tag name in characters.
pub const TAG_NAME_MAX: usize = 255;

/// A reusable label scoped to one owner.
///
/// ## Invariants
/// - `(owner_id, name)` is unique per owner; the comparison is case-sensitive
///   and exact. The persistence layer enforces this with a uniqueness
///   constraint so concurrent get-or-create calls converge on one row.
/// - Tags outlive recipes: deleting a recipe never deletes its tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub owner_id: UserId,
    pub name: String,
}

/// Check a tag name against the domain's shape rules.
///
/// Returns a short machine-readable violation code, or `None` when valid.
pub fn tag_name_violation(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some("empty")
    } else if name.chars().count() > TAG_NAME_MAX {
        Some("too_long")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Thai", None)]
    #[case("Comfort Food", None)]
    #[case("", Some("empty"))]
    #[case("   ", Some("empty"))]
    fn validates_name_shape(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(tag_name_violation(name), expected);
    }

    #[rstest]
    fn rejects_oversized_names() {
        let name = "x".repeat(TAG_NAME_MAX + 1);
        assert_eq!(tag_name_violation(&name), Some("too_long"));
    }
}
