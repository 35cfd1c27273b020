//! First-seen-order deduplication of derived relations

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// A flat derived relation, e.g. control to rule
///
/// Serialized as a three-element array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MappingTuple(pub String, pub String, pub String);

impl MappingTuple {
    pub fn new(subject: impl Into<String>, relation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self(subject.into(), relation.into(), detail.into())
    }

    pub fn subject(&self) -> &str {
        &self.0
    }

    pub fn relation(&self) -> &str {
        &self.1
    }

    pub fn detail(&self) -> &str {
        &self.2
    }
}

impl fmt::Display for MappingTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

/// A value that occurred more than once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup<T> {
    pub value: T,
    /// Total occurrences, including the kept one
    pub occurrences: usize,
}

/// Result of [`dedup`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupOutcome<T> {
    /// Unique values in order of first occurrence
    pub unique: Vec<T>,
    /// Number of dropped repeats
    pub removed: usize,
    /// Values seen more than once, in order of first occurrence
    pub duplicate_groups: Vec<DuplicateGroup<T>>,
}

impl<T> DedupOutcome<T> {
    /// Count before deduplication
    pub fn original_count(&self) -> usize {
        self.unique.len() + self.removed
    }

    /// Count after deduplication
    pub fn final_count(&self) -> usize {
        self.unique.len()
    }

    /// Group sizes of the duplicated values
    pub fn group_sizes(&self) -> Vec<usize> {
        self.duplicate_groups.iter().map(|g| g.occurrences).collect()
    }
}

/// Remove exact repeats, keeping the first occurrence of each value
pub fn dedup<T, I>(values: I) -> DedupOutcome<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen: IndexMap<T, usize> = IndexMap::new();
    let mut total = 0usize;
    for value in values {
        total += 1;
        *seen.entry(value).or_insert(0) += 1;
    }

    let duplicate_groups = seen
        .iter()
        .filter(|(_, &count)| count > 1)
        .map(|(value, &occurrences)| DuplicateGroup {
            value: value.clone(),
            occurrences,
        })
        .collect();
    let unique: Vec<T> = seen.into_keys().collect();
    let removed = total - unique.len();

    tracing::debug!(original = total, removed, "deduplicated");
    DedupOutcome {
        unique,
        removed,
        duplicate_groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str, r: &str, d: &str) -> MappingTuple {
        MappingTuple::new(s, r, d)
    }

    #[test]
    fn test_first_seen_order_kept() {
        let outcome = dedup(vec![
            t("1.2.8", "maps_to", "CIS-4.1"),
            t("1.2.7", "maps_to", "CIS-4.2"),
            t("1.2.8", "maps_to", "CIS-4.1"),
            t("1.2.7", "maps_to", "CIS-4.3"),
        ]);

        assert_eq!(
            outcome.unique,
            vec![
                t("1.2.8", "maps_to", "CIS-4.1"),
                t("1.2.7", "maps_to", "CIS-4.2"),
                t("1.2.7", "maps_to", "CIS-4.3"),
            ]
        );
        assert_eq!(outcome.removed, 1);
        assert_eq!(outcome.group_sizes(), vec![2]);
    }

    #[test]
    fn test_partial_match_is_not_duplicate() {
        let outcome = dedup(vec![t("a", "b", "c"), t("a", "b", "d")]);
        assert_eq!(outcome.removed, 0);
        assert!(outcome.duplicate_groups.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let outcome = dedup(Vec::<MappingTuple>::new());
        assert_eq!(outcome.original_count(), 0);
        assert_eq!(outcome.final_count(), 0);
    }
}
