//! Exemption policy for billing enforcement.

use std::collections::HashSet;

/// Projects excluded from automatic billing disablement.
///
/// Loaded once from configuration and read-only for the process lifetime.
/// Membership is an exact, case-sensitive string test on raw project ids;
/// entries are trimmed when the set is built so that a sloppy
/// comma-separated list (`"p1, p2"`) still matches, but no normalization
/// happens at lookup time.
#[derive(Debug, Clone, Default)]
pub struct ExemptionSet {
    projects: HashSet<String>,
}

impl ExemptionSet {
    /// Build an exemption set from a comma-separated list of project ids.
    /// Empty segments are skipped.
    #[must_use]
    pub fn from_comma_list(list: &str) -> Self {
        let projects = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();
        Self { projects }
    }

    /// Whether the project is exempt from enforcement.
    #[must_use]
    pub fn contains(&self, project_id: &str) -> bool {
        self.projects.contains(project_id)
    }

    /// Number of exempt projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl FromIterator<String> for ExemptionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            projects: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_exact() {
        let set = ExemptionSet::from_comma_list("prod-core,shared-vpc");
        assert!(set.contains("prod-core"));
        assert!(set.contains("shared-vpc"));
        assert!(!set.contains("prod"));
        assert!(!set.contains("Prod-Core"));
    }

    #[test]
    fn test_entries_are_trimmed_at_load() {
        let set = ExemptionSet::from_comma_list(" prod-core , shared-vpc ");
        assert!(set.contains("prod-core"));
        assert!(set.contains("shared-vpc"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let set = ExemptionSet::from_comma_list("p1,,p2,");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty_list() {
        let set = ExemptionSet::from_comma_list("");
        assert!(set.is_empty());
        assert!(!set.contains("anything"));
    }
}
