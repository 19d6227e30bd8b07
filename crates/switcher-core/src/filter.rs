//! Enable/disable policy over a map of named resources.
//!
//! A resource survives when it is not disabled and, if an enable list exists,
//! it is enabled. A name in both lists is removed. Absent lists impose nothing,
//! so with both absent the map passes through untouched.

use std::collections::BTreeMap;

/// Whether `name` survives the given switch lists.
pub fn is_switched_on(
    name: &str,
    disabled: Option<&[String]>,
    enabled: Option<&[String]>,
) -> bool {
    let is_disabled = disabled.is_some_and(|list| list.iter().any(|n| n == name));
    let is_enabled = enabled.map_or(true, |list| list.iter().any(|n| n == name));
    !is_disabled && is_enabled
}

/// Remove switched-off resources from `desired` in place.
///
/// Only existing keys are visited; nothing is ever added. Payloads of kept
/// resources are not touched.
pub fn filter_desired<'a, R>(
    desired: &'a mut BTreeMap<String, R>,
    disabled: Option<&[String]>,
    enabled: Option<&[String]>,
) -> &'a mut BTreeMap<String, R> {
    desired.retain(|name, _| is_switched_on(name, disabled, enabled));
    desired
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> BTreeMap<String, &'static str> {
        [
            ("resourceOne".to_string(), "one"),
            ("resourceTwo".to_string(), "two"),
            ("resourceThree".to_string(), "three"),
        ]
        .into()
    }

    fn list(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn keys<R>(map: &BTreeMap<String, R>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_both_absent_is_pass_through() {
        let mut desired = candidates();
        filter_desired(&mut desired, None, None);
        assert_eq!(desired, candidates());
    }

    #[test]
    fn test_disable_removes_exactly_named() {
        let mut desired = candidates();
        let disabled = list(&["resourceTwo"]);
        filter_desired(&mut desired, Some(disabled.as_slice()), None);
        assert_eq!(keys(&desired), vec!["resourceOne", "resourceThree"]);
    }

    #[test]
    fn test_enable_retains_exactly_named() {
        let mut desired = candidates();
        let enabled = list(&["resourceTwo"]);
        filter_desired(&mut desired, None, Some(enabled.as_slice()));
        assert_eq!(keys(&desired), vec!["resourceTwo"]);
    }

    #[test]
    fn test_empty_enable_list_removes_everything() {
        let mut desired = candidates();
        let enabled = list(&[""]);
        filter_desired(&mut desired, None, Some(enabled.as_slice()));
        assert!(desired.is_empty());
    }

    #[test]
    fn test_disable_wins_over_enable() {
        let mut desired = candidates();
        let enabled = list(&["resourceOne", "resourceTwo"]);
        let disabled = list(&["resourceTwo"]);
        filter_desired(&mut desired, Some(disabled.as_slice()), Some(enabled.as_slice()));
        assert_eq!(keys(&desired), vec!["resourceOne"]);
    }

    #[test]
    fn test_unknown_names_are_ignored() {
        let mut desired = candidates();
        let disabled = list(&["resourceFour"]);
        filter_desired(&mut desired, Some(disabled.as_slice()), None);
        assert_eq!(desired.len(), 3);
    }

    #[test]
    fn test_names_with_whitespace_are_distinct() {
        let mut desired = candidates();
        let disabled = list(&[" resourceTwo"]);
        filter_desired(&mut desired, Some(disabled.as_slice()), None);
        assert!(desired.contains_key("resourceTwo"));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let enabled = list(&["resourceOne", "resourceThree"]);
        let disabled = list(&["resourceThree"]);

        let mut once = candidates();
        filter_desired(&mut once, Some(disabled.as_slice()), Some(enabled.as_slice()));
        let mut twice = once.clone();
        filter_desired(&mut twice, Some(disabled.as_slice()), Some(enabled.as_slice()));

        assert_eq!(once, twice);
        assert_eq!(keys(&once), vec!["resourceOne"]);
    }

    #[test]
    fn test_payloads_are_kept_verbatim() {
        let mut desired = candidates();
        let disabled = list(&["resourceOne"]);
        let result = filter_desired(&mut desired, Some(disabled.as_slice()), None);
        assert_eq!(result.get("resourceTwo"), Some(&"two"));
    }
}
