//! Binding-redirect replacement rules.
//!
//! A [`ReplacementRule`] is a pair of exact literal substrings.  The rules
//! in [`BINDING_REDIRECT_RULES`] are applied in list order and every rule is
//! always attempted, whether or not an earlier one matched.
//!
//! # What is a binding redirect?
//!
//! .NET applications pin the versions of the assemblies they load.  A
//! `<bindingRedirect>` element in an `*.exe.config` / `*.dll.config` file
//! tells the runtime "any request for versions in `oldVersion` should load
//! `newVersion` instead".  When a Qlik Sense upgrade ships newer assemblies,
//! the printing service config still names the old version and fails to
//! start; the rules below move each redirect to the shipped version.

/// An ordered `(old, new)` pair of exact literal substrings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplacementRule<'a> {
    /// Text to search for.  Matched literally, never as a pattern.
    pub old: &'a str,
    /// Text that replaces every occurrence of `old`.
    pub new: &'a str,
}

impl<'a> ReplacementRule<'a> {
    /// Creates a rule replacing `old` with `new`.
    pub const fn new(old: &'a str, new: &'a str) -> Self {
        Self { old, new }
    }
}

/// The fixed replacement table compiled into the tool.
///
/// | Assembly range        | Before      | After       |
/// |-----------------------|-------------|-------------|
/// | `0.0.0.0-11.0.0.0`    | `11.0.0.0`  | `12.0.0.0`  |
/// | `0.0.0.0-34.7.0.0`    | `34.7.0.0`  | `36.6.0.0`  |
/// | `0.0.0.0-2.0.8.0`     | `2.0.8.0`   | `2.0.12.0`  |
pub const BINDING_REDIRECT_RULES: [ReplacementRule<'static>; 3] = [
    ReplacementRule::new(
        r#"<bindingRedirect oldVersion="0.0.0.0-11.0.0.0" newVersion="11.0.0.0" />"#,
        r#"<bindingRedirect oldVersion="0.0.0.0-12.0.0.0" newVersion="12.0.0.0" />"#,
    ),
    ReplacementRule::new(
        r#"<bindingRedirect oldVersion="0.0.0.0-34.7.0.0" newVersion="34.7.0.0" />"#,
        r#"<bindingRedirect oldVersion="0.0.0.0-36.6.0.0" newVersion="36.6.0.0" />"#,
    ),
    ReplacementRule::new(
        r#"<bindingRedirect oldVersion="0.0.0.0-2.0.8.0" newVersion="2.0.8.0" />"#,
        r#"<bindingRedirect oldVersion="0.0.0.0-2.0.12.0" newVersion="2.0.12.0" />"#,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_redirect_rules_has_three_entries() {
        assert_eq!(BINDING_REDIRECT_RULES.len(), 3);
    }

    #[test]
    fn test_no_rule_output_is_matched_by_any_rule_input() {
        // A rule whose `new` contains another rule's `old` would make the
        // table non-idempotent.
        for produced in BINDING_REDIRECT_RULES.iter().map(|r| r.new) {
            for rule in &BINDING_REDIRECT_RULES {
                assert!(
                    !produced.contains(rule.old),
                    "{produced:?} would be rewritten again by {:?}",
                    rule.old
                );
            }
        }
    }

    #[test]
    fn test_every_rule_changes_its_text() {
        for rule in &BINDING_REDIRECT_RULES {
            assert_ne!(rule.old, rule.new);
            assert!(!rule.old.is_empty());
        }
    }

    #[test]
    fn test_rules_are_binding_redirect_elements() {
        for rule in &BINDING_REDIRECT_RULES {
            assert!(rule.old.starts_with("<bindingRedirect "));
            assert!(rule.new.starts_with("<bindingRedirect "));
            assert!(rule.old.ends_with(" />"));
            assert!(rule.new.ends_with(" />"));
        }
    }
}
