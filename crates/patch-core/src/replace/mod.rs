//! Literal replacement engine.
//!
//! [`apply_rules`] runs every [`ReplacementRule`] over the text in order,
//! replacing all occurrences of each rule's `old` string.  Matching is exact
//! substring matching: no patterns, no XML awareness, no whitespace
//! normalisation.  A rule that finds nothing is not an error; it is reported
//! as [`RuleOutcome::AlreadyUpToDate`].

use tracing::trace;

use crate::domain::rules::ReplacementRule;

/// What a single rule did during one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The text changed; `occurrences` copies of `old` were replaced.
    Replaced { occurrences: usize },
    /// The text did not change.
    AlreadyUpToDate,
}

/// Result of applying a rule list to one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementReport<'r> {
    /// Text after every rule has been applied.
    pub text: String,
    /// One entry per rule, in rule order.
    pub outcomes: Vec<(ReplacementRule<'r>, RuleOutcome)>,
}

impl ReplacementReport<'_> {
    /// `true` if at least one rule changed the text.
    pub fn changed(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, outcome)| matches!(outcome, RuleOutcome::Replaced { .. }))
    }
}

/// Applies `rules` to `input` in order and reports what each rule did.
///
/// Rules with an empty `old` string are skipped as
/// [`RuleOutcome::AlreadyUpToDate`].
///
/// # Examples
///
/// ```rust
/// use patch_core::{apply_rules, ReplacementRule, RuleOutcome};
///
/// let rules = [ReplacementRule::new("v1", "v2")];
/// let report = apply_rules("a v1 b v1", &rules);
/// assert_eq!(report.text, "a v2 b v2");
/// assert_eq!(report.outcomes[0].1, RuleOutcome::Replaced { occurrences: 2 });
/// ```
pub fn apply_rules<'r>(input: &str, rules: &[ReplacementRule<'r>]) -> ReplacementReport<'r> {
    let mut text = input.to_owned();
    let mut outcomes = Vec::with_capacity(rules.len());

    for rule in rules {
        let outcome = apply_one(&mut text, rule);
        trace!(old = rule.old, ?outcome, "rule applied");
        outcomes.push((*rule, outcome));
    }

    ReplacementReport { text, outcomes }
}

fn apply_one(text: &mut String, rule: &ReplacementRule<'_>) -> RuleOutcome {
    if rule.old.is_empty() {
        return RuleOutcome::AlreadyUpToDate;
    }

    let occurrences = text.matches(rule.old).count();
    if occurrences == 0 {
        return RuleOutcome::AlreadyUpToDate;
    }

    let replaced = text.replace(rule.old, rule.new);
    // old == new leaves the text as it was
    if replaced == *text {
        return RuleOutcome::AlreadyUpToDate;
    }

    *text = replaced;
    RuleOutcome::Replaced { occurrences }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::BINDING_REDIRECT_RULES;

    fn wrap(redirect: &str) -> String {
        format!(
            "<dependentAssembly>\n  <assemblyIdentity name=\"X\" />\n  {redirect}\n</dependentAssembly>\n"
        )
    }

    // ── Per-rule behaviour ────────────────────────────────────────────────────

    #[test]
    fn test_each_binding_rule_replaces_its_old_redirect() {
        for (index, rule) in BINDING_REDIRECT_RULES.iter().enumerate() {
            // Arrange
            let input = wrap(rule.old);

            // Act
            let report = apply_rules(&input, &BINDING_REDIRECT_RULES);

            // Assert
            assert!(!report.text.contains(rule.old), "rule {index} left old text");
            assert_eq!(report.text.matches(rule.new).count(), 1, "rule {index}");
            assert_eq!(
                report.outcomes[index].1,
                RuleOutcome::Replaced { occurrences: 1 }
            );
            assert!(report.changed());
        }
    }

    #[test]
    fn test_all_occurrences_of_a_rule_are_replaced() {
        let rule = BINDING_REDIRECT_RULES[1];
        let input = format!("{}{}{}", wrap(rule.old), wrap(rule.old), wrap(rule.old));

        let report = apply_rules(&input, &BINDING_REDIRECT_RULES);

        assert_eq!(report.text.matches(rule.new).count(), 3);
        assert_eq!(report.text.matches(rule.old).count(), 0);
        assert_eq!(
            report.outcomes[1].1,
            RuleOutcome::Replaced { occurrences: 3 }
        );
    }

    #[test]
    fn test_unmatched_rules_report_already_up_to_date() {
        let input = wrap(BINDING_REDIRECT_RULES[0].old);

        let report = apply_rules(&input, &BINDING_REDIRECT_RULES);

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.outcomes[1].1, RuleOutcome::AlreadyUpToDate);
        assert_eq!(report.outcomes[2].1, RuleOutcome::AlreadyUpToDate);
    }

    // ── Whole-text behaviour ──────────────────────────────────────────────────

    #[test]
    fn test_text_without_old_patterns_is_returned_unchanged() {
        let input = "<configuration><runtime /></configuration>";

        let report = apply_rules(input, &BINDING_REDIRECT_RULES);

        assert_eq!(report.text, input);
        assert!(!report.changed());
    }

    #[test]
    fn test_second_pass_over_patched_text_changes_nothing() {
        let input: String = BINDING_REDIRECT_RULES.iter().map(|r| wrap(r.old)).collect();

        let first = apply_rules(&input, &BINDING_REDIRECT_RULES);
        let second = apply_rules(&first.text, &BINDING_REDIRECT_RULES);

        assert!(first.changed());
        assert!(!second.changed());
        assert_eq!(first.text, second.text);
    }

    #[test]
    fn test_rules_apply_in_order_and_see_earlier_output() {
        let rules = [ReplacementRule::new("a", "b"), ReplacementRule::new("b", "c")];

        let report = apply_rules("a", &rules);

        assert_eq!(report.text, "c");
        assert_eq!(report.outcomes[0].1, RuleOutcome::Replaced { occurrences: 1 });
        assert_eq!(report.outcomes[1].1, RuleOutcome::Replaced { occurrences: 1 });
    }

    #[test]
    fn test_matching_is_literal_not_pattern_based() {
        let rules = [ReplacementRule::new("1.0.*", "2.0.0")];

        let report = apply_rules("version 1.0.5 and 1.0.*", &rules);

        assert_eq!(report.text, "version 1.0.5 and 2.0.0");
    }

    #[test]
    fn test_matching_is_whitespace_sensitive() {
        // The element without the space before `/>` is not the same text.
        let input = r#"<bindingRedirect oldVersion="0.0.0.0-11.0.0.0" newVersion="11.0.0.0"/>"#;

        let report = apply_rules(input, &BINDING_REDIRECT_RULES);

        assert!(!report.changed());
    }

    #[test]
    fn test_identity_rule_is_reported_up_to_date() {
        let rules = [ReplacementRule::new("same", "same")];

        let report = apply_rules("same", &rules);

        assert_eq!(report.outcomes[0].1, RuleOutcome::AlreadyUpToDate);
        assert!(!report.changed());
    }

    #[test]
    fn test_empty_old_text_is_skipped() {
        let rules = [ReplacementRule::new("", "x")];

        let report = apply_rules("abc", &rules);

        assert_eq!(report.text, "abc");
        assert_eq!(report.outcomes[0].1, RuleOutcome::AlreadyUpToDate);
    }
}
