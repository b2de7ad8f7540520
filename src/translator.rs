//! The core translation: one [`PolicyRecord`] in, one JavaScript
//! rule-registration statement out.
//!
//! The legacy format is a flat declarative match while the JavaScript engine
//! runs an ordered imperative rule chain, so the translator has to rebuild
//! the declarative fields as conditional logic: OR-merged action and
//! identity predicates AND-ed into a guard, and the three optional result
//! fields consolidated into minimal ordered branches.

use itertools::Itertools;
use tracing::debug;

use crate::error::ConvertError;
use crate::script::{INDENT, ScriptBuilder};
use crate::types::{AdminRecord, AuthResult, Identity, PolicyRecord, RuleRecord};

/// Column offset of condition lines: two block levels inside the `if`.
const GUARD_COLS: usize = 2 * INDENT;

/// Translate one record into its rule-registration statement.
///
/// Fails with [`ConvertError::UnsupportedFeature`] for rules carrying a
/// `ReturnValue` override and [`ConvertError::UnsupportedGlob`] for action
/// patterns with a non-trailing wildcard.
pub fn translate(record: &PolicyRecord) -> Result<String, ConvertError> {
    match record {
        PolicyRecord::AdminList(admin) => Ok(translate_admin(admin)),
        PolicyRecord::Rule(rule) => translate_rule(rule),
    }
}

/// Admin sections ignore action and subject entirely: the body returns the
/// identity strings in their legacy colon syntax.
fn translate_admin(record: &AdminRecord) -> String {
    let list = record
        .identities
        .iter()
        .map(|identity| format!("\"{identity}\""))
        .join(", ");

    let mut script = ScriptBuilder::new();
    script.line(0, "polkit.addAdminRule(function(action, subject) {");
    script.line(1, &format!("return [{list}];"));
    script.line(0, "});");
    script.finish()
}

/// Predicate for one action pattern: exact match, or prefix match for a
/// trailing `*`. A wildcard anywhere else has no startsWith equivalent.
fn action_predicate(pattern: &str) -> Result<String, ConvertError> {
    match pattern.find('*') {
        None => Ok(format!("action.id == \"{pattern}\"")),
        Some(pos) if pos == pattern.len() - 1 => {
            Ok(format!("action.startsWith(\"{}\")", &pattern[..pos]))
        }
        Some(_) => Err(ConvertError::UnsupportedGlob(pattern.to_string())),
    }
}

/// OR-join predicates into guard lines, each tagged with its column offset.
///
/// A single predicate stands bare. Several are parenthesized as a unit,
/// with continuation lines shifted one extra column so they align inside
/// the opening parenthesis.
fn or_conditionals(conds: &[String]) -> Vec<(usize, String)> {
    match conds {
        [] => Vec::new(),
        [single] => vec![(GUARD_COLS, single.clone())],
        _ => {
            let last = conds.len() - 1;
            conds
                .iter()
                .enumerate()
                .map(|(i, cond)| {
                    let (cols, mut line) = if i == 0 {
                        (GUARD_COLS, format!("({cond}"))
                    } else {
                        (GUARD_COLS + 1, cond.clone())
                    };
                    if i < last {
                        line.push_str(" ||");
                    } else {
                        line.push(')');
                    }
                    (cols, line)
                })
                .collect()
        }
    }
}

/// AND the action and identity groups into the final guard.
///
/// Parser-built rules always have both groups, but the empty cases are kept
/// explicit so the guard is well-formed for any record.
fn merged_guard(
    action_lines: Vec<(usize, String)>,
    identity_lines: Vec<(usize, String)>,
) -> Vec<(usize, String)> {
    match (action_lines.is_empty(), identity_lines.is_empty()) {
        (false, false) => {
            let mut lines = action_lines;
            if let Some((_, last)) = lines.last_mut() {
                last.push_str(" &&");
            }
            lines.extend(identity_lines);
            lines
        }
        (false, true) => action_lines,
        (true, false) => identity_lines,
        (true, true) => vec![(GUARD_COLS, "true".to_string())],
    }
}

/// One emitted result branch: an optional session-state guard plus the
/// constant to return. The order of the returned sequence is significant,
/// since the engine evaluates rule bodies top to bottom.
struct Branch {
    guard: Option<&'static str>,
    result: AuthResult,
}

/// Consolidate the three optional result fields into ordered branches.
///
/// When every specified outcome agrees with `result_any`, the whole body
/// collapses to one unconditional return. The collapse table below mirrors
/// the legacy converter disjunct for disjunct; several of the disjuncts
/// imply each other, but the boundary inputs are easiest to audit this way.
fn result_branches(rule: &RuleRecord) -> Vec<Branch> {
    let (active, inactive) = (rule.result_active, rule.result_inactive);

    if let Some(any) = rule.result_any {
        let collapses = (active.is_none() && inactive.is_none())
            || (active.is_none() && inactive == Some(any))
            || (inactive.is_none() && active == Some(any))
            || (active == Some(any) && inactive == Some(any));
        if collapses {
            return vec![Branch {
                guard: None,
                result: any,
            }];
        }
    }

    let mut branches = Vec::new();
    if let Some(result) = active {
        branches.push(Branch {
            guard: Some("subject.active && subject.local"),
            result,
        });
    }
    if let Some(result) = inactive {
        branches.push(Branch {
            guard: Some("subject.inactive && subject.local"),
            result,
        });
    }
    if let Some(result) = rule.result_any {
        branches.push(Branch {
            guard: None,
            result,
        });
    }
    branches
}

fn translate_rule(rule: &RuleRecord) -> Result<String, ConvertError> {
    if rule.return_value.is_some() {
        return Err(ConvertError::UnsupportedFeature);
    }

    // 1. Per-group predicates, OR-merged.
    let action_conds: Vec<String> = rule
        .actions
        .iter()
        .map(|action| action_predicate(action))
        .collect::<Result<_, _>>()?;
    let identity_conds: Vec<String> = rule.identities.iter().map(Identity::js_predicate).collect();

    // 2. AND the two groups into the rule guard.
    let guard = merged_guard(
        or_conditionals(&action_conds),
        or_conditionals(&identity_conds),
    );

    // 3. Consolidate the result fields into ordered branches.
    let branches = result_branches(rule);

    debug!(
        event = "Translate",
        phase = "Rule",
        actions = rule.actions.len(),
        identities = rule.identities.len(),
        branches = branches.len()
    );

    // 4. Assemble the registration statement.
    let mut script = ScriptBuilder::new();
    script.line(0, "polkit.addRule(function(action, subject) {");

    let last = guard.len() - 1;
    for (i, (cols, text)) in guard.iter().enumerate() {
        let (cols, mut line) = if i == 0 {
            (INDENT, format!("if ({text}"))
        } else {
            (*cols, text.clone())
        };
        if i == last {
            line.push(')');
        }
        script.line_at(cols, &line);
    }

    script.line(1, "{");
    for branch in &branches {
        match branch.guard {
            Some(guard_expr) => {
                script.line(2, &format!("if ({guard_expr}) {{"));
                script.line(3, &format!("return {};", branch.result.js_constant()));
                script.line(2, "}");
            }
            None => script.line(2, &format!("return {};", branch.result.js_constant())),
        }
    }
    script.line(1, "}");
    script.line(0, "});");

    Ok(script.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IdentityKind;
    use yare::parameterized;

    fn rule(
        identities: &[(&str, IdentityKind)],
        actions: &[&str],
        active: Option<AuthResult>,
        inactive: Option<AuthResult>,
        any: Option<AuthResult>,
    ) -> RuleRecord {
        RuleRecord {
            identities: identities
                .iter()
                .map(|(name, kind)| Identity::new(*kind, *name))
                .collect(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
            result_active: active,
            result_inactive: inactive,
            result_any: any,
            return_value: None,
        }
    }

    #[test]
    fn test_single_action_single_identity() {
        let record = PolicyRecord::Rule(rule(
            &[("alice", IdentityKind::User)],
            &["org.example.foo"],
            None,
            None,
            Some(AuthResult::Yes),
        ));
        let expected = "\
polkit.addRule(function(action, subject) {
    if (action.id == \"org.example.foo\" &&
        subject.user == \"alice\")
    {
        return polkit.Result.YES;
    }
});
";
        assert_eq!(translate(&record).unwrap(), expected);
    }

    #[test]
    fn test_multiple_predicates_are_parenthesized_as_a_unit() {
        let record = PolicyRecord::Rule(rule(
            &[("alice", IdentityKind::User), ("admins", IdentityKind::Group)],
            &["org.example.foo", "org.example.bar.*"],
            None,
            None,
            Some(AuthResult::AuthAdmin),
        ));
        let expected = "\
polkit.addRule(function(action, subject) {
    if ((action.id == \"org.example.foo\" ||
         action.startsWith(\"org.example.bar.\")) &&
        (subject.user == \"alice\" ||
         subject.isInGroup(\"admins\")))
    {
        return polkit.Result.AUTH_ADMIN;
    }
});
";
        assert_eq!(translate(&record).unwrap(), expected);
    }

    #[test]
    fn test_guarded_branches_in_fixed_order() {
        let record = PolicyRecord::Rule(rule(
            &[("alice", IdentityKind::User)],
            &["org.example.foo"],
            Some(AuthResult::Yes),
            Some(AuthResult::No),
            None,
        ));
        let expected = "\
polkit.addRule(function(action, subject) {
    if (action.id == \"org.example.foo\" &&
        subject.user == \"alice\")
    {
        if (subject.active && subject.local) {
            return polkit.Result.YES;
        }
        if (subject.inactive && subject.local) {
            return polkit.Result.NO;
        }
    }
});
";
        assert_eq!(translate(&record).unwrap(), expected);
    }

    #[test]
    fn test_any_is_the_unconditional_fallthrough() {
        let record = PolicyRecord::Rule(rule(
            &[("alice", IdentityKind::User)],
            &["org.example.foo"],
            Some(AuthResult::Yes),
            None,
            Some(AuthResult::No),
        ));
        let expected = "\
polkit.addRule(function(action, subject) {
    if (action.id == \"org.example.foo\" &&
        subject.user == \"alice\")
    {
        if (subject.active && subject.local) {
            return polkit.Result.YES;
        }
        return polkit.Result.NO;
    }
});
";
        assert_eq!(translate(&record).unwrap(), expected);
    }

    // The collapse table, boundary case by boundary case.
    #[parameterized(
        only_any = { None, None, true },
        all_three_agree = { Some(AuthResult::Yes), Some(AuthResult::Yes), true },
        active_agrees_inactive_absent = { Some(AuthResult::Yes), None, true },
        inactive_agrees_active_absent = { None, Some(AuthResult::Yes), true },
        active_disagrees = { Some(AuthResult::No), None, false },
        inactive_disagrees = { None, Some(AuthResult::No), false },
        one_agrees_one_disagrees = { Some(AuthResult::Yes), Some(AuthResult::No), false },
    )]
    fn test_result_collapse_table(
        active: Option<AuthResult>,
        inactive: Option<AuthResult>,
        collapses: bool,
    ) {
        let record = rule(
            &[("alice", IdentityKind::User)],
            &["org.example.foo"],
            active,
            inactive,
            Some(AuthResult::Yes),
        );
        let branches = result_branches(&record);
        if collapses {
            assert_eq!(branches.len(), 1);
            assert!(branches[0].guard.is_none());
            assert_eq!(branches[0].result, AuthResult::Yes);
        } else {
            assert!(branches.len() > 1);
            assert!(branches[0].guard.is_some());
        }
    }

    #[parameterized(
        exact = { "org.example.foo", "action.id == \"org.example.foo\"" },
        trailing_glob = { "org.example.foo.*", "action.startsWith(\"org.example.foo.\")" },
        bare_glob = { "*", "action.startsWith(\"\")" },
    )]
    fn test_action_predicate(pattern: &str, expected: &str) {
        assert_eq!(action_predicate(pattern).unwrap(), expected);
    }

    #[parameterized(
        interior = { "foo.*.bar" },
        leading = { "*.bar" },
        double = { "foo.*.bar.*" },
    )]
    fn test_non_trailing_glob_is_unsupported(pattern: &str) {
        let err = action_predicate(pattern).unwrap_err();
        assert_eq!(err, ConvertError::UnsupportedGlob(pattern.to_string()));
    }

    #[test]
    fn test_return_value_fails_translation() {
        let mut record = rule(
            &[("alice", IdentityKind::User)],
            &["org.example.foo"],
            None,
            None,
            Some(AuthResult::Yes),
        );
        record.return_value = Some(vec![("x".to_string(), "y".to_string())]);
        let err = translate(&PolicyRecord::Rule(record)).unwrap_err();
        assert_eq!(err, ConvertError::UnsupportedFeature);
    }

    #[test]
    fn test_admin_list_statement() {
        let record = PolicyRecord::AdminList(AdminRecord {
            identities: vec![Identity::new(IdentityKind::Group, "admins")],
        });
        let expected = "\
polkit.addAdminRule(function(action, subject) {
    return [\"unix-group:admins\"];
});
";
        assert_eq!(translate(&record).unwrap(), expected);
    }

    #[test]
    fn test_admin_list_preserves_order() {
        let record = PolicyRecord::AdminList(AdminRecord {
            identities: vec![
                Identity::new(IdentityKind::Group, "admins"),
                Identity::new(IdentityKind::User, "root"),
                Identity::new(IdentityKind::Netgroup, "ops"),
            ],
        });
        let output = translate(&record).unwrap();
        assert!(output.contains(
            "return [\"unix-group:admins\", \"unix-user:root\", \"unix-netgroup:ops\"];"
        ));
    }

    #[test]
    fn test_empty_admin_list_returns_empty_array() {
        let record = PolicyRecord::AdminList(AdminRecord { identities: vec![] });
        let output = translate(&record).unwrap();
        assert!(output.contains("return [];"));
    }

    #[test]
    fn test_empty_guard_groups_fall_back_to_true() {
        // Unreachable through the parser, which requires both groups, but
        // the guard must stay well-formed for hand-built records.
        let guard = merged_guard(Vec::new(), Vec::new());
        assert_eq!(guard, vec![(GUARD_COLS, "true".to_string())]);
    }
}
