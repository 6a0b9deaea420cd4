//! Mail filter rule merging
//!
//! Reconciles an imported set of filter rules against the rules already
//! configured on the target account. Rule bodies (`filterTests`,
//! `filterActions`) are opaque and copied verbatim; the engine only reasons
//! about names and the `active` flag.
//!
//! Safety invariant: at most one rule among a base name `N` and its single
//! permitted variant `N(1)` may be active after a merge. When both slots are
//! occupied by active rules, the merge fails rather than deactivate a live
//! rule or invent further variants — two live conflicting configurations is
//! an operator decision, and capping at one paused alternate keeps repeated
//! migration attempts from accumulating rules without bound.
//!
//! The engine is pure: it never mutates its inputs and returns a new rule
//! list plus an action log, one entry per imported rule that was placed.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::{MigrateError, Result};

/// Merge imported filter rules into an existing rule set
///
/// `preserve_active` keeps the imported rules' `active` flags; without it
/// every placed rule lands inactive, so a merge never turns on filtering the
/// operator has not reviewed. `force` writes straight into the base slot,
/// skipping the conflict search, for deliberate overwrites.
///
/// Returns the merged rule list and the action log
/// (`"create: <name>"` / `"update: <name>"`). Rules not targeted by any
/// imported rule keep their identity and order.
pub fn merge_imported_rules(
    existing_rules: &[Value],
    imported_rules: &[Value],
    preserve_active: bool,
    force: bool,
) -> Result<(Vec<Value>, Vec<String>)> {
    let mut merged: Vec<Map<String, Value>> = existing_rules
        .iter()
        .map(|rule| {
            rule.as_object().cloned().ok_or_else(|| {
                MigrateError::InvalidInput("Existing filter rule is not an object".to_string())
            })
        })
        .collect::<Result<_>>()?;
    let mut actions: Vec<String> = Vec::new();

    for rule in imported_rules {
        let rule = rule.as_object().ok_or_else(|| {
            MigrateError::InvalidInput("Imported filter rule is not an object".to_string())
        })?;
        let name = rule
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                MigrateError::InvalidInput("Imported filter rule has no name".to_string())
            })?
            .to_string();

        // Freshly merged rules default to inactive unless the operator
        // explicitly opts to keep them live
        let target_active =
            preserve_active && rule.get("active").and_then(Value::as_bool).unwrap_or(false);

        let place = |slot: &str| -> Map<String, Value> {
            let mut body = rule.clone();
            body.insert("name".to_string(), json!(slot));
            body.insert("active".to_string(), json!(target_active));
            body
        };

        let base_slot = merged.iter().position(|r| rule_name(r) == Some(name.as_str()));

        if force {
            match base_slot {
                Some(i) => {
                    merged[i] = place(&name);
                    actions.push(format!("update: {}", name));
                }
                None => {
                    merged.push(place(&name));
                    actions.push(format!("create: {}", name));
                }
            }
            continue;
        }

        match base_slot {
            None => {
                merged.push(place(&name));
                actions.push(format!("create: {}", name));
            }
            Some(i) if !rule_active(&merged[i]) => {
                // Overwriting an inactive rule cannot violate the invariant
                merged[i] = place(&name);
                actions.push(format!("update: {}", name));
            }
            Some(_) => {
                // Base slot is occupied by a live rule; try the one
                // permitted fallback slot
                let variant = format!("{}(1)", name);
                debug!("Base slot '{}' is active, trying variant slot", name);

                let variant_slot =
                    merged.iter().position(|r| rule_name(r) == Some(variant.as_str()));
                match variant_slot {
                    None => {
                        merged.push(place(&variant));
                        actions.push(format!("create: {}", variant));
                    }
                    Some(j) if !rule_active(&merged[j]) => {
                        merged[j] = place(&variant);
                        actions.push(format!("update: {}", variant));
                    }
                    Some(_) => {
                        warn!("Rules '{}' and '{}' are both active", name, variant);
                        return Err(MigrateError::ActiveRuleConflict(format!(
                            "Filter rules '{}' and '{}' are both active; \
                             deactivate one or rerun with force",
                            name, variant
                        )));
                    }
                }
            }
        }
    }

    Ok((merged.into_iter().map(Value::Object).collect(), actions))
}

fn rule_name(rule: &Map<String, Value>) -> Option<&str> {
    rule.get("name").and_then(Value::as_str)
}

fn rule_active(rule: &Map<String, Value>) -> bool {
    rule.get("active").and_then(Value::as_bool).unwrap_or(false)
}
