//! Property-based tests for merge guarantees: idempotence, template order and
//! value preservation over generated documents.

use proptest::prelude::*;
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use tempfile::TempDir;
use yamlmend::{ConfigUpdater, TemplateSource, UpdateOutcome};

#[derive(Debug, Clone)]
enum Node {
    Leaf(String),
    Section(Vec<(String, String)>),
}

fn key() -> impl Strategy<Value = String> {
    "k[a-z]{0,5}"
}

fn leaf_value() -> impl Strategy<Value = String> {
    prop_oneof![any::<u16>().prop_map(|n| n.to_string()), "v[a-z]{1,8}"]
}

fn node() -> impl Strategy<Value = Node> {
    prop_oneof![
        leaf_value().prop_map(Node::Leaf),
        prop::collection::vec((key(), leaf_value()), 0..4).prop_map(Node::Section),
    ]
}

fn document() -> impl Strategy<Value = Vec<(String, Node)>> {
    prop::collection::vec((key(), node()), 0..6)
}

/// Render generated entries as YAML text, dropping repeated keys.
fn to_yaml(entries: &[(String, Node)], comments: bool) -> String {
    let mut out = String::new();
    push_entries(&mut out, entries, "", comments);
    out
}

fn push_entries(out: &mut String, entries: &[(String, Node)], indent: &str, comments: bool) {
    let mut seen = HashSet::new();
    for (key, node) in entries {
        if !seen.insert(key.as_str()) {
            continue;
        }
        if comments {
            out.push_str(&format!("{indent}# about {key}\n"));
        }
        match node {
            Node::Leaf(value) => out.push_str(&format!("{indent}{key}: {value}\n")),
            Node::Section(children) => push_section(out, key, children, indent, comments),
        }
    }
}

fn push_section(
    out: &mut String,
    key: &str,
    children: &[(String, String)],
    indent: &str,
    comments: bool,
) {
    if children.is_empty() {
        out.push_str(&format!("{indent}{key}: {{}}\n"));
        return;
    }
    out.push_str(&format!("{indent}{key}:\n"));
    let mut seen = HashSet::new();
    for (child, value) in children {
        if seen.insert(child.as_str()) {
            if comments {
                out.push_str(&format!("{indent}  # about {child}\n"));
            }
            out.push_str(&format!("{indent}  {child}: {value}\n"));
        }
    }
}

fn parse(text: &str) -> Mapping {
    match serde_yaml::from_str::<Value>(text).unwrap() {
        Value::Mapping(mapping) => mapping,
        _ => Mapping::new(),
    }
}

fn render(template: &str, target: &str) -> String {
    ConfigUpdater::new()
        .render(&TemplateSource::text(template), target, &[] as &[&str])
        .unwrap()
}

/// Merging an already merged file changes nothing
#[test]
fn test_merge_is_idempotent() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(document(), document(), any::<bool>()),
            |(template, target, comments)| {
                let template = to_yaml(&template, comments);
                let target = to_yaml(&target, false);

                let once = render(&template, &target);
                let twice = render(&template, &once);
                prop_assert_eq!(once, twice);
                Ok(())
            },
        )
        .unwrap();
}

/// Top-level keys always come out in template order, whatever the target order
#[test]
fn test_output_follows_template_order() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(document(), document()), |(template, target)| {
            let template = to_yaml(&template, true);
            let mut reversed = target.clone();
            reversed.reverse();
            let target = to_yaml(&reversed, false);

            let merged = parse(&render(&template, &target));
            let merged_keys: Vec<&Value> = merged.keys().collect();
            let template_doc = parse(&template);
            let template_keys: Vec<&Value> = template_doc.keys().collect();
            prop_assert_eq!(merged_keys, template_keys);
            Ok(())
        })
        .unwrap();
}

/// Top-level leaves present in both documents keep the target's value
#[test]
fn test_target_leaf_values_survive() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(document(), document()), |(template, target)| {
            let template_doc = parse(&to_yaml(&template, false));
            let target_text = to_yaml(&target, false);
            let target_doc = parse(&target_text);
            let merged = parse(&render(&to_yaml(&template, false), &target_text));

            for (key, template_value) in template_doc.iter() {
                if template_value.is_mapping() {
                    continue;
                }
                let expected = target_doc.get(key).unwrap_or(template_value);
                prop_assert_eq!(merged.get(key), Some(expected));
            }
            Ok(())
        })
        .unwrap();
}

/// Every Section the template declares outside the ignored key is still a
/// Section after merging.
fn assert_sections_survive(template: &Mapping, merged: &Mapping) -> Result<(), TestCaseError> {
    for (key, value) in template.iter() {
        if key.as_str() == Some("user") {
            continue;
        }
        if let Value::Mapping(children) = value {
            match merged.get(key) {
                Some(Value::Mapping(merged_children)) => {
                    assert_sections_survive(children, merged_children)?
                }
                other => prop_assert!(false, "{:?} became {:?}", key, other),
            }
        }
    }
    Ok(())
}

/// With an ignored Section (nested or top-level, known to the template or
/// not) a second update leaves the file alone and template Sections keep
/// their shape.
#[test]
fn test_update_with_ignored_section_is_idempotent() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let strategy = (
        (document(), document()),
        (document(), document()),
        prop::collection::vec((key(), leaf_value()), 0..4),
        any::<bool>(),
        any::<bool>(),
    );

    runner
        .run(
            &strategy,
            |((template, target), (template_zone, target_zone), user, nested, in_template)| {
                let mut template_text = to_yaml(&template, true);
                let mut target_text = to_yaml(&target, false);
                let ignored = if nested { "zone.user" } else { "user" };

                if nested {
                    template_text.push_str("zone:\n");
                    push_entries(&mut template_text, &template_zone, "  ", true);
                    if in_template {
                        template_text.push_str("  user:\n    placeholder: 1\n");
                    } else if template_zone.is_empty() {
                        template_text.push_str("  seed: 1\n");
                    }
                    target_text.push_str("zone:\n");
                    push_entries(&mut target_text, &target_zone, "  ", false);
                    push_section(&mut target_text, "user", &user, "  ", false);
                } else {
                    if in_template {
                        template_text.push_str("user:\n  placeholder: 1\n");
                    }
                    push_section(&mut target_text, "user", &user, "", false);
                }

                let temp_dir = TempDir::new().unwrap();
                let path = temp_dir.path().join("config.yml");
                std::fs::write(&path, &target_text).unwrap();
                let updater = ConfigUpdater::new();
                let source = TemplateSource::text(&template_text);

                updater.update(&source, &path, &[ignored]).unwrap();
                let merged_text = std::fs::read_to_string(&path).unwrap();
                prop_assert_eq!(
                    updater.update(&source, &path, &[ignored]).unwrap(),
                    UpdateOutcome::Unchanged
                );

                let merged = parse(&merged_text);
                let expected = parse(&target_text);
                let (merged_user, expected_user) = if nested {
                    (
                        merged.get("zone").and_then(|zone| zone.get("user")),
                        expected.get("zone").and_then(|zone| zone.get("user")),
                    )
                } else {
                    (merged.get("user"), expected.get("user"))
                };
                prop_assert_eq!(merged_user, expected_user);
                assert_sections_survive(&parse(&template_text), &merged)?;
                Ok(())
            },
        )
        .unwrap();
}
