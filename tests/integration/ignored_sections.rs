//! Integration tests for sections copied verbatim from the target

use super::test_utils::Fixture;
use yamlmend::{ConfigUpdater, IgnoredSectionFault, TemplateSource, UpdateError, UpdateOutcome};

fn update(fixture: &Fixture, ignored: &[&str]) -> Result<UpdateOutcome, UpdateError> {
    ConfigUpdater::new().update(&TemplateSource::file(&fixture.template), &fixture.target, ignored)
}

#[test]
fn test_ignored_subtree_survives_template_shape_change() {
    let fixture = Fixture::new(
        "# Cache\ncache:\n  size: 10\nport: 80\n",
        "port: 81\ncache:\n  # user ttl\n  ttl: 7\n  nested:\n    x: 1\n",
    );
    assert_eq!(update(&fixture, &["cache"]).unwrap(), UpdateOutcome::Written);
    assert_eq!(
        fixture.target_text(),
        "cache:\n  # user ttl\n  ttl: 7\n  nested:\n    x: 1\nport: 81\n"
    );
    assert_eq!(update(&fixture, &["cache"]).unwrap(), UpdateOutcome::Unchanged);
}

#[test]
fn test_empty_ignored_section_stays_empty() {
    let fixture = Fixture::new("cache:\n  size: 10\n", "cache: {}\n");
    assert_eq!(update(&fixture, &["cache"]).unwrap(), UpdateOutcome::Unchanged);
    assert_eq!(fixture.target_text(), "cache: {}\n");
}

#[test]
fn test_ignored_section_absent_from_template_is_kept() {
    let fixture = Fixture::new(
        "server:\n  port: 80\nlogging: {}\n",
        "server:\n  port: 81\n  extra:\n    debug: true\nlogging: {}\nplugins:\n  mine:\n    name: mine\n",
    );
    update(&fixture, &["server.extra", "plugins"]).unwrap();
    assert_eq!(
        fixture.target_text(),
        "server:\n  port: 81\n  extra:\n    debug: true\nlogging: {}\nplugins:\n  mine:\n    name: mine\n"
    );
}

#[test]
fn test_numeric_key_segments_are_coerced() {
    let target = "levels:\n  1.5:\n    name: mid\n  2:\n    name: high\n";
    let fixture = Fixture::new("levels: {}\n", target);
    assert_eq!(
        update(&fixture, &["levels.1.5", "levels.2"]).unwrap(),
        UpdateOutcome::Unchanged
    );
    assert_eq!(fixture.target_text(), target);
}

#[test]
fn test_ignored_lists_and_scalars_round_trip() {
    let target = "\
users:
  admin:
    roles:
    - read
    - write
    email: admin@example.com
    limits: {}
    tags: []
";
    let fixture = Fixture::new("users: {}\n", target);
    assert_eq!(update(&fixture, &["users"]).unwrap(), UpdateOutcome::Unchanged);
}

#[test]
fn test_custom_separator_for_dotted_keys() {
    let target = "hosts:\n  example.com:\n    port: 443\n";
    let fixture = Fixture::new("hosts: {}\n", target);
    let outcome = ConfigUpdater::with_separator('/')
        .update(
            &TemplateSource::file(&fixture.template),
            &fixture.target,
            &["hosts/example.com"],
        )
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Unchanged);
}

#[test]
fn test_missing_ignored_section_aborts_without_writing() {
    let fixture = Fixture::new("a: 1\nb: 2\n", "a: 5\n");
    let err = update(&fixture, &["nope.deeper"]).unwrap_err();
    match err {
        UpdateError::InvalidIgnoredSection { path, fault } => {
            assert_eq!(path, "nope.deeper");
            assert_eq!(fault, IgnoredSectionFault::Missing("nope".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fixture.target_text(), "a: 5\n");
}

#[test]
fn test_leaf_ignored_section_is_rejected() {
    let fixture = Fixture::new("a: 1\n", "a: 5\n");
    let err = update(&fixture, &["a"]).unwrap_err();
    assert!(matches!(
        err,
        UpdateError::InvalidIgnoredSection {
            fault: IgnoredSectionFault::NotASection(_),
            ..
        }
    ));
    assert!(err.to_string().contains("'a'"));
    assert_eq!(fixture.target_text(), "a: 5\n");
}

#[test]
fn test_leaf_parent_is_rejected() {
    let fixture = Fixture::new("a: 1\n", "a: 5\n");
    let err = update(&fixture, &["a.b"]).unwrap_err();
    assert!(matches!(
        err,
        UpdateError::InvalidIgnoredSection {
            fault: IgnoredSectionFault::ParentNotSection(ref segment),
            ..
        } if segment == "a"
    ));
}

#[test]
fn test_placed_section_after_empty_sibling() {
    let fixture = Fixture::new(
        "a:\n  b: 1\n  c: {}\n",
        "a:\n  b: 2\n  c: {}\n  x:\n    k: v\n",
    );
    assert_eq!(update(&fixture, &["a.x"]).unwrap(), UpdateOutcome::Unchanged);
    assert_eq!(fixture.target_text(), "a:\n  b: 2\n  c: {}\n  x:\n    k: v\n");
}
