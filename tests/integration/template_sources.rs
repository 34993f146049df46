//! Integration tests for template sources

use super::test_utils::{Fixture, NO_IGNORED};
use yamlmend::{
    ConfigUpdater, DirectoryResources, EmbeddedResources, TemplateSource, UpdateError,
    UpdateOutcome,
};

const BUNDLED: &str = "# bundled defaults\nretries: 3\n";

#[test]
fn test_embedded_resource_template() {
    let fixture = Fixture::new("", "retries: 5\nstale: true\n");
    let resources = EmbeddedResources::new().with("defaults.yml", BUNDLED);
    let outcome = ConfigUpdater::new()
        .update(
            &TemplateSource::resource(&resources, "defaults.yml"),
            &fixture.target,
            NO_IGNORED,
        )
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Written);
    assert_eq!(fixture.target_text(), "# bundled defaults\nretries: 5\n");
}

#[test]
fn test_directory_resource_template() {
    let fixture = Fixture::new("", "retries: 1\n");
    std::fs::create_dir_all(fixture.path().join("bundle")).unwrap();
    std::fs::write(fixture.path().join("bundle/app.yml"), BUNDLED).unwrap();
    let resources = DirectoryResources::new(fixture.path().join("bundle"));

    ConfigUpdater::new()
        .update(
            &TemplateSource::resource(&resources, "app.yml"),
            &fixture.target,
            NO_IGNORED,
        )
        .unwrap();
    assert_eq!(fixture.target_text(), "# bundled defaults\nretries: 1\n");
}

#[test]
fn test_missing_resource_leaves_target_alone() {
    let fixture = Fixture::new("", "retries: 1\n");
    let resources = EmbeddedResources::new();
    let err = ConfigUpdater::new()
        .update(
            &TemplateSource::resource(&resources, "absent.yml"),
            &fixture.target,
            NO_IGNORED,
        )
        .unwrap_err();
    assert!(matches!(err, UpdateError::ResourceNotFound(ref name) if name == "absent.yml"));
    assert_eq!(fixture.target_text(), "retries: 1\n");
}

#[test]
fn test_inline_template_render() {
    let rendered = ConfigUpdater::new()
        .render(&TemplateSource::text(BUNDLED), "retries: 9\n", NO_IGNORED)
        .unwrap();
    assert_eq!(rendered, "# bundled defaults\nretries: 9\n");
}
