//! Integration tests for configuration loading and configured jobs

use std::path::PathBuf;
use tempfile::TempDir;
use yamlmend::cli::{Commands, RunContext, EXIT_OK};
use yamlmend::config::{ConfigLoader, UpdaterConfig, PROJECT_FILE_NAME};

#[test]
fn test_project_file_jobs_run_relative_to_project() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path();
    std::fs::create_dir_all(project.join("defaults")).unwrap();
    std::fs::write(project.join("defaults/app.yml"), "name: app\nworkers: 4\n").unwrap();
    std::fs::write(project.join("app.yml"), "workers: 8\n").unwrap();
    std::fs::write(
        project.join(PROJECT_FILE_NAME),
        r#"
[[jobs]]
template = "defaults/app.yml"
target = "app.yml"

[[jobs]]
template = "defaults/app.yml"
target = "fresh/app.yml"
create_missing = true
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_with_global(project, None).unwrap();
    assert_eq!(config.jobs.len(), 2);
    assert_eq!(config.jobs[0].target, project.join("app.yml"));

    let output = RunContext::from_config(config, None)
        .unwrap()
        .execute(&Commands::Run {
            format: "json".to_string(),
        })
        .unwrap();
    assert_eq!(output.code, EXIT_OK);

    let json: serde_json::Value = serde_json::from_str(&output.body).unwrap();
    assert_eq!(json["files"][0]["status"], "written");
    assert_eq!(json["files"][1]["status"], "installed");
    assert_eq!(
        std::fs::read_to_string(project.join("app.yml")).unwrap(),
        "name: app\nworkers: 8\n"
    );
    assert_eq!(
        std::fs::read_to_string(project.join("fresh/app.yml")).unwrap(),
        "name: app\nworkers: 4\n"
    );
}

#[test]
fn test_invalid_config_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    std::fs::write(
        &config_file,
        "separator = \"->\"\n[[jobs]]\ntemplate = \"t.yml\"\ntarget = \"c.yml\"\nignored = [\"\"]\n",
    )
    .unwrap();

    let err = ConfigLoader::load_from_file(&config_file).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Separator"), "{message}");
    assert!(message.contains("Job #1"), "{message}");
}

#[test]
fn test_configured_separator_reaches_updater() {
    let temp_dir = TempDir::new().unwrap();
    let template = temp_dir.path().join("t.yml");
    let target = temp_dir.path().join("c.yml");
    std::fs::write(&template, "hosts: {}\n").unwrap();
    std::fs::write(&target, "hosts:\n  a.example:\n    port: 1\n").unwrap();

    let config = UpdaterConfig {
        separator: "/".to_string(),
        jobs: vec![yamlmend::config::JobConfig {
            template: template.clone(),
            target: target.clone(),
            ignored: vec!["hosts/a.example".to_string()],
            create_missing: false,
        }],
        ..UpdaterConfig::default()
    };
    let output = RunContext::from_config(config, None)
        .unwrap()
        .execute(&Commands::Run {
            format: "json".to_string(),
        })
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&output.body).unwrap();
    assert_eq!(json["files"][0]["status"], "unchanged");
    assert_eq!(
        std::fs::read_to_string(&target).unwrap(),
        "hosts:\n  a.example:\n    port: 1\n"
    );
    assert_eq!(PathBuf::from(json["files"][0]["target"].as_str().unwrap()), target);
}
