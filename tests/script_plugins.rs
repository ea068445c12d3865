// ABOUTME: Integration tests for plugins installed as directories of phase scripts.
// ABOUTME: Tests resolution, environment passing, output forwarding and failures.

#![cfg(unix)]

mod support;

use release_recovery::exec::CommandError;
use release_recovery::logger::{LogLevel, MemoryLogger};
use release_recovery::plugin::MissingScript;
use release_recovery::resolver::{DirectoryResolver, PluginResolver};
use release_recovery::{DeploymentPlugin, Error, Orchestrator, Phase};
use serde_json::json;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use support::{RecordingTagRemover, release_context};
use tempfile::TempDir;

fn create_script(root: &Path, plugin: &str, phase: &str, script: &str) {
    let dir = root.join(plugin);
    fs::create_dir_all(&dir).unwrap();

    let path = dir.join(phase);
    fs::write(&path, script).unwrap();

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
}

#[tokio::test]
async fn scoped_plugin_resolves_to_nested_directory() {
    let plugins = TempDir::new().unwrap();
    create_script(plugins.path(), "@x/npm", "publish", "#!/bin/sh\nexit 0\n");

    let resolver = DirectoryResolver::new(plugins.path());
    let plugin = resolver.resolve("@x/npm").await.unwrap();

    assert!(plugin.implements(Phase::Publish));
    assert!(!plugin.implements(Phase::Prepare));
    assert!(resolver.resolve("@x/github").await.is_none());
}

#[tokio::test]
async fn non_executable_file_is_not_a_phase() {
    let plugins = TempDir::new().unwrap();
    let dir = plugins.path().join("notes");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("generate-notes"), "#!/bin/sh\nexit 0\n").unwrap();
    let mut perms = fs::metadata(dir.join("generate-notes")).unwrap().permissions();
    perms.set_mode(0o644);
    fs::set_permissions(dir.join("generate-notes"), perms).unwrap();

    let plugin = DirectoryResolver::new(plugins.path())
        .resolve("notes")
        .await
        .unwrap();

    assert!(!plugin.implements(Phase::GenerateNotes));
}

#[tokio::test]
async fn script_receives_release_and_config() {
    let plugins = TempDir::new().unwrap();
    create_script(
        plugins.path(),
        "npm",
        "prepare",
        "#!/bin/sh\n\
         echo \"phase=$RELEASE_RECOVERY_PHASE tag=$RELEASE_RECOVERY_GIT_TAG\"\n\
         echo \"config=$RELEASE_RECOVERY_PLUGIN_CONFIG\"\n",
    );
    let memory = MemoryLogger::new();
    let context = release_context(&memory);

    let plugin = DirectoryResolver::new(plugins.path())
        .resolve("npm")
        .await
        .unwrap();
    let config = json!({ "npmPublish": false }).as_object().unwrap().clone();
    plugin.call(Phase::Prepare, &config, &context).await.unwrap();

    assert!(memory.contains("phase=prepare tag=v1.0.0"));
    assert!(memory.contains(r#"config={"npmPublish":false}"#));
}

#[tokio::test]
async fn script_runs_in_release_directory() {
    let plugins = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    create_script(plugins.path(), "marker", "success", "#!/bin/sh\ntouch released\n");
    let context = release_context(&MemoryLogger::new()).cwd(project.path());

    let plugin = DirectoryResolver::new(plugins.path())
        .resolve("marker")
        .await
        .unwrap();
    plugin
        .call(Phase::Success, &Default::default(), &context)
        .await
        .unwrap();

    assert!(project.path().join("released").exists());
}

#[tokio::test]
async fn stderr_is_logged_as_error() {
    let plugins = TempDir::new().unwrap();
    create_script(
        plugins.path(),
        "noisy",
        "verify-release",
        "#!/bin/sh\necho checking\necho 'warning: stale cache' >&2\n",
    );
    let memory = MemoryLogger::new();
    let context = release_context(&memory);

    let plugin = DirectoryResolver::new(plugins.path())
        .resolve("noisy")
        .await
        .unwrap();
    plugin
        .call(Phase::VerifyRelease, &Default::default(), &context)
        .await
        .unwrap();

    let entries = memory.entries();
    let out = entries.iter().find(|e| e.message == "checking").unwrap();
    let err = entries
        .iter()
        .find(|e| e.message == "warning: stale cache")
        .unwrap();
    assert_eq!(out.level, LogLevel::Info);
    assert_eq!(err.level, LogLevel::Error);
}

#[tokio::test]
async fn non_zero_exit_is_plugin_error() {
    let plugins = TempDir::new().unwrap();
    create_script(
        plugins.path(),
        "npm",
        "publish",
        "#!/bin/sh\necho 'registry unavailable' >&2\nexit 3\n",
    );
    let context = release_context(&MemoryLogger::new());

    let plugin = DirectoryResolver::new(plugins.path())
        .resolve("npm")
        .await
        .unwrap();
    let err = plugin
        .call(Phase::Publish, &Default::default(), &context)
        .await
        .unwrap_err();

    let cause = err.downcast_ref::<CommandError>().unwrap();
    assert_eq!(cause.exit_code(), Some(3));
    assert!(err.to_string().contains("exited with status 3"));
}

#[tokio::test]
async fn failing_publish_script_triggers_tag_cleanup() {
    support::init_tracing();
    let plugins = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    create_script(
        plugins.path(),
        "@x/npm",
        "publish",
        "#!/bin/sh\necho publishing\nexit 1\n",
    );
    create_script(plugins.path(), "@x/github", "publish", "#!/bin/sh\ntouch github\n");
    create_script(plugins.path(), "@x/github", "fail", "#!/bin/sh\ntouch failed\n");

    let remover = RecordingTagRemover::new();
    let mut orchestrator = Orchestrator::new(Arc::new(DirectoryResolver::new(plugins.path())))
        .with_tag_remover(remover.clone());
    let raw = json!({ "plugins": ["@x/npm", ["@x/github", { "draft": false }]] });
    let memory = support::host_logger();
    let context = release_context(&memory).cwd(project.path());

    orchestrator.verify_conditions(&raw, &context).await.unwrap();
    let err = orchestrator.publish(&raw, &context).await.unwrap_err();

    assert!(matches!(err, Error::Plugin(_)));
    assert_eq!(remover.calls(), vec![("v1.0.0".to_string(), false)]);
    assert!(!project.path().join("github").exists());

    let script_line = memory
        .entries()
        .into_iter()
        .find(|e| e.message == "publishing")
        .unwrap();
    assert_eq!(
        script_line.scopes,
        ["semantic-release", "release-recovery", "@x/npm"]
    );

    orchestrator.fail(&raw, &context).await.unwrap();
    assert!(project.path().join("failed").exists());
}

#[tokio::test]
async fn script_removed_after_resolution_is_an_error() {
    let plugins = TempDir::new().unwrap();
    create_script(plugins.path(), "npm", "publish", "#!/bin/sh\nexit 0\n");
    let context = release_context(&MemoryLogger::new());

    let plugin = DirectoryResolver::new(plugins.path())
        .resolve("npm")
        .await
        .unwrap();
    fs::remove_file(plugins.path().join("npm/publish")).unwrap();

    assert!(plugin.implements(Phase::Publish));
    let err = plugin
        .call(Phase::Publish, &Default::default(), &context)
        .await
        .unwrap_err();

    let missing = err.downcast_ref::<MissingScript>().unwrap();
    assert_eq!(missing.0, plugins.path().join("npm/publish"));
}

#[tokio::test]
async fn vanished_publish_script_still_deletes_tag() {
    let plugins = TempDir::new().unwrap();
    create_script(plugins.path(), "npm", "publish", "#!/bin/sh\nexit 0\n");

    let remover = RecordingTagRemover::new();
    let mut orchestrator = Orchestrator::new(Arc::new(DirectoryResolver::new(plugins.path())))
        .with_tag_remover(remover.clone());
    let raw = json!({ "plugins": ["npm"] });
    let context = release_context(&MemoryLogger::new());

    orchestrator.verify_conditions(&raw, &context).await.unwrap();
    fs::remove_file(plugins.path().join("npm/publish")).unwrap();
    let err = orchestrator.publish(&raw, &context).await.unwrap_err();

    assert!(err.plugin_error().unwrap().downcast_ref::<MissingScript>().is_some());
    assert_eq!(remover.calls(), vec![("v1.0.0".to_string(), false)]);
}
