use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn uetools() -> Command {
    Command::cargo_bin("uetools").unwrap()
}

fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// 构造带参考 .modules 文件的引擎目录
fn make_engine(root: &Path, build_id: &str) {
    write_file(
        &root.join("Engine/Plugins/2D/Paper2D/Binaries/Win64/UnrealEditor.modules"),
        &format!("{{\"BuildId\": \"{build_id}\", \"Modules\": {{}}}}"),
    );
}

#[test]
fn clean_without_projects_folder_fails() {
    let tmp = tempdir().unwrap();
    uetools()
        .arg("clean")
        .arg("--config")
        .arg(tmp.path().join("config.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Projects Directory not specified."));
}

#[test]
fn clean_find_only_lists_without_deleting() {
    let tmp = tempdir().unwrap();
    let projects = tmp.path().join("projects");
    fs::create_dir_all(projects.join("Proj/Binaries")).unwrap();

    uetools()
        .arg("clean")
        .arg("--config")
        .arg(tmp.path().join("config.toml"))
        .arg("--projects")
        .arg(&projects)
        .arg("--find-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 folders to clean."));

    assert!(projects.join("Proj/Binaries").exists());
}

#[test]
fn clean_deletes_and_prints_report() {
    let tmp = tempdir().unwrap();
    let projects = tmp.path().join("projects");
    fs::create_dir_all(projects.join("Proj/Binaries")).unwrap();
    fs::create_dir_all(projects.join("Proj/Intermediate")).unwrap();

    uetools()
        .arg("clean")
        .arg("--config")
        .arg(tmp.path().join("config.toml"))
        .arg("--projects")
        .arg(&projects)
        .assert()
        .success()
        .stdout(predicate::str::contains("RUNNING FolderCleaner"))
        .stdout(predicate::str::contains("Cleaned"));

    assert!(!projects.join("Proj/Binaries").exists());
    assert!(!projects.join("Proj/Intermediate").exists());
    assert!(projects.join("Proj").exists());
}

#[test]
fn clean_remembers_last_used_folder() {
    let tmp = tempdir().unwrap();
    let config = tmp.path().join("config.toml");
    let projects = tmp.path().join("projects");
    fs::create_dir_all(projects.join("Proj/Build")).unwrap();

    uetools()
        .arg("clean")
        .arg("--config")
        .arg(&config)
        .arg("--projects")
        .arg(&projects)
        .assert()
        .success();

    // 第二次省略 --projects：使用配置里记住的路径
    uetools()
        .arg("clean")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No folders found to clean."));
}

#[test]
fn fix_build_id_updates_plugin_files() {
    let tmp = tempdir().unwrap();
    let engine = tmp.path().join("Engine");
    make_engine(tmp.path(), "fresh-build-id");
    let plugins = tmp.path().join("Marketplace");
    write_file(
        &plugins.join("PluginA/PluginA.uplugin"),
        "{\"FriendlyName\": \"PluginA\", \"BuildId\": \"stale\"}",
    );
    write_file(
        &plugins.join("PluginA/Binaries/Win64/UnrealEditor.modules"),
        "{\"BuildId\": \"stale\", \"Modules\": {}}",
    );

    uetools()
        .arg("fix-build-id")
        .arg("--config")
        .arg(tmp.path().join("config.toml"))
        .arg("--engine")
        .arg(&engine)
        .arg("--plugins")
        .arg(&plugins)
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated plugin files in"));

    let uplugin = fs::read_to_string(plugins.join("PluginA/PluginA.uplugin")).unwrap();
    assert!(uplugin.contains("\"BuildId\": \"fresh-build-id\""));
    assert!(uplugin.contains("\"FriendlyName\": \"PluginA\""));
    let modules =
        fs::read_to_string(plugins.join("PluginA/Binaries/Win64/UnrealEditor.modules")).unwrap();
    assert!(modules.contains("\"BuildId\": \"fresh-build-id\""));
}

#[test]
fn fix_build_id_aborts_when_engine_reference_is_missing() {
    let tmp = tempdir().unwrap();
    let engine = tmp.path().join("Engine");
    fs::create_dir_all(&engine).unwrap();
    let plugins = tmp.path().join("Marketplace");
    write_file(
        &plugins.join("PluginA/PluginA.uplugin"),
        "{\"BuildId\": \"stale\"}",
    );

    uetools()
        .arg("fix-build-id")
        .arg("--config")
        .arg(tmp.path().join("config.toml"))
        .arg("--engine")
        .arg(&engine)
        .arg("--plugins")
        .arg(&plugins)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to extract Custom Engine Build ID",
        ));

    // 中止时任何插件文件都未被改动
    let uplugin = fs::read_to_string(plugins.join("PluginA/PluginA.uplugin")).unwrap();
    assert!(uplugin.contains("\"BuildId\": \"stale\""));
}

#[test]
fn fix_build_id_without_folders_fails() {
    let tmp = tempdir().unwrap();
    uetools()
        .arg("fix-build-id")
        .arg("--config")
        .arg(tmp.path().join("config.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Engine Path not specified."));
}
