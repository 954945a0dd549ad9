//! 插件 BuildId 修复器
//!
//! 流程：
//! - 从引擎目录下的参考文件（Paper2D 的 UnrealEditor.modules）提取 BuildId，
//!   提取失败则整体中止，任何插件文件都不会被改动。
//! - 遍历插件目录收集 .uplugin 文件（跳过构建类目录内的收集，但不剪枝）。
//! - 逐插件改写 .uplugin 与其 Binaries/Win64/UnrealEditor.modules，两个文件
//!   都写成功才算该插件更新成功；.modules 缺失时 .uplugin 的改动不回滚。
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::report::RunReport;

/// 收集 .uplugin 时跳过的目录名（子串匹配）
pub const SKIP_DIR_NAMES: [&str; 6] =
    ["Binaries", "Build", "DerivedDataCache", "Intermediate", "Saved", "ThirdParty"];

/// 引擎目录下用于提取 BuildId 的参考文件（相对路径）
const BUILD_ID_SOURCE: [&str; 6] =
    ["Plugins", "2D", "Paper2D", "Binaries", "Win64", "UnrealEditor.modules"];

/// 插件目录下 .modules 文件的相对位置
const MODULES_FILE: [&str; 3] = ["Binaries", "Win64", "UnrealEditor.modules"];

/// BuildId 提取失败的原因（区分给 CLI 的用户提示）
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not find the modules file we read BuildId from ({}), the engine path is probably wrong", .path.display())]
    SourceMissing { path: PathBuf },
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON file {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("no BuildId string in {}", .path.display())]
    MissingBuildId { path: PathBuf },
}

/// 从引擎目录的参考文件提取 BuildId
pub fn extract_build_id(engine_folder: &Path) -> Result<String, ExtractError> {
    let mut path = engine_folder.to_path_buf();
    for part in BUILD_ID_SOURCE {
        path.push(part);
    }
    let text = fs::read_to_string(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ExtractError::SourceMissing { path: path.clone() }
        } else {
            ExtractError::Io { path: path.clone(), source }
        }
    })?;
    let data: Value = serde_json::from_str(&text)
        .map_err(|source| ExtractError::InvalidJson { path: path.clone(), source })?;
    match data.get("BuildId").and_then(Value::as_str) {
        Some(build_id) => Ok(build_id.to_string()),
        None => Err(ExtractError::MissingBuildId { path }),
    }
}

/// 递归收集插件目录下的所有 .uplugin 文件
/// - 原工具按目录逐层收集，目录名含跳过词（子串）时只是不在该目录收集，
///   并不阻止向下遍历；这里等价地在收集时检查文件的直接父目录名
/// - 按文件名排序遍历，保证结果顺序可复现
pub fn find_plugins(plugins_folder: &Path) -> Vec<PathBuf> {
    let mut plugin_files: Vec<PathBuf> = vec![];
    for entry in WalkDir::new(plugins_folder).sort_by_file_name() {
        let entry = match entry { Ok(e) => e, Err(_) => continue };
        if !entry.file_type().is_file() { continue; }
        let name = match entry.file_name().to_str() { Some(s) => s, None => continue };
        if !name.ends_with(".uplugin") { continue; }
        let parent_name = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .unwrap_or("");
        if SKIP_DIR_NAMES.iter().any(|skip| parent_name.contains(skip)) { continue; }
        plugin_files.push(entry.into_path());
    }
    plugin_files
}

/// 改写单个 JSON 文件中的 BuildId 字段
/// - 整份文档重新序列化后回写，不做行级补丁
/// - 文件缺失或 JSON 非法返回错误，由调用方记录，不中断批次
pub fn replace_build_id(json_file: &Path, build_id: &str) -> Result<()> {
    let text = fs::read_to_string(json_file)
        .with_context(|| format!("file not found: {}", json_file.display()))?;
    let mut data: Value = serde_json::from_str(&text)
        .with_context(|| format!("invalid JSON file: {}", json_file.display()))?;
    let Some(object) = data.as_object_mut() else {
        bail!("JSON root is not an object: {}", json_file.display());
    };
    object.insert("BuildId".to_string(), Value::String(build_id.to_string()));
    let serialized = serde_json::to_string_pretty(&data)
        .with_context(|| format!("serialize failed: {}", json_file.display()))?;
    fs::write(json_file, serialized)
        .with_context(|| format!("write failed: {}", json_file.display()))?;
    Ok(())
}

/// 更新单个插件的 .uplugin 与 .modules 文件
/// 先写 .uplugin；成功后才尝试 .modules。后者失败时前者的改动保持不变
/// （无回滚），该插件整体记为失败。
fn fix_plugin(plugin_file: &Path, build_id: &str, report: &mut RunReport) -> bool {
    let result = match replace_build_id(plugin_file, build_id) {
        Ok(()) => true,
        Err(error) => {
            report.error(format!("{error:#}"));
            false
        }
    };
    if !result {
        return false;
    }
    let mut modules_file = plugin_file.parent().unwrap_or(Path::new("")).to_path_buf();
    for part in MODULES_FILE {
        modules_file.push(part);
    }
    match replace_build_id(&modules_file, build_id) {
        Ok(()) => true,
        Err(error) => {
            report.error(format!("{error:#}"));
            false
        }
    }
}

/// 批量修复：提取 BuildId 后逐插件更新，返回聚合报告
pub fn fix_build_id_in_plugins(
    engine_folder: &Path,
    plugins_folder: &Path,
) -> Result<RunReport, ExtractError> {
    let build_id = extract_build_id(engine_folder)?;
    let mut report = RunReport::new("PluginsBuildIdFixer");
    for plugin_file in find_plugins(plugins_folder) {
        if fix_plugin(&plugin_file, &build_id, &mut report) {
            report.ok(
                &plugin_file,
                format!("Updated plugin files in {}", plugin_file.display()),
            );
        } else {
            let line = format!("Failed to update plugin files in {}", plugin_file.display());
            report.fail(&plugin_file, line, None);
        }
    }
    Ok(report)
}
