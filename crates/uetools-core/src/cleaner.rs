//! 工程清理器：查找并删除构建/中间目录
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::report::RunReport;

/// 需要清理的目录名（精确匹配）
pub const CLEAN_DIR_NAMES: [&str; 4] =
    ["Binaries", "Build", "DerivedDataCache", "Intermediate"];

/// 递归查找工程树中所有待清理目录
/// - 命中后不剪枝：已命中目录内部的再次命中同样被记录（冗余条目由删除
///   阶段的存在性检查兜底），也不做去重
/// - 根目录本身即使名字命中也不会被记录（min_depth=1）
/// - 目录项按文件名排序遍历，保证结果顺序可复现
pub fn find_folders(root: &Path) -> Vec<PathBuf> {
    let mut folders: Vec<PathBuf> = vec![];
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = match entry { Ok(e) => e, Err(_) => continue };
        if !entry.file_type().is_dir() { continue; }
        let name = match entry.file_name().to_str() { Some(s) => s, None => continue };
        if CLEAN_DIR_NAMES.contains(&name) {
            folders.push(entry.into_path());
        }
    }
    folders
}

/// 按列表顺序删除目录，逐项容错
/// - 条目已不存在（父目录先被删除）记为跳过，而非失败
/// - 删除失败记录路径与错误后继续批次，绝不中途放弃
pub fn clean_folders(folders: &[PathBuf]) -> RunReport {
    let mut report = RunReport::new("FolderCleaner");
    if folders.is_empty() {
        report.note("No folders found to clean.");
        return report;
    }
    for folder in folders {
        if !folder.exists() {
            report.skip(folder);
            continue;
        }
        match fs::remove_dir_all(folder) {
            Ok(()) => report.ok(folder, format!("Cleaned {}", folder.display())),
            Err(error) => {
                let line = format!("Failed to clean {}: error {error}", folder.display());
                report.fail(folder, line, Some(error.to_string()));
            }
        }
    }
    report
}
