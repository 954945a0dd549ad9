//! UE 工程维护核心库
//!
//! 设计要点：
//! - 清理器：递归遍历工程树，目录名与固定清单精确匹配；不剪枝、不去重，
//!   嵌套命中由删除阶段的存在性检查兜底（视作跳过而非失败）。
//! - 修复器：先从引擎的参考 .modules 文件提取 BuildId（失败则整体中止），
//!   再逐插件改写 .uplugin 与其 Binaries/Win64 下的 .modules，单文件出错
//!   只记录不中断批次。
//! - 配置：按工具名分节的字符串键值存储，TOML 持久化；默认值在加载时被
//!   文件内容覆盖，保存时整体回写并保留其他工具的节。

mod cleaner;
mod config;
mod fixer;
mod report;

pub use cleaner::{clean_folders, find_folders, CLEAN_DIR_NAMES};
pub use config::{default_config_path, ToolConfig};
pub use fixer::{
    extract_build_id, find_plugins, fix_build_id_in_plugins, replace_build_id,
    ExtractError, SKIP_DIR_NAMES,
};
pub use report::{OperationOutcome, RunReport};
