//! 运行报告：逐项结果的收集与最终文本渲染
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 单个路径的处理结果
#[derive(Debug, Clone, Serialize)]
pub struct OperationOutcome {
    pub path: PathBuf,
    pub ok: bool,
    pub error: Option<String>,
}

/// 一次工具运行的聚合报告
/// - 正文行按处理顺序追加，错误明细单独收集在尾部区块
/// - skipped 统计删除阶段已不存在的条目（父目录先被删的情况）
#[derive(Debug, Default)]
pub struct RunReport {
    tool: String,
    lines: Vec<String>,
    errors: Vec<String>,
    outcomes: Vec<OperationOutcome>,
    skipped: usize,
}

impl RunReport {
    pub fn new(tool: &str) -> Self {
        Self { tool: tool.to_string(), ..Self::default() }
    }

    /// 追加一条不对应具体路径的正文行（如“没有可清理的目录”）
    pub fn note(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// 记录一次成功处理
    pub fn ok(&mut self, path: &Path, line: String) {
        self.lines.push(line);
        self.outcomes.push(OperationOutcome { path: path.to_path_buf(), ok: true, error: None });
    }

    /// 记录一次失败处理。失败行进入正文；尾部错误区块只由 [`Self::error`]
    /// 喂入（与原工具一致：清理失败只出现在正文，修复器的单文件错误走
    /// 错误区块）
    pub fn fail(&mut self, path: &Path, line: String, error: Option<String>) {
        self.lines.push(line);
        self.outcomes.push(OperationOutcome { path: path.to_path_buf(), ok: false, error });
    }

    /// 记录一条错误明细，渲染在尾部错误区块（对应原工具的 log 收集）
    pub fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    /// 记录一次跳过（条目在处理时已不存在）
    pub fn skip(&mut self, _path: &Path) {
        self.skipped += 1;
    }

    pub fn outcomes(&self) -> &[OperationOutcome] {
        &self.outcomes
    }

    pub fn updated(&self) -> usize {
        self.outcomes.iter().filter(|o| o.ok).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.ok).count()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 渲染为最终报告文本：RUNNING 横幅 + 正文 + 计数 + 错误区块
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("###########\nRUNNING {}\n###########\n", self.tool));
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&format!(
            "{} updated, {} failed, {} skipped\n",
            self.updated(),
            self.failed(),
            self.skipped
        ));
        if self.errors.is_empty() {
            out.push_str("\n###########\nNo Errors\n###########\n");
        } else {
            out.push_str("\n###########\nErrors\n###########\n");
            out.push_str(&self.errors.join("\n"));
            out.push('\n');
        }
        out
    }
}
