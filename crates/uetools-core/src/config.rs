//! 工具配置存储（TOML，按工具名分节）
//!
//! 每个工具对应文件里的一个节（表），节内是字符串键值对（上次使用的目录
//! 路径等）。构造时写入默认值，load 时被文件内容覆盖；save 整体回写，
//! 其他工具的节原样保留。无锁，后写者胜，不做模式校验。
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

type Section = BTreeMap<String, String>;
type Store = BTreeMap<String, Section>;

/// 共享配置文件的默认位置：平台配置目录下的 uetools/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("uetools")
        .join("config.toml")
}

/// 单个工具的配置视图
#[derive(Debug)]
pub struct ToolConfig {
    section: String,
    path: PathBuf,
    values: Section,
    /// 文件中其他工具的节，save 时原样带回
    others: Store,
}

impl ToolConfig {
    /// 以默认值初始化；随后 load 会用文件内容覆盖这些默认值
    pub fn new(section: &str, defaults: &[(&str, &str)], path: &Path) -> Self {
        let mut values = Section::new();
        for (option, value) in defaults {
            values.insert((*option).to_string(), (*value).to_string());
        }
        Self {
            section: section.to_string(),
            path: path.to_path_buf(),
            values,
            others: Store::new(),
        }
    }

    /// 从共享文件加载；文件不存在是正常情况（保持默认值）
    pub fn load(&mut self) -> Result<()> {
        if !self.path.is_file() {
            return Ok(());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("read config {}", self.path.display()))?;
        let parsed: Store = toml::from_str(&text)
            .with_context(|| format!("parse config {}", self.path.display()))?;
        for (section, table) in parsed {
            if section == self.section {
                // 文件值覆盖默认值
                self.values.extend(table);
            } else {
                self.others.insert(section, table);
            }
        }
        Ok(())
    }

    pub fn get(&self, option: &str) -> Option<&str> {
        self.values.get(option).map(String::as_str)
    }

    pub fn set(&mut self, option: &str, value: &str) {
        self.values.insert(option.to_string(), value.to_string());
    }

    /// 整体回写共享文件；目录不存在时创建
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create config folder {}", dir.display()))?;
        }
        let mut store = self.others.clone();
        store.insert(self.section.clone(), self.values.clone());
        let text = toml::to_string(&store).context("serialize config")?;
        fs::write(&self.path, text)
            .with_context(|| format!("write config {}", self.path.display()))?;
        Ok(())
    }
}
