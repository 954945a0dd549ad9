use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uetools_core::{
    clean_folders, default_config_path, find_folders, fix_build_id_in_plugins, ToolConfig,
};

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "uetools", version, about = "UE 工程维护工具")]
struct Cli {
    /// 配置文件路径（默认：平台配置目录下的 uetools/config.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 清理工程树中的构建/中间目录（Binaries、Build 等）
    Clean {
        /// 待清理的工程根目录；缺省时使用上次记录的路径
        #[arg(long)]
        projects: Option<PathBuf>,

        /// 仅列出将被删除的目录，不执行删除
        #[arg(long)]
        find_only: bool,
    },

    /// 用引擎的 BuildId 更新插件的 .uplugin 与 .modules 文件
    FixBuildId {
        /// 引擎目录（BuildId 的来源）；缺省时使用上次记录的路径
        #[arg(long)]
        engine: Option<PathBuf>,

        /// 待更新的插件目录；缺省时使用上次记录的路径
        #[arg(long)]
        plugins: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(default_config_path);

    match cli.command {
        Commands::Clean { projects, find_only } => run_clean(&config_path, projects, find_only),
        Commands::FixBuildId { engine, plugins } => run_fix(&config_path, engine, plugins),
    }
}

/// 清理命令：查找待删目录，可选地执行删除，并记住本次使用的路径
fn run_clean(config_path: &Path, projects: Option<PathBuf>, find_only: bool) -> Result<()> {
    let mut config = load_tool_config(config_path, "FolderCleaner", &[("projects_folder", "")]);
    let projects_folder =
        resolve_folder(&mut config, "projects_folder", projects, "Projects Directory")?;

    info!(projects = %projects_folder.display(), "searching folders to clean");
    let folders = find_folders(&projects_folder);
    info!(count = folders.len(), "folders found");

    if find_only {
        for folder in &folders {
            println!("{}", folder.display());
        }
        println!("Found {} folders to clean.", folders.len());
        config.save().context("save config")?;
        return Ok(());
    }

    let report = clean_folders(&folders);
    config.save().context("save config")?;
    print!("{}", report.render());
    info!(
        updated = report.updated(),
        failed = report.failed(),
        skipped = report.skipped(),
        "clean finished"
    );
    Ok(())
}

/// 修复命令：提取引擎 BuildId 并批量更新插件文件
fn run_fix(config_path: &Path, engine: Option<PathBuf>, plugins: Option<PathBuf>) -> Result<()> {
    let mut config = load_tool_config(
        config_path,
        "PluginsBuildIdFixer",
        &[("engine_folder", ""), ("plugins_folder", "")],
    );
    let engine_folder = resolve_folder(&mut config, "engine_folder", engine, "Engine Path")?;
    let plugins_folder =
        resolve_folder(&mut config, "plugins_folder", plugins, "Plugins Directory")?;

    info!(engine = %engine_folder.display(), plugins = %plugins_folder.display(), "fixing BuildId");
    match fix_build_id_in_plugins(&engine_folder, &plugins_folder) {
        Ok(report) => {
            // 与原工具一致：运行结束即保存配置，即使批次中有单项失败
            config.save().context("save config")?;
            print!("{}", report.render());
            info!(updated = report.updated(), failed = report.failed(), "fix finished");
            Ok(())
        }
        Err(error) => {
            config.save().context("save config")?;
            bail!("Failed to extract Custom Engine Build ID: {error}");
        }
    }
}

/// 构造某个工具的配置视图并加载共享文件；文件损坏时告警并退回默认值
fn load_tool_config(path: &Path, section: &str, defaults: &[(&str, &str)]) -> ToolConfig {
    let mut config = ToolConfig::new(section, defaults, path);
    if let Err(error) = config.load() {
        warn!(%error, "could not load config, using defaults");
    }
    config
}

/// 解析目录参数：命令行优先并记入配置，否则退回配置里上次的值
fn resolve_folder(
    config: &mut ToolConfig,
    option: &str,
    flag: Option<PathBuf>,
    label: &str,
) -> Result<PathBuf> {
    if let Some(path) = flag {
        config.set(option, &path.to_string_lossy());
        return Ok(path);
    }
    match config.get(option) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => bail!("{label} not specified."),
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 支持通过环境变量 RUST_LOG 控制日志等级，如：RUST_LOG=debug
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
