//! 程序入口：初始化日志、解析命令行，对 JSON 内容文件执行浏览/编辑/保存

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use neirong_bianji::model::collapse::{collect_composite_paths, ExpansionState};
use neirong_bianji::model::data_core::{EditorSession, SaveOutcome};
use neirong_bianji::model::diff::dirty_paths;
use neirong_bianji::model::engine::select;
use neirong_bianji::model::path::Path;
use neirong_bianji::model::query::search;
use neirong_bianji::utils::config::{EditorConfig, DEFAULT_CONFIG_NAME};
use neirong_bianji::utils::fs::{read_json_file, JsonFileStore};
use neirong_bianji::vm::bridge::*;

/// 通用内容树编辑器
#[derive(Parser, Debug)]
#[command(name = "neirong_bianji")]
#[command(about = "Browse, search and edit a JSON content document by path")]
#[command(version)]
struct Cli {
    /// 内容文件（JSON）
    #[arg(short, long, env = "NEIRONG_FILE")]
    file: PathBuf,

    /// 配置文件
    #[arg(short, long, default_value = DEFAULT_CONFIG_NAME, env = "NEIRONG_CONFIG")]
    config: PathBuf,

    /// 覆盖配置中的站点根地址
    #[arg(long, env = "NEIRONG_BASE_ORIGIN")]
    base: Option<String>,

    /// 只打印结果，不写回文件
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 打印路径处的子树
    Show { path: String },
    /// 设置路径处的值（自动识别 true/false/null/数字/JSON）
    Set { path: String, value: String },
    /// 按已有行的形状向数组追加新行
    Append {
        path: String,
        /// 显式模板（JSON），数组为空时使用
        #[arg(long)]
        template: Option<String>,
    },
    /// 删除数组中的一行
    Remove { path: String, index: usize },
    /// 搜索字段名与值
    Search { query: String },
    /// 按层级打印树
    Tree {
        /// 只显示匹配的分支
        #[arg(short, long, default_value = "")]
        query: String,
        /// 展开全部节点
        #[arg(long)]
        expand_all: bool,
    },
    /// 列出所有对象/数组节点的路径
    Paths,
    /// 执行 JSONPath 查询，列出命中路径
    Select { expr: String },
    /// 与另一个文件比较，列出变化的路径
    Diff { other: PathBuf },
    /// 规范化链接字段并保存
    Normalize,
}

fn parse_path(text: &str) -> Result<Path> {
    Path::parse(text).with_context(|| format!("无效路径: {}", text))
}

fn save(session: &mut EditorSession, store: &mut JsonFileStore, config: &EditorConfig, dry_run: bool) -> Result<()> {
    let classifier = config.classifier();
    if dry_run {
        let pending = session.begin_save(&classifier, &config.base_origin);
        println!("{}", serde_json::to_string_pretty(pending.document())?);
        return Ok(());
    }
    match session.save(store, &classifier, &config.base_origin)? {
        SaveOutcome::Saved => tracing::info!("{}: {}", STATUS_SAVED, store.path().display()),
        SaveOutcome::Stale => tracing::warn!("{}", STATUS_STALE),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = EditorConfig::load(&cli.config)
        .and_then(|c| c.with_base_origin(cli.base.clone()))
        .context("加载配置失败")?;

    let mut store = JsonFileStore::new(&cli.file);
    let mut session = EditorSession::default();
    session
        .load(&mut store)
        .with_context(|| format!("加载内容文件失败: {}", cli.file.display()))?;
    tracing::info!("{}: {}", STATUS_LOADED, cli.file.display());

    match cli.command {
        Commands::Show { path } => {
            let path = parse_path(&path)?;
            let Some(node) = session.get(&path) else {
                bail!("{}: {}", STATUS_NOT_FOUND, path);
            };
            println!("{}", serde_json::to_string_pretty(node)?);
        }
        Commands::Set { path, value } => {
            let path = parse_path(&path)?;
            session.set(&path, parse_input_value(&value))?;
            save(&mut session, &mut store, &config, cli.dry_run)?;
        }
        Commands::Append { path, template } => {
            let path = parse_path(&path)?;
            let index = match template {
                Some(template) => {
                    let template = serde_json::from_str(&template).context("模板不是合法 JSON")?;
                    session.append_row_with(&path, template)?
                }
                None => session.append_row(&path)?,
            };
            println!("{}", path.child(index));
            save(&mut session, &mut store, &config, cli.dry_run)?;
        }
        Commands::Remove { path, index } => {
            let path = parse_path(&path)?;
            session.remove_row(&path, index)?;
            save(&mut session, &mut store, &config, cli.dry_run)?;
        }
        Commands::Search { query } => {
            print!("{}", render_hits(&search(session.draft(), &query)));
        }
        Commands::Tree { query, expand_all } => {
            let mut expansion = ExpansionState::new();
            if expand_all {
                expansion.expand_all(session.draft());
            } else {
                expansion.set(Path::root(), true);
            }
            print!("{}", render_tree(session.draft(), &expansion, &query));
        }
        Commands::Paths => {
            for path in collect_composite_paths(session.draft()) {
                println!("{}", path);
            }
        }
        Commands::Select { expr } => {
            for path in select(session.draft(), &expr)? {
                println!("{}", path);
            }
        }
        Commands::Diff { other } => {
            let other_doc = read_json_file(&other)
                .with_context(|| format!("读取比较文件失败: {}", other.display()))?;
            for path in dirty_paths(session.draft(), &other_doc) {
                println!("{}", path);
            }
        }
        Commands::Normalize => {
            let pending = session.begin_save(&config.classifier(), &config.base_origin);
            if pending.rewritten_links() == 0 {
                println!("{}", STATUS_NO_CHANGES);
                return Ok(());
            }
            println!("规范化链接 {} 个", pending.rewritten_links());
            save(&mut session, &mut store, &config, cli.dry_run)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // 初始化日志输出（RUST_LOG 可覆盖）
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("neirong_bianji=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    run(Cli::parse())
}
