//! 通用内容树编辑引擎
//!
//! 无模式地浏览、搜索、修改并整体保存任意形状的 JSON 内容文档：
//! 按路径读写、基线/草稿差异判断、按形状生成新行模板、递归搜索、保存前链接规范化。

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::collapse::{collect_composite_paths, ExpansionState};
pub use model::data_core::{ContentStore, EditorError, EditorSession, PendingSave, SaveOutcome};
pub use model::diff::{dirty_paths, is_dirty};
pub use model::engine::{assign, insert_template, remove_at, resolve, select};
pub use model::links::{normalize, FieldNameClassifier, LinkClassifier, LinkKind};
pub use model::node::{Node, NodeKind};
pub use model::path::{Path, Selector};
pub use model::query::{matches, search};
pub use model::shadow_tree::{build_shadow_tree, JsonTreeNode};
pub use model::template::synthesize;
pub use utils::config::EditorConfig;
pub use utils::fs::JsonFileStore;
