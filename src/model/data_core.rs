//! EditorSession：编辑会话核心状态（基线 / 草稿 / 保存流程）

use thiserror::Error;

use crate::model::diff::{dirty_paths, is_dirty};
use crate::model::engine::{assign, insert_template, remove_at, resolve};
use crate::model::links::{normalize_counted, LinkClassifier};
use crate::model::node::Node;
use crate::model::path::Path;
use crate::model::template::synthesize;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("JSONPath错误: {0}")]
    JsonPath(String),
    #[error("寻址失败 {path}: {reason}")]
    Address { path: String, reason: String },
    #[error("文档根节点必须是对象，实际为 {0}")]
    NotAMapping(String),
    #[error("状态错误: {0}")]
    State(String),
    #[error("配置错误: {0}")]
    Config(String),
}

/// 外部内容存储：整文档读取与整文档保存
pub trait ContentStore {
    fn load_document(&mut self) -> Result<Node, EditorError>;

    /// 保存成功时返回存储确认后的文档，它将成为新的基线
    fn save_document(&mut self, doc: &Node) -> Result<Node, EditorError>;
}

/// 保存票据：记录发起保存时的代数与修订号
#[derive(Debug, Clone)]
pub struct PendingSave {
    generation: u64,
    revision: u64,
    document: Node,
    rewritten_links: usize,
}

impl PendingSave {
    /// 规范化后待提交给存储的文档
    pub fn document(&self) -> &Node {
        &self.document
    }

    pub fn rewritten_links(&self) -> usize {
        self.rewritten_links
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// 确认文档已成为新基线
    Saved,
    /// 保存期间发生了重新加载或丢弃，确认结果被忽略
    Stale,
}

fn ensure_mapping(doc: Node) -> Result<Node, EditorError> {
    if doc.as_mapping().is_some() {
        Ok(doc)
    } else {
        Err(EditorError::NotAMapping(format!("{:?}", doc.kind())))
    }
}

/// 宿主持有的编辑会话
///
/// `generation` 在加载、重新加载、丢弃时递增，用于识别过期的保存确认；
/// `revision` 在每次编辑时递增，用于判断保存期间草稿是否又被修改。
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    baseline: Node,
    draft: Node,
    generation: u64,
    revision: u64,
}

impl EditorSession {
    /// 以给定文档作为基线创建会话
    pub fn from_document(doc: Node) -> Result<Self, EditorError> {
        let doc = ensure_mapping(doc)?;
        Ok(Self {
            baseline: doc.clone(),
            draft: doc,
            generation: 1,
            revision: 0,
        })
    }

    /// 从存储加载文档，基线与草稿同时替换
    pub fn load<S: ContentStore + ?Sized>(&mut self, store: &mut S) -> Result<(), EditorError> {
        let doc = ensure_mapping(store.load_document()?)?;
        self.baseline = doc.clone();
        self.draft = doc;
        self.generation += 1;
        self.revision = 0;
        tracing::info!(
            "文档加载完成: {} 个顶级字段, generation={}",
            self.draft.child_count(),
            self.generation
        );
        Ok(())
    }

    pub fn reload<S: ContentStore + ?Sized>(&mut self, store: &mut S) -> Result<(), EditorError> {
        self.load(store)
    }

    /// 丢弃草稿改动，回到基线
    pub fn discard(&mut self) {
        self.draft = self.baseline.clone();
        self.generation += 1;
        self.revision = 0;
        tracing::info!("草稿已丢弃, generation={}", self.generation);
    }

    pub fn baseline(&self) -> &Node {
        &self.baseline
    }

    pub fn draft(&self) -> &Node {
        &self.draft
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, path: &Path) -> Option<&Node> {
        resolve(&self.draft, path)
    }

    fn commit(&mut self, next: Node) -> Result<(), EditorError> {
        self.draft = ensure_mapping(next)?;
        self.revision += 1;
        Ok(())
    }

    pub fn set(&mut self, path: &Path, value: Node) -> Result<(), EditorError> {
        let next = assign(&self.draft, path, value)?;
        self.commit(next)?;
        tracing::debug!("已更新 {}", path);
        Ok(())
    }

    /// 按已有元素形状追加新行，返回新行下标
    pub fn append_row(&mut self, array_path: &Path) -> Result<usize, EditorError> {
        let template = match resolve(&self.draft, array_path) {
            Some(sequence) => synthesize(sequence),
            None => {
                return Err(EditorError::Address {
                    path: array_path.to_string(),
                    reason: "路径不存在".to_string(),
                })
            }
        };
        self.append_row_with(array_path, template)
    }

    /// 使用宿主提供的模板追加新行
    pub fn append_row_with(&mut self, array_path: &Path, template: Node) -> Result<usize, EditorError> {
        let next = insert_template(&self.draft, array_path, template)?;
        self.commit(next)?;
        let index = resolve(&self.draft, array_path).map_or(0, |n| n.child_count().saturating_sub(1));
        tracing::debug!("已追加 {}[{}]", array_path, index);
        Ok(index)
    }

    pub fn remove_row(&mut self, array_path: &Path, index: usize) -> Result<(), EditorError> {
        let next = remove_at(&self.draft, array_path, index)?;
        self.commit(next)?;
        tracing::debug!("已删除 {}[{}]", array_path, index);
        Ok(())
    }

    pub fn is_dirty(&self, path: &Path) -> bool {
        is_dirty(&self.baseline, &self.draft, path)
    }

    pub fn has_changes(&self) -> bool {
        self.is_dirty(&Path::root())
    }

    pub fn dirty_paths(&self) -> Vec<Path> {
        dirty_paths(&self.baseline, &self.draft)
    }

    /// 规范化草稿链接，生成待保存的票据
    pub fn begin_save<C>(&self, classify: &C, base: &str) -> PendingSave
    where
        C: LinkClassifier + ?Sized,
    {
        let (document, rewritten_links) = normalize_counted(&self.draft, classify, base);
        PendingSave {
            generation: self.generation,
            revision: self.revision,
            document,
            rewritten_links,
        }
    }

    /// 处理存储返回的保存结果
    ///
    /// 失败时基线不变；票据已过期（期间发生了加载或丢弃）时忽略确认；
    /// 保存期间草稿若又被编辑，只更新基线，保留新的草稿改动。
    pub fn complete_save(
        &mut self,
        pending: PendingSave,
        result: Result<Node, EditorError>,
    ) -> Result<SaveOutcome, EditorError> {
        let ack = result?;
        if pending.generation != self.generation {
            tracing::warn!(
                "忽略过期的保存确认: 票据 generation={}, 当前 generation={}",
                pending.generation,
                self.generation
            );
            return Ok(SaveOutcome::Stale);
        }
        let ack = ensure_mapping(ack)?;
        if pending.revision == self.revision {
            self.draft = ack.clone();
        }
        self.baseline = ack;
        tracing::info!("保存成功, 规范化链接 {} 个", pending.rewritten_links);
        Ok(SaveOutcome::Saved)
    }

    /// 便捷保存：规范化、写入存储、提交结果
    pub fn save<S, C>(&mut self, store: &mut S, classify: &C, base: &str) -> Result<SaveOutcome, EditorError>
    where
        S: ContentStore + ?Sized,
        C: LinkClassifier + ?Sized,
    {
        let pending = self.begin_save(classify, base);
        let result = store.save_document(pending.document());
        if let Err(e) = &result {
            tracing::error!("保存失败: {}", e);
        }
        self.complete_save(pending, result)
    }
}
