//! 编辑器配置：站点根地址与链接字段识别规则

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::data_core::EditorError;
use crate::model::links::{
    FieldNameClassifier, DEFAULT_ASSET_MARKERS, DEFAULT_ICON_MARKERS, DEFAULT_LINK_SUFFIXES,
};

pub const DEFAULT_CONFIG_NAME: &str = "neirong.config.json";
pub const DEFAULT_BASE_ORIGIN: &str = "https://audit.tv";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// 相对链接补全时使用的站点根地址
    #[serde(default = "default_base_origin")]
    pub base_origin: String,

    /// 以这些后缀结尾的字段视为链接
    #[serde(default = "default_link_suffixes")]
    pub link_suffixes: Vec<String>,

    /// 字段名包含这些标记时视为图片/上传资源，不做链接规范化
    #[serde(default = "default_asset_markers")]
    pub asset_markers: Vec<String>,

    /// 字段名包含这些标记时视为图标，同样不做链接规范化
    #[serde(default = "default_icon_markers")]
    pub icon_markers: Vec<String>,
}

fn default_base_origin() -> String {
    DEFAULT_BASE_ORIGIN.to_string()
}

fn default_link_suffixes() -> Vec<String> {
    DEFAULT_LINK_SUFFIXES.iter().map(|s| s.to_string()).collect()
}

fn default_asset_markers() -> Vec<String> {
    DEFAULT_ASSET_MARKERS.iter().map(|s| s.to_string()).collect()
}

fn default_icon_markers() -> Vec<String> {
    DEFAULT_ICON_MARKERS.iter().map(|s| s.to_string()).collect()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            base_origin: default_base_origin(),
            link_suffixes: default_link_suffixes(),
            asset_markers: default_asset_markers(),
            icon_markers: default_icon_markers(),
        }
    }
}

impl EditorConfig {
    /// 读取配置文件；文件不存在时返回默认配置
    pub fn load(path: &Path) -> Result<Self, EditorError> {
        if !path.exists() {
            tracing::debug!("配置文件不存在，使用默认配置: {}", path.display());
            return Self::default().validated();
        }
        let content = std::fs::read_to_string(path)?;
        let config: EditorConfig = serde_json::from_str(&content)?;
        config.validated()
    }

    /// 覆盖站点根地址（命令行参数优先于配置文件）
    pub fn with_base_origin(mut self, base: Option<String>) -> Result<Self, EditorError> {
        if let Some(base) = base {
            self.base_origin = base;
        }
        self.validated()
    }

    /// 校验根地址必须是 http(s) 绝对地址，并去掉末尾斜杠
    pub fn validated(mut self) -> Result<Self, EditorError> {
        let base = self.base_origin.trim().trim_end_matches('/').to_string();
        let lower = base.to_ascii_lowercase();
        let host = lower
            .strip_prefix("https://")
            .or_else(|| lower.strip_prefix("http://"))
            .ok_or_else(|| EditorError::Config(format!("baseOrigin 必须以 http:// 或 https:// 开头: {}", base)))?;
        if host.is_empty() {
            return Err(EditorError::Config("baseOrigin 缺少主机名".into()));
        }
        self.base_origin = base;
        Ok(self)
    }

    pub fn classifier(&self) -> FieldNameClassifier {
        FieldNameClassifier::new(&self.link_suffixes, &self.asset_markers, &self.icon_markers)
    }
}
