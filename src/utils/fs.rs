//! IO helper: safe file read/write for JSON content documents

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::model::data_core::{ContentStore, EditorError};
use crate::model::node::Node;

/// 从文件读取JSON数据
pub fn read_json_file(p: &Path) -> Result<Node, EditorError> {
    let f = File::open(p)?;
    let rdr = BufReader::new(f);
    let v: Node = serde_json::from_reader(rdr)?;
    Ok(v)
}

/// 将JSON数据保存到文件（格式化输出）；先写临时文件再重命名，避免写到一半的文件
pub fn write_json_file(p: &Path, value: &Node) -> Result<(), EditorError> {
    let mut tmp = p.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    {
        let mut w = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut w, value)?;
        w.write_all(b"\n")?;
        w.flush()?;
    }
    std::fs::rename(&tmp, p)?;
    Ok(())
}

/// 以单个 JSON 文件为后端的内容存储
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentStore for JsonFileStore {
    fn load_document(&mut self) -> Result<Node, EditorError> {
        let doc = read_json_file(&self.path)?;
        tracing::info!("已读取内容文件: {}", self.path.display());
        Ok(doc)
    }

    fn save_document(&mut self, doc: &Node) -> Result<Node, EditorError> {
        write_json_file(&self.path, doc)?;
        tracing::info!("JSON文件已保存到: {}", self.path.display());
        Ok(doc.clone())
    }
}
