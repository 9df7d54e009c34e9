use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 从上传文件中提取出的纯文本
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtractedDocument {
    /// 原始文件名
    pub filename: String,
    /// 提取出的全文
    pub raw_text: String,
}

/// 随项目信息一起提交的附件
#[derive(Debug, Clone)]
pub enum Attachment {
    /// 本地文件，类型由扩展名推断
    File(PathBuf),
    /// 已读入内存的上传内容
    Upload {
        filename: String,
        /// 声明的MIME类型，缺失时按文件名扩展名推断
        declared_type: Option<String>,
        bytes: Vec<u8>,
    },
}

impl Attachment {
    pub fn filename(&self) -> String {
        match self {
            Attachment::File(path) => path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            Attachment::Upload { filename, .. } => filename.clone(),
        }
    }
}
