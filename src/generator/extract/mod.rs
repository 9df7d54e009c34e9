//! 附件文本提取：PDF / DOCX / 纯文本

use std::path::Path;
use thiserror::Error;

use crate::config::DocumentConfig;
use crate::types::document::{Attachment, ExtractedDocument};

mod docx_reader;
mod pdf_reader;

/// 支持的附件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// 根据声明的MIME类型识别
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_lowercase().as_str() {
            "application/pdf" => Some(DocumentKind::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(DocumentKind::Docx)
            }
            "text/plain" | "text/markdown" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    /// 根据文件扩展名识别
    pub fn from_extension(filename: &str) -> Option<Self> {
        let extension = Path::new(filename).extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" | "md" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    /// 声明的MIME类型可识别时优先，否则按扩展名
    pub fn resolve(filename: &str, declared_type: Option<&str>) -> Option<Self> {
        declared_type
            .and_then(Self::from_mime)
            .or_else(|| Self::from_extension(filename))
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "PDF"),
            DocumentKind::Docx => write!(f, "DOCX"),
            DocumentKind::PlainText => write!(f, "TXT"),
        }
    }
}

/// 附件解析错误，均可恢复：分析流程会忽略附件继续进行
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("不支持的文件类型: {filename}（仅支持PDF、DOCX、TXT）")]
    UnsupportedType { filename: String },

    #[error("文件过大: {filename}（{size}字节，上限{limit}字节）")]
    TooLarge {
        filename: String,
        size: u64,
        limit: u64,
    },

    #[error("无法读取文件 {filename}: {source}")]
    Io {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("文本文件 {filename} 不是有效的UTF-8编码")]
    InvalidEncoding { filename: String },

    #[error("{kind}文件 {filename} 已损坏或无法解析: {message}")]
    Corrupt {
        filename: String,
        kind: DocumentKind,
        message: String,
    },
}

/// 附件文本提取器
pub struct DocumentExtractor {
    max_file_size: u64,
}

impl DocumentExtractor {
    pub fn new(config: &DocumentConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
        }
    }

    /// 提取附件全文
    pub fn extract(&self, attachment: &Attachment) -> Result<ExtractedDocument, ExtractionError> {
        match attachment {
            Attachment::File(path) => self.extract_file(path),
            Attachment::Upload {
                filename,
                declared_type,
                bytes,
            } => self.extract_bytes(filename, declared_type.as_deref(), bytes),
        }
    }

    /// 从本地文件提取
    pub fn extract_file(&self, path: &Path) -> Result<ExtractedDocument, ExtractionError> {
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        // 先识别类型与检查大小，避免读入不支持或过大的文件
        DocumentKind::from_extension(&filename).ok_or_else(|| {
            ExtractionError::UnsupportedType {
                filename: filename.clone(),
            }
        })?;
        let metadata = std::fs::metadata(path).map_err(|source| ExtractionError::Io {
            filename: filename.clone(),
            source,
        })?;
        self.check_size(&filename, metadata.len())?;

        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
            filename: filename.clone(),
            source,
        })?;
        self.extract_bytes(&filename, None, &bytes)
    }

    /// 从内存中的上传内容提取
    pub fn extract_bytes(
        &self,
        filename: &str,
        declared_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<ExtractedDocument, ExtractionError> {
        let kind = DocumentKind::resolve(filename, declared_type).ok_or_else(|| {
            ExtractionError::UnsupportedType {
                filename: filename.to_string(),
            }
        })?;
        self.check_size(filename, bytes.len() as u64)?;

        let corrupt = |message: String| ExtractionError::Corrupt {
            filename: filename.to_string(),
            kind,
            message,
        };

        let raw_text = match kind {
            DocumentKind::PlainText => String::from_utf8(bytes.to_vec()).map_err(|_| {
                ExtractionError::InvalidEncoding {
                    filename: filename.to_string(),
                }
            })?,
            DocumentKind::Docx => {
                docx_reader::extract_text(bytes).map_err(|e| corrupt(e.to_string()))?
            }
            DocumentKind::Pdf => {
                pdf_reader::extract_text(bytes).map_err(|e| corrupt(e.to_string()))?
            }
        };

        Ok(ExtractedDocument {
            filename: filename.to_string(),
            raw_text,
        })
    }

    fn check_size(&self, filename: &str, size: u64) -> Result<(), ExtractionError> {
        if size > self.max_file_size {
            return Err(ExtractionError::TooLarge {
                filename: filename.to_string(),
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }
}
