use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::document::Attachment;
use crate::types::project::ProjectInfo;

/// 一次分析提交：项目信息与可选附件
#[derive(Debug, Clone)]
pub struct Submission {
    pub project: ProjectInfo,
    pub attachment: Option<Attachment>,
}

/// 项目信息文件：项目字段之外可以用`document`指定附件路径
#[derive(Debug, Deserialize)]
struct IntakeFile {
    #[serde(flatten)]
    project: ProjectInfo,
    #[serde(default)]
    document: Option<PathBuf>,
}

impl Submission {
    pub fn new(project: ProjectInfo) -> Self {
        Self {
            project,
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// 从TOML项目信息文件加载，附件的相对路径相对于该文件所在目录
    pub fn from_intake_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read intake file: {:?}", path))?;
        let intake: IntakeFile = toml::from_str(&content)
            .context(format!("Failed to parse intake file: {:?}", path))?;

        let attachment = intake.document.map(|document| {
            if document.is_relative() {
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                Attachment::File(base.join(document))
            } else {
                Attachment::File(document)
            }
        });

        Ok(Self {
            project: intake.project,
            attachment,
        })
    }
}
