use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::generator::assemble::RenderedReport;

pub trait Outlet {
    async fn save(&self, report: &RenderedReport) -> Result<PathBuf>;
}

/// 将渲染好的报告写入输出目录
pub struct DiskOutlet {
    output_dir: PathBuf,
}

impl DiskOutlet {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, report: &RenderedReport) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .context(format!("无法创建输出目录: {}", self.output_dir.display()))?;

        // 同名报告直接覆盖
        let output_file_path = self.output_dir.join(&report.filename);
        tokio::fs::write(&output_file_path, &report.bytes)
            .await
            .context(format!("无法写入报告: {}", output_file_path.display()))?;

        println!("💾 已保存报告: {}", output_file_path.display());
        Ok(output_file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportFormat;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_creates_directory_and_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let outlet = DiskOutlet::new(temp_dir.path().join("reports/nested"));
        let mut report = RenderedReport {
            filename: "Acme-创业分析报告.md".to_string(),
            format: ReportFormat::Markdown,
            bytes: b"first".to_vec(),
        };

        let path = outlet.save(&report).await.unwrap();
        assert_eq!(path, outlet.output_dir().join("Acme-创业分析报告.md"));
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        report.bytes = b"second".to_vec();
        outlet.save(&report).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }
}
