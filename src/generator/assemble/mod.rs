//! 报告组装与渲染

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::config::{Config, ReportFormat};
use crate::generator::coaching::CoachingSession;
use crate::i18n::TargetLanguage;
use crate::types::analysis::{AnalysisResult, Section};
use crate::types::report::{Report, ReportSection};

mod docx_writer;
mod html_writer;
mod markdown_writer;

/// 报告版本号
pub const REPORT_VERSION: &str = "V1.0";

/// 报告组装器
///
/// 总是按固定顺序输出全部五个章节，模型未给出的章节正文为空字符串。
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    language: TargetLanguage,
    consultation_date: NaiveDate,
}

impl ReportAssembler {
    pub fn new(language: TargetLanguage) -> Self {
        Self {
            language,
            consultation_date: Local::now().date_naive(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.consultation_date = date;
        self
    }

    pub fn assemble(&self, project_name: &str, result: &AnalysisResult) -> Report {
        let project_name = project_name.trim();
        let sections = Section::ALL
            .into_iter()
            .map(|section| ReportSection {
                section,
                heading: self.language.section_heading(section).to_string(),
                body: result.get(section).unwrap_or_default().to_string(),
            })
            .collect();

        Report {
            project_name: project_name.to_string(),
            title: self.title(project_name),
            consultation_date: self.consultation_date,
            version: REPORT_VERSION.to_string(),
            sections,
        }
    }

    fn title(&self, project_name: &str) -> String {
        let suffix = self.language.report_label("title_suffix");
        match self.language {
            TargetLanguage::Chinese => format!("{}-{}", project_name, suffix),
            TargetLanguage::English => format!("{} - {}", project_name, suffix),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("生成DOCX失败: {0}")]
    Docx(#[from] zip::result::ZipError),

    #[error("写入DOCX内容失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("Markdown转换HTML失败: {0}")]
    Html(String),
}

/// 渲染后可下载的报告文件
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub filename: String,
    pub format: ReportFormat,
    pub bytes: Vec<u8>,
}

impl RenderedReport {
    /// 在扩展名前追加序号，例如`Acme-创业分析报告-2.md`
    pub fn with_sequence(mut self, sequence: usize) -> Self {
        self.filename = match self.filename.rsplit_once('.') {
            Some((stem, extension)) => format!("{}-{}.{}", stem, sequence, extension),
            None => format!("{}-{}", self.filename, sequence),
        };
        self
    }
}

/// 报告渲染器
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    language: TargetLanguage,
    format: ReportFormat,
    include_coaching_questions: bool,
}

impl ReportRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            language: config.target_language,
            format: config.report.format,
            include_coaching_questions: config.report.include_coaching_questions,
        }
    }

    pub fn render(
        &self,
        report: &Report,
        coaching: Option<&CoachingSession>,
    ) -> Result<RenderedReport, RenderError> {
        let coaching = coaching.filter(|_| self.include_coaching_questions);

        let bytes = match self.format {
            ReportFormat::Markdown => {
                markdown_writer::render(report, self.language, coaching).into_bytes()
            }
            ReportFormat::Html => {
                let markdown = markdown_writer::render(report, self.language, coaching);
                html_writer::render(&report.title, &markdown)?.into_bytes()
            }
            ReportFormat::Docx => docx_writer::render(report, self.language, coaching)?,
        };

        Ok(RenderedReport {
            filename: self
                .language
                .get_report_filename(&report.project_name, self.format.extension()),
            format: self.format,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests;
