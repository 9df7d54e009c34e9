use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::analysis::Section;

/// 报告中的一个章节
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub section: Section,
    pub heading: String,
    /// 模型未给出该章节时为空字符串
    pub body: String,
}

/// 可下载的分析报告，按需生成，不在服务端保存
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub project_name: String,
    pub title: String,
    pub consultation_date: NaiveDate,
    pub version: String,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn section(&self, section: Section) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.section == section)
    }
}
