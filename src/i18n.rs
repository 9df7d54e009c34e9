use serde::{Deserialize, Serialize};

use crate::types::analysis::Section;

/// 目标语言类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetLanguage {
    #[serde(rename = "zh")]
    #[default]
    Chinese,
    #[serde(rename = "en")]
    English,
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::Chinese => write!(f, "zh"),
            TargetLanguage::English => write!(f, "en"),
        }
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zh" | "chinese" | "中文" => Ok(TargetLanguage::Chinese),
            "en" | "english" | "英文" => Ok(TargetLanguage::English),
            _ => Err(format!("Unknown target language: {}", s)),
        }
    }
}

impl TargetLanguage {
    /// 获取语言的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "中文",
            TargetLanguage::English => "English",
        }
    }

    /// 获取语言的提示词指令
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "请使用中文输出分析结果，确保语言表达准确、专业、易于理解。",
            TargetLanguage::English => {
                "Please write the analysis in English, ensuring accurate, professional, and easy-to-understand language."
            }
        }
    }

    /// 获取分析章节的标题，同时也是章节切分时默认匹配的关键词
    pub fn section_heading(&self, section: Section) -> &'static str {
        match self {
            TargetLanguage::Chinese => match section {
                Section::NeedsAnalysis => "需求分析",
                Section::Solution => "解决方案",
                Section::BusinessModel => "商业模式",
                Section::GrowthStrategy => "增长策略",
                Section::CompetitiveAnalysis => "竞争分析",
            },
            TargetLanguage::English => match section {
                Section::NeedsAnalysis => "Needs Analysis",
                Section::Solution => "Solution",
                Section::BusinessModel => "Business Model",
                Section::GrowthStrategy => "Growth Strategy",
                Section::CompetitiveAnalysis => "Competitive Analysis",
            },
        }
    }

    /// 获取章节的分析要点
    pub fn section_focus_points(&self, section: Section) -> &'static [&'static str] {
        match self {
            TargetLanguage::Chinese => match section {
                Section::NeedsAnalysis => {
                    &["人生规划", "创业目标", "客户细分", "市场定位", "产品服务特点"]
                }
                Section::Solution => &["差异化优势", "团队建设", "实施计划", "ROI分析"],
                Section::BusinessModel => &["价值主张", "客户细分", "渠道通路", "收入来源"],
                Section::GrowthStrategy => &["市场拓展", "客户获取", "产品升级", "资源对接"],
                Section::CompetitiveAnalysis => {
                    &["差异化分析", "技术创新", "品牌建设", "知识产权"]
                }
            },
            TargetLanguage::English => match section {
                Section::NeedsAnalysis => &[
                    "founder goals",
                    "venture objectives",
                    "customer segments",
                    "market positioning",
                    "product characteristics",
                ],
                Section::Solution => &[
                    "differentiation",
                    "team building",
                    "implementation plan",
                    "ROI",
                ],
                Section::BusinessModel => &[
                    "value proposition",
                    "customer segments",
                    "channels",
                    "revenue streams",
                ],
                Section::GrowthStrategy => &[
                    "market expansion",
                    "customer acquisition",
                    "product upgrades",
                    "resource partnerships",
                ],
                Section::CompetitiveAnalysis => &[
                    "differentiation analysis",
                    "technical innovation",
                    "brand building",
                    "intellectual property",
                ],
            },
        }
    }

    /// 获取报告中使用的固定文案
    pub fn report_label(&self, label: &str) -> String {
        match self {
            TargetLanguage::Chinese => match label {
                "title_suffix" => "创业分析报告".to_string(),
                "field" => "项目".to_string(),
                "value" => "内容".to_string(),
                "project_name" => "项目名称".to_string(),
                "consultation_date" => "咨询日期".to_string(),
                "version" => "版本号".to_string(),
                "status" => "文档状态".to_string(),
                "status_final" => "终稿".to_string(),
                "coaching_questions" => "启发式问题".to_string(),
                _ => label.to_string(),
            },
            TargetLanguage::English => match label {
                "title_suffix" => "Startup Analysis Report".to_string(),
                "field" => "Field".to_string(),
                "value" => "Value".to_string(),
                "project_name" => "Project".to_string(),
                "consultation_date" => "Consultation date".to_string(),
                "version" => "Version".to_string(),
                "status" => "Status".to_string(),
                "status_final" => "Final".to_string(),
                "coaching_questions" => "Probing Questions".to_string(),
                _ => label.to_string(),
            },
        }
    }

    /// 获取报告文件名
    pub fn get_report_filename(&self, project_name: &str, extension: &str) -> String {
        let stem = crate::utils::text::sanitize_file_stem(project_name);
        match self {
            TargetLanguage::Chinese => format!("{}-创业分析报告.{}", stem, extension),
            TargetLanguage::English => format!("{}-startup-analysis.{}", stem, extension),
        }
    }
}
