//! 提示词构建：项目信息 + 附件摘录 → 分析提示词

use crate::config::{Config, SplitStrategy};
use crate::i18n::TargetLanguage;
use crate::types::analysis::{AnalysisResult, Section};
use crate::types::document::ExtractedDocument;
use crate::types::project::ProjectInfo;
use crate::utils::text::truncate_chars;

/// 缺失字段的占位符
pub const PLACEHOLDER: &str = "N/A";

/// 提示词构建器
///
/// 纯函数式：相同的输入总是得到相同的提示词，不包含时间等可变内容。
/// 提示词长度受固定模板与附件摘录上限约束。
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    language: TargetLanguage,
    excerpt_chars: usize,
    structured_output: bool,
}

impl PromptBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            language: config.target_language,
            excerpt_chars: config.document.excerpt_chars,
            structured_output: config.splitter.strategy == SplitStrategy::Structured,
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self.language {
            TargetLanguage::Chinese => {
                "你是一位资深的创业导师，擅长运用一堂创业模型帮助创业者梳理需求、设计方案、规划商业模式与增长路径。"
            }
            TargetLanguage::English => {
                "You are a seasoned startup mentor who helps founders clarify their needs, design solutions, and plan business models and growth paths."
            }
        }
    }

    /// 构建分析提示词
    pub fn build(&self, project: &ProjectInfo, document: Option<&ExtractedDocument>) -> String {
        let mut prompt = String::new();

        prompt.push_str(self.intro());
        prompt.push_str("\n\n");
        prompt.push_str(&self.project_block(project));

        if let Some(block) = document.and_then(|doc| self.document_block(doc)) {
            prompt.push('\n');
            prompt.push_str(&block);
        }

        prompt.push('\n');
        prompt.push_str(&self.instruction_block());

        if self.structured_output {
            prompt.push('\n');
            prompt.push_str(&self.output_format_block());
        }

        prompt.push('\n');
        prompt.push_str(self.language.prompt_instruction());
        prompt.push('\n');
        prompt
    }

    fn intro(&self) -> &'static str {
        match self.language {
            TargetLanguage::Chinese => "请基于一堂创业模型，对以下创业项目进行系统分析。",
            TargetLanguage::English => {
                "Please analyse the following startup project systematically."
            }
        }
    }

    fn project_block(&self, project: &ProjectInfo) -> String {
        let stage = project.stage.map(|s| s.label());
        let funding = project.funding_status.map(|f| f.label());
        let rows: [(&str, &str, Option<&str>); 7] = [
            ("项目名称", "Project name", Some(project.name.trim())),
            ("项目阶段", "Stage", stage),
            ("融资情况", "Funding status", funding),
            ("行业领域", "Industry", ProjectInfo::field(&project.industry)),
            (
                "目标客户",
                "Target customers",
                ProjectInfo::field(&project.target_customers),
            ),
            (
                "核心产品/服务",
                "Product / service",
                ProjectInfo::field(&project.product_description),
            ),
            (
                "当前进展与主要问题",
                "Current progress and challenges",
                ProjectInfo::field(&project.current_challenges),
            ),
        ];

        let mut block = match self.language {
            TargetLanguage::Chinese => "## 项目信息\n".to_string(),
            TargetLanguage::English => "## Project information\n".to_string(),
        };
        for (zh, en, value) in rows {
            let value = value.filter(|v| !v.is_empty()).unwrap_or(PLACEHOLDER);
            match self.language {
                TargetLanguage::Chinese => block.push_str(&format!("- {}：{}\n", zh, value)),
                TargetLanguage::English => block.push_str(&format!("- {}: {}\n", en, value)),
            }
        }
        block
    }

    /// 附件摘录，只取前`excerpt_chars`个字符；没有可用文本时不输出
    fn document_block(&self, document: &ExtractedDocument) -> Option<String> {
        let excerpt = truncate_chars(&document.raw_text, self.excerpt_chars).trim();
        if excerpt.is_empty() {
            return None;
        }
        let block = match self.language {
            TargetLanguage::Chinese => format!(
                "## 补充材料\n以下是用户上传的文件《{}》的内容摘录：\n<document>\n{}\n</document>\n",
                document.filename, excerpt
            ),
            TargetLanguage::English => format!(
                "## Supporting material\nExcerpt from the uploaded file \"{}\":\n<document>\n{}\n</document>\n",
                document.filename, excerpt
            ),
        };
        Some(block)
    }

    fn instruction_block(&self) -> String {
        let mut block = match self.language {
            TargetLanguage::Chinese => "## 分析要求\n请按以下五个部分给出分析。每个部分以该部分的标题开头，部分之间用一个空行分隔，部分内部不要出现空行：\n".to_string(),
            TargetLanguage::English => "## Instructions\nStructure the analysis in the five parts below. Start each part with its title, separate parts with one blank line, and do not use blank lines inside a part:\n".to_string(),
        };

        for (index, section) in Section::ALL.into_iter().enumerate() {
            let heading = self.language.section_heading(section);
            let focus = self.language.section_focus_points(section);
            match self.language {
                TargetLanguage::Chinese => block.push_str(&format!(
                    "{}. {}：重点关注{}\n",
                    index + 1,
                    heading,
                    focus.join("、")
                )),
                TargetLanguage::English => block.push_str(&format!(
                    "{}. {}: focus on {}\n",
                    index + 1,
                    heading,
                    focus.join(", ")
                )),
            }
        }
        block
    }

    fn output_format_block(&self) -> String {
        let schema = schemars::schema_for!(AnalysisResult);
        let schema_json = serde_json::to_string_pretty(&schema).unwrap_or_default();
        let field_hint = Section::ALL
            .into_iter()
            .zip(json_field_names())
            .map(|(section, field)| format!("{}={}", field, self.language.section_heading(section)))
            .collect::<Vec<_>>()
            .join(", ");

        match self.language {
            TargetLanguage::Chinese => format!(
                "## 输出格式\n只输出一个JSON对象，不要输出其他内容。字段与五个部分的对应关系：{}。JSON需符合以下Schema：\n{}\n",
                field_hint, schema_json
            ),
            TargetLanguage::English => format!(
                "## Output format\nReply with a single JSON object and nothing else. Field mapping: {}. The JSON must match this schema:\n{}\n",
                field_hint, schema_json
            ),
        }
    }
}

/// AnalysisResult中各章节的JSON字段名，顺序与Section::ALL一致
fn json_field_names() -> [&'static str; 5] {
    [
        "needs_analysis",
        "solution",
        "business_model",
        "growth_strategy",
        "competitive_analysis",
    ]
}
