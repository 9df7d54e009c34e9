use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::i18n::TargetLanguage;
use crate::types::analysis::Section;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "startup-mentor.toml";

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 报告输出目录
    pub output_path: PathBuf,

    /// 目标语言
    pub target_language: TargetLanguage,

    /// 批量分析时的最大并发数
    pub max_parallels: usize,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 附件解析配置
    pub document: DocumentConfig,

    /// 章节切分配置
    pub splitter: SplitterConfig,

    /// 报告输出配置
    pub report: ReportConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址（OpenAI兼容的chat completions接口）
    pub api_base_url: String,

    /// 模型标识
    pub model: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 最多尝试次数（含首次请求）
    pub retry_attempts: u32,

    /// 重试基础间隔（毫秒），按指数退避递增
    pub retry_delay_ms: u64,

    /// 单次请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 附件解析配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DocumentConfig {
    /// 写入提示词的附件摘录最大字符数
    pub excerpt_chars: usize,

    /// 最大文件大小限制（字节）
    pub max_file_size: u64,
}

/// 章节切分策略
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitStrategy {
    /// 按空行分段并做关键词匹配
    #[serde(rename = "keyword")]
    #[default]
    Keyword,
    /// 要求模型输出JSON，解析失败时退回关键词匹配
    #[serde(rename = "structured")]
    Structured,
}

impl std::fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitStrategy::Keyword => write!(f, "keyword"),
            SplitStrategy::Structured => write!(f, "structured"),
        }
    }
}

impl std::str::FromStr for SplitStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyword" => Ok(SplitStrategy::Keyword),
            "structured" | "json" => Ok(SplitStrategy::Structured),
            _ => Err(format!("Unknown split strategy: {}", s)),
        }
    }
}

/// 一条章节匹配规则
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SectionRule {
    pub section: Section,
    pub keyword: String,
}

/// 章节切分配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct SplitterConfig {
    pub strategy: SplitStrategy,

    /// 匹配规则，按先后顺序决定优先级；为空时使用目标语言的章节标题
    pub rules: Vec<SectionRule>,
}

/// 报告格式
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[serde(rename = "markdown")]
    #[default]
    Markdown,
    #[serde(rename = "docx")]
    Docx,
    #[serde(rename = "html")]
    Html,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Docx => "docx",
            ReportFormat::Html => "html",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Docx => write!(f, "docx"),
            ReportFormat::Html => write!(f, "html"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "docx" | "word" => Ok(ReportFormat::Docx),
            "html" => Ok(ReportFormat::Html),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// 报告输出配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct ReportConfig {
    pub format: ReportFormat,

    /// 是否在报告末尾附上启发式问题
    pub include_coaching_questions: bool,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 实际生效的章节匹配规则
    pub fn section_rules(&self) -> Vec<SectionRule> {
        if !self.splitter.rules.is_empty() {
            return self.splitter.rules.clone();
        }
        Section::ALL
            .into_iter()
            .map(|section| SectionRule {
                section,
                keyword: self.target_language.section_heading(section).to_string(),
            })
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("./mentor.reports"),
            target_language: TargetLanguage::default(),
            max_parallels: 3,
            llm: LLMConfig::default(),
            document: DocumentConfig::default(),
            splitter: SplitterConfig::default(),
            report: ReportConfig::default(),
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("STARTUP_MENTOR_API_KEY").unwrap_or_default(),
            api_base_url: std::env::var("STARTUP_MENTOR_API_BASE_URL").unwrap_or_default(),
            model: std::env::var("STARTUP_MENTOR_MODEL").unwrap_or_default(),
            max_tokens: 4096,
            temperature: 0.7,
            retry_attempts: 3,
            retry_delay_ms: 2000,
            timeout_seconds: 120,
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            excerpt_chars: 2000,
            max_file_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
