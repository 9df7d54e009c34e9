//! 章节切分：把模型返回的整段文本归入五个固定章节
//!
//! 这是尽力而为的启发式策略，而不是解析器：模型的措辞千变万化，
//! 既不保证五个章节都能被识别，也不保证归入的内容在主题上完全准确。

use regex::Regex;
use std::sync::LazyLock;

use crate::config::{Config, SectionRule, SplitStrategy};
use crate::i18n::TargetLanguage;
use crate::types::analysis::AnalysisResult;
use crate::utils::text::strip_code_fence;

/// 空行（允许包含空白字符）
static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\s*\n").expect("blank line pattern is valid"));

/// 可替换的章节切分策略
pub trait SectionSplitter: Send + Sync {
    fn split(&self, completion: &str) -> AnalysisResult;

    fn name(&self) -> &'static str;
}

/// 根据配置创建切分策略
pub fn build_splitter(config: &Config) -> Box<dyn SectionSplitter> {
    let keyword = KeywordSplitter::from_config(config);
    match config.splitter.strategy {
        SplitStrategy::Keyword => Box::new(keyword),
        SplitStrategy::Structured => Box::new(StructuredSplitter::new(keyword)),
    }
}

/// 按空行分段，再按规则顺序做关键词匹配
///
/// 每个段落归入第一个命中的章节并覆盖该章节已有的内容；
/// 一个关键词都没命中的段落被丢弃。
#[derive(Debug, Clone)]
pub struct KeywordSplitter {
    rules: Vec<SectionRule>,
    case_insensitive: bool,
}

impl KeywordSplitter {
    pub fn new(rules: Vec<SectionRule>) -> Self {
        Self {
            rules,
            case_insensitive: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            rules: config.section_rules(),
            case_insensitive: config.target_language == TargetLanguage::English,
        }
    }

    /// 按空行切出的非空段落
    pub fn segments(text: &str) -> Vec<&str> {
        BLANK_LINE
            .split(text)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    fn matching_rule(&self, segment: &str) -> Option<&SectionRule> {
        if self.case_insensitive {
            let lowered = segment.to_lowercase();
            self.rules
                .iter()
                .find(|rule| lowered.contains(&rule.keyword.to_lowercase()))
        } else {
            self.rules
                .iter()
                .find(|rule| segment.contains(rule.keyword.as_str()))
        }
    }
}

impl SectionSplitter for KeywordSplitter {
    fn split(&self, completion: &str) -> AnalysisResult {
        let mut result = AnalysisResult::default();
        for segment in Self::segments(completion) {
            if let Some(rule) = self.matching_rule(segment) {
                result.set(rule.section, segment);
            }
        }
        result
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

/// 解析模型按JSON Schema输出的结构化结果，无法解析时退回关键词匹配
#[derive(Debug, Clone)]
pub struct StructuredSplitter {
    fallback: KeywordSplitter,
}

impl StructuredSplitter {
    pub fn new(fallback: KeywordSplitter) -> Self {
        Self { fallback }
    }

    fn parse_json(completion: &str) -> Option<AnalysisResult> {
        let body = strip_code_fence(completion);
        // 模型偶尔会在JSON前后附带说明文字
        let start = body.find('{')?;
        let end = body.rfind('}')?;
        if end < start {
            return None;
        }
        let parsed: AnalysisResult = serde_json::from_str(&body[start..=end]).ok()?;

        let mut result = AnalysisResult::default();
        for section in parsed.present_sections() {
            if let Some(text) = parsed.get(section).map(str::trim)
                && !text.is_empty()
            {
                result.set(section, text);
            }
        }
        (!result.is_empty()).then_some(result)
    }
}

impl SectionSplitter for StructuredSplitter {
    fn split(&self, completion: &str) -> AnalysisResult {
        match Self::parse_json(completion) {
            Some(result) => result,
            None => {
                eprintln!("⚠️ 模型未按JSON格式返回，改用关键词匹配切分章节");
                self.fallback.split(completion)
            }
        }
    }

    fn name(&self) -> &'static str {
        "structured"
    }
}
