use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 分析报告的五个固定章节，声明顺序即报告顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    NeedsAnalysis,
    Solution,
    BusinessModel,
    GrowthStrategy,
    CompetitiveAnalysis,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::NeedsAnalysis,
        Section::Solution,
        Section::BusinessModel,
        Section::GrowthStrategy,
        Section::CompetitiveAnalysis,
    ];
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::NeedsAnalysis => write!(f, "needs-analysis"),
            Section::Solution => write!(f, "solution"),
            Section::BusinessModel => write!(f, "business-model"),
            Section::GrowthStrategy => write!(f, "growth-strategy"),
            Section::CompetitiveAnalysis => write!(f, "competitive-analysis"),
        }
    }
}

impl std::str::FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "needs-analysis" => Ok(Section::NeedsAnalysis),
            "solution" => Ok(Section::Solution),
            "business-model" => Ok(Section::BusinessModel),
            "growth-strategy" => Ok(Section::GrowthStrategy),
            "competitive-analysis" => Ok(Section::CompetitiveAnalysis),
            _ => Err(format!("Unknown section: {}", s)),
        }
    }
}

/// 模型返回内容按章节切分后的结果，未匹配到的章节保持为空
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    /// 需求分析
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub needs_analysis: Option<String>,
    /// 解决方案
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    /// 商业模式
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_model: Option<String>,
    /// 增长策略
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_strategy: Option<String>,
    /// 竞争分析
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_analysis: Option<String>,
}

impl AnalysisResult {
    pub fn get(&self, section: Section) -> Option<&str> {
        match section {
            Section::NeedsAnalysis => self.needs_analysis.as_deref(),
            Section::Solution => self.solution.as_deref(),
            Section::BusinessModel => self.business_model.as_deref(),
            Section::GrowthStrategy => self.growth_strategy.as_deref(),
            Section::CompetitiveAnalysis => self.competitive_analysis.as_deref(),
        }
    }

    /// 写入章节内容，已有内容会被覆盖
    pub fn set(&mut self, section: Section, text: impl Into<String>) {
        let slot = match section {
            Section::NeedsAnalysis => &mut self.needs_analysis,
            Section::Solution => &mut self.solution,
            Section::BusinessModel => &mut self.business_model,
            Section::GrowthStrategy => &mut self.growth_strategy,
            Section::CompetitiveAnalysis => &mut self.competitive_analysis,
        };
        *slot = Some(text.into());
    }

    /// 已填充的章节，按固定顺序
    pub fn present_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.get(*s).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present_sections().is_empty()
    }
}
