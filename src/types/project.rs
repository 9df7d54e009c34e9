use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 项目阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStage {
    #[serde(rename = "concept", alias = "概念阶段")]
    Concept,
    #[serde(rename = "development", alias = "产品研发")]
    Development,
    #[serde(rename = "validation", alias = "市场验证")]
    Validation,
    #[serde(rename = "scaling", alias = "规模化")]
    Scaling,
    #[serde(rename = "mature", alias = "成熟运营")]
    Mature,
}

impl ProjectStage {
    pub const ALL: [ProjectStage; 5] = [
        ProjectStage::Concept,
        ProjectStage::Development,
        ProjectStage::Validation,
        ProjectStage::Scaling,
        ProjectStage::Mature,
    ];

    /// 表单中展示的标签
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStage::Concept => "概念阶段",
            ProjectStage::Development => "产品研发",
            ProjectStage::Validation => "市场验证",
            ProjectStage::Scaling => "规模化",
            ProjectStage::Mature => "成熟运营",
        }
    }

    fn id(&self) -> &'static str {
        match self {
            ProjectStage::Concept => "concept",
            ProjectStage::Development => "development",
            ProjectStage::Validation => "validation",
            ProjectStage::Scaling => "scaling",
            ProjectStage::Mature => "mature",
        }
    }
}

impl std::fmt::Display for ProjectStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ProjectStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|stage| stage.label() == s || stage.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown project stage: {}", s))
    }
}

/// 融资情况
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundingStatus {
    #[serde(rename = "unfunded", alias = "未融资")]
    Unfunded,
    #[serde(rename = "angel", alias = "天使轮")]
    Angel,
    #[serde(rename = "pre-a", alias = "Pre-A轮")]
    PreA,
    #[serde(rename = "series-a", alias = "A轮")]
    SeriesA,
    #[serde(rename = "series-b-plus", alias = "B轮及以上")]
    SeriesBPlus,
}

impl FundingStatus {
    pub const ALL: [FundingStatus; 5] = [
        FundingStatus::Unfunded,
        FundingStatus::Angel,
        FundingStatus::PreA,
        FundingStatus::SeriesA,
        FundingStatus::SeriesBPlus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FundingStatus::Unfunded => "未融资",
            FundingStatus::Angel => "天使轮",
            FundingStatus::PreA => "Pre-A轮",
            FundingStatus::SeriesA => "A轮",
            FundingStatus::SeriesBPlus => "B轮及以上",
        }
    }

    fn id(&self) -> &'static str {
        match self {
            FundingStatus::Unfunded => "unfunded",
            FundingStatus::Angel => "angel",
            FundingStatus::PreA => "pre-a",
            FundingStatus::SeriesA => "series-a",
            FundingStatus::SeriesBPlus => "series-b-plus",
        }
    }
}

impl std::fmt::Display for FundingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for FundingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label() == s || status.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown funding status: {}", s))
    }
}

/// 项目基础信息，每次提交创建一次，之后只读
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    /// 项目名称（必填）
    pub name: String,
    /// 项目阶段
    pub stage: Option<ProjectStage>,
    /// 融资情况
    pub funding_status: Option<FundingStatus>,
    /// 行业领域
    pub industry: Option<String>,
    /// 目标客户
    pub target_customers: Option<String>,
    /// 核心产品/服务描述
    pub product_description: Option<String>,
    /// 当前进展和面临的主要问题
    pub current_challenges: Option<String>,
}

/// 输入校验错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("项目名称不能为空")]
    MissingProjectName,
}

impl ProjectInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 分析前的输入校验，只有项目名称是必填项
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingProjectName);
        }
        Ok(())
    }

    /// 可选字段为空白字符串时视为缺失
    pub fn field(value: &Option<String>) -> Option<&str> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}
