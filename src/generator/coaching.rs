//! 启发式问题库与单次提交的辅导会话

use serde::{Deserialize, Serialize};

use crate::i18n::TargetLanguage;

/// 辅导主题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusArea {
    /// 需求探索
    NeedsDiscovery,
    /// 方案验证
    SolutionValidation,
}

impl FocusArea {
    pub const ALL: [FocusArea; 2] = [FocusArea::NeedsDiscovery, FocusArea::SolutionValidation];

    pub fn label(&self, language: TargetLanguage) -> &'static str {
        match (language, self) {
            (TargetLanguage::Chinese, FocusArea::NeedsDiscovery) => "需求探索",
            (TargetLanguage::Chinese, FocusArea::SolutionValidation) => "方案验证",
            (TargetLanguage::English, FocusArea::NeedsDiscovery) => "Needs discovery",
            (TargetLanguage::English, FocusArea::SolutionValidation) => "Solution validation",
        }
    }

    /// 该主题下的启发式问题
    pub fn questions(&self, language: TargetLanguage) -> &'static [&'static str] {
        match (language, self) {
            (TargetLanguage::Chinese, FocusArea::NeedsDiscovery) => &[
                "您的创业愿景是什么？",
                "目标客户群体的痛点是什么？",
                "您认为产品的核心竞争力在哪里？",
            ],
            (TargetLanguage::Chinese, FocusArea::SolutionValidation) => &[
                "这个解决方案是否足够差异化？",
                "实施过程中可能遇到哪些挑战？",
                "如何确保方案的可执行性？",
            ],
            (TargetLanguage::English, FocusArea::NeedsDiscovery) => &[
                "What is your vision for this venture?",
                "What pain points does your target customer group have?",
                "Where do you think the core competitiveness of the product lies?",
            ],
            (TargetLanguage::English, FocusArea::SolutionValidation) => &[
                "Is this solution differentiated enough?",
                "What challenges might come up during implementation?",
                "How will you make sure the plan is executable?",
            ],
        }
    }
}

/// 一次提交对应的辅导会话，随SessionContext创建和销毁
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachingSession {
    pub language: TargetLanguage,
    pub focus_areas: Vec<FocusArea>,
}

impl CoachingSession {
    pub fn new(language: TargetLanguage) -> Self {
        Self {
            language,
            focus_areas: FocusArea::ALL.to_vec(),
        }
    }

    /// 按主题分组的问题序列
    pub fn question_sequence(&self) -> Vec<(&'static str, &'static [&'static str])> {
        self.focus_areas
            .iter()
            .map(|area| (area.label(self.language), area.questions(self.language)))
            .collect()
    }
}
