use std::sync::Arc;

use uuid::Uuid;

use crate::config::Config;
use crate::generator::coaching::CoachingSession;
use crate::generator::split::{SectionSplitter, build_splitter};
use crate::llm::client::CompletionService;

/// 单次提交的会话上下文
///
/// 每次提交独立创建，提交之间只共享无状态的模型调用服务。
pub struct SessionContext {
    /// 提交标识，用于日志关联
    pub submission_id: Uuid,
    /// 配置
    pub config: Config,
    /// 模型调用服务
    pub completion: Arc<dyn CompletionService>,
    /// 章节切分策略
    pub splitter: Box<dyn SectionSplitter>,
    /// 本次提交的辅导会话
    pub coaching: CoachingSession,
}

impl SessionContext {
    /// 使用指定的模型调用服务创建上下文
    pub fn with_service(config: Config, completion: Arc<dyn CompletionService>) -> Self {
        let splitter = build_splitter(&config);
        let coaching = CoachingSession::new(config.target_language);
        Self {
            submission_id: Uuid::new_v4(),
            config,
            completion,
            splitter,
            coaching,
        }
    }
}
