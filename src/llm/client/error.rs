use thiserror::Error;

/// 调用模型服务时可能出现的错误
///
/// 按调用方的处理方式区分：网络、超时、限流与5xx可以重试；
/// 鉴权、配置与返回格式错误直接失败并提示用户。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// 缺少API KEY、基地址或模型等配置
    #[error("模型服务配置缺失: {0}")]
    Configuration(String),

    /// 连接失败、连接中断等传输层错误
    #[error("网络请求失败: {message}")]
    Network { message: String },

    /// 单次请求超过超时时间
    #[error("请求超时（{seconds}秒）")]
    Timeout { seconds: u64 },

    /// 401/403
    #[error("鉴权失败（HTTP {status}）: {message}")]
    Authentication { status: u16, message: String },

    /// 429，retry_after为服务端建议的等待秒数
    #[error("请求过于频繁，已被模型服务限流")]
    RateLimited { retry_after: Option<u64> },

    /// 其他非2xx响应
    #[error("模型服务返回错误（HTTP {status}）: {message}")]
    Api { status: u16, message: String },

    /// 响应不是预期的JSON结构，或没有返回文本
    #[error("模型返回内容无法解析: {message}")]
    MalformedResponse { message: String },
}

impl CompletionError {
    /// 根据HTTP状态码分类
    pub fn from_status(status: u16, message: impl Into<String>, retry_after: Option<u64>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => CompletionError::Authentication { status, message },
            429 => CompletionError::RateLimited { retry_after },
            _ => CompletionError::Api { status, message },
        }
    }

    /// 是否值得重试
    pub fn is_retryable(&self) -> bool {
        match self {
            CompletionError::Network { .. }
            | CompletionError::Timeout { .. }
            | CompletionError::RateLimited { .. } => true,
            CompletionError::Api { status, .. } => *status >= 500,
            CompletionError::Configuration(_)
            | CompletionError::Authentication { .. }
            | CompletionError::MalformedResponse { .. } => false,
        }
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            CompletionError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// 面向用户的提示信息，每类错误给出不同的处理建议
    pub fn user_message(&self) -> String {
        match self {
            CompletionError::Configuration(detail) => {
                format!("模型服务尚未配置（{}），请检查配置文件或环境变量。", detail)
            }
            CompletionError::Network { .. } => {
                "无法连接到模型服务，请检查网络后重新提交。".to_string()
            }
            CompletionError::Timeout { seconds } => {
                format!("模型服务在{}秒内未响应，请稍后重新提交。", seconds)
            }
            CompletionError::Authentication { .. } => {
                "模型服务鉴权失败，请检查API KEY是否正确或已过期。".to_string()
            }
            CompletionError::RateLimited { retry_after } => match retry_after {
                Some(seconds) => format!("模型服务调用过于频繁，请在{}秒后重试。", seconds),
                None => "模型服务调用过于频繁，请稍后重试。".to_string(),
            },
            CompletionError::Api { status, .. } => {
                format!("模型服务暂时不可用（HTTP {}），请稍后重新提交。", status)
            }
            CompletionError::MalformedResponse { .. } => {
                "模型服务返回了无法识别的内容，请更换模型或稍后重试。".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return CompletionError::MalformedResponse {
                message: err.to_string(),
            };
        }
        CompletionError::Network {
            message: err.to_string(),
        }
    }
}
