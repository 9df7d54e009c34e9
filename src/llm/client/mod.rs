//! LLM客户端 - 提供统一的补全服务接口

use async_trait::async_trait;
use rand::Rng;
use reqwest::header::RETRY_AFTER;
use std::future::Future;
use std::time::Duration;

use crate::config::LLMConfig;

pub mod error;
pub mod mock;
pub mod types;

pub use error::CompletionError;
pub use types::{CompletionRequest, TokenUsage};

use types::{ChatCompletionRequest, ChatCompletionResponse, ErrorEnvelope};

/// 单次退避等待的上限，服务端要求更长的等待时直接返回限流错误
const MAX_BACKOFF_MS: u64 = 60_000;

/// 补全服务：输入提示词，返回一段非空文本
///
/// 实现必须是无状态的，以便多个提交共享同一个实例。
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;

    fn name(&self) -> &str;
}

/// 基于OpenAI兼容接口的LLM客户端
///
/// 每次请求受`timeout_seconds`约束；返回的future被丢弃时请求随之取消。
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    http: reqwest::Client,
    endpoint: String,
    verbose: bool,
}

impl LLMClient {
    /// 创建新的LLM客户端，缺少必要配置时直接返回错误
    pub fn new(config: &LLMConfig) -> Result<Self, CompletionError> {
        if config.api_base_url.trim().is_empty() {
            return Err(CompletionError::Configuration("api_base_url".to_string()));
        }
        if config.model.trim().is_empty() {
            return Err(CompletionError::Configuration("model".to_string()));
        }
        if config.api_key.trim().is_empty() {
            return Err(CompletionError::Configuration("api_key".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| CompletionError::Configuration(e.to_string()))?;

        let endpoint = format!(
            "{}/chat/completions",
            config.api_base_url.trim().trim_end_matches('/')
        );

        Ok(Self {
            config: config.clone(),
            http,
            endpoint,
            verbose: false,
        })
    }

    /// 开启后打印每次请求的Token用量
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 检查模型连接是否正常
    pub async fn check_connection(&self) -> Result<(), CompletionError> {
        println!("🔄 正在检查模型连接...");
        let request = CompletionRequest::new("Hello")
            .with_system_prompt("System: You are a helpful assistant.");
        match self.complete(&request).await {
            Ok(_) => {
                println!("✅ 模型连接正常");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ 模型连接失败: {}", e);
                Err(e)
            }
        }
    }

    /// 通用重试逻辑，只对可重试的错误进行指数退避重试
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T, CompletionError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, CompletionError>>,
    {
        let max_attempts = self.config.retry_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    if !err.is_retryable() || attempt >= max_attempts {
                        if attempt > 1 {
                            eprintln!(
                                "❌ 调用模型服务出错，尝试 {} 次均失败...{}",
                                attempt, err
                            );
                        }
                        return Err(err);
                    }
                    if let Some(seconds) = err.retry_after()
                        && seconds.saturating_mul(1000) > MAX_BACKOFF_MS
                    {
                        eprintln!(
                            "❌ 模型服务要求{}秒后重试，超过最长等待时间，不再重试",
                            seconds
                        );
                        return Err(err);
                    }
                    let delay =
                        backoff_delay(self.config.retry_delay_ms, attempt, err.retry_after());
                    eprintln!(
                        "❌ 调用模型服务出错，{}毫秒后重试 (第 {} / {}次尝试): {}",
                        delay.as_millis(),
                        attempt,
                        max_attempts,
                        err
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// 发送一次请求，不做重试
    async fn send_once(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: request.clone().into_messages(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let text = response.text().await.unwrap_or_default();
            return Err(CompletionError::from_status(
                status.as_u16(),
                error_message(&text),
                retry_after,
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.classify_transport_error(e))?;
        let (content, usage) = parse_completion(&text)?;
        if self.verbose
            && let Some(usage) = usage
        {
            println!(
                "   Token用量: 输入{} / 输出{} / 合计{}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }
        Ok(content)
    }

    fn classify_transport_error(&self, err: reqwest::Error) -> CompletionError {
        if err.is_timeout() {
            CompletionError::Timeout {
                seconds: self.config.timeout_seconds,
            }
        } else {
            CompletionError::from(err)
        }
    }
}

#[async_trait]
impl CompletionService for LLMClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.retry_with_backoff(|| self.send_once(request)).await
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

/// 计算第`attempt`次失败后的等待时间：服务端给出Retry-After时优先采用，
/// 否则按基础间隔指数增长，并叠加不超过一半基础间隔的随机抖动
pub fn backoff_delay(base_ms: u64, attempt: u32, retry_after: Option<u64>) -> Duration {
    if let Some(seconds) = retry_after {
        let server_ms = seconds.saturating_mul(1000);
        return Duration::from_millis(server_ms.max(base_ms).min(MAX_BACKOFF_MS));
    }

    let exponent = attempt.saturating_sub(1).min(16);
    let exp_ms = base_ms.saturating_mul(1u64 << exponent).min(MAX_BACKOFF_MS);
    let jitter = if base_ms >= 2 {
        rand::rng().random_range(0..=base_ms / 2)
    } else {
        0
    };
    Duration::from_millis(exp_ms.saturating_add(jitter).min(MAX_BACKOFF_MS))
}

/// 从成功响应中取出第一条回复文本和Token用量
fn parse_completion(body: &str) -> Result<(String, Option<TokenUsage>), CompletionError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::MalformedResponse {
            message: e.to_string(),
        })?;

    let usage = parsed.usage;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(CompletionError::MalformedResponse {
            message: "响应中没有回复文本".to_string(),
        });
    }
    Ok((content, usage))
}

/// 错误响应体中的message，解析失败时截取原文
fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    crate::utils::text::truncate_chars(body.trim(), 200).to_string()
}

// Include tests
#[cfg(test)]
mod tests;
