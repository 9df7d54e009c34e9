use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::generator::assemble::{ReportAssembler, ReportRenderer};
use crate::generator::context::SessionContext;
use crate::generator::extract::DocumentExtractor;
use crate::generator::outlet::{DiskOutlet, Outlet};
use crate::generator::prompt::PromptBuilder;
use crate::llm::client::{CompletionError, CompletionRequest, CompletionService, LLMClient};
use crate::types::analysis::AnalysisResult;
use crate::types::document::ExtractedDocument;
use crate::types::project::ValidationError;
use crate::types::report::Report;
use crate::types::submission::Submission;
use crate::utils::threads::do_parallel_with_limit;

/// 时间跟踪作用域，阶段按结束顺序记录
pub struct TimingScope {
    start_time: std::time::Instant,
    phase_start_times: Vec<(&'static str, std::time::Instant)>,
    phase_durations: Vec<(&'static str, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
            phase_start_times: Vec::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &'static str) {
        self.phase_start_times
            .push((phase_name, std::time::Instant::now()));
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &'static str) -> Option<Duration> {
        let index = self
            .phase_start_times
            .iter()
            .position(|(name, _)| *name == phase_name)?;
        let (_, start_time) = self.phase_start_times.remove(index);
        let duration = start_time.elapsed();
        self.phase_durations.push((phase_name, duration));
        Some(duration)
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn get_phase_durations(&self) -> &[(&'static str, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("\n各阶段执行时间:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const EXTRACT: &'static str = "extract";
    pub const PROMPT: &'static str = "prompt";
    pub const COMPLETION: &'static str = "completion";
    pub const SPLIT: &'static str = "split";
    pub const ASSEMBLE: &'static str = "assemble";
}

/// 导致提交中止的错误；附件解析失败不在此列，只记为警告
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("输入校验失败: {0}")]
    Validation(#[from] ValidationError),

    #[error("分析失败: {0}")]
    Completion(#[from] CompletionError),
}

impl PipelineError {
    /// 面向用户的提示信息
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Validation(err) => err.to_string(),
            PipelineError::Completion(err) => err.user_message(),
        }
    }
}

/// 一次提交的分析结果
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub submission_id: Uuid,
    /// 实际写入提示词的附件
    pub document: Option<ExtractedDocument>,
    /// 模型返回的原始文本
    pub raw_completion: String,
    pub result: AnalysisResult,
    pub report: Report,
    /// 不影响分析完成的问题，例如附件无法解析
    pub warnings: Vec<String>,
}

/// 执行单次提交：校验 → 附件解析 → 构建提示词 → 调用模型 → 章节切分 → 组装报告
pub async fn run_submission(
    context: &SessionContext,
    submission: &Submission,
) -> Result<PipelineOutcome, PipelineError> {
    let config = &context.config;
    let project = &submission.project;
    let mut timing = TimingScope::new();
    let mut warnings = Vec::new();

    // 校验失败时不发起任何模型调用
    project.validate()?;

    println!("🚀 开始分析项目: {}", project.name.trim());
    if config.verbose {
        println!("   提交编号: {}", context.submission_id);
    }

    timing.start_phase(TimingKeys::EXTRACT);
    let document = match &submission.attachment {
        Some(attachment) => {
            println!("📄 正在解析附件: {}", attachment.filename());
            match DocumentExtractor::new(&config.document).extract(attachment) {
                Ok(document) => {
                    if config.verbose {
                        println!(
                            "   附件文本长度: {}字符",
                            document.raw_text.chars().count()
                        );
                    }
                    Some(document)
                }
                Err(e) => {
                    eprintln!("⚠️ 警告: {}，将忽略附件继续分析", e);
                    warnings.push(e.to_string());
                    None
                }
            }
        }
        None => None,
    };
    timing.end_phase(TimingKeys::EXTRACT);

    timing.start_phase(TimingKeys::PROMPT);
    let builder = PromptBuilder::new(config);
    let prompt = builder.build(project, document.as_ref());
    let request = CompletionRequest::new(prompt).with_system_prompt(builder.system_prompt());
    if config.verbose {
        println!("   提示词长度: {}字符", request.user_prompt.chars().count());
    }
    timing.end_phase(TimingKeys::PROMPT);

    timing.start_phase(TimingKeys::COMPLETION);
    println!("🤖 正在调用模型服务: {}", context.completion.name());
    let raw_completion = match context.completion.complete(&request).await {
        Ok(text) => text,
        Err(e) => {
            eprintln!("❌ {}", e.user_message());
            return Err(e.into());
        }
    };
    timing.end_phase(TimingKeys::COMPLETION);

    timing.start_phase(TimingKeys::SPLIT);
    let result = context.splitter.split(&raw_completion);
    if result.is_empty() {
        let warning = "未能从模型返回内容中识别出任何章节".to_string();
        eprintln!("⚠️ 警告: {}", warning);
        warnings.push(warning);
    } else if config.verbose {
        println!(
            "   识别出{}个章节（切分策略: {}）",
            result.present_sections().len(),
            context.splitter.name()
        );
    }
    timing.end_phase(TimingKeys::SPLIT);

    timing.start_phase(TimingKeys::ASSEMBLE);
    let report = ReportAssembler::new(config.target_language).assemble(&project.name, &result);
    timing.end_phase(TimingKeys::ASSEMBLE);

    println!("✅ 项目分析完成: {}", report.project_name);
    if config.verbose {
        println!("\n{}", timing.generate_timing_report());
    }

    Ok(PipelineOutcome {
        submission_id: context.submission_id,
        document,
        raw_completion,
        result,
        report,
        warnings,
    })
}

/// 执行提交并把渲染好的报告写入输出目录
///
/// `sequence`用于区分同一批次中文件名相同的报告。
pub async fn analyze_submission(
    context: &SessionContext,
    submission: &Submission,
    outlet: &impl Outlet,
    sequence: Option<usize>,
) -> Result<PathBuf> {
    let outcome = run_submission(context, submission).await?;
    let mut rendered =
        ReportRenderer::new(&context.config).render(&outcome.report, Some(&context.coaching))?;
    if let Some(sequence) = sequence {
        rendered = rendered.with_sequence(sequence);
        eprintln!(
            "⚠️ 警告: 本批次中存在同名项目 {}，报告另存为 {}",
            outcome.report.project_name, rendered.filename
        );
    }
    outlet.save(&rendered).await
}

/// 同一批次中报告文件名相同的提交，从第二个起依次编号2、3、...
fn report_sequences(config: &Config, submissions: &[Submission]) -> Vec<Option<usize>> {
    let extension = config.report.format.extension();
    let mut seen: HashMap<String, usize> = HashMap::new();
    submissions
        .iter()
        .map(|submission| {
            // 按小写比较，兼容大小写不敏感的文件系统
            let key = config
                .target_language
                .get_report_filename(submission.project.name.trim(), extension)
                .to_lowercase();
            let count = seen.entry(key).or_insert(0);
            *count += 1;
            (*count > 1).then_some(*count)
        })
        .collect()
}

/// 启动分析工作流
pub async fn launch(
    config: &Config,
    submissions: Vec<Submission>,
    check_connection: bool,
) -> Result<Vec<PathBuf>> {
    let client = LLMClient::new(&config.llm)?.with_verbose(config.verbose);

    if check_connection {
        client.check_connection().await?;
    }

    launch_with_service(config, submissions, Arc::new(client)).await
}

/// 使用给定的模型服务分析全部提交，多个提交时按`max_parallels`并发
pub async fn launch_with_service(
    config: &Config,
    submissions: Vec<Submission>,
    service: Arc<dyn CompletionService>,
) -> Result<Vec<PathBuf>> {
    if submissions.is_empty() {
        bail!("没有需要分析的项目");
    }

    let outlet = DiskOutlet::new(&config.output_path);
    let total = submissions.len();
    if total > 1 {
        println!(
            "🚀 启动批量分析，共{}个项目，最大并发数：{}",
            total, config.max_parallels
        );
    }

    let sequences = report_sequences(config, &submissions);
    let outlet_ref = &outlet;
    let futures: Vec<_> = submissions
        .into_iter()
        .zip(sequences)
        .map(|(submission, sequence)| {
            // 每个提交独立的会话上下文
            let context = SessionContext::with_service(config.clone(), service.clone());
            async move {
                let name = submission.project.name.clone();
                let result =
                    analyze_submission(&context, &submission, outlet_ref, sequence).await;
                (name, result)
            }
        })
        .collect();

    let results = do_parallel_with_limit(futures, config.max_parallels).await;

    let mut saved = Vec::new();
    let mut failures = Vec::new();
    for (name, result) in results {
        match result {
            Ok(path) => saved.push(path),
            Err(e) => {
                eprintln!("❌ 项目 {} 分析失败: {}", name, e);
                failures.push(e);
            }
        }
    }

    if total > 1 {
        println!(
            "📊 批量分析结束：成功{}个，失败{}个",
            saved.len(),
            failures.len()
        );
    }

    // 单个提交时直接返回原始错误
    if total == 1
        && let Some(err) = failures.pop()
    {
        return Err(err);
    }
    if !failures.is_empty() {
        bail!("{}个项目分析失败", failures.len());
    }

    Ok(saved)
}
