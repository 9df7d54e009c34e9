use crate::config::{Config, DEFAULT_CONFIG_FILE, ReportFormat, SplitStrategy};
use crate::i18n::TargetLanguage;
use crate::types::document::Attachment;
use crate::types::project::{FundingStatus, ProjectInfo, ProjectStage};
use crate::types::submission::Submission;
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// startup-mentor - 由Rust与AI驱动的创业辅导分析引擎
#[derive(Parser, Debug)]
#[command(name = "startup-mentor")]
#[command(
    about = "AI-assisted startup coaching engine. It analyses project intake data and an optional business document, and produces a five-part startup analysis report."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 项目信息文件（TOML），或包含多个项目信息文件的目录（批量分析）
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// 项目名称
    #[arg(short, long)]
    pub name: Option<String>,

    /// 项目阶段（概念阶段、产品研发、市场验证、规模化、成熟运营）
    #[arg(long)]
    pub stage: Option<String>,

    /// 融资情况（未融资、天使轮、Pre-A轮、A轮、B轮及以上）
    #[arg(long)]
    pub funding: Option<String>,

    /// 行业领域
    #[arg(long)]
    pub industry: Option<String>,

    /// 目标客户
    #[arg(long)]
    pub target_customers: Option<String>,

    /// 核心产品/服务描述
    #[arg(long)]
    pub product: Option<String>,

    /// 当前进展和面临的主要问题
    #[arg(long)]
    pub challenges: Option<String>,

    /// 附件（PDF、DOCX、TXT）
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// 报告输出目录
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 报告格式 (markdown, docx, html)
    #[arg(short, long)]
    pub format: Option<String>,

    /// 目标语言 (zh, en)
    #[arg(long)]
    pub target_language: Option<String>,

    /// 章节切分策略 (keyword, structured)
    #[arg(long)]
    pub split_strategy: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 模型标识
    #[arg(long)]
    pub model: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 单次请求超时时间（秒）
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// 最多尝试次数（含首次请求）
    #[arg(long)]
    pub retry_attempts: Option<u32>,

    /// 批量分析时的最大并发数
    #[arg(long)]
    pub max_parallels: Option<usize>,

    /// 在报告末尾附上启发式问题
    #[arg(long)]
    pub with_questions: bool,

    /// 分析前先检查模型连接
    #[arg(long)]
    pub check_connection: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = if let Some(config_path) = &self.config {
            // 如果显式指定了配置文件路径，从该路径加载
            Config::from_file(config_path)
                .context(format!("⚠️ 无法读取配置文件 {:?}", config_path))?
        } else {
            // 如果没有显式指定配置文件，尝试从默认位置加载
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(DEFAULT_CONFIG_FILE);

            if default_config_path.exists() {
                Config::from_file(&default_config_path).context(format!(
                    "⚠️ 无法读取默认配置文件 {:?}",
                    default_config_path
                ))?
            } else {
                Config::default()
            }
        };

        if let Some(output_path) = self.output_path {
            config.output_path = output_path;
        }

        // 覆盖LLM配置
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            config.llm.timeout_seconds = timeout_seconds;
        }
        if let Some(retry_attempts) = self.retry_attempts {
            config.llm.retry_attempts = retry_attempts;
        }
        if let Some(max_parallels) = self.max_parallels {
            config.max_parallels = max_parallels;
        }

        // 目标语言配置
        if let Some(target_language_str) = self.target_language {
            match target_language_str.parse::<TargetLanguage>() {
                Ok(target_language) => config.target_language = target_language,
                Err(_) => eprintln!(
                    "⚠️ 警告: 未知的目标语言: {}，使用{}",
                    target_language_str,
                    config.target_language.display_name()
                ),
            }
        }

        // 报告与切分配置
        if let Some(format_str) = self.format {
            match format_str.parse::<ReportFormat>() {
                Ok(format) => config.report.format = format,
                Err(_) => eprintln!(
                    "⚠️ 警告: 未知的报告格式: {}，使用{}",
                    format_str, config.report.format
                ),
            }
        }
        if let Some(strategy_str) = self.split_strategy {
            match strategy_str.parse::<SplitStrategy>() {
                Ok(strategy) => config.splitter.strategy = strategy,
                Err(_) => eprintln!(
                    "⚠️ 警告: 未知的切分策略: {}，使用{}",
                    strategy_str, config.splitter.strategy
                ),
            }
        }
        if self.with_questions {
            config.report.include_coaching_questions = true;
        }

        if self.verbose {
            config.verbose = true;
        }

        Ok(config)
    }

    /// 根据参数收集需要分析的提交
    pub fn submissions(&self) -> Result<Vec<Submission>> {
        match &self.project {
            Some(path) if path.is_dir() => {
                let submissions = collect_intake_files(path)?
                    .iter()
                    .map(|file| Submission::from_intake_file(file))
                    .collect::<Result<Vec<_>>>()?;
                if submissions.is_empty() {
                    bail!("目录 {:?} 中没有找到项目信息文件（*.toml）", path);
                }
                println!("📂 发现{}个项目信息文件", submissions.len());
                Ok(submissions)
            }
            Some(path) => {
                let mut submission = Submission::from_intake_file(path)?;
                self.apply_overrides(&mut submission);
                Ok(vec![submission])
            }
            None => {
                if self.name.is_none() {
                    bail!("请通过 --name 或 --project 提供项目信息");
                }
                let mut submission = Submission::new(ProjectInfo::default());
                self.apply_overrides(&mut submission);
                Ok(vec![submission])
            }
        }
    }

    /// 命令行中的项目字段优先于项目信息文件
    fn apply_overrides(&self, submission: &mut Submission) {
        let project = &mut submission.project;

        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(stage_str) = &self.stage {
            match stage_str.parse::<ProjectStage>() {
                Ok(stage) => project.stage = Some(stage),
                Err(_) => eprintln!("⚠️ 警告: 未知的项目阶段: {}，已忽略", stage_str),
            }
        }
        if let Some(funding_str) = &self.funding {
            match funding_str.parse::<FundingStatus>() {
                Ok(funding) => project.funding_status = Some(funding),
                Err(_) => eprintln!("⚠️ 警告: 未知的融资情况: {}，已忽略", funding_str),
            }
        }
        if let Some(industry) = &self.industry {
            project.industry = Some(industry.clone());
        }
        if let Some(target_customers) = &self.target_customers {
            project.target_customers = Some(target_customers.clone());
        }
        if let Some(product) = &self.product {
            project.product_description = Some(product.clone());
        }
        if let Some(challenges) = &self.challenges {
            project.current_challenges = Some(challenges.clone());
        }
        if let Some(document) = &self.document {
            submission.attachment = Some(Attachment::File(document.clone()));
        }
    }
}

/// 目录下的全部项目信息文件，按路径排序
fn collect_intake_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.context(format!("无法遍历目录 {:?}", dir))?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
        {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}
