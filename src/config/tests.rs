#[cfg(test)]
mod tests {
    use crate::config::{
        Config, DocumentConfig, LLMConfig, ReportFormat, SectionRule, SplitStrategy,
    };
    use crate::i18n::TargetLanguage;
    use crate::types::analysis::Section;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.output_path, PathBuf::from("./mentor.reports"));
        assert_eq!(config.target_language, TargetLanguage::Chinese);
        assert_eq!(config.max_parallels, 3);
        assert_eq!(config.splitter.strategy, SplitStrategy::Keyword);
        assert!(config.splitter.rules.is_empty());
        assert_eq!(config.report.format, ReportFormat::Markdown);
        assert!(!config.report.include_coaching_questions);
        assert!(!config.verbose);
    }

    #[test]
    fn test_llm_config_default() {
        let config = LLMConfig::default();

        // api_key / api_base_url / model 来自环境变量，未设置时为空
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay_ms, 2000);
        assert_eq!(config.timeout_seconds, 120);
    }

    #[test]
    fn test_document_config_default() {
        let config = DocumentConfig::default();

        assert_eq!(config.excerpt_chars, 2000);
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_split_strategy_from_str() {
        assert_eq!(
            "keyword".parse::<SplitStrategy>().unwrap(),
            SplitStrategy::Keyword
        );
        assert_eq!(
            "JSON".parse::<SplitStrategy>().unwrap(),
            SplitStrategy::Structured
        );
        assert!("regex".parse::<SplitStrategy>().is_err());
    }

    #[test]
    fn test_report_format_from_str_and_extension() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("Word".parse::<ReportFormat>().unwrap(), ReportFormat::Docx);
        assert_eq!("html".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert!("pdf".parse::<ReportFormat>().is_err());

        assert_eq!(ReportFormat::Markdown.extension(), "md");
        assert_eq!(ReportFormat::Docx.extension(), "docx");
        assert_eq!(ReportFormat::Html.extension(), "html");
    }

    #[test]
    fn test_section_rules_default_to_language_headings() {
        let config = Config::default();
        let rules = config.section_rules();

        assert_eq!(rules.len(), 5);
        assert_eq!(rules[0].section, Section::NeedsAnalysis);
        assert_eq!(rules[0].keyword, "需求分析");
        assert_eq!(rules[4].section, Section::CompetitiveAnalysis);
        assert_eq!(rules[4].keyword, "竞争分析");

        let english = Config {
            target_language: TargetLanguage::English,
            ..Default::default()
        };
        assert_eq!(english.section_rules()[2].keyword, "Business Model");
    }

    #[test]
    fn test_section_rules_prefer_configured_rules() {
        let mut config = Config::default();
        config.splitter.rules = vec![SectionRule {
            section: Section::CompetitiveAnalysis,
            keyword: "竞争壁垒".to_string(),
        }];

        let rules = config.section_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].keyword, "竞争壁垒");
    }

    #[test]
    fn test_from_file_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("startup-mentor.toml");

        let content = r#"
target_language = "en"
output_path = "reports"

[llm]
api_base_url = "https://llm.example.com/v1"
model = "test-model"
timeout_seconds = 30

[splitter]
strategy = "structured"

[[splitter.rules]]
section = "growth-strategy"
keyword = "Growth"

[report]
format = "docx"
include_coaching_questions = true
"#;
        std::fs::write(&config_path, content).unwrap();

        let config = Config::from_file(&config_path).unwrap();

        assert_eq!(config.target_language, TargetLanguage::English);
        assert_eq!(config.output_path, PathBuf::from("reports"));
        assert_eq!(config.llm.api_base_url, "https://llm.example.com/v1");
        assert_eq!(config.llm.model, "test-model");
        assert_eq!(config.llm.timeout_seconds, 30);
        // 未出现在文件中的字段保持默认值
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.document.excerpt_chars, 2000);
        assert_eq!(config.splitter.strategy, SplitStrategy::Structured);
        assert_eq!(
            config.splitter.rules,
            vec![SectionRule {
                section: Section::GrowthStrategy,
                keyword: "Growth".to_string(),
            }]
        );
        assert_eq!(config.report.format, ReportFormat::Docx);
        assert!(config.report.include_coaching_questions);
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file(&PathBuf::from("/nonexistent/startup-mentor.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        std::fs::write(&config_path, "target_language = [").unwrap();

        assert!(Config::from_file(&config_path).is_err());
    }
}
