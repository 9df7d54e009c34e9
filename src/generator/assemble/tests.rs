#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::config::{Config, ReportFormat};
    use crate::generator::assemble::{REPORT_VERSION, ReportAssembler, ReportRenderer};
    use crate::generator::coaching::CoachingSession;
    use crate::generator::extract::DocumentExtractor;
    use crate::i18n::TargetLanguage;
    use crate::types::analysis::{AnalysisResult, Section};

    fn assembler() -> ReportAssembler {
        ReportAssembler::new(TargetLanguage::Chinese)
            .with_date(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
    }

    fn partial_result() -> AnalysisResult {
        let mut result = AnalysisResult::default();
        result.set(Section::NeedsAnalysis, "需求分析: demand text");
        result.set(Section::Solution, "解决方案: solution text");
        result
    }

    fn renderer(format: ReportFormat, with_questions: bool) -> ReportRenderer {
        let mut config = Config::default();
        config.report.format = format;
        config.report.include_coaching_questions = with_questions;
        ReportRenderer::new(&config)
    }

    #[test]
    fn test_assemble_empty_result_yields_five_empty_sections() {
        let report = assembler().assemble("Acme", &AnalysisResult::default());

        assert_eq!(report.sections.len(), 5);
        for (section, expected) in report.sections.iter().zip(Section::ALL) {
            assert_eq!(section.section, expected);
            assert_eq!(section.body, "");
            assert_eq!(
                section.heading,
                TargetLanguage::Chinese.section_heading(expected)
            );
        }
    }

    #[test]
    fn test_assemble_keeps_order_and_fills_missing_with_empty() {
        let report = assembler().assemble(" Acme ", &partial_result());

        assert_eq!(report.project_name, "Acme");
        assert_eq!(report.title, "Acme-创业分析报告");
        assert_eq!(report.version, REPORT_VERSION);
        assert_eq!(
            report.section(Section::NeedsAnalysis).unwrap().body,
            "需求分析: demand text"
        );
        assert_eq!(
            report.section(Section::Solution).unwrap().body,
            "解决方案: solution text"
        );
        for section in [
            Section::BusinessModel,
            Section::GrowthStrategy,
            Section::CompetitiveAnalysis,
        ] {
            assert_eq!(report.section(section).unwrap().body, "");
        }
    }

    #[test]
    fn test_english_title() {
        let report = ReportAssembler::new(TargetLanguage::English)
            .assemble("Acme", &AnalysisResult::default());
        assert_eq!(report.title, "Acme - Startup Analysis Report");
        assert_eq!(report.sections[0].heading, "Needs Analysis");
    }

    #[test]
    fn test_render_markdown_layout() {
        let report = assembler().assemble("Acme", &partial_result());
        let rendered = renderer(ReportFormat::Markdown, false)
            .render(&report, None)
            .unwrap();
        let markdown = String::from_utf8(rendered.bytes).unwrap();

        assert_eq!(rendered.filename, "Acme-创业分析报告.md");
        assert!(markdown.starts_with("# Acme-创业分析报告\n\n| 项目 | 内容 |\n| --- | --- |\n"));
        assert!(markdown.contains("| 项目名称 | Acme |\n"));
        assert!(markdown.contains("| 咨询日期 | 2026-10-18 |\n"));
        assert!(markdown.contains("| 版本号 | V1.0 |\n"));
        assert!(markdown.contains("| 文档状态 | 终稿 |\n"));
        assert!(markdown.contains("\n## 需求分析\n\n需求分析: demand text\n"));

        // 空章节也保留标题
        let headings: Vec<_> = markdown.lines().filter(|l| l.starts_with("## ")).collect();
        assert_eq!(
            headings,
            vec!["## 需求分析", "## 解决方案", "## 商业模式", "## 增长策略", "## 竞争分析"]
        );
        assert!(!markdown.contains("启发式问题"));
    }

    #[test]
    fn test_coaching_appendix_only_when_enabled() {
        let report = assembler().assemble("Acme", &partial_result());
        let session = CoachingSession::new(TargetLanguage::Chinese);

        let with = renderer(ReportFormat::Markdown, true)
            .render(&report, Some(&session))
            .unwrap();
        let with = String::from_utf8(with.bytes).unwrap();
        assert!(with.contains("\n## 启发式问题\n"));
        assert!(with.contains("### 需求探索"));
        assert!(with.contains("- 如何确保方案的可执行性？\n"));

        let without = renderer(ReportFormat::Markdown, false)
            .render(&report, Some(&session))
            .unwrap();
        assert!(!String::from_utf8(without.bytes).unwrap().contains("启发式问题"));
    }

    #[test]
    fn test_render_html_escapes_model_html() {
        let mut result = partial_result();
        result.set(Section::GrowthStrategy, "增长策略 <script>alert(1)</script>");
        let report = assembler().assemble("Acme", &result);

        let rendered = renderer(ReportFormat::Html, false)
            .render(&report, None)
            .unwrap();
        let html = String::from_utf8(rendered.bytes).unwrap();

        assert_eq!(rendered.filename, "Acme-创业分析报告.html");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Acme-创业分析报告</title>"));
        assert!(html.contains("<h2>需求分析</h2>"));
        assert!(html.contains("<table>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_docx_is_readable_by_extractor() {
        let mut result = partial_result();
        result.set(Section::BusinessModel, "订阅制 & 硬件租赁\n按门店收费");
        let report = assembler().assemble("Acme", &result);

        let rendered = renderer(ReportFormat::Docx, false)
            .render(&report, None)
            .unwrap();
        assert_eq!(rendered.filename, "Acme-创业分析报告.docx");

        let document = DocumentExtractor::new(&Config::default().document)
            .extract_bytes(&rendered.filename, None, &rendered.bytes)
            .unwrap();
        let lines: Vec<_> = document.raw_text.lines().collect();

        assert_eq!(lines[0], "Acme-创业分析报告");
        assert!(lines.contains(&"2026-10-18"));
        assert!(lines.contains(&"终稿"));
        assert!(lines.contains(&"需求分析: demand text"));
        assert!(lines.contains(&"订阅制 & 硬件租赁"));
        assert!(lines.contains(&"按门店收费"));
        for section in Section::ALL {
            assert!(lines.contains(&TargetLanguage::Chinese.section_heading(section)));
        }
    }

    #[test]
    fn test_filename_sanitizes_project_name() {
        let report = assembler().assemble("A/B:C", &AnalysisResult::default());
        let rendered = renderer(ReportFormat::Markdown, false)
            .render(&report, None)
            .unwrap();
        assert_eq!(rendered.filename, "A_B_C-创业分析报告.md");
    }

    #[test]
    fn test_sequence_goes_before_extension() {
        let report = assembler().assemble("Acme", &AnalysisResult::default());
        let rendered = renderer(ReportFormat::Html, false)
            .render(&report, None)
            .unwrap()
            .with_sequence(2);
        assert_eq!(rendered.filename, "Acme-创业分析报告-2.html");
    }
}
