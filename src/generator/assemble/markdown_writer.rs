use crate::generator::coaching::CoachingSession;
use crate::i18n::TargetLanguage;
use crate::types::report::Report;

/// 渲染Markdown报告：标题、元数据表、五个章节，可选启发式问题附录
pub fn render(
    report: &Report,
    language: TargetLanguage,
    coaching: Option<&CoachingSession>,
) -> String {
    let mut markdown = format!("# {}\n\n", report.title);

    markdown.push_str(&format!(
        "| {} | {} |\n| --- | --- |\n",
        language.report_label("field"),
        language.report_label("value")
    ));
    let metadata = [
        ("project_name", escape_cell(&report.project_name)),
        (
            "consultation_date",
            report.consultation_date.format("%Y-%m-%d").to_string(),
        ),
        ("version", report.version.clone()),
        ("status", language.report_label("status_final")),
    ];
    for (label, value) in metadata {
        markdown.push_str(&format!("| {} | {} |\n", language.report_label(label), value));
    }

    for section in &report.sections {
        markdown.push_str(&format!("\n## {}\n\n", section.heading));
        let body = section.body.trim();
        if !body.is_empty() {
            markdown.push_str(body);
            markdown.push('\n');
        }
    }

    if let Some(session) = coaching {
        markdown.push_str(&format!(
            "\n## {}\n",
            language.report_label("coaching_questions")
        ));
        for (area, questions) in session.question_sequence() {
            markdown.push_str(&format!("\n### {}\n\n", area));
            for question in questions {
                markdown.push_str(&format!("- {}\n", question));
            }
        }
    }

    markdown
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
