use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

use super::RenderError;
use crate::generator::coaching::CoachingSession;
use crate::i18n::TargetLanguage;
use crate::types::report::Report;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// 字号以半磅为单位
const TITLE_SIZE: u32 = 36;
const HEADING_SIZE: u32 = 28;
const SUBHEADING_SIZE: u32 = 24;

/// 生成最小化的WordprocessingML文档包
pub fn render(
    report: &Report,
    language: TargetLanguage,
    coaching: Option<&CoachingSession>,
) -> Result<Vec<u8>, RenderError> {
    let document_xml = document_xml(report, language, coaching);

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    writer.start_file("[Content_Types].xml", options)?;
    writer.write_all(CONTENT_TYPES.as_bytes())?;
    writer.start_file("_rels/.rels", options)?;
    writer.write_all(PACKAGE_RELS.as_bytes())?;
    writer.start_file("word/document.xml", options)?;
    writer.write_all(document_xml.as_bytes())?;

    Ok(writer.finish()?.into_inner())
}

fn document_xml(
    report: &Report,
    language: TargetLanguage,
    coaching: Option<&CoachingSession>,
) -> String {
    let mut body = String::new();

    body.push_str(&styled_paragraph(&report.title, TITLE_SIZE, true));

    let rows = [
        (
            language.report_label("project_name"),
            report.project_name.clone(),
        ),
        (
            language.report_label("consultation_date"),
            report.consultation_date.format("%Y-%m-%d").to_string(),
        ),
        (language.report_label("version"), report.version.clone()),
        (
            language.report_label("status"),
            language.report_label("status_final"),
        ),
    ];
    body.push_str(&metadata_table(&rows));

    for section in &report.sections {
        body.push_str(&styled_paragraph(&section.heading, HEADING_SIZE, true));
        for line in section.body.trim().lines() {
            body.push_str(&paragraph(line));
        }
    }

    if let Some(session) = coaching {
        body.push_str(&styled_paragraph(
            &language.report_label("coaching_questions"),
            HEADING_SIZE,
            true,
        ));
        for (area, questions) in session.question_sequence() {
            body.push_str(&styled_paragraph(area, SUBHEADING_SIZE, true));
            for question in questions {
                body.push_str(&paragraph(&format!("• {}", question)));
            }
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}<w:sectPr/></w:body></w:document>",
        body
    )
}

fn paragraph(text: &str) -> String {
    format!(
        "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        escape_xml(text)
    )
}

fn styled_paragraph(text: &str, size: u32, bold: bool) -> String {
    let bold = if bold { "<w:b/>" } else { "" };
    format!(
        "<w:p><w:r><w:rPr>{}<w:sz w:val=\"{}\"/></w:rPr><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        bold,
        size,
        escape_xml(text)
    )
}

fn metadata_table(rows: &[(String, String)]) -> String {
    let border = "w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"";
    let mut table = format!(
        "<w:tbl><w:tblPr><w:tblW w:w=\"0\" w:type=\"auto\"/><w:tblBorders><w:top {b}/><w:left {b}/><w:bottom {b}/><w:right {b}/><w:insideH {b}/><w:insideV {b}/></w:tblBorders></w:tblPr><w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid>",
        b = border
    );
    for (label, value) in rows {
        table.push_str(&format!(
            "<w:tr><w:tc>{}</w:tc><w:tc>{}</w:tc></w:tr>",
            styled_paragraph(label, SUBHEADING_SIZE, true),
            paragraph(value)
        ));
    }
    table.push_str("</w:tbl>");
    table
}

/// 转义XML特殊字符，并去掉XML 1.0不允许出现的控制字符
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' => escaped.push('\t'),
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    escaped
}
