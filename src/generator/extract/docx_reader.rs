use anyhow::{Context, Result};
use std::io::{Cursor, Read};

/// WordprocessingML主命名空间
pub const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// 按文档顺序提取每个段落的文本，段落之间以换行分隔
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("不是有效的DOCX压缩包")?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("缺少word/document.xml")?
        .read_to_string(&mut xml)
        .context("无法读取word/document.xml")?;

    let document = roxmltree::Document::parse(&xml).context("document.xml不是有效的XML")?;

    let mut paragraphs = Vec::new();
    collect_paragraphs(document.root(), &mut paragraphs);

    Ok(paragraphs.join("\n"))
}

fn collect_paragraphs(node: roxmltree::Node, paragraphs: &mut Vec<String>) {
    for child in node.children() {
        if child.has_tag_name((WORD_NS, "p")) {
            push_paragraph(child, paragraphs);
        } else {
            collect_paragraphs(child, paragraphs);
        }
    }
}

/// 段落先占位，其中嵌套的段落（如文本框）排在它之后单独输出
fn push_paragraph(paragraph: roxmltree::Node, paragraphs: &mut Vec<String>) {
    let index = paragraphs.len();
    paragraphs.push(String::new());

    let mut text = String::new();
    paragraph_text(paragraph, &mut text, paragraphs);
    paragraphs[index] = text;
}

fn paragraph_text(node: roxmltree::Node, text: &mut String, paragraphs: &mut Vec<String>) {
    for child in node.children() {
        if child.has_tag_name((WORD_NS, "p")) {
            push_paragraph(child, paragraphs);
        } else if child.has_tag_name((WORD_NS, "t")) {
            text.push_str(child.text().unwrap_or_default());
        } else if child.has_tag_name((WORD_NS, "tab")) {
            text.push('\t');
        } else if child.has_tag_name((WORD_NS, "br")) || child.has_tag_name((WORD_NS, "cr")) {
            text.push('\n');
        } else {
            paragraph_text(child, text, paragraphs);
        }
    }
}
