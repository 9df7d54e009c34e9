use anyhow::{Result, anyhow};
use pdf::content::{Content, Op, TextDrawAdjusted};
use pdf::file::FileOptions;
use pdf::object::Resolve;

/// TJ数组中超过该间距（千分之一字号）视为词间空白
const WORD_GAP_THRESHOLD: f32 = 200.0;

/// 逐页提取PDF文本，页之间以换行分隔；无法提取文本的页贡献空字符串
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    // pdf库的错误信息带有源码位置，不直接展示给用户
    let file = FileOptions::cached()
        .load(bytes.to_vec())
        .map_err(|_| anyhow!("无法解析PDF文件结构"))?;

    let mut pages = Vec::new();
    for page_num in 0..file.num_pages() {
        let text = match file.get_page(page_num) {
            Ok(page) => match &page.contents {
                Some(content) => page_text(&file, content).unwrap_or_default(),
                None => String::new(),
            },
            Err(_) => String::new(),
        };
        pages.push(text);
    }

    Ok(pages.join("\n"))
}

fn page_text(resolver: &impl Resolve, content: &Content) -> Result<String> {
    let mut text = String::new();
    let operations = content
        .operations(resolver)
        .map_err(|_| anyhow!("无法解析页面内容流"))?;

    for op in operations {
        match op {
            Op::TextDraw { text: t } => text.push_str(&t.to_string_lossy()),
            Op::TextDrawAdjusted { array } => {
                for item in array {
                    match item {
                        TextDrawAdjusted::Text(t) => text.push_str(&t.to_string_lossy()),
                        TextDrawAdjusted::Spacing(gap) => {
                            if gap.abs() > WORD_GAP_THRESHOLD && !text.ends_with(' ') {
                                text.push(' ');
                            }
                        }
                    }
                }
            }
            Op::TextNewline => text.push('\n'),
            Op::MoveTextPosition { translation } => {
                // 纵向移动即换行
                if translation.y.abs() > f32::EPSILON && !text.ends_with('\n') {
                    text.push('\n');
                }
            }
            _ => {}
        }
    }

    Ok(text
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string())
}
