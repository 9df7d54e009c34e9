use super::RenderError;

/// Markdown报告转为独立的HTML页面，模型输出中的原始HTML会被转义
pub fn render(title: &str, markdown: &str) -> Result<String, RenderError> {
    let body = ::markdown::to_html_with_options(markdown, &::markdown::Options::gfm())
        .map_err(|e| RenderError::Html(e.to_string()))?;

    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    ))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
