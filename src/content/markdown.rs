use pulldown_cmark::{Options, Parser, html};

/// 将 Markdown 渲染为可直接返回给客户端的安全 HTML
///
/// 先用 pulldown-cmark 渲染（启用表格、删除线、脚注），
/// 再经 ammonia 清洗，去掉 script 标签、内联事件、`javascript:` 链接
/// 和 style 注入。渲染器对畸形输入不会失败，最差退化为转义文本。
pub fn render_sanitized(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);

    let mut raw_html = String::new();
    html::push_html(&mut raw_html, parser);

    ammonia::clean(&raw_html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_heading() {
        let html = render_sanitized("# Hi");
        assert!(html.contains("<h1>Hi</h1>"), "got {:?}", html);
    }

    #[test]
    fn test_strips_script_tag() {
        let html = render_sanitized("hello\n\n<script>alert(1)</script>");
        assert!(!html.contains("<script"), "got {:?}", html);
        assert!(!html.contains("alert(1)"), "got {:?}", html);
        assert!(html.contains("hello"));
    }

    #[test]
    fn test_strips_event_handler() {
        let html = render_sanitized(r#"<img src="x.png" onerror="alert(1)">"#);
        assert!(!html.contains("onerror"), "got {:?}", html);
    }

    #[test]
    fn test_strips_javascript_uri() {
        let html = render_sanitized("[click](javascript:alert(1))");
        assert!(!html.contains("javascript:"), "got {:?}", html);
    }

    #[test]
    fn test_malformed_degrades() {
        // 未闭合的标签不会导致失败
        let html = render_sanitized("<div><b>oops");
        assert!(html.contains("oops"));
    }
}
