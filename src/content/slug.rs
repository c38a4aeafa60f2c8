/// 将标题转换为 URL 安全的 slug
///
/// 规则：
///
/// - ASCII 字母数字保留并转为小写
/// - 空白、`-`、`_` 折叠为单个连字符
/// - 其余字符直接丢弃
/// - 首尾不出现连字符
///
/// 结果只包含 `[a-z0-9-]`，且幂等：对 slug 再次调用返回自身。
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_hyphen = false;
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_hyphen = true;
        }
    }

    slug
}
