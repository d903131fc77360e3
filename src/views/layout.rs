//! Page shell shared by server-rendered pages

use super::status::badge_stylesheet;

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Automatic reload of a page that is still waiting on a query
#[derive(Debug, Clone, Copy)]
pub struct Refresh<'a> {
    pub after_seconds: u32,
    /// Path the browser loads, never carrying `?refresh=true`
    pub target: &'a str,
}

impl Refresh<'_> {
    fn meta_tag(&self) -> String {
        format!(
            r#"<meta http-equiv="refresh" content="{}; url={}">"#,
            self.after_seconds,
            escape_html(self.target)
        )
    }
}

/// Wrap `body` in a full HTML document.
///
/// `refresh` adds a meta refresh, used while a query is still loading.
pub fn page(title: &str, refresh: Option<Refresh<'_>>, body: &str) -> String {
    let refresh = refresh.map(|r| r.meta_tag()).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    {refresh}
    <title>{title}</title>
    <style>
{css}
{badges}
    </style>
</head>
<body>
<main class="page">
{body}
</main>
</body>
</html>"#,
        refresh = refresh,
        title = escape_html(title),
        css = CSS,
        badges = badge_stylesheet(),
        body = body,
    )
}

/// Spinner shown while a query is in flight
pub fn spinner(container_class: &str) -> String {
    format!(
        r#"<div class="{}" role="status" aria-label="Loading"><div class="spinner"></div></div>"#,
        container_class
    )
}

const CSS: &str = r#"
* { box-sizing: border-box; }
body { font-family: system-ui, -apple-system, sans-serif; margin: 0; color: #0f172a; background: #f8fafc; }
.page { max-width: 1100px; margin: 0 auto; padding: 24px; display: flex; flex-direction: column; gap: 24px; }
.header { display: flex; align-items: center; gap: 16px; }
.header h1 { font-size: 1.875rem; margin: 0; }
.back { text-decoration: none; color: inherit; font-size: 1.25rem; padding: 6px 10px; border-radius: 6px; }
.back:hover { background: #e2e8f0; }
.muted { color: #64748b; margin: 0; }
.grid { display: grid; gap: 24px; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); }
.card { background: #fff; border: 1px solid #e2e8f0; border-radius: 8px; padding: 24px; }
.card h2 { font-size: 1.25rem; margin: 0 0 16px; }
.field { margin-bottom: 16px; }
.field .label { font-size: 0.875rem; color: #64748b; margin: 0; }
.field .value { font-weight: 500; margin: 2px 0 0; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 10px 8px; border-bottom: 1px solid #e2e8f0; }
th { font-size: 0.875rem; color: #64748b; font-weight: 500; }
.text-right { text-align: right; }
.amount { font-weight: 500; }
.badge { display: inline-block; padding: 2px 10px; border: 1px solid; border-radius: 9999px; font-size: 0.75rem; font-weight: 600; }
.action { text-decoration: none; color: inherit; padding: 6px 10px; border-radius: 6px; font-size: 0.875rem; }
.action:hover { background: #e2e8f0; }
.empty { text-align: center; padding: 32px 0; color: #64748b; }
.loading-page { display: flex; justify-content: center; align-items: center; min-height: 400px; }
.loading-card { display: flex; justify-content: center; padding: 32px 0; }
.spinner { width: 32px; height: 32px; border-radius: 9999px; border-bottom: 2px solid #0f172a; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("Jane Doe"), "Jane Doe");
    }

    #[test]
    fn test_page_refresh_hint() {
        let target = "/borrowers/5f1c7a52-8c4e-4d5b-9a34-0f2d1e3c4b5a";
        let html = page(
            "Loading",
            Some(Refresh {
                after_seconds: 2,
                target,
            }),
            "<p>hi</p>",
        );
        assert!(html.contains(
            r#"<meta http-equiv="refresh" content="2; url=/borrowers/5f1c7a52-8c4e-4d5b-9a34-0f2d1e3c4b5a">"#
        ));
        assert!(html.contains("<p>hi</p>"));

        let html = page("Ready", None, "");
        assert!(!html.contains("http-equiv"));
    }
}
