//! Document layout around rendered widget nodes.

use std::fmt::Write;

use super::helpers::button;
use super::RenderedNode;
use crate::constants::PAGE_BUFFER_CAPACITY;
use crate::models::SiteSettings;
use crate::utils::{escape_html, non_blank};

/// Full HTML document: site header and navigation, optional article body,
/// the widget nodes in order, and the announcement pop-up when configured.
pub fn render_page(
    title: &str,
    body: Option<&str>,
    nodes: &[RenderedNode],
    settings: &SiteSettings,
) -> String {
    let mut out = String::with_capacity(PAGE_BUFFER_CAPACITY);
    let page_title = match non_blank(Some(title)) {
        Some(t) if t != settings.site_name => format!("{} | {}", t, settings.site_name),
        _ => settings.site_name.clone(),
    };

    let _ = write!(
        out,
        r#"<!DOCTYPE html>
<html lang="{}">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<link rel="stylesheet" href="/assets/site.css">
</head>
<body>
"#,
        escape_html(&rust_i18n::locale()),
        escape_html(&page_title)
    );

    out.push_str(r#"<header class="site-header"><a class="site-name" href="/">"#);
    out.push_str(&escape_html(&settings.site_name));
    out.push_str("</a>");
    if let Some(tagline) = non_blank(settings.tagline.as_deref()) {
        let _ = write!(out, r#"<p class="tagline">{}</p>"#, escape_html(tagline));
    }
    if !settings.nav.is_empty() {
        let _ = write!(
            out,
            r#"<nav aria-label="{}"><ul>"#,
            escape_html(&t!("layout.navigation"))
        );
        for link in &settings.nav {
            let _ = write!(
                out,
                r#"<li><a href="{}">{}</a></li>"#,
                escape_html(&link.url),
                escape_html(&link.label)
            );
        }
        out.push_str("</ul></nav>");
    }
    out.push_str("</header>\n<main>\n");

    if let Some(html) = non_blank(body) {
        let _ = writeln!(out, r#"<article class="page-body">{}</article>"#, html);
    }
    for node in nodes {
        out.push_str(&node.html);
        out.push('\n');
    }
    out.push_str("</main>\n");

    if let Some(popup) = &settings.popup {
        let _ = write!(
            out,
            r#"<dialog class="announcement" open><h2>{}</h2><p>{}</p>"#,
            escape_html(&popup.title),
            escape_html(&popup.body)
        );
        if let (Some(label), Some(url)) = (
            non_blank(popup.cta_label.as_deref()),
            non_blank(popup.cta_url.as_deref()),
        ) {
            out.push_str(&button(label, url));
        }
        let _ = write!(
            out,
            r#"<form method="dialog"><button>{}</button></form></dialog>"#,
            escape_html(&t!("layout.close"))
        );
        out.push('\n');
    }

    let _ = write!(
        out,
        "<footer class=\"site-footer\">{}</footer>\n</body>\n</html>\n",
        escape_html(&t!("layout.footer", site = settings.site_name.as_str()))
    );
    out
}
