//! Text-first widgets: text, quote, marquee, FAQs, blog teasers, spacer.

use std::fmt::Write;

use super::helpers::{image, rich_text, section_header, titled_header};
use crate::constants::MAX_SPACER_PX;
use crate::models::{
    BlogPostSummary, BlogPostsConfig, FaqGroup, FaqsConfig, MarqueeConfig, MarqueeDirection,
    QuoteConfig, SpacerConfig, TextConfig, Widget,
};
use crate::utils::{escape_html, non_blank};

/// Text block; absent when it has neither title nor content.
pub fn text(widget: &Widget, cfg: &TextConfig) -> Option<String> {
    let has_title = non_blank(widget.title.as_deref()).is_some();
    let body = rich_text(widget.content.as_deref());
    if !has_title && body.is_empty() {
        return None;
    }
    Some(format!(
        r#"<div class="text-block align-{}">{}{}</div>"#,
        cfg.align.as_str(),
        section_header(widget, None),
        body
    ))
}

/// Scrolling banner; blank text means no marquee at all.
pub fn marquee(cfg: &MarqueeConfig) -> Option<String> {
    let text = non_blank(Some(&cfg.text))?;
    let direction = match cfg.direction {
        MarqueeDirection::Left => "left",
        MarqueeDirection::Right => "right",
    };
    // Content is doubled so the loop is seamless.
    Some(format!(
        r#"<div class="marquee marquee-{dir}" style="--marquee-duration:{secs}s"><div class="marquee-track"><span>{text}</span><span aria-hidden="true">{text}</span></div></div>"#,
        dir = direction,
        secs = cfg.speed.duration_secs(),
        text = escape_html(text)
    ))
}

pub fn quote(widget: &Widget, cfg: &QuoteConfig) -> Option<String> {
    let text = non_blank(Some(&cfg.text)).or(non_blank(widget.content.as_deref()))?;
    let mut out = format!(
        r#"<figure class="quote"><blockquote>{}</blockquote>"#,
        escape_html(text)
    );
    if let Some(author) = non_blank(cfg.author.as_deref()) {
        let _ = write!(out, "<figcaption>{}</figcaption>", escape_html(author));
    }
    out.push_str("</figure>");
    Some(out)
}

pub fn faqs(widget: &Widget, cfg: &FaqsConfig, groups: &[FaqGroup]) -> Option<String> {
    let filter = non_blank(cfg.category.as_deref());
    let groups: Vec<&FaqGroup> = groups
        .iter()
        .filter(|g| !g.items.is_empty())
        .filter(|g| filter.map_or(true, |c| g.category.eq_ignore_ascii_case(c)))
        .collect();
    if groups.is_empty() {
        return None;
    }

    // Category headings only help when there is more than one group.
    let show_categories = groups.len() > 1;
    let mut first = true;
    let mut out = section_header(widget, None);
    out.push_str(r#"<div class="faqs">"#);
    for group in groups {
        out.push_str(r#"<div class="faq-group">"#);
        if show_categories {
            let _ = write!(out, "<h3>{}</h3>", escape_html(&group.category));
        }
        for item in &group.items {
            let open = if first && cfg.expand_first { " open" } else { "" };
            first = false;
            let _ = write!(
                out,
                "<details{}><summary>{}</summary><p>{}</p></details>",
                open,
                escape_html(&item.question),
                escape_html(&item.answer)
            );
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
    Some(out)
}

pub fn blog_posts(
    widget: &Widget,
    cfg: &BlogPostsConfig,
    posts: &[BlogPostSummary],
) -> Option<String> {
    let posts: Vec<&BlogPostSummary> = posts.iter().take(cfg.limit).collect();
    if posts.is_empty() {
        return None;
    }

    let mut out = match non_blank(cfg.title.as_deref()) {
        Some(title) => titled_header(widget, title),
        None => section_header(widget, Some(&*t!("widgets.blog_posts.title"))),
    };
    out.push_str(r#"<div class="blog-posts">"#);
    for post in posts {
        let _ = write!(
            out,
            r#"<article class="post-card"><a href="/blog/{}">"#,
            escape_html(&post.slug)
        );
        if let Some(cover) = non_blank(post.cover_url.as_deref()) {
            out.push_str(&image(cover, &post.title));
        }
        let _ = write!(out, "<h3>{}</h3>", escape_html(&post.title));
        if let Some(date) = post.published_at {
            let _ = write!(
                out,
                r#"<time datetime="{}">{}</time>"#,
                date.to_rfc3339(),
                date.format("%b %d, %Y")
            );
        }
        if cfg.show_excerpt {
            if let Some(excerpt) = non_blank(post.excerpt.as_deref()) {
                let _ = write!(out, "<p>{}</p>", escape_html(excerpt));
            }
        }
        out.push_str("</a></article>");
    }
    out.push_str("</div>");
    Some(out)
}

pub fn spacer(cfg: &SpacerConfig) -> String {
    format!(
        r#"<div class="spacer" style="height:{}px" aria-hidden="true"></div>"#,
        cfg.height.min(MAX_SPACER_PX)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FaqItem, MarqueeSpeed, TextAlign};
    use chrono::{TimeZone, Utc};

    fn group(category: &str, questions: &[&str]) -> FaqGroup {
        FaqGroup {
            category: category.to_string(),
            items: questions
                .iter()
                .enumerate()
                .map(|(i, q)| FaqItem {
                    id: i as i64,
                    category: category.to_string(),
                    question: q.to_string(),
                    answer: format!("answer to {}", q),
                    position: i as i64,
                })
                .collect(),
        }
    }

    fn post(slug: &str) -> BlogPostSummary {
        BlogPostSummary {
            slug: slug.to_string(),
            title: format!("Post {}", slug),
            excerpt: Some("A short teaser".to_string()),
            cover_url: None,
            published_at: Some(Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap()),
        }
    }

    #[test]
    fn text_needs_title_or_content() {
        let mut w = Widget::new("t", "text");
        assert!(text(&w, &TextConfig::default()).is_none());

        w.content = Some("<p>Made by hand</p>".to_string());
        let cfg = TextConfig {
            align: TextAlign::Center,
        };
        let html = text(&w, &cfg).unwrap();
        assert!(html.contains("align-center"));
        assert!(html.contains("<p>Made by hand</p>"));
    }

    #[test]
    fn marquee_blank_text_is_absent() {
        assert!(marquee(&MarqueeConfig::default()).is_none());
        let cfg = MarqueeConfig {
            text: "   ".to_string(),
            ..MarqueeConfig::default()
        };
        assert!(marquee(&cfg).is_none());
    }

    #[test]
    fn marquee_speed_and_direction() {
        let cfg = MarqueeConfig {
            text: "Free shipping & returns".to_string(),
            speed: MarqueeSpeed::Fast,
            direction: MarqueeDirection::Right,
        };
        let html = marquee(&cfg).unwrap();
        assert!(html.contains("marquee-right"));
        assert!(html.contains("--marquee-duration:12s"));
        assert_eq!(html.matches("Free shipping &amp; returns").count(), 2);
    }

    #[test]
    fn quote_falls_back_to_content() {
        let mut w = Widget::new("q", "quote");
        assert!(quote(&w, &QuoteConfig::default()).is_none());
        w.content = Some("Less, but better".to_string());
        let html = quote(&w, &QuoteConfig::default()).unwrap();
        assert!(html.contains("Less, but better"));

        let cfg = QuoteConfig {
            text: "Form follows function".to_string(),
            author: Some("Sullivan".to_string()),
        };
        let html = quote(&w, &cfg).unwrap();
        assert!(html.contains("Form follows function"));
        assert!(html.contains("<figcaption>Sullivan</figcaption>"));
    }

    #[test]
    fn faqs_filter_category_and_expand_first() {
        let w = Widget::new("f", "faqs");
        let data = [group("Shipping", &["How long?", "Where?"]), group("Care", &["Dishwasher?"])];

        let html = faqs(&w, &FaqsConfig::default(), &data).unwrap();
        assert!(html.contains("<h3>Shipping</h3>"));
        assert!(html.contains("<h3>Care</h3>"));
        assert!(!html.contains(" open"));

        let cfg = FaqsConfig {
            category: Some("care".to_string()),
            expand_first: true,
        };
        let html = faqs(&w, &cfg, &data).unwrap();
        assert!(!html.contains("How long?"));
        assert!(html.contains("<details open><summary>Dishwasher?</summary>"));
        assert!(!html.contains("<h3>"));
    }

    #[test]
    fn faqs_without_entries_are_absent() {
        let w = Widget::new("f", "faqs");
        assert!(faqs(&w, &FaqsConfig::default(), &[]).is_none());
        assert!(faqs(&w, &FaqsConfig::default(), &[group("Empty", &[])]).is_none());
    }

    #[test]
    fn blog_posts_default_title_and_excerpt_toggle() {
        let w = Widget::new("b", "blog_posts");
        let data = [post("a"), post("b"), post("c"), post("d")];
        let html = blog_posts(&w, &BlogPostsConfig::default(), &data).unwrap();
        assert!(html.contains("<h2>From the Blog</h2>"));
        assert_eq!(html.matches("post-card").count(), 3);
        assert!(html.contains("Jun 02, 2024"));
        assert!(html.contains("A short teaser"));

        let cfg = BlogPostsConfig {
            show_excerpt: false,
            ..BlogPostsConfig::default()
        };
        assert!(!blog_posts(&w, &cfg, &data).unwrap().contains("A short teaser"));
    }

    #[test]
    fn spacer_height_is_clamped() {
        assert!(spacer(&SpacerConfig::default()).contains("height:48px"));
        assert!(spacer(&SpacerConfig { height: 9000 }).contains("height:400px"));
    }
}
