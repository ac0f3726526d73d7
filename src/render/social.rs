//! Testimonial and Instagram widgets.

use std::fmt::Write;

use super::helpers::{grid_style, image, section_header};
use crate::constants::MAX_RATING;
use crate::models::{
    InstagramPost, InstagramWidgetConfig, SiteSettings, Testimonial, TestimonialLayout,
    TestimonialsConfig, Widget,
};
use crate::utils::{escape_html, non_blank, rating_stars, truncate_str};

/// Columns an Instagram grid may span.
const MAX_INSTAGRAM_COLUMNS: u8 = 6;
/// Captions become alt text; long ones are cut.
const CAPTION_ALT_CHARS: usize = 100;

pub fn testimonials(
    widget: &Widget,
    cfg: &TestimonialsConfig,
    items: &[Testimonial],
) -> Option<String> {
    let items: Vec<&Testimonial> = items.iter().take(cfg.limit).collect();
    if items.is_empty() {
        return None;
    }

    let layout = match cfg.layout {
        TestimonialLayout::Carousel => "carousel",
        TestimonialLayout::Grid => "grid",
    };

    let mut out = section_header(widget, None);
    let _ = write!(out, r#"<div class="testimonials testimonials-{}">"#, layout);
    for t in items {
        out.push_str(r#"<figure class="testimonial">"#);
        if cfg.show_ratings {
            if let Some(rating) = t.rating {
                let _ = write!(
                    out,
                    r#"<span class="stars">{}</span>"#,
                    rating_stars(rating, MAX_RATING)
                );
            }
        }
        let _ = write!(
            out,
            "<blockquote>{}</blockquote><figcaption>{}",
            escape_html(&t.body),
            escape_html(&t.author)
        );
        if let Some(role) = non_blank(t.role.as_deref()) {
            let _ = write!(out, r#", <span class="role">{}</span>"#, escape_html(role));
        }
        out.push_str("</figcaption></figure>");
    }
    out.push_str("</div>");
    Some(out)
}

pub fn instagram(
    widget: &Widget,
    cfg: &InstagramWidgetConfig,
    posts: &[InstagramPost],
    settings: &SiteSettings,
) -> Option<String> {
    let posts: Vec<&InstagramPost> = posts.iter().take(cfg.limit).collect();
    if posts.is_empty() {
        return None;
    }

    let handle = non_blank(cfg.handle.as_deref())
        .or(non_blank(settings.instagram_handle.as_deref()))
        .map(|h| h.trim_start_matches('@'));

    let mut out = section_header(widget, None);
    if let Some(h) = handle {
        let _ = write!(
            out,
            r#"<p class="instagram-handle"><a href="https://www.instagram.com/{}/" rel="noopener">@{}</a></p>"#,
            escape_html(h),
            escape_html(h)
        );
    }
    let _ = write!(
        out,
        r#"<div class="instagram-grid" {}>"#,
        grid_style(cfg.columns, MAX_INSTAGRAM_COLUMNS)
    );
    for post in posts {
        let alt = post
            .caption
            .as_deref()
            .map(|c| truncate_str(c, CAPTION_ALT_CHARS))
            .unwrap_or_default();
        let _ = write!(
            out,
            r#"<a class="instagram-tile" href="{}" rel="noopener">{}</a>"#,
            escape_html(&post.permalink),
            image(&post.media_url, &alt)
        );
    }
    out.push_str("</div>");
    Some(out)
}
