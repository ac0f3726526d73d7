//! Hero carousel, image banner and video widgets.

use std::fmt::Write;

use super::helpers::{button, image, section_header};
use crate::constants::MIN_CAROUSEL_INTERVAL_MS;
use crate::models::{HeroCarouselConfig, HeroSlide, ImageBannerConfig, VideoConfig, Widget};
use crate::utils::{escape_html, non_blank};

pub fn hero_carousel(cfg: &HeroCarouselConfig, slides: &[HeroSlide]) -> Option<String> {
    let max = cfg.max_slides.unwrap_or(usize::MAX);
    let slides: Vec<&HeroSlide> = slides.iter().take(max).collect();
    if slides.is_empty() {
        return None;
    }

    let mut out = format!(
        r#"<div class="hero-carousel" data-autoplay="{}" data-interval="{}">"#,
        cfg.autoplay,
        cfg.interval_ms.max(MIN_CAROUSEL_INTERVAL_MS)
    );
    for (i, slide) in slides.iter().enumerate() {
        let active = if i == 0 { " is-active" } else { "" };
        let _ = write!(
            out,
            r#"<div class="hero-slide{}">{}<div class="hero-copy"><h1>{}</h1>"#,
            active,
            image(&slide.image_url, &slide.heading),
            escape_html(&slide.heading)
        );
        if let Some(sub) = non_blank(slide.subheading.as_deref()) {
            let _ = write!(out, "<p>{}</p>", escape_html(sub));
        }
        if let (Some(label), Some(url)) = (
            non_blank(slide.cta_label.as_deref()),
            non_blank(slide.cta_url.as_deref()),
        ) {
            out.push_str(&button(label, url));
        }
        out.push_str("</div></div>");
    }
    if cfg.show_arrows && slides.len() > 1 {
        out.push_str(
            r#"<button class="hero-prev" aria-label="Previous">‹</button><button class="hero-next" aria-label="Next">›</button>"#,
        );
    }
    out.push_str("</div>");
    Some(out)
}

pub fn image_banner(widget: &Widget, cfg: &ImageBannerConfig) -> Option<String> {
    let url = non_blank(Some(&cfg.image_url))?;
    let alt = non_blank(Some(&cfg.alt))
        .or(non_blank(widget.title.as_deref()))
        .unwrap_or("");

    let mut inner = image(url, alt);
    if let Some(text) = non_blank(cfg.overlay_text.as_deref()) {
        let _ = write!(inner, r#"<span class="banner-overlay">{}</span>"#, escape_html(text));
    }
    Some(match non_blank(cfg.link_url.as_deref()) {
        Some(link) => format!(
            r#"<a class="image-banner" href="{}">{}</a>"#,
            escape_html(link),
            inner
        ),
        None => format!(r#"<div class="image-banner">{}</div>"#, inner),
    })
}

pub fn video(widget: &Widget, cfg: &VideoConfig) -> Option<String> {
    let url = non_blank(Some(&cfg.url))?;
    let mut out = section_header(widget, None);

    if let Some(id) = youtube_id(url) {
        let _ = write!(
            out,
            r#"<div class="video-embed"><iframe src="https://www.youtube.com/embed/{}?autoplay={}&amp;mute={}&amp;loop={}" allow="autoplay; encrypted-media" allowfullscreen loading="lazy"></iframe></div>"#,
            escape_html(id),
            u8::from(cfg.autoplay),
            u8::from(cfg.muted),
            u8::from(cfg.looped)
        );
        return Some(out);
    }

    let mut attrs = String::from(" controls playsinline");
    if cfg.autoplay {
        attrs.push_str(" autoplay");
    }
    if cfg.muted {
        attrs.push_str(" muted");
    }
    if cfg.looped {
        attrs.push_str(" loop");
    }
    let _ = write!(
        out,
        r#"<video class="video" src="{}"{}></video>"#,
        escape_html(url),
        attrs
    );
    Some(out)
}

/// Video id from a `youtube.com/watch?v=` or `youtu.be/` link.
fn youtube_id(url: &str) -> Option<&str> {
    let rest = if let Some((_, rest)) = url.split_once("youtube.com/watch?v=") {
        rest
    } else if let Some((_, rest)) = url.split_once("youtu.be/") {
        rest
    } else {
        return None;
    };
    let id = rest.split(&['&', '?', '#'][..]).next().unwrap_or("");
    (!id.is_empty()).then_some(id)
}
