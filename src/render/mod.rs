//! Widget renderer: a pure function from an ordered widget list and the
//! resolved data bag to rendered HTML fragments.
//!
//! - `commerce`: product grid, featured product, reviews
//! - `social`: testimonials, Instagram
//! - `content`: text, quote, marquee, FAQs, blog teasers, spacer
//! - `media`: hero carousel, image banner, video
//! - `marketing`: call to action, newsletter
//! - `page`: full document layout around rendered nodes
//! - `helpers`: shared markup
//!
//! Visibility is checked before a widget's config is even parsed, so hidden
//! widgets never reach a template.

mod commerce;
mod content;
pub mod helpers;
mod marketing;
mod media;
mod page;
mod social;

pub use page::render_page;

use serde::Serialize;

use crate::models::{Device, Widget, WidgetKind};
use crate::resolver::ResolvedWidgetData;
use crate::utils::escape_html;

/// One widget's rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNode {
    pub widget_id: String,
    pub widget_type: String,
    pub html: String,
}

/// Why a widget produced no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Hidden,
    Draft,
    Device,
    UnknownType,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub widget_id: String,
    pub widget_type: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderOutput {
    pub nodes: Vec<RenderedNode>,
    pub skipped: Vec<Skipped>,
}

/// Request-level render options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Viewport, when the request told us. Unknown ⇒ device flags become
    /// CSS classes instead of filtering.
    pub device: Option<Device>,
    /// Preview renders draft widgets.
    pub preview: bool,
}

/// Render the live, device-agnostic view of a widget list.
pub fn render(widgets: &[Widget], data: &ResolvedWidgetData) -> Vec<RenderedNode> {
    render_with(widgets, data, &RenderContext::default()).nodes
}

/// Render with explicit context, reporting what was skipped and why.
pub fn render_with(
    widgets: &[Widget],
    data: &ResolvedWidgetData,
    ctx: &RenderContext,
) -> RenderOutput {
    let mut out = RenderOutput::default();
    for widget in widgets {
        match render_widget(widget, data, ctx) {
            Ok(node) => out.nodes.push(node),
            Err(reason) => out.skipped.push(Skipped {
                widget_id: widget.id.clone(),
                widget_type: widget.widget_type.clone(),
                reason,
            }),
        }
    }
    out
}

fn render_widget(
    widget: &Widget,
    data: &ResolvedWidgetData,
    ctx: &RenderContext,
) -> Result<RenderedNode, SkipReason> {
    if !widget.is_visible {
        return Err(SkipReason::Hidden);
    }
    if widget.is_draft && !ctx.preview {
        return Err(SkipReason::Draft);
    }
    if let Some(device) = ctx.device {
        if !widget.is_shown_on(device) {
            return Err(SkipReason::Device);
        }
    }

    let kind = WidgetKind::parse(&widget.widget_type, &widget.config);
    let body = match &kind {
        WidgetKind::HeroCarousel(cfg) => media::hero_carousel(cfg, &data.hero_slides),
        WidgetKind::ProductGrid(cfg) => {
            commerce::product_grid(widget, cfg, &data.products, &data.settings)
        }
        WidgetKind::FeaturedProduct(cfg) => {
            commerce::featured_product(widget, cfg, &data.products, &data.settings)
        }
        WidgetKind::Testimonials(cfg) => social::testimonials(widget, cfg, &data.testimonials),
        WidgetKind::Reviews(cfg) => commerce::reviews(widget, cfg, &data.reviews),
        WidgetKind::Faqs(cfg) => content::faqs(widget, cfg, &data.faqs),
        WidgetKind::Instagram(cfg) => {
            social::instagram(widget, cfg, &data.instagram_posts, &data.settings)
        }
        WidgetKind::BlogPosts(cfg) => content::blog_posts(widget, cfg, &data.blog_posts),
        WidgetKind::Text(cfg) => content::text(widget, cfg),
        WidgetKind::Marquee(cfg) => content::marquee(cfg),
        WidgetKind::Quote(cfg) => content::quote(widget, cfg),
        WidgetKind::ImageBanner(cfg) => media::image_banner(widget, cfg),
        WidgetKind::Video(cfg) => media::video(widget, cfg),
        WidgetKind::CallToAction(cfg) => Some(marketing::call_to_action(widget, cfg)),
        WidgetKind::Newsletter(cfg) => Some(marketing::newsletter(widget, cfg)),
        WidgetKind::Spacer(cfg) => Some(content::spacer(cfg)),
        WidgetKind::Unknown(name) => {
            tracing::warn!(widget_id = %widget.id, widget_type = %name, "unknown widget type, skipping");
            return Err(SkipReason::UnknownType);
        }
    };
    let body = body.ok_or(SkipReason::Empty)?;

    Ok(RenderedNode {
        widget_id: widget.id.clone(),
        widget_type: kind.type_name().to_string(),
        html: wrap(widget, ctx, &body),
    })
}

/// Outer `<section>` carrying the widget's identity and visibility classes.
fn wrap(widget: &Widget, ctx: &RenderContext, body: &str) -> String {
    let mut classes = format!("widget widget-{}", widget.widget_type.replace('_', "-"));
    if ctx.device.is_none() {
        if !widget.show_on_desktop {
            classes.push_str(" hide-desktop");
        }
        if !widget.show_on_mobile {
            classes.push_str(" hide-mobile");
        }
    }
    if widget.is_draft {
        classes.push_str(" is-draft");
    }
    format!(
        r#"<section class="{}" data-widget-id="{}">{}</section>"#,
        classes,
        escape_html(&widget.id),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        parse_widget_list, FaqGroup, FaqItem, HeroSlide, Product, Testimonial,
    };
    use crate::registry;
    use serde_json::json;

    fn full_data() -> ResolvedWidgetData {
        ResolvedWidgetData {
            products: vec![Product {
                id: 1,
                slug: "mug".to_string(),
                name: "Mug".to_string(),
                description: String::new(),
                price_cents: 2400,
                compare_at_cents: None,
                image_url: None,
                category: None,
                is_active: true,
            }],
            testimonials: vec![Testimonial {
                id: 1,
                author: "Ana".to_string(),
                role: None,
                body: "Love it".to_string(),
                rating: Some(5),
                is_active: true,
                position: 0,
            }],
            faqs: vec![FaqGroup {
                category: "General".to_string(),
                items: vec![FaqItem {
                    id: 1,
                    category: "General".to_string(),
                    question: "Q".to_string(),
                    answer: "A".to_string(),
                    position: 0,
                }],
            }],
            hero_slides: vec![HeroSlide {
                id: 1,
                heading: "Welcome".to_string(),
                subheading: None,
                image_url: "/hero.jpg".to_string(),
                cta_label: None,
                cta_url: None,
                position: 0,
            }],
            ..ResolvedWidgetData::default()
        }
    }

    fn ids(nodes: &[RenderedNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.widget_id.as_str()).collect()
    }

    /// A list exercising every branch: data-backed, static, hidden, unknown.
    fn mixed_list() -> Vec<Widget> {
        vec![
            Widget::new("1", "hero_carousel"),
            Widget::new("2", "marquee").with_config(json!({"text": "Hello"})),
            Widget::new("3", "nope"),
            Widget::new("4", "product_grid").visible(false),
            Widget::new("5", "instagram"),
            Widget::new("6", "spacer"),
            Widget::new("7", "faqs"),
        ]
    }

    // ── Concrete scenarios ────────────────────────────────────────

    #[test]
    fn empty_marquee_renders_nothing() {
        let widgets = parse_widget_list(
            r#"[{"id":"1","type":"marquee","isVisible":true,"config":{"text":""}}]"#,
        );
        let out = render_with(&widgets, &full_data(), &RenderContext::default());
        assert!(out.nodes.is_empty());
        assert_eq!(out.skipped[0].reason, SkipReason::Empty);
    }

    #[test]
    fn product_grid_without_products_renders_nothing() {
        let widgets = vec![Widget::new("1", "product_grid")];
        assert!(render(&widgets, &ResolvedWidgetData::default()).is_empty());
    }

    #[test]
    fn hidden_widget_is_dropped_in_order() {
        let widgets = parse_widget_list(
            r#"[{"id":"1","type":"hero_carousel","isVisible":true},
                {"id":"2","type":"testimonials","isVisible":false},
                {"id":"3","type":"faqs","isVisible":true}]"#,
        );
        let nodes = render(&widgets, &full_data());
        assert_eq!(ids(&nodes), vec!["1", "3"]);
        assert_eq!(nodes[0].widget_type, "hero_carousel");
        assert_eq!(nodes[1].widget_type, "faqs");
    }

    #[test]
    fn malformed_list_renders_nothing() {
        let widgets = parse_widget_list("{not json");
        assert!(render(&widgets, &full_data()).is_empty());
    }

    // ── Properties ────────────────────────────────────────────────

    #[test]
    fn output_is_an_ordered_subsequence() {
        let widgets = mixed_list();
        let nodes = render(&widgets, &full_data());
        assert!(nodes.len() <= widgets.len());

        let mut cursor = widgets.iter();
        for node in &nodes {
            assert!(
                cursor.any(|w| w.id == node.widget_id),
                "node {} out of order",
                node.widget_id
            );
        }
        assert_eq!(ids(&nodes), vec!["1", "2", "6", "7"]);
    }

    #[test]
    fn unknown_types_produce_nothing() {
        let widgets = vec![Widget::new("x", "carousel_3000"), Widget::new("y", "")];
        let out = render_with(&widgets, &full_data(), &RenderContext::default());
        assert!(out.nodes.is_empty());
        assert!(out
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::UnknownType));
    }

    #[test]
    fn rendering_is_idempotent() {
        let widgets = mixed_list();
        let data = full_data();
        let ctx = RenderContext::default();
        assert_eq!(
            render_with(&widgets, &data, &ctx),
            render_with(&widgets, &data, &ctx)
        );
    }

    #[test]
    fn hidden_widgets_never_reach_dispatch() {
        // Hidden is reported before the unknown type could be.
        let widgets = vec![Widget::new("1", "nope").visible(false)];
        let out = render_with(&widgets, &full_data(), &RenderContext::default());
        assert_eq!(out.skipped[0].reason, SkipReason::Hidden);
    }

    #[test]
    fn every_registered_type_renders_with_data() {
        let mut data = full_data();
        data.instagram_posts = vec![crate::models::InstagramPost {
            id: "1".to_string(),
            caption: None,
            media_url: "/ig.jpg".to_string(),
            permalink: "/p/1".to_string(),
            timestamp: None,
        }];
        data.blog_posts = vec![crate::models::BlogPostSummary {
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            excerpt: None,
            cover_url: None,
            published_at: None,
        }];
        data.reviews = vec![crate::models::Review {
            id: 1,
            product_id: None,
            author: "Bo".to_string(),
            rating: 4,
            title: None,
            body: "Solid".to_string(),
            created_at: chrono::Utc::now(),
        }];

        let filled = json!({
            "text": "Marquee or quote text",
            "imageUrl": "/banner.jpg",
            "url": "/clip.mp4"
        });
        for def in registry::all() {
            let mut w = Widget::new(def.widget_type, def.widget_type).with_config(filled.clone());
            w.title = Some("Title".to_string());
            let nodes = render(&[w], &data);
            assert_eq!(nodes.len(), 1, "{} did not render", def.widget_type);
            assert_eq!(nodes[0].widget_type, def.widget_type);
        }
    }

    // ── Visibility flags ──────────────────────────────────────────

    #[test]
    fn drafts_only_render_in_preview() {
        let mut w = Widget::new("1", "spacer");
        w.is_draft = true;
        let widgets = vec![w];
        let data = full_data();

        let live = render_with(&widgets, &data, &RenderContext::default());
        assert!(live.nodes.is_empty());
        assert_eq!(live.skipped[0].reason, SkipReason::Draft);

        let preview = RenderContext {
            preview: true,
            ..RenderContext::default()
        };
        let out = render_with(&widgets, &data, &preview);
        assert_eq!(out.nodes.len(), 1);
        assert!(out.nodes[0].html.contains("is-draft"));
    }

    #[test]
    fn known_device_filters() {
        let mut w = Widget::new("1", "spacer");
        w.show_on_mobile = false;
        let widgets = vec![w];
        let data = full_data();

        let mobile = RenderContext {
            device: Some(Device::Mobile),
            ..RenderContext::default()
        };
        let out = render_with(&widgets, &data, &mobile);
        assert!(out.nodes.is_empty());
        assert_eq!(out.skipped[0].reason, SkipReason::Device);

        let desktop = RenderContext {
            device: Some(Device::Desktop),
            ..RenderContext::default()
        };
        let out = render_with(&widgets, &data, &desktop);
        assert_eq!(out.nodes.len(), 1);
        assert!(!out.nodes[0].html.contains("hide-mobile"));
    }

    #[test]
    fn unknown_device_uses_classes() {
        let mut w = Widget::new("1", "spacer");
        w.show_on_desktop = false;
        let nodes = render(&[w], &full_data());
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0]
            .html
            .starts_with(r#"<section class="widget widget-spacer hide-desktop" data-widget-id="1">"#));
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let w = Widget::new("1", "spacer").with_config(json!({"height": "tall"}));
        let nodes = render(&[w], &full_data());
        assert!(nodes[0].html.contains("height:48px"));
    }

    #[test]
    fn bad_config_value_keeps_configured_content() {
        let marquee = Widget::new("1", "marquee").with_config(json!({"text": "Sale", "speed": "turbo"}));
        let grid = Widget::new("2", "product_grid").with_config(json!({"title": "Mugs", "columns": "3"}));
        let nodes = render(&[marquee, grid], &full_data());
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].html.contains("Sale"));
        assert!(nodes[1].html.contains("Mugs"));
        assert!(!nodes[1].html.contains("Featured Products"));
    }
}
