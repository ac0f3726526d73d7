//! Shared markup helpers: section headers, images, product cards, grids.

use std::fmt::Write;

use crate::models::{Product, Widget};
use crate::utils::{escape_html, format_price, non_blank};

/// `<header>` with the widget's title and subtitle, or an empty string when
/// there is neither. `fallback` is used when the widget has no title.
pub fn section_header(widget: &Widget, fallback: Option<&str>) -> String {
    let title = non_blank(widget.title.as_deref()).or(non_blank(fallback));
    let subtitle = non_blank(widget.subtitle.as_deref());
    header_markup(title, subtitle)
}

/// Like [`section_header`] but with an explicit title that takes precedence
/// over the widget's own.
pub fn titled_header(widget: &Widget, title: &str) -> String {
    header_markup(non_blank(Some(title)), non_blank(widget.subtitle.as_deref()))
}

fn header_markup(title: Option<&str>, subtitle: Option<&str>) -> String {
    if title.is_none() && subtitle.is_none() {
        return String::new();
    }
    let mut out = String::from(r#"<header class="widget-header">"#);
    if let Some(t) = title {
        let _ = write!(out, "<h2>{}</h2>", escape_html(t));
    }
    if let Some(s) = subtitle {
        let _ = write!(out, r#"<p class="widget-subtitle">{}</p>"#, escape_html(s));
    }
    out.push_str("</header>");
    out
}

/// Authored rich text, emitted as is.
pub fn rich_text(content: Option<&str>) -> String {
    match non_blank(content) {
        Some(html) => format!(r#"<div class="rich-text">{}</div>"#, html),
        None => String::new(),
    }
}

pub fn image(url: &str, alt: &str) -> String {
    format!(
        r#"<img src="{}" alt="{}" loading="lazy">"#,
        escape_html(url),
        escape_html(alt)
    )
}

/// Inline style carrying the grid column count for the stylesheet.
pub fn grid_style(columns: u8, max: u8) -> String {
    format!(r#"style="--columns:{}""#, columns.clamp(1, max))
}

/// Link or button styled as a call to action.
pub fn button(label: &str, url: &str) -> String {
    format!(
        r#"<a class="button" href="{}">{}</a>"#,
        escape_html(url),
        escape_html(label)
    )
}

pub fn product_url(product: &Product) -> String {
    format!("/products/{}", product.slug)
}

/// Price line; sale items show the compare-at price struck through.
pub fn price_tag(product: &Product, currency: &str) -> String {
    let mut out = format!(
        r#"<span class="price">{}</span>"#,
        escape_html(&format_price(product.price_cents, currency))
    );
    if let Some(was) = product.compare_at_cents.filter(|_| product.on_sale()) {
        let _ = write!(
            out,
            r#" <s class="price-was">{}</s>"#,
            escape_html(&format_price(was, currency))
        );
    }
    out
}

pub fn product_card(product: &Product, currency: &str, show_price: bool) -> String {
    let mut out = format!(
        r#"<article class="product-card"><a href="{}">"#,
        escape_html(&product_url(product))
    );
    if let Some(url) = non_blank(product.image_url.as_deref()) {
        out.push_str(&image(url, &product.name));
    }
    let _ = write!(out, "<h3>{}</h3>", escape_html(&product.name));
    if show_price {
        out.push_str(&price_tag(product, currency));
    }
    out.push_str("</a></article>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: 1,
            slug: "mug".to_string(),
            name: "Mug <large>".to_string(),
            description: String::new(),
            price_cents: 1800,
            compare_at_cents: Some(2400),
            image_url: Some("/img/mug.jpg".to_string()),
            category: None,
            is_active: true,
        }
    }

    #[test]
    fn header_empty_without_title_or_subtitle() {
        let w = Widget::new("1", "text");
        assert_eq!(section_header(&w, None), "");
        assert_eq!(section_header(&w, Some("  ")), "");
    }

    #[test]
    fn header_prefers_widget_title() {
        let mut w = Widget::new("1", "blog_posts");
        assert!(section_header(&w, Some("Fallback")).contains("<h2>Fallback</h2>"));
        w.title = Some("Journal".to_string());
        w.subtitle = Some("Notes & news".to_string());
        let html = section_header(&w, Some("Fallback"));
        assert!(html.contains("<h2>Journal</h2>"));
        assert!(html.contains("Notes &amp; news"));
    }

    #[test]
    fn card_escapes_name_and_shows_sale() {
        let html = product_card(&product(), "USD", true);
        assert!(html.contains("Mug &lt;large&gt;"));
        assert!(html.contains("$18.00"));
        assert!(html.contains(r#"<s class="price-was">$24.00</s>"#));
        assert!(html.contains(r#"href="/products/mug""#));
    }

    #[test]
    fn card_can_hide_price() {
        let html = product_card(&product(), "USD", false);
        assert!(!html.contains("price"));
    }

    #[test]
    fn grid_columns_clamped() {
        assert_eq!(grid_style(0, 6), r#"style="--columns:1""#);
        assert_eq!(grid_style(9, 6), r#"style="--columns:6""#);
    }

    #[test]
    fn rich_text_is_not_escaped() {
        assert_eq!(
            rich_text(Some("<p>Hi</p>")),
            r#"<div class="rich-text"><p>Hi</p></div>"#
        );
        assert_eq!(rich_text(Some("  ")), "");
    }
}
