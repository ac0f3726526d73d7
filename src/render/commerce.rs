//! Product grid, featured product and review widgets.

use std::fmt::Write;

use super::helpers::{
    grid_style, image, price_tag, product_card, product_url, rich_text, section_header,
    titled_header,
};
use crate::constants::{MAX_GRID_COLUMNS, MAX_RATING};
use crate::models::{
    average_rating, FeaturedProductConfig, Product, ProductGridConfig, Review, ReviewsConfig,
    SiteSettings, Widget,
};
use crate::utils::{escape_html, non_blank, rating_stars};

pub fn product_grid(
    widget: &Widget,
    cfg: &ProductGridConfig,
    products: &[Product],
    settings: &SiteSettings,
) -> Option<String> {
    let items: Vec<&Product> = products
        .iter()
        .filter(|p| match non_blank(cfg.category.as_deref()) {
            Some(cat) => p
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(cat)),
            None => true,
        })
        .take(cfg.limit)
        .collect();
    if items.is_empty() {
        return None;
    }

    let heading = match non_blank(cfg.title.as_deref()) {
        Some(title) => titled_header(widget, title),
        None => section_header(widget, Some(&*t!("widgets.product_grid.title"))),
    };

    let mut out = heading;
    let _ = write!(
        out,
        r#"<div class="product-grid" {}>"#,
        grid_style(cfg.columns, MAX_GRID_COLUMNS)
    );
    for p in items {
        out.push_str(&product_card(p, &settings.currency, cfg.show_prices));
    }
    out.push_str("</div>");
    Some(out)
}

pub fn featured_product(
    widget: &Widget,
    cfg: &FeaturedProductConfig,
    products: &[Product],
    settings: &SiteSettings,
) -> Option<String> {
    let product = match non_blank(cfg.product_slug.as_deref()) {
        Some(slug) => products.iter().find(|p| p.slug == slug)?,
        None => products.first()?,
    };

    let label = non_blank(cfg.cta_label.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| t!("widgets.featured_product.cta").to_string());

    let mut out = section_header(widget, None);
    out.push_str(r#"<div class="featured-product">"#);
    if let Some(url) = non_blank(product.image_url.as_deref()) {
        let _ = write!(out, r#"<div class="featured-media">{}</div>"#, image(url, &product.name));
    }
    let _ = write!(
        out,
        r#"<div class="featured-body"><h3>{}</h3>{}"#,
        escape_html(&product.name),
        price_tag(product, &settings.currency)
    );
    if let Some(desc) = non_blank(Some(&product.description)) {
        let _ = write!(out, "<p>{}</p>", escape_html(desc));
    }
    out.push_str(&rich_text(widget.content.as_deref()));
    let _ = write!(
        out,
        r#"<a class="button" href="{}">{}</a></div></div>"#,
        escape_html(&product_url(product)),
        escape_html(&label)
    );
    Some(out)
}

pub fn reviews(widget: &Widget, cfg: &ReviewsConfig, reviews: &[Review]) -> Option<String> {
    let items: Vec<&Review> = reviews
        .iter()
        .filter(|r| cfg.product_id.map_or(true, |id| r.product_id == Some(id)))
        .filter(|r| r.rating >= cfg.min_rating)
        .take(cfg.limit)
        .collect();
    if items.is_empty() {
        return None;
    }

    let mut out = section_header(widget, None);
    if cfg.show_summary {
        if let Some(avg) = average_rating(&items) {
            let _ = write!(
                out,
                r#"<p class="reviews-summary"><span class="stars">{}</span> {}</p>"#,
                rating_stars(avg.round() as u8, MAX_RATING),
                escape_html(&t!(
                    "widgets.reviews.summary",
                    average = format!("{:.1}", avg),
                    count = items.len()
                ))
            );
        }
    }
    out.push_str(r#"<ul class="reviews">"#);
    for r in items {
        let _ = write!(
            out,
            r#"<li class="review"><span class="stars" aria-label="{}/{}">{}</span>"#,
            r.rating.min(MAX_RATING),
            MAX_RATING,
            rating_stars(r.rating, MAX_RATING)
        );
        if let Some(title) = non_blank(r.title.as_deref()) {
            let _ = write!(out, "<h3>{}</h3>", escape_html(title));
        }
        let _ = write!(
            out,
            r#"<p>{}</p><footer>{} · <time datetime="{}">{}</time></footer></li>"#,
            escape_html(&r.body),
            escape_html(&r.author),
            r.created_at.to_rfc3339(),
            r.created_at.format("%b %d, %Y")
        );
    }
    out.push_str("</ul>");
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn product(id: i64, slug: &str, category: Option<&str>) -> Product {
        Product {
            id,
            slug: slug.to_string(),
            name: format!("Item {}", id),
            description: "Hand thrown".to_string(),
            price_cents: 1000 * id,
            compare_at_cents: None,
            image_url: None,
            category: category.map(str::to_string),
            is_active: true,
        }
    }

    fn review(id: i64, product_id: Option<i64>, rating: u8) -> Review {
        Review {
            id,
            product_id,
            author: format!("Buyer {}", id),
            rating,
            title: None,
            body: "Great".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn grid_uses_localised_default_title() {
        let w = Widget::new("g", "product_grid");
        let html = product_grid(
            &w,
            &ProductGridConfig::default(),
            &[product(1, "a", None)],
            &SiteSettings::default(),
        )
        .unwrap();
        assert!(html.contains("<h2>Featured Products</h2>"));
    }

    #[test]
    fn grid_title_precedence() {
        let mut w = Widget::new("g", "product_grid");
        w.title = Some("Widget title".to_string());
        let data = [product(1, "a", None)];
        let settings = SiteSettings::default();

        let html = product_grid(&w, &ProductGridConfig::default(), &data, &settings).unwrap();
        assert!(html.contains("<h2>Widget title</h2>"));

        let cfg = ProductGridConfig {
            title: Some("Config title".to_string()),
            ..ProductGridConfig::default()
        };
        let html = product_grid(&w, &cfg, &data, &settings).unwrap();
        assert!(html.contains("<h2>Config title</h2>"));
        assert!(!html.contains("Widget title"));
    }

    #[test]
    fn grid_filters_by_category_and_limit() {
        let w = Widget::new("g", "product_grid");
        let data = [
            product(1, "a", Some("Mugs")),
            product(2, "b", Some("Bowls")),
            product(3, "c", Some("mugs")),
            product(4, "d", Some("Mugs")),
        ];
        let cfg = ProductGridConfig {
            category: Some("MUGS".to_string()),
            limit: 2,
            ..ProductGridConfig::default()
        };
        let html = product_grid(&w, &cfg, &data, &SiteSettings::default()).unwrap();
        assert!(html.contains("/products/a"));
        assert!(html.contains("/products/c"));
        assert!(!html.contains("/products/b"));
        assert!(!html.contains("/products/d"));
    }

    #[test]
    fn grid_with_no_matching_products_is_absent() {
        let w = Widget::new("g", "product_grid");
        let cfg = ProductGridConfig {
            category: Some("Vases".to_string()),
            ..ProductGridConfig::default()
        };
        let settings = SiteSettings::default();
        assert!(product_grid(&w, &cfg, &[product(1, "a", None)], &settings).is_none());
        assert!(product_grid(&w, &ProductGridConfig::default(), &[], &settings).is_none());
    }

    #[test]
    fn featured_picks_slug_or_first() {
        let w = Widget::new("f", "featured_product");
        let data = [product(1, "a", None), product(2, "b", None)];
        let settings = SiteSettings::default();

        let html = featured_product(&w, &FeaturedProductConfig::default(), &data, &settings).unwrap();
        assert!(html.contains("Item 1"));
        assert!(html.contains("Shop now"));

        let cfg = FeaturedProductConfig {
            product_slug: Some("b".to_string()),
            cta_label: Some("Get it".to_string()),
        };
        let html = featured_product(&w, &cfg, &data, &settings).unwrap();
        assert!(html.contains("Item 2"));
        assert!(html.contains("Get it"));

        let missing = FeaturedProductConfig {
            product_slug: Some("zzz".to_string()),
            ..FeaturedProductConfig::default()
        };
        assert!(featured_product(&w, &missing, &data, &settings).is_none());
    }

    #[test]
    fn reviews_filter_by_product_and_rating() {
        let w = Widget::new("r", "reviews");
        let data = [
            review(1, Some(7), 5),
            review(2, Some(7), 2),
            review(3, Some(8), 5),
        ];
        let cfg = ReviewsConfig {
            product_id: Some(7),
            min_rating: 3,
            ..ReviewsConfig::default()
        };
        let html = reviews(&w, &cfg, &data).unwrap();
        assert!(html.contains("Buyer 1"));
        assert!(!html.contains("Buyer 2"));
        assert!(!html.contains("Buyer 3"));
        assert!(html.contains("5.0"));
    }

    #[test]
    fn reviews_empty_after_filter_is_absent() {
        let w = Widget::new("r", "reviews");
        let cfg = ReviewsConfig {
            min_rating: 5,
            ..ReviewsConfig::default()
        };
        assert!(reviews(&w, &cfg, &[review(1, None, 4)]).is_none());
    }
}
