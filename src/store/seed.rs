//! Demo content for a fresh database: a home page using most widget types,
//! a small catalog, and the collections those widgets read.

use chrono::{Duration, Utc};
use rusqlite::Result as SqlResult;
use serde_json::json;

use super::{ContentStore, NewBlogPost};
use crate::models::{
    FaqItem, HeroSlide, ParentKind, ParentRef, Product, Review, Testimonial, Widget,
};

/// Write the demo content. Pages, products, posts and settings are upserted;
/// list tables are only filled when empty, so seeding twice is harmless.
pub fn seed_demo(store: &ContentStore) -> SqlResult<()> {
    let counts: std::collections::HashMap<String, u64> = store.table_stats()?.into_iter().collect();
    let is_empty = |table: &str| counts.get(table).copied().unwrap_or(0) == 0;

    for (key, value) in [
        ("site_name", "Clayworks"),
        ("tagline", "Small-batch stoneware"),
        ("currency", "USD"),
        ("instagram_handle", "clayworks.studio"),
    ] {
        store.set_setting(key, value)?;
    }
    store.set_setting(
        "nav",
        &json!([
            { "label": "Shop", "url": "/" },
            { "label": "About", "url": "/pages/about" },
            { "label": "Journal", "url": "/blog/kiln-notes" },
        ])
        .to_string(),
    )?;
    store.set_setting(
        "popup",
        &json!({
            "title": "First order?",
            "body": "Take 10% off with code FIRSTFIRE.",
            "cta_label": "Shop now",
            "cta_url": "/products/speckled-mug",
        })
        .to_string(),
    )?;

    let mug_id = store.upsert_product(&product(
        "speckled-mug",
        "Speckled Mug",
        "Wheel-thrown, 350 ml, dishwasher safe.",
        2800,
        Some(3400),
        "Mugs",
    ))?;
    store.upsert_product(&product(
        "serving-bowl",
        "Serving Bowl",
        "Wide bowl in a satin white glaze.",
        6400,
        None,
        "Bowls",
    ))?;
    store.upsert_product(&product(
        "bud-vase",
        "Bud Vase",
        "Small vase with an ash glaze.",
        2200,
        None,
        "Vases",
    ))?;
    store.save_widgets(
        &ParentRef::new(ParentKind::Product, "speckled-mug"),
        &[Widget::new("mug-reviews", "reviews").with_config(json!({ "productId": mug_id }))],
    )?;

    if is_empty("testimonials") {
        for (i, (author, role, body)) in [
            ("Ana R.", "Chef", "The bowls hold heat beautifully."),
            ("Tom K.", "Collector", "Every piece is a little different, in the best way."),
        ]
        .into_iter()
        .enumerate()
        {
            store.insert_testimonial(&Testimonial {
                id: 0,
                author: author.to_string(),
                role: Some(role.to_string()),
                body: body.to_string(),
                rating: Some(5),
                is_active: true,
                position: i as i64,
            })?;
        }
    }

    if is_empty("faqs") {
        for (i, (category, question, answer)) in [
            ("Shipping", "Do you ship abroad?", "Yes, to most of Europe and North America."),
            ("Shipping", "How is it packed?", "Double-boxed in recycled paper."),
            ("Care", "Is it microwave safe?", "Mugs and bowls are; vases are not."),
        ]
        .into_iter()
        .enumerate()
        {
            store.insert_faq(&FaqItem {
                id: 0,
                category: category.to_string(),
                question: question.to_string(),
                answer: answer.to_string(),
                position: i as i64,
            })?;
        }
    }

    if is_empty("hero_slides") {
        for (i, (heading, image)) in [
            ("Autumn glazes are here", "/assets/hero-autumn.jpg"),
            ("Made by hand in small batches", "/assets/hero-studio.jpg"),
        ]
        .into_iter()
        .enumerate()
        {
            store.insert_hero_slide(&HeroSlide {
                id: 0,
                heading: heading.to_string(),
                subheading: None,
                image_url: image.to_string(),
                cta_label: Some("Shop the collection".to_string()),
                cta_url: Some("/".to_string()),
                position: i as i64,
            })?;
        }
    }

    if is_empty("reviews") {
        for (author, rating, body) in [
            ("Mia", 5, "My new favourite mug."),
            ("Leo", 4, "Lovely glaze, slightly smaller than expected."),
        ] {
            store.insert_review(
                &Review {
                    id: 0,
                    product_id: Some(mug_id),
                    author: author.to_string(),
                    rating,
                    title: None,
                    body: body.to_string(),
                    created_at: Utc::now(),
                },
                true,
            )?;
        }
    }

    store.upsert_blog_post(&NewBlogPost {
        slug: "kiln-notes".to_string(),
        title: "Notes from the kiln".to_string(),
        excerpt: Some("What a cone 6 firing taught us this season.".to_string()),
        cover_url: Some("/assets/kiln.jpg".to_string()),
        body: "<p>We fired forty pieces last week.</p>".to_string(),
        is_published: true,
        published_at: Some(Utc::now() - Duration::days(3)),
    })?;

    store.upsert_page("home", "Home", &home_widgets())?;
    store.upsert_page(
        "about",
        "About",
        &[
            Widget {
                title: Some("Our studio".to_string()),
                content: Some("<p>Two potters, one kiln, a lot of clay.</p>".to_string()),
                ..Widget::new("about-text", "text")
            },
            Widget::new("about-quote", "quote").with_config(json!({
                "text": "Clay remembers everything.",
                "author": "Studio saying",
            })),
            Widget::new("about-faqs", "faqs").with_config(json!({ "expandFirst": true })),
        ],
    )?;

    tracing::info!("demo content written");
    Ok(())
}

fn home_widgets() -> Vec<Widget> {
    vec![
        Widget::new("announce", "marquee")
            .with_config(json!({ "text": "Free shipping over $75", "speed": "slow" })),
        Widget::new("hero", "hero_carousel").with_config(json!({ "intervalMs": 6000 })),
        Widget {
            title: Some("New this week".to_string()),
            ..Widget::new("grid", "product_grid").with_config(json!({ "columns": 3, "limit": 6 }))
        },
        Widget::new("feature", "featured_product")
            .with_config(json!({ "productSlug": "speckled-mug" })),
        Widget::new("kind-words", "testimonials").with_config(json!({ "layout": "grid" })),
        Widget::new("gram", "instagram"),
        Widget::new("journal", "blog_posts"),
        Widget {
            title: Some("Stay in the loop".to_string()),
            ..Widget::new("signup", "newsletter")
        },
        Widget {
            // Only shows in preview until published.
            is_draft: true,
            title: Some("Holiday market".to_string()),
            ..Widget::new("holiday", "call_to_action")
                .with_config(json!({ "buttonUrl": "/pages/about" }))
        },
    ]
}

fn product(
    slug: &str,
    name: &str,
    description: &str,
    price_cents: i64,
    compare_at_cents: Option<i64>,
    category: &str,
) -> Product {
    Product {
        id: 0,
        slug: slug.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price_cents,
        compare_at_cents,
        image_url: Some(format!("/assets/{}.jpg", slug)),
        category: Some(category.to_string()),
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_widget_list;
    use crate::registry;

    #[test]
    fn seeding_twice_does_not_duplicate() {
        let store = ContentStore::open(None).unwrap();
        seed_demo(&store).unwrap();
        seed_demo(&store).unwrap();

        assert_eq!(store.active_products().unwrap().len(), 3);
        assert_eq!(store.active_testimonials().unwrap().len(), 2);
        assert_eq!(store.faqs().unwrap().len(), 3);
        assert_eq!(store.site_settings().unwrap().nav.len(), 3);
        assert!(store.site_settings().unwrap().popup.is_some());
    }

    #[test]
    fn demo_widgets_use_registered_types() {
        let store = ContentStore::open(None).unwrap();
        seed_demo(&store).unwrap();
        for slug in ["home", "about"] {
            let raw = store
                .load_widgets_raw(&ParentRef::new(ParentKind::Page, slug))
                .unwrap()
                .unwrap();
            let widgets = parse_widget_list(&raw);
            assert!(!widgets.is_empty());
            assert!(widgets.iter().all(|w| registry::is_known(&w.widget_type)));
        }
    }
}
