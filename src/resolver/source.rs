//! [`ContentSource`] backed by the SQLite content store and, optionally, the
//! Instagram feed.

use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use super::{ContentSource, InstagramFeed, SourceError, SourceResult};
use crate::constants::{RECENT_POSTS_LIMIT, RECENT_REVIEWS_LIMIT};
use crate::models::{
    group_faqs, BlogPostSummary, FaqGroup, HeroSlide, InstagramPost, Product, Review,
    SiteSettings, Testimonial,
};
use crate::store::ContentStore;

/// Store handle shared between the server thread and blocking query tasks.
pub type SharedStore = Arc<Mutex<ContentStore>>;

pub struct SiteSource {
    store: SharedStore,
    instagram: Option<InstagramFeed>,
}

impl SiteSource {
    pub fn new(store: SharedStore, instagram: Option<InstagramFeed>) -> Self {
        Self { store, instagram }
    }

    /// Run a store query on the blocking pool.
    fn query<T, F>(&self, f: F) -> BoxFuture<'static, SourceResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(&ContentStore) -> rusqlite::Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        async move {
            tokio::task::spawn_blocking(move || -> SourceResult<T> {
                let guard = store
                    .lock()
                    .map_err(|_| SourceError::Unavailable("content store lock poisoned".into()))?;
                f(&guard).map_err(SourceError::from)
            })
            .await?
        }
        .boxed()
    }
}

impl ContentSource for SiteSource {
    fn site_settings(&self) -> BoxFuture<'_, SourceResult<SiteSettings>> {
        self.query(|s| s.site_settings())
    }

    fn products(&self) -> BoxFuture<'_, SourceResult<Vec<Product>>> {
        self.query(|s| s.active_products())
    }

    fn testimonials(&self) -> BoxFuture<'_, SourceResult<Vec<Testimonial>>> {
        self.query(|s| s.active_testimonials())
    }

    fn faqs(&self) -> BoxFuture<'_, SourceResult<Vec<FaqGroup>>> {
        self.query(|s| s.faqs().map(group_faqs))
    }

    fn hero_slides(&self) -> BoxFuture<'_, SourceResult<Vec<HeroSlide>>> {
        self.query(|s| s.hero_slides())
    }

    fn instagram_posts(&self) -> BoxFuture<'_, SourceResult<Vec<InstagramPost>>> {
        async move {
            match &self.instagram {
                Some(feed) => feed.recent_posts().await,
                None => {
                    tracing::debug!("instagram feed not configured");
                    Ok(Vec::new())
                }
            }
        }
        .boxed()
    }

    fn reviews(&self) -> BoxFuture<'_, SourceResult<Vec<Review>>> {
        self.query(|s| s.approved_reviews(RECENT_REVIEWS_LIMIT))
    }

    fn blog_posts(&self) -> BoxFuture<'_, SourceResult<Vec<BlogPostSummary>>> {
        self.query(|s| s.recent_posts(RECENT_POSTS_LIMIT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FaqItem, Widget};
    use crate::render::render;
    use crate::resolver::resolve_for;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn seeded() -> SiteSource {
        let store = ContentStore::open(None).unwrap();
        store
            .upsert_product(&Product {
                id: 0,
                slug: "mug".to_string(),
                name: "Stoneware Mug".to_string(),
                description: String::new(),
                price_cents: 2400,
                compare_at_cents: None,
                image_url: None,
                category: None,
                is_active: true,
            })
            .unwrap();
        for (i, cat) in ["Shipping", "Care", "Shipping"].iter().enumerate() {
            store
                .insert_faq(&FaqItem {
                    id: 0,
                    category: cat.to_string(),
                    question: format!("q{}", i),
                    answer: format!("a{}", i),
                    position: i as i64,
                })
                .unwrap();
        }
        store.set_setting("site_name", "Clayworks").unwrap();
        SiteSource::new(Arc::new(Mutex::new(store)), None)
    }

    #[tokio::test]
    async fn reads_collections_from_store() {
        let source = seeded();
        let products = source.products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].slug, "mug");

        let faqs = source.faqs().await.unwrap();
        assert_eq!(faqs.len(), 2);
        assert_eq!(faqs[0].category, "Shipping");
        assert_eq!(faqs[0].items.len(), 2);
    }

    #[tokio::test]
    async fn missing_feed_yields_no_posts() {
        let source = seeded();
        assert!(source.instagram_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn resolves_page_against_store() {
        let source = seeded();
        let widgets = vec![Widget::new("a", "product_grid"), Widget::new("b", "faqs")];
        let data = resolve_for(&source, &widgets).await;
        assert_eq!(data.settings.site_name, "Clayworks");
        assert_eq!(data.products.len(), 1);
        assert_eq!(data.faqs.len(), 2);
        assert!(data.testimonials.is_empty());
    }

    #[tokio::test]
    async fn product_reviews_survive_busier_products() {
        let store = ContentStore::open(None).unwrap();
        let review = |product_id: i64, hours_ago: i64| Review {
            id: 0,
            product_id: Some(product_id),
            author: "Kit".to_string(),
            rating: 5,
            title: None,
            body: "Lovely".to_string(),
            created_at: Utc::now() - Duration::hours(hours_ago),
        };
        store.insert_review(&review(1, 24 * 365), true).unwrap();
        for i in 0..60 {
            store.insert_review(&review(2, i), true).unwrap();
        }
        let source = SiteSource::new(Arc::new(Mutex::new(store)), None);

        let widgets =
            vec![Widget::new("r", "reviews").with_config(json!({ "productId": 1 }))];
        let data = resolve_for(&source, &widgets).await;
        let nodes = render(&widgets, &data);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].html.contains("Lovely"));
    }
}
