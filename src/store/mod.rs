//! Content store backed by SQLite.
//!
//! Holds every entity the site renders: pages, products and blog posts (each
//! owning a JSON widget column), plus the collections widgets draw from
//! (testimonials, FAQs, hero slides, reviews) and the key/value site settings.
//!
//! Design:
//! - WAL mode so page renders can read while the admin saves
//! - Widget lists are stored whole; a save replaces the entire array
//! - In-process only, no external DB server needed

pub mod seed;

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult};

use crate::models::{
    serialize_widget_list, BlogPostSummary, FaqItem, HeroSlide, NavLink, ParentKind, ParentRef,
    Popup, Product, Review, SiteSettings, Testimonial, Widget,
};

// ── Query result types ────────────────────────────────────────────

/// A widget-owning row: its display title and raw widget column.
#[derive(Debug, Clone)]
pub struct ParentRow {
    pub title: String,
    pub widgets_raw: String,
    /// Body copy (blog posts and products); empty for pages.
    pub body: String,
    /// Publicly visible: an active product or a published post. Pages
    /// are always live.
    pub is_live: bool,
}

/// Full blog post insert payload.
#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub cover_url: Option<String>,
    pub body: String,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

// ── ContentStore ──────────────────────────────────────────────────

/// Persistent content store backed by SQLite.
pub struct ContentStore {
    conn: Connection,
}

impl ContentStore {
    /// Open (or create) the content database.
    ///
    /// If `path` is `None`, uses an in-memory database (useful for tests).
    pub fn open(path: Option<&Path>) -> SqlResult<Self> {
        let conn = match path {
            Some(p) => {
                // Ensure parent directory exists
                if let Some(parent) = p.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }
                Connection::open(p)?
            }
            None => Connection::open_in_memory()?,
        };

        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    // ── Schema ────────────────────────────────────────────────────

    fn init_schema(&self) -> SqlResult<()> {
        // Enable WAL mode for better concurrent read performance
        self.conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        self.conn.execute_batch("PRAGMA synchronous=NORMAL;")?;

        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS pages (
                id          INTEGER PRIMARY KEY,
                slug        TEXT NOT NULL UNIQUE,
                title       TEXT NOT NULL,
                widgets     TEXT NOT NULL DEFAULT '[]',
                updated_at  TEXT
            );

            CREATE TABLE IF NOT EXISTS products (
                id               INTEGER PRIMARY KEY,
                slug             TEXT NOT NULL UNIQUE,
                name             TEXT NOT NULL,
                description      TEXT NOT NULL DEFAULT '',
                price_cents      INTEGER NOT NULL,
                compare_at_cents INTEGER,
                image_url        TEXT,
                category         TEXT,
                is_active        INTEGER NOT NULL DEFAULT 1,
                widgets          TEXT NOT NULL DEFAULT '[]',
                updated_at       TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_products_active ON products(is_active);

            CREATE TABLE IF NOT EXISTS blog_posts (
                id           INTEGER PRIMARY KEY,
                slug         TEXT NOT NULL UNIQUE,
                title        TEXT NOT NULL,
                excerpt      TEXT,
                cover_url    TEXT,
                body         TEXT NOT NULL DEFAULT '',
                is_published INTEGER NOT NULL DEFAULT 0,
                published_at TEXT,
                post_widgets TEXT NOT NULL DEFAULT '[]',
                updated_at   TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_posts_published ON blog_posts(is_published, published_at);

            CREATE TABLE IF NOT EXISTS testimonials (
                id          INTEGER PRIMARY KEY,
                author      TEXT NOT NULL,
                role        TEXT,
                body        TEXT NOT NULL,
                rating      INTEGER,
                is_active   INTEGER NOT NULL DEFAULT 1,
                position    INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS faqs (
                id          INTEGER PRIMARY KEY,
                category    TEXT NOT NULL,
                question    TEXT NOT NULL,
                answer      TEXT NOT NULL,
                position    INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS hero_slides (
                id          INTEGER PRIMARY KEY,
                heading     TEXT NOT NULL,
                subheading  TEXT,
                image_url   TEXT NOT NULL,
                cta_label   TEXT,
                cta_url     TEXT,
                position    INTEGER NOT NULL DEFAULT 0,
                is_active   INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS reviews (
                id          INTEGER PRIMARY KEY,
                product_id  INTEGER,
                author      TEXT NOT NULL,
                rating      INTEGER NOT NULL,
                title       TEXT,
                body        TEXT NOT NULL,
                is_approved INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_reviews_approved ON reviews(is_approved, created_at);

            CREATE TABLE IF NOT EXISTS settings (
                key         TEXT PRIMARY KEY,
                value       TEXT NOT NULL
            );",
        )?;

        Ok(())
    }

    // ── Widget lists ──────────────────────────────────────────────

    /// Load a widget-owning row, live or not. `None` when no such parent
    /// exists.
    pub fn load_parent(&self, parent: &ParentRef) -> SqlResult<Option<ParentRow>> {
        let (body_column, live_column) = match parent.kind {
            ParentKind::Page => ("''", "1"),
            ParentKind::Product => ("description", "is_active"),
            ParentKind::BlogPost => ("body", "is_published"),
        };
        let sql = format!(
            "SELECT {}, {}, {}, {} FROM {} WHERE slug = ?1",
            parent.kind.title_column(),
            parent.kind.widgets_column(),
            body_column,
            live_column,
            parent.kind.table(),
        );
        self.conn
            .query_row(&sql, params![parent.slug], |row| {
                Ok(ParentRow {
                    title: row.get(0)?,
                    widgets_raw: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    body: row.get(2)?,
                    is_live: row.get(3)?,
                })
            })
            .optional()
    }

    /// Raw persisted widget JSON for a parent. `None` when the parent is missing.
    pub fn load_widgets_raw(&self, parent: &ParentRef) -> SqlResult<Option<String>> {
        Ok(self.load_parent(parent)?.map(|row| row.widgets_raw))
    }

    /// Replace a parent's whole widget list. Returns `false` when the parent
    /// does not exist (nothing written).
    pub fn save_widgets(&self, parent: &ParentRef, widgets: &[Widget]) -> SqlResult<bool> {
        let json = serialize_widget_list(widgets)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let sql = format!(
            "UPDATE {} SET {} = ?1, updated_at = ?2 WHERE slug = ?3",
            parent.kind.table(),
            parent.kind.widgets_column(),
        );
        let changed = self
            .conn
            .execute(&sql, params![json, Utc::now(), parent.slug])?;
        Ok(changed > 0)
    }

    // ── Pages ─────────────────────────────────────────────────────

    /// Create or retitle a page, replacing its widgets.
    pub fn upsert_page(&self, slug: &str, title: &str, widgets: &[Widget]) -> SqlResult<()> {
        let json = serialize_widget_list(widgets)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        self.conn.execute(
            "INSERT INTO pages (slug, title, widgets, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(slug) DO UPDATE SET title = excluded.title,
                 widgets = excluded.widgets, updated_at = excluded.updated_at",
            params![slug, title, json, Utc::now()],
        )?;
        Ok(())
    }

    // ── Products ──────────────────────────────────────────────────

    /// Insert or update a product by slug. Returns its row id.
    pub fn upsert_product(&self, product: &Product) -> SqlResult<i64> {
        self.conn.execute(
            "INSERT INTO products (slug, name, description, price_cents, compare_at_cents, image_url, category, is_active, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(slug) DO UPDATE SET name = excluded.name, description = excluded.description,
                 price_cents = excluded.price_cents, compare_at_cents = excluded.compare_at_cents,
                 image_url = excluded.image_url, category = excluded.category,
                 is_active = excluded.is_active, updated_at = excluded.updated_at",
            params![
                product.slug,
                product.name,
                product.description,
                product.price_cents,
                product.compare_at_cents,
                product.image_url,
                product.category,
                product.is_active,
                Utc::now(),
            ],
        )?;
        self.conn.query_row(
            "SELECT id FROM products WHERE slug = ?1",
            params![product.slug],
            |row| row.get(0),
        )
    }

    /// Active products, newest first.
    pub fn active_products(&self) -> SqlResult<Vec<Product>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, slug, name, description, price_cents, compare_at_cents, image_url, category, is_active
             FROM products WHERE is_active = 1 ORDER BY id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Product {
                id: row.get(0)?,
                slug: row.get(1)?,
                name: row.get(2)?,
                description: row.get(3)?,
                price_cents: row.get(4)?,
                compare_at_cents: row.get(5)?,
                image_url: row.get(6)?,
                category: row.get(7)?,
                is_active: row.get(8)?,
            })
        })?;

        rows.collect()
    }

    // ── Testimonials ──────────────────────────────────────────────

    pub fn insert_testimonial(&self, t: &Testimonial) -> SqlResult<i64> {
        self.conn.execute(
            "INSERT INTO testimonials (author, role, body, rating, is_active, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![t.author, t.role, t.body, t.rating, t.is_active, t.position],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Active testimonials in display order.
    pub fn active_testimonials(&self) -> SqlResult<Vec<Testimonial>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, author, role, body, rating, is_active, position
             FROM testimonials WHERE is_active = 1 ORDER BY position ASC, id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Testimonial {
                id: row.get(0)?,
                author: row.get(1)?,
                role: row.get(2)?,
                body: row.get(3)?,
                rating: row.get(4)?,
                is_active: row.get(5)?,
                position: row.get(6)?,
            })
        })?;

        rows.collect()
    }

    // ── FAQs ──────────────────────────────────────────────────────

    pub fn insert_faq(&self, item: &FaqItem) -> SqlResult<i64> {
        self.conn.execute(
            "INSERT INTO faqs (category, question, answer, position) VALUES (?1, ?2, ?3, ?4)",
            params![item.category, item.question, item.answer, item.position],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All FAQ entries, grouped by category (first entry decides category order).
    pub fn faqs(&self) -> SqlResult<Vec<FaqItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT f.id, f.category, f.question, f.answer, f.position
             FROM faqs f
             JOIN (SELECT category, MIN(position) AS first_pos FROM faqs GROUP BY category) c
               ON c.category = f.category
             ORDER BY c.first_pos ASC, f.category ASC, f.position ASC, f.id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(FaqItem {
                id: row.get(0)?,
                category: row.get(1)?,
                question: row.get(2)?,
                answer: row.get(3)?,
                position: row.get(4)?,
            })
        })?;

        rows.collect()
    }

    // ── Hero slides ───────────────────────────────────────────────

    pub fn insert_hero_slide(&self, slide: &HeroSlide) -> SqlResult<i64> {
        self.conn.execute(
            "INSERT INTO hero_slides (heading, subheading, image_url, cta_label, cta_url, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                slide.heading,
                slide.subheading,
                slide.image_url,
                slide.cta_label,
                slide.cta_url,
                slide.position,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Active hero slides in carousel order.
    pub fn hero_slides(&self) -> SqlResult<Vec<HeroSlide>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, heading, subheading, image_url, cta_label, cta_url, position
             FROM hero_slides WHERE is_active = 1 ORDER BY position ASC, id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(HeroSlide {
                id: row.get(0)?,
                heading: row.get(1)?,
                subheading: row.get(2)?,
                image_url: row.get(3)?,
                cta_label: row.get(4)?,
                cta_url: row.get(5)?,
                position: row.get(6)?,
            })
        })?;

        rows.collect()
    }

    // ── Reviews ───────────────────────────────────────────────────

    pub fn insert_review(&self, review: &Review, is_approved: bool) -> SqlResult<i64> {
        self.conn.execute(
            "INSERT INTO reviews (product_id, author, rating, title, body, is_approved, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                review.product_id,
                review.author,
                review.rating,
                review.title,
                review.body,
                is_approved,
                review.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Approved reviews, newest first, keeping the `limit` most recent of
    /// each product. Site-wide reviews (no product) count as one group.
    pub fn approved_reviews(&self, limit: usize) -> SqlResult<Vec<Review>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, product_id, author, rating, title, body, created_at FROM (
                 SELECT *, ROW_NUMBER() OVER (
                     PARTITION BY product_id ORDER BY created_at DESC, id DESC
                 ) AS row_rank
                 FROM reviews WHERE is_approved = 1
             )
             WHERE row_rank <= ?1
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(Review {
                id: row.get(0)?,
                product_id: row.get(1)?,
                author: row.get(2)?,
                rating: row.get(3)?,
                title: row.get(4)?,
                body: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        rows.collect()
    }

    // ── Blog posts ────────────────────────────────────────────────

    pub fn upsert_blog_post(&self, post: &NewBlogPost) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO blog_posts (slug, title, excerpt, cover_url, body, is_published, published_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(slug) DO UPDATE SET title = excluded.title, excerpt = excluded.excerpt,
                 cover_url = excluded.cover_url, body = excluded.body,
                 is_published = excluded.is_published, published_at = excluded.published_at,
                 updated_at = excluded.updated_at",
            params![
                post.slug,
                post.title,
                post.excerpt,
                post.cover_url,
                post.body,
                post.is_published,
                post.published_at,
                Utc::now(),
            ],
        )?;
        Ok(())
    }

    /// Most recent published posts.
    pub fn recent_posts(&self, limit: usize) -> SqlResult<Vec<BlogPostSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT slug, title, excerpt, cover_url, published_at
             FROM blog_posts WHERE is_published = 1
             ORDER BY published_at DESC, id DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(BlogPostSummary {
                slug: row.get(0)?,
                title: row.get(1)?,
                excerpt: row.get(2)?,
                cover_url: row.get(3)?,
                published_at: row.get(4)?,
            })
        })?;

        rows.collect()
    }

    // ── Settings ──────────────────────────────────────────────────

    pub fn set_setting(&self, key: &str, value: &str) -> SqlResult<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn setting(&self, key: &str) -> SqlResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    /// Site settings with defaults for anything unset. Malformed `nav` /
    /// `popup` JSON is ignored with a warning.
    pub fn site_settings(&self) -> SqlResult<SiteSettings> {
        let mut settings = SiteSettings::default();

        if let Some(v) = self.setting("site_name")?.filter(|v| !v.is_empty()) {
            settings.site_name = v;
        }
        settings.tagline = self.setting("tagline")?.filter(|v| !v.is_empty());
        if let Some(v) = self.setting("currency")?.filter(|v| !v.is_empty()) {
            settings.currency = v;
        }
        settings.instagram_handle = self
            .setting("instagram_handle")?
            .map(|h| h.trim_start_matches('@').to_string())
            .filter(|h| !h.is_empty());

        if let Some(raw) = self.setting("nav")? {
            match serde_json::from_str::<Vec<NavLink>>(&raw) {
                Ok(nav) => settings.nav = nav,
                Err(e) => tracing::warn!(error = %e, "ignoring malformed nav setting"),
            }
        }
        if let Some(raw) = self.setting("popup")? {
            match serde_json::from_str::<Popup>(&raw) {
                Ok(popup) => settings.popup = Some(popup),
                Err(e) => tracing::warn!(error = %e, "ignoring malformed popup setting"),
            }
        }

        Ok(settings)
    }

    // ── Diagnostics ───────────────────────────────────────────────

    /// Get row counts for each table.
    pub fn table_stats(&self) -> SqlResult<Vec<(String, u64)>> {
        let tables = [
            "pages",
            "products",
            "blog_posts",
            "testimonials",
            "faqs",
            "hero_slides",
            "reviews",
            "settings",
        ];
        let mut stats = Vec::new();
        for table in &tables {
            let count: u64 =
                self.conn
                    .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                        row.get(0)
                    })?;
            stats.push((table.to_string(), count));
        }
        Ok(stats)
    }
}

// ── Tests ─────────────────────────────────────────────────────────
