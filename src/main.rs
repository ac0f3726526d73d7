//! # Vitrine - Widget-Driven Storefront Pages
//!
//! Pages, products and blog posts each own an ordered list of widgets.
//! Vitrine resolves the data those widgets need, renders them to HTML, and
//! serves both the public site and a small admin API for editing the lists.

#[macro_use]
extern crate rust_i18n;

// Load locale files from `locales/` directory, default to English
i18n!("locales", fallback = "en");

mod config;
pub mod constants;
mod editor;
mod models;
mod registry;
mod render;
mod resolver;
mod server;
mod store;
mod utils;

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::Config;
use editor::{AdminClient, EditorState, LocalStorage, WidgetPatch, WidgetStorage};
use models::{Device, ParentRef};
use render::RenderContext;
use resolver::{InstagramFeed, SharedStore};
use server::Site;
use store::ContentStore;

/// Vitrine - compose storefront pages from widgets
#[derive(Parser, Debug)]
#[command(name = "vitrine", version, about = "Widget-driven page composition for small storefronts")]
struct Cli {
    /// Language for widget default copy (en, es)
    #[arg(long, short = 'l', value_name = "LANG", global = true)]
    lang: Option<String>,

    /// SQLite database path (overrides config)
    #[arg(long, value_name = "PATH", global = true)]
    db: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the site and the admin widget API
    Serve {
        /// Listen address (e.g. "0.0.0.0:8080")
        #[arg(long, value_name = "ADDR")]
        addr: Option<String>,
    },
    /// Render a page, product or post (e.g. "pages/home") to stdout
    Render {
        parent: String,
        /// Only render widgets shown on this device (desktop, mobile)
        #[arg(long)]
        device: Option<String>,
        /// Include draft widgets
        #[arg(long)]
        preview: bool,
        /// Print rendered nodes and skipped widgets as JSON
        #[arg(long)]
        json: bool,
    },
    /// List registered widget types by category
    Types {
        /// Filter by name, type or description
        #[arg(long, short = 's')]
        search: Option<String>,
    },
    /// Edit a widget list
    Widgets {
        parent: String,
        /// Edit through the admin API of a running server instead of the local database
        #[arg(long)]
        remote: bool,
        #[command(subcommand)]
        action: WidgetsAction,
    },
    /// Write demo content to the database
    Seed,
    /// Show row counts per table
    Stats,
}

#[derive(Subcommand, Debug)]
enum WidgetsAction {
    /// Show the list in order
    List,
    /// Add a widget of a registered type
    Add {
        widget_type: String,
        /// Insert position (default: end)
        #[arg(long)]
        at: Option<usize>,
    },
    /// Patch a widget with a JSON object (config keys merge shallowly)
    Update {
        id: String,
        #[arg(long, value_name = "JSON")]
        patch: String,
    },
    /// Remove a widget
    Remove { id: String },
    /// Move a widget to a new position
    Move { id: String, to: usize },
    /// Copy a widget right below itself
    Duplicate { id: String },
    /// Flip visibility, or a device flag with --device
    Toggle {
        id: String,
        #[arg(long)]
        device: Option<String>,
    },
    /// Flip a widget between draft and live
    Draft { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load();
    if let Some(ref lang) = cli.lang {
        config.lang = lang.clone();
    }
    if let Some(ref db) = cli.db {
        config.database_path = db.clone();
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Widget copy language (CLI > config > default "en")
    rust_i18n::set_locale(&config.lang);

    match cli.command {
        Command::Serve { addr } => serve(&config, addr).await,
        Command::Render {
            parent,
            device,
            preview,
            json,
        } => render_cmd(&config, &parent, device.as_deref(), preview, json).await,
        Command::Types { search } => types_cmd(search.as_deref()),
        Command::Widgets {
            parent,
            remote,
            action,
        } => widgets_cmd(&config, &parent, remote, action).await,
        Command::Seed => {
            let store = open_store(&config)?;
            store::seed::seed_demo(&store).context("failed to write demo content")?;
            println!(
                "{}",
                t!("cli.seeded", path = config.database_path.display().to_string())
            );
            Ok(())
        }
        Command::Stats => {
            let store = open_store(&config)?;
            for (table, count) in store.table_stats()? {
                println!("{:<14} {}", table, count);
            }
            Ok(())
        }
    }
}

fn open_store(config: &Config) -> Result<ContentStore> {
    ContentStore::open(Some(&config.database_path)).with_context(|| {
        format!(
            "failed to open database {}",
            config.database_path.display()
        )
    })
}

fn shared_store(config: &Config) -> Result<SharedStore> {
    Ok(Arc::new(Mutex::new(open_store(config)?)))
}

fn parse_parent(s: &str) -> Result<ParentRef> {
    ParentRef::parse(s)
        .ok_or_else(|| anyhow!("expected <pages|products|posts>/<slug>, got {:?}", s))
}

fn parse_device(s: &str) -> Result<Device> {
    Ok(s.parse::<Device>()?)
}

async fn serve(config: &Config, addr: Option<String>) -> Result<()> {
    let addr = addr.unwrap_or_else(|| config.listen_addr.clone());
    let site = Arc::new(Site::new(
        shared_store(config)?,
        InstagramFeed::from_config(&config.instagram),
    ));
    let handle = server::start_server(&addr, site, tokio::runtime::Handle::current())?;
    println!("{}", t!("cli.listening", addr = handle.addr().to_string()));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    tracing::info!("shutting down");
    tokio::task::spawn_blocking(move || handle.shutdown()).await?;
    Ok(())
}

async fn render_cmd(
    config: &Config,
    parent: &str,
    device: Option<&str>,
    preview: bool,
    json: bool,
) -> Result<()> {
    let parent = parse_parent(parent)?;
    let ctx = RenderContext {
        device: device.map(parse_device).transpose()?,
        preview,
    };
    let site = Site::new(
        shared_store(config)?,
        InstagramFeed::from_config(&config.instagram),
    );
    let Some(page) = site.render_parent(&parent, &ctx).await? else {
        bail!("{}", t!("cli.not_found", parent = parent.to_string()));
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&page.output)?);
    } else {
        print!("{}", page.html);
    }
    Ok(())
}

fn types_cmd(search: Option<&str>) -> Result<()> {
    let groups = match search {
        Some(q) => registry::search(q),
        None => registry::by_category(),
    };
    for group in groups {
        println!("{}", group.category);
        for def in group.types {
            println!("  {} {:<18} {}", def.icon, def.widget_type, def.description);
        }
    }
    Ok(())
}

async fn widgets_cmd(
    config: &Config,
    parent: &str,
    remote: bool,
    action: WidgetsAction,
) -> Result<()> {
    let parent = parse_parent(parent)?;
    let storage: Box<dyn WidgetStorage> = if remote {
        Box::new(AdminClient::new(&config.admin_url))
    } else {
        Box::new(LocalStorage::new(shared_store(config)?))
    };
    let mut editor = EditorState::load(&*storage, parent.clone())
        .await
        .with_context(|| format!("failed to load widgets for {}", parent))?;

    match action {
        WidgetsAction::List => {
            print_widgets(&editor);
            return Ok(());
        }
        WidgetsAction::Add { widget_type, at } => {
            let id = editor.add(&widget_type, at)?;
            println!("{}", id);
        }
        WidgetsAction::Update { id, patch } => {
            let patch: WidgetPatch =
                serde_json::from_str(&patch).context("--patch must be a JSON object")?;
            editor.update(&id, &patch)?;
        }
        WidgetsAction::Remove { id } => {
            editor.remove(&id)?;
        }
        WidgetsAction::Move { id, to } => {
            let from = editor
                .widgets()
                .iter()
                .position(|w| w.id == id)
                .ok_or_else(|| anyhow!("no widget {:?} on {}", id, parent))?;
            editor.move_widget(from, to)?;
        }
        WidgetsAction::Duplicate { id } => {
            let copy = editor.duplicate(&id)?;
            println!("{}", copy);
        }
        WidgetsAction::Toggle { id, device } => match device {
            Some(d) => {
                editor.toggle_device(&id, parse_device(&d)?)?;
            }
            None => {
                editor.toggle_visible(&id)?;
            }
        },
        WidgetsAction::Draft { id } => {
            editor.toggle_draft(&id)?;
        }
    }

    if editor.is_dirty() {
        editor
            .save(&*storage)
            .await
            .with_context(|| format!("failed to save widgets for {}", parent))?;
        println!(
            "{}",
            t!(
                "cli.saved",
                count = editor.widgets().len(),
                parent = parent.to_string()
            )
        );
    }
    Ok(())
}

fn print_widgets(editor: &EditorState) {
    if editor.widgets().is_empty() {
        println!("{}", t!("cli.no_widgets", parent = editor.parent().to_string()));
        return;
    }
    for (i, w) in editor.widgets().iter().enumerate() {
        let mut flags = Vec::new();
        if !w.is_visible {
            flags.push("hidden");
        }
        if w.is_draft {
            flags.push("draft");
        }
        if !w.show_on_desktop {
            flags.push("no-desktop");
        }
        if !w.show_on_mobile {
            flags.push("no-mobile");
        }
        if !registry::is_known(&w.widget_type) {
            flags.push("unknown-type");
        }
        let label = w.title.as_deref().unwrap_or("");
        println!(
            "{:>2}. {:<36} {:<18} {} {}",
            i,
            w.id,
            w.widget_type,
            label,
            flags.join(",")
        );
    }
}
