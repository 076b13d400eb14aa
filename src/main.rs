//! Stampbook: console demo of the client core.
//!
//! Loads settings, opens the local storage database and walks the stamp
//! workflow: load boards, inspect membership, fill a board, celebrate it,
//! and draw the result on a headless map. When the backend cannot be
//! reached the demo switches to development mode and runs against the
//! built-in dataset.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::warn;

use stampbook::api::fixtures;
use stampbook::app::App;
use stampbook::managers::session_manager::SessionManagerTrait;
use stampbook::managers::stamp_store::RefreshSource;
use stampbook::map::HeadlessMap;
use stampbook::platform;
use stampbook::services::completion::CELEBRATION_DURATION;
use stampbook::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use stampbook::types::bookmark::PlaceKey;
use stampbook::types::settings::ClientSettings;
use stampbook::types::stamp_board::COLOR_PALETTE;

const DEMO_MAP_KEY: &str = "headless";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!();
    println!("══════════════════════════════════════════════════════════════");
    println!("  Stampbook v{} — Demo Mode", env!("CARGO_PKG_VERSION"));
    println!("══════════════════════════════════════════════════════════════");
    println!();

    let settings = demo_settings()?;
    let db_path = database_path(&settings)?;

    let mut app = open_app(settings.clone(), &db_path).await?;
    if !app.settings.development_mode && app.stamps.source().is_none() {
        warn!("backend unreachable, restarting in development mode");
        let mut dev = settings;
        dev.development_mode = true;
        app = open_app(dev, &db_path).await?;
    }

    demo_boards(&app);
    demo_membership(&app);
    demo_completion(&mut app).await?;
    demo_map(&mut app).await?;
    demo_posts(&app).await;

    println!("══════════════════════════════════════════════════════════════");
    println!("  Demo finished.");
    println!("══════════════════════════════════════════════════════════════");
    Ok(())
}

fn section(name: &str) {
    println!("──────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("──────────────────────────────────────────────────────────────");
}

fn demo_settings() -> Result<ClientSettings, Box<dyn Error>> {
    section("Settings");
    let mut engine = SettingsEngine::new(None);
    engine.load()?;
    engine.apply_env_overrides();
    let settings = engine.get_settings().clone();
    println!("  Config file:      {}", engine.get_config_path());
    println!("  Backend:          {}", settings.api.base_url);
    println!("  Development mode: {}", settings.development_mode);
    println!();
    Ok(settings)
}

fn database_path(settings: &ClientSettings) -> Result<String, Box<dyn Error>> {
    let dir = if settings.data_dir.is_empty() {
        platform::get_data_dir()
    } else {
        PathBuf::from(&settings.data_dir)
    };
    fs::create_dir_all(&dir)?;
    Ok(dir.join("stampbook.db").to_string_lossy().to_string())
}

/// Builds the app, signs in a demo user when no session is stored, and loads data.
async fn open_app(settings: ClientSettings, db_path: &str) -> Result<App, Box<dyn Error>> {
    section("Session");
    let key = if settings.map.sdk_key.is_empty() {
        DEMO_MAP_KEY.to_string()
    } else {
        settings.map.sdk_key.clone()
    };
    let mut app = App::new(settings, db_path, HeadlessMap::new(&key))?;

    if app.session.restore()?.is_none() {
        app.session.login("demo-token", Some(&fixtures::user()))?;
        println!("  Signed in demo user");
    }
    let user = app.startup().await?;
    if let Some(user) = user {
        println!("  User: {} <{}>", user.display_name(), user.email);
    }
    match app.stamps.source() {
        Some(RefreshSource::Backend) => println!("  Data source: backend"),
        Some(RefreshSource::Fallback) => println!("  Data source: development dataset"),
        None => println!(
            "  Data source: none ({})",
            app.stamps.last_error().unwrap_or_default()
        ),
    }
    println!();
    Ok(app)
}

fn demo_boards(app: &App) {
    section("Stamp boards");
    let data = app.stamps.snapshot();
    for board in &data.stamp_boards {
        println!(
            "  [{}] {} {} — {}/{} visited",
            board.id,
            board.title,
            board.color,
            board.visited_count(),
            board.bookmarks.len()
        );
    }
    println!("  Flattened bookmarks: {}", data.bookmarks.len());
    println!("  Saved places:        {}", app.stamps.saved_bookmarks(None).len());
    println!();
}

fn demo_membership(app: &App) {
    section("Place membership");
    for bookmark in app.stamps.saved_bookmarks(None).iter().take(3) {
        let detail = app.place_detail(&bookmark.place_key());
        println!(
            "  {} → boards {:?} (visited: {})",
            bookmark.place_name,
            detail.member_board_ids(),
            detail.visited
        );
    }
    println!();
}

async fn demo_completion(app: &mut App) -> Result<(), Box<dyn Error>> {
    section("Completing a board");
    let board = app.create_board("카페", COLOR_PALETTE[3]).await?;
    println!("  Created board [{}] {}", board.id, board.title);

    let candidates: Vec<String> = app
        .stamps
        .saved_bookmarks(Some(false))
        .iter()
        .take(2)
        .map(|b| b.id.clone())
        .collect();
    for id in &candidates {
        app.add_to_board(&board.id, id).await?;
    }
    println!("  Added {} unvisited places", candidates.len());

    for id in &candidates {
        let fired = app.toggle_visited(id, true)?;
        if !fired.is_empty() {
            println!("  Visiting {} completed boards {:?}", id, fired);
        }
    }

    let mut shown = app.completion.current().map(str::to_string);
    while let Some(board_id) = shown {
        println!(
            "  🎉 Celebrating board {} for {}s",
            board_id,
            CELEBRATION_DURATION.as_secs()
        );
        shown = app.completion.finish_current().map(str::to_string);
    }

    if let Some(id) = candidates.first() {
        app.toggle_visited(id, false)?;
        let again = app.toggle_visited(id, true)?;
        println!("  Re-visiting does not celebrate again: {:?}", again);
    }

    app.delete_board(&board.id).await?;
    println!("  Deleted board [{}]", board.id);
    println!();
    Ok(())
}

async fn demo_map(app: &mut App) -> Result<(), Box<dyn Error>> {
    section("Map");
    let selected: Arc<Mutex<Option<PlaceKey>>> = Arc::new(Mutex::new(None));
    let sink = selected.clone();
    app.map.on_place_selected(move |key| {
        if let Ok(mut slot) = sink.lock() {
            *slot = Some(key.clone());
        }
    });

    let count = app.show_map().await?;
    println!("  Rendered {} markers", count);

    if let Some(marker) = app.map.markers().first().cloned() {
        app.map.sdk().click(&marker.key);
        let clicked = selected.lock().ok().and_then(|slot| slot.clone());
        if let Some(key) = clicked {
            let detail = app.place_detail(&key);
            println!(
                "  Clicked {} ({}), in {} boards",
                key.name,
                detail.address.as_deref().unwrap_or_default(),
                detail.member_board_ids().len()
            );
        }
    }
    println!();
    Ok(())
}

async fn demo_posts(app: &App) {
    section("Posts");
    println!("  Loaded {} posts", app.posts.posts().len());
    match app.posts.search("맛집").await {
        Ok(found) => {
            for post in found {
                println!("  • {} ({})", post.title, post.address);
            }
        }
        Err(e) => println!("  Search failed: {}", e),
    }
    println!();
}
