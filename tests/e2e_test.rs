//! End-to-end flow tests for marquee
//!
//! Drive the app the way the event loop does (keys, mouse, async results,
//! ticks) and check both its state and the commands sent to the media driver.
//!
//! ## Flows
//! - Load catalog -> browse rows -> play a card -> control -> close
//! - Search -> results grid -> play a result -> close -> clear search
//! - Hero autoplay starts muted after the preview delay

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use marquee::api::{CatalogClient, CatalogError, CatalogSource};
use marquee::catalog::CatalogStore;
use marquee::app::{ActiveView, App, Focus, InputMode, ProbeTarget, HERO_PREVIEW_DELAY};
use marquee::config::Config;
use marquee::hover::{CardKey, Section};
use marquee::models::{Catalog, Category, Hero, Title, TitleKind};
use marquee::search::filter_titles;
use marquee::stream::{LocalPlayer, MediaCommand, MediaDriver, MediaEvent, PlayerType};

// =============================================================================
// Helpers
// =============================================================================

fn title(id: u64, name: &str, genre: &str) -> Arc<Title> {
    Arc::new(Title {
        id,
        title: name.into(),
        description: format!("About {}", name),
        image: format!("https://img.example/{}.jpg", id),
        genre: genre.into(),
        rating: "TV-14".into(),
        year: 2022,
        duration: "1h 30m".into(),
        trailer_url: format!("https://media.example/{}.mp4", id),
        kind: TitleKind::Movie,
    })
}

fn catalog() -> Catalog {
    Catalog {
        trending: (1..=10).map(|i| title(i, &format!("Trend {}", i), "Drama")).collect(),
        popular: vec![
            title(21, "Alpha Quest", "Action"),
            title(22, "Beta", "Comedy Alpha"),
            title(23, "Gamma", "Drama"),
        ],
        new_releases: vec![],
        action_movies: vec![title(21, "Alpha Quest", "Action")],
        comedy_shows: vec![title(31, "Open Plan", "Comedy")],
        hero: Hero {
            title: title(100, "Featured", "Sci-Fi"),
            background_image: "https://img.example/100-bg.jpg".into(),
        },
    }
}

fn app_with(config: Config) -> (App, UnboundedReceiver<MediaCommand>) {
    let (tx, rx) = unbounded_channel();
    let mut app = App::new(&config, PlayerType::None, tx);
    app.set_viewport(80);
    app.on_catalog_loaded(Ok(catalog()));
    (app, rx)
}

fn app() -> (App, UnboundedReceiver<MediaCommand>) {
    app_with(Config::default())
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

fn press_at(app: &mut App, code: KeyCode, now: Instant) -> bool {
    app.handle_key_at(key(code), now)
}

fn press(app: &mut App, code: KeyCode) -> bool {
    app.handle_key(key(code))
}

fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn drain(rx: &mut UnboundedReceiver<MediaCommand>) -> Vec<MediaCommand> {
    let mut out = Vec::new();
    while let Ok(cmd) = rx.try_recv() {
        out.push(cmd);
    }
    out
}

fn loads(cmds: &[MediaCommand]) -> Vec<String> {
    cmds.iter()
        .filter_map(|c| match c {
            MediaCommand::Load { url, .. } => Some(url.clone()),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Catalog loading
// =============================================================================

#[test]
fn test_keys_before_catalog_ready_do_not_play() {
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(&Config::default(), PlayerType::None, tx);
    app.set_viewport(80);

    let consumed: Vec<bool> = [
        KeyCode::Char('/'),
        KeyCode::Char('x'),
        KeyCode::Enter,
        KeyCode::Esc,
        KeyCode::Down,
    ]
    .into_iter()
    .map(|code| press(&mut app, code))
    .collect();
    assert_eq!(consumed, vec![false; 5]);

    assert!(!app.player.is_open());
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.search.query.is_empty());
    assert_eq!(app.active_view(), ActiveView::Browsing);
    assert_eq!(app.focus, Focus::Hero);
    assert!(drain(&mut rx).is_empty());
    assert!(app.take_probe_requests().is_empty());

    // Once ready the same keys reach the search box
    app.on_catalog_loaded(Ok(catalog()));
    assert!(press(&mut app, KeyCode::Char('/')));
    assert_eq!(app.input_mode, InputMode::Editing);
}

#[test]
fn test_failed_load_then_success_is_not_retried_but_applies() {
    let (tx, _rx) = unbounded_channel();
    let mut app = App::new(&Config::default(), PlayerType::None, tx);
    app.on_catalog_loaded(Err(CatalogError::Status(503)));
    assert!(!app.catalog.is_ready());

    // A late result (there is no retry, but nothing forbids one arriving)
    app.on_catalog_loaded(Ok(catalog()));
    assert!(app.catalog.is_ready());
}

#[test]
fn test_second_catalog_is_ignored() {
    let (mut app, _rx) = app();
    let mut other = catalog();
    other.trending.clear();
    app.on_catalog_loaded(Ok(other));
    assert_eq!(app.catalog.row(Category::Trending).len(), 10);
}

#[tokio::test]
async fn test_store_loaded_from_file_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.json");
    std::fs::write(&path, serde_json::to_string(&catalog()).unwrap()).unwrap();

    let (tx, _rx) = unbounded_channel();
    let mut app = App::new(&Config::default(), PlayerType::None, tx);
    app.set_viewport(80);

    // A failed load leaves the app on the loading screen
    let mut failed = CatalogStore::new();
    failed
        .load(&CatalogClient::new(CatalogSource::File(dir.path().join("absent.json"))))
        .await;
    app.on_catalog_store(failed);
    assert!(!app.catalog.is_ready());

    let mut store = CatalogStore::new();
    store.load(&CatalogClient::new(CatalogSource::File(path))).await;
    app.on_catalog_store(store);
    assert!(app.catalog.is_ready());
    assert!(app
        .take_probe_requests()
        .iter()
        .any(|r| r.target == ProbeTarget::Hero));

    // A ready store is never replaced
    app.on_catalog_store(CatalogStore::new());
    assert!(app.catalog.is_ready());
}

// =============================================================================
// Browse -> play -> close
// =============================================================================

#[test]
fn test_browse_play_card_and_close() {
    let (mut app, mut rx) = app();
    let t0 = Instant::now();

    // Hero -> Trending, move to the 4th card
    press_at(&mut app, KeyCode::Down, t0);
    for _ in 0..3 {
        press_at(&mut app, KeyCode::Right, t0);
    }
    assert_eq!(app.focus, Focus::Row(Category::Trending));
    assert_eq!(app.row_state(Category::Trending).selected, 3);

    press_at(&mut app, KeyCode::Enter, t0);
    assert!(app.player.is_open());
    assert_eq!(app.player.open_title().map(|t| t.id), Some(4));
    assert_eq!(loads(&drain(&mut rx)), vec!["https://media.example/4.mp4"]);

    // Player keys are modal
    assert!(press_at(&mut app, KeyCode::Down, t0));
    assert_eq!(app.row_state(Category::Trending).selected, 3);
    assert!((app.player.state().volume - 0.9).abs() < 1e-6);

    app.on_media_event(MediaEvent::TimeUpdate {
        position: 30.0,
        duration: 90.0,
    });
    press_at(&mut app, KeyCode::Right, t0);
    assert_eq!(app.player.state().current_time, 40.0);

    press_at(&mut app, KeyCode::Esc, t0);
    assert!(!app.player.is_open());
    let cmds = drain(&mut rx);
    let tail = &cmds[cmds.len() - 2..];
    assert_eq!(tail, &[MediaCommand::Pause, MediaCommand::Stop]);

    // Back in browse with the same focus
    assert_eq!(app.active_view(), ActiveView::Browsing);
    assert_eq!(app.focus, Focus::Row(Category::Trending));
}

#[test]
fn test_reopen_resets_time() {
    let (mut app, _rx) = app();
    press(&mut app, KeyCode::Enter); // Hero
    app.on_media_event(MediaEvent::TimeUpdate {
        position: 55.0,
        duration: 120.0,
    });
    press(&mut app, KeyCode::Esc);

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    let state = app.player.state();
    assert_eq!(state.current_time, 0.0);
    assert_eq!(state.total_duration, 0.0);
    assert!(state.is_playing);
    assert!(state.controls_visible);
}

#[test]
fn test_space_is_consumed_by_player() {
    let (mut app, mut rx) = app();
    press(&mut app, KeyCode::Enter);
    drain(&mut rx);

    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Char(' '));
    assert!(app.player.state().is_playing);
    assert_eq!(drain(&mut rx), vec![MediaCommand::Pause, MediaCommand::Play]);
    // Nothing reached the search box
    assert!(app.search.query.is_empty());
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn test_mute_roundtrip_restores_volume() {
    let (mut app, _rx) = app();
    press(&mut app, KeyCode::Enter);
    for _ in 0..3 {
        press(&mut app, KeyCode::Down);
    }
    assert!((app.player.state().volume - 0.7).abs() < 1e-6);

    press(&mut app, KeyCode::Char('m'));
    assert!(app.player.state().is_muted);
    assert_eq!(app.player.state().volume, 0.0);
    press(&mut app, KeyCode::Char('m'));
    assert!(!app.player.state().is_muted);
    assert!((app.player.state().volume - 0.7).abs() < 1e-6);
}

#[test]
fn test_last_time_update_wins() {
    let (mut app, _rx) = app();
    press(&mut app, KeyCode::Enter);
    app.on_media_event(MediaEvent::TimeUpdate {
        position: 42.0,
        duration: 120.0,
    });
    app.on_media_event(MediaEvent::TimeUpdate {
        position: 10.0,
        duration: 120.0,
    });
    assert_eq!(app.player.state().current_time, 10.0);
}

#[test]
fn test_media_end_and_failure() {
    let (mut app, _rx) = app();
    press(&mut app, KeyCode::Enter);

    app.on_media_event(MediaEvent::Ended);
    assert!(!app.player.state().is_playing);
    assert!(app.player.is_open());

    app.on_media_event(MediaEvent::Failed("codec".into()));
    assert!(app.player.is_open());
    assert!(app.error.as_deref().unwrap_or("").contains("codec"));
}

#[test]
fn test_controls_auto_hide_is_debounced() {
    let (mut app, _rx) = app();
    let t0 = Instant::now();
    press_at(&mut app, KeyCode::Enter, t0);

    // Mouse movement re-arms the single timer
    app.pointer_moved(None, t0 + Duration::from_millis(2000));
    app.tick(t0 + Duration::from_millis(3500));
    assert!(app.player.state().controls_visible);

    app.tick(t0 + Duration::from_millis(5000));
    assert!(!app.player.state().controls_visible);

    // Any key brings them back
    press_at(&mut app, KeyCode::Char('x'), t0 + Duration::from_millis(6000));
    assert!(app.player.state().controls_visible);
}

// =============================================================================
// Rows
// =============================================================================

#[test]
fn test_row_offset_stays_in_bounds() {
    let (mut app, _rx) = app();
    press(&mut app, KeyCode::Down);
    for _ in 0..20 {
        press(&mut app, KeyCode::Char(']'));
    }
    let scroller = &app.row_state(Category::Trending).scroller;
    assert_eq!(scroller.offset(), scroller.max_offset());
    assert!(!scroller.can_pan_right());

    for _ in 0..20 {
        press(&mut app, KeyCode::Char('['));
    }
    assert_eq!(app.row_state(Category::Trending).scroller.offset(), 0);
}

#[test]
fn test_focus_skips_empty_rows() {
    let (mut app, _rx) = app();
    press(&mut app, KeyCode::Down); // Trending
    press(&mut app, KeyCode::Down); // Popular
    press(&mut app, KeyCode::Down); // New Releases is empty
    assert_eq!(app.focus, Focus::Row(Category::ActionMovies));
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    assert_eq!(app.focus, Focus::Row(Category::ComedyShows));
    press(&mut app, KeyCode::Up);
    assert_eq!(app.focus, Focus::Row(Category::ActionMovies));
}

#[test]
fn test_mouse_hover_is_exclusive_and_click_plays() {
    let (mut app, mut rx) = app();
    let now = Instant::now();
    let a = CardKey::new(Section::Row(Category::Popular), 0, 21);
    let b = CardKey::new(Section::Row(Category::Popular), 2, 23);

    app.pointer_moved(Some(a), now);
    assert!(app.hover.state(&a).hovered);
    app.pointer_moved(Some(b), now);
    assert!(!app.hover.state(&a).hovered);
    assert!(app.hover.state(&b).hovered);

    app.card_clicked(b, now);
    assert_eq!(app.player.open_title().map(|t| t.id), Some(23));
    assert_eq!(loads(&drain(&mut rx)), vec!["https://media.example/23.mp4"]);
}

#[test]
fn test_stale_card_key_is_ignored() {
    let (mut app, mut rx) = app();
    // Slot 0 of Popular holds id 21, not 99
    app.card_clicked(CardKey::new(Section::Row(Category::Popular), 0, 99), Instant::now());
    assert!(!app.player.is_open());
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_artwork_probe_once_per_card() {
    let (mut app, _rx) = app();
    let initial = app.take_probe_requests();
    assert_eq!(initial.len(), 1);
    assert_eq!(initial[0].target, ProbeTarget::Hero);
    assert_eq!(initial[0].url, "https://img.example/100-bg.jpg");

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Right);
    let urls: Vec<_> = app.take_probe_requests().into_iter().map(|p| p.url).collect();
    assert_eq!(urls, vec!["https://img.example/1.jpg", "https://img.example/2.jpg"]);
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_filter_scenario() {
    let titles = vec![
        title(1, "Alpha Quest", "Action"),
        title(2, "Beta", "Comedy Alpha"),
        title(3, "Gamma", "Drama"),
    ];
    let ids: Vec<u64> = filter_titles(&titles, "alpha").iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_search_play_result_and_close_search() {
    let (mut app, mut rx) = app();

    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.input_mode, InputMode::Editing);
    type_str(&mut app, "ALPHA");
    assert_eq!(app.active_view(), ActiveView::SearchResults);
    let ids: Vec<u64> = app.results().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![21, 22, 21]);

    // Into the grid, one step right, play
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Normal);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.player.open_title().map(|t| t.id), Some(22));
    assert_eq!(loads(&drain(&mut rx)), vec!["https://media.example/22.mp4"]);

    press(&mut app, KeyCode::Esc); // closes the player only
    assert!(!app.player.is_open());
    assert_eq!(app.search.query, "ALPHA");

    press(&mut app, KeyCode::Esc); // explicit close search
    assert!(app.search.query.is_empty());
    assert_eq!(app.active_view(), ActiveView::Browsing);
    assert!(app.results().is_empty());
}

#[test]
fn test_typing_query_empty_only_switches_view() {
    let (mut app, _rx) = app();
    press(&mut app, KeyCode::Char('/'));
    type_str(&mut app, "be");
    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Backspace);

    assert_eq!(app.active_view(), ActiveView::Browsing);
    assert!(app.results().is_empty());
    // Still editing: only the explicit close leaves the search box
    assert_eq!(app.input_mode, InputMode::Editing);
}

#[test]
fn test_search_view_follows_query_not_focus() {
    let (mut app, _rx) = app();
    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.active_view(), ActiveView::Browsing);
    type_str(&mut app, "   ");
    assert_eq!(app.active_view(), ActiveView::SearchResults);
    assert!(app.results().is_empty());
}

// =============================================================================
// Hero autoplay
// =============================================================================

#[test]
fn test_hero_autoplay_opens_muted_after_delay() {
    let config = Config {
        hero_autoplay: true,
        ..Config::default()
    };
    let (mut app, mut rx) = app_with(config);
    let t0 = Instant::now();

    app.tick(t0);
    app.tick(t0 + HERO_PREVIEW_DELAY - Duration::from_millis(1));
    assert!(!app.player.is_open());

    app.tick(t0 + HERO_PREVIEW_DELAY);
    assert!(app.hero.preview_started);
    assert!(app.player.is_open());
    assert!(app.player.state().is_muted);
    let cmds = drain(&mut rx);
    assert!(matches!(
        cmds.first(),
        Some(MediaCommand::Load { volume, .. }) if *volume == 0.0
    ));

    // An explicit play afterwards is unmuted at full volume
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Enter);
    assert!(!app.player.state().is_muted);
    assert_eq!(app.player.state().volume, 1.0);
}

#[test]
fn test_hero_preview_without_autoplay_keeps_player_closed() {
    let (mut app, _rx) = app();
    let t0 = Instant::now();
    app.tick(t0);
    app.tick(t0 + HERO_PREVIEW_DELAY);
    assert!(app.hero.preview_started);
    assert!(!app.player.is_open());

    press(&mut app, KeyCode::Char('v'));
    assert!(!app.hero.muted);
}

// =============================================================================
// Media driver
// =============================================================================

#[tokio::test]
async fn test_driver_without_player_drops_commands_and_exits() {
    let (cmd_tx, cmd_rx) = unbounded_channel();
    let (ev_tx, mut ev_rx) = unbounded_channel();
    let handle = MediaDriver::new(LocalPlayer::new(PlayerType::None), cmd_rx, ev_tx).spawn();

    let mut app = App::new(&Config::default(), PlayerType::None, cmd_tx);
    app.set_viewport(80);
    app.on_catalog_loaded(Ok(catalog()));
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Esc);
    drop(app);

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("driver should stop once the app is gone")
        .unwrap();
    assert!(ev_rx.try_recv().is_err());
}
