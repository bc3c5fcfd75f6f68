//! marquee - terminal video-catalog browser
//!
//! Loads a static catalog of movies and series, shows it as a featured hero
//! and five scrollable rows, filters it as you type and plays trailers in an
//! external player driven from the TUI.
//!
//! # Modules
//!
//! - `models` - Catalog titles, categories and play intents
//! - `api` - Catalog document client and artwork probing
//! - `catalog` / `search` / `scroller` / `hover` - Browse-side state
//! - `playback` - Player controller state machine
//! - `stream` - External player process and its command channel
//! - `ui` - TUI components
//! - `app` - Orchestrator routing input to the pieces above
//! - `cli` / `commands` - Scriptable subcommands

pub mod models;
pub mod api;
pub mod catalog;
pub mod search;
pub mod scroller;
pub mod hover;
pub mod playback;
pub mod stream;
pub mod ui;
pub mod app;
pub mod config;
pub mod cli;
pub mod commands;

// Re-export commonly used types
pub use models::{Catalog, Category, Hero, PlayIntent, PlayOrigin, Title, TitleKind};

pub use api::{Artwork, ArtworkProbe, CatalogClient, CatalogError, CatalogSource};
pub use app::{ActiveView, App, Focus, InputMode};
pub use catalog::{CatalogState, CatalogStore};
pub use config::Config;
pub use playback::{PlaybackState, PlayerController};
pub use stream::{MediaCommand, MediaDriver, MediaEvent, PlayerType};
