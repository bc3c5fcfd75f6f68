//! Playback infrastructure
//!
//! - Media: commands and events exchanged with the player
//! - Player: mpv/VLC processes driven by those commands

pub mod media;
pub mod player;

pub use media::{MediaCommand, MediaEvent};
pub use player::{LocalPlayer, MediaDriver, PlayerError, PlayerType};
