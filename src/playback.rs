//! Player controller
//!
//! Owns the state of the single playback session and drives the media
//! collaborator through [`MediaCommand`]s. The controller never touches a
//! process or a socket itself, which keeps every transition synchronous.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::models::{PlayIntent, PlayOrigin, Title};
use crate::stream::{MediaCommand, MediaEvent};

/// Controls hide this long after the last qualifying event
pub const CONTROLS_TIMEOUT: Duration = Duration::from_millis(3000);

/// Default seek step for the arrow keys, in seconds
pub const SEEK_STEP_SECS: f64 = 10.0;

/// Volume change per arrow key press
pub const VOLUME_STEP: f32 = 0.1;

// =============================================================================
// Auto-hide timer
// =============================================================================

/// Single-shot deadline. Arming again replaces the pending deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoHide {
    timeout: Duration,
    deadline: Option<Instant>,
}

impl AutoHide {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: None,
        }
    }

    /// (Re)start the countdown from `now`
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.timeout);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// `true` exactly once, when `now` reaches the pending deadline
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

// =============================================================================
// Playback state
// =============================================================================

/// Per-session playback fields
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub is_muted: bool,
    /// Seconds
    pub current_time: f64,
    /// Seconds, 0 until the media reports it
    pub total_duration: f64,
    /// 0.0 - 1.0
    pub volume: f32,
    pub controls_visible: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            is_muted: false,
            current_time: 0.0,
            total_duration: 0.0,
            volume: 1.0,
            controls_visible: false,
        }
    }
}

impl PlaybackState {
    /// Position as a fraction of the duration (0.0 when unknown)
    pub fn progress(&self) -> f64 {
        if self.total_duration > 0.0 {
            (self.current_time / self.total_duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// The open session
#[derive(Debug, Clone)]
pub struct Session {
    pub title: Arc<Title>,
    pub origin: PlayOrigin,
}

// =============================================================================
// Controller
// =============================================================================

/// Open/closed playback state machine
#[derive(Debug)]
pub struct PlayerController {
    session: Option<Session>,
    state: PlaybackState,
    /// Last non-zero volume, restored when unmuting
    remembered_volume: f32,
    auto_hide: AutoHide,
    seek_step: f64,
    media: UnboundedSender<MediaCommand>,
}

impl PlayerController {
    pub fn new(media: UnboundedSender<MediaCommand>) -> Self {
        Self::with_settings(media, CONTROLS_TIMEOUT, SEEK_STEP_SECS)
    }

    pub fn with_settings(
        media: UnboundedSender<MediaCommand>,
        controls_timeout: Duration,
        seek_step: f64,
    ) -> Self {
        Self {
            session: None,
            state: PlaybackState::default(),
            remembered_volume: 1.0,
            auto_hide: AutoHide::new(controls_timeout),
            seek_step,
            media,
        }
    }

    fn send(&self, command: MediaCommand) {
        if self.media.send(command).is_err() {
            debug!("media driver gone, dropping command");
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Title of the open session
    pub fn open_title(&self) -> Option<&Arc<Title>> {
        self.session.as_ref().map(|s| &s.title)
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Pending auto-hide deadline, if the controls are counting down
    pub fn controls_deadline(&self) -> Option<Instant> {
        self.auto_hide.deadline()
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Closed → Open, or replace the running session
    pub fn open(&mut self, intent: PlayIntent, now: Instant) {
        info!(
            id = intent.title.id,
            title = %intent.title.title,
            origin = ?intent.origin,
            autoplay = intent.autoplay,
            "opening player"
        );

        self.state.current_time = 0.0;
        self.state.total_duration = 0.0;
        self.state.is_playing = true;
        self.state.controls_visible = true;

        if intent.autoplay {
            if self.state.volume > 0.0 {
                self.remembered_volume = self.state.volume;
            }
            self.state.volume = 0.0;
            self.state.is_muted = true;
        } else {
            if self.state.volume == 0.0 {
                self.state.volume = self.remembered_volume;
            }
            self.state.is_muted = false;
        }

        self.send(MediaCommand::Load {
            url: intent.title.trailer_url.clone(),
            title: intent.title.title.clone(),
            volume: self.state.volume,
        });
        self.auto_hide.arm(now);
        self.session = Some(Session {
            title: intent.title,
            origin: intent.origin,
        });
    }

    /// Open → Closed. The media is paused before it is torn down.
    pub fn close(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        info!(id = session.title.id, "closing player");

        self.send(MediaCommand::Pause);
        self.send(MediaCommand::Stop);
        self.state.is_playing = false;
        self.state.controls_visible = false;
        self.auto_hide.cancel();
    }

    /// Flip play/pause. Each call sends exactly one absolute command.
    pub fn toggle_play(&mut self) {
        if !self.is_open() {
            return;
        }
        self.state.is_playing = !self.state.is_playing;
        self.send(if self.state.is_playing {
            MediaCommand::Play
        } else {
            MediaCommand::Pause
        });
    }

    /// Jump to `t` seconds, clamped to the known duration
    pub fn seek(&mut self, t: f64) {
        if !self.is_open() || !t.is_finite() {
            return;
        }
        self.state.current_time = t.clamp(0.0, self.state.total_duration);
        self.send(MediaCommand::Seek(self.state.current_time));
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, delta: f64) {
        self.seek(self.state.current_time + delta);
    }

    pub fn set_volume(&mut self, v: f32) {
        if !self.is_open() || !v.is_finite() {
            return;
        }
        let v = v.clamp(0.0, 1.0);
        self.state.volume = v;
        self.state.is_muted = v == 0.0;
        if v > 0.0 {
            self.remembered_volume = v;
        }
        self.send(MediaCommand::SetVolume(v));
    }

    /// Swap between silence and the last non-zero volume
    pub fn toggle_mute(&mut self) {
        if !self.is_open() {
            return;
        }
        if self.state.is_muted {
            self.state.volume = self.remembered_volume;
            self.state.is_muted = false;
        } else {
            if self.state.volume > 0.0 {
                self.remembered_volume = self.state.volume;
            }
            self.state.volume = 0.0;
            self.state.is_muted = true;
        }
        self.send(MediaCommand::SetVolume(self.state.volume));
    }

    /// Position report from the media. Latest value wins.
    pub fn on_time_update(&mut self, t: f64, d: f64) {
        if !self.is_open() {
            return;
        }
        self.state.current_time = if t.is_finite() { t.max(0.0) } else { 0.0 };
        self.state.total_duration = if d.is_finite() { d.max(0.0) } else { 0.0 };
    }

    /// Apply a report from the media driver
    pub fn on_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate { position, duration } => self.on_time_update(position, duration),
            MediaEvent::Ended => {
                if self.is_open() {
                    debug!("media ended");
                    self.state.is_playing = false;
                }
            }
            MediaEvent::Failed(reason) => {
                // No recovery: the overlay stays as it is.
                tracing::error!(%reason, "media playback failed");
            }
        }
    }

    /// Show controls and restart the hide countdown
    pub fn show_controls(&mut self, now: Instant) {
        if !self.is_open() {
            return;
        }
        self.state.controls_visible = true;
        self.auto_hide.arm(now);
    }

    /// Advance timers. Returns `true` if the controls were hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.auto_hide.fire(now) && self.state.controls_visible {
            self.state.controls_visible = false;
            return true;
        }
        false
    }

    pub fn fullscreen(&mut self) {
        if self.is_open() {
            self.send(MediaCommand::Fullscreen);
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    /// Player shortcuts. While open every key is consumed; while closed none is.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if !self.is_open() {
            return false;
        }

        match key.code {
            KeyCode::Esc => {
                self.close();
                return true;
            }
            KeyCode::Char(' ') => self.toggle_play(),
            KeyCode::Char('m') => self.toggle_mute(),
            KeyCode::Left => self.seek_by(-self.seek_step),
            KeyCode::Right => self.seek_by(self.seek_step),
            KeyCode::Up => self.set_volume(step_volume(self.state.volume, VOLUME_STEP)),
            KeyCode::Down => self.set_volume(step_volume(self.state.volume, -VOLUME_STEP)),
            KeyCode::Char('f') => self.fullscreen(),
            _ => {}
        }
        self.show_controls(now);
        true
    }
}

/// Step volume and snap to hundredths so repeated steps do not drift
fn step_volume(volume: f32, step: f32) -> f32 {
    ((volume + step) * 100.0).round() / 100.0
}
