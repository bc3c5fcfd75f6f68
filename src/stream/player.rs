//! Local Player - external mpv/VLC process driving trailer playback
//!
//! The TUI never plays media itself. [`MediaDriver`] owns at most one player
//! process and translates [`MediaCommand`]s into whatever the player
//! understands. mpv is controlled over its JSON IPC socket and reports
//! position back; VLC can only be started and stopped.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::process::{Child, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::media::{MediaCommand, MediaEvent};

/// How long a player gets to exit after being asked to quit
const QUIT_GRACE: Duration = Duration::from_secs(2);

/// Attempts (100ms apart) to reach the mpv socket after spawning
const IPC_CONNECT_ATTEMPTS: u32 = 50;

/// Supported local players
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    /// mpv media player (default, full remote control)
    #[default]
    Mpv,
    /// VLC media player (start/stop only)
    Vlc,
    /// No external player; commands are only logged
    None,
}

impl PlayerType {
    /// Get the command name for this player
    pub fn command(&self) -> &'static str {
        match self {
            PlayerType::Vlc => {
                // On macOS, VLC is an app bundle - check for it
                #[cfg(target_os = "macos")]
                if std::path::Path::new("/Applications/VLC.app").exists() {
                    return "/Applications/VLC.app/Contents/MacOS/VLC";
                }
                "vlc"
            }
            PlayerType::Mpv => "mpv",
            PlayerType::None => "",
        }
    }

    /// Get a display name for this player
    pub fn display_name(&self) -> &'static str {
        match self {
            PlayerType::Vlc => "VLC",
            PlayerType::Mpv => "mpv",
            PlayerType::None => "none",
        }
    }

    /// Parse a config/env value
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mpv" => Some(PlayerType::Mpv),
            "vlc" => Some(PlayerType::Vlc),
            "none" | "off" => Some(PlayerType::None),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Errors from local player operations
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to start player: {0}")]
    StartFailed(#[from] std::io::Error),
    #[error("No player configured")]
    Disabled,
    #[error("Player control socket unavailable: {0}")]
    IpcUnavailable(String),
}

/// Launches the configured player binary
#[derive(Debug, Clone, Copy)]
pub struct LocalPlayer {
    player_type: PlayerType,
}

impl LocalPlayer {
    /// Create a new local player with the specified type
    pub fn new(player_type: PlayerType) -> Self {
        Self { player_type }
    }

    /// Get the player type
    pub fn player_type(&self) -> PlayerType {
        self.player_type
    }

    /// Check if the player is available on the system
    pub async fn is_available(&self) -> bool {
        let cmd = self.player_type.command();
        if cmd.is_empty() {
            return false;
        }

        // If it's a full path (macOS app bundle), check if it exists
        if cmd.starts_with('/') {
            return std::path::Path::new(cmd).exists();
        }

        // Otherwise use 'which' to find in PATH
        Command::new("which")
            .arg(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Build the player command line.
    ///
    /// `ipc_socket` is only honoured by mpv.
    fn command_for(&self, url: &str, title: &str, volume: f32, ipc_socket: Option<&Path>) -> Command {
        let mut cmd = Command::new(self.player_type.command());
        let percent = (volume.clamp(0.0, 1.0) * 100.0).round() as u32;

        match self.player_type {
            PlayerType::Vlc => {
                cmd.arg(url);
                cmd.arg("--no-video-title-show"); // Don't show filename overlay
                cmd.arg(format!("--meta-title={}", title));
                // VLC's gain is 0-2 with 1 as unity
                cmd.arg(format!("--gain={:.2}", volume.clamp(0.0, 1.0)));
            }
            PlayerType::Mpv => {
                cmd.arg(url);
                cmd.arg("--force-window=immediate"); // Show window immediately
                cmd.arg("--keep-open=yes"); // Stay on the last frame so eof is observable
                cmd.arg(format!("--title={}", title));
                cmd.arg(format!("--volume={}", percent));
                if let Some(socket) = ipc_socket {
                    cmd.arg(format!("--input-ipc-server={}", socket.display()));
                }
            }
            PlayerType::None => {}
        }

        // Don't capture output - the TUI owns the terminal
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());
        cmd.kill_on_drop(true);
        cmd
    }

    /// Spawn the player for `url`
    pub fn spawn(
        &self,
        url: &str,
        title: &str,
        volume: f32,
        ipc_socket: Option<&Path>,
    ) -> Result<Child, PlayerError> {
        if self.player_type == PlayerType::None {
            return Err(PlayerError::Disabled);
        }

        self.command_for(url, title, volume, ipc_socket)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PlayerError::NotFound(self.player_type.command().to_string())
                } else {
                    PlayerError::StartFailed(e)
                }
            })
    }

    /// Play a trailer and wait for the player to close
    pub async fn play_and_wait(&self, url: &str, title: &str) -> Result<(), PlayerError> {
        let mut child = self.spawn(url, title, 1.0, None)?;
        let status = child.wait().await?;
        debug!(?status, "player exited");
        Ok(())
    }
}

// =============================================================================
// Media driver
// =============================================================================

/// Handle to a running player session
struct SessionHandle {
    id: u64,
    commands: UnboundedSender<MediaCommand>,
}

/// Background task turning [`MediaCommand`]s into player processes
pub struct MediaDriver {
    player: LocalPlayer,
    commands: UnboundedReceiver<MediaCommand>,
    events: UnboundedSender<MediaEvent>,
    session: Option<SessionHandle>,
    next_id: u64,
}

impl MediaDriver {
    pub fn new(
        player: LocalPlayer,
        commands: UnboundedReceiver<MediaCommand>,
        events: UnboundedSender<MediaEvent>,
    ) -> Self {
        Self {
            player,
            commands,
            events,
            session: None,
            next_id: 0,
        }
    }

    /// Run on the current runtime until the command channel closes
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        let (session_tx, mut session_rx) = mpsc::unbounded_channel::<(u64, MediaEvent)>();
        info!(player = %self.player.player_type(), "media driver started");

        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => self.handle(cmd, &session_tx),
                    None => break,
                },
                Some((id, event)) = session_rx.recv() => {
                    // Events from a replaced session are stale
                    if self.session.as_ref().map(|s| s.id) == Some(id) {
                        let _ = self.events.send(event);
                    }
                }
            }
        }

        self.stop_session();
        debug!("media driver stopped");
    }

    fn handle(&mut self, cmd: MediaCommand, session_tx: &UnboundedSender<(u64, MediaEvent)>) {
        match cmd {
            MediaCommand::Load { url, title, volume } => {
                self.stop_session();
                if self.player.player_type() == PlayerType::None {
                    info!(%url, "no player configured, not playing");
                    return;
                }
                self.start_session(&url, &title, volume, session_tx.clone());
            }
            MediaCommand::Stop => self.stop_session(),
            other => match &self.session {
                Some(session) => {
                    let _ = session.commands.send(other);
                }
                None => debug!(command = ?other, "no player session, dropping command"),
            },
        }
    }

    fn start_session(
        &mut self,
        url: &str,
        title: &str,
        volume: f32,
        events: UnboundedSender<(u64, MediaEvent)>,
    ) {
        self.next_id += 1;
        let id = self.next_id;
        let socket = ipc_socket_path(id);
        let ipc = (self.player.player_type() == PlayerType::Mpv).then_some(socket.as_path());

        let child = match self.player.spawn(url, title, volume, ipc) {
            Ok(child) => child,
            Err(e) => {
                warn!(error = %e, "could not start player");
                let _ = self.events.send(MediaEvent::Failed(e.to_string()));
                return;
            }
        };
        info!(session = id, player = %self.player.player_type(), %url, "player started");

        let (tx, rx) = mpsc::unbounded_channel();
        match self.player.player_type() {
            PlayerType::Mpv => {
                tokio::spawn(run_mpv_session(id, child, socket, rx, events));
            }
            _ => {
                tokio::spawn(run_plain_session(id, child, rx, events));
            }
        }
        self.session = Some(SessionHandle { id, commands: tx });
    }

    fn stop_session(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(session = session.id, "stopping player session");
            let _ = session.commands.send(MediaCommand::Stop);
        }
    }
}

fn ipc_socket_path(session: u64) -> PathBuf {
    std::env::temp_dir().join(format!("marquee-mpv-{}-{}.sock", std::process::id(), session))
}

/// Kill a player that has no way (or no will) to quit on request
async fn shut_down(child: &mut Child) {
    if let Err(e) = child.kill().await {
        debug!(error = %e, "player already gone");
    }
}

/// Session for players without remote control: only stop is honoured
async fn run_plain_session(
    id: u64,
    mut child: Child,
    mut commands: UnboundedReceiver<MediaCommand>,
    events: UnboundedSender<(u64, MediaEvent)>,
) {
    loop {
        tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(MediaCommand::Stop) | None => {
                    shut_down(&mut child).await;
                    break;
                }
                Some(other) => debug!(command = ?other, "player has no remote control"),
            },
            status = child.wait() => {
                debug!(?status, "player exited");
                let _ = events.send((id, MediaEvent::Ended));
                break;
            }
        }
    }
}

// =============================================================================
// mpv JSON IPC
// =============================================================================

/// Observed property ids
const OBSERVE_TIME_POS: u64 = 1;
const OBSERVE_DURATION: u64 = 2;
const OBSERVE_EOF: u64 = 3;

/// A message read from mpv's socket. Replies to our requests are ignored.
#[derive(Debug, Deserialize)]
struct IpcMessage {
    event: Option<String>,
    name: Option<String>,
    data: Option<serde_json::Value>,
}

/// Last known position/duration, combined into one `TimeUpdate`
#[derive(Debug, Default, Clone, Copy)]
pub struct IpcClock {
    position: f64,
    duration: f64,
}

/// Translate one line of mpv IPC output
pub fn parse_ipc_line(line: &str, clock: &mut IpcClock) -> Option<MediaEvent> {
    let msg: IpcMessage = serde_json::from_str(line).ok()?;
    if msg.event.as_deref() != Some("property-change") {
        return None;
    }

    let number = msg.data.as_ref().and_then(|d| d.as_f64());
    match msg.name.as_deref()? {
        "time-pos" => {
            clock.position = number?;
        }
        "duration" => {
            clock.duration = number.unwrap_or(0.0);
        }
        "eof-reached" => {
            return match msg.data.and_then(|d| d.as_bool()) {
                Some(true) => Some(MediaEvent::Ended),
                _ => None,
            };
        }
        _ => return None,
    }

    Some(MediaEvent::TimeUpdate {
        position: clock.position,
        duration: clock.duration,
    })
}

/// IPC request for a command, if mpv has one
pub fn ipc_request(cmd: &MediaCommand) -> Option<serde_json::Value> {
    use serde_json::json;

    let command = match cmd {
        MediaCommand::Play => json!(["set_property", "pause", false]),
        MediaCommand::Pause => json!(["set_property", "pause", true]),
        MediaCommand::Seek(t) => json!(["seek", t, "absolute"]),
        MediaCommand::SetVolume(v) => json!(["set_property", "volume", (v * 100.0).round()]),
        MediaCommand::Fullscreen => json!(["cycle", "fullscreen"]),
        MediaCommand::Stop => json!(["quit"]),
        MediaCommand::Load { .. } => return None,
    };
    Some(json!({ "command": command }))
}

#[cfg(unix)]
async fn connect_ipc(socket: &Path) -> Result<tokio::net::UnixStream, PlayerError> {
    let mut last_err = None;
    for _ in 0..IPC_CONNECT_ATTEMPTS {
        match tokio::net::UnixStream::connect(socket).await {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    Err(PlayerError::IpcUnavailable(
        last_err.map(|e| e.to_string()).unwrap_or_default(),
    ))
}

#[cfg(unix)]
async fn run_mpv_session(
    id: u64,
    mut child: Child,
    socket: PathBuf,
    mut commands: UnboundedReceiver<MediaCommand>,
    events: UnboundedSender<(u64, MediaEvent)>,
) {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    let stream = match connect_ipc(&socket).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!(error = %e, "mpv did not open its control socket");
            let _ = events.send((id, MediaEvent::Failed(e.to_string())));
            run_plain_session(id, child, commands, events).await;
            return;
        }
    };
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    for (obs, name) in [
        (OBSERVE_TIME_POS, "time-pos"),
        (OBSERVE_DURATION, "duration"),
        (OBSERVE_EOF, "eof-reached"),
    ] {
        let req = serde_json::json!({ "command": ["observe_property", obs, name] });
        if write.write_all(format!("{}\n", req).as_bytes()).await.is_err() {
            break;
        }
    }

    let mut clock = IpcClock::default();
    loop {
        tokio::select! {
            cmd = commands.recv() => {
                let cmd = cmd.unwrap_or(MediaCommand::Stop);
                let stop = cmd == MediaCommand::Stop;
                if let Some(req) = ipc_request(&cmd) {
                    if let Err(e) = write.write_all(format!("{}\n", req).as_bytes()).await {
                        debug!(error = %e, "mpv socket write failed");
                    }
                }
                if stop {
                    if tokio::time::timeout(QUIT_GRACE, child.wait()).await.is_err() {
                        shut_down(&mut child).await;
                    }
                    break;
                }
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Some(event) = parse_ipc_line(&line, &mut clock) {
                        let _ = events.send((id, event));
                    }
                }
                Ok(None) | Err(_) => {
                    // Socket closed: mpv quit on its own
                    let _ = child.wait().await;
                    let _ = events.send((id, MediaEvent::Ended));
                    break;
                }
            }
        }
    }

    let _ = tokio::fs::remove_file(&socket).await;
}

#[cfg(not(unix))]
async fn run_mpv_session(
    id: u64,
    child: Child,
    _socket: PathBuf,
    commands: UnboundedReceiver<MediaCommand>,
    events: UnboundedSender<(u64, MediaEvent)>,
) {
    run_plain_session(id, child, commands, events).await;
}
