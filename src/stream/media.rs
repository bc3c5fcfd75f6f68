//! Messages between the player controller and the media driver

/// Instruction for the external media player
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCommand {
    /// Start a new session, replacing any running one
    Load {
        url: String,
        title: String,
        /// 0.0 - 1.0, zero means muted
        volume: f32,
    },
    Play,
    Pause,
    /// Absolute position in seconds
    Seek(f64),
    /// 0.0 - 1.0
    SetVolume(f32),
    Fullscreen,
    /// Tear the session down. Always preceded by `Pause`.
    Stop,
}

/// Report from the external media player
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback position changed. Durations that are not known yet are 0.
    TimeUpdate { position: f64, duration: f64 },
    /// Reached the end of the trailer or the player exited
    Ended,
    /// The player could not be started or lost its connection
    Failed(String),
}
