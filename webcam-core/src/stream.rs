//! Shared stream handle and its tracks

use crate::device::DeviceKind;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A single platform track inside a [`MediaStream`]
pub trait MediaTrack: Send + Sync + fmt::Debug {
    /// Track ID
    fn id(&self) -> &str;

    /// Whether this is an audio or video track
    fn kind(&self) -> DeviceKind;

    /// Stop the track and release the underlying device
    fn stop(&self);

    /// Whether [`MediaTrack::stop`] has been called
    fn is_stopped(&self) -> bool;
}

/// Stream granted by the platform.
///
/// Shared as `Arc<MediaStream>` by every mounted instance. Either track group
/// may be absent when the platform does not report it.
#[derive(Debug)]
pub struct MediaStream {
    id: String,
    video_tracks: Option<Vec<Arc<dyn MediaTrack>>>,
    audio_tracks: Option<Vec<Arc<dyn MediaTrack>>>,
}

impl MediaStream {
    /// Create a stream with no track groups
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            video_tracks: None,
            audio_tracks: None,
        }
    }

    /// Attach the video track group
    pub fn with_video_tracks(mut self, tracks: Vec<Arc<dyn MediaTrack>>) -> Self {
        self.video_tracks = Some(tracks);
        self
    }

    /// Attach the audio track group
    pub fn with_audio_tracks(mut self, tracks: Vec<Arc<dyn MediaTrack>>) -> Self {
        self.audio_tracks = Some(tracks);
        self
    }

    /// Get stream ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Video tracks, if the platform reported the group
    pub fn video_tracks(&self) -> Option<&[Arc<dyn MediaTrack>]> {
        self.video_tracks.as_deref()
    }

    /// Audio tracks, if the platform reported the group
    pub fn audio_tracks(&self) -> Option<&[Arc<dyn MediaTrack>]> {
        self.audio_tracks.as_deref()
    }

    /// Every track in the stream, video first
    pub fn tracks(&self) -> impl Iterator<Item = &Arc<dyn MediaTrack>> {
        self.video_tracks
            .iter()
            .flatten()
            .chain(self.audio_tracks.iter().flatten())
    }

    /// Stop video and audio tracks independently.
    ///
    /// Returns the number of tracks stopped.
    pub fn stop_all(&self) -> usize {
        let mut stopped = 0;

        for track in self.video_tracks.iter().flatten() {
            track.stop();
            stopped += 1;
        }
        for track in self.audio_tracks.iter().flatten() {
            track.stop();
            stopped += 1;
        }

        debug!("Stopped {} tracks of stream {}", stopped, self.id);
        stopped
    }

    /// Whether every track has been stopped
    pub fn is_stopped(&self) -> bool {
        self.tracks().all(|track| track.is_stopped())
    }
}

/// Displayable URI bound to a stream (an object URL on web platforms)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayHandle(String);

impl DisplayHandle {
    /// Wrap a platform URI
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Get the URI
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
