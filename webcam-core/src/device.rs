//! Capture device descriptions and source selection

use std::fmt;

/// Kind of capture device reported by enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Microphone or other audio input
    Audio,
    /// Camera or other video input
    Video,
}

impl DeviceKind {
    /// Get the kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Audio => "audio",
            DeviceKind::Video => "video",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A capture device as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDeviceInfo {
    /// Device kind
    pub kind: DeviceKind,
    /// Platform device identifier
    pub device_id: String,
    /// Human readable label, when the platform exposes one
    pub label: Option<String>,
}

impl MediaDeviceInfo {
    /// Describe an audio input
    pub fn audio(device_id: impl Into<String>) -> Self {
        Self {
            kind: DeviceKind::Audio,
            device_id: device_id.into(),
            label: None,
        }
    }

    /// Describe a video input
    pub fn video(device_id: impl Into<String>) -> Self {
        Self {
            kind: DeviceKind::Video,
            device_id: device_id.into(),
            label: None,
        }
    }

    /// Attach a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Device ids picked from an enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedSources {
    /// First audio input found
    pub audio: Option<String>,
    /// First video input found
    pub video: Option<String>,
}

/// Pick the first audio and the first video device in enumeration order.
///
/// No ranking is applied; whichever device the platform lists first wins.
pub fn select_sources(devices: &[MediaDeviceInfo]) -> SelectedSources {
    let first_of = |kind: DeviceKind| {
        devices
            .iter()
            .find(|device| device.kind == kind)
            .map(|device| device.device_id.clone())
    };

    SelectedSources {
        audio: first_of(DeviceKind::Audio),
        video: first_of(DeviceKind::Video),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_first_of_each_kind() {
        let devices = vec![
            MediaDeviceInfo::video("cam-front").with_label("Front"),
            MediaDeviceInfo::audio("mic-1"),
            MediaDeviceInfo::video("cam-back"),
            MediaDeviceInfo::audio("mic-2"),
        ];

        let selected = select_sources(&devices);
        assert_eq!(selected.audio.as_deref(), Some("mic-1"));
        assert_eq!(selected.video.as_deref(), Some("cam-front"));
    }

    #[test]
    fn test_select_missing_kind() {
        let selected = select_sources(&[MediaDeviceInfo::video("cam")]);
        assert_eq!(selected.audio, None);
        assert_eq!(selected.video.as_deref(), Some("cam"));

        assert_eq!(select_sources(&[]), SelectedSources::default());
    }
}
