//! Render descriptor for the live preview
//!
//! The component does not draw the preview itself. It describes a container
//! sized to the configured aspect ratio and a video element centered inside
//! it, which the host renders however it renders markup.

use crate::config::WebcamConfig;
use serde::Serialize;
use webcam_core::DisplayHandle;

/// Class of the outer container
pub const CONTAINER_CLASS: &str = "webcam__container";

/// Inline style declarations, in order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Style(Vec<(String, String)>);

impl Style {
    fn with(mut self, property: &str, value: impl Into<String>) -> Self {
        self.0.push((property.to_string(), value.into()));
        self
    }

    /// Value of a property
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Render as a CSS declaration list
    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Outer element that reserves the preview's space
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerView {
    /// Element class
    pub class_name: String,
    /// Inline style
    pub style: Style,
}

/// Video element bound to the shared stream
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoView {
    /// Start playing as soon as the source is set
    pub autoplay: bool,
    /// Display handle of the shared stream, if bound
    pub src: Option<String>,
    /// Mute playback
    pub muted: bool,
    /// Element class
    pub class_name: String,
    /// Inline style
    pub style: Style,
}

/// Full preview description for one instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebcamView {
    /// Outer container
    pub container: ContainerView,
    /// Video element
    pub video: VideoView,
}

impl WebcamView {
    /// Describe the preview for `config`, bound to `display_handle` if any
    pub fn new(config: &WebcamConfig, display_handle: Option<&DisplayHandle>) -> Self {
        let container = ContainerView {
            class_name: CONTAINER_CLASS.to_string(),
            style: Style::default()
                .with("width", "100%")
                .with("height", format!("{}%", 100.0 / config.aspect_ratio))
                .with("overflow", "hidden")
                .with("position", "relative"),
        };

        let transform = if config.mirrored {
            "translateX(-50%) scaleX(-1)"
        } else {
            "translateX(-50%)"
        };

        let video = VideoView {
            autoplay: true,
            src: display_handle.map(|handle| handle.as_str().to_string()),
            muted: config.muted,
            class_name: config.class_name.clone(),
            style: Style::default()
                .with("height", "100%")
                .with("left", "50%")
                .with("position", "absolute")
                .with("transform", transform),
        };

        Self { container, video }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_height_follows_aspect() {
        let view = WebcamView::new(&WebcamConfig::default().aspect_ratio(2.0), None);
        assert_eq!(view.container.class_name, "webcam__container");
        assert_eq!(view.container.style.get("height"), Some("50%"));
        assert_eq!(view.container.style.get("width"), Some("100%"));
        assert_eq!(
            view.container.style.to_css(),
            "width: 100%; height: 50%; overflow: hidden; position: relative;"
        );
    }

    #[test]
    fn test_video_mirroring() {
        let plain = WebcamView::new(&WebcamConfig::default(), None);
        assert_eq!(plain.video.style.get("transform"), Some("translateX(-50%)"));

        let mirrored = WebcamView::new(&WebcamConfig::default().mirrored(true), None);
        assert_eq!(
            mirrored.video.style.get("transform"),
            Some("translateX(-50%) scaleX(-1)")
        );
    }

    #[test]
    fn test_video_binding() {
        let handle = DisplayHandle::new("blob:test/1");
        let config = WebcamConfig::default().muted(true).class_name("cam");
        let view = WebcamView::new(&config, Some(&handle));

        assert!(view.video.autoplay);
        assert!(view.video.muted);
        assert_eq!(view.video.src.as_deref(), Some("blob:test/1"));
        assert_eq!(view.video.class_name, "cam");
    }

    #[test]
    fn test_serializes() {
        let view = WebcamView::new(&WebcamConfig::default(), None);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["video"]["autoplay"], true);
        assert_eq!(json["container"]["className"], "webcam__container");
    }
}
