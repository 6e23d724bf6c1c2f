//! Shared camera demo
//!
//! Mounts two previews on a scripted platform, takes a mirrored screenshot
//! and shows the camera being released only when the last preview unmounts.
//!
//! Run with `RUST_LOG=debug` to see the acquisition steps.

use std::sync::Arc;
use webcam::{
    AcquisitionEvent, LiveVideoElement, MediaContext, MediaTrack, MockMediaPlatform, ScreenshotFormat,
    VideoFrame, Webcam, WebcamConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    webcam::logging::init_logging();

    println!("🎥 Shared Camera Demo");
    println!("=====================");

    // Hold the request open to mimic a pending permission prompt
    let platform = Arc::new(MockMediaPlatform::new().held());
    let context = MediaContext::new(platform.clone())?;
    let mut events = context.subscribe();

    let main_preview = Webcam::new(
        &context,
        WebcamConfig::default()
            .audio(false)
            .mirrored(true)
            .screenshot_format(ScreenshotFormat::Png)
            .on_user_media(|| println!("   ✅ main preview is live")),
    )?;
    let thumbnail = Webcam::new(
        &context,
        WebcamConfig::default()
            .aspect_ratio(1.0)
            .class_name("thumbnail")
            .on_user_media(|| println!("   ✅ thumbnail is live")),
    )?;

    println!("\n📷 Mounting both previews...");
    let acquisition = main_preview.mount();
    thumbnail.mount();
    println!("   Platform requests so far: {}", platform.request_count());

    println!("\n🔓 Granting camera access...");
    platform.release_requests();
    if let Some(acquisition) = acquisition {
        acquisition.await?;
    }
    println!("   Platform requests issued: {}", platform.request_count());

    let element = Arc::new(LiveVideoElement::new(320.0).with_device_pixel_ratio(2.0));
    element.push_frame(VideoFrame::solid(1280, 720, [32, 96, 160, 255]));
    main_preview.attach_video_element(element);

    if let Some(url) = main_preview.get_screenshot()? {
        println!("\n📸 Screenshot: {}... ({} bytes)", &url[..40.min(url.len())], url.len());
    }
    println!("   Thumbnail view: {}", thumbnail.view().container.style.to_css());

    println!("\n👋 Unmounting the main preview");
    main_preview.unmount();
    println!(
        "   Tracks stopped: {}",
        platform.tracks().iter().filter(|track| track.is_stopped()).count()
    );

    println!("👋 Unmounting the thumbnail");
    thumbnail.unmount();
    println!(
        "   Tracks stopped: {}",
        platform.tracks().iter().filter(|track| track.is_stopped()).count()
    );

    println!("\n📋 Events:");
    while let Ok(event) = events.try_recv() {
        match event {
            AcquisitionEvent::Granted { instances, .. } => {
                println!("   granted to {} instances", instances)
            }
            AcquisitionEvent::Released { tracks_stopped, .. } => {
                println!("   released, {} tracks stopped", tracks_stopped)
            }
            other => println!("   {:?}", other),
        }
    }

    Ok(())
}
