//! Unit tests for still-frame capture
//!
//! This module contains tests for surface geometry, mirroring and the
//! encoded output of the capture pipeline.

use tokio_test::assert_ok;
use webcam_media::*;

/// Frame whose red channel encodes the column and green channel the row
fn gradient_frame(width: u32, height: u32) -> VideoFrame {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[x as u8, y as u8, 128, 255]);
        }
    }
    VideoFrame::new(width, height, data, 0)
}

// ============================================================================
// MIRRORING TESTS
// ============================================================================

#[test]
fn test_mirrored_capture_is_horizontal_reflection() {
    let element = LiveVideoElement::new(160.0);
    element.push_frame(gradient_frame(160, 90));

    let mut plain = assert_ok!(FrameCapture::new(CaptureSettings::default()));
    let mut mirrored = assert_ok!(FrameCapture::new(CaptureSettings {
        mirrored: true,
        ..CaptureSettings::default()
    }));

    let plain = assert_ok!(plain.draw(&element)).clone();
    let mirrored = assert_ok!(mirrored.draw(&element)).clone();

    assert_eq!(plain.width(), mirrored.width());
    let width = plain.width();
    for y in 0..plain.height() {
        for x in 0..width {
            assert_eq!(
                plain.pixel(x, y),
                mirrored.pixel(width - 1 - x, y),
                "pixel ({}, {}) is not reflected",
                x,
                y
            );
        }
    }
}

#[test]
fn test_mirrored_capture_with_side_bands() {
    // 4:3 video on a 16:9 surface, so the drawn rect is centered with bands
    let element = LiveVideoElement::new(64.0);
    element.push_frame(gradient_frame(48, 36));

    let mut plain = assert_ok!(FrameCapture::new(CaptureSettings::default()));
    let mut mirrored = assert_ok!(FrameCapture::new(CaptureSettings {
        mirrored: true,
        ..CaptureSettings::default()
    }));

    let plain = assert_ok!(plain.draw(&element)).clone();
    let mirrored = assert_ok!(mirrored.draw(&element)).clone();

    let width = plain.width();
    for y in 0..plain.height() {
        for x in 0..width {
            assert_eq!(plain.pixel(x, y), mirrored.pixel(width - 1 - x, y));
        }
    }
    // Bands stay transparent
    assert_eq!(plain.pixel(0, 0).map(|p| p[3]), Some(0));
}

// ============================================================================
// GEOMETRY TESTS
// ============================================================================

#[test]
fn test_landscape_capture_centers_horizontally() {
    let element = LiveVideoElement::new(640.0);
    element.push_frame(VideoFrame::solid(640, 480, [0, 0, 255, 255]));

    let mut capture = assert_ok!(FrameCapture::new(CaptureSettings::default()));
    assert_ok!(capture.draw(&element));

    let canvas = capture.canvas().unwrap();
    let rect = capture.draw_rect().unwrap();
    assert_eq!(rect.height, canvas.height() as f64);
    assert_eq!(rect.x, (canvas.width() as f64 - rect.width) / 2.0);
    assert_eq!(rect.y, 0.0);
}

#[test]
fn test_portrait_capture_centers_vertically() {
    let element = LiveVideoElement::new(300.0);
    element.push_frame(VideoFrame::solid(640, 480, [0, 0, 255, 255]));

    let settings = CaptureSettings {
        aspect_ratio: 3.0 / 4.0,
        ..CaptureSettings::default()
    };
    let mut capture = assert_ok!(FrameCapture::new(settings));
    assert_ok!(capture.draw(&element));

    let canvas = capture.canvas().unwrap();
    let rect = capture.draw_rect().unwrap();
    assert_eq!((canvas.width(), canvas.height()), (300, 400));
    assert_eq!(rect.width, 300.0);
    assert_eq!(rect.x, 0.0);
    assert_eq!(rect.y, (400.0 - rect.height) / 2.0);

    // Above and below the rect nothing is drawn
    assert_eq!(canvas.pixel(150, 0).map(|p| p[3]), Some(0));
    assert_eq!(canvas.pixel(150, 200), Some([0, 0, 255, 255]));
}

#[test]
fn test_high_density_surface() {
    let element = LiveVideoElement::new(320.0).with_device_pixel_ratio(3.0);
    element.push_frame(VideoFrame::solid(1280, 720, [1, 2, 3, 255]));

    let mut capture = assert_ok!(FrameCapture::new(CaptureSettings::default()));
    let canvas = assert_ok!(capture.draw(&element));

    assert_eq!((canvas.width(), canvas.height()), (960, 540));
}

// ============================================================================
// ENCODING TESTS
// ============================================================================

#[test]
fn test_screenshot_round_trips_pixels() {
    let element = LiveVideoElement::new(32.0);
    element.push_frame(VideoFrame::solid(32, 32, [200, 100, 50, 255]));

    let settings = CaptureSettings {
        aspect_ratio: 1.0,
        format: ScreenshotFormat::Png,
        ..CaptureSettings::default()
    };
    let mut capture = assert_ok!(FrameCapture::new(settings));
    let url = assert_ok!(capture.screenshot(&element));

    let payload = url.strip_prefix("data:image/png;base64,").unwrap();
    let bytes = {
        use base64::Engine;
        assert_ok!(base64::engine::general_purpose::STANDARD.decode(payload))
    };
    let decoded = assert_ok!(image::load_from_memory(&bytes)).to_rgba8();

    assert_eq!(decoded.dimensions(), (32, 32));
    assert_eq!(decoded.get_pixel(16, 16).0, [200, 100, 50, 255]);
}

#[test]
fn test_capture_without_frame_fails() {
    let element = LiveVideoElement::new(320.0);
    let mut capture = assert_ok!(FrameCapture::new(CaptureSettings::default()));

    match capture.screenshot(&element) {
        Err(MediaError::InvalidState { .. }) => {}
        other => panic!("unexpected result {:?}", other),
    }
}
