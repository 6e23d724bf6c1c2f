//! Shared media acquisition
//!
//! Enumerate (unless the request names its devices), request a stream, then
//! hand the answer to the context for broadcast. There is no timeout and no
//! cancellation: once spawned, the chain runs until the platform answers.

use crate::constraints::CaptureRequest;
use crate::context::{AcquisitionEvent, MediaContext};
use crate::device::select_sources;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub(crate) async fn acquire(context: MediaContext, request: CaptureRequest) {
    let platform = Arc::clone(context.platform());

    let sources = match request.explicit_sources() {
        Some(sources) => {
            debug!("Using configured capture devices {:?}", sources);
            sources
        }
        None => match platform.enumerate_devices().await {
            Ok(devices) => {
                let sources = select_sources(&devices);
                debug!(
                    "Enumerated {} devices, selected {:?}",
                    devices.len(),
                    sources
                );
                sources
            }
            Err(error) => {
                warn!("{}", error);
                context.emit(AcquisitionEvent::EnumerationFailed { error });
                return;
            }
        },
    };

    let constraints = request.constraints(sources);
    info!(
        "📷 Requesting media access (video: {:?}, audio: {:?})",
        constraints.video.device_id,
        constraints.audio.as_ref().map(|audio| &audio.device_id)
    );
    context.emit(AcquisitionEvent::Requested {
        constraints: constraints.clone(),
    });

    let result = platform.get_user_media(constraints).await;
    context.resolve(result);
}
