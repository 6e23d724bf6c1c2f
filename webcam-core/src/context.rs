//! Instance registry and shared stream coordination
//!
//! A [`MediaContext`] owns everything the mounted instances share: the
//! ordered registry, the in-flight flag that limits acquisition to one
//! platform request per resource epoch, and the outcome of that request.
//! A resource epoch runs from the first mount on an empty registry to the
//! release performed by the last unmount.
//!
//! Every check-then-act step (register and trigger, unregister and release)
//! happens under a single lock. Subscriber callbacks run after the lock is
//! dropped so they may call back into the context.

use crate::acquisition;
use crate::constraints::{CaptureRequest, MediaStreamConstraints};
use crate::error::{PlatformError, WebcamError, WebcamResult};
use crate::platform::MediaPlatform;
use crate::stream::{DisplayHandle, MediaStream};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identifier of a mounted component instance
pub type InstanceId = Uuid;

/// Result of the shared acquisition, as delivered to every instance
pub type AcquisitionOutcome = Result<Arc<MediaStream>, PlatformError>;

/// Receives the shared acquisition result
pub trait MediaSubscriber: Send + Sync {
    /// The platform granted a stream
    fn on_media_granted(&self, stream: Arc<MediaStream>);

    /// The platform refused or failed
    fn on_media_denied(&self, error: PlatformError);
}

/// Notifications about the shared stream
#[derive(Debug, Clone)]
pub enum AcquisitionEvent {
    /// A stream request was issued to the platform
    Requested {
        /// Constraints sent with the request
        constraints: MediaStreamConstraints,
    },
    /// Enumeration failed; this attempt was abandoned
    EnumerationFailed {
        /// Error reported by the platform
        error: PlatformError,
    },
    /// A stream was granted and broadcast
    Granted {
        /// Stream ID
        stream_id: String,
        /// Number of instances it was delivered to
        instances: usize,
    },
    /// The request failed and the error was broadcast
    Denied {
        /// Error reported by the platform
        error: PlatformError,
        /// Number of instances it was delivered to
        instances: usize,
    },
    /// The last instance unmounted and the stream was stopped
    Released {
        /// Stream ID
        stream_id: String,
        /// Number of tracks stopped
        tracks_stopped: usize,
    },
    /// A stream arrived after every instance had unmounted and was stopped
    Orphaned {
        /// Stream ID
        stream_id: String,
    },
}

/// What happened when an instance was registered
#[derive(Debug)]
pub enum Registration {
    /// The platform has no capture API; the instance stays inert
    Inert,
    /// The instance was already registered
    AlreadyMounted,
    /// This registration started the shared acquisition.
    ///
    /// Dropping the handle does not cancel the request.
    Acquiring(JoinHandle<()>),
    /// An acquisition is in flight; its result will be delivered
    Pending,
    /// The epoch already has a result; the caller applies it
    Resolved(AcquisitionOutcome),
}

struct RegistryState {
    instances: Vec<(InstanceId, Arc<dyn MediaSubscriber>)>,
    request_in_flight: bool,
    outcome: Option<AcquisitionOutcome>,
}

impl RegistryState {
    /// Claim the acquisition for this epoch, if nobody has
    fn claim(&mut self) -> bool {
        if self.request_in_flight || self.outcome.is_some() {
            return false;
        }
        self.request_in_flight = true;
        true
    }
}

struct ContextInner {
    platform: Arc<dyn MediaPlatform>,
    runtime: Handle,
    state: Mutex<RegistryState>,
    events: broadcast::Sender<AcquisitionEvent>,
}

/// Shared registry and acquisition coordinator.
///
/// Cloning is cheap; clones share the same registry.
#[derive(Clone)]
pub struct MediaContext {
    inner: Arc<ContextInner>,
}

impl MediaContext {
    /// Create a context that spawns acquisitions on the current Tokio runtime
    ///
    /// # Errors
    ///
    /// Returns [`WebcamError::Initialization`] when called outside a runtime.
    pub fn new(platform: Arc<dyn MediaPlatform>) -> WebcamResult<Self> {
        let runtime = Handle::try_current().map_err(|e| WebcamError::Initialization {
            reason: format!("No Tokio runtime available: {}", e),
        })?;

        Ok(Self::with_runtime(platform, runtime))
    }

    /// Create a context that spawns acquisitions on `runtime`
    pub fn with_runtime(platform: Arc<dyn MediaPlatform>, runtime: Handle) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(ContextInner {
                platform,
                runtime,
                state: Mutex::new(RegistryState {
                    instances: Vec::new(),
                    request_in_flight: false,
                    outcome: None,
                }),
                events,
            }),
        }
    }

    /// The platform this context delegates to
    pub fn platform(&self) -> &Arc<dyn MediaPlatform> {
        &self.inner.platform
    }

    /// Subscribe to acquisition events
    pub fn subscribe(&self) -> broadcast::Receiver<AcquisitionEvent> {
        self.inner.events.subscribe()
    }

    /// Number of registered instances
    pub fn mounted_count(&self) -> usize {
        self.inner.state.lock().instances.len()
    }

    /// Registered instance IDs, in mount order
    pub fn mounted_instances(&self) -> Vec<InstanceId> {
        self.inner
            .state
            .lock()
            .instances
            .iter()
            .map(|(id, _)| *id)
            .collect()
    }

    /// Whether `id` is registered
    pub fn is_registered(&self, id: InstanceId) -> bool {
        self.inner
            .state
            .lock()
            .instances
            .iter()
            .any(|(registered, _)| *registered == id)
    }

    /// Whether the epoch's request has been issued.
    ///
    /// Stays set after a failed request; only a release clears it.
    pub fn is_request_in_flight(&self) -> bool {
        self.inner.state.lock().request_in_flight
    }

    /// The live shared stream, if any
    pub fn current_stream(&self) -> Option<Arc<MediaStream>> {
        match &self.inner.state.lock().outcome {
            Some(Ok(stream)) => Some(Arc::clone(stream)),
            _ => None,
        }
    }

    /// Add an instance to the registry and trigger acquisition if it is the
    /// first to need a stream this epoch
    pub fn register(
        &self,
        id: InstanceId,
        subscriber: Arc<dyn MediaSubscriber>,
        request: &CaptureRequest,
    ) -> Registration {
        if !self.inner.platform.has_capture_api() {
            debug!("Platform has no capture API, instance {} stays inert", id);
            return Registration::Inert;
        }

        let mut state = self.inner.state.lock();
        if state.instances.iter().any(|(registered, _)| *registered == id) {
            return Registration::AlreadyMounted;
        }

        state.instances.push((id, subscriber));
        debug!(
            "Registered instance {} ({} mounted)",
            id,
            state.instances.len()
        );

        if let Some(outcome) = &state.outcome {
            return Registration::Resolved(outcome.clone());
        }

        if !state.claim() {
            return Registration::Pending;
        }
        drop(state);

        Registration::Acquiring(self.spawn_acquisition(request.clone()))
    }

    /// Issue the epoch's platform request unless one is in flight or
    /// already resolved
    pub fn request_access(&self, request: &CaptureRequest) -> Option<JoinHandle<()>> {
        if !self.inner.state.lock().claim() {
            debug!("Media access already requested this epoch");
            return None;
        }

        Some(self.spawn_acquisition(request.clone()))
    }

    /// Remove an instance from the registry.
    ///
    /// When the registry becomes empty and a stream is live, every track is
    /// stopped, the in-flight flag is cleared and `display_handle` is revoked.
    /// Returns whether the stream was released.
    pub fn unregister(&self, id: InstanceId, display_handle: Option<&DisplayHandle>) -> bool {
        let mut state = self.inner.state.lock();
        let before = state.instances.len();
        state.instances.retain(|(registered, _)| *registered != id);

        if state.instances.len() == before {
            return false;
        }

        if !state.instances.is_empty() {
            debug!(
                "Unregistered instance {} ({} still mounted)",
                id,
                state.instances.len()
            );
            return false;
        }

        let stream = match &state.outcome {
            Some(Ok(stream)) => Arc::clone(stream),
            _ => {
                debug!("Last instance {} unregistered without a live stream", id);
                return false;
            }
        };
        state.outcome = None;
        state.request_in_flight = false;
        drop(state);

        let tracks_stopped = stream.stop_all();
        if let Some(handle) = display_handle {
            self.inner.platform.revoke_display_handle(handle);
        }

        info!(
            "🛑 Released stream {} ({} tracks stopped)",
            stream.id(),
            tracks_stopped
        );
        self.emit(AcquisitionEvent::Released {
            stream_id: stream.id().to_string(),
            tracks_stopped,
        });

        true
    }

    /// Deliver the platform's answer to every registered instance
    pub(crate) fn resolve(&self, result: Result<MediaStream, PlatformError>) {
        match result {
            Ok(stream) => {
                let stream = Arc::new(stream);
                let mut state = self.inner.state.lock();

                if state.instances.is_empty() {
                    state.request_in_flight = false;
                    drop(state);

                    warn!(
                        "Stream {} granted after every instance unmounted, stopping it",
                        stream.id()
                    );
                    stream.stop_all();
                    self.emit(AcquisitionEvent::Orphaned {
                        stream_id: stream.id().to_string(),
                    });
                    return;
                }

                state.outcome = Some(Ok(Arc::clone(&stream)));
                let subscribers = Self::subscribers(&state);
                drop(state);

                info!(
                    "📷 Stream {} granted to {} instances",
                    stream.id(),
                    subscribers.len()
                );
                self.emit(AcquisitionEvent::Granted {
                    stream_id: stream.id().to_string(),
                    instances: subscribers.len(),
                });

                for subscriber in subscribers {
                    subscriber.on_media_granted(Arc::clone(&stream));
                }
            }
            Err(error) => {
                let mut state = self.inner.state.lock();
                state.outcome = Some(Err(error.clone()));
                let subscribers = Self::subscribers(&state);
                drop(state);

                warn!(
                    "Media access failed ({}), notifying {} instances",
                    error,
                    subscribers.len()
                );
                self.emit(AcquisitionEvent::Denied {
                    error: error.clone(),
                    instances: subscribers.len(),
                });

                for subscriber in subscribers {
                    subscriber.on_media_denied(error.clone());
                }
            }
        }
    }

    pub(crate) fn emit(&self, event: AcquisitionEvent) {
        // No receivers is fine
        let _ = self.inner.events.send(event);
    }

    fn subscribers(state: &RegistryState) -> Vec<Arc<dyn MediaSubscriber>> {
        state
            .instances
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect()
    }

    fn spawn_acquisition(&self, request: CaptureRequest) -> JoinHandle<()> {
        self.inner
            .runtime
            .spawn(acquisition::acquire(self.clone(), request))
    }
}

impl fmt::Debug for MediaContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("MediaContext")
            .field("platform", &self.inner.platform)
            .field("mounted", &state.instances.len())
            .field("request_in_flight", &state.request_in_flight)
            .field("resolved", &state.outcome.is_some())
            .finish()
    }
}
