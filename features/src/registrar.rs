//! Pass registration.
//!
//! A [`Registrar`] owns one [`Feature`] and the pass built from it. While
//! active it listens to a renderer's [`CameraEvents`] and, once per camera
//! per frame, enqueues the pass at the feature's injection point.
//!
//! Configuration is lazy: if no pass is retained when a frame begins, the
//! registrar builds one from the feature. A configuration failure skips the
//! frame; it is logged at `warn` the first time and at `debug` afterwards
//! until a configuration succeeds.

use std::sync::Arc;

use parking_lot::Mutex;
use prism_graphics::{Camera, CameraEvents, CameraFrame, InjectionPoint, RenderPass, Subscription};

use crate::error::ConfigError;

/// Settings that can produce a render pass.
pub trait Feature: Send + Sync + 'static {
    /// The pass this feature builds.
    type Pass: RenderPass + 'static;

    /// Name used in logs.
    fn name(&self) -> &str;

    /// Where on the frame timeline the pass records.
    fn injection_point(&self) -> InjectionPoint;

    /// Build the pass, failing if a required setting is missing.
    fn create_pass(&self) -> Result<Arc<Self::Pass>, ConfigError>;

    /// Whether the pass applies to `camera`. Defaults to primary cameras only.
    fn applies_to(&self, camera: &Camera) -> bool {
        camera.is_primary()
    }
}

struct RegistrarState<F: Feature> {
    feature: F,
    pass: Option<Arc<F::Pass>>,
    /// Consecutive failed configurations.
    failures: u64,
}

impl<F: Feature> RegistrarState<F> {
    fn configure(&mut self) -> Result<Arc<F::Pass>, ConfigError> {
        if let Some(pass) = &self.pass {
            return Ok(Arc::clone(pass));
        }
        match self.feature.create_pass() {
            Ok(pass) => {
                if self.failures > 0 {
                    log::info!(
                        "{}: configured after {} failed attempts",
                        self.feature.name(),
                        self.failures
                    );
                }
                self.failures = 0;
                self.pass = Some(Arc::clone(&pass));
                Ok(pass)
            }
            Err(e) => {
                if self.failures == 0 {
                    log::warn!("{}: {e}; pass skipped", self.feature.name());
                } else {
                    log::debug!("{}: {e}; pass skipped", self.feature.name());
                }
                self.failures += 1;
                Err(e)
            }
        }
    }
}

fn frame_begin<F: Feature>(state: &Mutex<RegistrarState<F>>, frame: &mut CameraFrame<'_>) {
    let (pass, injection_point) = {
        let mut state = state.lock();
        let Ok(pass) = state.configure() else {
            return;
        };
        if !state.feature.applies_to(frame.camera) {
            log::trace!(
                "{}: camera '{}' ({:?}) not eligible",
                state.feature.name(),
                frame.camera.name,
                frame.camera.camera_type
            );
            return;
        }
        (pass, state.feature.injection_point())
    };
    frame.queue.enqueue(pass, injection_point);
}

/// Owns a feature's pass and its registration with a [`CameraEvents`] hub.
pub struct Registrar<F: Feature> {
    state: Arc<Mutex<RegistrarState<F>>>,
    subscription: Option<Subscription>,
}

impl<F: Feature> Registrar<F> {
    /// Create an inactive, unconfigured registrar.
    pub fn new(feature: F) -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistrarState {
                feature,
                pass: None,
                failures: 0,
            })),
            subscription: None,
        }
    }

    /// Build and retain the pass now instead of at the next frame.
    pub fn configure(&self) -> Result<Arc<F::Pass>, ConfigError> {
        self.state.lock().configure()
    }

    /// Check whether a pass is retained.
    pub fn is_configured(&self) -> bool {
        self.state.lock().pass.is_some()
    }

    /// Subscribe to `events`. Re-activating moves the subscription.
    pub fn activate(&mut self, events: &CameraEvents) {
        let state = Arc::clone(&self.state);
        self.subscription = Some(events.subscribe(move |frame| frame_begin(&state, frame)));
        log::debug!("{}: activated", self.state.lock().feature.name());
    }

    /// Unsubscribe and drop the retained pass.
    pub fn deactivate(&mut self) {
        if self.subscription.take().is_some() {
            let mut state = self.state.lock();
            state.pass = None;
            log::debug!("{}: deactivated", state.feature.name());
        }
    }

    /// Check whether the registrar is subscribed.
    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Modify the feature's settings. The retained pass is dropped so the
    /// next frame configures from the new settings.
    pub fn update_settings(&self, update: impl FnOnce(&mut F)) {
        let mut state = self.state.lock();
        update(&mut state.feature);
        state.pass = None;
        state.failures = 0;
    }

    /// Read the feature's settings.
    pub fn with_feature<R>(&self, read: impl FnOnce(&F) -> R) -> R {
        read(&self.state.lock().feature)
    }

    /// Contribute to one camera's frame: configure if needed, filter by
    /// camera, enqueue.
    pub fn on_frame_begin(&self, frame: &mut CameraFrame<'_>) {
        frame_begin(&self.state, frame);
    }
}

impl<F: Feature> std::fmt::Debug for Registrar<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Registrar")
            .field("feature", &state.feature.name())
            .field("configured", &state.pass.is_some())
            .field("active", &self.subscription.is_some())
            .finish()
    }
}
