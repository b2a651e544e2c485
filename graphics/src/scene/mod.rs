//! Cameras and per-frame camera notifications.
//!
//! - [`Camera`] - A color target plus a [`CameraType`] category
//! - [`CameraEvents`] - Hub notified once per camera per frame
//! - [`Subscription`] - Scoped listener registration
//! - [`CameraFrame`] - What a listener receives: the camera and its pass queue

mod camera;
mod events;

pub use camera::{Camera, CameraType};
pub use events::{CameraEvents, CameraFrame, Subscription};
