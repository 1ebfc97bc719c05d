//! # Viewer State
//!
//! The point the chunk streamer follows. The viewer carries a position and a
//! heading on the XZ plane and is advanced once per frame.
//!
//! With no input attached, the viewer wanders: each step nudges the heading by a
//! small random amount drawn from a seeded [`fastrand::Rng`], then moves forward
//! along it. The same seed always walks the same path.

use cgmath::{Point3, Rad};
use web_time::Duration;

/// Largest heading change per second while wandering.
const MAX_TURN_RATE: f32 = 1.5;

/// The tracked viewer.
#[derive(Debug, Clone)]
pub struct Viewer {
    /// World position
    position: Point3<f32>,
    /// Direction of travel on the XZ plane, measured from +X toward +Z
    heading: Rad<f32>,
    /// Source of wander steering
    rng: fastrand::Rng,
}

impl Viewer {
    /// Creates a viewer at `position` facing +X.
    ///
    /// # Arguments
    /// * `position` - Starting world position
    /// * `seed` - Seed for the wander path
    pub fn new(position: Point3<f32>, seed: u64) -> Self {
        Viewer {
            position,
            heading: Rad(0.0),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Current world position.
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Current heading.
    pub fn heading(&self) -> Rad<f32> {
        self.heading
    }

    /// Moves the viewer without touching its heading.
    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    /// Wanders for `dt` at `speed` blocks per second.
    ///
    /// # Arguments
    /// * `dt` - Time elapsed since the last step
    /// * `speed` - Forward speed in blocks per second
    ///
    /// # Returns
    /// The new position
    pub fn advance(&mut self, dt: Duration, speed: f32) -> Point3<f32> {
        let secs = dt.as_secs_f32();
        let steer = (self.rng.f32() * 2.0 - 1.0) * MAX_TURN_RATE * secs;
        self.heading = Rad(self.heading.0 + steer);

        let distance = speed * secs;
        self.position.x += self.heading.0.cos() * distance;
        self.position.z += self.heading.0.sin() * distance;
        self.position
    }
}
