//! Verlet particles: point masses with a position history.

use crate::vec::Vec;

/// A point mass with Verlet state. Velocity is implicit: `pos - last_pos`.
#[derive(Clone, Copy, Debug)]
pub struct Particle<V: Vec> {
    pub pos: V,
    pub last_pos: V,
    pub acceleration: V,
    pub mass: V::Scalar,
    /// Static particles never have their position advanced or corrected.
    pub is_static: bool,
}

impl<V: Vec> Particle<V> {
    pub fn new(pos: V, mass: V::Scalar) -> Self {
        Particle {
            pos,
            last_pos: pos,
            acceleration: V::zero(),
            mass,
            is_static: false,
        }
    }

    /// An immovable anchor particle.
    pub fn fixed(pos: V, mass: V::Scalar) -> Self {
        Particle {
            pos,
            last_pos: pos,
            acceleration: V::zero(),
            mass,
            is_static: true,
        }
    }

    /// The implicit velocity accumulated since the last step.
    pub fn motion(&self) -> V {
        self.pos - self.last_pos
    }

    /// Rewrite the implicit velocity without touching the position.
    pub fn set_motion(&mut self, motion: V) {
        self.last_pos = self.pos - motion;
    }

    /// Teleport the particle, killing its implicit velocity.
    pub fn set_pos(&mut self, pos: V) {
        self.pos = pos;
        self.last_pos = pos;
    }

    /// Advance one Verlet step: `pos += motion + acceleration * dt^2`.
    ///
    /// Static particles do not move; their `last_pos` still snaps to `pos`
    /// so the implicit velocity stays zero.
    pub fn integrate(&mut self, dt: V::Scalar) {
        let prev = self.pos;
        if !self.is_static {
            self.pos = self.pos + self.motion() + self.acceleration.scale(dt * dt);
        }
        self.last_pos = prev;
    }
}
