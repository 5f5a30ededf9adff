//! Soft-body physics on Verlet particles, in 2D and 3D.
//!
//! `squish` simulates bodies built from point masses linked by plastic
//! distance constraints: links stretch, deform permanently past a yield
//! force, and break past a rupture ratio. Collision detection is swept
//! within each step — particles are tested against moving constraint edges
//! in 2D and face triangles in 3D — and a two-level listener protocol lets
//! the world or individual bodies veto and observe every contact.
//!
//! # Features
//!
//! - **Verlet integration**: Position-based dynamics with implicit velocity
//! - **Plastic constraints**: Yielding rest lengths and breakage per material
//! - **Swept collision**: Edge sweeps (2D) and ray-cast face triangles (3D)
//! - **Contact listeners**: Veto/observe hooks at world and body level
//! - **Shape definitions**: Describe a body once, stamp out instances
//! - **`no_std` compatible**: Works in embedded and WASM environments

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod material;
pub mod constraint;
pub mod body;
pub mod shape;
pub mod world;
pub mod contact;
pub mod listener;
pub mod collision;
pub mod solver;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec2, Vec3};
pub use particle::Particle;
pub use material::Material;
pub use constraint::{Constraint, Joint};
pub use body::{Body, Face};
pub use shape::ShapeDef;
pub use world::{ParticleRef, World};
pub use contact::{Contact, GeometryRef};
pub use listener::{ApproveAllListener, ContactListener};
pub use collision::CollideDispatch;
pub use solver::{Solver, DEFAULT_ITERATIONS};
pub use error::PhysicsError;
