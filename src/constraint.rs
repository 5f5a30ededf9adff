//! Plastic distance constraints: elastic links that deform and break.

use crate::float::Float;
use crate::material::Material;
use crate::particle::Particle;
use crate::vec::Vec;
use crate::world::ParticleRef;

/// An elastic distance link between two particles.
///
/// Generic over the endpoint handle: body-owned constraints index into
/// their body's particle list (`usize`), world-owned joints address
/// particles across bodies (`ParticleRef`). The relaxation algorithm is
/// identical for both.
///
/// `length` is the mutable rest length; plastic yielding only ever grows
/// it. Once `broken` is set the constraint is skipped by relaxation and
/// collision but stays in storage so faces and renderers can inspect it.
#[derive(Clone, Copy, Debug)]
pub struct Constraint<F: Float, Ix = usize> {
    pub a: Ix,
    pub b: Ix,
    pub length: F,
    pub original_length: F,
    pub stiffness: F,
    pub deform_force: Option<F>,
    pub max_bending: Option<F>,
    pub broken: bool,
}

/// A world-owned constraint, relaxed like any other but never collided.
pub type Joint<F> = Constraint<F, ParticleRef>;

impl<F: Float, Ix> Constraint<F, Ix> {
    pub fn new(a: Ix, b: Ix, rest_length: F, material: Material<F>) -> Self {
        Constraint {
            a,
            b,
            length: rest_length,
            original_length: rest_length,
            stiffness: material.stiffness,
            deform_force: material.deform_force,
            max_bending: material.max_bending,
            broken: false,
        }
    }

    /// Rewrite the spring parameters; mass changes are applied by the
    /// owning body, which also knows the endpoints.
    pub fn change_material(&mut self, material: &Material<F>) {
        self.stiffness = material.stiffness;
        self.deform_force = material.deform_force;
        self.max_bending = material.max_bending;
    }

    /// One relaxation pass over this constraint.
    ///
    /// `iteration` is 1-based; the correction strength
    /// `1 - (1 - stiffness)^(1/iteration)` is strongest on the first pass
    /// and falls off on later ones, which keeps the relaxation from
    /// overshooting for stiffness below 1.
    ///
    /// The caller is expected to skip broken constraints; this routine may
    /// set `broken` itself when the rest length passes the rupture ratio.
    pub fn relax<V>(&mut self, iteration: usize, a: &mut Particle<V>, b: &mut Particle<V>)
    where
        V: Vec<Scalar = F>,
    {
        let eps = F::from_f32(1e-10);
        let mass_a = a.mass.max(F::zero());
        let mass_b = b.mass.max(F::zero());
        let mass_sum = mass_a + mass_b;

        let delta = b.pos - a.pos;
        let delta_length = delta.length();
        if delta_length.is_near_zero(eps) || mass_sum.is_near_zero(eps) {
            return;
        }
        let diff = (delta_length - self.length) / delta_length;

        // Axial force: both endpoints' momenta projected onto the
        // constraint axis, opposite signs for the opposite ends.
        let axis = delta.scale(F::one() / delta_length);
        let force = (a.motion().scale(mass_a).dot(axis) - b.motion().scale(mass_b).dot(axis)).abs();

        // Plastic yield: the rest length creeps toward the current length,
        // proportional to the overload ratio. Only while stretched, so the
        // rest length never shrinks.
        if let Some(yield_force) = self.deform_force {
            if force > yield_force && diff > F::zero() {
                self.length = self.length + diff * ((force - yield_force) / yield_force);
            }
        }
        if let Some(max_bending) = self.max_bending {
            if self.length > self.original_length * max_bending {
                self.broken = true;
            }
        }

        let stiffness_linear = F::one()
            - (F::one() - self.stiffness).powf(F::one() / F::from_f32(iteration as f32));
        let correction = diff * stiffness_linear;

        if !a.is_static {
            a.pos = a.pos + delta.scale((mass_b / mass_sum) * correction);
        }
        if !b.is_static {
            b.pos = b.pos - delta.scale((mass_a / mass_sum) * correction);
        }
    }
}

impl<F: Float> Constraint<F> {
    /// Build a body-local constraint whose rest length is the current
    /// distance between the two indexed particles.
    pub fn between<V>(a: usize, b: usize, particles: &[Particle<V>], material: Material<F>) -> Self
    where
        V: Vec<Scalar = F>,
    {
        let rest_length = particles[a].pos.distance(particles[b].pos);
        Constraint::new(a, b, rest_length, material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec2;

    fn pair(ax: f64, bx: f64) -> (Particle<Vec2<f64>>, Particle<Vec2<f64>>) {
        (
            Particle::new(Vec2::new(ax, 0.0), 1.0),
            Particle::new(Vec2::new(bx, 0.0), 1.0),
        )
    }

    #[test]
    fn full_stiffness_converges_in_one_pass() {
        let (mut a, mut b) = pair(0.0, 10.0);
        let mut c = Constraint::new(0, 1, 5.0, Material::elastic(1.0, 1.0));
        c.relax(1, &mut a, &mut b);
        assert!((a.pos.distance(b.pos) - 5.0).abs() < 1e-12);
        assert!((a.pos.x - 2.5).abs() < 1e-12);
        assert!((b.pos.x - 7.5).abs() < 1e-12);
    }

    #[test]
    fn equal_masses_split_correction_in_half() {
        let (mut a, mut b) = pair(0.0, 10.0);
        let mut c = Constraint::new(0, 1, 5.0, Material::elastic(1.0, 1.0));
        c.relax(1, &mut a, &mut b);
        // diff * delta = (5, 0); each endpoint takes exactly half.
        assert!((a.pos.x - 2.5).abs() < 1e-12);
        assert!(((10.0 - b.pos.x) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn heavier_endpoint_moves_less() {
        let mut a = Particle::new(Vec2::new(0.0, 0.0), 10.0);
        let mut b = Particle::new(Vec2::new(10.0, 0.0), 1.0);
        let mut c = Constraint::new(0, 1, 5.0, Material::elastic(1.0, 1.0));
        c.relax(1, &mut a, &mut b);
        assert!(a.pos.x < (10.0 - b.pos.x));
        assert!(a.pos.x > 0.0);
    }

    #[test]
    fn later_iterations_correct_less() {
        let material = Material::elastic(1.0, 0.75);
        let (mut a1, mut b1) = pair(0.0, 10.0);
        let mut c1 = Constraint::new(0, 1, 5.0, material);
        c1.relax(1, &mut a1, &mut b1);
        let first_pass = a1.pos.x;

        let (mut a3, mut b3) = pair(0.0, 10.0);
        let mut c3 = Constraint::new(0, 1, 5.0, material);
        c3.relax(3, &mut a3, &mut b3);
        assert!(a3.pos.x < first_pass);
    }

    #[test]
    fn plastic_yield_grows_rest_length() {
        let (mut a, mut b) = pair(0.0, 10.0);
        // Fast-moving endpoint B: motion (1, 0), so the axial force is 1.
        b.last_pos = Vec2::new(9.0, 0.0);
        let material = Material::new(1.0, 0.0, Some(0.25), None);
        let mut c = Constraint::new(0, 1, 5.0, material);
        c.relax(1, &mut a, &mut b);
        // diff = 0.5, overload ratio = (1 - 0.25) / 0.25 = 3.
        assert!((c.length - 6.5).abs() < 1e-12);
        assert!(!c.broken);
    }

    #[test]
    fn compressed_overload_never_shrinks_rest_length() {
        let (mut a, mut b) = pair(0.0, 3.0);
        b.last_pos = Vec2::new(2.0, 0.0);
        let material = Material::new(1.0, 0.0, Some(0.25), None);
        let mut c = Constraint::new(0, 1, 5.0, material);
        c.relax(1, &mut a, &mut b);
        assert!((c.length - 5.0).abs() < 1e-12);
    }

    #[test]
    fn rupture_past_max_bending() {
        let (mut a, mut b) = pair(0.0, 10.0);
        let material = Material::new(1.0, 1.0, None, Some(1.4));
        let mut c = Constraint::new(0, 1, 5.0, material);
        c.length = 7.5; // past 5.0 * 1.4
        c.relax(1, &mut a, &mut b);
        assert!(c.broken);
    }

    #[test]
    fn static_endpoint_takes_no_correction() {
        let mut a = Particle::fixed(Vec2::new(0.0, 0.0), 1.0);
        let mut b = Particle::new(Vec2::new(10.0, 0.0), 1.0);
        let mut c = Constraint::new(0, 1, 5.0, Material::elastic(1.0, 1.0));
        c.relax(1, &mut a, &mut b);
        assert_eq!(a.pos, Vec2::new(0.0, 0.0));
        // B still only takes its own mass-weighted half.
        assert!((b.pos.x - 7.5).abs() < 1e-12);
    }

    #[test]
    fn degenerate_span_is_skipped() {
        let (mut a, mut b) = pair(4.0, 4.0);
        let mut c = Constraint::new(0, 1, 5.0, Material::elastic(1.0, 1.0));
        c.relax(1, &mut a, &mut b);
        assert_eq!(a.pos, b.pos);
    }
}
