use squish::{Body, Contact, ContactListener, Material, Particle, Solver, Vec2, World};
use std::cell::RefCell;
use std::rc::Rc;

const DT: f64 = 1.0 / 60.0;

type Log = Rc<RefCell<Vec<String>>>;

/// Logs every call and answers `begin_contact` with a fixed verdict.
struct Recorder {
    name: &'static str,
    approve: bool,
    log: Log,
}

impl Recorder {
    fn boxed(name: &'static str, approve: bool, log: &Log) -> Box<Self> {
        Box::new(Recorder { name, approve, log: Rc::clone(log) })
    }
}

impl ContactListener<Vec2<f64>> for Recorder {
    fn begin_contact(&mut self, _contact: &Contact<Vec2<f64>>) -> bool {
        self.log.borrow_mut().push(format!("{} begin", self.name));
        self.approve
    }

    fn end_contact(&mut self, _contact: &Contact<Vec2<f64>>) {
        self.log.borrow_mut().push(format!("{} end", self.name));
    }
}

fn wall() -> Body<Vec2<f64>> {
    let mut body = Body::new();
    let a = body.add_particle(Particle::fixed(Vec2::new(0.0, -5.0), 1.0));
    let b = body.add_particle(Particle::fixed(Vec2::new(0.0, 5.0), 1.0));
    body.link(a, b, Material::elastic(1.0, 1.0)).unwrap();
    body
}

fn projectile() -> Body<Vec2<f64>> {
    let mut body = Body::new();
    let mut particle = Particle::new(Vec2::new(-1.0, 0.0), 1.0);
    particle.set_motion(Vec2::new(2.0, 0.0));
    body.add_particle(particle);
    body
}

/// Striker body 0, wall body 1, with recorders everywhere.
fn scene(world_ok: bool, striker_ok: bool, wall_ok: bool) -> (Solver<Vec2<f64>>, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new();
    world.set_contact_listener(Recorder::boxed("world", world_ok, &log));

    let mut striker = projectile();
    striker.set_contact_listener(Recorder::boxed("striker", striker_ok, &log));
    world.add_body(striker);

    let mut barrier = wall();
    barrier.set_contact_listener(Recorder::boxed("wall", wall_ok, &log));
    world.add_body(barrier);

    // One pass: a vetoed contact stays unresolved and would be re-detected
    // and re-announced on every further iteration.
    let mut solver = Solver::new().with_world(world);
    solver.set_iterations(1);
    (solver, log)
}

#[test]
fn world_veto_skips_the_contact_outright() {
    let (mut solver, log) = scene(false, true, true);
    solver.solve(DT).unwrap();

    assert_eq!(*log.borrow(), ["world begin"]);
    // Unresolved: the particle sails through.
    assert!((solver.world().unwrap().body(0).particle(0).pos.x - 1.0).abs() < 1e-9);
}

#[test]
fn first_approving_body_short_circuits_the_second() {
    let (mut solver, log) = scene(true, true, false);
    solver.solve(DT).unwrap();

    // The wall listener is never asked to begin, but still observes the end.
    assert_eq!(
        *log.borrow(),
        ["world begin", "striker begin", "striker end", "wall end", "world end"]
    );
    assert!((solver.world().unwrap().body(0).particle(0).pos.x - (-1.0)).abs() < 1e-9);
}

#[test]
fn either_body_approval_resolves_a_cross_body_contact() {
    let (mut solver, log) = scene(true, false, true);
    solver.solve(DT).unwrap();

    assert_eq!(
        *log.borrow(),
        ["world begin", "striker begin", "wall begin", "striker end", "wall end", "world end"]
    );
    assert!((solver.world().unwrap().body(0).particle(0).pos.x - (-1.0)).abs() < 1e-9);
}

#[test]
fn both_bodies_declining_skips_resolution() {
    let (mut solver, log) = scene(true, false, false);
    solver.solve(DT).unwrap();

    assert_eq!(*log.borrow(), ["world begin", "striker begin", "wall begin"]);
    assert!((solver.world().unwrap().body(0).particle(0).pos.x - 1.0).abs() < 1e-9);
}

#[test]
fn same_body_contact_needs_that_bodys_approval() {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new();

    // One body holding both the wall edge and the projectile particle.
    let mut body = wall();
    let mut particle = Particle::new(Vec2::new(-1.0, 0.0), 1.0);
    particle.set_motion(Vec2::new(2.0, 0.0));
    body.add_particle(particle);
    body.set_contact_listener(Recorder::boxed("body", false, &log));
    world.add_body(body);
    world.set_contact_listener(Recorder::boxed("world", true, &log));

    let mut solver = Solver::new().with_world(world);
    solver.set_iterations(1);
    solver.solve(DT).unwrap();

    assert_eq!(*log.borrow(), ["world begin", "body begin"]);
    assert!((solver.world().unwrap().body(0).particle(2).pos.x - 1.0).abs() < 1e-9);
}
