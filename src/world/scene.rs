use thiserror::Error;

use crate::collision::detection;
use crate::collision::manifold::{CollisionEvent, CollisionManifold};
use crate::collision::solver;
use crate::constraints::Constraint;
use crate::math::vec2::Vec2;
use crate::objects::rigid_body::{BodyId, RigidBody};

/// Thresholds controlling when bodies are put to sleep.
///
/// A body whose linear and angular speeds stay below the minimums for
/// `sleep_delay` consecutive updates is put to sleep until a collision or a
/// constraint impulse wakes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepSettings {
    pub min_linear_velocity: f32,
    pub min_angular_velocity: f32,
    pub sleep_delay: u32,
}

impl Default for SleepSettings {
    fn default() -> Self {
        Self {
            min_linear_velocity: 2.5,
            min_angular_velocity: 0.4,
            sleep_delay: 10,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("constraint references a body not present in the scene")]
    UnknownBody(BodyId),
}

/// The simulation container: bodies, constraints and the update loop.
///
/// Each `update` call divides the frame time into `substeps` fixed substeps.
/// Within a substep, constraints are applied first, then per body: gravity,
/// narrow-phase detection against later bodies with immediate positional
/// correction, and integration. Detected contacts are impulse-resolved in a
/// batch afterwards, followed by air drag. Sleep bookkeeping runs once per
/// update, after all substeps.
#[derive(Debug)]
pub struct Scene {
    bodies: Vec<RigidBody>,
    constraints: Vec<Constraint>,
    manifolds: Vec<CollisionManifold>,
    events: Vec<CollisionEvent>,

    /// Gravity acceleration applied to awake dynamic bodies.
    pub gravity: Vec2,
    /// Substep count per `update` call. Higher is more accurate.
    pub substeps: u32,
    /// Allow bodies at rest to be put to sleep.
    pub allow_sleep: bool,
    pub sleep: SleepSettings,

    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            constraints: Vec::new(),
            manifolds: Vec::new(),
            events: Vec::new(),
            gravity: Vec2::new(0.0, 100.0),
            substeps: 10,
            allow_sleep: true,
            sleep: SleepSettings::default(),
            next_id: 1,
        }
    }

    /// Adds a body and returns its scene-assigned id.
    pub fn add_body(&mut self, mut body: RigidBody) -> BodyId {
        let id = BodyId::new(self.next_id);
        self.next_id += 1;
        body.id = id;
        self.bodies.push(body);
        tracing::debug!(body = ?id, "body added");
        id
    }

    /// Removes a body along with every constraint referencing it. Returns
    /// the removed body, or `None` for an unknown id.
    pub fn remove_body(&mut self, id: BodyId) -> Option<RigidBody> {
        let index = self.index_of(id)?;
        let body = self.bodies.remove(index);
        self.constraints.retain(|constraint| !constraint.contains(id));
        tracing::debug!(body = ?id, "body removed");
        Some(body)
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        let index = self.index_of(id)?;
        Some(&mut self.bodies[index])
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    /// Adds a constraint after checking that every body it references is
    /// present in the scene.
    pub fn add_constraint(&mut self, constraint: impl Into<Constraint>) -> Result<(), SceneError> {
        let constraint = constraint.into();
        self.check_referenced_bodies(&constraint)?;
        self.constraints.push(constraint);
        tracing::debug!(count = self.constraints.len(), "constraint added");
        Ok(())
    }

    /// Removes and returns the constraint at `index`.
    pub fn remove_constraint(&mut self, index: usize) -> Constraint {
        let constraint = self.constraints.remove(index);
        tracing::debug!(count = self.constraints.len(), "constraint removed");
        constraint
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Contacts detected during the most recent substep. Body indices are
    /// only meaningful until the body list next changes.
    pub fn manifolds(&self) -> &[CollisionManifold] {
        &self.manifolds
    }

    /// Collisions detected during the most recent `update` call, one entry
    /// per contact per substep.
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Advances the simulation by `dt`. Non-positive `dt` is a no-op.
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        self.events.clear();
        let dt = dt / self.substeps as f32;
        for _ in 0..self.substeps {
            self.substep(dt);
        }

        if self.allow_sleep {
            for body in &mut self.bodies {
                body.try_sleep(&self.sleep);
            }
        }
    }

    fn substep(&mut self, dt: f32) {
        self.manifolds.clear();

        self.apply_constraints(dt);

        for i in 0..self.bodies.len() {
            if !self.bodies[i].is_static() && !self.bodies[i].sleeping {
                self.bodies[i].linear_velocity += self.gravity * dt;
            }

            for j in i + 1..self.bodies.len() {
                if self.bodies[i].is_static() && self.bodies[j].is_static() {
                    continue;
                }
                if self.bodies[i].sleeping && self.bodies[j].sleeping {
                    continue;
                }

                let (id_a, id_b) = (self.bodies[i].id, self.bodies[j].id);
                if self
                    .constraints
                    .iter()
                    .any(|c| c.suppresses_collision(id_a, id_b))
                {
                    continue;
                }

                if !self.bodies[i]
                    .bounding_box()
                    .intersects(&self.bodies[j].bounding_box())
                {
                    continue;
                }

                let (a, b) = pair_mut(&mut self.bodies, i, j);
                if let Some(contact) = detection::collide(a, b) {
                    solver::separate(a, b, &contact);
                    a.wake();
                    b.wake();
                    self.manifolds.push(CollisionManifold {
                        body_a: i,
                        body_b: j,
                        contact,
                    });
                    self.events.push(CollisionEvent {
                        body_a: id_a,
                        body_b: id_b,
                        normal: contact.normal,
                    });
                    tracing::trace!(body_a = ?id_a, body_b = ?id_b, depth = contact.depth, "contact");
                }
            }

            self.bodies[i].integrate(dt);
        }

        tracing::trace!(manifolds = self.manifolds.len(), "substep detected contacts");

        for k in 0..self.manifolds.len() {
            let manifold = self.manifolds[k];
            let (a, b) = pair_mut(&mut self.bodies, manifold.body_a, manifold.body_b);
            solver::resolve(a, b, &manifold.contact);
        }

        for body in &mut self.bodies {
            body.apply_air_drag(dt);
        }
    }

    fn apply_constraints(&mut self, dt: f32) {
        let bodies = &mut self.bodies;
        let sleep = &self.sleep;
        for constraint in &self.constraints {
            match constraint {
                Constraint::Spring(spring) => {
                    if let Some((a, b)) = lookup_pair(bodies, spring.body_a, spring.body_b) {
                        spring.apply(a, b, dt);
                        wake_if_moving(a, sleep);
                        wake_if_moving(b, sleep);
                    }
                }
                Constraint::BodyAttachment(att) => {
                    if let Some((a, b)) = lookup_pair(bodies, att.body_a, att.body_b) {
                        att.apply(a, b);
                        wake_if_moving(a, sleep);
                        wake_if_moving(b, sleep);
                    }
                }
                Constraint::WorldAttachment(att) => {
                    if let Some(index) = bodies.iter().position(|b| b.id == att.body) {
                        let body = &mut bodies[index];
                        att.apply(body);
                        wake_if_moving(body, sleep);
                    }
                }
            }
        }
    }

    fn check_referenced_bodies(&self, constraint: &Constraint) -> Result<(), SceneError> {
        let check = |id: BodyId| match self.index_of(id) {
            Some(_) => Ok(()),
            None => Err(SceneError::UnknownBody(id)),
        };
        match constraint {
            Constraint::Spring(s) => check(s.body_a).and(check(s.body_b)),
            Constraint::BodyAttachment(a) => check(a.body_a).and(check(a.body_b)),
            Constraint::WorldAttachment(a) => check(a.body),
        }
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|body| body.id == id)
    }
}

/// Mutable access to two distinct bodies of the same slice.
fn pair_mut(bodies: &mut [RigidBody], i: usize, j: usize) -> (&mut RigidBody, &mut RigidBody) {
    debug_assert!(i < j);
    let (left, right) = bodies.split_at_mut(j);
    (&mut left[i], &mut right[0])
}

fn lookup_pair(
    bodies: &mut [RigidBody],
    a: BodyId,
    b: BodyId,
) -> Option<(&mut RigidBody, &mut RigidBody)> {
    let ia = bodies.iter().position(|body| body.id == a)?;
    let ib = bodies.iter().position(|body| body.id == b)?;
    if ia == ib {
        return None;
    }
    if ia < ib {
        Some(pair_mut(bodies, ia, ib))
    } else {
        let (second, first) = pair_mut(bodies, ib, ia);
        Some((first, second))
    }
}

/// Wakes a sleeping body once an impulse pushed it past the sleep
/// thresholds. Gentle impulses leave settled stacks asleep.
fn wake_if_moving(body: &mut RigidBody, sleep: &SleepSettings) {
    if !body.sleeping {
        return;
    }
    if !body
        .linear_velocity
        .nearly_eq(Vec2::ZERO, sleep.min_linear_velocity)
        || body.angular_velocity.abs() > sleep.min_angular_velocity
    {
        body.wake();
    }
}
