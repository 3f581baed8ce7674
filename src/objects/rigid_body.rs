use crate::collision::bounding_box::BoundingBox;
use crate::math::vec2::Vec2;
use crate::shapes::{Circle, InverseCircle, Polygon, Shape};
use crate::world::SleepSettings;

/// Stable identifier assigned by the scene when a body is added.
///
/// Constraints and collision events reference bodies by id, so removals
/// never invalidate them the way raw list indices would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(u64);

impl BodyId {
    pub(crate) const UNASSIGNED: BodyId = BodyId(0);

    pub(crate) fn new(raw: u64) -> Self {
        BodyId(raw)
    }
}

/// Default inertia for dynamic bodies whose shape provides no better value.
const DEFAULT_INERTIA: f32 = 60.0;

/// A rigid body: one of the `Shape` variants plus shared kinematic state,
/// mass properties and material coefficients.
///
/// Static bodies carry infinite mass and inertia (inverse 0) and never move.
/// Sleeping bodies are excluded from gravity, integration and narrow-phase
/// testing until a collision wakes them.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub shape: Shape,
    pub position: Vec2,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,

    /// Ratio of relative normal velocity retained after a collision. [0, 1].
    pub restitution: f32,
    pub static_friction: f32,
    pub dynamic_friction: f32,
    /// Linear drag coefficient applied against velocity each substep.
    pub air_friction: f32,

    angle: f32,
    mass: f32,
    inv_mass: f32,
    inertia: f32,
    inv_inertia: f32,
    bounding_box: BoundingBox,
    is_static: bool,
    pub(crate) sleeping: bool,
    rest_frames: u32,
    pub(crate) id: BodyId,
}

impl RigidBody {
    fn new(position: Vec2, shape: Shape, mass: Option<f32>) -> Self {
        let mut body = Self {
            shape,
            position,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            restitution: 0.2,
            static_friction: 0.6,
            dynamic_friction: 0.4,
            air_friction: 5e-4,
            angle: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            bounding_box: BoundingBox::default(),
            is_static: mass.is_none(),
            sleeping: false,
            rest_frames: 0,
            id: BodyId::UNASSIGNED,
        };
        match mass {
            Some(m) => {
                body.set_mass(m);
                body.set_inertia(DEFAULT_INERTIA);
            }
            None => {
                body.set_mass(f32::INFINITY);
                body.set_inertia(f32::INFINITY);
            }
        }
        body.update_bounding_box();
        body
    }

    /// Creates a static circle body (infinite mass and inertia).
    pub fn circle_static(position: Vec2, radius: f32) -> Self {
        Self::new(position, Shape::Circle(Circle::new(radius)), None)
    }

    /// Creates a dynamic circle body. Inertia is that of a solid disc.
    pub fn circle(position: Vec2, radius: f32, mass: f32) -> Self {
        let mut body = Self::new(position, Shape::Circle(Circle::new(radius)), Some(mass));
        body.set_inertia(0.5 * mass * radius * radius);
        body
    }

    /// Creates a static circular cavity body.
    pub fn inverse_circle_static(position: Vec2, radius: f32) -> Self {
        Self::new(
            position,
            Shape::InverseCircle(InverseCircle::new(radius)),
            None,
        )
    }

    /// Creates a static convex polygon body from vertices relative to
    /// `position`.
    pub fn polygon_static(position: Vec2, vertices: Vec<Vec2>) -> Self {
        Self::new(position, Shape::Polygon(Polygon::new(vertices)), None)
    }

    /// Creates a dynamic convex polygon body. Inertia is approximated from
    /// the bounding extents as for a solid box.
    pub fn polygon(position: Vec2, vertices: Vec<Vec2>, mass: f32) -> Self {
        let mut body = Self::new(position, Shape::Polygon(Polygon::new(vertices)), Some(mass));
        let size = body.bounding_box.size;
        body.set_inertia(mass * (size.x * size.x + size.y * size.y) / 12.0);
        body
    }

    /// Creates a static axis-aligned box of the given full size.
    pub fn cuboid_static(position: Vec2, size: Vec2) -> Self {
        Self::polygon_static(position, Polygon::box_vertices(size))
    }

    /// Creates a dynamic axis-aligned box of the given full size.
    pub fn cuboid(position: Vec2, size: Vec2, mass: f32) -> Self {
        Self::polygon(position, Polygon::box_vertices(size), mass)
    }

    /// Creates a static regular polygon with `point_count` vertices.
    pub fn regular_polygon_static(position: Vec2, size: Vec2, point_count: u32) -> Self {
        Self::polygon_static(position, Polygon::regular_vertices(size, point_count))
    }

    /// Creates a dynamic regular polygon with `point_count` vertices.
    pub fn regular_polygon(position: Vec2, size: Vec2, point_count: u32, mass: f32) -> Self {
        Self::polygon(position, Polygon::regular_vertices(size, point_count), mass)
    }

    /// Scene-assigned identifier, `BodyId::UNASSIGNED` until added.
    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Wakes a sleeping body. Static bodies stay settled.
    pub fn wake(&mut self) {
        if !self.is_static {
            self.sleeping = false;
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Sets the mass and recomputes its inverse. Infinite mass yields an
    /// inverse of exactly 0 (immovable).
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inv_mass = invert(mass);
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    pub fn set_inv_mass(&mut self, inv_mass: f32) {
        self.inv_mass = inv_mass;
        self.mass = invert(inv_mass);
    }

    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    pub fn set_inertia(&mut self, inertia: f32) {
        self.inertia = inertia;
        self.inv_inertia = invert(inertia);
    }

    pub fn inv_inertia(&self) -> f32 {
        self.inv_inertia
    }

    pub fn set_inv_inertia(&mut self, inv_inertia: f32) {
        self.inv_inertia = inv_inertia;
        self.inertia = invert(inv_inertia);
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Sets the orientation angle. For polygons this rotates the stored
    /// vertex set by the delta; the bounding box is recomputed.
    pub fn set_angle(&mut self, angle: f32) {
        let delta = angle - self.angle;
        if let Shape::Polygon(polygon) = &mut self.shape {
            polygon.rotate_by(delta);
        }
        self.angle = angle;
        self.update_bounding_box();
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Integrates position and orientation over `dt`. Must be called exactly
    /// once per substep per body; a no-op for sleeping bodies (their rest
    /// counter restarts).
    pub fn integrate(&mut self, dt: f32) {
        if self.sleeping {
            self.rest_frames = 0;
            return;
        }

        self.position += self.linear_velocity * dt;
        // set_angle recomputes the bounding box, covering the translation too
        self.set_angle(self.angle + self.angular_velocity * dt);
    }

    /// Applies an impulse at a world-space point, changing linear and
    /// angular velocity. Waking the body is the caller's responsibility.
    pub fn apply_impulse(&mut self, point: Vec2, impulse: Vec2) {
        self.linear_velocity += impulse * self.inv_mass;
        self.angular_velocity += (point - self.position).cross(impulse) * self.inv_inertia;
    }

    /// Instantaneous velocity of the material point `point` rigidly attached
    /// to this body.
    pub fn velocity_at(&self, point: Vec2) -> Vec2 {
        self.linear_velocity + (point - self.position).perpendicular() * self.angular_velocity
    }

    /// Applies quadratic air drag opposing the current linear velocity.
    pub fn apply_air_drag(&mut self, dt: f32) {
        if self.linear_velocity == Vec2::ZERO {
            return;
        }

        let normal = -self.linear_velocity.normalize();
        let drag_mag = self.linear_velocity.length_squared() * self.air_friction;
        self.linear_velocity += normal * drag_mag * dt;
    }

    /// Advances the rest counter when both velocities are within the sleep
    /// thresholds; puts the body to sleep (velocities zeroed) once the
    /// counter reaches the configured delay. Any speed above threshold
    /// resets the counter.
    pub fn try_sleep(&mut self, settings: &SleepSettings) {
        let at_rest = self
            .linear_velocity
            .nearly_eq(Vec2::ZERO, settings.min_linear_velocity)
            && self.angular_velocity.abs() <= settings.min_angular_velocity;

        if at_rest {
            self.rest_frames += 1;
            if self.rest_frames >= settings.sleep_delay {
                self.rest_frames = 0;
                self.sleeping = true;
                self.linear_velocity = Vec2::ZERO;
                self.angular_velocity = 0.0;
                tracing::debug!(body = self.id.0, "body put to sleep");
            }
        } else {
            self.rest_frames = 0;
        }
    }

    /// Recomputes the world-space bounding box from the current shape state.
    pub fn update_bounding_box(&mut self) {
        self.bounding_box = match &self.shape {
            Shape::Circle(circle) => BoundingBox::new(
                self.position,
                Vec2::new(circle.radius * 2.0, circle.radius * 2.0),
            ),
            Shape::InverseCircle(cavity) => BoundingBox::new(
                self.position,
                Vec2::new(cavity.radius * 2.0, cavity.radius * 2.0),
            ),
            Shape::Polygon(polygon) => {
                let (min, max) = polygon.extents(self.position);
                BoundingBox::new((min + max) / 2.0, max - min)
            }
        };
    }
}

fn invert(value: f32) -> f32 {
    if value.is_infinite() || value == f32::MAX {
        0.0
    } else {
        1.0 / value
    }
}
