use crate::math::vec2::Vec2;
use crate::objects::rigid_body::RigidBody;
use super::manifold::Contact;

/// Moves the bodies of a contact apart along the normal so they no longer
/// penetrate. A dynamic body paired with a static one absorbs the full
/// depth, two dynamic bodies split it evenly, two static bodies stay put.
pub fn separate(a: &mut RigidBody, b: &mut RigidBody, contact: &Contact) {
    if contact.depth == 0.0 {
        return;
    }

    match (a.is_static(), b.is_static()) {
        (false, false) => {
            let delta = contact.normal * contact.depth / 2.0;
            a.position += delta;
            b.position -= delta;
            a.update_bounding_box();
            b.update_bounding_box();
        }
        (false, true) => {
            a.position += contact.normal * contact.depth;
            a.update_bounding_box();
        }
        (true, false) => {
            b.position -= contact.normal * contact.depth;
            b.update_bounding_box();
        }
        (true, true) => {}
    }
}

/// Applies collision impulses at the contact points, updating linear and
/// angular velocities of both bodies.
///
/// Runs in two phases per point: a normal impulse with restitution (the
/// minimum of the pair), then a tangential friction impulse clamped by
/// Coulomb's law against the averaged friction coefficients. Impulse
/// magnitudes are divided by the contact point count so a two point contact
/// is not twice as bouncy.
pub fn resolve(a: &mut RigidBody, b: &mut RigidBody, contact: &Contact) {
    if contact.depth == 0.0 {
        return;
    }

    let points = [contact.point1, contact.point2.unwrap_or(Vec2::ZERO)];
    let point_count = if contact.point2.is_some() { 2 } else { 1 };

    let mut normal_impulses = [Vec2::ZERO; 2];
    let mut normal_impulse_mags = [0.0f32; 2];
    let mut tangent_impulses = [Vec2::ZERO; 2];
    let mut a_perps = [Vec2::ZERO; 2];
    let mut b_perps = [Vec2::ZERO; 2];

    let restitution = a.restitution.min(b.restitution);
    for i in 0..point_count {
        let point = points[i];

        let a_perp = (point - a.position).perpendicular();
        let b_perp = (point - b.position).perpendicular();
        a_perps[i] = a_perp;
        b_perps[i] = b_perp;

        let relative_velocity = b.linear_velocity + b_perp * b.angular_velocity
            - a.linear_velocity
            - a_perp * a.angular_velocity;

        let contact_velocity = relative_velocity.dot(contact.normal);
        if contact_velocity < 0.0 {
            // Already separating along the normal
            continue;
        }

        let a_perp_dot_n = a_perp.dot(contact.normal);
        let b_perp_dot_n = b_perp.dot(contact.normal);
        let mut magnitude = -(1.0 + restitution) * contact_velocity;
        magnitude /= a.inv_mass()
            + b.inv_mass()
            + a_perp_dot_n * a_perp_dot_n * a.inv_inertia()
            + b_perp_dot_n * b_perp_dot_n * b.inv_inertia();
        magnitude /= point_count as f32;

        normal_impulses[i] = contact.normal * magnitude;
        normal_impulse_mags[i] = magnitude.abs();
    }

    for i in 0..point_count {
        a.apply_impulse(points[i], -normal_impulses[i]);
        b.apply_impulse(points[i], normal_impulses[i]);
    }

    let static_friction = (a.static_friction + b.static_friction) * 0.5;
    let dynamic_friction = (a.dynamic_friction + b.dynamic_friction) * 0.5;
    for i in 0..point_count {
        let a_perp = a_perps[i];
        let b_perp = b_perps[i];
        let relative_velocity = b.linear_velocity + b_perp * b.angular_velocity
            - a.linear_velocity
            - a_perp * a.angular_velocity;

        let tangent =
            relative_velocity - contact.normal * relative_velocity.dot(contact.normal);
        if tangent == Vec2::ZERO {
            continue;
        }
        let tangent = tangent.normalize();

        let a_perp_dot_t = a_perp.dot(tangent);
        let b_perp_dot_t = b_perp.dot(tangent);
        let mut magnitude = -relative_velocity.dot(tangent);
        magnitude /= a.inv_mass()
            + b.inv_mass()
            + a_perp_dot_t * a_perp_dot_t * a.inv_inertia()
            + b_perp_dot_t * b_perp_dot_t * b.inv_inertia();
        magnitude /= point_count as f32;

        let normal_mag = normal_impulse_mags[i];
        tangent_impulses[i] = if magnitude.abs() <= normal_mag * static_friction {
            tangent * magnitude
        } else {
            tangent * (-normal_mag * dynamic_friction)
        };
    }

    for i in 0..point_count {
        a.apply_impulse(points[i], -tangent_impulses[i]);
        b.apply_impulse(points[i], tangent_impulses[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn head_on_contact() -> Contact {
        Contact {
            normal: Vec2::new(-1.0, 0.0),
            depth: 2.0,
            point1: Vec2::new(4.0, 0.0),
            point2: None,
        }
    }

    #[test]
    fn test_separate_dynamic_against_static() {
        let mut a = RigidBody::circle(Vec2::new(0.0, 0.0), 5.0, 1.0);
        let mut b = RigidBody::circle_static(Vec2::new(8.0, 0.0), 5.0);

        separate(&mut a, &mut b, &head_on_contact());

        assert!((a.position.x - -2.0).abs() < EPSILON);
        assert_eq!(b.position, Vec2::new(8.0, 0.0));
        // Bounding box follows the corrected position
        assert!((a.bounding_box().center.x - -2.0).abs() < EPSILON);
    }

    #[test]
    fn test_separate_splits_between_dynamic_bodies() {
        let mut a = RigidBody::circle(Vec2::new(0.0, 0.0), 5.0, 1.0);
        let mut b = RigidBody::circle(Vec2::new(8.0, 0.0), 5.0, 1.0);

        separate(&mut a, &mut b, &head_on_contact());

        assert!((a.position.x - -1.0).abs() < EPSILON);
        assert!((b.position.x - 9.0).abs() < EPSILON);
    }

    #[test]
    fn test_separate_leaves_static_pair_untouched() {
        let mut a = RigidBody::circle_static(Vec2::new(0.0, 0.0), 5.0);
        let mut b = RigidBody::circle_static(Vec2::new(8.0, 0.0), 5.0);

        separate(&mut a, &mut b, &head_on_contact());

        assert_eq!(a.position, Vec2::new(0.0, 0.0));
        assert_eq!(b.position, Vec2::new(8.0, 0.0));
    }

    #[test]
    fn test_resolve_elastic_head_on_swaps_velocities() {
        let mut a = RigidBody::circle(Vec2::new(0.0, 0.0), 5.0, 1.0);
        let mut b = RigidBody::circle(Vec2::new(8.0, 0.0), 5.0, 1.0);
        a.restitution = 1.0;
        b.restitution = 1.0;
        a.linear_velocity = Vec2::new(1.0, 0.0);
        b.linear_velocity = Vec2::new(-1.0, 0.0);

        resolve(&mut a, &mut b, &head_on_contact());

        assert!((a.linear_velocity.x - -1.0).abs() < EPSILON);
        assert!((b.linear_velocity.x - 1.0).abs() < EPSILON);
        // Symmetric head-on contact imparts no spin
        assert!(a.angular_velocity.abs() < EPSILON);
        assert!(b.angular_velocity.abs() < EPSILON);
    }

    #[test]
    fn test_resolve_separating_pair_is_noop() {
        let mut a = RigidBody::circle(Vec2::new(0.0, 0.0), 5.0, 1.0);
        let mut b = RigidBody::circle(Vec2::new(8.0, 0.0), 5.0, 1.0);
        a.linear_velocity = Vec2::new(-1.0, 0.0);
        b.linear_velocity = Vec2::new(1.0, 0.0);

        resolve(&mut a, &mut b, &head_on_contact());

        assert!((a.linear_velocity.x - -1.0).abs() < EPSILON);
        assert!((b.linear_velocity.x - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_resolve_bounce_with_friction() {
        // Unit circle sliding right while falling onto static ground below
        let mut a = RigidBody::circle(Vec2::new(0.0, 0.0), 1.0, 1.0);
        let mut b = RigidBody::circle_static(Vec2::new(0.0, 2.0), 1.0);
        a.restitution = 0.5;
        b.restitution = 0.5;
        a.linear_velocity = Vec2::new(1.0, 1.0);

        let contact = Contact {
            normal: Vec2::new(0.0, -1.0),
            depth: 0.1,
            point1: Vec2::new(0.0, 1.0),
            point2: None,
        };
        resolve(&mut a, &mut b, &contact);

        // Approach speed 1 rebounds at restitution 0.5
        assert!((a.linear_velocity.y - -0.5).abs() < EPSILON);
        // Friction slows the slide and spins the circle
        assert!((a.linear_velocity.x - 2.0 / 3.0).abs() < EPSILON);
        assert!((a.angular_velocity - 2.0 / 3.0).abs() < EPSILON);
        // The static body never moves
        assert_eq!(b.linear_velocity, Vec2::ZERO);
    }

    #[test]
    fn test_resolve_dynamic_friction_clamp() {
        // Fast tangential slide with a gentle normal approach trips the
        // Coulomb clamp into the dynamic friction branch
        let mut a = RigidBody::circle(Vec2::new(0.0, 0.0), 1.0, 1.0);
        let mut b = RigidBody::circle_static(Vec2::new(0.0, 2.0), 1.0);
        a.restitution = 0.0;
        b.restitution = 0.0;
        a.linear_velocity = Vec2::new(100.0, 0.1);

        let contact = Contact {
            normal: Vec2::new(0.0, -1.0),
            depth: 0.1,
            point1: Vec2::new(0.0, 1.0),
            point2: None,
        };
        resolve(&mut a, &mut b, &contact);

        // Normal impulse magnitude is 0.1, so friction cannot exceed
        // 0.1 * dynamic_friction, leaving most of the slide intact
        assert!(a.linear_velocity.x > 99.0);
        assert!(a.linear_velocity.x < 100.0);
        assert!(a.linear_velocity.y.abs() < EPSILON);
    }

    #[test]
    fn test_elastic_bounce_on_polygon_floor() {
        use crate::collision::detection::collide;

        // Frictionless, fully elastic ball dropped into a static floor
        let mut ball = RigidBody::circle(Vec2::new(0.0, 3.3), 1.0, 1.0);
        ball.restitution = 1.0;
        ball.static_friction = 0.0;
        ball.dynamic_friction = 0.0;
        ball.linear_velocity = Vec2::new(0.0, 10.0);
        let mut floor = RigidBody::cuboid_static(Vec2::new(0.0, 5.0), Vec2::new(20.0, 2.0));
        floor.restitution = 1.0;
        floor.static_friction = 0.0;
        floor.dynamic_friction = 0.0;

        let contact = collide(&ball, &floor).unwrap();
        assert!((contact.depth - 0.3).abs() < EPSILON);

        separate(&mut ball, &mut floor, &contact);
        resolve(&mut ball, &mut floor, &contact);

        // No residual interpenetration
        assert!(collide(&ball, &floor).is_none());
        // Normal speed preserved and reversed
        assert!((ball.linear_velocity.y - -10.0).abs() < 1e-3);
        assert!(ball.angular_velocity.abs() < EPSILON);
    }

    #[test]
    fn test_resolve_zero_depth_is_noop() {
        let mut a = RigidBody::circle(Vec2::new(0.0, 0.0), 5.0, 1.0);
        let mut b = RigidBody::circle(Vec2::new(8.0, 0.0), 5.0, 1.0);
        a.linear_velocity = Vec2::new(1.0, 0.0);

        let contact = Contact {
            depth: 0.0,
            ..head_on_contact()
        };
        resolve(&mut a, &mut b, &contact);
        separate(&mut a, &mut b, &contact);

        assert_eq!(a.linear_velocity, Vec2::new(1.0, 0.0));
        assert_eq!(a.position, Vec2::new(0.0, 0.0));
    }
}
