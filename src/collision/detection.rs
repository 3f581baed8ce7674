use crate::math::vec2::Vec2;
use crate::objects::rigid_body::RigidBody;
use crate::shapes::{Polygon, Shape};
use super::manifold::Contact;

/// Tolerance used to decide whether a second polygon contact point is far
/// enough from the first to be worth reporting. A tuning constant, not a
/// semantic guarantee.
pub const CONTACT_TOLERANCE: f32 = 0.5;

/// Narrow-phase test for a body pair. Returns the contact with the normal
/// pointing towards `a`, or `None` when the shapes do not overlap.
///
/// Degenerate configurations (coincident centers, zero-length deltas) report
/// no collision rather than erroring: they are reachable mid-simulation and
/// must not halt the loop.
pub fn collide(a: &RigidBody, b: &RigidBody) -> Option<Contact> {
    match (&a.shape, &b.shape) {
        (Shape::Circle(c1), Shape::Circle(c2)) => {
            circle_circle(a.position, c1.radius, b.position, c2.radius)
        }
        (Shape::Circle(c), Shape::InverseCircle(cavity)) => {
            circle_inverse_circle(a.position, c.radius, b.position, cavity.radius)
        }
        (Shape::InverseCircle(cavity), Shape::Circle(c)) => {
            circle_inverse_circle(b.position, c.radius, a.position, cavity.radius).map(flip)
        }
        (Shape::Polygon(p1), Shape::Polygon(p2)) => {
            polygon_polygon(p1, a.position, p2, b.position)
        }
        (Shape::Polygon(p), Shape::Circle(c)) => {
            polygon_circle(p, a.position, b.position, c.radius)
        }
        (Shape::Circle(c), Shape::Polygon(p)) => {
            polygon_circle(p, b.position, a.position, c.radius).map(flip)
        }
        (Shape::Polygon(p), Shape::InverseCircle(cavity)) => {
            polygon_inverse_circle(p, a.position, b.position, cavity.radius)
        }
        (Shape::InverseCircle(cavity), Shape::Polygon(p)) => {
            polygon_inverse_circle(p, b.position, a.position, cavity.radius).map(flip)
        }
        // Two cavities cannot press against each other
        (Shape::InverseCircle(_), Shape::InverseCircle(_)) => None,
    }
}

/// Reverses the A/B roles of a contact.
fn flip(contact: Contact) -> Contact {
    Contact {
        normal: -contact.normal,
        ..contact
    }
}

/// Circle vs circle. Colliding iff the centers are closer than the radii sum
/// and not coincident.
pub fn circle_circle(pos1: Vec2, radius1: f32, pos2: Vec2, radius2: f32) -> Option<Contact> {
    let radii = radius1 + radius2;
    let delta = pos1 - pos2;
    if delta.length_squared() >= radii * radii || delta == Vec2::ZERO {
        return None;
    }

    let length = delta.length();
    let normal = delta / length;

    Some(Contact {
        normal,
        depth: radii - length,
        point1: pos2 + normal * radius2,
        point2: None,
    })
}

/// Circle pressing against the inner wall of a cavity. Colliding iff the
/// circle reaches beyond the cavity radius. Normal points towards the
/// circle's separation direction (the cavity center).
pub fn circle_inverse_circle(
    circle_pos: Vec2,
    circle_radius: f32,
    cavity_pos: Vec2,
    cavity_radius: f32,
) -> Option<Contact> {
    let radii = cavity_radius - circle_radius;
    let delta = cavity_pos - circle_pos;
    if delta.length_squared() <= radii * radii || delta == Vec2::ZERO {
        return None;
    }

    let length = delta.length();
    let normal = delta / length;

    Some(Contact {
        normal,
        depth: length - radii,
        point1: circle_pos - normal * circle_radius,
        point2: None,
    })
}

/// Polygon vs polygon via the separating axis theorem over the edge normals
/// of both polygons. The axis of least penetration becomes the contact
/// normal, oriented towards the first polygon.
pub fn polygon_polygon(
    poly1: &Polygon,
    pos1: Vec2,
    poly2: &Polygon,
    pos2: Vec2,
) -> Option<Contact> {
    let mut normal = Vec2::ZERO;
    let mut depth = f32::MAX;

    if !separating_axis(poly1, pos1, poly2, pos2, &mut normal, &mut depth)
        || !separating_axis(poly2, pos2, poly1, pos1, &mut normal, &mut depth)
    {
        return None;
    }

    let (point1, point2) = polygon_contact_points(poly1, pos1, poly2, pos2);

    // Orient the normal towards body A
    if (pos1 - pos2).dot(normal) < 0.0 {
        normal = -normal;
    }

    Some(Contact {
        normal,
        depth,
        point1,
        point2,
    })
}

/// Polygon vs circle: SAT over the polygon's edge normals plus the axis from
/// the circle center to its nearest polygon vertex. Normal oriented towards
/// the polygon.
pub fn polygon_circle(
    poly: &Polygon,
    poly_pos: Vec2,
    circle_pos: Vec2,
    radius: f32,
) -> Option<Contact> {
    let mut normal = Vec2::ZERO;
    let mut depth = f32::MAX;

    for (va, vb) in poly.vertex_pairs() {
        let axis = (vb - va).perpendicular().normalize();
        if !overlap_step(
            project_vertices(poly.absolute_vertices(poly_pos), axis),
            project_circle(circle_pos, radius, axis),
            axis,
            &mut normal,
            &mut depth,
        ) {
            return None;
        }
    }

    // The closest-vertex axis catches the circle sitting off a corner
    let mut closest = Vec2::ZERO;
    let mut closest_dist_sq = f32::MAX;
    for v in poly.absolute_vertices(poly_pos) {
        let dist_sq = v.distance_squared(circle_pos);
        if dist_sq < closest_dist_sq {
            closest_dist_sq = dist_sq;
            closest = v;
        }
    }
    let axis = (closest - circle_pos).normalize();
    if !overlap_step(
        project_vertices(poly.absolute_vertices(poly_pos), axis),
        project_circle(circle_pos, radius, axis),
        axis,
        &mut normal,
        &mut depth,
    ) {
        return None;
    }

    let point1 = closest_point_on_polygon(poly, poly_pos, circle_pos);

    if (poly_pos - circle_pos).dot(normal) < 0.0 {
        normal = -normal;
    }

    Some(Contact {
        normal,
        depth,
        point1,
        point2: None,
    })
}

/// Polygon inside a cavity: the farthest vertex from the cavity center is
/// the determinant. No collision while it stays within the cavity radius.
pub fn polygon_inverse_circle(
    poly: &Polygon,
    poly_pos: Vec2,
    cavity_pos: Vec2,
    cavity_radius: f32,
) -> Option<Contact> {
    let mut farthest = Vec2::ZERO;
    let mut farthest_dist_sq = f32::MIN;
    for v in poly.absolute_vertices(poly_pos) {
        let dist_sq = v.distance_squared(cavity_pos);
        if dist_sq > farthest_dist_sq {
            farthest_dist_sq = dist_sq;
            farthest = v;
        }
    }

    let delta = cavity_pos - farthest;
    if delta.length_squared() <= cavity_radius * cavity_radius || delta == Vec2::ZERO {
        return None;
    }

    let length = delta.length();
    let normal = delta / length;

    Some(Contact {
        normal,
        depth: length - cavity_radius,
        point1: cavity_pos - normal * cavity_radius,
        point2: None,
    })
}

/// Runs the SAT steps for every edge normal of `poly1` against `poly2`.
/// Returns false as soon as a separating axis is found.
fn separating_axis(
    poly1: &Polygon,
    pos1: Vec2,
    poly2: &Polygon,
    pos2: Vec2,
    normal: &mut Vec2,
    depth: &mut f32,
) -> bool {
    for (va, vb) in poly1.vertex_pairs() {
        let axis = (vb - va).perpendicular().normalize();
        if !overlap_step(
            project_vertices(poly1.absolute_vertices(pos1), axis),
            project_vertices(poly2.absolute_vertices(pos2), axis),
            axis,
            normal,
            depth,
        ) {
            return false;
        }
    }
    true
}

/// Single SAT step: reject on disjoint intervals, otherwise track the axis
/// of least overlap. A strictly smaller depth replaces the current best, so
/// ties keep the earlier axis.
fn overlap_step(
    (min1, max1): (f32, f32),
    (min2, max2): (f32, f32),
    axis: Vec2,
    normal: &mut Vec2,
    depth: &mut f32,
) -> bool {
    if min1 >= max2 || min2 >= max1 {
        return false;
    }

    let axis_depth = (max2 - min1).min(max1 - min2);
    if *depth > axis_depth {
        *depth = axis_depth;
        *normal = axis;
    }
    true
}

/// Min/max projection of a vertex set onto an axis.
fn project_vertices(vertices: impl Iterator<Item = Vec2>, axis: Vec2) -> (f32, f32) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for v in vertices {
        let projection = v.dot(axis);
        min = min.min(projection);
        max = max.max(projection);
    }
    (min, max)
}

/// Projection interval of a circle onto a unit axis.
fn project_circle(center: Vec2, radius: f32, axis: Vec2) -> (f32, f32) {
    let center_projection = center.dot(axis);
    (center_projection - radius, center_projection + radius)
}

/// Closest point on a segment to `point`, with the squared distance.
fn point_segment_distance(point: Vec2, line_a: Vec2, line_b: Vec2) -> (f32, Vec2) {
    let ab = line_b - line_a;
    let ap = point - line_a;

    let d = ap.dot(ab) / ab.length_squared();
    let closest = if d <= 0.0 {
        line_a
    } else if d >= 1.0 {
        line_b
    } else {
        line_a + ab * d
    };
    ((point - closest).length_squared(), closest)
}

/// Closest point on the polygon boundary to an external point.
fn closest_point_on_polygon(poly: &Polygon, pos: Vec2, point: Vec2) -> Vec2 {
    let mut min_dist_sq = f32::MAX;
    let mut closest = Vec2::ZERO;
    for (va, vb) in poly.absolute_vertex_pairs(pos) {
        let (dist_sq, cp) = point_segment_distance(point, va, vb);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
            closest = cp;
        }
    }
    closest
}

/// Finds up to two contact points between overlapping polygons by testing
/// every vertex of each polygon against every edge of the other. A second
/// point is kept when it ties the minimum distance within
/// `CONTACT_TOLERANCE` without duplicating the first point.
fn polygon_contact_points(
    poly1: &Polygon,
    pos1: Vec2,
    poly2: &Polygon,
    pos2: Vec2,
) -> (Vec2, Option<Vec2>) {
    let mut min_dist_sq = f32::MAX;
    let mut point1 = Vec2::ZERO;
    let mut point2 = None;

    contact_point_pass(poly1, pos1, poly2, pos2, &mut min_dist_sq, &mut point1, &mut point2);
    contact_point_pass(poly2, pos2, poly1, pos1, &mut min_dist_sq, &mut point1, &mut point2);

    (point1, point2)
}

fn contact_point_pass(
    poly1: &Polygon,
    pos1: Vec2,
    poly2: &Polygon,
    pos2: Vec2,
    min_dist_sq: &mut f32,
    point1: &mut Vec2,
    point2: &mut Option<Vec2>,
) {
    for v in poly1.absolute_vertices(pos1) {
        for (va, vb) in poly2.absolute_vertex_pairs(pos2) {
            let (dist_sq, cp) = point_segment_distance(v, va, vb);

            if (dist_sq - *min_dist_sq).abs() <= CONTACT_TOLERANCE {
                if !cp.nearly_eq(*point1, CONTACT_TOLERANCE) {
                    *point2 = Some(cp);
                }
            } else if dist_sq < *min_dist_sq {
                *min_dist_sq = dist_sq;
                *point1 = cp;
            }
        }
    }
}
