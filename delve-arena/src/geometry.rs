//! Ray casting on the `xy` plane.
use delve_core::Vec3;

/// Unit vector at `yaw` degrees.
pub fn direction(yaw: f32) -> (f32, f32) {
    let r = yaw.to_radians();
    (r.cos(), r.sin())
}

/// Distance along the ray `origin + t * dir` to a circle, `None` if the ray misses it.
///
/// `dir` must be a unit vector. The distance is `0` when the origin lies inside the circle.
pub fn ray_circle(origin: &Vec3, dir: (f32, f32), center: &Vec3, radius: f32) -> Option<f32> {
    let (ox, oy) = (center.x - origin.x, center.y - origin.y);
    let t_ca = ox * dir.0 + oy * dir.1;
    let d2 = ox * ox + oy * oy - t_ca * t_ca;
    let r2 = radius * radius;
    if d2 > r2 {
        return None;
    }
    let t_hc = (r2 - d2).sqrt();
    if t_ca - t_hc >= 0.0 {
        Some(t_ca - t_hc)
    } else if t_ca + t_hc >= 0.0 {
        Some(0.0)
    } else {
        None
    }
}

/// Distance along the ray to the walls of the square `[-half_extent, half_extent]^2`.
///
/// The origin is assumed to be inside.
pub fn ray_walls(origin: &Vec3, dir: (f32, f32), half_extent: f32) -> f32 {
    let axis = |o: f32, d: f32| {
        if d > 1e-6 {
            (half_extent - o) / d
        } else if d < -1e-6 {
            (-half_extent - o) / d
        } else {
            f32::INFINITY
        }
    };
    axis(origin.x, dir.0).min(axis(origin.y, dir.1)).max(0.0)
}
