use cgmath::{Deg, InnerSpace, Matrix4, One, Quaternion, Rad, Rotation3, Vector3};

/// Radius of the virtual sphere in normalized viewport units.
const TRACKBALL_SIZE: f32 = 0.8;

/// Drags between quaternion renormalizations.
const RENORM_COUNT: u32 = 97;

/// Virtual-sphere orbit control.
///
/// A drag from `(x, y)` to `(x + dx, y + dy)` in normalized `[-1, 1]`
/// viewport space is projected onto a sphere (a hyperbolic sheet far from
/// the center) and turned into the rotation carrying one projected point to
/// the other. Rotations accumulate into a single quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trackball {
    rotation: Quaternion<f32>,
    initial: Quaternion<f32>,
    theta: f32,
    phi: f32,
    distance: f32,
    count: u32,
}

impl Trackball {
    /// Trackball tilted `theta` degrees about X.
    pub fn new(theta: f32, distance: f32) -> Self {
        Self::with_orientation(theta, 0.0, distance)
    }

    /// Trackball tilted `theta` degrees about X and `phi` degrees about Z.
    pub fn with_orientation(theta: f32, phi: f32, distance: f32) -> Self {
        let initial = Quaternion::from_angle_z(Deg(phi)) * Quaternion::from_angle_x(Deg(theta));
        Self {
            rotation: initial,
            initial,
            theta,
            phi,
            distance,
            count: 0,
        }
    }

    /// Accumulates the rotation of a drag starting at `(x, y)`.
    pub fn drag_to(&mut self, x: f32, y: f32, dx: f32, dy: f32) {
        let step = drag_rotation(x, y, dx, dy);
        self.rotation = self.rotation * step;

        self.count += 1;
        if self.count > RENORM_COUNT {
            self.rotation = self.rotation.normalize();
            self.count = 0;
        }
    }

    /// Restores the orientation the trackball was built with.
    pub fn reset(&mut self) {
        self.rotation = self.initial;
        self.count = 0;
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from(self.rotation)
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        self.rotation
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn phi(&self) -> f32 {
        self.phi
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }
}

fn drag_rotation(x: f32, y: f32, dx: f32, dy: f32) -> Quaternion<f32> {
    if dx == 0.0 && dy == 0.0 {
        return Quaternion::one();
    }

    let last = Vector3::new(x, y, project(TRACKBALL_SIZE, x, y));
    let new = Vector3::new(x + dx, y + dy, project(TRACKBALL_SIZE, x + dx, y + dy));

    let axis = new.cross(last);
    if axis.magnitude2() <= f32::EPSILON * f32::EPSILON {
        return Quaternion::one();
    }

    let t = ((last - new).magnitude() / (2.0 * TRACKBALL_SIZE)).clamp(-1.0, 1.0);
    let phi = 2.0 * t.asin();
    Quaternion::from_axis_angle(axis.normalize(), Rad(phi))
}

/// Depth of `(x, y)` on a sphere of radius `r`, or on a hyperbolic sheet
/// once the point is far enough from the center.
fn project(r: f32, x: f32, y: f32) -> f32 {
    let d = (x * x + y * y).sqrt();
    if d < r * std::f32::consts::FRAC_1_SQRT_2 {
        (r * r - d * d).sqrt()
    } else {
        let t = r / std::f32::consts::SQRT_2;
        t * t / d
    }
}
