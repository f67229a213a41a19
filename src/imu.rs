//! IMU messages and their mapping onto the trajectory surface.

use crate::config::{PX_PER_G, STANDARD_GRAVITY};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(
        x: f64,
        y: f64,
        z: f64,
    ) -> Self {
        Self { x, y, z }
    }
}

/// IMU reading. Only linear acceleration (m/s², vehicle frame) is used.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Imu {
    pub linear_acceleration: Vector3,
    pub angular_velocity: Vector3,
}

impl Imu {
    pub const fn from_acceleration(linear_acceleration: Vector3) -> Self {
        Self {
            linear_acceleration,
            angular_velocity: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

/// Maps accelerations to surface coordinates.
///
/// Lateral acceleration (`y`) drives the horizontal axis and longitudinal
/// acceleration (`x`) the vertical one, both centered on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImuAdapter {
    px_per_g: f32,
    center: f32,
    gravity: f64,
}

impl ImuAdapter {
    pub const fn new(
        px_per_g: f32,
        center: f32,
        gravity: f64,
    ) -> Self {
        Self {
            px_per_g,
            center,
            gravity,
        }
    }

    /// Adapter for a surface of edge `size` with the default scale.
    pub fn for_size(size: u32) -> Self { Self::new(PX_PER_G, size as f32 / 2.0, STANDARD_GRAVITY) }

    #[inline]
    pub const fn px_per_g(&self) -> f32 { self.px_per_g }

    /// Surface coordinates for `imu`. May fall outside the surface.
    pub fn to_canvas(
        &self,
        imu: &Imu,
    ) -> (f32, f32) {
        let accel = imu.linear_acceleration;
        let lateral_g = (accel.y / self.gravity) as f32;
        let longitudinal_g = (accel.x / self.gravity) as f32;
        (
            lateral_g.mul_add(self.px_per_g, self.center),
            longitudinal_g.mul_add(self.px_per_g, self.center),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_maps_to_center() {
        let adapter = ImuAdapter::for_size(200);
        assert_eq!(adapter.to_canvas(&Imu::default()), (100.0, 100.0));
    }

    #[test]
    fn test_one_g_per_axis() {
        let adapter = ImuAdapter::for_size(200);

        let lateral = Imu::from_acceleration(Vector3::new(0.0, 9.8, 0.0));
        let (x, y) = adapter.to_canvas(&lateral);
        assert!((x - 125.0).abs() < 1e-4, "1 g lateral moves 25 units right, got {x}");
        assert!((y - 100.0).abs() < 1e-4);

        let braking = Imu::from_acceleration(Vector3::new(-19.6, 0.0, 0.0));
        let (x, y) = adapter.to_canvas(&braking);
        assert!((x - 100.0).abs() < 1e-4);
        assert!((y - 50.0).abs() < 1e-4, "-2 g longitudinal moves 50 units up, got {y}");
    }

    #[test]
    fn test_vertical_axis_ignored() {
        let adapter = ImuAdapter::for_size(200);
        let imu = Imu::from_acceleration(Vector3::new(0.0, 0.0, 9.8));
        assert_eq!(adapter.to_canvas(&imu), (100.0, 100.0));
    }
}
