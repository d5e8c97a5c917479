//! Planar reflection utilities.

use glam::{Mat4, Vec3, Vec4};

use crate::camera::Camera;

/// Computes a reflection matrix for a plane.
///
/// The plane is defined by a point on the plane and its normal.
/// The resulting matrix reflects points across this plane.
pub fn reflection_matrix(plane_point: Vec3, plane_normal: Vec3) -> Mat4 {
    let n = plane_normal.normalize();
    let d = -plane_point.dot(n);

    // | 1-2nx²   -2nxny   -2nxnz   -2nxd |
    // | -2nxny   1-2ny²   -2nynz   -2nyd |
    // | -2nxnz   -2nynz   1-2nz²   -2nzd |
    // |    0        0        0       1   |
    Mat4::from_cols(
        Vec4::new(1.0 - 2.0 * n.x * n.x, -2.0 * n.x * n.y, -2.0 * n.x * n.z, 0.0),
        Vec4::new(-2.0 * n.x * n.y, 1.0 - 2.0 * n.y * n.y, -2.0 * n.y * n.z, 0.0),
        Vec4::new(-2.0 * n.x * n.z, -2.0 * n.y * n.z, 1.0 - 2.0 * n.z * n.z, 0.0),
        Vec4::new(-2.0 * n.x * d, -2.0 * n.y * d, -2.0 * n.z * d, 1.0),
    )
}

/// Computes a reflection matrix for a horizontal plane at given height.
///
/// Assumes Y-up coordinate system.
pub fn ground_reflection_matrix(height: f32) -> Mat4 {
    reflection_matrix(Vec3::new(0.0, height, 0.0), Vec3::Y)
}

/// Mirrors `camera` across a horizontal plane at `height`.
///
/// Position, target and up are reflected; the projection is kept. Returns
/// `None` when the camera is not above the plane, since a mirror seen from
/// behind shows nothing.
pub fn mirror_camera(camera: &Camera, height: f32) -> Option<Camera> {
    if camera.position.y <= height {
        return None;
    }
    let mirror = ground_reflection_matrix(height);
    Some(Camera {
        position: mirror.transform_point3(camera.position),
        target: mirror.transform_point3(camera.target),
        up: mirror.transform_vector3(camera.up),
        ..camera.clone()
    })
}

/// Maps world positions to `[0, 1]` texture coordinates of an image rendered
/// with `view_projection`, row 0 at the top.
pub fn texture_matrix(view_projection: Mat4) -> Mat4 {
    let bias = Mat4::from_cols(
        Vec4::new(0.5, 0.0, 0.0, 0.0),
        Vec4::new(0.0, -0.5, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.5, 0.5, 0.0, 1.0),
    );
    bias * view_projection
}
