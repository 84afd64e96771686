use glam::Mat4;

/// Rotation about the view (Z) axis, one degree per frame.
pub fn view_axis_rotation(frame_index: u32) -> Mat4 {
    let degrees = (frame_index % 360) as f32;
    Mat4::from_rotation_z(degrees.to_radians())
}

/// Orthographic projection of window units, origin bottom-left.
///
/// Degenerate sizes are clamped to one unit.
pub fn window_ortho(width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width.max(1.0), 0.0, height.max(1.0), -1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn frame_zero_is_identity() {
        assert!(view_axis_rotation(0).abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn ninety_frames_rotate_x_onto_y() {
        let p = view_axis_rotation(90).transform_point3(Vec3::X);
        assert!(close(p, Vec3::Y));
    }

    #[test]
    fn rotation_wraps_every_360_frames() {
        assert!(view_axis_rotation(370).abs_diff_eq(view_axis_rotation(10), 1e-6));
    }

    #[test]
    fn ortho_maps_window_corners_to_clip_corners() {
        let m = window_ortho(300.0, 200.0);
        let lo = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let hi = m * Vec4::new(300.0, 200.0, 0.0, 1.0);
        assert!(close(lo.truncate(), Vec3::new(-1.0, -1.0, lo.z)));
        assert!(close(hi.truncate(), Vec3::new(1.0, 1.0, hi.z)));
        assert!((0.0..=1.0).contains(&lo.z));
    }

    #[test]
    fn ortho_tolerates_zero_size() {
        assert!(window_ortho(0.0, 0.0).is_finite());
    }
}
