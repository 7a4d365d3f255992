//! Coordinate and viewport transforms shared by effects and the host

use glam::Vec2;

use crate::viewport::ViewportDimensions;

/// Default scroll parallax factor (`data-parallax` without a value)
pub const DEFAULT_PARALLAX_SPEED: f32 = 0.5;
/// Default pointer parallax depth in pixels
pub const DEFAULT_PARALLAX_DEPTH: f32 = 20.0;
/// Fraction of the pointer offset a magnetic element follows
pub const MAGNETIC_FACTOR: f32 = 0.3;
/// Pixels of pointer offset per degree of tilt
pub const TILT_DIVISOR: f32 = 10.0;

/// Result of a perspective divide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub screen: Vec2,
    /// `viewport_width / depth`; multiply sizes by this
    pub scale: f32,
}

/// Perspective-project a depth-bearing point around the viewport center.
///
/// `None` for non-positive depth or a viewport that is not renderable.
pub fn project_perspective(
    point: Vec2,
    depth: f32,
    viewport: ViewportDimensions,
) -> Option<Projection> {
    if depth <= 0.0 || !viewport.is_renderable() {
        return None;
    }
    let center = viewport.center();
    let scale = viewport.width / depth;
    Some(Projection {
        screen: (point - center) * scale + center,
        scale,
    })
}

/// Star brightness from depth: 0 at the far plane, 1 at the eye.
/// Depth may exceed the width right after a resize, so clamp.
#[inline]
pub fn depth_alpha(depth: f32, viewport_width: f32) -> f32 {
    if viewport_width <= 0.0 {
        return 0.0;
    }
    (1.0 - depth / viewport_width).clamp(0.0, 1.0)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// CSS-like ease-in-out
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// `floatShape` keyframes: (offset, rotation in degrees) at 0, 25, 50, 75, 100%
const FLOAT_KEYFRAMES: [(Vec2, f32); 5] = [
    (Vec2::new(0.0, 0.0), 0.0),
    (Vec2::new(50.0, -50.0), 90.0),
    (Vec2::new(0.0, -100.0), 180.0),
    (Vec2::new(-50.0, -50.0), 270.0),
    (Vec2::new(0.0, 0.0), 360.0),
];

/// Offset and rotation (radians) of a floating shape at `phase` in [0, 1)
pub fn float_keyframe(phase: f32) -> (Vec2, f32) {
    let phase = phase.rem_euclid(1.0);
    let scaled = phase * 4.0;
    let index = (scaled.floor() as usize).min(3);
    let t = ease_in_out(scaled - index as f32);
    let (from_offset, from_rot) = FLOAT_KEYFRAMES[index];
    let (to_offset, to_rot) = FLOAT_KEYFRAMES[index + 1];
    let offset = from_offset.lerp(to_offset, t);
    let rotation = from_rot + (to_rot - from_rot) * t;
    (offset, rotation.to_radians())
}

/// Vertical translation of a scroll-parallax element
#[inline]
pub fn parallax_scroll(scroll_offset: f32, speed: f32) -> f32 {
    scroll_offset * speed
}

/// Translation of a depth-parallax element following the pointer
pub fn parallax_pointer(pointer: Vec2, viewport: ViewportDimensions, depth: f32) -> Vec2 {
    if !viewport.is_renderable() {
        return Vec2::ZERO;
    }
    let normalized = Vec2::new(pointer.x / viewport.width, pointer.y / viewport.height) - 0.5;
    normalized * depth
}

/// Axis-aligned element bounds in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ElementRect {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Pointer over the element (right and bottom edges excluded)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left
            && p.y >= self.top
            && p.x < self.left + self.width
            && p.y < self.top + self.height
    }
}

/// Translation that pulls an element toward the pointer
#[inline]
pub fn magnetic_offset(pointer: Vec2, rect: ElementRect) -> Vec2 {
    (pointer - rect.center()) * MAGNETIC_FACTOR
}

/// (rotateX, rotateY) in degrees for a 3D tilt card under the pointer
pub fn tilt_angles(pointer: Vec2, rect: ElementRect) -> (f32, f32) {
    let local = pointer - Vec2::new(rect.left, rect.top);
    let half = Vec2::new(rect.width / 2.0, rect.height / 2.0);
    let rotate_x = (local.y - half.y) / TILT_DIVISOR;
    let rotate_y = (half.x - local.x) / TILT_DIVISOR;
    (rotate_x, rotate_y)
}

/// How a decorated page element reacts to the pointer and scroll
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementRole {
    /// Moves with scroll at `speed` and against the pointer by `depth` pixels
    Parallax { speed: f32, depth: f32 },
    /// Pulled toward the pointer while hovered
    Magnetic,
    /// 3D tilt card while hovered
    Tilt,
}

/// CSS `transform` value for an element with `role` at `rect`
pub fn element_transform(
    role: ElementRole,
    rect: ElementRect,
    pointer: Option<Vec2>,
    scroll_offset: f32,
    viewport: ViewportDimensions,
) -> String {
    let hovered = pointer.filter(|p| rect.contains(*p));
    match role {
        ElementRole::Parallax { speed, depth } => {
            let shift = pointer.map_or(Vec2::ZERO, |p| parallax_pointer(p, viewport, depth));
            let y = shift.y + parallax_scroll(scroll_offset, speed);
            format!("translate({:.2}px, {:.2}px)", shift.x, y)
        }
        ElementRole::Magnetic => {
            let pull = hovered.map_or(Vec2::ZERO, |p| magnetic_offset(p, rect));
            format!("translate({:.2}px, {:.2}px)", pull.x, pull.y)
        }
        ElementRole::Tilt => match hovered {
            Some(p) => {
                let (rx, ry) = tilt_angles(p, rect);
                format!(
                    "perspective(1000px) rotateX({:.2}deg) rotateY({:.2}deg) scale3d(1.05, 1.05, 1.05)",
                    rx, ry
                )
            }
            None => "perspective(1000px) rotateX(0deg) rotateY(0deg) scale3d(1, 1, 1)".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: ViewportDimensions = ViewportDimensions::new(800.0, 600.0);

    #[test]
    fn test_projection_at_far_plane_is_identity() {
        let p = project_perspective(Vec2::new(100.0, 50.0), 800.0, VP).unwrap();
        assert_eq!(p.screen, Vec2::new(100.0, 50.0));
        assert_eq!(p.scale, 1.0);
    }

    #[test]
    fn test_projection_pushes_outward_when_near() {
        let p = project_perspective(Vec2::new(500.0, 300.0), 400.0, VP).unwrap();
        // 100 px right of center, doubled
        assert_eq!(p.screen, Vec2::new(600.0, 300.0));
        assert_eq!(p.scale, 2.0);
    }

    #[test]
    fn test_projection_rejects_zero_depth_and_empty_viewport() {
        assert!(project_perspective(Vec2::ZERO, 0.0, VP).is_none());
        assert!(project_perspective(Vec2::ZERO, -3.0, VP).is_none());
        assert!(project_perspective(Vec2::ZERO, 10.0, ViewportDimensions::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_depth_alpha_clamped() {
        assert_eq!(depth_alpha(800.0, 800.0), 0.0);
        assert_eq!(depth_alpha(1200.0, 800.0), 0.0);
        assert_eq!(depth_alpha(400.0, 800.0), 0.5);
        assert_eq!(depth_alpha(0.0, 800.0), 1.0);
        assert_eq!(depth_alpha(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_float_keyframes() {
        let (offset, rot) = float_keyframe(0.0);
        assert_eq!(offset, Vec2::ZERO);
        assert_eq!(rot, 0.0);

        let (offset, rot) = float_keyframe(0.5);
        assert!((offset - Vec2::new(0.0, -100.0)).length() < 1e-4);
        assert!((rot - std::f32::consts::PI).abs() < 1e-4);

        // Loops back to the start
        let (offset, _) = float_keyframe(0.9999);
        assert!(offset.length() < 0.1);
    }

    #[test]
    fn test_element_transforms() {
        let rect = ElementRect {
            left: 100.0,
            top: 100.0,
            width: 200.0,
            height: 100.0,
        };
        let pull = magnetic_offset(Vec2::new(210.0, 150.0), rect);
        assert!((pull - Vec2::new(3.0, 0.0)).length() < 1e-5);
        let (rx, ry) = tilt_angles(Vec2::new(300.0, 200.0), rect);
        assert_eq!((rx, ry), (5.0, -10.0));
        assert_eq!(parallax_scroll(200.0, DEFAULT_PARALLAX_SPEED), 100.0);
        assert_eq!(
            parallax_pointer(Vec2::new(800.0, 600.0), VP, DEFAULT_PARALLAX_DEPTH),
            Vec2::new(10.0, 10.0)
        );
    }

    #[test]
    fn test_element_transform_by_role() {
        let rect = ElementRect {
            left: 100.0,
            top: 100.0,
            width: 200.0,
            height: 100.0,
        };
        let inside = Some(Vec2::new(210.0, 150.0));
        let outside = Some(Vec2::new(10.0, 10.0));

        assert_eq!(
            element_transform(ElementRole::Magnetic, rect, inside, 0.0, VP),
            "translate(3.00px, 0.00px)"
        );
        assert_eq!(
            element_transform(ElementRole::Magnetic, rect, outside, 0.0, VP),
            "translate(0.00px, 0.00px)"
        );
        assert!(element_transform(ElementRole::Tilt, rect, outside, 0.0, VP).contains("rotateX(0deg)"));
        assert!(element_transform(ElementRole::Tilt, rect, inside, 0.0, VP).contains("scale3d(1.05"));

        let parallax = ElementRole::Parallax {
            speed: DEFAULT_PARALLAX_SPEED,
            depth: DEFAULT_PARALLAX_DEPTH,
        };
        assert_eq!(
            element_transform(parallax, rect, None, 200.0, VP),
            "translate(0.00px, 100.00px)"
        );
        assert_eq!(
            element_transform(parallax, rect, Some(Vec2::new(800.0, 600.0)), 0.0, VP),
            "translate(10.00px, 10.00px)"
        );
    }
}
