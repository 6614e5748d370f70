//! Pan/zoom transform mathematics.
//!
//! Pure value operations, extracted from the viewer state for testability.
//! Clamping to the allowed scale range happens here; the viewer layers its
//! translate invariant on top.

/// Scale plus translation of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Transform {
    /// Create a new transform with the given scale and translation.
    pub fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Create an identity transform (scale=1, no translation).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Replace the translation, keeping the scale.
    pub fn with_translate(&self, translate_x: f64, translate_y: f64) -> Transform {
        Transform::new(self.scale, translate_x, translate_y)
    }

    /// Replace the scale, keeping the translation.
    pub fn with_scale(&self, scale: f64) -> Transform {
        Transform::new(scale, self.translate_x, self.translate_y)
    }

    /// Zoom in by a factor (e.g., 1.2 for 20% zoom in).
    pub fn zoom_in(&self, factor: f64, max_scale: f64) -> Transform {
        self.with_scale((self.scale * factor).min(max_scale))
    }

    /// Zoom out by a factor (e.g., 1.2 for 20% zoom out).
    pub fn zoom_out(&self, factor: f64, min_scale: f64) -> Transform {
        self.with_scale((self.scale / factor).max(min_scale))
    }

    /// Whether any translation is applied.
    pub fn is_translated(&self) -> bool {
        self.translate_x != 0.0 || self.translate_y != 0.0
    }

    /// CSS transform string: `scale(<s>) translate(<x>px, <y>px)`.
    pub fn to_css(&self) -> String {
        format!(
            "scale({}) translate({}px, {}px)",
            self.scale, self.translate_x, self.translate_y
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.0001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.translate_x, 0.0);
        assert_eq!(t.translate_y, 0.0);
        assert!(!t.is_translated());
    }

    #[test]
    fn test_with_translate_keeps_scale() {
        let t = Transform::new(2.0, 10.0, 20.0).with_translate(15.0, -4.0);

        assert_eq!(t.scale, 2.0);
        assert_eq!(t.translate_x, 15.0);
        assert_eq!(t.translate_y, -4.0);
        assert!(t.is_translated());
    }

    #[test]
    fn test_zoom_in_with_max() {
        let t = Transform::new(4.5, 0.0, 0.0);
        let new_t = t.zoom_in(1.2, 5.0);

        // 4.5 * 1.2 = 5.4, but max is 5.0
        assert_eq!(new_t.scale, 5.0);
    }

    #[test]
    fn test_zoom_out_with_min() {
        let t = Transform::new(0.11, 0.0, 0.0);
        let new_t = t.zoom_out(1.2, 0.1);

        assert_eq!(new_t.scale, 0.1);
    }

    #[test]
    fn test_zoom_in_normal() {
        let t = Transform::identity();
        assert!(approx_eq(t.zoom_in(1.2, 5.0).scale, 1.2));
    }

    #[test]
    fn test_zoom_out_normal() {
        let t = Transform::identity();
        assert!(approx_eq(t.zoom_out(1.2, 0.1).scale, 1.0 / 1.2));
    }

    #[test]
    fn test_zoom_keeps_translation() {
        let t = Transform::new(2.0, 30.0, -4.0);
        let zoomed = t.zoom_in(1.2, 5.0);
        assert_eq!(zoomed.translate_x, 30.0);
        assert_eq!(zoomed.translate_y, -4.0);
    }

    #[test]
    fn test_css_string() {
        assert_eq!(Transform::identity().to_css(), "scale(1) translate(0px, 0px)");
        assert_eq!(
            Transform::new(1.2, -15.5, 40.0).to_css(),
            "scale(1.2) translate(-15.5px, 40px)"
        );
    }
}
