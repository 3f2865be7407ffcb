/// Linear interpolation: `a + (b - a) * t`.
///
/// `t` is not clamped. For `t` in `[0, 1]` the result lies between `a` and `b`
/// and repeated application toward a fixed `b` is monotone.
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
