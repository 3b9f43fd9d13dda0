/// Evenly spaced sample offsets on the unit segment through the origin
#[derive(Debug, Clone, PartialEq)]
pub struct LineOffsets {
    pub angle_degrees: f32,
    /// `(dx, dy)` pairs with `|offset| <= 1`
    pub offsets: Vec<(f32, f32)>,
}

impl LineOffsets {
    /// `count` is rounded up to an odd number so the origin is always sampled.
    pub fn new(angle_degrees: f32, count: usize) -> Self {
        let count = count.max(1) | 1;
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        let half = (count / 2) as f32;
        let offsets = (0..count)
            .map(|i| {
                let t = if half > 0.0 { (i as f32 - half) / half } else { 0.0 };
                (cos * t, sin * t)
            })
            .collect();
        Self {
            angle_degrees,
            offsets,
        }
    }

    /// Sample count for a blur whose largest radius is `max_radius_px`.
    ///
    /// Samples per side are capped at `diagonal_px`, since no line through an
    /// image that size can hit more distinct pixels.
    pub fn count_for_radius(max_radius_px: f32, samples_per_pixel: f32, diagonal_px: f32) -> usize {
        let wanted = (max_radius_px.max(0.0) * samples_per_pixel.max(0.0)).ceil();
        let per_side = wanted.min(diagonal_px.max(0.0).ceil()) as usize;
        per_side.saturating_mul(2).saturating_add(1)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
