//! Precomputed bilateral kernel tables.
//!
//! Both kernels are tabulated once per run: the color kernel over every
//! possible rounded L1 color distance, the spatial kernel over the support
//! window offsets.

/// Immutable color-distance and spatial-distance weight tables.
pub struct WeightTables {
    color: Vec<f32>,
    spatial: Vec<f32>,
    radius: i32,
}

impl WeightTables {
    /// Build tables for `channels`-channel 8-bit color and a window of the
    /// given radius.
    ///
    /// `color[k] = exp(-k / (channels * gamma_color))`, accumulated
    /// multiplicatively so `color[0] == 1` exactly.
    /// `spatial[(dy+r)(2r+1) + dx+r] = exp(-sqrt(dx^2+dy^2) / gamma_position)`.
    pub fn new(channels: u32, radius: i32, gamma_color: f32, gamma_position: f32) -> Self {
        let levels = channels as usize * 255 + 1;
        let decay = (-1.0 / (channels as f32 * gamma_color)).exp();
        let mut color = Vec::with_capacity(levels);
        let mut weight = 1.0f32;
        for _ in 0..levels {
            color.push(weight);
            weight *= decay;
        }

        let dim = (2 * radius + 1) as usize;
        let mut spatial = Vec::with_capacity(dim * dim);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let rho = ((dx * dx + dy * dy) as f32).sqrt();
                spatial.push((-rho / gamma_position).exp());
            }
        }

        Self {
            color,
            spatial,
            radius,
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Side length of the support window, `2 * radius + 1`.
    pub fn window_dim(&self) -> usize {
        (2 * self.radius + 1) as usize
    }

    /// Weight for a rounded L1 color distance.
    #[inline]
    pub fn color_weight(&self, distance: usize) -> f32 {
        self.color[distance]
    }

    /// Weight for a window offset, indexed `(dy+r) * (2r+1) + dx+r`.
    #[inline]
    pub fn spatial_weight(&self, index: usize) -> f32 {
        self.spatial[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_table_is_a_geometric_sequence() {
        let tables = WeightTables::new(3, 2, 12.0, 17.5);
        let decay = (-1.0f32 / (3.0 * 12.0)).exp();

        assert_eq!(tables.color_weight(0), 1.0);
        for k in 0..3 * 255 {
            let w = tables.color_weight(k);
            assert!(w > 0.0);
            assert!(tables.color_weight(k + 1) < w);
            assert!((tables.color_weight(k + 1) - w * decay).abs() < 1e-12);
        }
    }

    #[test]
    fn spatial_table_peaks_at_the_center() {
        let r = 3;
        let tables = WeightTables::new(3, r, 12.0, 17.5);
        let dim = tables.window_dim();
        let center = (r as usize) * dim + r as usize;

        assert_eq!(tables.spatial_weight(center), 1.0);
        for dy in -r..=r {
            for dx in -r..=r {
                let w = tables.spatial_weight(((dy + r) as usize) * dim + (dx + r) as usize);
                assert!(w > 0.0);
                assert!(w <= tables.spatial_weight(center));
            }
        }

        // Strictly decreasing with Euclidean distance along the axes.
        let at = |dx: i32, dy: i32| {
            tables.spatial_weight(((dy + r) as usize) * dim + (dx + r) as usize)
        };
        assert!(at(1, 0) > at(2, 0));
        assert!(at(0, 1) > at(0, 2));
    }
}
