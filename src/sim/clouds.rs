//! Parallax cloud layer

use glam::Vec2;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    /// Index into the `clouds` asset frames
    pub variant: usize,
    /// Horizontal drift per frame
    pub speed: f32,
    /// Parallax factor in (0, 1); smaller is farther away
    pub depth: f32,
}

impl Cloud {
    pub fn update(&mut self) {
        self.pos.x += self.speed;
    }

    /// Screen position for a camera scroll, wrapped so the cloud always
    /// reappears on the other side of the viewport.
    pub fn render_position(&self, scroll: Vec2, viewport: Vec2, image_size: Vec2) -> Vec2 {
        let shifted = self.pos - scroll * self.depth;
        let period = viewport + image_size;
        Vec2::new(
            shifted.x.rem_euclid(period.x) - image_size.x,
            shifted.y.rem_euclid(period.y) - image_size.y,
        )
    }
}

/// Clouds kept sorted by depth, far ones first
#[derive(Debug, Clone, Default)]
pub struct Clouds {
    pub clouds: Vec<Cloud>,
}

impl Clouds {
    /// Scatter `count` clouds using `variants` cloud images
    pub fn new(count: usize, variants: usize, rng: &mut impl Rng) -> Self {
        let mut clouds: Vec<Cloud> = (0..count)
            .map(|_| Cloud {
                pos: Vec2::new(rng.random::<f32>() * 99999.0, rng.random::<f32>() * 99999.0),
                variant: rng.random_range(0..variants.max(1)),
                speed: rng.random::<f32>() * 0.05 + 0.05,
                depth: rng.random::<f32>() * 0.6 + 0.2,
            })
            .collect();
        clouds.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        Self { clouds }
    }

    pub fn update(&mut self) {
        for cloud in &mut self.clouds {
            cloud.update();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_clouds_sorted_and_in_range() {
        let mut rng = Pcg32::seed_from_u64(5);
        let clouds = Clouds::new(16, 2, &mut rng);
        assert_eq!(clouds.clouds.len(), 16);
        for pair in clouds.clouds.windows(2) {
            assert!(pair[0].depth <= pair[1].depth);
        }
        for cloud in &clouds.clouds {
            assert!((0.2..=0.8).contains(&cloud.depth));
            assert!((0.05..=0.1).contains(&cloud.speed));
            assert!(cloud.variant < 2);
        }
    }

    #[test]
    fn test_clouds_drift_right() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut clouds = Clouds::new(3, 2, &mut rng);
        let before: Vec<f32> = clouds.clouds.iter().map(|c| c.pos.x).collect();
        clouds.update();
        for (cloud, x) in clouds.clouds.iter().zip(before) {
            assert!(cloud.pos.x > x);
        }
    }

    #[test]
    fn test_render_position_wraps() {
        let cloud = Cloud {
            pos: Vec2::new(10.0, 10.0),
            variant: 0,
            speed: 0.05,
            depth: 0.5,
        };
        let viewport = Vec2::new(320.0, 240.0);
        let image = Vec2::new(40.0, 20.0);

        assert_eq!(cloud.render_position(Vec2::ZERO, viewport, image), Vec2::new(-30.0, -10.0));
        // scrolled far right: still lands inside [-image, viewport)
        let pos = cloud.render_position(Vec2::new(5000.0, -700.0), viewport, image);
        assert!(pos.x >= -40.0 && pos.x < 320.0);
        assert!(pos.y >= -20.0 && pos.y < 240.0);
    }
}
