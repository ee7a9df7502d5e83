//! Unit tests for sequential planet placement.

use helios_config::{Config, IntRange};

use super::*;
use crate::entropy::SeededEntropy;

/// Always draws the top of every range and cycles through palette indices.
struct MaxEntropy {
    next_index: usize,
}

impl MaxEntropy {
    fn new() -> Self {
        Self { next_index: 0 }
    }
}

impl Entropy for MaxEntropy {
    fn uniform(&mut self, _min: f64, max: f64) -> f64 {
        max
    }

    fn randint(&mut self, _min: i64, max: i64) -> i64 {
        max
    }

    fn index(&mut self, len: usize) -> usize {
        let i = self.next_index % len;
        self.next_index += 1;
        i
    }
}

fn layouts(config: &Config, runs: u64) -> Vec<Layout> {
    let generator = LayoutGenerator::new(config);
    (0..runs)
        .map(|seed| {
            let mut entropy = SeededEntropy::new(seed);
            generator.generate(&mut entropy).unwrap()
        })
        .collect()
}

#[test]
fn test_centers_strictly_decrease() {
    let config = Config::default();
    for layout in layouts(&config, 300) {
        assert!(layout.planets.len() <= 9);
        let mut last = layout.star.center;
        for planet in &layout.planets {
            assert!(
                planet.center < last,
                "center {} not below previous {last}",
                planet.center
            );
            last = planet.center;
        }
    }
}

#[test]
fn test_consecutive_colors_differ() {
    let config = Config::default();
    for layout in layouts(&config, 300) {
        let mut last = layout.star.color;
        for planet in &layout.planets {
            assert_ne!(planet.color, last);
            last = planet.color;
        }
    }
}

#[test]
fn test_speeds_never_zero() {
    let config = Config::default();
    for layout in layouts(&config, 300) {
        for planet in &layout.planets {
            assert_ne!(planet.speed, 0.0);
            if let Some(moon) = planet.attachment.moon() {
                assert_ne!(moon.speed, 0.0);
            }
        }
    }
}

#[test]
fn test_carried_ranges_narrow_per_accepted_planet() {
    let config = Config::default();
    for layout in layouts(&config, 300) {
        let mut last_center = layout.star.center;
        let mut last_size = layout.star.size;
        for (k, planet) in layout.planets.iter().enumerate() {
            let k = k as f64;
            assert!((5.0..=15.0).contains(&planet.size));
            assert!(planet.speed >= -15.0 - 2.0 * k && planet.speed <= 15.0 - 3.0 * k);

            let gap = last_center - last_size / 2.0 - planet.size / 2.0 - planet.center;
            assert!(
                gap >= 50.0 + 5.0 * k && gap <= 251.0,
                "gap {gap} outside narrowed range at k={k}"
            );
            last_center = planet.center;
            last_size = planet.size;
        }
    }
}

#[test]
fn test_first_planet_never_has_moon() {
    let config = Config::default();
    for layout in layouts(&config, 300) {
        if let Some(first) = layout.planets.first() {
            assert!(first.attachment.moon().is_none());
        }
    }
}

#[test]
fn test_ring_radii_grow_within_planet() {
    let config = Config::default();
    let mut seen_rings = false;
    for layout in layouts(&config, 300) {
        for planet in &layout.planets {
            let bonus = if planet.size > 10.0 { 5.0 } else { 0.0 };
            for (i, ring) in planet.attachment.rings().iter().enumerate() {
                seen_rings = true;
                let low = 15.0 + 5.0 * i as f64 + bonus;
                assert!(ring.radius >= low && ring.radius <= low + 5.0);
                assert!((2.0..=4.0).contains(&ring.width));
            }
        }
    }
    assert!(seen_rings, "no rings generated in 300 layouts");
}

#[test]
fn test_same_seed_same_layout() {
    let config = Config::default();
    let generator = LayoutGenerator::new(&config);
    let a = generator.generate(&mut SeededEntropy::new(42)).unwrap();
    let b = generator.generate(&mut SeededEntropy::new(42)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_max_draws_single_ringed_planet() {
    let config = Config::default();
    let layout = LayoutGenerator::new(&config)
        .generate(&mut MaxEntropy::new())
        .unwrap();

    assert_eq!(layout.star.size, 40.0);
    assert_eq!(layout.starfield.len(), 499);
    assert_eq!(layout.planets.len(), 1);

    let planet = &layout.planets[0];
    assert_eq!(planet.center, 221.5);
    assert_eq!(planet.speed, 15.0);
    let radii: Vec<f64> = planet.attachment.rings().iter().map(|r| r.radius).collect();
    assert_eq!(radii, vec![25.0, 30.0, 35.0]);

    let noise = planet.noise.unwrap();
    assert_eq!(noise.seed, 10_000);
    assert_eq!(noise.octaves, 3);
}

#[test]
fn test_moon_excludes_rings() {
    let mut config = Config::default();
    config.canvas.width = 2000;
    config.canvas.height = 2000;
    let layout = LayoutGenerator::new(&config)
        .generate(&mut MaxEntropy::new())
        .unwrap();

    assert_eq!(layout.planets.len(), 3);
    assert_eq!(layout.planets[0].attachment.rings().len(), 3);
    for planet in &layout.planets[1..] {
        // Ring roll is at its maximum too, but a moon takes precedence.
        let moon = planet.attachment.moon().expect("moon attached");
        assert_eq!(moon.orbit, 50.0);
        assert_eq!(moon.size, 4.0);
        assert_eq!(moon.speed, 20.0);
        assert!(planet.attachment.rings().is_empty());
    }
    let speeds: Vec<f64> = layout.planets.iter().map(|p| p.speed).collect();
    assert_eq!(speeds, vec![15.0, 12.0, 9.0]);
}

#[test]
fn test_cramped_border_accepts_nothing() {
    let mut config = Config::default();
    config.canvas.border_size = 400;
    config.star.size = IntRange::new(30, 30);
    config.validate().unwrap();

    let layout = LayoutGenerator::new(&config)
        .generate(&mut MaxEntropy::new())
        .unwrap();
    assert_eq!(layout.star.center, 500.0);
    assert_eq!(layout.star.size, 30.0);
    assert!(layout.planets.is_empty());
}

#[test]
fn test_rejected_attempt_keeps_state() {
    let mut config = Config::default();
    config.canvas.border_size = 400;
    let generator = LayoutGenerator::new(&config);
    let star = Star {
        size: 30.0,
        color: Rgb::BLACK,
        center: 500.0,
    };
    let state = PlacementState::seeded(&star, &config.layout);
    let result = generator.attempt(&mut MaxEntropy::new(), &state).unwrap();
    assert!(result.is_none());
    // The caller folds only accepted planets, so the seeded state is what the
    // next attempt sees.
    assert_eq!(state.speed_max, 15);
    assert_eq!(state.distance_min, 50);
}

#[test]
fn test_accept_advances_state() {
    let config = Config::default();
    let star = Star {
        size: 30.0,
        color: Rgb::BLACK,
        center: 500.0,
    };
    let state = PlacementState::seeded(&star, &config.layout);
    let planet = Planet {
        pos_orb: 0.0,
        speed: 3.0,
        size: 8.0,
        center: 400.0,
        color: Rgb::new(1, 2, 3),
        attachment: Attachment::None,
        noise: None,
    };
    let next = state.accept(&planet, 70, &config.layout);
    assert_eq!(next.last_center, 400.0);
    assert_eq!(next.last_size, 8.0);
    assert_eq!(next.last_color, Rgb::new(1, 2, 3));
    assert_eq!((next.speed_min, next.speed_max), (-17, 12));
    assert_eq!(next.distance_min, 55);
    assert_eq!(next.previous_distance, 70);
}

#[test]
fn test_zero_attempts_yields_empty_layout() {
    let mut config = Config::default();
    config.layout.attempts = 0;
    let layout = LayoutGenerator::new(&config)
        .generate(&mut SeededEntropy::new(1))
        .unwrap();
    assert!(layout.planets.is_empty());
}
