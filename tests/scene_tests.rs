//! End-to-end tests driving a whole [`Scene`] frame by frame.
//!
//! Random sources are injected per trigger so each test decides which
//! triggers may fire: `StepRng::new(0, 0)` makes every roll succeed and
//! `StepRng::new(u64::MAX, 0)` makes every roll fail.

use airglow::canvas::{DrawCommand, DrawList, Layer};
use airglow::effects::{Effect, WeatherKind};
use airglow::prelude::*;
use airglow::series::mean;
use rand::rngs::mock::StepRng;
use rand::rngs::SmallRng;
use rand::RngCore;
use std::cell::RefCell;
use std::ops::RangeInclusive;

// ============================================================================
// Helpers
// ============================================================================

fn always() -> Box<dyn RngCore> {
    Box::new(StepRng::new(0, 0))
}

fn never() -> Box<dyn RngCore> {
    Box::new(StepRng::new(u64::MAX, 0))
}

fn seeded(seed: u64) -> Box<dyn RngCore> {
    Box::new(SmallRng::seed_from_u64(seed))
}

fn quiet_rngs() -> EffectRngs {
    EffectRngs {
        weather: never(),
        sparkle: never(),
        hover: never(),
        spawn: seeded(10),
        motion: seeded(11),
    }
}

fn config() -> SceneConfig {
    SceneConfig::new()
        .with_particle_count(50)
        .with_fixed_timestep(1.0 / 60.0)
        .with_autoplay(None)
}

fn hong_kong() -> RegionalDataset {
    RegionalDataset::hong_kong(&mut SmallRng::seed_from_u64(99))
}

/// Single-series dataset with every year at `value`.
fn flat(value: f32, years: usize) -> RegionalDataset {
    let overall = TimeSeries::new(2000, vec![vec![value; 4]; years]).unwrap();
    RegionalDataset::new(overall, Vec::new()).unwrap()
}

fn scene<D: DataProvider>(data: D, rngs: EffectRngs) -> Scene<D> {
    Scene::with_rngs(config(), data, seeded(0), rngs).unwrap()
}

/// Pointer position that misses every district and the timeline.
const IDLE: Vec2 = Vec2::new(5.0, 5.0);

/// Provider wrapper that records every year it is asked about.
struct Recording {
    inner: RegionalDataset,
    queried: RefCell<Vec<i32>>,
}

impl Recording {
    fn new(inner: RegionalDataset) -> Self {
        Self {
            inner,
            queried: RefCell::new(Vec::new()),
        }
    }

    fn out_of_range(&self) -> Vec<i32> {
        let years = self.inner.years();
        self.queried
            .borrow()
            .iter()
            .copied()
            .filter(|y| !years.contains(y))
            .collect()
    }
}

impl DataProvider for Recording {
    fn years(&self) -> RangeInclusive<i32> {
        self.inner.years()
    }

    fn sample(&self, year: i32) -> &[f32] {
        self.queried.borrow_mut().push(year);
        self.inner.sample(year)
    }

    fn district_count(&self) -> usize {
        self.inner.district_count()
    }

    fn district_name(&self, district: usize) -> &str {
        self.inner.district_name(district)
    }

    fn district_sample(&self, district: usize, year: i32) -> &[f32] {
        self.queried.borrow_mut().push(year);
        self.inner.district_sample(district, year)
    }
}

// ============================================================================
// Time cursor
// ============================================================================

#[test]
fn test_year_jump_converges_exactly() {
    let mut scene = scene(Recording::new(hong_kong()), quiet_rngs());
    assert_eq!(scene.current_year(), 1993.0);

    scene.set_target_year(2023.0);
    let mut frames = 0;
    while scene.current_year() != 2023.0 {
        scene.advance_frame(IDLE);
        frames += 1;
        assert!(frames < 1000, "cursor never settled");
    }

    assert!(scene.cursor().is_settled());
    let expected = mean(scene.data().sample(2023));
    assert!((scene.index_value() - expected).abs() < 1e-4);

    // keep running at the last year: the next year is never requested
    for _ in 0..10 {
        scene.advance_frame(IDLE);
    }
    assert_eq!(scene.data().out_of_range(), Vec::<i32>::new());
}

#[test]
fn test_target_outside_range_is_clamped() {
    let mut scene = scene(Recording::new(hong_kong()), quiet_rngs());
    scene.set_target_year(2100.0);
    assert_eq!(scene.target_year(), 2023.0);
    scene.set_target_year(1900.0);
    assert_eq!(scene.target_year(), 1993.0);
    scene.advance_frame(IDLE);
    assert!(scene.data().out_of_range().is_empty());
}

#[test]
fn test_index_value_moves_monotonically_between_years() {
    // 2000 = 20, 2001 = 120: the value should only rise while easing
    let overall = TimeSeries::new(2000, vec![vec![20.0], vec![120.0]]).unwrap();
    let data = RegionalDataset::new(overall, Vec::new()).unwrap();
    let mut scene = scene(data, quiet_rngs());

    scene.set_target_year(2001.0);
    let mut last = scene.index_value();
    for _ in 0..300 {
        scene.advance_frame(IDLE);
        assert!(scene.index_value() >= last);
        last = scene.index_value();
    }
    assert_eq!(scene.index_value(), 120.0);
}

// ============================================================================
// Effects
// ============================================================================

#[test]
fn test_explosion_decays_and_is_pruned() {
    let mut scene = scene(hong_kong(), quiet_rngs());
    scene.spawn_explosion(Vec2::new(600.0, 400.0), Vec3::new(1.0, 0.5, 0.0), 20);
    assert_eq!(scene.effects().explosions().len(), 1);
    assert_eq!(scene.effects().explosions()[0].sparks().len(), 20);

    scene.advance_frame(IDLE);
    let explosion = &scene.effects().explosions()[0];
    assert_eq!(explosion.age(), 1);
    assert!(explosion.sparks().iter().all(|s| s.life < 120));

    for _ in 1..120 {
        scene.advance_frame(IDLE);
    }
    assert!(scene.effects().explosions().is_empty());
}

#[test]
fn test_weather_is_exclusive_and_persistent() {
    let rngs = EffectRngs {
        weather: always(),
        ..quiet_rngs()
    };
    // 20 sits below the rain threshold
    let mut scene = scene(flat(20.0, 3), rngs);

    for _ in 0..50 {
        scene.advance_frame(IDLE);
        let weather = scene.effects().weather().expect("rain should have rolled in");
        assert_eq!(weather.kind(), WeatherKind::Rain);
        assert_eq!(weather.len(), 20);
    }
}

#[test]
fn test_fog_rolls_in_above_threshold() {
    let rngs = EffectRngs {
        weather: always(),
        ..quiet_rngs()
    };
    let mut scene = scene(flat(130.0, 2), rngs);
    scene.advance_frame(IDLE);
    let weather = scene.effects().weather().unwrap();
    assert_eq!(weather.kind(), WeatherKind::Fog);
    assert_eq!(weather.len(), 100);
}

#[test]
fn test_no_weather_between_thresholds() {
    let rngs = EffectRngs {
        weather: always(),
        ..quiet_rngs()
    };
    let mut scene = scene(flat(75.0, 2), rngs);
    for _ in 0..20 {
        scene.advance_frame(IDLE);
    }
    assert!(scene.effects().weather().is_none());
}

#[test]
fn test_weather_override_replaces_active_weather() {
    let rngs = EffectRngs {
        weather: always(),
        ..quiet_rngs()
    };
    let mut scene = scene(flat(130.0, 2), rngs);
    scene.advance_frame(IDLE);
    assert_eq!(scene.effects().weather().map(|w| w.kind()), Some(WeatherKind::Fog));

    assert!(scene.handle(Command::Weather));
    assert_eq!(scene.effects().weather().map(|w| w.kind()), Some(WeatherKind::Fog));

    scene.handle(Command::ClearEffects);
    assert!(scene.effects().weather().is_none());
}

#[test]
fn test_sparkles_spawn_in_every_district_when_forced() {
    let rngs = EffectRngs {
        sparkle: always(),
        ..quiet_rngs()
    };
    let mut scene = scene(hong_kong(), rngs);
    scene.advance_frame(IDLE);
    assert_eq!(scene.effects().sparkles().len(), scene.layout().len());
}

#[test]
fn test_expired_effects_never_survive_a_frame() {
    let rngs = EffectRngs {
        weather: always(),
        sparkle: always(),
        hover: always(),
        spawn: seeded(5),
        motion: seeded(6),
    };
    let mut scene = scene(hong_kong(), rngs);

    for frame in 0..400 {
        // alternate between two districts so hover ripples keep coming
        let district = (frame / 40) % 2;
        let pointer = scene.layout().cell(district).unwrap().center();
        if frame % 90 == 0 {
            scene.spawn_explosion(pointer, Vec3::ONE, 10);
        }
        scene.advance_frame(pointer);

        let effects = scene.effects();
        assert!(effects.ripples().iter().all(|r| r.radius() < 100.0));
        assert!(effects.floating().iter().all(|f| f.age() < 180));
        assert!(effects.explosions().iter().all(|e| e.age() < 120 && !e.sparks().is_empty()));
        assert!(effects.sparkles().iter().all(|s| s.alpha() > 0.0));
        assert!(effects.rainbow().points().iter().all(|p| p.life() > 0));
    }
    assert!(scene.effects().total() > 0);
}

#[test]
fn test_rainbow_trail_follows_pointer() {
    let mut scene = scene(hong_kong(), quiet_rngs());
    scene.handle(Command::ToggleRainbow);
    for i in 0..20 {
        scene.advance_frame(Vec2::new(100.0 + i as f32 * 10.0, 50.0));
    }
    assert_eq!(scene.effects().rainbow().points().len(), 20);

    scene.handle(Command::ToggleRainbow);
    assert!(scene.effects().rainbow().is_empty());
    scene.advance_frame(Vec2::new(400.0, 50.0));
    assert!(scene.effects().rainbow().is_empty());
}

// ============================================================================
// Ambient field
// ============================================================================

#[test]
fn test_ambient_population_is_fixed_and_wrapped() {
    let mut scene = scene(hong_kong(), quiet_rngs());
    let bounds = scene.config().bounds();
    for _ in 0..600 {
        scene.advance_frame(IDLE);
    }
    assert_eq!(scene.ambient().len(), 50);
    for p in scene.ambient().particles() {
        assert!(p.position.x >= 0.0 && p.position.x <= bounds.x);
        assert!(p.position.y >= 0.0 && p.position.y <= bounds.y);
    }
}

#[test]
fn test_ambient_appearance_tracks_index() {
    let overall = TimeSeries::new(2000, vec![vec![30.0], vec![140.0]]).unwrap();
    let data = RegionalDataset::new(overall, Vec::new()).unwrap();
    let mut scene = scene(data, quiet_rngs());
    let clean = scene.ambient().particles()[0].appearance;

    scene.set_target_year(2001.0);
    for _ in 0..300 {
        scene.advance_frame(IDLE);
    }
    let dirty = scene.ambient().particles()[0].appearance;
    assert!(dirty.size > clean.size);
    assert!(dirty.speed > clean.speed);
    assert!(scene
        .ambient()
        .particles()
        .iter()
        .all(|p| p.appearance == dirty));
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_layers_are_drawn_in_order() {
    let mut scene = scene(hong_kong(), quiet_rngs());
    scene.spawn_explosion(Vec2::new(600.0, 400.0), Vec3::ONE, 5);
    scene.advance_frame(Vec2::new(200.0, 200.0));

    let mut list = DrawList::new(scene.config().bounds());
    scene.draw(&mut list);
    assert_eq!(list.layers(), Layer::ORDER.to_vec());
    assert!(matches!(
        list.layer_commands(Layer::Background).first(),
        Some(DrawCommand::Clear(_))
    ));
    assert!(!list.layer_commands(Layer::Explosions).is_empty());
}

#[test]
fn test_draw_does_not_mutate() {
    let mut scene = scene(hong_kong(), quiet_rngs());
    scene.advance_frame(Vec2::new(200.0, 200.0));

    let mut first = DrawList::new(scene.config().bounds());
    let mut second = DrawList::new(scene.config().bounds());
    scene.draw(&mut first);
    scene.draw(&mut second);
    assert_eq!(first.commands(), second.commands());
}

#[test]
fn test_raster_frame_has_background_and_regions() {
    let config = config().with_screen_size(300.0, 400.0).with_particle_count(1);
    let mut scene = Scene::with_rngs(config, hong_kong(), seeded(0), quiet_rngs()).unwrap();
    scene.advance_frame(IDLE);

    let mut canvas = RasterCanvas::new(300, 400);
    scene.draw(&mut canvas);
    let background = airglow::ramp::BACKGROUND;
    let corners = [(1, 1), (298, 1), (1, 398), (298, 398)];
    assert!(corners.iter().any(|&(x, y)| {
        let pixel = canvas.pixel(x, y).unwrap();
        (pixel - background).abs().max_element() < 1e-5
    }));

    let center = scene.layout().cell(0).unwrap().center();
    let region = canvas.pixel(center.x as u32, center.y as u32).unwrap();
    assert_ne!(region, background);
}
