//! End-to-end reproduction of the brightness divergence between paths.
//!
//! Scene: low sun ahead of the camera so its glitter path lies on the water
//! in view, gentle waves, `distortion_scale = 2`, water `0x001e0f`, sun
//! `0xffffff`, and one simulated second (time += 0.5).

use glintwater::color::{luminance, srgb_to_linear};
use glintwater::{
    App, DisplayBuffer, Environment, NormalField, Options, ProbeSample, RenderPathKind,
    SkyGradient, Vec3, WaterConfig,
};
use glintwater_render::scene::HitKind;
use glintwater_render::water::WaterFragmentInput;

/// Minimum ratio between the peak highlight and the blended base beneath it.
const MIN_HIGHLIGHT_FACTOR: f32 = 3.0;

fn scenario_options() -> Options {
    let mut options = Options::default();
    options.width = 96;
    options.height = 54;
    options.water = WaterConfig::new()
        .with_texture_size(64, 64)
        .with_distortion_scale(2.0)
        .with_water_color(0x001e0f)
        .with_sun_color(0xffffff);
    options.sun.direction = Vec3::new(0.0, 0.4, -1.0);
    // Off to the side so the reference box stays out of view
    options.camera.position = Vec3::new(20.0, 2.0, 0.0);
    options.camera.target = Vec3::new(20.0, -1.0, -7.5);
    options
}

fn scenario_app(path: RenderPathKind) -> App {
    let options = scenario_options();
    let mut app = App::with_assets(
        &options,
        Environment::gradient(&SkyGradient::default()),
        NormalField::procedural(64, 0.04).unwrap(),
    )
    .unwrap();
    app.select_path(path);
    app.renderer_mut().set_probe(true);
    app.frame(1.0);
    app
}

fn displayed_luminance(display: &DisplayBuffer, x: u32, y: u32) -> f32 {
    let [r, g, b, _] = display.pixel(x, y);
    let decode = |c: u8| srgb_to_linear(f32::from(c) / 255.0);
    luminance(Vec3::new(decode(r), decode(g), decode(b)))
}

fn peak(samples: &[ProbeSample]) -> ProbeSample {
    *samples
        .iter()
        .max_by(|a, b| luminance(a.radiance).total_cmp(&luminance(b.radiance)))
        .unwrap()
}

#[test]
fn direct_path_shows_sun_highlight() {
    let app = scenario_app(RenderPathKind::Direct);
    let renderer = app.renderer();
    assert_eq!(renderer.water().elapsed(), 0.5);

    let samples = renderer.probe_samples().unwrap();
    assert!(!samples.is_empty());
    let peak = peak(samples);

    // Re-shade the peak fragment to split it into base and highlight
    let (width, height) = renderer.dimensions();
    let ray = renderer.camera().pixel_ray(peak.x, peak.y, width, height);
    let hit = renderer.scene().trace(&ray, 0.0, true).unwrap();
    assert_eq!(hit.kind, HitKind::Water);
    let fragment = renderer.water().shade(&WaterFragmentInput {
        world_position: hit.position,
        eye: renderer.camera().position,
        sun: renderer.scene().sun.as_ref(),
        reflection: renderer.reflection().buffer(),
    });
    assert_eq!(fragment.radiance, peak.radiance);

    let base = luminance(fragment.base);
    let highlight = luminance(fragment.radiance);
    assert!(base > 0.0);
    assert!(
        highlight >= MIN_HIGHLIGHT_FACTOR * base,
        "peak {highlight} vs base {base}"
    );
}

#[test]
fn shaded_fragments_are_identical_across_paths() {
    let direct = scenario_app(RenderPathKind::Direct);
    let composited = scenario_app(RenderPathKind::Composited);
    assert_eq!(
        direct.renderer().probe_samples().unwrap(),
        composited.renderer().probe_samples().unwrap()
    );
}

#[test]
fn composited_path_brightens_water_above_bloom_threshold() {
    let direct = scenario_app(RenderPathKind::Direct);
    let composited = scenario_app(RenderPathKind::Composited);

    let bright: Vec<ProbeSample> = direct
        .renderer()
        .probe_samples()
        .unwrap()
        .iter()
        .copied()
        .filter(|s| luminance(s.radiance) > 1.0)
        .collect();
    assert!(!bright.is_empty(), "no water fragment above the bloom threshold");

    #[allow(clippy::cast_precision_loss)]
    let mean = |app: &App| {
        bright
            .iter()
            .map(|s| displayed_luminance(app.display(), s.x, s.y))
            .sum::<f32>()
            / bright.len() as f32
    };
    let direct_mean = mean(&direct);
    let composited_mean = mean(&composited);
    assert!(
        composited_mean > direct_mean,
        "composited {composited_mean} vs direct {direct_mean}"
    );
}

#[test]
fn switching_paths_keeps_reflection_buffer() {
    let mut app = scenario_app(RenderPathKind::Direct);
    let reflection = app.renderer().reflection().clone();
    app.toggle_path();
    app.render();
    assert_eq!(app.renderer().reflection(), &reflection);
    assert_eq!(app.path(), RenderPathKind::Composited);
}
