//! Rendering under an equirectangular HDR sky.

use glintwater::{App, Environment, NormalField, Options, RenderPathKind, Vec3};
use glintwater_render::HdrImage;

const SKY_WIDTH: u32 = 16;
const SKY_HEIGHT: u32 = 8;

/// Sky brightening toward the zenith, with a sun texel well past half-float range.
#[allow(clippy::cast_precision_loss)]
fn hdr_sky() -> HdrImage {
    let mut pixels = Vec::new();
    for y in 0..SKY_HEIGHT {
        let brightness = 0.2 + 3.0 * (SKY_HEIGHT - 1 - y) as f32 / (SKY_HEIGHT - 1) as f32;
        for _ in 0..SKY_WIDTH {
            pixels.push(Vec3::new(brightness * 0.8, brightness * 0.9, brightness));
        }
    }
    // Row 2 sits a little above the horizon; column 4 faces -Z
    pixels[(2 * SKY_WIDTH + 4) as usize] = Vec3::splat(100_000.0);
    HdrImage::from_pixels(SKY_WIDTH, SKY_HEIGHT, pixels).unwrap()
}

fn options() -> Options {
    let mut options = Options::default();
    options.width = 48;
    options.height = 27;
    options.water = options.water.with_texture_size(32, 32);
    options.camera.position = Vec3::new(0.0, 1.0, 2.0);
    options.camera.target = Vec3::new(0.0, 0.5, -6.0);
    options
}

fn app(path: RenderPathKind) -> App {
    let mut app = App::with_assets(
        &options(),
        Environment::from_equirect(hdr_sky()),
        NormalField::procedural(32, 0.2).unwrap(),
    )
    .unwrap();
    app.select_path(path);
    app.frame(0.5);
    app
}

#[test]
fn equirect_sky_has_hdr_radiance() {
    let environment = Environment::from_equirect(hdr_sky());
    let zenith = environment.radiance(Vec3::Y);
    assert!(zenith.z > 1.0);
    assert!(environment.ambient().is_finite());
}

#[test]
fn both_paths_render_hdr_sky_without_black_pixels() {
    for path in [RenderPathKind::Direct, RenderPathKind::Composited] {
        let app = app(path);
        let display = app.display();
        let (width, height) = display.dimensions();
        for y in 0..height {
            for x in 0..width {
                let [r, g, b, a] = display.pixel(x, y);
                assert_eq!(a, 255);
                assert!(
                    r > 0 || g > 0 || b > 0,
                    "{path} path left pixel ({x}, {y}) black"
                );
            }
        }
    }
}

#[test]
fn composited_target_stays_finite_under_hdr_sky() {
    let app = app(RenderPathKind::Composited);
    let target = app.renderer().composited().render_target();
    let (width, height) = target.dimensions();
    for y in 0..height {
        for x in 0..width {
            assert!(target.load(x, y).is_finite(), "texel ({x}, {y}) is not finite");
        }
    }
}
