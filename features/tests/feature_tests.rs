//! End-to-end tests of the features running through a renderer.
//!
//! ```bash
//! cargo test -p prism-features --test feature_tests
//! ```

use rstest::rstest;

use prism_features::color_blit::{APPLY_PASS, COPY_BACK_PASS};
use prism_features::debug_texture::DEBUG_PASS;
use prism_features::{
    ColorBlitFeature, ColorBlitSettings, DebugTextureFeature, DebugTextureSettings, Registrar,
};
use prism_graphics::{
    Camera, CameraType, Color, InjectionPoint, Material, Renderer, Texture, TextureDescriptor,
    TextureFormat, TextureUsage,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn camera(camera_type: CameraType, width: u32, height: u32) -> Camera {
    Camera::new(
        format!("{camera_type:?}"),
        camera_type,
        TextureDescriptor::new_2d(
            width,
            height,
            TextureFormat::Rgba8Unorm,
            TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
        )
        .with_depth_bits(24),
    )
}

fn color_blit(first: Option<Material>, second: Option<Material>) -> Registrar<ColorBlitFeature> {
    let mut settings = ColorBlitSettings::default();
    if let Some(first) = first {
        settings = settings.with_first_material(first);
    }
    if let Some(second) = second {
        settings = settings.with_second_material(second);
    }
    Registrar::new(ColorBlitFeature::new(settings))
}

fn assert_solid(texture: &Texture, expected: [u8; 4]) {
    assert!(
        texture.pixels().iter().all(|c| c.to_rgba8() == expected),
        "expected solid {expected:?}, average {:?}",
        texture.average().to_rgba8()
    );
}

#[test]
fn test_invert_then_blit_full_hd() {
    init_logging();
    let mut renderer = Renderer::default();
    let mut registrar = color_blit(Some(Material::invert()), Some(Material::blit()));
    registrar.activate(renderer.events());

    let camera = camera(CameraType::Game, 1920, 1080);
    let mut target = Texture::filled(camera.target.clone(), Color::from_rgb8(255, 0, 0)).unwrap();
    let report = renderer.render_camera(&camera, &mut target).unwrap();

    assert_eq!(report.executed_passes, vec![APPLY_PASS, COPY_BACK_PASS]);
    assert_eq!(report.stats.draw_calls, 2);
    assert_solid(&target, [0, 255, 255, 255]);
}

#[rstest]
#[case::small(5, 3)]
#[case::odd(17, 31)]
fn test_identity_round_trip(#[case] width: u32, #[case] height: u32) {
    init_logging();
    let mut renderer = Renderer::default();
    let mut registrar = color_blit(Some(Material::blit()), Some(Material::blit()));
    registrar.activate(renderer.events());

    let camera = camera(CameraType::Game, width, height);
    let mut target = Texture::new(camera.target.clone()).unwrap();
    for y in 0..height {
        for x in 0..width {
            target.set_pixel(x, y, Color::from_rgba8([(x * 7) as u8, (y * 5) as u8, 128, 200]));
        }
    }
    let original = target.clone();

    renderer.render_camera(&camera, &mut target).unwrap();
    assert!(target.approx_eq(&original, 1e-6));
}

#[rstest]
#[case::no_first(None, Some(Material::blit()))]
#[case::no_second(Some(Material::invert()), None)]
#[case::neither(None, None)]
fn test_missing_material_declares_nothing(
    #[case] first: Option<Material>,
    #[case] second: Option<Material>,
) {
    init_logging();
    let mut renderer = Renderer::default();
    let mut registrar = color_blit(first, second);
    registrar.activate(renderer.events());

    let camera = camera(CameraType::Game, 4, 4);
    let mut target = Texture::filled(camera.target.clone(), Color::WHITE).unwrap();
    for _ in 0..3 {
        let report = renderer.render_camera(&camera, &mut target).unwrap();
        assert_eq!(report.declared_passes, 0);
        assert!(report.skipped_passes.is_empty());
    }
    assert!(!registrar.is_configured());
    assert_solid(&target, [255, 255, 255, 255]);
}

#[rstest]
#[case::game(CameraType::Game, 2)]
#[case::vr(CameraType::Vr, 2)]
#[case::scene_view(CameraType::SceneView, 0)]
#[case::preview(CameraType::Preview, 0)]
#[case::reflection(CameraType::Reflection, 0)]
fn test_camera_filter(#[case] camera_type: CameraType, #[case] expected_passes: usize) {
    init_logging();
    let mut renderer = Renderer::default();
    let mut registrar = color_blit(Some(Material::invert()), Some(Material::blit()));
    registrar.activate(renderer.events());

    let camera = camera(camera_type, 4, 4);
    let mut target = Texture::filled(camera.target.clone(), Color::BLACK).unwrap();
    let report = renderer.render_camera(&camera, &mut target).unwrap();

    assert_eq!(report.declared_passes, expected_passes);
    let expected = if expected_passes > 0 { [255, 255, 255, 255] } else { [0, 0, 0, 255] };
    assert_solid(&target, expected);
}

#[test]
fn test_deactivate_stops_enqueueing() {
    init_logging();
    let mut renderer = Renderer::default();
    let mut registrar = color_blit(Some(Material::invert()), Some(Material::blit()));
    registrar.activate(renderer.events());

    let camera = camera(CameraType::Game, 2, 2);
    let mut target = Texture::filled(camera.target.clone(), Color::BLACK).unwrap();
    renderer.render_camera(&camera, &mut target).unwrap();
    assert_solid(&target, [255, 255, 255, 255]);

    registrar.deactivate();
    let report = renderer.render_camera(&camera, &mut target).unwrap();
    assert_eq!(report.declared_passes, 0);
    assert_solid(&target, [255, 255, 255, 255]);
}

#[test]
fn test_update_settings_applies_next_frame() {
    init_logging();
    let mut renderer = Renderer::default();
    let mut registrar = color_blit(None, Some(Material::blit()));
    registrar.activate(renderer.events());

    let camera = camera(CameraType::Game, 2, 2);
    let mut target = Texture::filled(camera.target.clone(), Color::from_rgb8(255, 0, 0)).unwrap();
    assert_eq!(renderer.render_camera(&camera, &mut target).unwrap().declared_passes, 0);

    registrar.update_settings(|feature| {
        feature.settings = feature.settings.clone().with_first_material(Material::grayscale());
    });
    assert_eq!(renderer.render_camera(&camera, &mut target).unwrap().declared_passes, 2);
    assert_solid(&target, [54, 54, 54, 255]);
}

#[test]
fn test_features_order_by_injection_point() {
    init_logging();
    let mut renderer = Renderer::default();
    let mut late = color_blit(Some(Material::tint(Color::new(0.5, 1.0, 1.0, 1.0))), Some(Material::blit()));
    late.update_settings(|feature| feature.settings.injection_point = InjectionPoint::AfterRendering);
    let mut early = color_blit(Some(Material::invert()), Some(Material::blit()));
    early.update_settings(|feature| {
        feature.settings.injection_point = InjectionPoint::BeforeRenderingOpaques;
    });
    // Activation order is the reverse of the timeline order.
    late.activate(renderer.events());
    early.activate(renderer.events());

    let camera = camera(CameraType::Game, 2, 2);
    let mut target = Texture::filled(camera.target.clone(), Color::BLACK).unwrap();
    renderer.render_camera(&camera, &mut target).unwrap();

    // invert(black) = white, then tint red by half.
    assert_solid(&target, [128, 255, 255, 255]);
}

#[rstest]
#[case::opted_out(false, 1, 0)]
#[case::cullable(true, 0, 1)]
fn test_debug_texture_culling(
    #[case] allow_culling: bool,
    #[case] executed: usize,
    #[case] culled: usize,
) {
    init_logging();
    let mut renderer = Renderer::default();
    let mut registrar = Registrar::new(DebugTextureFeature::new(DebugTextureSettings {
        allow_culling,
        ..DebugTextureSettings::default()
    }));
    registrar.activate(renderer.events());

    let camera = camera(CameraType::Game, 8, 8);
    let mut target = Texture::filled(camera.target.clone(), Color::from_rgb8(10, 20, 30)).unwrap();
    let original = target.clone();
    let report = renderer.render_camera(&camera, &mut target).unwrap();

    assert_eq!(report.executed_passes.len(), executed);
    assert_eq!(report.culled_passes.len(), culled);
    if culled == 1 {
        assert_eq!(report.culled_passes, vec![DEBUG_PASS]);
    }
    assert_eq!(target, original);
}
