//! # Color Blit Demo
//!
//! Demonstrates:
//! - Registering the color blit feature with a renderer
//! - Camera filtering by camera type
//! - Transient texture reuse across frames
//! - Optional debug texture inspection pass
//!
//! Fills a target with a solid color, renders a few frames and writes the
//! final target as PNG.
//!
//! ```bash
//! cargo run --bin color_blit_demo -- --color ff0000 --first invert --output out.png
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use prism_demos::{
    CliCamera, CliMaterial, DemoError, parse_hex_color, parse_injection_point, save_png,
};
use prism_features::{
    ColorBlitFeature, ColorBlitSettings, DebugTextureFeature, DebugTextureSettings, Registrar,
};
use prism_graphics::{
    Camera, Color, InjectionPoint, Renderer, RendererConfig, Texture, TextureDescriptor,
    TextureFormat, TextureUsage,
};

/// Color blit round trip over a solid color target.
#[derive(Parser, Debug)]
#[command(name = "color_blit_demo", version)]
struct Args {
    /// Target width in pixels.
    #[arg(long, default_value = "1920")]
    width: u32,

    /// Target height in pixels.
    #[arg(long, default_value = "1080")]
    height: u32,

    /// Initial target color as RRGGBB or RRGGBBAA hex.
    #[arg(long, default_value = "ff0000", value_parser = parse_hex_color)]
    color: Color,

    /// Material of the first copy.
    #[arg(long, default_value = "invert", value_enum)]
    first: CliMaterial,

    /// Material of the copy back.
    #[arg(long, default_value = "blit", value_enum)]
    second: CliMaterial,

    /// Timeline position of the color blit passes.
    #[arg(long, default_value = "BeforeRenderingPostProcessing", value_parser = parse_injection_point)]
    injection_point: InjectionPoint,

    /// Camera type rendering the target.
    #[arg(long, default_value = "game", value_enum)]
    camera: CliCamera,

    /// Number of frames to render.
    #[arg(long, default_value = "1")]
    frames: u32,

    /// Add the debug texture inspection pass.
    #[arg(long)]
    debug_texture: bool,

    /// Fail on an unconfigurable feature or a pass that fails to declare its
    /// work instead of skipping it.
    #[arg(long)]
    strict: bool,

    /// Output PNG path.
    #[arg(long, short, default_value = "color_blit.png")]
    output: PathBuf,
}

fn main() -> Result<(), DemoError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    prism_graphics::init();

    let args = Args::parse();
    log::info!("Prism demos v{}: {args:?}", prism_demos::VERSION);

    let mut renderer =
        Renderer::new(RendererConfig::default().with_strict_declarations(args.strict));

    let settings = ColorBlitSettings {
        first_material: args.first.build().map(Arc::new),
        second_material: args.second.build().map(Arc::new),
        injection_point: args.injection_point,
    };
    let mut color_blit = Registrar::new(ColorBlitFeature::new(settings));
    if let Err(e) = color_blit.configure() {
        if args.strict {
            return Err(e.into());
        }
        log::warn!("color blit disabled: {e}");
    }
    color_blit.activate(renderer.events());

    let mut debug_texture =
        Registrar::new(DebugTextureFeature::new(DebugTextureSettings::default()));
    if args.debug_texture {
        debug_texture.activate(renderer.events());
    }

    let camera = Camera::new(
        "demo",
        args.camera.into(),
        TextureDescriptor::new_2d(
            args.width,
            args.height,
            TextureFormat::Rgba8Unorm,
            TextureUsage::RENDER_ATTACHMENT | TextureUsage::TEXTURE_BINDING,
        )
        .with_label("demo_target")
        .with_depth_bits(24),
    );
    let mut target = Texture::filled(camera.target.clone(), args.color)?;

    for frame in 0..args.frames {
        let report = renderer.render_camera(&camera, &mut target)?;
        log::info!(
            "frame {frame}: executed {:?}, culled {:?}, {} draws, {} transient allocations, {} reuses",
            report.executed_passes,
            report.culled_passes,
            report.stats.draw_calls,
            report.stats.transient_allocations,
            report.stats.transient_reuses
        );
    }

    color_blit.deactivate();
    debug_texture.deactivate();

    log::info!("final average rgba {:?}", target.average().to_rgba8());
    save_png(&target, &args.output)
}
