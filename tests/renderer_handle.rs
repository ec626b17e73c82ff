// Copyright @yucwang 2026

mod common;

use common::{field_params, field_scene, init_logging};
use meringue::core::error::ConfigError;
use meringue::core::params::{ParamValue, ParameterSet};
use meringue::core::scene::Scene;
use meringue::io::params_xml::parse_params;
use meringue::math::constants::{Vector3f, Vector4f};
use meringue::renderers::frame::FrameRenderer;
use meringue::renderers::RendererRegistry;
use meringue::sensors::perspective::PerspectiveCamera;
use std::thread;

#[test]
fn registry_builds_every_variant() {
    init_logging();
    let registry = RendererRegistry::with_defaults();
    let scene = Scene::new();
    for name in ["research_volume", "research_pbr", "research_contours"] {
        let handle = registry.create_handle(name).expect("registered");
        assert_eq!(handle.type_name(), name);
        assert_eq!(handle.commit(&scene, &ParameterSet::new()), Ok(1));
    }
    assert!(matches!(registry.create_handle("research_unknown"), Err(ConfigError::UnknownRenderer(_))));
}

#[test]
fn xml_parameters_drive_a_commit() {
    init_logging();
    let xml = r#"
        <renderer type="research_volume">
            <rgb name="bgColor" value="0, 0, 0"/>
            <integer name="spp" value="2"/>
            <ivector name="volumeDimensions" value="-1, 2, 2"/>
        </renderer>
    "#;
    let desc = parse_params(xml).expect("parse");
    let registry = RendererRegistry::with_defaults();
    let handle = registry
        .create_handle(desc.renderer_type.as_deref().unwrap_or("research_volume"))
        .expect("registered");
    assert!(matches!(handle.commit(&Scene::new(), &desc.params), Err(ConfigError::InvalidDimensions(_))));
    assert_eq!(handle.generation(), 0);
}

#[test]
fn concurrent_readers_see_whole_generations() {
    init_logging();
    let registry = RendererRegistry::with_defaults();
    let handle = registry.create_handle("research_volume").expect("registered");
    let scene = Scene::new();
    let black = ParameterSet::new().with("bgColor", ParamValue::Vec3f(Vector3f::zeros()));
    let white = ParameterSet::new().with("bgColor", ParamValue::Vec3f(Vector3f::new(1.0, 1.0, 1.0)));
    handle.commit(&scene, &black).expect("commit");

    let camera = PerspectiveCamera::new(
        Vector3f::zeros(),
        Vector3f::new(0.0, 0.0, 1.0),
        Vector3f::new(0.0, 1.0, 0.0),
        1.0,
        16,
        16,
    );
    thread::scope(|scope| {
        let render = scope.spawn(|| {
            (0..4)
                .map(|_| FrameRenderer::new().with_threads(2).with_block_size(4).with_progress(false).render(&handle, &camera))
                .collect::<Vec<_>>()
        });
        for idx in 0..8 {
            let params = if idx % 2 == 0 { &white } else { &black };
            handle.commit(&scene, params).expect("commit");
        }
        let frames = render.join().expect("render thread");
        for frame in frames {
            let first = frame.pixels()[0];
            assert!(first == Vector4f::new(0.0, 0.0, 0.0, 0.0) || first == Vector4f::new(1.0, 1.0, 1.0, 0.0));
            assert!(frame.pixels().iter().all(|p| *p == first));
        }
    });
    assert_eq!(handle.generation(), 9);
}

#[test]
fn supersampled_frame_averages_samples() {
    init_logging();
    let registry = RendererRegistry::with_defaults();
    let handle = registry.create_handle("research_volume").expect("registered");
    let scene = field_scene(4, Vector4f::new(1.0, 0.0, 0.0, 0.5), |_, _, _| 100);
    let params = field_params(4).with("spp", ParamValue::Int(4));
    handle.commit(&scene, &params).expect("commit");

    let camera = PerspectiveCamera::new(
        Vector3f::new(2.0, 2.0, -6.0),
        Vector3f::new(2.0, 2.0, 2.0),
        Vector3f::new(0.0, 1.0, 0.0),
        0.3,
        8,
        8,
    );
    let renderer = FrameRenderer::new().with_progress(false);
    let a = renderer.render(&handle, &camera);
    let b = renderer.render(&handle, &camera);
    assert_eq!(a.pixels(), b.pixels());
    assert!(a.pixels().iter().all(|p| p.w >= 0.0 && p.w <= 1.0));
    assert!(a.pixels().iter().any(|p| p.w > 0.0));
}
