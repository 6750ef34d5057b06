use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scene_viewer::config::BackgroundConfig;
use scene_viewer::engine::{Geometry, Light, Material, Object3D, PerspectiveCamera};
use scene_viewer::math::Color;
use scene_viewer::renderer::{FrameUniform, ObjectUniform, SceneLights};
use scene_viewer::scenes::populate_background;
use scene_viewer::{AnimationBehavior, SceneManager, SpinAxes};

/// Registry with `count` objects, every other one spinning
fn populated(count: usize) -> SceneManager {
    let mut manager = SceneManager::new();
    let settings = BackgroundConfig::default();
    populate_background(&mut manager, count, &settings, &mut StdRng::seed_from_u64(42)).unwrap();
    let ids: Vec<_> = manager.ids().collect();
    for id in ids.into_iter().step_by(2) {
        manager.set_behavior(id, Some(AnimationBehavior::spin(SpinAxes::X | SpinAxes::Y)));
    }
    manager
}

/// Benchmark: one animation sweep over the registry
fn bench_registry_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_update");
    for count in [100usize, 1_000, 10_000] {
        let mut manager = populated(count);
        let mut t = 0.0f32;
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                t += 0.016;
                black_box(manager.update(black_box(t)))
            })
        });
    }
    group.finish();
}

/// Benchmark: per-frame uniform preparation, the CPU side of a render
fn bench_frame_preparation(c: &mut Criterion) {
    let mut manager = populated(1_000);
    manager
        .scene_mut()
        .add(Object3D::light(Light::directional(0xffffff, 3.0)).at(Vec3::new(-1.0, 2.0, 4.0)));
    let camera = PerspectiveCamera::new(75.0, 2.0, 0.1, 100.0).unwrap();

    c.bench_function("frame_preparation_1000", |b| {
        b.iter(|| {
            let scene = manager.scene();
            let mut lights = SceneLights::default();
            let mut uniforms = Vec::with_capacity(scene.len());
            scene.traverse(|object, world| {
                if let Some(light) = object.as_light() {
                    lights.add(light, world);
                }
                if let Some(mesh) = object.as_mesh() {
                    if let Some(material) = mesh.materials.for_group(0) {
                        uniforms.push(ObjectUniform::new(world, material, false));
                    }
                }
            });
            black_box(FrameUniform::new(&camera, scene, &lights, false));
            black_box(uniforms)
        })
    });
}

/// Benchmark: primitive tessellation
fn bench_tessellation(c: &mut Criterion) {
    let mut group = c.benchmark_group("tessellation");
    group.bench_function("cube", |b| b.iter(|| black_box(Geometry::cube(black_box(1.0)).unwrap())));
    group.bench_function("cylinder_32", |b| {
        b.iter(|| black_box(Geometry::cylinder(1.0, 1.0, 2.0, black_box(32)).unwrap()))
    });
    for segments in [8u32, 32, 128] {
        group.bench_with_input(BenchmarkId::new("sphere", segments), &segments, |b, &s| {
            b.iter(|| black_box(Geometry::sphere(1.0, s, s).unwrap()))
        });
    }
    group.finish();
}

/// Benchmark: world matrix composition for a static mesh
fn bench_transform_matrix(c: &mut Criterion) {
    let object = Object3D::mesh(
        Geometry::cube(1.0).unwrap(),
        Material::standard(Color::WHITE),
    )
    .at(Vec3::new(1.0, 2.0, 3.0))
    .rotated(Vec3::new(0.3, 0.2, 0.1))
    .scaled(2.0);

    c.bench_function("transform_matrix", |b| {
        b.iter(|| black_box(Mat4::IDENTITY * black_box(&object).transform.matrix()))
    });
}

criterion_group!(
    benches,
    bench_registry_update,
    bench_frame_preparation,
    bench_tessellation,
    bench_transform_matrix
);

criterion_main!(benches);
