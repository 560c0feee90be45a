//! Cornell box scene.
//!
//! Renders the classic 555-unit box with a ceiling light and two blocks,
//! writing a PPM to cornell.ppm.

use glint_render::{
    make_box, Background, Bvh, Camera, Color, DiffuseLight, Lambertian, Primitive, Vec3, World,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufWriter;

fn main() {
    env_logger::init();

    let world = build_scene();
    let mut bvh_rng = StdRng::seed_from_u64(0);
    let bvh = Bvh::from_world(&world, &mut bvh_rng);

    let camera = Camera::new(1.0, 600)
        .with_quality(200, 50)
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Background::Solid(Color::ZERO));

    let file = File::create("cornell.ppm").expect("failed to create output file");
    let mut writer = BufWriter::new(file);

    let start = std::time::Instant::now();
    camera.render(&bvh, &mut writer).expect("render failed");
    println!("Rendered in {:?}", start.elapsed());
    println!("Saved to cornell.ppm");
}

fn build_scene() -> World {
    let red = Lambertian::from_color(Color::new(0.65, 0.05, 0.05));
    let white = Lambertian::from_color(Color::new(0.73, 0.73, 0.73));
    let green = Lambertian::from_color(Color::new(0.12, 0.45, 0.15));
    let light = DiffuseLight::from_color(Color::new(15.0, 15.0, 15.0));

    let mut world = World::new();

    // Walls
    world.add(Primitive::quad(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    ));
    world.add(Primitive::quad(
        Vec3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    ));
    world.add(Primitive::quad(
        Vec3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    ));
    world.add(Primitive::quad(
        Vec3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    ));
    world.add(Primitive::quad(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
    ));

    // Ceiling light
    world.add(Primitive::quad(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light,
    ));

    // Blocks
    world.add_all(make_box(
        Vec3::new(130.0, 0.0, 65.0),
        Vec3::new(295.0, 165.0, 230.0),
        white.clone(),
    ));
    world.add_all(make_box(
        Vec3::new(265.0, 0.0, 295.0),
        Vec3::new(430.0, 330.0, 460.0),
        white,
    ));

    world
}
