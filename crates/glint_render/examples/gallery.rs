//! Sphere gallery scene.
//!
//! A checkered ground plane, three feature spheres (glass, diffuse, metal),
//! a marbled noise sphere and a field of small random spheres. Writes a
//! PPM to gallery.ppm.

use glint_render::{
    gen_f32, gen_range, Background, Bvh, Camera, CheckerTexture, Color, Dielectric, Lambertian,
    Metal, NoiseTexture, Primitive, Vec3, World,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufWriter;

fn main() {
    env_logger::init();

    let mut scene_rng = StdRng::seed_from_u64(1984);
    let world = build_scene(&mut scene_rng);
    let bvh = Bvh::from_world(&world, &mut scene_rng);

    let camera = Camera::new(16.0 / 9.0, 800)
        .with_quality(100, 50)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
        .with_background(Background::SkyGradient);

    let file = File::create("gallery.ppm").expect("failed to create output file");
    let mut writer = BufWriter::new(file);

    let start = std::time::Instant::now();
    camera.render(&bvh, &mut writer).expect("render failed");
    println!("Rendered in {:?}", start.elapsed());
    println!("Saved to gallery.ppm");
}

fn build_scene(rng: &mut StdRng) -> World {
    let mut world = World::new();

    // Checkered ground
    let checker = CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    );
    world.add(Primitive::sphere(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(checker),
    ));

    // Feature spheres
    world.add(Primitive::sphere(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Dielectric::new(1.5),
    ));
    world.add(Primitive::sphere(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Lambertian::from_color(Color::new(0.4, 0.2, 0.1)),
    ));
    world.add(Primitive::sphere(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
    ));

    // Marbled sphere off to the side
    let marble = NoiseTexture::new(4.0, rng);
    world.add(Primitive::sphere(
        Vec3::new(0.0, 1.0, -4.0),
        1.0,
        Lambertian::new(marble),
    ));

    // Small random spheres
    for a in -7..7 {
        for b in -7..7 {
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat = gen_f32(rng);
            let material = if choose_mat < 0.8 {
                let albedo = Color::new(
                    gen_f32(rng) * gen_f32(rng),
                    gen_f32(rng) * gen_f32(rng),
                    gen_f32(rng) * gen_f32(rng),
                );
                Lambertian::from_color(albedo)
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    gen_range(rng, 0.5, 1.0),
                    gen_range(rng, 0.5, 1.0),
                    gen_range(rng, 0.5, 1.0),
                );
                Metal::new(albedo, 0.5 * gen_f32(rng))
            } else {
                Dielectric::new(1.5)
            };

            world.add(Primitive::sphere(center, 0.2, material));
        }
    }

    world
}
