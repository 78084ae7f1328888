#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use image::RgbaImage;

pub fn load_images(images: &[PathBuf]) -> Vec<(String, RgbaImage)> {
    images
        .iter()
        .map(|path| {
            image::open(path).map(|image| {
                (
                    path.file_name().unwrap().to_owned().into_string().unwrap(),
                    image.into_rgba8(),
                )
            })
        })
        .collect::<Result<_, _>>()
        .expect("loaded each image")
}

pub fn load_image_dir(dir: impl AsRef<Path>) -> Vec<(String, RgbaImage)> {
    let mut paths = std::fs::read_dir(dir)
        .expect("read img directory")
        .collect::<Result<Vec<_>, _>>()
        .expect("read each file")
        .iter()
        .map(std::fs::DirEntry::path)
        .collect::<Vec<_>>();

    paths.sort();

    load_images(&paths)
}

/// A synthetic photo-like image: smooth gradients with a few flat blocks of color.
pub fn synthetic_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let block = (x * 4 / width, y * 4 / height);
        if block == (1, 1) {
            image::Rgba([200, 40, 30, 255])
        } else if block == (2, 3) {
            image::Rgba([20, 60, 160, 255])
        } else {
            #[allow(clippy::cast_possible_truncation)]
            image::Rgba([
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                ((x ^ y) % 256) as u8,
                255,
            ])
        }
    })
}

pub const IMG_DIR_VAR: &str = "DOMINANT_BENCH_IMG_DIR";

static BENCH_IMAGES: OnceLock<Vec<(String, RgbaImage)>> = OnceLock::new();

/// The images in the directory named by `DOMINANT_BENCH_IMG_DIR`,
/// or a set of synthetic images if the variable is not set.
pub fn bench_images() -> &'static [(String, RgbaImage)] {
    BENCH_IMAGES.get_or_init(|| match std::env::var_os(IMG_DIR_VAR) {
        Some(dir) => load_image_dir(dir),
        None => [(480, 270), (1920, 1080), (3840, 2160)]
            .into_iter()
            .map(|(w, h)| (format!("synthetic_{w}x{h}"), synthetic_image(w, h)))
            .collect(),
    })
}
