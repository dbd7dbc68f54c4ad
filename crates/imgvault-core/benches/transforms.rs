//! Benchmarks for the imgvault transform handlers.
//!
//! Run with: cargo bench -p imgvault-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, ImageFormat};
use imgvault_core::transform::{self, ImageHandle};
use imgvault_core::ImageFormatKind;
use std::io::Cursor;

fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

fn benchmark_decode(c: &mut Criterion) {
    let bytes = png_fixture(1920, 1080);

    c.bench_function("decode_png_1080p", |b| {
        b.iter(|| {
            let _ = ImageHandle::from_bytes(black_box(&bytes), None);
        })
    });
}

fn benchmark_convert(c: &mut Criterion) {
    let handle = ImageHandle::from_bytes(&png_fixture(640, 480), Some(ImageFormatKind::Png));

    c.bench_function("convert_png_to_gif", |b| {
        b.iter(|| {
            let _ = transform::convert_to(black_box(&handle), ImageFormatKind::Gif);
        })
    });
}

fn benchmark_rotate(c: &mut Criterion) {
    let handle = ImageHandle::from_bytes(&png_fixture(640, 480), Some(ImageFormatKind::Png));

    c.bench_function("rotate_90", |b| {
        b.iter(|| {
            let _ = transform::rotate(black_box(&handle), 90);
        })
    });

    c.bench_function("rotate_45", |b| {
        b.iter(|| {
            let _ = transform::rotate(black_box(&handle), 45);
        })
    });
}

fn benchmark_resize(c: &mut Criterion) {
    let handle = ImageHandle::from_bytes(&png_fixture(1920, 1080), Some(ImageFormatKind::Jpeg));

    c.bench_function("resize_to_320x200", |b| {
        b.iter(|| {
            let _ = transform::resize(black_box(&handle), 320, 200);
        })
    });
}

criterion_group!(
    benches,
    benchmark_decode,
    benchmark_convert,
    benchmark_rotate,
    benchmark_resize,
);
criterion_main!(benches);
