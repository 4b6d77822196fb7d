use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use imgqa_image::{Image, ImageSize};
use imgqa_imgproc::{metrics, preprocess};

fn textured(size: ImageSize) -> Image<u8> {
    let data = (0..size.width * size.height * 3)
        .map(|i| ((i * 31) % 256) as u8)
        .collect();
    Image::new(&[size.height, size.width, 3], data).unwrap()
}

fn bench_psnr(c: &mut Criterion) {
    let mut group = c.benchmark_group("psnr");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        // input images
        let image_size = [*width, *height].into();
        let image = textured(image_size);
        let other = Image::from_size_val(image_size, 3, 128u8);

        group.bench_with_input(
            BenchmarkId::new("psnr_u8", &parameter_string),
            &(&image, &other),
            |b, i| b.iter(|| metrics::psnr(black_box(i.0.view()), black_box(i.1.view()), 255.0)),
        );
    }
    group.finish();
}

fn bench_ssim(c: &mut Criterion) {
    let mut group = c.benchmark_group("ssim");

    for (width, height) in [(128, 128), (256, 224), (512, 448)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = [*width, *height].into();
        let image = textured(image_size);
        let other = Image::from_size_val(image_size, 3, 128u8);

        group.bench_with_input(
            BenchmarkId::new("ssim_rgb", &parameter_string),
            &(&image, &other),
            |b, i| b.iter(|| metrics::ssim(black_box(i.0.view()), black_box(i.1.view()))),
        );

        let luma = preprocess::prepare(image.view(), true, 4).unwrap();
        let luma_other = preprocess::prepare(other.view(), true, 4).unwrap();

        group.bench_with_input(
            BenchmarkId::new("ssim_luma", &parameter_string),
            &(&luma, &luma_other),
            |b, i| b.iter(|| metrics::ssim(black_box(i.0.view()), black_box(i.1.view()))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_psnr, bench_ssim);
criterion_main!(benches);
