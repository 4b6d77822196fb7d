use approx::assert_abs_diff_eq;
use imgqa_image::{Image, ImageError, ImageSize};
use imgqa_imgproc::metrics::{psnr, ssim, DEFAULT_DATA_RANGE};
use imgqa_imgproc::preprocess::prepare;
use ndarray::{Array3, ArrayD};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_u8(rng: &mut StdRng, shape: (usize, usize, usize)) -> ArrayD<u8> {
    Array3::from_shape_simple_fn(shape, || rng.random_range(0..=255u8)).into_dyn()
}

#[test]
fn test_psnr_decreases_with_noise() -> Result<(), ImageError> {
    let mut rng = StdRng::seed_from_u64(7);
    let reference = Array3::from_shape_simple_fn((24, 24, 3), || rng.random_range(64.0..192.0f64));
    let noise = Array3::from_shape_simple_fn((24, 24, 3), || rng.random_range(-1.0..1.0f64));

    let mut previous = f64::INFINITY;
    for amplitude in [0.5, 1.0, 2.0, 4.0, 8.0, 16.0] {
        let generated = &reference + &(&noise * amplitude);
        let value = psnr(
            generated.view().into_dyn(),
            reference.view().into_dyn(),
            DEFAULT_DATA_RANGE,
        )?;
        assert!(value < previous, "{value} should be below {previous}");
        previous = value;
    }

    Ok(())
}

#[test]
fn test_psnr_symmetric_random() -> Result<(), ImageError> {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..5 {
        let a = random_u8(&mut rng, (16, 12, 3));
        let b = random_u8(&mut rng, (16, 12, 3));
        let ab = psnr(a.view(), b.view(), DEFAULT_DATA_RANGE)?;
        let ba = psnr(b.view(), a.view(), DEFAULT_DATA_RANGE)?;
        assert_eq!(ab, ba);
    }

    Ok(())
}

#[test]
fn test_ssim_bounded_random() -> Result<(), ImageError> {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..5 {
        let a = random_u8(&mut rng, (24, 24, 3));
        let b = random_u8(&mut rng, (24, 24, 3));
        let value = ssim(a.view(), b.view())?;
        assert!((-1.0..=1.0).contains(&value), "ssim out of range: {value}");

        let inverted = a.mapv(|x| 255 - x);
        let value = ssim(a.view(), inverted.view())?;
        assert!((-1.0..=1.0).contains(&value), "ssim out of range: {value}");
        assert!(value < 0.0);
    }

    Ok(())
}

#[test]
fn test_ssim_self_random() -> Result<(), ImageError> {
    let mut rng = StdRng::seed_from_u64(5);
    let a = random_u8(&mut rng, (20, 30, 3));
    assert_abs_diff_eq!(ssim(a.view(), a.view())?, 1.0, epsilon = 1e-6);

    Ok(())
}

#[test]
fn test_identical_constant_rgb() -> Result<(), ImageError> {
    let size = ImageSize {
        width: 16,
        height: 16,
    };
    let generated = Image::from_size_val(size, 3, 128u8);
    let reference = Image::from_size_val(size, 3, 128u8);

    assert_eq!(
        psnr(generated.view(), reference.view(), DEFAULT_DATA_RANGE)?,
        f64::INFINITY
    );
    assert_abs_diff_eq!(ssim(generated.view(), reference.view())?, 1.0, epsilon = 1e-6);

    Ok(())
}

#[test]
fn test_prepare_then_psnr() -> Result<(), ImageError> {
    let mut rng = StdRng::seed_from_u64(19);
    let generated = random_u8(&mut rng, (32, 32, 3));
    let mut reference = generated.clone();

    // differences restricted to the border disappear after cropping
    for c in 0..32 {
        reference[[0, c, 0]] = generated[[0, c, 0]].wrapping_add(50);
        reference[[31, c, 2]] = generated[[31, c, 2]].wrapping_add(50);
    }

    let gen_prepared = prepare(generated.view(), true, 4)?;
    let ref_prepared = prepare(reference.view(), true, 4)?;
    assert_eq!(gen_prepared.shape(), &[24, 24]);
    assert_eq!(
        psnr(gen_prepared.view(), ref_prepared.view(), DEFAULT_DATA_RANGE)?,
        f64::INFINITY
    );

    let full = psnr(generated.view(), reference.view(), DEFAULT_DATA_RANGE)?;
    assert!(full.is_finite());

    Ok(())
}
