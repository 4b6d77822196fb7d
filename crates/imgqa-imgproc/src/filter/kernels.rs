/// Create a gaussian blur kernel.
///
/// The kernel is sampled at integer offsets from its center and normalized to
/// sum to one.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f64) -> Vec<f64> {
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = kernel_size.saturating_sub(1) as f64 / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f64 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f64>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_kernel_1d() {
        let kernel = gaussian_kernel_1d(5, 0.5);

        let expected = [
            0.00026386508,
            0.10645077,
            0.78657067,
            0.10645077,
            0.00026386508,
        ];

        for (k, e) in kernel.iter().zip(expected.iter()) {
            assert_relative_eq!(*k, *e, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_gaussian_kernel_ssim_window() {
        let kernel = gaussian_kernel_1d(11, 1.5);

        assert_eq!(kernel.len(), 11);
        assert_relative_eq!(kernel.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(kernel[0], kernel[10], epsilon = 1e-15);
        assert_relative_eq!(kernel[5], 0.26601172486179436, epsilon = 1e-9);
    }
}
