// ============================================================
// Layer 4 — Image Transforms
// ============================================================
// Turns one decoded image into a normalised CHW float vector
// of length 3 * S * S.
//
// Train mode (randomised, applied independently per sample):
//   1. Reflect-pad every side by `padding` pixels
//   2. Random S x S crop
//   3. Horizontal flip with probability 0.5
//   4. Rotation about the centre by a uniform angle in
//      [-max_rotation, +max_rotation] degrees, nearest-neighbour,
//      corners filled with black
//   5. Normalise each channel: (x / 255 - mean) / std
//
// Eval mode (deterministic):
//   1. Resize so the shorter side is S
//   2. Centre S x S crop
//   3. Normalise
//
// Images smaller than S on either side are resized up first so
// the random crop always fits.
//
// Reference: image crate documentation (imageops)
//            imageproc documentation (geometric_transformations)
//            Rust Book §13 (Iterators)

use anyhow::{Context, Result};
use image::{
    imageops::{self, FilterType},
    Rgb, RgbImage,
};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use rand::Rng;
use std::path::Path;

/// Per-channel RGB mean of the Imagewoof training images
pub const MEANS: [f32; 3] = [0.4876, 0.4571, 0.3953];

/// Per-channel RGB standard deviation of the Imagewoof training images
pub const STDS: [f32; 3] = [0.2209, 0.2151, 0.2169];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
    Train,
    Eval,
}

/// Transform parameters shared read-only by every loader worker.
#[derive(Debug, Clone)]
pub struct ImageTransform {
    pub mode:         TransformMode,
    pub image_size:   u32,
    pub padding:      u32,
    pub max_rotation: f32,
    pub mean:         [f32; 3],
    pub std:          [f32; 3],
}

impl ImageTransform {
    /// Randomised augmentation used for the training split
    pub fn train(image_size: u32) -> Self {
        Self {
            mode:         TransformMode::Train,
            image_size,
            padding:      1,
            max_rotation: 15.0,
            mean:         MEANS,
            std:          STDS,
        }
    }

    /// Deterministic resize + centre crop used for validation, test and prediction
    pub fn eval(image_size: u32) -> Self {
        Self {
            mode: TransformMode::Eval,
            ..Self::train(image_size)
        }
    }

    /// Decode the file at `path` and transform it.
    /// Randomness comes from the calling thread's RNG.
    pub fn load(&self, path: &Path) -> Result<Vec<f32>> {
        let img = image::open(path)
            .with_context(|| format!("Cannot decode image '{}'", path.display()))?
            .to_rgb8();
        Ok(self.apply(img, &mut rand::thread_rng()))
    }

    /// Transform an already decoded image
    pub fn apply<R: Rng + ?Sized>(&self, img: RgbImage, rng: &mut R) -> Vec<f32> {
        let img = match self.mode {
            TransformMode::Train => self.augment(img, rng),
            TransformMode::Eval  => self.resize_center_crop(img),
        };
        self.normalize_chw(&img)
    }

    fn augment<R: Rng + ?Sized>(&self, img: RgbImage, rng: &mut R) -> RgbImage {
        let size = self.image_size;
        let img  = ensure_min_side(img, size);

        let padded = reflect_pad(&img, self.padding);
        let x      = rng.gen_range(0..=padded.width() - size);
        let y      = rng.gen_range(0..=padded.height() - size);
        let mut out = imageops::crop_imm(&padded, x, y, size, size).to_image();

        if rng.gen_bool(0.5) {
            out = imageops::flip_horizontal(&out);
        }

        if self.max_rotation > 0.0 {
            let angle = rng.gen_range(-self.max_rotation..=self.max_rotation);
            out = rotate_about_center(
                &out,
                angle.to_radians(),
                Interpolation::Nearest,
                Rgb([0, 0, 0]),
            );
        }
        out
    }

    fn resize_center_crop(&self, img: RgbImage) -> RgbImage {
        let size = self.image_size;
        let (w, h) = img.dimensions();

        // Scale so the shorter side lands exactly on `size`
        let (new_w, new_h) = if w <= h {
            (size, ((h as u64 * size as u64) / w.max(1) as u64).max(size as u64) as u32)
        } else {
            (((w as u64 * size as u64) / h.max(1) as u64).max(size as u64) as u32, size)
        };
        let resized = if (new_w, new_h) == (w, h) {
            img
        } else {
            imageops::resize(&img, new_w, new_h, FilterType::Triangle)
        };

        let x = (new_w - size) / 2;
        let y = (new_h - size) / 2;
        imageops::crop_imm(&resized, x, y, size, size).to_image()
    }

    /// HWC u8 → CHW f32, normalised per channel
    fn normalize_chw(&self, img: &RgbImage) -> Vec<f32> {
        let mut out = Vec::with_capacity(3 * img.width() as usize * img.height() as usize);
        for c in 0..3 {
            out.extend(
                img.pixels()
                    .map(|p| (p[c] as f32 / 255.0 - self.mean[c]) / self.std[c]),
            );
        }
        out
    }
}

/// Resize up (keeping aspect) when either side is shorter than `min_side`.
fn ensure_min_side(img: RgbImage, min_side: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    if w >= min_side && h >= min_side {
        return img;
    }
    let scale = min_side as f32 / w.min(h).max(1) as f32;
    let new_w = ((w as f32 * scale).ceil() as u32).max(min_side);
    let new_h = ((h as f32 * scale).ceil() as u32).max(min_side);
    imageops::resize(&img, new_w, new_h, FilterType::Triangle)
}

/// Mirror-pad without repeating the edge pixel (`reflect`, not `symmetric`).
pub fn reflect_pad(img: &RgbImage, pad: u32) -> RgbImage {
    if pad == 0 {
        return img.clone();
    }
    let (w, h) = img.dimensions();
    let reflect = |i: i64, n: u32| -> u32 {
        let n = n as i64;
        if n == 1 {
            return 0;
        }
        let r = if i < 0 {
            -i
        } else if i >= n {
            2 * n - 2 - i
        } else {
            i
        };
        r.clamp(0, n - 1) as u32
    };

    RgbImage::from_fn(w + 2 * pad, h + 2 * pad, |x, y| {
        let sx = reflect(x as i64 - pad as i64, w);
        let sy = reflect(y as i64 - pad as i64, h);
        *img.get_pixel(sx, sy)
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 7]))
    }

    #[test]
    fn test_output_length_is_chw() {
        let mut rng = StdRng::seed_from_u64(0);
        for t in [ImageTransform::train(16), ImageTransform::eval(16)] {
            let out = t.apply(gradient(20, 24), &mut rng);
            assert_eq!(out.len(), 3 * 16 * 16);
        }
    }

    #[test]
    fn test_eval_is_deterministic() {
        let t = ImageTransform::eval(8);
        let a = t.apply(gradient(12, 10), &mut StdRng::seed_from_u64(1));
        let b = t.apply(gradient(12, 10), &mut StdRng::seed_from_u64(2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalisation_uses_channel_stats() {
        let t   = ImageTransform::eval(2);
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 0, 255]));
        let out = t.apply(img, &mut StdRng::seed_from_u64(0));

        // Channel-major: first 4 floats are red, next 4 green, last 4 blue
        let red   = (1.0 - MEANS[0]) / STDS[0];
        let green = (0.0 - MEANS[1]) / STDS[1];
        assert!((out[0] - red).abs() < 1e-6);
        assert!((out[4] - green).abs() < 1e-6);
    }

    #[test]
    fn test_small_images_are_upscaled_for_training() {
        let t   = ImageTransform::train(16);
        let out = t.apply(gradient(4, 6), &mut StdRng::seed_from_u64(3));
        assert_eq!(out.len(), 3 * 16 * 16);
    }

    #[test]
    fn test_reflect_pad_mirrors_without_edge_repeat() {
        let img    = gradient(3, 3);
        let padded = reflect_pad(&img, 1);
        assert_eq!(padded.dimensions(), (5, 5));
        // Padded (0, 1) reflects source column 1, row 0
        assert_eq!(padded.get_pixel(0, 1), img.get_pixel(1, 0));
        assert_eq!(padded.get_pixel(2, 2), img.get_pixel(1, 1));
    }

    /// Train transform with rotation off, so only crop and flip are random
    fn crop_and_flip(size: u32, padding: u32) -> ImageTransform {
        ImageTransform { padding, max_rotation: 0.0, ..ImageTransform::train(size) }
    }

    #[test]
    fn test_flip_mirrors_columns() {
        // No padding and an exact-size input: the crop is the whole image
        let t       = crop_and_flip(6, 0);
        let img     = gradient(6, 6);
        let mirror  = imageops::flip_horizontal(&img);
        let plain   = t.normalize_chw(&img);
        let flipped = t.normalize_chw(&mirror);

        // Column x of the mirror is column 5 - x of the source
        for y in 0..6 {
            for x in 0..6 {
                assert_eq!(mirror.get_pixel(x, y), img.get_pixel(5 - x, y));
            }
        }

        let mut saw_plain   = false;
        let mut saw_flipped = false;
        for seed in 0..32 {
            let out = t.apply(img.clone(), &mut StdRng::seed_from_u64(seed));
            assert!(out == plain || out == flipped);
            saw_plain   |= out == plain;
            saw_flipped |= out == flipped;
        }
        assert!(saw_plain && saw_flipped);
    }

    #[test]
    fn test_random_crop_stays_inside_padded_image() {
        let t      = crop_and_flip(6, 1);
        let img    = gradient(6, 6);
        let padded = reflect_pad(&img, 1);

        // Every 6x6 window of the 8x8 padded image, flipped or not
        let mut windows = Vec::new();
        for y in 0..=2 {
            for x in 0..=2 {
                let crop = imageops::crop_imm(&padded, x, y, 6, 6).to_image();
                windows.push(t.normalize_chw(&imageops::flip_horizontal(&crop)));
                windows.push(t.normalize_chw(&crop));
            }
        }

        for seed in 0..32 {
            let out = t.apply(img.clone(), &mut StdRng::seed_from_u64(seed));
            assert!(windows.contains(&out));
        }
    }

    #[test]
    fn test_rotation_keeps_size_and_blackens_corners() {
        let t   = ImageTransform { padding: 0, max_rotation: 45.0, ..ImageTransform::train(16) };
        let img = RgbImage::from_pixel(16, 16, Rgb([255, 255, 255]));

        let black = (0.0 - MEANS[0]) / STDS[0];
        let mut rotated_once = false;
        for seed in 0..16 {
            let out = t.apply(img.clone(), &mut StdRng::seed_from_u64(seed));
            assert_eq!(out.len(), 3 * 16 * 16);
            rotated_once |= (out[0] - black).abs() < 1e-6;
        }
        assert!(rotated_once);
    }
}
