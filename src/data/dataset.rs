use burn::data::dataset::Dataset;

use crate::data::transform::ImageTransform;
use crate::domain::sample::ImageSample;

/// One decoded, transformed image ready for batching.
/// `pixels` is CHW, length 3 * S * S.
#[derive(Debug, Clone)]
pub struct ImageItem {
    pub pixels: Vec<f32>,
    pub label:  usize,
}

/// A split of indexed samples plus the transform applied on access.
/// Decoding happens in `get`, so it runs on the loader's worker threads.
pub struct ImageDataset {
    samples:   Vec<ImageSample>,
    transform: ImageTransform,
}

impl ImageDataset {
    pub fn new(samples: Vec<ImageSample>, transform: ImageTransform) -> Self {
        Self { samples, transform }
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<ImageItem> for ImageDataset {
    fn get(&self, index: usize) -> Option<ImageItem> {
        let sample = self.samples.get(index)?;
        match self.transform.load(&sample.path) {
            Ok(pixels) => Some(ImageItem { pixels, label: sample.label }),
            // Burn ends the pass at the first None; the trainer reports the short count
            Err(e) => {
                tracing::error!("{:#}", e);
                None
            }
        }
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::write_png;

    #[test]
    fn test_get_decodes_and_transforms() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.png");
        write_png(&path, 12, 12, [10, 20, 30]);

        let ds   = ImageDataset::new(vec![ImageSample::new(&path, 3)], ImageTransform::eval(8));
        let item = ds.get(0).unwrap();
        assert_eq!(item.label, 3);
        assert_eq!(item.pixels.len(), 3 * 8 * 8);
        assert!(ds.get(1).is_none());
    }

    #[test]
    fn test_unreadable_file_yields_none() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("gone.png");
        let ds   = ImageDataset::new(vec![ImageSample::new(path, 0)], ImageTransform::eval(8));
        assert_eq!(ds.len(), 1);
        assert!(ds.get(0).is_none());
    }
}
