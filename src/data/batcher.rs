// ============================================================
// Layer 4 — Image Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<ImageItem>
// into device tensors.
//
// How batching works here:
//   Input:  Vec of N ImageItems, each a flat CHW Vec<f32> of 3*S*S
//   Output: ImageBatch with images [N, 3, S, S] and labels [N]
//
//   All pixel vectors are concatenated into one long Vec, then
//   reshaped. This is valid because every item went through the
//   same transform and therefore has the same S.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::ImageItem;

// ─── ImageBatch ───────────────────────────────────────────────────────────────
/// A batch of images ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    /// Normalised pixels — shape: [batch_size, 3, S, S]
    pub images: Tensor<B, 4>,

    /// Class indices — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

impl<B: Backend> ImageBatch<B> {
    /// Number of samples in the batch
    pub fn num_samples(&self) -> usize {
        self.labels.dims()[0]
    }
}

// ─── ImageBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<ImageItem, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<ImageItem>) -> ImageBatch<B> {
        let batch_size = items.len();
        let pixels     = items.first().map_or(0, |i| i.pixels.len());
        // pixels = 3 * S * S
        let side       = ((pixels / 3) as f64).sqrt() as usize;

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|item| item.pixels.iter().copied())
            .collect();

        let labels: Vec<i32> = items
            .iter()
            .map(|item| item.label as i32)
            .collect();

        let images = Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([batch_size, 3, side, side]);

        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        ImageBatch { images, labels }
    }
}
