use anyhow::{ensure, Result};
use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        Linear, LinearConfig, PaddingConfig2d,
    },
    prelude::*,
    tensor::activation::{relu, tanh},
};

use crate::domain::breed::NUM_CLASSES;

/// Total spatial reduction of the three pooling stages (4 * 2 * 4).
pub const DOWNSAMPLE: usize = 32;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct ImagewoofCnnConfig {
    #[config(default = 10)]
    pub num_classes:   usize,
    /// Input side length S; inputs are [batch, 3, S, S]
    #[config(default = 160)]
    pub image_size:    usize,
    /// Width of the first conv; later convs use 2x, 4x, 8x, 8x, 16x
    #[config(default = 64)]
    pub base_channels: usize,
}

impl ImagewoofCnnConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.image_size > 0 && self.image_size % DOWNSAMPLE == 0,
            "image_size must be a positive multiple of {DOWNSAMPLE}, got {}",
            self.image_size
        );
        ensure!(self.base_channels > 0, "base_channels must be positive");
        ensure!(
            self.num_classes > 0 && self.num_classes <= NUM_CLASSES,
            "num_classes must be in 1..={NUM_CLASSES}, got {}",
            self.num_classes
        );
        Ok(())
    }

    /// Features entering the dense head: 16c channels over (S/32)^2 cells
    pub fn flat_features(&self) -> usize {
        let side = self.image_size / DOWNSAMPLE;
        16 * self.base_channels * side * side
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> ImagewoofCnn<B> {
        let c = self.base_channels;

        ImagewoofCnn {
            block1: self.build_conv_block(3,     c,     2 * c,  4, device),
            block2: self.build_conv_block(2 * c, 4 * c, 8 * c,  2, device),
            block3: self.build_conv_block(8 * c, 8 * c, 16 * c, 4, device),
            fc1:    LinearConfig::new(self.flat_features(), 1024).init(device),
            fc2:    LinearConfig::new(1024, 512).init(device),
            fc3:    LinearConfig::new(512, 256).init(device),
            head:   LinearConfig::new(256, self.num_classes).init(device),
        }
    }

    fn build_conv_block<B: Backend>(
        &self,
        in_channels:  usize,
        mid_channels: usize,
        out_channels: usize,
        pool:         usize,
        device:       &B::Device,
    ) -> ConvBlock<B> {
        let conv = |i: usize, o: usize| -> Conv2d<B> {
            Conv2dConfig::new([i, o], [3, 3])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .init(device)
        };
        ConvBlock {
            conv1: conv(in_channels, mid_channels),
            conv2: conv(mid_channels, out_channels),
            pool:  MaxPool2dConfig::new([pool, pool]).with_strides([pool, pool]).init(),
        }
    }
}

/// conv3x3 → ReLU → conv3x3 → ReLU → max-pool
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    pub conv1: Conv2d<B>,
    pub conv2: Conv2d<B>,
    pub pool:  MaxPool2d,
}

impl<B: Backend> ConvBlock<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = relu(self.conv1.forward(x));
        let x = relu(self.conv2.forward(x));
        self.pool.forward(x)
    }
}

#[derive(Module, Debug)]
pub struct ImagewoofCnn<B: Backend> {
    pub block1: ConvBlock<B>,
    pub block2: ConvBlock<B>,
    pub block3: ConvBlock<B>,
    pub fc1:    Linear<B>,
    pub fc2:    Linear<B>,
    pub fc3:    Linear<B>,
    pub head:   Linear<B>,
}

impl<B: Backend> ImagewoofCnn<B> {
    /// images: [batch, 3, S, S] → class logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.block1.forward(images);
        let x = self.block2.forward(x);
        let x = self.block3.forward(x); // [batch, 16c, S/32, S/32]

        let x = x.flatten::<2>(1, 3);
        let x = relu(self.fc1.forward(x));
        let x = tanh(self.fc2.forward(x));
        let x = relu(self.fc3.forward(x));
        self.head.forward(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let cfg    = ImagewoofCnnConfig::new().with_image_size(64).with_base_channels(2);
        let model  = cfg.init::<NdArray>(&device);

        let logits = model.forward(Tensor::zeros([3, 3, 64, 64], &device));
        assert_eq!(logits.dims(), [3, 10]);
    }

    #[test]
    fn test_default_head_matches_160px_input() {
        // 1024 channels over a 5x5 grid
        assert_eq!(ImagewoofCnnConfig::new().flat_features(), 1024 * 5 * 5);
    }

    #[test]
    fn test_image_size_must_divide_by_32() {
        assert!(ImagewoofCnnConfig::new().validate().is_ok());
        assert!(ImagewoofCnnConfig::new().with_image_size(100).validate().is_err());
        assert!(ImagewoofCnnConfig::new().with_image_size(0).validate().is_err());
    }
}
