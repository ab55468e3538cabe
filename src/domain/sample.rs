use std::path::PathBuf;

/// One indexed image file and its class label.
/// Pixels are not loaded until the data loader asks for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageSample {
    pub path:  PathBuf,
    pub label: usize,
}

impl ImageSample {
    pub fn new(path: impl Into<PathBuf>, label: usize) -> Self {
        Self { path: path.into(), label }
    }
}
