/// GPU backend (Vulkan / Metal / DX12 through wgpu)
pub type GpuBackend = burn::backend::Wgpu;

/// Pure-Rust CPU backend
pub type CpuBackend = burn::backend::NdArray;

/// Training backends add automatic differentiation on top
pub type GpuTrainBackend = burn::backend::Autodiff<GpuBackend>;
pub type CpuTrainBackend = burn::backend::Autodiff<CpuBackend>;

/// Where tensors live for the whole run. Chosen once at the entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceKind {
    #[default]
    Gpu,
    Cpu,
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceKind::Gpu => write!(f, "gpu (wgpu)"),
            DeviceKind::Cpu => write!(f, "cpu (ndarray)"),
        }
    }
}

/// Worker threads for the data loader: one per available CPU.
pub fn default_num_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
