//! Device and precision selection.
//!
//! CUDA is the default; when it is not usable on the running machine the
//! worker falls back to CPU and forces int8, the only precision that stays
//! fast without an accelerator. The fallback is a warning, not an error.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;

/// Inference device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Device {
    Cuda,
    Cpu,
}

/// Numeric precision used by the engine. For ggml models int8 selects the
/// q8_0 quantized weights; float16 and float32 both use the full-precision
/// file (ggml weights ship at f16).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComputeType {
    Int8,
    Float16,
    Float32,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Device::Cuda => "cuda",
            Device::Cpu => "cpu",
        })
    }
}

impl fmt::Display for ComputeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComputeType::Int8 => "int8",
            ComputeType::Float16 => "float16",
            ComputeType::Float32 => "float32",
        })
    }
}

/// Effective device and precision after the availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub device: Device,
    pub compute: ComputeType,
    pub downgraded: bool,
}

/// Resolve the requested device/precision against the running machine.
pub fn resolve(device: Device, compute: ComputeType) -> Selection {
    resolve_with_availability(device, compute, cuda_available())
}

/// Availability-parameterized resolution. CUDA requested but unusable means
/// CPU plus forced int8, even when the caller asked for a float precision.
pub fn resolve_with_availability(device: Device, compute: ComputeType, cuda_ok: bool) -> Selection {
    if device == Device::Cuda && !cuda_ok {
        return Selection {
            device: Device::Cpu,
            compute: ComputeType::Int8,
            downgraded: true,
        };
    }
    Selection {
        device,
        compute,
        downgraded: false,
    }
}

/// Probe for a usable CUDA runtime: the binary must be built with CUDA
/// support and the NVIDIA driver must be present on the machine.
pub fn cuda_available() -> bool {
    cfg!(feature = "cuda") && driver_present()
}

fn driver_present() -> bool {
    const DRIVER_PATHS: &[&str] = &[
        "/dev/nvidiactl",
        "/usr/lib/x86_64-linux-gnu/libcuda.so.1",
        "/usr/lib64/libcuda.so.1",
        "/usr/local/cuda/lib64/libcudart.so",
        "C:\\Windows\\System32\\nvcuda.dll",
    ];
    DRIVER_PATHS.iter().any(|p| Path::new(p).exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuda_unavailable_downgrades_and_forces_int8() {
        let sel = resolve_with_availability(Device::Cuda, ComputeType::Float32, false);
        assert_eq!(sel.device, Device::Cpu);
        assert_eq!(sel.compute, ComputeType::Int8);
        assert!(sel.downgraded);
    }

    #[test]
    fn cuda_available_keeps_request() {
        let sel = resolve_with_availability(Device::Cuda, ComputeType::Float16, true);
        assert_eq!(sel.device, Device::Cuda);
        assert_eq!(sel.compute, ComputeType::Float16);
        assert!(!sel.downgraded);
    }

    #[test]
    fn explicit_cpu_keeps_requested_precision() {
        let sel = resolve_with_availability(Device::Cpu, ComputeType::Float32, false);
        assert_eq!(sel.device, Device::Cpu);
        assert_eq!(sel.compute, ComputeType::Float32);
        assert!(!sel.downgraded);
    }

    #[test]
    fn display_matches_cli_values() {
        assert_eq!(Device::Cuda.to_string(), "cuda");
        assert_eq!(ComputeType::Int8.to_string(), "int8");
        assert_eq!(ComputeType::Float32.to_string(), "float32");
    }
}
