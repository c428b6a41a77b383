use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

/// Reads a WGSL source file. Missing or empty files are fatal at startup.
pub fn read_wgsl(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read shader {}", path.display()))?;
    if source.trim().is_empty() {
        return Err(anyhow!("shader {} is empty", path.display()));
    }
    Ok(source)
}

pub fn create_module(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    })
}
