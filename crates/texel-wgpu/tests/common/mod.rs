//! Shared helpers for `texel-wgpu` integration tests.

use std::sync::OnceLock;

use texel_wgpu::{WgpuDevice, WgpuInitError, WgpuInitOptions};

pub fn require_webgpu() -> bool {
    let Ok(raw) = std::env::var("TEXEL_REQUIRE_WEBGPU") else {
        return false;
    };

    let v = raw.trim();
    v == "1"
        || v.eq_ignore_ascii_case("true")
        || v.eq_ignore_ascii_case("yes")
        || v.eq_ignore_ascii_case("on")
}

pub fn skip_or_panic(test_name: &str, reason: &str) {
    if require_webgpu() {
        panic!("TEXEL_REQUIRE_WEBGPU is enabled but {test_name} cannot run: {reason}");
    }
    eprintln!("skipping {test_name}: {reason}");
}

/// Return a device shared by every test in this binary.
///
/// Some backends have been observed to crash when many `wgpu::Device`s are created and dropped
/// in one process, so the device is created once and cloned out.
pub fn device(test_name: &str) -> Option<WgpuDevice> {
    static DEVICE: OnceLock<Option<WgpuDevice>> = OnceLock::new();

    let device = DEVICE.get_or_init(|| {
        match pollster::block_on(WgpuDevice::new_headless(WgpuInitOptions::from_env())) {
            Ok(device) => Some(device),
            Err(WgpuInitError::AdapterNotFound) => None,
            Err(err) => panic!("failed to create wgpu device: {err}"),
        }
    });

    match device {
        Some(device) => Some(device.clone()),
        None => {
            skip_or_panic(test_name, "wgpu adapter not found");
            None
        }
    }
}
