use std::sync::Arc;

use texel_buffer::{DeviceCaps, StorageDesc, StorageDevice, StorageError};

use crate::texture::WgpuTexture;

#[derive(Debug, thiserror::Error)]
pub enum WgpuInitError {
    #[error("no suitable wgpu adapter found")]
    AdapterNotFound,
    #[error("request_device failed: {0}")]
    RequestDevice(String),
}

/// Adapter selection for [`WgpuDevice::new_headless`].
#[derive(Debug, Clone)]
pub struct WgpuInitOptions {
    /// Backends to try. `None` tries GL first on Linux, then the primary backends.
    pub backends: Option<wgpu::Backends>,
    pub power_preference: wgpu::PowerPreference,
    pub label: Option<String>,
}

impl Default for WgpuInitOptions {
    fn default() -> Self {
        Self {
            backends: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            label: Some("texel wgpu device".into()),
        }
    }
}

impl WgpuInitOptions {
    /// Defaults overridden by `WGPU_BACKEND` and `WGPU_POWER_PREF`.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(backends) = wgpu::util::backend_bits_from_env() {
            opts.backends = Some(backends);
        }
        if let Some(pref) = wgpu::util::power_preference_from_env() {
            opts.power_preference = pref;
        }
        opts
    }
}

/// A `wgpu` device/queue pair handing out [`WgpuTexture`]s.
///
/// Cheap to clone; clones share the device.
#[derive(Debug, Clone)]
pub struct WgpuDevice {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    caps: DeviceCaps,
}

impl WgpuDevice {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self::from_shared(Arc::new(device), Arc::new(queue))
    }

    /// Wraps a device that is also used elsewhere (e.g. by the compute passes).
    pub fn from_shared(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        let caps = DeviceCaps {
            max_texture_dimension_2d: device.limits().max_texture_dimension_2d,
            // `map_async` completes through `Device::poll` (or the JS event loop on wasm32),
            // never requiring the caller to block.
            async_readback: true,
        };
        Self {
            device,
            queue,
            caps,
        }
    }

    /// Creates a device without a presentation surface.
    pub async fn new_headless(options: WgpuInitOptions) -> Result<Self, WgpuInitError> {
        ensure_xdg_runtime_dir();

        let adapter = match options.backends {
            Some(backends) => request_adapter(backends, options.power_preference).await,
            // On Linux CI we prefer the GL backend first to avoid crashes seen with some Vulkan
            // software adapters (lavapipe/llvmpipe).
            None if cfg!(target_os = "linux") => {
                match request_adapter(wgpu::Backends::GL, options.power_preference).await {
                    Some(adapter) => Some(adapter),
                    None => {
                        request_adapter(wgpu::Backends::PRIMARY, options.power_preference).await
                    }
                }
            }
            None => request_adapter(wgpu::Backends::PRIMARY, options.power_preference).await,
        }
        .ok_or(WgpuInitError::AdapterNotFound)?;

        let info = adapter.get_info();
        tracing::debug!(
            adapter = %info.name,
            backend = ?info.backend,
            "selected wgpu adapter"
        );

        // Keep the downlevel baseline but ask for the adapter's real texture size limit; it
        // bounds how large a buffer can get.
        let required_limits = wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits());
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: options.label.as_deref(),
                    required_features: wgpu::Features::empty(),
                    required_limits,
                },
                None,
            )
            .await
            .map_err(|err| WgpuInitError::RequestDevice(err.to_string()))?;

        Ok(Self::new(device, queue))
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }
}

impl StorageDevice for WgpuDevice {
    type Texture = WgpuTexture;

    fn caps(&self) -> DeviceCaps {
        self.caps
    }

    fn create_texture(&self, desc: &StorageDesc<'_>) -> Result<WgpuTexture, StorageError> {
        WgpuTexture::create(self.device.clone(), self.queue.clone(), desc)
    }
}

async fn request_adapter(
    backends: wgpu::Backends,
    power_preference: wgpu::PowerPreference,
) -> Option<wgpu::Adapter> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends,
        ..Default::default()
    });
    instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
}

/// When using the GL backend on Linux, wgpu can emit noisy warnings if `XDG_RUNTIME_DIR` is
/// unset or points at a directory with unsafe permissions. Point it at a per-process temp dir.
fn ensure_xdg_runtime_dir() {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let needs_runtime_dir = match std::env::var("XDG_RUNTIME_DIR") {
            Ok(dir) if !dir.is_empty() => match std::fs::metadata(&dir) {
                Ok(meta) => !meta.is_dir() || (meta.permissions().mode() & 0o077) != 0,
                Err(_) => true,
            },
            _ => true,
        };
        if needs_runtime_dir {
            let dir = std::env::temp_dir()
                .join(format!("texel-wgpu-xdg-runtime-{}", std::process::id()));
            let _ = std::fs::create_dir_all(&dir);
            let _ = std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o700));
            std::env::set_var("XDG_RUNTIME_DIR", &dir);
        }
    }
}
