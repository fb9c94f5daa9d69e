/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Requested alpha mode; falls back to the first supported mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Enables wgpu validation and debug labels on the instance.
    pub validation: bool,

    /// Power preference used when picking the adapter.
    pub power_preference: wgpu::PowerPreference,

    /// Desired maximum frame latency for the surface (hint).
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// Picks a vsync'd or tearing present mode; wgpu falls back to FIFO when
    /// the preferred mode is unavailable.
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        self
    }

    /// Instance flags derived from `validation`.
    pub(crate) fn instance_flags(&self) -> wgpu::InstanceFlags {
        if self.validation {
            wgpu::InstanceFlags::debugging()
        } else {
            wgpu::InstanceFlags::empty()
        }
    }

    /// Limits requested from the device.
    ///
    /// The line pipeline only needs uniform buffers with dynamic offsets and
    /// two bind groups, which the downlevel WebGL2 limits already cover.
    pub(crate) fn limits(&self, adapter: &wgpu::Adapter) -> wgpu::Limits {
        wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            validation: cfg!(debug_assertions),
            power_preference: wgpu::PowerPreference::HighPerformance,
            desired_maximum_frame_latency: 2,
        }
    }
}
