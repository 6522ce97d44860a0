//! Mapping a 1D component buffer onto a 2D texture.

use crate::error::{Advisory, BufferError};

/// Components packed into one texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VectorWidth {
    #[default]
    One = 1,
    Two = 2,
    Four = 4,
}

impl VectorWidth {
    /// Clamps `requested` to `[1, 4]` and widens 3 to 4.
    ///
    /// The advisory is only produced for the 3 -> 4 remap; out-of-range values are clamped
    /// silently.
    pub fn coerce(requested: u32) -> (VectorWidth, Option<Advisory>) {
        match requested.clamp(1, 4) {
            1 => (VectorWidth::One, None),
            2 => (VectorWidth::Two, None),
            3 => {
                tracing::warn!(
                    requested,
                    effective = 4,
                    "three-component vectors are stored in four-component texels"
                );
                (
                    VectorWidth::Four,
                    Some(Advisory::VectorWidthCoerced {
                        requested,
                        effective: 4,
                    }),
                )
            }
            _ => (VectorWidth::Four, None),
        }
    }

    pub const fn get(self) -> u32 {
        self as u32
    }
}

/// Texture edge addressing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    #[default]
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

/// Per-axis wrap policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Wrap {
    pub s: WrapMode,
    pub t: WrapMode,
}

impl From<WrapMode> for Wrap {
    fn from(mode: WrapMode) -> Self {
        Self { s: mode, t: mode }
    }
}

impl From<(WrapMode, WrapMode)> for Wrap {
    fn from((s, t): (WrapMode, WrapMode)) -> Self {
        Self { s, t }
    }
}

fn ceil_sqrt(n: u64) -> u64 {
    let mut r = (n as f64).sqrt() as u64;
    // Float sqrt can be off by one for large inputs.
    while r.saturating_mul(r) > n {
        r -= 1;
    }
    while r.saturating_mul(r) < n {
        r += 1;
    }
    r
}

/// Packs `texels` into the most square `(width, height)` rectangle with `width >= height`.
///
/// Total and deterministic: `width * height >= texels` for every input, and if
/// `texels <= max * max` then both sides are `<= max`.
pub fn closest_dimensions(texels: u64) -> (u64, u64) {
    let texels = texels.max(1);
    let width = ceil_sqrt(texels);
    let height = texels.div_ceil(width);
    (width, height)
}

/// Resolved 2D shape of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureLayout {
    pub element_count: usize,
    pub vector_width: VectorWidth,
    pub texel_count: u64,
    pub width: u32,
    pub height: u32,
}

impl TextureLayout {
    /// Computes the texture shape for `element_count` components and checks it against the
    /// device's maximum 2D edge length.
    pub fn resolve(
        element_count: usize,
        vector_width: VectorWidth,
        max_edge: u32,
    ) -> Result<Self, BufferError> {
        if element_count == 0 {
            return Err(BufferError::InvalidDescriptor(
                "buffer must hold at least one element",
            ));
        }

        let texel_count = (element_count as u64).div_ceil(u64::from(vector_width.get()));
        let (width, height) = closest_dimensions(texel_count);
        if width > u64::from(max_edge) || height > u64::from(max_edge) {
            return Err(BufferError::CapacityExceeded {
                width,
                height,
                max: max_edge,
            });
        }

        Ok(Self {
            element_count,
            vector_width,
            texel_count,
            // Both sides were just checked against a u32 bound.
            width: width as u32,
            height: height as u32,
        })
    }

    /// Texels allocated, including padding at the end of the last row.
    pub fn allocated_texels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}
