use crate::element::ElementType;
use crate::layout::VectorWidth;

/// Backend-neutral sized texture format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InternalFormat {
    R8Uint,
    Rg8Uint,
    Rgba8Uint,
    R8Sint,
    Rg8Sint,
    Rgba8Sint,
    R16Uint,
    Rg16Uint,
    Rgba16Uint,
    R16Sint,
    Rg16Sint,
    Rgba16Sint,
    R16Float,
    Rg16Float,
    Rgba16Float,
    R32Uint,
    Rg32Uint,
    Rgba32Uint,
    R32Sint,
    Rg32Sint,
    Rgba32Sint,
    R32Float,
    Rg32Float,
    Rgba32Float,
}

/// Channel layout of uploaded pixel data.
///
/// Integer layouts are kept distinct from float layouts because integer textures cannot be
/// filtered or normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    Red,
    Rg,
    Rgba,
    RedInteger,
    RgInteger,
    RgbaInteger,
}

/// Everything a storage backend needs to know about a texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatDesc {
    pub bytes_per_texel: u32,
    pub internal: InternalFormat,
    pub pixel: PixelLayout,
    pub element: ElementType,
}

/// Format table lookup. Pure and total over the supported combinations.
pub fn format_for(element: ElementType, width: VectorWidth) -> FormatDesc {
    use InternalFormat::*;
    use VectorWidth::{Four, One, Two};

    let internal = match (element, width) {
        (ElementType::U8, One) => R8Uint,
        (ElementType::U8, Two) => Rg8Uint,
        (ElementType::U8, Four) => Rgba8Uint,
        (ElementType::I8, One) => R8Sint,
        (ElementType::I8, Two) => Rg8Sint,
        (ElementType::I8, Four) => Rgba8Sint,
        (ElementType::U16, One) => R16Uint,
        (ElementType::U16, Two) => Rg16Uint,
        (ElementType::U16, Four) => Rgba16Uint,
        (ElementType::I16, One) => R16Sint,
        (ElementType::I16, Two) => Rg16Sint,
        (ElementType::I16, Four) => Rgba16Sint,
        (ElementType::F16, One) => R16Float,
        (ElementType::F16, Two) => Rg16Float,
        (ElementType::F16, Four) => Rgba16Float,
        (ElementType::U32, One) => R32Uint,
        (ElementType::U32, Two) => Rg32Uint,
        (ElementType::U32, Four) => Rgba32Uint,
        (ElementType::I32, One) => R32Sint,
        (ElementType::I32, Two) => Rg32Sint,
        (ElementType::I32, Four) => Rgba32Sint,
        (ElementType::F32, One) => R32Float,
        (ElementType::F32, Two) => Rg32Float,
        (ElementType::F32, Four) => Rgba32Float,
    };

    let pixel = match (element.is_float(), width) {
        (true, One) => PixelLayout::Red,
        (true, Two) => PixelLayout::Rg,
        (true, Four) => PixelLayout::Rgba,
        (false, One) => PixelLayout::RedInteger,
        (false, Two) => PixelLayout::RgInteger,
        (false, Four) => PixelLayout::RgbaInteger,
    };

    FormatDesc {
        bytes_per_texel: (element.component_size() as u32) * width.get(),
        internal,
        pixel,
        element,
    }
}
