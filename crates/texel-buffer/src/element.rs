//! Element kinds and the host arrays that carry them.
//!
//! A buffer's element type is picked once at construction. When initial data is supplied its
//! concrete [`HostArray`] variant decides the type (see [`infer_element_type`]); otherwise the
//! requested type is kept.

use half::f16;

/// Numeric kind of one vector component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F16,
    #[default]
    F32,
}

impl ElementType {
    pub const ALL: [ElementType; 8] = [
        ElementType::U8,
        ElementType::I8,
        ElementType::U16,
        ElementType::I16,
        ElementType::U32,
        ElementType::I32,
        ElementType::F16,
        ElementType::F32,
    ];

    /// Size in bytes of a single component.
    pub const fn component_size(self) -> usize {
        match self {
            ElementType::U8 | ElementType::I8 => 1,
            ElementType::U16 | ElementType::I16 | ElementType::F16 => 2,
            ElementType::U32 | ElementType::I32 | ElementType::F32 => 4,
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(self, ElementType::F16 | ElementType::F32)
    }
}

/// Variant tag of a [`HostArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKind {
    U8,
    U8Clamped,
    I8,
    U16,
    I16,
    U32,
    I32,
    F16,
    F32,
}

/// Host array kind -> element type. Ordered; the first matching row wins.
pub const INFERENCE_TABLE: &[(HostKind, ElementType)] = &[
    (HostKind::U8Clamped, ElementType::U8),
    (HostKind::U8, ElementType::U8),
    (HostKind::I8, ElementType::I8),
    (HostKind::U16, ElementType::U16),
    (HostKind::I16, ElementType::I16),
    (HostKind::U32, ElementType::U32),
    (HostKind::I32, ElementType::I32),
    (HostKind::F16, ElementType::F16),
    (HostKind::F32, ElementType::F32),
];

/// Looks up `kind` in [`INFERENCE_TABLE`].
pub fn infer_element_type(kind: HostKind) -> Option<ElementType> {
    INFERENCE_TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, ty)| *ty)
}

/// An owned host-side array of buffer components.
///
/// `U8Clamped` models a byte array whose writers saturate instead of wrapping. Storage never
/// sees that distinction: it is reinterpreted as plain `U8` before any transfer.
#[derive(Debug, Clone, PartialEq)]
pub enum HostArray {
    U8(Vec<u8>),
    U8Clamped(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    F16(Vec<f16>),
    F32(Vec<f32>),
}

macro_rules! for_each_array {
    ($array:expr, $v:ident => $body:expr) => {
        match $array {
            HostArray::U8($v) => $body,
            HostArray::U8Clamped($v) => $body,
            HostArray::I8($v) => $body,
            HostArray::U16($v) => $body,
            HostArray::I16($v) => $body,
            HostArray::U32($v) => $body,
            HostArray::I32($v) => $body,
            HostArray::F16($v) => $body,
            HostArray::F32($v) => $body,
        }
    };
}

impl HostArray {
    /// Allocates a zero-filled array of `len` components typed per `ty`.
    pub fn zeroed(ty: ElementType, len: usize) -> Self {
        match ty {
            ElementType::U8 => HostArray::U8(vec![0; len]),
            ElementType::I8 => HostArray::I8(vec![0; len]),
            ElementType::U16 => HostArray::U16(vec![0; len]),
            ElementType::I16 => HostArray::I16(vec![0; len]),
            ElementType::U32 => HostArray::U32(vec![0; len]),
            ElementType::I32 => HostArray::I32(vec![0; len]),
            ElementType::F16 => HostArray::F16(vec![f16::ZERO; len]),
            ElementType::F32 => HostArray::F32(vec![0.0; len]),
        }
    }

    /// Wraps `bytes` as a clamped byte array.
    pub fn clamped(bytes: Vec<u8>) -> Self {
        HostArray::U8Clamped(bytes)
    }

    pub fn kind(&self) -> HostKind {
        match self {
            HostArray::U8(_) => HostKind::U8,
            HostArray::U8Clamped(_) => HostKind::U8Clamped,
            HostArray::I8(_) => HostKind::I8,
            HostArray::U16(_) => HostKind::U16,
            HostArray::I16(_) => HostKind::I16,
            HostArray::U32(_) => HostKind::U32,
            HostArray::I32(_) => HostKind::I32,
            HostArray::F16(_) => HostKind::F16,
            HostArray::F32(_) => HostKind::F32,
        }
    }

    /// Element type this array maps to through [`INFERENCE_TABLE`].
    pub fn element_type(&self) -> ElementType {
        // Every `HostKind` has a row in the table.
        infer_element_type(self.kind()).unwrap_or_default()
    }

    /// Number of components (not bytes, not texels).
    pub fn len(&self) -> usize {
        for_each_array!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Turns a clamped byte array into a plain byte array over the same allocation.
    ///
    /// Any other variant is returned unchanged.
    pub fn reinterpret_clamped(self) -> Self {
        match self {
            HostArray::U8Clamped(bytes) => HostArray::U8(bytes),
            other => other,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        for_each_array!(self, v => bytemuck::cast_slice(v.as_slice()))
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        for_each_array!(self, v => bytemuck::cast_slice_mut(v.as_mut_slice()))
    }
}

macro_rules! impl_from_vec {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for HostArray {
                fn from(v: Vec<$ty>) -> Self {
                    HostArray::$variant(v)
                }
            }
        )*
    };
}

impl_from_vec!(
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    f16 => F16,
    f32 => F32,
);
