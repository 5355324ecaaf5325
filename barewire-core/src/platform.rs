//! Host type kinds and platform-dependent sizing.
//!
//! Schemas defer their primitive vocabulary to [`TypeKind`] and resolve
//! natural sizes and alignments through a [`PlatformContext`]. Word-sized
//! integers (`Int`/`UInt`) have no fixed width here; their size always comes
//! from the context so that layouts computed for a 32-bit target differ from
//! those computed for a 64-bit target.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The primitive type vocabulary understood by schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned word-sized integer; width resolved by the platform context.
    UInt,
    /// Signed word-sized integer; width resolved by the platform context.
    Int,
    /// IEEE-754 single-precision float.
    F32,
    /// IEEE-754 double-precision float.
    F64,
    /// Boolean, one byte on the wire.
    Bool,
    /// The unit (void) type; legal only as a union case payload.
    Unit,
    /// UTF-8 string.
    Str,
    /// Raw byte blob.
    Bytes,
}

impl TypeKind {
    /// Check if this kind is an integer (fixed-width or word-sized).
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::UInt
                | Self::Int
        )
    }

    /// Check if this kind is a signed integer.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::Int)
    }

    /// Check if this kind is a floating-point type.
    #[must_use]
    pub fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::UInt => "uint",
            Self::Int => "int",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Unit => "void",
            Self::Str => "string",
            Self::Bytes => "data",
        };
        write!(f, "{}", s)
    }
}

/// Target description used to resolve natural sizes and alignments.
///
/// The context is the single source of truth for the width of word-sized
/// integers and pointers; nothing else in the crate hard-codes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformContext {
    /// Size of a machine word in bytes.
    pub word_size: usize,
    /// Size of a pointer in bytes.
    pub pointer_size: usize,
    /// Alignment of a pointer in bytes.
    pub pointer_align: usize,
}

impl PlatformContext {
    /// Create a context with explicit word and pointer geometry.
    #[must_use]
    pub const fn new(word_size: usize, pointer_size: usize, pointer_align: usize) -> Self {
        Self {
            word_size,
            pointer_size,
            pointer_align,
        }
    }

    /// A context describing the compilation host.
    #[must_use]
    pub fn host() -> Self {
        let word = std::mem::size_of::<usize>();
        Self::new(word, word, std::mem::align_of::<usize>())
    }

    /// A 64-bit context (LP64-style targets).
    #[must_use]
    pub const fn lp64() -> Self {
        Self::new(8, 8, 8)
    }

    /// A 32-bit context (ILP32-style targets, e.g. Cortex-M).
    #[must_use]
    pub const fn ilp32() -> Self {
        Self::new(4, 4, 4)
    }

    /// Natural byte size of a type kind on this target.
    #[must_use]
    pub fn size_of(&self, kind: TypeKind) -> usize {
        match kind {
            TypeKind::U8 | TypeKind::I8 | TypeKind::Bool => 1,
            TypeKind::U16 | TypeKind::I16 => 2,
            TypeKind::U32 | TypeKind::I32 | TypeKind::F32 => 4,
            TypeKind::U64 | TypeKind::I64 | TypeKind::F64 => 8,
            TypeKind::UInt | TypeKind::Int => self.word_size,
            TypeKind::Unit => 0,
            TypeKind::Str | TypeKind::Bytes => self.pointer_size,
        }
    }

    /// Natural byte alignment of a type kind on this target.
    #[must_use]
    pub fn align_of(&self, kind: TypeKind) -> usize {
        match kind {
            TypeKind::Unit => 1,
            TypeKind::Str | TypeKind::Bytes => self.pointer_align,
            _ => self.size_of(kind).max(1),
        }
    }
}

impl Default for PlatformContext {
    fn default() -> Self {
        Self::host()
    }
}
