//! Hardware peripheral descriptor shapes.
//!
//! These records are the data contract consumed by external register-map
//! code generators: a peripheral's instances, its field layout (typically
//! produced from a [`crate::view::ViewLayout`]), and the memory region it
//! lives in. The core exposes the shapes and their derived classifiers but
//! does not generate code from them.

use serde::{Deserialize, Serialize};

use crate::schema::SchemaType;
use crate::view::ViewLayout;

/// Permitted access to a register or bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessKind {
    /// Read-only.
    ReadOnly,
    /// Write-only.
    WriteOnly,
    /// Read-write.
    ReadWrite,
}

impl AccessKind {
    /// Check if reads are permitted.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    /// Check if writes are permitted.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        matches!(self, Self::WriteOnly | Self::ReadWrite)
    }
}

/// The kind of memory region a peripheral is mapped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryRegionKind {
    /// On-chip flash.
    Flash,
    /// Main SRAM.
    Sram,
    /// Memory-mapped peripheral registers.
    Peripheral,
    /// System control space.
    SystemControl,
    /// DMA-accessible region.
    Dma,
    /// Core-coupled memory.
    Ccm,
}

impl MemoryRegionKind {
    /// Whether contents may change outside program control.
    #[must_use]
    pub fn is_volatile(&self) -> bool {
        matches!(self, Self::Peripheral | Self::SystemControl | Self::Dma)
    }

    /// Whether accesses may go through the cache.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        matches!(self, Self::Flash | Self::Sram)
    }

    /// Whether code may execute from the region.
    #[must_use]
    pub fn is_executable(&self) -> bool {
        matches!(self, Self::Flash | Self::Sram | Self::Ccm)
    }
}

/// A named bit field within a register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitFieldDescriptor {
    /// The bit field name.
    pub name: String,
    /// Bit position of the least significant bit.
    pub position: u32,
    /// Width in bits.
    pub width: u32,
    /// Permitted access.
    pub access: AccessKind,
}

impl BitFieldDescriptor {
    /// Create a new bit field descriptor.
    pub fn new(name: impl Into<String>, position: u32, width: u32, access: AccessKind) -> Self {
        Self {
            name: name.into(),
            position,
            width,
            access,
        }
    }

    /// The mask of this bit field within its register.
    #[must_use]
    pub fn mask(&self) -> u64 {
        if self.width >= 64 {
            u64::MAX
        } else {
            ((1u64 << self.width) - 1) << self.position
        }
    }
}

/// A register (or register-like field) within a peripheral layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// The field name.
    pub name: String,
    /// Byte offset from the peripheral base.
    pub offset: usize,
    /// The field's schema type.
    pub ty: SchemaType,
    /// Permitted access.
    pub access: AccessKind,
    /// Bit fields within this register, if any.
    pub bit_fields: Vec<BitFieldDescriptor>,
    /// Optional documentation string.
    pub documentation: Option<String>,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, offset: usize, ty: SchemaType, access: AccessKind) -> Self {
        Self {
            name: name.into(),
            offset,
            ty,
            access,
            bit_fields: Vec::new(),
            documentation: None,
        }
    }

    /// Attach bit fields.
    #[must_use]
    pub fn with_bit_fields(mut self, bit_fields: Vec<BitFieldDescriptor>) -> Self {
        self.bit_fields = bit_fields;
        self
    }

    /// Attach documentation.
    #[must_use]
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// The byte layout of one peripheral block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeripheralLayout {
    /// Total size of the block in bytes.
    pub size: usize,
    /// Alignment of the block in bytes.
    pub alignment: usize,
    /// The registers in offset order.
    pub fields: Vec<FieldDescriptor>,
}

impl PeripheralLayout {
    /// Derive a peripheral layout from a computed view layout.
    ///
    /// Every slot becomes a register with the given default access;
    /// generators refine access and bit fields afterwards.
    #[must_use]
    pub fn from_view_layout(layout: &ViewLayout, access: AccessKind) -> Self {
        let mut fields: Vec<FieldDescriptor> = layout
            .slots()
            .map(|(path, slot)| FieldDescriptor::new(path, slot.offset, slot.ty.clone(), access))
            .collect();
        fields.sort_by_key(|f| f.offset);
        Self {
            size: layout.size(),
            alignment: layout.alignment(),
            fields,
        }
    }
}

/// A peripheral: its instances, layout, and memory region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeripheralDescriptor {
    /// The peripheral name (e.g., "UART").
    pub name: String,
    /// Instance name and base address pairs (e.g., `("UART0", 0x4000_C000)`).
    pub instances: Vec<(String, u64)>,
    /// The register layout shared by all instances.
    pub layout: PeripheralLayout,
    /// The memory region the instances are mapped into.
    pub memory_region: MemoryRegionKind,
}

impl PeripheralDescriptor {
    /// Create a new peripheral descriptor.
    pub fn new(
        name: impl Into<String>,
        layout: PeripheralLayout,
        memory_region: MemoryRegionKind,
    ) -> Self {
        Self {
            name: name.into(),
            instances: Vec::new(),
            layout,
            memory_region,
        }
    }

    /// Add an instance at a base address.
    #[must_use]
    pub fn with_instance(mut self, name: impl Into<String>, base_address: u64) -> Self {
        self.instances.push((name.into(), base_address));
        self
    }
}
