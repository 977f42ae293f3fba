//! Typed reads from the remote game process.
//!
//! The memory collaborator only offers a few primitive reads and reports
//! failure by returning zero. Everything richer is composed here through
//! [`Readable`], so a failed read surfaces as a zero value the caller
//! sanity-checks (for example a null [`Address`]).

use std::fmt;
use std::ops::Add;

use glam::{Mat4, Vec3};

use crate::transform::SurfaceSize;

/// Opaque remote address. The zero address means "not resolved".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub u64);

impl Address {
    /// The unresolved address.
    pub const NULL: Self = Self(0);

    /// Returns `true` for the unresolved address.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl Add<u64> for Address {
    type Output = Self;

    fn add(self, offset: u64) -> Self {
        Self(self.0.wrapping_add(offset))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Primitive reads exposed by the memory collaborator.
///
/// Implementations return zero for anything they cannot read.
pub trait ProcessMemory: Send + Sync {
    /// Reads one byte.
    fn read_u8(&self, address: Address) -> u8;
    /// Reads a signed 32-bit integer.
    fn read_i32(&self, address: Address) -> i32;
    /// Reads a 32-bit float.
    fn read_f32(&self, address: Address) -> f32;
    /// Reads a pointer-sized remote address.
    fn read_address(&self, address: Address) -> Address;

    /// Fills `values` with consecutive floats starting at `address`.
    ///
    /// The default falls back to one [`Self::read_f32`] per value. Backends
    /// with a bulk read should override it.
    fn read_f32_block(&self, address: Address, values: &mut [f32]) {
        for (offset, value) in (0_u64..).step_by(4).zip(values.iter_mut()) {
            *value = self.read_f32(address + offset);
        }
    }
}

/// A value that can be assembled from primitive remote reads.
pub trait Readable: Sized {
    /// Reads `Self` starting at `address`.
    fn read_from<M: ProcessMemory + ?Sized>(memory: &M, address: Address) -> Self;
}

impl Readable for u8 {
    fn read_from<M: ProcessMemory + ?Sized>(memory: &M, address: Address) -> Self {
        memory.read_u8(address)
    }
}

impl Readable for bool {
    fn read_from<M: ProcessMemory + ?Sized>(memory: &M, address: Address) -> Self {
        memory.read_u8(address) != 0
    }
}

impl Readable for i32 {
    fn read_from<M: ProcessMemory + ?Sized>(memory: &M, address: Address) -> Self {
        memory.read_i32(address)
    }
}

impl Readable for f32 {
    fn read_from<M: ProcessMemory + ?Sized>(memory: &M, address: Address) -> Self {
        memory.read_f32(address)
    }
}

impl Readable for Address {
    fn read_from<M: ProcessMemory + ?Sized>(memory: &M, address: Address) -> Self {
        memory.read_address(address)
    }
}

impl Readable for Vec3 {
    fn read_from<M: ProcessMemory + ?Sized>(memory: &M, address: Address) -> Self {
        Self::new(
            memory.read_f32(address),
            memory.read_f32(address + 4),
            memory.read_f32(address + 8),
        )
    }
}

/// Matrices are stored row-major for column vectors, sixteen floats.
impl Readable for Mat4 {
    fn read_from<M: ProcessMemory + ?Sized>(memory: &M, address: Address) -> Self {
        let mut values = [0.0_f32; 16];
        memory.read_f32_block(address, &mut values);
        // `from_cols_array` reads column-major, so the transpose restores rows.
        Self::from_cols_array(&values).transpose()
    }
}

/// Generic typed read over any [`ProcessMemory`], including trait objects.
pub trait ReadExt: ProcessMemory {
    /// Reads a `T` at `address`.
    fn read<T: Readable>(&self, address: Address) -> T {
        T::read_from(self, address)
    }
}

impl<M: ProcessMemory + ?Sized> ReadExt for M {}

/// The attached game process as seen by the polling and steering loops.
pub trait GameProcess: Send + Sync {
    /// Returns `false` once the process handle is permanently unusable.
    fn is_valid(&self) -> bool;
    /// Memory access into the process.
    fn memory(&self) -> &dyn ProcessMemory;
    /// Base address of the client module.
    fn client_module(&self) -> Address;
    /// Base address of the engine module.
    fn engine_module(&self) -> Address;
    /// Pixel size of the game's output surface.
    fn surface_size(&self) -> SurfaceSize;
}
