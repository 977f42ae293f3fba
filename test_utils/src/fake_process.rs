//! In-memory game process.

use std::sync::atomic::{AtomicBool, Ordering};

use glam::{Mat4, Vec3};
use hashbrown::HashMap;
use parking_lot::{Mutex, RwLock};
use sightline::memory::{Address, GameProcess, ProcessMemory};
use sightline::transform::SurfaceSize;

/// Client module base used by [`FakeProcess::new`].
pub const CLIENT_BASE: Address = Address(0x1000_0000);
/// Engine module base used by [`FakeProcess::new`].
pub const ENGINE_BASE: Address = Address(0x2000_0000);

/// Typed memory cells keyed by absolute address. Unwritten cells read as
/// zero, like a failed remote read.
#[derive(Debug, Default)]
struct Cells {
    bytes: HashMap<u64, u8>,
    ints: HashMap<u64, i32>,
    floats: HashMap<u64, f32>,
    addresses: HashMap<u64, Address>,
}

/// Fake process with writable memory.
#[derive(Debug)]
pub struct FakeProcess {
    valid: AtomicBool,
    client: Address,
    engine: Address,
    surface: Mutex<SurfaceSize>,
    cells: RwLock<Cells>,
}

impl Default for FakeProcess {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeProcess {
    /// A valid process with a 1920x1080 surface and empty memory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            valid: AtomicBool::new(true),
            client: CLIENT_BASE,
            engine: ENGINE_BASE,
            surface: Mutex::new(SurfaceSize::new(1920, 1080)),
            cells: RwLock::new(Cells::default()),
        }
    }

    /// Marks the process handle usable or permanently lost.
    pub fn set_valid(&self, valid: bool) {
        self.valid.store(valid, Ordering::SeqCst);
    }

    /// Resizes the output surface.
    pub fn set_surface(&self, surface: SurfaceSize) {
        *self.surface.lock() = surface;
    }

    /// Writes one byte.
    pub fn write_u8(&self, address: Address, value: u8) {
        self.cells.write().bytes.insert(address.0, value);
    }

    /// Writes a boolean as one byte.
    pub fn write_bool(&self, address: Address, value: bool) {
        self.write_u8(address, u8::from(value));
    }

    /// Writes an `i32`.
    pub fn write_i32(&self, address: Address, value: i32) {
        self.cells.write().ints.insert(address.0, value);
    }

    /// Writes an `f32`.
    pub fn write_f32(&self, address: Address, value: f32) {
        self.cells.write().floats.insert(address.0, value);
    }

    /// Writes a pointer.
    pub fn write_address(&self, address: Address, value: Address) {
        self.cells.write().addresses.insert(address.0, value);
    }

    /// Writes three consecutive floats.
    pub fn write_vec3(&self, address: Address, value: Vec3) {
        let mut cells = self.cells.write();
        for (offset, component) in [0_u64, 4, 8].into_iter().zip(value.to_array()) {
            cells.floats.insert((address + offset).0, component);
        }
    }

    /// Writes a matrix in the game's row-major layout.
    pub fn write_matrix(&self, address: Address, value: Mat4) {
        let mut cells = self.cells.write();
        let rows = value.transpose().to_cols_array();
        for (offset, component) in (0_u64..).step_by(4).zip(rows) {
            cells.floats.insert((address + offset).0, component);
        }
    }

    /// Forgets a pointer, so reading it yields null.
    pub fn clear_address(&self, address: Address) {
        self.cells.write().addresses.remove(&address.0);
    }
}

impl ProcessMemory for FakeProcess {
    fn read_u8(&self, address: Address) -> u8 {
        self.cells.read().bytes.get(&address.0).copied().unwrap_or(0)
    }

    fn read_i32(&self, address: Address) -> i32 {
        self.cells.read().ints.get(&address.0).copied().unwrap_or(0)
    }

    fn read_f32(&self, address: Address) -> f32 {
        self.cells.read().floats.get(&address.0).copied().unwrap_or(0.0)
    }

    fn read_address(&self, address: Address) -> Address {
        self.cells
            .read()
            .addresses
            .get(&address.0)
            .copied()
            .unwrap_or(Address::NULL)
    }
}

impl GameProcess for FakeProcess {
    fn is_valid(&self) -> bool {
        self.valid.load(Ordering::SeqCst)
    }

    fn memory(&self) -> &dyn ProcessMemory {
        self
    }

    fn client_module(&self) -> Address {
        self.client
    }

    fn engine_module(&self) -> Address {
        self.engine
    }

    fn surface_size(&self) -> SurfaceSize {
        *self.surface.lock()
    }
}
