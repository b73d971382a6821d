use crate::error::{Direction, EngineError};

/// Number of cells on the tape.
pub const TAPE_LEN: usize = 30000;

/// The engine's memory: a fixed run of zeroed byte cells and one pointer
/// into it.
///
/// Cell arithmetic wraps modulo 256. The pointer does not: moving it past
/// either end is an error, and the pointer stays where it was.
pub struct Tape {
    cells: Box<[u8; TAPE_LEN]>,
    pointer: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    pub fn new() -> Self {
        Self {
            cells: Box::new([0u8; TAPE_LEN]),
            pointer: 0,
        }
    }

    #[inline(always)]
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Read-only view of every cell.
    pub fn cells(&self) -> &[u8] {
        &self.cells[..]
    }

    #[inline(always)]
    pub fn advance(&mut self) -> Result<(), EngineError> {
        if self.pointer + 1 >= TAPE_LEN {
            return Err(EngineError::PointerOutOfRange {
                pointer: self.pointer,
                direction: Direction::Right,
            });
        }
        self.pointer += 1;
        Ok(())
    }

    #[inline(always)]
    pub fn retreat(&mut self) -> Result<(), EngineError> {
        if self.pointer == 0 {
            return Err(EngineError::PointerOutOfRange {
                pointer: self.pointer,
                direction: Direction::Left,
            });
        }
        self.pointer -= 1;
        Ok(())
    }

    #[inline(always)]
    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add(1);
    }

    #[inline(always)]
    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub(1);
    }

    #[inline(always)]
    pub fn get(&self) -> u8 {
        self.cells[self.pointer]
    }

    #[inline(always)]
    pub fn set(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }
}
