use super::BitMatrix;

/// Symbol grid with a per-cell reserved flag.
///
/// A cell is dark, light, or reserved. Reserved cells belong to function
/// patterns and are skipped by masking and by codeword placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    modules: BitMatrix,
    reserved: BitMatrix,
}

impl ModuleMatrix {
    /// All-light, nothing reserved
    pub fn new(size: usize) -> Self {
        Self {
            modules: BitMatrix::new(size, size),
            reserved: BitMatrix::new(size, size),
        }
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.modules.width()
    }

    /// Whether `(x, y)` is dark
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.modules.get(x, y)
    }

    /// Set a data cell
    pub fn set(&mut self, x: usize, y: usize, dark: bool) {
        self.modules.set(x, y, dark);
    }

    /// Set a cell and mark it reserved
    pub fn set_function(&mut self, x: usize, y: usize, dark: bool) {
        self.modules.set(x, y, dark);
        self.reserved.set(x, y, true);
    }

    /// Whether `(x, y)` belongs to a function pattern
    pub fn is_reserved(&self, x: usize, y: usize) -> bool {
        self.reserved.get(x, y)
    }

    /// Flip a cell
    pub fn toggle(&mut self, x: usize, y: usize) {
        self.modules.toggle(x, y);
    }

    /// The dark/light values without the reserved flags
    pub fn modules(&self) -> &BitMatrix {
        &self.modules
    }

    /// Row-major copy, `rows[y][x]`
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.modules.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_cells_are_reserved() {
        let mut matrix = ModuleMatrix::new(21);
        matrix.set_function(0, 0, true);
        matrix.set_function(1, 0, false);
        matrix.set(2, 0, true);

        assert!(matrix.is_reserved(0, 0));
        assert!(matrix.is_reserved(1, 0));
        assert!(!matrix.is_reserved(2, 0));
        assert_eq!(matrix.modules().count_ones(), 2);

        matrix.toggle(2, 0);
        assert!(!matrix.get(2, 0));
        assert_eq!(matrix.to_rows()[0][0], true);
    }
}
