//! Sparse cell grid addressed by absolute zero-based (row, column).

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.trim()),
            Self::Number(_) => None,
        }
    }

    /// Non-negative integer value, from a whole number or integer text.
    pub fn as_score(&self) -> Option<u32> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
            Some(value as u32)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    cells: HashMap<(u32, u32), Cell>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, row: u32, col: u32, cell: Cell) {
        self.cells.insert((row, col), cell);
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn text(&self, row: u32, col: u32) -> Option<&str> {
        self.get(row, col).and_then(Cell::as_text)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_score() {
        assert_eq!(Cell::Number(2.0).as_score(), Some(2));
        assert_eq!(Cell::Number(1.5).as_score(), None);
        assert_eq!(Cell::Number(-1.0).as_score(), None);
        assert_eq!(Cell::Text(" 1 ".into()).as_score(), Some(1));
        assert_eq!(Cell::Text("2.0".into()).as_score(), Some(2));
        assert_eq!(Cell::Text("n/a".into()).as_score(), None);
    }

    #[test]
    fn test_text_trimmed() {
        let mut sheet = Sheet::new();
        sheet.set(4, 1, Cell::Text(" Left ".into()));
        sheet.set(4, 2, Cell::Number(3.0));
        assert_eq!(sheet.text(4, 1), Some("Left"));
        assert_eq!(sheet.text(4, 2), None);
        assert_eq!(sheet.text(0, 0), None);
        assert_eq!(sheet.len(), 2);
    }
}
