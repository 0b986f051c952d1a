/// A parsed heightmap: `rows` x `columns` unsigned 16-bit height samples.
#[derive(Debug, PartialEq)]
pub struct HeightGrid {
    columns: usize,
    rows: usize,
    /// declared maximum sample value from the header, not enforced against `data`
    max_value: u16,
    /// row-major samples, `data[column + row * columns]`
    data: Vec<u16>,
}

impl HeightGrid {
    pub fn new(columns: usize, rows: usize, max_value: u16, data: Vec<u16>) -> Self {
        debug_assert_eq!(columns * rows, data.len());

        HeightGrid {
            columns,
            rows,
            max_value,
            data,
        }
    }

    /// `(columns, rows)`, i.e. `(width, height)` of the resulting image.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    pub fn sample(&self, column: usize, row: usize) -> u16 {
        self.data[column + row * self.columns]
    }

    pub fn row(&self, row: usize) -> &[u16] {
        let start = row * self.columns;
        &self.data[start..start + self.columns]
    }

    #[cfg(test)]
    pub fn get_max_value(&self) -> u16 {
        self.max_value
    }
}
