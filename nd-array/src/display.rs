use super::*;
use std::fmt;

/// Prints nested brackets, one innermost row per line, values right-aligned to a common width.
/// Blocks of higher axes are separated by blank lines. The formatter precision applies to every
/// value, so `{:.3}` prints floats with three decimals.
impl<T: Numeric> fmt::Display for NdArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = match self.to_vec() {
            Ok(values) => values,
            Err(err) => return write!(f, "{err}"),
        };

        if values.is_empty() {
            return f.write_str("[]");
        }

        let cells: Vec<String> = values
            .iter()
            .map(|v| match f.precision() {
                Some(precision) => format!("{v:.precision$}"),
                None => format!("{v}"),
            })
            .collect();
        let width = cells.iter().map(String::len).max().unwrap_or_default();

        write_block(f, &self.shape, &cells, width, 0, 0)
    }
}

fn write_block(
    f: &mut fmt::Formatter<'_>,
    shape: &[usize],
    cells: &[String],
    width: usize,
    depth: usize,
    offset: usize,
) -> fmt::Result {
    let rank = shape.len();
    f.write_str("[")?;

    if depth + 1 == rank {
        for i in 0..shape[depth] {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:>width$}", cells[offset + i])?;
        }
    } else {
        let block = shape::count_of(&shape[depth + 1..]);
        for i in 0..shape[depth] {
            if i > 0 {
                f.write_str(&"\n".repeat(rank - 1 - depth))?;
                f.write_str(&" ".repeat(depth + 1))?;
            }
            write_block(f, shape, cells, width, depth + 1, offset + i * block)?;
        }
    }

    f.write_str("]")
}

impl<T: Numeric> fmt::Display for NdView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.evaluate() {
            Ok(array) => fmt::Display::fmt(&array, f),
            Err(err) => write!(f, "{err}"),
        }
    }
}
