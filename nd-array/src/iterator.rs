use super::*;

/// An iterator over the slices of an array along its first axis.
pub struct RowIter<'a, T> {
    array: &'a NdArray<T>,
    current_index: usize,
}

impl<'a, T: Numeric> IntoIterator for &'a NdArray<T> {
    type Item = NdArray<T>;
    type IntoIter = RowIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}

impl<T: Numeric> Iterator for RowIter<'_, T> {
    type Item = NdArray<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.array.shape[0] {
            return None;
        }
        let row = self.array.row(self.current_index).ok();
        self.current_index += 1;
        row
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.array.shape[0].saturating_sub(self.current_index);
        (left, Some(left))
    }
}

impl<T: Numeric> NdArray<T> {
    /// Returns an iterator over read-through slices along the first axis.
    pub fn rows(&self) -> RowIter<'_, T> {
        RowIter {
            array: self,
            current_index: 0,
        }
    }

    /// Returns an iterator over the elements in row-major order.
    pub fn elements(&self) -> impl Iterator<Item = Result<T>> + '_ {
        (0..self.count).map(|i| self.get_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_of_broadcast_result() -> Result<()> {
        let column = NdArray::new(vec![0, 10, 20], &[3, 1])?.view();
        let array = (column + NdArray::<i32>::arange(2).view()).evaluate()?;

        let mut iter = array.rows();
        assert_eq!(iter.size_hint(), (3, Some(3)));
        assert_eq!(iter.next(), Some(NdArray::from(vec![0, 1])));
        assert_eq!(iter.size_hint(), (2, Some(2)));

        let rest: Vec<Vec<i32>> = iter.map(|row| row.to_vec()).collect::<Result<_>>()?;
        assert_eq!(rest, vec![vec![10, 11], vec![20, 21]]);
        Ok(())
    }

    #[test]
    fn iterates_rows_of_transposed_array() -> Result<()> {
        let array = NdArray::new((0..6).collect(), &[2, 3])?.view().t().evaluate()?;

        let rows: Vec<Vec<i32>> = (&array)
            .into_iter()
            .map(|row| row.to_vec())
            .collect::<Result<_>>()?;
        assert_eq!(rows, vec![vec![0, 3], vec![1, 4], vec![2, 5]]);
        Ok(())
    }

    #[test]
    fn elements_follow_logical_order() -> Result<()> {
        let array = NdArray::new(vec![1.5, 2.5, 3.5, 4.5], &[2, 2])?.view().t().evaluate()?;
        let values = array.elements().collect::<Result<Vec<_>>>()?;
        assert_eq!(values, vec![1.5, 3.5, 2.5, 4.5]);
        Ok(())
    }
}
