use super::*;

impl<T: Numeric> NdArray<T> {
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// Returns true if the array has storage of its own.
    pub fn is_owning(&self) -> bool {
        !matches!(self.source, Source::Derived(_))
    }

    /// Reads the element at a row-major flat offset.
    pub fn get_at(&self, offset: usize) -> Result<T> {
        if offset >= self.count {
            return Err(ArrayError::IndexOutOfBounds(format!(
                "Offset {offset} out of bounds for {} elements",
                self.count
            )));
        }

        match &self.source {
            Source::Owned(data) => Ok(data[offset]),
            Source::Filled(value) => Ok(*value),
            Source::Derived(accessor) => accessor(offset),
        }
    }

    /// Writes the element at a row-major flat offset.
    ///
    /// Storage shared with other arrays is copied first; derived arrays cannot be written.
    pub fn set_at(&mut self, offset: usize, value: T) -> Result<()> {
        if offset >= self.count {
            return Err(ArrayError::IndexOutOfBounds(format!(
                "Offset {offset} out of bounds for {} elements",
                self.count
            )));
        }

        if let Source::Filled(fill) = self.source {
            self.source = Source::Owned(Rc::new(vec![fill; self.count]));
        }

        match &mut self.source {
            Source::Owned(data) => {
                Rc::make_mut(data)[offset] = value;
                Ok(())
            }
            _ => Err(ArrayError::UnsupportedOperation(
                "Cannot write into a derived array, copy it first".to_string(),
            )),
        }
    }

    /// Reads the element at a multi-index.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        self.get_at(self.offset_of(indices)?)
    }

    /// Writes the element at a multi-index.
    pub fn set(&mut self, indices: &[usize], value: T) -> Result<()> {
        let offset = self.offset_of(indices)?;
        self.set_at(offset, value)
    }

    /// Collects the elements in row-major order.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        match &self.source {
            Source::Owned(data) => Ok(data.as_ref().clone()),
            Source::Filled(value) => Ok(vec![*value; self.count]),
            Source::Derived(_) => (0..self.count).map(|i| self.get_at(i)).collect(),
        }
    }

    /// Returns a read-through array of the `k`-th slice along the first axis.
    pub fn row(&self, k: usize) -> Result<NdArray<T>> {
        if k >= self.shape[0] {
            return Err(ArrayError::IndexOutOfBounds(format!(
                "Row {k} out of bounds for dimension 0 with size {}",
                self.shape[0]
            )));
        }

        let shape = shape::normalize(&self.shape[1..]);
        let start = k * shape::count_of(&self.shape[1..]);
        let parent = self.clone();

        Ok(NdArray::derived(shape, move |i| parent.get_at(start + i)))
    }

    /// Returns an owning array, sharing the storage when this array already has one.
    pub fn to_owning(&self) -> Result<NdArray<T>> {
        if self.is_owning() {
            return Ok(self.clone());
        }
        self.copy()
    }

    /// Returns an owning array with fresh storage laid out row-major.
    pub fn copy(&self) -> Result<NdArray<T>> {
        Ok(NdArray::owned(self.shape.clone(), self.to_vec()?))
    }

    /// Wraps the array into a lazy view.
    pub fn view(&self) -> NdView<T> {
        let array = self.clone();
        NdView::new(move || Ok(array.clone()))
    }

    fn offset_of(&self, indices: &[usize]) -> Result<usize> {
        shape::flat_offset_of(indices, &self.shape, &shape::strides_of(&self.shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_get_and_set_elements() -> Result<()> {
        let mut array = NdArray::<i32>::arange(6).view().reshape(&[2, 3]).copy()?;
        assert_eq!(array.get(&[1, 2])?, 5);

        array.set(&[0, 1], 10)?;
        assert_eq!(array.to_vec()?, vec![0, 10, 2, 3, 4, 5]);

        assert!(matches!(
            array.get(&[2, 0]),
            Err(ArrayError::IndexOutOfBounds(_))
        ));
        assert!(matches!(
            array.set_at(6, 1),
            Err(ArrayError::IndexOutOfBounds(_))
        ));
        Ok(())
    }

    #[test]
    fn writes_do_not_leak_into_clones() -> Result<()> {
        let original = NdArray::from(vec![1.0, 2.0, 3.0]);
        let mut edited = original.clone();
        edited.set_at(0, 9.0)?;

        assert_eq!(original.to_vec()?, vec![1.0, 2.0, 3.0]);
        assert_eq!(edited.to_vec()?, vec![9.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn filled_array_becomes_dense_on_write() -> Result<()> {
        let mut array = NdArray::<i32>::zeros(&[2, 2]);
        array.set(&[1, 1], 4)?;
        assert_eq!(array.to_vec()?, vec![0, 0, 0, 4]);
        assert!(array.is_owning());
        Ok(())
    }

    #[test]
    fn derived_arrays_reject_writes() -> Result<()> {
        let mut derived = NdArray::<f64>::ones(&[2, 2]).view().t().evaluate()?;
        assert!(!derived.is_owning());
        assert!(matches!(
            derived.set_at(0, 2.0),
            Err(ArrayError::UnsupportedOperation(_))
        ));

        let mut copied = derived.copy()?;
        copied.set_at(0, 2.0)?;
        assert_eq!(copied.get(&[0, 0])?, 2.0);
        Ok(())
    }

    #[test]
    fn rows_read_through_parent() -> Result<()> {
        let array = NdArray::new((0..12).collect(), &[3, 2, 2])?;
        let row = array.row(1)?;
        assert_eq!(row.shape(), &[2, 2]);
        assert_eq!(row.to_vec()?, vec![4, 5, 6, 7]);
        assert!(!row.is_owning());

        let flat = NdArray::from(vec![3, 4, 5]);
        assert_eq!(flat.row(2)?.to_vec()?, vec![5]);
        assert!(flat.row(3).is_err());
        Ok(())
    }
}
