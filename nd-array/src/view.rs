use super::*;
use log::trace;

/// A lazy, composable array computation.
///
/// A view is a deferred function producing an [`NdArray`]. Every transformation wraps the
/// parent's function into a new one, so nothing is computed until the view is evaluated.
/// Evaluation is not cached: evaluating twice recomputes the whole chain.
pub struct NdView<T> {
    eval: Rc<dyn Fn() -> Result<NdArray<T>>>,
}

impl<T> Clone for NdView<T> {
    fn clone(&self) -> Self {
        Self {
            eval: self.eval.clone(),
        }
    }
}

impl<T: Numeric> NdView<T> {
    /// Creates a view from an evaluation function.
    pub fn new(eval: impl Fn() -> Result<NdArray<T>> + 'static) -> Self {
        Self { eval: Rc::new(eval) }
    }

    /// Runs the chain and returns its (possibly derived) result.
    pub fn evaluate(&self) -> Result<NdArray<T>> {
        (self.eval)()
    }

    /// Evaluates into an owning array, reusing storage the chain already owns.
    pub fn materialize(&self) -> Result<NdArray<T>> {
        self.evaluate()?.to_owning()
    }

    /// Evaluates into an owning array with fresh storage.
    pub fn copy(&self) -> Result<NdArray<T>> {
        self.evaluate()?.copy()
    }

    pub fn shape(&self) -> Result<Shape> {
        Ok(self.evaluate()?.shape.clone())
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.evaluate()?.to_vec()
    }

    /// Reshapes the view; one axis of `target` may be `-1` and is inferred.
    pub fn reshape(&self, target: &[isize]) -> NdView<T> {
        let parent = self.clone();
        let target: SmallVec<isize, INLINE_RANK> = target.iter().copied().collect();

        NdView::new(move || {
            let src = parent.evaluate()?;
            let shape = shape::prepare_reshape(&src.shape, &target)?;
            trace!("reshape {:?} -> {:?}", src.shape, shape);

            Ok(NdArray::derived(shape, move |i| src.get_at(i)))
        })
    }

    /// Permutes the axes; an empty permutation reverses them.
    pub fn transpose(&self, perm: &[usize]) -> NdView<T> {
        let parent = self.clone();
        let perm: Shape = Shape::from(perm);

        NdView::new(move || {
            let src = parent.evaluate()?;
            let perm = if perm.is_empty() {
                shape::prepare_transpose(src.rank())
            } else {
                shape::validate_permutation(&perm, src.rank())?;
                perm.clone()
            };

            let shape = shape::permute(&src.shape, &perm);
            let strides = shape::permute(&shape::strides_of(&src.shape), &perm);
            trace!("transpose {:?} by {:?} -> {:?}", src.shape, perm, shape);

            let (target, mapping) = (shape.clone(), strides.clone());
            Ok(NdArray::derived_with_strides(shape, strides, move |i| {
                src.get_at(shape::remap_offset(i, &target, &mapping))
            }))
        })
    }

    /// Reverses the axes.
    pub fn t(&self) -> NdView<T> {
        self.transpose(&[])
    }

    /// Applies `f` to every element.
    pub fn map<U: Numeric>(&self, f: impl Fn(T) -> U + 'static) -> NdView<U> {
        self.try_map(move |x| Ok(f(x)))
    }

    /// Applies a fallible `f` to every element; the first failure aborts the evaluation.
    pub fn try_map<U: Numeric>(&self, f: impl Fn(T) -> Result<U> + 'static) -> NdView<U> {
        let parent = self.clone();
        let f = Rc::new(f);

        NdView::new(move || {
            let src = parent.evaluate()?;
            trace!("map {:?}", src.shape);

            let f = f.clone();
            Ok(NdArray::derived(src.shape.clone(), move |i| f(src.get_at(i)?)))
        })
    }

    /// Combines two views elementwise after broadcasting their shapes.
    pub fn zip<U: Numeric, V: Numeric>(
        &self,
        other: &NdView<U>,
        f: impl Fn(T, U) -> V + 'static,
    ) -> NdView<V> {
        self.try_zip(other, move |a, b| Ok(f(a, b)))
    }

    /// Fallible version of [`NdView::zip`].
    pub fn try_zip<U: Numeric, V: Numeric>(
        &self,
        other: &NdView<U>,
        f: impl Fn(T, U) -> Result<V> + 'static,
    ) -> NdView<V> {
        let (left, right) = (self.clone(), other.clone());
        let f = Rc::new(f);

        NdView::new(move || {
            let (a, b) = (left.evaluate()?, right.evaluate()?);
            let shape = shape::broadcast_shapes(&a.shape, &b.shape)?;
            trace!("zip {:?} with {:?} -> {:?}", a.shape, b.shape, shape);

            let (a_strides, b_strides) = (shape::strides_of(&a.shape), shape::strides_of(&b.shape));
            let target = shape.clone();
            let f = f.clone();

            Ok(NdArray::derived(shape, move |i| {
                let x = a.get_at(shape::broadcast_offset(i, &target, &a.shape, &a_strides))?;
                let y = b.get_at(shape::broadcast_offset(i, &target, &b.shape, &b_strides))?;
                f(x, y)
            }))
        })
    }
}

impl<T: Numeric> From<NdArray<T>> for NdView<T> {
    fn from(array: NdArray<T>) -> Self {
        array.view()
    }
}
