//! Finite carriers, on which every law can be checked exhaustively.

use anyhow::{anyhow, Result};

use crate::path::*;

/// A type with finitely many values, listed in a fixed order.
pub trait Finite: Type {
    fn elements() -> Vec<Self>;

    /// The index of `self` within [`Finite::elements`].
    fn position(&self) -> usize;

    fn cardinality() -> usize {
        Self::elements().len()
    }
}

/// All elements of the fiber of `P` over `index`.
pub fn fiber_elements<I: Type, P: Family<I> + Finite>(index: &I) -> Vec<P> {
    P::elements()
        .into_iter()
        .filter(|u| &u.index() == index)
        .collect()
}

/// The empty type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Empty {}

impl Finite for Empty {
    fn elements() -> Vec<Self> {
        Vec::new()
    }

    fn position(&self) -> usize {
        match *self {}
    }
}

impl Finite for () {
    fn elements() -> Vec<Self> {
        vec![()]
    }

    fn position(&self) -> usize {
        0
    }
}

impl Finite for bool {
    fn elements() -> Vec<Self> {
        vec![false, true]
    }

    fn position(&self) -> usize {
        *self as usize
    }
}

/// The type `{0, ..., N-1}`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Fin<const N: usize>(usize);

impl<const N: usize> Fin<N> {
    pub fn new(value: usize) -> Result<Self> {
        if value < N {
            Ok(Fin(value))
        } else {
            Err(anyhow!("{value} is out of range for Fin<{N}>"))
        }
    }

    pub fn value(self) -> usize {
        self.0
    }
}

impl<const N: usize> Finite for Fin<N> {
    fn elements() -> Vec<Self> {
        (0..N).map(Fin).collect()
    }

    fn position(&self) -> usize {
        self.0
    }
}

impl<A: Finite> Finite for Option<A> {
    fn elements() -> Vec<Self> {
        let mut elements = vec![None];
        elements.extend(A::elements().into_iter().map(Some));
        elements
    }

    fn position(&self) -> usize {
        match self {
            None => 0,
            Some(a) => 1 + a.position(),
        }
    }
}

impl<A: Finite, B: Finite> Finite for (A, B) {
    fn elements() -> Vec<Self> {
        let right = B::elements();
        A::elements()
            .into_iter()
            .flat_map(|a| right.iter().map(move |b| (a.clone(), b.clone())))
            .collect()
    }

    fn position(&self) -> usize {
        self.0.position() * B::cardinality() + self.1.position()
    }
}

/// The total space of paths in `T`, i.e. all paths regardless of their endpoints.
impl<T: Finite> Finite for Path<T> {
    fn elements() -> Vec<Self> {
        T::elements().into_iter().map(Path::refl).collect()
    }

    fn position(&self) -> usize {
        self.start().position()
    }
}

impl<I: Finite, B: Finite> Finite for Fiber<I, B> {
    fn elements() -> Vec<Self> {
        <(I, B)>::elements()
            .into_iter()
            .map(|(index, value)| Fiber { index, value })
            .collect()
    }

    fn position(&self) -> usize {
        self.index.position() * B::cardinality() + self.value.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_positions<T: Finite>() {
        for (idx, element) in T::elements().iter().enumerate() {
            assert_eq!(element.position(), idx, "position of «{element:?}»");
        }
    }

    #[test]
    fn test_positions() {
        check_positions::<Empty>();
        check_positions::<()>();
        check_positions::<bool>();
        check_positions::<Fin<3>>();
        check_positions::<Option<bool>>();
        check_positions::<(bool, Fin<3>)>();
        check_positions::<(Empty, bool)>();
        check_positions::<Path<Fin<2>>>();
        check_positions::<Fiber<bool, Option<()>>>();
    }

    #[test]
    fn test_cardinalities() {
        assert_eq!(Empty::cardinality(), 0);
        assert_eq!(<(bool, Fin<3>)>::cardinality(), 6);
        assert_eq!(<(Empty, bool)>::cardinality(), 0);
        assert_eq!(<Option<(bool, ())>>::cardinality(), 3);
    }

    #[test]
    fn test_fin_range() -> Result<()> {
        assert_eq!(Fin::<2>::new(1)?.value(), 1);
        assert!(Fin::<2>::new(2).is_err());
        Ok(())
    }

    #[test]
    fn test_fiber_elements() {
        let fiber: Vec<Fiber<bool, Fin<3>>> = fiber_elements(&true);
        assert_eq!(fiber.len(), 3);
        assert!(fiber.iter().all(|u| u.index));
    }
}
