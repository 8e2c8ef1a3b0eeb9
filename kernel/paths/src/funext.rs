//! Dependent functions on finite domains, and the universal property of pairs.
//!
//! A function `(a : A) → P a` is stored as its table of values, one per element of `A` in the
//! order of [`Finite::elements`]. Two such functions are equal as Rust values exactly when they
//! agree pointwise, which is what makes [`Funext`] sound in this model.

use std::{marker::PhantomData, rc::Rc};

use anyhow::{anyhow, Result};

use crate::{equiv::*, finite::*, path::*};

/// Function extensionality, as a value that must be passed to every operation relying on it.
#[derive(Clone, Copy, Debug)]
pub struct Funext(());

impl Funext {
    pub fn assume() -> Self {
        Funext(())
    }

    /// From a pointwise homotopy `h a : f a = g a`, obtains `f = g`.
    ///
    /// # Panics
    ///
    /// Panics if some `h a` does not have the stated endpoints.
    pub fn path_forall<A: Finite, F: Family<A>>(
        &self,
        f: &Pi<A, F>,
        g: &Pi<A, F>,
        h: impl Fn(A) -> Path<F>,
    ) -> Path<Pi<A, F>> {
        for a in A::elements() {
            h(a.clone()).assert_type(&f.apply(&a), &g.apply(&a));
        }
        assert_same(f, g);
        Path::refl(f.clone())
    }

    /// [`Funext::path_forall`] for curried functions of two arguments.
    pub fn path_forall2<A: Finite, B: Finite, F: Family<(A, B)>>(
        &self,
        f: &Pi2<A, B, F>,
        g: &Pi2<A, B, F>,
        h: impl Fn(A, B) -> Path<F>,
    ) -> Path<Pi2<A, B, F>> {
        for a in A::elements() {
            for b in B::elements() {
                h(a.clone(), b.clone()).assert_type(&f.apply(&a, &b), &g.apply(&a, &b));
            }
        }
        assert_same(f, g);
        Path::refl(f.clone())
    }
}

/// A dependent function `(a : A) → F a`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Pi<A, F> {
    values: Vec<F>,
    phantom: PhantomData<A>,
}

impl<A: Finite, F: Family<A>> Pi<A, F> {
    /// Tabulates `f`, failing if some `f a` does not lie in the fiber over `a`.
    pub fn tabulate(f: impl Fn(A) -> F) -> Result<Self> {
        let values = A::elements()
            .into_iter()
            .map(|a| {
                let u = f(a.clone());
                if u.index() == a {
                    Ok(u)
                } else {
                    Err(anyhow!("value «{u:?}» does not lie over «{a:?}»"))
                }
            })
            .collect::<Result<Vec<F>>>()?;
        Ok(Pi {
            values,
            phantom: PhantomData,
        })
    }

    /// Like [`Pi::tabulate`], but for functions that are known to respect the fibers.
    fn build(f: impl Fn(A) -> F) -> Self {
        let values = A::elements()
            .into_iter()
            .map(|a| {
                let u = f(a.clone());
                assert_same(&u.index(), &a);
                u
            })
            .collect();
        Pi {
            values,
            phantom: PhantomData,
        }
    }

    pub fn apply(&self, a: &A) -> F {
        self.values[a.position()].clone()
    }
}

/// All dependent functions, ordered lexicographically by their tables.
impl<A: Finite, F: Family<A> + Finite> Finite for Pi<A, F> {
    fn elements() -> Vec<Self> {
        let mut tables: Vec<Vec<F>> = vec![Vec::new()];
        for a in A::elements() {
            let fiber: Vec<F> = fiber_elements(&a);
            tables = tables
                .into_iter()
                .flat_map(|table| {
                    fiber.iter().map(move |u| {
                        let mut table = table.clone();
                        table.push(u.clone());
                        table
                    })
                })
                .collect();
        }
        tables
            .into_iter()
            .map(|values| Pi {
                values,
                phantom: PhantomData,
            })
            .collect()
    }

    fn position(&self) -> usize {
        A::elements()
            .iter()
            .zip(&self.values)
            .fold(0, |position, (a, u)| {
                let fiber: Vec<F> = fiber_elements(a);
                let offset = fiber.iter().take_while(|v| *v != u).count();
                position * fiber.len() + offset
            })
    }
}

/// A curried dependent function `(a : A) → (b : B) → F (a, b)`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Pi2<A, B, F> {
    rows: Vec<Vec<F>>,
    phantom: PhantomData<(A, B)>,
}

impl<A: Finite, B: Finite, F: Family<(A, B)>> Pi2<A, B, F> {
    pub fn tabulate(f: impl Fn(A, B) -> F) -> Result<Self> {
        let rows = A::elements()
            .into_iter()
            .map(|a| {
                B::elements()
                    .into_iter()
                    .map(|b| {
                        let u = f(a.clone(), b.clone());
                        if u.index() == (a.clone(), b.clone()) {
                            Ok(u)
                        } else {
                            Err(anyhow!("value «{u:?}» does not lie over «{a:?}», «{b:?}»"))
                        }
                    })
                    .collect::<Result<Vec<F>>>()
            })
            .collect::<Result<Vec<Vec<F>>>>()?;
        Ok(Pi2 {
            rows,
            phantom: PhantomData,
        })
    }

    fn build(f: impl Fn(A, B) -> F) -> Self {
        let rows = A::elements()
            .into_iter()
            .map(|a| {
                B::elements()
                    .into_iter()
                    .map(|b| {
                        let u = f(a.clone(), b.clone());
                        assert_same(&u.index(), &(a.clone(), b));
                        u
                    })
                    .collect()
            })
            .collect();
        Pi2 {
            rows,
            phantom: PhantomData,
        }
    }

    pub fn apply(&self, a: &A, b: &B) -> F {
        self.rows[a.position()][b.position()].clone()
    }
}

impl<A: Finite, B: Finite, F: Family<(A, B)> + Finite> Finite for Pi2<A, B, F> {
    fn elements() -> Vec<Self> {
        Pi::<(A, B), F>::elements()
            .iter()
            .map(prod_uncurry)
            .collect()
    }

    fn position(&self) -> usize {
        prod_rect(self).position()
    }
}

/// Dependent elimination out of a pair type: `prod_rect g (a, b) = g a b`.
pub fn prod_rect<A: Finite, B: Finite, F: Family<(A, B)>>(g: &Pi2<A, B, F>) -> Pi<(A, B), F> {
    Pi::build(|(a, b): (A, B)| g.apply(&a, &b))
}

/// The inverse of [`prod_rect`].
pub fn prod_uncurry<A: Finite, B: Finite, F: Family<(A, B)>>(h: &Pi<(A, B), F>) -> Pi2<A, B, F> {
    Pi2::build(|a: A, b: B| h.apply(&(a, b)))
}

/// [`prod_rect`] is an equivalence. Both round trips hold pointwise by reflexivity, so they are
/// turned into paths by function extensionality.
pub fn isequiv_prod_rect<A: Finite, B: Finite, F: Family<(A, B)>>(
    funext: Funext,
) -> IsEquiv<Pi2<A, B, F>, Pi<(A, B), F>> {
    let fun: Fun<Pi2<A, B, F>, Pi<(A, B), F>> = Rc::new(|g: Pi2<A, B, F>| prod_rect(&g));
    IsEquiv::adjointify(
        &fun,
        |h: Pi<(A, B), F>| prod_uncurry(&h),
        move |h: Pi<(A, B), F>| {
            funext.path_forall(&prod_rect(&prod_uncurry(&h)), &h, |z: (A, B)| {
                Path::refl(h.apply(&z))
            })
        },
        move |g: Pi2<A, B, F>| {
            funext.path_forall2(&prod_uncurry(&prod_rect(&g)), &g, |a: A, b: B| {
                Path::refl(g.apply(&a, &b))
            })
        },
    )
}

pub fn equiv_prod_rect<A: Finite, B: Finite, F: Family<(A, B)>>(
    funext: Funext,
) -> Equiv<Pi2<A, B, F>, Pi<(A, B), F>> {
    Equiv::from_parts(Rc::new(|g: Pi2<A, B, F>| prod_rect(&g)), isequiv_prod_rect(funext))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The family over `Fin<3> × bool` whose fiber over `(n, _)` is `{0, ..., n}`.
    #[derive(Clone, PartialEq, Eq, Debug)]
    struct Bounded {
        index: (Fin<3>, bool),
        value: Fin<3>,
    }

    impl Family<(Fin<3>, bool)> for Bounded {
        fn index(&self) -> (Fin<3>, bool) {
            self.index
        }
    }

    impl Finite for Bounded {
        fn elements() -> Vec<Self> {
            <(Fin<3>, bool)>::elements()
                .into_iter()
                .flat_map(|index| {
                    Fin::<3>::elements()
                        .into_iter()
                        .filter(move |value| value.value() <= index.0.value())
                        .map(move |value| Bounded { index, value })
                })
                .collect()
        }

        /// The fibers over `(m, false)` and `(m, true)` for `m < n` hold `2 (m + 1)` values in
        /// total, i.e. `n (n + 1)` for all of them.
        fn position(&self) -> usize {
            let (n, b) = self.index;
            let fiber_size = n.value() + 1;
            n.value() * fiber_size + b.position() * fiber_size + self.value.value()
        }
    }

    type Const = Fiber<(bool, Fin<2>), bool>;

    #[test]
    fn test_tabulate() -> Result<()> {
        let f = Pi::<bool, Fiber<bool, Fin<2>>>::tabulate(|a| {
            Fiber::new(a, Fin::<2>::elements()[a as usize])
        })?;
        assert_eq!(f.apply(&true).value.value(), 1);
        assert!(Pi::<bool, Fiber<bool, ()>>::tabulate(|_| Fiber::new(true, ())).is_err());
        assert!(Pi2::<bool, Fin<2>, Const>::tabulate(|a, b| Fiber::new((!a, b), a)).is_err());
        Ok(())
    }

    #[test]
    fn test_enumeration() {
        assert_eq!(Pi::<bool, Fiber<bool, Fin<3>>>::cardinality(), 9);
        assert_eq!(Pi::<bool, Fiber<bool, Empty>>::cardinality(), 0);
        assert_eq!(Pi::<Empty, Fiber<Empty, bool>>::cardinality(), 1);
        assert_eq!(Pi2::<Fin<3>, bool, Bounded>::cardinality(), 36);
        for (idx, u) in Bounded::elements().iter().enumerate() {
            assert_eq!(u.position(), idx);
        }
        for (idx, f) in Pi::<(Fin<3>, bool), Bounded>::elements().iter().enumerate() {
            assert_eq!(f.position(), idx);
        }
        for (idx, g) in Pi2::<bool, Fin<2>, Const>::elements().iter().enumerate() {
            assert_eq!(g.position(), idx);
        }
    }

    #[test]
    fn test_path_forall() -> Result<()> {
        let funext = Funext::assume();
        for f in Pi::<bool, Fiber<bool, Fin<2>>>::elements() {
            funext
                .path_forall(&f, &f, |a| Path::refl(f.apply(&a)))
                .check(&f, &f)?;
        }
        Ok(())
    }

    #[test]
    #[should_panic]
    fn test_path_forall_not_homotopic() {
        let functions = Pi::<bool, Fiber<bool, bool>>::elements();
        let (f, g) = (&functions[0], &functions[1]);
        Funext::assume().path_forall(f, g, |a| Path::refl(f.apply(&a)));
    }

    #[test]
    fn test_prod_rect() -> Result<()> {
        let g = Pi2::<bool, Fin<2>, Const>::tabulate(|a, b| Fiber::new((a, b), a && b.value() == 1))?;
        let h = prod_rect(&g);
        for (a, b) in <(bool, Fin<2>)>::elements() {
            assert_eq!(h.apply(&(a, b)), g.apply(&a, &b));
        }
        assert_eq!(prod_uncurry(&h), g);
        Ok(())
    }

    #[test]
    fn test_equiv_prod_rect() -> Result<()> {
        let funext = Funext::assume();
        equiv_prod_rect::<bool, Fin<2>, Const>(funext).check_finite()?;
        equiv_prod_rect::<Fin<3>, bool, Bounded>(funext).check_finite()?;
        equiv_prod_rect::<Empty, bool, Fiber<(Empty, bool), bool>>(funext).check_finite()
    }
}
