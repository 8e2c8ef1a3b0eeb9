//! Truncation levels, numbered from 0: a type has level 0 if it is contractible, and level `n+1` if
//! all its path spaces have level `n`. Propositions have level 1 and sets have level 2.
//!
//! A witness for level `n+1` must provide witnesses for path spaces, path spaces of path spaces,
//! and so on. To avoid a different Rust type at each dimension, all of these spaces are made of
//! [`Cell`]s over the same base type.

use std::rc::Rc;

use anyhow::{anyhow, Result};
use log::debug;
use smallvec::{smallvec, SmallVec};

use slate_kernel_util::anyhow::*;

use crate::{equiv::*, finite::*, path::*};

/// An element of an iterated identity type of `T`. A cell of dimension 1 corresponds to a
/// [`Path<T>`], a cell of dimension 2 to a `Path<Path<T>>`, etc.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Cell<T> {
    Point(T),
    Refl(Box<Cell<T>>),
}

impl<T: Type> Cell<T> {
    pub fn dim(&self) -> usize {
        match self {
            Cell::Point(_) => 0,
            Cell::Refl(x) => x.dim() + 1,
        }
    }

    pub fn refl(self) -> Self {
        Cell::Refl(Box::new(self))
    }

    pub fn from_path(p: &Path<T>) -> Self {
        match p {
            Path::Refl(x) => Cell::Point(x.clone()).refl(),
        }
    }

    /// Start and end of a cell of positive dimension.
    pub fn boundary(&self) -> Option<(&Cell<T>, &Cell<T>)> {
        match self {
            Cell::Point(_) => None,
            Cell::Refl(x) => Some((x, x)),
        }
    }

    /// All points of `T`.
    pub fn space() -> Vec<Self>
    where
        T: Finite,
    {
        T::elements().into_iter().map(Cell::Point).collect()
    }

    /// All cells `x = y`.
    pub fn paths(x: &Cell<T>, y: &Cell<T>) -> SmallVec<[Cell<T>; 1]> {
        if x == y {
            smallvec![x.clone().refl()]
        } else {
            SmallVec::new()
        }
    }

    pub fn between(x: &Cell<T>, y: &Cell<T>) -> Result<Self> {
        Self::paths(x, y)
            .pop()
            .ok_or_else(|| anyhow!("no path between «{x:?}» and «{y:?}»"))
    }

    pub fn inverse(&self) -> Result<Self> {
        match self {
            Cell::Point(_) => Err(anyhow!("«{self:?}» is not a path")),
            Cell::Refl(x) => Ok(Cell::Refl(x.clone())),
        }
    }

    pub fn concat(&self, other: &Cell<T>) -> Result<Self> {
        match (self.boundary(), other.boundary()) {
            (Some((start, middle)), Some((middle2, end))) if middle == middle2 => {
                Cell::between(start, end)
            }
            _ => Err(anyhow!("cannot concatenate «{self:?}» and «{other:?}»")),
        }
    }

    /// Applies a function at every dimension, i.e. `f` on points and `ap f` on paths.
    pub fn map<U: Type, F: Fn(T) -> U + ?Sized>(&self, f: &F) -> Cell<U> {
        match self {
            Cell::Point(x) => Cell::Point(f(x.clone())),
            Cell::Refl(x) => x.map(f).refl(),
        }
    }
}

impl<A: Type, B: Type> Cell<(A, B)> {
    /// Combines two cells of the same dimension, generalizing `path_prod` to every dimension.
    pub fn pair(x: &Cell<A>, y: &Cell<B>) -> Result<Self> {
        match (x, y) {
            (Cell::Point(a), Cell::Point(b)) => Ok(Cell::Point((a.clone(), b.clone()))),
            (Cell::Refl(x), Cell::Refl(y)) => Ok(Self::pair(x, y)?.refl()),
            _ => Err(anyhow!(
                "cells «{x:?}» and «{y:?}» have different dimensions"
            )),
        }
    }

    pub fn unpair(&self) -> (Cell<A>, Cell<B>) {
        (self.map(&|z: (A, B)| z.0), self.map(&|z: (A, B)| z.1))
    }
}

type Contraction<T> = Rc<dyn Fn(&Cell<T>) -> Result<Cell<T>>>;

/// A contractibility witness: a center together with a path from it to every cell.
pub struct Contr<T> {
    center: Cell<T>,
    contr: Contraction<T>,
}

impl<T: Clone> Clone for Contr<T> {
    fn clone(&self) -> Self {
        Contr {
            center: self.center.clone(),
            contr: self.contr.clone(),
        }
    }
}

impl<T: Type> Contr<T> {
    pub fn new(center: Cell<T>, contr: impl Fn(&Cell<T>) -> Result<Cell<T>> + 'static) -> Self {
        Contr {
            center,
            contr: Rc::new(contr),
        }
    }

    /// Claims that `center` is the only cell.
    pub fn singleton(center: Cell<T>) -> Self {
        let c = center.clone();
        Contr::new(center, move |x| Cell::between(&c, x))
    }

    pub fn center(&self) -> &Cell<T> {
        &self.center
    }

    pub fn contract(&self, x: &Cell<T>) -> Result<Cell<T>> {
        (self.contr)(x)
    }

    pub fn verify(&self, space: &[Cell<T>]) -> Result<()> {
        if !space.contains(&self.center) {
            return Err(anyhow!("center «{:?}» is not in the space", self.center));
        }
        for x in space {
            let p = self
                .contract(x)
                .with_prefix(|| format!("cannot contract «{x:?}»"))?;
            if p.boundary() != Some((&self.center, x)) {
                return Err(anyhow!(
                    "«{p:?}» is not a path from «{:?}» to «{x:?}»",
                    self.center
                ));
            }
        }
        Ok(())
    }
}

type PathsWitness<T> = Rc<dyn Fn(&Cell<T>, &Cell<T>) -> Result<IsHLevel<T>>>;

/// A witness that a space of cells has some truncation level.
///
/// The level itself is not stored; it is given when verifying or combining witnesses. A
/// contractibility witness is accepted at every level.
pub enum IsHLevel<T> {
    Contr(Contr<T>),

    /// For every two cells `x`, `y`, a witness for the space `x = y` at the level below.
    Paths(PathsWitness<T>),
}

impl<T: Clone> Clone for IsHLevel<T> {
    fn clone(&self) -> Self {
        match self {
            IsHLevel::Contr(c) => IsHLevel::Contr(c.clone()),
            IsHLevel::Paths(f) => IsHLevel::Paths(f.clone()),
        }
    }
}

impl<T: Type> IsHLevel<T> {
    pub fn paths(f: impl Fn(&Cell<T>, &Cell<T>) -> Result<IsHLevel<T>> + 'static) -> Self {
        IsHLevel::Paths(Rc::new(f))
    }

    pub fn contractible(center: Cell<T>) -> Self {
        IsHLevel::Contr(Contr::singleton(center))
    }

    /// Claims that any two cells are equal.
    pub fn prop(n: usize) -> Result<Self> {
        if n < 1 {
            return Err(anyhow!("a proposition only has level 1 or above, not {n}"));
        }
        Ok(IsHLevel::paths(|x, y| {
            Ok(IsHLevel::Contr(Contr::singleton(Cell::between(x, y)?)))
        }))
    }

    /// Claims that all path spaces are propositions.
    pub fn set(n: usize) -> Result<Self> {
        if n < 2 {
            return Err(anyhow!("a set only has level 2 or above, not {n}"));
        }
        Ok(IsHLevel::paths(|_, _| IsHLevel::prop(1)))
    }

    pub fn as_contr(&self) -> Option<&Contr<T>> {
        match self {
            IsHLevel::Contr(c) => Some(c),
            IsHLevel::Paths(_) => None,
        }
    }

    /// The witness for the space `x = y`. If `self` is a contractibility witness, the path space is
    /// contractible as well, with center `(contract x)⁻¹ @ contract y`.
    pub fn at(&self, x: &Cell<T>, y: &Cell<T>) -> Result<IsHLevel<T>> {
        match self {
            IsHLevel::Contr(c) => {
                let center = c.contract(x)?.inverse()?.concat(&c.contract(y)?)?;
                Ok(IsHLevel::Contr(Contr::singleton(center)))
            }
            IsHLevel::Paths(f) => f(x, y),
        }
    }

    /// Checks that `self` witnesses level `n` for the given space, exhaustively.
    pub fn verify(&self, n: usize, space: &[Cell<T>]) -> Result<()> {
        debug!("verify level {n} on {} cells", space.len());
        match (n, self) {
            (0, IsHLevel::Contr(c)) => c.verify(space),
            (0, IsHLevel::Paths(_)) => Err(anyhow!("level 0 requires a contractibility witness")),
            _ => {
                for x in space {
                    for y in space {
                        let prefix = || format!("paths from «{x:?}» to «{y:?}»");
                        let w = self.at(x, y).with_prefix(prefix)?;
                        w.verify(n - 1, &Cell::paths(x, y)).with_prefix(prefix)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// A product of contractible types is contractible, with center `(center A, center B)` and
/// contraction `path_prod (contr a) (contr b)`.
pub fn contr_prod<A: Type, B: Type>(ca: &Contr<A>, cb: &Contr<B>) -> Result<Contr<(A, B)>> {
    let center = Cell::pair(ca.center(), cb.center())?;
    let (ca, cb) = (ca.clone(), cb.clone());
    Ok(Contr::new(center, move |z| {
        let (x, y) = z.unpair();
        Cell::pair(&ca.contract(&x)?, &cb.contract(&y)?)
    }))
}

/// If `A` and `B` have level `n`, so does `A × B`.
///
/// For `n+1`, the endpoints `z`, `z2` are split by [`Cell::unpair`], and the witness for `z = z2`
/// is the product of the factors' level-`n` witnesses for `fst z = fst z2` and `snd z = snd z2`.
/// This covers all of `z = z2` because [`Cell::pair`] and [`Cell::unpair`] are mutually inverse
/// at every dimension.
pub fn hlevel_prod<A: Type, B: Type>(
    n: usize,
    wa: &IsHLevel<A>,
    wb: &IsHLevel<B>,
) -> Result<IsHLevel<(A, B)>> {
    if n == 0 {
        return match (wa.as_contr(), wb.as_contr()) {
            (Some(ca), Some(cb)) => Ok(IsHLevel::Contr(contr_prod(ca, cb)?)),
            _ => Err(anyhow!("level 0 requires contractibility witnesses for both factors")),
        };
    }
    let (wa, wb) = (wa.clone(), wb.clone());
    Ok(IsHLevel::paths(move |z, z2| {
        let ((x, y), (x2, y2)) = (z.unpair(), z2.unpair());
        hlevel_prod(n - 1, &wa.at(&x, &x2)?, &wb.at(&y, &y2)?)
    }))
}

/// Transfers a level-`n` witness along an equivalence `A ≃ B`.
pub fn hlevel_equiv<A: Type, B: Type>(
    n: usize,
    e: &Equiv<A, B>,
    w: &IsHLevel<A>,
) -> Result<IsHLevel<B>> {
    let (fun, inv) = (e.fun().clone(), e.inv().clone());
    if n == 0 {
        let c = w
            .as_contr()
            .ok_or_else(|| anyhow!("level 0 requires a contractibility witness"))?
            .clone();
        let center = c.center().map(&*fun);
        return Ok(IsHLevel::Contr(Contr::new(center, move |y| {
            let x = y.map(&*inv);
            // `f (center) = f (inv y)`, followed by the retraction `f (inv y) = y`.
            let mapped = c.contract(&x)?.map(&*fun);
            mapped.concat(&Cell::between(&x.map(&*fun), y)?)
        })));
    }
    let (e, w) = (e.clone(), w.clone());
    Ok(IsHLevel::paths(move |y, y2| {
        hlevel_equiv(n - 1, &e, &w.at(&y.map(&*inv), &y2.map(&*inv))?)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells() -> Result<()> {
        let x = Cell::Point(true);
        let p = Cell::between(&x, &x)?;
        assert_eq!(p.dim(), 1);
        assert_eq!(p, Cell::from_path(&Path::refl(true)));
        assert_eq!(p.boundary(), Some((&x, &x)));
        assert_eq!(p.concat(&p.inverse()?)?, p);
        assert!(Cell::between(&x, &Cell::Point(false)).is_err());
        assert!(x.inverse().is_err());
        assert!(x.concat(&x).is_err());
        assert_eq!(Cell::paths(&p, &p).len(), 1);
        assert!(Cell::paths(&x, &Cell::Point(false)).is_empty());
        Ok(())
    }

    #[test]
    fn test_pair_cells() -> Result<()> {
        let p = Cell::Point(true).refl();
        let q = Cell::Point(()).refl();
        let r = Cell::pair(&p, &q)?;
        assert_eq!(r, Cell::from_path(&Path::refl((true, ()))));
        assert_eq!(r.unpair(), (p.clone(), q));
        assert!(Cell::pair(&p, &Cell::Point(())).is_err());
        Ok(())
    }

    fn check_pair_round_trips<A: Finite, B: Finite>() -> Result<()> {
        let (mut xs, mut ys) = (Cell::<A>::space(), Cell::<B>::space());
        let mut zs = Cell::<(A, B)>::space();
        for dim in 0..=2 {
            for x in &xs {
                for y in &ys {
                    let z = Cell::pair(x, y)?;
                    assert_eq!(z.dim(), dim);
                    assert_eq!(z.unpair(), (x.clone(), y.clone()));
                    assert!(Cell::pair(&x.clone().refl(), y).is_err());
                }
            }
            for z in &zs {
                let (x, y) = z.unpair();
                assert_eq!(&Cell::pair(&x, &y)?, z);
            }
            xs = xs.iter().flat_map(|x| Cell::paths(x, x)).collect();
            ys = ys.iter().flat_map(|y| Cell::paths(y, y)).collect();
            zs = zs.iter().flat_map(|z| Cell::paths(z, z)).collect();
        }
        Ok(())
    }

    #[test]
    fn test_pair_round_trips() -> Result<()> {
        check_pair_round_trips::<bool, Fin<3>>()?;
        check_pair_round_trips::<(), bool>()?;
        check_pair_round_trips::<Fin<2>, Fin<2>>()?;
        check_pair_round_trips::<Option<bool>, ()>()?;
        check_pair_round_trips::<Empty, bool>()
    }

    #[test]
    fn test_clone_witnesses() -> Result<()> {
        let w = IsHLevel::<bool>::set(2)?;
        w.clone().verify(2, &Cell::<bool>::space())?;
        let c = Contr::singleton(Cell::Point(()));
        let c2 = c.clone();
        assert_eq!(c2.center(), c.center());
        IsHLevel::Contr(c2).clone().verify(1, &Cell::<()>::space())
    }

    #[test]
    fn test_builders() -> Result<()> {
        IsHLevel::contractible(Cell::Point(())).verify(0, &Cell::<()>::space())?;
        IsHLevel::contractible(Cell::Point(())).verify(3, &Cell::<()>::space())?;
        assert!(IsHLevel::contractible(Cell::Point(false))
            .verify(0, &Cell::<bool>::space())
            .is_err());

        IsHLevel::<()>::prop(1)?.verify(1, &Cell::<()>::space())?;
        IsHLevel::<Empty>::prop(1)?.verify(1, &Cell::<Empty>::space())?;
        assert!(IsHLevel::<bool>::prop(1)?
            .verify(1, &Cell::<bool>::space())
            .is_err());
        assert!(IsHLevel::<()>::prop(0).is_err());

        IsHLevel::<bool>::set(2)?.verify(2, &Cell::<bool>::space())?;
        IsHLevel::<bool>::set(2)?.verify(4, &Cell::<bool>::space())?;
        assert!(IsHLevel::<bool>::set(2)?
            .verify(1, &Cell::<bool>::space())
            .is_err());
        assert!(IsHLevel::<bool>::set(1).is_err());
        Ok(())
    }

    #[test]
    fn test_contr_prod() -> Result<()> {
        let ca = Contr::singleton(Cell::Point(()));
        let cb = Contr::singleton(Cell::Point(Fin::<1>::new(0)?));
        let c = contr_prod(&ca, &cb)?;
        assert_eq!(c.center(), &Cell::Point(((), Fin::new(0)?)));
        c.verify(&Cell::<((), Fin<1>)>::space())
    }

    #[test]
    fn test_hlevel_prod() -> Result<()> {
        let unit = IsHLevel::contractible(Cell::Point(()));
        hlevel_prod(0, &unit, &unit)?.verify(0, &Cell::<((), ())>::space())?;

        let prop = IsHLevel::<()>::prop(1)?;
        hlevel_prod(1, &prop, &prop)?.verify(1, &Cell::<((), ())>::space())?;
        hlevel_prod(1, &IsHLevel::<Empty>::prop(1)?, &prop)?
            .verify(1, &Cell::<(Empty, ())>::space())?;
        hlevel_prod(1, &unit, &prop)?.verify(1, &Cell::<((), ())>::space())?;

        let set = IsHLevel::<bool>::set(2)?;
        hlevel_prod(2, &set, &set)?.verify(2, &Cell::<(bool, bool)>::space())?;
        hlevel_prod(2, &set, &IsHLevel::<Fin<3>>::set(2)?)?
            .verify(2, &Cell::<(bool, Fin<3>)>::space())?;
        hlevel_prod(2, &set, &unit)?.verify(3, &Cell::<(bool, ())>::space())?;
        Ok(())
    }

    #[test]
    fn test_hlevel_prod_rejects_wrong_levels() -> Result<()> {
        let prop = IsHLevel::<()>::prop(1)?;
        assert!(hlevel_prod(0, &prop, &prop).is_err());

        let set = IsHLevel::<bool>::set(2)?;
        assert!(hlevel_prod(1, &set, &set)?
            .verify(1, &Cell::<(bool, bool)>::space())
            .is_err());
        Ok(())
    }

    #[test]
    fn test_hlevel_equiv() -> Result<()> {
        let negation =
            Equiv::adjointify(|b: bool| !b, |b: bool| !b, Path::refl, Path::refl);
        hlevel_equiv(2, &negation, &IsHLevel::set(2)?)?.verify(2, &Cell::<bool>::space())?;

        let to_fin = Equiv::adjointify(
            |_: ()| Fin::<1>::elements()[0],
            |_: Fin<1>| (),
            Path::refl,
            Path::refl,
        );
        let w = hlevel_equiv(0, &to_fin, &IsHLevel::contractible(Cell::Point(())))?;
        w.verify(0, &Cell::<Fin<1>>::space())?;
        assert_eq!(
            w.as_contr().map(|c| c.center().clone()),
            Some(Cell::Point(Fin::new(0)?))
        );
        Ok(())
    }
}
