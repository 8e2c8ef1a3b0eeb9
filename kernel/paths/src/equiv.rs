use std::rc::Rc;

use anyhow::Result;
use log::debug;

use slate_kernel_util::anyhow::*;

use crate::{finite::*, path::*};

pub type Fun<A, B> = Rc<dyn Fn(A) -> B>;

/// The data that makes a function an equivalence: an inverse, both round-trip laws, and the
/// triangle law relating them.
pub struct IsEquiv<A, B> {
    inv: Fun<B, A>,

    /// `sect a : inv (fun a) = a`
    sect: Fun<A, Path<A>>,

    /// `retr b : fun (inv b) = b`
    retr: Fun<B, Path<B>>,

    /// `adj a : retr (fun a) = ap fun (sect a)`
    adj: Fun<A, Path<Path<B>>>,

    /// The round trip `retr` was derived from, if it was adjointified.
    quasi_retr: Option<Fun<B, Path<B>>>,
}

impl<A, B> Clone for IsEquiv<A, B> {
    fn clone(&self) -> Self {
        IsEquiv {
            inv: self.inv.clone(),
            sect: self.sect.clone(),
            retr: self.retr.clone(),
            adj: self.adj.clone(),
            quasi_retr: self.quasi_retr.clone(),
        }
    }
}

impl<A: Type, B: Type> IsEquiv<A, B> {
    pub fn new(
        inv: impl Fn(B) -> A + 'static,
        sect: impl Fn(A) -> Path<A> + 'static,
        retr: impl Fn(B) -> Path<B> + 'static,
        adj: impl Fn(A) -> Path<Path<B>> + 'static,
    ) -> Self {
        IsEquiv {
            inv: Rc::new(inv),
            sect: Rc::new(sect),
            retr: Rc::new(retr),
            adj: Rc::new(adj),
            quasi_retr: None,
        }
    }

    /// Builds a coherent equivalence from a quasi-inverse, i.e. from the two round-trip laws
    /// alone. The given `retr` is replaced by `ε' b = (ε (f (g b)))⁻¹ @ ap f (η (g b)) @ ε b`,
    /// for which the triangle law holds.
    ///
    /// # Panics
    ///
    /// The resulting closures panic if `retr` and `sect` do not have the endpoints stated above.
    /// [`Equiv::check`] verifies the given laws first and reports such a failure as an error.
    pub fn adjointify(
        fun: &Fun<A, B>,
        inv: impl Fn(B) -> A + 'static,
        retr: impl Fn(B) -> Path<B> + 'static,
        sect: impl Fn(A) -> Path<A> + 'static,
    ) -> Self {
        let inv: Fun<B, A> = Rc::new(inv);
        let retr: Fun<B, Path<B>> = Rc::new(retr);
        let sect: Fun<A, Path<A>> = Rc::new(sect);

        let coherent_retr: Fun<B, Path<B>> = {
            let (fun, inv, retr, sect) = (fun.clone(), inv.clone(), retr.clone(), sect.clone());
            Rc::new(move |b: B| {
                let gb = inv(b.clone());
                let back = retr(fun(gb.clone())).inverse();
                let middle = ap(&*fun, &sect(gb));
                back.concat(&middle).concat(&retr(b))
            })
        };

        let adj: Fun<A, Path<Path<B>>> = {
            let (fun, coherent_retr, sect) = (fun.clone(), coherent_retr.clone(), sect.clone());
            Rc::new(move |a: A| {
                // Both sides are parallel paths from `f (g (f a))` to `f a`.
                path_unique(&coherent_retr(fun(a.clone())), &ap(&*fun, &sect(a)))
            })
        };

        IsEquiv {
            inv,
            sect,
            retr: coherent_retr,
            adj,
            quasi_retr: Some(retr),
        }
    }
}

/// An equivalence `A ≃ B`.
pub struct Equiv<A, B> {
    fun: Fun<A, B>,
    is_equiv: IsEquiv<A, B>,
}

impl<A, B> Clone for Equiv<A, B> {
    fn clone(&self) -> Self {
        Equiv {
            fun: self.fun.clone(),
            is_equiv: self.is_equiv.clone(),
        }
    }
}

impl<A: Type, B: Type> Equiv<A, B> {
    pub fn from_parts(fun: Fun<A, B>, is_equiv: IsEquiv<A, B>) -> Self {
        Equiv { fun, is_equiv }
    }

    pub fn new(
        fun: impl Fn(A) -> B + 'static,
        inv: impl Fn(B) -> A + 'static,
        sect: impl Fn(A) -> Path<A> + 'static,
        retr: impl Fn(B) -> Path<B> + 'static,
        adj: impl Fn(A) -> Path<Path<B>> + 'static,
    ) -> Self {
        Equiv {
            fun: Rc::new(fun),
            is_equiv: IsEquiv::new(inv, sect, retr, adj),
        }
    }

    /// See [`IsEquiv::adjointify`].
    pub fn adjointify(
        fun: impl Fn(A) -> B + 'static,
        inv: impl Fn(B) -> A + 'static,
        retr: impl Fn(B) -> Path<B> + 'static,
        sect: impl Fn(A) -> Path<A> + 'static,
    ) -> Self {
        let fun: Fun<A, B> = Rc::new(fun);
        let is_equiv = IsEquiv::adjointify(&fun, inv, retr, sect);
        Equiv { fun, is_equiv }
    }

    pub fn fun(&self) -> &Fun<A, B> {
        &self.fun
    }

    pub fn inv(&self) -> &Fun<B, A> {
        &self.is_equiv.inv
    }

    pub fn is_equiv(&self) -> &IsEquiv<A, B> {
        &self.is_equiv
    }

    pub fn apply(&self, a: A) -> B {
        (self.fun)(a)
    }

    pub fn apply_inv(&self, b: B) -> A {
        (self.is_equiv.inv)(b)
    }

    pub fn sect(&self, a: A) -> Path<A> {
        (self.is_equiv.sect)(a)
    }

    pub fn retr(&self, b: B) -> Path<B> {
        (self.is_equiv.retr)(b)
    }

    pub fn adj(&self, a: A) -> Path<Path<B>> {
        (self.is_equiv.adj)(a)
    }

    /// The given round trip `fun (inv b) = b`, or `retr` if there is none.
    fn quasi_retr(&self) -> Fun<B, Path<B>> {
        let is_equiv = &self.is_equiv;
        is_equiv.quasi_retr.clone().unwrap_or_else(|| is_equiv.retr.clone())
    }

    pub fn inverse(&self) -> Equiv<B, A> {
        let is_equiv = &self.is_equiv;
        let (inv, fun, sect, retr) = (
            is_equiv.inv.clone(),
            self.fun.clone(),
            is_equiv.sect.clone(),
            self.quasi_retr(),
        );
        Equiv::adjointify(
            move |b| inv(b),
            move |a| fun(a),
            move |a| sect(a),
            move |b| retr(b),
        )
    }

    pub fn compose<C: Type>(&self, other: &Equiv<B, C>) -> Equiv<A, C> {
        let (f, g) = (self.clone(), other.clone());
        let (f_inv, g_inv) = (self.clone(), other.clone());
        let (f_retr, g_retr) = (self.clone(), other.clone());
        let (f_sect, g_sect) = (self.clone(), other.clone());
        Equiv::adjointify(
            move |a| g.apply(f.apply(a)),
            move |c| f_inv.apply_inv(g_inv.apply_inv(c)),
            move |c: C| {
                let b = g_retr.apply_inv(c.clone());
                ap(&*g_retr.fun, &f_retr.retr(b)).concat(&g_retr.retr(c))
            },
            move |a: A| {
                let b = f_sect.apply(a.clone());
                ap(&*f_sect.is_equiv.inv, &g_sect.sect(b)).concat(&f_sect.sect(a))
            },
        )
    }

    /// Checks all three laws on the given elements of the domain and codomain.
    pub fn check(&self, domain: &[A], codomain: &[B]) -> Result<()> {
        for a in domain {
            debug!("check equivalence laws at «{a:?}»");
            let fa = self.apply(a.clone());
            let sect = self.sect(a.clone());
            sect.check(&self.apply_inv(fa.clone()), a)
                .with_prefix(|| format!("section law fails at «{a:?}»"))?;
            self.check_retr(&fa)?;
            self.adj(a.clone())
                .check(&self.retr(fa), &ap(&*self.fun, &sect))
                .with_prefix(|| format!("adjointness law fails at «{a:?}»"))?;
        }
        for b in codomain {
            self.check_retr(b)?;
        }
        Ok(())
    }

    fn check_retr(&self, b: &B) -> Result<()> {
        if let Some(quasi_retr) = &self.is_equiv.quasi_retr {
            // The coherent `retr b` concatenates these, which requires matching endpoints.
            let gb = self.apply_inv(b.clone());
            let fgb = self.apply(gb.clone());
            for b in [b, &fgb] {
                quasi_retr(b.clone())
                    .check(&self.apply(self.apply_inv(b.clone())), b)
                    .with_prefix(|| format!("round-trip law fails at «{b:?}»"))?;
            }
            self.sect(gb.clone())
                .check(&self.apply_inv(fgb), &gb)
                .with_prefix(|| format!("section law fails at «{gb:?}»"))?;
        }
        self.retr(b.clone())
            .check(&self.apply(self.apply_inv(b.clone())), b)
            .with_prefix(|| format!("retraction law fails at «{b:?}»"))
    }

    pub fn check_finite(&self) -> Result<()>
    where
        A: Finite,
        B: Finite,
    {
        self.check(&A::elements(), &B::elements())
    }
}

impl<A: Type> Equiv<A, A> {
    pub fn id() -> Self {
        Equiv::new(
            |a| a,
            |a| a,
            Path::refl,
            Path::refl,
            |a| Path::refl(Path::refl(a)),
        )
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    fn negation() -> Equiv<bool, bool> {
        Equiv::adjointify(
            |b: bool| !b,
            |b: bool| !b,
            |b: bool| Path::refl(b),
            |b: bool| Path::refl(b),
        )
    }

    fn shift() -> Equiv<Fin<3>, Fin<3>> {
        let rotate = |k: usize| move |n: Fin<3>| Fin::<3>::elements()[(n.value() + k) % 3];
        Equiv::adjointify(
            rotate(1),
            rotate(2),
            Path::refl,
            Path::refl,
        )
    }

    #[test]
    fn test_id() -> Result<()> {
        Equiv::<Fin<3>, Fin<3>>::id().check_finite()
    }

    #[test]
    fn test_adjointify() -> Result<()> {
        let neg = negation();
        neg.check_finite()?;
        assert!(!neg.apply(true));
        assert!(neg.apply_inv(false));
        shift().check_finite()
    }

    #[test]
    fn test_inverse_and_compose() -> Result<()> {
        let rot = shift();
        let rot_inv = rot.inverse();
        rot_inv.check_finite()?;
        for n in Fin::<3>::elements() {
            assert_eq!(rot_inv.apply(rot.apply(n)), n);
        }
        let twice = rot.compose(&rot);
        twice.check_finite()?;
        let id = rot.compose(&rot_inv);
        id.check_finite()?;
        for n in Fin::<3>::elements() {
            assert_eq!(twice.apply(n), rot_inv.apply(n));
            assert_eq!(id.apply(n), n);
        }
        Ok(())
    }

    #[test]
    fn test_check_rejects_wrong_section() {
        // Constant maps are not inverse to negation, but the laws claim reflexivity anyway.
        let bogus = Equiv::new(
            |b: bool| !b,
            |_: bool| false,
            Path::refl,
            Path::refl,
            |b: bool| Path::refl(Path::refl(!b)),
        );
        assert!(bogus.check_finite().is_err());
    }

    #[test]
    fn test_check_rejects_wrong_retraction() -> Result<()> {
        let bogus = Equiv::adjointify(
            |b: bool| !b,
            |b: bool| !b,
            |b: bool| Path::refl(!b),
            Path::refl,
        );
        let error = bogus.check_finite().err().ok_or(anyhow!("broken law not reported"))?;
        assert!(format!("{error:#}").starts_with("round-trip law fails"));
        assert!(bogus.check(&[], &[true]).is_err());
        assert!(bogus.inverse().check_finite().is_err());

        let bogus_sect = Equiv::adjointify(
            |b: bool| !b,
            |b: bool| !b,
            Path::refl,
            |b: bool| Path::refl(!b),
        );
        assert!(bogus_sect.check_finite().is_err());
        assert!(bogus_sect.check(&[], &[false]).is_err());
        Ok(())
    }
}
