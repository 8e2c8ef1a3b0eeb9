//! Paths in pair types.
//!
//! The central fact is that a path between two pairs is the same as a pair of paths between their
//! components, see [`equiv_path_prod`]. Most lemmas are proved by destructing the pairs and paths
//! involved; in the fully destructed case both sides of the claimed equation are the same term, so
//! the proof is reflexivity.

use std::rc::Rc;

use crate::{equiv::*, path::*};

pub fn fst<A: Type, B: Type>(z: (A, B)) -> A {
    z.0
}

pub fn snd<A: Type, B: Type>(z: (A, B)) -> B {
    z.1
}

/// Turns a proof of `P (fst u, snd u)` into a proof of `P u`.
pub fn unpack_prod<A: Type, B: Type, P: Family<(A, B)>>(u: &(A, B), w: P) -> P {
    let (x, y) = u;
    assert_same(&w.index(), &(x.clone(), y.clone()));
    w
}

/// `(fst z, snd z) = z`
pub fn eta_prod<A: Type, B: Type>(z: &(A, B)) -> Path<(A, B)> {
    let (x, y) = z;
    Path::refl((x.clone(), y.clone()))
}

/// Builds a path `z = z'` from paths between the components.
///
/// # Panics
///
/// Panics unless `p : fst z = fst z'` and `q : snd z = snd z'`.
pub fn path_prod<A: Type, B: Type>(
    z: &(A, B),
    z2: &(A, B),
    p: &Path<A>,
    q: &Path<B>,
) -> Path<(A, B)> {
    p.assert_type(&z.0, &z2.0);
    q.assert_type(&z.1, &z2.1);
    match (p, q) {
        (Path::Refl(x), Path::Refl(y)) => Path::Refl((x.clone(), y.clone())),
    }
}

pub fn path_prod_uncurried<A: Type, B: Type>(
    z: &(A, B),
    z2: &(A, B),
    pq: &(Path<A>, Path<B>),
) -> Path<(A, B)> {
    path_prod(z, z2, &pq.0, &pq.1)
}

/// [`path_prod`] with the endpoints taken from the component paths:
/// from `p : x = x'` and `q : y = y'`, obtains `(x, y) = (x', y')`.
pub fn pair_paths<A: Type, B: Type>(p: &Path<A>, q: &Path<B>) -> Path<(A, B)> {
    let z = (p.start().clone(), q.start().clone());
    let z2 = (p.end().clone(), q.end().clone());
    path_prod(&z, &z2, p, q)
}

/// The inverse of [`pair_paths`]: `r ↦ (ap fst r, ap snd r)`.
pub fn unpair_path<A: Type, B: Type>(r: &Path<(A, B)>) -> (Path<A>, Path<B>) {
    (ap(fst, r), ap(snd, r))
}

/// `ap fst (path_prod p q) = p`
pub fn ap_fst_path_prod<A: Type, B: Type>(p: &Path<A>, q: &Path<B>) -> Path<Path<A>> {
    match (p, q) {
        (Path::Refl(x), Path::Refl(_)) => Path::Refl(Path::Refl(x.clone())),
    }
}

/// `ap snd (path_prod p q) = q`
pub fn ap_snd_path_prod<A: Type, B: Type>(p: &Path<A>, q: &Path<B>) -> Path<Path<B>> {
    match (p, q) {
        (Path::Refl(_), Path::Refl(y)) => Path::Refl(Path::Refl(y.clone())),
    }
}

/// `path_prod (ap fst r) (ap snd r) = r`
pub fn eta_path_prod<A: Type, B: Type>(r: &Path<(A, B)>) -> Path<Path<(A, B)>> {
    match r {
        Path::Refl((x, y)) => Path::Refl(Path::Refl((x.clone(), y.clone()))),
    }
}

/// `path_prod_uncurried` is an equivalence, with inverse [`unpair_path`].
///
/// Paths are taken in their total spaces here; restricting both sides to fixed endpoints `z`,
/// `z'` gives the equivalence `(fst z = fst z') × (snd z = snd z') ≃ (z = z')`.
pub fn isequiv_path_prod<A: Type, B: Type>() -> IsEquiv<(Path<A>, Path<B>), Path<(A, B)>> {
    IsEquiv::new(
        |r: Path<(A, B)>| unpair_path(&r),
        |pq: (Path<A>, Path<B>)| match pq {
            (Path::Refl(x), Path::Refl(y)) => Path::Refl((Path::Refl(x), Path::Refl(y))),
        },
        |r: Path<(A, B)>| eta_path_prod(&r),
        // Once everything is destructed, both round trips are the same reflexivity, so the
        // triangle law is reflexivity as well.
        |pq: (Path<A>, Path<B>)| match pq {
            (Path::Refl(x), Path::Refl(y)) => Path::Refl(Path::Refl(Path::Refl((x, y)))),
        },
    )
}

pub fn equiv_path_prod<A: Type, B: Type>() -> Equiv<(Path<A>, Path<B>), Path<(A, B)>> {
    Equiv::from_parts(
        Rc::new(|pq: (Path<A>, Path<B>)| pair_paths(&pq.0, &pq.1)),
        isequiv_path_prod(),
    )
}

/// `transport (P × Q) p z = (transport P p (fst z), transport Q p (snd z))`
pub fn transport_prod<I: Type, P: Family<I>, Q: Family<I>>(
    p: &Path<I>,
    z: &(P, Q),
) -> Path<(P, Q)> {
    match p {
        Path::Refl(a) => {
            let (u, v) = z;
            assert_same(&u.index(), a);
            assert_same(&v.index(), a);
            Path::Refl((u.clone(), v.clone()))
        }
    }
}

/// The action of two functions on a pair: `(a, b) ↦ (f a, g b)`.
pub fn functor_prod<A: Type, B: Type, C: Type, D: Type>(
    f: impl Fn(A) -> C,
    g: impl Fn(B) -> D,
) -> impl Fn((A, B)) -> (C, D) {
    move |(a, b)| (f(a), g(b))
}

/// `functor_prod id id z = z`
pub fn functor_prod_id<A: Type, B: Type>(z: &(A, B)) -> Path<(A, B)> {
    let (x, y) = z;
    Path::refl((x.clone(), y.clone()))
}

/// `functor_prod (f2 ∘ f1) (g2 ∘ g1) z = functor_prod f2 g2 (functor_prod f1 g1 z)`
pub fn functor_prod_compose<A: Type, A1: Type, A2: Type, B: Type, B1: Type, B2: Type>(
    f1: impl Fn(A) -> A1,
    f2: impl Fn(A1) -> A2,
    g1: impl Fn(B) -> B1,
    g2: impl Fn(B1) -> B2,
    z: &(A, B),
) -> Path<(A2, B2)> {
    let (x, y) = z;
    Path::refl((f2(f1(x.clone())), g2(g1(y.clone()))))
}

/// The naturality square `ap (functor_prod f g) (path_prod p q) = path_prod (ap f p) (ap g q)`.
pub fn ap_functor_prod<A: Type, B: Type, C: Type, D: Type>(
    f: impl Fn(A) -> C,
    g: impl Fn(B) -> D,
    p: &Path<A>,
    q: &Path<B>,
) -> Path<Path<(C, D)>> {
    match (p, q) {
        (Path::Refl(x), Path::Refl(y)) => {
            Path::Refl(Path::Refl((f(x.clone()), g(y.clone()))))
        }
    }
}

/// If `f` and `g` are equivalences, so is `functor_prod f g`, with inverse
/// `functor_prod f⁻¹ g⁻¹`.
pub fn isequiv_functor_prod<A: Type, B: Type, C: Type, D: Type>(
    f: &Equiv<A, C>,
    g: &Equiv<B, D>,
) -> IsEquiv<(A, B), (C, D)> {
    let inv = {
        let (f, g) = (f.inv().clone(), g.inv().clone());
        functor_prod(move |c: C| f(c), move |d: D| g(d))
    };

    let sect = {
        let (f, g) = (f.clone(), g.clone());
        move |z: (A, B)| {
            pair_paths(&f.sect(z.0.clone()), &g.sect(z.1.clone())).concat(&eta_prod(&z))
        }
    };

    let retr = {
        let (f, g) = (f.clone(), g.clone());
        move |w: (C, D)| {
            pair_paths(&f.retr(w.0.clone()), &g.retr(w.1.clone())).concat(&eta_prod(&w))
        }
    };

    let adj = {
        let (f, g) = (f.clone(), g.clone());
        move |z: (A, B)| {
            let (a, b) = z.clone();
            let fun = functor_prod(&**f.fun(), &**g.fun());
            let (sect_a, sect_b) = (f.sect(a.clone()), g.sect(b.clone()));
            let retr_pair = pair_paths(&f.retr(f.apply(a.clone())), &g.retr(g.apply(b.clone())));
            let sect_pair = pair_paths(&sect_a, &sect_b);

            // retr (fun z) = pair_paths (retr_f (f a)) (retr_g (g b))
            let unit_retr = concat_p1(&retr_pair);
            // ... = pair_paths (ap f (sect_f a)) (ap g (sect_g b))
            let adjs = ap(
                |pq: (Path<C>, Path<D>)| pair_paths(&pq.0, &pq.1),
                &pair_paths(&f.adj(a), &g.adj(b)),
            );
            // ... = ap (functor_prod f g) (pair_paths (sect_f a) (sect_g b))
            let naturality = ap_functor_prod(&**f.fun(), &**g.fun(), &sect_a, &sect_b).inverse();
            // ... = ap (functor_prod f g) (sect z)
            let unit_sect = ap(|r: Path<(A, B)>| ap(&fun, &r), &concat_p1(&sect_pair).inverse());

            unit_retr
                .concat(&adjs)
                .concat(&naturality)
                .concat(&unit_sect)
        }
    };

    IsEquiv::new(inv, sect, retr, adj)
}

pub fn equiv_functor_prod<A: Type, B: Type, C: Type, D: Type>(
    f: &Equiv<A, C>,
    g: &Equiv<B, D>,
) -> Equiv<(A, B), (C, D)> {
    let fun = {
        let (f, g) = (f.fun().clone(), g.fun().clone());
        functor_prod(move |a: A| f(a), move |b: B| g(b))
    };
    Equiv::from_parts(Rc::new(fun), isequiv_functor_prod(f, g))
}

/// `A × B ≃ B × A`
pub fn equiv_prod_symm<A: Type, B: Type>() -> Equiv<(A, B), (B, A)> {
    Equiv::new(
        |(a, b): (A, B)| (b, a),
        |(b, a): (B, A)| (a, b),
        |z: (A, B)| eta_prod(&z),
        |w: (B, A)| eta_prod(&w),
        |(a, b): (A, B)| Path::refl(Path::refl((b, a))),
    )
}
