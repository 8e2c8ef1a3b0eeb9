//! Identity proofs as data.
//!
//! A path `p : x = y` is a value of [`Path<T>`], whose only constructor is reflexivity. Eliminating
//! a path is a `match` with a single arm, after which both endpoints are the same value. All
//! higher structure (paths between paths, and so on) is obtained by nesting, e.g.
//! `Path<Path<T>>`.
//!
//! Rust cannot express the endpoints of a path in its type, so wherever a dependent type would
//! guarantee that two endpoints agree, we assert it at runtime. Such an assertion failing is always
//! a bug in the caller. Code that builds paths from untrusted data should use the fallible
//! constructors ([`Path::between`], [`Path::check`]) instead.

use std::fmt::Debug;

use anyhow::{anyhow, Result};

/// A Rust type that we treat as a type of our logic. Equality of Rust values is the judgmental
/// equality that all reductions to reflexivity rely on.
pub trait Type: Clone + Eq + Debug + 'static {}

impl<T: Clone + Eq + Debug + 'static> Type for T {}

/// Verifies that `a` and `b` are the same value, and panics if they are not. This should be used
/// whenever the equality would be guaranteed by dependent types.
pub fn assert_same<T: Type>(a: &T, b: &T) {
    assert!(a == b, "«{a:?}» and «{b:?}» should coincide");
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Path<T> {
    Refl(T),
}

impl<T: Type> Path<T> {
    pub fn refl(x: T) -> Self {
        Path::Refl(x)
    }

    /// Constructs a path from `x` to `y`, which only exists if both are the same value.
    pub fn between(x: T, y: T) -> Result<Self> {
        if x == y {
            Ok(Path::Refl(x))
        } else {
            Err(anyhow!("no path between «{x:?}» and «{y:?}»"))
        }
    }

    pub fn start(&self) -> &T {
        match self {
            Path::Refl(x) => x,
        }
    }

    pub fn end(&self) -> &T {
        match self {
            Path::Refl(x) => x,
        }
    }

    /// Checks the judgment `self : left = right`.
    pub fn check(&self, left: &T, right: &T) -> Result<()> {
        if self.start() == left && self.end() == right {
            Ok(())
        } else {
            Err(anyhow!(
                "path «{self:?}» does not have type «{left:?}» = «{right:?}»"
            ))
        }
    }

    pub fn assert_type(&self, left: &T, right: &T) {
        assert_same(self.start(), left);
        assert_same(self.end(), right);
    }

    /// Path concatenation `self @ other`.
    ///
    /// # Panics
    ///
    /// Panics if the end of `self` is not the start of `other`.
    pub fn concat(&self, other: &Path<T>) -> Path<T> {
        match (self, other) {
            (Path::Refl(x), Path::Refl(y)) => {
                assert_same(x, y);
                Path::Refl(x.clone())
            }
        }
    }

    pub fn inverse(&self) -> Path<T> {
        match self {
            Path::Refl(x) => Path::Refl(x.clone()),
        }
    }
}

/// `p @ 1 = p`
pub fn concat_p1<T: Type>(p: &Path<T>) -> Path<Path<T>> {
    match p {
        Path::Refl(x) => Path::Refl(Path::Refl(x.clone())),
    }
}

/// `1 @ p = p`
pub fn concat_1p<T: Type>(p: &Path<T>) -> Path<Path<T>> {
    match p {
        Path::Refl(x) => Path::Refl(Path::Refl(x.clone())),
    }
}

/// `p @ p^ = 1`
pub fn concat_pv<T: Type>(p: &Path<T>) -> Path<Path<T>> {
    match p {
        Path::Refl(x) => Path::Refl(Path::Refl(x.clone())),
    }
}

/// `p^ @ p = 1`
pub fn concat_vp<T: Type>(p: &Path<T>) -> Path<Path<T>> {
    match p {
        Path::Refl(x) => Path::Refl(Path::Refl(x.clone())),
    }
}

/// `p^^ = p`
pub fn inv_v<T: Type>(p: &Path<T>) -> Path<Path<T>> {
    match p {
        Path::Refl(x) => Path::Refl(Path::Refl(x.clone())),
    }
}

/// Uniqueness of identity proofs: any two parallel paths are equal. This holds because reflexivity
/// is the only constructor of [`Path`].
///
/// # Panics
///
/// Panics if `p` and `q` do not have the same endpoints.
pub fn path_unique<T: Type>(p: &Path<T>, q: &Path<T>) -> Path<Path<T>> {
    q.assert_type(p.start(), p.end());
    match (p, q) {
        (Path::Refl(x), Path::Refl(_)) => Path::Refl(Path::Refl(x.clone())),
    }
}

/// Applies a function to a path: from `p : x = y`, obtains `ap f p : f x = f y`.
pub fn ap<A: Type, B: Type>(f: impl Fn(A) -> B, p: &Path<A>) -> Path<B> {
    match p {
        Path::Refl(x) => Path::Refl(f(x.clone())),
    }
}

/// `ap id p = p`
pub fn ap_id<A: Type>(p: &Path<A>) -> Path<Path<A>> {
    match p {
        Path::Refl(x) => Path::Refl(Path::Refl(x.clone())),
    }
}

/// `ap (g ∘ f) p = ap g (ap f p)`
pub fn ap_compose<A: Type, B: Type, C: Type>(
    f: impl Fn(A) -> B,
    g: impl Fn(B) -> C,
    p: &Path<A>,
) -> Path<Path<C>> {
    match p {
        Path::Refl(x) => Path::Refl(Path::Refl(g(f(x.clone())))),
    }
}

/// A type family over `I`.
///
/// We do not have dependent types, so a family is represented by the corresponding sigma type:
/// every value carries the index of the fiber it lives in. The fiber `P a` consists of all values
/// whose index is `a`.
pub trait Family<I: Type>: Type {
    fn index(&self) -> I;
}

/// The family whose fibers are all `B`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Fiber<I, B> {
    pub index: I,
    pub value: B,
}

impl<I: Type, B: Type> Fiber<I, B> {
    pub fn new(index: I, value: B) -> Self {
        Fiber { index, value }
    }
}

impl<I: Type, B: Type> Family<I> for Fiber<I, B> {
    fn index(&self) -> I {
        self.index.clone()
    }
}

/// The pointwise product `a ↦ P a × Q a` of two families.
impl<I: Type, P: Family<I>, Q: Family<I>> Family<I> for (P, Q) {
    fn index(&self) -> I {
        let index = self.0.index();
        assert_same(&index, &self.1.index());
        index
    }
}

/// Transports `u : P a` along `p : a = a'`, yielding an element of `P a'`.
///
/// # Panics
///
/// Panics if `u` does not lie over the start of `p`.
pub fn transport<I: Type, P: Family<I>>(p: &Path<I>, u: P) -> P {
    match p {
        Path::Refl(a) => {
            assert_same(&u.index(), a);
            u
        }
    }
}
