use anyhow::Result;
use mimalloc::MiMalloc;

use slate_kernel_paths::{equiv::*, finite::*, funext::*, hlevel::*, path::*, prod::*, theory::*};
use slate_kernel_util::anyhow::*;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Runs a check that is generic in both factors of a pair type on a fixed selection of carriers,
/// covering a singleton factor, an empty factor, and the same type twice.
macro_rules! on_sample_carriers {
    ($check:ident) => {
        || -> Result<()> {
            $check::<bool, Fin<3>>().with_prefix(|| "on «bool × Fin 3»".into())?;
            $check::<(), bool>().with_prefix(|| "on «() × bool»".into())?;
            $check::<Fin<2>, Fin<2>>().with_prefix(|| "on «Fin 2 × Fin 2»".into())?;
            $check::<Option<bool>, ()>().with_prefix(|| "on «Option bool × ()»".into())?;
            $check::<Empty, bool>().with_prefix(|| "on «Empty × bool»".into())
        }
    };
}

pub fn get_prod_theory() -> Result<Theory> {
    Theory::construct(&[
        LemmaInit {
            name: "unpack_prod",
            statement: "P (fst u, snd u) → P u",
            check: on_sample_carriers!(check_unpack_prod),
        },
        LemmaInit {
            name: "eta_prod",
            statement: "(fst z, snd z) = z",
            check: on_sample_carriers!(check_eta_prod),
        },
        LemmaInit {
            name: "path_prod",
            statement: "fst z = fst z' → snd z = snd z' → z = z'",
            check: on_sample_carriers!(check_path_prod),
        },
        LemmaInit {
            name: "path_prod_uncurried",
            statement: "(fst z = fst z') × (snd z = snd z') → z = z'",
            check: on_sample_carriers!(check_path_prod_uncurried),
        },
        LemmaInit {
            name: "path_prod'",
            statement: "x = x' → y = y' → (x, y) = (x', y')",
            check: on_sample_carriers!(check_pair_paths),
        },
        LemmaInit {
            name: "ap_fst_path_prod",
            statement: "ap fst (path_prod p q) = p",
            check: on_sample_carriers!(check_ap_fst_path_prod),
        },
        LemmaInit {
            name: "ap_snd_path_prod",
            statement: "ap snd (path_prod p q) = q",
            check: on_sample_carriers!(check_ap_snd_path_prod),
        },
        LemmaInit {
            name: "eta_path_prod",
            statement: "path_prod (ap fst r) (ap snd r) = r",
            check: on_sample_carriers!(check_eta_path_prod),
        },
        LemmaInit {
            name: "equiv_path_prod",
            statement: "(fst z = fst z') × (snd z = snd z') ≃ (z = z')",
            check: on_sample_carriers!(check_equiv_path_prod),
        },
        LemmaInit {
            name: "transport_prod",
            statement: "transport (P × Q) p z = (transport P p (fst z), transport Q p (snd z))",
            check: on_sample_carriers!(check_transport_prod),
        },
        LemmaInit {
            name: "functor_prod",
            statement: "functor_prod f g (a, b) = (f a, g b)",
            check: on_sample_carriers!(check_functor_prod),
        },
        LemmaInit {
            name: "functor_prod_id",
            statement: "functor_prod id id z = z",
            check: on_sample_carriers!(check_functor_prod_id),
        },
        LemmaInit {
            name: "functor_prod_compose",
            statement: "functor_prod (f2 ∘ f1) (g2 ∘ g1) z = functor_prod f2 g2 (functor_prod f1 g1 z)",
            check: on_sample_carriers!(check_functor_prod_compose),
        },
        LemmaInit {
            name: "ap_functor_prod",
            statement: "ap (functor_prod f g) (path_prod p q) = path_prod (ap f p) (ap g q)",
            check: on_sample_carriers!(check_ap_functor_prod),
        },
        LemmaInit {
            name: "equiv_functor_prod",
            statement: "A ≃ A' → B ≃ B' → A × B ≃ A' × B'",
            check: on_sample_carriers!(check_equiv_functor_prod),
        },
        LemmaInit {
            name: "equiv_prod_symm",
            statement: "A × B ≃ B × A",
            check: on_sample_carriers!(check_equiv_prod_symm),
        },
        LemmaInit {
            name: "equiv_prod_rect",
            statement: "((a : A) → (b : B) → P (a, b)) ≃ ((z : A × B) → P z)",
            check: on_sample_carriers!(check_equiv_prod_rect),
        },
        LemmaInit {
            name: "contr_prod",
            statement: "Contr A → Contr B → Contr (A × B)",
            check: on_sample_carriers!(check_contr_prod),
        },
        LemmaInit {
            name: "hlevel_prod",
            statement: "IsHLevel n A → IsHLevel n B → IsHLevel n (A × B)",
            check: on_sample_carriers!(check_hlevel_prod),
        },
        LemmaInit {
            name: "hlevel_equiv",
            statement: "A ≃ B → IsHLevel n A → IsHLevel n B",
            check: on_sample_carriers!(check_hlevel_equiv),
        },
    ])
}

/// All pairs of component paths from `z` to `z2`.
fn component_paths<A: Finite, B: Finite>(z: &(A, B), z2: &(A, B)) -> Vec<(Path<A>, Path<B>)> {
    <(Path<A>, Path<B>)>::elements()
        .into_iter()
        .filter(|(p, q)| p.check(&z.0, &z2.0).is_ok() && q.check(&z.1, &z2.1).is_ok())
        .collect()
}

fn check_unpack_prod<A: Finite, B: Finite>() -> Result<()> {
    for u in <(A, B)>::elements() {
        let fiber: Vec<Fiber<(A, B), bool>> = fiber_elements(&(fst(u.clone()), snd(u.clone())));
        for w in fiber {
            Path::between(unpack_prod(&u, w.clone()), w)?;
        }
    }
    Ok(())
}

fn check_eta_prod<A: Finite, B: Finite>() -> Result<()> {
    for z in <(A, B)>::elements() {
        eta_prod(&z).check(&(fst(z.clone()), snd(z.clone())), &z)?;
    }
    Ok(())
}

fn check_path_prod<A: Finite, B: Finite>() -> Result<()> {
    for z in <(A, B)>::elements() {
        for z2 in <(A, B)>::elements() {
            for (p, q) in component_paths(&z, &z2) {
                path_prod(&z, &z2, &p, &q).check(&z, &z2)?;
            }
        }
    }
    Ok(())
}

fn check_path_prod_uncurried<A: Finite, B: Finite>() -> Result<()> {
    for z in <(A, B)>::elements() {
        for z2 in <(A, B)>::elements() {
            for pq in component_paths(&z, &z2) {
                let r = path_prod_uncurried(&z, &z2, &pq);
                r.check(&z, &z2)?;
                Path::between(r, path_prod(&z, &z2, &pq.0, &pq.1))?;
            }
        }
    }
    Ok(())
}

fn check_pair_paths<A: Finite, B: Finite>() -> Result<()> {
    for (p, q) in <(Path<A>, Path<B>)>::elements() {
        let z = (p.start().clone(), q.start().clone());
        let z2 = (p.end().clone(), q.end().clone());
        Path::between(pair_paths(&p, &q), path_prod(&z, &z2, &p, &q))?;
    }
    Ok(())
}

fn check_ap_fst_path_prod<A: Finite, B: Finite>() -> Result<()> {
    for (p, q) in <(Path<A>, Path<B>)>::elements() {
        ap_fst_path_prod(&p, &q).check(&ap(fst, &pair_paths(&p, &q)), &p)?;
    }
    Ok(())
}

fn check_ap_snd_path_prod<A: Finite, B: Finite>() -> Result<()> {
    for (p, q) in <(Path<A>, Path<B>)>::elements() {
        ap_snd_path_prod(&p, &q).check(&ap(snd, &pair_paths(&p, &q)), &q)?;
    }
    Ok(())
}

fn check_eta_path_prod<A: Finite, B: Finite>() -> Result<()> {
    for r in Path::<(A, B)>::elements() {
        let (p, q) = unpair_path(&r);
        eta_path_prod(&r).check(&pair_paths(&p, &q), &r)?;
    }
    Ok(())
}

fn check_equiv_path_prod<A: Finite, B: Finite>() -> Result<()> {
    let equiv = equiv_path_prod::<A, B>();
    equiv.check_finite()?;
    for z in <(A, B)>::elements() {
        for z2 in <(A, B)>::elements() {
            let paths: Vec<Path<(A, B)>> = Path::<(A, B)>::elements()
                .into_iter()
                .filter(|r| r.check(&z, &z2).is_ok())
                .collect();
            equiv
                .check(&component_paths(&z, &z2), &paths)
                .with_prefix(|| format!("between «{z:?}» and «{z2:?}»"))?;
        }
    }
    Ok(())
}

fn check_transport_prod<A: Finite, B: Finite>() -> Result<()> {
    for p in Path::<A>::elements() {
        let left: Vec<Fiber<A, B>> = fiber_elements(p.start());
        let right: Vec<Fiber<A, bool>> = fiber_elements(p.start());
        for u in &left {
            for v in &right {
                let z = (u.clone(), v.clone());
                transport_prod(&p, &z).check(
                    &transport(&p, z.clone()),
                    &(transport(&p, u.clone()), transport(&p, v.clone())),
                )?;
            }
        }
    }
    Ok(())
}

fn check_functor_prod<A: Finite, B: Finite>() -> Result<()> {
    let f = |a: A| Some(a);
    let g = |b: B| (b.clone(), b);
    for (a, b) in <(A, B)>::elements() {
        Path::between(
            functor_prod(f, g)((a.clone(), b.clone())),
            (f(a), g(b)),
        )?;
    }
    Ok(())
}

fn check_functor_prod_id<A: Finite, B: Finite>() -> Result<()> {
    for z in <(A, B)>::elements() {
        functor_prod_id(&z).check(&functor_prod(|a: A| a, |b: B| b)(z.clone()), &z)?;
    }
    Ok(())
}

fn check_functor_prod_compose<A: Finite, B: Finite>() -> Result<()> {
    let f1 = |a: A| Some(a);
    let f2 = |a: Option<A>| a.is_some();
    let g1 = |b: B| (b, ());
    let g2 = |(b, _): (B, ())| b;
    for z in <(A, B)>::elements() {
        functor_prod_compose(f1, f2, g1, g2, &z).check(
            &functor_prod(|a| f2(f1(a)), |b| g2(g1(b)))(z.clone()),
            &functor_prod(f2, g2)(functor_prod(f1, g1)(z.clone())),
        )?;
    }
    Ok(())
}

fn check_ap_functor_prod<A: Finite, B: Finite>() -> Result<()> {
    let f = |a: A| Some(a);
    let g = |b: B| (b.clone(), b);
    for (p, q) in <(Path<A>, Path<B>)>::elements() {
        ap_functor_prod(f, g, &p, &q).check(
            &ap(functor_prod(f, g), &pair_paths(&p, &q)),
            &pair_paths(&ap(f, &p), &ap(g, &q)),
        )?;
    }
    Ok(())
}

fn check_equiv_functor_prod<A: Finite, B: Finite>() -> Result<()> {
    let f = Equiv::<A, A>::id().inverse();
    let g = Equiv::adjointify(
        |b: B| (b, ()),
        |(b, _): (B, ())| b,
        |w: (B, ())| Path::refl(w),
        |b: B| Path::refl(b),
    );
    let lifted = equiv_functor_prod(&f, &g);
    lifted.check_finite()?;
    for z in <(A, B)>::elements() {
        Path::between(lifted.apply_inv(lifted.apply(z.clone())), z)?;
    }
    for w in <(A, (B, ()))>::elements() {
        Path::between(lifted.apply(lifted.apply_inv(w.clone())), w)?;
    }
    Ok(())
}

fn check_equiv_prod_symm<A: Finite, B: Finite>() -> Result<()> {
    let symm = equiv_prod_symm::<A, B>();
    symm.check_finite()?;
    let round_trip = symm.compose(&equiv_prod_symm());
    round_trip.check_finite()?;
    for z in <(A, B)>::elements() {
        Path::between(round_trip.apply(z.clone()), z)?;
    }
    Ok(())
}

fn check_equiv_prod_rect<A: Finite, B: Finite>() -> Result<()> {
    let equiv = equiv_prod_rect::<A, B, Fiber<(A, B), bool>>(Funext::assume());
    equiv.check_finite()?;
    for g in Pi2::<A, B, Fiber<(A, B), bool>>::elements() {
        let h = prod_rect(&g);
        for (a, b) in <(A, B)>::elements() {
            Path::between(h.apply(&(a.clone(), b.clone())), g.apply(&a, &b))?;
        }
    }
    Ok(())
}

fn check_contr_prod<A: Finite, B: Finite>() -> Result<()> {
    // Every single point is a contractible subspace.
    for (a, b) in <(A, B)>::elements() {
        let ca = Contr::singleton(Cell::Point(a.clone()));
        let cb = Contr::singleton(Cell::Point(b.clone()));
        let c = contr_prod(&ca, &cb)?;
        let z = Cell::Point((a, b));
        Path::between(c.center().clone(), z.clone())?;
        c.verify(&[z])?;
    }
    Ok(())
}

fn check_hlevel_prod<A: Finite, B: Finite>() -> Result<()> {
    let (set_a, set_b) = (IsHLevel::<A>::set(2)?, IsHLevel::<B>::set(2)?);
    hlevel_prod(2, &set_a, &set_b)?.verify(2, &Cell::<(A, B)>::space())?;

    for (a, b) in <(A, B)>::elements() {
        let z = [Cell::Point((a.clone(), b.clone()))];
        let (prop_a, prop_b) = (IsHLevel::<A>::prop(1)?, IsHLevel::<B>::prop(1)?);
        hlevel_prod(1, &prop_a, &prop_b)?.verify(1, &z)?;
        let contr_a = IsHLevel::contractible(Cell::Point(a));
        let contr_b = IsHLevel::contractible(Cell::Point(b));
        hlevel_prod(0, &contr_a, &contr_b)?.verify(0, &z)?;
    }
    Ok(())
}

fn check_hlevel_equiv<A: Finite, B: Finite>() -> Result<()> {
    let w = hlevel_prod(2, &IsHLevel::<A>::set(2)?, &IsHLevel::<B>::set(2)?)?;
    hlevel_equiv(2, &equiv_prod_symm(), &w)?.verify(2, &Cell::<(B, A)>::space())
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_prod_theory() -> Result<()> {
        env_logger::init();

        let theory = get_prod_theory()?;
        for name in ["path_prod", "path_prod'", "equiv_path_prod", "hlevel_prod"] {
            theory
                .get_lemma(name)
                .ok_or_else(|| anyhow!("missing lemma «{name}»"))?;
        }
        theory.check_lemmas()
    }

    #[test]
    fn test_fin2_end_to_end() -> Result<()> {
        let (zero, one) = (Fin::<2>::new(0)?, Fin::<2>::new(1)?);
        let z = (zero, one);
        let r = path_prod(&z, &z, &Path::refl(zero), &Path::refl(one));
        assert_eq!(r, Path::refl(z));
        assert!(Path::between(z, (one, zero)).is_err());
        assert!(component_paths(&z, &(one, zero)).is_empty());
        Ok(())
    }
}
