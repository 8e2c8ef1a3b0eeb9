use anyhow::{anyhow, Error, Result};
use log::{trace, warn};
use rayon::prelude::*;
use symbol_table::{Symbol, SymbolTable};

use slate_kernel_util::{anyhow::*, parser::*};

/// A proof obligation. `check` discharges it by exhaustive evaluation, so it must not depend on
/// anything but its own code.
#[derive(Clone)]
pub struct LemmaInit<'a> {
    pub name: &'a str,
    pub statement: &'a str,
    pub check: fn() -> Result<()>,
}

pub struct Lemma {
    name: Symbol,
    statement: String,
    check: fn() -> Result<()>,
}

impl Lemma {
    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn check(&self) -> Result<()> {
        (self.check)()
    }
}

/// A named collection of lemmas.
pub struct Theory {
    symbol_table: SymbolTable,
    lemmas: Vec<Lemma>,
}

impl Theory {
    pub fn construct(lemmas_init: &[LemmaInit]) -> Result<Self> {
        let symbol_table = SymbolTable::new();

        let mut lemmas: Vec<Lemma> = Vec::with_capacity(lemmas_init.len());
        for lemma_init in lemmas_init {
            let name = ParserInput(lemma_init.name)
                .read_whole_name()
                .with_prefix(|| format!("invalid lemma name «{}»", lemma_init.name))?;
            let symbol = symbol_table.intern(name);
            if lemmas.iter().any(|lemma| lemma.name == symbol) {
                return Err(anyhow!("lemma «{name}» is declared twice"));
            }
            lemmas.push(Lemma {
                name: symbol,
                statement: lemma_init.statement.trim().into(),
                check: lemma_init.check,
            });
        }

        if lemmas.is_empty() {
            warn!("theory does not contain any lemmas");
        }

        Ok(Theory {
            symbol_table,
            lemmas,
        })
    }

    pub fn lemmas(&self) -> &[Lemma] {
        &self.lemmas
    }

    pub fn get_lemma(&self, name: &str) -> Option<&Lemma> {
        let symbol = self.symbol_table.intern(name);
        self.lemmas.iter().find(|lemma| lemma.name == symbol)
    }

    pub fn get_display_name(&self, lemma: &Lemma) -> &str {
        self.symbol_table.resolve(lemma.name)
    }

    /// Checks all lemmas in parallel, reporting every failure.
    pub fn check_lemmas(&self) -> Result<()> {
        let errors: Vec<Error> = self
            .lemmas
            .par_iter()
            .filter_map(|lemma| {
                let name = self.get_display_name(lemma);

                trace_start(name);
                let result = lemma.check().with_prefix(|| {
                    let statement = lemma.statement();
                    format!("failed to check «{name}» ({statement})")
                });
                trace_end(name);

                result.err()
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.combine())
        }
    }
}

fn trace_start(name: &str) {
    trace!("{name}: start");
}

fn trace_end(name: &str) {
    trace!("{name}: end");
}
