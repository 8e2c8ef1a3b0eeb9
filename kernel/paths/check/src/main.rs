use anyhow::Result;

use prod_theory::*;

pub mod prod_theory;

fn main() -> Result<()> {
    env_logger::init();

    let theory = get_prod_theory()?;
    for lemma in theory.lemmas() {
        println!("{} : {}", theory.get_display_name(lemma), lemma.statement());
    }
    println!();

    theory.check_lemmas()?;
    println!("{} lemmas checked", theory.lemmas().len());
    Ok(())
}
