use anyhow::{anyhow, Error, Result};

pub struct ParserInput<'a>(pub &'a str);

impl<'a> ParserInput<'a> {
    pub fn error<T>(&self, err: Error) -> Result<T> {
        Err(err)
    }

    pub fn expected<T>(&self, expected: &str) -> Result<T> {
        let rest = self.0;
        self.error(anyhow!("expected {expected} instead of: {rest}"))
    }

    pub fn expect_end(&self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            self.expected("end")
        }
    }

    pub fn skip_whitespace(&mut self) {
        self.0 = self.0.trim_start();
    }

    fn is_name_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c == '\''
    }

    pub fn try_read_name(&mut self) -> Option<&'a str> {
        let s = self.0;
        let end = s.find(|c: char| !Self::is_name_char(c)).unwrap_or(s.len());
        if end == 0 {
            None
        } else {
            self.0 = &s[end..];
            Some(&s[..end])
        }
    }

    /// Reads an identifier that must make up the entire remaining input.
    pub fn read_whole_name(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        match self.try_read_name() {
            Some(name) => {
                self.skip_whitespace();
                self.expect_end()?;
                Ok(name)
            }
            None => self.expected("identifier"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_names_with_primes() -> Result<()> {
        let mut input = ParserInput(" path_prod' ");
        assert_eq!(input.read_whole_name()?, "path_prod'");
        Ok(())
    }

    #[test]
    fn rejects_trailing_input() {
        let mut input = ParserInput("eta prod");
        assert!(input.read_whole_name().is_err());
    }

    #[test]
    fn rejects_empty_name() {
        let mut input = ParserInput("  ");
        assert!(input.read_whole_name().is_err());
    }
}
