use std::io::BufRead;

use crate::{
    misc::log::targets::{self},
    ruler::Ruler,
    structures::literal::MAX_VAR,
    types::err::{self, ErrorKind},
};

/// Information from reading a DIMACS file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParserInfo {
    /// The count of variables noted in the problem line, if present.
    pub expected_variables: Option<usize>,

    /// The count of clauses noted in the problem line, if present.
    pub expected_clauses: Option<usize>,

    /// The count of variables of the ruler, after reading.
    pub added_variables: usize,

    /// The count of clauses read, including tautologies.
    pub added_clauses: usize,
}

impl Ruler {
    /// Reads a DIMACS file into the ruler.
    ///
    /// Comment lines (beginning `c`) are skipped anywhere, a problem line (beginning `p`) is read if it precedes every clause, and a line beginning `%` ends the formula.
    /// The variables noted in the problem line are added to the ruler, even if some variable is in no clause.
    ///
    /// ```rust,ignore
    /// ruler.read_dimacs(BufReader::new(&file))?;
    /// ```
    ///
    /// ```rust
    /// # use ring_sat::{config::Config, reports::Report, ruler::Ruler};
    /// # use std::io::Write;
    /// let mut ruler = Ruler::from_config(Config::default());
    ///
    /// let mut dimacs = vec![];
    /// let _ = dimacs.write(b"
    /// c An unsatisfiable formula
    /// p cnf 2 4
    ///  1  2 0
    ///  1 -2 0
    /// -1  2 0
    /// -1 -2 0
    /// ");
    ///
    /// let info = ruler.read_dimacs(dimacs.as_slice()).unwrap();
    /// assert_eq!(info.expected_clauses, Some(4));
    /// assert_eq!(info.added_clauses, 4);
    /// assert_eq!(ruler.solve(), Ok(Report::Unsatisfiable));
    /// ```
    pub fn read_dimacs(&mut self, mut reader: impl BufRead) -> Result<ParserInfo, ErrorKind> {
        let mut info = ParserInfo::default();
        let mut buffer = String::with_capacity(1024);
        let mut clause = Vec::default();
        let mut line_counter = 0;
        let mut preamble = true;

        'line_loop: loop {
            buffer.clear();
            match reader.read_line(&mut buffer) {
                Ok(0) => break,
                Ok(_) => line_counter += 1,
                Err(_) => return Err(err::ParseError::Read.into()),
            }

            let line = buffer.trim_start();
            match line.chars().next() {
                None | Some('c') => continue,

                Some('%') => break 'line_loop,

                Some('p') if preamble => {
                    let mut details = line.split_whitespace().skip(1);
                    if details.next() != Some("cnf") {
                        return Err(err::ParseError::ProblemSpecification.into());
                    }
                    let mut count = || -> Result<usize, ErrorKind> {
                        details
                            .next()
                            .and_then(|token| token.parse().ok())
                            .ok_or(err::ParseError::ProblemSpecification.into())
                    };
                    let variables = count()?;
                    let clauses = count()?;
                    if variables > MAX_VAR as usize + 1 {
                        return Err(err::ParseError::ProblemSpecification.into());
                    }
                    log::info!(target: targets::PARSER, "Expecting {variables} variables and {clauses} clauses");
                    info.expected_variables = Some(variables);
                    info.expected_clauses = Some(clauses);
                    self.ensure_variables(variables);
                    preamble = false;
                }

                Some(_) => {
                    preamble = false;
                    for token in line.split_whitespace() {
                        let Ok(literal) = token.parse::<i32>() else {
                            return Err(err::ParseError::Line(line_counter).into());
                        };
                        match literal {
                            0 => {
                                match self.add_clause(&clause) {
                                    Ok(()) => {}
                                    Err(ErrorKind::Build(e)) => return Err(err::ParseError::Build(e).into()),
                                    Err(e) => return Err(e),
                                }
                                clause.clear();
                                info.added_clauses += 1;
                            }
                            _ => clause.push(literal),
                        }
                    }
                }
            }
        }

        if !clause.is_empty() {
            return Err(err::ParseError::MissingDelimiter.into());
        }

        info.added_variables = self.variable_count();
        log::info!(target: targets::PARSER, "Read {} clauses over {} variables", info.added_clauses, info.added_variables);
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        ruler::Ruler,
        types::err::{BuildError, ErrorKind, ParseError},
    };

    fn read(dimacs: &str) -> (Ruler, Result<super::ParserInfo, ErrorKind>) {
        let mut ruler = Ruler::from_config(Config::default());
        let result = ruler.read_dimacs(dimacs.as_bytes());
        (ruler, result)
    }

    #[test]
    fn header_and_clauses() {
        let (ruler, result) = read("c comment\np cnf 5 2\n1 -2 0\n3 4\n 0\n");
        let info = result.unwrap();
        assert_eq!(info.expected_variables, Some(5));
        assert_eq!(info.added_clauses, 2);
        assert_eq!(info.added_variables, 5);
        assert_eq!(ruler.variable_count(), 5);
    }

    #[test]
    fn clauses_may_span_and_share_lines() {
        let (ruler, result) = read("1 2 0 -1\n-2 0\n%\n9 0\n");
        assert_eq!(result.unwrap().added_clauses, 2);
        assert_eq!(ruler.variable_count(), 2);
    }

    #[test]
    fn malformed_input() {
        assert_eq!(read("p cnf x 2\n").1, Err(ErrorKind::Parse(ParseError::ProblemSpecification)));
        assert_eq!(read("p dnf 2 2\n").1, Err(ErrorKind::Parse(ParseError::ProblemSpecification)));
        assert_eq!(read("1 2 0\n1 b 0\n").1, Err(ErrorKind::Parse(ParseError::Line(2))));
        assert_eq!(read("1 2 0\n3 4\n").1, Err(ErrorKind::Parse(ParseError::MissingDelimiter)));
        assert_eq!(
            read("2147483647 0\n").1,
            Err(ErrorKind::Parse(ParseError::Build(BuildError::VariableLimit)))
        );
    }

    #[test]
    fn empty_clauses_are_inconsistent() {
        let (ruler, result) = read("1 0\n0\n");
        assert!(result.is_ok());
        assert!(ruler.is_inconsistent());
    }
}
