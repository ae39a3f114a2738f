/*!
Tools for building a ruler.

# Basic methods

The library has two basic methods for building the formula of a ruler:
- [add_clause](crate::ruler::Ruler::add_clause), to add a clause of external literals.
- [read_dimacs](crate::ruler::Ruler::read_dimacs), to add every clause of a DIMACS file.

Variables are implicit: a clause mentioning the external literal `-7` ensures the ruler has at least seven variables.
Duplicate literals are removed, tautologies are ignored, and the empty clause makes the ruler inconsistent.

# Examples

```rust
# use ring_sat::{config::Config, reports::Report, ruler::Ruler};
let mut ruler = Ruler::from_config(Config::default());

assert!(ruler.add_clause(&[1, -2]).is_ok());
assert!(ruler.add_clause(&[-1, 2]).is_ok());
assert!(ruler.add_clause(&[0, 3]).is_err());

assert_eq!(ruler.solve(), Ok(Report::Satisfiable));
assert_eq!(ruler.value_of(1), ruler.value_of(2));
```
*/

mod dimacs;
pub use dimacs::ParserInfo;
