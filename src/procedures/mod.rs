//! Procedures of a solve.
//!
//! For the most part these are methods on a [ring](crate::ring), with those which interact with other rings taking the [ruler](crate::ruler) as an argument.
//! Procedures of the ruler as a whole ([solve], [simplify], [compact], [witness]) are methods on the ruler.
//!
//! A useful starting point is the [search loop](search), which shows when each procedure of a ring is used, and the [lifecycle](clone) of a ring around the search loop.

pub mod analysis;
pub mod assign;
pub mod backjump;
pub mod decision;
pub mod minimize;
pub mod propagate;

pub mod mode;
pub mod reduce;
pub mod rephase;
pub mod restart;

pub mod fail;
pub mod probe;
pub mod vivify;

pub mod export;
pub mod external;
pub mod import;

pub mod clone;
pub mod compact;
pub mod search;
pub mod simplify;
pub mod solve;
pub mod witness;
