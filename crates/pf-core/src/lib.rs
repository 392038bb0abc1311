//! pf-core: stable foundation for pipeflow.
//!
//! Contains:
//! - units (uom SI types + constructors, oilfield unit conversions)
//! - quantity (unit-tagged value parsing into SI)
//! - numeric (Real + tolerances + float helpers)
//! - roots (bounded scalar Newton iteration)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod quantity;
pub mod roots;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PfError, PfResult};
pub use numeric::*;
pub use quantity::{QuantityKind, UnitError, convert_from_si, convert_to_si, parse_quantity};
pub use roots::{NewtonConfig, NewtonOutcome, newton_scalar};
pub use units::*;
