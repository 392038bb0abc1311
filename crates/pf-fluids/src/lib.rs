//! pf-fluids: fluid property providers for pipeline flow calculations.
//!
//! The solver never talks to a thermodynamic library directly. It asks a
//! [`FluidModel`] for density, viscosity, compressibility factor and molecular
//! weight at a sampling point and gets back a fresh [`FluidState`].
//!
//! Providers:
//! - [`CoolPropModel`]: real-fluid properties through rfluids/CoolProp
//! - [`IdealGasModel`]: ideal gas with a fixed compressibility factor
//! - [`ConstantPropertyModel`]: incompressible liquid with fixed properties
//!
//! The latter two are deterministic and used heavily in tests.

pub mod constant;
pub mod coolprop;
pub mod error;
pub mod ideal_gas;
pub mod model;
pub mod species;
pub mod state;

pub use constant::ConstantPropertyModel;
pub use coolprop::CoolPropModel;
pub use error::{FluidError, FluidResult};
pub use ideal_gas::IdealGasModel;
pub use model::FluidModel;
pub use species::Species;
pub use state::{FluidProperties, FluidState, Phase};
