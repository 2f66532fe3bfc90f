//! # zyk-core: Branch Parameter Derivation for Distribution Networks
//!
//! Derives validated per-unit-length electrical parameters for power-network
//! branches. Lines get a series impedance matrix (Ω/km) and a shunt
//! admittance matrix (S/km); transformers get the equivalent-circuit triple
//! `(z2, ym, k)` plus a winding orientation sign. The resulting value
//! objects are the quantitative input of an external load-flow solver; this
//! crate performs no iteration, no topology handling and no I/O.
//!
//! ## Design Philosophy
//!
//! Every derivation is a **pure function over immutable inputs** that ends
//! in the same place: a validated, immutable value object. Matrices that
//! violate the passivity or reactive-coupling invariants never leave a
//! constructor, and deserialized documents pass through the same checks as
//! freshly derived ones.
//!
//! Three paths produce line parameters:
//! - **sequence conversion** from zero/direct-sequence catalogue data, with
//!   an ordered list of fallback derivations for degenerate vendor exports;
//! - the **geometric model**, computing all 4×4 matrices from the physical
//!   conductor layout via image-conductor electrostatics;
//! - **raw matrices** from a catalogue row or vendor file.
//!
//! Transformer parameters come from open-circuit and short-circuit factory
//! tests plus a vector-group code such as `Dyn11`.
//!
//! ## Quick Start
//!
//! ```rust
//! use zyk_core::units::{OhmsPerKilometer, SiemensPerKilometer, PerUnit, VoltAmperes, Volts, Watts};
//! use zyk_core::{LineParameters, SequenceData, TransformerParameters, ZykResult};
//!
//! fn main() -> ZykResult<()> {
//!     // a line from sequence data
//!     let line = LineParameters::from_sym(
//!         "lv_feeder",
//!         &SequenceData {
//!             r0: OhmsPerKilometer(0.2),
//!             x0: OhmsPerKilometer(0.6),
//!             r1: OhmsPerKilometer(0.2),
//!             x1: OhmsPerKilometer(0.1),
//!             b0: SiemensPerKilometer(1e-6),
//!             b1: SiemensPerKilometer(4e-6),
//!             ..SequenceData::default()
//!         },
//!         None,
//!     )?;
//!     assert_eq!(line.order(), 3);
//!
//!     // a line straight from its canonical catalogue name
//!     let cable = LineParameters::from_name("U_AL_150")?;
//!     assert_eq!(cable.order(), 4);
//!
//!     // a transformer from factory test data
//!     let transformer = TransformerParameters::new(
//!         "t_160kva",
//!         VoltAmperes(160_000.0),
//!         Volts(20_000.0),
//!         Volts(400.0),
//!         Watts(460.0),
//!         PerUnit(0.023),
//!         Watts(2350.0),
//!         PerUnit(0.04),
//!         "Dyn11",
//!     )?;
//!     assert_eq!(transformer.orientation(), 1.0);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`line`] - line parameter value objects and their derivations
//! - [`transformer`] - transformer parameters and the vector-group codec
//! - [`constants`] - physical constants and material/insulator tables
//! - [`matrix`] - small dense complex matrices and their serialization
//! - [`units`] - newtype quantities used at the API boundary
//! - [`error`] - the crate-wide error type
//!
//! ## Concurrency
//!
//! Nothing here blocks, suspends or shares mutable state. All constant
//! tables are read-only process-wide data, so every derivation is safely
//! callable from any number of threads without synchronization.

pub mod constants;
pub mod error;
pub mod line;
pub mod matrix;
pub mod transformer;
pub mod units;

pub use constants::{Insulator, LineType, Material, EPSILON_0, FREQUENCY, MU_0, OMEGA};
pub use error::{ZykError, ZykResult};
pub use line::{
    check_line_matrices, CanonicalName, LineDerivation, LineModel, LineParameters,
    NeutralSequence, SequenceData,
};
pub use matrix::SquareMatrix;
pub use transformer::{phase_shift, TransformerParameters, VectorGroup};
