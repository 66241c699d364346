//! Registration tables and batch installation for stackbind.
//!
//! A [`RegistrationTable`] is the static `(name, entry point)` and
//! `(name, integer)` data a function set publishes. A [`Registry`] collects
//! tables and individually wrapped functions, then installs all of them into
//! a [`Namespace`](stackbind_core::Namespace) in one validated pass.

mod error;
mod registry;
mod table;

pub use error::{RegistrationError, RegistrationProblem};
pub use registry::{DuplicatePolicy, InstallSummary, Registry, RegistryOptions};
pub use table::RegistrationTable;
