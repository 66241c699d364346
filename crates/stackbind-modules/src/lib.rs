//! Ready-made function sets for scripts.
//!
//! - **math** - numeric helpers, vectors and integer limits
//! - **string** - byte string and text helpers
//!
//! Each module publishes a static [`RegistrationTable`] of `#[function]`
//! entry points and a `registry()` that adds generically wrapped functions
//! on top of it:
//!
//! ```ignore
//! use stackbind_modules::{math, string};
//!
//! let mut state = State::new();
//! math::registry().merge(string::registry()).install(&mut state)?;
//! ```
//!
//! [`RegistrationTable`]: stackbind_registry::RegistrationTable

pub mod math;
pub mod string;

pub use math::{MathError, Vec2};
pub use string::StringError;
