//! Static registration tables.

use stackbind_core::EntryPoint;

/// Statically enumerated functions and integer constants.
///
/// Tables are plain `const` data, typically built from `#[function]` entry
/// points:
///
/// ```ignore
/// pub const TABLE: RegistrationTable = RegistrationTable::new(
///     &[("floor", entry!(floor)), ("clamp", entry!(clamp))],
///     &[("MAX_INTEGER", i64::MAX)],
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RegistrationTable {
    pub functions: &'static [(&'static str, EntryPoint)],
    pub constants: &'static [(&'static str, i64)],
}

impl RegistrationTable {
    pub const EMPTY: RegistrationTable = RegistrationTable::new(&[], &[]);

    pub const fn new(
        functions: &'static [(&'static str, EntryPoint)],
        constants: &'static [(&'static str, i64)],
    ) -> Self {
        Self {
            functions,
            constants,
        }
    }

    pub const fn len(&self) -> usize {
        self.functions.len() + self.constants.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
