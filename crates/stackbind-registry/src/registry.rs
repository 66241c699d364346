//! Registry - collects named functions and constants and installs them.
//!
//! # Installation Model
//!
//! Installation happens once, while the engine is being set up, and
//! tolerates no partial success. [`Registry::install`] therefore runs in
//! two phases:
//!
//! 1. **Validate** every name in the batch against the target
//!    [`Namespace`]: identifier syntax, reserved words, duplicates. All
//!    problems are collected into a single [`RegistrationError`].
//! 2. **Define** every entry, in insertion order, only if validation found
//!    nothing.
//!
//! The configured prefix is the only renaming ever applied.
//!
//! # Duplicates
//!
//! [`DuplicatePolicy::Reject`] (the default) treats a repeated name, or a
//! name already bound in the namespace, as a problem.
//! [`DuplicatePolicy::Replace`] instead lets the last entry win, matching a
//! host whose namespace is a plain key-value store.
//!
//! # Example
//!
//! ```ignore
//! let registry = Registry::with_options(RegistryOptions::new().prefix("ImGui"))
//!     .table(&GUI_TABLE)
//!     .constant("WindowFlags_None", 0);
//! registry.install(&mut state)?;
//! ```

use rustc_hash::FxHashMap;

use stackbind_core::{Callable, DefaultArgs, EntryPoint, Namespace, NativeFn, Value};

use crate::error::{RegistrationError, RegistrationProblem};
use crate::table::RegistrationTable;

/// What to do when a name is registered more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Reject the whole batch.
    #[default]
    Reject,
    /// Keep the last entry and log the replacement.
    Replace,
}

/// Registry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Prepended verbatim to every name at install time.
    pub prefix: String,
    pub duplicates: DuplicatePolicy,
}

impl RegistryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }
}

/// Counts of distinct names a successful install defined.
///
/// A name replaced within the batch counts once, as the kind it ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstallSummary {
    pub functions: usize,
    pub constants: usize,
}

enum Item {
    Function(NativeFn),
    Constant(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemKind {
    Function,
    Constant,
}

impl ItemKind {
    fn as_str(self) -> &'static str {
        match self {
            ItemKind::Function => "function",
            ItemKind::Constant => "constant",
        }
    }
}

impl Item {
    fn kind(&self) -> ItemKind {
        match self {
            Item::Function(_) => ItemKind::Function,
            Item::Constant(_) => ItemKind::Constant,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Item::Function(function) => Value::Function(function),
            Item::Constant(value) => Value::Integer(value),
        }
    }
}

/// A batch of named functions and constants awaiting installation.
#[derive(Default)]
pub struct Registry {
    options: RegistryOptions,
    entries: Vec<(String, Item)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            options,
            entries: Vec::new(),
        }
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    // ==========================================================================
    // Building
    // ==========================================================================

    /// Add every function and constant of a static table.
    pub fn table(mut self, table: &RegistrationTable) -> Self {
        for &(name, entry) in table.functions {
            self.push(name, Item::Function(NativeFn::from_entry(entry)));
        }
        for &(name, value) in table.constants {
            self.push(name, Item::Constant(value));
        }
        self
    }

    /// Add a static entry point.
    pub fn entry(mut self, name: impl Into<String>, entry: EntryPoint) -> Self {
        self.push(name, Item::Function(NativeFn::from_entry(entry)));
        self
    }

    /// Add an already type-erased function.
    pub fn native(mut self, name: impl Into<String>, function: NativeFn) -> Self {
        self.push(name, Item::Function(function));
        self
    }

    /// Add a typed Rust function; every parameter is required.
    pub fn function<F, Args>(self, name: impl Into<String>, function: F) -> Self
    where
        F: Callable<Args> + 'static,
        (): DefaultArgs<Args>,
        Args: 'static,
    {
        self.native(name, NativeFn::wrap(function))
    }

    /// Add a typed Rust function whose trailing parameters have defaults.
    pub fn function_with_defaults<F, D, Args>(
        self,
        name: impl Into<String>,
        function: F,
        defaults: D,
    ) -> Self
    where
        F: Callable<Args> + 'static,
        D: DefaultArgs<Args> + 'static,
        Args: 'static,
    {
        self.native(name, NativeFn::with_defaults(function, defaults))
    }

    /// Add an integer constant.
    pub fn constant(mut self, name: impl Into<String>, value: i64) -> Self {
        self.push(name, Item::Constant(value));
        self
    }

    /// Append another registry's entries. `self`'s options apply to all of them.
    pub fn merge(mut self, other: Registry) -> Self {
        self.entries.extend(other.entries);
        self
    }

    fn push(&mut self, name: impl Into<String>, item: Item) {
        self.entries.push((name.into(), item));
    }

    // ==========================================================================
    // Inspection
    // ==========================================================================

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names as they will be installed, prefix included.
    pub fn names(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|(name, _)| self.qualify(name))
    }

    fn qualify(&self, name: &str) -> String {
        format!("{}{}", self.options.prefix, name)
    }

    // ==========================================================================
    // Installation
    // ==========================================================================

    /// Check the batch against `namespace` without installing anything.
    pub fn validate(&self, namespace: &impl Namespace) -> Result<(), RegistrationError> {
        let mut problems = Vec::new();
        let mut seen: FxHashMap<String, usize> = FxHashMap::default();
        let mut order = Vec::new();

        for (name, _) in &self.entries {
            let qualified = self.qualify(name);
            let count = seen.entry(qualified.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                order.push(qualified);
            }
        }

        for name in order {
            if !is_identifier(&name) {
                problems.push(RegistrationProblem::InvalidName { name });
                continue;
            }
            if namespace.is_reserved(&name) {
                problems.push(RegistrationProblem::Reserved { name });
                continue;
            }
            if self.options.duplicates == DuplicatePolicy::Reject {
                let count = seen.get(&name).copied().unwrap_or(0);
                if count > 1 {
                    problems.push(RegistrationProblem::Duplicate { name, count });
                } else if namespace.contains(&name) {
                    problems.push(RegistrationProblem::AlreadyDefined { name });
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(RegistrationError::Rejected { problems })
        }
    }

    /// Validate the whole batch, then define every entry in `namespace`.
    ///
    /// On error nothing has been defined.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn install(
        self,
        namespace: &mut impl Namespace,
    ) -> Result<InstallSummary, RegistrationError> {
        if let Err(err) = self.validate(&*namespace) {
            tracing::warn!(problems = err.problems().len(), error = %err, "registration rejected");
            return Err(err);
        }

        let mut defined: FxHashMap<String, ItemKind> = FxHashMap::default();

        for (name, item) in self.entries {
            let qualified = format!("{}{}", self.options.prefix, name);
            let kind = item.kind();

            if let Some(previous) = defined.insert(qualified.clone(), kind) {
                tracing::warn!(
                    name = %qualified,
                    previous = previous.as_str(),
                    replacement = kind.as_str(),
                    "replacing registered name"
                );
            } else if namespace.contains(&qualified) {
                tracing::warn!(name = %qualified, "replacing existing global");
            }

            tracing::trace!(name = %qualified, kind = kind.as_str(), "defined");
            namespace.define(&qualified, item.into_value());
        }

        let mut summary = InstallSummary::default();
        for kind in defined.values() {
            match kind {
                ItemKind::Function => summary.functions += 1,
                ItemKind::Constant => summary.constants += 1,
            }
        }

        tracing::info!(
            functions = summary.functions,
            constants = summary.constants,
            prefix = %self.options.prefix,
            "registry installed"
        );
        Ok(summary)
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() || first == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use stackbind_core::{CallFrame, NativeError, State};

    use super::*;

    fn noop(_frame: &mut CallFrame<'_>) -> Result<usize, NativeError> {
        Ok(0)
    }

    const TABLE: RegistrationTable =
        RegistrationTable::new(&[("noop", noop as EntryPoint)], &[("ANSWER", 42)]);

    #[test]
    fn identifiers() {
        assert!(is_identifier("ImGuiBegin"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("a1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1a"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("a b"));
    }

    #[test]
    fn installs_table_entries() {
        let mut state = State::new();
        let summary = Registry::new().table(&TABLE).install(&mut state).unwrap();
        assert_eq!(
            summary,
            InstallSummary {
                functions: 1,
                constants: 1
            }
        );
        assert_eq!(state.global("ANSWER"), Value::Integer(42));
        assert!(state.global("noop").as_function().is_some());
    }

    #[test]
    fn prefix_is_applied_verbatim() {
        let mut state = State::new();
        Registry::with_options(RegistryOptions::new().prefix("Gui"))
            .table(&TABLE)
            .install(&mut state)
            .unwrap();
        assert!(state.global("Guinoop").as_function().is_some());
        assert_eq!(state.global("GuiANSWER"), Value::Integer(42));
        assert!(state.global("noop").is_nil());
    }

    #[test]
    fn reserved_names_reject_the_batch() {
        let mut state = State::new();
        let err = Registry::new()
            .table(&TABLE)
            .constant("end", 1)
            .install(&mut state)
            .unwrap_err();
        assert_eq!(
            err.problems(),
            &[RegistrationProblem::Reserved { name: "end".into() }]
        );
        assert!(state.global("noop").is_nil());
        assert!(state.global("ANSWER").is_nil());
    }

    #[test]
    fn all_problems_are_reported_together() {
        let state = State::new();
        let err = Registry::new()
            .constant("while", 1)
            .constant("bad name", 2)
            .constant("dup", 3)
            .constant("dup", 4)
            .validate(&state)
            .unwrap_err();
        assert_eq!(
            err.problems(),
            &[
                RegistrationProblem::Reserved {
                    name: "while".into()
                },
                RegistrationProblem::InvalidName {
                    name: "bad name".into()
                },
                RegistrationProblem::Duplicate {
                    name: "dup".into(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn duplicates_rejected_by_default() {
        let mut state = State::new();
        let err = Registry::new()
            .entry("noop", noop)
            .table(&TABLE)
            .install(&mut state)
            .unwrap_err();
        assert!(matches!(
            err.problems(),
            [RegistrationProblem::Duplicate { count: 2, .. }]
        ));
    }

    #[test]
    fn existing_globals_rejected_by_default() {
        let mut state = State::new();
        state.set_global("ANSWER", Value::Integer(0));
        let err = Registry::new().table(&TABLE).install(&mut state).unwrap_err();
        assert_eq!(
            err.problems(),
            &[RegistrationProblem::AlreadyDefined {
                name: "ANSWER".into()
            }]
        );
        assert_eq!(state.global("ANSWER"), Value::Integer(0));
    }

    #[test]
    fn replace_policy_keeps_last_entry() {
        let mut state = State::new();
        let options = RegistryOptions::new().duplicates(DuplicatePolicy::Replace);
        let summary = Registry::with_options(options)
            .constant("x", 1)
            .constant("x", 2)
            .install(&mut state)
            .unwrap();
        assert_eq!(summary, InstallSummary { functions: 0, constants: 1 });
        assert_eq!(state.global("x"), Value::Integer(2));
    }

    #[test]
    fn replaced_name_counts_as_its_final_kind() {
        let mut state = State::new();
        let options = RegistryOptions::new().duplicates(DuplicatePolicy::Replace);
        let summary = Registry::with_options(options)
            .entry("y", noop)
            .constant("y", 7)
            .table(&TABLE)
            .install(&mut state)
            .unwrap();
        assert_eq!(summary, InstallSummary { functions: 1, constants: 2 });
        assert_eq!(state.global("y"), Value::Integer(7));
    }

    #[test]
    fn generic_functions_are_wrapped() {
        let mut state = State::new();
        Registry::new()
            .function("neg", |x: i64| -x)
            .function_with_defaults("scale", |x: f64, by: f64| x * by, (2.0,))
            .install(&mut state)
            .unwrap();
        assert_eq!(
            state.call("neg", &[Value::Integer(3)]).unwrap(),
            vec![Value::Integer(-3)]
        );
        assert_eq!(
            state.call("scale", &[Value::Number(1.5)]).unwrap(),
            vec![Value::Number(3.0)]
        );
    }

    #[test]
    fn merge_applies_outer_options() {
        let inner = Registry::new().constant("ONE", 1);
        let outer = Registry::with_options(RegistryOptions::new().prefix("m_")).merge(inner);
        assert_eq!(outer.names().collect::<Vec<_>>(), vec!["m_ONE".to_string()]);
    }

    #[test]
    fn empty_registry_installs_nothing() {
        let mut state = State::new();
        let summary = Registry::new().install(&mut state).unwrap();
        assert_eq!(summary, InstallSummary::default());
        assert_eq!(state.globals().count(), 0);
    }
}
