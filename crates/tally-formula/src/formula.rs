//! Formulas: expression templates with free variables
//!
//! A [`Formula`] keeps its text, the variables found in it and their bindings
//! together in one immutable [`FormulaState`]. Every mutation builds a new
//! state from a copy and swaps it in under the formula's write lock, so
//! readers always see a consistent text/variables/bindings triple.

use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::EvaluationOptions;
use crate::expression::Expression;
use crate::text::TextEditable;
use crate::variables::{is_variable, retokenize_variables, substitute, Bindings};
use ahash::AHashSet;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use tally_core::BigDecimal;
use tracing::debug;

/// One consistent view of a formula
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaState {
    text: String,
    variables: AHashSet<String>,
    bindings: Bindings,
}

impl FormulaState {
    fn from_text(text: String, previous: &Bindings) -> Self {
        let (variables, bindings) = retokenize_variables(&text, previous);
        Self {
            text,
            variables,
            bindings,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every tracked variable, including names that cannot be bound
    pub fn variables(&self) -> impl Iterator<Item = &str> + '_ {
        self.variables.iter().map(String::as_str)
    }

    /// Variables paired with their bound values
    pub fn bindings(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.bindings
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// Whether `name` is a shape-valid variable of this formula
    pub fn contains_variable(&self, name: &str) -> bool {
        is_variable(name) && self.variables.contains(name)
    }

    /// Bound value of `name`, `None` while unset
    pub fn value(&self, name: &str) -> FormulaResult<Option<&str>> {
        if !self.contains_variable(name) {
            return Err(FormulaError::UnknownVariable(name.to_string()));
        }
        Ok(self.bindings.get(name).and_then(|value| value.as_deref()))
    }

    /// Substitute bound values into the text
    pub fn expression(&self) -> Expression {
        Expression::from(substitute(&self.text, &self.bindings))
    }
}

/// Editable formula with live variable tracking
///
/// Edits go through [`TextEditable`], implemented for both `Formula` and
/// `&Formula`, so a formula shared between threads can be edited in place.
///
/// # Example
/// ```rust
/// use tally_formula::{BigDecimal, Formula, TextEditable};
///
/// let formula = Formula::from("x^2 + y");
/// formula.define_variable("x", 3).unwrap();
/// assert_eq!(formula.expression().to_string(), "3^2 + y");
///
/// let mut editor = &formula;
/// editor.replace_char(6, 'x').unwrap();
/// assert_eq!(formula.evaluate().unwrap(), BigDecimal::from(12));
/// ```
pub struct Formula {
    state: RwLock<Arc<FormulaState>>,
}

impl Formula {
    /// Create an empty formula
    pub fn new() -> Self {
        Self::from_state(FormulaState::default())
    }

    fn from_state(state: FormulaState) -> Self {
        Self {
            state: RwLock::new(Arc::new(state)),
        }
    }

    /// Current state; later edits never change a snapshot already handed out
    pub fn snapshot(&self) -> Arc<FormulaState> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // The state is only ever replaced wholesale, so a poisoned lock still guards a
    // consistent value.
    fn lock(&self) -> RwLockWriteGuard<'_, Arc<FormulaState>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn text(&self) -> String {
        self.snapshot().text.clone()
    }

    /// Sorted copy of the tracked variables
    pub fn variables(&self) -> BTreeSet<String> {
        self.snapshot().variables.iter().cloned().collect()
    }

    /// Sorted copy of the bindings
    pub fn values(&self) -> BTreeMap<String, Option<String>> {
        self.snapshot()
            .bindings
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn contains_variable(&self, name: &str) -> bool {
        self.snapshot().contains_variable(name)
    }

    /// Bound value of `name`, `None` while unset
    ///
    /// Fails with [`FormulaError::UnknownVariable`] unless `name` is a
    /// shape-valid variable of the formula.
    pub fn value(&self, name: &str) -> FormulaResult<Option<String>> {
        self.snapshot().value(name).map(|value| value.map(str::to_string))
    }

    /// Bind `name` to the text of `value`, replacing any earlier binding
    ///
    /// Returns the formula so definitions can be chained.
    pub fn define_variable<V: fmt::Display>(&self, name: &str, value: V) -> FormulaResult<&Self> {
        let mut guard = self.lock();
        if !guard.contains_variable(name) {
            return Err(FormulaError::UnknownVariable(name.to_string()));
        }

        let value = value.to_string();
        debug!(variable = name, value = %value, "bound variable");

        let mut state = FormulaState::clone(&guard);
        state.bindings.insert(name.to_string(), Some(value));
        *guard = Arc::new(state);
        Ok(self)
    }

    /// Substitute bound values into a new expression; the formula is unchanged
    pub fn expression(&self) -> Expression {
        self.snapshot().expression()
    }

    /// Substitute and evaluate with default options
    pub fn evaluate(&self) -> FormulaResult<BigDecimal> {
        self.expression().evaluate()
    }

    pub fn evaluate_with(&self, options: &EvaluationOptions) -> FormulaResult<BigDecimal> {
        self.expression().evaluate_with(options)
    }

    /// Apply a text edit and re-derive the variables, all under the write lock
    fn edit<F>(&self, edit: F) -> FormulaResult<()>
    where
        F: FnOnce(&mut String) -> FormulaResult<()>,
    {
        let mut guard = self.lock();
        let mut draft = guard.text.clone();
        edit(&mut draft)?;

        if draft != guard.text {
            *guard = Arc::new(FormulaState::from_text(draft, &guard.bindings));
        }
        Ok(())
    }
}

impl Default for Formula {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones are independent formulas starting from the same state
impl Clone for Formula {
    fn clone(&self) -> Self {
        Self {
            state: RwLock::new(self.snapshot()),
        }
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formula")
            .field("state", &self.snapshot())
            .finish()
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.snapshot().text())
    }
}

impl From<&str> for Formula {
    fn from(text: &str) -> Self {
        Self::from_state(FormulaState::from_text(text.to_string(), &Bindings::new()))
    }
}

impl From<String> for Formula {
    fn from(text: String) -> Self {
        Self::from_state(FormulaState::from_text(text, &Bindings::new()))
    }
}

impl TextEditable for Formula {
    fn text(&self) -> String {
        Formula::text(self)
    }

    fn modify<F>(&mut self, edit: F) -> FormulaResult<()>
    where
        F: FnOnce(&mut String) -> FormulaResult<()>,
    {
        self.edit(edit)
    }
}

impl TextEditable for &Formula {
    fn text(&self) -> String {
        Formula::text(self)
    }

    fn modify<F>(&mut self, edit: F) -> FormulaResult<()>
    where
        F: FnOnce(&mut String) -> FormulaResult<()>,
    {
        self.edit(edit)
    }
}
