//! Named directive arguments.

use crate::error::{FilterError, FilterResult};
use crate::value::Value;

/// Ascending ordering token.
pub const ASC: &str = "ASC";
/// Descending ordering token.
pub const DESC: &str = "DESC";

/// A semantic filter directive: a name plus zero or more values.
///
/// An argument without values is a flag: the validator decides the SQL on the
/// name alone. Otherwise the values fill the fragment's `?` placeholders in order.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArg {
    name: String,
    values: Vec<Value>,
}

impl NamedArg {
    /// Create an argument; `Null` values are dropped.
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().filter(|v| !v.is_null()).collect(),
        }
    }

    /// Create a flag argument that carries no values.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Check if this argument carries no values.
    pub fn is_flag(&self) -> bool {
        self.values.is_empty()
    }

    /// Reject a flag given for a name whose fragment binds a value.
    pub fn require_value(&self) -> FilterResult<()> {
        if self.is_flag() {
            return Err(FilterError::argument(&self.name));
        }
        Ok(())
    }

    pub fn first(&self) -> Option<&Value> {
        self.values.first()
    }

    /// The ordering token attached by `order_by`, `ASC` when absent.
    pub fn direction(&self) -> &str {
        match self.first().and_then(Value::as_str) {
            Some(DESC) => DESC,
            _ => ASC,
        }
    }

    /// Duplicate the sole value `n` times, for fragments that repeat one
    /// placeholder value across several positions.
    ///
    /// No-op when `n < 2` or the argument does not hold exactly one value.
    pub fn fan_out(&mut self, n: usize) {
        if n < 2 || self.values.len() != 1 {
            return;
        }
        let v = self.values[0].clone();
        self.values.resize(n, v);
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        self.values
    }
}
