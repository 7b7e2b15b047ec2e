//! Typed descriptors for analysis functions.

use log::warn;

use crate::models::{ContinuousSignal, EventTrain, Kwargs, ModelError, Value};
use crate::units::{Quantity, UnitError};

/// Error raised by an analysis function or while binding its arguments.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CallError {
    #[error("{function}() missing required argument '{name}'")]
    MissingArgument { function: String, name: String },

    #[error("{function}() got an unexpected keyword argument '{name}'")]
    UnexpectedArgument { function: String, name: String },

    #[error("argument '{name}' must be {expected}, got {found}")]
    WrongType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    Failed(String),
}

impl CallError {
    pub fn failed(message: impl Into<String>) -> Self {
        CallError::Failed(message.into())
    }
}

impl From<UnitError> for CallError {
    fn from(err: UnitError) -> Self {
        CallError::Failed(err.to_string())
    }
}

impl From<ModelError> for CallError {
    fn from(err: ModelError) -> Self {
        CallError::Failed(err.to_string())
    }
}

/// Function body of a registered callable.
pub type CallFn = fn(&mut Arguments) -> Result<Value, CallError>;

/// A declared keyword parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub required: bool,
}

impl Parameter {
    pub const fn required(name: &'static str) -> Self {
        Self { name, required: true }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self { name, required: false }
    }
}

/// A statically registered analysis function.
#[derive(Debug, Clone)]
pub struct Callable {
    module: &'static str,
    name: &'static str,
    parameters: &'static [Parameter],
    func: CallFn,
}

impl Callable {
    pub const fn new(
        module: &'static str,
        name: &'static str,
        parameters: &'static [Parameter],
        func: CallFn,
    ) -> Self {
        Self {
            module,
            name,
            parameters,
            func,
        }
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parameters(&self) -> &'static [Parameter] {
        self.parameters
    }

    /// Whether `name` is one of the declared parameters.
    pub fn accepts(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    /// Bind `kwargs` against the declared parameters and run the function.
    pub fn call(&self, kwargs: Kwargs) -> Result<Value, CallError> {
        if let Some(name) = kwargs.keys().find(|name| !self.accepts(name)) {
            return Err(CallError::UnexpectedArgument {
                function: self.name.to_string(),
                name: name.clone(),
            });
        }
        if let Some(param) = self
            .parameters
            .iter()
            .find(|p| p.required && !kwargs.contains_key(p.name))
        {
            return Err(CallError::MissingArgument {
                function: self.name.to_string(),
                name: param.name.to_string(),
            });
        }
        let mut args = Arguments::new(kwargs);
        (self.func)(&mut args).inspect_err(|e| warn!("{}.{} failed: {}", self.module, self.name, e))
    }
}

/// Bound keyword arguments with typed accessors.
///
/// Accessors move the value out, so each argument is read at most once.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Kwargs,
}

impl Arguments {
    pub fn new(values: Kwargs) -> Self {
        Self { values }
    }

    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    fn required(&mut self, name: &str) -> Result<Value, CallError> {
        self.take(name).ok_or_else(|| CallError::failed(format!("missing argument '{}'", name)))
    }

    pub fn event_train(&mut self, name: &str) -> Result<EventTrain, CallError> {
        match self.required(name)? {
            Value::EventTrain(train) => Ok(train),
            other => Err(wrong_type(name, "a spike train", &other)),
        }
    }

    pub fn event_trains(&mut self, name: &str) -> Result<Vec<EventTrain>, CallError> {
        match self.required(name)? {
            Value::List(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::EventTrain(train) => Ok(train),
                    other => Err(wrong_type(name, "a list of spike trains", &other)),
                })
                .collect(),
            other => Err(wrong_type(name, "a list of spike trains", &other)),
        }
    }

    pub fn signal(&mut self, name: &str) -> Result<ContinuousSignal, CallError> {
        match self.required(name)? {
            Value::Signal(signal) => Ok(signal),
            other => Err(wrong_type(name, "a signal", &other)),
        }
    }

    pub fn quantity(&mut self, name: &str) -> Result<Quantity, CallError> {
        match self.required(name)? {
            Value::Quantity(q) => Ok(q),
            other => Err(wrong_type(name, "a quantity", &other)),
        }
    }

    pub fn optional_quantity(&mut self, name: &str) -> Result<Option<Quantity>, CallError> {
        match self.take(name) {
            None | Some(Value::Json(serde_json::Value::Null)) => Ok(None),
            Some(Value::Quantity(q)) => Ok(Some(q)),
            Some(other) => Err(wrong_type(name, "a quantity", &other)),
        }
    }

    /// A plain number, or a quantity's magnitude when `name` came with units.
    pub fn optional_value(&mut self, name: &str) -> Result<Option<Value>, CallError> {
        match self.take(name) {
            None | Some(Value::Json(serde_json::Value::Null)) => Ok(None),
            Some(v @ Value::Quantity(_)) => Ok(Some(v)),
            Some(v) if v.as_f64().is_some() => Ok(Some(v)),
            Some(other) => Err(wrong_type(name, "a number or a quantity", &other)),
        }
    }

    pub fn optional_str(&mut self, name: &str) -> Result<Option<String>, CallError> {
        match self.take(name) {
            None | Some(Value::Json(serde_json::Value::Null)) => Ok(None),
            Some(Value::Json(serde_json::Value::String(s))) => Ok(Some(s)),
            Some(other) => Err(wrong_type(name, "a string", &other)),
        }
    }
}

fn wrong_type(name: &str, expected: &'static str, found: &Value) -> CallError {
    CallError::WrongType {
        name: name.to_string(),
        expected,
        found: found.kind(),
    }
}
