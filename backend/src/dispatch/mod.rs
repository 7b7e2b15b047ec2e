//! Call dispatch.
//!
//! Analysis functions are registered in a [`CallableRegistry`] at startup and
//! invoked through a [`Dispatcher`], which owns the whole per-request round
//! trip and attributes each failure to the stage that caused it.

pub mod callable;
pub mod dispatcher;
pub mod registry;

pub use callable::{Arguments, CallError, CallFn, Callable, Parameter};
pub use dispatcher::{invoke, Dispatcher};
pub use registry::{CallableRegistry, LookupError};
