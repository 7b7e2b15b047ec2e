//! Built-in analysis functions exposed through the dispatcher.
//!
//! Each submodule mirrors one Elephant module and contributes its callables
//! to [`builtins`].

mod conversion;
mod signal_processing;
mod spike_train_generation;
mod statistics;

use crate::dispatch::Callable;

pub use conversion::MAX_BINS;

/// Every built-in callable, grouped by module.
pub fn builtins() -> Vec<Callable> {
    [
        conversion::callables(),
        signal_processing::callables(),
        spike_train_generation::callables(),
        statistics::callables(),
    ]
    .into_iter()
    .flatten()
    .collect()
}
