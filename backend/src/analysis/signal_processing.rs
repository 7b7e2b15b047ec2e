//! Signal processing.

use crate::dispatch::{Arguments, CallError, Callable, Parameter};
use crate::models::Value;

use super::statistics::mean_std;

const MODULE: &str = "signal_processing";

pub(super) fn callables() -> Vec<Callable> {
    const SIGNAL: &[Parameter] = &[Parameter::required("signal")];
    vec![Callable::new(MODULE, "zscore", SIGNAL, zscore)]
}

/// Subtract the mean and divide by the standard deviation.
///
/// The result keeps the input's timing and unit, so it can be serialized like
/// any other signal.
fn zscore(args: &mut Arguments) -> Result<Value, CallError> {
    let signal = args.signal("signal")?;
    if signal.is_empty() {
        return Err(CallError::failed("cannot z-score an empty signal"));
    }
    let (mean, std) = mean_std(signal.samples());
    if std == 0.0 {
        return Err(CallError::failed("division by zero: signal has zero variance"));
    }
    let scored = signal.samples().iter().map(|v| (v - mean) / std).collect();
    Ok(Value::Signal(signal.with_samples(scored, signal.unit().clone())))
}
