//! Binning of spike trains.

use serde_json::Value as JsonValue;

use crate::dispatch::{Arguments, CallError, Callable, Parameter};
use crate::models::Value;
use crate::units::Quantity;

const MODULE: &str = "conversion";

/// Slack, in bins, when deciding whether the window is a whole number of bins.
const BIN_TOLERANCE: f64 = 1e-8;

/// Largest number of bins a single call may produce. Each bin costs an edge
/// and a counter, so this caps one call at roughly 160 MB.
pub const MAX_BINS: usize = 10_000_000;

pub(super) fn callables() -> Vec<Callable> {
    const BINNED: &[Parameter] = &[
        Parameter::required("spiketrain"),
        Parameter::required("bin_size"),
        Parameter::optional("t_start"),
        Parameter::optional("t_stop"),
    ];
    vec![Callable::new(MODULE, "binned_spiketrain", BINNED, binned_spiketrain)]
}

/// Count events in consecutive bins of `bin_size`.
///
/// The window runs from `t_start` to `t_stop` (the train's own bounds when
/// not given) and is widened to a whole number of bins, so the returned train
/// carries the stop of the last bin.
fn binned_spiketrain(args: &mut Arguments) -> Result<Value, CallError> {
    let train = args.event_train("spiketrain")?;
    let unit = train.unit().clone();
    let in_train_unit = |q: Quantity| -> Result<f64, CallError> {
        q.rescale(&unit)?
            .value()
            .ok_or_else(|| CallError::failed("bin_size, t_start and t_stop must be scalars"))
    };

    let bin_size = in_train_unit(args.quantity("bin_size")?)?;
    if !(bin_size.is_finite() && bin_size > 0.0) {
        return Err(CallError::failed(format!("bin_size must be positive, got {}", bin_size)));
    }
    let t_start = match args.optional_quantity("t_start")? {
        Some(q) => in_train_unit(q)?,
        None => train.t_start(),
    };
    let t_stop = match args.optional_quantity("t_stop")? {
        Some(q) => in_train_unit(q)?,
        None => train.t_stop(),
    };
    if t_stop < t_start {
        return Err(CallError::failed(format!(
            "t_stop ({}) is before t_start ({})",
            t_stop, t_start
        )));
    }

    let span = (t_stop - t_start) / bin_size;
    if !span.is_finite() {
        return Err(CallError::failed(format!(
            "window [{}, {}] with bin_size {} does not give a finite number of bins",
            t_start, t_stop, bin_size
        )));
    }
    let whole_bins = if (span - span.round()).abs() < BIN_TOLERANCE {
        span.round()
    } else {
        span.ceil()
    };
    if whole_bins > MAX_BINS as f64 {
        return Err(CallError::failed(format!(
            "window needs {} bins, more than the limit of {}",
            whole_bins, MAX_BINS
        )));
    }
    let n_bins = (whole_bins as usize).max(1);

    let edges: Vec<f64> = (0..=n_bins).map(|i| t_start + i as f64 * bin_size).collect();
    let last_edge = edges[n_bins];

    let mut counts = vec![0u64; n_bins];
    for &t in train.times() {
        if t < t_start || t >= last_edge {
            continue;
        }
        let index = (((t - t_start) / bin_size).floor() as usize).min(n_bins - 1);
        counts[index] += 1;
    }

    Ok(Value::map([
        ("spiketrain", Value::EventTrain(train.with_t_stop(last_edge))),
        ("bin_size", Value::Quantity(Quantity::new(bin_size, unit.clone()))),
        ("bin_edges", Value::Quantity(Quantity::new(edges, unit))),
        ("counts", Value::Json(JsonValue::from(counts))),
        ("n_bins", Value::Json(JsonValue::from(n_bins))),
    ]))
}
