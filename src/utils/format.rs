//! Human-readable number formatting for log lines and progress output.

/// Scale suffixes, one per power of 1000.
const MILLNAMES: [&str; 5] = ["", "k", "mn", "bn", "tn"];

/// Render a number in compact form: `5000.0` becomes `"5k"`, `1_200_000`
/// becomes `"1mn"`. Values beyond the trillions stay at the `tn` suffix.
pub fn format_compact(num: impl Into<f64>) -> String {
    let num: f64 = num.into();
    let millidx = if num == 0.0 {
        0
    } else {
        ((num.abs().log10() / 3.0).floor() as isize).clamp(0, MILLNAMES.len() as isize - 1)
            as usize
    };
    format!("{:.0}{}", num / 1000f64.powi(3 * millidx as i32), MILLNAMES[millidx])
}
