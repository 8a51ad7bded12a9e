/// Fills interior gaps linearly, using the slice index as the axis.
///
/// Values before the first or after the last known value have a neighbor on
/// one side only and stay `None`, as does a slice with no known value.
pub fn interpolate_linear(values: &mut [Option<f64>]) {
    let mut previous: Option<(usize, f64)> = None;
    for i in 0..values.len() {
        let Some(current) = values[i] else {
            continue;
        };
        if let Some((a, va)) = previous {
            if i - a > 1 {
                let span = (i - a) as f64;
                for (j, slot) in values.iter_mut().enumerate().take(i).skip(a + 1) {
                    *slot = Some(va + (current - va) * (j - a) as f64 / span);
                }
            }
        }
        previous = Some((i, current));
    }
}
