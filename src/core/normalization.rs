/// Linear rescaling of raw feature values, e.g. pixel intensities in
/// `0..=255`, onto the unit interval.
pub trait Normalization {
    fn to_unity(&mut self, lb: f64, ub: f64);
}

impl Normalization for [f64] {
    fn to_unity(&mut self, lb: f64, ub: f64) {
        let range = ub - lb;

        // A degenerate range collapses everything to 0.0
        if range.abs() < f64::EPSILON {
            self.fill(0.0);
        } else {
            for val in self.iter_mut() {
                *val = (*val - lb) / range;
            }
        }
    }
}
