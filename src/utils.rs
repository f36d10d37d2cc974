/// Index of the largest value; the first one wins on ties.
///
/// Returns `None` for an empty sequence.
pub fn argmax<I: IntoIterator<Item = f64>>(values: I) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in values.into_iter().enumerate() {
        match best {
            Some((_, max)) if value <= max || value.is_nan() => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Builds a seeded network from a compact topology description. The last
/// `dense` size is the output layer, the others are hidden layers.
///
/// ```
/// use scalarnet::{network, Activation};
///
/// let net = network!(input_shape 2, dense 3, dense 1;
///     activation Activation::Sigmoid, learning_rate 0.1, seed 7).unwrap();
/// assert_eq!(net.layers().len(), 3);
/// ```
#[macro_export]
macro_rules! network {
    (input_shape $i:expr, $(dense $x:expr),+ ; activation $a:expr, learning_rate $lr:expr, seed $s:expr) => {
        {
            let sizes: Vec<usize> = vec![$($x),*];
            let (hidden, output) = sizes.split_at(sizes.len() - 1);
            let mut builder = $crate::builder::NetworkBuilder::new()
                .with_input_size($i)
                .with_activation($a)
                .with_learning_rate($lr)
                .with_seed($s);
            for &size in hidden {
                builder = builder.with_hidden_layer(size);
            }
            builder.with_output_size(output[0]).build()
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn argmax_prefers_first_maximum() {
        assert_eq!(argmax(vec![0.1, 0.7, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(vec![-3.0, -1.0]), Some(1));
        assert_eq!(argmax(Vec::new()), None);
    }

    #[test]
    fn argmax_skips_nan() {
        assert_eq!(argmax(vec![f64::NAN, 0.5, 0.1]), Some(1));
    }

    #[test]
    fn network_macro_splits_hidden_and_output() {
        let net = network!(input_shape 4, dense 5, dense 3, dense 2;
            activation Activation::Relu, learning_rate 0.05, seed 1)
        .unwrap();
        let sizes: Vec<usize> = net.layers().iter().map(Layer::len).collect();
        assert_eq!(sizes, vec![4, 5, 3, 2]);
        assert_eq!(net.activation(), Activation::Relu);
    }
}
