//! Saving and loading the layer chain.
//!
//! The text format stores every layer as a JSON array of neurons followed by
//! the [`LAYER_DELIMITER`] marker, input layer first. The binary format is a
//! bincode snapshot of the same layer sequence. Neither stores the
//! activation, loss or learning rate.

use crate::core::layers::check_chain;
use crate::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

pub const LAYER_DELIMITER: &str = "NewLayer";

pub fn encode_layers(layers: &[Layer]) -> Result<String> {
    let mut out = String::new();
    for layer in layers {
        let json = serde_json::to_string(&layer.neurons).map_err(|e| {
            NNError::ConfigurationError(format!("cannot encode layer: {}", e))
        })?;
        out.push_str(&json);
        out.push_str(LAYER_DELIMITER);
    }
    Ok(out)
}

pub fn decode_layers(content: &str) -> Result<Vec<Layer>> {
    let layers = content
        .split(LAYER_DELIMITER)
        .filter(|segment| !segment.trim().is_empty())
        .enumerate()
        .map(|(idx, segment)| {
            serde_json::from_str::<Vec<Neuron>>(segment)
                .map(Layer::new)
                .map_err(|e| {
                    NNError::MalformedPersistedState(format!("layer {}: {}", idx, e))
                })
        })
        .collect::<Result<Vec<Layer>>>()?;

    check_chain(&layers).map_err(NNError::MalformedPersistedState)?;
    Ok(layers)
}

pub fn save_layers<P: AsRef<Path>>(layers: &[Layer], path: P) -> Result<()> {
    let encoded = encode_layers(layers)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(encoded.as_bytes())?;
    writer.flush()?;
    Ok(())
}

pub fn load_layers<P: AsRef<Path>>(path: P) -> Result<Vec<Layer>> {
    let mut content = String::new();
    File::open(path)?.read_to_string(&mut content)?;
    decode_layers(&content)
}

pub fn save_binary<P: AsRef<Path>>(layers: &[Layer], path: P) -> Result<()> {
    let encoded: Vec<u8> = bincode::serialize(layers)?;
    File::create(path)?.write_all(&encoded)?;
    Ok(())
}

pub fn load_binary<P: AsRef<Path>>(path: P) -> Result<Vec<Layer>> {
    let mut buffer = Vec::new();
    File::open(path)?.read_to_end(&mut buffer)?;

    let layers: Vec<Layer> = bincode::deserialize(&buffer)
        .map_err(|e| NNError::MalformedPersistedState(e.to_string()))?;
    check_chain(&layers).map_err(NNError::MalformedPersistedState)?;
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layers() -> Vec<Layer> {
        vec![
            Layer::input(2),
            Layer::new(vec![
                Neuron::with_values(&[0.125, -2.5], 0.5),
                Neuron::with_values(&[1e-300, 3.0], -0.75),
            ]),
            Layer::new(vec![Neuron::with_values(&[0.1, 0.2], 0.3)]),
        ]
    }

    #[test]
    fn text_layout_uses_delimiter() {
        let text = encode_layers(&layers()).unwrap();
        assert_eq!(text.matches(LAYER_DELIMITER).count(), 3);
        assert!(text.ends_with(LAYER_DELIMITER));
        assert!(text.starts_with(r#"[{"activation":0.0,"weights":null,"bias":null}"#));
    }

    #[test]
    fn text_round_trip() {
        let original = layers();
        let decoded = decode_layers(&encode_layers(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn non_finite_activations_are_written_as_zero() {
        let mut overflowed = layers();
        overflowed[1].neurons[0].activation = f64::INFINITY;
        overflowed[2].neurons[0].activation = f64::NAN;
        let text = encode_layers(&overflowed).unwrap();
        assert!(!text.contains("null,\"weights\""));

        let decoded = decode_layers(&text).unwrap();
        assert_eq!(decoded[1].neurons[0].activation, 0.0);
        assert_eq!(decoded[2].neurons[0].activation, 0.0);
        assert_eq!(decoded[1].neurons[0].weights, overflowed[1].neurons[0].weights);
        assert_eq!(decoded[2].neurons[0].bias, overflowed[2].neurons[0].bias);
    }

    #[test]
    fn pascal_case_keys_are_accepted() {
        let text = concat!(
            r#"[{"Activation":0.0,"WeightsVector":null,"Bias":null}]NewLayer"#,
            r#"[{"Activation":0.5,"WeightsVector":[{"Value":0.25,"TempGradient":0.0,"IsOptimized":false}],"#,
            r#""Bias":{"Value":-1.5,"TempGradient":0.0,"IsOptimized":false}}]NewLayer"#,
        );
        let decoded = decode_layers(text).unwrap();
        assert_eq!(decoded.len(), 2);
        let expected = Neuron {
            activation: 0.5,
            weights: Some(vec![Parameter::new(0.25)]),
            bias: Some(Parameter::new(-1.5)),
        };
        assert_eq!(decoded[1].neurons[0], expected);
    }

    #[test]
    fn trailing_whitespace_is_ignored() {
        let mut text = encode_layers(&layers()).unwrap();
        text.push_str("\n\n");
        assert_eq!(decode_layers(&text).unwrap().len(), 3);
    }

    #[test]
    fn malformed_segment() {
        let text = format!("[]{}[{{\"weights\": 3}}]{}", LAYER_DELIMITER, LAYER_DELIMITER);
        assert!(matches!(
            decode_layers(&text),
            Err(NNError::MalformedPersistedState(_))
        ));
        assert!(matches!(
            decode_layers("not json at all"),
            Err(NNError::MalformedPersistedState(_))
        ));
    }

    #[test]
    fn inconsistent_chain() {
        let mut broken = layers();
        broken[2] = Layer::new(vec![Neuron::with_values(&[0.1], 0.3)]);
        let text = encode_layers(&broken).unwrap();
        assert!(matches!(
            decode_layers(&text),
            Err(NNError::MalformedPersistedState(_))
        ));

        let single = encode_layers(&layers()[..1]).unwrap();
        assert!(matches!(
            decode_layers(&single),
            Err(NNError::MalformedPersistedState(_))
        ));
    }

    #[test]
    fn binary_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.bin");
        save_binary(&layers(), &path).unwrap();
        assert_eq!(load_binary(&path).unwrap(), layers());

        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        assert!(matches!(
            load_binary(&path),
            Err(NNError::MalformedPersistedState(_))
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trained.ml");
        save_layers(&layers(), &path).unwrap();
        assert_eq!(load_layers(&path).unwrap(), layers());
    }
}
