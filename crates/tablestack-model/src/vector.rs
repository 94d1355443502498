//! Little-endian f32 vector codec for vector-typed columns.

use crate::error::ValidationError;

/// Packs f32 values into little-endian bytes.
pub fn floats_to_bytes(values: &[f32]) -> Result<Vec<u8>, ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::EmptyVector);
    }
    let mut bytes = Vec::with_capacity(values.len() * 4);
    for value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    Ok(bytes)
}

/// Unpacks little-endian bytes into f32 values.
pub fn bytes_to_floats(bytes: &[u8]) -> Result<Vec<f32>, ValidationError> {
    if bytes.is_empty() {
        return Err(ValidationError::EmptyVector);
    }
    if bytes.len() % 4 != 0 {
        return Err(ValidationError::InvalidVectorLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use rand::RngExt;

    use super::*;

    #[test]
    fn test_should_pack_floats_little_endian() {
        let bytes = floats_to_bytes(&[1.0]).unwrap();
        assert_eq!(bytes, [0x00, 0x00, 0x80, 0x3f]);
    }

    #[test]
    fn test_should_reject_empty_input() {
        assert_eq!(floats_to_bytes(&[]), Err(ValidationError::EmptyVector));
        assert_eq!(bytes_to_floats(&[]), Err(ValidationError::EmptyVector));
    }

    #[test]
    fn test_should_reject_partial_float() {
        assert_eq!(
            bytes_to_floats(&[0, 0, 0, 0, 1]),
            Err(ValidationError::InvalidVectorLength(5))
        );
    }

    #[test]
    fn test_should_round_trip_random_vectors() {
        let mut rng = rand::rng();
        let values: Vec<f32> = (0..128).map(|_| rng.random_range(-1.0..1.0)).collect();
        let decoded = bytes_to_floats(&floats_to_bytes(&values).unwrap()).unwrap();
        assert_eq!(decoded.len(), values.len());
        for (a, b) in values.iter().zip(&decoded) {
            assert!((a - b).abs() < 1e-7);
        }
    }
}
