//! Sentence embeddings from token-level encoder output

use ndarray::{Array1, ArrayView2, ArrayView3};

/// Average the token vectors the attention mask keeps, then scale to unit length.
///
/// `hidden` is `[batch, tokens, hidden]`, `mask` is `[batch, tokens]`. A row
/// with no kept tokens, or whose mean is the zero vector, stays all zeros.
pub(crate) fn masked_mean_normalized(
    hidden: ArrayView3<'_, f32>,
    mask: ArrayView2<'_, i64>,
) -> Vec<Vec<f32>> {
    hidden
        .outer_iter()
        .zip(mask.outer_iter())
        .map(|(tokens, keep)| {
            let mut pooled = Array1::<f32>::zeros(tokens.ncols());
            let mut kept = 0.0f32;

            for (token, &flag) in tokens.outer_iter().zip(keep.iter()) {
                if flag > 0 {
                    pooled += &token;
                    kept += 1.0;
                }
            }

            if kept > 0.0 {
                pooled /= kept;
            }
            let norm = pooled.dot(&pooled).sqrt();
            if norm > 0.0 {
                pooled /= norm;
            }

            pooled.to_vec()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr2, arr3};

    #[test]
    fn test_padding_is_ignored() {
        let hidden = arr3(&[[[3.0, 0.0], [1.0, 0.0], [100.0, 100.0]]]);
        let mask = arr2(&[[1i64, 1, 0]]);

        let pooled = masked_mean_normalized(hidden.view(), mask.view());
        assert_eq!(pooled, vec![vec![1.0, 0.0]]);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let hidden = arr3(&[
            [[3.0, 4.0], [3.0, 4.0]],
            [[1.0, 1.0], [0.0, 0.0]],
        ]);
        let mask = arr2(&[[1i64, 1], [1, 0]]);

        let pooled = masked_mean_normalized(hidden.view(), mask.view());
        assert_eq!(pooled.len(), 2);
        for row in &pooled {
            let norm: f32 = row.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-6);
        }
        assert!((pooled[0][0] - 0.6).abs() < 1e-6);
        assert!((pooled[0][1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_fully_masked_row_is_zero() {
        let hidden = arr3(&[[[5.0, 5.0]]]);
        let mask = arr2(&[[0i64]]);

        let pooled = masked_mean_normalized(hidden.view(), mask.view());
        assert_eq!(pooled, vec![vec![0.0, 0.0]]);
    }
}
