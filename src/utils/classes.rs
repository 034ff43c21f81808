use std::hash::Hash;

/// Invert a map by swapping keys and values
pub fn invert_map<K, V, MK, MV>(original: MK) -> MV
where
    K: Ord + Hash + Eq,
    V: Ord + Hash + Eq + Clone,
    MK: IntoIterator<Item = (K, V)>,
    MV: FromIterator<(V, K)>,
{
    original
        .into_iter()
        .map(|(key, value)| (value, key))
        .collect()
}

/// Index of the highest score in each row
pub fn argmax_rows(scores: &[f32], n_classes: usize) -> Vec<usize> {
    scores
        .chunks(n_classes.max(1))
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f32::NEG_INFINITY), |best, (i, &score)| {
                    if score > best.1 {
                        (i, score)
                    } else {
                        best
                    }
                })
                .0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_invert_map() {
        let id2label = BTreeMap::from([(0, "negative".to_string()), (1, "positive".to_string())]);

        let label2id: BTreeMap<String, usize> = invert_map(id2label);

        assert_eq!(label2id["positive"], 1);
        assert_eq!(label2id["negative"], 0);
    }

    #[test]
    fn test_argmax_rows() {
        let scores = [0.9, 0.1, 0.3, 0.7, 0.5, 0.5];

        assert_eq!(argmax_rows(&scores, 2), vec![0, 1, 0]);
    }
}
