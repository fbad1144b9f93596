//! Order-preserving chunking.

/// Split `items` into consecutive groups of at most `max_size` items.
///
/// No group is empty; an empty input yields no groups. A `max_size` of zero is
/// treated as one.
pub fn chunk<T: Clone>(items: &[T], max_size: usize) -> Vec<Vec<T>> {
    items.chunks(max_size.max(1)).map(<[T]>::to_vec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(chunk::<u32>(&[], 3).is_empty());
    }

    #[test]
    fn test_sizes_and_order() {
        let items: Vec<u32> = (0..10).collect();

        for max in 1..=12 {
            let groups = chunk(&items, max);

            assert_eq!(groups.len(), items.len().div_ceil(max));
            assert!(groups.iter().all(|g| !g.is_empty() && g.len() <= max));
            assert_eq!(groups.concat(), items);
        }
    }

    #[test]
    fn test_exact_multiple() {
        let groups = chunk(&["a", "b", "c", "d"], 2);
        assert_eq!(groups, vec![vec!["a", "b"], vec!["c", "d"]]);
    }
}
