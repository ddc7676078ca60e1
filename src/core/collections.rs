use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// 固定大小切塊，最後一塊可能較短；size 為 0 或輸入為空時回傳空結果
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 || items.is_empty() {
        return Vec::new();
    }
    items.chunks(size).map(<[T]>::to_vec).collect()
}

/// 旋轉：正的 offset 往左轉（開頭元素繞到尾端），負值往右轉。
/// offset 以長度取模，任意大小與正負皆可
pub fn rotate<T: Clone>(items: &[T], offset: i64) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    let shift = offset.rem_euclid(items.len() as i64) as usize;
    let mut rotated = Vec::with_capacity(items.len());
    rotated.extend_from_slice(&items[shift..]);
    rotated.extend_from_slice(&items[..shift]);
    rotated
}

/// 去重，保留每個元素第一次出現的位置
pub fn unique<T: Clone + Eq + Hash>(items: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut result = items.to_vec();
    result.retain(|item| seen.insert(item.clone()));
    result
}

/// 交集：保留第一個串列的順序，重複元素只留一份
pub fn intersection<T: Clone + Eq + Hash>(a: &[T], b: &[T]) -> Vec<T> {
    let lookup: HashSet<&T> = b.iter().collect();
    let mut seen = HashSet::new();
    let mut result = a.to_vec();
    result.retain(|item| lookup.contains(item) && seen.insert(item.clone()));
    result
}

/// 依鍵分組。組的順序照鍵第一次出現的位置，
/// 組內元素維持原本的相對順序
pub fn group_by<T, K, F>(items: &[T], mut key_fn: F) -> Vec<(K, Vec<T>)>
where
    T: Clone,
    K: Clone + Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    let mut positions: HashMap<K, usize> = HashMap::new();

    for item in items {
        let key = key_fn(item);
        match positions.get(&key) {
            Some(&index) => groups[index].1.push(item.clone()),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![item.clone()]));
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_splits_with_short_tail() {
        assert_eq!(
            chunk(&[1, 2, 3, 4, 5], 2),
            vec![vec![1, 2], vec![3, 4], vec![5]]
        );
        assert_eq!(chunk(&[1, 2, 3, 4], 2), vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_chunk_size_zero_returns_empty() {
        assert_eq!(chunk(&[1, 2, 3], 0), Vec::<Vec<i32>>::new());
        assert_eq!(chunk::<i32>(&[], 3), Vec::<Vec<i32>>::new());
    }

    #[test]
    fn test_rotate_left_for_positive_offsets() {
        assert_eq!(rotate(&[1, 2, 3, 4, 5], 2), vec![3, 4, 5, 1, 2]);
        assert_eq!(rotate(&[1, 2, 3, 4, 5], 0), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_rotate_right_for_negative_offsets() {
        assert_eq!(rotate(&[1, 2, 3, 4, 5], -1), vec![5, 1, 2, 3, 4]);
        assert_eq!(rotate(&[1, 2, 3, 4, 5], -7), vec![4, 5, 1, 2, 3]);
    }

    #[test]
    fn test_rotate_normalizes_large_offsets() {
        assert_eq!(rotate(&[1, 2, 3], 7), rotate(&[1, 2, 3], 1));
        assert_eq!(rotate::<i32>(&[], 4), Vec::<i32>::new());
    }

    #[test]
    fn test_unique_keeps_first_occurrence() {
        assert_eq!(unique(&[3, 1, 3, 2, 1, 3]), vec![3, 1, 2]);
        assert_eq!(unique(&["a", "b", "a"]), vec!["a", "b"]);
        assert_eq!(unique::<i32>(&[]), Vec::<i32>::new());
    }

    #[test]
    fn test_intersection_preserves_first_list_order() {
        assert_eq!(intersection(&[4, 2, 9, 2, 7], &[7, 2, 5]), vec![2, 7]);
        assert_eq!(intersection(&[1, 2], &[3, 4]), Vec::<i32>::new());
    }

    #[test]
    fn test_group_by_preserves_relative_order_within_groups() {
        let words = ["apple", "avocado", "banana", "blueberry", "cherry"];
        let grouped = group_by(&words, |w| w.chars().next().unwrap_or(' '));

        assert_eq!(
            grouped,
            vec![
                ('a', vec!["apple", "avocado"]),
                ('b', vec!["banana", "blueberry"]),
                ('c', vec!["cherry"]),
            ]
        );
    }

    #[test]
    fn test_group_by_orders_groups_by_first_appearance() {
        let numbers = [5, 2, 8, 1, 4];
        let grouped = group_by(&numbers, |n| n % 2);

        assert_eq!(grouped, vec![(1, vec![5, 1]), (0, vec![2, 8, 4])]);
    }
}
