use std::num::ParseIntError;
use std::ops::RangeInclusive;

use tracing::warn;

/// Индекс интерфейса (ifIndex), последний sub-identifier в OID
pub type InterfaceIndex = u32;

/// Разворачивает строку вида `1-4,6` в список индексов.
///
/// Порядок сегментов сохраняется, внутри диапазона индексы идут по
/// возрастанию. Дубликаты не удаляются. Диапазон `5-3` даёт пустой
/// результат для своего сегмента, сегмент, который не парсится как число
/// (например, больше `u32::MAX`), пропускается.
pub fn expand_interface_range(raw: &str) -> Vec<InterfaceIndex> {
    let mut indices = Vec::new();

    for segment in raw.split(',') {
        match parse_segment(segment) {
            Ok(range) => indices.extend(range),
            Err(e) => warn!(segment, error = %e, "skipping unparsable interface segment"),
        }
    }

    indices
}

/// Сколько индексов даст [`expand_interface_range`], без выделения памяти
pub fn count_interface_range(raw: &str) -> u64 {
    raw.split(',')
        .filter_map(|segment| parse_segment(segment).ok())
        .map(|range| {
            if range.is_empty() {
                0
            } else {
                u64::from(range.end() - range.start()) + 1
            }
        })
        .sum()
}

fn parse_segment(segment: &str) -> Result<RangeInclusive<InterfaceIndex>, ParseIntError> {
    match segment.split_once('-') {
        None => {
            let index = segment.parse()?;
            Ok(index..=index)
        }
        Some((start, end)) => Ok(start.parse()?..=end.parse()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_ranges_and_singles() {
        assert_eq!(expand_interface_range("1-4,6"), vec![1, 2, 3, 4, 6]);
        assert_eq!(expand_interface_range("3"), vec![3]);
        assert_eq!(expand_interface_range("1,2,3"), vec![1, 2, 3]);
    }

    #[test]
    fn keeps_segment_order() {
        assert_eq!(expand_interface_range("6,1-4"), vec![6, 1, 2, 3, 4]);
    }

    #[test]
    fn keeps_duplicates() {
        assert_eq!(expand_interface_range("2,1-3,2"), vec![2, 1, 2, 3, 2]);
    }

    #[test]
    fn descending_range_is_empty() {
        assert!(expand_interface_range("5-3").is_empty());
        assert_eq!(expand_interface_range("1,5-3,7"), vec![1, 7]);
    }

    #[test]
    fn single_element_range() {
        assert_eq!(expand_interface_range("4-4"), vec![4]);
    }

    #[test]
    fn canonicalises_leading_zeros() {
        assert_eq!(expand_interface_range("007,09-010"), vec![7, 9, 10]);
    }

    #[test]
    fn unparsable_segments_emit_nothing() {
        assert_eq!(expand_interface_range("99999999999,2"), vec![2]);
        assert_eq!(expand_interface_range("1-99999999999,3"), vec![3]);
        assert!(expand_interface_range("").is_empty());
    }

    #[test]
    fn range_up_to_max_index_does_not_overflow() {
        let max = InterfaceIndex::MAX;
        let raw = format!("{}-{}", max - 1, max);
        assert_eq!(expand_interface_range(&raw), vec![max - 1, max]);
    }

    #[test]
    fn count_matches_expansion() {
        for raw in ["1-4,6", "2,1-3,2", "5-3", "1,5-3,7", "007,09-010", "99999999999,2", ""] {
            assert_eq!(
                count_interface_range(raw),
                expand_interface_range(raw).len() as u64,
                "{raw}"
            );
        }
    }

    #[test]
    fn count_handles_the_whole_index_space() {
        assert_eq!(count_interface_range("0-4294967295"), 1 << 32);
        assert_eq!(count_interface_range("0-4294967295,0-4294967295"), 1 << 33);
        assert_eq!(count_interface_range("1-10000"), 10_000);
    }
}
