use crate::domain::AdjustedRecord;

/// Merge adjusted groups into one collection ordered by `(id, date)`.
///
/// The sort is stable, so same-day duplicates keep the order the adjuster
/// gave them.
pub fn aggregate(groups: Vec<Vec<AdjustedRecord>>) -> Vec<AdjustedRecord> {
    let mut out: Vec<AdjustedRecord> = groups.into_iter().flatten().collect();
    sort_adjusted(&mut out);
    out
}

/// Sort adjusted records in place by `(instrument_id, date)` ascending.
pub fn sort_adjusted(records: &mut [AdjustedRecord]) {
    records.sort_by(|a, b| {
        a.raw
            .instrument_id
            .cmp(&b.raw.instrument_id)
            .then_with(|| a.raw.date.cmp(&b.raw.date))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DateKey, InstrumentId, RawRecord};

    fn adj(id: &str, date: u32, adj_price: f64) -> AdjustedRecord {
        AdjustedRecord {
            raw: RawRecord::new(
                "X",
                InstrumentId::new(id),
                DateKey::new(date).unwrap(),
                Some(adj_price),
                Some(adj_price),
            ),
            ret: 1.0,
            cumprod: 1.0,
            adj_price,
        }
    }

    #[test]
    fn empty_groups_aggregate_to_empty() {
        assert!(aggregate(Vec::new()).is_empty());
        assert!(aggregate(vec![Vec::new(), Vec::new()]).is_empty());
    }

    #[test]
    fn orders_by_id_then_date() {
        let out = aggregate(vec![
            vec![adj("B", 20230101, 1.0), adj("B", 20230102, 2.0)],
            vec![adj("A", 20230103, 3.0)],
            vec![adj("A", 20230101, 4.0)],
        ]);
        let keys: Vec<(&str, u32)> = out
            .iter()
            .map(|r| (r.instrument_id().as_str(), r.date().value()))
            .collect();
        assert_eq!(
            keys,
            vec![("A", 20230101), ("A", 20230103), ("B", 20230101), ("B", 20230102)]
        );
    }

    #[test]
    fn equal_keys_keep_group_order() {
        let out = aggregate(vec![vec![adj("A", 20230101, 1.0), adj("A", 20230101, 2.0)]]);
        assert_eq!(out[0].adj_price, 1.0);
        assert_eq!(out[1].adj_price, 2.0);
    }
}
