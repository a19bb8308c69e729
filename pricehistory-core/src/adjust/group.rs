use std::collections::BTreeMap;

use crate::domain::{InstrumentId, RawRecord};

/// Partition raw records by instrument id.
///
/// Keys are provider ids, never display symbols, so two instruments that
/// share a symbol stay apart. Records keep their input order inside each
/// group; the adjuster sorts them itself.
pub fn group_by_instrument(records: Vec<RawRecord>) -> BTreeMap<InstrumentId, Vec<RawRecord>> {
    let mut groups: BTreeMap<InstrumentId, Vec<RawRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.instrument_id.clone())
            .or_default()
            .push(record);
    }
    groups
}
