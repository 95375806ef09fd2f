use crate::key::{KeyError, KeyField, ReputationKey};
use crate::models::{OutputRow, ReputationRecord};

/// Flattens a record into an output row, decoding its reputation key.
///
/// Consumes the record so its strings move into the row.
pub fn extract_row(record: ReputationRecord) -> Result<OutputRow, KeyError> {
    let key = ReputationKey::decode(record.reputation_key.as_deref().unwrap_or(""))?;

    Ok(OutputRow {
        stamp: record.stamp,
        addr: record.addr,
        notes: record.notes,
        cc: record.cc,
        reputation_key: record.reputation_key,
        proto: record.proto,
        family: record.family,
        asn: record.asn,
        category: record.category,
        reputation_score: record.reputation_score,
        port: record.port,
        field_a: key.get(KeyField::A),
        field_b: key.get(KeyField::B),
        field_c: key.get(KeyField::C),
        field_d: key.get(KeyField::D),
        field_e: key.get(KeyField::E),
        field_f: key.get(KeyField::F),
        field_g: key.get(KeyField::G),
        field_h: key.get(KeyField::H),
        field_i: key.get(KeyField::I),
        field_j: key.get(KeyField::J),
        field_k: key.get(KeyField::K),
    })
}
