use serde::Serialize;

/// Direct child elements of a `<reputation>` record, in output column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Stamp,
    Addr,
    Notes,
    Cc,
    ReputationKey,
    Proto,
    Family,
    Asn,
    Category,
    ReputationScore,
    Port,
}

impl RecordField {
    pub const ALL: [RecordField; 11] = [
        RecordField::Stamp,
        RecordField::Addr,
        RecordField::Notes,
        RecordField::Cc,
        RecordField::ReputationKey,
        RecordField::Proto,
        RecordField::Family,
        RecordField::Asn,
        RecordField::Category,
        RecordField::ReputationScore,
        RecordField::Port,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            RecordField::Stamp => "stamp",
            RecordField::Addr => "addr",
            RecordField::Notes => "notes",
            RecordField::Cc => "cc",
            RecordField::ReputationKey => "reputation_key",
            RecordField::Proto => "proto",
            RecordField::Family => "family",
            RecordField::Asn => "asn",
            RecordField::Category => "category",
            RecordField::ReputationScore => "reputation_score",
            RecordField::Port => "port",
        }
    }

    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.tag().as_bytes() == tag)
    }
}

/// One `<reputation>` element. `None` means the child element was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReputationRecord {
    pub stamp: Option<String>,
    pub addr: Option<String>,
    pub notes: Option<String>,
    pub cc: Option<String>,
    pub reputation_key: Option<String>,
    pub proto: Option<String>,
    pub family: Option<String>,
    pub asn: Option<String>,
    pub category: Option<String>,
    pub reputation_score: Option<String>,
    pub port: Option<String>,
}

impl ReputationRecord {
    pub fn field_mut(&mut self, field: RecordField) -> &mut Option<String> {
        match field {
            RecordField::Stamp => &mut self.stamp,
            RecordField::Addr => &mut self.addr,
            RecordField::Notes => &mut self.notes,
            RecordField::Cc => &mut self.cc,
            RecordField::ReputationKey => &mut self.reputation_key,
            RecordField::Proto => &mut self.proto,
            RecordField::Family => &mut self.family,
            RecordField::Asn => &mut self.asn,
            RecordField::Category => &mut self.category,
            RecordField::ReputationScore => &mut self.reputation_score,
            RecordField::Port => &mut self.port,
        }
    }
}

/// Flattened CSV row. Field order is the column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    pub stamp: Option<String>,
    pub addr: Option<String>,
    pub notes: Option<String>,
    pub cc: Option<String>,
    pub reputation_key: Option<String>,
    pub proto: Option<String>,
    pub family: Option<String>,
    pub asn: Option<String>,
    pub category: Option<String>,
    pub reputation_score: Option<String>,
    pub port: Option<String>,
    pub field_a: Option<u64>,
    pub field_b: Option<u64>,
    pub field_c: Option<u64>,
    pub field_d: Option<u64>,
    pub field_e: Option<u64>,
    pub field_f: Option<u64>,
    pub field_g: Option<u64>,
    pub field_h: Option<u64>,
    pub field_i: Option<u64>,
    pub field_j: Option<u64>,
    pub field_k: Option<u64>,
}

impl OutputRow {
    pub const HEADER: [&'static str; 22] = [
        "stamp",
        "addr",
        "notes",
        "cc",
        "reputation_key",
        "proto",
        "family",
        "asn",
        "category",
        "reputation_score",
        "port",
        "field_a",
        "field_b",
        "field_c",
        "field_d",
        "field_e",
        "field_f",
        "field_g",
        "field_h",
        "field_i",
        "field_j",
        "field_k",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyField;

    #[test]
    fn header_matches_field_and_key_columns() {
        let direct: Vec<&str> = RecordField::ALL.iter().map(|f| f.tag()).collect();
        let keyed: Vec<&str> = KeyField::ALL.iter().map(|f| f.column()).collect();
        let expected: Vec<&str> = direct.into_iter().chain(keyed).collect();
        assert_eq!(OutputRow::HEADER.to_vec(), expected);
    }

    #[test]
    fn from_tag_roundtrips() {
        for field in RecordField::ALL {
            assert_eq!(RecordField::from_tag(field.tag().as_bytes()), Some(field));
        }
        assert_eq!(RecordField::from_tag(b"reputation"), None);
        assert_eq!(RecordField::from_tag(b"STAMP"), None);
    }

    #[test]
    fn field_mut_writes_through() {
        let mut record = ReputationRecord::default();
        for field in RecordField::ALL {
            *record.field_mut(field) = Some(field.tag().to_uppercase());
        }
        assert_eq!(record.cc.as_deref(), Some("CC"));
        assert_eq!(record.port.as_deref(), Some("PORT"));
        assert_eq!(record.reputation_key.as_deref(), Some("REPUTATION_KEY"));
    }
}
