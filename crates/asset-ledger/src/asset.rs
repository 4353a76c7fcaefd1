//! The custody record and its canonical encoding.
//!
//! Stored records must be byte-identical across independently written peers,
//! so the JSON encoding does not depend on Rust's struct layout: the encoder
//! emits the keys listed in [`Asset::WIRE_FIELDS`] in that alphabetical
//! order, as compact JSON with no insignificant whitespace.
//!
//! ```
//! use custody_ledger::Asset;
//!
//! let asset = Asset::new("Zaki", "RCED", "1", "HP01/HP02");
//! assert_eq!(
//!     asset.to_bytes().unwrap(),
//!     br#"{"caseNumber":"1","custodianAgency":"RCED","custodianName":"Zaki","evidenceInfo":"HP01/HP02"}"#,
//! );
//! ```

use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};

/// One custody entry: who holds the evidence, for which case, and what it is.
///
/// `custodian_name` is the primary key under which the record is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Person currently holding custody. Primary key.
    pub custodian_name: String,
    /// Agency the custodian belongs to.
    pub custodian_agency: String,
    /// Case the evidence is attached to.
    pub case_number: String,
    /// Slash-delimited evidence list, kept verbatim.
    pub evidence_info: String,
}

impl Asset {
    /// JSON keys in encoding order. Must stay sorted.
    pub const WIRE_FIELDS: [&'static str; 4] =
        ["caseNumber", "custodianAgency", "custodianName", "evidenceInfo"];

    /// Creates a record from its four fields.
    pub fn new(
        custodian_name: impl Into<String>,
        custodian_agency: impl Into<String>,
        case_number: impl Into<String>,
        evidence_info: impl Into<String>,
    ) -> Self {
        Self {
            custodian_name: custodian_name.into(),
            custodian_agency: custodian_agency.into(),
            case_number: case_number.into(),
            evidence_info: evidence_info.into(),
        }
    }

    /// Store key of this record.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.custodian_name
    }

    /// Evidence items, split on `/` with empty segments dropped.
    ///
    /// ```
    /// use custody_ledger::Asset;
    ///
    /// let asset = Asset::new("Dan", "CSB", "4", "HP01/HP02/SIM01/");
    /// assert_eq!(asset.evidence_items().collect::<Vec<_>>(), ["HP01", "HP02", "SIM01"]);
    /// ```
    pub fn evidence_items(&self) -> impl Iterator<Item = &str> {
        self.evidence_info.split('/').filter(|item| !item.is_empty())
    }

    /// Encodes the record canonically.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error; with string-only fields this does not
    /// happen in practice.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decodes a stored record.
    ///
    /// The input must be a JSON object carrying all four fields as strings.
    /// Unknown extra fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns the parser's error for malformed input or missing fields.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Field values paired with their JSON keys, in encoding order.
    fn wire_entries(&self) -> [(&'static str, &str); 4] {
        [
            ("caseNumber", self.case_number.as_str()),
            ("custodianAgency", self.custodian_agency.as_str()),
            ("custodianName", self.custodian_name.as_str()),
            ("evidenceInfo", self.evidence_info.as_str()),
        ]
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Asset", Self::WIRE_FIELDS.len())?;
        for (field, value) in self.wire_entries() {
            state.serialize_field(field, value)?;
        }
        state.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[test]
    fn wire_fields_are_sorted() {
        assert!(Asset::WIRE_FIELDS.is_sorted());
    }

    #[test]
    fn encoder_walks_wire_fields() {
        let asset = Asset::new("Zaki", "RCED", "1", "HP01/HP02");
        let keys = asset.wire_entries().map(|(field, _)| field);
        assert_eq!(keys, Asset::WIRE_FIELDS);
    }

    #[test]
    fn encoding_follows_wire_order_not_struct_order() {
        let asset = Asset::new("Aya", "RBPF", "2", "HP01/HP02/HP03");
        let json = String::from_utf8(asset.to_bytes().unwrap()).unwrap();

        let positions: Vec<usize> = Asset::WIRE_FIELDS
            .iter()
            .map(|field| json.find(&format!("\"{field}\"")).expect("field present"))
            .collect();
        assert!(positions.is_sorted(), "fields out of order in {json}");
    }

    #[test]
    fn decode_ignores_field_order_and_extra_fields() {
        let bytes = br#"{"evidenceInfo":"HP01","custodianName":"Adi","extra":true,"caseNumber":"3","custodianAgency":"KDN"}"#;
        let asset = Asset::from_bytes(bytes).unwrap();
        assert_eq!(asset, Asset::new("Adi", "KDN", "3", "HP01"));
    }

    #[rstest]
    #[case::not_json(b"not json".as_slice())]
    #[case::array(br#"["Zaki"]"#.as_slice())]
    #[case::missing_field(br#"{"caseNumber":"1","custodianAgency":"RCED","custodianName":"Zaki"}"#.as_slice())]
    #[case::wrong_type(br#"{"caseNumber":1,"custodianAgency":"RCED","custodianName":"Zaki","evidenceInfo":""}"#.as_slice())]
    #[case::empty(b"".as_slice())]
    fn decode_rejects_malformed_records(#[case] bytes: &[u8]) {
        assert!(Asset::from_bytes(bytes).is_err());
    }

    #[test]
    fn escapes_are_deterministic() {
        let asset = Asset::new("O\"Neil", "R\\CED", "7", "HP01\nHP02");
        assert_eq!(
            asset.to_bytes().unwrap(),
            br#"{"caseNumber":"7","custodianAgency":"R\\CED","custodianName":"O\"Neil","evidenceInfo":"HP01\nHP02"}"#
        );
    }

    #[test]
    fn evidence_items_keeps_order() {
        let asset = Asset::new("Mirul", "CSB", "6", "HP01/HP02/HP03/SIM01/SIM02/SIM03");
        assert_eq!(asset.evidence_items().count(), 6);
        assert_eq!(asset.evidence_items().last(), Some("SIM03"));
    }

    proptest! {
        /// Encoding the same record twice yields identical bytes, and decoding
        /// them gives the record back.
        #[test]
        fn encoding_is_deterministic(
            name in ".{0,12}",
            agency in ".{0,12}",
            case in ".{0,6}",
            evidence in "[A-Z0-9/]{0,24}",
        ) {
            let asset = Asset::new(name, agency, case, evidence);
            let first = asset.to_bytes().unwrap();
            let second = asset.clone().to_bytes().unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(Asset::from_bytes(&first).unwrap(), asset);
        }
    }
}
