//! JSON document embedded in the QR code.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{EmergencyRecord, RecordError};

/// Discriminator stored in the document's `type` field.
pub const DOCUMENT_TYPE: &str = "MEDICAL_EMERGENCY";

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    #[serde(rename = "type")]
    kind: String,
    personal_info: PersonalInfo,
    medical_info: MedicalInfo,
    emergency_contact: EmergencyContact,
    #[serde(default)]
    address: String,
    #[serde(default)]
    additional_info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    emergency_number: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersonalInfo {
    name: String,
    #[serde(default)]
    dob: String,
    blood_group: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct MedicalInfo {
    #[serde(default)]
    allergies: String,
    #[serde(default)]
    conditions: String,
    #[serde(default)]
    medications: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct EmergencyContact {
    name: String,
    phone: String,
    #[serde(default)]
    relationship: String,
}

/// Serialize a record into the QR payload.
///
/// The record must satisfy [`EmergencyRecord::validate`]. The dial number is
/// included only when set.
pub fn serialize(record: &EmergencyRecord) -> Result<Vec<u8>, RecordError> {
    record.validate()?;

    let doc = Document {
        kind: DOCUMENT_TYPE.to_string(),
        personal_info: PersonalInfo {
            name: record.name.clone(),
            dob: record.date_of_birth.clone(),
            blood_group: record.blood_group.clone(),
        },
        medical_info: MedicalInfo {
            allergies: record.allergies.clone(),
            conditions: record.medical_conditions.clone(),
            medications: record.medications.clone(),
        },
        emergency_contact: EmergencyContact {
            name: record.emergency_contact_name.clone(),
            phone: record.emergency_contact_phone.clone(),
            relationship: record.emergency_contact_relation.clone(),
        },
        address: record.home_address.clone(),
        additional_info: record.additional_info.clone(),
        emergency_number: record.emergency_dial_number.clone(),
    };

    let bytes = serde_json::to_vec(&doc)?;
    debug!(len = bytes.len(), "Serialized emergency record");
    Ok(bytes)
}

/// Parse a QR payload back into a record.
pub fn deserialize(bytes: &[u8]) -> Result<EmergencyRecord, RecordError> {
    let doc: Document = serde_json::from_slice(bytes)?;
    if doc.kind != DOCUMENT_TYPE {
        return Err(RecordError::NotEmergencyRecord(doc.kind));
    }

    Ok(EmergencyRecord {
        name: doc.personal_info.name,
        date_of_birth: doc.personal_info.dob,
        blood_group: doc.personal_info.blood_group,
        allergies: doc.medical_info.allergies,
        medical_conditions: doc.medical_info.conditions,
        medications: doc.medical_info.medications,
        emergency_contact_name: doc.emergency_contact.name,
        emergency_contact_phone: doc.emergency_contact.phone,
        emergency_contact_relation: doc.emergency_contact.relationship,
        home_address: doc.address,
        additional_info: doc.additional_info,
        emergency_dial_number: doc.emergency_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequiredField;
    use proptest::prelude::*;

    fn sample() -> EmergencyRecord {
        EmergencyRecord {
            name: "Jane Doe".into(),
            date_of_birth: "01/02/1980".into(),
            blood_group: "O+".into(),
            allergies: "Penicillin, peanuts".into(),
            medical_conditions: "Asthma".into(),
            medications: "Salbutamol".into(),
            emergency_contact_name: "John Doe".into(),
            emergency_contact_phone: "+1 555 0100".into(),
            emergency_contact_relation: "Brother".into(),
            home_address: "1 Main St".into(),
            additional_info: "Organ donor".into(),
            emergency_dial_number: None,
        }
    }

    #[test]
    fn document_has_discriminator_and_groups() {
        let bytes = serialize(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["type"], "MEDICAL_EMERGENCY");
        assert_eq!(value["personal_info"]["blood_group"], "O+");
        assert_eq!(value["medical_info"]["conditions"], "Asthma");
        assert_eq!(value["emergency_contact"]["relationship"], "Brother");
        assert_eq!(value["address"], "1 Main St");
        assert!(value.get("emergency_number").is_none());
    }

    #[test]
    fn serialization_is_stable() {
        let record = sample();
        assert_eq!(serialize(&record).unwrap(), serialize(&record).unwrap());

        let text = String::from_utf8(serialize(&record).unwrap()).unwrap();
        assert!(text.starts_with(r#"{"type":"MEDICAL_EMERGENCY","personal_info":{"name":"Jane Doe""#));
    }

    #[test]
    fn dial_number_is_carried_when_set() {
        let mut record = sample();
        record.emergency_dial_number = Some("112".into());
        let bytes = serialize(&record).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["emergency_number"], "112");
        assert_eq!(deserialize(&bytes).unwrap(), record);
    }

    #[test]
    fn each_missing_required_field_is_rejected() {
        let clear: [(RequiredField, fn(&mut EmergencyRecord)); 4] = [
            (RequiredField::Name, |r| r.name.clear()),
            (RequiredField::BloodGroup, |r| r.blood_group.clear()),
            (RequiredField::EmergencyContactName, |r| {
                r.emergency_contact_name.clear()
            }),
            (RequiredField::EmergencyContactPhone, |r| {
                r.emergency_contact_phone.clear()
            }),
        ];

        for (field, clear_field) in clear {
            let mut record = sample();
            clear_field(&mut record);
            match serialize(&record) {
                Err(RecordError::MissingField(missing)) => assert_eq!(missing, field),
                other => panic!("expected MissingField({field}), got {other:?}"),
            }
        }
    }

    #[test]
    fn deserialize_rejects_other_document_types() {
        let bytes = serialize(&sample()).unwrap();
        let mut value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        value["type"] = "WIFI".into();
        let bytes = serde_json::to_vec(&value).unwrap();

        assert!(matches!(
            deserialize(&bytes),
            Err(RecordError::NotEmergencyRecord(kind)) if kind == "WIFI"
        ));
    }

    #[test]
    fn deserialize_rejects_garbage() {
        assert!(matches!(deserialize(b"not json"), Err(RecordError::Json(_))));
    }

    proptest! {
        #[test]
        fn round_trip_preserves_every_field(
            name in "\\PC{1,20}",
            dob in "\\PC{0,12}",
            blood in "(A|B|AB|O)[+-]",
            allergies in "\\PC{0,40}",
            conditions in "\\PC{0,40}",
            medications in "\\PC{0,40}",
            contact in "\\PC{1,20}",
            phone in "[0-9 +()-]{1,16}",
            relation in "\\PC{0,12}",
            address in "\\PC{0,40}",
            info in "\\PC{0,60}",
            dial in proptest::option::of("[0-9]{2,3}"),
        ) {
            prop_assume!(!name.trim().is_empty());
            prop_assume!(!contact.trim().is_empty());
            prop_assume!(!phone.trim().is_empty());

            let record = EmergencyRecord {
                name,
                date_of_birth: dob,
                blood_group: blood,
                allergies,
                medical_conditions: conditions,
                medications,
                emergency_contact_name: contact,
                emergency_contact_phone: phone,
                emergency_contact_relation: relation,
                home_address: address,
                additional_info: info,
                emergency_dial_number: dial,
            };

            let bytes = serialize(&record).unwrap();
            prop_assert_eq!(deserialize(&bytes).unwrap(), record);
        }
    }
}
