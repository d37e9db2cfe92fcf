//! The emergency record entity and its construction from form fields.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::RecordError;

/// Fields that must be non-empty before a record can be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Name,
    BloodGroup,
    EmergencyContactName,
    EmergencyContactPhone,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Name => "full name",
            Self::BloodGroup => "blood group",
            Self::EmergencyContactName => "emergency contact name",
            Self::EmergencyContactPhone => "emergency contact phone",
        };
        f.write_str(label)
    }
}

/// A person's emergency medical information.
///
/// Optional fields are empty strings when the caller has nothing to say.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmergencyRecord {
    pub name: String,
    pub date_of_birth: String,
    pub blood_group: String,
    /// Comma-delimited; see [`EmergencyRecord::allergy_list`].
    pub allergies: String,
    pub medical_conditions: String,
    pub medications: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relation: String,
    pub home_address: String,
    pub additional_info: String,
    /// Jurisdiction emergency-services number (e.g. 911, 112).
    pub emergency_dial_number: Option<String>,
}

impl EmergencyRecord {
    /// Build a record from a field-name → value mapping.
    ///
    /// Keys are the form field names (`full_name`, `dob`, `blood_group`,
    /// `allergies`, `medical_conditions`, `medications`,
    /// `emergency_contact_name`, `emergency_contact_phone`,
    /// `emergency_contact_relation`, `address`, `additional_info`,
    /// `emergency_number`). Values are trimmed. Missing keys become empty
    /// strings and unknown keys are ignored.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let mut record = Self::default();

        for (key, value) in fields {
            let value = value.trim().to_string();
            match key.as_str() {
                "full_name" => record.name = value,
                "dob" => record.date_of_birth = value,
                "blood_group" => record.blood_group = value,
                "allergies" => record.allergies = value,
                "medical_conditions" => record.medical_conditions = value,
                "medications" => record.medications = value,
                "emergency_contact_name" => record.emergency_contact_name = value,
                "emergency_contact_phone" => record.emergency_contact_phone = value,
                "emergency_contact_relation" => record.emergency_contact_relation = value,
                "address" => record.home_address = value,
                "additional_info" => record.additional_info = value,
                "emergency_number" => {
                    record.emergency_dial_number = (!value.is_empty()).then_some(value);
                }
                other => debug!(key = other, "Ignoring unknown record field"),
            }
        }

        record
    }

    /// Check the required-field invariant.
    ///
    /// Returns the first empty required field, in form order.
    pub fn validate(&self) -> Result<(), RecordError> {
        let required = [
            (RequiredField::Name, &self.name),
            (RequiredField::BloodGroup, &self.blood_group),
            (RequiredField::EmergencyContactName, &self.emergency_contact_name),
            (RequiredField::EmergencyContactPhone, &self.emergency_contact_phone),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(RecordError::MissingField(field));
            }
        }
        Ok(())
    }

    /// Allergies as individual entries.
    pub fn allergy_list(&self) -> Vec<&str> {
        self.allergies
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect()
    }

    /// The dial number, if one is set and non-blank.
    pub fn dial_number(&self) -> Option<&str> {
        self.emergency_dial_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn from_fields_maps_form_names() {
        let record = EmergencyRecord::from_fields(&fields(&[
            ("full_name", "  Jane Doe "),
            ("dob", "01/02/1980"),
            ("blood_group", "O+"),
            ("address", "1 Main St"),
            ("emergency_contact_relation", "Sister"),
            ("emergency_number", "112"),
        ]));

        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.date_of_birth, "01/02/1980");
        assert_eq!(record.blood_group, "O+");
        assert_eq!(record.home_address, "1 Main St");
        assert_eq!(record.emergency_contact_relation, "Sister");
        assert_eq!(record.emergency_dial_number.as_deref(), Some("112"));
        assert_eq!(record.medications, "");
    }

    #[test]
    fn from_fields_ignores_unknown_keys_and_blank_dial_number() {
        let record = EmergencyRecord::from_fields(&fields(&[
            ("favourite_colour", "blue"),
            ("emergency_number", "   "),
        ]));
        assert_eq!(record, EmergencyRecord::default());
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let mut record = EmergencyRecord {
            name: "Jane".into(),
            blood_group: "A-".into(),
            emergency_contact_name: "John".into(),
            emergency_contact_phone: "555-0100".into(),
            ..Default::default()
        };
        assert!(record.validate().is_ok());

        record.blood_group = "  ".into();
        record.emergency_contact_phone.clear();
        let err = record.validate().unwrap_err();
        assert!(matches!(
            err,
            RecordError::MissingField(RequiredField::BloodGroup)
        ));
        assert_eq!(err.to_string(), "Please fill in the blood group field");
    }

    #[test]
    fn allergy_list_splits_on_commas() {
        let record = EmergencyRecord {
            allergies: "Penicillin, peanuts,, latex ".into(),
            ..Default::default()
        };
        assert_eq!(record.allergy_list(), vec!["Penicillin", "peanuts", "latex"]);
    }

    #[test]
    fn dial_number_filters_blank() {
        let mut record = EmergencyRecord::default();
        assert_eq!(record.dial_number(), None);
        record.emergency_dial_number = Some(" ".into());
        assert_eq!(record.dial_number(), None);
        record.emergency_dial_number = Some("911".into());
        assert_eq!(record.dial_number(), Some("911"));
    }
}
