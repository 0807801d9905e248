use serde::{Deserialize, Serialize};

/// Minimal STU3 patient model: only the elements the search and create
/// paths touch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Patient {
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    /// Extensions on the birth date primitive itself.
    #[serde(rename = "_birthDate", skip_serializing_if = "Option::is_none")]
    pub birth_date_element: Option<Element>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contact: Vec<PatientContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased_boolean: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Identifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HumanName {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub name_use: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prefix: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Element {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Extension {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_address: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientContact {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationship: Vec<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<HumanName>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeableConcept {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Search response container. Entries may hold partial resources when the
/// server returns summaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bundle {
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Patient>,
}

impl Patient {
    /// First listed name, space-joined: prefix, given parts, family.
    #[must_use]
    pub fn display_name(&self) -> String {
        let Some(name) = self.name.first() else {
            return String::from("(unnamed)");
        };
        let mut parts: Vec<&str> = Vec::new();
        parts.extend(name.prefix.iter().map(String::as_str));
        parts.extend(name.given.iter().map(String::as_str));
        if let Some(family) = name.family.as_deref() {
            parts.push(family);
        }
        if parts.is_empty() {
            String::from("(unnamed)")
        } else {
            parts.join(" ")
        }
    }
}

/// The fixed demonstration patient, fictional data only. The caller supplies
/// the SSN-style identifier value.
#[must_use]
pub fn demo_patient(pid: &str) -> Patient {
    Patient {
        resource_type: "Patient".to_string(),
        identifier: vec![Identifier {
            system: Some("http://hl7.org/fhir/sid/us-ssn".to_string()),
            value: Some(pid.to_string()),
        }],
        name: vec![
            HumanName {
                name_use: Some("official".to_string()),
                family: Some("Park".to_string()),
                given: vec!["Michael".to_string(), "C.H.".to_string()],
                prefix: vec!["Mr.".to_string()],
            },
            HumanName {
                name_use: Some("nickname".to_string()),
                given: vec!["Mike".to_string()],
                ..HumanName::default()
            },
        ],
        gender: Some("male".to_string()),
        birth_date: Some("1983-04-23".to_string()),
        birth_date_element: Some(Element {
            extension: vec![Extension {
                url: "http://hl7.org/fhir/StructureDefinition/patient-birthTime".to_string(),
                value_date_time: Some("1983-04-23T07:44:00".to_string()),
                ..Extension::default()
            }],
        }),
        extension: vec![Extension {
            url: "http://hl7.org/fhir/StructureDefinition/birthPlace".to_string(),
            value_address: Some(Address {
                city: Some("Seattle".to_string()),
                ..Address::default()
            }),
            ..Extension::default()
        }],
        address: vec![Address {
            line: vec!["3300 Washtenaw Avenue, Suite 227".to_string()],
            city: Some("Ann Arbor".to_string()),
            state: Some("MI".to_string()),
            postal_code: Some("48104".to_string()),
            country: Some("USA".to_string()),
        }],
        contact: vec![PatientContact {
            relationship: vec![CodeableConcept {
                coding: vec![Coding {
                    system: Some("http://hl7.org/fhir/v2/0131".to_string()),
                    code: Some("N".to_string()),
                }],
            }],
            name: Some(HumanName {
                family: Some("Parks".to_string()),
                given: vec!["Susan".to_string()],
                ..HumanName::default()
            }),
            telecom: vec![ContactPoint {
                system: Some("phone".to_string()),
                value: Some(String::new()),
            }],
            gender: Some("female".to_string()),
        }],
        deceased_boolean: Some(false),
        ..Patient::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn demo_patient_carries_the_fixed_profile() {
        let patient = demo_patient("000-00-0000");
        assert_eq!(patient.resource_type, "Patient");
        assert_eq!(patient.identifier[0].value.as_deref(), Some("000-00-0000"));
        assert_eq!(patient.gender.as_deref(), Some("male"));
        assert_eq!(patient.birth_date.as_deref(), Some("1983-04-23"));
        assert_eq!(patient.deceased_boolean, Some(false));
        assert_eq!(patient.name.len(), 2);
        assert_eq!(patient.name[1].name_use.as_deref(), Some("nickname"));
        assert_eq!(patient.contact[0].gender.as_deref(), Some("female"));
    }

    #[test]
    fn demo_patient_serializes_fhir_field_names() {
        let json = serde_json::to_value(demo_patient("000-00-0000")).expect("serializable");
        assert_eq!(json["resourceType"], "Patient");
        assert_eq!(json["birthDate"], "1983-04-23");
        assert_eq!(json["deceasedBoolean"], false);
        assert_eq!(
            json["identifier"][0]["system"],
            "http://hl7.org/fhir/sid/us-ssn"
        );
        assert_eq!(
            json["_birthDate"]["extension"][0]["valueDateTime"],
            "1983-04-23T07:44:00"
        );
        assert_eq!(json["extension"][0]["valueAddress"]["city"], "Seattle");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn display_name_joins_prefix_given_and_family() {
        let patient = demo_patient("000-00-0000");
        assert_eq!(patient.display_name(), "Mr. Michael C.H. Park");
    }

    #[test]
    fn display_name_handles_a_nameless_record() {
        assert_eq!(Patient::default().display_name(), "(unnamed)");
    }

    #[test]
    fn bundle_entries_tolerate_summary_bodies() {
        let bundle: Bundle = serde_json::from_str(
            r#"{
                "resourceType": "Bundle",
                "total": 1,
                "entry": [
                    {"resource": {"resourceType": "Patient", "id": "p1", "name": [{"family": "Park"}]}}
                ]
            }"#,
        )
        .expect("valid bundle");
        assert_eq!(bundle.total, Some(1));
        let patient = bundle.entry[0].resource.as_ref().expect("resource");
        assert_eq!(patient.id.as_deref(), Some("p1"));
        assert_eq!(patient.display_name(), "Park");
    }
}
