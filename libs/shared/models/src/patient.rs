use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.full_name().to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self.phone.as_deref().is_some_and(|p| p.contains(&needle))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl PatientUpdate {
    pub fn apply_to(self, patient: &mut Patient) {
        if let Some(first_name) = self.first_name {
            patient.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            patient.last_name = last_name;
        }
        if let Some(phone) = self.phone {
            patient.phone = Some(phone);
        }
        if let Some(gender) = self.gender {
            patient.gender = Some(gender);
        }
        if let Some(dob) = self.date_of_birth {
            patient.date_of_birth = Some(dob);
        }
        if let Some(address) = self.address {
            patient.address = Some(address);
        }
        patient.updated_at = Utc::now();
    }
}
