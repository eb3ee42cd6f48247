use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub specialization: String,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn summary(&self) -> DoctorSummary {
        DoctorSummary {
            id: self.id,
            full_name: self.full_name.clone(),
            specialization: self.specialization.clone(),
            profile_image_url: self.profile_image_url.clone(),
            bio: self.bio.clone(),
        }
    }

    /// Case-insensitive substring match over the fields the directory search covers.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.full_name.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self.specialization.to_lowercase().contains(&needle)
            || self.phone.as_deref().is_some_and(|p| p.contains(&needle))
    }
}

/// Public directory view of a doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    pub id: Uuid,
    pub full_name: String,
    pub specialization: String,
    pub profile_image_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorFilter {
    pub specialization: Option<String>,
    pub search: Option<String>,
    pub active_only: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorUpdate {
    pub full_name: Option<String>,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

impl DoctorUpdate {
    pub fn apply_to(self, doctor: &mut Doctor) {
        if let Some(full_name) = self.full_name {
            doctor.full_name = full_name;
        }
        if let Some(specialization) = self.specialization {
            doctor.specialization = specialization;
        }
        if let Some(bio) = self.bio {
            doctor.bio = Some(bio);
        }
        if let Some(url) = self.profile_image_url {
            doctor.profile_image_url = Some(url);
        }
        if let Some(phone) = self.phone {
            doctor.phone = Some(phone);
        }
        if let Some(gender) = self.gender {
            doctor.gender = Some(gender);
        }
        if let Some(address) = self.address {
            doctor.address = Some(address);
        }
        if let Some(is_active) = self.is_active {
            doctor.is_active = is_active;
        }
        doctor.updated_at = Utc::now();
    }
}
