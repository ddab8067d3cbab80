//! Subject profiles: student records registered by staff and flagged for
//! cause.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  error::{require, require_email},
};

/// Photo reference given to profiles created without one.
pub const DEFAULT_PHOTO: &str = "photos/default.jpg";

/// Maximum length of a national ID.
pub const NATIONAL_ID_MAX_LEN: usize = 12;

// ─── Stored profile ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub id:                   i64,
  /// Id of the staff principal that registered this profile. Immutable.
  pub created_by:           i64,
  pub photo:                String,
  pub name:                 String,
  pub age:                  u32,
  pub national_id:          String,
  pub phone_number:         String,
  pub email:                String,
  pub course_name:          String,
  pub course_year:          String,
  pub passing_out_year:     String,
  pub registration_number:  String,
  pub institution_name:     String,
  pub parents_address:      String,
  pub parents_phone_number: String,
  pub residential_address:  Option<String>,
  /// Free text, compared by exact string equality.
  pub latitude:             Option<String>,
  pub longitude:            Option<String>,
  pub residency_name:       Option<String>,
  pub residency_owner_name: Option<String>,
  pub owner_phone_number:   Option<String>,
  pub room_number:          Option<String>,
  pub previous_cases_count: u32,
  pub vehicle_number:       Option<String>,
  pub flagged_reason:       Option<String>,
  pub flagged_reason_image: Option<String>,
  /// Only ever incremented.
  pub flag_count:           u32,
}

impl Profile {
  pub fn coordinates(&self) -> Coordinates {
    Coordinates {
      latitude:  self.latitude.clone(),
      longitude: self.longitude.clone(),
    }
  }
}

// ─── Creation input ──────────────────────────────────────────────────────────

/// Fields a staff member supplies when registering a profile. Flagging
/// fields are not settable here.
///
/// The aliases are the field names the mobile clients send.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
  pub photo:                Option<String>,
  pub name:                 String,
  pub age:                  u32,
  #[serde(alias = "aadhar_number")]
  pub national_id:          String,
  pub phone_number:         String,
  #[serde(alias = "email_id")]
  pub email:                String,
  pub course_name:          String,
  pub course_year:          String,
  #[serde(alias = "passingout_year")]
  pub passing_out_year:     String,
  #[serde(alias = "college_register_number")]
  pub registration_number:  String,
  #[serde(alias = "college_name")]
  pub institution_name:     String,
  pub parents_address:      String,
  pub parents_phone_number: String,
  #[serde(alias = "present_residential_address")]
  pub residential_address:  Option<String>,
  pub latitude:             Option<String>,
  pub longitude:            Option<String>,
  pub residency_name:       Option<String>,
  #[serde(alias = "residency_ownername")]
  pub residency_owner_name: Option<String>,
  pub owner_phone_number:   Option<String>,
  pub room_number:          Option<String>,
  #[serde(default)]
  pub previous_cases_count: u32,
  pub vehicle_number:       Option<String>,
}

impl NewProfile {
  pub fn validate(&self) -> Result<()> {
    require("name", &self.name)?;
    require("national id", &self.national_id)?;
    if self.national_id.chars().count() > NATIONAL_ID_MAX_LEN {
      return Err(Error::Validation(format!(
        "national id must be at most {NATIONAL_ID_MAX_LEN} characters"
      )));
    }
    require("phone number", &self.phone_number)?;
    require_email("email", &self.email)?;
    require("course name", &self.course_name)?;
    require("course year", &self.course_year)?;
    require("passing out year", &self.passing_out_year)?;
    require("registration number", &self.registration_number)?;
    require("institution name", &self.institution_name)?;
    require("parents address", &self.parents_address)?;
    require("parents phone number", &self.parents_phone_number)
  }

  /// The photo reference to persist, falling back to [`DEFAULT_PHOTO`].
  pub fn photo_or_default(&self) -> String {
    self
      .photo
      .as_deref()
      .filter(|p| !p.trim().is_empty())
      .unwrap_or(DEFAULT_PHOTO)
      .to_owned()
  }
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

/// The three-attribute composite that identifies a student at an
/// institution. All three must match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileKey {
  pub name:                String,
  pub registration_number: String,
  pub institution_name:    String,
}

impl ProfileKey {
  pub fn validate(&self) -> Result<()> {
    require("name", &self.name)?;
    require("registration number", &self.registration_number)?;
    require("institution name", &self.institution_name)
  }
}

/// A flagging request applied to the profile matched by `key`.
#[derive(Debug, Clone)]
pub struct Flag {
  pub key:    ProfileKey,
  pub reason: Option<String>,
  /// Replaces the stored evidence only when present and non-empty.
  pub image:  Option<String>,
}

impl Flag {
  /// The image reference to write, or `None` to leave the stored one alone.
  pub fn replacement_image(&self) -> Option<&str> {
    self.image.as_deref().filter(|i| !i.trim().is_empty())
  }
}

/// A latitude/longitude pair as stored: free text, possibly absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
  pub latitude:  Option<String>,
  pub longitude: Option<String>,
}
