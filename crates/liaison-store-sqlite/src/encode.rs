//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as
//! `YYYY-MM-DD`, principal kinds by their wire tag.

use chrono::{DateTime, NaiveDate, Utc};
use liaison_core::{
  channel::{Attribution, Broadcast, Feedback, Rating},
  principal::{LoginRecord, Officer, PrincipalKind, PrincipalRef, Staff, Token},
  profile::Profile,
  task::{Completion, Task},
};

use crate::{Error, Result};

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── PrincipalKind ───────────────────────────────────────────────────────────

pub fn encode_kind(k: PrincipalKind) -> &'static str { k.as_str() }

pub fn decode_kind(s: &str) -> Result<PrincipalKind> {
  match s {
    "staff" => Ok(PrincipalKind::Staff),
    "police" => Ok(PrincipalKind::Officer),
    other => Err(Error::Corrupt { column: "user_type", value: other.to_owned() }),
  }
}

// ─── Principals ──────────────────────────────────────────────────────────────

pub const STAFF_COLUMNS: &str =
  "id, name, institution_name, profession, email, password, token";

pub const OFFICER_COLUMNS: &str = "id, name, profession, email, password, token";

pub fn staff_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Staff> {
  Ok(Staff {
    id:               row.get(0)?,
    name:             row.get(1)?,
    institution_name: row.get(2)?,
    profession:       row.get(3)?,
    email:            row.get(4)?,
    password:         row.get(5)?,
    token:            Token::from(row.get::<_, String>(6)?),
  })
}

pub fn officer_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Officer> {
  Ok(Officer {
    id:         row.get(0)?,
    name:       row.get(1)?,
    profession: row.get(2)?,
    email:      row.get(3)?,
    password:   row.get(4)?,
    token:      Token::from(row.get::<_, String>(5)?),
  })
}

// ─── Profiles ────────────────────────────────────────────────────────────────

pub const PROFILE_COLUMNS: &str = "
  id, created_by, photo, name, age, national_id, phone_number, email,
  course_name, course_year, passing_out_year, registration_number,
  institution_name, parents_address, parents_phone_number,
  residential_address, latitude, longitude, residency_name,
  residency_owner_name, owner_phone_number, room_number,
  previous_cases_count, vehicle_number, flagged_reason,
  flagged_reason_image, flag_count";

/// Profiles hold no encoded columns, so rows map straight across.
pub fn profile_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Profile> {
  Ok(Profile {
    id:                   row.get(0)?,
    created_by:           row.get(1)?,
    photo:                row.get(2)?,
    name:                 row.get(3)?,
    age:                  row.get(4)?,
    national_id:          row.get(5)?,
    phone_number:         row.get(6)?,
    email:                row.get(7)?,
    course_name:          row.get(8)?,
    course_year:          row.get(9)?,
    passing_out_year:     row.get(10)?,
    registration_number:  row.get(11)?,
    institution_name:     row.get(12)?,
    parents_address:      row.get(13)?,
    parents_phone_number: row.get(14)?,
    residential_address:  row.get(15)?,
    latitude:             row.get(16)?,
    longitude:            row.get(17)?,
    residency_name:       row.get(18)?,
    residency_owner_name: row.get(19)?,
    owner_phone_number:   row.get(20)?,
    room_number:          row.get(21)?,
    previous_cases_count: row.get(22)?,
    vehicle_number:       row.get(23)?,
    flagged_reason:       row.get(24)?,
    flagged_reason_image: row.get(25)?,
    flag_count:           row.get(26)?,
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const TASK_COLUMNS: &str =
  "id, created_by, assigned_officer, description, created_at, completed, completed_at";

/// Raw values read directly from a `tasks` row.
pub struct RawTask {
  pub id:               i64,
  pub created_by:       i64,
  pub assigned_officer: String,
  pub description:      String,
  pub created_at:       String,
  pub completed:        bool,
  pub completed_at:     Option<String>,
}

impl RawTask {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      created_by:       row.get(1)?,
      assigned_officer: row.get(2)?,
      description:      row.get(3)?,
      created_at:       row.get(4)?,
      completed:        row.get(5)?,
      completed_at:     row.get(6)?,
    })
  }

  pub fn into_task(self) -> Result<Task> {
    let completed_at = self.completed_at.as_deref().map(decode_dt).transpose()?;
    Ok(Task {
      id:               self.id,
      created_by:       self.created_by,
      assigned_officer: self.assigned_officer,
      description:      self.description,
      created_at:       decode_dt(&self.created_at)?,
      completion:       Completion::from_parts(self.completed, completed_at)?,
    })
  }
}

pub const FEEDBACK_COLUMNS: &str = "id, staff_user, police_user, feedback, rating, created_at";

/// Raw values read directly from a `feedback` row.
pub struct RawFeedback {
  pub id:          i64,
  pub staff_user:  Option<i64>,
  pub police_user: Option<i64>,
  pub feedback:    String,
  pub rating:      i64,
  pub created_at:  String,
}

impl RawFeedback {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      staff_user:  row.get(1)?,
      police_user: row.get(2)?,
      feedback:    row.get(3)?,
      rating:      row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_feedback(self) -> Result<Feedback> {
    let author = match (self.staff_user, self.police_user) {
      (Some(id), None) => PrincipalRef { kind: PrincipalKind::Staff, id },
      (None, Some(id)) => PrincipalRef { kind: PrincipalKind::Officer, id },
      (staff, police) => {
        return Err(Error::Corrupt {
          column: "feedback author",
          value:  format!("staff_user={staff:?}, police_user={police:?}"),
        });
      }
    };
    Ok(Feedback {
      id: self.id,
      author,
      feedback: self.feedback,
      rating: Rating::new(self.rating)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const BROADCAST_COLUMNS: &str =
  "id, staff_user, police_user, title, description, image, place, date, created_at";

/// Raw values read directly from a `broadcasts` row.
pub struct RawBroadcast {
  pub id:          i64,
  pub staff_user:  Option<i64>,
  pub police_user: Option<i64>,
  pub title:       String,
  pub description: String,
  pub image:       Option<String>,
  pub place:       String,
  pub date:        String,
  pub created_at:  String,
}

impl RawBroadcast {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      staff_user:  row.get(1)?,
      police_user: row.get(2)?,
      title:       row.get(3)?,
      description: row.get(4)?,
      image:       row.get(5)?,
      place:       row.get(6)?,
      date:        row.get(7)?,
      created_at:  row.get(8)?,
    })
  }

  pub fn into_broadcast(self) -> Result<Broadcast> {
    Ok(Broadcast {
      id:          self.id,
      attribution: Attribution { staff_user: self.staff_user, police_user: self.police_user },
      title:       self.title,
      description: self.description,
      image:       self.image,
      place:       self.place,
      date:        decode_date(&self.date)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `login_records` row.
pub struct RawLogin {
  pub id:         i64,
  pub user_type:  String,
  pub email:      String,
  pub login_time: String,
}

impl RawLogin {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      user_type:  row.get(1)?,
      email:      row.get(2)?,
      login_time: row.get(3)?,
    })
  }

  pub fn into_record(self) -> Result<LoginRecord> {
    Ok(LoginRecord {
      id:         self.id,
      user_type:  decode_kind(&self.user_type)?,
      email:      self.email,
      login_time: decode_dt(&self.login_time)?,
    })
  }
}
