//! [`SqliteStore`]: the SQLite implementation of [`LiaisonStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use liaison_core::{
  channel::{Attribution, Broadcast, Feedback, NewBroadcast, NewFeedback},
  principal::{
    LoginRecord, NewPrincipal, Officer, Principal, PrincipalKind, Staff, Token,
  },
  profile::{Coordinates, NewProfile, Profile, ProfileKey},
  store::{LiaisonStore, Lookup},
  task::{Completion, NewTask, Task},
};

use crate::{
  Error, Result,
  encode::{
    BROADCAST_COLUMNS, FEEDBACK_COLUMNS, OFFICER_COLUMNS, PROFILE_COLUMNS, RawBroadcast,
    RawFeedback, RawLogin, RawTask, STAFF_COLUMNS, TASK_COLUMNS, encode_date, encode_dt,
    encode_kind, officer_from_row, profile_from_row, staff_from_row,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A liaison store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn profile_by_id(&self, id: i64) -> Result<Option<Profile>> {
    let profile = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
            rusqlite::params![id],
            profile_from_row,
          )
          .optional()?)
      })
      .await?;
    Ok(profile)
  }
}

// ─── LiaisonStore impl ───────────────────────────────────────────────────────

impl LiaisonStore for SqliteStore {
  type Error = Error;

  // ── Principals ────────────────────────────────────────────────────────────

  async fn register(&self, input: NewPrincipal) -> Result<Principal> {
    let token = Token::generate();
    let token_str = token.as_str().to_owned();

    match input {
      NewPrincipal::Staff(s) => {
        let row = s.clone();
        let id = self
          .conn
          .call(move |conn| {
            conn.execute(
              "INSERT INTO staff (name, institution_name, profession, email, password, token)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
              rusqlite::params![
                row.name,
                row.institution_name,
                row.profession,
                row.email,
                row.password,
                token_str,
              ],
            )?;
            Ok(conn.last_insert_rowid())
          })
          .await
          .map_err(Error::from_write)?;

        Ok(Principal::Staff(Staff {
          id,
          name: s.name,
          institution_name: s.institution_name,
          profession: s.profession,
          email: s.email,
          password: s.password,
          token,
        }))
      }
      NewPrincipal::Officer(o) => {
        let row = o.clone();
        let id = self
          .conn
          .call(move |conn| {
            conn.execute(
              "INSERT INTO officers (name, profession, email, password, token)
               VALUES (?1, ?2, ?3, ?4, ?5)",
              rusqlite::params![row.name, row.profession, row.email, row.password, token_str],
            )?;
            Ok(conn.last_insert_rowid())
          })
          .await
          .map_err(Error::from_write)?;

        Ok(Principal::Officer(Officer {
          id,
          name: o.name,
          profession: o.profession,
          email: o.email,
          password: o.password,
          token,
        }))
      }
    }
  }

  async fn find_principal(&self, kind: PrincipalKind, by: Lookup) -> Result<Option<Principal>> {
    let (column, value) = match by {
      Lookup::Token(t) => ("token", t),
      Lookup::Email(e) => ("email", e),
    };

    let found = match kind {
      PrincipalKind::Staff => {
        let sql =
          format!("SELECT {STAFF_COLUMNS} FROM staff WHERE {column} = ?1 ORDER BY id LIMIT 1");
        self
          .conn
          .call(move |conn| {
            Ok(conn.query_row(&sql, rusqlite::params![value], staff_from_row).optional()?)
          })
          .await?
          .map(Principal::Staff)
      }
      PrincipalKind::Officer => {
        let sql = format!(
          "SELECT {OFFICER_COLUMNS} FROM officers WHERE {column} = ?1 ORDER BY id LIMIT 1"
        );
        self
          .conn
          .call(move |conn| {
            Ok(conn.query_row(&sql, rusqlite::params![value], officer_from_row).optional()?)
          })
          .await?
          .map(Principal::Officer)
      }
    };

    Ok(found)
  }

  async fn list_officers(&self) -> Result<Vec<Officer>> {
    let officers = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {OFFICER_COLUMNS} FROM officers ORDER BY id"))?;
        let rows = stmt
          .query_map([], officer_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(officers)
  }

  async fn record_login(&self, kind: PrincipalKind, email: String) -> Result<LoginRecord> {
    let login_time = Utc::now();
    let kind_str = encode_kind(kind);
    let at_str = encode_dt(login_time);
    let email_col = email.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO login_records (user_type, email, login_time) VALUES (?1, ?2, ?3)",
          rusqlite::params![kind_str, email_col, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(LoginRecord { id, user_type: kind, email, login_time })
  }

  async fn list_logins(&self) -> Result<Vec<LoginRecord>> {
    let raws: Vec<RawLogin> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT id, user_type, email, login_time FROM login_records ORDER BY id")?;
        let rows = stmt
          .query_map([], RawLogin::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLogin::into_record).collect()
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn add_profile(&self, created_by: i64, input: NewProfile) -> Result<Profile> {
    let photo = input.photo_or_default();

    let profile = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (
             created_by, photo, name, age, national_id, phone_number, email,
             course_name, course_year, passing_out_year, registration_number,
             institution_name, parents_address, parents_phone_number,
             residential_address, latitude, longitude, residency_name,
             residency_owner_name, owner_phone_number, room_number,
             previous_cases_count, vehicle_number
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                     ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)",
          rusqlite::params![
            created_by,
            photo,
            input.name,
            input.age,
            input.national_id,
            input.phone_number,
            input.email,
            input.course_name,
            input.course_year,
            input.passing_out_year,
            input.registration_number,
            input.institution_name,
            input.parents_address,
            input.parents_phone_number,
            input.residential_address,
            input.latitude,
            input.longitude,
            input.residency_name,
            input.residency_owner_name,
            input.owner_phone_number,
            input.room_number,
            input.previous_cases_count,
            input.vehicle_number,
          ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(conn.query_row(
          &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
          rusqlite::params![id],
          profile_from_row,
        )?)
      })
      .await
      .map_err(Error::from_write)?;

    Ok(profile)
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    let profiles = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY id"))?;
        let rows = stmt
          .query_map([], profile_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(profiles)
  }

  async fn find_profiles(&self, key: ProfileKey) -> Result<Vec<Profile>> {
    let profiles = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFILE_COLUMNS} FROM profiles
           WHERE name = ?1 AND registration_number = ?2 AND institution_name = ?3
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![key.name, key.registration_number, key.institution_name],
            profile_from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(profiles)
  }

  async fn flag_profile(
    &self,
    id: i64,
    reason: Option<String>,
    image: Option<String>,
  ) -> Result<Option<Profile>> {
    // Single statement so concurrent flaggers cannot lose an increment.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE profiles
           SET flagged_reason       = ?2,
               flagged_reason_image = COALESCE(?3, flagged_reason_image),
               flag_count           = flag_count + 1
           WHERE id = ?1",
          rusqlite::params![id, reason, image],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.profile_by_id(id).await
  }

  async fn profiles_at(&self, at: Coordinates) -> Result<Vec<Profile>> {
    let profiles = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFILE_COLUMNS} FROM profiles
           WHERE latitude = ?1 AND longitude = ?2
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![at.latitude, at.longitude], profile_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(profiles)
  }

  async fn distinct_coordinates(&self) -> Result<Vec<Coordinates>> {
    let pairs = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT DISTINCT latitude, longitude FROM profiles")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Coordinates { latitude: row.get(0)?, longitude: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(pairs)
  }

  // ── Tasks ─────────────────────────────────────────────────────────────────

  async fn add_task(&self, created_by: i64, input: NewTask) -> Result<Task> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let row = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tasks (created_by, assigned_officer, description, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![created_by, row.assigned_officer, row.description, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Task {
      id,
      created_by,
      assigned_officer: input.assigned_officer,
      description: input.description,
      created_at,
      completion: Completion::Open,
    })
  }

  async fn tasks_created_by(&self, officer_id: i64) -> Result<Vec<Task>> {
    let raws: Vec<RawTask> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TASK_COLUMNS} FROM tasks WHERE created_by = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![officer_id], RawTask::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTask::into_task).collect()
  }

  async fn set_task_completion(
    &self,
    officer_id: i64,
    task_id: i64,
    completed: bool,
  ) -> Result<Option<Task>> {
    let now = Utc::now();

    let task = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let raw = tx
          .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND created_by = ?2"),
            rusqlite::params![task_id, officer_id],
            RawTask::from_row,
          )
          .optional()?;
        let Some(raw) = raw else {
          return Ok(None);
        };

        let mut task = raw
          .into_task()
          .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;
        task.completion = task.completion.transition(completed, now);

        tx.execute(
          "UPDATE tasks SET completed = ?2, completed_at = ?3 WHERE id = ?1",
          rusqlite::params![
            task.id,
            task.completion.is_complete(),
            task.completion.completed_at().map(encode_dt),
          ],
        )?;
        tx.commit()?;

        Ok(Some(task))
      })
      .await?;

    Ok(task)
  }

  // ── Channels ──────────────────────────────────────────────────────────────

  async fn add_feedback(&self, input: NewFeedback) -> Result<Feedback> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let Attribution { staff_user, police_user } = Attribution::from_principal(input.author);
    let text = input.feedback.clone();
    let rating = input.rating.get();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO feedback (staff_user, police_user, feedback, rating, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![staff_user, police_user, text, rating, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Feedback {
      id,
      author: input.author,
      feedback: input.feedback,
      rating: input.rating,
      created_at,
    })
  }

  async fn list_feedback(&self) -> Result<Vec<Feedback>> {
    let raws: Vec<RawFeedback> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {FEEDBACK_COLUMNS} FROM feedback ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawFeedback::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFeedback::into_feedback).collect()
  }

  async fn add_broadcast(&self, input: NewBroadcast) -> Result<Broadcast> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let date_str = encode_date(input.content.date);
    let attribution = input.attribution;
    let content = input.content.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO broadcasts (
             staff_user, police_user, title, description, image, place, date, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            attribution.staff_user,
            attribution.police_user,
            content.title,
            content.description,
            content.image,
            content.place,
            date_str,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    let content = input.content;
    Ok(Broadcast {
      id,
      attribution,
      title: content.title,
      description: content.description,
      image: content.image,
      place: content.place,
      date: content.date,
      created_at,
    })
  }

  async fn list_broadcasts(&self) -> Result<Vec<Broadcast>> {
    let raws: Vec<RawBroadcast> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {BROADCAST_COLUMNS} FROM broadcasts ORDER BY date DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map([], RawBroadcast::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBroadcast::into_broadcast).collect()
  }
}
