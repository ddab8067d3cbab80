//! Error type for `liaison-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] liaison_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A value read from a column does not decode to its domain type.
  #[error("corrupt column {column}: {value:?}")]
  Corrupt { column: &'static str, value: String },

  /// A UNIQUE constraint rejected a write. Carries the `table.column` that
  /// collided.
  #[error("{0} already exists")]
  Duplicate(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  /// Classify a write failure, pulling UNIQUE violations out into
  /// [`Error::Duplicate`].
  pub(crate) fn from_write(e: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(err, Some(msg))) = &e
      && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    {
      let column = msg
        .strip_prefix("UNIQUE constraint failed: ")
        .unwrap_or(msg.as_str())
        .to_owned();
      return Self::Duplicate(column);
    }
    Self::Database(e)
  }
}

impl From<Error> for liaison_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      Error::Duplicate(column) => liaison_core::Error::Conflict(describe_duplicate(&column)),
      other => liaison_core::Error::Store(Box::new(other)),
    }
  }
}

/// Human-facing message for a UNIQUE violation on `table.column`.
fn describe_duplicate(column: &str) -> String {
  match column {
    "staff.email" | "officers.email" => "user with this email already exists".to_owned(),
    "profiles.national_id" => "profile with this national id already exists".to_owned(),
    "profiles.email" => "profile with this email already exists".to_owned(),
    other => format!("{other} already exists"),
  }
}
