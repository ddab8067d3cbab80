//! SQL schema for the liaison SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Tokens are not UNIQUE: uniqueness comes from UUID generation only.
CREATE TABLE IF NOT EXISTS staff (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    name             TEXT NOT NULL,
    institution_name TEXT NOT NULL,
    profession       TEXT NOT NULL,
    email            TEXT NOT NULL UNIQUE,
    password         TEXT NOT NULL,
    token            TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS officers (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    profession TEXT NOT NULL,
    email      TEXT NOT NULL UNIQUE,
    password   TEXT NOT NULL,
    token      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    created_by           INTEGER NOT NULL REFERENCES staff(id) ON DELETE CASCADE,
    photo                TEXT NOT NULL,
    name                 TEXT NOT NULL,
    age                  INTEGER NOT NULL CHECK (age >= 0),
    national_id          TEXT NOT NULL UNIQUE,
    phone_number         TEXT NOT NULL,
    email                TEXT NOT NULL UNIQUE,
    course_name          TEXT NOT NULL,
    course_year          TEXT NOT NULL,
    passing_out_year     TEXT NOT NULL,
    registration_number  TEXT NOT NULL,
    institution_name     TEXT NOT NULL,
    parents_address      TEXT NOT NULL,
    parents_phone_number TEXT NOT NULL,
    residential_address  TEXT,
    latitude             TEXT,            -- free text, matched exactly
    longitude            TEXT,
    residency_name       TEXT,
    residency_owner_name TEXT,
    owner_phone_number   TEXT,
    room_number          TEXT,
    previous_cases_count INTEGER NOT NULL DEFAULT 0 CHECK (previous_cases_count >= 0),
    vehicle_number       TEXT,
    flagged_reason       TEXT,
    flagged_reason_image TEXT,
    flag_count           INTEGER NOT NULL DEFAULT 0 CHECK (flag_count >= 0)
);

-- assigned_officer is a free-text label, deliberately not a foreign key.
CREATE TABLE IF NOT EXISTS tasks (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    created_by       INTEGER NOT NULL REFERENCES officers(id) ON DELETE CASCADE,
    assigned_officer TEXT NOT NULL,
    description      TEXT NOT NULL,
    created_at       TEXT NOT NULL,
    completed        INTEGER NOT NULL DEFAULT 0,
    completed_at     TEXT,
    CHECK ((completed = 0 AND completed_at IS NULL)
        OR (completed = 1 AND completed_at IS NOT NULL))
);

CREATE TABLE IF NOT EXISTS feedback (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    staff_user  INTEGER REFERENCES staff(id) ON DELETE CASCADE,
    police_user INTEGER REFERENCES officers(id) ON DELETE CASCADE,
    feedback    TEXT NOT NULL,
    rating      INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    created_at  TEXT NOT NULL,
    CHECK ((staff_user IS NULL) != (police_user IS NULL))
);

CREATE TABLE IF NOT EXISTS broadcasts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    staff_user  INTEGER REFERENCES staff(id) ON DELETE CASCADE,
    police_user INTEGER REFERENCES officers(id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    image       TEXT,
    place       TEXT NOT NULL,
    date        TEXT NOT NULL,   -- YYYY-MM-DD
    created_at  TEXT NOT NULL,
    CHECK (staff_user IS NOT NULL OR police_user IS NOT NULL)
);

-- Append-only. No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS login_records (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_type  TEXT NOT NULL,   -- 'staff' | 'police'
    email      TEXT NOT NULL,
    login_time TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS staff_token_idx       ON staff(token);
CREATE INDEX IF NOT EXISTS officers_token_idx    ON officers(token);
CREATE INDEX IF NOT EXISTS profiles_identity_idx ON profiles(name, registration_number, institution_name);
CREATE INDEX IF NOT EXISTS profiles_coords_idx   ON profiles(latitude, longitude);
CREATE INDEX IF NOT EXISTS tasks_creator_idx     ON tasks(created_by);

PRAGMA user_version = 1;
";
