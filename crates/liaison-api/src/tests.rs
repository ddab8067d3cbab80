use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use liaison_core::Liaison;
use liaison_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(Arc::new(Liaison::new(store)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(json) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(json.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  app.clone().oneshot(req).await.unwrap()
}

async fn body_json(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

/// Sign up a principal and return its token.
async fn sign_up(app: &Router, user_type: &str, email: &str) -> String {
  let resp = send(
    app,
    "POST",
    "/signup",
    Some(json!({
      "user_type": user_type,
      "name": "Someone",
      "email": email,
      "password": "pw",
      "profession": "Officer",
      "college_name": "MIT",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  body_json(resp).await["token"].as_str().unwrap().to_owned()
}

fn profile_body(token: &str) -> Value {
  json!({
    "token": token,
    "name": "Ravi",
    "age": 20,
    "national_id": "123456789012",
    "phone_number": "9000000000",
    "email": "ravi@x.com",
    "course_name": "CS",
    "course_year": "2",
    "passing_out_year": "2026",
    "registration_number": "R1",
    "institution_name": "MIT",
    "parents_address": "Somewhere",
    "parents_phone_number": "9111111111",
    "latitude": "12.9",
    "longitude": "77.5",
  })
}

// ── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ping_reports_working() {
  let app = app().await;
  let resp = send(&app, "GET", "/test", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await["message"], "API Working");
}

#[tokio::test]
async fn signup_hides_password_and_returns_token() {
  let app = app().await;
  let resp = send(
    &app,
    "POST",
    "/signup",
    Some(json!({
      "user_type": "Police",
      "name": "B",
      "email": "b@y.com",
      "password": "q",
      "profession": "Inspector",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = body_json(resp).await;
  assert_eq!(body["user_type"], "police");
  assert!(body.get("password").is_none());
  assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn signup_with_missing_fields_is_400() {
  let app = app().await;
  let resp = send(&app, "POST", "/signup", Some(json!({ "user_type": "staff" }))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(body_json(resp).await["error"], "all fields are required");
}

#[tokio::test]
async fn duplicate_signup_is_409() {
  let app = app().await;
  sign_up(&app, "staff", "a@x.com").await;
  let resp = send(
    &app,
    "POST",
    "/signup",
    Some(json!({
      "user_type": "staff",
      "name": "Again",
      "email": "a@x.com",
      "password": "pw",
      "profession": "Warden",
      "college_name": "MIT",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_returns_token_or_401() {
  let app = app().await;
  let token = sign_up(&app, "police", "b@y.com").await;

  let ok = send(&app, "POST", "/login", Some(json!({ "email": "b@y.com", "password": "pw" }))).await;
  assert_eq!(ok.status(), StatusCode::OK);
  let body = body_json(ok).await;
  assert_eq!(body["message"], "Login successful");
  assert_eq!(body["user_type"], "police");
  assert_eq!(body["token"], token);

  let bad = send(&app, "POST", "/login", Some(json!({ "email": "b@y.com", "password": "no" }))).await;
  assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
  assert_eq!(bad.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Token");
}

#[tokio::test]
async fn officer_directory_omits_credentials() {
  let app = app().await;
  sign_up(&app, "police", "b@y.com").await;
  sign_up(&app, "staff", "a@x.com").await;

  let body = body_json(send(&app, "GET", "/police", None).await).await;
  let officers = body.as_array().unwrap();
  assert_eq!(officers.len(), 1);
  assert_eq!(officers[0]["email"], "b@y.com");
  assert!(officers[0].get("token").is_none());
  assert!(officers[0].get("password").is_none());
}

#[tokio::test]
async fn malformed_json_is_400_with_error_body() {
  let app = app().await;
  let req = Request::builder()
    .method("POST")
    .uri("/login")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(body_json(resp).await["error"].is_string());
}

// ── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_creation_requires_staff_token() {
  let app = app().await;
  let staff = sign_up(&app, "staff", "a@x.com").await;
  let police = sign_up(&app, "police", "b@y.com").await;

  let resp = send(&app, "POST", "/userprofiles/create", Some(profile_body(&police))).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = send(&app, "POST", "/userprofiles/create", Some(profile_body("nope"))).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = send(&app, "POST", "/userprofiles/create", Some(profile_body(&staff))).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = body_json(resp).await;
  assert_eq!(body["flag_count"], 0);
  assert_eq!(body["photo"], "photos/default.jpg");

  let resp = send(&app, "POST", "/userprofiles/create", Some(profile_body(&staff))).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn authorization_header_carries_token() {
  let app = app().await;
  let staff = sign_up(&app, "staff", "a@x.com").await;
  let mut body = profile_body("");
  body.as_object_mut().unwrap().remove("token");

  let req = Request::builder()
    .method("POST")
    .uri("/userprofiles/create")
    .header(header::CONTENT_TYPE, "application/json")
    .header(header::AUTHORIZATION, format!("Token {staff}"))
    .body(Body::from(body.to_string()))
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn lookup_flag_and_coordinates() {
  let app = app().await;
  let staff = sign_up(&app, "staff", "a@x.com").await;
  send(&app, "POST", "/userprofiles/create", Some(profile_body(&staff))).await;

  let resp = send(
    &app,
    "GET",
    "/student-profile?name=Ravi&registration_number=R1&institution_name=MIT",
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await["name"], "Ravi");

  let resp = send(
    &app,
    "GET",
    "/student-profile?name=Ravi&registration_number=R2&institution_name=MIT",
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  for expected in 1..=2 {
    let resp = send(
      &app,
      "POST",
      "/redflag",
      Some(json!({
        "name": "Ravi",
        "registration_number": "R1",
        "institution_name": "MIT",
        "flagged_reason": "late",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["flag_count"], expected);
    assert_eq!(body["flagged_reason"], "late");
  }

  let body = body_json(send(&app, "GET", "/latlongs", None).await).await;
  assert_eq!(body, json!([{ "latitude": "12.9", "longitude": "77.5" }]));

  let resp = send(&app, "GET", "/profile_by_latlong?latitude=12.9&longitude=77.5", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await["flag_count"], 2);

  let resp = send(&app, "GET", "/profile_by_latlong?latitude=12.9", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(&app, "GET", "/profile_by_latlong?latitude=1&longitude=2", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mobile_client_field_names_and_trailing_slashes() {
  let app = app().await;
  let staff = sign_up(&app, "staff", "a@x.com").await;

  let resp = send(
    &app,
    "POST",
    "/userprofiles/create/",
    Some(json!({
      "token": staff,
      "name": "Ravi",
      "age": 20,
      "aadhar_number": "123456789012",
      "phone_number": "9000000000",
      "email_id": "ravi@x.com",
      "course_name": "CS",
      "course_year": "2",
      "passingout_year": "2026",
      "college_register_number": "R1",
      "college_name": "MIT",
      "parents_address": "Somewhere",
      "parents_phone_number": "9111111111",
      "present_residential_address": "Hostel",
      "residency_ownername": "Mr. K",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = body_json(resp).await;
  assert_eq!(created["national_id"], "123456789012");
  assert_eq!(created["residency_owner_name"], "Mr. K");

  let resp = send(
    &app,
    "GET",
    "/student-profile/?name=Ravi&college_register_number=R1&college_name=MIT",
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = send(
    &app,
    "POST",
    "/redflag/",
    Some(json!({
      "name": "Ravi",
      "roll_number": "R1",
      "college": "MIT",
      "flagged_reason": "late",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await["flag_count"], 1);

  let police = sign_up(&app, "police", "b@y.com").await;
  let resp = send(
    &app,
    "POST",
    "/tasks/create/",
    Some(json!({ "token": police, "police_user": "Officer K", "description": "Patrol" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let id = body_json(resp).await["id"].as_i64().unwrap();

  let resp = send(&app, "GET", &format!("/tasks/?token={police}"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await[0]["assigned_officer"], "Officer K");

  let resp = send(
    &app,
    "PUT",
    &format!("/tasks/update/{id}/"),
    Some(json!({ "token": police, "completed": true })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
}

// ── Tasks ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn tasks_are_scoped_to_their_creator() {
  let app = app().await;
  let first = sign_up(&app, "police", "b@y.com").await;
  let second = sign_up(&app, "police", "c@y.com").await;

  let resp = send(
    &app,
    "POST",
    "/tasks/create",
    Some(json!({ "token": first, "assigned_officer": "Officer K", "description": "Patrol" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let task = body_json(resp).await;
  assert_eq!(task["completed"], false);
  assert!(task["completed_at"].is_null());
  let id = task["id"].as_i64().unwrap();

  let mine = body_json(send(&app, "GET", &format!("/tasks?token={first}"), None).await).await;
  assert_eq!(mine.as_array().unwrap().len(), 1);
  let theirs = body_json(send(&app, "GET", &format!("/tasks?token={second}"), None).await).await;
  assert!(theirs.as_array().unwrap().is_empty());

  let uri = format!("/tasks/update/{id}");
  let resp = send(&app, "PUT", &uri, Some(json!({ "token": second, "completed": true }))).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let resp = send(&app, "PUT", &uri, Some(json!({ "token": first }))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(&app, "PUT", &uri, Some(json!({ "token": first, "completed": true }))).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let done = body_json(resp).await;
  assert_eq!(done["completed"], true);
  assert!(done["completed_at"].is_string());
}

#[tokio::test]
async fn staff_cannot_manage_tasks() {
  let app = app().await;
  let staff = sign_up(&app, "staff", "a@x.com").await;
  let resp = send(&app, "GET", &format!("/tasks?token={staff}"), None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = send(&app, "GET", "/tasks", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Channels ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn feedback_rating_is_validated() {
  let app = app().await;
  let token = sign_up(&app, "staff", "a@x.com").await;

  for rating in [0, 6] {
    let resp = send(
      &app,
      "POST",
      "/feedback/create",
      Some(json!({ "token": token, "feedback": "ok", "rating": rating })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  let resp = send(
    &app,
    "POST",
    "/feedback/create",
    Some(json!({ "token": token, "feedback": "ok" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(
    &app,
    "POST",
    "/feedback/create",
    Some(json!({ "token": token, "feedback": "great", "rating": 5 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);

  let all = body_json(send(&app, "GET", "/feedback", None).await).await;
  assert_eq!(all.as_array().unwrap().len(), 1);
  assert_eq!(all[0]["rating"], 5);
  assert!(all[0]["staff_user"].is_number());
  assert!(all[0]["police_user"].is_null());
}

#[tokio::test]
async fn broadcasts_list_latest_date_first() {
  let app = app().await;
  let staff = sign_up(&app, "staff", "a@x.com").await;
  let police = sign_up(&app, "police", "b@y.com").await;

  for (token, title, date) in [(&staff, "Fair", "2025-01-01"), (&police, "Drive", "2025-03-01")] {
    let resp = send(
      &app,
      "POST",
      "/broadcast/create",
      Some(json!({
        "token": token,
        "title": title,
        "description": "d",
        "place": "Hall",
        "date": date,
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  let all = body_json(send(&app, "GET", "/broadcast", None).await).await;
  assert_eq!(all[0]["title"], "Drive");
  assert!(all[0]["staff_user"].is_null());
  assert!(all[0]["police_user"].is_number());
  assert_eq!(all[1]["title"], "Fair");
  assert!(all[1]["staff_user"].is_number());
}
