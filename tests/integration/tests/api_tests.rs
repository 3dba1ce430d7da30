//! API integration tests
//!
//! Each test starts its own server over the seeded demo directory, so no
//! external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, test_config, TestServer,
};
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_seeded_login() {
    let server = TestServer::start().await.unwrap();
    let response = server.post("/auth/login", &LoginRequest::aarav()).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(auth.user.id, "p1");
    assert_eq!(auth.user.role, "patient");
    assert_eq!(auth.token_type, "Bearer");
    assert!(!auth.refresh_token.is_empty());
}

#[tokio::test]
async fn test_login_wrong_role() {
    let server = TestServer::start().await.unwrap();
    let mut request = LoginRequest::aarav();
    request.role = "doctor".to_string();

    let response = server.post("/auth/login", &request).await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_signup_and_current_user() {
    let server = TestServer::start().await.unwrap();
    let request = SignupRequest::unique_patient();

    let response = server.post("/auth/signup", &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(auth.user.email, request.email);

    let response = server.get_auth("/users/@me", &auth.access_token).await.unwrap();
    let me: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.id, auth.user.id);
    assert_eq!(me.name, request.name);

    let response = server.post("/auth/signup", &request).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_refresh_token() {
    let server = TestServer::start().await.unwrap();
    let response = server.post("/auth/login", &LoginRequest::dr_sharma()).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let response = server
        .post(
            "/auth/refresh",
            &serde_json::json!({ "refresh_token": auth.refresh_token }),
        )
        .await
        .unwrap();
    let refreshed: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(refreshed.user.id, "d1");
}

#[tokio::test]
async fn test_protected_route_rejects_bad_token() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/appointments").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth("/appointments", "not-a-jwt").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_TOKEN");
}

// ============================================================================
// Credential Tests
// ============================================================================

#[tokio::test]
async fn test_issue_and_validate() {
    let server = TestServer::start().await.unwrap();
    let patient = server.login(&LoginRequest::aarav()).await.unwrap();
    let doctor = server.login(&LoginRequest::dr_sharma()).await.unwrap();

    let response = server
        .post_empty_auth("/appointments/a1/credential", &patient)
        .await
        .unwrap();
    let credential: CredentialResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(credential.appointment_id, "a1");
    assert_eq!(credential.state, "ACTIVE");
    assert_eq!(
        credential.expires_at - credential.issued_at,
        chrono::Duration::minutes(10)
    );
    assert!(credential.expires_in > 0);
    assert!(credential.qr_svg.contains("<svg"));

    let response = server
        .post_auth("/credentials/validate", &doctor, &ValidateRequest::new(&credential.token))
        .await
        .unwrap();
    let result: ValidateResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(result.valid);
    assert_eq!(result.appointment.unwrap().id, "a1");
}

#[tokio::test]
async fn test_reissue_supersedes_previous_token() {
    let server = TestServer::start().await.unwrap();
    let patient = server.login(&LoginRequest::aarav()).await.unwrap();
    let doctor = server.login(&LoginRequest::dr_sharma()).await.unwrap();

    let first: CredentialResponse = assert_json(
        server.post_empty_auth("/appointments/a1/credential", &patient).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let second: CredentialResponse = assert_json(
        server.post_empty_auth("/appointments/a1/credential", &patient).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_ne!(first.token, second.token);
    assert_ne!(first.credential_id, second.credential_id);

    let old: ValidateResponse = assert_json(
        server
            .post_auth("/credentials/validate", &doctor, &ValidateRequest::new(&first.token))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(!old.valid);
    assert!(old.appointment.is_none());

    let new: ValidateResponse = assert_json(
        server
            .post_auth("/credentials/validate", &doctor, &ValidateRequest::new(&second.token))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(new.valid);
}

#[tokio::test]
async fn test_unknown_token_is_not_an_error() {
    let server = TestServer::start().await.unwrap();
    let doctor = server.login(&LoginRequest::dr_patel()).await.unwrap();

    let response = server
        .post_auth("/credentials/validate", &doctor, &ValidateRequest::new("forged-token"))
        .await
        .unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body, serde_json::json!({ "valid": false }));
}

#[tokio::test]
async fn test_capabilities_enforced() {
    let server = TestServer::start().await.unwrap();
    let aarav = server.login(&LoginRequest::aarav()).await.unwrap();
    let meera = server.login(&LoginRequest::meera()).await.unwrap();
    let doctor = server.login(&LoginRequest::dr_sharma()).await.unwrap();

    // Another patient's appointment
    let response = server.post_empty_auth("/appointments/a1/credential", &meera).await.unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_APPOINTMENT_PATIENT");

    // Doctors cannot issue
    let response = server.post_empty_auth("/appointments/a1/credential", &doctor).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    // Patients cannot validate
    let response = server
        .post_auth("/credentials/validate", &aarav, &ValidateRequest::new("anything"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "MISSING_PERMISSIONS");
}

#[tokio::test]
async fn test_empty_token_rejected() {
    let server = TestServer::start().await.unwrap();
    let doctor = server.login(&LoginRequest::dr_sharma()).await.unwrap();

    let response = server
        .post_auth("/credentials/validate", &doctor, &ValidateRequest::new(""))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_active_qr_and_revoke() {
    let server = TestServer::start().await.unwrap();
    let patient = server.login(&LoginRequest::meera()).await.unwrap();
    let doctor = server.login(&LoginRequest::dr_patel()).await.unwrap();

    let response = server.get_auth("/appointments/a2/credential", &patient).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let issued: CredentialResponse = assert_json(
        server.post_empty_auth("/appointments/a2/credential", &patient).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();

    let active: CredentialResponse = assert_json(
        server.get_auth("/appointments/a2/credential", &patient).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(active.credential_id, issued.credential_id);

    let response = server
        .get_auth("/appointments/a2/credential/qr.svg", &patient)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/svg+xml"
    );
    assert!(response.text().await.unwrap().contains("<svg"));

    let appointments: Vec<AppointmentResponse> = assert_json(
        server.get_auth("/appointments", &patient).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(appointments.len(), 1);
    assert!(appointments[0].credential_expires_at.is_some());

    let response = server.delete_auth("/appointments/a2/credential", &patient).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let result: ValidateResponse = assert_json(
        server
            .post_auth("/credentials/validate", &doctor, &ValidateRequest::new(&issued.token))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(!result.valid);
}

#[tokio::test]
async fn test_short_window_expires() {
    let mut config = test_config();
    config.credentials.ttl_secs = 1;
    let server = TestServer::start_with_config(config).await.unwrap();
    let patient = server.login(&LoginRequest::aarav()).await.unwrap();
    let doctor = server.login(&LoginRequest::dr_sharma()).await.unwrap();

    let issued: CredentialResponse = assert_json(
        server.post_empty_auth("/appointments/a1/credential", &patient).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();

    tokio::time::sleep(Duration::from_millis(1200)).await;

    let result: ValidateResponse = assert_json(
        server
            .post_auth("/credentials/validate", &doctor, &ValidateRequest::new(&issued.token))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(!result.valid);

    let response = server.get_auth("/appointments/a1/credential", &patient).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_single_use_mode() {
    let mut config = test_config();
    config.credentials.single_use = true;
    let server = TestServer::start_with_config(config).await.unwrap();
    let patient = server.login(&LoginRequest::aarav()).await.unwrap();
    let doctor = server.login(&LoginRequest::dr_sharma()).await.unwrap();
    let other_doctor = server.login(&LoginRequest::dr_patel()).await.unwrap();

    let issued: CredentialResponse = assert_json(
        server.post_empty_auth("/appointments/a1/credential", &patient).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();

    let validate = |token: &str| {
        let server = &server;
        let doctor = &doctor;
        let body = ValidateRequest::new(token);
        async move {
            let response = server.post_auth("/credentials/validate", doctor, &body).await.unwrap();
            assert_json::<ValidateResponse>(response, StatusCode::OK).await.unwrap().valid
        }
    };

    // Checking the code does not use it up
    assert!(validate(&issued.token).await);
    assert!(validate(&issued.token).await);

    let response = server
        .post_auth("/reports", &other_doctor, &CreateReportRequest::with_token(&issued.token))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_APPOINTMENT_DOCTOR");
    assert!(validate(&issued.token).await);

    let response = server
        .post_auth("/reports", &doctor, &CreateReportRequest::with_token(&issued.token))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    assert!(!validate(&issued.token).await);
    let response = server
        .post_auth("/reports", &doctor, &CreateReportRequest::with_token(&issued.token))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIAL");
}

#[tokio::test]
async fn test_event_stream_reports_supersede() {
    let server = TestServer::start().await.unwrap();
    let patient = server.login(&LoginRequest::aarav()).await.unwrap();

    let mut stream = server.get_auth("/credentials/events", &patient).await.unwrap();
    assert_eq!(stream.status(), StatusCode::OK);

    for _ in 0..2 {
        let response = server.post_empty_auth("/appointments/a1/credential", &patient).await.unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let mut received = String::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !received.contains("CREDENTIAL_SUPERSEDED") && tokio::time::Instant::now() < deadline {
        let chunk = tokio::time::timeout(Duration::from_secs(5), stream.chunk())
            .await
            .expect("event stream stalled")
            .unwrap();
        match chunk {
            Some(bytes) => received.push_str(&String::from_utf8_lossy(&bytes)),
            None => break,
        }
    }

    assert!(received.contains("event: CREDENTIAL_ISSUED"));
    assert!(received.contains("event: CREDENTIAL_SUPERSEDED"));
    assert!(!received.contains("token"));
}

#[tokio::test]
async fn test_doctor_cannot_open_event_stream() {
    let server = TestServer::start().await.unwrap();
    let doctor = server.login(&LoginRequest::dr_sharma()).await.unwrap();

    let response = server.get_auth("/credentials/events", &doctor).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Report Tests
// ============================================================================

#[tokio::test]
async fn test_report_gated_on_token() {
    let server = TestServer::start().await.unwrap();
    let patient = server.login(&LoginRequest::aarav()).await.unwrap();
    let doctor = server.login(&LoginRequest::dr_sharma()).await.unwrap();
    let other_doctor = server.login(&LoginRequest::dr_patel()).await.unwrap();

    let response = server
        .post_auth("/reports", &doctor, &CreateReportRequest::with_token("forged"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "INVALID_CREDENTIAL");

    let issued: CredentialResponse = assert_json(
        server.post_empty_auth("/appointments/a1/credential", &patient).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();

    let response = server
        .post_auth("/reports", &other_doctor, &CreateReportRequest::with_token(&issued.token))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "NOT_APPOINTMENT_DOCTOR");

    let response = server
        .post_auth("/reports", &doctor, &CreateReportRequest::with_token(&issued.token))
        .await
        .unwrap();
    let report: ReportResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(report.patient_id, "p1");
    assert_eq!(report.doctor_id, "d1");
    assert_eq!(report.appointment_id.as_deref(), Some("a1"));
    assert_eq!(report.hospital_name, "Arogya City Hospital");
    assert!(report.letterhead.is_some());

    let reports: Vec<ReportResponse> = assert_json(
        server.get_auth("/reports", &patient).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(reports[0].id, report.id);

    let response = server
        .get_auth(&format!("/reports/{}", report.id), &other_doctor)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}
