//! Data transfer objects for API requests and responses

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateReportRequest, LetterheadRequest, LoginRequest, RefreshTokenRequest, SignupRequest,
    ValidateCredentialRequest,
};

pub use responses::{
    AppointmentResponse, AuthResponse, CredentialResponse, CurrentUserResponse,
    DoctorProfileResponse, HealthChecks, HealthResponse, ReadinessResponse, ReportResponse,
    ValidateCredentialResponse,
};
