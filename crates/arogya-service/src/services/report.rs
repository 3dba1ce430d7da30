//! Medical report service
//!
//! A doctor writes a report by presenting the patient's QR token. The token
//! has to resolve against the credential store, and the doctor has to be the
//! one booked on the appointment it was issued for. Only then is the
//! credential redeemed, which in single-use mode spends it.

use arogya_core::events::ReportCreatedEvent;
use arogya_core::{
    AppointmentId, DomainError, DomainEvent, Letterhead, MedicalReport, Permissions, ReportId,
    Role,
};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::authorization::{Principal, ReportCapability};
use crate::dto::{CreateReportRequest, LetterheadRequest, ReportResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Hospital name used when a doctor's profile lists none
pub const INDEPENDENT_PRACTICE: &str = "Independent Practice";

pub struct ReportService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReportService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Write a report for the appointment the presented token belongs to
    #[instrument(skip(self, principal, request), fields(user_id = %principal.user_id))]
    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateReportRequest,
    ) -> ServiceResult<ReportResponse> {
        request.validate()?;
        principal.require(Permissions::CREATE_REPORT)?;

        let capability = self.report_capability(principal, request.token.trim()).await?;
        let doctor = self
            .ctx
            .user_repo()
            .find_by_id(capability.doctor_id())
            .await?
            .ok_or_else(|| DomainError::UserNotFound(capability.doctor_id().clone()))?;

        let hospital_name = doctor.hospital().unwrap_or(INDEPENDENT_PRACTICE).to_string();
        let letterhead = request
            .use_letterhead
            .then(|| letterhead_for(&hospital_name, request.letterhead.unwrap_or_default()));

        let report = MedicalReport {
            id: ReportId::generate(),
            appointment_id: Some(capability.appointment().id.clone()),
            patient_id: capability.patient_id().clone(),
            doctor_id: doctor.id.clone(),
            hospital_name,
            diagnosis: request.diagnosis.trim().to_string(),
            prescription: request.prescription.trim().to_string(),
            notes: request.notes.filter(|n| !n.trim().is_empty()),
            letterhead,
            created_at: self.ctx.credentials().now(),
        };

        if !self.ctx.credentials().redeem(&capability) {
            warn!("Report refused: credential already used or expired");
            return Err(DomainError::InvalidCredential.into());
        }
        self.ctx.report_repo().create(&report).await?;

        info!(report_id = %report.id, appointment_id = %capability.appointment().id, "Report created");
        self.ctx.events().publish(DomainEvent::ReportCreated(ReportCreatedEvent {
            report_id: report.id.clone(),
            appointment_id: capability.appointment().id.clone(),
            patient_id: report.patient_id.clone(),
            doctor_id: report.doctor_id.clone(),
            timestamp: report.created_at,
        }));

        Ok(ReportResponse::from(report))
    }

    /// Reports the caller wrote or received, newest first
    pub async fn list(&self, principal: &Principal) -> ServiceResult<Vec<ReportResponse>> {
        principal.require(Permissions::VIEW_REPORTS)?;

        let repo = self.ctx.report_repo();
        let reports = match principal.role {
            Role::Patient => repo.find_by_patient(&principal.user_id).await?,
            Role::Doctor => repo.find_by_doctor(&principal.user_id).await?,
        };
        Ok(reports.into_iter().map(ReportResponse::from).collect())
    }

    /// Fetch one report the caller is party to
    pub async fn get(&self, principal: &Principal, id: &ReportId) -> ServiceResult<ReportResponse> {
        self.ctx
            .report_repo()
            .find_by_id(id)
            .await?
            .filter(|report| report.patient_id == principal.user_id || report.doctor_id == principal.user_id)
            .map(ReportResponse::from)
            .ok_or_else(|| DomainError::ReportNotFound(id.clone()).into())
    }

    async fn report_capability(&self, principal: &Principal, token: &str) -> ServiceResult<ReportCapability> {
        let validate = self.ctx.authorizer().validate_capability(principal)?;
        let Some(credential) = self.ctx.credentials().resolve(&validate, token) else {
            warn!("Report refused: credential did not resolve");
            return Err(DomainError::InvalidCredential.into());
        };

        let appointment_id = AppointmentId::from(&credential.subject_id);
        let appointment = self
            .ctx
            .appointment_repo()
            .find_by_id(&appointment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Appointment", &appointment_id))?;

        Ok(self
            .ctx
            .authorizer()
            .report_capability(principal, &credential, &appointment)?)
    }
}

fn letterhead_for(hospital_name: &str, details: LetterheadRequest) -> Letterhead {
    Letterhead {
        hospital_name: hospital_name.to_string(),
        address: details.address.trim().to_string(),
        contact_info: details.contact_info.trim().to_string(),
        footer: details.footer.filter(|f| !f.trim().is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::credentials::{CredentialStoreConfig, RuntimeClock};
    use crate::dto::ValidateCredentialRequest;
    use crate::services::credential::CredentialService;
    use crate::services::testing::{doctor, patient, seeded_context, seeded_context_with};

    fn request(token: &str) -> CreateReportRequest {
        CreateReportRequest {
            token: token.to_string(),
            diagnosis: "Mild hypertension".to_string(),
            prescription: "Amlodipine 5mg once daily".to_string(),
            notes: Some("Review in four weeks".to_string()),
            use_letterhead: true,
            letterhead: Some(LetterheadRequest {
                address: "12 MG Road, Bengaluru".to_string(),
                contact_info: "+91 80 5555 0100".to_string(),
                footer: None,
            }),
        }
    }

    async fn issue_token(ctx: &ServiceContext, patient_id: &str, appointment_id: &str) -> String {
        CredentialService::new(ctx)
            .issue(&patient(patient_id), &AppointmentId::parse(appointment_id).unwrap())
            .await
            .unwrap()
            .token
    }

    #[tokio::test]
    async fn test_doctor_creates_report_with_token() {
        let ctx = seeded_context().await;
        let mut events = ctx.events().subscribe();
        let token = issue_token(&ctx, "p1", "a1").await;

        let report = ReportService::new(&ctx).create(&doctor("d1"), request(&token)).await.unwrap();
        assert_eq!(report.patient_id, "p1");
        assert_eq!(report.appointment_id.as_deref(), Some("a1"));
        assert_eq!(report.hospital_name, "Arogya City Hospital");
        let letterhead = report.letterhead.unwrap();
        assert_eq!(letterhead.hospital_name, "Arogya City Hospital");
        assert_eq!(letterhead.address, "12 MG Road, Bengaluru");

        let mut saw_report = false;
        while let Ok(event) = events.try_recv() {
            saw_report |= matches!(event, DomainEvent::ReportCreated(_));
        }
        assert!(saw_report);

        let history = ReportService::new(&ctx).list(&patient("p1")).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].id, report.id);
    }

    #[tokio::test]
    async fn test_report_without_letterhead() {
        let ctx = seeded_context().await;
        let token = issue_token(&ctx, "p1", "a1").await;
        let mut req = request(&token);
        req.use_letterhead = false;

        let report = ReportService::new(&ctx).create(&doctor("d1"), req).await.unwrap();
        assert!(report.letterhead.is_none());
    }

    #[tokio::test]
    async fn test_invalid_token_refused() {
        let ctx = seeded_context().await;
        let err = ReportService::new(&ctx)
            .create(&doctor("d1"), request("AROGYA-forged"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CREDENTIAL");
    }

    #[tokio::test]
    async fn test_superseded_token_refused() {
        let ctx = seeded_context().await;
        let old = issue_token(&ctx, "p1", "a1").await;
        let _new = issue_token(&ctx, "p1", "a1").await;

        let err = ReportService::new(&ctx).create(&doctor("d1"), request(&old)).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CREDENTIAL");
    }

    #[tokio::test]
    async fn test_other_doctor_refused() {
        let ctx = seeded_context().await;
        let token = issue_token(&ctx, "p1", "a1").await;

        let err = ReportService::new(&ctx).create(&doctor("d2"), request(&token)).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_APPOINTMENT_DOCTOR");
    }

    async fn single_use_context() -> ServiceContext {
        let config = CredentialStoreConfig {
            single_use: true,
            ..CredentialStoreConfig::default()
        };
        seeded_context_with(Arc::new(RuntimeClock::new()), config).await
    }

    #[tokio::test]
    async fn test_single_use_validate_then_report() {
        let ctx = single_use_context().await;
        let token = issue_token(&ctx, "p1", "a1").await;
        let scan = ValidateCredentialRequest { token: token.clone() };

        let checked = CredentialService::new(&ctx).validate(&doctor("d1"), scan.clone()).await.unwrap();
        assert!(checked.valid);

        let report = ReportService::new(&ctx).create(&doctor("d1"), request(&token)).await.unwrap();
        assert_eq!(report.appointment_id.as_deref(), Some("a1"));

        let err = ReportService::new(&ctx).create(&doctor("d1"), request(&token)).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CREDENTIAL");
        assert!(!CredentialService::new(&ctx).validate(&doctor("d1"), scan).await.unwrap().valid);
    }

    #[tokio::test]
    async fn test_single_use_unbooked_doctor_leaves_token_usable() {
        let ctx = single_use_context().await;
        let token = issue_token(&ctx, "p1", "a1").await;
        let scan = ValidateCredentialRequest { token: token.clone() };

        assert!(CredentialService::new(&ctx).validate(&doctor("d2"), scan.clone()).await.unwrap().valid);
        let err = ReportService::new(&ctx).create(&doctor("d2"), request(&token)).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_APPOINTMENT_DOCTOR");

        assert!(CredentialService::new(&ctx).validate(&doctor("d1"), scan).await.unwrap().valid);
        assert!(ReportService::new(&ctx).create(&doctor("d1"), request(&token)).await.is_ok());
    }

    #[tokio::test]
    async fn test_patient_cannot_write_reports() {
        let ctx = seeded_context().await;
        let token = issue_token(&ctx, "p1", "a1").await;

        let err = ReportService::new(&ctx).create(&patient("p1"), request(&token)).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_get_is_scoped_to_parties() {
        let ctx = seeded_context().await;
        let service = ReportService::new(&ctx);
        let r1 = ReportId::parse("r1").unwrap();

        assert!(service.get(&patient("p1"), &r1).await.is_ok());
        assert!(service.get(&doctor("d1"), &r1).await.is_ok());
        assert_eq!(service.get(&patient("p2"), &r1).await.unwrap_err().status_code(), 404);
    }
}
