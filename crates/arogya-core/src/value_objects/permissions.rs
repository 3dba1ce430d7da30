//! Permission bitflags for role-based capability checks

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Portal permission flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u32 {
        /// Issue a credential for one's own appointment
        const ISSUE_CREDENTIAL    = 1 << 0;
        /// Validate a credential presented by a patient
        const VALIDATE_CREDENTIAL = 1 << 1;
        /// Author a medical report
        const CREATE_REPORT       = 1 << 2;
        /// List one's own appointments
        const VIEW_APPOINTMENTS   = 1 << 3;
        /// Read one's own reports
        const VIEW_REPORTS        = 1 << 4;

        /// Everything a patient may do
        const PATIENT = Self::ISSUE_CREDENTIAL.bits()
            | Self::VIEW_APPOINTMENTS.bits()
            | Self::VIEW_REPORTS.bits();

        /// Everything a doctor may do
        const DOCTOR = Self::VALIDATE_CREDENTIAL.bits()
            | Self::CREATE_REPORT.bits()
            | Self::VIEW_APPOINTMENTS.bits()
            | Self::VIEW_REPORTS.bits();
    }
}

impl Permissions {
    /// Check if the permission set contains a required permission
    #[inline]
    pub fn has(&self, permission: Permissions) -> bool {
        self.contains(permission)
    }

    /// Get a list of all individual permissions that are set
    pub fn list(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.list().join(" | "))
    }
}
