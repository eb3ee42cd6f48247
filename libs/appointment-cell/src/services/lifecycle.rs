use tracing::{debug, warn};

use shared_models::appointment::AppointmentStatus;

use crate::models::AppointmentError;

#[derive(Debug, Default)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Re-setting the current status is accepted; the caller treats it as a
    /// no-op.
    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if current_status == new_status || self.get_valid_transitions(current_status).contains(&new_status) {
            return Ok(());
        }

        warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
        Err(AppointmentError::InvalidStatusTransition {
            from: current_status,
            to: new_status,
        })
    }

    pub fn get_valid_transitions(&self, current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Pending => vec![AppointmentStatus::Confirmed, AppointmentStatus::Cancelled],
            AppointmentStatus::Confirmed => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            // Terminal states
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow => vec![],
        }
    }
}
