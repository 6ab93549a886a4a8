use crate::wire::HealthRes;

/// Simple health service shared by the MedPlat binaries.
///
/// Provides a standardised liveness answer for monitoring and load balancer checks.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Static method to check health without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "MedPlat is alive".into(),
        }
    }
}
