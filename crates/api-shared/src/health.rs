use crate::dto::HealthRes;

/// Simple health service shared by the REST router and the `rx-run` binary.
///
/// This service provides a standardised way to check the health status of the RX system.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "RX is alive".into(),
        }
    }
}
