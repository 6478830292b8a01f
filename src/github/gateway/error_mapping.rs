//! Translation of Octocrab failures into [`SyncError`] variants.

use http::StatusCode;
use octocrab::Error as OctocrabError;

use crate::error::SyncError;

/// Maps an Octocrab failure raised while performing `operation`.
///
/// Rejected credentials (401/403) become [`SyncError::Authentication`].
/// Transport failures become [`SyncError::Network`].
pub(super) fn map_octocrab_error(operation: &str, error: &OctocrabError) -> SyncError {
    match error {
        OctocrabError::GitHub { source, .. } => {
            let message = format!(
                "{operation} answered {status}: {detail}",
                status = source.status_code,
                detail = source.message
            );
            match source.status_code {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    SyncError::Authentication { message }
                }
                _ => SyncError::Api { message },
            }
        }
        OctocrabError::Http { .. } | OctocrabError::Hyper { .. } | OctocrabError::Service { .. } => {
            SyncError::Network {
                message: format!("{operation} could not reach GitHub: {error}"),
            }
        }
        _ => SyncError::Api {
            message: format!("{operation} failed: {error}"),
        },
    }
}
