use crate::domain::model::{PositionFix, PositionUnavailable, UnavailableReason, UserPosition};
use crate::domain::ports::PositionProvider;
use async_trait::async_trait;

/// Coordinates the user typed in.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub UserPosition);

#[async_trait]
impl PositionProvider for FixedPosition {
    async fn acquire(&self) -> PositionFix {
        Ok(self.0)
    }
}

/// No location source configured at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPosition;

#[async_trait]
impl PositionProvider for NoPosition {
    async fn acquire(&self) -> PositionFix {
        Err(PositionUnavailable::new(UnavailableReason::Unsupported))
    }
}

/// Always fails with the given reason.
#[derive(Debug, Clone, Copy)]
pub struct DeniedPosition(pub UnavailableReason);

#[async_trait]
impl PositionProvider for DeniedPosition {
    async fn acquire(&self) -> PositionFix {
        Err(PositionUnavailable::new(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::GeoPoint;

    #[tokio::test]
    async fn test_providers() {
        let here = GeoPoint::new(37.5665, 126.978);
        assert_eq!(FixedPosition(here).acquire().await, Ok(here));
        assert_eq!(
            NoPosition.acquire().await.unwrap_err().reason,
            UnavailableReason::Unsupported
        );
        assert_eq!(
            DeniedPosition(UnavailableReason::PermissionDenied)
                .acquire()
                .await
                .unwrap_err()
                .reason,
            UnavailableReason::PermissionDenied
        );
    }
}
