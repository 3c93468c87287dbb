//! Operational batch (till session) lifecycle and the open-batch resolver.

use uuid::Uuid;

use crate::domain::OperationalBatch;
use crate::office::BackOffice;

use super::{ServiceError, ServiceResult};

pub struct BatchService;

impl BatchService {
    /// Identifier of the currently open batch, if any.
    pub fn open_batch(office: &BackOffice) -> Option<Uuid> {
        office.batches.iter().find(|batch| batch.open).map(|b| b.id)
    }

    /// Opens a new till session. Only one batch may be open at a time.
    pub fn open(office: &mut BackOffice) -> ServiceResult<Uuid> {
        if Self::open_batch(office).is_some() {
            return Err(ServiceError::Invalid(
                "An operational batch is already open".into(),
            ));
        }
        let batch = OperationalBatch::open_now();
        let id = batch.id;
        office.batches.push(batch);
        office.touch();
        tracing::info!(%id, "operational batch opened");
        Ok(id)
    }

    pub fn close(office: &mut BackOffice, id: Uuid) -> ServiceResult<()> {
        let batch = office
            .batches
            .iter_mut()
            .find(|batch| batch.id == id)
            .ok_or(ServiceError::NotFound { entity: "batch" })?;
        if !batch.open {
            return Err(ServiceError::Invalid("Batch is already closed".into()));
        }
        batch.close();
        office.touch();
        tracing::info!(%id, "operational batch closed");
        Ok(())
    }
}
