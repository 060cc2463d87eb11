use agenda_core::models::appointment::{Appointment, AppointmentQuery, AppointmentUpdate, NewAppointment};
use async_trait::async_trait;
use eyre::Result;

use crate::repositories::appointment;
use crate::DbPool;

/// Persistence boundary for appointments.
///
/// Writes report only an id or a flag; callers that need the stored record
/// read it back with [`AppointmentStore::get`].
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn create(&self, appointment: &NewAppointment) -> Result<i64>;

    async fn get(&self, id: i64) -> Result<Option<Appointment>>;

    /// Returns false when the id does not exist.
    async fn update(&self, id: i64, update: &AppointmentUpdate) -> Result<bool>;

    /// Returns false when the id does not exist.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Matching appointments ordered by start time.
    async fn list(&self, query: &AppointmentQuery) -> Result<Vec<Appointment>>;

    async fn count(&self, query: &AppointmentQuery) -> Result<i64>;
}

#[derive(Debug, Clone)]
pub struct PgAppointmentStore {
    pool: DbPool,
}

impl PgAppointmentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn create(&self, new: &NewAppointment) -> Result<i64> {
        appointment::create_appointment(&self.pool, new).await
    }

    async fn get(&self, id: i64) -> Result<Option<Appointment>> {
        Ok(appointment::get_appointment_by_id(&self.pool, id)
            .await?
            .map(Appointment::from))
    }

    async fn update(&self, id: i64, update: &AppointmentUpdate) -> Result<bool> {
        appointment::update_appointment(&self.pool, id, update).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        appointment::delete_appointment(&self.pool, id).await
    }

    async fn list(&self, query: &AppointmentQuery) -> Result<Vec<Appointment>> {
        let rows = appointment::list_appointments(&self.pool, query).await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    async fn count(&self, query: &AppointmentQuery) -> Result<i64> {
        appointment::count_appointments(&self.pool, query).await
    }
}
