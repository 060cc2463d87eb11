use agenda_core::models::appointment::{Appointment, AppointmentQuery, AppointmentUpdate, NewAppointment};
use async_trait::async_trait;
use mockall::mock;

use crate::store::AppointmentStore;

// Mock appointment store for expectation-based tests
mock! {
    pub AppointmentRepo {}

    #[async_trait]
    impl AppointmentStore for AppointmentRepo {
        async fn create(&self, appointment: &NewAppointment) -> eyre::Result<i64>;

        async fn get(&self, id: i64) -> eyre::Result<Option<Appointment>>;

        async fn update(&self, id: i64, update: &AppointmentUpdate) -> eyre::Result<bool>;

        async fn delete(&self, id: i64) -> eyre::Result<bool>;

        async fn list(&self, query: &AppointmentQuery) -> eyre::Result<Vec<Appointment>>;

        async fn count(&self, query: &AppointmentQuery) -> eyre::Result<i64>;
    }
}
