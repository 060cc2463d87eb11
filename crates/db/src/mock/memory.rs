use std::sync::atomic::{AtomicBool, Ordering};

use agenda_core::models::appointment::{
    Appointment, AppointmentQuery, AppointmentUpdate, NewAppointment, YesNo,
};
use async_trait::async_trait;
use eyre::{Result, eyre};
use tokio::sync::Mutex;

use crate::store::AppointmentStore;

#[derive(Debug, Default)]
struct Rows {
    next_id: i64,
    appointments: Vec<Appointment>,
}

/// Appointment store kept in memory, for handler and service tests.
///
/// [`InMemoryAppointmentStore::set_failing`] makes every call return an error,
/// which is how tests simulate an unreachable database.
#[derive(Debug, Default)]
pub struct InMemoryAppointmentStore {
    rows: Mutex<Rows>,
    failing: AtomicBool,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing records, keeping their ids.
    pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
        let next_id = appointments.iter().map(|a| a.id).max().unwrap_or(0);
        Self {
            rows: Mutex::new(Rows {
                next_id,
                appointments,
            }),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> Vec<Appointment> {
        self.rows.lock().await.appointments.clone()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(eyre!("appointment store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn create(&self, new: &NewAppointment) -> Result<i64> {
        self.check()?;
        if new.end_time <= new.start_time {
            return Err(eyre!("violates check constraint \"valid_time_range\""));
        }

        let mut rows = self.rows.lock().await;
        rows.next_id += 1;
        let id = rows.next_id;
        rows.appointments.push(Appointment {
            id,
            title: new.title.clone(),
            description: new.description.clone(),
            start_time: new.start_time,
            end_time: new.end_time,
            location: new.location.clone(),
            is_confirmed: new.is_confirmed,
            is_cancelled: YesNo::No,
            cancellation_reason: None,
            meeting_link: None,
            send_reminder: new.send_reminder,
            user_id: new.user_id,
            user_email: new.user_email.clone(),
        });
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Option<Appointment>> {
        self.check()?;
        let rows = self.rows.lock().await;
        Ok(rows.appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn update(&self, id: i64, update: &AppointmentUpdate) -> Result<bool> {
        self.check()?;
        if update.end_time <= update.start_time {
            return Err(eyre!("violates check constraint \"valid_time_range\""));
        }

        let mut rows = self.rows.lock().await;
        let Some(existing) = rows.appointments.iter_mut().find(|a| a.id == id) else {
            return Ok(false);
        };

        existing.title = update.title.clone();
        existing.description = update.description.clone();
        existing.start_time = update.start_time;
        existing.end_time = update.end_time;
        existing.location = update.location.clone();
        existing.is_confirmed = update.is_confirmed;
        existing.is_cancelled = update.is_cancelled;
        existing.cancellation_reason = update.cancellation_reason.clone();
        existing.meeting_link = update.meeting_link.clone();
        existing.send_reminder = update.send_reminder;
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.check()?;
        let mut rows = self.rows.lock().await;
        let before = rows.appointments.len();
        rows.appointments.retain(|a| a.id != id);
        Ok(rows.appointments.len() < before)
    }

    async fn list(&self, query: &AppointmentQuery) -> Result<Vec<Appointment>> {
        self.check()?;
        let rows = self.rows.lock().await;
        let mut matching: Vec<Appointment> = rows
            .appointments
            .iter()
            .filter(|a| query.matches(a))
            .cloned()
            .collect();
        matching.sort_by_key(|a| (a.start_time, a.id));
        Ok(matching)
    }

    async fn count(&self, query: &AppointmentQuery) -> Result<i64> {
        self.check()?;
        let rows = self.rows.lock().await;
        Ok(rows.appointments.iter().filter(|a| query.matches(a)).count() as i64)
    }
}
