//! Shared test fixtures: an in-memory [`QueueTransport`] fake and
//! record builders.
#![allow(clippy::unwrap_used, clippy::panic, missing_docs)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;

use crate::api::QueueTransport;
use crate::api::schemas::{JoinQueueRequest, PublicQueueStatus};
use crate::domain::appointment::{Appointment, AppointmentStatus};
use crate::domain::ids::{AppointmentId, BusinessId, EntryId, QueueId};
use crate::domain::queue::{Queue, QueueStatus};
use crate::domain::queue_entry::{EntryStatus, QueueEntry};
use crate::error::ClientError;

#[derive(Debug, Default)]
struct FakeState {
    entries: Vec<QueueEntry>,
    appointments: Vec<Appointment>,
    fail_mutations: Option<(u16, String)>,
    appointments_delay: Option<Duration>,
    join_calls: usize,
    fetch_calls: usize,
}

/// In-memory stand-in for the external API server.
///
/// Behaves like the real contract: mutations update its own state so a
/// later fetch reflects them, and `fail_mutations` makes every mutating
/// call return an API error without touching state.
#[derive(Debug, Clone)]
pub(crate) struct FakeTransport {
    pub(crate) queue_id: QueueId,
    pub(crate) business_id: BusinessId,
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self {
            queue_id: QueueId::new(),
            business_id: BusinessId::new(),
            state: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    pub(crate) fn seed_entries(&self, entries: Vec<QueueEntry>) {
        self.state.lock().unwrap().entries = entries;
    }

    pub(crate) fn seed_appointments(&self, appointments: Vec<Appointment>) {
        self.state.lock().unwrap().appointments = appointments;
    }

    pub(crate) fn fail_mutations(&self, status: u16, message: &str) {
        self.state.lock().unwrap().fail_mutations = Some((status, message.to_string()));
    }

    /// Delays the next appointment fetch, answering it with the data as
    /// it was when the request arrived (a genuinely slow response).
    pub(crate) fn delay_next_appointments(&self, delay: Duration) {
        self.state.lock().unwrap().appointments_delay = Some(delay);
    }

    pub(crate) fn join_calls(&self) -> usize {
        self.state.lock().unwrap().join_calls
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.state.lock().unwrap().fetch_calls
    }

    fn mutation_gate(state: &FakeState) -> Result<(), ClientError> {
        match &state.fail_mutations {
            Some((status, message)) => Err(ClientError::Api {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl QueueTransport for FakeTransport {
    async fn entries_today(&self, queue_id: QueueId) -> Result<Vec<QueueEntry>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.fetch_calls += 1;
        Ok(state
            .entries
            .iter()
            .filter(|e| e.queue_id == queue_id)
            .cloned()
            .collect())
    }

    async fn update_entry_status(
        &self,
        entry_id: EntryId,
        status: EntryStatus,
    ) -> Result<QueueEntry, ClientError> {
        let mut state = self.state.lock().unwrap();
        Self::mutation_gate(&state)?;
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or(ClientError::EntryNotFound(entry_id))?;
        entry.status = status;
        if status == EntryStatus::Serving && entry.served_at.is_none() {
            entry.served_at = Some(Utc::now());
        }
        Ok(entry.clone())
    }

    async fn business_appointments(&self) -> Result<Vec<Appointment>, ClientError> {
        let (snapshot, delay) = {
            let mut state = self.state.lock().unwrap();
            (state.appointments.clone(), state.appointments_delay.take())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(snapshot)
    }

    async fn update_appointment_status(
        &self,
        appointment_id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Appointment, ClientError> {
        let mut state = self.state.lock().unwrap();
        Self::mutation_gate(&state)?;
        let appointment = state
            .appointments
            .iter_mut()
            .find(|a| a.id == appointment_id)
            .ok_or(ClientError::AppointmentNotFound(appointment_id))?;
        appointment.status = status;
        Ok(appointment.clone())
    }

    async fn join_queue(&self, request: &JoinQueueRequest) -> Result<QueueEntry, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.join_calls += 1;
        Self::mutation_gate(&state)?;
        let position = u32::try_from(
            state
                .entries
                .iter()
                .filter(|e| e.status == EntryStatus::Waiting)
                .count(),
        )
        .unwrap_or(0)
            + 1;
        let entry = QueueEntry {
            id: EntryId::new(),
            queue_id: request.queue_id,
            customer_name: request.customer_name.clone(),
            phone: request.phone.clone(),
            service_name: request.service_name.clone(),
            status: EntryStatus::Waiting,
            position,
            ticket_number: format!("A{position:03}"),
            joined_at: Utc::now(),
            served_at: None,
            completed_at: None,
            token: Some(format!("tok-{position}")),
        };
        state.entries.push(entry.clone());
        Ok(entry)
    }

    async fn public_status(&self, token: &str) -> Result<PublicQueueStatus, ClientError> {
        let state = self.state.lock().unwrap();
        let entry = state
            .entries
            .iter()
            .find(|e| e.token.as_deref() == Some(token))
            .ok_or_else(|| ClientError::Api {
                status: 404,
                message: "invalid status token".to_string(),
            })?;
        Ok(PublicQueueStatus {
            business_name: "Fake Business".to_string(),
            business_slug: None,
            display_token: entry.ticket_number.clone(),
            current_serving: state
                .entries
                .iter()
                .find(|e| e.status == EntryStatus::Serving)
                .map(|e| e.ticket_number.clone()),
            position: entry.position,
            estimated_wait_time: entry.position * 10,
            status: entry.status,
        })
    }

    async fn my_queues(&self) -> Result<Vec<Queue>, ClientError> {
        Ok(vec![make_queue(self.queue_id, QueueStatus::Open)])
    }

    async fn advance_queue(&self, _queue_id: QueueId) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        Self::mutation_gate(&state)?;
        if let Some(next) = state
            .entries
            .iter_mut()
            .filter(|e| e.status == EntryStatus::Waiting)
            .min_by_key(|e| e.position)
        {
            next.status = EntryStatus::Serving;
            next.served_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn reset_today(&self, _queue_id: QueueId) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        Self::mutation_gate(&state)?;
        state.entries.clear();
        Ok(())
    }
}

pub(crate) fn make_entry(
    queue_id: QueueId,
    name: &str,
    status: EntryStatus,
    position: u32,
) -> QueueEntry {
    QueueEntry {
        id: EntryId::new(),
        queue_id,
        customer_name: name.to_string(),
        phone: Some("9876543210".to_string()),
        service_name: None,
        status,
        position,
        ticket_number: format!("A{position:03}"),
        joined_at: Utc::now(),
        served_at: None,
        completed_at: None,
        token: None,
    }
}

pub(crate) fn make_queue(queue_id: QueueId, status: QueueStatus) -> Queue {
    Queue {
        id: queue_id,
        business_id: BusinessId::new(),
        name: "Walk-ins".to_string(),
        description: None,
        status,
        current_wait_time_minutes: 10,
    }
}

pub(crate) fn make_appointment(
    business_id: BusinessId,
    status: AppointmentStatus,
) -> Appointment {
    Appointment {
        id: AppointmentId::new(),
        business_id,
        service_id: None,
        customer_id: None,
        guest_name: Some("Ravi".to_string()),
        guest_phone: Some("9876543210".to_string()),
        start_time: Utc::now(),
        end_time: Utc::now() + chrono::Duration::minutes(30),
        status,
        customer: None,
        service: None,
    }
}
