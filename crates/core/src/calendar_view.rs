//! Interaction model of the calendar page.
//!
//! The browser glue owns rendering and HTTP; this reducer owns the decisions.
//! Each [`Action`] the page reports moves the controller to a new
//! [`ControllerState`] and returns the [`Effect`]s the page must carry out
//! (requests, reverts, toasts). Responses are fed back as further actions.
//! Nothing here sequences overlapping requests: whichever response arrives
//! last is applied last.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::date_range::DateRange;
use crate::datetime::{format_event_datetime, format_input_datetime, on_the_hour, parse_event_datetime};
use crate::models::calendar::{CalendarEvent, CreateEventRequest, UpdateEventRequest};

/// Slot prefilled when an all-day cell is clicked.
const ALL_DAY_START: NaiveTime = on_the_hour(9);
const ALL_DAY_END: NaiveTime = on_the_hour(10);

/// Granularity of the visible calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Month,
    Week,
    Day,
}

impl ViewKind {
    /// Maps the widget's view names (`dayGridMonth`, `timeGridWeek`,
    /// `timeGridDay`).
    pub fn from_widget(name: &str) -> Option<Self> {
        match name {
            "dayGridMonth" => Some(ViewKind::Month),
            "timeGridWeek" => Some(ViewKind::Week),
            "timeGridDay" => Some(ViewKind::Day),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsTitle {
    pub title: String,
    pub description: String,
}

/// Days currently shown by the widget. `end` is exclusive, as reported by the
/// widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    pub kind: ViewKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl VisibleWindow {
    pub fn last_day(&self) -> NaiveDate {
        if self.end > self.start {
            self.end - Duration::days(1)
        } else {
            self.start
        }
    }

    /// Statistics range for the window, with the exclusive end turned into an
    /// inclusive last day.
    pub fn statistics_range(&self) -> DateRange {
        DateRange {
            start_date: Some(self.start),
            end_date: Some(self.last_day()),
            week_start: Some(self.start),
        }
    }

    pub fn title(&self) -> StatisticsTitle {
        match self.kind {
            ViewKind::Month => StatisticsTitle {
                title: format!("Monthly Statistics ({})", self.start.format("%B %Y")),
                description: "Events in current month".to_string(),
            },
            ViewKind::Week => StatisticsTitle {
                title: format!(
                    "Weekly Statistics ({} - {})",
                    self.start.format("%b %-d"),
                    self.last_day().format("%b %-d, %Y")
                ),
                description: "Events in current week".to_string(),
            },
            ViewKind::Day => StatisticsTitle {
                title: format!("Daily Statistics ({})", self.start.format("%A, %B %-d, %Y")),
                description: "Events on this day".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Create,
    Edit,
    ReadOnly,
}

/// Contents of the event modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventForm {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl EventForm {
    fn blank(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: None,
            title: String::new(),
            description: None,
            location: None,
            email: None,
            start,
            end,
        }
    }

    fn from_event(event: &CalendarEvent) -> Option<Self> {
        Some(Self {
            id: event.id.parse().ok(),
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            email: event.email.clone(),
            start: parse_event_datetime(&event.start).ok()?,
            end: parse_event_datetime(&event.end).ok()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Loading,
    Displayed,
    Error { message: String },
    Modal { mode: ModalMode, form: EventForm },
}

/// Write the page sent to the server, echoed back with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update { id: i64 },
    Move { id: String },
    Delete { id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    EventsLoaded(Vec<CalendarEvent>),
    LoadFailed(String),
    Retry,
    SelectSlot {
        start: NaiveDateTime,
        end: NaiveDateTime,
        all_day: bool,
    },
    ClickEvent {
        id: String,
        now: NaiveDateTime,
    },
    CloseModal,
    Submit(EventForm),
    DeleteRequested,
    /// Drag or resize finished on the grid.
    MoveEvent {
        id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    MutationSucceeded(Mutation),
    MutationFailed {
        mutation: Mutation,
        message: Option<String>,
    },
    WindowChanged(VisibleWindow),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchEvents,
    FetchStatistics(DateRange),
    SetTitle(StatisticsTitle),
    CreateEvent(CreateEventRequest),
    UpdateEvent(UpdateEventRequest),
    DeleteEvent(i64),
    /// Put an optimistically moved event back where it was.
    Revert {
        id: String,
        start: String,
        end: String,
    },
    Toast {
        kind: ToastKind,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct CalendarController {
    state: ControllerState,
    events: Vec<CalendarEvent>,
    window: Option<VisibleWindow>,
    /// Original start/end of events moved on the grid but not yet confirmed.
    pending_moves: HashMap<String, (String, String)>,
}

impl CalendarController {
    /// Starts in `Loading` and asks for the first event fetch.
    pub fn new() -> (Self, Vec<Effect>) {
        let controller = Self {
            state: ControllerState::Loading,
            events: Vec::new(),
            window: None,
            pending_moves: HashMap::new(),
        };
        (controller, vec![Effect::FetchEvents])
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn window(&self) -> Option<VisibleWindow> {
        self.window
    }

    pub fn apply(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::EventsLoaded(events) => {
                self.events = events;
                self.pending_moves.clear();
                if matches!(self.state, ControllerState::Loading | ControllerState::Error { .. }) {
                    self.state = ControllerState::Displayed;
                }
                Vec::new()
            }
            Action::LoadFailed(message) => {
                self.state = ControllerState::Error { message };
                Vec::new()
            }
            Action::Retry => {
                if matches!(self.state, ControllerState::Error { .. }) {
                    self.state = ControllerState::Loading;
                    vec![Effect::FetchEvents]
                } else {
                    Vec::new()
                }
            }
            Action::SelectSlot { start, end, all_day } => self.open_create(start, end, all_day),
            Action::ClickEvent { id, now } => self.open_existing(&id, now),
            Action::CloseModal => {
                if matches!(self.state, ControllerState::Modal { .. }) {
                    self.state = ControllerState::Displayed;
                }
                Vec::new()
            }
            Action::Submit(form) => self.submit(form),
            Action::DeleteRequested => self.request_delete(),
            Action::MoveEvent { id, start, end } => self.move_event(id, start, end),
            Action::MutationSucceeded(mutation) => self.mutation_succeeded(mutation),
            Action::MutationFailed { mutation, message } => self.mutation_failed(mutation, message),
            Action::WindowChanged(window) => {
                self.window = Some(window);
                vec![
                    Effect::FetchStatistics(window.statistics_range()),
                    Effect::SetTitle(window.title()),
                ]
            }
        }
    }

    fn open_create(&mut self, start: NaiveDateTime, end: NaiveDateTime, all_day: bool) -> Vec<Effect> {
        if !matches!(self.state, ControllerState::Displayed) {
            return Vec::new();
        }

        let (start, end) = if all_day {
            let day = start.date();
            (
                day.and_time(ALL_DAY_START),
                day.and_time(ALL_DAY_END),
            )
        } else if end > start {
            (start, end)
        } else {
            (start, start + Duration::hours(1))
        };

        self.state = ControllerState::Modal {
            mode: ModalMode::Create,
            form: EventForm::blank(start, end),
        };
        Vec::new()
    }

    fn open_existing(&mut self, id: &str, now: NaiveDateTime) -> Vec<Effect> {
        if !matches!(self.state, ControllerState::Displayed) {
            return Vec::new();
        }

        let Some(form) = self
            .events
            .iter()
            .find(|e| e.id == id)
            .and_then(EventForm::from_event)
        else {
            return Vec::new();
        };

        let mode = if form.end < now { ModalMode::ReadOnly } else { ModalMode::Edit };
        self.state = ControllerState::Modal { mode, form };
        Vec::new()
    }

    fn submit(&mut self, form: EventForm) -> Vec<Effect> {
        let ControllerState::Modal { mode, .. } = &self.state else {
            return Vec::new();
        };

        match (mode, form.id) {
            (ModalMode::ReadOnly, _) => Vec::new(),
            (ModalMode::Edit, Some(id)) => vec![Effect::UpdateEvent(UpdateEventRequest {
                id,
                title: form.title,
                description: form.description,
                start: format_input_datetime(&form.start),
                end: format_input_datetime(&form.end),
                location: form.location,
            })],
            _ => vec![Effect::CreateEvent(CreateEventRequest {
                title: form.title,
                description: form.description,
                start: format_input_datetime(&form.start),
                end: format_input_datetime(&form.end),
                location: form.location,
            })],
        }
    }

    fn request_delete(&mut self) -> Vec<Effect> {
        match &self.state {
            ControllerState::Modal {
                mode: ModalMode::Edit,
                form: EventForm { id: Some(id), .. },
            } => vec![Effect::DeleteEvent(*id)],
            _ => Vec::new(),
        }
    }

    fn move_event(&mut self, id: String, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Effect> {
        let Some(event) = self.events.iter_mut().find(|e| e.id == id) else {
            return Vec::new();
        };
        let Ok(numeric_id) = id.parse::<i64>() else {
            return Vec::new();
        };

        // Only the first unconfirmed move remembers the original position.
        self.pending_moves
            .entry(id.clone())
            .or_insert_with(|| (event.start.clone(), event.end.clone()));

        event.start = format_event_datetime(&start);
        event.end = format_event_datetime(&end);

        vec![Effect::UpdateEvent(UpdateEventRequest {
            id: numeric_id,
            title: event.title.clone(),
            description: event.description.clone(),
            start: event.start.clone(),
            end: event.end.clone(),
            location: event.location.clone(),
        })]
    }

    fn mutation_succeeded(&mut self, mutation: Mutation) -> Vec<Effect> {
        let message = match &mutation {
            Mutation::Create => "Event created",
            Mutation::Update { .. } | Mutation::Move { .. } => "Event updated",
            Mutation::Delete { .. } => "Event deleted",
        };

        if let Mutation::Move { id } = &mutation {
            self.pending_moves.remove(id);
        }

        self.state = ControllerState::Loading;

        let mut effects = vec![
            Effect::Toast {
                kind: ToastKind::Success,
                message: message.to_string(),
            },
            Effect::FetchEvents,
        ];
        if let Some(window) = self.window {
            effects.push(Effect::FetchStatistics(window.statistics_range()));
            effects.push(Effect::SetTitle(window.title()));
        }
        effects
    }

    fn mutation_failed(&mut self, mutation: Mutation, message: Option<String>) -> Vec<Effect> {
        let fallback = match &mutation {
            Mutation::Create | Mutation::Update { .. } => "Error saving event",
            Mutation::Move { .. } => "Error updating event",
            Mutation::Delete { .. } => "Error deleting event",
        };
        let mut effects = vec![Effect::Toast {
            kind: ToastKind::Error,
            message: message.unwrap_or_else(|| fallback.to_string()),
        }];

        if let Mutation::Move { id } = mutation {
            if let Some((start, end)) = self.pending_moves.remove(&id) {
                if let Some(event) = self.events.iter_mut().find(|e| e.id == id) {
                    event.start = start.clone();
                    event.end = end.clone();
                }
                effects.push(Effect::Revert { id, start, end });
            }
        }

        effects
    }
}
