//! Calendar events and agenda categories. Both soft-delete via `active` so
//! history stays queryable.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AgendaCategory, AgendaEvent};
use crate::office::BackOffice;

use super::{ServiceError, ServiceResult};

pub struct AgendaService;

impl AgendaService {
    pub fn create_event(office: &mut BackOffice, event: AgendaEvent) -> ServiceResult<Uuid> {
        if event.title.trim().is_empty() {
            return Err(ServiceError::Invalid("Event title is required".into()));
        }
        if let Some(ends_at) = event.ends_at {
            if ends_at < event.starts_at {
                return Err(ServiceError::Invalid(
                    "Event cannot end before it starts".into(),
                ));
            }
        }
        let id = event.id;
        office.events.push(event);
        office.touch();
        Ok(id)
    }

    pub fn update_event<F>(office: &mut BackOffice, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut AgendaEvent),
    {
        let event = office
            .event_mut(id)
            .ok_or(ServiceError::NotFound { entity: "event" })?;
        mutator(event);
        event.updated_at = Utc::now();
        office.touch();
        Ok(())
    }

    /// Soft delete.
    pub fn delete_event(office: &mut BackOffice, id: Uuid) -> ServiceResult<()> {
        Self::update_event(office, id, |event| event.active = false)
    }

    /// Active events for one user, ordered by start.
    pub fn events_for_user(office: &BackOffice, user_id: Uuid) -> Vec<&AgendaEvent> {
        let mut events: Vec<&AgendaEvent> = office
            .events
            .iter()
            .filter(|event| event.user_id == user_id && event.active)
            .collect();
        events.sort_by_key(|event| event.starts_at);
        events
    }

    /// Active events for one user whose start falls inside `[from, to]`.
    pub fn events_in_range(
        office: &BackOffice,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<&AgendaEvent> {
        Self::events_for_user(office, user_id)
            .into_iter()
            .filter(|event| event.starts_at >= from && event.starts_at <= to)
            .collect()
    }

    pub fn create_category(office: &mut BackOffice, category: AgendaCategory) -> ServiceResult<Uuid> {
        if category.name.trim().is_empty() {
            return Err(ServiceError::Invalid("Category name is required".into()));
        }
        let id = category.id;
        office.agenda_categories.push(category);
        office.touch();
        Ok(id)
    }

    pub fn delete_category(office: &mut BackOffice, id: Uuid) -> ServiceResult<()> {
        let category = office
            .agenda_categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or(ServiceError::NotFound { entity: "category" })?;
        category.active = false;
        office.touch();
        Ok(())
    }

    /// Active categories for one user, ordered by name.
    pub fn categories_for_user(office: &BackOffice, user_id: Uuid) -> Vec<&AgendaCategory> {
        let mut categories: Vec<&AgendaCategory> = office
            .agenda_categories
            .iter()
            .filter(|category| category.user_id == user_id && category.active)
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, h, 0, 0).unwrap()
    }

    #[test]
    fn deleted_events_disappear_from_listings() {
        let mut office = BackOffice::new("Agenda");
        let user = Uuid::new_v4();
        let id = AgendaService::create_event(&mut office, AgendaEvent::new("Standup", ts(9), user))
            .unwrap();
        AgendaService::create_event(&mut office, AgendaEvent::new("Closing", ts(18), user))
            .unwrap();

        AgendaService::delete_event(&mut office, id).unwrap();
        let events = AgendaService::events_for_user(&office, user);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Closing");
        // The row itself survives the soft delete.
        assert_eq!(office.events.len(), 2);
    }

    #[test]
    fn range_query_is_inclusive_on_start() {
        let mut office = BackOffice::new("Agenda");
        let user = Uuid::new_v4();
        AgendaService::create_event(&mut office, AgendaEvent::new("Early", ts(8), user)).unwrap();
        AgendaService::create_event(&mut office, AgendaEvent::new("Late", ts(20), user)).unwrap();

        let events = AgendaService::events_in_range(&office, user, ts(8), ts(12));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Early");
    }

    #[test]
    fn rejects_inverted_ranges() {
        let mut office = BackOffice::new("Agenda");
        let mut event = AgendaEvent::new("Backwards", ts(12), Uuid::new_v4());
        event.ends_at = Some(ts(9));
        assert!(AgendaService::create_event(&mut office, event).is_err());
    }

    #[test]
    fn categories_sorted_by_name() {
        let mut office = BackOffice::new("Agenda");
        let user = Uuid::new_v4();
        AgendaService::create_category(&mut office, AgendaCategory::new("Suppliers", "#10b981", user))
            .unwrap();
        AgendaService::create_category(&mut office, AgendaCategory::new("Deliveries", "#3b82f6", user))
            .unwrap();
        let names: Vec<&str> = AgendaService::categories_for_user(&office, user)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["Deliveries", "Suppliers"]);
    }
}
