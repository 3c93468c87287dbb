//! Sticky-note board operations.

use uuid::Uuid;

use crate::domain::note::{NOTE_HEIGHT, NOTE_WIDTH};
use crate::domain::Note;
use crate::office::BackOffice;

use super::{ServiceError, ServiceResult};

const BOARD_MARGIN: i32 = 20;
const BOARD_WIDTH: i32 = 1200;
const BOARD_HEIGHT: i32 = 800;
const DUPLICATE_OFFSET: i32 = 20;

pub struct NoteService;

impl NoteService {
    pub fn create(office: &mut BackOffice, note: Note) -> ServiceResult<Uuid> {
        if note.content.trim().is_empty() {
            return Err(ServiceError::Invalid("Note content is required".into()));
        }
        let id = note.id;
        office.notes.push(note);
        office.touch();
        Ok(id)
    }

    pub fn update<F>(office: &mut BackOffice, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Note),
    {
        let note = office
            .note_mut(id)
            .ok_or(ServiceError::NotFound { entity: "note" })?;
        mutator(note);
        note.updated_at = chrono::Utc::now();
        office.touch();
        Ok(())
    }

    /// Drag-end handler; fractional drop coordinates are rounded.
    pub fn move_to(office: &mut BackOffice, id: Uuid, x: f64, y: f64) -> ServiceResult<()> {
        Self::update(office, id, |note| {
            note.x = x.round() as i32;
            note.y = y.round() as i32;
        })
    }

    pub fn resize(office: &mut BackOffice, id: Uuid, width: i32, height: i32) -> ServiceResult<()> {
        Self::update(office, id, |note| {
            note.width = width;
            note.height = height;
        })
    }

    pub fn delete(office: &mut BackOffice, id: Uuid) -> ServiceResult<()> {
        let before = office.notes.len();
        office.notes.retain(|note| note.id != id);
        if office.notes.len() == before {
            return Err(ServiceError::NotFound { entity: "note" });
        }
        office.touch();
        Ok(())
    }

    /// Copies a note slightly offset from the original, marking the title.
    pub fn duplicate(office: &mut BackOffice, id: Uuid) -> ServiceResult<Uuid> {
        let original = office
            .note(id)
            .ok_or(ServiceError::NotFound { entity: "note" })?;
        let mut copy = Note::new(original.content.clone(), original.color, original.user_id);
        copy.title = original.title.as_ref().map(|t| format!("{t} (copy)"));
        copy.x = original.x + DUPLICATE_OFFSET;
        copy.y = original.y + DUPLICATE_OFFSET;
        copy.width = original.width;
        copy.height = original.height;
        Self::create(office, copy)
    }

    /// Notes for one user, most recently updated first.
    pub fn list_for_user(office: &BackOffice, user_id: Uuid) -> Vec<&Note> {
        let mut notes: Vec<&Note> = office
            .notes
            .iter()
            .filter(|note| note.user_id == user_id)
            .collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        notes
    }

    /// First free board slot scanning a fixed grid; falls back to a
    /// deterministic diagonal offset when the board is saturated.
    pub fn free_position(office: &BackOffice) -> (i32, i32) {
        let mut y = BOARD_MARGIN;
        while y < BOARD_HEIGHT {
            let mut x = BOARD_MARGIN;
            while x < BOARD_WIDTH - NOTE_WIDTH {
                let occupied = office.notes.iter().any(|note| {
                    (note.x - x).abs() < NOTE_WIDTH / 2 && (note.y - y).abs() < NOTE_HEIGHT / 2
                });
                if !occupied {
                    return (x, y);
                }
                x += NOTE_WIDTH + BOARD_MARGIN;
            }
            y += NOTE_HEIGHT + BOARD_MARGIN;
        }
        let shift = (office.notes.len() as i32) * DUPLICATE_OFFSET;
        (BOARD_MARGIN + shift % BOARD_WIDTH, BOARD_MARGIN + shift % BOARD_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NoteColor;

    fn note_for(user: Uuid) -> Note {
        Note::new("restock shelf 4", NoteColor::Yellow, user)
    }

    #[test]
    fn move_rounds_coordinates() {
        let mut office = BackOffice::new("Board");
        let id = NoteService::create(&mut office, note_for(Uuid::new_v4())).unwrap();
        NoteService::move_to(&mut office, id, 10.6, 99.4).unwrap();
        let note = office.note(id).unwrap();
        assert_eq!((note.x, note.y), (11, 99));
    }

    #[test]
    fn duplicate_offsets_and_marks_title() {
        let mut office = BackOffice::new("Board");
        let user = Uuid::new_v4();
        let mut original = note_for(user).at(40, 60);
        original.title = Some("Restock".into());
        let id = NoteService::create(&mut office, original).unwrap();

        let copy_id = NoteService::duplicate(&mut office, id).unwrap();
        let copy = office.note(copy_id).unwrap();
        assert_eq!(copy.title.as_deref(), Some("Restock (copy)"));
        assert_eq!((copy.x, copy.y), (60, 80));
        assert_eq!(copy.user_id, user);
    }

    #[test]
    fn free_position_skips_occupied_slots() {
        let mut office = BackOffice::new("Board");
        let user = Uuid::new_v4();
        let (x0, y0) = NoteService::free_position(&office);
        NoteService::create(&mut office, note_for(user).at(x0, y0)).unwrap();
        let (x1, y1) = NoteService::free_position(&office);
        assert_ne!((x0, y0), (x1, y1));
    }

    #[test]
    fn rejects_empty_content() {
        let mut office = BackOffice::new("Board");
        let mut note = note_for(Uuid::new_v4());
        note.content = "  ".into();
        assert!(NoteService::create(&mut office, note).is_err());
    }
}
