//! Controller: routes UI actions to the list store and re-renders.
//!
//! Each [`Action`] maps to one handler that performs a single
//! read-modify-write through [`ListStore`], refreshes the cached snapshot and
//! calls the [`Render`] collaborator. List errors the user can cause
//! (duplicate name, vanished list) are shown through [`Interaction::notify`];
//! storage errors propagate to the caller.
//!
//! The film catalog is owned by the caller. Actions that name a film by id
//! resolve it against the catalog before touching any list.

pub mod action;
pub mod interaction;

pub use action::Action;
pub use interaction::{Interaction, Render};

use tracing::{debug, info};

use crate::error::AppError;
use crate::film::{Film, FilmId};
use crate::lists::{ListCollection, ListStore, WATCHLIST};

/// What a dispatched action did to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State changed and the view was re-rendered.
    Rendered,
    /// Cancelled, no-op, or rejected with a notice.
    Unchanged,
}

pub struct Controller<I, R> {
    lists: ListStore,
    catalog: Vec<Film>,
    snapshot: ListCollection,
    ui: I,
    view: R,
}

impl<I: Interaction, R: Render> Controller<I, R> {
    /// Initialise storage, load the current collection and render it once.
    pub fn new(lists: ListStore, catalog: Vec<Film>, ui: I, view: R) -> Result<Self, AppError> {
        lists.ensure_initialized()?;
        let snapshot = lists.get_all_lists()?;
        info!(lists = snapshot.len(), catalog = catalog.len(), "controller ready");

        let mut controller = Self { lists, catalog, snapshot, ui, view };
        controller.view.render(&controller.snapshot);
        Ok(controller)
    }

    /// Collection as of the last refresh.
    pub fn snapshot(&self) -> &ListCollection {
        &self.snapshot
    }

    pub fn store(&self) -> &ListStore {
        &self.lists
    }

    pub fn ui(&self) -> &I {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut I {
        &mut self.ui
    }

    /// Re-read the collection and render it.
    pub fn refresh(&mut self) -> Result<(), AppError> {
        self.snapshot = self.lists.get_all_lists()?;
        self.view.render(&self.snapshot);
        Ok(())
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, AppError> {
        debug!(action = action.identifier(), "dispatching");
        let result = match action {
            Action::AddList => self.add_list(),
            Action::DeleteList { list_name } => self.delete_list(&list_name),
            Action::CreateListWithFilm { film_id } => self.create_list_with_film(&film_id),
            Action::AddToList { list_name, film_id } => self.add_to_list(&list_name, &film_id),
            Action::RemoveFilm { list_name, film_id } => self.remove_film(&list_name, &film_id),
            Action::ToggleWatchlist { film_id } => self.toggle_watchlist(&film_id),
        };

        match result {
            Err(e) if e.is_user_facing() => {
                self.ui.notify(&e.to_string());
                Ok(Outcome::Unchanged)
            }
            other => other,
        }
    }

    // ── handlers ──────────────────────────────────────────────────────

    fn add_list(&mut self) -> Result<Outcome, AppError> {
        let Some(name) = self.prompt_name("Enter list name:") else {
            return Ok(Outcome::Unchanged);
        };
        self.lists.create_list(&name)?;
        self.rendered()
    }

    fn delete_list(&mut self, name: &str) -> Result<Outcome, AppError> {
        if !self.ui.confirm(&format!("Delete list \"{name}\"?")) {
            return Ok(Outcome::Unchanged);
        }
        self.lists.delete_list(name)?;
        self.rendered()
    }

    fn create_list_with_film(&mut self, film_id: &str) -> Result<Outcome, AppError> {
        let Some(film) = self.find_film(film_id) else {
            return Ok(Outcome::Unchanged);
        };
        let Some(name) = self.prompt_name("List name:") else {
            return Ok(Outcome::Unchanged);
        };
        self.lists.create_list_with(&name, film)?;
        self.ui.notify("List created and film added!");
        self.rendered()
    }

    fn add_to_list(&mut self, name: &str, film_id: &str) -> Result<Outcome, AppError> {
        let Some(film) = self.find_film(film_id) else {
            return Ok(Outcome::Unchanged);
        };
        if !self.lists.add_film_to_list(name, film)? {
            return Ok(Outcome::Unchanged);
        }
        self.ui.notify("Film added to list!");
        self.rendered()
    }

    fn remove_film(&mut self, name: &str, film_id: &str) -> Result<Outcome, AppError> {
        // Prefer the id as stored so a numeric id given as text still matches.
        let id = self
            .lists
            .get_list(name)?
            .into_iter()
            .map(|f| f.id)
            .find(|id| id.matches_text(film_id))
            .unwrap_or_else(|| FilmId::from(film_id));
        self.lists.remove_film_from_list(name, &id)?;
        self.rendered()
    }

    fn toggle_watchlist(&mut self, film_id: &str) -> Result<Outcome, AppError> {
        // Films that left the catalog can still be taken off the watchlist.
        let film = match self.find_film(film_id) {
            Some(film) => film,
            None => match self
                .lists
                .get_list(WATCHLIST)?
                .into_iter()
                .find(|f| f.id.matches_text(film_id))
            {
                Some(film) => film,
                None => return Ok(Outcome::Unchanged),
            },
        };
        let label = film.label();
        if self.lists.toggle_watchlist(film)? {
            self.ui.notify(&format!("Added \"{label}\" to watchlist"));
        } else {
            self.ui.notify(&format!("Removed \"{label}\" from watchlist"));
        }
        self.rendered()
    }

    // ── helpers ───────────────────────────────────────────────────────

    fn prompt_name(&mut self, message: &str) -> Option<String> {
        self.ui.prompt_text(message).filter(|name| !name.is_empty())
    }

    fn find_film(&self, film_id: &str) -> Option<Film> {
        let found = self.catalog.iter().find(|f| f.id.matches_text(film_id)).cloned();
        if found.is_none() {
            debug!(film_id, "film not in catalog");
        }
        found
    }

    fn rendered(&mut self) -> Result<Outcome, AppError> {
        self.refresh()?;
        Ok(Outcome::Rendered)
    }
}
