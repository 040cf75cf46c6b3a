//! UI actions and how they are built from triggers.
//!
//! A trigger is what the front end reports when the user does something: an
//! action identifier plus string attributes (the list or film it targets).
//! [`Action::from_trigger`] turns that into a typed [`Action`], so nothing
//! downstream depends on how the front end names or lays out its controls.

use std::collections::HashMap;

use crate::error::AppError;

/// Attribute naming the list an action targets.
pub const ATTR_LIST_NAME: &str = "list-name";
/// Attribute carrying the film id in its string form.
pub const ATTR_FILM_ID: &str = "film-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Prompt for a name and create an empty list.
    AddList,
    /// Confirm, then delete the list.
    DeleteList { list_name: String },
    /// Prompt for a name and create a list holding one catalog film.
    CreateListWithFilm { film_id: String },
    /// Add a catalog film to an existing list.
    AddToList { list_name: String, film_id: String },
    RemoveFilm { list_name: String, film_id: String },
    ToggleWatchlist { film_id: String },
}

impl Action {
    /// Every identifier [`Action::from_trigger`] accepts.
    pub const IDENTIFIERS: [&'static str; 6] = [
        "add-list",
        "delete-list",
        "create-list",
        "add-to-list",
        "remove-film",
        "toggle-watchlist",
    ];

    pub fn identifier(&self) -> &'static str {
        match self {
            Action::AddList => "add-list",
            Action::DeleteList { .. } => "delete-list",
            Action::CreateListWithFilm { .. } => "create-list",
            Action::AddToList { .. } => "add-to-list",
            Action::RemoveFilm { .. } => "remove-film",
            Action::ToggleWatchlist { .. } => "toggle-watchlist",
        }
    }

    pub fn from_trigger(identifier: &str, attrs: &HashMap<String, String>) -> Result<Self, AppError> {
        let attr = |name: &str| {
            attrs.get(name).cloned().ok_or_else(|| AppError::MissingAttribute {
                action: identifier.to_string(),
                attribute: name.to_string(),
            })
        };

        match identifier {
            "add-list" => Ok(Action::AddList),
            "delete-list" => Ok(Action::DeleteList { list_name: attr(ATTR_LIST_NAME)? }),
            "create-list" => Ok(Action::CreateListWithFilm { film_id: attr(ATTR_FILM_ID)? }),
            "add-to-list" => Ok(Action::AddToList {
                list_name: attr(ATTR_LIST_NAME)?,
                film_id: attr(ATTR_FILM_ID)?,
            }),
            "remove-film" => Ok(Action::RemoveFilm {
                list_name: attr(ATTR_LIST_NAME)?,
                film_id: attr(ATTR_FILM_ID)?,
            }),
            "toggle-watchlist" => Ok(Action::ToggleWatchlist { film_id: attr(ATTR_FILM_ID)? }),
            other => Err(AppError::UnknownAction(other.to_string())),
        }
    }
}
