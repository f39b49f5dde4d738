//! Invitation message composition.
//!
//! A [`MessageTemplate`] turns one guest row into the ordered text
//! segments that are sent one after another in the chat. The built-in
//! [`InvitationTemplate`] writes Spanish invitations; other templates can
//! be plugged into the sender instead.

use crate::guest::columns;
use crate::table::Row;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default invitation website.
pub const DEFAULT_INVITATION_LINK: &str = "https://example.com/boda/";

/// Label sent right before the guest's secret code.
pub const DEFAULT_CODE_LABEL: &str = "El código secreto 🔒 es:";

/// Venue details used when no custom text is configured.
///
/// `{party_size}` and `{table}` are replaced per guest.
pub const DEFAULT_VENUE_DETAILS: &str = "📍 Recepción y fiesta\n\
Tiene *{party_size}* silla(s) reservada(s) en la mesa *{table}* 🪑\n\n\
¡Esperamos verlos allí! 🥳🥂💕";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Row has no {0} column")]
    MissingField(&'static str),

    #[error("Unknown sex {0:?}, expected F or M")]
    UnknownSex(String),
}

// ---------------------------------------------------------------------------
// GuestFields
// ---------------------------------------------------------------------------

/// The row fields a message template may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestFields {
    pub id: String,
    pub sex: String,
    pub last_name: String,
    pub first_name: String,
    pub party_size: String,
    pub table_number: String,
}

impl GuestFields {
    /// Read the template fields from a guest row. Every field's column must
    /// exist; values are taken as displayed text.
    pub fn from_row(row: Row<'_>) -> Result<Self, TemplateError> {
        let field = |name: &'static str| {
            row.get(name)
                .map(|c| c.to_string())
                .ok_or(TemplateError::MissingField(name))
        };
        Ok(Self {
            id: field(columns::ID)?,
            sex: field(columns::SEX)?,
            last_name: field(columns::LAST_NAME)?,
            first_name: field(columns::FIRST_NAME)?,
            party_size: field(columns::PARTY_SIZE)?,
            table_number: field(columns::TABLE_NUMBER)?,
        })
    }

    fn is_single_seat(&self) -> bool {
        self.party_size.trim() == "1"
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Produces the ordered message segments for one guest.
pub trait MessageTemplate: Send + Sync {
    fn compose(&self, guest: &GuestFields) -> Result<Vec<String>, TemplateError>;
}

/// The wedding invitation: greeting, link, code label, code, venue details.
#[derive(Debug, Clone)]
pub struct InvitationTemplate {
    pub link: String,
    pub code_label: String,
    /// Free text with optional `{party_size}` / `{table}` placeholders.
    pub venue_details: String,
}

impl Default for InvitationTemplate {
    fn default() -> Self {
        Self {
            link: DEFAULT_INVITATION_LINK.to_string(),
            code_label: DEFAULT_CODE_LABEL.to_string(),
            venue_details: DEFAULT_VENUE_DETAILS.to_string(),
        }
    }
}

impl InvitationTemplate {
    /// Greeting tailored by sex and by singular/plural party size.
    pub fn greeting(&self, guest: &GuestFields) -> Result<String, TemplateError> {
        let salutation = match guest.sex.trim() {
            "F" => "Querida",
            "M" => "Querido",
            other => return Err(TemplateError::UnknownSex(other.to_string())),
        };
        let seats = if guest.is_single_seat() {
            "silla reservada"
        } else {
            "sillas reservadas"
        };
        Ok(format!(
            "🎊 {salutation} *{} {}*, 🎊 tiene *{}* {seats} en la mesa *{}* 🪑 de nuestra recepción 🎉\n\
             ¡Los esperamos en nuestra boda! 🤵👰 Visiten la web para más detalles 🌐\n\
             Ingresen el código secreto y den click en enviar 📤:",
            guest.last_name, guest.first_name, guest.party_size, guest.table_number,
        ))
    }

    fn venue(&self, guest: &GuestFields) -> String {
        self.venue_details
            .replace("{party_size}", &guest.party_size)
            .replace("{table}", &guest.table_number)
    }
}

impl MessageTemplate for InvitationTemplate {
    fn compose(&self, guest: &GuestFields) -> Result<Vec<String>, TemplateError> {
        Ok(vec![
            self.greeting(guest)?,
            self.link.clone(),
            self.code_label.clone(),
            guest.id.clone(),
            self.venue(guest),
        ])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::guest::GUEST_COLUMNS;
    use crate::table::{Cell, Table};

    fn guest(sex: &str, party_size: &str) -> GuestFields {
        GuestFields {
            id: "X1Y2Z3".to_string(),
            sex: sex.to_string(),
            last_name: "GOMEZ".to_string(),
            first_name: "ANA".to_string(),
            party_size: party_size.to_string(),
            table_number: "7".to_string(),
        }
    }

    #[test]
    fn five_segments_in_order() {
        let template = InvitationTemplate::default();
        let segments = template.compose(&guest("F", "2")).unwrap();

        assert_eq!(segments.len(), 5);
        assert_eq!(segments[1], DEFAULT_INVITATION_LINK);
        assert_eq!(segments[2], DEFAULT_CODE_LABEL);
        assert_eq!(segments[3], "X1Y2Z3");
        assert!(segments[4].contains("*2* silla(s)"));
        assert!(segments[4].contains("mesa *7*"));
    }

    #[test]
    fn greeting_by_sex() {
        let template = InvitationTemplate::default();
        assert!(template.greeting(&guest("F", "1")).unwrap().contains("Querida *GOMEZ ANA*"));
        assert!(template.greeting(&guest("M", "1")).unwrap().contains("Querido *GOMEZ ANA*"));
    }

    #[test]
    fn greeting_by_party_size() {
        let template = InvitationTemplate::default();
        assert!(template
            .greeting(&guest("M", "1"))
            .unwrap()
            .contains("*1* silla reservada"));
        assert!(template
            .greeting(&guest("M", "3"))
            .unwrap()
            .contains("*3* sillas reservadas"));
    }

    #[test]
    fn unknown_sex_is_an_error() {
        let template = InvitationTemplate::default();
        assert_matches!(
            template.compose(&guest("NULL", "1")),
            Err(TemplateError::UnknownSex(s)) if s == "NULL"
        );
    }

    #[test]
    fn fields_from_row() {
        let table = Table::from_rows(
            GUEST_COLUMNS,
            [vec![
                Cell::text("AB12CD"),
                Cell::text("M"),
                Cell::text("PEREZ"),
                Cell::text("JUAN"),
                Cell::text("2"),
                Cell::text("4"),
            ]],
        )
        .unwrap();

        let fields = GuestFields::from_row(table.row(0).unwrap()).unwrap();

        assert_eq!(fields.id, "AB12CD");
        assert_eq!(fields.table_number, "4");
    }

    #[test]
    fn fields_require_columns() {
        let table = Table::from_rows(["ID"], [vec![Cell::text("AB12CD")]]).unwrap();
        assert_matches!(
            GuestFields::from_row(table.row(0).unwrap()),
            Err(TemplateError::MissingField(columns::SEX))
        );
    }
}
