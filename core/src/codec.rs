//! Line codec for persisted records.
//!
//! Each record is one line of comma-separated fields in a fixed order:
//!
//! ```text
//! users:    username,password,email
//! events:   id,name,date,venue,category,price,capacity,available
//! tickets:  id,username,email,event_id,quantity,cost,booking_date
//! ```
//!
//! Free-text fields may contain the delimiter. Unlike the legacy format, which
//! wrote such fields verbatim and shifted every later field on reload, special
//! characters are backslash-escaped:
//!
//! | Character       | Written as |
//! |-----------------|------------|
//! | `\`             | `\\`       |
//! | `,`             | `\,`       |
//! | newline         | `\n`       |
//! | carriage return | `\r`       |
//!
//! Numbers use a deterministic representation: integers in plain decimal,
//! prices and costs in the shortest form that parses back to the same `f64`
//! (`25`, `25.5`, `12.345`). Readers accept any form `str::parse` accepts, so
//! zero-padded legacy values such as `25.50` load unchanged.
//!
//! Field content is not validated on decode: an unparsable number reads as
//! zero, matching the legacy reader.

use crate::types::{Collection, Event, EventId, Ticket, TicketId, User};
use thiserror::Error;

/// Field delimiter.
pub const DELIMITER: char = ',';

/// Escape character.
pub const ESCAPE: char = '\\';

/// Reasons a line cannot be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The line does not have the record's field count.
    #[error("expected {expected} fields, found {found}")]
    FieldCount {
        /// Fields the record kind needs
        expected: usize,
        /// Fields present on the line
        found: usize,
    },

    /// A backslash is not followed by `\`, `,`, `n` or `r`.
    #[error("invalid escape sequence at byte {position}")]
    InvalidEscape {
        /// Byte offset of the backslash
        position: usize,
    },
}

/// A record kind that can be written as one delimited line.
pub trait Record: Sized {
    /// Collection this record kind is stored in
    const COLLECTION: Collection;

    /// Number of fields on a line
    const FIELD_COUNT: usize;

    /// The record's fields, unescaped, in line order
    fn to_fields(&self) -> Vec<String>;

    /// Rebuilds a record from exactly [`Self::FIELD_COUNT`] unescaped fields
    fn from_fields(fields: &mut Fields) -> Self;
}

/// Cursor over the unescaped fields of one line.
#[derive(Debug)]
pub struct Fields(std::vec::IntoIter<String>);

impl Fields {
    fn new(fields: Vec<String>) -> Self {
        Self(fields.into_iter())
    }

    /// Next field as text
    pub fn text(&mut self) -> String {
        self.0.next().unwrap_or_default()
    }

    /// Next field as an unsigned integer, zero when unparsable
    pub fn count(&mut self) -> u32 {
        self.text().trim().parse().unwrap_or(0)
    }

    /// Next field as a finite decimal, zero when unparsable
    pub fn amount(&mut self) -> f64 {
        self.text()
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }
}

/// Formats a price or cost for storage.
#[must_use]
pub fn format_amount(value: f64) -> String {
    format!("{value}")
}

/// Appends `field` to `line` with special characters escaped.
pub fn escape_into(line: &mut String, field: &str) {
    for c in field.chars() {
        match c {
            ESCAPE => line.push_str("\\\\"),
            DELIMITER => line.push_str("\\,"),
            '\n' => line.push_str("\\n"),
            '\r' => line.push_str("\\r"),
            other => line.push(other),
        }
    }
}

/// Splits a line on unescaped delimiters and unescapes each field.
///
/// # Errors
///
/// Returns [`CodecError::InvalidEscape`] for an unknown or dangling escape.
pub fn split_fields(line: &str) -> Result<Vec<String>, CodecError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.char_indices();

    while let Some((position, c)) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some((_, ESCAPE)) => current.push(ESCAPE),
                Some((_, DELIMITER)) => current.push(DELIMITER),
                Some((_, 'n')) => current.push('\n'),
                Some((_, 'r')) => current.push('\r'),
                _ => return Err(CodecError::InvalidEscape { position }),
            },
            DELIMITER => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);

    Ok(fields)
}

/// Encodes a record as one line, without a trailing newline.
#[must_use]
pub fn encode<R: Record>(record: &R) -> String {
    let mut line = String::new();
    for (index, field) in record.to_fields().iter().enumerate() {
        if index > 0 {
            line.push(DELIMITER);
        }
        escape_into(&mut line, field);
    }
    line
}

/// Decodes one line into a record.
///
/// # Errors
///
/// Returns [`CodecError`] when the line has the wrong number of fields or an
/// invalid escape sequence.
pub fn decode<R: Record>(line: &str) -> Result<R, CodecError> {
    let fields = split_fields(line)?;
    if fields.len() != R::FIELD_COUNT {
        return Err(CodecError::FieldCount {
            expected: R::FIELD_COUNT,
            found: fields.len(),
        });
    }
    Ok(R::from_fields(&mut Fields::new(fields)))
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;
    const FIELD_COUNT: usize = 3;

    fn to_fields(&self) -> Vec<String> {
        vec![self.username.clone(), self.password.clone(), self.email.clone()]
    }

    fn from_fields(fields: &mut Fields) -> Self {
        Self {
            username: fields.text(),
            password: fields.text(),
            email: fields.text(),
        }
    }
}

impl Record for Event {
    const COLLECTION: Collection = Collection::Events;
    const FIELD_COUNT: usize = 8;

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.date.clone(),
            self.venue.clone(),
            self.category.clone(),
            format_amount(self.price),
            self.capacity.to_string(),
            self.available.to_string(),
        ]
    }

    fn from_fields(fields: &mut Fields) -> Self {
        Self {
            id: EventId::new(fields.count()),
            name: fields.text(),
            date: fields.text(),
            venue: fields.text(),
            category: fields.text(),
            price: fields.amount(),
            capacity: fields.count(),
            available: fields.count(),
        }
    }
}

impl Record for Ticket {
    const COLLECTION: Collection = Collection::Tickets;
    const FIELD_COUNT: usize = 7;

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id.value().to_string(),
            self.owner_username.clone(),
            self.owner_email.clone(),
            self.event_id.to_string(),
            self.quantity.to_string(),
            format_amount(self.total_cost),
            self.booking_date.clone(),
        ]
    }

    fn from_fields(fields: &mut Fields) -> Self {
        Self {
            id: TicketId::new(fields.count()),
            owner_username: fields.text(),
            owner_email: fields.text(),
            event_id: EventId::new(fields.count()),
            quantity: fields.count(),
            total_cost: fields.amount(),
            booking_date: fields.text(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn concert() -> Event {
        Event {
            id: EventId::new(2),
            name: "Rock, Paper & Scissors".to_string(),
            date: "05-07-2025".to_string(),
            venue: "Main Arena".to_string(),
            category: "Music".to_string(),
            price: 49.5,
            capacity: 300,
            available: 120,
        }
    }

    #[test]
    fn test_encode_user() {
        let user = User::new("alice", "pw123", "a@b.com");
        assert_eq!(encode(&user), "alice,pw123,a@b.com");
    }

    #[test]
    fn test_encode_escapes_delimiter_in_free_text() {
        assert_eq!(
            encode(&concert()),
            "2,Rock\\, Paper & Scissors,05-07-2025,Main Arena,Music,49.5,300,120"
        );
    }

    #[test]
    fn test_decode_restores_escaped_name() {
        let line = encode(&concert());
        let decoded: Event = decode(&line).unwrap();
        assert_eq!(decoded, concert());
    }

    #[test]
    fn test_decode_ticket() {
        let ticket: Ticket = decode("1001,alice,a@b.com,0,10,250,01-01-2025").unwrap();
        assert_eq!(ticket.id, TicketId::new(1001));
        assert_eq!(ticket.event_id, EventId::new(0));
        assert_eq!(ticket.quantity, 10);
        assert!((ticket.total_cost - 250.0).abs() < f64::EPSILON);
        assert_eq!(ticket.booking_date, "01-01-2025");
    }

    #[test]
    fn test_wrong_field_count_is_malformed() {
        let result = decode::<User>("alice,pw123");
        assert_eq!(result, Err(CodecError::FieldCount { expected: 3, found: 2 }));

        let result = decode::<Ticket>("1001,alice,a@b.com,0,10,250,01-01-2025,extra");
        assert_eq!(result, Err(CodecError::FieldCount { expected: 7, found: 8 }));
    }

    #[test]
    fn test_unknown_escape_is_malformed() {
        let result = decode::<User>("al\\ice,pw,a@b.com");
        assert_eq!(result, Err(CodecError::InvalidEscape { position: 2 }));

        let result = decode::<User>("alice,pw,a@b.com\\");
        assert_eq!(result, Err(CodecError::InvalidEscape { position: 16 }));
    }

    #[test]
    fn test_corrupted_numbers_decode_to_zero() {
        let event: Event = decode("1,Expo,01-02-2025,Hall,Other,abc,100,-3").unwrap();
        assert!(event.price.abs() < f64::EPSILON);
        assert_eq!(event.capacity, 100);
        assert_eq!(event.available, 0);
    }

    #[test]
    fn test_legacy_zero_padding_is_tolerated() {
        let padded: Event = decode("1,Expo,01-02-2025,Hall,Other,25.50,100,100").unwrap();
        assert!((padded.price - 25.5).abs() < f64::EPSILON);
        assert_eq!(encode(&padded), "1,Expo,01-02-2025,Hall,Other,25.5,100,100");
    }

    #[test]
    fn test_newlines_in_text_stay_on_one_line() {
        let user = User::new("bob", "line1\nline2\r", "b@c.org");
        let line = encode(&user);
        assert!(!line.contains('\n'));
        assert_eq!(decode::<User>(&line).unwrap(), user);
    }

    #[test]
    fn test_empty_fields_are_kept() {
        let user: User = decode(",,").unwrap();
        assert_eq!(user, User::new("", "", ""));
        assert_eq!(encode(&user), ",,");
    }
}
