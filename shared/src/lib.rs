use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Calendar date in the local calendar, serialized as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateIdentifier(NaiveDate);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateIdentifierError {
    #[error("'{0}' is not in YYYY-MM-DD form")]
    Malformed(String),
    #[error("'{0}' is not a calendar date")]
    OutOfRange(String),
}

impl DateIdentifier {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse the fixed `YYYY-MM-DD` shape. Anything else (short fields,
    /// other separators, surrounding whitespace) is rejected.
    pub fn parse(text: &str) -> Result<Self, DateIdentifierError> {
        let bytes = text.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !well_formed {
            return Err(DateIdentifierError::Malformed(text.to_string()));
        }

        let field = |range: std::ops::Range<usize>| -> Result<u32, DateIdentifierError> {
            text[range]
                .parse::<u32>()
                .map_err(|_| DateIdentifierError::Malformed(text.to_string()))
        };
        let year = field(0..4)?;
        let month = field(5..7)?;
        let day = field(8..10)?;

        NaiveDate::from_ymd_opt(year as i32, month, day)
            .map(Self)
            .ok_or_else(|| DateIdentifierError::OutOfRange(text.to_string()))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DateIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.0.year(), self.0.month(), self.0.day())
    }
}

impl FromStr for DateIdentifier {
    type Err = DateIdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DateIdentifier {
    type Error = DateIdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DateIdentifier> for String {
    fn from(value: DateIdentifier) -> Self {
        value.to_string()
    }
}

/// Kind of board, derived from the day offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardType {
    /// The board for the base date itself (offset 0)
    Today,
    /// Any later day of the week
    Day,
}

impl BoardType {
    pub fn for_offset(day_offset: u32) -> Self {
        if day_offset == 0 {
            BoardType::Today
        } else {
            BoardType::Day
        }
    }
}

/// Persisted day board: one assigned picture card plus the metadata needed to
/// find it again for a `(base date, day offset)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Opaque id minted at first save, never changed afterwards
    pub id: String,
    #[serde(rename = "type")]
    pub board_type: BoardType,
    /// Target date (`base_date_iso + day_offset`), derived
    #[serde(rename = "dateISO")]
    pub date_iso: DateIdentifier,
    /// Anchor date of the week this board belongs to
    #[serde(rename = "baseDateISO")]
    pub base_date_iso: DateIdentifier,
    /// Days after the anchor date; older records may carry it as a string
    #[serde(deserialize_with = "deserialize_day_offset")]
    pub day_offset: u32,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Activity>,
}

impl Board {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// The card shown in the activity slot. Two-card boards written by the
    /// Today + Activity layout keep the activity at index 1.
    pub fn canonical_activity(&self) -> Option<&Activity> {
        self.cards.get(1).or_else(|| self.cards.first())
    }
}

fn deserialize_day_offset<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawOffset {
        Integer(u64),
        Float(f64),
        Text(String),
    }

    let invalid = |what: String| -> D::Error {
        serde::de::Error::custom(format!("invalid dayOffset: {}", what))
    };
    match RawOffset::deserialize(deserializer)? {
        RawOffset::Integer(n) => u32::try_from(n).map_err(|_| invalid(n.to_string())),
        RawOffset::Float(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        RawOffset::Float(f) => Err(invalid(f.to_string())),
        RawOffset::Text(s) => s.trim().parse::<u32>().map_err(|_| invalid(s)),
    }
}

/// A picture card placed on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Activity {
    /// Reference into the built-in catalog; only the key is persisted
    Library(LibraryActivity),
    /// Card made from a user photo stored on the device
    Custom(CustomActivity),
}

impl Activity {
    pub fn name(&self) -> &str {
        match self {
            Activity::Library(a) => &a.name,
            Activity::Custom(a) => &a.name,
        }
    }

    pub fn is_from_library(&self) -> bool {
        matches!(self, Activity::Library(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub from_library: FromLibrary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_key: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomActivity {
    pub name: String,
    pub image: ImageRef,
}

/// Reference to an image file on the local device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub uri: String,
}

/// Marker persisted as `"fromLibrary": true`. Only `true` is accepted, which
/// is what separates library cards from custom ones in stored JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FromLibrary;

impl Serialize for FromLibrary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(true)
    }
}

impl<'de> Deserialize<'de> for FromLibrary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if bool::deserialize(deserializer)? {
            Ok(FromLibrary)
        } else {
            Err(serde::de::Error::custom("fromLibrary must be true"))
        }
    }
}

/// Named position on a board that can hold one activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Today,
    Activity,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Today => "Today",
            Slot::Activity => "Activity",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown slot '{0}'")]
pub struct SlotError(pub String);

impl FromStr for Slot {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" | "0" => Ok(Slot::Today),
            "activity" | "1" => Ok(Slot::Activity),
            _ => Err(SlotError(s.to_string())),
        }
    }
}

/// Slot value as it arrives from navigation parameters: a bare name, a
/// numeric position, or an object wrapping either under `slot`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawSlot {
    Name(String),
    Index(u64),
    Tagged { slot: Box<RawSlot> },
}

impl TryFrom<RawSlot> for Slot {
    type Error = SlotError;

    fn try_from(raw: RawSlot) -> Result<Self, Self::Error> {
        match raw {
            RawSlot::Name(name) => name.parse(),
            RawSlot::Index(index) => index.to_string().parse(),
            RawSlot::Tagged { slot } => Slot::try_from(*slot),
        }
    }
}
