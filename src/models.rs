use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayName {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayName {
    pub fn short(self) -> &'static str {
        match self {
            DayName::Sunday => "Sun",
            DayName::Monday => "Mon",
            DayName::Tuesday => "Tue",
            DayName::Wednesday => "Wed",
            DayName::Thursday => "Thu",
            DayName::Friday => "Fri",
            DayName::Saturday => "Sat",
        }
    }
}

/// One calendar day's mood status inside a 7-day window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekItem {
    pub date: String,
    pub day_name: DayName,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub week_number: u32,
    #[serde(default)]
    pub mood: Option<u8>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The backend leaves `weekNumber` null on rows it has not numbered yet.
fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Mood {
    Angry = 1,
    Sad = 2,
    Neutral = 3,
    Happy = 4,
    Joy = 5,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Angry, Mood::Sad, Mood::Neutral, Mood::Happy, Mood::Joy];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|mood| mood.value() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Angry => "ANGRY",
            Mood::Sad => "SAD",
            Mood::Neutral => "NEUTRAL",
            Mood::Happy => "HAPPY",
            Mood::Joy => "JOY",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Angry => "\u{1F620}",
            Mood::Sad => "\u{1F62D}",
            Mood::Neutral => "\u{1F610}",
            Mood::Happy => "\u{1F60A}",
            Mood::Joy => "\u{1F601}",
        }
    }
}

impl TryFrom<u8> for Mood {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Mood::from_value(value).ok_or_else(|| format!("mood must be between 1 and 5, got {value}"))
    }
}

impl From<Mood> for u8 {
    fn from(mood: Mood) -> Self {
        mood.value()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub hobbies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters."))]
    pub username: String,
    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters."))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(alias = "userId", alias = "uuid")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitMoodRequest {
    pub mood: Mood,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PastMoodRequest {
    pub date: String,
    pub mood: Mood,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekNumberResponse {
    pub week_number: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub week_number: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub average_score: Option<f64>,
    #[serde(default)]
    pub entries_count: u32,
    #[serde(default)]
    pub breakdown: Vec<CategoryShare>,
    #[serde(default)]
    pub ai_comment: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
}

/// A mood save result kept client-side for the confirmation screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub user_id: String,
    pub date: String,
    pub mood: Mood,
    #[serde(default)]
    pub reason: Option<String>,
    pub saved_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub user_id: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Per-user client state, the equivalent of browser storage keyed by user id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCache {
    #[serde(default)]
    pub last_mood_entry: Option<MoodEntry>,
    #[serde(default)]
    pub last_past_mood_entry: Option<MoodEntry>,
    #[serde(default)]
    pub dismissed_reminders: BTreeSet<String>,
    #[serde(default)]
    pub just_logged_in_at: Option<i64>,
    #[serde(default)]
    pub weekly_stats: BTreeMap<u32, WeeklyStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientData {
    #[serde(default)]
    pub session: Option<StoredSession>,
    #[serde(default)]
    pub users: BTreeMap<String, UserCache>,
}
