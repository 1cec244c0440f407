//! Serde type definitions for the slice of the Trello REST API this tool
//! reads.
//!
//! Two endpoints are consumed:
//! - `GET /boards/{id}?cards=all&lists=all&members=all&...` for the full
//!   board snapshot (cards, members, labels)
//! - `GET /boards/{id}/actions?limit=1000&before=...&since=...` for the
//!   audit trail of actions within one time window
//!
//! Trello serves camelCase field names; everything here is renamed to
//! idiomatic snake_case. Only the fields the exporter reads are declared,
//! unknown fields are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A full board snapshot. Read-only; fetched fresh once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortUrl")]
    pub short_url: String,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// A card as it appears inside a board snapshot.
///
/// `id_short` is the display number, unique only within its board. Members
/// are referenced by id and resolved against [`Board::members`] at render
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(rename = "idShort")]
    pub id_short: u64,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(rename = "shortUrl")]
    pub short_url: String,
    #[serde(rename = "dateLastActivity")]
    pub date_last_activity: DateTime<Utc>,
    #[serde(rename = "idMembers", default)]
    pub id_members: Vec<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// A board member. Cards and actions reference members by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

/// A label. Trello allows labels with empty names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub name: String,
}

/// A file or link attached to a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// One immutable audit record of something that happened on a board.
///
/// `kind` is kept as the raw wire tag rather than an enum: the history
/// filter tests it for the substring `Card`, and tags Trello adds later must
/// still flow through to the `Unknown action` fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "memberCreator")]
    pub member_creator: ActionMember,
    /// The member acted upon, present on member add/remove actions.
    #[serde(default)]
    pub member: Option<ActionMember>,
    #[serde(default)]
    pub data: ActionData,
}

/// The acting (or acted-upon) member embedded in an action record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionMember {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

/// Type-specific action payload. Trello only populates the fields relevant
/// to the action's type, so everything is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionData {
    #[serde(default)]
    pub card: Option<CardRef>,
    #[serde(default)]
    pub list: Option<NameRef>,
    #[serde(rename = "listBefore", default)]
    pub list_before: Option<NameRef>,
    #[serde(rename = "listAfter", default)]
    pub list_after: Option<NameRef>,
    #[serde(default)]
    pub board: Option<NameRef>,
    #[serde(rename = "boardSource", default)]
    pub board_source: Option<NameRef>,
    #[serde(rename = "boardTarget", default)]
    pub board_target: Option<NameRef>,
    #[serde(default)]
    pub checklist: Option<NameRef>,
    #[serde(default)]
    pub attachment: Option<AttachmentRef>,
    /// Comment body on `commentCard` actions.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub old: Option<OldFields>,
}

/// The card an action targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A named entity referenced by an action payload (list, board, checklist).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRef {
    pub name: String,
}

/// The attachment referenced by an `addAttachmentToCard` action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// The `old` delta carried by `updateCard` actions: whichever field changed
/// holds its previous value, everything else is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OldFields {
    #[serde(rename = "idList", default)]
    pub id_list: Option<String>,
    #[serde(default)]
    pub pos: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub closed: Option<bool>,
}
