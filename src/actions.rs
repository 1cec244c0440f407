//! Maps one action record to the sentence shown in a card's history log.
//!
//! The tag-to-sentence mapping is a compatibility contract; the wording
//! below must not drift.

use eyre::{Report, Result, eyre};

use crate::models::{Action, NameRef};

/// The formatter's verdict for one action: the sentence to render, plus the
/// attachment link that `addAttachmentToCard` appends after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub text: String,
    pub attachment: Option<(String, String)>,
}

impl Description {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }
}

/// Describe a single action.
///
/// Unrecognized types render as `Unknown action`. A payload field that a
/// sentence interpolates being absent is a data-integrity fault and errors
/// out rather than rendering a hole.
pub fn describe(action: &Action) -> Result<Description> {
    let data = &action.data;
    let text = match action.kind.as_str() {
        "addAttachmentToCard" => {
            let attachment = data
                .attachment
                .as_ref()
                .ok_or_else(|| missing(action, "attachment"))?;
            return Ok(Description {
                text: "Added an attachment to the card:".to_string(),
                attachment: Some((attachment.name.clone(), attachment.url.clone())),
            });
        }
        "addChecklistToCard" => format!(
            "Added the checklist {} to the card",
            named(&data.checklist, action, "checklist")?
        ),
        "addMemberToCard" => format!("Added {} to the card", acted_member(action)?),
        "commentCard" => "Commented on the card".to_string(),
        "convertToCardFromCheckItem" => "Converted a check item into the card".to_string(),
        "copyCard" => "Copied the card".to_string(),
        "copyCommentCard" => "Copied a comment from the card".to_string(),
        "createCard" => format!("Added the card to {}", named(&data.list, action, "list")?),
        "deleteAttachmentFromCard" => "Deleted an attachment from the card".to_string(),
        "deleteCard" => "Deleted the card".to_string(),
        "emailCard" => "Sent an email comment to the card".to_string(),
        "moveCardFromBoard" => format!(
            "Moved the card from the {} board to the {} board",
            named(&data.board, action, "board")?,
            named(&data.board_target, action, "boardTarget")?,
        ),
        "moveCardToBoard" => format!(
            "Moved the card to the {} board from the {} board",
            named(&data.board, action, "board")?,
            named(&data.board_source, action, "boardSource")?,
        ),
        "removeChecklistFromCard" => "Removed a checklist from the card".to_string(),
        "removeMemberFromCard" => format!("Removed {} from the card", acted_member(action)?),
        "updateCard" => describe_update(action)?,
        "updateCheckItemStateOnCard" => "Update a check item state on the card".to_string(),
        _ => "Unknown action".to_string(),
    };
    Ok(Description::plain(text))
}

/// `updateCard` carries a delta of previous values; the first populated
/// field in the fixed order idList, pos, name, desc, closed decides the
/// sentence.
fn describe_update(action: &Action) -> Result<String> {
    let data = &action.data;
    let old = data.old.clone().unwrap_or_default();

    let text = if old.id_list.is_some() {
        format!(
            "Moved the card from the {} list to the {} list",
            named(&data.list_before, action, "listBefore")?,
            named(&data.list_after, action, "listAfter")?,
        )
    } else if old.pos.is_some() {
        format!(
            "Moved the card within the {} list",
            named(&data.list, action, "list")?
        )
    } else if old.name.is_some() {
        let card = data.card.as_ref().ok_or_else(|| missing(action, "card"))?;
        format!("Changed the name of the card to \"{}\"", card.name)
    } else if old.desc.is_some() {
        "Updated the description".to_string()
    } else if let Some(was_closed) = old.closed {
        if was_closed {
            "Open the card".to_string()
        } else {
            "Closed the card".to_string()
        }
    } else {
        "Unknown update card action".to_string()
    };
    Ok(text)
}

fn named<'a>(field: &'a Option<NameRef>, action: &Action, what: &str) -> Result<&'a str> {
    field
        .as_ref()
        .map(|n| n.name.as_str())
        .ok_or_else(|| missing(action, what))
}

fn acted_member(action: &Action) -> Result<&str> {
    action
        .member
        .as_ref()
        .map(|m| m.full_name.as_str())
        .ok_or_else(|| missing(action, "member"))
}

fn missing(action: &Action, what: &str) -> Report {
    eyre!(
        "Action {} ({}) is missing its {} payload",
        action.id,
        action.kind,
        what
    )
}
