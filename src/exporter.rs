//! Markdown rendering for board and card documents.
//!
//! The layout here is a compatibility contract with previously exported
//! archives: the `&nbsp;` indentation, the placeholder strings and the
//! single-backtick history fences are all load-bearing. Change nothing
//! without a matching fixture update.

use std::io::Write;

use chrono::{DateTime, Utc};
use eyre::{Result, eyre};

use crate::actions;
use crate::models::{Action, Board, Card};
use crate::store::FrozenActions;
use crate::utils::format_utc;

/// Indentation unit carried over from the original export format.
const TAB: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

/// Cards still worth exporting: active since the cutoff, most recent first.
pub fn surviving_cards(board: &Board, cutoff: DateTime<Utc>) -> Vec<&Card> {
    let mut cards: Vec<&Card> = board
        .cards
        .iter()
        .filter(|card| card.date_last_activity >= cutoff)
        .collect();
    cards.sort_by(|a, b| b.date_last_activity.cmp(&a.date_last_activity));
    cards
}

/// Write the board's table-of-contents document: an h1 title linking to the
/// board, then one heading block per card linking to that card's file.
pub fn write_table_of_contents<W: Write>(
    writer: &mut W,
    board: &Board,
    cards: &[&Card],
) -> std::io::Result<()> {
    writeln!(writer, "# [{}]({})", board.name, board.short_url)?;
    for card in cards {
        let full_id = format!("{}-{}", board.name, card.id_short);
        let card_path = format!("{}-cards/{}.md", board.name, full_id);
        writeln!(writer, "### [Card #{}]({})", card.id_short, card_path)?;
        writeln!(writer, "[{full_id}]({card_path})")?;
        writeln!(writer, "###### {}", card.name)?;
        writeln!(
            writer,
            "*Last Modified: {}*",
            format_utc(card.date_last_activity)
        )?;
        writeln!(writer, "___")?;
    }
    Ok(())
}

/// Write one card's document: current state first, then the comment log,
/// then the full history of card-affecting actions, newest first.
///
/// Fails when a card references a member id the board snapshot does not
/// know, or when an action's payload is missing a field its history
/// sentence interpolates. Both mean the fetched data disagrees with itself.
pub fn write_card_markdown<W: Write>(
    writer: &mut W,
    board: &Board,
    card: &Card,
    history: &FrozenActions,
) -> Result<()> {
    let full_id = format!("{}-{}", board.name, card.id_short);

    writeln!(writer, "# #{}", card.id_short)?;
    writeln!(writer, "### {full_id}")?;

    writeln!(writer, "#### {TAB}Name")?;
    if card.name.is_empty() {
        writeln!(writer, "{TAB}{TAB}[no name]")?;
    } else {
        writeln!(writer, "{TAB}{TAB}{}", card.name)?;
    }

    // An empty description drops the whole section.
    if !card.desc.is_empty() {
        writeln!(writer, "#### {TAB}Description")?;
        writeln!(writer, "{TAB}{TAB}{}", card.desc)?;
    }

    writeln!(writer, "#### {TAB}Members")?;
    if card.id_members.is_empty() {
        writeln!(writer, "{TAB}{TAB}[no members]")?;
    } else {
        for member_id in &card.id_members {
            let member = board
                .members
                .iter()
                .find(|member| &member.id == member_id)
                .ok_or_else(|| {
                    eyre!("Card {full_id} references unknown member id {member_id}")
                })?;
            writeln!(writer, "* {}", member.full_name)?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "#### {TAB}Labels")?;
    if card.labels.is_empty() {
        writeln!(writer, "{TAB}{TAB}[no labels]")?;
    } else {
        for label in &card.labels {
            let name = if label.name.is_empty() {
                "[unnamed label]"
            } else {
                label.name.as_str()
            };
            writeln!(writer, "* {name}")?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "#### {TAB}Comments")?;
    let comments: Vec<&Action> = history
        .iter()
        .filter(|action| action.kind == "commentCard" && targets_card(action, &card.id))
        .collect();
    if comments.is_empty() {
        writeln!(writer, "{TAB}{TAB}[no comments]")?;
    } else {
        for action in comments {
            writeln!(
                writer,
                "##### {TAB}{TAB}{} - *{}*",
                action.member_creator.full_name,
                format_utc(action.date)
            )?;
            writeln!(writer, "```")?;
            writeln!(writer, "{}", action.data.text.as_deref().unwrap_or_default())?;
            writeln!(writer, "```")?;
        }
    }

    writeln!(writer, "#### {TAB}History")?;
    for action in history.iter() {
        if !action.kind.contains("Card") || !targets_card(action, &card.id) {
            continue;
        }
        let description = actions::describe(action)?;
        writeln!(
            writer,
            "##### {TAB}{TAB}{} - *{}*",
            action.member_creator.full_name,
            format_utc(action.date)
        )?;
        writeln!(writer, "{TAB}{TAB}`")?;
        match &description.attachment {
            // The attachment link lands outside the fence; its description
            // line closes the fence itself.
            Some((name, url)) => {
                writeln!(writer, "{}`", description.text)?;
                writeln!(writer, "[{name}]({url})")?;
            }
            None => {
                writeln!(writer, "{}", description.text)?;
                writeln!(writer, "`")?;
            }
        }
    }

    writeln!(
        writer,
        "###### URL: [{}]({})",
        card.short_url, card.short_url
    )?;

    if !card.attachments.is_empty() {
        writeln!(writer, "###### Attachments:")?;
        for attachment in &card.attachments {
            writeln!(writer, "* [{}]({})", attachment.name, attachment.url)?;
        }
    }

    Ok(())
}

fn targets_card(action: &Action, card_id: &str) -> bool {
    action
        .data
        .card
        .as_ref()
        .is_some_and(|card| card.id == card_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ActionData, ActionMember, Attachment, AttachmentRef, CardRef, Label, Member, NameRef,
    };
    use crate::store::ActionStore;

    fn board() -> Board {
        Board {
            id: "b1".to_string(),
            name: "Demo".to_string(),
            short_url: "https://trello.com/b/demo1".to_string(),
            cards: Vec::new(),
            members: vec![Member {
                id: "m1".to_string(),
                full_name: "Ada Lovelace".to_string(),
            }],
            labels: Vec::new(),
        }
    }

    fn card() -> Card {
        Card {
            id: "c7".to_string(),
            id_short: 7,
            name: "Fix bug".to_string(),
            desc: String::new(),
            short_url: "https://trello.com/c/abc7".to_string(),
            date_last_activity: "2024-03-15T10:00:00Z".parse().unwrap(),
            id_members: vec!["m1".to_string()],
            labels: Vec::new(),
            attachments: Vec::new(),
        }
    }

    fn action(kind: &str, date: &str, data: ActionData) -> Action {
        Action {
            id: format!("{kind}-{date}"),
            kind: kind.to_string(),
            date: date.parse().unwrap(),
            member_creator: ActionMember {
                id: "m1".to_string(),
                full_name: "Ada Lovelace".to_string(),
            },
            member: None,
            data,
        }
    }

    fn create_card_action() -> Action {
        action(
            "createCard",
            "2024-03-14T09:30:00Z",
            ActionData {
                card: Some(CardRef {
                    id: "c7".to_string(),
                    name: "Fix bug".to_string(),
                }),
                list: Some(NameRef {
                    name: "To Do".to_string(),
                }),
                ..Default::default()
            },
        )
    }

    fn freeze(actions: Vec<Action>) -> FrozenActions {
        let mut store = ActionStore::new();
        store.append(actions);
        store.freeze()
    }

    fn render_card(board: &Board, card: &Card, history: &FrozenActions) -> String {
        let mut buf = Vec::new();
        write_card_markdown(&mut buf, board, card, history).unwrap();
        String::from_utf8(buf).unwrap()
    }

    const T: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

    #[test]
    fn card_document_matches_expected_layout() {
        let rendered = render_card(&board(), &card(), &freeze(vec![create_card_action()]));
        let expected = format!(
            "# #7\n\
             ### Demo-7\n\
             #### {T}Name\n\
             {T}{T}Fix bug\n\
             #### {T}Members\n\
             * Ada Lovelace\n\
             \n\
             #### {T}Labels\n\
             {T}{T}[no labels]\n\
             \n\
             #### {T}Comments\n\
             {T}{T}[no comments]\n\
             #### {T}History\n\
             ##### {T}{T}Ada Lovelace - *Thu, 14 Mar 2024 09:30:00 GMT*\n\
             {T}{T}`\n\
             Added the card to To Do\n\
             `\n\
             ###### URL: [https://trello.com/c/abc7](https://trello.com/c/abc7)\n"
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn rendering_is_idempotent() {
        let history = freeze(vec![create_card_action()]);
        let first = render_card(&board(), &card(), &history);
        let second = render_card(&board(), &card(), &history);
        assert_eq!(first, second);
    }

    #[test]
    fn description_section_appears_only_when_nonempty() {
        let mut with_desc = card();
        with_desc.desc = "Steps to reproduce".to_string();
        let history = freeze(Vec::new());

        let rendered = render_card(&board(), &with_desc, &history);
        assert!(rendered.contains(&format!("#### {T}Description\n{T}{T}Steps to reproduce\n")));

        let rendered = render_card(&board(), &card(), &history);
        assert!(!rendered.contains("Description"));
    }

    #[test]
    fn empty_name_gets_placeholder() {
        let mut unnamed = card();
        unnamed.name = String::new();
        let rendered = render_card(&board(), &unnamed, &freeze(Vec::new()));
        assert!(rendered.contains(&format!("#### {T}Name\n{T}{T}[no name]\n")));
    }

    #[test]
    fn unnamed_labels_get_placeholder() {
        let mut labeled = card();
        labeled.labels = vec![
            Label {
                name: "urgent".to_string(),
            },
            Label {
                name: String::new(),
            },
        ];
        let rendered = render_card(&board(), &labeled, &freeze(Vec::new()));
        assert!(rendered.contains("* urgent\n* [unnamed label]\n"));
    }

    #[test]
    fn empty_history_still_renders_the_section() {
        let rendered = render_card(&board(), &card(), &freeze(Vec::new()));
        assert!(rendered.contains(&format!("#### {T}History\n###### URL:")));
    }

    #[test]
    fn comment_text_is_fenced_in_comments_but_not_history() {
        let comment = action(
            "commentCard",
            "2024-03-14T11:00:00Z",
            ActionData {
                card: Some(CardRef {
                    id: "c7".to_string(),
                    name: "Fix bug".to_string(),
                }),
                text: Some("LGTM".to_string()),
                ..Default::default()
            },
        );
        let rendered = render_card(&board(), &card(), &freeze(vec![comment]));

        let expected_comment = format!(
            "##### {T}{T}Ada Lovelace - *Thu, 14 Mar 2024 11:00:00 GMT*\n```\nLGTM\n```\n"
        );
        assert!(rendered.contains(&expected_comment), "got:\n{rendered}");

        let history = rendered.split("History").nth(1).unwrap();
        assert!(history.contains("Commented on the card"));
        assert!(!history.contains("LGTM"));
    }

    #[test]
    fn history_excludes_other_cards_and_non_card_actions() {
        let other_card = action(
            "createCard",
            "2024-03-14T08:00:00Z",
            ActionData {
                card: Some(CardRef {
                    id: "c99".to_string(),
                    name: "Other".to_string(),
                }),
                list: Some(NameRef {
                    name: "To Do".to_string(),
                }),
                ..Default::default()
            },
        );
        let board_action = action(
            "updateBoard",
            "2024-03-14T08:30:00Z",
            ActionData {
                card: Some(CardRef {
                    id: "c7".to_string(),
                    name: "Fix bug".to_string(),
                }),
                ..Default::default()
            },
        );
        let rendered = render_card(
            &board(),
            &card(),
            &freeze(vec![other_card, board_action, create_card_action()]),
        );
        let history = rendered.split("History").nth(1).unwrap();
        assert_eq!(history.matches("#####").count(), 1, "got:\n{history}");
    }

    #[test]
    fn attachment_history_entry_leaves_fence_open_for_the_link() {
        let attach = action(
            "addAttachmentToCard",
            "2024-03-14T12:00:00Z",
            ActionData {
                card: Some(CardRef {
                    id: "c7".to_string(),
                    name: "Fix bug".to_string(),
                }),
                attachment: Some(AttachmentRef {
                    name: "design.png".to_string(),
                    url: "https://example.com/design.png".to_string(),
                }),
                ..Default::default()
            },
        );
        let rendered = render_card(&board(), &card(), &freeze(vec![attach]));
        assert!(rendered.contains(
            "Added an attachment to the card:`\n[design.png](https://example.com/design.png)\n"
        ));
    }

    #[test]
    fn card_attachments_render_after_url() {
        let mut with_attachment = card();
        with_attachment.attachments = vec![Attachment {
            name: "log.txt".to_string(),
            url: "https://example.com/log.txt".to_string(),
        }];
        let rendered = render_card(&board(), &with_attachment, &freeze(Vec::new()));
        assert!(rendered.ends_with(
            "###### Attachments:\n* [log.txt](https://example.com/log.txt)\n"
        ));
    }

    #[test]
    fn unknown_member_id_is_a_loud_error() {
        let mut stranger = card();
        stranger.id_members = vec!["ghost".to_string()];
        let mut buf = Vec::new();
        let err = write_card_markdown(&mut buf, &board(), &stranger, &freeze(Vec::new()))
            .unwrap_err()
            .to_string();
        assert!(err.contains("ghost"), "unexpected error: {err}");
    }

    #[test]
    fn table_of_contents_links_each_card() {
        let mut b = board();
        b.cards = vec![card()];
        let cards = surviving_cards(&b, "2024-03-01T00:00:00Z".parse().unwrap());
        let mut buf = Vec::new();
        write_table_of_contents(&mut buf, &b, &cards).unwrap();
        let rendered = String::from_utf8(buf).unwrap();
        assert_eq!(
            rendered,
            "# [Demo](https://trello.com/b/demo1)\n\
             ### [Card #7](Demo-cards/Demo-7.md)\n\
             [Demo-7](Demo-cards/Demo-7.md)\n\
             ###### Fix bug\n\
             *Last Modified: Fri, 15 Mar 2024 10:00:00 GMT*\n\
             ___\n"
        );
    }

    #[test]
    fn surviving_cards_filters_by_cutoff_and_sorts_by_recency() {
        let mut b = board();
        let mut stale = card();
        stale.id = "c1".to_string();
        stale.id_short = 1;
        stale.date_last_activity = "2024-02-01T00:00:00Z".parse().unwrap();
        let mut older = card();
        older.id = "c2".to_string();
        older.id_short = 2;
        older.date_last_activity = "2024-03-10T00:00:00Z".parse().unwrap();
        b.cards = vec![stale, card(), older];

        let cards = surviving_cards(&b, "2024-03-01T00:00:00Z".parse().unwrap());
        let short_ids: Vec<u64> = cards.iter().map(|c| c.id_short).collect();
        assert_eq!(short_ids, vec![7, 2]);
    }
}
