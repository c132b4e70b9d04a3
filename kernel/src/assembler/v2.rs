//! Board assembly for V2 projects.

use chrono::Utc;
use tracing::{debug, info};

use crate::board::{Board, Card, Column, Project, ProjectItem};
use crate::discovery::{discover_status_field, DiscoveryKeywords, StatusField};
use crate::remote::graphql::V2Snapshot;

/// Discovers the status field of a V2 snapshot and builds its board.
///
/// When discovery finds nothing the board has zero columns; that is an
/// empty state, not an error.
#[must_use]
pub fn assemble_v2(snapshot: V2Snapshot, keywords: &DiscoveryKeywords) -> Board {
    let V2Snapshot {
        project,
        fields,
        items,
    } = snapshot;

    match discover_status_field(&fields, &items, keywords) {
        Ok(status) => build_v2_board(project, &status, &items),
        Err(e) => {
            info!(project_id = %project.id, reason = %e, "Rendering board without columns");
            Board::empty(project)
        }
    }
}

/// Builds one column per status value, in first-seen order, and places each
/// item carrying a value of the status field into its column.
///
/// Items without a value for the status field are left off the board.
#[must_use]
pub fn build_v2_board(project: Project, status: &StatusField, items: &[ProjectItem]) -> Board {
    let mut columns: Vec<Column> = status
        .values
        .iter()
        .map(|v| Column::for_value(&status.field_id, &v.name, v.option_id.clone()))
        .collect();

    let mut dropped = 0usize;
    for (position, item) in items.iter().enumerate() {
        let column = item
            .field_values
            .iter()
            .find(|v| v.field_name == status.field_name)
            .and_then(|v| columns.iter_mut().find(|c| c.id == v.value));

        match column {
            Some(column) => column.cards.push(card_from_item(item, position)),
            None => dropped += 1,
        }
    }

    debug!(
        project_id = %project.id,
        columns = columns.len(),
        dropped,
        "Assembled V2 board"
    );
    Board::new(project, columns)
}

/// Synthesizes a card from a V2 item.
///
/// A missing title becomes `Item #<number>`, using the content number or the
/// item's 1-based position; a missing creation time becomes now.
#[must_use]
pub fn card_from_item(item: &ProjectItem, position: usize) -> Card {
    let content = &item.content;
    let title = content.title.clone().unwrap_or_else(|| {
        let number = content
            .number
            .map_or_else(|| (position + 1).to_string(), |n| n.to_string());
        format!("Item #{number}")
    });

    Card {
        id: item.id.clone(),
        kind: content.kind,
        title,
        body: content.body.clone().unwrap_or_default(),
        url: content.url.clone(),
        state: content.state.clone(),
        created_at: content.created_at.unwrap_or_else(Utc::now),
        number: content.number,
    }
}
