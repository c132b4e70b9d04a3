//! Board assembly for classic projects.

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::board::{Board, Card, CardKind, Column, Project};
use crate::remote::error::RemoteError;
use crate::remote::rest::{ClassicCard, ClassicColumn, ClassicIssue};

/// Resolves a card's `content_url` to the issue it links.
#[async_trait]
pub trait IssueLookup: Send + Sync {
    /// Fetches the issue behind `content_url`.
    async fn fetch_issue(&self, content_url: &str) -> Result<ClassicIssue, RemoteError>;
}

/// Maps classic columns and cards one to one onto a board.
///
/// Cards linking an issue are enriched with its title, body and state. A
/// failed lookup degrades that one card to its raw note text; it never
/// aborts the rest of the board. Archived cards are skipped.
pub async fn assemble_classic(
    project: Project,
    layout: Vec<(ClassicColumn, Vec<ClassicCard>)>,
    lookup: &dyn IssueLookup,
) -> Board {
    let mut columns = Vec::with_capacity(layout.len());

    for (column, cards) in layout {
        let cards = join_all(
            cards
                .into_iter()
                .filter(|c| !c.archived)
                .map(|card| enrich(card, lookup)),
        )
        .await;

        columns.push(Column {
            id: column.id.to_string(),
            name: column.name,
            field_id: None,
            option_id: None,
            cards,
        });
    }

    debug!(project_id = %project.id, columns = columns.len(), "Assembled classic board");
    Board::new(project, columns)
}

async fn enrich(card: ClassicCard, lookup: &dyn IssueLookup) -> Card {
    let Some(content_url) = card.content_url.clone() else {
        return note_card(card, CardKind::DraftIssue);
    };

    match lookup.fetch_issue(&content_url).await {
        Ok(issue) => Card {
            id: card.id.to_string(),
            kind: issue.kind(),
            title: issue.title,
            body: issue.body.unwrap_or_default(),
            url: Some(issue.html_url),
            state: Some(issue.state),
            created_at: issue.created_at,
            number: Some(issue.number),
        },
        Err(e) => {
            warn!(card_id = card.id, error = %e, "Card enrichment failed, using note text");
            metrics::counter!("trellis_enrichment_failures_total").increment(1);
            note_card(card, CardKind::Issue)
        }
    }
}

fn note_card(card: ClassicCard, kind: CardKind) -> Card {
    let note = card.note.unwrap_or_default();
    let title = note
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map_or_else(|| format!("Card #{}", card.id), str::to_string);

    Card {
        id: card.id.to_string(),
        kind,
        title,
        body: note,
        url: None,
        state: None,
        created_at: card.created_at,
        number: None,
    }
}
