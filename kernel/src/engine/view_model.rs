//! The versioned board view model.
//!
//! Owns the current selection and board for one presentation session. Every
//! asynchronous completion is checked against the generation (bumped on
//! selection changes) and the revision (bumped whenever the board is
//! replaced) it was issued under, and is discarded when either has moved on.
//!
//! At most one move is in flight per selection. A drag that ends while an
//! earlier move still awaits the remote is refused, so the board can only be
//! replaced under a pending move by a fetch, which already reflects the
//! server.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::board::{Board, Project, ProjectRef};
use crate::engine::drag::{DragEnd, DragError};
use crate::engine::notice::{Notice, NoticeSlot};
use crate::engine::transaction::{DragPhase, MoveTransaction};
use crate::remote::{BoardService, CreateIssueRequest, Issue, RemoteError};

/// Result of a drag handed to [`BoardViewModel::move_card`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Dropped on its origin or outside any column; nothing happened.
    Ignored,
    /// The drag did not resolve on the current board; nothing changed.
    Aborted(DragError),
    /// The remote accepted the move.
    Confirmed,
    /// The remote rejected the move; the pre-move board is back.
    RolledBack(RemoteError),
    /// The remote rejected the move after a fetch had replaced the board, or
    /// after the selection changed; the failure was discarded.
    Stale,
}

impl MoveOutcome {
    /// Short label used in metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::Aborted(_) => "aborted",
            Self::Confirmed => "confirmed",
            Self::RolledBack(_) => "rolled_back",
            Self::Stale => "stale",
        }
    }
}

#[derive(Debug, Default)]
struct ViewState {
    generation: u64,
    revision: u64,
    projects: Vec<Project>,
    selected: Option<ProjectRef>,
    board: Option<Arc<Board>>,
    phase: DragPhase,
    moves_started: u64,
    in_flight: Option<u64>,
}

impl ViewState {
    fn replace_board(&mut self, board: Option<Arc<Board>>) {
        self.board = board;
        self.revision += 1;
    }
}

/// Board state for one presentation session.
pub struct BoardViewModel {
    service: Arc<dyn BoardService>,
    state: RwLock<ViewState>,
    notice: NoticeSlot,
}

impl BoardViewModel {
    /// Creates a view model whose notices expire after `notice_ttl`.
    pub fn new(service: Arc<dyn BoardService>, notice_ttl: Duration) -> Self {
        Self {
            service,
            state: RwLock::new(ViewState::default()),
            notice: NoticeSlot::new(notice_ttl),
        }
    }

    /// Projects from the last listing.
    #[must_use]
    pub fn projects(&self) -> Vec<Project> {
        self.state.read().projects.clone()
    }

    /// The selected project, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ProjectRef> {
        self.state.read().selected.clone()
    }

    /// The current board snapshot.
    #[must_use]
    pub fn board(&self) -> Option<Arc<Board>> {
        self.state.read().board.clone()
    }

    /// Selection generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Phase of the most recent drag.
    #[must_use]
    pub fn drag_phase(&self) -> DragPhase {
        self.state.read().phase
    }

    /// The error notice currently shown.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        self.notice.current()
    }

    /// Dismisses the current notice.
    pub fn dismiss_notice(&self) {
        self.notice.dismiss();
    }

    /// Fetches and stores the project list. Never fails; an empty list is
    /// the empty state.
    pub async fn load_projects(&self) -> Vec<Project> {
        let projects = self.service.list_projects().await;
        self.state.write().projects.clone_from(&projects);
        projects
    }

    /// Selects a project and loads its board.
    ///
    /// The previous board is discarded immediately and any result still in
    /// flight for it is ignored.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the board cannot be fetched.
    pub async fn select_project(
        &self,
        project: ProjectRef,
    ) -> Result<Option<Arc<Board>>, RemoteError> {
        {
            let mut state = self.state.write();
            state.generation += 1;
            state.selected = Some(project);
            state.phase = DragPhase::Idle;
            state.in_flight = None;
            state.replace_board(None);
        }
        self.refresh().await
    }

    /// Drops the selection and its board.
    pub fn clear_selection(&self) {
        let mut state = self.state.write();
        state.generation += 1;
        state.selected = None;
        state.phase = DragPhase::Idle;
        state.in_flight = None;
        state.replace_board(None);
    }

    /// Re-fetches the selected project's board.
    ///
    /// Returns `Ok(None)` when nothing is selected or when the selection
    /// changed while the fetch was in flight.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the board cannot be fetched for the
    /// still-current selection.
    pub async fn refresh(&self) -> Result<Option<Arc<Board>>, RemoteError> {
        let (generation, project) = {
            let state = self.state.read();
            match &state.selected {
                Some(project) => (state.generation, project.clone()),
                None => return Ok(None),
            }
        };

        let fetched = self.service.get_board(&project).await;

        let mut state = self.state.write();
        if state.generation != generation {
            debug!(project_id = %project.id, "Discarding board for a superseded selection");
            return Ok(None);
        }
        match fetched {
            Ok(board) => {
                debug!(
                    project_id = %project.id,
                    columns = board.columns.len(),
                    cards = board.card_count(),
                    "Board loaded"
                );
                let board = Arc::new(board);
                state.replace_board(Some(Arc::clone(&board)));
                Ok(Some(board))
            }
            Err(e) => {
                drop(state);
                warn!(project_id = %project.id, error = %e, "Failed to load board");
                self.notice.raise(format!("Failed to load board: {e}"));
                Err(e)
            }
        }
    }

    /// Applies a drag optimistically, then asks the remote to make it
    /// durable, rolling back to the exact pre-move board on failure.
    pub async fn move_card(&self, drag: DragEnd) -> MoveOutcome {
        let outcome = self.run_move(drag).await;
        metrics::counter!("trellis_moves_total", "outcome" => outcome.as_str()).increment(1);
        outcome
    }

    async fn run_move(&self, drag: DragEnd) -> MoveOutcome {
        if drag.is_noop() {
            return MoveOutcome::Ignored;
        }

        let (mut tx, generation, revision, move_id) = {
            let mut state = self.state.write();
            let Some(board) = state.board.clone() else {
                warn!(card_id = %drag.card_id, "Drag with no board loaded");
                return MoveOutcome::Aborted(DragError::NoBoard);
            };
            if state.in_flight.is_some() {
                warn!(card_id = %drag.card_id, "Drag while another move is pending");
                return MoveOutcome::Aborted(DragError::MoveInFlight);
            }
            let tx = match MoveTransaction::begin(board, &drag) {
                Ok(tx) => tx,
                Err(e) => {
                    warn!(card_id = %drag.card_id, error = %e, "Ignoring unresolvable drag");
                    return MoveOutcome::Aborted(e);
                }
            };
            state.replace_board(Some(Arc::clone(tx.optimistic())));
            state.phase = tx.phase();
            state.moves_started += 1;
            let move_id = state.moves_started;
            state.in_flight = Some(move_id);
            (tx, state.generation, state.revision, move_id)
        };

        let result = self.service.move_card(tx.request().clone()).await;

        let mut state = self.state.write();
        if state.in_flight == Some(move_id) {
            state.in_flight = None;
        }
        let current = state.generation == generation && state.revision == revision;
        match result {
            Ok(moved) => {
                tx.confirm();
                if current {
                    state.phase = tx.phase();
                }
                info!(card_id = %moved.card_id, column_id = %moved.column_id, "Move confirmed");
                MoveOutcome::Confirmed
            }
            Err(e) if current => {
                let restored = tx.roll_back();
                state.replace_board(Some(restored));
                state.phase = tx.phase();
                drop(state);
                warn!(card_id = %drag.card_id, error = %e, "Move rejected, rolled back");
                self.notice.raise(format!("Failed to move card: {e}"));
                MoveOutcome::RolledBack(e)
            }
            Err(e) => {
                drop(state);
                warn!(
                    card_id = %drag.card_id,
                    error = %e,
                    "Move rejected after the board was replaced, discarding"
                );
                MoveOutcome::Stale
            }
        }
    }

    /// Opens an issue, surfacing a notice on failure.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the issue cannot be created.
    pub async fn create_issue(&self, request: CreateIssueRequest) -> Result<Issue, RemoteError> {
        match self.service.create_issue(request).await {
            Ok(issue) => Ok(issue),
            Err(e) => {
                warn!(error = %e, "Failed to create issue");
                self.notice.raise(format!("Failed to create issue: {e}"));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Card, Column};
    use crate::engine::drag::Slot;
    use crate::remote::{MoveCardRequest, MovedCard};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::sync::Notify;

    const TTL: Duration = Duration::from_secs(3);

    struct FakeService {
        board: Mutex<Board>,
        fail_moves: bool,
        gate: Option<Arc<Notify>>,
        moves: Mutex<Vec<MoveCardRequest>>,
    }

    impl FakeService {
        fn new(board: Board, fail_moves: bool) -> Self {
            Self {
                board: Mutex::new(board),
                fail_moves,
                gate: None,
                moves: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl BoardService for FakeService {
        async fn list_projects(&self) -> Vec<Project> {
            vec![self.board.lock().project.clone()]
        }

        async fn get_board(&self, _project: &ProjectRef) -> Result<Board, RemoteError> {
            Ok(self.board.lock().clone())
        }

        async fn move_card(&self, request: MoveCardRequest) -> Result<MovedCard, RemoteError> {
            self.moves.lock().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail_moves {
                return Err(RemoteError::Upstream {
                    status: 502,
                    body: "bad gateway".to_string(),
                });
            }
            Ok(MovedCard {
                card_id: request.card_id,
                column_id: request.column_id,
            })
        }

        async fn create_issue(&self, _request: CreateIssueRequest) -> Result<Issue, RemoteError> {
            Err(RemoteError::Unauthorized("bad credentials".to_string()))
        }
    }

    fn kanban() -> Board {
        let project = Project {
            id: "42".to_string(),
            title: "Sprint".to_string(),
            numeric_id: 42,
            is_v2: false,
        };
        let mut todo = Column::new("To Do", "To Do");
        todo.cards.push(Card::draft("C1", "Card one"));
        let mut doing = Column::new("Doing", "Doing");
        doing.cards.push(Card::draft("C2", "Card two"));
        let done = Column::new("Done", "Done");
        Board::new(project, vec![todo, doing, done])
    }

    fn ids(board: &Board, column: &str) -> Vec<String> {
        board
            .column(column)
            .map(|c| c.cards.iter().map(|card| card.id.clone()).collect())
            .unwrap_or_default()
    }

    fn drag_c1_to_doing() -> DragEnd {
        DragEnd::new("C1", Slot::new("To Do", 0), Slot::new("Doing", 0))
    }

    async fn loaded(service: FakeService) -> (Arc<FakeService>, BoardViewModel) {
        let service = Arc::new(service);
        let vm = BoardViewModel::new(service.clone(), TTL);
        vm.select_project(ProjectRef::new("42", false)).await.unwrap();
        (service, vm)
    }

    #[tokio::test]
    async fn successful_move_keeps_optimistic_board() {
        let (service, vm) = loaded(FakeService::new(kanban(), false)).await;

        let outcome = vm.move_card(drag_c1_to_doing()).await;

        assert_eq!(outcome, MoveOutcome::Confirmed);
        let board = vm.board().unwrap();
        assert!(ids(&board, "To Do").is_empty());
        assert_eq!(ids(&board, "Doing"), vec!["C1", "C2"]);
        assert_eq!(vm.drag_phase(), DragPhase::Confirmed);

        let sent = service.moves.lock();
        assert_eq!(sent[0].column_id, "Doing");
        assert_eq!(sent[0].position, crate::remote::CardPosition::Top);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_move_restores_snapshot_and_notice_clears() {
        let (_service, vm) = loaded(FakeService::new(kanban(), true)).await;
        let before = vm.board().unwrap();

        let outcome = vm.move_card(drag_c1_to_doing()).await;

        assert!(matches!(outcome, MoveOutcome::RolledBack(_)));
        let after = vm.board().unwrap();
        assert_eq!(*after, *before);
        assert_eq!(ids(&after, "To Do"), vec!["C1"]);
        assert_eq!(ids(&after, "Doing"), vec!["C2"]);
        assert_eq!(vm.drag_phase(), DragPhase::RolledBack);
        assert!(vm.notice().is_some());

        tokio::time::sleep(TTL + Duration::from_millis(10)).await;
        tokio::task::yield_now().await;
        assert!(vm.notice().is_none());
    }

    #[tokio::test]
    async fn board_is_updated_before_remote_answers() {
        let gate = Arc::new(Notify::new());
        let mut service = FakeService::new(kanban(), false);
        service.gate = Some(Arc::clone(&gate));
        let (_service, vm) = loaded(service).await;
        let vm = Arc::new(vm);

        let pending = tokio::spawn({
            let vm = Arc::clone(&vm);
            async move { vm.move_card(drag_c1_to_doing()).await }
        });
        while vm.drag_phase() != DragPhase::OptimisticApplied {
            tokio::task::yield_now().await;
        }

        assert_eq!(ids(&vm.board().unwrap(), "Doing"), vec!["C1", "C2"]);

        gate.notify_one();
        assert_eq!(pending.await.unwrap(), MoveOutcome::Confirmed);
    }

    #[tokio::test]
    async fn failure_after_refresh_is_stale() {
        let gate = Arc::new(Notify::new());
        let mut service = FakeService::new(kanban(), true);
        service.gate = Some(Arc::clone(&gate));
        let (_service, vm) = loaded(service).await;
        let vm = Arc::new(vm);

        let pending = tokio::spawn({
            let vm = Arc::clone(&vm);
            async move { vm.move_card(drag_c1_to_doing()).await }
        });
        while vm.drag_phase() != DragPhase::OptimisticApplied {
            tokio::task::yield_now().await;
        }
        let refreshed = vm.refresh().await.unwrap().unwrap();

        gate.notify_one();
        assert_eq!(pending.await.unwrap(), MoveOutcome::Stale);
        assert!(Arc::ptr_eq(&vm.board().unwrap(), &refreshed));
        assert!(vm.notice().is_none());
    }

    #[tokio::test]
    async fn second_drag_waits_for_pending_move_and_rejection_still_rolls_back() {
        let gate = Arc::new(Notify::new());
        let mut service = FakeService::new(kanban(), true);
        service.gate = Some(Arc::clone(&gate));
        let (service, vm) = loaded(service).await;
        let vm = Arc::new(vm);
        let before = vm.board().unwrap();

        let first = tokio::spawn({
            let vm = Arc::clone(&vm);
            async move { vm.move_card(drag_c1_to_doing()).await }
        });
        while vm.drag_phase() != DragPhase::OptimisticApplied {
            tokio::task::yield_now().await;
        }

        let second = DragEnd::new("C2", Slot::new("Doing", 1), Slot::new("Done", 0));
        assert_eq!(
            vm.move_card(second).await,
            MoveOutcome::Aborted(DragError::MoveInFlight)
        );
        assert_eq!(service.moves.lock().len(), 1);

        gate.notify_one();
        assert!(matches!(first.await.unwrap(), MoveOutcome::RolledBack(_)));
        let board = vm.board().unwrap();
        assert_eq!(*board, *before);
        assert!(ids(&board, "Done").is_empty());
        assert_eq!(ids(&board, "Doing"), vec!["C2"]);
        assert!(vm.notice().is_some());

        let retry = DragEnd::new("C2", Slot::new("Doing", 0), Slot::new("Done", 0));
        gate.notify_one();
        assert!(matches!(vm.move_card(retry).await, MoveOutcome::RolledBack(_)));
        assert_eq!(service.moves.lock().len(), 2);
    }

    #[tokio::test]
    async fn reselecting_releases_a_pending_move() {
        let gate = Arc::new(Notify::new());
        let mut service = FakeService::new(kanban(), false);
        service.gate = Some(Arc::clone(&gate));
        let (service, vm) = loaded(service).await;
        let vm = Arc::new(vm);

        let pending = tokio::spawn({
            let vm = Arc::clone(&vm);
            async move { vm.move_card(drag_c1_to_doing()).await }
        });
        while vm.drag_phase() != DragPhase::OptimisticApplied {
            tokio::task::yield_now().await;
        }
        vm.select_project(ProjectRef::new("42", false)).await.unwrap();

        let next = tokio::spawn({
            let vm = Arc::clone(&vm);
            async move { vm.move_card(drag_c1_to_doing()).await }
        });
        while service.moves.lock().len() < 2 {
            tokio::task::yield_now().await;
        }

        gate.notify_waiters();
        assert_eq!(next.await.unwrap(), MoveOutcome::Confirmed);
        assert_eq!(pending.await.unwrap(), MoveOutcome::Confirmed);
        assert_eq!(ids(&vm.board().unwrap(), "Doing"), vec!["C1", "C2"]);
    }

    #[tokio::test]
    async fn unresolvable_drag_is_aborted_without_change() {
        let (service, vm) = loaded(FakeService::new(kanban(), false)).await;
        let before = vm.board().unwrap();

        let drag = DragEnd::new("C1", Slot::new("To Do", 0), Slot::new("Archive", 0));
        let outcome = vm.move_card(drag).await;

        assert_eq!(
            outcome,
            MoveOutcome::Aborted(DragError::UnknownColumn("Archive".to_string()))
        );
        assert!(Arc::ptr_eq(&vm.board().unwrap(), &before));
        assert!(service.moves.lock().is_empty());
    }

    #[tokio::test]
    async fn drop_on_origin_is_ignored() {
        let (service, vm) = loaded(FakeService::new(kanban(), false)).await;

        let drag = DragEnd::new("C1", Slot::new("To Do", 0), Slot::new("To Do", 0));

        assert_eq!(vm.move_card(drag).await, MoveOutcome::Ignored);
        assert!(service.moves.lock().is_empty());
    }

    #[tokio::test]
    async fn selection_changes_bump_generation_and_clear_board() {
        let (_service, vm) = loaded(FakeService::new(kanban(), false)).await;
        let generation = vm.generation();

        vm.clear_selection();

        assert_eq!(vm.generation(), generation + 1);
        assert!(vm.board().is_none());
        assert!(vm.selected().is_none());
        assert_eq!(vm.refresh().await, Ok(None));
    }

    #[tokio::test]
    async fn failed_issue_creation_raises_notice() {
        let vm = BoardViewModel::new(Arc::new(FakeService::new(kanban(), false)), TTL);

        let result = vm.create_issue(CreateIssueRequest::new("T", "B")).await;

        assert!(matches!(result, Err(RemoteError::Unauthorized(_))));
        assert!(vm
            .notice()
            .is_some_and(|n| n.message.starts_with("Failed to create issue")));
        vm.dismiss_notice();
        assert!(vm.notice().is_none());
    }

    #[tokio::test]
    async fn load_projects_stores_listing() {
        let vm = BoardViewModel::new(Arc::new(FakeService::new(kanban(), false)), TTL);

        let projects = vm.load_projects().await;

        assert_eq!(projects.len(), 1);
        assert_eq!(vm.projects(), projects);
    }
}
