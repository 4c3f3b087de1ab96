//! Aggregate root for the Session context.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use marpele_core::aggregate::AggregateRoot;
use marpele_core::clock::Clock;
use marpele_core::error::GameError;
use marpele_core::event::EventMetadata;
use marpele_core::ids::{ContextId, ParticipantId};
use marpele_core::rng::DeterministicRng;
use marpele_rules::domain::board::Board;
use marpele_rules::domain::dice::DieFace;
use marpele_rules::domain::movement::{self, Difficulty};
use marpele_rules::domain::render::Piece;
use marpele_rules::domain::token::Token;
use uuid::Uuid;

use super::events::{
    CapacityChosen, DiceRolled, DifficultyChosen, GameStarted, GameWon, SessionCancelled,
    SessionCreated, SessionEvent, SessionEventKind, TokenChosen,
};
use super::party::{CancelPolicy, Capacity, Phase};

/// One game in one context.
///
/// Every command method validates completely before recording its first
/// event, so a rejected command leaves the session untouched.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Aggregate identifier, fresh per game.
    pub id: Uuid,
    /// The hosting context.
    pub context_id: ContextId,
    /// Who opened the game.
    pub initiator: ParticipantId,
    pub(crate) version: i64,
    pub(crate) phase: Phase,
    pub(crate) capacity: Option<Capacity>,
    pub(crate) difficulty: Option<Difficulty>,
    /// Seated participants; index order is turn order.
    pub(crate) participants: Vec<ParticipantId>,
    pub(crate) positions: HashMap<ParticipantId, u8>,
    pub(crate) tokens: HashMap<ParticipantId, Token>,
    pub(crate) turn_index: usize,
    pub(crate) winner: Option<ParticipantId>,
    pub(crate) last_activity: DateTime<Utc>,
    uncommitted_events: Vec<SessionEvent>,
}

impl GameSession {
    /// Creates an unopened session. Call [`GameSession::open`] next.
    #[must_use]
    pub fn new(id: Uuid, context_id: ContextId, initiator: ParticipantId) -> Self {
        Self {
            id,
            context_id,
            initiator,
            version: 0,
            phase: Phase::Created,
            capacity: None,
            difficulty: None,
            participants: Vec::new(),
            positions: HashMap::new(),
            tokens: HashMap::new(),
            turn_index: 0,
            winner: None,
            last_activity: DateTime::<Utc>::UNIX_EPOCH,
            uncommitted_events: Vec::new(),
        }
    }

    /// Current negotiation phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Chosen party size, once fixed.
    #[must_use]
    pub fn capacity(&self) -> Option<Capacity> {
        self.capacity
    }

    /// Chosen difficulty, once fixed.
    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Seated participants in turn order.
    #[must_use]
    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    /// A participant's cell, if seated.
    #[must_use]
    pub fn position_of(&self, participant: ParticipantId) -> Option<u8> {
        self.positions.get(&participant).copied()
    }

    /// A participant's token, if claimed.
    #[must_use]
    pub fn token_of(&self, participant: ParticipantId) -> Option<Token> {
        self.tokens.get(&participant).copied()
    }

    /// Whose turn it is while the game is active.
    #[must_use]
    pub fn turn_holder(&self) -> Option<ParticipantId> {
        if self.phase == Phase::Active {
            self.participants.get(self.turn_index).copied()
        } else {
            None
        }
    }

    /// The winner, once someone reached the goal.
    #[must_use]
    pub fn winner(&self) -> Option<ParticipantId> {
        self.winner
    }

    /// Timestamp of the most recent event.
    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Offered tokens nobody has claimed yet. Empty until the party size is
    /// known.
    #[must_use]
    pub fn available_tokens(&self) -> Vec<Token> {
        let Some(capacity) = self.capacity else {
            return Vec::new();
        };
        Token::offered(capacity.seats())
            .iter()
            .copied()
            .filter(|token| !self.tokens.values().any(|taken| taken == token))
            .collect()
    }

    /// Pieces of every participant holding a token, in turn order.
    #[must_use]
    pub fn pieces(&self) -> Vec<Piece> {
        self.participants
            .iter()
            .filter_map(|&participant| {
                Some(Piece {
                    participant,
                    token: self.token_of(participant)?,
                    cell: self.position_of(participant).unwrap_or(0),
                })
            })
            .collect()
    }

    /// Returns the next sequence number for a new event.
    fn next_sequence_number(&self) -> i64 {
        self.version + 1
    }

    fn record(&mut self, kind: SessionEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = SessionEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }

    fn require_phase(&self, expected: Phase, action: &'static str) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::InvalidPhase {
                action,
                phase: self.phase.to_string(),
            })
        }
    }

    fn require_participant(&self, actor: ParticipantId) -> Result<(), GameError> {
        if self.participants.contains(&actor) {
            Ok(())
        } else {
            Err(GameError::NotParticipant(actor))
        }
    }

    /// Opens the session with the initiator seated, moving straight to mode
    /// selection.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidPhase` if the session was already opened.
    pub fn open(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), GameError> {
        self.require_phase(Phase::Created, "create_game")?;
        self.record(
            SessionEventKind::SessionCreated(SessionCreated {
                context_id: self.context_id,
                initiator: self.initiator,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Fixes the party size.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidPhase` outside mode selection and
    /// `GameError::NotParticipant` for actors who are not seated.
    pub fn choose_capacity(
        &mut self,
        actor: ParticipantId,
        capacity: Capacity,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), GameError> {
        self.require_phase(Phase::SelectMode, "choose_capacity")?;
        self.require_participant(actor)?;
        self.record(
            SessionEventKind::CapacityChosen(CapacityChosen {
                capacity,
                chosen_by: actor,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Fixes the difficulty.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidPhase` outside level selection and
    /// `GameError::NotParticipant` for actors who are not seated.
    pub fn choose_difficulty(
        &mut self,
        actor: ParticipantId,
        difficulty: Difficulty,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), GameError> {
        self.require_phase(Phase::SelectLevel, "choose_difficulty")?;
        self.require_participant(actor)?;
        self.record(
            SessionEventKind::DifficultyChosen(DifficultyChosen {
                difficulty,
                chosen_by: actor,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Claims `token` for `actor`, seating them if needed. Starts the game
    /// when the last seat is filled.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidPhase` outside token selection,
    /// `GameError::Validation` for a token not offered at this party size,
    /// `GameError::TokenTaken`, `GameError::AlreadySelected`, or
    /// `GameError::SessionFull`.
    pub fn choose_token(
        &mut self,
        actor: ParticipantId,
        token: Token,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), GameError> {
        self.require_phase(Phase::SelectToken, "choose_token")?;
        let capacity = self
            .capacity
            .ok_or_else(|| GameError::Infrastructure("capacity missing in select_token".into()))?;
        let seats = capacity.seats();

        if !Token::offered(seats).contains(&token) {
            return Err(GameError::Validation(format!(
                "token {token} is not offered in a {seats}-player game"
            )));
        }
        if self
            .tokens
            .iter()
            .any(|(owner, taken)| *taken == token && *owner != actor)
        {
            return Err(GameError::TokenTaken(token.to_string()));
        }
        if self.tokens.contains_key(&actor) {
            return Err(GameError::AlreadySelected(actor));
        }
        let seat = match self.participants.iter().position(|p| *p == actor) {
            Some(seat) => seat,
            None if self.participants.len() >= seats => {
                return Err(GameError::SessionFull { capacity: seats });
            }
            None => self.participants.len(),
        };

        self.record(
            SessionEventKind::TokenChosen(TokenChosen {
                participant: actor,
                token,
                seat,
            }),
            correlation_id,
            clock,
        );

        if self.participants.len() == seats && self.tokens.len() == seats {
            self.record(
                SessionEventKind::GameStarted(GameStarted {
                    turn_order: self.participants.clone(),
                }),
                correlation_id,
                clock,
            );
        }
        Ok(())
    }

    /// Rolls the die for the turn holder and moves their piece. A roll that
    /// reaches the goal also records the win.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidPhase` unless the game is active,
    /// `GameError::NotYourTurn` for anyone but the turn holder, and
    /// `GameError::Infrastructure` if the RNG yields an impossible face.
    pub fn roll_dice(
        &mut self,
        actor: ParticipantId,
        board: &Board,
        correlation_id: Uuid,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Result<DiceRolled, GameError> {
        self.require_phase(Phase::Active, "roll_dice")?;
        let expected = self
            .participants
            .get(self.turn_index)
            .copied()
            .ok_or_else(|| GameError::Infrastructure("turn index out of range".into()))?;
        if actor != expected {
            return Err(GameError::NotYourTurn { actor, expected });
        }
        let difficulty = self
            .difficulty
            .ok_or_else(|| GameError::Infrastructure("difficulty missing in active game".into()))?;
        let token = self
            .token_of(actor)
            .ok_or_else(|| GameError::Infrastructure("turn holder has no token".into()))?;

        let raw = rng.next_u32_range(DieFace::MIN, DieFace::MAX);
        let face = DieFace::try_from(raw)
            .map_err(|raw| GameError::Infrastructure(format!("rng produced die face {raw}")))?;
        let current = self.position_of(actor).unwrap_or(0);
        let resolution = movement::resolve(board, current, face, difficulty);
        let won = resolution.is_win(board);

        let next_turn = if won {
            None
        } else {
            self.participants
                .get((self.turn_index + 1) % self.participants.len())
                .copied()
        };

        let rolled = DiceRolled {
            participant: actor,
            face: face.value(),
            from: resolution.from,
            to: resolution.to,
            entry_denied: resolution.entry_denied,
            overshoot: resolution.overshoot,
            jumps: resolution.jumps,
            next_turn,
        };
        self.record(
            SessionEventKind::DiceRolled(rolled.clone()),
            correlation_id,
            clock,
        );

        if won {
            self.record(
                SessionEventKind::GameWon(GameWon {
                    winner: actor,
                    token,
                }),
                correlation_id,
                clock,
            );
        }
        Ok(rolled)
    }

    /// Ends the game early.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidPhase` if the game already ended, and
    /// `GameError::NotInitiator` / `GameError::NotParticipant` when `policy`
    /// does not allow `actor` to cancel.
    pub fn cancel(
        &mut self,
        actor: ParticipantId,
        policy: CancelPolicy,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), GameError> {
        if self.phase == Phase::Terminal {
            return Err(GameError::InvalidPhase {
                action: "cancel_game",
                phase: self.phase.to_string(),
            });
        }
        match policy {
            CancelPolicy::Initiator if actor != self.initiator => {
                return Err(GameError::NotInitiator(actor));
            }
            CancelPolicy::Participant => self.require_participant(actor)?,
            _ => {}
        }
        self.record(
            SessionEventKind::SessionCancelled(SessionCancelled {
                cancelled_by: actor,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }
}

impl AggregateRoot for GameSession {
    type Event = SessionEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            SessionEventKind::SessionCreated(payload) => {
                self.phase = Phase::SelectMode;
                self.participants = vec![payload.initiator];
                self.positions.insert(payload.initiator, 0);
            }
            SessionEventKind::CapacityChosen(payload) => {
                self.phase = Phase::SelectLevel;
                self.capacity = Some(payload.capacity);
            }
            SessionEventKind::DifficultyChosen(payload) => {
                self.phase = Phase::SelectToken;
                self.difficulty = Some(payload.difficulty);
            }
            SessionEventKind::TokenChosen(payload) => {
                if !self.participants.contains(&payload.participant) {
                    self.participants.push(payload.participant);
                }
                self.positions.entry(payload.participant).or_insert(0);
                self.tokens.insert(payload.participant, payload.token);
            }
            SessionEventKind::GameStarted(payload) => {
                self.phase = Phase::Active;
                self.participants.clone_from(&payload.turn_order);
                self.turn_index = 0;
            }
            SessionEventKind::DiceRolled(payload) => {
                self.positions.insert(payload.participant, payload.to);
                if let Some(index) = payload
                    .next_turn
                    .and_then(|next| self.participants.iter().position(|p| *p == next))
                {
                    self.turn_index = index;
                }
            }
            SessionEventKind::GameWon(payload) => {
                self.phase = Phase::Terminal;
                self.winner = Some(payload.winner);
            }
            SessionEventKind::SessionCancelled(_) => {
                self.phase = Phase::Terminal;
            }
        }
        self.last_activity = event.metadata.occurred_at;
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use marpele_core::event::DomainEvent;
    use marpele_test_support::{FixedClock, SequenceRng};

    const ALICE: ParticipantId = ParticipantId(1);
    const BOB: ParticipantId = ParticipantId(2);
    const CAROL: ParticipantId = ParticipantId(3);
    const DAVE: ParticipantId = ParticipantId(4);

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn opened() -> GameSession {
        let mut session = GameSession::new(Uuid::new_v4(), ContextId(-100), ALICE);
        session.open(Uuid::new_v4(), &fixed_clock()).unwrap();
        session
    }

    fn in_token_selection(capacity: Capacity, difficulty: Difficulty) -> GameSession {
        let clock = fixed_clock();
        let mut session = opened();
        session
            .choose_capacity(ALICE, capacity, Uuid::new_v4(), &clock)
            .unwrap();
        session
            .choose_difficulty(ALICE, difficulty, Uuid::new_v4(), &clock)
            .unwrap();
        session
    }

    fn active_pair(difficulty: Difficulty) -> GameSession {
        let clock = fixed_clock();
        let mut session = in_token_selection(Capacity::Two, difficulty);
        session
            .choose_token(ALICE, Token::Butterfly, Uuid::new_v4(), &clock)
            .unwrap();
        session
            .choose_token(BOB, Token::Octopus, Uuid::new_v4(), &clock)
            .unwrap();
        session
    }

    fn roll(session: &mut GameSession, actor: ParticipantId, face: u32) -> Result<DiceRolled, GameError> {
        let mut rng = SequenceRng::new(vec![face]);
        session.roll_dice(
            actor,
            &Board::standard(),
            Uuid::new_v4(),
            &fixed_clock(),
            &mut rng,
        )
    }

    // --- open ---

    #[test]
    fn test_open_seats_initiator_and_moves_to_select_mode() {
        let session = opened();

        assert_eq!(session.phase(), Phase::SelectMode);
        assert_eq!(session.participants(), &[ALICE]);
        assert_eq!(session.position_of(ALICE), Some(0));
        assert_eq!(session.token_of(ALICE), None);
        assert_eq!(session.version(), 1);

        let events = session.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "session.created");
        assert_eq!(events[0].metadata().sequence_number, 1);
        assert_eq!(events[0].metadata().occurred_at, fixed_clock().0);
    }

    #[test]
    fn test_open_twice_returns_invalid_phase() {
        let mut session = opened();
        let result = session.open(Uuid::new_v4(), &fixed_clock());
        assert!(matches!(result, Err(GameError::InvalidPhase { .. })));
        assert_eq!(session.version(), 1);
    }

    // --- mode / level ---

    #[test]
    fn test_choose_capacity_moves_to_select_level() {
        let mut session = opened();
        session
            .choose_capacity(ALICE, Capacity::Four, Uuid::new_v4(), &fixed_clock())
            .unwrap();
        assert_eq!(session.phase(), Phase::SelectLevel);
        assert_eq!(session.capacity(), Some(Capacity::Four));
    }

    #[test]
    fn test_choose_capacity_from_outsider_is_rejected() {
        let mut session = opened();
        let result = session.choose_capacity(BOB, Capacity::Two, Uuid::new_v4(), &fixed_clock());
        match result.unwrap_err() {
            GameError::NotParticipant(actor) => assert_eq!(actor, BOB),
            other => panic!("expected NotParticipant, got {other:?}"),
        }
        assert_eq!(session.phase(), Phase::SelectMode);
    }

    #[test]
    fn test_choose_difficulty_before_capacity_is_invalid_phase() {
        let mut session = opened();
        let result =
            session.choose_difficulty(ALICE, Difficulty::Easy, Uuid::new_v4(), &fixed_clock());
        match result.unwrap_err() {
            GameError::InvalidPhase { action, phase } => {
                assert_eq!(action, "choose_difficulty");
                assert_eq!(phase, "select_mode");
            }
            other => panic!("expected InvalidPhase, got {other:?}"),
        }
    }

    #[test]
    fn test_choose_difficulty_moves_to_select_token() {
        let session = in_token_selection(Capacity::Two, Difficulty::Hard);
        assert_eq!(session.phase(), Phase::SelectToken);
        assert_eq!(session.difficulty(), Some(Difficulty::Hard));
        assert_eq!(
            session.available_tokens(),
            vec![Token::Butterfly, Token::Octopus]
        );
    }

    // --- tokens ---

    #[test]
    fn test_same_token_from_second_actor_is_taken() {
        let clock = fixed_clock();
        let mut session = in_token_selection(Capacity::Four, Difficulty::Easy);
        session
            .choose_token(BOB, Token::Frog, Uuid::new_v4(), &clock)
            .unwrap();
        let version = session.version();

        let result = session.choose_token(CAROL, Token::Frog, Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(GameError::TokenTaken(_))));
        assert_eq!(session.version(), version);
        assert!(!session.participants().contains(&CAROL));
    }

    #[test]
    fn test_second_token_for_same_actor_is_already_selected() {
        let clock = fixed_clock();
        let mut session = in_token_selection(Capacity::Four, Difficulty::Easy);
        session
            .choose_token(ALICE, Token::Frog, Uuid::new_v4(), &clock)
            .unwrap();

        let result = session.choose_token(ALICE, Token::Mushroom, Uuid::new_v4(), &clock);

        match result.unwrap_err() {
            GameError::AlreadySelected(actor) => assert_eq!(actor, ALICE),
            other => panic!("expected AlreadySelected, got {other:?}"),
        }
    }

    #[test]
    fn test_token_outside_party_size_is_not_offered() {
        let mut session = in_token_selection(Capacity::Two, Difficulty::Easy);
        let result = session.choose_token(BOB, Token::Mushroom, Uuid::new_v4(), &fixed_clock());
        assert!(matches!(result, Err(GameError::Validation(_))));
    }

    #[test]
    fn test_outsider_cannot_take_reserved_initiator_seat() {
        let clock = fixed_clock();
        let mut session = in_token_selection(Capacity::Two, Difficulty::Easy);
        session
            .choose_token(BOB, Token::Octopus, Uuid::new_v4(), &clock)
            .unwrap();

        let result = session.choose_token(CAROL, Token::Butterfly, Uuid::new_v4(), &clock);

        match result.unwrap_err() {
            GameError::SessionFull { capacity } => assert_eq!(capacity, 2),
            other => panic!("expected SessionFull, got {other:?}"),
        }
        assert_eq!(session.phase(), Phase::SelectToken);
    }

    #[test]
    fn test_last_seat_starts_game_and_earlier_seats_do_not() {
        let clock = fixed_clock();
        let mut session = in_token_selection(Capacity::Four, Difficulty::Easy);
        for (actor, token) in [(BOB, Token::Octopus), (ALICE, Token::Butterfly), (CAROL, Token::Frog)] {
            session
                .choose_token(actor, token, Uuid::new_v4(), &clock)
                .unwrap();
            assert_eq!(session.phase(), Phase::SelectToken);
        }

        session
            .choose_token(DAVE, Token::Mushroom, Uuid::new_v4(), &clock)
            .unwrap();

        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.participants(), &[ALICE, BOB, CAROL, DAVE]);
        assert_eq!(session.turn_holder(), Some(ALICE));
        let last = session.uncommitted_events().last().unwrap();
        assert_eq!(last.event_type(), "session.game_started");
    }

    #[test]
    fn test_token_choice_in_active_game_is_invalid_phase() {
        let mut session = active_pair(Difficulty::Easy);
        let result = session.choose_token(CAROL, Token::Frog, Uuid::new_v4(), &fixed_clock());
        assert!(matches!(result, Err(GameError::InvalidPhase { .. })));
    }

    // --- rolling ---

    #[test]
    fn test_roll_out_of_turn_changes_nothing() {
        let mut session = active_pair(Difficulty::Easy);
        let version = session.version();

        let result = roll(&mut session, BOB, 4);

        match result.unwrap_err() {
            GameError::NotYourTurn { actor, expected } => {
                assert_eq!(actor, BOB);
                assert_eq!(expected, ALICE);
            }
            other => panic!("expected NotYourTurn, got {other:?}"),
        }
        assert_eq!(session.version(), version);
        assert_eq!(session.position_of(BOB), Some(0));
    }

    #[test]
    fn test_roll_moves_piece_and_passes_turn() {
        let mut session = active_pair(Difficulty::Easy);

        let rolled = roll(&mut session, ALICE, 4).unwrap();

        assert_eq!(rolled.to, 4);
        assert_eq!(rolled.next_turn, Some(BOB));
        assert_eq!(session.position_of(ALICE), Some(4));
        assert_eq!(session.turn_holder(), Some(BOB));
    }

    #[test]
    fn test_turn_order_wraps_around() {
        let mut session = active_pair(Difficulty::Easy);
        roll(&mut session, ALICE, 1).unwrap();
        roll(&mut session, BOB, 1).unwrap();
        assert_eq!(session.turn_holder(), Some(ALICE));
        assert!(roll(&mut session, BOB, 1).is_err());
    }

    #[test]
    fn test_hard_mode_scenario_denial_then_entry() {
        let mut session = active_pair(Difficulty::Hard);

        let first = roll(&mut session, ALICE, 3).unwrap();
        assert!(first.entry_denied);
        assert_eq!(session.position_of(ALICE), Some(0));
        assert_eq!(session.turn_holder(), Some(BOB));

        let second = roll(&mut session, BOB, 6).unwrap();
        assert!(!second.entry_denied);
        assert_eq!(session.position_of(BOB), Some(1));
        assert_eq!(session.turn_holder(), Some(ALICE));
    }

    #[test]
    fn test_winning_roll_ends_game() {
        let mut session = active_pair(Difficulty::Easy);
        session.positions.insert(ALICE, 97);

        let rolled = roll(&mut session, ALICE, 3).unwrap();

        assert_eq!(rolled.to, 100);
        assert_eq!(rolled.next_turn, None);
        assert_eq!(session.phase(), Phase::Terminal);
        assert_eq!(session.winner(), Some(ALICE));
        assert_eq!(session.turn_holder(), None);
        let kinds: Vec<&str> = session
            .uncommitted_events()
            .iter()
            .rev()
            .take(2)
            .map(DomainEvent::event_type)
            .collect();
        assert_eq!(kinds, vec!["session.game_won", "session.dice_rolled"]);
    }

    #[test]
    fn test_rng_out_of_range_is_infrastructure_error() {
        let mut session = active_pair(Difficulty::Easy);
        let version = session.version();
        let result = roll(&mut session, ALICE, 9);
        assert!(matches!(result, Err(GameError::Infrastructure(_))));
        assert_eq!(session.version(), version);
    }

    // --- cancel ---

    #[test]
    fn test_cancel_by_participant_terminates() {
        let mut session = active_pair(Difficulty::Easy);
        session
            .cancel(BOB, CancelPolicy::Participant, Uuid::new_v4(), &fixed_clock())
            .unwrap();
        assert_eq!(session.phase(), Phase::Terminal);
    }

    #[test]
    fn test_cancel_policy_initiator_rejects_others() {
        let mut session = active_pair(Difficulty::Easy);
        let result = session.cancel(BOB, CancelPolicy::Initiator, Uuid::new_v4(), &fixed_clock());
        assert!(matches!(result, Err(GameError::NotInitiator(_))));
        assert_eq!(session.phase(), Phase::Active);
    }

    #[test]
    fn test_cancel_policy_participant_rejects_outsiders() {
        let mut session = opened();
        let result =
            session.cancel(CAROL, CancelPolicy::Participant, Uuid::new_v4(), &fixed_clock());
        assert!(matches!(result, Err(GameError::NotParticipant(_))));
    }

    #[test]
    fn test_cancel_policy_anyone_accepts_outsiders_in_any_phase() {
        let mut session = opened();
        session
            .cancel(CAROL, CancelPolicy::Anyone, Uuid::new_v4(), &fixed_clock())
            .unwrap();
        assert_eq!(session.phase(), Phase::Terminal);
    }

    #[test]
    fn test_pieces_only_include_token_holders() {
        let clock = fixed_clock();
        let mut session = in_token_selection(Capacity::Two, Difficulty::Easy);
        session
            .choose_token(BOB, Token::Octopus, Uuid::new_v4(), &clock)
            .unwrap();

        let pieces = session.pieces();

        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].participant, BOB);
        assert_eq!(pieces[0].token, Token::Octopus);
        assert_eq!(pieces[0].cell, 0);
    }
}
