//! The match engine.
//!
//! A match is a fixed run of [`ROUNDS`] rounds. Each round every player
//! enters the room and cards are drawn one per turn:
//!
//! 1. draw a card and apply it to the room
//! 2. broadcast the turn to every player
//! 3. stop if a trap just sprang (players still inside get nothing)
//! 4. collect `stay`/`leave` from the players inside, defaulting to `leave`
//!    for anyone silent at the turn deadline
//! 5. pay out this turn's leavers
//!
//! The round ends once the room is empty or a trap springs. Any fault ends
//! the whole match; callers still owe [`Game::shutdown`].

use serde::Serialize;
use smallvec::SmallVec;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::room::{ArtifactLedger, Room};
use super::seat::{Move, Seat};
use crate::cards::{Card, Deck, TrapType, ROUNDS};
use crate::core::{GameRng, MatchConfig, PlayerId, PlayerMap};
use crate::error::{GameError, Result};
use crate::proxy::protocol::{self, Status};

/// Where the match is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchPhase {
    NotStarted,
    RoundInProgress { round: u32 },
    MatchComplete,
}

/// Why a round stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEnd {
    /// Every player walked out.
    AllLeft,
    /// A second trap of this kind sprang.
    Trap(TrapType),
}

/// What happened in one round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: u32,
    /// Cards drawn.
    pub turns: u32,
    pub end: RoundEnd,
    /// Wealth gained by each player this round.
    pub payouts: PlayerMap<u32>,
}

/// Final (or current) wealth of every player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standings {
    wealth: PlayerMap<u32>,
}

impl Standings {
    #[must_use]
    pub fn wealth(&self, player: PlayerId) -> u32 {
        self.wealth[player]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, u32)> + '_ {
        self.wealth.iter().map(|(p, w)| (p, *w))
    }

    /// Players sharing the highest wealth.
    #[must_use]
    pub fn leaders(&self) -> Vec<PlayerId> {
        let best = self.wealth.values().copied().max().unwrap_or(0);
        self.iter()
            .filter(|&(_, w)| w == best)
            .map(|(p, _)| p)
            .collect()
    }
}

/// Referee for one match between the given seats.
pub struct Game<S: Seat> {
    seats: PlayerMap<S>,
    wealth: PlayerMap<u32>,
    config: MatchConfig,
    deck: Deck,
    ledger: ArtifactLedger,
    phase: MatchPhase,
    round: u32,
}

impl<S: Seat> Game<S> {
    /// Seat the players in order. Player `i` is `seats[i]`.
    pub fn new(seats: Vec<S>, config: MatchConfig) -> Self {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let seats = PlayerMap::from_vec(seats);
        let wealth = PlayerMap::with_value(seats.player_count(), 0);

        Self {
            seats,
            wealth,
            config,
            deck: Deck::new(rng),
            ledger: ArtifactLedger::new(),
            phase: MatchPhase::NotStarted,
            round: 0,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.player_count()
    }

    #[must_use]
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn ledger(&self) -> &ArtifactLedger {
        &self.ledger
    }

    /// Cumulative wealth of a player.
    #[must_use]
    pub fn wealth(&self, player: PlayerId) -> u32 {
        self.wealth[player]
    }

    #[must_use]
    pub fn seats(&self) -> &PlayerMap<S> {
        &self.seats
    }

    pub fn seats_mut(&mut self) -> &mut PlayerMap<S> {
        &mut self.seats
    }

    #[must_use]
    pub fn standings(&self) -> Standings {
        Standings {
            wealth: self.wealth.clone(),
        }
    }

    /// Run the whole match: handshake, then every round.
    pub async fn play(&mut self) -> Result<Standings> {
        info!(
            players = self.player_count(),
            seed = self.deck.seed(),
            "match started"
        );

        self.handshake().await?;
        while self.round < ROUNDS {
            self.play_round().await?;
        }

        self.phase = MatchPhase::MatchComplete;
        info!("match complete");
        Ok(self.standings())
    }

    /// Send the setup message and require `ready` from everybody within
    /// the load-time budget.
    pub async fn handshake(&mut self) -> Result<()> {
        let shared = self.config.setup_lines(self.player_count());
        for (player, seat) in self.seats.iter_mut() {
            seat.tell(&protocol::setup_lines(&shared, player)).await?;
        }

        let deadline = Instant::now() + self.config.load_time;
        for (_, seat) in self.seats.iter_mut() {
            seat.await_ready(deadline).await?;
        }

        debug!("all players ready");
        Ok(())
    }

    /// Deal a freshly shuffled deck and play one round.
    pub async fn play_round(&mut self) -> Result<RoundSummary> {
        self.deck.start_round();
        self.run_round().await
    }

    /// Play one round drawing exactly `cards`, first card first.
    pub async fn play_round_with(&mut self, cards: Vec<Card>) -> Result<RoundSummary> {
        self.deck.start_round_with(cards);
        self.run_round().await
    }

    async fn run_round(&mut self) -> Result<RoundSummary> {
        self.round += 1;
        let round = self.round;
        self.phase = MatchPhase::RoundInProgress { round };

        let count = self.player_count();
        let mut room = Room::new(count);
        let mut payouts = PlayerMap::with_value(count, 0);
        let mut turn = 0;

        info!(round, cards = self.deck.remaining(), "round started");

        let end = loop {
            if room.is_empty() {
                break RoundEnd::AllLeft;
            }
            turn += 1;

            let card = self
                .deck
                .draw()
                .map_err(|_| GameError::DeckExhausted { round, turn })?;
            let sprung = room.reveal(card);
            debug!(round, turn, %card, "card drawn");

            let statuses: Vec<Status> = self
                .seats
                .player_ids()
                .map(|p| Status::of(room.is_active(p)))
                .collect();
            self.broadcast(&protocol::turn_lines(round, turn, &statuses, card))
                .await?;

            if let Some(trap) = sprung {
                self.deck.remove_trap_copy(trap);
                info!(round, turn, %trap, "trap sprang");
                break RoundEnd::Trap(trap);
            }

            let leaving = self.collect_moves(&room).await?;
            let batch = room.resolve_leaves(&leaving, &mut self.ledger);
            if batch.is_empty() {
                continue;
            }
            if batch.is_sole() {
                self.deck.reset_artifacts();
            }

            let payout = batch.payout();
            for &player in &batch.leavers {
                self.wealth[player] += payout;
                payouts[player] += payout;
            }
            debug!(
                round,
                turn,
                leavers = ?batch.leavers,
                share = batch.share,
                artifacts = batch.artifacts,
                "players left"
            );
        };

        info!(round, turns = turn, end = ?end, "round over");
        Ok(RoundSummary {
            round,
            turns: turn,
            end,
            payouts,
        })
    }

    async fn broadcast(&mut self, lines: &[String]) -> Result<()> {
        for (_, seat) in self.seats.iter_mut() {
            seat.tell(lines).await?;
        }
        Ok(())
    }

    /// Ask everyone inside for a move against one shared deadline.
    ///
    /// Returns the players leaving this turn. Silence counts as leaving.
    async fn collect_moves(&mut self, room: &Room) -> Result<SmallVec<[PlayerId; 8]>> {
        let deadline = Instant::now() + self.config.turn_time;
        let inside: SmallVec<[PlayerId; 8]> = room.active_players().collect();

        let mut leaving = SmallVec::new();
        for player in inside {
            match self.seats[player].poll_move(deadline).await? {
                Some(Move::Stay) => {}
                Some(Move::Leave) => leaving.push(player),
                None => {
                    warn!(%player, "no move before the deadline, leaving");
                    leaving.push(player);
                }
            }
        }
        Ok(leaving)
    }

    /// Shut every seat down. Call on every exit path.
    pub async fn shutdown(&mut self) {
        for (_, seat) in self.seats.iter_mut() {
            seat.shutdown().await;
        }
    }
}
