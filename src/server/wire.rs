//! Wire messages.
//!
//! `Request` names one operation and its arguments; `Response` echoes the
//! operation name with either a payload or an error body. Both are plain
//! serde types, so any transport can carry them as JSON or `bincode`.

use serde::{Deserialize, Serialize};

use crate::core::{ErrorCategory, GameId, MatchError, MatchState};
use crate::service::HandView;
use crate::tiles::{Tile, TileId};

/// One client operation.
///
/// ```
/// use mahjong_match::server::Request;
///
/// let request: Request =
///     serde_json::from_str(r#"{"declare_action":{"game_id":"g","seat":2,"kind":"pong"}}"#).unwrap();
/// assert_eq!(request.name(), "declare_action");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Request {
    StartMatch {
        #[serde(default)]
        variant: Option<u8>,
    },
    RollPositions {
        game_id: GameId,
    },
    RollDealer {
        game_id: GameId,
    },
    DealTiles {
        game_id: GameId,
    },
    DrawTile {
        game_id: GameId,
    },
    DiscardTile {
        game_id: GameId,
        seat: u8,
        tile_id: TileId,
    },
    DeclareAction {
        game_id: GameId,
        seat: u8,
        kind: String,
    },
    DeclareWin {
        game_id: GameId,
        seat: u8,
    },
    NextRound {
        game_id: GameId,
    },
    GetState {
        game_id: GameId,
    },
    GetHands {
        game_id: GameId,
    },
    GetDeckCount {
        game_id: GameId,
    },
}

impl Request {
    /// Operation name, echoed in the response.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Request::StartMatch { .. } => "start_match",
            Request::RollPositions { .. } => "roll_positions",
            Request::RollDealer { .. } => "roll_dealer",
            Request::DealTiles { .. } => "deal_tiles",
            Request::DrawTile { .. } => "draw_tile",
            Request::DiscardTile { .. } => "discard_tile",
            Request::DeclareAction { .. } => "declare_action",
            Request::DeclareWin { .. } => "declare_win",
            Request::NextRound { .. } => "next_round",
            Request::GetState { .. } => "get_state",
            Request::GetHands { .. } => "get_hands",
            Request::GetDeckCount { .. } => "get_deck_count",
        }
    }

    /// Target match, absent only for `start_match`.
    #[must_use]
    pub fn game_id(&self) -> Option<&GameId> {
        match self {
            Request::StartMatch { .. } => None,
            Request::RollPositions { game_id }
            | Request::RollDealer { game_id }
            | Request::DealTiles { game_id }
            | Request::DrawTile { game_id }
            | Request::DiscardTile { game_id, .. }
            | Request::DeclareAction { game_id, .. }
            | Request::DeclareWin { game_id, .. }
            | Request::NextRound { game_id }
            | Request::GetState { game_id }
            | Request::GetHands { game_id }
            | Request::GetDeckCount { game_id } => Some(game_id),
        }
    }

    /// Reads are accepted after the match is over.
    #[must_use]
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            Request::GetState { .. } | Request::GetHands { .. } | Request::GetDeckCount { .. }
        )
    }
}

/// Successful result of a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    State(MatchState),
    Dealt {
        state: MatchState,
        hands: Vec<HandView>,
        remaining: usize,
    },
    Drawn {
        state: MatchState,
        tile: Option<Tile>,
        remaining: usize,
    },
    Hands(Vec<HandView>),
    DeckCount(usize),
}

impl Payload {
    /// The state carried by the payload, if any.
    #[must_use]
    pub fn state(&self) -> Option<&MatchState> {
        match self {
            Payload::State(state) | Payload::Dealt { state, .. } | Payload::Drawn { state, .. } => {
                Some(state)
            }
            Payload::Hands(_) | Payload::DeckCount(_) => None,
        }
    }
}

/// Failure reported to the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub category: ErrorCategory,
    pub message: String,
    pub game_id: Option<GameId>,
}

impl From<&MatchError> for ErrorBody {
    fn from(err: &MatchError) -> Self {
        Self {
            category: err.category(),
            message: err.kind.to_string(),
            game_id: err.game_id.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok(Payload),
    Err(ErrorBody),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub action: String,
    pub outcome: Outcome,
}

impl Response {
    #[must_use]
    pub fn ok(action: &str, payload: Payload) -> Self {
        Self {
            action: action.to_string(),
            outcome: Outcome::Ok(payload),
        }
    }

    #[must_use]
    pub fn err(action: &str, err: &MatchError) -> Self {
        Self {
            action: action.to_string(),
            outcome: Outcome::Err(ErrorBody::from(err)),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Ok(_))
    }

    #[must_use]
    pub fn payload(&self) -> Option<&Payload> {
        match &self.outcome {
            Outcome::Ok(payload) => Some(payload),
            Outcome::Err(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&ErrorBody> {
        match &self.outcome {
            Outcome::Ok(_) => None,
            Outcome::Err(body) => Some(body),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_bincode(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }
}
