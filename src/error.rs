use thiserror::Error;

use crate::model::{Action, MeldType, Seat, Tile};

// 局の進行に関するエラー
// 流局や役無しなどのルール上の結果はエラーではなくRoundResultやEvaluationで通知する
#[derive(Debug, Error)]
pub enum RoundError {
    #[error("illegal action for seat {seat}: {action}")]
    IllegalAction { seat: Seat, action: Action },
    #[error("round already ended")]
    RoundEnded,
    #[error("invalid wall: {0}")]
    InvalidWall(String),
    #[error("invalid setup: {0}")]
    InvalidSetup(String),
    #[error(transparent)]
    Hand(#[from] HandError),
}

// 手牌の評価に関するエラー (呼び出し側の契約違反)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandError {
    #[error("invalid tile count: {tile} x{count}")]
    InvalidTileCount { tile: Tile, count: usize },
    #[error("invalid hand size: {0}")]
    InvalidHandSize(usize),
    #[error("not a winning shape")]
    NotWinningShape,
    #[error("invalid meld: {0:?} {1:?}")]
    InvalidMeld(MeldType, Vec<Tile>),
}
