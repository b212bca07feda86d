use super::decompose::{BlockType, Decomposed};
use crate::control::common::tiles_from_tile_table;
use crate::error::HandError;
use crate::model::*;

use SetPairType::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetPairType {
    Pair,    // 雀頭
    Shuntsu, // 順子
    Koutsu,  // 刻子 (暗刻)
    Minkou,  // ロン和了で完成した刻子 (符計算では明刻扱い)
    Chi,     // チー
    Pon,     // ポン
    Minkan,  // 明槓 (大明槓 + 加槓)
    Ankan,   // 暗槓
}

// Tileは順子、チーの場合は先頭の牌
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPair(pub SetPairType, pub Tile);

// 待ちの形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitType {
    Ryanmen, // 両面
    Penchan, // 辺張
    Kanchan, // 嵌張
    Shanpon, // 双碰
    Tanki,   // 単騎
}

#[derive(Debug, Clone)]
pub struct ParsedHand {
    pub sets: Vec<SetPair>, // 雀頭と面子 (鳴きを含む)
    pub wait: WaitType,
}

// 鳴きをSetPairに変換したリストを返却
pub fn parse_melds(melds: &[Meld]) -> Result<Vec<SetPair>, HandError> {
    melds
        .iter()
        .map(|m| {
            let n = match m.meld_type {
                MeldType::Chi | MeldType::Pon => 3,
                _ => 4,
            };
            let t = match m.tiles.iter().min() {
                Some(t) if m.tiles.len() == n => t.to_normal(),
                _ => return Err(HandError::InvalidMeld(m.meld_type, m.tiles.clone())),
            };
            Ok(match m.meld_type {
                MeldType::Chi => SetPair(Chi, t),
                MeldType::Pon => SetPair(Pon, t),
                MeldType::Minkan | MeldType::Kakan => SetPair(Minkan, t),
                MeldType::Ankan => SetPair(Ankan, t),
            })
        })
        .collect()
}

// 聴牌形の分解(13枚)に和了牌を加えて面子を完成させる
// 和了牌がこの分解の待ちに含まれない場合はNone
pub fn parse_into_normal_win(d: &Decomposed, winning_tile: Tile, is_drawn: bool) -> Option<ParsedHand> {
    let wt = winning_tile.to_normal();
    let mut sets = vec![];
    let mut pairs = vec![];
    let mut partials = vec![];
    for b in &d.blocks {
        match b.0 {
            BlockType::Koutsu => sets.push(SetPair(Koutsu, b.1)),
            BlockType::Shuntsu => sets.push(SetPair(Shuntsu, b.1)),
            BlockType::Toitsu => pairs.push(b.1),
            _ => partials.push(*b),
        }
    }
    let rest = tiles_from_tile_table(&d.rest);

    let wait = match (partials.len(), pairs.len(), rest.len()) {
        // 4面子+単騎
        (0, 0, 1) if rest[0] == wt => {
            sets.push(SetPair(Pair, wt));
            WaitType::Tanki
        }
        // 3面子+雀頭+搭子
        (1, 1, 0) => {
            let b = partials[0];
            if !b.waiting_tiles().contains(&wt) {
                return None;
            }
            let head = Tile(wt.0, b.1 .1.min(wt.1));
            sets.push(SetPair(Shuntsu, head));
            sets.push(SetPair(Pair, pairs[0]));
            match b.0 {
                BlockType::Ryanmen => WaitType::Ryanmen,
                BlockType::Penchan => WaitType::Penchan,
                _ => WaitType::Kanchan,
            }
        }
        // 3面子+対子2つ
        (0, 2, 0) => {
            let i = pairs.iter().position(|&p| p == wt)?;
            let tp = if is_drawn { Koutsu } else { Minkou };
            sets.push(SetPair(tp, wt));
            sets.push(SetPair(Pair, pairs[1 - i]));
            WaitType::Shanpon
        }
        _ => return None,
    };

    Some(ParsedHand { sets, wait })
}

// 七対子形 (手牌14枚)
pub fn parse_into_chiitoitsu_win(hand: &TileTable) -> Option<ParsedHand> {
    let mut sets = vec![];
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            match hand[ti][ni] {
                0 => {}
                2 => sets.push(SetPair(Pair, Tile(ti, ni))),
                _ => return None,
            }
        }
    }
    if sets.len() != 7 {
        return None;
    }
    Some(ParsedHand {
        sets,
        wait: WaitType::Tanki,
    })
}
