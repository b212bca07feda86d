use super::decompose::{decompose, BlockType, Decomposed};
use crate::control::common::*;
use crate::model::*;

use BlockType::*;

// 么九牌
const YAOCHU: [Tile; 13] = [
    Tile(TM, 1),
    Tile(TM, 9),
    Tile(TP, 1),
    Tile(TP, 9),
    Tile(TS, 1),
    Tile(TS, 9),
    Tile(TZ, WE),
    Tile(TZ, WS),
    Tile(TZ, WW),
    Tile(TZ, WN),
    Tile(TZ, DW),
    Tile(TZ, DG),
    Tile(TZ, DR),
];

// 分解1つに対する通常形のシャンテン数
// n_meldsは鳴き(暗槓を含む)の数
pub fn calc_shanten_of(d: &Decomposed, n_melds: usize) -> i32 {
    let mut sets = n_melds as i32;
    let mut tatsu = 0;
    let mut toitsu = 0;
    for b in &d.blocks {
        match b.0 {
            Koutsu | Shuntsu => sets += 1,
            Toitsu => {
                tatsu += 1;
                toitsu += 1;
            }
            _ => tatsu += 1,
        }
    }

    // 面子と搭子は合わせて4つまで. 溢れた対子は雀頭として数える
    let (tatsu, has_pair) = if sets + tatsu > 4 {
        (4 - sets, toitsu > 0)
    } else {
        (tatsu, false)
    };
    8 - 2 * sets - tatsu - if has_pair { 1 } else { 0 }
}

// 通常形のシャンテン数と最小のシャンテン数を達成する分解の一覧
pub fn calc_normal_shanten(hand: &TileTable, n_melds: usize) -> (i32, Vec<Decomposed>) {
    let mut min = i32::MAX;
    let mut res = vec![];
    for d in decompose(hand) {
        let s = calc_shanten_of(&d, n_melds);
        if s < min {
            min = s;
            res.clear();
        }
        if s == min {
            res.push(d);
        }
    }
    (min, res)
}

// 聴牌形の分解に対する和了牌
pub fn calc_waits_of(d: &Decomposed) -> Vec<Tile> {
    let partials: Vec<_> = d.blocks.iter().filter(|b| !b.is_set()).collect();
    let rest = tiles_from_tile_table(&d.rest);
    match (partials.len(), rest.len()) {
        (0, 1) => rest, // 単騎
        (2, 0) => {
            let n_toitsu = partials.iter().filter(|b| b.0 == Toitsu).count();
            match n_toitsu {
                2 => vec![partials[0].1, partials[1].1], // 双碰
                1 => {
                    let b = partials.iter().find(|b| b.0 != Toitsu);
                    b.map(|b| b.waiting_tiles()).unwrap_or_default()
                }
                _ => vec![],
            }
        }
        _ => vec![],
    }
}

// 13枚(鳴きがある場合は13-3n枚)の手牌に対する通常形のシャンテン数と,
// 聴牌の場合は和了牌ごとの聴牌形の分解
pub fn calc_normal_tenpai(hand: &TileTable, n_melds: usize) -> (i32, Vec<(Tile, Vec<Decomposed>)>) {
    let hand = normalize_table(hand);
    let (shanten, decs) = calc_normal_shanten(&hand, n_melds);
    if shanten != 0 {
        return (shanten, vec![]);
    }

    let mut waits: Vec<(Tile, Vec<Decomposed>)> = vec![];
    for d in decs {
        for t in calc_waits_of(&d) {
            // 自分で4枚使っている牌は和了牌にならない
            if hand[t.0][t.1] >= TILE {
                continue;
            }
            if let Some(w) = waits.iter_mut().find(|w| w.0 == t) {
                w.1.push(d.clone());
            } else {
                waits.push((t, vec![d.clone()]));
            }
        }
    }
    waits.sort_by_key(|w| w.0);
    (shanten, waits)
}

// 七対子のシャンテン数と聴牌の場合の和了牌
pub fn calc_chiitoitsu_shanten(hand: &TileTable) -> (i32, Vec<Tile>) {
    let mut pairs = 0;
    let mut kinds = 0;
    let mut singles = vec![];
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            let c = hand[ti][ni];
            if c > 0 {
                kinds += 1;
            }
            if c >= 2 {
                pairs += 1;
            }
            if c == 1 {
                singles.push(Tile(ti, ni));
            }
        }
    }

    let shanten = 6 - pairs + (7 - kinds.min(7));
    if shanten == 0 {
        (shanten, singles)
    } else {
        (shanten, vec![])
    }
}

// 国士無双のシャンテン数と聴牌の場合の和了牌
pub fn calc_kokushimusou_shanten(hand: &TileTable) -> (i32, Vec<Tile>) {
    let mut kinds = 0;
    let mut has_pair = false;
    let mut missing = vec![];
    for &t in &YAOCHU {
        let c = hand[t.0][t.1];
        if c > 0 {
            kinds += 1;
        } else {
            missing.push(t);
        }
        if c >= 2 {
            has_pair = true;
        }
    }

    let shanten = 13 - kinds - if has_pair { 1 } else { 0 };
    if shanten != 0 {
        (shanten, vec![])
    } else if has_pair {
        (shanten, missing)
    } else {
        (shanten, YAOCHU.to_vec()) // 十三面待ち
    }
}

// 3つの和了形のシャンテン数の最小値 (七対子と国士無双は鳴きがない場合のみ)
pub fn calc_shanten(hand: &TileTable, n_melds: usize) -> i32 {
    let hand = normalize_table(hand);
    let mut shanten = calc_normal_shanten(&hand, n_melds).0;
    if n_melds == 0 {
        shanten = shanten
            .min(calc_chiitoitsu_shanten(&hand).0)
            .min(calc_kokushimusou_shanten(&hand).0);
    }
    shanten
}

// 13枚の手牌の和了牌 (聴牌していない場合は空)
pub fn calc_winning_tiles(hand: &TileTable, n_melds: usize) -> Vec<Tile> {
    let hand = normalize_table(hand);
    let mut res: Vec<Tile> = calc_normal_tenpai(&hand, n_melds)
        .1
        .into_iter()
        .map(|w| w.0)
        .collect();
    if n_melds == 0 {
        res.extend(calc_chiitoitsu_shanten(&hand).1);
        res.extend(calc_kokushimusou_shanten(&hand).1);
    }
    res.retain(|t| hand[t.0][t.1] < TILE);
    res.sort();
    res.dedup();
    res
}

// 14枚の手牌から1枚切った場合のシャンテン数と和了牌
// 赤5と通常の5の両方がある場合はそれぞれを打牌の候補とする
pub fn calc_shanten_by_discard(hand: &TileTable, n_melds: usize) -> Vec<(Tile, i32, Vec<Tile>)> {
    let mut res = vec![];
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            if hand[ti][ni] == 0 {
                continue;
            }
            let t = Tile(ti, ni);
            let mut h = normalize_table(hand);
            dec_tile(&mut h, t);
            let shanten = calc_shanten(&h, n_melds);
            let waits = if shanten == 0 {
                calc_winning_tiles(&h, n_melds)
            } else {
                vec![]
            };
            for t2 in tiles_with_red5(hand, t) {
                res.push((t2, shanten, waits.clone()));
            }
        }
    }
    res
}

// 14枚の手牌に対する聴牌になる打牌の一覧
pub fn calc_discards_to_tenpai(hand: &TileTable, n_melds: usize) -> Vec<Tenpai> {
    calc_shanten_by_discard(hand, n_melds)
        .into_iter()
        .filter(|(_, shanten, waits)| *shanten == 0 && !waits.is_empty())
        .map(|(discard_tile, _, winning_tiles)| Tenpai {
            discard_tile,
            winning_tiles,
        })
        .collect()
}

// 13枚の手牌のシャンテン数を進める牌(有効牌)の一覧
pub fn calc_effective_tiles(hand: &TileTable, n_melds: usize) -> Vec<Tile> {
    let hand = normalize_table(hand);
    let shanten = calc_shanten(&hand, n_melds);
    let mut res = vec![];
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            let t = Tile(ti, ni);
            if !t.is_valid() || hand[ti][ni] >= TILE {
                continue;
            }
            let mut h = hand;
            inc_tile(&mut h, t);
            if calc_shanten(&h, n_melds) < shanten {
                res.push(t);
            }
        }
    }
    res
}
