use super::common::*;
use crate::error::HandError;
use crate::hand::*;
use crate::model::*;

// [Turn Action Check]
// プレイヤーのツモ番に可能な操作をチェックする
// 提供されるDiscardの配列は鳴き後に捨てられない牌(喰い替え), Riichiの配列はリーチ宣言可能な牌

pub fn calc_possible_turn_actions(
    stg: &Stage,
    melding: &Option<Action>,
) -> Result<Vec<Action>, HandError> {
    if let Some(act) = melding {
        match act.action_type {
            ActionType::Chi | ActionType::Pon => {
                // チー,ポンのあとは打牌のみ
                let restricted = if stg.rule.kuikae {
                    calc_restricted_discards(act)
                } else {
                    vec![]
                };
                return Ok(vec![Action::new(ActionType::Discard, restricted)]);
            }
            _ => {}
        }
    }

    let pl = &stg.players[stg.turn];
    let mut acts = vec![];
    if pl.drawn.is_some() {
        acts.push(Action::nop());
    }
    if !pl.is_riichi() {
        acts.push(Action::new(ActionType::Discard, vec![]));
    }
    acts.append(&mut check_riichi(stg));

    if stg.wall_count != 0 && stg.n_kan < MAX_KAN {
        acts.append(&mut check_ankan(stg));
        acts.append(&mut check_kakan(stg));
    }
    acts.append(&mut check_tsumo(stg)?);
    acts.append(&mut check_kyushukyuhai(stg));

    Ok(acts)
}

fn check_riichi(stg: &Stage) -> Vec<Action> {
    if stg.wall_count < 4 {
        return vec![];
    }

    let pl = &stg.players[stg.turn];
    if pl.is_riichi() || !pl.is_menzen {
        return vec![];
    }

    let tiles: Vec<Tile> = pl.tenpais.iter().map(|tp| tp.discard_tile).collect();
    if tiles.is_empty() {
        vec![]
    } else {
        vec![Action::new(ActionType::Riichi, tiles)]
    }
}

fn check_tsumo(stg: &Stage) -> Result<Vec<Action>, HandError> {
    Ok(if evaluate_hand_tsumo(stg, stg.turn, &[])?.is_some() {
        vec![Action::tsumo()]
    } else {
        vec![]
    })
}

fn ankan_action(t: Tile, hand: &TileTable) -> Action {
    let t = t.to_normal();
    let mut v = vec![t; 4];
    if t.is_suit() && t.1 == 5 {
        for i in 0..hand[t.0][0].min(4) {
            v[i] = Tile(t.0, 0); // 赤5を含む暗槓
        }
    }
    Action::ankan(v)
}

fn check_ankan(stg: &Stage) -> Vec<Action> {
    let pl = &stg.players[stg.turn];
    let mut acts = vec![];
    if let Some(r) = &pl.riichi {
        // リーチ中は待ちが変わらず, 面子構成も変わらない暗槓のみ可能
        if let Some(t) = pl.drawn {
            let t = t.to_normal();
            if pl.hand[t.0][t.1] != TILE {
                return acts;
            }
            let is_koutsu = r
                .locked
                .iter()
                .all(|d| d.blocks.contains(&Block(BlockType::Koutsu, t)));
            let mut h = pl.hand;
            h[t.0][t.1] = 0;
            if t.1 == 5 {
                h[t.0][0] = 0;
            }
            let waits = calc_winning_tiles(&h, pl.melds.len() + 1);
            if is_koutsu && !r.locked.is_empty() && waits == pl.winning_tiles {
                acts.push(ankan_action(t, &pl.hand));
            }
        }
    } else {
        for ti in 0..TYPE {
            for ni in 1..TNUM {
                if pl.hand[ti][ni] == TILE {
                    acts.push(ankan_action(Tile(ti, ni), &pl.hand));
                }
            }
        }
    }

    acts
}

fn check_kakan(stg: &Stage) -> Vec<Action> {
    let pl = &stg.players[stg.turn];
    if pl.is_riichi() {
        return vec![];
    }

    let mut acts = vec![];
    for m in &pl.melds {
        if m.meld_type == MeldType::Pon {
            let t = m.tiles[0].to_normal();
            if pl.hand[t.0][t.1] != 0 {
                acts.push(if t.is_suit() && t.1 == 5 && pl.hand[t.0][0] > 0 {
                    Action::kakan(Tile(t.0, 0)) // 赤5
                } else {
                    Action::kakan(t)
                });
            }
        }
    }

    acts
}

fn check_kyushukyuhai(stg: &Stage) -> Vec<Action> {
    if !stg.rule.kyushukyuhai || !is_no_meld_turn1(stg, stg.turn) {
        return vec![];
    }

    let pl = &stg.players[stg.turn];
    let mut c = 0;
    for ti in 0..TZ {
        if pl.hand[ti][1] != 0 {
            c += 1;
        }
        if pl.hand[ti][9] != 0 {
            c += 1;
        }
    }
    for ni in WE..=DR {
        if pl.hand[TZ][ni] != 0 {
            c += 1;
        }
    }
    if c < 9 {
        return vec![];
    }

    vec![Action::kyushukyuhai()]
}

// [Call Action Check]
// ツモ番のプレイヤーが打牌(または加槓,暗槓)を行ったあとに,他のプレイヤーが可能な操作をチェックする
// 各プレイヤーの配列の先頭は常にNop

pub fn calc_possible_call_actions(
    stg: &Stage,
    can_meld: bool,
) -> Result<[Vec<Action>; SEAT], HandError> {
    let mut acts_list: [Vec<Action>; SEAT] = Default::default();
    let (turn, source, tile) = match stg.last_tile {
        Some(lt) => lt,
        None => return Ok(acts_list),
    };
    for s in 0..SEAT {
        if s != turn {
            acts_list[s].push(Action::nop());
        }
    }

    // 打牌以外, 牌山なし, 四槓散了(can_meld)の場合は鳴き操作不可
    if source == ActionType::Discard && stg.wall_count != 0 && can_meld {
        // 喰い替えにより打牌できる牌がなくなる鳴きは除外
        let calls = check_chi(stg, turn, tile)
            .into_iter()
            .chain(check_pon(stg, turn, tile))
            .filter(|(s, act)| has_discard_after_call(stg, *s, act));
        for (s, act) in calls {
            acts_list[s].push(act);
        }
        if stg.n_kan < MAX_KAN {
            for (s, act) in check_minkan(stg, turn, tile) {
                acts_list[s].push(act);
            }
        }
    }
    for s in 0..SEAT {
        if s != turn && evaluate_hand_ron(stg, s, tile, source, &[])?.is_some() {
            acts_list[s].push(Action::ron());
        }
    }
    Ok(acts_list)
}

fn check_chi(stg: &Stage, turn: Seat, d: Tile) -> Vec<(Seat, Action)> {
    if d.is_hornor() {
        return vec![];
    }

    let s = next_seat(turn);
    if stg.players[s].is_riichi() {
        return vec![];
    }

    let mut check: Vec<(Tnum, Tnum)> = vec![];
    let Tile(ti, ni) = d.to_normal();

    if 3 <= ni {
        check.push((ni - 2, ni - 1)); // 右端をチー
    }
    if (2..=8).contains(&ni) {
        check.push((ni - 1, ni + 1)); // 嵌張をチー
    }
    if ni <= 7 {
        check.push((ni + 1, ni + 2)); // 左端をチー
    }

    let h = &stg.players[s].hand;
    let mut acts = vec![];
    for (ni0, ni1) in check {
        for t0 in tiles_with_red5(h, Tile(ti, ni0)) {
            for t1 in tiles_with_red5(h, Tile(ti, ni1)) {
                acts.push((s, Action::chi(vec![t0, t1])));
            }
        }
    }

    acts
}

fn check_pon(stg: &Stage, turn: Seat, d: Tile) -> Vec<(Seat, Action)> {
    let t = d.to_normal();
    let mut acts = vec![];
    for s in 0..SEAT {
        let pl = &stg.players[s];
        if pl.hand[t.0][t.1] < 2 || turn == s || pl.is_riichi() {
            continue;
        }

        let t0 = Tile(t.0, 0);
        let pon = Action::pon(vec![t, t]);
        let pon0 = Action::pon(vec![t0, t]); // 手牌の赤5を含むPon
        if t.is_suit() && t.1 == 5 && pl.hand[t.0][0] > 0 {
            // 赤5がある場合
            if pl.hand[t.0][t.1] - pl.hand[t.0][0] >= 2 {
                acts.push((s, pon));
            }
            acts.push((s, pon0));
        } else {
            // 5以外または赤なし
            acts.push((s, pon));
        }
    }
    acts
}

fn check_minkan(stg: &Stage, turn: Seat, d: Tile) -> Vec<(Seat, Action)> {
    let t = d.to_normal();
    let mut acts = vec![];
    for s in 0..SEAT {
        let pl = &stg.players[s];
        if pl.hand[t.0][t.1] != 3 || turn == s || pl.is_riichi() {
            continue;
        }

        let mut v = vec![t; 3];
        if t.is_suit() && t.1 == 5 {
            for i in 0..pl.hand[t.0][0].min(3) {
                v[i] = Tile(t.0, 0);
            }
        }
        acts.push((s, Action::minkan(v)));
    }
    acts
}

// チー,ポンのあとに打牌可能な牌が手牌に残るかどうか
fn has_discard_after_call(stg: &Stage, seat: Seat, act: &Action) -> bool {
    let mut h = stg.players[seat].hand;
    for &t in &act.tiles {
        if count_tile(&h, t) == 0 {
            return false;
        }
        dec_tile(&mut h, t);
    }

    let restricted = if stg.rule.kuikae {
        calc_restricted_discards(act)
    } else {
        vec![]
    };
    tiles_from_tile_table(&h)
        .iter()
        .any(|t| !restricted.contains(t))
}

// 鳴き後の組み換え禁止の牌 (喰い替え)
pub fn calc_restricted_discards(act: &Action) -> Vec<Tile> {
    let mut v = vec![];
    let cs = &act.tiles;
    match act.action_type {
        ActionType::Chi => {
            // 赤5が混じっている可能性を考慮
            let (t0, t1) = (cs[0].to_normal(), cs[1].to_normal());
            let ti = t0.0;
            let s = t0.1.min(t1.1);
            let b = t0.1.max(t1.1);
            if s + 1 == b {
                // 両面・辺張 (鳴いた牌と筋の牌)
                if s > 1 {
                    v.push(Tile(ti, s - 1));
                }
                if b < 9 {
                    v.push(Tile(ti, b + 1));
                }
            } else {
                // 嵌張
                v.push(Tile(ti, s + 1));
            }
        }
        ActionType::Pon => {
            v.push(cs[0].to_normal());
        }
        _ => return vec![],
    }

    // 組み換え禁止の牌のなかに5がある場合, 赤5も追加
    if let Some(t) = v.iter().find(|t| t.is_suit() && t.1 == 5) {
        let red = Tile(t.0, 0);
        v.push(red);
    }

    v
}
