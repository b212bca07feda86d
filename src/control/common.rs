use crate::error::HandError;
use crate::model::*;

#[inline]
pub fn calc_seat_offset(base_seat: Seat, target_seat: Seat) -> Seat {
    (target_seat + SEAT - base_seat) % SEAT
}

#[inline]
pub fn calc_seat_wind(dealer: Seat, seat: Seat) -> Tnum {
    calc_seat_offset(dealer, seat) + 1 // WE | WS | WW | WN
}

// 下家
#[inline]
pub fn next_seat(seat: Seat) -> Seat {
    (seat + 1) % SEAT
}

// 放銃者から見た上家取り(頭ハネ)の優先順 (下家,対面,上家)
pub fn head_bump_order(from_seat: Seat) -> [Seat; SEAT - 1] {
    let mut order = [0; SEAT - 1];
    for i in 0..SEAT - 1 {
        order[i] = (from_seat + i + 1) % SEAT;
    }
    order
}

// Stage用関数
#[inline]
pub fn is_dealer(stg: &Stage, seat: Seat) -> bool {
    seat == stg.dealer
}

#[inline]
pub fn get_seat_wind(stg: &Stage, seat: Seat) -> Tnum {
    calc_seat_wind(stg.dealer, seat)
}

// ダブル立直, 天和, 地和, 九種九牌の判定用
pub fn is_no_meld_turn1(stg: &Stage, seat: Seat) -> bool {
    stg.is_first_go_around
        && stg.players[seat].discards.is_empty()
        && stg.players.iter().all(|pl| pl.melds.is_empty())
}

// TileTable用関数
pub fn count_tile(tt: &TileTable, t: Tile) -> usize {
    if t.1 == 5 {
        tt[t.0][t.1] - tt[t.0][0]
    } else {
        tt[t.0][t.1]
    }
}

pub fn inc_tile(tt: &mut TileTable, tile: Tile) {
    let t = tile;
    tt[t.0][t.1] += 1;
    if t.1 == 0 {
        // 0は赤5のフラグなので本来の5をたてる
        tt[t.0][5] += 1;
    }
}

pub fn dec_tile(tt: &mut TileTable, tile: Tile) {
    let t = tile;
    tt[t.0][t.1] -= 1;
    if t.1 == 0 {
        tt[t.0][5] -= 1;
    }
    // 減らす牌は手牌に含まれることを呼び出し側で確認済み (take_tile, 和了牌の追加後など)
    debug_assert!(tt[t.0][5] >= tt[t.0][0]);
}

// 赤5の情報を除いたテーブル
pub fn normalize_table(tt: &TileTable) -> TileTable {
    let mut res = *tt;
    for row in &mut res {
        row[0] = 0;
    }
    res
}

// 牌の枚数 (赤5は5に含まれるので数えない)
pub fn count_tiles(tt: &TileTable) -> usize {
    tt.iter().map(|row| row[1..].iter().sum::<usize>()).sum()
}

pub fn tiles_from_tile_table(tt: &TileTable) -> Vec<Tile> {
    let mut hand = vec![];
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            for c in 0..tt[ti][ni] {
                if ti != TZ && ni == 5 && c < tt[ti][0] {
                    hand.push(Tile(ti, 0)); // 赤5
                } else {
                    hand.push(Tile(ti, ni));
                }
            }
        }
    }
    hand
}

pub fn tiles_to_tile_table(tiles: &[Tile]) -> TileTable {
    let mut tt = TileTable::default();
    for &t in tiles {
        inc_tile(&mut tt, t);
    }
    tt
}

// 同種牌が5枚以上ある,字牌の範囲外,赤5の数が5の数を超えるといった不正なテーブルの検出
pub fn validate_tile_table(tt: &TileTable) -> Result<(), HandError> {
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            let c = tt[ti][ni];
            let out_of_range = ti == TZ && ni > DR && c != 0;
            if c > TILE || out_of_range {
                return Err(HandError::InvalidTileCount {
                    tile: Tile(ti, ni),
                    count: c,
                });
            }
        }
        if tt[ti][0] > tt[ti][5] || (ti == TZ && tt[ti][0] != 0) {
            return Err(HandError::InvalidTileCount {
                tile: Tile(ti, 0),
                count: tt[ti][0],
            });
        }
    }
    Ok(())
}

// ドラ表示牌のリストを受け取ってドラ評価値のテーブルを返却
pub fn create_dora_table(doras: &[Tile]) -> TileTable {
    let mut dt = TileTable::default();
    for d in doras {
        let Tile(ti, ni) = d.indicated_dora();
        dt[ti][ni] += 1;
    }
    dt
}

// ドラ表示牌によるのドラの数を勘定
pub fn count_dora(hand: &TileTable, melds: &[Meld], doras: &[Tile]) -> usize {
    let dt = create_dora_table(doras);
    let mut n_dora = 0;

    for ti in 0..TYPE {
        for ni in 1..TNUM {
            n_dora += dt[ti][ni] * hand[ti][ni];
        }
    }

    for m in melds {
        for t in &m.tiles {
            let t = t.to_normal();
            n_dora += dt[t.0][t.1];
        }
    }

    n_dora
}

// 赤5の数を勘定
pub fn count_red5(hand: &TileTable, melds: &[Meld]) -> usize {
    let mut n = hand[TM][0] + hand[TP][0] + hand[TS][0];
    for m in melds {
        n += m.tiles.iter().filter(|t| t.is_red5()).count();
    }
    n
}

pub fn tiles_with_red5(tt: &TileTable, t: Tile) -> Vec<Tile> {
    if tt[t.0][t.1] == 0 {
        return vec![];
    }

    let Tile(ti, ni) = t;
    let tr = tt[ti];
    if ni != 5 || ti == TZ {
        return vec![t]; // 5ではない場合
    }
    if tr[0] == 0 {
        return vec![t]; // 通常5しかない場合
    }
    if tr[0] == tr[5] {
        return vec![Tile(ti, 0)]; // 赤5しかない場合
    }
    vec![t, Tile(ti, 0)] // 通常5と赤5の両方がある場合
}

#[test]
fn test_tiletable() {
    use crate::control::string::tiles_from_string;
    let hand = tiles_from_string("p34777s1230567z66").unwrap();
    let tt = tiles_to_tile_table(&hand);
    assert_eq!(count_tiles(&tt), hand.len());
    assert_eq!(tiles_from_tile_table(&tt), hand);
    assert_eq!(count_tile(&tt, Tile(TS, 5)), 1);
    assert_eq!(count_tile(&tt, Tile(TS, 0)), 1);
    assert_eq!(normalize_table(&tt)[TS][0], 0);
    assert!(validate_tile_table(&tt).is_ok());

    let mut bad = tt;
    bad[TP][7] = 5;
    assert!(validate_tile_table(&bad).is_err());
}

#[test]
fn test_seat_order() {
    assert_eq!(next_seat(3), 0);
    assert_eq!(head_bump_order(2), [3, 0, 1]);
    assert_eq!(calc_seat_wind(1, 0), WN);
}
