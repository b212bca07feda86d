use rand::prelude::*;

use super::common::*;
use super::string::tiles_from_string;
use crate::error::RoundError;
use crate::model::*;
use crate::util::misc::Res;

// 牌山の配置 (136枚)
// [0, 122): 配牌(親から13枚ずつ) とツモ山
// [122, 136): 王牌 末尾から嶺上牌4枚, その手前にドラ表示牌と裏ドラ表示牌が交互に並ぶ
pub const LIVE_WALL: usize = TILE_COUNT - DEAD_WALL;

#[inline]
pub fn replacement_pos(k: usize) -> TileId {
    TILE_COUNT - 1 - k
}

#[inline]
pub fn dora_pos(k: usize) -> TileId {
    TILE_COUNT - 6 - 2 * k
}

#[inline]
pub fn ura_dora_pos(k: usize) -> TileId {
    TILE_COUNT - 5 - 2 * k
}

fn full_tile_table(n_red5: usize) -> TileTable {
    let n_red5 = n_red5.min(TILE);
    let mut tt = TileTable::default();
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            if Tile(ti, ni).is_valid() {
                tt[ti][ni] = TILE;
            }
        }
        if ti != TZ {
            tt[ti][0] = n_red5;
        }
    }
    tt
}

pub fn create_wall(seed: u64, n_red5: usize) -> Vec<Tile> {
    let mut wall = tiles_from_tile_table(&full_tile_table(n_red5));
    let mut rng = StdRng::seed_from_u64(seed);
    wall.shuffle(&mut rng);
    wall
}

// 外部から与えられた牌山の検証
pub fn validate_wall(wall: &[Tile], n_red5: usize) -> Result<(), RoundError> {
    if wall.len() != TILE_COUNT {
        return Err(RoundError::InvalidWall(format!(
            "wall size must be {}, but {}",
            TILE_COUNT,
            wall.len()
        )));
    }
    if let Some(t) = wall.iter().find(|t| !t.is_valid()) {
        return Err(RoundError::InvalidWall(format!("invalid tile: {}", t)));
    }

    let tt = tiles_to_tile_table(wall);
    let expected = full_tile_table(n_red5);
    if tt != expected {
        for ti in 0..TYPE {
            for ni in 0..TNUM {
                if tt[ti][ni] != expected[ti][ni] {
                    return Err(RoundError::InvalidWall(format!(
                        "{} x{} (expected {})",
                        Tile(ti, ni),
                        tt[ti][ni],
                        expected[ti][ni]
                    )));
                }
            }
        }
    }
    Ok(())
}

// テスト用に作為的な牌山を生成 指定がない場所はシード値に従ってランダムに生成
#[derive(Debug, Default, Clone)]
pub struct WallTemplate<'a> {
    pub hands: [&'a str; SEAT],   // 配牌 (親から順に最大13枚)
    pub draws: &'a str,           // ツモ山 最初の牌は親の14枚目
    pub doras: &'a str,           // ドラ表示牌 (最大5枚)
    pub ura_doras: &'a str,       // 裏ドラ表示牌 (最大5枚)
    pub replacements: &'a str,    // 嶺上牌 (最大4枚)
}

pub fn create_wall_from_template(seed: u64, n_red5: usize, tmpl: &WallTemplate) -> Res<Vec<Tile>> {
    let mut rest = full_tile_table(n_red5);
    let mut slots: Vec<Option<Tile>> = vec![None; TILE_COUNT];

    let mut place = |exp: &str, pos: &dyn Fn(usize) -> usize, max: usize| -> Res {
        let tiles = tiles_from_string(exp)?;
        if tiles.len() > max {
            return Err(format!("too many tiles: '{}'", exp).into());
        }
        for (i, &t) in tiles.iter().enumerate() {
            let c = if t.1 == 0 { rest[t.0][0] } else { count_tile(&rest, t) };
            if c == 0 {
                return Err(format!("no more tiles for {}", t).into());
            }
            dec_tile(&mut rest, t);
            slots[pos(i)] = Some(t);
        }
        Ok(())
    };

    for (i, h) in tmpl.hands.iter().enumerate() {
        place(h, &|k| HAND * i + k, HAND)?;
    }
    place(tmpl.draws, &|k| HAND * SEAT + k, LIVE_WALL - HAND * SEAT)?;
    place(tmpl.doras, &dora_pos, 5)?;
    place(tmpl.ura_doras, &ura_dora_pos, 5)?;
    place(tmpl.replacements, &replacement_pos, MAX_KAN)?;

    // 余った牌をランダムにシャッフルして空いている場所に配置
    let mut remain = tiles_from_tile_table(&rest);
    let mut rng = StdRng::seed_from_u64(seed);
    remain.shuffle(&mut rng);

    let mut wall = Vec::with_capacity(TILE_COUNT);
    for s in slots {
        match s {
            Some(t) => wall.push(t),
            None => wall.push(remain.pop().ok_or("wall template overflow")?),
        }
    }
    Ok(wall)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_wall() {
        let wall = create_wall(1, 1);
        assert!(validate_wall(&wall, 1).is_ok());
        assert_eq!(wall.iter().filter(|t| t.is_red5()).count(), 3);
        assert_eq!(wall, create_wall(1, 1));
        assert_ne!(wall, create_wall(2, 1));

        assert!(validate_wall(&wall, 0).is_err());
        assert!(validate_wall(&wall[1..], 1).is_err());
    }

    #[test]
    fn test_dead_wall_positions() {
        let mut ids = vec![];
        for k in 0..MAX_KAN {
            ids.push(replacement_pos(k));
        }
        for k in 0..5 {
            ids.push(dora_pos(k));
            ids.push(ura_dora_pos(k));
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), DEAD_WALL);
        assert!(ids.iter().all(|&i| i >= LIVE_WALL && i < TILE_COUNT));
    }

    #[test]
    fn test_wall_template() {
        let tmpl = WallTemplate {
            hands: ["m11112345678999", "", "z1", ""],
            draws: "m5",
            doras: "z4",
            ura_doras: "p0",
            replacements: "s9",
        };
        // 配牌は13枚まで
        assert!(create_wall_from_template(0, 1, &tmpl).is_err());

        let tmpl = WallTemplate {
            hands: ["m1112345678999", "", "z1", ""],
            ..tmpl
        };
        let wall = create_wall_from_template(0, 1, &tmpl).unwrap();
        assert!(validate_wall(&wall, 1).is_ok());
        assert_eq!(wall[0], Tile(TM, 1));
        assert_eq!(wall[12], Tile(TM, 9));
        assert_eq!(wall[HAND * 2], Tile(TZ, 1));
        assert_eq!(wall[HAND * SEAT], Tile(TM, 5));
        assert_eq!(wall[dora_pos(0)], Tile(TZ, 4));
        assert_eq!(wall[ura_dora_pos(0)], Tile(TP, 0));
        assert_eq!(wall[replacement_pos(0)], Tile(TS, 9));

        // 赤5が足りない
        let tmpl = WallTemplate {
            draws: "p00",
            ..Default::default()
        };
        assert!(create_wall_from_template(0, 1, &tmpl).is_err());
    }
}
