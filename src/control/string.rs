use crate::model::*;
use crate::util::misc::{vec_count, Res};

pub fn tile_type_from_char(c: char) -> Res<Type> {
    Ok(match c {
        'm' => TM,
        'p' => TP,
        's' => TS,
        'z' => TZ,
        _ => return Err(format!("invalid tile type char: {}", c).into()),
    })
}

pub fn tile_number_from_char(c: char) -> Res<Tnum> {
    match c.to_digit(10) {
        Some(n) => Ok(n as Tnum),
        None => Err(format!("invalid tile number char: {}", c).into()),
    }
}

// "m123p0s55z77" のような表記の牌の列 (0は赤5)
pub fn tiles_from_string(exp: &str) -> Res<Vec<Tile>> {
    let mut tiles = vec![];
    let mut ti = None;
    for c in exp.chars() {
        match c {
            'm' | 'p' | 's' | 'z' => ti = Some(tile_type_from_char(c)?),
            '0'..='9' => {
                let ti = ti.ok_or("tile number befor tile type")?;
                let t = Tile(ti, tile_number_from_char(c)?);
                if !t.is_valid() {
                    return Err(format!("invalid tile: {}", t).into());
                }
                tiles.push(t);
            }
            ' ' => {}
            _ => return Err(format!("invalid char: '{}'", c).into()),
        }
    }
    Ok(tiles)
}

pub fn tiles_to_string(tiles: &[Tile]) -> String {
    let mut res = String::new();
    let mut prev = None;
    for t in tiles {
        if prev != Some(t.0) {
            res.push(['m', 'p', 's', 'z'][t.0]);
            prev = Some(t.0);
        }
        res.push_str(&t.1.to_string());
    }
    res
}

// "p456", "z777+", "m5550" のような表記の鳴き ('+'の付いた牌は他家から鳴いた牌)
// 4枚で'+'がない場合は暗槓
pub fn meld_from_string(exp: &str) -> Res<Meld> {
    let seat = 0; // 点数計算する上で座席の番号は関係ないので0で固定
    let mut ti = None;
    let mut nis = vec![];

    let mut from = 0;
    let mut tiles = vec![];
    let mut froms = vec![];
    for c in exp.chars() {
        match c {
            'm' | 'p' | 's' | 'z' => ti = Some(tile_type_from_char(c)?),
            '+' => {
                if froms.is_empty() {
                    return Err("invalid '+' suffix".into());
                }
                let last = froms.len() - 1;
                froms[last] = from % (SEAT - 1) + 1;
            }
            '0'..='9' => {
                let ti = ti.ok_or("tile number befor tile type")?;
                from += 1;
                let ni = tile_number_from_char(c)?;
                nis.push(if ni == 0 { 5 } else { ni });
                tiles.push(Tile(ti, ni));
                froms.push(seat);
            }
            _ => return Err(format!("invalid char: '{}'", c).into()),
        }
    }
    if nis.len() < 3 {
        return Err(format!("invalid meld: '{}'", exp).into());
    }

    nis.sort();
    let mut diffs = vec![];
    let mut ni0 = nis[0];
    for ni in &nis[1..] {
        diffs.push(ni - ni0);
        ni0 = *ni;
    }

    let meld_type = if diffs.len() == 2 && vec_count(&diffs, &1) == 2 && tiles[0].is_suit() {
        MeldType::Chi
    } else if diffs.len() == 2 && vec_count(&diffs, &0) == 2 {
        MeldType::Pon
    } else if diffs.len() == 3 && vec_count(&diffs, &0) == 3 {
        if vec_count(&froms, &seat) == 4 {
            MeldType::Ankan
        } else {
            MeldType::Minkan
        }
    } else {
        return Err(format!("invalid meld: '{}'", exp).into());
    };

    Ok(Meld {
        step: 0,
        seat,
        meld_type,
        tiles,
        froms,
    })
}

pub fn wind_from_char(c: char) -> Res<Tnum> {
    Ok(match c {
        'E' => WE,
        'S' => WS,
        'W' => WW,
        'N' => WN,
        _ => return Err(format!("invalid wind symbol: {}", c).into()),
    })
}

#[test]
fn test_tiles_from_string() {
    let tiles = tiles_from_string("m123p0z77").unwrap();
    assert_eq!(tiles.len(), 6);
    assert_eq!(tiles[3], Tile(TP, 0));
    assert_eq!(tiles_to_string(&tiles), "m123p0z77");
    assert!(tiles_from_string("123").is_err());
    assert!(tiles_from_string("z8").is_err());
}

#[test]
fn test_meld_from_string() {
    assert_eq!(meld_from_string("m345+").unwrap().meld_type, MeldType::Chi);
    assert_eq!(meld_from_string("z777+").unwrap().meld_type, MeldType::Pon);
    assert_eq!(meld_from_string("p5550+").unwrap().meld_type, MeldType::Minkan);
    assert_eq!(meld_from_string("s1111").unwrap().meld_type, MeldType::Ankan);
    assert!(meld_from_string("z123+").is_err());
}
