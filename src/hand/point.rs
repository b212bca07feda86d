use crate::model::{Point, Points};

// 100点単位に切り上げ
fn ceil100(n: Point) -> Point {
    (n + 99) / 100 * 100
}

// 基本点
// 役満の場合は役満倍率 x 8000
pub fn calc_base_point(fu: usize, fan: usize, yakuman: usize) -> Point {
    if yakuman != 0 {
        return 8000 * yakuman as Point;
    }

    let base = fu * 2_usize.pow(fan as u32 + 2);
    (if fan <= 4 && base < 2000 {
        base
    } else {
        match fan {
            ..=5 => 2000,   // 満貫
            6..=7 => 3000,  // 跳満
            8..=10 => 4000, // 倍満
            11..=12 => 6000, // 三倍満
            _ => 8000,      // 数え役満
        }
    }) as Point
}

pub fn get_score_title(base_point: Point, yakuman: usize) -> String {
    match yakuman {
        0 => match base_point {
            2000 => "満貫",
            3000 => "跳満",
            4000 => "倍満",
            6000 => "三倍満",
            8000 => "数え役満",
            _ => "",
        },
        1 => "役満",
        2 => "二倍役満",
        3 => "三倍役満",
        4 => "四倍役満",
        5 => "五倍役満",
        6 => "六倍役満",
        _ => "N倍役満",
    }
    .to_string()
}

// (ロンの支払い, ツモ和了の子の支払い, ツモ和了の親の支払い)を返却
// 親の和了の場合, 3番目は0
pub fn calc_points(is_dealer: bool, base_point: Point) -> Points {
    if is_dealer {
        (ceil100(base_point * 6), ceil100(base_point * 2), 0)
    } else {
        (
            ceil100(base_point * 4),
            ceil100(base_point),
            ceil100(base_point * 2),
        )
    }
}
