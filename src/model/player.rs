use super::*;
use crate::control::common::tiles_from_tile_table;
use crate::hand::Decomposed;
use crate::util::misc::vec_to_string;

#[derive(Debug, Default, Clone, Serialize)]
pub struct Player {
    pub seat: Seat,             // 座席番号
    pub hand: TileTable,        // 手牌(4x10の配列)
    pub drawn: Option<Tile>,    // ツモ牌
    pub melds: Vec<Meld>,       // 鳴き一覧
    pub riichi: Option<Riichi>, // リーチ宣言の記録
    pub discards: Vec<Discard>, // 捨て牌一覧
    pub discarded: TileTable,   // 捨てた牌の種類(赤5は5として集計) フリテン判定用

    // 聴牌
    pub winning_tiles: Vec<Tile>, // 13枚の手牌に対する和了牌
    pub tenpais: Vec<Tenpai>,     // 14枚の手牌に対する聴牌になる打牌と和了牌
    pub is_furiten_other: bool,   // 他家の捨て牌の見逃しによる同巡内フリテン 自分の打牌で解除
    pub is_furiten_riichi: bool,  // リーチ後の見逃しによるフリテン 局終了まで解除されない

    // 条件役用のフラグ 天和,地和,海底など和了のタイミングで発生する役はここに含まない
    pub is_menzen: bool,        // 門前
    pub is_rinshan: bool,       // 嶺上牌のツモでtrueをセット 打牌でfalseをセット
    pub is_nagashimangan: bool, // 流し満貫の権利 么九牌以外の打牌か捨て牌が鳴かれた場合にfalse
}

impl Player {
    pub fn new(seat: Seat) -> Self {
        Self {
            seat,
            is_menzen: true,
            is_nagashimangan: true,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_riichi(&self) -> bool {
        self.riichi.is_some()
    }

    #[inline]
    pub fn is_ippatsu(&self) -> bool {
        self.riichi.as_ref().map_or(false, |r| r.is_ippatsu)
    }

    pub fn disable_ippatsu(&mut self) {
        if let Some(r) = &mut self.riichi {
            r.is_ippatsu = false;
        }
    }

    // 自分の捨て牌によるフリテンと見逃しによるフリテン
    pub fn is_furiten(&self) -> bool {
        self.is_furiten_other
            || self.is_furiten_riichi
            || self
                .winning_tiles
                .iter()
                .any(|t| self.discarded[t.0][t.1] > 0)
    }

    pub fn hand_tiles(&self) -> Vec<Tile> {
        tiles_from_tile_table(&self.hand)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let drawn = if let Some(d) = self.drawn {
            d.to_string()
        } else {
            "None".to_string()
        };
        let riichi = self.riichi.as_ref().map(|r| r.index);
        writeln!(
            f,
            "seat: {}, riichi: {:?}, drawn: {}, menzen: {}",
            self.seat, riichi, drawn, self.is_menzen,
        )?;
        writeln!(
            f,
            "furiten: {}, furiten_other: {}, rinshan: {}, winning_tiles: {:?}",
            self.is_furiten(),
            self.is_furiten_other,
            self.is_rinshan,
            self.winning_tiles,
        )?;
        writeln!(f, "hand: {}", vec_to_string(&self.hand_tiles()))?;
        writeln!(f, "melds: {}", vec_to_string(&self.melds))?;
        write!(f, "discards: {}", vec_to_string(&self.discards))
    }
}

// [Riichi]
#[derive(Debug, Clone, Serialize)]
pub struct Riichi {
    pub index: Index,            // リーチ宣言牌のdiscardsにおけるindex
    pub is_double: bool,         // ダブルリーチ
    pub is_ippatsu: bool,        // 一発 次の打牌または鳴きでfalseをセット
    pub locked: Vec<Decomposed>, // リーチ時点の聴牌形 (リーチ後の暗槓判定用)
}

// [Discard]
#[derive(Debug, Clone, Serialize)]
pub struct Discard {
    pub step: usize,
    pub id: TileId,
    pub tile: Tile,
    pub drawn: bool,                 // ツモ切りフラグ
    pub meld: Option<(Seat, Index)>, // 鳴きが入った場合にセット
}

impl fmt::Display for Discard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tile)
    }
}

// [Meld]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeldType {
    Chi,
    Pon,
    Minkan,
    Kakan,
    Ankan,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meld {
    pub step: usize,
    pub seat: Seat,
    pub meld_type: MeldType,
    pub tiles: Vec<Tile>,
    pub froms: Vec<Seat>,
}

impl Meld {
    // 暗槓以外
    #[inline]
    pub fn is_open(&self) -> bool {
        self.meld_type != MeldType::Ankan
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let z = self.tiles.iter().zip(self.froms.iter());
        let s: Vec<String> = z.map(|x| format!("{}({})", x.0, x.1)).collect();
        write!(f, "{}", s.join("|"))
    }
}
