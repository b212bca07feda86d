use serde::{de, ser};

use super::*;
use crate::control::string::{tile_number_from_char, tile_type_from_char};
use crate::util::misc::Res;

// 牌の値 (物理的な同一性は持たない)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile(pub Type, pub Tnum); // (type index, number index)

impl Tile {
    pub fn from_symbol(s: &str) -> Res<Self> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return Err(format!("invalid tile symbol: {}", s).into());
        }
        let t = Self(tile_type_from_char(chars[0])?, tile_number_from_char(chars[1])?);
        if !t.is_valid() {
            return Err(format!("invalid tile symbol: {}", s).into());
        }
        Ok(t)
    }

    pub fn is_valid(&self) -> bool {
        match self.0 {
            TM | TP | TS => self.1 < TNUM,
            TZ => WE <= self.1 && self.1 <= DR,
            _ => false,
        }
    }

    // 赤5の場合,通常の5を返却. それ以外の場合はコピーをそのまま返却.
    #[inline]
    pub fn to_normal(self) -> Self {
        if self.1 == 0 { Self(self.0, 5) } else { self }
    }

    // 赤5
    #[inline]
    pub fn is_red5(&self) -> bool {
        self.0 != TZ && self.1 == 0
    }

    // 数牌
    #[inline]
    pub fn is_suit(&self) -> bool {
        self.0 != TZ
    }

    // 字牌
    #[inline]
    pub fn is_hornor(&self) -> bool {
        self.0 == TZ
    }

    // 1,9牌
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.0 != TZ && (self.1 == 1 || self.1 == 9)
    }

    // 么九牌
    #[inline]
    pub fn is_end(&self) -> bool {
        self.0 == TZ || self.1 == 1 || self.1 == 9
    }

    // 中張牌
    #[inline]
    pub fn is_simple(&self) -> bool {
        !self.is_end()
    }

    // 風牌
    #[inline]
    pub fn is_wind(&self) -> bool {
        self.0 == TZ && WE <= self.1 && self.1 <= WN
    }

    // 三元牌
    #[inline]
    pub fn is_doragon(&self) -> bool {
        self.0 == TZ && DW <= self.1 && self.1 <= DR
    }

    // ドラ表示牌に対するドラ
    pub fn indicated_dora(self) -> Self {
        let Tile(ti, ni) = self.to_normal();
        if ti == TZ {
            match ni {
                WN => Self(ti, WE),
                DR => Self(ti, DW),
                _ => Self(ti, ni + 1),
            }
        } else {
            if ni == 9 { Self(ti, 1) } else { Self(ti, ni + 1) }
        }
    }

    fn sort_key(&self) -> (Type, usize) {
        // 赤5は4と5の間
        let n = if self.1 == 0 { 9 } else { self.1 * 2 };
        (self.0, n)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ['m', 'p', 's', 'z'][self.0], self.1)
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl PartialOrd for Tile {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tile {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl ser::Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct TileVisitor;

impl<'de> de::Visitor<'de> for TileVisitor {
    type Value = Tile;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("tile symbol")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Tile::from_symbol(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> de::Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(TileVisitor)
    }
}

// [TileTable]
// 各行の0番目は赤5の枚数, 5番目は赤5を含む5の枚数
pub type TileRow = [usize; TNUM];
pub type TileTable = [TileRow; TYPE];

// [TileState]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "t", content = "c")]
pub enum TileState {
    H(Seat),        // Hand
    M(Seat, Index), // Meld
    D(Seat, Index), // Discard
    R,              // doRa indicator
    #[default]
    U, // Unknown (wall)
}

use TileState::*;

impl fmt::Display for TileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            H(s) => write!(f, "H{}", s),
            M(s, _) => write!(f, "M{}", s),
            D(s, _) => write!(f, "D{}", s),
            R => write!(f, "R "),
            U => write!(f, "U "),
        }
    }
}

// [TileInfo]
// 牌山の各牌(TileId)に対応する来歴
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TileInfo {
    pub tile: Tile,
    pub state: TileState,
    pub drawn_by: Option<Seat>, // 自摸(配牌を含む)したプレイヤー
    pub turn: Option<usize>,    // 捨てられた巡目
    pub is_riichi: bool,        // リーチ宣言牌
}

impl TileInfo {
    pub fn new(tile: Tile) -> Self {
        Self {
            tile,
            state: U,
            drawn_by: None,
            turn: None,
            is_riichi: false,
        }
    }
}
