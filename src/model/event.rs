use super::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    New(EventNew),         // 局開始
    Deal(EventDeal),       // ツモ
    Discard(EventDiscard), // 打牌
    Meld(EventMeld),       // 鳴き
    Dora(EventDora),       // 新ドラ
    Win(EventWin),         // 局終了 (和了)
    Draw(EventDraw),       // 局終了 (流局)
}

impl Event {
    #[inline]
    pub fn new(
        prevalent_wind: Tnum,
        dealer: Seat,
        doras: Vec<Tile>,
        hands: [Vec<Tile>; SEAT],
        wall_count: usize,
    ) -> Self {
        Self::New(EventNew {
            prevalent_wind,
            dealer,
            doras,
            hands,
            wall_count,
        })
    }

    #[inline]
    pub fn deal(seat: Seat, tile: Tile, is_replacement: bool) -> Self {
        Self::Deal(EventDeal {
            seat,
            tile,
            is_replacement,
        })
    }

    #[inline]
    pub fn discard(seat: Seat, tile: Tile, is_drawn: bool, is_riichi: bool) -> Self {
        Self::Discard(EventDiscard {
            seat,
            tile,
            is_drawn,
            is_riichi,
        })
    }

    #[inline]
    pub fn meld(seat: Seat, meld_type: MeldType, consumed: Vec<Tile>) -> Self {
        Self::Meld(EventMeld {
            seat,
            meld_type,
            consumed,
        })
    }

    #[inline]
    pub fn dora(tile: Tile) -> Self {
        Self::Dora(EventDora { tile })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventNew {
    pub prevalent_wind: Tnum,     // 場風
    pub dealer: Seat,             // 親
    pub doras: Vec<Tile>,         // ドラ表示牌
    pub hands: [Vec<Tile>; SEAT], // 各プレイヤーの配牌(13枚) 親の14枚目はDealで通知
    pub wall_count: usize,        // 牌山残り枚数
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDeal {
    pub seat: Seat,
    pub tile: Tile,           // ツモ牌
    pub is_replacement: bool, // 嶺上牌
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDiscard {
    pub seat: Seat,
    pub tile: Tile,
    pub is_drawn: bool,  // ツモ切り
    pub is_riichi: bool, // リーチ宣言
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMeld {
    pub seat: Seat,
    pub meld_type: MeldType, // 鳴き種別
    pub consumed: Vec<Tile>, // 手牌から消費される牌
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDora {
    pub tile: Tile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventWin {
    // 支払いの計算は局の外側で行う. ここには和了者ごとの評価のみを含める
    pub contexts: Vec<WinContext>, // 上家取り(頭ハネ)の順
    pub loser: Option<Seat>,       // 放銃者 (ツモの場合はNone)
    pub doras: Vec<Tile>,          // ドラ表示牌
    pub ura_doras: Vec<Tile>,      // 裏ドラ表示牌
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraw {
    pub draw_type: DrawType,
    pub hands: [Vec<Tile>; SEAT],      // 聴牌していたプレイヤーの手牌 (ノーテンは空の配列)
    pub tenpais: [bool; SEAT],         // 聴牌者
    pub nagashimangans: [bool; SEAT],  // 流し満貫の達成者
    pub delta_scores: [Point; SEAT],   // 聴牌,流し満貫による点数変動
}

// [RoundResult]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoundResult {
    Win(EventWin),
    Draw(EventDraw),
}

impl RoundResult {
    pub fn to_event(&self) -> Event {
        match self {
            Self::Win(e) => Event::Win(e.clone()),
            Self::Draw(e) => Event::Draw(e.clone()),
        }
    }
}

// [DrawType]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawType {
    Kyushukyuhai,   // 九種九牌
    Suufuurenda,    // 四風連打
    Suukansanra,    // 四槓散了
    Suuchariichi,   // 四家立直
    Sanchaho,       // 三家和
    Kouhaiheikyoku, // 荒廃平局
}

impl fmt::Display for DrawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DrawType::Kyushukyuhai => "九種九牌",
                DrawType::Suufuurenda => "四風連打",
                DrawType::Suukansanra => "四槓散了",
                DrawType::Suuchariichi => "四家立直",
                DrawType::Sanchaho => "三家和",
                DrawType::Kouhaiheikyoku => "荒廃平局",
            }
        )
    }
}
