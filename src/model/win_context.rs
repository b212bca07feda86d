use super::*;

pub type Points = (Point, Point, Point); // (ロンの支払い, ツモ・子の支払い, ツモ・親の支払い)

// 役の種類 (ドラは役ではないが同じ一覧で扱う)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum YakuKind {
    Menzentsumo,
    Riichi,
    Dabururiichi,
    Ippatsu,
    Haiteiraoyue,
    Houteiraoyui,
    Rinshankaihou,
    Chankan,
    Tanyaochuu,
    Pinfu,
    Iipeikou,
    Bakaze,
    Jikaze,
    Haku,
    Hatsu,
    Chun,
    Ryanpeikou,
    Sanshokudoujun,
    Ikkitsuukan,
    Honchantaiyaochuu,
    Chiitoitsu,
    Toitoihou,
    Sanankou,
    Sanshokudoukou,
    Sankantsu,
    Shousangen,
    Honroutou,
    Junchantaiyaochuu,
    Honiisou,
    Chiniisou,
    Tenhou,
    Tiihou,
    Daisangen,
    Suuankou,
    Suuankoutanki,
    Tuuiisou,
    Ryuuiisou,
    Chinroutou,
    Kokushimusou,
    Kokushimusoujuusanmenmachi,
    Shousuushii,
    Daisuushii,
    Suukantsu,
    Chuurenpoutou,
    Junseichuurenpoutou,
    Dora,
    Akadora,
    Uradora,
}

impl YakuKind {
    // ドラ系 (和了の条件にならない)
    pub fn is_bonus(&self) -> bool {
        matches!(self, Self::Dora | Self::Akadora | Self::Uradora)
    }

    pub fn name(&self) -> &'static str {
        use YakuKind::*;
        match self {
            Menzentsumo => "門前清自摸和",
            Riichi => "立直",
            Dabururiichi => "両立直",
            Ippatsu => "一発",
            Haiteiraoyue => "海底摸月",
            Houteiraoyui => "河底撈魚",
            Rinshankaihou => "嶺上開花",
            Chankan => "槍槓",
            Tanyaochuu => "断幺九",
            Pinfu => "平和",
            Iipeikou => "一盃口",
            Bakaze => "場風",
            Jikaze => "自風",
            Haku => "役牌 白",
            Hatsu => "役牌 發",
            Chun => "役牌 中",
            Ryanpeikou => "二盃口",
            Sanshokudoujun => "三色同順",
            Ikkitsuukan => "一気通貫",
            Honchantaiyaochuu => "混全帯幺九",
            Chiitoitsu => "七対子",
            Toitoihou => "対々和",
            Sanankou => "三暗刻",
            Sanshokudoukou => "三色同刻",
            Sankantsu => "三槓子",
            Shousangen => "小三元",
            Honroutou => "混老頭",
            Junchantaiyaochuu => "純全帯幺九",
            Honiisou => "混一色",
            Chiniisou => "清一色",
            Tenhou => "天和",
            Tiihou => "地和",
            Daisangen => "大三元",
            Suuankou => "四暗刻",
            Suuankoutanki => "四暗刻単騎",
            Tuuiisou => "字一色",
            Ryuuiisou => "緑一色",
            Chinroutou => "清老頭",
            Kokushimusou => "国士無双",
            Kokushimusoujuusanmenmachi => "国士無双十三面待ち",
            Shousuushii => "小四喜",
            Daisuushii => "大四喜",
            Suukantsu => "四槓子",
            Chuurenpoutou => "九蓮宝燈",
            Junseichuurenpoutou => "純正九蓮宝燈",
            Dora => "ドラ",
            Akadora => "赤ドラ",
            Uradora => "裏ドラ",
        }
    }
}

impl fmt::Display for YakuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Yaku {
    pub kind: YakuKind,
    pub fan: usize, // 役満の場合は13の倍数
}

// 和了手の評価結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreContext {
    pub yakus: Vec<Yaku>, // 役一覧(ドラを含む)
    pub fu: usize,        // 符数
    pub fan: usize,       // 飜数(ドラを含む), 役満の場合は役満の飜数の合計
    pub yakuman: usize,   // 役満倍率 (0: 通常役, 1: 役満, 2: 二倍役満, ...)
    pub base_point: Point, // 基本点
    pub score: Point,     // 和了得点 (積み棒,供託を除く)
    pub points: Points,   // 支払い得点の内訳
    pub title: String,    // 倍満, 跳満, ...
}

impl ScoreContext {
    pub fn has_yaku(&self, kind: YakuKind) -> bool {
        self.yakus.iter().any(|y| y.kind == kind)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinContext {
    pub seat: Seat,
    pub hand: Vec<Tile>,      // 和了手牌(鳴きは含まない)
    pub winning_tile: Tile,   // 和了牌
    pub melds: Vec<Vec<Tile>>, // 鳴き
    pub is_dealer: bool,
    pub is_drawn: bool,       // ツモ和了
    pub is_riichi: bool,
    pub score_context: ScoreContext,
}
