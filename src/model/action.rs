use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    // 提供されるDiscard(打牌)の配列は鳴き後に捨てられない牌の一覧
    // 明示的にツモ切りを行いたい場合Nopを返す Action(Nop, [])
    // 提供されるRiichi(リーチ)の配列はリーチ宣言可能な牌の一覧
    // ツモ切りリーチを行いたい場合は空の配列を返す Action(Riichi, [])
    // DiscardとRiichi以外は提供されたActionの配列から厳密に同じものを返却
    Nop, // Turn: ツモ切り, Call: 鳴き,ロンのスキップ

    // Turn Actions
    Discard,      // 打牌
    Riichi,       // リーチ
    Ankan,        // 暗槓
    Kakan,        // 加槓
    Tsumo,        // ツモ
    Kyushukyuhai, // 九種九牌

    // Call Actions (配列は鳴きにより手牌から消失する牌のリスト)
    Chi,    // チー
    Pon,    // ポン
    Minkan, // 明槓
    Ron,    // ロン
}

// Vec<Tile>は操作により手牌からなくなる牌
// Chi, Ponなどの標的の牌はstage.last_tileを参照する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub action_type: ActionType,
    pub tiles: Vec<Tile>,
}

impl Action {
    #[inline]
    pub fn new(action_type: ActionType, tiles: Vec<Tile>) -> Self {
        Self { action_type, tiles }
    }

    #[inline]
    pub fn nop() -> Self {
        Self::new(ActionType::Nop, vec![])
    }

    #[inline]
    pub fn discard(t: Tile) -> Self {
        Self::new(ActionType::Discard, vec![t])
    }

    #[inline]
    pub fn ankan(mut v: Vec<Tile>) -> Self {
        assert!(v.len() == 4);
        v.sort();
        Self::new(ActionType::Ankan, v)
    }

    #[inline]
    pub fn kakan(t: Tile) -> Self {
        Self::new(ActionType::Kakan, vec![t])
    }

    #[inline]
    pub fn riichi(t: Tile) -> Self {
        Self::new(ActionType::Riichi, vec![t])
    }

    #[inline]
    pub fn riichi_drawn() -> Self {
        Self::new(ActionType::Riichi, vec![])
    }

    #[inline]
    pub fn tsumo() -> Self {
        Self::new(ActionType::Tsumo, vec![])
    }

    #[inline]
    pub fn kyushukyuhai() -> Self {
        Self::new(ActionType::Kyushukyuhai, vec![])
    }

    #[inline]
    pub fn chi(mut v: Vec<Tile>) -> Self {
        assert!(v.len() == 2);
        v.sort();
        Self::new(ActionType::Chi, v)
    }

    #[inline]
    pub fn pon(mut v: Vec<Tile>) -> Self {
        assert!(v.len() == 2);
        v.sort();
        Self::new(ActionType::Pon, v)
    }

    #[inline]
    pub fn minkan(mut v: Vec<Tile>) -> Self {
        assert!(v.len() == 3);
        v.sort();
        Self::new(ActionType::Minkan, v)
    }

    #[inline]
    pub fn ron() -> Self {
        Self::new(ActionType::Ron, vec![])
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.action_type, self.tiles)
    }
}

// 応答待ちのプレイヤーと選択可能なアクション
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingAction {
    pub seat: Seat,
    pub actions: Vec<Action>,
}

// 聴牌になる打牌と和了牌
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenpai {
    pub discard_tile: Tile,
    pub winning_tiles: Vec<Tile>,
}
