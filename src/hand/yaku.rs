use std::fmt;

use super::parse::{ParsedHand, SetPair, SetPairType, WaitType};
use crate::model::*;

use SetPairType::*;

// 和了形の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinShape {
    Normal,       // 4面子1雀頭
    Chiitoitsu,   // 七対子
    Kokushimusou, // 国士無双
}

#[derive(Debug)]
pub struct YakuContext {
    hand: TileTable,       // 手牌14枚(鳴きは含まない) 九蓮宝燈, 国士無双の判定に使用
    shape: WinShape,
    sets: Vec<SetPair>,    // 鳴きを含むすべての面子と雀頭
    wait: WaitType,
    pair_tile: Option<Tile>,
    winning_tile: Tile,
    is_drawn: bool,
    is_open: bool,
    prevalent_wind: Tnum,  // 場風 (東: 1, 南: 2, 西: 3, 北: 4)
    seat_wind: Tnum,       // 自風 (同上)
    yaku_flags: YakuFlags, // 組み合わせ以外による役
    counts: Counts,
    iipeikou_count: usize,
    yakuhai_check: TileRow, // 字牌の刻子のカウント(雀頭は含まない)
}

impl YakuContext {
    pub fn new(
        hand: TileTable,
        shape: WinShape,
        parsed_hand: ParsedHand,
        winning_tile: Tile,
        prevalent_wind: Tnum,
        seat_wind: Tnum,
        is_drawn: bool,
        yaku_flags: YakuFlags,
    ) -> Self {
        let ParsedHand { sets, wait } = parsed_hand;
        let pair_tile = if shape == WinShape::Normal {
            sets.iter().find(|s| s.0 == Pair).map(|s| s.1)
        } else {
            None
        };
        let counts = count_type(&sets);
        let iipeikou_count = count_iipeikou(&sets);
        let yakuhai_check = check_yakuhai(&sets);
        let is_open = counts.chi + counts.pon + counts.minkan != 0;

        Self {
            hand,
            shape,
            sets,
            wait,
            pair_tile,
            winning_tile: winning_tile.to_normal(),
            is_drawn,
            is_open,
            prevalent_wind,
            seat_wind,
            yaku_flags,
            counts,
            iipeikou_count,
            yakuhai_check,
        }
    }

    // (役一覧, 飜数, 役満倍率)を返却
    // 役満が含まれている場合は役満のみを返却し, 飜数は役満の飜数の合計
    pub fn calc_yaku(&self, rule: &Rule) -> (Vec<Yaku>, usize, usize) {
        let mut yakus = vec![];
        for y in YAKU_LIST {
            if !(y.func)(self) {
                continue;
            }
            let mut fan = if self.is_open { y.fan_open } else { y.fan_close };
            if y.kind == YakuKind::Tanyaochuu && self.is_open && !rule.kuitan {
                fan = 0;
            }
            if fan == 0 {
                continue;
            }
            if fan > 13 && !rule.double_yakuman {
                fan = 13;
            }
            yakus.push(Yaku { kind: y.kind, fan });
        }

        let yakuman: Vec<Yaku> = yakus.iter().filter(|y| y.fan >= 13).copied().collect();
        if !yakuman.is_empty() {
            let fan: usize = yakuman.iter().map(|y| y.fan).sum();
            (yakuman, fan, fan / 13)
        } else {
            let fan = yakus.iter().map(|y| y.fan).sum();
            (yakus, fan, 0)
        }
    }

    pub fn calc_fu(&self) -> usize {
        match self.shape {
            WinShape::Chiitoitsu | WinShape::Kokushimusou => return 25,
            WinShape::Normal => {}
        }
        if is_pinfu(self) {
            return if self.is_drawn { 20 } else { 30 };
        }

        // 副底
        let mut fu = 20;

        // 和了り方
        fu += if self.is_drawn {
            2
        } else if !self.is_open {
            10
        } else {
            0
        };

        // 面子, 雀頭
        for SetPair(tp, t) in &self.sets {
            let end = t.is_end();
            fu += match tp {
                Pair => {
                    let mut n = 0;
                    if t.is_doragon() {
                        n += 2;
                    }
                    if t.is_wind() && t.1 == self.prevalent_wind {
                        n += 2;
                    }
                    if t.is_wind() && t.1 == self.seat_wind {
                        n += 2;
                    }
                    n
                }
                Koutsu => if end { 8 } else { 4 },
                Minkou | Pon => if end { 4 } else { 2 },
                Minkan => if end { 16 } else { 8 },
                Ankan => if end { 32 } else { 16 },
                Shuntsu | Chi => 0,
            };
        }

        // 待ちの形
        fu += match self.wait {
            WaitType::Kanchan | WaitType::Penchan | WaitType::Tanki => 2,
            WaitType::Ryanmen | WaitType::Shanpon => 0,
        };

        let fu = (fu + 9) / 10 * 10; // 1の位は切り上げ
        if fu == 20 {
            30 // 鳴きの平和形ロン
        } else {
            fu
        }
    }
}

#[derive(Debug, Default)]
struct Counts {
    pair: usize,
    shuntsu: usize,
    koutsu: usize,
    minkou: usize,
    chi: usize,
    pon: usize,
    minkan: usize,
    ankan: usize,
    shuntsu_total: usize, // shuntsu + chi
    koutsu_total: usize,  // koutsu + minkou + pon + minkan + ankan
    ankou_total: usize,   // koutsu + ankan
    kantsu_total: usize,  // minkan + ankan
    tis: [usize; TYPE],   // 牌種別ごとの面子数
}

// 特殊条件の役 外部から設定を行う
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct YakuFlags {
    pub menzentsumo: bool,
    pub riichi: bool,
    pub dabururiichi: bool,
    pub ippatsu: bool,
    pub haiteiraoyue: bool,
    pub houteiraoyui: bool,
    pub rinshankaihou: bool,
    pub chankan: bool,
    pub tenhou: bool,
    pub tiihou: bool,
}

fn count_type(sets: &[SetPair]) -> Counts {
    let mut cnt = Counts::default();
    for SetPair(tp, t) in sets {
        match tp {
            Pair => cnt.pair += 1,
            Shuntsu => cnt.shuntsu += 1,
            Koutsu => cnt.koutsu += 1,
            Minkou => cnt.minkou += 1,
            Chi => cnt.chi += 1,
            Pon => cnt.pon += 1,
            Minkan => cnt.minkan += 1,
            Ankan => cnt.ankan += 1,
        }
        cnt.tis[t.0] += 1;
    }
    cnt.shuntsu_total = cnt.shuntsu + cnt.chi;
    cnt.koutsu_total = cnt.koutsu + cnt.minkou + cnt.pon + cnt.minkan + cnt.ankan;
    cnt.ankou_total = cnt.koutsu + cnt.ankan;
    cnt.kantsu_total = cnt.minkan + cnt.ankan;
    cnt
}

// 同じ順子2組で1とカウント (4組なら2)
fn count_iipeikou(sets: &[SetPair]) -> usize {
    let mut shuntsu = TileTable::default();
    for SetPair(tp, t) in sets {
        if *tp == Shuntsu {
            shuntsu[t.0][t.1] += 1;
        }
    }
    shuntsu.iter().flat_map(|r| r.iter()).map(|&n| n / 2).sum()
}

fn check_yakuhai(sets: &[SetPair]) -> TileRow {
    let mut tr = TileRow::default();
    for SetPair(tp, t) in sets {
        if is_koutsu_type(*tp) && t.is_hornor() {
            tr[t.1] += 1;
        }
    }
    tr
}

fn is_koutsu_type(tp: SetPairType) -> bool {
    matches!(tp, Koutsu | Minkou | Pon | Minkan | Ankan)
}

fn is_shuntsu_type(tp: SetPairType) -> bool {
    matches!(tp, Shuntsu | Chi)
}

struct YakuDefine {
    kind: YakuKind,
    func: fn(&YakuContext) -> bool,
    fan_close: usize, // 鳴きなしの飜
    fan_open: usize,  // 鳴きありの飜(食い下がり) 0の場合は門前限定
}

impl fmt::Debug for YakuDefine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.kind, self.fan_close, self.fan_open)
    }
}

macro_rules! yaku {
    ($k: ident, $f: expr, $c: expr, $o: expr) => {
        YakuDefine {
            kind: YakuKind::$k,
            func: $f,
            fan_close: $c,
            fan_open: $o,
        }
    };
}

static YAKU_LIST: &[YakuDefine] = &[
    yaku!(Bakaze, is_bakaze, 1, 1),
    yaku!(Jikaze, is_jikaze, 1, 1),
    yaku!(Haku, is_haku, 1, 1),
    yaku!(Hatsu, is_hatsu, 1, 1),
    yaku!(Chun, is_chun, 1, 1),
    yaku!(Tanyaochuu, is_tanyaochuu, 1, 1),
    yaku!(Pinfu, is_pinfu, 1, 0),
    yaku!(Iipeikou, is_iipeikou, 1, 0),
    yaku!(Ryanpeikou, is_ryanpeikou, 3, 0),
    yaku!(Ikkitsuukan, is_ikkitsuukan, 2, 1),
    yaku!(Sanshokudoujun, is_sanshokudoujun, 2, 1),
    yaku!(Sanshokudoukou, is_sanshokudoukou, 2, 2),
    yaku!(Honchantaiyaochuu, is_chanta, 2, 1),
    yaku!(Junchantaiyaochuu, is_junchan, 3, 2),
    yaku!(Honroutou, is_honroutou, 2, 2),
    yaku!(Chinroutou, is_chinroutou, 13, 13),
    yaku!(Toitoihou, is_toitoihou, 2, 2),
    yaku!(Sanankou, is_sanankou, 2, 2),
    yaku!(Suuankou, is_suuankou, 13, 0),
    yaku!(Suuankoutanki, is_suuankoutanki, 26, 0),
    yaku!(Sankantsu, is_sankantsu, 2, 2),
    yaku!(Suukantsu, is_suukantsu, 13, 13),
    yaku!(Honiisou, is_honiisou, 3, 2),
    yaku!(Chiniisou, is_chiniisou, 6, 5),
    yaku!(Shousangen, is_shousangen, 2, 2),
    yaku!(Daisangen, is_daisangen, 13, 13),
    yaku!(Shousuushii, is_shousuushii, 13, 13),
    yaku!(Daisuushii, is_daisuushii, 26, 26),
    yaku!(Ryuuiisou, is_ryuuiisou, 13, 13),
    yaku!(Tuuiisou, is_tuuiisou, 13, 13),
    yaku!(Chuurenpoutou, is_chuurenpoutou, 13, 0),
    yaku!(Junseichuurenpoutou, is_junseichuurenpoutou, 26, 0),
    // 特殊な形
    yaku!(Kokushimusou, is_kokushimusou, 13, 0),
    yaku!(Kokushimusoujuusanmenmachi, is_kokushimusoujuusanmenmachi, 26, 0),
    yaku!(Chiitoitsu, is_chiitoitsu, 2, 0),
    // 特殊条件
    yaku!(Menzentsumo, is_menzentsumo, 1, 0),
    yaku!(Riichi, is_riichi, 1, 0),
    yaku!(Dabururiichi, is_dabururiichi, 2, 0),
    yaku!(Ippatsu, is_ippatsu, 1, 0),
    yaku!(Haiteiraoyue, is_haiteiraoyue, 1, 1),
    yaku!(Houteiraoyui, is_houteiraoyui, 1, 1),
    yaku!(Rinshankaihou, is_rinshankaihou, 1, 1),
    yaku!(Chankan, is_chankan, 1, 1),
    yaku!(Tenhou, is_tenhou, 13, 0),
    yaku!(Tiihou, is_tiihou, 13, 0),
];

// 役の優先順位 =================================================================
// * 役満が存在する場合は役満以外の役は削除
// * 以下の役は排他的であり右側を優先
//     一盃口, 二盃口
//     チャンタ, 純チャンタ
//     混老頭, 清老頭
//     混一色, 清一色
//     三暗刻, 四暗刻, 四暗刻単騎
//     三槓子, 四槓子
//     小四喜, 大四喜
//     九蓮宝燈, 純正九蓮宝燈
//     国士無双, 国士無双十三面待ち
//     立直, 両立直

// 場風
fn is_bakaze(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[ctx.prevalent_wind] == 1
}

// 自風
fn is_jikaze(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[ctx.seat_wind] == 1
}

// 白
fn is_haku(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[DW] == 1
}

// 發
fn is_hatsu(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[DG] == 1
}

// 中
fn is_chun(ctx: &YakuContext) -> bool {
    ctx.yakuhai_check[DR] == 1
}

// 断幺九
fn is_tanyaochuu(ctx: &YakuContext) -> bool {
    if ctx.shape == WinShape::Kokushimusou {
        return false;
    }

    ctx.sets.iter().all(|SetPair(tp, t)| {
        if is_shuntsu_type(*tp) {
            t.1 != 1 && t.1 != 7
        } else {
            !t.is_end()
        }
    })
}

// 平和
fn is_pinfu(ctx: &YakuContext) -> bool {
    if ctx.is_open || ctx.counts.shuntsu != 4 || ctx.wait != WaitType::Ryanmen {
        return false;
    }

    match ctx.pair_tile {
        Some(pt) => !is_yakuhai(ctx, pt),
        None => false,
    }
}

// 一盃口
fn is_iipeikou(ctx: &YakuContext) -> bool {
    ctx.iipeikou_count == 1
}

// 二盃口
fn is_ryanpeikou(ctx: &YakuContext) -> bool {
    ctx.iipeikou_count == 2
}

// 一気通貫
fn is_ikkitsuukan(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total < 3 {
        return false;
    }

    let mut f147 = [[false; 3]; 3];
    for SetPair(tp, t) in &ctx.sets {
        if is_shuntsu_type(*tp) && matches!(t.1, 1 | 4 | 7) {
            f147[t.0][t.1 / 3] = true;
        }
    }

    f147.iter().any(|f| f[0] && f[1] && f[2])
}

// 三色同順
fn is_sanshokudoujun(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total < 3 {
        return false;
    }
    has_three_colors(ctx, is_shuntsu_type)
}

// 三色同刻
fn is_sanshokudoukou(ctx: &YakuContext) -> bool {
    if ctx.counts.koutsu_total < 3 {
        return false;
    }
    has_three_colors(ctx, is_koutsu_type)
}

// チャンタ
fn is_chanta(ctx: &YakuContext) -> bool {
    ctx.counts.shuntsu_total != 0
        && is_all_sets_end(ctx)
        && ctx.sets.iter().any(|s| s.1.is_hornor())
}

// 純チャン
fn is_junchan(ctx: &YakuContext) -> bool {
    ctx.counts.shuntsu_total != 0
        && is_all_sets_end(ctx)
        && !ctx.sets.iter().any(|s| s.1.is_hornor())
}

// 混老頭
fn is_honroutou(ctx: &YakuContext) -> bool {
    if ctx.counts.shuntsu_total != 0 || ctx.sets.is_empty() {
        return false;
    }

    let mut has_hornor = false;
    let mut has_terminal = false;
    for SetPair(_, t) in &ctx.sets {
        if t.is_hornor() {
            has_hornor = true;
        } else if t.is_terminal() {
            has_terminal = true;
        } else {
            return false;
        }
    }

    has_hornor && has_terminal
}

// 清老頭
fn is_chinroutou(ctx: &YakuContext) -> bool {
    ctx.counts.shuntsu_total == 0
        && !ctx.sets.is_empty()
        && ctx.sets.iter().all(|s| s.1.is_terminal())
}

// 対々和
fn is_toitoihou(ctx: &YakuContext) -> bool {
    ctx.counts.koutsu_total == 4
}

// 三暗刻
fn is_sanankou(ctx: &YakuContext) -> bool {
    ctx.counts.ankou_total == 3
}

// 四暗刻
fn is_suuankou(ctx: &YakuContext) -> bool {
    ctx.counts.ankou_total == 4 && ctx.wait != WaitType::Tanki
}

// 四暗刻単騎
fn is_suuankoutanki(ctx: &YakuContext) -> bool {
    ctx.counts.ankou_total == 4 && ctx.wait == WaitType::Tanki
}

// 三槓子
fn is_sankantsu(ctx: &YakuContext) -> bool {
    ctx.counts.kantsu_total == 3
}

// 四槓子
fn is_suukantsu(ctx: &YakuContext) -> bool {
    ctx.counts.kantsu_total == 4
}

// 混一色
fn is_honiisou(ctx: &YakuContext) -> bool {
    let tis = &ctx.counts.tis;
    count_suits(ctx) == 1 && tis[TZ] > 0
}

// 清一色
fn is_chiniisou(ctx: &YakuContext) -> bool {
    let tis = &ctx.counts.tis;
    count_suits(ctx) == 1 && tis[TZ] == 0
}

// 小三元
fn is_shousangen(ctx: &YakuContext) -> bool {
    let yc = &ctx.yakuhai_check;
    yc[DW] + yc[DG] + yc[DR] == 2 && ctx.pair_tile.map_or(false, |t| t.is_doragon())
}

// 大三元
fn is_daisangen(ctx: &YakuContext) -> bool {
    let yc = &ctx.yakuhai_check;
    yc[DW] + yc[DG] + yc[DR] == 3
}

// 小四喜
fn is_shousuushii(ctx: &YakuContext) -> bool {
    let yc = &ctx.yakuhai_check;
    yc[WE] + yc[WS] + yc[WW] + yc[WN] == 3 && ctx.pair_tile.map_or(false, |t| t.is_wind())
}

// 大四喜
fn is_daisuushii(ctx: &YakuContext) -> bool {
    let yc = &ctx.yakuhai_check;
    yc[WE] + yc[WS] + yc[WW] + yc[WN] == 4
}

// 緑一色
fn is_ryuuiisou(ctx: &YakuContext) -> bool {
    if ctx.sets.is_empty() {
        return false;
    }

    ctx.sets.iter().all(|SetPair(tp, t)| {
        if t.is_hornor() {
            t.1 == DG
        } else if t.0 != TS {
            false
        } else if is_shuntsu_type(*tp) {
            t.1 == 2 // 順子は234以外は不可
        } else {
            matches!(t.1, 2 | 3 | 4 | 6 | 8)
        }
    })
}

// 字一色
fn is_tuuiisou(ctx: &YakuContext) -> bool {
    !ctx.sets.is_empty() && ctx.counts.tis[TZ] == ctx.sets.len()
}

// 九蓮宝燈
fn is_chuurenpoutou(ctx: &YakuContext) -> bool {
    let wt = &ctx.winning_tile;
    let cnt = ctx.hand[wt.0][wt.1];
    is_chuurenpoutou2(ctx) && (cnt == 1 || cnt == 3)
}

// 純正九蓮宝燈
fn is_junseichuurenpoutou(ctx: &YakuContext) -> bool {
    let wt = &ctx.winning_tile;
    let cnt = ctx.hand[wt.0][wt.1];
    is_chuurenpoutou2(ctx) && (cnt == 2 || cnt == 4)
}

// 国士無双
fn is_kokushimusou(ctx: &YakuContext) -> bool {
    let wt = &ctx.winning_tile;
    ctx.shape == WinShape::Kokushimusou && ctx.hand[wt.0][wt.1] != 2
}

// 国士無双十三面待ち
fn is_kokushimusoujuusanmenmachi(ctx: &YakuContext) -> bool {
    let wt = &ctx.winning_tile;
    ctx.shape == WinShape::Kokushimusou && ctx.hand[wt.0][wt.1] == 2
}

// 七対子
fn is_chiitoitsu(ctx: &YakuContext) -> bool {
    ctx.shape == WinShape::Chiitoitsu
}

// 門前自摸
fn is_menzentsumo(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.menzentsumo
}

// リーチ
fn is_riichi(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.riichi && !ctx.yaku_flags.dabururiichi
}

// ダブルリーチ
fn is_dabururiichi(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.dabururiichi
}

// 一発
fn is_ippatsu(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.ippatsu
}

// 海底摸月
fn is_haiteiraoyue(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.haiteiraoyue
}

// 河底撈魚
fn is_houteiraoyui(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.houteiraoyui
}

// 嶺上開花
fn is_rinshankaihou(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.rinshankaihou
}

// 槍槓
fn is_chankan(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.chankan
}

// 天和
fn is_tenhou(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.tenhou
}

// 地和
fn is_tiihou(ctx: &YakuContext) -> bool {
    ctx.yaku_flags.tiihou
}

// 共通処理 ====================================================================

fn is_yakuhai(ctx: &YakuContext, t: Tile) -> bool {
    t.is_doragon() || (t.is_wind() && (t.1 == ctx.prevalent_wind || t.1 == ctx.seat_wind))
}

// すべての面子と雀頭に幺九牌が含まれる
fn is_all_sets_end(ctx: &YakuContext) -> bool {
    ctx.sets.iter().all(|SetPair(tp, t)| {
        if is_shuntsu_type(*tp) {
            t.1 == 1 || t.1 == 7
        } else {
            t.is_end()
        }
    })
}

fn count_suits(ctx: &YakuContext) -> usize {
    let tis = &ctx.counts.tis;
    (TM..=TS).filter(|&ti| tis[ti] != 0).count()
}

// 同じ数字の面子が萬子,筒子,索子に揃っている
fn has_three_colors(ctx: &YakuContext, filter: fn(SetPairType) -> bool) -> bool {
    let mut mps = [[false; TYPE - 1]; TNUM];
    for SetPair(tp, t) in &ctx.sets {
        if filter(*tp) && t.is_suit() {
            mps[t.1][t.0] = true;
        }
    }
    mps.iter().any(|f| f[TM] && f[TP] && f[TS])
}

// 九蓮宝燈(純正を含む)
fn is_chuurenpoutou2(ctx: &YakuContext) -> bool {
    if ctx.is_open || ctx.shape != WinShape::Normal || ctx.counts.kantsu_total != 0 {
        return false;
    }

    let tis = &ctx.counts.tis;
    let ti = match (TM..=TS).find(|&ti| tis[ti] == 5) {
        Some(ti) => ti,
        None => return false,
    };

    let h = &ctx.hand;
    h[ti][1] >= 3 && h[ti][9] >= 3 && (2..9).all(|ni| h[ti][ni] != 0)
}
