use super::parse::*;
use super::point::*;
use super::shanten::{calc_kokushimusou_shanten, calc_normal_tenpai};
use super::yaku::*;
use crate::control::common::*;
use crate::error::HandError;
use crate::model::*;

// 和了形の評価結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    Win(ScoreContext),
    NoYaku, // 和了形だが役がない (ドラのみを含む)
}

pub fn evaluate_hand_tsumo(
    stg: &Stage,
    seat: Seat,
    ura_doras: &[Tile],
) -> Result<Option<ScoreContext>, HandError> {
    let pl = &stg.players[seat];
    let drawn = match pl.drawn {
        Some(t) => t,
        None => return Ok(None),
    };
    if !pl.winning_tiles.contains(&drawn.to_normal()) {
        return Ok(None);
    }

    let mut yf = YakuFlags {
        menzentsumo: pl.is_menzen,
        ippatsu: pl.is_ippatsu(),
        haiteiraoyue: stg.wall_count == 0 && !pl.is_rinshan,
        rinshankaihou: pl.is_rinshan,
        ..Default::default()
    };
    set_riichi_flags(&mut yf, pl);
    if is_no_meld_turn1(stg, seat) {
        if is_dealer(stg, seat) {
            yf.tenhou = true;
        } else {
            yf.tiihou = true;
        }
    }

    let ura_doras = if pl.is_riichi() { ura_doras } else { &[] };
    let ev = evaluate_hand(
        &pl.hand,
        &pl.melds,
        &stg.doras,
        ura_doras,
        drawn,
        true,
        is_dealer(stg, seat),
        stg.get_prevalent_wind(),
        get_seat_wind(stg, seat),
        &yf,
        &stg.rule,
    )?;

    Ok(match ev {
        Evaluation::Win(sc) => Some(sc),
        Evaluation::NoYaku => None,
    })
}

// source: 和了牌の出所 (Discard, Kakan: 槍槓, Ankan: 国士無双のみ)
pub fn evaluate_hand_ron(
    stg: &Stage,
    seat: Seat,
    tile: Tile,
    source: ActionType,
    ura_doras: &[Tile],
) -> Result<Option<ScoreContext>, HandError> {
    let pl = &stg.players[seat];
    if pl.is_furiten() || !pl.winning_tiles.contains(&tile.to_normal()) {
        return Ok(None);
    }

    // 和了牌を追加
    let mut hand = pl.hand;
    inc_tile(&mut hand, tile);

    let mut yf = YakuFlags {
        ippatsu: pl.is_ippatsu(),
        ..Default::default()
    };
    set_riichi_flags(&mut yf, pl);
    match source {
        ActionType::Discard => yf.houteiraoyui = stg.wall_count == 0,
        ActionType::Kakan | ActionType::Ankan => yf.chankan = true,
        _ => return Ok(None),
    }

    let ura_doras = if pl.is_riichi() { ura_doras } else { &[] };
    let ev = evaluate_hand(
        &hand,
        &pl.melds,
        &stg.doras,
        ura_doras,
        tile,
        false,
        is_dealer(stg, seat),
        stg.get_prevalent_wind(),
        get_seat_wind(stg, seat),
        &yf,
        &stg.rule,
    )?;

    Ok(match ev {
        Evaluation::Win(sc) => {
            // 暗槓のロンは国士無双のみ
            let is_kokushi = sc.has_yaku(YakuKind::Kokushimusou)
                || sc.has_yaku(YakuKind::Kokushimusoujuusanmenmachi);
            if source == ActionType::Ankan && !is_kokushi {
                None
            } else {
                Some(sc)
            }
        }
        Evaluation::NoYaku => None,
    })
}

fn set_riichi_flags(yf: &mut YakuFlags, pl: &Player) {
    if let Some(r) = &pl.riichi {
        yf.riichi = !r.is_double;
        yf.dabururiichi = r.is_double;
    }
}

// 和了形の場合, 最も高得点となる解釈の評価結果を返却
// 和了形でない場合はHandError::NotWinningShape
// 積み棒, 供託は計算しない
pub fn evaluate_hand(
    hand: &TileTable,       // 手牌(鳴き以外, ロンの場合でも和了牌を含む)
    melds: &[Meld],         // 鳴き
    doras: &[Tile],         // ドラ表示牌 (注:ドラそのものではない)
    ura_doras: &[Tile],     // 裏ドラ表示牌 リーチしていない場合は空
    winning_tile: Tile,     // 和了牌
    is_drawn: bool,         // ツモ和了
    is_dealer: bool,        // 親番
    prevalent_wind: Tnum,   // 場風 (東: 1, 南: 2, 西: 3, 北: 4)
    seat_wind: Tnum,        // 自風 (同上)
    yaku_flags: &YakuFlags, // 和了形だった場合に付与される特殊条件役のフラグ
    rule: &Rule,
) -> Result<Evaluation, HandError> {
    validate_tile_table(hand)?;
    let n_tiles = count_tiles(hand);
    if melds.len() > MAX_KAN || n_tiles + melds.len() * 3 != HAND + 1 {
        return Err(HandError::InvalidHandSize(n_tiles));
    }
    let wt = winning_tile.to_normal();
    let h14 = normalize_table(hand);
    if h14[wt.0][wt.1] == 0 {
        return Err(HandError::NotWinningShape);
    }

    let wins = parse_wins(&h14, melds, wt, is_drawn)?;
    if wins.is_empty() {
        return Err(HandError::NotWinningShape);
    }

    // 役がある解釈の中から (基本点, 飜, 符) が最大のものを選択
    let mut best: Option<(Vec<Yaku>, usize, usize, usize, Point)> = None;
    for (shape, ph) in wins {
        let ctx = YakuContext::new(
            h14,
            shape,
            ph,
            wt,
            prevalent_wind,
            seat_wind,
            is_drawn,
            *yaku_flags,
        );
        let (yakus, fan, yakuman) = ctx.calc_yaku(rule);
        if yakus.is_empty() {
            continue;
        }
        let fu = ctx.calc_fu();
        let base = calc_base_point(fu, fan, yakuman);
        let is_better = match &best {
            Some(b) => (base, fan, fu) > (b.4, b.1, b.3),
            None => true,
        };
        if is_better {
            best = Some((yakus, fan, yakuman, fu, base));
        }
    }

    let (mut yakus, mut fan, yakuman, fu, _) = match best {
        Some(b) => b,
        None => return Ok(Evaluation::NoYaku),
    };

    // ドラは役満の場合は加算しない
    if yakuman == 0 {
        let bonus = [
            (YakuKind::Dora, count_dora(hand, melds, doras)),
            (YakuKind::Akadora, count_red5(hand, melds)),
            (YakuKind::Uradora, count_dora(hand, melds, ura_doras)),
        ];
        for (kind, n) in bonus {
            if n > 0 {
                yakus.push(Yaku { kind, fan: n });
                fan += n;
            }
        }
    }

    let base_point = calc_base_point(fu, fan, yakuman);
    let points = calc_points(is_dealer, base_point);
    let score = if !is_drawn {
        points.0
    } else if is_dealer {
        points.1 * 3
    } else {
        points.1 * 2 + points.2
    };

    Ok(Evaluation::Win(ScoreContext {
        yakus,
        fu,
        fan,
        yakuman,
        base_point,
        score,
        points,
        title: get_score_title(base_point, yakuman),
    }))
}

// 和了形のすべての解釈 (国士無双は他の形と排他)
fn parse_wins(
    h14: &TileTable,
    melds: &[Meld],
    wt: Tile,
    is_drawn: bool,
) -> Result<Vec<(WinShape, ParsedHand)>, HandError> {
    let mut res = vec![];
    if melds.is_empty() && calc_kokushimusou_shanten(h14).0 == -1 {
        res.push((
            WinShape::Kokushimusou,
            ParsedHand {
                sets: vec![],
                wait: WaitType::Tanki,
            },
        ));
        return Ok(res);
    }

    let mut h13 = *h14;
    dec_tile(&mut h13, wt);
    let pm = parse_melds(melds)?;
    let (_, waits) = calc_normal_tenpai(&h13, melds.len());
    for (t, decs) in &waits {
        if *t != wt {
            continue;
        }
        for d in decs {
            if let Some(mut ph) = parse_into_normal_win(d, wt, is_drawn) {
                ph.sets.extend(pm.iter().copied());
                res.push((WinShape::Normal, ph));
            }
        }
    }

    if melds.is_empty() {
        if let Some(ph) = parse_into_chiitoitsu_win(h14) {
            res.push((WinShape::Chiitoitsu, ph));
        }
    }

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::string::{meld_from_string, tiles_from_string};

    fn eval(
        hand: &str,
        melds: &[&str],
        wt: &str,
        is_drawn: bool,
        yf: YakuFlags,
    ) -> Result<Evaluation, HandError> {
        let hand = tiles_to_tile_table(&tiles_from_string(hand).unwrap());
        let melds: Vec<Meld> = melds.iter().map(|m| meld_from_string(m).unwrap()).collect();
        let wt = Tile::from_symbol(wt).unwrap();
        evaluate_hand(
            &hand,
            &melds,
            &[],
            &[],
            wt,
            is_drawn,
            false,
            WE,
            WS,
            &yf,
            &Rule::default(),
        )
    }

    fn win(hand: &str, melds: &[&str], wt: &str, is_drawn: bool, yf: YakuFlags) -> ScoreContext {
        match eval(hand, melds, wt, is_drawn, yf).unwrap() {
            Evaluation::Win(sc) => sc,
            Evaluation::NoYaku => panic!("no yaku: {}", hand),
        }
    }

    fn menzentsumo() -> YakuFlags {
        YakuFlags {
            menzentsumo: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_pinfu_tsumo() {
        let sc = win("m123p456s789m234p99", &[], "m4", true, menzentsumo());
        assert!(sc.has_yaku(YakuKind::Pinfu));
        assert!(sc.has_yaku(YakuKind::Menzentsumo));
        assert_eq!(sc.fu, 20);
        assert_eq!(sc.fan, 2);
        assert_eq!(sc.points, (1300, 400, 700));
    }

    #[test]
    fn test_pinfu_ron() {
        let sc = win("m123p456s789m234p99", &[], "m4", false, YakuFlags::default());
        assert!(sc.has_yaku(YakuKind::Pinfu));
        assert_eq!(sc.fu, 30);
        assert_eq!(sc.score, 1000);
    }

    #[test]
    fn test_no_yaku() {
        // 鳴きのある役無し
        let ev = eval("m234p456s567z11", &["m789+"], "z1", false, YakuFlags::default());
        assert_eq!(ev, Ok(Evaluation::NoYaku));

        let ev = eval("m234p456s567z11123", &[], "z3", false, YakuFlags::default());
        assert_eq!(ev, Err(HandError::NotWinningShape));

        let ev = eval("m234p456s567z111", &[], "z1", false, YakuFlags::default());
        assert_eq!(ev, Err(HandError::InvalidHandSize(12)));
    }

    #[test]
    fn test_ryanpeikou_over_chiitoitsu() {
        let sc = win("m112233p445566s99", &[], "s9", false, YakuFlags::default());
        assert!(sc.has_yaku(YakuKind::Ryanpeikou));
        assert!(!sc.has_yaku(YakuKind::Chiitoitsu));
        assert!(!sc.has_yaku(YakuKind::Iipeikou));

        let sc = win("m1133p4477s99z1155", &[], "z5", false, YakuFlags::default());
        assert!(sc.has_yaku(YakuKind::Chiitoitsu));
        assert_eq!(sc.fu, 25);
    }

    #[test]
    fn test_yakuman() {
        // 国士無双十三面待ち
        let sc = win("m19p19s19z12345677", &[], "z7", false, YakuFlags::default());
        assert!(sc.has_yaku(YakuKind::Kokushimusoujuusanmenmachi));
        assert_eq!(sc.yakuman, 2);
        assert_eq!(sc.base_point, 16000);

        // 四暗刻 (ツモ) 役満以外の役とドラは加算しない
        let hand = tiles_to_tile_table(&tiles_from_string("m111p333s555z22277").unwrap());
        let yf = YakuFlags {
            menzentsumo: true,
            riichi: true,
            ..Default::default()
        };
        let ev = evaluate_hand(
            &hand,
            &[],
            &[Tile(TM, 9)],
            &[],
            Tile(TZ, 2),
            true,
            false,
            WE,
            WS,
            &yf,
            &Rule::default(),
        );
        let sc = match ev {
            Ok(Evaluation::Win(sc)) => sc,
            _ => panic!(),
        };
        assert_eq!(sc.yakus.len(), 1);
        assert!(sc.has_yaku(YakuKind::Suuankou));
        assert_eq!(sc.yakuman, 1);

        // 同じ形のロンは三暗刻
        let sc = win("m111p333s555z22277", &[], "z2", false, YakuFlags::default());
        assert!(sc.has_yaku(YakuKind::Sanankou));
        assert!(sc.has_yaku(YakuKind::Toitoihou));
        assert_eq!(sc.yakuman, 0);

        // 純正九蓮宝燈
        let sc = win("m11123455678999", &[], "m5", false, YakuFlags::default());
        assert!(sc.has_yaku(YakuKind::Junseichuurenpoutou));
        assert_eq!(sc.yakuman, 2);

        let rule = Rule {
            double_yakuman: false,
            ..Default::default()
        };
        let hand = tiles_to_tile_table(&tiles_from_string("m11123455678999").unwrap());
        let ev = evaluate_hand(
            &hand,
            &[],
            &[],
            &[],
            Tile(TM, 5),
            false,
            false,
            WE,
            WS,
            &YakuFlags::default(),
            &rule,
        );
        match ev {
            Ok(Evaluation::Win(sc)) => assert_eq!(sc.yakuman, 1),
            _ => panic!(),
        }
    }

    #[test]
    fn test_yaku_combinations() {
        // 三色同順
        let sc = win("m123p123s12399z111", &[], "z1", false, YakuFlags::default());
        assert!(sc.has_yaku(YakuKind::Sanshokudoujun));

        // 一気通貫 (鳴きで1飜)
        let sc = win("m456789p99z222", &["m123+"], "z2", false, YakuFlags::default());
        assert!(sc.has_yaku(YakuKind::Ikkitsuukan));
        let y = sc.yakus.iter().find(|y| y.kind == YakuKind::Ikkitsuukan).unwrap();
        assert_eq!(y.fan, 1);

        // 数字が揃っていない順子は三色ではない
        let sc = win("m123p234s345m99z111", &[], "z1", false, YakuFlags::default());
        assert!(!sc.has_yaku(YakuKind::Sanshokudoujun));
        assert!(sc.has_yaku(YakuKind::Jikaze) || sc.has_yaku(YakuKind::Bakaze));

        // 清一色 + 一盃口 + 一気通貫 + 平和
        let sc = win("s11223345678999", &[], "s9", false, YakuFlags::default());
        assert!(sc.has_yaku(YakuKind::Chiniisou));
        assert!(sc.has_yaku(YakuKind::Iipeikou));
        assert!(sc.has_yaku(YakuKind::Ikkitsuukan));
        assert!(sc.has_yaku(YakuKind::Pinfu));
    }

    #[test]
    fn test_dora() {
        let hand = tiles_to_tile_table(&tiles_from_string("m123p406s789m234p99").unwrap());
        let ev = evaluate_hand(
            &hand,
            &[],
            &[Tile(TM, 3)],
            &[Tile(TP, 8)],
            Tile(TM, 4),
            true,
            false,
            WE,
            WS,
            &menzentsumo(),
            &Rule::default(),
        );
        let sc = match ev {
            Ok(Evaluation::Win(sc)) => sc,
            _ => panic!(),
        };
        // 門前自摸 + 平和 + ドラ1 + 赤1 + 裏2
        assert!(sc.has_yaku(YakuKind::Akadora));
        assert_eq!(sc.fan, 2 + 1 + 1 + 2);
        assert_eq!(sc.title, "跳満");
    }

    #[test]
    fn test_evaluate_idempotence() {
        let a = eval("m123p456s789m234p99", &[], "m4", true, menzentsumo());
        let b = eval("m123p456s789m234p99", &[], "m4", true, menzentsumo());
        assert_eq!(a, b);
    }
}
