use mahjong::control::string::tiles_from_string;
use mahjong::control::wall::{create_wall_from_template, WallTemplate};
use mahjong::control::{Phase, Round, RoundSetup};
use mahjong::model::*;
use mahjong::RoundError;

fn rule_for_test() -> Rule {
    // ランダムなツモ牌で途中流局や流し満貫が発生しないようにする
    Rule {
        suufuurenda: false,
        nagashimangan: false,
        ..Default::default()
    }
}

fn new_round(rule: Rule, tmpl: &WallTemplate) -> Round {
    let wall = create_wall_from_template(1, rule.red5, tmpl).unwrap();
    let setup = RoundSetup {
        wall: Some(wall),
        ..Default::default()
    };
    Round::new(rule, setup, vec![]).unwrap()
}

fn tile(exp: &str) -> Tile {
    tiles_from_string(exp).unwrap()[0]
}

// 他家の鳴き,ロンをすべてスキップ
fn pass(rd: &mut Round) {
    if let Phase::Call { .. } = rd.phase() {
        rd.decline_all().unwrap();
    }
}

fn tsumogiri(rd: &mut Round) {
    let s = rd.stage().turn;
    rd.do_action(s, Action::nop()).unwrap();
    pass(rd);
}

fn play_until_end(rd: &mut Round) {
    while !rd.is_ended() {
        match rd.phase() {
            Phase::Turn { .. } => tsumogiri(rd),
            _ => pass(rd),
        }
    }
}

fn draw_result(rd: &Round) -> &EventDraw {
    match rd.result() {
        Some(RoundResult::Draw(e)) => e,
        r => panic!("unexpected result: {:?}", r),
    }
}

fn win_result(rd: &Round) -> &EventWin {
    match rd.result() {
        Some(RoundResult::Win(e)) => e,
        r => panic!("unexpected result: {:?}", r),
    }
}

#[test]
fn test_exhaustive_draw_one_tenpai() {
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: [
                "m123456789p1234",
                "m1357p1357s1357z1",
                "m2468p2468s2468z2",
                "m1357p1357s1357z3",
            ],
            ..Default::default()
        },
    );
    play_until_end(&mut rd);

    let e = draw_result(&rd);
    assert_eq!(e.draw_type, DrawType::Kouhaiheikyoku);
    assert_eq!(e.tenpais, [true, false, false, false]);
    assert_eq!(e.delta_scores, [3000, -1000, -1000, -1000]);
    assert_eq!(e.hands[0], tiles_from_string("m123456789p1234").unwrap());
    assert!(e.hands[1].is_empty());
    assert_eq!(rd.stage().wall_count, 0);
}

#[test]
fn test_exhaustive_draw_no_exchange() {
    // 全員ノーテン
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: [
                "m2479p2479s2479z4",
                "m1357p1357s1357z1",
                "m2468p2468s2468z2",
                "m1357p1357s1357z3",
            ],
            ..Default::default()
        },
    );
    play_until_end(&mut rd);
    let e = draw_result(&rd);
    assert_eq!(e.tenpais, [false; SEAT]);
    assert_eq!(e.delta_scores, [0; SEAT]);

    // 全員聴牌
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: [
                "m123456789p1234",
                "m123456789s1234",
                "m123456789z1122",
                "p567s567z3334445",
            ],
            ..Default::default()
        },
    );
    play_until_end(&mut rd);
    let e = draw_result(&rd);
    assert_eq!(e.tenpais, [true; SEAT]);
    assert_eq!(e.delta_scores, [0; SEAT]);
}

#[test]
fn test_suufuurenda() {
    let rule = Rule {
        nagashimangan: false,
        ..Default::default()
    };
    let mut rd = new_round(
        rule,
        &WallTemplate {
            hands: ["z1", "z1", "z1", "z1"],
            ..Default::default()
        },
    );
    for s in 0..SEAT {
        assert_eq!(rd.stage().turn, s);
        rd.discard(tile("z1"), false).unwrap();
        pass(&mut rd);
    }

    assert!(rd.is_ended());
    let e = draw_result(&rd);
    assert_eq!(e.draw_type, DrawType::Suufuurenda);
    assert_eq!(e.delta_scores, [0; SEAT]);
}

#[test]
fn test_riichi_ippatsu_ron() {
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: ["m123456789p1234", "", "", ""],
            draws: "z7p4",
            ..Default::default()
        },
    );

    // 親の第一打でリーチ (ダブルリーチ)
    assert!(rd
        .action(0)
        .iter()
        .any(|a| a.action_type == ActionType::Riichi && a.tiles.contains(&tile("z7"))));
    rd.discard(tile("z7"), true).unwrap();
    pass(&mut rd);
    assert_eq!(rd.stage().last_riichi, None);
    assert!(rd.stage().players[0].is_ippatsu());

    // 下家が和了牌を打牌
    assert_eq!(rd.stage().turn, 1);
    rd.discard(tile("p4"), false).unwrap();
    assert!(rd.action(0).contains(&Action::ron()));
    rd.declare_ron(0).unwrap();
    pass(&mut rd);

    assert!(rd.is_ended());
    let e = win_result(&rd);
    assert_eq!(e.loser, Some(1));
    assert_eq!(e.contexts.len(), 1);
    let ctx = &e.contexts[0];
    assert_eq!(ctx.seat, 0);
    assert!(ctx.is_riichi);
    assert!(ctx.is_dealer);
    assert!(!ctx.is_drawn);
    assert_eq!(ctx.winning_tile, tile("p4"));
    assert!(ctx.score_context.has_yaku(YakuKind::Dabururiichi));
    assert!(ctx.score_context.has_yaku(YakuKind::Ippatsu));
    assert!(ctx.score_context.has_yaku(YakuKind::Ikkitsuukan));
    assert_eq!(e.ura_doras.len(), e.doras.len());

    assert!(matches!(
        rd.discard(tile("p4"), false),
        Err(RoundError::RoundEnded)
    ));
}

#[test]
fn test_temporary_furiten() {
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: ["m123456789p1234", "", "", ""],
            draws: "z7p4p1z5z6p4",
            ..Default::default()
        },
    );
    rd.discard(tile("z7"), false).unwrap();
    pass(&mut rd);

    // 見逃し
    rd.discard(tile("p4"), false).unwrap();
    assert!(rd.action(0).contains(&Action::ron()));
    rd.do_action(0, Action::nop()).unwrap();
    pass(&mut rd);
    assert!(rd.stage().players[0].is_furiten_other);
    assert!(rd.stage().players[0].is_furiten());

    // 同巡内はロン不可
    rd.discard(tile("p1"), false).unwrap();
    assert!(!rd.action(0).contains(&Action::ron()));
    pass(&mut rd);
    tsumogiri(&mut rd);

    // 自分の打牌で解除
    assert_eq!(rd.stage().turn, 0);
    rd.discard(tile("z6"), false).unwrap();
    assert!(!rd.stage().players[0].is_furiten());
    pass(&mut rd);
    rd.discard(tile("p4"), false).unwrap();
    assert!(rd.action(0).contains(&Action::ron()));
}

#[test]
fn test_discard_furiten() {
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: ["m123456789p1134", "", "", ""],
            draws: "p5p2",
            ..Default::default()
        },
    );
    // p2,p5待ちでp5を捨てる
    rd.discard(tile("p5"), false).unwrap();
    pass(&mut rd);
    assert_eq!(
        rd.stage().players[0].winning_tiles,
        tiles_from_string("p25").unwrap()
    );
    assert!(rd.stage().players[0].is_furiten());

    rd.discard(tile("p2"), false).unwrap();
    assert!(!rd.action(0).contains(&Action::ron()));
}

#[test]
fn test_ankan_dora() {
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: ["m1111p234s567z112", "", "", ""],
            draws: "z2",
            replacements: "z5",
            ..Default::default()
        },
    );
    let ankan = Action::ankan(tiles_from_string("m1111").unwrap());
    assert!(rd.action(0).contains(&ankan));
    rd.declare_ankan(&tiles_from_string("m1111").unwrap()).unwrap();
    pass(&mut rd);

    // 暗槓の槓ドラは即時
    let stg = rd.stage();
    assert_eq!(stg.n_kan, 1);
    assert_eq!(stg.doras.len(), 2);
    assert_eq!(stg.wall_count, 68);
    assert_eq!(stg.turn, 0);
    assert_eq!(stg.players[0].drawn, Some(tile("z5")));
    assert!(stg.players[0].is_rinshan);
    assert_eq!(stg.players[0].melds[0].meld_type, MeldType::Ankan);

    rd.discard(tile("z5"), false).unwrap();
    assert!(!rd.stage().players[0].is_rinshan);
    assert_eq!(rd.stage().doras.len(), 2);
}

#[test]
fn test_minkan_dora_after_discard() {
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: ["z7", "z777", "", ""],
            replacements: "z5",
            ..Default::default()
        },
    );
    rd.discard(tile("z7"), false).unwrap();
    let minkan = Action::minkan(tiles_from_string("z777").unwrap());
    assert!(rd.action(1).contains(&minkan));
    rd.call_minkan(1, &tiles_from_string("z777").unwrap()).unwrap();
    pass(&mut rd);

    let stg = rd.stage();
    assert_eq!(stg.turn, 1);
    assert_eq!(stg.n_kan, 1);
    assert_eq!(stg.doras.len(), 1);
    assert_eq!(stg.players[1].drawn, Some(tile("z5")));
    assert_eq!(stg.players[1].melds[0].froms, vec![1, 1, 1, 0]);
    assert_eq!(stg.players[0].discards[0].meld, Some((1, 0)));
    assert!(!stg.players[0].is_nagashimangan);
    assert_eq!(rd.count_unseen(2, tile("z7")), 0);

    // 明槓の槓ドラは打牌後
    rd.discard(tile("z5"), false).unwrap();
    assert_eq!(rd.stage().doras.len(), 2);
}

#[test]
fn test_pon_then_kakan() {
    let z7 = tile("z7");
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: ["z7", "z77", "", ""],
            draws: "z1z2z3z4z7",
            replacements: "z5",
            ..Default::default()
        },
    );
    rd.discard(z7, false).unwrap();
    rd.call_pon(1, &[z7, z7]).unwrap();
    pass(&mut rd);
    assert_eq!(rd.stage().turn, 1);
    assert!(matches!(rd.phase(), Phase::Turn { melding: Some(_), .. }));

    // ポンした牌は捨てられない (喰い替え) ので他の牌を打牌
    let t = rd.stage().players[1]
        .hand_tiles()
        .into_iter()
        .find(|&t| t != z7)
        .unwrap();
    rd.discard(t, false).unwrap();
    pass(&mut rd);
    for _ in 0..3 {
        tsumogiri(&mut rd);
    }

    assert_eq!(rd.stage().turn, 1);
    assert_eq!(rd.stage().players[1].drawn, Some(z7));
    assert!(rd.action(1).contains(&Action::kakan(z7)));
    rd.declare_kakan(z7).unwrap();
    pass(&mut rd);

    let stg = rd.stage();
    let m = &stg.players[1].melds[0];
    assert_eq!(m.meld_type, MeldType::Kakan);
    assert_eq!(m.tiles.len(), 4);
    assert_eq!(stg.doras.len(), 1);
    assert_eq!(stg.players[1].drawn, Some(tile("z5")));

    rd.discard(tile("z5"), false).unwrap();
    assert_eq!(rd.stage().doras.len(), 2);
}

#[test]
fn test_tsumo() {
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: ["m123456789p1234", "", "", ""],
            draws: "z7z6z6z6p1",
            ..Default::default()
        },
    );
    for _ in 0..SEAT {
        tsumogiri(&mut rd);
    }
    assert_eq!(rd.stage().players[0].drawn, Some(tile("p1")));
    assert!(rd.action(0).contains(&Action::tsumo()));
    rd.declare_tsumo().unwrap();

    let e = win_result(&rd);
    assert_eq!(e.loser, None);
    let ctx = &e.contexts[0];
    assert!(ctx.is_drawn);
    assert!(ctx.score_context.has_yaku(YakuKind::Menzentsumo));
    assert!(ctx.score_context.has_yaku(YakuKind::Ikkitsuukan));
    assert_eq!(ctx.hand.len(), 14);
}

#[test]
fn test_no_chi_without_legal_discard() {
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: [
                "m38p2468s2468z145",
                "m4566p123z112233",
                "m127p1379s1379z23",
                "m19p57s57z4556677",
            ],
            draws: "p9s9m9z6z7p9",
            ..Default::default()
        },
    );
    let pon = |rd: &mut Round, t: &str| {
        rd.call_pon(1, &[tile(t), tile(t)]).unwrap();
        pass(rd);
    };

    // 下家が字牌を3回ポンして手牌がm4566になる
    rd.discard(tile("z1"), false).unwrap();
    pon(&mut rd, "z1");
    rd.discard(tile("p1"), false).unwrap();
    pass(&mut rd);
    rd.discard(tile("z2"), false).unwrap();
    pon(&mut rd, "z2");
    rd.discard(tile("p2"), false).unwrap();
    pass(&mut rd);
    rd.discard(tile("z3"), false).unwrap();
    pon(&mut rd, "z3");
    rd.discard(tile("p3"), false).unwrap();
    pass(&mut rd);
    tsumogiri(&mut rd);
    tsumogiri(&mut rd);
    assert_eq!(rd.stage().players[1].hand_tiles(), tiles_from_string("m4566").unwrap());

    // m45でチーすると残りのm66が喰い替えで打牌できないのでチーは提示されない
    assert_eq!(rd.stage().turn, 0);
    rd.discard(tile("m3"), false).unwrap();
    let acts = rd.action(1);
    assert!(!acts.iter().any(|a| a.action_type == ActionType::Chi));
    assert!(acts.contains(&Action::ron()));

    rd.declare_ron(1).unwrap();
    pass(&mut rd);
    assert_eq!(win_result(&rd).contexts[0].seat, 1);
}

#[test]
fn test_ankan_kokushi_pass_furiten() {
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: ["m2468p2468s24z777", "m19p19s19z1234566", "", ""],
            draws: "z7",
            ..Default::default()
        },
    );
    rd.declare_ankan(&tiles_from_string("z7777").unwrap()).unwrap();

    // 国士無双のみ暗槓をロンできる
    assert!(rd.action(1).contains(&Action::ron()));
    rd.do_action(1, Action::nop()).unwrap();
    pass(&mut rd);

    let pl = &rd.stage().players[1];
    assert!(pl.is_furiten_other);
    assert!(pl.is_furiten());
    assert_eq!(rd.stage().turn, 0);
    assert!(rd.stage().players[0].is_rinshan);
}

#[test]
fn test_chankan() {
    let m4 = tile("m4");
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: [
                "m4p2468s2468z2345",
                "m44p1379s1379z677",
                "m12323p456s789z11",
                "m999p89s5z3344556",
            ],
            draws: "z7s1s1s1m4",
            ..Default::default()
        },
    );
    rd.discard(m4, false).unwrap();
    // 役がないのでロンは提示されない
    assert!(!rd.action(2).contains(&Action::ron()));
    rd.call_pon(1, &[m4, m4]).unwrap();
    pass(&mut rd);
    rd.discard(tile("z6"), false).unwrap();
    pass(&mut rd);
    for _ in 0..3 {
        tsumogiri(&mut rd);
    }

    assert_eq!(rd.stage().players[1].drawn, Some(m4));
    rd.declare_kakan(m4).unwrap();
    assert!(rd.action(2).contains(&Action::ron()));
    rd.declare_ron(2).unwrap();

    let e = win_result(&rd);
    assert_eq!(e.loser, Some(1));
    let ctx = &e.contexts[0];
    assert_eq!(ctx.seat, 2);
    assert_eq!(ctx.winning_tile, m4);
    assert!(ctx.score_context.has_yaku(YakuKind::Chankan));
}

// 親のz1の打牌に対して3人が単騎待ちで一気通貫
fn triple_ron_round(rule: Rule) -> Round {
    let mut rd = new_round(
        rule,
        &WallTemplate {
            hands: [
                "p2468s2468z12345",
                "m123456789p111z1",
                "m123456789s111z1",
                "s123456789p999z1",
            ],
            draws: "z7",
            ..Default::default()
        },
    );
    rd.discard(tile("z1"), false).unwrap();
    for s in 1..SEAT {
        assert!(rd.action(s).contains(&Action::ron()));
    }
    rd
}

#[test]
fn test_multi_ron() {
    let mut rd = triple_ron_round(rule_for_test());
    rd.declare_ron(3).unwrap();
    rd.declare_ron(2).unwrap();
    rd.declare_ron(1).unwrap();
    let e = win_result(&rd);
    assert_eq!(e.loser, Some(0));
    let seats: Vec<Seat> = e.contexts.iter().map(|c| c.seat).collect();
    assert_eq!(seats, vec![1, 2, 3]);

    // 見逃した対面を除いた上家取りの順
    let mut rd = triple_ron_round(rule_for_test());
    rd.declare_ron(3).unwrap();
    rd.do_action(2, Action::nop()).unwrap();
    rd.declare_ron(1).unwrap();
    let seats: Vec<Seat> = win_result(&rd).contexts.iter().map(|c| c.seat).collect();
    assert_eq!(seats, vec![1, 3]);
}

#[test]
fn test_head_bump() {
    let rule = Rule {
        multi_ron: MultiRon::HeadBump,
        ..rule_for_test()
    };
    let mut rd = triple_ron_round(rule);
    rd.declare_ron(3).unwrap();
    rd.declare_ron(2).unwrap();
    rd.declare_ron(1).unwrap();
    let e = win_result(&rd);
    assert_eq!(e.contexts.len(), 1);
    assert_eq!(e.contexts[0].seat, 1);
}

#[test]
fn test_sanchaho() {
    let rule = Rule {
        sanchaho: true,
        ..rule_for_test()
    };
    let mut rd = triple_ron_round(rule);
    for s in 1..SEAT {
        rd.declare_ron(s).unwrap();
    }
    let e = draw_result(&rd);
    assert_eq!(e.draw_type, DrawType::Sanchaho);
    assert_eq!(e.delta_scores, [0; SEAT]);
}

#[test]
fn test_suukansanra() {
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: ["m11112222p2468z1", "p11113333s2468z2", "", ""],
            draws: "s1",
            replacements: "z5z5z6z6",
            ..Default::default()
        },
    );
    // 親が2回暗槓
    rd.declare_ankan(&tiles_from_string("m1111").unwrap()).unwrap();
    pass(&mut rd);
    rd.declare_ankan(&tiles_from_string("m2222").unwrap()).unwrap();
    pass(&mut rd);
    rd.discard(tile("z5"), false).unwrap();
    pass(&mut rd);

    // 下家が2回暗槓して4回目
    assert_eq!(rd.stage().turn, 1);
    rd.declare_ankan(&tiles_from_string("p1111").unwrap()).unwrap();
    pass(&mut rd);
    rd.declare_ankan(&tiles_from_string("p3333").unwrap()).unwrap();
    pass(&mut rd);
    assert_eq!(rd.stage().n_kan, 4);
    assert_eq!(rd.stage().doras.len(), 5);
    assert!(rd.action(1).iter().all(|a| a.action_type != ActionType::Ankan));

    // 4回目の槓のあとの打牌が通ると流局
    rd.discard(tile("z6"), false).unwrap();
    pass(&mut rd);
    let e = draw_result(&rd);
    assert_eq!(e.draw_type, DrawType::Suukansanra);
    assert_eq!(e.delta_scores, [0; SEAT]);
}

#[test]
fn test_nagashimangan() {
    let rule = Rule {
        nagashimangan: true,
        ..rule_for_test()
    };

    // 親のツモは全て么九牌, 他家のツモは全て中張牌
    let ends = tiles_from_string("m19p19s19z1234567m19p19s1").unwrap();
    let mut simples = vec![];
    for _ in 0..3 {
        for ti in [TM, TP, TS] {
            for ni in 2..=8 {
                simples.push(Tile(ti, ni));
            }
        }
    }
    let mut simples = simples.into_iter();
    let mut draws = String::new();
    for i in 0..=68 {
        let t = if i % SEAT == 0 {
            ends[i / SEAT]
        } else {
            simples.next().unwrap()
        };
        draws += &t.to_string();
    }

    let mut rd = new_round(
        rule,
        &WallTemplate {
            hands: ["m23468p2468s2468", "", "", ""],
            draws: &draws,
            ..Default::default()
        },
    );
    play_until_end(&mut rd);

    let e = draw_result(&rd);
    assert_eq!(e.draw_type, DrawType::Kouhaiheikyoku);
    assert_eq!(e.nagashimangans, [true, false, false, false]);
    // 親の満貫ツモ相当
    assert_eq!(e.delta_scores, [12000, -4000, -4000, -4000]);
    assert_eq!(rd.stage().players[0].discards.len(), 18);
}

#[test]
fn test_kyushukyuhai() {
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: ["m19p19s19z1234567", "", "", ""],
            draws: "m2",
            ..Default::default()
        },
    );
    assert!(rd.action(0).contains(&Action::kyushukyuhai()));
    rd.declare_kyushukyuhai().unwrap();

    let e = draw_result(&rd);
    assert_eq!(e.draw_type, DrawType::Kyushukyuhai);
    assert_eq!(e.delta_scores, [0; SEAT]);
    assert!(rd.pending().is_empty());

    // 2巡目以降は宣言できない
    let mut rd = new_round(
        rule_for_test(),
        &WallTemplate {
            hands: ["m19p19s19z1234567", "", "", ""],
            draws: "m2z1z1z1m3",
            ..Default::default()
        },
    );
    for _ in 0..SEAT {
        tsumogiri(&mut rd);
    }
    assert_eq!(rd.stage().turn, 0);
    assert!(!rd.action(0).contains(&Action::kyushukyuhai()));
    assert!(matches!(
        rd.declare_kyushukyuhai(),
        Err(RoundError::IllegalAction { .. })
    ));
}
