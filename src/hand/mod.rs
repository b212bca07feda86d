// 手牌の分解, シャンテン数, 役や点数計算を行うモジュール
mod decompose;
mod evaluate;
mod parse;
mod point;
mod shanten;
mod yaku;

pub use self::{
    decompose::{decompose, Block, BlockType, Decomposed},
    evaluate::{evaluate_hand, evaluate_hand_ron, evaluate_hand_tsumo, Evaluation},
    parse::{parse_into_normal_win, ParsedHand, SetPair, SetPairType, WaitType},
    point::{calc_base_point, calc_points, get_score_title},
    shanten::{
        calc_chiitoitsu_shanten, calc_discards_to_tenpai, calc_effective_tiles,
        calc_kokushimusou_shanten, calc_normal_shanten, calc_normal_tenpai, calc_shanten,
        calc_shanten_by_discard, calc_shanten_of, calc_waits_of, calc_winning_tiles,
    },
    yaku::{WinShape, YakuFlags},
};
