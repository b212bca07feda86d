use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::control::common::normalize_table;
use crate::model::*;
use crate::util::misc::cartesian_product;

use BlockType::*;

// 手牌の分解で切り出される牌のまとまり
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BlockType {
    Koutsu,  // 刻子
    Shuntsu, // 順子
    Toitsu,  // 対子
    Ryanmen, // 両面
    Penchan, // 辺張
    Kanchan, // 嵌張
}

// (種別, 先頭の牌)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Block(pub BlockType, pub Tile);

impl Block {
    pub fn tiles(&self) -> Vec<Tile> {
        let ti = self.1 .0;
        row_block_tiles(self.0, self.1 .1)
            .into_iter()
            .map(|ni| Tile(ti, ni))
            .collect()
    }

    // 面子
    #[inline]
    pub fn is_set(&self) -> bool {
        matches!(self.0, Koutsu | Shuntsu)
    }

    // 搭子を完成させる牌 (対子の場合は刻子にする牌)
    pub fn waiting_tiles(&self) -> Vec<Tile> {
        let Tile(ti, ni) = self.1;
        match self.0 {
            Koutsu | Shuntsu => vec![],
            Toitsu => vec![self.1],
            Ryanmen => vec![Tile(ti, ni - 1), Tile(ti, ni + 2)],
            Penchan => {
                if ni == 1 {
                    vec![Tile(ti, 3)]
                } else {
                    vec![Tile(ti, 7)]
                }
            }
            Kanchan => vec![Tile(ti, ni + 1)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Decomposed {
    pub blocks: Vec<Block>, // 昇順
    pub rest: TileTable,    // どのブロックにも属さない牌
}

impl Decomposed {
    // ブロックと残りの牌を合わせたテーブル
    pub fn to_tile_table(&self) -> TileTable {
        let mut tt = self.rest;
        for b in &self.blocks {
            for t in b.tiles() {
                tt[t.0][t.1] += 1;
            }
        }
        tt
    }

    pub fn count_blocks(&self, bt: BlockType) -> usize {
        self.blocks.iter().filter(|b| b.0 == bt).count()
    }
}

// 手牌を面子,対子,搭子と残りの牌に分解したすべての組み合わせを返却
// 赤5は通常の5として扱う
pub fn decompose(hand: &TileTable) -> Vec<Decomposed> {
    let hand = normalize_table(hand);
    let (blocks, isolated, rest) = isolate(&hand);

    let mut memo = RowMemo::default();
    let mut res = vec![];
    for d in select_pair(&rest, &mut memo) {
        let mut bs = blocks.clone();
        bs.extend(d.blocks);
        bs.sort();
        let mut rest = d.rest;
        for ti in 0..TYPE {
            for ni in 1..TNUM {
                rest[ti][ni] += isolated[ti][ni];
            }
        }
        res.push(Decomposed { blocks: bs, rest });
    }

    let mut seen = HashSet::new();
    res.into_iter().filter(|d| seen.insert(d.clone())).collect()
}

// 他の牌と組み合わせようがない刻子,順子,孤立牌を先に取り除く
// (ブロック, 孤立牌, 残りの牌)
fn isolate(hand: &TileTable) -> (Vec<Block>, TileTable, TileTable) {
    let mut tt = *hand;
    let mut isolated = TileTable::default();
    let mut blocks = vec![];

    for ti in 0..TZ {
        let tr = &mut tt[ti];
        for ni in 1..TNUM {
            if tr[ni] >= 3 && is_alone(tr, ni, &[-2, -1, 1, 2]) {
                tr[ni] -= 3;
                blocks.push(Block(Koutsu, Tile(ti, ni)));
            }
            if ni <= 7
                && tr[ni] == 1
                && tr[ni + 1] == 1
                && tr[ni + 2] == 1
                && is_alone(tr, ni, &[-2, -1, 3, 4])
            {
                tr[ni] = 0;
                tr[ni + 1] = 0;
                tr[ni + 2] = 0;
                blocks.push(Block(Shuntsu, Tile(ti, ni)));
            }
            if tr[ni] == 1 && is_alone(tr, ni, &[-2, -1, 1, 2]) {
                tr[ni] = 0;
                isolated[ti][ni] = 1;
            }
        }
    }

    for ni in WE..=DR {
        if tt[TZ][ni] >= 3 {
            tt[TZ][ni] -= 3;
            blocks.push(Block(Koutsu, Tile(TZ, ni)));
        }
        if tt[TZ][ni] == 1 {
            tt[TZ][ni] = 0;
            isolated[TZ][ni] = 1;
        }
    }

    (blocks, isolated, tt)
}

fn is_alone(tr: &TileRow, ni: Tnum, offsets: &[isize]) -> bool {
    offsets.iter().all(|&d| {
        let n = ni as isize + d;
        !(1..=9).contains(&n) || tr[n as usize] == 0
    })
}

// 雀頭の候補をそれぞれ抜き出した分解と雀頭なしの分解
fn select_pair(tt: &TileTable, memo: &mut RowMemo) -> Vec<Decomposed> {
    let mut res = vec![];
    for ti in 0..TYPE {
        for ni in 1..TNUM {
            if tt[ti][ni] >= 2 {
                let mut tt2 = *tt;
                tt2[ti][ni] -= 2;
                for mut d in extract_blocks(&tt2, memo) {
                    d.blocks.push(Block(Toitsu, Tile(ti, ni)));
                    res.push(d);
                }
            }
        }
    }
    res.extend(extract_blocks(tt, memo));
    res
}

// 数牌は種類ごとに分解して組み合わせる
fn extract_blocks(tt: &TileTable, memo: &mut RowMemo) -> Vec<Decomposed> {
    let rows: Vec<Vec<RowDecomposed>> = (0..TZ).map(|ti| memo.decompose_row(&tt[ti])).collect();

    // 字牌は孤立牌と刻子を除去済みなので対子のみ
    let mut honor_blocks = vec![];
    let mut honor_rest = tt[TZ];
    for ni in WE..=DR {
        if honor_rest[ni] >= 2 {
            honor_rest[ni] -= 2;
            honor_blocks.push(Block(Toitsu, Tile(TZ, ni)));
        }
    }

    let mut res = vec![];
    for combo in cartesian_product(&rows) {
        let mut blocks = honor_blocks.clone();
        let mut rest = TileTable::default();
        for (ti, rd) in combo.iter().enumerate() {
            blocks.extend(rd.blocks.iter().map(|&(bt, ni)| Block(bt, Tile(ti, ni))));
            rest[ti] = rd.rest;
        }
        rest[TZ] = honor_rest;
        res.push(Decomposed { blocks, rest });
    }
    res
}

fn row_block_tiles(bt: BlockType, ni: Tnum) -> Vec<Tnum> {
    match bt {
        Koutsu => vec![ni, ni, ni],
        Shuntsu => vec![ni, ni + 1, ni + 2],
        Toitsu => vec![ni, ni],
        Ryanmen | Penchan => vec![ni, ni + 1],
        Kanchan => vec![ni, ni + 2],
    }
}

type RowBlock = (BlockType, Tnum);
type RowSplit = (Vec<RowBlock>, TileRow);

#[derive(Debug, Clone, PartialEq, Eq)]
struct RowDecomposed {
    blocks: Vec<RowBlock>,
    rest: TileRow,
}

// 1種類の数牌の分解結果は他の種類と独立なので,牌の並びをキーにしてキャッシュ
#[derive(Debug, Default)]
struct RowMemo {
    rows: HashMap<TileRow, Vec<RowDecomposed>>,
    sets: HashMap<TileRow, Vec<RowSplit>>,
    tatsus: HashMap<(TileRow, usize), Vec<RowSplit>>,
}

impl RowMemo {
    fn decompose_row(&mut self, tr: &TileRow) -> Vec<RowDecomposed> {
        if let Some(v) = self.rows.get(tr) {
            return v.clone();
        }

        let mut res = vec![];
        for (sets, rest) in self.extract_sets(tr) {
            // 面子と搭子は合わせて4つまで
            let n = 4usize.saturating_sub(sets.len());
            for (tatsus, rest2) in self.extract_tatsus(&rest, n) {
                let mut blocks = sets.clone();
                blocks.extend(tatsus);
                blocks.sort();
                res.push(RowDecomposed {
                    blocks,
                    rest: rest2,
                });
            }
        }
        res.sort_by(|a, b| (&a.blocks, a.rest).cmp(&(&b.blocks, b.rest)));
        res.dedup();

        self.rows.insert(*tr, res.clone());
        res
    }

    // 刻子と順子を再帰的に切り出す
    // 刻子,順子のどちらかが切り出せない局面では,そこで切り出しを止めた分解も候補に含める
    fn extract_sets(&mut self, tr: &TileRow) -> Vec<RowSplit> {
        if let Some(v) = self.sets.get(tr) {
            return v.clone();
        }

        let mut kotsu = vec![];
        let mut shuntsu = vec![];
        for ni in 1..TNUM {
            if tr[ni] >= 3 {
                let mut tr2 = *tr;
                tr2[ni] -= 3;
                for (mut bs, rest) in self.extract_sets(&tr2) {
                    bs.push((Koutsu, ni));
                    kotsu.push((bs, rest));
                }
            }
            if ni <= 7 && tr[ni] > 0 && tr[ni + 1] > 0 && tr[ni + 2] > 0 {
                let mut tr2 = *tr;
                tr2[ni] -= 1;
                tr2[ni + 1] -= 1;
                tr2[ni + 2] -= 1;
                for (mut bs, rest) in self.extract_sets(&tr2) {
                    bs.push((Shuntsu, ni));
                    shuntsu.push((bs, rest));
                }
            }
        }

        let stop = kotsu.is_empty() || shuntsu.is_empty();
        let mut res = kotsu;
        res.extend(shuntsu);
        if stop {
            res.push((vec![], *tr));
        }
        normalize_splits(&mut res);

        self.sets.insert(*tr, res.clone());
        res
    }

    // 搭子(対子,両面,辺張,嵌張)を最大n個まで切り出す
    fn extract_tatsus(&mut self, tr: &TileRow, n: usize) -> Vec<RowSplit> {
        if let Some(v) = self.tatsus.get(&(*tr, n)) {
            return v.clone();
        }

        let mut res = vec![];
        if n > 0 {
            let mut candidates = vec![];
            for ni in 1..TNUM {
                if tr[ni] >= 2 {
                    candidates.push((Toitsu, ni));
                }
                if ni <= 8 && tr[ni] > 0 && tr[ni + 1] > 0 {
                    let bt = if ni == 1 || ni == 8 { Penchan } else { Ryanmen };
                    candidates.push((bt, ni));
                }
                if ni <= 7 && tr[ni] > 0 && tr[ni + 2] > 0 {
                    candidates.push((Kanchan, ni));
                }
            }

            for (bt, ni) in candidates {
                let mut tr2 = *tr;
                for n2 in row_block_tiles(bt, ni) {
                    tr2[n2] -= 1;
                }
                for (mut bs, rest) in self.extract_tatsus(&tr2, n - 1) {
                    bs.push((bt, ni));
                    res.push((bs, rest));
                }
            }
        }
        if res.is_empty() {
            res.push((vec![], *tr));
        }
        normalize_splits(&mut res);

        self.tatsus.insert((*tr, n), res.clone());
        res
    }
}

// 切り出し順が異なるだけの重複を除去
fn normalize_splits(splits: &mut Vec<RowSplit>) {
    for (bs, _) in splits.iter_mut() {
        bs.sort();
    }
    splits.sort();
    splits.dedup();
}

#[cfg(test)]
mod tests {
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    use super::*;
    use crate::control::common::tiles_to_tile_table;
    use crate::control::string::tiles_from_string;

    fn table(exp: &str) -> TileTable {
        tiles_to_tile_table(&tiles_from_string(exp).unwrap())
    }

    fn random_hand(rng: &mut rand::rngs::StdRng, n: usize) -> TileTable {
        let mut pool = vec![];
        for ti in 0..TYPE {
            for ni in 1..TNUM {
                if ti == TZ && ni > DR {
                    continue;
                }
                for _ in 0..TILE {
                    pool.push(Tile(ti, ni));
                }
            }
        }
        pool.shuffle(rng);
        tiles_to_tile_table(&pool[..n])
    }

    #[test]
    fn test_decompose_isolated() {
        let hand = table("m123p456s789z11122");
        let res = decompose(&hand);
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].blocks.len(), 5);
        assert_eq!(res[0].count_blocks(Toitsu), 1);
        assert_eq!(res[0].rest, TileTable::default());
    }

    #[test]
    fn test_decompose_nine_gates() {
        let hand = table("m1112345678999");
        let res = decompose(&hand);
        // 4面子+孤立牌に分解できるものが含まれる
        assert!(res
            .iter()
            .any(|d| d.blocks.iter().filter(|b| b.is_set()).count() == 4));
        // 1雀頭3面子+搭子
        assert!(res.iter().any(|d| {
            d.blocks.iter().filter(|b| b.is_set()).count() == 3 && d.count_blocks(Toitsu) >= 1
        }));
    }

    #[test]
    fn test_decompose_conservation_and_dedup() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for i in 0..300 {
            let n = if i % 2 == 0 { 13 } else { 14 };
            let hand = random_hand(&mut rng, n);
            let res = decompose(&hand);
            assert!(!res.is_empty());

            let mut seen = HashSet::new();
            for d in &res {
                assert_eq!(d.to_tile_table(), hand, "{:?}", d);
                assert!(seen.insert(d.clone()), "duplicated: {:?}", d);
            }
        }
    }

    #[test]
    fn test_decompose_red5() {
        let res = decompose(&table("m406p406s406z77"));
        assert!(res.iter().all(|d| d.to_tile_table() == table("m456p456s456z77")));
    }
}
