use super::*;
use crate::util::misc::vec_to_string;

#[derive(Debug, Default, Clone, Serialize)]
pub struct Stage {
    pub rule: Rule,                                  // ルール
    pub prevalent_wind: Tnum,                        // 場風 (WE~WN)
    pub dealer: Seat,                                // 親のseat
    pub turn: Seat,                                  // ツモ番のプレイヤーの座席
    pub step: usize,                                 // ステップ 操作毎に+1する
    pub jun: usize,                                  // 巡目 親のツモで+1する
    pub wall_count: usize,                           // 牌山の残り枚数 (王牌を除く)
    pub n_kan: usize,                                // 槓の数
    pub doras: Vec<Tile>,                            // ドラ表示牌
    pub discards: Vec<(Seat, Index)>,                // プレイヤー全員の捨て牌
    pub last_tile: Option<(Seat, ActionType, Tile)>, // 他家にロンされる可能性のある牌(捨て牌,槍槓)
    pub last_riichi: Option<Seat>,                   // ロンされずに成立するのを待っているリーチ
    pub is_first_go_around: bool,                    // 鳴きの入っていない第一巡
    pub players: [Player; SEAT],                     // 各プレイヤー情報
}

impl Stage {
    #[inline]
    pub fn get_prevalent_wind(&self) -> Tnum {
        self.prevalent_wind
    }

    pub fn disable_ippatsu(&mut self) {
        for pl in &mut self.players {
            pl.disable_ippatsu();
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "prevalent_wind: {}, dealer: {}, jun: {}, n_kan: {}",
            self.prevalent_wind, self.dealer, self.jun, self.n_kan,
        )?;
        writeln!(
            f,
            "turn: {}, wall_count: {}, doras: {}, last_tile: {:?}",
            self.turn,
            self.wall_count,
            vec_to_string(&self.doras),
            self.last_tile,
        )?;

        let boader = "-".to_string().repeat(80);
        write!(f, "{}", boader)?;
        for p in &self.players {
            writeln!(f)?;
            writeln!(f, "{}", p)?;
            write!(f, "{}", boader)?;
        }
        writeln!(f)
    }
}
