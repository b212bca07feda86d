use log::{debug, info, warn};

use super::common::*;
use super::possible_actions::*;
use super::wall::*;
use crate::error::RoundError;
use crate::hand::*;
use crate::listener::Listener;
use crate::model::*;

use ActionType::{Ankan, Chi, Kakan, Kyushukyuhai, Minkan, Nop, Pon, Ron, Tsumo};
use TileState::*;

// 局の開始条件
#[derive(Debug, Clone)]
pub struct RoundSetup {
    pub prevalent_wind: Tnum,    // 場風 (WE~WN)
    pub dealer: Seat,            // 親
    pub seed: u64,               // 牌山生成用のシード値 (wallを指定した場合は未使用)
    pub wall: Option<Vec<Tile>>, // 作為的な牌山 (136枚)
}

impl Default for RoundSetup {
    fn default() -> Self {
        Self {
            prevalent_wind: WE,
            dealer: 0,
            seed: 0,
            wall: None,
        }
    }
}

// 応答待ちの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    // ツモ番のプレイヤーの操作待ち
    Turn {
        seat: Seat,
        melding: Option<Action>, // 直前のチー,ポン (喰い替え判定用)
        acts: Vec<Action>,
    },
    // 打牌(または加槓,暗槓)に対する他家の操作待ち
    Call {
        seat: Seat, // 打牌したプレイヤー
        source: ActionType,
        tile: Tile,
        acts: [Vec<Action>; SEAT],
        selected: [Option<Action>; SEAT],
    },
    Ended,
}

// 1局分の進行を管理する状態機械
// 外部からはpending()で応答待ちの操作を確認し, do_action()で選択した操作を適用する
#[derive(Debug)]
pub struct Round {
    stg: Stage,
    wall: Vec<Tile>,
    tiles: Vec<TileInfo>,          // 牌山の各牌の来歴 (TileIdでアクセス)
    hand_ids: [Vec<TileId>; SEAT], // 各プレイヤーの手牌のTileId
    drawn_id: Option<TileId>,      // ツモ牌のTileId
    live_pos: usize,               // 次にツモる牌の位置
    n_replacement: usize,          // ツモった嶺上牌の数
    pending_doras: usize,          // 打牌後にめくる槓ドラの数 (明槓,加槓)
    is_suukansanra: bool,          // 次の打牌が通れば四槓散了
    listeners: Vec<Box<dyn Listener>>,
    phase: Phase,
    result: Option<RoundResult>,
}

impl Round {
    pub fn new(
        rule: Rule,
        setup: RoundSetup,
        listeners: Vec<Box<dyn Listener>>,
    ) -> Result<Self, RoundError> {
        if !(WE..=WN).contains(&setup.prevalent_wind) {
            return Err(RoundError::InvalidSetup(format!(
                "prevalent_wind: {}",
                setup.prevalent_wind
            )));
        }
        if setup.dealer >= SEAT {
            return Err(RoundError::InvalidSetup(format!("dealer: {}", setup.dealer)));
        }
        let wall = match setup.wall {
            Some(w) => {
                validate_wall(&w, rule.red5)?;
                w
            }
            None => create_wall(setup.seed, rule.red5),
        };

        let mut stg = Stage {
            rule,
            prevalent_wind: setup.prevalent_wind,
            dealer: setup.dealer,
            turn: setup.dealer,
            wall_count: LIVE_WALL - HAND * SEAT,
            is_first_go_around: true,
            ..Default::default()
        };
        for s in 0..SEAT {
            stg.players[s] = Player::new(s);
        }

        let mut rd = Self {
            stg,
            tiles: wall.iter().map(|&t| TileInfo::new(t)).collect(),
            wall,
            hand_ids: Default::default(),
            drawn_id: None,
            live_pos: HAND * SEAT,
            n_replacement: 0,
            pending_doras: 0,
            is_suukansanra: false,
            listeners,
            phase: Phase::Ended,
            result: None,
        };

        // 配牌 親から13枚ずつ
        for i in 0..SEAT {
            let s = (setup.dealer + i) % SEAT;
            for id in HAND * i..HAND * (i + 1) {
                rd.tiles[id].state = H(s);
                rd.tiles[id].drawn_by = Some(s);
                rd.hand_ids[s].push(id);
                inc_tile(&mut rd.stg.players[s].hand, rd.wall[id]);
            }
            let pl = &mut rd.stg.players[s];
            pl.winning_tiles = calc_winning_tiles(&pl.hand, 0);
        }

        let id = dora_pos(0);
        rd.tiles[id].state = R;
        rd.stg.doras.push(rd.wall[id]);

        let hands: [Vec<Tile>; SEAT] = std::array::from_fn(|s| rd.stg.players[s].hand_tiles());
        info!(
            "round start: prevalent_wind={}, dealer={}, dora={}",
            rd.stg.prevalent_wind, rd.stg.dealer, rd.stg.doras[0]
        );
        let event = Event::new(
            rd.stg.prevalent_wind,
            rd.stg.dealer,
            rd.stg.doras.clone(),
            hands,
            rd.stg.wall_count,
        );
        rd.handle_event(event);

        let dealer = rd.stg.dealer;
        rd.deal_tile(dealer, false);
        rd.start_turn(dealer, None)?;
        Ok(rd)
    }

    #[inline]
    pub fn stage(&self) -> &Stage {
        &self.stg
    }

    #[inline]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[inline]
    pub fn result(&self) -> Option<&RoundResult> {
        self.result.as_ref()
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    #[inline]
    pub fn tile_info(&self, id: TileId) -> Option<&TileInfo> {
        self.tiles.get(id)
    }

    // seatから見えていない牌の枚数 (自分の手牌,鳴き,河,ドラ表示牌以外)
    pub fn count_unseen(&self, seat: Seat, tile: Tile) -> usize {
        let t = tile.to_normal();
        let visible = self
            .tiles
            .iter()
            .filter(|ti| ti.tile.to_normal() == t)
            .filter(|ti| match ti.state {
                H(s) => s == seat,
                M(_, _) | D(_, _) | R => true,
                U => false,
            })
            .count();
        TILE - visible
    }

    // 応答待ちのプレイヤーと選択可能な操作の一覧 (Nopしか選択肢がないプレイヤーは含まない)
    pub fn pending(&self) -> Vec<PendingAction> {
        match &self.phase {
            Phase::Turn { seat, acts, .. } => vec![PendingAction {
                seat: *seat,
                actions: acts.clone(),
            }],
            Phase::Call { acts, selected, .. } => (0..SEAT)
                .filter(|&s| acts[s].len() > 1 && selected[s].is_none())
                .map(|s| PendingAction {
                    seat: s,
                    actions: acts[s].clone(),
                })
                .collect(),
            Phase::Ended => vec![],
        }
    }

    // seatが現在選択可能な操作 (応答待ちでない場合は空)
    pub fn action(&self, seat: Seat) -> Vec<Action> {
        if seat >= SEAT {
            return vec![];
        }
        match &self.phase {
            Phase::Turn { seat: s, acts, .. } if *s == seat => acts.clone(),
            Phase::Call { acts, selected, .. } if selected[seat].is_none() => acts[seat].clone(),
            _ => vec![],
        }
    }

    pub fn do_action(&mut self, seat: Seat, act: Action) -> Result<(), RoundError> {
        if self.is_ended() {
            return Err(RoundError::RoundEnded);
        }
        let offered = self.action(seat);
        if !self.is_legal(seat, &offered, &act) {
            warn!("rejected action: seat={}, action={}, offered={:?}", seat, act, offered);
            return Err(RoundError::IllegalAction { seat, action: act });
        }

        if let Phase::Turn { .. } = self.phase {
            self.do_turn_action(seat, act)
        } else {
            self.do_call_action(seat, act)
        }
    }

    // [Shortcut]
    pub fn discard(&mut self, tile: Tile, riichi: bool) -> Result<(), RoundError> {
        let seat = self.stg.turn;
        let pl = &self.stg.players[seat];
        let act = if riichi {
            Action::riichi(tile)
        } else if pl.is_riichi() && pl.drawn == Some(tile) {
            Action::nop()
        } else {
            Action::discard(tile)
        };
        self.do_action(seat, act)
    }

    pub fn call_chi(&mut self, seat: Seat, tiles: &[Tile]) -> Result<(), RoundError> {
        self.do_action(seat, sorted_action(Chi, tiles))
    }

    pub fn call_pon(&mut self, seat: Seat, tiles: &[Tile]) -> Result<(), RoundError> {
        self.do_action(seat, sorted_action(Pon, tiles))
    }

    pub fn call_minkan(&mut self, seat: Seat, tiles: &[Tile]) -> Result<(), RoundError> {
        self.do_action(seat, sorted_action(Minkan, tiles))
    }

    pub fn declare_ankan(&mut self, tiles: &[Tile]) -> Result<(), RoundError> {
        self.do_action(self.stg.turn, sorted_action(Ankan, tiles))
    }

    pub fn declare_kakan(&mut self, tile: Tile) -> Result<(), RoundError> {
        self.do_action(self.stg.turn, Action::kakan(tile))
    }

    pub fn declare_ron(&mut self, seat: Seat) -> Result<(), RoundError> {
        self.do_action(seat, Action::ron())
    }

    pub fn declare_tsumo(&mut self) -> Result<(), RoundError> {
        self.do_action(self.stg.turn, Action::tsumo())
    }

    pub fn declare_kyushukyuhai(&mut self) -> Result<(), RoundError> {
        self.do_action(self.stg.turn, Action::kyushukyuhai())
    }

    // 応答待ちの全員が鳴き,ロンをスキップ
    pub fn decline_all(&mut self) -> Result<(), RoundError> {
        match &self.phase {
            Phase::Call { .. } => {
                for pa in self.pending() {
                    if self.is_ended() {
                        break;
                    }
                    self.do_action(pa.seat, Action::nop())?;
                }
                Ok(())
            }
            Phase::Turn { seat, .. } => Err(RoundError::IllegalAction {
                seat: *seat,
                action: Action::nop(),
            }),
            Phase::Ended => Err(RoundError::RoundEnded),
        }
    }

    // [Validation]
    fn is_legal(&self, seat: Seat, offered: &[Action], act: &Action) -> bool {
        let pl = &self.stg.players[seat.min(SEAT - 1)];
        match act.action_type {
            ActionType::Discard => {
                let t = match act.tiles.as_slice() {
                    [t] => *t,
                    _ => return false,
                };
                t.is_valid()
                    && count_tile(&pl.hand, t) > 0
                    && offered
                        .iter()
                        .any(|a| a.action_type == ActionType::Discard && !a.tiles.contains(&t))
            }
            ActionType::Riichi => {
                let t = match act.tiles.as_slice() {
                    [t] => *t,
                    [] => match pl.drawn {
                        Some(t) => t,
                        None => return false,
                    },
                    _ => return false,
                };
                offered
                    .iter()
                    .any(|a| a.action_type == ActionType::Riichi && a.tiles.contains(&t))
            }
            _ => offered.contains(act),
        }
    }

    // [Turn]
    fn start_turn(&mut self, seat: Seat, melding: Option<Action>) -> Result<(), RoundError> {
        self.stg.turn = seat;
        let acts = calc_possible_turn_actions(&self.stg, &melding)?;
        self.phase = Phase::Turn {
            seat,
            melding,
            acts,
        };
        self.notify_pending();
        Ok(())
    }

    fn do_turn_action(&mut self, seat: Seat, act: Action) -> Result<(), RoundError> {
        let drawn = self.stg.players[seat].drawn;
        match act.action_type {
            Nop => match drawn {
                Some(t) => self.discard_tile(seat, t, false),
                None => Err(RoundError::IllegalAction { seat, action: act }),
            },
            ActionType::Discard => self.discard_tile(seat, act.tiles[0], false),
            ActionType::Riichi => match act.tiles.first().copied().or(drawn) {
                Some(t) => self.discard_tile(seat, t, true),
                None => Err(RoundError::IllegalAction { seat, action: act }),
            },
            Ankan => self.ankan(seat, &act.tiles),
            Kakan => self.kakan(seat, act.tiles[0]),
            Tsumo => self.tsumo(seat),
            Kyushukyuhai => self.abort(DrawType::Kyushukyuhai),
            _ => Err(RoundError::IllegalAction { seat, action: act }),
        }
    }

    fn deal_tile(&mut self, seat: Seat, is_replacement: bool) {
        let id = if is_replacement {
            self.n_replacement += 1;
            replacement_pos(self.n_replacement - 1)
        } else {
            self.live_pos += 1;
            self.live_pos - 1
        };
        let t = self.wall[id];
        self.tiles[id].state = H(seat);
        self.tiles[id].drawn_by = Some(seat);
        self.hand_ids[seat].push(id);
        self.drawn_id = Some(id);

        let stg = &mut self.stg;
        stg.turn = seat;
        stg.wall_count = LIVE_WALL - self.live_pos - self.n_replacement;
        if !is_replacement && seat == stg.dealer {
            stg.jun += 1;
        }

        let pl = &mut stg.players[seat];
        inc_tile(&mut pl.hand, t);
        pl.drawn = Some(t);
        pl.is_rinshan = is_replacement;
        pl.tenpais = calc_discards_to_tenpai(&pl.hand, pl.melds.len());

        debug!(
            "deal: seat={}, tile={}, replacement={}, wall_count={}",
            seat, t, is_replacement, stg.wall_count
        );
        self.handle_event(Event::deal(seat, t, is_replacement));
    }

    fn discard_tile(&mut self, seat: Seat, t: Tile, is_riichi: bool) -> Result<(), RoundError> {
        let is_turn1 = is_no_meld_turn1(&self.stg, seat);
        let id = self.take_tile(seat, t)?;
        let is_drawn = self.drawn_id == Some(id);
        self.drawn_id = None;

        let stg = &mut self.stg;
        let step = stg.step;
        let pl = &mut stg.players[seat];
        let idx = pl.discards.len();
        if is_riichi {
            let (shanten, locked) = calc_normal_shanten(&normalize_table(&pl.hand), pl.melds.len());
            pl.riichi = Some(Riichi {
                index: idx,
                is_double: is_turn1,
                is_ippatsu: true,
                locked: if shanten == 0 { locked } else { vec![] },
            });
            stg.last_riichi = Some(seat);
        } else {
            pl.disable_ippatsu();
        }
        if !t.is_end() {
            pl.is_nagashimangan = false;
        }
        let tn = t.to_normal();
        pl.discarded[tn.0][tn.1] += 1;
        pl.is_furiten_other = false;
        pl.drawn = None;
        pl.is_rinshan = false;
        pl.winning_tiles = calc_winning_tiles(&pl.hand, pl.melds.len());
        pl.tenpais.clear();
        pl.discards.push(Discard {
            step,
            id,
            tile: t,
            drawn: is_drawn,
            meld: None,
        });
        stg.discards.push((seat, idx));
        stg.last_tile = Some((seat, ActionType::Discard, t));
        if seat == (stg.dealer + SEAT - 1) % SEAT {
            stg.is_first_go_around = false;
        }

        let ti = &mut self.tiles[id];
        ti.state = D(seat, idx);
        ti.turn = Some(self.stg.jun);
        ti.is_riichi = is_riichi;

        debug!(
            "discard: seat={}, tile={}, drawn={}, riichi={}",
            seat, t, is_drawn, is_riichi
        );
        self.handle_event(Event::discard(seat, t, is_drawn, is_riichi));
        self.reveal_pending_doras();

        self.open_call_window(seat, ActionType::Discard, t, !self.is_suukansanra)
    }

    fn ankan(&mut self, seat: Seat, consumed: &[Tile]) -> Result<(), RoundError> {
        let mut ids = vec![];
        for &t in consumed {
            ids.push(self.take_tile(seat, t)?);
        }
        self.drawn_id = None;

        let stg = &mut self.stg;
        let step = stg.step;
        let pl = &mut stg.players[seat];
        let idx = pl.melds.len();
        pl.melds.push(Meld {
            step,
            seat,
            meld_type: MeldType::Ankan,
            tiles: consumed.to_vec(),
            froms: vec![seat; consumed.len()],
        });
        pl.drawn = None;
        pl.winning_tiles = calc_winning_tiles(&pl.hand, pl.melds.len());
        stg.n_kan += 1;
        stg.is_first_go_around = false;
        stg.disable_ippatsu();
        for id in ids {
            self.tiles[id].state = M(seat, idx);
        }
        self.check_suukansanra_needed();

        debug!("ankan: seat={}, tiles={:?}", seat, consumed);
        self.handle_event(Event::meld(seat, MeldType::Ankan, consumed.to_vec()));

        // 暗槓の槓ドラは即時
        self.reveal_pending_doras();
        self.reveal_dora();

        // 国士無双の暗槓ロン
        let t = consumed[0].to_normal();
        self.stg.last_tile = Some((seat, Ankan, t));
        self.open_call_window(seat, Ankan, t, false)
    }

    fn kakan(&mut self, seat: Seat, t: Tile) -> Result<(), RoundError> {
        let id = self.take_tile(seat, t)?;
        self.drawn_id = None;

        let stg = &mut self.stg;
        let step = stg.step;
        let pl = &mut stg.players[seat];
        let idx = pl
            .melds
            .iter()
            .position(|m| m.meld_type == MeldType::Pon && m.tiles[0].to_normal() == t.to_normal())
            .ok_or(RoundError::IllegalAction {
                seat,
                action: Action::kakan(t),
            })?;
        let m = &mut pl.melds[idx];
        m.step = step;
        m.meld_type = MeldType::Kakan;
        m.tiles.push(t);
        m.froms.push(seat);
        pl.drawn = None;
        pl.winning_tiles = calc_winning_tiles(&pl.hand, pl.melds.len());
        stg.n_kan += 1;
        stg.is_first_go_around = false;
        self.tiles[id].state = M(seat, idx);
        self.pending_doras += 1;
        self.check_suukansanra_needed();

        debug!("kakan: seat={}, tile={}", seat, t);
        self.handle_event(Event::meld(seat, MeldType::Kakan, vec![t]));

        // 槍槓
        self.stg.last_tile = Some((seat, Kakan, t));
        self.open_call_window(seat, Kakan, t, false)
    }

    fn tsumo(&mut self, seat: Seat) -> Result<(), RoundError> {
        let ura_doras = self.ura_doras();
        let pl = &self.stg.players[seat];
        let (sc, t) = match (evaluate_hand_tsumo(&self.stg, seat, &ura_doras)?, pl.drawn) {
            (Some(sc), Some(t)) => (sc, t),
            _ => {
                return Err(RoundError::IllegalAction {
                    seat,
                    action: Action::tsumo(),
                })
            }
        };
        let ctx = self.win_context(seat, t, true, sc);
        self.finish_with_win(vec![ctx], None, ura_doras)
    }

    // [Call]
    fn open_call_window(
        &mut self,
        seat: Seat,
        source: ActionType,
        tile: Tile,
        can_meld: bool,
    ) -> Result<(), RoundError> {
        let acts = calc_possible_call_actions(&self.stg, can_meld)?;
        if acts.iter().all(|a| a.len() <= 1) {
            // Nop以外の選択肢がない場合は即時解決
            return self.resolve_calls(seat, source, tile, &acts, Default::default());
        }

        self.phase = Phase::Call {
            seat,
            source,
            tile,
            acts,
            selected: Default::default(),
        };
        self.notify_pending();
        Ok(())
    }

    fn do_call_action(&mut self, seat: Seat, act: Action) -> Result<(), RoundError> {
        if let Phase::Call { selected, .. } = &mut self.phase {
            selected[seat] = Some(act);
        }
        if !self.pending().is_empty() {
            return Ok(());
        }

        match std::mem::replace(&mut self.phase, Phase::Ended) {
            Phase::Call {
                seat,
                source,
                tile,
                acts,
                selected,
            } => self.resolve_calls(seat, source, tile, &acts, selected),
            phase => {
                self.phase = phase;
                Ok(())
            }
        }
    }

    // 全員の応答が揃った段階で優先順位に従って1つの操作を適用
    // ロン > ポン,明槓 > チー
    fn resolve_calls(
        &mut self,
        seat: Seat,
        source: ActionType,
        tile: Tile,
        acts: &[Vec<Action>; SEAT],
        selected: [Option<Action>; SEAT],
    ) -> Result<(), RoundError> {
        let selected_type = |s: Seat| selected[s].as_ref().map(|a| a.action_type);

        let rons: Vec<Seat> = head_bump_order(seat)
            .into_iter()
            .filter(|&s| selected_type(s) == Some(Ron))
            .collect();
        if !rons.is_empty() {
            let rule = &self.stg.rule;
            if rule.sanchaho && rons.len() == SEAT - 1 {
                return self.abort(DrawType::Sanchaho);
            }
            let winners = match rule.multi_ron {
                MultiRon::Multiple => rons,
                MultiRon::HeadBump => rons[..1].to_vec(),
            };
            return self.ron(seat, source, tile, &winners);
        }

        // 見逃し (暗槓は国士無双のロンが提示された場合のみ)
        let tn = tile.to_normal();
        for s in 0..SEAT {
            let is_offered = acts[s].contains(&Action::ron());
            let pl = &mut self.stg.players[s];
            let is_passed = match source {
                Ankan => is_offered,
                _ => is_offered || pl.winning_tiles.contains(&tn),
            };
            if s == seat || !is_passed {
                continue;
            }
            if pl.is_riichi() {
                pl.is_furiten_riichi = true;
            } else {
                pl.is_furiten_other = true;
            }
        }
        // ロンされなかったのでリーチ成立
        self.stg.last_riichi = None;

        match source {
            Kakan => {
                // 槍槓リーチ一発があるので加槓の成立時点で一発を消す
                self.stg.disable_ippatsu();
                self.deal_tile(seat, true);
                return self.start_turn(seat, None);
            }
            Ankan => {
                self.deal_tile(seat, true);
                return self.start_turn(seat, None);
            }
            _ => {}
        }

        let find_meld = |types: &[ActionType]| {
            head_bump_order(seat).into_iter().find_map(|s| match &selected[s] {
                Some(a) if types.contains(&a.action_type) => Some((s, a.clone())),
                _ => None,
            })
        };
        if let Some((s, act)) = find_meld(&[Pon, Minkan]).or_else(|| find_meld(&[Chi])) {
            return self.meld(seat, s, act, tile);
        }

        if let Some(dt) = self.check_abortive_draw() {
            return self.abort(dt);
        }
        if self.stg.wall_count == 0 {
            return self.exhaustive_draw();
        }

        let s = next_seat(seat);
        self.deal_tile(s, false);
        self.start_turn(s, None)
    }

    // チー,ポン,明槓
    fn meld(&mut self, from: Seat, seat: Seat, act: Action, tile: Tile) -> Result<(), RoundError> {
        let mut ids = vec![];
        for &t in &act.tiles {
            ids.push(self.take_tile(seat, t)?);
        }
        let meld_type = match act.action_type {
            Chi => MeldType::Chi,
            Pon => MeldType::Pon,
            _ => MeldType::Minkan,
        };

        let stg = &mut self.stg;
        let step = stg.step;
        let pl = &mut stg.players[seat];
        let idx = pl.melds.len();
        let mut tiles = act.tiles.clone();
        let mut froms = vec![seat; tiles.len()];
        // 昇順になるように鳴いた牌を追加
        let pos = tiles.iter().position(|t| &tile < t).unwrap_or(tiles.len());
        tiles.insert(pos, tile);
        froms.insert(pos, from);
        pl.melds.push(Meld {
            step,
            seat,
            meld_type,
            tiles,
            froms,
        });
        pl.is_menzen = false;
        pl.tenpais = calc_discards_to_tenpai(&pl.hand, pl.melds.len());

        let di = stg.players[from].discards.len() - 1;
        let discard = &mut stg.players[from].discards[di];
        discard.meld = Some((seat, idx));
        ids.push(discard.id);
        stg.players[from].is_nagashimangan = false;

        stg.disable_ippatsu();
        stg.is_first_go_around = false;
        stg.last_tile = None;
        stg.last_riichi = None;
        for id in ids {
            self.tiles[id].state = M(seat, idx);
        }
        if meld_type == MeldType::Minkan {
            self.stg.n_kan += 1;
            self.pending_doras += 1;
            self.check_suukansanra_needed();
        }

        debug!("{:?}: seat={}, tiles={:?}, from={}", meld_type, seat, act.tiles, from);
        self.handle_event(Event::meld(seat, meld_type, act.tiles.clone()));

        if meld_type == MeldType::Minkan {
            self.deal_tile(seat, true);
            self.start_turn(seat, None)
        } else {
            self.start_turn(seat, Some(act))
        }
    }

    fn ron(
        &mut self,
        seat: Seat,
        source: ActionType,
        tile: Tile,
        winners: &[Seat],
    ) -> Result<(), RoundError> {
        let ura_doras = self.ura_doras();
        let mut contexts = vec![];
        for &s in winners {
            if let Some(sc) = evaluate_hand_ron(&self.stg, s, tile, source, &ura_doras)? {
                contexts.push(self.win_context(s, tile, false, sc));
            }
        }
        self.finish_with_win(contexts, Some(seat), ura_doras)
    }

    // [Dora]
    fn reveal_dora(&mut self) {
        let id = dora_pos(self.stg.doras.len());
        let t = self.wall[id];
        self.tiles[id].state = R;
        self.stg.doras.push(t);
        debug!("dora: {}", t);
        self.handle_event(Event::dora(t));
    }

    fn reveal_pending_doras(&mut self) {
        while self.pending_doras > 0 {
            self.pending_doras -= 1;
            self.reveal_dora();
        }
    }

    fn ura_doras(&self) -> Vec<Tile> {
        (0..self.stg.doras.len())
            .map(|k| self.wall[ura_dora_pos(k)])
            .collect()
    }

    // [Round End]
    fn check_suukansanra_needed(&mut self) {
        if !self.stg.rule.suukansanra || self.stg.n_kan != MAX_KAN {
            return;
        }

        // 1人で4回槓した場合は四槓子の可能性があるので流局しない
        let by_one = self.stg.players.iter().any(|pl| {
            pl.melds
                .iter()
                .filter(|m| m.meld_type != MeldType::Chi && m.meld_type != MeldType::Pon)
                .count()
                == MAX_KAN
        });
        self.is_suukansanra = !by_one;
    }

    fn check_abortive_draw(&self) -> Option<DrawType> {
        let stg = &self.stg;
        let rule = &stg.rule;

        if rule.suufuurenda {
            let firsts: Vec<Tile> = stg
                .players
                .iter()
                .filter(|pl| pl.discards.len() == 1 && pl.melds.is_empty())
                .map(|pl| pl.discards[0].tile)
                .collect();
            if firsts.len() == SEAT && firsts[0].is_wind() && firsts.iter().all(|&t| t == firsts[0]) {
                return Some(DrawType::Suufuurenda);
            }
        }

        if rule.suuchariichi && stg.players.iter().all(|pl| pl.is_riichi()) {
            return Some(DrawType::Suuchariichi);
        }

        if self.is_suukansanra {
            return Some(DrawType::Suukansanra);
        }

        None
    }

    // 途中流局
    fn abort(&mut self, draw_type: DrawType) -> Result<(), RoundError> {
        let event = EventDraw {
            draw_type,
            hands: Default::default(),
            tenpais: [false; SEAT],
            nagashimangans: [false; SEAT],
            delta_scores: [0; SEAT],
        };
        self.finish(RoundResult::Draw(event))
    }

    // 荒廃平局
    fn exhaustive_draw(&mut self) -> Result<(), RoundError> {
        let stg = &self.stg;
        let mut hands: [Vec<Tile>; SEAT] = Default::default();
        let mut tenpais = [false; SEAT];
        let mut nagashimangans = [false; SEAT];
        for s in 0..SEAT {
            let pl = &stg.players[s];
            tenpais[s] = !pl.winning_tiles.is_empty();
            if tenpais[s] {
                hands[s] = pl.hand_tiles();
            }
            nagashimangans[s] = stg.rule.nagashimangan && pl.is_nagashimangan;
        }

        let mut delta_scores = [0; SEAT];
        if nagashimangans.iter().any(|&b| b) {
            // 流し満貫は満貫のツモ和了と同じ支払い
            for s in 0..SEAT {
                if !nagashimangans[s] {
                    continue;
                }
                let points = calc_points(is_dealer(stg, s), calc_base_point(30, 5, 0));
                for s2 in 0..SEAT {
                    if s2 == s {
                        continue;
                    }
                    let pay = if is_dealer(stg, s2) { points.2 } else { points.1 };
                    delta_scores[s2] -= pay;
                    delta_scores[s] += pay;
                }
            }
        } else {
            // 流局時の聴牌人数による得点変動
            let n_tenpai = tenpais.iter().filter(|&&b| b).count();
            let (pay, recv) = match n_tenpai {
                1 => (1000, 3000),
                2 => (1500, 1500),
                3 => (3000, 1000),
                _ => (0, 0), // 全員ノーテン, 全員聴牌
            };
            for s in 0..SEAT {
                delta_scores[s] = if tenpais[s] { recv } else { -pay };
            }
        }

        let event = EventDraw {
            draw_type: DrawType::Kouhaiheikyoku,
            hands,
            tenpais,
            nagashimangans,
            delta_scores,
        };
        self.finish(RoundResult::Draw(event))
    }

    fn finish_with_win(
        &mut self,
        contexts: Vec<WinContext>,
        loser: Option<Seat>,
        ura_doras: Vec<Tile>,
    ) -> Result<(), RoundError> {
        let event = EventWin {
            contexts,
            loser,
            doras: self.stg.doras.clone(),
            ura_doras,
        };
        self.finish(RoundResult::Win(event))
    }

    fn finish(&mut self, result: RoundResult) -> Result<(), RoundError> {
        match &result {
            RoundResult::Win(e) => {
                for ctx in &e.contexts {
                    let sc = &ctx.score_context;
                    info!(
                        "win: seat={}, loser={:?}, {}fu {}fan {} score={}",
                        ctx.seat, e.loser, sc.fu, sc.fan, sc.title, sc.score
                    );
                }
            }
            RoundResult::Draw(e) => {
                info!("draw: {}, delta_scores={:?}", e.draw_type, e.delta_scores);
            }
        }

        self.phase = Phase::Ended;
        let event = result.to_event();
        self.result = Some(result);
        self.handle_event(event);
        Ok(())
    }

    // [Utility]
    fn win_context(&self, seat: Seat, winning_tile: Tile, is_drawn: bool, sc: ScoreContext) -> WinContext {
        let pl = &self.stg.players[seat];
        let mut hand = pl.hand_tiles();
        if !is_drawn {
            hand.push(winning_tile);
            hand.sort();
        }
        WinContext {
            seat,
            hand,
            winning_tile,
            melds: pl.melds.iter().map(|m| m.tiles.clone()).collect(),
            is_dealer: is_dealer(&self.stg, seat),
            is_drawn,
            is_riichi: pl.is_riichi(),
            score_context: sc,
        }
    }

    // 手牌からtと厳密に一致する牌(赤5を区別)を取り除いてTileIdを返却
    // ツモ牌と同じ牌がある場合はツモ牌を優先
    fn take_tile(&mut self, seat: Seat, t: Tile) -> Result<TileId, RoundError> {
        let tiles = &self.tiles;
        let ids = &mut self.hand_ids[seat];
        let pos = ids
            .iter()
            .rposition(|&id| tiles[id].tile == t)
            .ok_or(RoundError::IllegalAction {
                seat,
                action: Action::discard(t),
            })?;
        let id = ids.remove(pos);
        dec_tile(&mut self.stg.players[seat].hand, t);
        Ok(id)
    }

    fn handle_event(&mut self, event: Event) {
        for l in &mut self.listeners {
            l.notify_event(&self.stg, &event);
        }
        self.stg.step += 1;
    }

    fn notify_pending(&mut self) {
        let pending = self.pending();
        for l in &mut self.listeners {
            l.notify_actions(&self.stg, &pending);
        }
    }
}

fn sorted_action(action_type: ActionType, tiles: &[Tile]) -> Action {
    let mut v = tiles.to_vec();
    v.sort();
    Action::new(action_type, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::string::tiles_from_string;

    fn new_round(tmpl: &WallTemplate) -> Round {
        let rule = Rule::default();
        let wall = create_wall_from_template(1, rule.red5, tmpl).unwrap();
        let setup = RoundSetup {
            wall: Some(wall),
            ..Default::default()
        };
        Round::new(rule, setup, vec![]).unwrap()
    }

    #[test]
    fn test_round_start() {
        let rd = Round::new(Rule::default(), RoundSetup::default(), vec![]).unwrap();
        let stg = rd.stage();
        assert_eq!(stg.wall_count, 69);
        assert_eq!(stg.doras.len(), 1);
        assert_eq!(stg.turn, 0);
        assert_eq!(count_tiles(&stg.players[0].hand), 14);
        for s in 1..SEAT {
            assert_eq!(count_tiles(&stg.players[s].hand), 13);
        }

        let pending = rd.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].seat, 0);
        assert!(pending[0].actions.contains(&Action::nop()));
    }

    #[test]
    fn test_invalid_setup() {
        let setup = RoundSetup {
            dealer: 4,
            ..Default::default()
        };
        assert!(matches!(
            Round::new(Rule::default(), setup, vec![]),
            Err(RoundError::InvalidSetup(_))
        ));

        let setup = RoundSetup {
            wall: Some(vec![]),
            ..Default::default()
        };
        assert!(matches!(
            Round::new(Rule::default(), setup, vec![]),
            Err(RoundError::InvalidWall(_))
        ));
    }

    #[test]
    fn test_illegal_action() {
        let mut rd = Round::new(Rule::default(), RoundSetup::default(), vec![]).unwrap();
        // ツモ番以外の打牌
        let t = rd.stage().players[1].hand_tiles()[0];
        assert!(matches!(
            rd.do_action(1, Action::discard(t)),
            Err(RoundError::IllegalAction { seat: 1, .. })
        ));
        // 手牌にない牌
        assert!(rd.do_action(0, Action::discard(Tile(TZ, 0))).is_err());
        assert!(rd.do_action(0, Action::ron()).is_err());
        assert!(!rd.is_ended());
    }

    #[test]
    fn test_kyushukyuhai() {
        let mut rd = new_round(&WallTemplate {
            hands: ["m19p19s19z1234567", "", "", ""],
            draws: "m2",
            ..Default::default()
        });
        assert!(rd.action(0).contains(&Action::kyushukyuhai()));
        rd.declare_kyushukyuhai().unwrap();
        assert!(rd.is_ended());
        match rd.result() {
            Some(RoundResult::Draw(e)) => assert_eq!(e.draw_type, DrawType::Kyushukyuhai),
            r => panic!("unexpected result: {:?}", r),
        }
        assert!(matches!(rd.declare_tsumo(), Err(RoundError::RoundEnded)));
    }

    #[test]
    fn test_chi_and_kuikae() {
        let mut rd = new_round(&WallTemplate {
            hands: ["m1112223334z123", "m456p123456s1117", "", ""],
            draws: "z7",
            ..Default::default()
        });
        // 親がm3を打牌 → 下家はm45でチー可能
        rd.discard(Tile(TM, 3), false).unwrap();
        let chi = Action::chi(tiles_from_string("m45").unwrap());
        assert!(rd.action(1).contains(&chi));
        rd.call_chi(1, &tiles_from_string("m45").unwrap()).unwrap();

        let stg = rd.stage();
        assert_eq!(stg.turn, 1);
        assert_eq!(stg.players[1].melds.len(), 1);
        assert_eq!(stg.players[1].melds[0].tiles, tiles_from_string("m345").unwrap());
        assert_eq!(stg.players[1].melds[0].froms, vec![0, 1, 1]);
        assert_eq!(stg.players[0].discards[0].meld, Some((1, 0)));
        assert!(!stg.players[1].is_menzen);
        assert!(!stg.is_first_go_around);

        // 喰い替え (鳴いた牌と筋の牌)
        assert!(rd.discard(Tile(TM, 6), false).is_err());
        rd.discard(Tile(TS, 7), false).unwrap();
        assert!(!rd.is_ended());
    }

    #[test]
    fn test_count_unseen() {
        let rd = new_round(&WallTemplate {
            hands: ["z1112223334445", "", "", ""],
            draws: "z5",
            doras: "z5",
            ..Default::default()
        });
        assert_eq!(rd.count_unseen(0, Tile(TZ, 1)), 1);
        // 手牌2枚 + ドラ表示牌1枚
        assert_eq!(rd.count_unseen(0, Tile(TZ, 5)), 1);
        assert_eq!(rd.count_unseen(1, Tile(TZ, 5)), 3);
    }
}
