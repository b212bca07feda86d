use log::{debug, info};

use super::Listener;
use crate::model::*;
use crate::util::misc::vec_to_string;

// [EventPrinter]
// 全てのイベントをlogに出力
#[derive(Debug, Default)]
pub struct EventPrinter {
    print_stage: bool, // イベント毎に卓の状態を出力
}

impl EventPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage() -> Self {
        Self { print_stage: true }
    }
}

impl Listener for EventPrinter {
    fn notify_event(&mut self, stg: &Stage, event: &Event) {
        use Event::*;
        let step = stg.step;
        match event {
            New(e) => {
                info!(
                    "(step:{}) New wind={} dealer={} doras={}",
                    step,
                    e.prevalent_wind,
                    e.dealer,
                    vec_to_string(&e.doras)
                );
            }
            Deal(e) => {
                debug!("(step:{}) Deal seat={} {}", step, e.seat, e.tile);
            }
            Discard(e) => {
                debug!(
                    "(step:{}) Discard seat={} {}{}",
                    step,
                    e.seat,
                    e.tile,
                    if e.is_riichi { " riichi" } else { "" }
                );
            }
            Meld(e) => {
                debug!(
                    "(step:{}) Meld seat={} {:?} {}",
                    step,
                    e.seat,
                    e.meld_type,
                    vec_to_string(&e.consumed)
                );
            }
            Dora(e) => {
                debug!("(step:{}) Dora {}", step, e.tile);
            }
            Win(e) => {
                info!(
                    "(step:{}) Win loser={:?} ura_doras={}",
                    step,
                    e.loser,
                    vec_to_string(&e.ura_doras)
                );
                for ctx in &e.contexts {
                    let sc = &ctx.score_context;
                    let yakus: Vec<String> =
                        sc.yakus.iter().map(|y| format!("{}({})", y.kind, y.fan)).collect();
                    info!(
                        "seat={} {} {}fu {}fan {} {:?}",
                        ctx.seat,
                        yakus.join(" "),
                        sc.fu,
                        sc.fan,
                        sc.score,
                        sc.points
                    );
                }
            }
            Draw(e) => {
                info!(
                    "(step:{}) Draw {} tenpais={:?} delta_scores={:?}",
                    step, e.draw_type, e.tenpais, e.delta_scores
                );
            }
        }

        if self.print_stage {
            debug!("{}", stg);
        }
    }
}
