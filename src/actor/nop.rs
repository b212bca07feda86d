use super::*;

pub struct NopBuilder;

impl ActorBuilder for NopBuilder {
    fn get_default_config(&self) -> Config {
        Config {
            name: "Nop".to_string(),
            args: vec![],
        }
    }

    fn create(&self, config: Config) -> Box<dyn Actor> {
        Box::new(Nop::from_config(config))
    }
}

// 常にツモ切り,鳴き・ロンはスキップ
#[derive(Clone)]
pub struct Nop {
    config: Config,
    seat: Seat,
}

impl Nop {
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            seat: NO_SEAT,
        }
    }
}

impl Actor for Nop {
    fn init(&mut self, seat: Seat) {
        self.seat = seat;
    }

    fn select_action(&mut self, stg: &Stage, acts: &[Action]) -> Action {
        let nop = Action::nop();
        if acts.contains(&nop) {
            return nop;
        }

        // チー,ポンの後はツモ牌がないので喰い替えにならない最初の牌を打牌
        if let Some(d) = acts.iter().find(|a| a.action_type == ActionType::Discard) {
            let hand = stg.players[self.seat].hand_tiles();
            if let Some(&t) = hand.iter().find(|t| !d.tiles.contains(t)) {
                return Action::discard(t);
            }
        }
        nop
    }

    fn get_config(&self) -> &Config {
        &self.config
    }
}

impl Listener for Nop {}
