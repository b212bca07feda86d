use rand::prelude::*;

use super::*;

pub struct RandomDiscardBuilder;

impl ActorBuilder for RandomDiscardBuilder {
    fn get_default_config(&self) -> Config {
        Config {
            name: "RandomDiscard".to_string(),
            args: vec![Arg::int("seed", 0)],
        }
    }

    fn create(&self, config: Config) -> Box<dyn Actor> {
        Box::new(RandomDiscard::from_config(config))
    }
}

// 和了できる場合は和了, それ以外は手牌からランダムに打牌
#[derive(Clone)]
pub struct RandomDiscard {
    config: Config,
    rng: StdRng,
    seat: Seat,
}

impl RandomDiscard {
    pub fn from_config(config: Config) -> Self {
        let seed = config.args[0].value.as_int() as u64;
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            seat: NO_SEAT,
        }
    }
}

impl Actor for RandomDiscard {
    fn init(&mut self, seat: Seat) {
        self.seat = seat;
    }

    fn select_action(&mut self, stg: &Stage, acts: &[Action]) -> Action {
        let win = |a: &&Action| matches!(a.action_type, ActionType::Tsumo | ActionType::Ron);
        if let Some(a) = acts.iter().find(win) {
            return a.clone();
        }

        if let Some(d) = acts.iter().find(|a| a.action_type == ActionType::Discard) {
            let hand = stg.players[self.seat].hand_tiles();
            let candidates: Vec<&Tile> = hand.iter().filter(|t| !d.tiles.contains(t)).collect();
            if let Some(&&t) = candidates.choose(&mut self.rng) {
                return Action::discard(t);
            }
        }

        Action::nop()
    }

    fn get_config(&self) -> &Config {
        &self.config
    }
}

impl Listener for RandomDiscard {}
