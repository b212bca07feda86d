use crate::actor::Actor;
use crate::control::round::Round;
use crate::error::RoundError;
use crate::model::*;

// Actorに操作を問い合わせながら局が終了するまで進行
pub fn run_round(
    round: &mut Round,
    actors: &mut [Box<dyn Actor>; SEAT],
) -> Result<RoundResult, RoundError> {
    for (s, a) in actors.iter_mut().enumerate() {
        a.init(s);
    }

    while !round.is_ended() {
        let pending = round.pending();
        if pending.is_empty() {
            break;
        }
        for a in actors.iter_mut() {
            a.notify_actions(round.stage(), &pending);
        }

        // 鳴き,ロンの応答は全員分が揃った時点で解決される
        for pa in &pending {
            let act = actors[pa.seat].select_action(round.stage(), &pa.actions);
            round.do_action(pa.seat, act)?;
        }
    }

    round.result().cloned().ok_or(RoundError::RoundEnded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::create_actor;
    use crate::control::round::RoundSetup;

    #[test]
    fn test_run_round_with_nop() {
        let mut actors = [
            create_actor("Nop").unwrap(),
            create_actor("Nop").unwrap(),
            create_actor("Nop").unwrap(),
            create_actor("Nop").unwrap(),
        ];
        let setup = RoundSetup {
            seed: 7,
            ..Default::default()
        };
        let mut round = Round::new(Rule::default(), setup, vec![]).unwrap();
        let res = run_round(&mut round, &mut actors).unwrap();
        assert!(round.is_ended());
        // ツモ切りのみなので和了は発生しない
        assert!(matches!(res, RoundResult::Draw(_)));
    }
}
