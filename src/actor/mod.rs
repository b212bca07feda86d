mod nop;
mod random;

use std::fmt;

use crate::listener::Listener;
use crate::model::*;
use crate::util::misc::Res;
use crate::util::variant::*;

pub use nop::Nop;
pub use random::RandomDiscard;

#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    pub args: Vec<Arg>,
}

// Actor trait
pub trait Actor: Listener + ActorClone + Send {
    // 局開始時の初期化処理
    fn init(&mut self, _seat: Seat) {}

    // 提供されたアクションの中から1つを選択
    // Discard, Riichiの扱いはActionTypeのコメントを参照
    fn select_action(&mut self, stg: &Stage, acts: &[Action]) -> Action;

    // Actorの詳細表示用
    fn get_config(&self) -> &Config;
}

impl fmt::Debug for dyn Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conf = self.get_config();
        let arg_str = conf
            .args
            .iter()
            .map(|a| format!("{}={}", a.name, a.value))
            .collect::<Vec<String>>()
            .join(",");
        write!(f, "{}({})", conf.name, arg_str)
    }
}

// https://stackoverflow.com/questions/30353462/how-to-clone-a-struct-storing-a-boxed-trait-object
pub trait ActorClone {
    fn clone_box(&self) -> Box<dyn Actor>;
}

impl<T> ActorClone for T
where
    T: 'static + Actor + Clone,
{
    fn clone_box(&self) -> Box<dyn Actor> {
        Box::new(self.clone())
    }
}

trait ActorBuilder {
    fn get_default_config(&self) -> Config;
    fn create(&self, config: Config) -> Box<dyn Actor>;
}

// "RandomDiscard(42)" のような文字列からActorを生成
// 空の引数はデフォルト値を使用
pub fn create_actor(exp: &str) -> Res<Box<dyn Actor>> {
    let builders: Vec<Box<dyn ActorBuilder>> = vec![
        Box::new(nop::NopBuilder {}),
        Box::new(random::RandomDiscardBuilder {}),
    ];

    let name: &str;
    let args: Vec<&str>;
    let paren_left = exp.find('(');
    let paren_right = exp.rfind(')');
    if let (Some(l), Some(r)) = (paren_left, paren_right) {
        if r < l {
            return Err(format!("invalid paren: {}", exp).into());
        }

        args = exp[l + 1..r].split(',').map(|a| a.trim()).collect();
        name = &exp[..l];
    } else {
        args = vec![];
        name = exp;
    }

    for b in &builders {
        let mut conf = b.get_default_config();
        if name == conf.name {
            if conf.args.len() < args.len() && args.iter().any(|a| !a.is_empty()) {
                return Err(format!(
                    "expected {} arguments for {}. but {} arguments are provided.",
                    conf.args.len(),
                    name,
                    args.len(),
                )
                .into());
            }

            for (i, &a) in args.iter().enumerate() {
                if !a.is_empty() {
                    conf.args[i].value = parse_as(&conf.args[i].value, a)?;
                }
            }

            return Ok(b.create(conf));
        }
    }

    Err(format!("unknown actor name: {}", name).into())
}

fn parse_as(target: &Variant, value: &str) -> Res<Variant> {
    Ok(match target {
        Variant::Int(_) => Variant::Int(value.parse::<i64>()?),
        Variant::Bool(_) => Variant::Bool(value.parse::<bool>()?),
        Variant::String(_) => Variant::String(value.to_string()),
    })
}
