use super::*;
use crate::util::misc::Res;

// ダブロン,トリロンの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiRon {
    Multiple, // ロン宣言者全員が和了 (供託は上家取り)
    HeadBump, // 頭ハネ 放銃者から見て最初の宣言者のみ和了
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    pub red5: usize,           // 各数牌の赤5の枚数
    pub kuitan: bool,          // 喰いタン
    pub kuikae: bool,          // 喰い替えの禁止
    pub multi_ron: MultiRon,   // ダブロン,トリロン
    pub sanchaho: bool,        // 三家和の流局
    pub kyushukyuhai: bool,    // 九種九牌の流局
    pub suufuurenda: bool,     // 四風連打の流局
    pub suuchariichi: bool,    // 四家立直の流局
    pub suukansanra: bool,     // 四槓散了の流局
    pub nagashimangan: bool,   // 流し満貫
    pub double_yakuman: bool,  // ダブル役満 (falseの場合は役満として扱う)
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            red5: 1,
            kuitan: true,
            kuikae: true,
            multi_ron: MultiRon::Multiple,
            sanchaho: false,
            kyushukyuhai: true,
            suufuurenda: true,
            suuchariichi: true,
            suukansanra: true,
            nagashimangan: true,
            double_yakuman: true,
        }
    }
}

impl Rule {
    pub fn from_json(s: &str) -> Res<Self> {
        let rule: Self = serde_json::from_str(s)?;
        if rule.red5 > 4 {
            return Err(format!("invalid red5: {}", rule.red5).into());
        }
        Ok(rule)
    }
}

#[test]
fn test_rule_from_json() {
    let rule = Rule::from_json(r#"{"red5": 0, "multi_ron": "HeadBump"}"#).unwrap();
    assert_eq!(rule.red5, 0);
    assert_eq!(rule.multi_ron, MultiRon::HeadBump);
    assert!(rule.kuitan);

    assert_eq!(Rule::from_json("{}").unwrap(), Rule::default());
    assert!(Rule::from_json(r#"{"red5": 5}"#).is_err());
    assert!(Rule::from_json(r#"{"multi_ron": "Triple"}"#).is_err());
}
