//! Static bilingual term tables.
//!
//! Coverage is intentionally partial: terms missing from a table pass through
//! untranslated.

/// Chinese → English for core variable values.
const CORE_TERMS: &[(&str, &str)] = &[
    ("长发", "long hair"),
    ("短发", "short hair"),
    ("卷发", "curly hair"),
    ("直发", "straight hair"),
    ("男性", "male"),
    ("女性", "female"),
    ("年轻", "young"),
    ("老年", "old"),
    ("黑色", "black"),
    ("金色", "blonde"),
    ("蓝色", "blue"),
    ("绿色", "green"),
    ("红色", "red"),
    ("白色", "white"),
];

/// Chinese → English for extended primary/secondary values.
const EXTENDED_TERMS: &[(&str, &str)] = &[
    ("微笑", "smiling"),
    ("愤怒", "angry"),
    ("悲伤", "sad"),
    ("站立", "standing"),
    ("坐姿", "sitting"),
    ("奔跑", "running"),
    ("城市", "city"),
    ("白天", "daytime"),
    ("夜晚", "night"),
    ("动漫", "anime"),
    ("写实", "realistic"),
];

/// Master feature catalog for image analysis, `(chinese, english)` in scan order.
pub const FEATURE_CATALOG: &[(&str, &str)] = &[
    ("长发", "long hair"),
    ("短发", "short hair"),
    ("卷发", "curly hair"),
    ("直发", "straight hair"),
    ("马尾", "ponytail"),
    ("双马尾", "twin tails"),
    ("微笑", "smile"),
    ("愤怒", "angry"),
    ("悲伤", "sad"),
    ("惊讶", "surprised"),
    ("害羞", "shy"),
    ("站立", "standing"),
    ("坐姿", "sitting"),
    ("奔跑", "running"),
    ("跳跃", "jumping"),
    ("城市背景", "city background"),
    ("自然背景", "nature background"),
    ("室内", "indoor"),
    ("室外", "outdoor"),
    ("白天", "daytime"),
    ("夜晚", "night"),
    ("黄昏", "dusk"),
    ("动漫风格", "anime style"),
    ("写实风格", "realistic style"),
    ("油画风格", "oil painting style"),
    ("男性", "male"),
    ("女性", "female"),
    ("年轻", "young"),
    ("老年", "old"),
];

const ANALYZER_TERMS_ZH: &[(&str, &[&str])] = &[
    (
        "人物",
        &["长发", "短发", "卷发", "直发", "马尾", "双马尾", "丸子头", "男性", "女性", "年轻", "老年"],
    ),
    (
        "表情",
        &["微笑", "愤怒", "悲伤", "惊讶", "平静", "害羞", "严肃", "调皮", "困惑", "恐惧"],
    ),
    ("姿势", &["站立", "坐姿", "卧姿", "跪姿", "跳跃", "奔跑", "飞行", "游泳"]),
    ("环境", &["城市", "荒野", "室内", "室外", "白天", "夜晚", "黄昏", "黎明"]),
    ("风格", &["动漫", "写实", "油画", "水彩", "像素", "卡通", "水墨", "赛博朋克"]),
    ("服装", &["和服", "西装", "裙子", "T恤", "盔甲", "制服", "泳装", "礼服"]),
];

const ANALYZER_TERMS_EN: &[(&str, &[&str])] = &[
    (
        "person",
        &[
            "long hair",
            "short hair",
            "curly hair",
            "straight hair",
            "ponytail",
            "twin tails",
            "bun",
            "male",
            "female",
            "young",
            "old",
        ],
    ),
    (
        "expression",
        &[
            "smiling", "angry", "sad", "surprised", "calm", "shy", "serious", "playful",
            "confused", "fear",
        ],
    ),
    (
        "pose",
        &["standing", "sitting", "lying", "kneeling", "jumping", "running", "flying", "swimming"],
    ),
    (
        "environment",
        &["city", "wilderness", "indoor", "outdoor", "daytime", "night", "dusk", "dawn"],
    ),
    (
        "style",
        &[
            "anime",
            "realistic",
            "oil painting",
            "watercolor",
            "pixel",
            "cartoon",
            "ink wash",
            "cyberpunk",
        ],
    ),
    (
        "clothing",
        &["kimono", "suit", "dress", "t-shirt", "armor", "uniform", "swimsuit", "gown"],
    ),
];

/// Prompt-format priority keywords for English output, highest first.
pub const PRIORITY_KEYWORDS_EN: &[&str] = &[
    "1girl",
    "1boy",
    "male",
    "female",
    "portrait",
    "full body",
    "detailed",
];

/// Prompt-format priority keywords for Chinese output, highest first.
pub const PRIORITY_KEYWORDS_ZH: &[&str] = &["女孩", "男孩", "男性", "女性", "肖像", "全身", "详细"];

fn lookup<'a>(table: &[(&str, &'static str)], term: &'a str) -> &'a str {
    table
        .iter()
        .find(|(zh, _)| *zh == term)
        .map(|(_, en)| *en)
        .unwrap_or(term)
}

/// English rendering of a core value, or the value itself when unmapped.
pub fn translate_core_term(term: &str) -> &str {
    lookup(CORE_TERMS, term)
}

/// English rendering of an extended value, or the value itself when unmapped.
pub fn translate_extended_term(term: &str) -> &str {
    lookup(EXTENDED_TERMS, term)
}

/// Per-category analyzer term lists for `language`, in category order.
pub fn analyzer_terms(language: crate::Language) -> &'static [(&'static str, &'static [&'static str])] {
    if language.is_english() {
        ANALYZER_TERMS_EN
    } else {
        ANALYZER_TERMS_ZH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Language;

    #[test]
    fn test_core_terms_translate_or_pass_through() {
        assert_eq!(translate_core_term("长发"), "long hair");
        assert_eq!(translate_core_term("金色"), "blonde");
        assert_eq!(translate_core_term("马尾"), "马尾");
    }

    #[test]
    fn test_extended_table_is_separate() {
        assert_eq!(translate_extended_term("微笑"), "smiling");
        // Core-only term stays untranslated in the extended table.
        assert_eq!(translate_extended_term("长发"), "长发");
    }

    #[test]
    fn test_catalog_and_analyzer_terms_shape() {
        assert_eq!(FEATURE_CATALOG.len(), 29);
        let zh = analyzer_terms(Language::Chinese);
        let en = analyzer_terms(Language::English);
        assert_eq!(zh.len(), 6);
        assert_eq!(en.len(), 6);
        for ((_, zh_terms), (_, en_terms)) in zh.iter().zip(en.iter()) {
            assert_eq!(zh_terms.len(), en_terms.len());
        }
    }
}
