//! Built-in vocabularies written on first use and restored on reset.

use indexmap::IndexMap;

use crate::{CoreVocabulary, ExtendedVocabulary, LeveledOptions};

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn leveled(primary: &[&str], secondary: &[(&str, &[&str])]) -> LeveledOptions {
    LeveledOptions {
        primary: list(primary),
        secondary: secondary
            .iter()
            .map(|(key, opts)| (key.to_string(), list(opts)))
            .collect(),
    }
}

fn category<T>(entries: Vec<(&str, T)>) -> IndexMap<String, T> {
    entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

impl CoreVocabulary {
    /// Seed vocabulary covering hair, eyes, skin, body, age, gender, race and species.
    pub fn seed() -> Self {
        let appearance = category(vec![
            (
                "hair_style",
                list(&["长发", "短发", "中长发", "卷发", "直发", "马尾", "双马尾", "丸子头", "公主切", "波波头"]),
            ),
            (
                "hair_color",
                list(&[
                    "黑色", "棕色", "金色", "银色", "红色", "蓝色", "绿色", "紫色", "粉色", "白色", "渐变",
                    "挑染",
                ]),
            ),
            (
                "eye_color",
                list(&["黑色", "棕色", "蓝色", "绿色", "灰色", "金色", "红色", "异色瞳"]),
            ),
            ("skin_tone", list(&["白皙", "小麦色", "古铜色", "苍白", "红润", "偏黄"])),
            ("body_type", list(&["苗条", "标准", "丰满", "健美", "娇小", "高挑"])),
            ("age_range", list(&["幼年", "少年", "青年", "成年", "中年", "老年"])),
        ]);
        let characteristics = category(vec![
            ("gender", list(&["男性", "女性", "中性", "其他"])),
            ("race", list(&["亚洲人", "欧洲人", "非洲人", "混血", "幻想种族"])),
            (
                "species",
                list(&["人类", "精灵", "兽人", "机械", "天使", "恶魔", "其他"]),
            ),
        ]);

        Self {
            categories: category(vec![
                ("appearance", appearance),
                ("characteristics", characteristics),
            ]),
        }
    }
}

impl ExtendedVocabulary {
    /// Seed vocabulary: expression/pose/action, background/time/lighting,
    /// art style/material, and primary-only weather/season/perspective/focus.
    pub fn seed() -> Self {
        let state_action = category(vec![
            (
                "expression",
                leveled(
                    &["微笑", "愤怒", "悲伤", "惊讶", "平静", "害羞", "严肃", "调皮"],
                    &[
                        ("微笑", &["微笑", "大笑", "偷笑", "假笑", "苦笑"]),
                        ("愤怒", &["愤怒", "暴怒", "不悦", "轻蔑", "烦躁"]),
                        ("悲伤", &["悲伤", "哭泣", "忧郁", "绝望", "寂寞"]),
                    ],
                ),
            ),
            (
                "pose",
                leveled(
                    &["站立", "坐姿", "卧姿", "跪姿", "跳跃", "奔跑"],
                    &[
                        ("站立", &["正面站立", "侧面站立", "背对", "倚靠", "叉腰"]),
                        ("坐姿", &["正坐", "侧坐", "盘腿", "跪坐", "懒散坐"]),
                    ],
                ),
            ),
            (
                "action",
                leveled(
                    &["瞄准", "格挡", "交谈", "施法", "演奏", "战斗", "工作", "休息"],
                    &[
                        ("瞄准", &["弓箭瞄准", "枪械瞄准", "魔法瞄准", "望远镜观察"]),
                        ("格挡", &["盾牌格挡", "武器格挡", "魔法护盾", "闪避"]),
                    ],
                ),
            ),
        ]);

        let environment = category(vec![
            (
                "background",
                leveled(
                    &["城市", "荒野", "太空", "室内", "水下", "天空", "森林", "沙漠"],
                    &[
                        ("城市", &["现代都市", "古城", "未来城市", "贫民窟", "商业区"]),
                        ("荒野", &["草原", "山地", "废墟", "沼泽", "火山"]),
                    ],
                ),
            ),
            (
                "time",
                leveled(
                    &["白天", "夜晚", "黄昏", "黎明", "午夜"],
                    &[
                        ("白天", &["清晨", "正午", "午后", "傍晚"]),
                        ("夜晚", &["深夜", "月夜", "星夜", "雨夜"]),
                    ],
                ),
            ),
            (
                "lighting",
                leveled(
                    &["强光", "柔和光", "伦勃朗光", "逆光", "侧光", "顶光", "背光", "自然光"],
                    &[
                        ("强光", &["日光直射", "聚光灯", "闪光灯", "激光"]),
                        ("柔和光", &["阴天光", "窗光", "柔光灯", "烛光"]),
                    ],
                ),
            ),
        ]);

        let style_material = category(vec![
            (
                "art_style",
                leveled(
                    &["动漫", "写实", "油画", "水彩", "像素", "卡通", "水墨", "赛博朋克"],
                    &[
                        ("动漫", &["日系动漫", "美式卡通", "中国风", "蒸汽波", "赛璐璐"]),
                        ("写实", &["超级写实", "照片写实", "半写实", "印象派写实"]),
                    ],
                ),
            ),
            (
                "material",
                leveled(
                    &["金属", "布料", "毛绒", "皮肤", "玻璃", "塑料", "皮革", "丝绸"],
                    &[
                        ("金属", &["钢铁", "黄金", "白银", "青铜", "生锈金属"]),
                        ("布料", &["棉布", "麻布", "绒布", "丝绸", "牛仔布"]),
                    ],
                ),
            ),
        ]);

        let additional = category(vec![
            (
                "weather",
                leveled(&["晴天", "雨天", "雪天", "雾天", "雷电", "彩虹", "沙尘暴"], &[]),
            ),
            ("season", leveled(&["春季", "夏季", "秋季", "冬季"], &[])),
            (
                "perspective",
                leveled(&["平视", "俯视", "仰视", "鸟瞰", "虫视", "透视"], &[]),
            ),
            ("focus", leveled(&["特写", "半身", "全身", "远景", "中景"], &[])),
        ]);

        Self {
            categories: category(vec![
                ("state_action", state_action),
                ("environment", environment),
                ("style_material", style_material),
                ("additional", additional),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_seed_shape() {
        let vocab = CoreVocabulary::seed();
        let categories: Vec<_> = vocab.categories.keys().map(String::as_str).collect();
        assert_eq!(categories, vec!["appearance", "characteristics"]);
        assert_eq!(vocab.options("appearance", "hair_style").unwrap()[0], "长发");
        assert!(vocab
            .categories
            .values()
            .flat_map(|vars| vars.values())
            .all(|opts| !opts.is_empty()));
    }

    #[test]
    fn test_extended_seed_is_consistent() {
        let vocab = ExtendedVocabulary::seed();
        assert!(vocab.inconsistencies().is_empty());
        assert_eq!(vocab.variable_count(), 12);

        let weather = vocab.entry("additional", "weather").unwrap();
        assert!(!weather.has_secondary_tier());

        let expression = vocab.entry("state_action", "expression").unwrap();
        assert_eq!(expression.secondary_for("微笑").len(), 5);
        assert!(expression.secondary_for("惊讶").is_empty());
    }
}
