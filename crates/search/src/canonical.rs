//! Canonical ingredient mapping and related lookup tables
//!
//! The ingredient table is an ordered list of `(pattern, canonical)`
//! pairs: the first pattern contained in a raw ingredient name wins, so
//! more specific synonyms must be declared before generic ones. The table
//! is configuration data derived from the source dataset; priority order
//! matters, the exact entries do not.

/// Ordered substring-to-canonical ingredient mapping
pub const CANONICAL_INGREDIENTS: &[(&str, &str)] = &[
    // pork
    ("대패삼겹살", "돼지고기"),
    ("통삼겹살", "돼지고기"),
    ("냉동삼겹살", "돼지고기"),
    ("생삼겹살", "돼지고기"),
    ("삼겹살", "돼지고기"),
    ("돼지앞다리살", "돼지고기"),
    ("앞다리살", "돼지고기"),
    ("돼지목살", "돼지고기"),
    ("목살", "돼지고기"),
    ("돼지등갈비", "돼지고기"),
    ("돼지갈비", "돼지고기"),
    ("등갈비", "돼지고기"),
    ("갈비", "돼지고기"),
    ("다진돼지고기", "돼지고기"),
    ("돼지고기", "돼지고기"),
    ("돼지", "돼지고기"),
    // chicken and duck must precede beef: "닭안심" contains "안심"
    ("닭가슴살", "닭고기"),
    ("닭다리살", "닭고기"),
    ("닭봉", "닭고기"),
    ("닭날개", "닭고기"),
    ("닭안심", "닭고기"),
    ("통닭", "닭고기"),
    ("닭고기", "닭고기"),
    ("닭", "닭고기"),
    ("훈제오리", "오리고기"),
    ("오리고기", "오리고기"),
    ("오리", "오리고기"),
    // beef
    ("우삼겹", "소고기"),
    ("채끝살", "소고기"),
    ("등심", "소고기"),
    ("안심", "소고기"),
    ("양지", "소고기"),
    ("우둔살", "소고기"),
    ("다진소고기", "소고기"),
    ("쇠고기", "소고기"),
    ("한우", "소고기"),
    ("소고기", "소고기"),
    // processed meats
    ("스팸", "스팸"),
    ("훈제베이컨", "베이컨"),
    ("베이컨", "베이컨"),
    ("칵테일햄", "햄"),
    ("햄", "햄"),
    ("비엔나소세지", "소시지"),
    ("비엔나소시지", "소시지"),
    ("소시지", "소시지"),
    // eggs
    ("달걀노른자", "계란"),
    ("달걀흰자", "계란"),
    ("삶은달걀", "계란"),
    ("달걀", "계란"),
    ("계란노른자", "계란"),
    ("계란흰자", "계란"),
    ("삶은계란", "계란"),
    ("계란", "계란"),
    // onion must precede green onion: "양파" contains "파"
    ("적양파", "양파"),
    ("자색양파", "양파"),
    ("양파즙", "양파"),
    ("양파", "양파"),
    // green onion
    ("대파흰부분", "파"),
    ("다진대파", "파"),
    ("다진파", "파"),
    ("대파채", "파"),
    ("파채", "파"),
    ("실파", "파"),
    ("쪽파", "파"),
    ("대파", "파"),
    ("파", "파"),
    // garlic
    ("다진마늘", "마늘"),
    ("간마늘", "마늘"),
    ("통마늘", "마늘"),
    ("깐마늘", "마늘"),
    ("마늘쫑", "마늘쫑"),
    ("마늘종", "마늘쫑"),
    ("마늘가루", "마늘"),
    ("마늘", "마늘"),
    // cabbage family
    ("알배추", "배추"),
    ("절임배추", "배추"),
    ("얼갈이배추", "배추"),
    ("방울양배추", "양배추"),
    ("양배추", "양배추"),
    ("배추", "배추"),
    ("양상추", "양상추"),
    // peppers
    ("청양고추", "청양고추"),
    ("청고추", "청양고추"),
    ("풋고추", "풋고추"),
    ("꽈리고추", "꽈리고추"),
    ("홍고추", "홍고추"),
    ("건고추", "건고추"),
    ("고추기름", "고추기름"),
    ("초고추장", "고추장"),
    ("고추장", "고추장"),
    ("고추가루", "고춧가루"),
    ("고춧가루", "고춧가루"),
    ("고추", "고추"),
    // sugars
    ("황설탕", "설탕"),
    ("흑설탕", "설탕"),
    ("백설탕", "설탕"),
    ("설탕", "설탕"),
    ("올리고당", "올리고당"),
    ("물엿", "물엿"),
    // salt
    ("꽃소금", "소금"),
    ("굵은소금", "소금"),
    ("소금", "소금"),
    // soy sauces and pastes
    ("진간장", "간장"),
    ("국간장", "간장"),
    ("양조간장", "간장"),
    ("맛간장", "간장"),
    ("간장", "간장"),
    ("된장", "된장"),
    ("쌈장", "쌈장"),
    // fish sauces
    ("멸치액젓", "액젓"),
    ("까나리액젓", "액젓"),
    ("액젓", "액젓"),
    // vinegars
    ("사과식초", "식초"),
    ("현미식초", "식초"),
    ("식초", "식초"),
    ("레몬즙", "레몬즙"),
    // oils
    ("포도씨유", "식용유"),
    ("카놀라유", "식용유"),
    ("콩기름", "식용유"),
    ("식용유", "식용유"),
    ("올리브오일", "올리브유"),
    ("올리브유", "올리브유"),
    ("들기름", "들기름"),
    ("참기름", "참기름"),
    // mushrooms
    ("건표고버섯", "표고버섯"),
    ("표고버섯", "표고버섯"),
    ("새송이버섯", "새송이버섯"),
    ("양송이버섯", "양송이버섯"),
    ("양송이", "양송이버섯"),
    ("느타리버섯", "느타리버섯"),
    ("팽이버섯", "팽이버섯"),
    ("버섯", "버섯"),
    // seafood
    ("냉동새우", "새우"),
    ("왕새우", "새우"),
    ("새우살", "새우"),
    ("새우", "새우"),
    ("대하", "새우"),
    ("오징어채", "오징어"),
    ("오징어", "오징어"),
    ("낙지", "낙지"),
    ("문어", "문어"),
    ("홍합살", "홍합"),
    ("홍합", "홍합"),
    ("바지락", "바지락"),
    ("조개살", "조개"),
    ("조개", "조개"),
    ("고등어", "고등어"),
    ("갈치", "갈치"),
    ("연어", "연어"),
    ("전복", "전복"),
    // staples
    ("찹쌀가루", "찹쌀"),
    ("찹쌀", "찹쌀"),
    ("쌀밥", "밥"),
    ("현미밥", "밥"),
    ("밥", "밥"),
    ("쌀", "쌀"),
    ("라면사리", "라면"),
    ("라면", "라면"),
    ("당면", "당면"),
    ("소면", "소면"),
    ("국수", "국수"),
    ("우동", "우동"),
    ("방울토마토", "토마토"),
    ("토마토", "토마토"),
];

/// Colloquial difficulty words mapped to graph difficulty levels
pub const DIFFICULTY_MAP: &[(&str, &[&str])] = &[
    ("쉬운", &["아무나", "초급"]),
    ("간단", &["아무나", "초급"]),
    ("쉽", &["아무나", "초급"]),
    ("초보", &["아무나", "초급"]),
    ("입문", &["아무나", "초급"]),
    ("초급", &["초급"]),
    ("중급", &["중급"]),
    ("고급", &["고급"]),
    ("어려운", &["고급", "중급"]),
    ("힘든", &["고급", "중급"]),
];

/// Weather tags known to exist in the graph, matched against free text
pub const KNOWN_WEATHER_TAGS: &[&str] = &[
    "더운 날",
    "추운날",
    "여름",
    "봄",
    "겨울",
    "비오는 날",
    "가을",
    "장마철",
    "복날",
    "눈오는날",
];

/// Ingredient category markers excluded by the vegetarian flag (and by
/// the corresponding single-category flags)
pub const MEAT_MARKERS: &[&str] = &["소고기", "돼지고기", "닭고기", "해산물"];
pub const BEEF_MARKER: &str = "소고기";
pub const PORK_MARKER: &str = "돼지고기";
pub const CHICKEN_MARKER: &str = "닭고기";
pub const SEAFOOD_MARKER: &str = "해산물";
/// Additional markers excluded by the vegan flag
pub const VEGAN_EXTRA_MARKERS: &[&str] = &["계란", "우유"];

/// Map a raw ingredient name to its canonical form. Patterns are tested
/// in declaration order and the first contained one wins; unmatched names
/// are returned trimmed.
pub fn canonicalize_ingredient(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    for (pattern, canonical) in CANONICAL_INGREDIENTS {
        if trimmed.contains(pattern) {
            return (*canonical).to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specific_synonym_wins_over_generic() {
        assert_eq!(canonicalize_ingredient("대패삼겹살"), "돼지고기");
        assert_eq!(canonicalize_ingredient("냉동 대패삼겹살 300g"), "돼지고기");
        assert_eq!(canonicalize_ingredient("마늘쫑"), "마늘쫑");
        assert_eq!(canonicalize_ingredient("다진마늘"), "마늘");
    }

    #[test]
    fn unmatched_names_pass_through_trimmed() {
        assert_eq!(canonicalize_ingredient("  아스파라거스 "), "아스파라거스");
        assert_eq!(canonicalize_ingredient(""), "");
    }

    #[test]
    fn table_order_puts_specific_before_generic() {
        // a pattern is unreachable when an earlier, shorter pattern is a
        // substring of it: any name containing it matches the earlier
        // entry first
        for (i, (pattern, _)) in CANONICAL_INGREDIENTS.iter().enumerate() {
            for (earlier, _) in &CANONICAL_INGREDIENTS[..i] {
                assert!(
                    !pattern.contains(earlier),
                    "pattern {pattern:?} is shadowed by earlier entry {earlier:?}"
                );
            }
        }
    }
}
