#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure classification of free-text region names into canonical regions.
//!
//! Region names arrive in Russian, Kazakh, or English and frequently share
//! fragments ("Северо-Восточный", "Southeast"). Rules are evaluated in
//! declaration order and the first rule with a matching keyword wins, so the
//! order of [`DEFAULT_RULES`] is part of the contract.

use heritage_map_core::RegionId;

/// Region assigned to names that match no rule.
pub const FALLBACK_REGION: RegionId = RegionId::Central;

/// Built-in rule table in precedence order. Keywords are lowercase.
pub const DEFAULT_RULES: &[(RegionId, &[&str])] = &[
    (
        RegionId::Almaty,
        &[
            "алматы",
            "алматин",
            "almaty",
            "жетісу",
            "жетысу",
            "zhetysu",
            "zhetisu",
            "jetisu",
            "талдыкорган",
            "taldykorgan",
        ],
    ),
    (
        RegionId::North,
        &[
            "север",
            "солтүстік",
            "north",
            "акмол",
            "ақмола",
            "akmola",
            "aqmola",
            "костанай",
            "қостанай",
            "kostanay",
            "kostanai",
            "qostanay",
            "павлодар",
            "pavlodar",
            "петропавл",
            "petropavl",
            "астана",
            "astana",
        ],
    ),
    (
        RegionId::South,
        &[
            "юж",
            "оңтүстік",
            "south",
            "туркестан",
            "түркістан",
            "turkestan",
            "turkistan",
            "шымкент",
            "shymkent",
            "кызылорд",
            "қызылорда",
            "kyzylorda",
            "qyzylorda",
            "жамбыл",
            "zhambyl",
            "jambyl",
            "тараз",
            "taraz",
        ],
    ),
    (
        RegionId::East,
        &[
            "восток",
            "восточ",
            "шығыс",
            "east",
            "абай",
            "abai",
            "abay",
            "семей",
            "semey",
            "усть-камен",
            "өскемен",
            "oskemen",
            "ust-kamenogorsk",
        ],
    ),
    (
        RegionId::West,
        &[
            "запад",
            "батыс",
            "west",
            "актюб",
            "актоб",
            "ақтөбе",
            "aktobe",
            "aqtobe",
            "атырау",
            "atyrau",
            "мангист",
            "маңғыстау",
            "mangystau",
            "mangistau",
            "уральск",
            "uralsk",
        ],
    ),
    (
        RegionId::Central,
        &[
            "центр",
            "орталық",
            "central",
            "centre",
            "center",
            "караганд",
            "қарағанды",
            "karaganda",
            "karagandy",
            "qaraghandy",
            "улытау",
            "ұлытау",
            "ulytau",
            "жезказган",
            "zhezkazgan",
            "jezkazgan",
        ],
    ),
];

/// Classifies a region name with the built-in rule table.
///
/// Never fails: names without a recognised keyword resolve to
/// [`FALLBACK_REGION`].
#[must_use]
pub fn classify(region_name: &str) -> RegionId {
    first_match(
        DEFAULT_RULES
            .iter()
            .map(|(region, keywords)| (*region, *keywords)),
        region_name,
        FALLBACK_REGION,
    )
}

/// Region of the first rule with a keyword contained in the lowercased name.
fn first_match<'r, I, K>(rules: I, region_name: &str, fallback: RegionId) -> RegionId
where
    I: IntoIterator<Item = (RegionId, &'r [K])>,
    K: AsRef<str> + 'r,
{
    let lowered = region_name.to_lowercase();
    rules
        .into_iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|keyword| lowered.contains(keyword.as_ref()))
        })
        .map_or(fallback, |(region, _)| region)
}

/// Keyword set that maps region names onto one canonical region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionRule {
    region: RegionId,
    keywords: Vec<String>,
}

impl RegionRule {
    /// Creates a rule; keywords are lowercased so matching stays case-insensitive.
    #[must_use]
    pub fn new<I, S>(region: RegionId, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        Self { region, keywords }
    }

    /// Region produced when the rule matches.
    #[must_use]
    pub const fn region(&self) -> RegionId {
        self.region
    }

    /// Lowercase keywords searched for in region names.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// Ordered rule list with a fallback region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionClassifier {
    rules: Vec<RegionRule>,
    fallback: RegionId,
}

impl RegionClassifier {
    /// Creates a classifier backed by [`DEFAULT_RULES`].
    #[must_use]
    pub fn new() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|(region, keywords)| RegionRule::new(*region, keywords.iter()))
            .collect();
        Self::with_rules(rules, FALLBACK_REGION)
    }

    /// Creates a classifier from caller-supplied rules in precedence order.
    #[must_use]
    pub fn with_rules(rules: Vec<RegionRule>, fallback: RegionId) -> Self {
        Self { rules, fallback }
    }

    /// Rules in the order they are evaluated.
    #[must_use]
    pub fn rules(&self) -> &[RegionRule] {
        &self.rules
    }

    /// Region used when no rule matches.
    #[must_use]
    pub const fn fallback(&self) -> RegionId {
        self.fallback
    }

    /// Resolves a free-text region name; the first matching rule wins.
    #[must_use]
    pub fn classify(&self, region_name: &str) -> RegionId {
        first_match(
            self.rules
                .iter()
                .map(|rule| (rule.region, rule.keywords.as_slice())),
            region_name,
            self.fallback,
        )
    }
}

impl Default for RegionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, RegionClassifier, RegionRule, DEFAULT_RULES};
    use heritage_map_core::RegionId;

    #[test]
    fn oblast_names_resolve_to_macro_regions() {
        let cases = [
            ("Алматинская область", RegionId::Almaty),
            ("г. Алматы", RegionId::Almaty),
            ("Северо-Казахстанская область", RegionId::North),
            ("Акмолинская область", RegionId::North),
            ("Туркестанская область", RegionId::South),
            ("Жамбылская область", RegionId::South),
            ("Восточно-Казахстанская область", RegionId::East),
            ("Мангистауская область", RegionId::West),
            ("Атырауская область", RegionId::West),
            ("Карагандинская область", RegionId::Central),
            ("Ұлытау облысы", RegionId::Central),
            ("Turkistan Region", RegionId::South),
            ("Zhetisu Region", RegionId::Almaty),
            ("Jetisu", RegionId::Almaty),
            ("Abay Region", RegionId::East),
            ("Jambyl Region", RegionId::South),
            ("Kostanai Region", RegionId::North),
            ("Qostanay Region", RegionId::North),
            ("Aqmola Region", RegionId::North),
            ("Qyzylorda Region", RegionId::South),
            ("Aqtobe Region", RegionId::West),
            ("Karagandy Region", RegionId::Central),
            ("Qaraghandy Region", RegionId::Central),
            ("Ust-Kamenogorsk", RegionId::East),
            ("Jezkazgan", RegionId::Central),
            ("West Kazakhstan Region", RegionId::West),
            ("East Kazakhstan Region", RegionId::East),
            ("North Kazakhstan Region", RegionId::North),
        ];

        for (name, expected) in cases {
            assert_eq!(classify(name), expected, "{name}");
        }
    }

    #[test]
    fn unknown_names_fall_back_to_central() {
        assert_eq!(classify("Atlantis"), RegionId::Central);
        assert_eq!(classify(""), RegionId::Central);
    }

    #[test]
    fn earlier_rules_take_precedence() {
        assert_eq!(classify("Северо-Восточный регион"), RegionId::North);
        assert_eq!(classify("Northwest steppe"), RegionId::North);
        assert_eq!(classify("Southeast foothills"), RegionId::South);
    }

    #[test]
    fn default_classifier_matches_free_function() {
        let classifier = RegionClassifier::default();
        assert_eq!(classifier.rules().len(), DEFAULT_RULES.len());
        for (_, keywords) in DEFAULT_RULES {
            for keyword in keywords.iter() {
                assert_eq!(classifier.classify(keyword), classify(keyword));
            }
        }
    }

    #[test]
    fn custom_rules_follow_declared_order() {
        let classifier = RegionClassifier::with_rules(
            vec![
                RegionRule::new(RegionId::West, ["Steppe"]),
                RegionRule::new(RegionId::East, ["steppe", "altai"]),
            ],
            RegionId::South,
        );

        assert_eq!(classifier.classify("Great STEPPE"), RegionId::West);
        assert_eq!(classifier.classify("Altai"), RegionId::East);
        assert_eq!(classifier.classify("Caspian"), RegionId::South);
        assert_eq!(classifier.fallback(), RegionId::South);
    }

    #[test]
    fn empty_keywords_are_discarded() {
        let rule = RegionRule::new(RegionId::North, ["", "Kokshetau"]);
        assert_eq!(rule.keywords(), ["kokshetau".to_owned()]);
    }
}
