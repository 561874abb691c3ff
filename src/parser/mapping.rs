//! Lookup tables for nationality codes and stat column names.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Three-letter codes as shown in nationality cells, to country name.
pub const COUNTRY_CODES: &[(&str, &str)] = &[
    ("AFG", "Afghanistan"),
    ("AIA", "Anguilla"),
    ("ALB", "Albania"),
    ("ALG", "Algeria"),
    ("AND", "Andorra"),
    ("ANG", "Angola"),
    ("ARG", "Argentina"),
    ("ARM", "Armenia"),
    ("ARU", "Aruba"),
    ("ATG", "Antigua and Barbuda"),
    ("AUS", "Australia"),
    ("AUT", "Austria"),
    ("AZE", "Azerbaijan"),
    ("BAH", "Bahamas"),
    ("BAN", "Bangladesh"),
    ("BDI", "Burundi"),
    ("BEL", "Belgium"),
    ("BEN", "Benin"),
    ("BER", "Bermuda"),
    ("BFA", "Burkina Faso"),
    ("BHR", "Bahrain"),
    ("BHU", "Bhutan"),
    ("BIH", "Bosnia and Herzegovina"),
    ("BLR", "Belarus"),
    ("BLZ", "Belize"),
    ("BOL", "Bolivia"),
    ("BOT", "Botswana"),
    ("BRA", "Brazil"),
    ("BRB", "Barbados"),
    ("BRU", "Brunei"),
    ("BUL", "Bulgaria"),
    ("CAM", "Cambodia"),
    ("CAN", "Canada"),
    ("CAY", "Cayman Islands"),
    ("CGO", "Congo"),
    ("CHA", "Chad"),
    ("CHI", "Chile"),
    ("CHN", "China PR"),
    ("CIV", "Côte d'Ivoire"),
    ("CMR", "Cameroon"),
    ("COD", "DR Congo"),
    ("COK", "Cook Islands"),
    ("COL", "Colombia"),
    ("COM", "Comoros"),
    ("CPV", "Cape Verde"),
    ("CRC", "Costa Rica"),
    ("CRO", "Croatia"),
    ("CTA", "Central African Republic"),
    ("CUB", "Cuba"),
    ("CUW", "Curaçao"),
    ("CYP", "Cyprus"),
    ("CZE", "Czechia"),
    ("DEN", "Denmark"),
    ("DJI", "Djibouti"),
    ("DMA", "Dominica"),
    ("DOM", "Dominican Republic"),
    ("ECU", "Ecuador"),
    ("EGY", "Egypt"),
    ("ENG", "England"),
    ("EQG", "Equatorial Guinea"),
    ("ERI", "Eritrea"),
    ("ESP", "Spain"),
    ("EST", "Estonia"),
    ("ETH", "Ethiopia"),
    ("FIJ", "Fiji"),
    ("FIN", "Finland"),
    ("FRA", "France"),
    ("FRO", "Faroe Islands"),
    ("GAB", "Gabon"),
    ("GAM", "Gambia"),
    ("GEO", "Georgia"),
    ("GER", "Germany"),
    ("GHA", "Ghana"),
    ("GIB", "Gibraltar"),
    ("GLP", "Guadeloupe"),
    ("GNB", "Guinea-Bissau"),
    ("GRE", "Greece"),
    ("GRN", "Grenada"),
    ("GUA", "Guatemala"),
    ("GUF", "French Guiana"),
    ("GUI", "Guinea"),
    ("GUM", "Guam"),
    ("GUY", "Guyana"),
    ("HAI", "Haiti"),
    ("HKG", "Hong Kong"),
    ("HON", "Honduras"),
    ("HUN", "Hungary"),
    ("IDN", "Indonesia"),
    ("IND", "India"),
    ("IRL", "Republic of Ireland"),
    ("IRN", "IR Iran"),
    ("IRQ", "Iraq"),
    ("ISL", "Iceland"),
    ("ISR", "Israel"),
    ("ITA", "Italy"),
    ("JAM", "Jamaica"),
    ("JOR", "Jordan"),
    ("JPN", "Japan"),
    ("KAZ", "Kazakhstan"),
    ("KEN", "Kenya"),
    ("KGZ", "Kyrgyzstan"),
    ("KOR", "Korea Republic"),
    ("KSA", "Saudi Arabia"),
    ("KUW", "Kuwait"),
    ("KVX", "Kosovo"),
    ("LAO", "Laos"),
    ("LBR", "Liberia"),
    ("LBY", "Libya"),
    ("LCA", "Saint Lucia"),
    ("LES", "Lesotho"),
    ("LIB", "Lebanon"),
    ("LIE", "Liechtenstein"),
    ("LTU", "Lithuania"),
    ("LUX", "Luxembourg"),
    ("LVA", "Latvia"),
    ("MAD", "Madagascar"),
    ("MAR", "Morocco"),
    ("MAS", "Malaysia"),
    ("MDA", "Moldova"),
    ("MDV", "Maldives"),
    ("MEX", "Mexico"),
    ("MKD", "North Macedonia"),
    ("MLI", "Mali"),
    ("MLT", "Malta"),
    ("MNE", "Montenegro"),
    ("MNG", "Mongolia"),
    ("MOZ", "Mozambique"),
    ("MRI", "Mauritius"),
    ("MSR", "Montserrat"),
    ("MTN", "Mauritania"),
    ("MTQ", "Martinique"),
    ("MWI", "Malawi"),
    ("MYA", "Myanmar"),
    ("NAM", "Namibia"),
    ("NCA", "Nicaragua"),
    ("NCL", "New Caledonia"),
    ("NED", "Netherlands"),
    ("NEP", "Nepal"),
    ("NGA", "Nigeria"),
    ("NIG", "Niger"),
    ("NIR", "Northern Ireland"),
    ("NOR", "Norway"),
    ("NZL", "New Zealand"),
    ("OMA", "Oman"),
    ("PAK", "Pakistan"),
    ("PAN", "Panama"),
    ("PAR", "Paraguay"),
    ("PER", "Peru"),
    ("PHI", "Philippines"),
    ("PLE", "Palestine"),
    ("PNG", "Papua New Guinea"),
    ("POL", "Poland"),
    ("POR", "Portugal"),
    ("PRK", "Korea DPR"),
    ("PUR", "Puerto Rico"),
    ("QAT", "Qatar"),
    ("REU", "Réunion"),
    ("ROU", "Romania"),
    ("RSA", "South Africa"),
    ("RUS", "Russia"),
    ("RWA", "Rwanda"),
    ("SAM", "Samoa"),
    ("SCO", "Scotland"),
    ("SDN", "Sudan"),
    ("SEN", "Senegal"),
    ("SEY", "Seychelles"),
    ("SGP", "Singapore"),
    ("SKN", "Saint Kitts and Nevis"),
    ("SLE", "Sierra Leone"),
    ("SLV", "El Salvador"),
    ("SMR", "San Marino"),
    ("SOL", "Solomon Islands"),
    ("SOM", "Somalia"),
    ("SRB", "Serbia"),
    ("SRI", "Sri Lanka"),
    ("SSD", "South Sudan"),
    ("STP", "São Tomé and Príncipe"),
    ("SUI", "Switzerland"),
    ("SUR", "Suriname"),
    ("SVK", "Slovakia"),
    ("SVN", "Slovenia"),
    ("SWE", "Sweden"),
    ("SWZ", "Eswatini"),
    ("SYR", "Syria"),
    ("TAH", "Tahiti"),
    ("TAN", "Tanzania"),
    ("THA", "Thailand"),
    ("TJK", "Tajikistan"),
    ("TKM", "Turkmenistan"),
    ("TLS", "Timor-Leste"),
    ("TOG", "Togo"),
    ("TPE", "Chinese Taipei"),
    ("TRI", "Trinidad and Tobago"),
    ("TUN", "Tunisia"),
    ("TUR", "Türkiye"),
    ("UAE", "United Arab Emirates"),
    ("UGA", "Uganda"),
    ("UKR", "Ukraine"),
    ("URU", "Uruguay"),
    ("USA", "United States"),
    ("UZB", "Uzbekistan"),
    ("VAN", "Vanuatu"),
    ("VEN", "Venezuela"),
    ("VIE", "Vietnam"),
    ("VIN", "Saint Vincent and the Grenadines"),
    ("WAL", "Wales"),
    ("YEM", "Yemen"),
    ("ZAM", "Zambia"),
    ("ZIM", "Zimbabwe"),
];

static COUNTRY_LOOKUP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| COUNTRY_CODES.iter().copied().collect());

/// Country name for a three-letter code.
pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRY_LOOKUP.get(code.trim()).copied()
}

/// Country name when known, otherwise the input unchanged.
pub fn country_or_raw(text: &str) -> String {
    country_name(text)
        .map(str::to_string)
        .unwrap_or_else(|| text.to_string())
}

/// Player stat `data-stat` names to stored field names. Unlisted names are kept.
pub const STAT_NAMES: &[(&str, &str)] = &[
    ("shirtnumber", "shirt_number"),
    ("nationality", "nationality"),
    ("position", "position"),
    ("age", "age"),
    ("minutes", "minutes"),
    ("goals", "goals"),
    ("assists", "assists"),
    ("pens_made", "penalties_made"),
    ("pens_att", "penalties_attempted"),
    ("shots", "shots"),
    ("shots_on_target", "shots_on_target"),
    ("cards_yellow", "yellow_cards"),
    ("cards_red", "red_cards"),
    ("touches", "touches"),
    ("tackles", "tackles"),
    ("interceptions", "interceptions"),
    ("blocks", "blocks"),
    ("xg", "expected_goals"),
    ("npxg", "non_penalty_expected_goals"),
    ("xg_assist", "expected_assists"),
    ("sca", "shot_creating_actions"),
    ("gca", "goal_creating_actions"),
    ("passes_completed", "passes_completed"),
    ("passes", "passes_attempted"),
    ("passes_pct", "pass_completion_pct"),
    ("progressive_passes", "progressive_passes"),
    ("carries", "carries"),
    ("progressive_carries", "progressive_carries"),
    ("take_ons", "take_ons_attempted"),
    ("take_ons_won", "take_ons_successful"),
    ("gk_shots_on_target_against", "shots_on_target_against"),
    ("gk_goals_against", "goals_against"),
    ("gk_saves", "saves"),
    ("gk_save_pct", "save_pct"),
    ("gk_psxg", "post_shot_expected_goals"),
    ("gk_passes_completed_launched", "launched_passes_completed"),
    ("gk_passes_launched", "launched_passes_attempted"),
    ("gk_passes_pct_launched", "launched_pass_completion_pct"),
    ("gk_passes", "passes_attempted"),
    ("gk_passes_throws", "throws_attempted"),
    ("gk_pct_passes_launched", "launch_pct"),
    ("gk_passes_length_avg", "average_pass_length"),
    ("gk_goal_kicks", "goal_kicks_attempted"),
    ("gk_pct_goal_kicks_launched", "goal_kick_launch_pct"),
    ("gk_goal_kick_length_avg", "average_goal_kick_length"),
    ("gk_crosses", "crosses_faced"),
    ("gk_crosses_stopped", "crosses_stopped"),
    ("gk_crosses_stopped_pct", "crosses_stopped_pct"),
    ("gk_def_actions_outside_pen_area", "defensive_actions_outside_box"),
    ("gk_avg_distance_def_actions", "average_defensive_action_distance"),
];

pub fn stat_field_name(data_stat: &str) -> String {
    STAT_NAMES
        .iter()
        .find(|(raw, _)| *raw == data_stat)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| data_stat.to_string())
}

/// Outfield stats coerced to numbers.
pub const NUMERIC_PLAYER_STATS: &[&str] = &[
    "minutes",
    "goals",
    "assists",
    "shots",
    "shots_on_target",
    "cards_yellow",
    "cards_red",
    "touches",
    "tackles",
    "interceptions",
    "blocks",
    "xg",
    "npxg",
    "xg_assist",
    "sca",
    "gca",
    "passes_completed",
    "passes",
    "passes_pct",
    "progressive_passes",
    "carries",
    "progressive_carries",
    "take_ons",
    "take_ons_won",
    "shirtnumber",
];

/// Goalkeeper stats coerced to numbers.
pub const NUMERIC_KEEPER_STATS: &[&str] = &[
    "minutes",
    "gk_shots_on_target_against",
    "gk_goals_against",
    "gk_saves",
    "gk_save_pct",
    "gk_psxg",
    "gk_passes_completed_launched",
    "gk_passes_launched",
    "gk_passes_pct_launched",
    "gk_passes",
    "gk_passes_throws",
    "gk_pct_passes_launched",
    "gk_passes_length_avg",
    "gk_goal_kicks",
    "gk_pct_goal_kicks_launched",
    "gk_goal_kick_length_avg",
    "gk_crosses",
    "gk_crosses_stopped",
    "gk_crosses_stopped_pct",
    "gk_def_actions_outside_pen_area",
    "gk_avg_distance_def_actions",
];

/// Team stat labels (lowercased) to stored names. A trailing '%' marks
/// stats whose value is read as a percentage.
pub const TEAM_STAT_NAMES: &[(&str, &str)] = &[
    ("possession", "possession%"),
    ("passing accuracy", "passing_accuracy%"),
    ("shots on target", "shots_on_target%"),
    ("saves", "saves%"),
    ("cards", "cards"),
    ("fouls", "fouls"),
    ("corners", "corners"),
    ("crosses", "crosses"),
    ("touches", "touches"),
    ("tackles", "tackles"),
    ("interceptions", "interceptions"),
    ("aerials won", "aerials_won"),
    ("clearances", "clearances"),
    ("offsides", "offsides"),
    ("goal kicks", "goal_kicks"),
    ("throw ins", "throw_ins"),
    ("long balls", "long_balls"),
];

pub fn team_stat_name(label: &str) -> Option<&'static str> {
    let label = label.trim().to_lowercase();
    TEAM_STAT_NAMES
        .iter()
        .find(|(raw, _)| *raw == label)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_lookup() {
        assert_eq!(country_name("EGY"), Some("Egypt"));
        assert_eq!(country_name(" ENG "), Some("England"));
        assert_eq!(country_name("XXX"), None);
        assert_eq!(country_or_raw("ESP"), "Spain");
        assert_eq!(country_or_raw("Atlantis"), "Atlantis");
    }

    #[test]
    fn test_country_codes_unique() {
        assert_eq!(COUNTRY_LOOKUP.len(), COUNTRY_CODES.len());
    }

    #[test]
    fn test_stat_names() {
        assert_eq!(stat_field_name("cards_yellow"), "yellow_cards");
        assert_eq!(stat_field_name("unknown_stat"), "unknown_stat");
        assert_eq!(team_stat_name("Passing Accuracy"), Some("passing_accuracy%"));
        assert_eq!(team_stat_name("Aerials Won"), Some("aerials_won"));
        assert_eq!(team_stat_name("Weather"), None);
    }
}
