/*!
 * Language utilities for NLLB-200 language codes.
 *
 * NLLB identifies languages as `<ISO 639-3>_<ISO 15924 script>`, e.g. `fra_Latn`.
 * This module holds the catalog of codes the model understands and resolves
 * the ISO 639-1 / 639-2 codes people usually type into catalog codes.
 */

use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};

/// Languages supported by the NLLB-200 models, in catalog order
pub const NLLB_LANGUAGES: &[(&str, &str)] = &[
    ("afr_Latn", "Afrikaans"),
    ("amh_Ethi", "Amharic"),
    ("ara_Arab", "Arabic"),
    ("asm_Beng", "Assamese"),
    ("ast_Latn", "Asturian"),
    ("azj_Latn", "North Azerbaijani"),
    ("bel_Cyrl", "Belarusian"),
    ("ben_Beng", "Bengali"),
    ("bos_Latn", "Bosnian"),
    ("bul_Cyrl", "Bulgarian"),
    ("cat_Latn", "Catalan"),
    ("ceb_Latn", "Cebuano"),
    ("ces_Latn", "Czech"),
    ("ckb_Arab", "Central Kurdish"),
    ("cym_Latn", "Welsh"),
    ("dan_Latn", "Danish"),
    ("deu_Latn", "German"),
    ("ell_Grek", "Greek"),
    ("eng_Latn", "English"),
    ("est_Latn", "Estonian"),
    ("fin_Latn", "Finnish"),
    ("fra_Latn", "French"),
    ("fuv_Latn", "Nigerian Fulfulde"),
    ("gaz_Latn", "West Central Oromo"),
    ("gle_Latn", "Irish"),
    ("glg_Latn", "Galician"),
    ("guj_Gujr", "Gujarati"),
    ("hat_Latn", "Haitian Creole"),
    ("hau_Latn", "Hausa"),
    ("heb_Hebr", "Hebrew"),
    ("hin_Deva", "Hindi"),
    ("hrv_Latn", "Croatian"),
    ("hun_Latn", "Hungarian"),
    ("hye_Armn", "Armenian"),
    ("ibo_Latn", "Igbo"),
    ("ind_Latn", "Indonesian"),
    ("isl_Latn", "Icelandic"),
    ("ita_Latn", "Italian"),
    ("jav_Latn", "Javanese"),
    ("jpn_Jpan", "Japanese"),
    ("kam_Latn", "Kamba"),
    ("kan_Knda", "Kannada"),
    ("kat_Geor", "Georgian"),
    ("kaz_Cyrl", "Kazakh"),
    ("kea_Latn", "Kabuverdianu"),
    ("khk_Cyrl", "Halh Mongolian"),
    ("khm_Khmr", "Khmer"),
    ("kir_Cyrl", "Kyrgyz"),
    ("kor_Hang", "Korean"),
    ("lao_Laoo", "Lao"),
    ("lit_Latn", "Lithuanian"),
    ("ltz_Latn", "Luxembourgish"),
    ("lug_Latn", "Ganda"),
    ("luo_Latn", "Luo"),
    ("lvs_Latn", "Standard Latvian"),
    ("mai_Deva", "Maithili"),
    ("mal_Mlym", "Malayalam"),
    ("mar_Deva", "Marathi"),
    ("mkd_Cyrl", "Macedonian"),
    ("mlt_Latn", "Maltese"),
    ("mni_Beng", "Meitei"),
    ("mya_Mymr", "Burmese"),
    ("nld_Latn", "Dutch"),
    ("nno_Latn", "Norwegian Nynorsk"),
    ("nob_Latn", "Norwegian Bokmål"),
    ("npi_Deva", "Nepali"),
    ("nya_Latn", "Nyanja"),
    ("ory_Orya", "Odia"),
    ("pan_Guru", "Eastern Panjabi"),
    ("pbt_Arab", "Southern Pashto"),
    ("pes_Arab", "Western Persian"),
    ("pol_Latn", "Polish"),
    ("por_Latn", "Portuguese"),
    ("ron_Latn", "Romanian"),
    ("rus_Cyrl", "Russian"),
    ("slk_Latn", "Slovak"),
    ("slv_Latn", "Slovenian"),
    ("sna_Latn", "Shona"),
    ("snd_Arab", "Sindhi"),
    ("som_Latn", "Somali"),
    ("spa_Latn", "Spanish"),
    ("srp_Cyrl", "Serbian"),
    ("swe_Latn", "Swedish"),
    ("swh_Latn", "Swahili"),
    ("tam_Taml", "Tamil"),
    ("tel_Telu", "Telugu"),
    ("tgk_Cyrl", "Tajik"),
    ("tgl_Latn", "Tagalog"),
    ("tha_Thai", "Thai"),
    ("tur_Latn", "Turkish"),
    ("ukr_Cyrl", "Ukrainian"),
    ("urd_Arab", "Urdu"),
    ("uzn_Latn", "Northern Uzbek"),
    ("vie_Latn", "Vietnamese"),
    ("xho_Latn", "Xhosa"),
    ("yor_Latn", "Yoruba"),
    ("zho_Hans", "Chinese (Simplified)"),
    ("zho_Hant", "Chinese (Traditional)"),
    ("zsm_Latn", "Standard Malay"),
    ("zul_Latn", "Zulu"),
];

// Lowercased code -> catalog index
static CATALOG_INDEX: Lazy<HashMap<String, usize>> = Lazy::new(|| {
    NLLB_LANGUAGES
        .iter()
        .enumerate()
        .map(|(i, (code, _))| (code.to_lowercase(), i))
        .collect()
});

// ISO 639-3 prefix -> first catalog index with that prefix
static PREFIX_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for (i, (code, _)) in NLLB_LANGUAGES.iter().enumerate() {
        if let Some((prefix, _)) = code.split_once('_') {
            index.entry(prefix).or_insert(i);
        }
    }
    index
});

/// Map an ISO 639-2/B code to its ISO 639-2/T equivalent
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// NLLB names individual languages where ISO 639-1 points at the macrolanguage
fn macrolanguage_to_nllb(code: &str) -> Option<&'static str> {
    match code {
        "msa" => Some("zsm"),
        "fas" => Some("pes"),
        "swa" => Some("swh"),
        "lav" => Some("lvs"),
        "mon" => Some("khk"),
        "aze" => Some("azj"),
        "uzb" => Some("uzn"),
        "nep" => Some("npi"),
        "orm" => Some("gaz"),
        "ori" => Some("ory"),
        "pus" => Some("pbt"),
        "nor" => Some("nob"),
        "kur" => Some("ckb"),
        "ful" => Some("fuv"),
        _ => None,
    }
}

/// Resolve any accepted spelling of a language to its canonical NLLB code
///
/// Accepts NLLB codes (case-insensitive, `_` or `-` separator), ISO 639-1,
/// ISO 639-2/T, ISO 639-3 and ISO 639-2/B codes.
pub fn normalize_language_code(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase().replace('-', "_");

    if normalized_code.contains('_') {
        return CATALOG_INDEX
            .get(&normalized_code)
            .map(|&i| NLLB_LANGUAGES[i].0.to_string())
            .ok_or_else(|| anyhow!("Unsupported language code: {}", code));
    }

    let part3 = match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code).map(|lang| lang.to_639_3().to_string()),
        3 => part2b_to_part2t(&normalized_code)
            .map(str::to_string)
            .or_else(|| Language::from_639_3(&normalized_code).map(|lang| lang.to_639_3().to_string())),
        _ => None,
    }
    .ok_or_else(|| anyhow!("Invalid language code: {}", code))?;

    let prefix = macrolanguage_to_nllb(&part3).unwrap_or(part3.as_str());

    PREFIX_INDEX
        .get(prefix)
        .map(|&i| NLLB_LANGUAGES[i].0.to_string())
        .ok_or_else(|| anyhow!("Unsupported language code: {}", code))
}

/// Check whether a code resolves to a language of the catalog
pub fn is_language_supported(code: &str) -> bool {
    normalize_language_code(code).is_ok()
}

/// Get the English language name for a code
pub fn get_language_name(code: &str) -> Result<String> {
    let canonical = normalize_language_code(code)?;
    let index = CATALOG_INDEX
        .get(&canonical.to_lowercase())
        .ok_or_else(|| anyhow!("Unsupported language code: {}", code))?;
    Ok(NLLB_LANGUAGES[*index].1.to_string())
}

/// All supported languages keyed by NLLB code, sorted by code
pub fn get_supported_languages() -> BTreeMap<String, String> {
    NLLB_LANGUAGES
        .iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect()
}

/// Check if two language codes resolve to the same catalog entry
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_language_code(code1), normalize_language_code(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Language tag usable in file names (`fra_Latn` -> `fra-Latn`)
pub fn file_language_tag(code: &str) -> String {
    code.replace('_', "-")
}
