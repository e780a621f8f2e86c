/*!
 * Tests for language code utilities
 */

use anyhow::Result;
use l2t::language_utils::{
    file_language_tag, get_language_name, get_supported_languages, is_language_supported,
    language_codes_match, normalize_language_code, NLLB_LANGUAGES,
};

#[test]
fn test_normalize_language_code_withNllbCodes_shouldAcceptAnyCaseAndSeparator() -> Result<()> {
    assert_eq!(normalize_language_code("fra_Latn")?, "fra_Latn");
    assert_eq!(normalize_language_code("FRA_LATN")?, "fra_Latn");
    assert_eq!(normalize_language_code("zho-Hant")?, "zho_Hant");
    assert_eq!(normalize_language_code(" deu_Latn ")?, "deu_Latn");
    Ok(())
}

#[test]
fn test_normalize_language_code_withIsoCodes_shouldResolve() -> Result<()> {
    assert_eq!(normalize_language_code("fr")?, "fra_Latn");
    assert_eq!(normalize_language_code("de")?, "deu_Latn");
    assert_eq!(normalize_language_code("ja")?, "jpn_Jpan");
    assert_eq!(normalize_language_code("spa")?, "spa_Latn");
    // ISO 639-2/B
    assert_eq!(normalize_language_code("ger")?, "deu_Latn");
    assert_eq!(normalize_language_code("fre")?, "fra_Latn");
    Ok(())
}

/// Macrolanguages map to the individual language NLLB ships
#[test]
fn test_normalize_language_code_withMacrolanguages_shouldPickIndividualLanguage() -> Result<()> {
    assert_eq!(normalize_language_code("ms")?, "zsm_Latn");
    assert_eq!(normalize_language_code("fa")?, "pes_Arab");
    assert_eq!(normalize_language_code("no")?, "nob_Latn");
    assert_eq!(normalize_language_code("zh")?, "zho_Hans");
    Ok(())
}

#[test]
fn test_normalize_language_code_withUnknownCodes_shouldFail() {
    assert!(normalize_language_code("").is_err());
    assert!(normalize_language_code("xx").is_err());
    assert!(normalize_language_code("fra_Cyrl").is_err());
    assert!(normalize_language_code("french").is_err());
}

#[test]
fn test_is_language_supported_withMixedCodes_shouldMatchCatalog() {
    assert!(is_language_supported("eng_Latn"));
    assert!(is_language_supported("en"));
    assert!(!is_language_supported("tlh"));
}

#[test]
fn test_get_language_name_withCodes_shouldReturnEnglishName() -> Result<()> {
    assert_eq!(get_language_name("fra_Latn")?, "French");
    assert_eq!(get_language_name("es")?, "Spanish");
    assert!(get_language_name("qq").is_err());
    Ok(())
}

#[test]
fn test_get_supported_languages_shouldListCatalogSortedByCode() {
    let languages = get_supported_languages();

    assert_eq!(languages.len(), NLLB_LANGUAGES.len());
    assert_eq!(languages.get("fra_Latn").map(String::as_str), Some("French"));

    let codes: Vec<&String> = languages.keys().collect();
    let mut sorted = codes.clone();
    sorted.sort();
    assert_eq!(codes, sorted);
}

#[test]
fn test_catalog_shouldHaveUniqueWellFormedCodes() {
    let mut seen = std::collections::HashSet::new();
    for (code, name) in NLLB_LANGUAGES {
        assert!(seen.insert(*code), "duplicate code {}", code);
        let (language, script) = code.split_once('_').expect("code has a script part");
        assert_eq!(language.len(), 3, "bad language part in {}", code);
        assert_eq!(script.len(), 4, "bad script part in {}", code);
        assert!(!name.is_empty());
    }
}

#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("fr", "fra_Latn"));
    assert!(language_codes_match("ger", "de"));
    assert!(!language_codes_match("fr", "de"));
    assert!(!language_codes_match("xx", "xx"));
}

#[test]
fn test_file_language_tag_shouldUseHyphen() {
    assert_eq!(file_language_tag("fra_Latn"), "fra-Latn");
    assert_eq!(file_language_tag("zho_Hant"), "zho-Hant");
}
