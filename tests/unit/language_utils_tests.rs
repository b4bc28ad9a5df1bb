/*!
 * Tests for language utility functions
 */

use potranslate::language_utils::{
    get_language_name, is_supported_locale, language_codes_match,
    normalize_language_code, validate_language_code,
};

#[test]
fn test_validate_language_code_withTwoLetterCodes_shouldAccept() {
    assert!(validate_language_code("en").is_ok());
    assert!(validate_language_code("fr").is_ok());
    assert!(validate_language_code("DE").is_ok());
}

#[test]
fn test_validate_language_code_withThreeLetterCodes_shouldAccept() {
    assert!(validate_language_code("eng").is_ok());
    assert!(validate_language_code("fra").is_ok());
    assert!(validate_language_code("deu").is_ok());
}

#[test]
fn test_validate_language_code_withRegionSubtag_shouldAccept() {
    assert!(validate_language_code("pt-BR").is_ok());
    assert!(validate_language_code("zh_CN").is_ok());
    assert!(validate_language_code("en-US").is_ok());
}

#[test]
fn test_validate_language_code_withBogusCodes_shouldReject() {
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("notalang").is_err());
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("123").is_err());
}

#[test]
fn test_is_supported_locale_withDirectoryNames_shouldFilterNonLocales() {
    assert!(is_supported_locale("fr"));
    assert!(is_supported_locale("pt_BR"));
    assert!(!is_supported_locale("node_modules"));
    assert!(!is_supported_locale(".git"));
    assert!(!is_supported_locale("build"));
}

#[test]
fn test_normalize_language_code_shouldCanonicalizeCase_andSeparator() {
    assert_eq!(normalize_language_code("FR").unwrap(), "fr");
    assert_eq!(normalize_language_code("pt_br").unwrap(), "pt-BR");
    assert_eq!(normalize_language_code("zh-cn").unwrap(), "zh-CN");
    assert!(normalize_language_code("zz").is_err());
}

#[test]
fn test_get_language_name_withValidCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert!(get_language_name("qqq").is_err());
}

#[test]
fn test_language_codes_match_withEquivalentSpellings_shouldMatch() {
    assert!(language_codes_match("fr", "fra"));
    assert!(language_codes_match("en", "en-US"));
    assert!(!language_codes_match("fr", "de"));
    assert!(!language_codes_match("fr", "bogus"));
}
