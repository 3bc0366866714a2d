//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::{
    Path,
    PathBuf,
};

use crate::dictionary::LanguageDictionary;
use crate::types::Language;

/// テスト用の `LanguageDictionary` を作成する
///
/// # Arguments
/// * `language` - 言語コード（例: "en", "fr"）
/// * `entries` - キーと値のペア（ファイル順）
pub(crate) fn create_dictionary(language: &str, entries: &[(&str, &str)]) -> LanguageDictionary {
    LanguageDictionary::from_entries(Language::new(language), entries.iter().copied())
}

/// バンドル内に `<language>.lproj/Localizable.strings` を書き込む
///
/// # Returns
/// 書き込んだファイルのパス
pub(crate) fn write_localization_file(bundle: &Path, language: &str, content: &str) -> PathBuf {
    let lproj = bundle.join(format!("{language}.lproj"));
    fs::create_dir_all(&lproj).unwrap();
    let file = lproj.join("Localizable.strings");
    fs::write(&file, content).unwrap();
    file
}
