//! セレクト入力の選択肢
//!
//! 値はバックエンドに保存される文字列そのもの。

/// 性別
pub const GENDER_OPTIONS: &[&str] = &["Macho", "Fêmea"];

/// 体格
pub const PHYSICAL_SHAPE_OPTIONS: &[&str] = &["Grande porte", "Médio porte", "Pequeno porte"];

/// 予後
pub const PROGNOSIS_OPTIONS: &[&str] = &[
    "Alta",
    "Aguardando alta médica",
    "Obscuro",
    "Desfávoravel",
    "Reservado",
    "Favorável",
    "Risco",
    "Alto risco",
];

/// 大文字小文字・前後空白を無視して選択肢を引く
pub fn find_option(options: &[&'static str], input: &str) -> Option<&'static str> {
    let needle = input.trim().to_lowercase();
    options.iter().copied().find(|o| o.to_lowercase() == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_option() {
        assert_eq!(find_option(GENDER_OPTIONS, " macho "), Some("Macho"));
        assert_eq!(find_option(PROGNOSIS_OPTIONS, "alto risco"), Some("Alto risco"));
        assert_eq!(find_option(PHYSICAL_SHAPE_OPTIONS, "gigante"), None);
    }
}
