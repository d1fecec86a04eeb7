//! UI labels for the settings window and chat panel.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const FALLBACK_LANGUAGE: &str = "en";

pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "zh", "zh-TW", "ja", "ko", "fr", "th"];

type Table = HashMap<&'static str, HashMap<&'static str, &'static str>>;

static TRANSLATIONS: Lazy<Table> = Lazy::new(|| {
    let mut table: Table = HashMap::new();
    let mut add = |lang: &'static str, entries: &[(&'static str, &'static str)]| {
        table.entry(lang).or_default().extend(entries.iter().copied());
    };
    add(
        "en",
        &[
            ("settings_title", "Danmaku Settings"),
            ("enable_danmaku", "Enable danmaku"),
            ("hide_chat", "Hide chat panel"),
            ("font_family", "Font"),
            ("font_size", "Font size"),
            ("font_size_random", "Size variation"),
            ("speed", "Speed"),
            ("opacity", "Opacity"),
            ("position", "Display area"),
            ("position_all", "Full screen"),
            ("position_top", "Top half"),
            ("position_bottom", "Bottom half"),
            ("debug_logging", "Debug logging"),
            ("chat_title", "Chat"),
            ("chat_empty", "Waiting for chat messages"),
            ("save", "Save"),
            ("reset", "Reset to defaults"),
        ],
    );
    add(
        "zh",
        &[
            ("settings_title", "弹幕设置"),
            ("enable_danmaku", "启用弹幕"),
            ("hide_chat", "隐藏聊天栏"),
            ("font_family", "字体"),
            ("font_size", "字体大小"),
            ("font_size_random", "大小浮动"),
            ("speed", "速度"),
            ("opacity", "不透明度"),
            ("position", "显示区域"),
            ("position_all", "全屏"),
            ("position_top", "上半屏"),
            ("position_bottom", "下半屏"),
            ("debug_logging", "调试日志"),
            ("chat_title", "聊天"),
            ("chat_empty", "等待聊天消息"),
            ("save", "保存"),
            ("reset", "恢复默认"),
        ],
    );
    add(
        "zh-TW",
        &[
            ("settings_title", "彈幕設定"),
            ("enable_danmaku", "啟用彈幕"),
            ("hide_chat", "隱藏聊天欄"),
            ("font_family", "字型"),
            ("font_size", "字型大小"),
            ("font_size_random", "大小浮動"),
            ("speed", "速度"),
            ("opacity", "不透明度"),
            ("position", "顯示區域"),
            ("position_all", "全螢幕"),
            ("position_top", "上半螢幕"),
            ("position_bottom", "下半螢幕"),
            ("debug_logging", "除錯日誌"),
            ("chat_title", "聊天"),
            ("chat_empty", "等待聊天訊息"),
            ("save", "儲存"),
            ("reset", "恢復預設"),
        ],
    );
    add(
        "ja",
        &[
            ("settings_title", "弾幕設定"),
            ("enable_danmaku", "弾幕を有効にする"),
            ("hide_chat", "チャット欄を隠す"),
            ("font_family", "フォント"),
            ("font_size", "フォントサイズ"),
            ("font_size_random", "サイズのばらつき"),
            ("speed", "速度"),
            ("opacity", "不透明度"),
            ("position", "表示エリア"),
            ("position_all", "全画面"),
            ("position_top", "上半分"),
            ("position_bottom", "下半分"),
            ("debug_logging", "デバッグログ"),
            ("chat_title", "チャット"),
            ("chat_empty", "チャットを待っています"),
            ("save", "保存"),
            ("reset", "初期設定に戻す"),
        ],
    );
    add(
        "ko",
        &[
            ("settings_title", "탄막 설정"),
            ("enable_danmaku", "탄막 사용"),
            ("hide_chat", "채팅창 숨기기"),
            ("font_family", "글꼴"),
            ("font_size", "글꼴 크기"),
            ("font_size_random", "크기 변화"),
            ("speed", "속도"),
            ("opacity", "불투명도"),
            ("position", "표시 영역"),
            ("position_all", "전체 화면"),
            ("position_top", "위쪽 절반"),
            ("position_bottom", "아래쪽 절반"),
            ("debug_logging", "디버그 로그"),
            ("chat_title", "채팅"),
            ("chat_empty", "채팅 메시지를 기다리는 중"),
            ("save", "저장"),
            ("reset", "기본값으로 재설정"),
        ],
    );
    add(
        "fr",
        &[
            ("settings_title", "Paramètres des danmaku"),
            ("enable_danmaku", "Activer les danmaku"),
            ("hide_chat", "Masquer le chat"),
            ("font_family", "Police"),
            ("font_size", "Taille de police"),
            ("font_size_random", "Variation de taille"),
            ("speed", "Vitesse"),
            ("opacity", "Opacité"),
            ("position", "Zone d'affichage"),
            ("position_all", "Plein écran"),
            ("position_top", "Moitié haute"),
            ("position_bottom", "Moitié basse"),
            ("debug_logging", "Journal de débogage"),
            ("chat_title", "Chat"),
            ("chat_empty", "En attente de messages"),
            ("save", "Enregistrer"),
            ("reset", "Valeurs par défaut"),
        ],
    );
    add(
        "th",
        &[
            ("settings_title", "การตั้งค่าดันมาขุ"),
            ("enable_danmaku", "เปิดใช้ดันมาขุ"),
            ("hide_chat", "ซ่อนแชท"),
            ("font_family", "แบบอักษร"),
            ("font_size", "ขนาดตัวอักษร"),
            ("font_size_random", "ความแปรผันของขนาด"),
            ("speed", "ความเร็ว"),
            ("opacity", "ความทึบ"),
            ("position", "พื้นที่แสดงผล"),
            ("position_all", "เต็มจอ"),
            ("position_top", "ครึ่งบน"),
            ("position_bottom", "ครึ่งล่าง"),
            ("debug_logging", "บันทึกดีบัก"),
            ("chat_title", "แชท"),
            ("chat_empty", "กำลังรอข้อความแชท"),
            ("save", "บันทึก"),
            ("reset", "คืนค่าเริ่มต้น"),
        ],
    );
    table
});

/// Map a locale such as `zh_TW.UTF-8` or `fr-CA` onto a supported language.
pub fn language_key(locale: &str) -> &'static str {
    let base = locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .replace('_', "-");
    let mut parts = base.split('-');
    let lang = parts.next().unwrap_or_default().to_ascii_lowercase();
    let region = parts.next().unwrap_or_default().to_ascii_uppercase();
    match lang.as_str() {
        "zh" if matches!(region.as_str(), "TW" | "HK" | "MO" | "HANT") => "zh-TW",
        "zh" => "zh",
        "ja" => "ja",
        "ko" => "ko",
        "fr" => "fr",
        "th" => "th",
        _ => FALLBACK_LANGUAGE,
    }
}

/// Look `label` up for `lang`, falling back to English and then to the
/// label itself.
pub fn translate(label: &str, lang: &str) -> String {
    let lookup = |lang: &str| TRANSLATIONS.get(lang).and_then(|t| t.get(label)).copied();
    lookup(lang)
        .or_else(|| lookup(FALLBACK_LANGUAGE))
        .unwrap_or(label)
        .to_owned()
}

/// Language of the current user, from the usual POSIX locale variables.
pub fn system_language() -> &'static str {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
        .map(|value| language_key(&value))
        .unwrap_or(FALLBACK_LANGUAGE)
}
