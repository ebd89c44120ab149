//! Static voice and language catalogs

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::Serialize;

/// Voice used when the request names none
pub const DEFAULT_VOICE: &str = "Leda";

/// A prebuilt Gemini voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceEntry {
    pub voice: &'static str,
    pub style: &'static str,
}

/// A supported speech language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageEntry {
    pub language: &'static str,
    pub code: &'static str,
}

const fn language(language: &'static str, code: &'static str) -> LanguageEntry {
    LanguageEntry { language, code }
}

const fn voice(voice: &'static str, style: &'static str) -> VoiceEntry {
    VoiceEntry { voice, style }
}

pub static LANGUAGES: &[LanguageEntry] = &[
    language("Arabic (Egyptian)", "ar-EG"),
    language("English (US)", "en-US"),
    language("French (France)", "fr-FR"),
    language("Indonesian (Indonesia)", "id-ID"),
    language("Japanese (Japan)", "ja-JP"),
    language("Portuguese (Brazil)", "pt-BR"),
    language("Dutch (Netherlands)", "nl-NL"),
    language("Thai (Thailand)", "th-TH"),
    language("Vietnamese (Vietnam)", "vi-VN"),
    language("Ukrainian (Ukraine)", "uk-UA"),
    language("English (India)", "en-IN"),
    language("Tamil (India)", "ta-IN"),
    language("German (Germany)", "de-DE"),
    language("Spanish (US)", "es-US"),
    language("Hindi (India)", "hi-IN"),
    language("Italian (Italy)", "it-IT"),
    language("Korean (Korea)", "ko-KR"),
    language("Russian (Russia)", "ru-RU"),
    language("Polish (Poland)", "pl-PL"),
    language("Turkish (Turkey)", "tr-TR"),
    language("Romanian (Romania)", "ro-RO"),
    language("Bengali (Bangladesh)", "bn-BD"),
    language("Marathi (India)", "mr-IN"),
    language("Telugu (India)", "te-IN"),
];

pub static VOICES: &[VoiceEntry] = &[
    voice("Zephyr", "Bright"),
    voice("Kore", "Firm"),
    voice("Orus", "Firm"),
    voice("Autonoe", "Bright"),
    voice("Umbriel", "Easy-going"),
    voice("Erinome", "Clear"),
    voice("Laomedeia", "Upbeat"),
    voice("Schedar", "Even"),
    voice("Achird", "Friendly"),
    voice("Sadachbia", "Lively"),
    voice("Puck", "Upbeat"),
    voice("Fenrir", "Excitable"),
    voice("Aoede", "Breezy"),
    voice("Enceladus", "Breathy"),
    voice("Algieba", "Smooth"),
    voice("Algenib", "Gravelly"),
    voice("Achernar", "Soft"),
    voice("Gacrux", "Mature"),
    voice("Zubenelgenubi", "Casual"),
    voice("Sadaltager", "Knowledgeable"),
    voice("Charon", "Informative"),
    voice("Leda", "Youthful"),
    voice("Callirrhoe", "Easy-going"),
    voice("Iapetus", "Clear"),
    voice("Despina", "Smooth"),
    voice("Rasalgethi", "Informative"),
    voice("Alnilam", "Firm"),
    voice("Pulcherrima", "Forward"),
    voice("Vindemiatrix", "Gentle"),
    voice("Sulafat", "Warm"),
];

/// Language codes accepted by the speech model
pub fn valid_language_codes() -> &'static HashSet<&'static str> {
    static CODES: OnceLock<HashSet<&'static str>> = OnceLock::new();
    CODES.get_or_init(|| LANGUAGES.iter().map(|entry| entry.code).collect())
}

pub fn is_valid_language_code(code: &str) -> bool {
    valid_language_codes().contains(code)
}

pub fn is_known_voice(name: &str) -> bool {
    VOICES.iter().any(|entry| entry.voice == name)
}
